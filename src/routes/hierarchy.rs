//! Handlers shared by every hierarchy endpoint (`/organizations`, `/menus`).
//!
//! The handlers are generic over the node type; `hierarchy_routes` wires one
//! set of them to a base path.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{validation, AppError, AppResult};
use crate::hierarchy::{HierarchyError, HierarchyResult, SqlNode};
use crate::metrics::Metrics;
use crate::state::{AppState, SqlManager};
use crate::types::{MenuPayload, NameFilter, OrganizationPayload};

/// A JSON request body that turns into a node after validation.
pub trait NodePayload: DeserializeOwned + Send + 'static {
    type Node: SqlNode + Serialize;

    fn validate(&self) -> AppResult<()>;
    /// Requested parent; `None` when the body left it out.
    fn parent_id(&self) -> Option<i64>;
    fn into_node(self) -> Self::Node;
}

impl NodePayload for OrganizationPayload {
    type Node = crate::types::Organization;

    fn validate(&self) -> AppResult<()> {
        validation::validate_required(&self.name, "name", 32)?;
        validation::validate_max_len(&self.description, "desc", 56)?;
        self.parent_id.map_or(Ok(()), validation::validate_parent_id)
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn into_node(self) -> Self::Node {
        self.into()
    }
}

impl NodePayload for MenuPayload {
    type Node = crate::types::Menu;

    fn validate(&self) -> AppResult<()> {
        validation::validate_required(&self.path, "path", 32)?;
        validation::validate_required(&self.name, "name", 32)?;
        validation::validate_required(&self.component, "component", 255)?;
        validation::validate_max_len(&self.redirect, "redirect", 255)?;
        validation::validate_max_len(&self.title, "title", 26)?;
        validation::validate_max_len(&self.icon, "icon", 32)?;
        validation::validate_positive_number(Some(self.application_id), "applicationId")?;
        self.parent_id.map_or(Ok(()), validation::validate_parent_id)
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    fn into_node(self) -> Self::Node {
        self.into()
    }
}

/// Routes for one hierarchy under `base`:
///
/// - `GET    {base}?name=`           forest (dedup-merged when filtered)
/// - `GET    {base}/ancestors?name=` one root chain per match
/// - `GET    {base}/{id}`            node with its descendants
/// - `POST   {base}`                 create
/// - `PUT    {base}/{id}`            update
/// - `DELETE {base}/{id}`            delete
pub fn hierarchy_routes<P>(base: &str) -> Router<AppState>
where
    P: NodePayload,
    Arc<SqlManager<P::Node>>: FromRef<AppState>,
{
    Router::new()
        .route(base, get(list_tree::<P::Node>).post(create_node::<P>))
        .route(&format!("{base}/ancestors"), get(list_ancestors::<P::Node>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_subtree::<P::Node>).put(update_node::<P>).delete(delete_node::<P::Node>),
        )
}

pub async fn list_tree<N: SqlNode + Serialize>(
    State(manager): State<Arc<SqlManager<N>>>,
    State(metrics): State<Metrics>,
    Query(filter): Query<NameFilter>,
) -> AppResult<Json<Vec<N>>> {
    metrics.inc_tree_reads();
    let forest = manager.list_tree(filter.name.trim()).await?;
    Ok(Json(forest))
}

pub async fn list_ancestors<N: SqlNode + Serialize>(
    State(manager): State<Arc<SqlManager<N>>>,
    State(metrics): State<Metrics>,
    Query(filter): Query<NameFilter>,
) -> AppResult<Json<Vec<N>>> {
    metrics.inc_tree_reads();
    let chains = manager.get_with_ancestors(filter.name.trim()).await?;
    Ok(Json(chains))
}

pub async fn get_subtree<N: SqlNode + Serialize>(
    State(manager): State<Arc<SqlManager<N>>>,
    State(metrics): State<Metrics>,
    Path(id): Path<i64>,
) -> AppResult<Json<N>> {
    metrics.inc_tree_reads();
    Ok(Json(manager.get_subtree(id).await?))
}

pub async fn create_node<P: NodePayload>(
    State(manager): State<Arc<SqlManager<P::Node>>>,
    State(metrics): State<Metrics>,
    Json(payload): Json<P>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let node = track(&metrics, manager.create(payload.into_node()).await)?;
    metrics.inc_nodes_created();
    Ok((StatusCode::CREATED, Json(node)))
}

pub async fn update_node<P: NodePayload>(
    State(manager): State<Arc<SqlManager<P::Node>>>,
    State(metrics): State<Metrics>,
    Path(id): Path<i64>,
    Json(payload): Json<P>,
) -> AppResult<Json<P::Node>> {
    validation::validate_positive_number(Some(id), "id")?;
    payload.validate()?;
    let parent = payload.parent_id();
    let node = track(&metrics, manager.update(id, payload.into_node(), parent).await)?;
    metrics.inc_nodes_updated();
    Ok(Json(node))
}

pub async fn delete_node<N: SqlNode + Serialize>(
    State(manager): State<Arc<SqlManager<N>>>,
    State(metrics): State<Metrics>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    validation::validate_positive_number(Some(id), "id")?;
    track(&metrics, manager.delete(id).await)?;
    metrics.inc_nodes_deleted();
    Ok(StatusCode::NO_CONTENT)
}

// Counts structural rejections before handing the error to the transport.
fn track<T>(metrics: &Metrics, result: HierarchyResult<T>) -> AppResult<T> {
    result.map_err(|err| {
        if matches!(
            err,
            HierarchyError::DepthExceeded { .. }
                | HierarchyError::RootReparentForbidden { .. }
                | HierarchyError::HasChildrenReparentForbidden { .. }
                | HierarchyError::HasChildren { .. }
                | HierarchyError::SelfParent { .. }
        ) {
            metrics.inc_mutations_rejected();
        }
        AppError::from(err)
    })
}
