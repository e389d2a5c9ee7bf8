use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::hierarchy::{HierarchyManager, SqliteNodeStore};
use crate::metrics::Metrics;
use crate::types::{Menu, Organization};

/// Hierarchy manager backed by the node's SQLite table.
pub type SqlManager<N> = HierarchyManager<N, SqliteNodeStore<N>>;

/// The shared application state.
///
/// Cloned into every handler by axum. Nothing in here caches hierarchy data:
/// the managers re-read the database on every call.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool (books are queried directly through it).
    pub db: sqlx::SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
    pub organizations: Arc<SqlManager<Organization>>,
    pub menus: Arc<SqlManager<Menu>>,
}

impl AppState {
    /// Wires both hierarchy managers to `db` with the configured depth limit.
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let organizations = HierarchyManager::new(SqliteNodeStore::new(db.clone()), &config.hierarchy);
        let menus = HierarchyManager::new(SqliteNodeStore::new(db.clone()), &config.hierarchy);
        Self {
            db,
            config: Arc::new(config),
            metrics: Metrics::new(),
            organizations: Arc::new(organizations),
            menus: Arc::new(menus),
        }
    }
}

impl FromRef<AppState> for Arc<SqlManager<Organization>> {
    fn from_ref(state: &AppState) -> Self {
        state.organizations.clone()
    }
}

impl FromRef<AppState> for Arc<SqlManager<Menu>> {
    fn from_ref(state: &AppState) -> Self {
        state.menus.clone()
    }
}

impl FromRef<AppState> for Metrics {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
