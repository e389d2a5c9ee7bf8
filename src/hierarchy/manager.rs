use std::collections::HashSet;
use std::marker::PhantomData;

use tracing::{debug, info, warn};

use super::error::{HierarchyError, HierarchyResult, StoreError};
use super::node::HierarchyNode;
use super::store::NodeStore;
use super::tree::{assemble_forest, extract_subtree, find_mut, fold_chain};
use crate::config::HierarchyConfig;

/// Tree assembly and structural validation for one node type.
///
/// The manager holds no state besides its store and the depth limit: every
/// call re-reads storage, and trees are rebuilt per call. Structural checks
/// run before the mutating write, and the store re-asserts them inside the
/// write itself.
pub struct HierarchyManager<N, S> {
    store: S,
    max_depth: i64,
    _node: PhantomData<fn() -> N>,
}

impl<N, S> HierarchyManager<N, S>
where
    N: HierarchyNode,
    S: NodeStore<N>,
{
    pub fn new(store: S, config: &HierarchyConfig) -> Self {
        Self { store, max_depth: config.max_depth, _node: PhantomData }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forest of nodes matching `name` (prefix; empty means everything).
    ///
    /// Unfiltered, this is a single `find_all` assembled in one pass.
    /// Filtered, each match's ancestor chain is merged into a shared forest:
    /// the upward walk stops at the first ancestor already placed, so every
    /// id appears at most once and every unresolved ancestor costs one read.
    pub async fn list_tree(&self, name: &str) -> HierarchyResult<Vec<N>> {
        if name.is_empty() {
            let all = self.store.find_all().await.map_err(query_failed::<N>("find_all", 0))?;
            debug!(kind = N::KIND, rows = all.len(), "assembling full forest");
            return Ok(assemble_forest(all));
        }

        let matches = self.find_matches(name).await?;
        debug!(kind = N::KIND, name, matches = matches.len(), "merging ancestor chains");

        let mut forest: Vec<N> = Vec::new();
        let mut placed: HashSet<i64> = HashSet::new();
        for node in matches {
            if placed.contains(&node.id()) {
                continue;
            }
            let (path, anchor) = self.walk_up(node, &placed).await?;
            placed.extend(path.iter().map(|n| n.id()));
            let Some(chain) = fold_chain(path) else { continue };
            match anchor.and_then(|id| find_mut(&mut forest, id)) {
                Some(parent) => parent.children_mut().push(chain),
                None => forest.push(chain),
            }
        }
        Ok(forest)
    }

    /// One root chain per match, each holding only the path down to the
    /// match. Chains that share ancestors are returned separately.
    pub async fn get_with_ancestors(&self, name: &str) -> HierarchyResult<Vec<N>> {
        let matches = self.find_matches(name).await?;
        let none_placed = HashSet::new();
        let mut chains = Vec::with_capacity(matches.len());
        for node in matches {
            let (path, _) = self.walk_up(node, &none_placed).await?;
            chains.extend(fold_chain(path));
        }
        Ok(chains)
    }

    /// Node `id` with all of its descendants attached.
    pub async fn get_subtree(&self, id: i64) -> HierarchyResult<N> {
        let node = self.require(id).await?;
        let all = self.store.find_all().await.map_err(query_failed::<N>("find_all", id))?;
        Ok(extract_subtree(assemble_forest(all), id).unwrap_or(node))
    }

    /// Persists `node` under its `parent_id`. The level is derived from the
    /// parent; whatever the caller put in `level`, `id` or `children` is ignored.
    pub async fn create(&self, mut node: N) -> HierarchyResult<N> {
        let parent_id = node.parent_id();
        node.set_level(self.level_under(parent_id).await?);
        node.set_id(0);
        node.children_mut().clear();

        let id = self
            .store
            .create(&node)
            .await
            .map_err(persist_failed::<N>("create", parent_id))?
            .ok_or(HierarchyError::NotFound { kind: N::KIND, id: parent_id })?;
        node.set_id(id);
        info!(kind = N::KIND, id, parent_id, level = node.level(), "node created");
        Ok(node)
    }

    /// Applies the editable fields of `patch` to node `id`.
    ///
    /// `parent` is the requested parent (`Some(0)` asks for a root); `None`
    /// keeps the current one. `patch.parent_id()` is ignored.
    ///
    /// A root never gets a parent, and a node with children never changes
    /// its parent. A childless node may move; its level is then recomputed
    /// from the new parent and must stay within the depth limit.
    pub async fn update(&self, id: i64, mut patch: N, parent: Option<i64>) -> HierarchyResult<N> {
        let mut existing = self.require(id).await?;
        let new_parent = parent.unwrap_or_else(|| existing.parent_id());
        patch.set_parent_id(new_parent);
        let reparent = new_parent != existing.parent_id();

        if existing.is_root() && new_parent != 0 {
            warn!(kind = N::KIND, id, new_parent, "rejected: root cannot get a parent");
            return Err(HierarchyError::RootReparentForbidden { kind: N::KIND, id });
        }

        let children =
            self.store.find_by_parent_id(id).await.map_err(query_failed::<N>("find_by_parent_id", id))?;
        if reparent && !children.is_empty() {
            warn!(kind = N::KIND, id, children = children.len(), "rejected: reparenting a node with children");
            return Err(HierarchyError::HasChildrenReparentForbidden { kind: N::KIND, id });
        }
        if new_parent == id {
            return Err(HierarchyError::SelfParent { kind: N::KIND, id });
        }

        existing.merge_editable(patch);
        if reparent {
            existing.set_level(self.level_under(new_parent).await?);
        }

        if !self.store.save(&existing).await.map_err(persist_failed::<N>("save", id))? {
            return Err(self.explain_rejected_save(id, new_parent).await);
        }
        info!(kind = N::KIND, id, parent_id = new_parent, reparent, "node updated");
        Ok(existing)
    }

    /// Deletes node `id`; refused while it still has children.
    pub async fn delete(&self, id: i64) -> HierarchyResult<()> {
        self.require(id).await?;
        let children =
            self.store.find_by_parent_id(id).await.map_err(query_failed::<N>("find_by_parent_id", id))?;
        if !children.is_empty() {
            warn!(kind = N::KIND, id, children = children.len(), "rejected: deleting a node with children");
            return Err(HierarchyError::HasChildren { kind: N::KIND, id });
        }

        if !self.store.delete_by_id(id).await.map_err(persist_failed::<N>("delete_by_id", id))? {
            // The guard saw a child (or the row vanished) after our check.
            return Err(match self.store.find_by_id(id).await {
                Ok(None) => HierarchyError::NotFound { kind: N::KIND, id },
                Ok(Some(_)) => HierarchyError::HasChildren { kind: N::KIND, id },
                Err(source) => query_failed::<N>("find_by_id", id)(source),
            });
        }
        info!(kind = N::KIND, id, "node deleted");
        Ok(())
    }

    async fn find_matches(&self, name: &str) -> HierarchyResult<Vec<N>> {
        if name.is_empty() {
            self.store.find_all().await.map_err(query_failed::<N>("find_all", 0))
        } else {
            self.store.find_by_name_prefix(name).await.map_err(query_failed::<N>("find_by_name_prefix", 0))
        }
    }

    async fn require(&self, id: i64) -> HierarchyResult<N> {
        self.store
            .find_by_id(id)
            .await
            .map_err(query_failed::<N>("find_by_id", id))?
            .ok_or(HierarchyError::NotFound { kind: N::KIND, id })
    }

    /// Level a node gets when placed under `parent_id`.
    async fn level_under(&self, parent_id: i64) -> HierarchyResult<i64> {
        if parent_id == 0 {
            return Ok(1);
        }
        let parent = self.require(parent_id).await?;
        let level = parent.level() + 1;
        if level > self.max_depth {
            warn!(kind = N::KIND, parent_id, level, max_depth = self.max_depth, "rejected: depth exceeded");
            return Err(HierarchyError::DepthExceeded { kind: N::KIND, level, max_depth: self.max_depth });
        }
        Ok(level)
    }

    /// Walks from `node` towards its root. Returns the bottom-up path and,
    /// when the walk stopped at an already placed ancestor, that ancestor's id.
    async fn walk_up(&self, node: N, placed: &HashSet<i64>) -> HierarchyResult<(Vec<N>, Option<i64>)> {
        let start = node.id();
        let mut visited = HashSet::from([start]);
        let mut parent_id = node.parent_id();
        let mut path = vec![node];

        while parent_id != 0 {
            if placed.contains(&parent_id) {
                return Ok((path, Some(parent_id)));
            }
            if !visited.insert(parent_id) {
                return Err(HierarchyError::CorruptChain { kind: N::KIND, id: start });
            }
            let parent = self.require(parent_id).await?;
            parent_id = parent.parent_id();
            path.push(parent);
        }
        Ok((path, None))
    }

    async fn explain_rejected_save(&self, id: i64, new_parent: i64) -> HierarchyError {
        let current = match self.store.find_by_id(id).await {
            Ok(Some(current)) => current,
            Ok(None) => return HierarchyError::NotFound { kind: N::KIND, id },
            Err(source) => return query_failed::<N>("find_by_id", id)(source),
        };
        if current.is_root() {
            return HierarchyError::RootReparentForbidden { kind: N::KIND, id };
        }
        if new_parent != 0 {
            if let Ok(None) = self.store.find_by_id(new_parent).await {
                return HierarchyError::NotFound { kind: N::KIND, id: new_parent };
            }
        }
        HierarchyError::HasChildrenReparentForbidden { kind: N::KIND, id }
    }
}

fn query_failed<N: HierarchyNode>(op: &'static str, id: i64) -> impl FnOnce(StoreError) -> HierarchyError {
    move |source| HierarchyError::QueryFailed { op, kind: N::KIND, id, source }
}

fn persist_failed<N: HierarchyNode>(op: &'static str, id: i64) -> impl FnOnce(StoreError) -> HierarchyError {
    move |source| HierarchyError::PersistFailed { op, kind: N::KIND, id, source }
}
