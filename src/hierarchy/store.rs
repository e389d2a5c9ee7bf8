use async_trait::async_trait;

use super::error::StoreError;
use super::node::HierarchyNode;

/// Flat access to a self-referencing node table.
///
/// The three writes are conditional: each re-checks its structural guard
/// inside the same statement, so a child inserted between the manager's
/// pre-check and the write still blocks it.
#[async_trait]
pub trait NodeStore<N: HierarchyNode>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<N>, StoreError>;

    /// Direct children of `parent_id`; an empty vector when there are none.
    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<N>, StoreError>;

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<N>, StoreError>;

    async fn find_all(&self) -> Result<Vec<N>, StoreError>;

    /// Inserts `node` and returns the assigned id, or `None` when
    /// `node.parent_id()` is nonzero and no longer exists.
    async fn create(&self, node: &N) -> Result<Option<i64>, StoreError>;

    /// Overwrites the record with `node.id()`. Returns `false` without
    /// writing when the record is missing, or when the parent changes while
    /// the stored record is a root or has children.
    async fn save(&self, node: &N) -> Result<bool, StoreError>;

    /// Returns `false` without deleting when the record is missing or still
    /// has children.
    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
