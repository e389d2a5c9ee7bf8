use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::error::StoreError;
use super::node::HierarchyNode;
use super::store::NodeStore;

/// In-process [`NodeStore`] keeping rows in insertion order.
///
/// Each call holds the lock for its whole duration, so the write guards are
/// as atomic as the SQL ones. `write_count` counts attempted writes, guarded
/// or not, which lets tests assert that rejected mutations never reached it.
pub struct MemoryStore<N> {
    rows: Mutex<Vec<N>>,
    next_id: AtomicI64,
    writes: AtomicU64,
}

impl<N: HierarchyNode> MemoryStore<N> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Seeds the store with `rows` as they are; ids must already be unique.
    pub fn with_rows(rows: Vec<N>) -> Self {
        let next_id = rows.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        Self { rows: Mutex::new(rows), next_id: AtomicI64::new(next_id), writes: AtomicU64::new(0) }
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> Vec<N> {
        self.rows.lock().await.clone()
    }
}

impl<N: HierarchyNode> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<N: HierarchyNode> NodeStore<N> for MemoryStore<N> {
    async fn find_by_id(&self, id: i64) -> Result<Option<N>, StoreError> {
        Ok(self.rows.lock().await.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<N>, StoreError> {
        Ok(self.rows.lock().await.iter().filter(|r| r.parent_id() == parent_id).cloned().collect())
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<N>, StoreError> {
        Ok(self.rows.lock().await.iter().filter(|r| r.name().starts_with(prefix)).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<N>, StoreError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn create(&self, node: &N) -> Result<Option<i64>, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.lock().await;
        let parent_id = node.parent_id();
        if parent_id != 0 && !rows.iter().any(|r| r.id() == parent_id) {
            return Ok(None);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut row = node.clone();
        row.set_id(id);
        row.children_mut().clear();
        rows.push(row);
        Ok(Some(id))
    }

    async fn save(&self, node: &N) -> Result<bool, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.lock().await;
        let id = node.id();
        let new_parent = node.parent_id();
        let has_children = rows.iter().any(|r| r.parent_id() == id);
        let parent_exists = new_parent == 0 || rows.iter().any(|r| r.id() == new_parent);

        let Some(slot) = rows.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        let unchanged = slot.parent_id() == new_parent;
        if !parent_exists || !(unchanged || (!slot.is_root() && !has_children)) {
            return Ok(false);
        }
        let mut row = node.clone();
        row.children_mut().clear();
        *slot = row;
        Ok(true)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.parent_id() == id) {
            return Ok(false);
        }
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() < before)
    }
}
