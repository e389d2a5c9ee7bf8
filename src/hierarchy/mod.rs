//! Parent/child hierarchies stored as flat self-referencing tables.
//!
//! - [`node`]: the [`HierarchyNode`] trait implemented by organizations and menus
//! - [`tree`]: pure forest assembly (index-then-attach, chain folding)
//! - [`store`]: the [`NodeStore`] storage contract
//! - [`sqlite`] / [`memory`]: SQLite and in-process stores
//! - [`manager`]: [`HierarchyManager`], ancestor chains, trees and guarded mutations

pub mod error;
pub mod manager;
pub mod memory;
pub mod node;
pub mod sqlite;
pub mod store;
pub mod tree;

pub use error::{HierarchyError, HierarchyResult, StoreError};
pub use manager::HierarchyManager;
pub use memory::MemoryStore;
pub use node::HierarchyNode;
pub use sqlite::{SqlNode, SqliteNodeStore};
pub use store::NodeStore;
