use thiserror::Error;

/// Failure reported by a [`NodeStore`](super::NodeStore) implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Domain errors of the hierarchy manager. Structural variants are always
/// raised before any mutating write.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{kind} cannot be placed beyond level {max_depth} (computed level {level})")]
    DepthExceeded { kind: &'static str, level: i64, max_depth: i64 },

    #[error("{kind} {id} is a root and cannot be moved under another node")]
    RootReparentForbidden { kind: &'static str, id: i64 },

    #[error("{kind} {id} has children and cannot change its parent")]
    HasChildrenReparentForbidden { kind: &'static str, id: i64 },

    #[error("{kind} {id} has children and cannot be deleted")]
    HasChildren { kind: &'static str, id: i64 },

    #[error("{kind} {id} cannot be its own parent")]
    SelfParent { kind: &'static str, id: i64 },

    /// The ancestor walk came back to a node it already visited.
    #[error("{kind} ancestor chain of {id} loops back on itself")]
    CorruptChain { kind: &'static str, id: i64 },

    #[error("{op} failed for {kind} {id}: {source}")]
    QueryFailed {
        op: &'static str,
        kind: &'static str,
        id: i64,
        #[source]
        source: StoreError,
    },

    #[error("{op} failed for {kind} {id}: {source}")]
    PersistFailed {
        op: &'static str,
        kind: &'static str,
        id: i64,
        #[source]
        source: StoreError,
    },
}

pub type HierarchyResult<T> = Result<T, HierarchyError>;
