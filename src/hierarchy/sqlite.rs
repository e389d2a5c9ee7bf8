use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};

use super::error::StoreError;
use super::node::HierarchyNode;
use super::store::NodeStore;

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Table mapping for a node type stored in SQLite.
pub trait SqlNode: HierarchyNode {
    const TABLE: &'static str;
    /// Persisted columns besides `id`, in the order `bind_columns` binds
    /// them. Must include `name`, `parent_id` and `level`.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// [`NodeStore`] over one SQLite table. Writes carry their structural guard
/// in the statement's WHERE clause.
pub struct SqliteNodeStore<N> {
    pool: SqlitePool,
    select: String,
    insert: String,
    update: String,
    delete: String,
    _node: PhantomData<fn() -> N>,
}

impl<N: SqlNode> SqliteNodeStore<N> {
    pub fn new(pool: SqlitePool) -> Self {
        let table = N::TABLE;
        let n = N::COLUMNS.len();
        let columns = N::COLUMNS.join(", ");
        let placeholders = (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
        let assignments =
            N::COLUMNS.iter().enumerate().map(|(i, c)| format!("{c} = ?{}", i + 1)).collect::<Vec<_>>().join(", ");
        // Guard parameters follow the column binds.
        let (id_param, parent_param) = (n + 1, n + 2);
        let insert_parent_param = n + 1;

        Self {
            select: format!("SELECT id, {columns} FROM {table}"),
            insert: format!(
                "INSERT INTO {table} ({columns}) SELECT {placeholders} \
                 WHERE ?{insert_parent_param} = 0 \
                    OR EXISTS (SELECT 1 FROM {table} AS p WHERE p.id = ?{insert_parent_param})"
            ),
            update: format!(
                "UPDATE {table} SET {assignments} \
                 WHERE id = ?{id_param} \
                   AND (parent_id = ?{parent_param} \
                        OR (parent_id != 0 AND NOT EXISTS (SELECT 1 FROM {table} AS c WHERE c.parent_id = ?{id_param}))) \
                   AND (?{parent_param} = 0 OR EXISTS (SELECT 1 FROM {table} AS p WHERE p.id = ?{parent_param}))"
            ),
            delete: format!(
                "DELETE FROM {table} WHERE id = ?1 \
                 AND NOT EXISTS (SELECT 1 FROM {table} AS c WHERE c.parent_id = ?1)"
            ),
            pool,
            _node: PhantomData,
        }
    }

    async fn fetch(&self, sql: &str, bind: Option<BindValue<'_>>) -> Result<Vec<N>, StoreError> {
        let mut query = sqlx::query(sql);
        match bind {
            Some(BindValue::Int(v)) => query = query.bind(v),
            Some(BindValue::Text(v)) => query = query.bind(v),
            None => {}
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(N::from_row).collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}

enum BindValue<'a> {
    Int(i64),
    Text(&'a str),
}

#[async_trait]
impl<N: SqlNode> NodeStore<N> for SqliteNodeStore<N> {
    async fn find_by_id(&self, id: i64) -> Result<Option<N>, StoreError> {
        let sql = format!("{} WHERE id = ?1", self.select);
        Ok(self.fetch(&sql, Some(BindValue::Int(id))).await?.into_iter().next())
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<N>, StoreError> {
        let sql = format!("{} WHERE parent_id = ?1 ORDER BY id", self.select);
        self.fetch(&sql, Some(BindValue::Int(parent_id))).await
    }

    // Case-sensitive and wildcard-free, unlike LIKE.
    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<N>, StoreError> {
        let sql = format!("{} WHERE substr(name, 1, length(?1)) = ?1 ORDER BY id", self.select);
        self.fetch(&sql, Some(BindValue::Text(prefix))).await
    }

    async fn find_all(&self) -> Result<Vec<N>, StoreError> {
        let sql = format!("{} ORDER BY id", self.select);
        self.fetch(&sql, None).await
    }

    async fn create(&self, node: &N) -> Result<Option<i64>, StoreError> {
        let result = node.bind_columns(sqlx::query(&self.insert)).bind(node.parent_id()).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_rowid()))
    }

    async fn save(&self, node: &N) -> Result<bool, StoreError> {
        let result = node
            .bind_columns(sqlx::query(&self.update))
            .bind(node.id())
            .bind(node.parent_id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(&self.delete).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
