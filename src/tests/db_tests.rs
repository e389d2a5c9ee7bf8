#[cfg(test)]
mod tests {
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    async fn setup_test_db() -> sqlx::SqlitePool {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        db::init_db(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_init_db_creates_tables_and_indexes() {
        let pool = setup_test_db().await;

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        for table in ["books", "menus", "organizations"] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }

        let indexes: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='index'")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert!(indexes.contains(&"idx_organizations_parent".to_string()));
        assert!(indexes.contains(&"idx_menus_parent".to_string()));
    }

    #[tokio::test]
    async fn test_init_db_is_idempotent() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO organizations (name, parent_id, level) VALUES ('eng', 0, 1)")
            .execute(&pool)
            .await
            .unwrap();

        db::init_db(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations").fetch_one(&pool).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_book_defaults() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO books (title, page_number) VALUES ('rust', 10)").execute(&pool).await.unwrap();

        let (meta, created_at): (String, String) =
            sqlx::query_as("SELECT meta, created_at FROM books WHERE title = 'rust'").fetch_one(&pool).await.unwrap();
        assert_eq!(meta, "null");
        assert!(created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_file_database() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("portal.db").display());
        let pool = SqlitePoolOptions::new().max_connections(2).connect(&url).await.unwrap();

        db::init_db(&pool).await.unwrap();

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode").fetch_one(&pool).await.unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
