#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::config::HierarchyConfig;
    use crate::hierarchy::tree::collect_ids;
    use crate::hierarchy::{HierarchyError, HierarchyManager, MemoryStore, NodeStore, SqliteNodeStore};
    use crate::types::{Menu, Organization};

    async fn setup_test_db() -> SqlitePool {
        // one connection: every pooled in-memory connection would be its own database
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::db::init_db(&pool).await.unwrap();
        pool
    }

    fn org(name: &str, parent_id: i64) -> Organization {
        Organization {
            id: 0,
            name: name.to_string(),
            parent_id,
            level: 0,
            description: format!("{name} team"),
            children: Vec::new(),
        }
    }

    fn menu(name: &str, parent_id: i64) -> Menu {
        Menu {
            id: 0,
            path: format!("/{name}"),
            name: name.to_string(),
            component: "Layout".to_string(),
            redirect: String::new(),
            title: name.to_uppercase(),
            icon: "folder".to_string(),
            order_no: 1,
            hidden: false,
            keep_alive: true,
            parent_id,
            application_id: 1,
            level: 0,
            children: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let manager = HierarchyManager::new(SqliteNodeStore::new(setup_test_db().await), &HierarchyConfig::default());

        let root = manager.create(org("eng", 0)).await.unwrap();
        let child = manager.create(org("eng-web", root.id)).await.unwrap();

        let stored = manager.store().find_by_id(child.id).await.unwrap().unwrap();
        assert_eq!(stored.level, 2);
        assert_eq!(stored.parent_id, root.id);
        assert_eq!(stored.description, "eng-web team");

        let children = manager.store().find_by_parent_id(root.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(manager.store().find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_name_prefix_is_literal() {
        let store = SqliteNodeStore::<Organization>::new(setup_test_db().await);
        let mut discount = org("50%_off", 0);
        discount.level = 1;
        let mut other = org("500 club", 0);
        other.level = 1;
        store.create(&discount).await.unwrap().unwrap();
        store.create(&other).await.unwrap().unwrap();

        let found = store.find_by_name_prefix("50%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "50%_off");
        assert_eq!(store.find_by_name_prefix("50").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_name_prefix_is_case_sensitive_in_both_stores() {
        let mut upper = org("Engineering", 0);
        upper.level = 1;
        let mut lower = org("eng-ops", 0);
        lower.level = 1;

        let sqlite = SqliteNodeStore::<Organization>::new(setup_test_db().await);
        let memory = MemoryStore::<Organization>::new();
        for node in [&upper, &lower] {
            sqlite.create(node).await.unwrap().unwrap();
            memory.create(node).await.unwrap().unwrap();
        }

        for prefix in ["eng", "Eng", "ENG", "engineering", ""] {
            let from_sqlite: Vec<String> =
                sqlite.find_by_name_prefix(prefix).await.unwrap().into_iter().map(|n| n.name).collect();
            let from_memory: Vec<String> =
                memory.find_by_name_prefix(prefix).await.unwrap().into_iter().map(|n| n.name).collect();
            assert_eq!(from_sqlite, from_memory, "prefix {prefix:?}");
        }
        let found = sqlite.find_by_name_prefix("eng").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "eng-ops");
        assert!(sqlite.find_by_name_prefix("ENG").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guarded_insert_requires_parent() {
        let store = SqliteNodeStore::<Organization>::new(setup_test_db().await);
        let mut stray = org("stray", 42);
        stray.level = 2;

        assert_eq!(store.create(&stray).await.unwrap(), None);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guarded_update_and_delete() {
        let store = SqliteNodeStore::<Organization>::new(setup_test_db().await);
        let manager = HierarchyManager::new(store, &HierarchyConfig::default());
        let a = manager.create(org("a", 0)).await.unwrap();
        let b = manager.create(org("b", 0)).await.unwrap();
        let a1 = manager.create(org("a1", a.id)).await.unwrap();
        let a11 = manager.create(org("a11", a1.id)).await.unwrap();
        let store = manager.store();

        // a1 has a child: moving it is refused at the statement level
        let mut moved = a1.clone();
        moved.parent_id = b.id;
        assert!(!store.save(&moved).await.unwrap());

        // a root never gains a parent
        let mut rooted = b.clone();
        rooted.parent_id = a.id;
        assert!(!store.save(&rooted).await.unwrap());

        // edits that keep the parent always pass
        let mut renamed = a1.clone();
        renamed.name = "a-one".into();
        assert!(store.save(&renamed).await.unwrap());

        assert!(!store.delete_by_id(a1.id).await.unwrap());
        assert!(store.delete_by_id(a11.id).await.unwrap());
        assert!(store.delete_by_id(a1.id).await.unwrap());
        assert!(!store.delete_by_id(a1.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_manager_over_sqlite_rejects_structural_changes() {
        let manager = HierarchyManager::new(SqliteNodeStore::new(setup_test_db().await), &HierarchyConfig::default());
        let root = manager.create(org("root", 0)).await.unwrap();
        let other = manager.create(org("other", 0)).await.unwrap();
        let mid = manager.create(org("mid", root.id)).await.unwrap();
        manager.create(org("leaf", mid.id)).await.unwrap();

        let err = manager.update(root.id, org("root", other.id), Some(other.id)).await.unwrap_err();
        assert!(matches!(err, HierarchyError::RootReparentForbidden { .. }));
        let err = manager.update(mid.id, org("mid", other.id), Some(other.id)).await.unwrap_err();
        assert!(matches!(err, HierarchyError::HasChildrenReparentForbidden { .. }));
        let err = manager.delete(mid.id).await.unwrap_err();
        assert!(matches!(err, HierarchyError::HasChildren { .. }));

        let forest = manager.list_tree("").await.unwrap();
        assert_eq!(collect_ids(&forest), vec![root.id, mid.id, mid.id + 1, other.id]);
    }

    #[tokio::test]
    async fn test_menu_tree_and_unique_name() {
        let manager = HierarchyManager::new(SqliteNodeStore::new(setup_test_db().await), &HierarchyConfig::default());

        let system = manager.create(menu("system", 0)).await.unwrap();
        let users = manager.create(menu("users", system.id)).await.unwrap();
        assert_eq!(users.level, 2);

        let stored = manager.store().find_by_id(users.id).await.unwrap().unwrap();
        assert_eq!(stored.path, "/users");
        assert!(stored.keep_alive);
        assert!(!stored.hidden);

        let err = manager.create(menu("users", system.id)).await.unwrap_err();
        assert!(matches!(err, HierarchyError::PersistFailed { .. }));

        let forest = manager.list_tree("us").await.unwrap();
        assert_eq!(collect_ids(&forest), vec![system.id, users.id]);
    }
}
