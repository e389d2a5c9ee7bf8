#[cfg(test)]
mod tests {
    use crate::config::{self, AppConfig};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.database.url, "sqlite://data/portal.db");
        assert_eq!(config.hierarchy.max_depth, 5);
        assert_eq!(config.logging.file_name, "portal.log");
        assert!(config.security.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_server_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let err = config::validate(&config).unwrap_err();
        assert!(err.to_string().contains("invalid server.port"));
    }

    #[test]
    fn test_depth_limit_bounds() {
        let mut config = AppConfig::default();
        config.hierarchy.max_depth = 0;
        assert!(config::validate(&config).is_err());

        config.hierarchy.max_depth = 33;
        assert!(config::validate(&config).is_err());

        config.hierarchy.max_depth = 12;
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_pool_and_body_limits() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.server.max_body_bytes = 512;
        assert!(config::validate(&config).is_err());
    }

    #[test]
    fn test_empty_log_file_name() {
        let mut config = AppConfig::default();
        config.logging.file_name = "  ".into();
        assert!(config::validate(&config).is_err());
    }

    #[test]
    fn test_ensure_sqlite_parent_dir() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("portal.db");
        let url = format!("sqlite://{}", db_path.display());

        config::ensure_sqlite_parent_dir(&url).unwrap();
        assert!(dir.path().join("nested").is_dir());

        // non-sqlite URLs are left alone
        config::ensure_sqlite_parent_dir("postgres://localhost/portal").unwrap();
    }
}
