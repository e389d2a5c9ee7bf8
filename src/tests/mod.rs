//! Tests for the portal backend.
//!
//! - **hierarchy_tests**: manager behavior over the in-memory store
//! - **sqlite_store_tests**: guarded SQL writes and prefix matching
//! - **api_tests**: HTTP endpoints through the full router
//! - **error_tests**: error mapping and validation helpers
//! - **config_tests**: configuration defaults and validation
//! - **db_tests**: schema initialization
//!
//! Run a single module with `cargo test hierarchy_tests`.

pub mod config_tests;
pub mod db_tests;
pub mod error_tests;
pub mod sqlite_store_tests;
