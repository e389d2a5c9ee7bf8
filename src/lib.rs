//! # Portal Backend Library
//!
//! REST backend for an admin portal. Organizations and menus are stored as
//! flat rows that reference their parent by id; the API serves them back as
//! nested trees and keeps them structurally sound on every write.
//!
//! ## Core Components
//!
//! - [`hierarchy`]: generic tree manager, tree assembly and node stores
//! - [`config`]: layered configuration (embedded defaults, file, env)
//! - [`db`]: SQLite schema initialization
//! - [`error`]: HTTP error mapping and request validation helpers
//! - [`metrics`]: in-process counters
//! - [`middleware`]: response security headers
//! - [`routes`]: HTTP handlers and the router builder
//! - [`state`]: shared application state
//! - [`types`]: node types and request/response DTOs

pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
