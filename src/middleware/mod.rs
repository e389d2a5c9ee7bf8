//! Middleware layered onto the router in [`crate::routes::router`].

pub mod security_headers;
