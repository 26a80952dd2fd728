//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Endpoints
//! - `GET /_gazelle/:group/:key` - Raw value bytes for peers
//! - `GET /api/:group/:key` - Value as JSON
//! - `GET /_gazelle/:group/`, `GET /api/:group/` - Empty key, answers 400
//! - `GET /stats/:group` - Group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
