//! API Module
//!
//! HTTP handlers and routing for the cache REST API.
//!
//! # Endpoints
//! - `PUT /entries/:key` - Store a value
//! - `GET /entries/:key` - Retrieve a value
//! - `DELETE /entries/:key` - Remove a value
//! - `POST /entries/:key/refresh` - Refresh a sliding window
//! - `POST /gc` - Run garbage collection
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
