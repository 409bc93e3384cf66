//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, gc_handler, get_handler, health_handler, refresh_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /entries/:key` - Store a value
/// - `GET /entries/:key` - Retrieve a value
/// - `DELETE /entries/:key` - Remove a value
/// - `POST /entries/:key/refresh` - Restart an entry's sliding window
/// - `POST /gc` - Run a garbage-collection pass
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// Values are stored as the UTF-8 bytes of the request's `value` string and
/// returned as text; bytes written through the library API that are not
/// valid UTF-8 come back with replacement characters.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/entries/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/entries/:key/refresh", post(refresh_handler))
        .route("/gc", post(gc_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
