//! # Bookrack Server
//!
//! Read-only JSON browsing of a Calibre library.
//!
//! Routes:
//! - `GET /`, `POST /` paged listing or search, driven by the `qos` token
//!   and the listing parameters (`matching`, `sortby`, `order`, `virtlib`, ...)
//! - `GET /{entity}/{id}` and `GET /{entity}/{id}/{name}` entity shelves
//! - `GET /doc/{id}` a single document
//! - `GET /columns` custom columns
//! - `GET /virtlibs` virtual libraries from the Calibre preferences

pub mod errors;
pub mod handlers;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use errors::{AppError, AppResult};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::browse).post(handlers::browse_form))
        .route("/doc/{id}", get(handlers::document))
        .route("/columns", get(handlers::custom_columns))
        .route("/virtlibs", get(handlers::virtual_libraries))
        .route("/{entity}/{id}", get(handlers::by_entity))
        .route("/{entity}/{id}/{name}", get(handlers::by_entity_named))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
