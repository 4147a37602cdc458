use axum::{Router, routing::get};

pub mod categories;
pub mod common;
pub mod items;
pub mod system;

/// Router for all authenticated (actor-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/items", items::router())
        .nest("/categories", categories::router())
}
