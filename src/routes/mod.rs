use axum::{Router, routing::get};

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod owner;
pub mod params;
pub mod stores;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/me", get(auth::me))
        .nest("/stores", stores::router())
        .nest("/admin", admin::router())
        .nest("/owner", owner::router())
}
