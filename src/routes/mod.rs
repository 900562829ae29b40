use axum::Router;

use crate::state::AppState;

pub mod convert;
pub mod files;
pub mod health;

/// All API routes, without middleware.
pub fn api() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(convert::router())
        .merge(files::router())
}
