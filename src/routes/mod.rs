pub mod user;

use axum::{routing::get, Router};

use crate::handlers::health_check;
use crate::AppState;

pub use user::user_routes;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(health_check))
}
