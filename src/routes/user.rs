use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{create_user, delete_user, get_user, list_users, login, logout, update_user};
use crate::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/pixiu/users", get(list_users).post(create_user))
        .route("/pixiu/users/", post(create_user))
        .route("/pixiu/users/login", post(login))
        .route("/pixiu/users/logout", post(logout))
        .route(
            "/pixiu/users/{userId}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
