pub mod bootstrap;
pub mod context;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use services::UserService;
pub use utils::AppConfig;

/// Application shared state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub config: Arc<AppConfig>,
}
