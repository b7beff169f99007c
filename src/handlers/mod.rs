pub mod health;
pub mod user;

pub use health::health_check;
pub use user::{create_user, delete_user, get_user, list_users, login, logout, update_user};
