pub mod auth;
pub mod panic;

pub use auth::{auth_middleware, AuthUser};
pub use panic::{catch_panic_layer, setup_panic_hook};
