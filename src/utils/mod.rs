pub mod binder;
pub mod config;
pub mod error;
pub mod logger;
pub mod password;
pub mod response;

pub use binder::{IdMeta, ValidatedJson};
pub use config::{load_config, AppConfig};
pub use error::{ApiError, ErrorKind, ServiceError};
pub use logger::init_logger;
pub use password::{hash_password, verify_password};
pub use response::{Envelope, Reply};
