pub mod memory;
pub mod user;

pub use memory::{MemoryUserService, TokenSettings};
pub use user::{ServiceResult, UserService};
