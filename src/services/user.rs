use async_trait::async_trait;

use crate::context::RequestContext;
use crate::models::user::{LoginResponse, User};
use crate::utils::error::ServiceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Contract the user routes delegate to.
///
/// Every handler calls exactly one of these methods per request and forwards
/// the outcome, error message included, to the response envelope untouched.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, ctx: &RequestContext, user: User) -> ServiceResult<()>;

    async fn update(&self, ctx: &RequestContext, user_id: i64, user: User) -> ServiceResult<()>;

    async fn delete(&self, ctx: &RequestContext, user_id: i64) -> ServiceResult<()>;

    async fn get(&self, ctx: &RequestContext, user_id: i64) -> ServiceResult<User>;

    async fn list(&self, ctx: &RequestContext) -> ServiceResult<Vec<User>>;

    async fn login(&self, ctx: &RequestContext, credentials: User) -> ServiceResult<LoginResponse>;
}
