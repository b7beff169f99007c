//! User account handlers.
//!
//! Each handler binds its inputs through extractors, delegates exactly once to
//! the configured [`UserService`](crate::services::UserService), and returns an
//! [`Envelope`]. Binding failures never reach the service.

use axum::extract::State;

use crate::context::RequestContext;
use crate::models::user::{LoginResponse, User};
use crate::utils::{Envelope, IdMeta, Reply, ValidatedJson};
use crate::AppState;

/// POST /pixiu/users/
pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(user): ValidatedJson<User>,
) -> Reply<()> {
    tracing::debug!(request_id = %ctx.request_id, "Creating user {}", user.name);
    state.users.create(&ctx, user).await?;

    Ok(Envelope::success())
}

/// PUT /pixiu/users/{userId}
pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: IdMeta,
    ValidatedJson(user): ValidatedJson<User>,
) -> Reply<()> {
    tracing::debug!(request_id = %ctx.request_id, user_id = id.user_id, "Updating user");
    state.users.update(&ctx, id.user_id, user).await?;

    Ok(Envelope::success())
}

/// DELETE /pixiu/users/{userId}
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: IdMeta,
) -> Reply<()> {
    tracing::debug!(request_id = %ctx.request_id, user_id = id.user_id, "Deleting user");
    state.users.delete(&ctx, id.user_id).await?;

    Ok(Envelope::success())
}

/// GET /pixiu/users/{userId}
pub async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: IdMeta,
) -> Reply<User> {
    let user = state.users.get(&ctx, id.user_id).await?;

    Ok(Envelope::with_result(user))
}

/// GET /pixiu/users
pub async fn list_users(State(state): State<AppState>, ctx: RequestContext) -> Reply<Vec<User>> {
    let users = state.users.list(&ctx).await?;

    Ok(Envelope::with_result(users))
}

/// POST /pixiu/users/login
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(credentials): ValidatedJson<User>,
) -> Reply<LoginResponse> {
    let response = state.users.login(&ctx, credentials).await?;

    Ok(Envelope::with_result(response))
}

/// POST /pixiu/users/logout
///
/// Stub: no session state is tracked server-side, so there is nothing to
/// invalidate and no service call is made. Always succeeds.
pub async fn logout() -> Envelope<()> {
    Envelope::success()
}
