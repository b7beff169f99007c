use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::AppState;

/// Request-scoped data handed to every user service call.
///
/// The router never acts on the deadline or token itself. The token is
/// cancelled once the last clone of the context is dropped, which happens
/// when the handler finishes or the client goes away mid-request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub deadline: Option<Instant>,
    pub principal: Option<AuthUser>,
    token: CancellationToken,
    _guard: Option<Arc<DropGuard>>,
}

impl RequestContext {
    /// Context bound to the lifetime of the returned value
    pub fn new(timeout: Option<Duration>) -> Self {
        let token = CancellationToken::new();
        Self {
            request_id: Uuid::new_v4(),
            deadline: timeout.map(|t| Instant::now() + t),
            principal: None,
            _guard: Some(Arc::new(token.clone().drop_guard())),
            token,
        }
    }

    /// Context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: None,
            principal: None,
            token: CancellationToken::new(),
            _guard: None,
        }
    }

    pub fn with_principal(mut self, principal: AuthUser) -> Self {
        self.principal = Some(principal);
        self
    }

    #[cfg(test)]
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Name of the authenticated caller, for audit logging
    pub fn actor(&self) -> &str {
        self.principal.as_ref().map_or("anonymous", |p| p.name.as_str())
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let timeout = match state.config.request_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let ctx = RequestContext::new(timeout);
        Ok(match parts.extensions.get::<AuthUser>() {
            Some(user) => ctx.with_principal(user.clone()),
            None => ctx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cancelled_when_context_dropped() {
        let ctx = RequestContext::new(None);
        let token = ctx.token.clone();
        let clone = ctx.clone();

        drop(ctx);
        assert!(!token.is_cancelled());

        drop(clone);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_background_never_cancels_on_drop() {
        let ctx = RequestContext::background();
        let token = ctx.token.clone();
        drop(ctx);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        let ctx = RequestContext::new(Some(Duration::ZERO));
        assert!(ctx.deadline_exceeded());

        let ctx = RequestContext::new(Some(Duration::from_secs(60)));
        assert!(!ctx.deadline_exceeded());

        assert!(!RequestContext::background().deadline_exceeded());
    }

    #[test]
    fn test_actor_names_principal() {
        let ctx = RequestContext::background();
        assert_eq!(ctx.actor(), "anonymous");

        let ctx = ctx.with_principal(AuthUser {
            user_id: "1".to_string(),
            name: "root".to_string(),
            role: "admin".to_string(),
            exp: 0,
            iat: 0,
        });
        assert_eq!(ctx.actor(), "root");
    }

    #[test]
    fn test_explicit_cancel() {
        let ctx = RequestContext::background();
        ctx.cancel();
        assert!(ctx.is_cancelled());
    }
}
