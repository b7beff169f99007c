use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::context::RequestContext;
use crate::middleware::auth::generate_token;
use crate::models::user::{LoginResponse, User};
use crate::services::user::{ServiceResult, UserService};
use crate::utils::error::ServiceError;
use crate::utils::password::{hash_password, verify_password};

const DEFAULT_ROLE: &str = "user";

/// Signing parameters for issued login tokens
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub expiry_seconds: u64,
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, StoredUser>,
}

/// In-process user service backing the default binary.
///
/// Ids are assigned from 1 and `list` returns users in ascending id order.
#[derive(Debug)]
pub struct MemoryUserService {
    store: RwLock<Store>,
    tokens: TokenSettings,
}

impl MemoryUserService {
    pub fn new(tokens: TokenSettings) -> Self {
        Self {
            store: RwLock::new(Store {
                next_id: 1,
                users: BTreeMap::new(),
            }),
            tokens,
        }
    }

    /// Create the administrator account used to obtain the first token
    pub async fn seed_admin(&self, name: &str, password: &str) -> anyhow::Result<()> {
        let admin = User {
            name: name.to_string(),
            password: password.to_string(),
            role: "admin".to_string(),
            description: "bootstrap administrator".to_string(),
            ..Default::default()
        };
        self.create(&RequestContext::background(), admin)
            .await
            .with_context(|| format!("Failed to seed admin user {}", name))
    }

    fn ensure_active(ctx: &RequestContext) -> ServiceResult<()> {
        if ctx.is_cancelled() {
            return Err(ServiceError::cancelled("request cancelled"));
        }
        if ctx.deadline_exceeded() {
            return Err(ServiceError::cancelled("request deadline exceeded"));
        }
        Ok(())
    }

    fn not_found(user_id: i64) -> ServiceError {
        ServiceError::not_found(format!("user {} not found", user_id))
    }
}

#[async_trait]
impl UserService for MemoryUserService {
    async fn create(&self, ctx: &RequestContext, mut user: User) -> ServiceResult<()> {
        Self::ensure_active(ctx)?;

        if user.password.is_empty() {
            return Err(ServiceError::invalid_argument("password must not be empty"));
        }
        let password_hash = hash_password(&user.password).context("Failed to hash password")?;

        let mut store = self.store.write().await;
        if store.users.values().any(|stored| stored.user.name == user.name) {
            return Err(ServiceError::already_exists(format!("user {} already exists", user.name)));
        }

        let id = store.next_id;
        store.next_id += 1;

        let now = Utc::now();
        user.id = id;
        user.resource_version = 0;
        user.password.clear();
        if user.role.is_empty() {
            user.role = DEFAULT_ROLE.to_string();
        }
        user.gmt_create = Some(now);
        user.gmt_modified = Some(now);

        tracing::info!(request_id = %ctx.request_id, actor = ctx.actor(), user_id = id, "User created: {}", user.name);
        store.users.insert(id, StoredUser { user, password_hash });
        Ok(())
    }

    async fn update(&self, ctx: &RequestContext, user_id: i64, user: User) -> ServiceResult<()> {
        Self::ensure_active(ctx)?;

        let password_hash = if user.password.is_empty() {
            None
        } else {
            Some(hash_password(&user.password).context("Failed to hash password")?)
        };

        let mut store = self.store.write().await;
        let stored = store
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Self::not_found(user_id))?;

        if stored.user.resource_version != user.resource_version {
            return Err(ServiceError::conflict(format!(
                "resource version mismatch for user {}: expected {}, got {}",
                user_id, stored.user.resource_version, user.resource_version
            )));
        }

        stored.user.status = user.status;
        stored.user.description = user.description;
        if !user.role.is_empty() {
            stored.user.role = user.role;
        }
        if user.email.is_some() {
            stored.user.email = user.email;
        }
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        stored.user.resource_version += 1;
        stored.user.gmt_modified = Some(Utc::now());

        tracing::info!(request_id = %ctx.request_id, actor = ctx.actor(), user_id, "User updated: {}", stored.user.name);
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, user_id: i64) -> ServiceResult<()> {
        Self::ensure_active(ctx)?;

        let removed = self.store.write().await.users.remove(&user_id);
        match removed {
            Some(stored) => {
                tracing::info!(request_id = %ctx.request_id, actor = ctx.actor(), user_id, "User deleted: {}", stored.user.name);
                Ok(())
            }
            None => Err(Self::not_found(user_id)),
        }
    }

    async fn get(&self, ctx: &RequestContext, user_id: i64) -> ServiceResult<User> {
        Self::ensure_active(ctx)?;

        self.store
            .read()
            .await
            .users
            .get(&user_id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| Self::not_found(user_id))
    }

    async fn list(&self, ctx: &RequestContext) -> ServiceResult<Vec<User>> {
        Self::ensure_active(ctx)?;

        let store = self.store.read().await;
        Ok(store.users.values().map(|stored| stored.user.clone()).collect())
    }

    async fn login(&self, ctx: &RequestContext, credentials: User) -> ServiceResult<LoginResponse> {
        Self::ensure_active(ctx)?;

        let found = {
            let store = self.store.read().await;
            store
                .users
                .values()
                .find(|stored| stored.user.name == credentials.name)
                .map(|stored| (stored.user.id, stored.user.role.clone(), stored.password_hash.clone()))
        };

        let invalid = || ServiceError::unauthenticated("invalid username or password");
        let (user_id, role, password_hash) = found.ok_or_else(invalid)?;

        let is_valid = verify_password(&credentials.password, &password_hash)
            .context("Failed to verify password")?;
        if !is_valid {
            tracing::warn!(request_id = %ctx.request_id, "Failed login for {}", credentials.name);
            return Err(invalid());
        }

        let token = generate_token(
            user_id,
            &credentials.name,
            &role,
            &self.tokens.secret,
            self.tokens.expiry_seconds,
        )?;

        tracing::info!(request_id = %ctx.request_id, user_id, "User {} logged in successfully", credentials.name);

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expiry_seconds,
            user_id,
            role,
        })
    }
}
