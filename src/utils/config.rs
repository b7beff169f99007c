use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Application configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Token authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Deadline attached to each request context, 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Require a bearer token on non-public routes
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,

    /// JWT secret key for token signing
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// JWT token expiration time in seconds (default: 3600)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_seconds: u64,

    /// Administrator account created at startup
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub name: String,
    pub password: String,
}

// Default JWT secret key
fn default_jwt_secret() -> String {
    "pixiu-secret-key-change-in-production".to_string()
}

// Default value functions
fn default_jwt_expiry() -> u64 {
    3600
}

fn default_auth_enabled() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            jwt_secret: default_jwt_secret(),
            jwt_expiry_seconds: default_jwt_expiry(),
            admin: None,
        }
    }
}

/// Load application configuration from file and environment variables
///
/// Configuration is loaded in the following order (later sources override earlier):
/// 1. Base config file (config_path)
/// 2. Environment-specific config file (config.{env}.toml)
/// 3. Environment variables with PIXIU_ prefix, `__` between nested keys
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(config_path).required(false))
        .add_source(File::with_name(&format!("config.{}", env)).required(false))
        .add_source(Environment::with_prefix("PIXIU").prefix_separator("_").separator("__"))
        .build()
        .context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
