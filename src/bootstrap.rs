use anyhow::{Context, Result};
use axum::{middleware as axum_middleware, Router};
use clap::Parser;
use http::Method;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{auth::auth_middleware, panic},
    routes::{health_routes, user_routes},
    services::{MemoryUserService, TokenSettings, UserService},
    utils::{
        init_logger, load_config,
        response::{method_not_allowed, not_found},
    },
    AppConfig, AppState,
};

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "pixiu-users")]
#[command(author, version, about = "User account HTTP service.")]
pub struct CliArgs {
    /// Server bind address (overrides config file)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Server port (overrides config file)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Environment (development, staging, production)
    #[arg(short = 'E', long, default_value = "development")]
    pub env: String,

    /// Configuration file path
    #[arg(short = 'C', long, default_value = "config.toml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    pub log_level: String,
}

/// Application bootstrap result containing all initialized components
pub struct BootstrapResult {
    pub app: Router,
    pub bind_addr: String,
}

/// Initialize application logger
pub fn init_logging(log_level: &str) {
    init_logger(log_level);
}

/// Setup panic hook for graceful panic handling
pub fn setup_panic_handler() {
    panic::setup_panic_hook();
}

/// Load and merge configuration from file and CLI arguments
pub fn load_app_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let app_config = load_config(&cli_args.config, &cli_args.env)
        .context("Failed to load application configuration")?;
    Ok(app_config)
}

/// Build the default in-memory user service, seeding the admin account if configured
pub async fn init_user_service(config: &AppConfig) -> Result<Arc<dyn UserService>> {
    tracing::info!("Initializing in-memory user service...");
    let service = MemoryUserService::new(TokenSettings {
        secret: config.auth.jwt_secret.clone(),
        expiry_seconds: config.auth.jwt_expiry_seconds,
    });

    match &config.auth.admin {
        Some(admin) => {
            service.seed_admin(&admin.name, &admin.password).await?;
            tracing::info!("Admin account {} seeded", admin.name);
        }
        None if config.auth.enabled => {
            tracing::warn!("Authentication is enabled but no admin account is configured; no user can log in.");
        }
        None => {}
    }

    Ok(Arc::new(service))
}

/// Create shared application state
pub fn create_app_state(users: Arc<dyn UserService>, config: AppConfig) -> AppState {
    AppState {
        users,
        config: Arc::new(config),
    }
}

/// Configure CORS layer
pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build application router with all middleware
pub fn build_app_router(state: AppState) -> Router {
    let cors = configure_cors();
    let compression = CompressionLayer::new();

    Router::new()
        .merge(user_routes())
        .merge(health_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(panic::catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression)
        .with_state(state)
}

/// Bootstrap the entire application
pub async fn bootstrap(cli_args: CliArgs) -> Result<BootstrapResult> {
    tracing::info!("Starting pixiu-users in {} mode", cli_args.env);

    let app_config = load_app_config(&cli_args)?;

    let host = cli_args.host.unwrap_or_else(|| app_config.server.host.clone());
    let port = cli_args.port.unwrap_or(app_config.server.port);

    let users = init_user_service(&app_config).await?;

    let state = create_app_state(users, app_config);
    let app = build_app_router(state);

    let bind_addr = format!("{}:{}", host, port);

    Ok(BootstrapResult { app, bind_addr })
}

/// Start HTTP server with graceful shutdown
pub async fn start_server(bootstrap_result: BootstrapResult) -> Result<()> {
    let BootstrapResult { app, bind_addr } = bootstrap_result;

    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("Server shutdown completed");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C signal, initiating graceful shutdown"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("Received SIGTERM signal, initiating graceful shutdown");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
