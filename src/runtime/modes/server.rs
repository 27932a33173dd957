//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api;
use crate::api::middleware::RequestIdMiddleware;
use crate::config::ServerConfig;
use crate::runtime::lifetime;

/// CORS 预检缓存时间（秒）
const CORS_MAX_AGE: usize = 3600;

/// CORS 配置
#[derive(Clone, Debug)]
struct CorsSettings {
    allowed_origins: Vec<String>,
}

impl CorsSettings {
    fn from_config(server: &ServerConfig) -> Self {
        Self {
            allowed_origins: server.cors_allowed_origins.clone(),
        }
    }

    fn enabled(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    fn is_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsSettings) {
    if !cors_config.enabled() {
        return;
    }

    if cors_config.is_any_origin() {
        warn!(
            "CORS allows any origin. Session cookies will not be sent cross-origin; \
            list explicit origins to allow credentialed requests."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsSettings) -> Cors {
    // 未配置时使用浏览器默认的同源策略
    if !cors_config.enabled() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .max_age(CORS_MAX_AGE);

    if cors_config.is_any_origin() {
        // any origin 不允许携带凭据
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Prepares storage, services and session state
/// 2. Configures and starts the HTTP server
/// 3. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let (startup, state) = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = CorsSettings::from_config(&config.server);
    validate_cors_config(&cors_config);

    if config.auth.trusted_proxies.is_empty() {
        warn!("Login rate limiting keys on the peer address (no trusted proxies configured)");
    } else {
        warn!(
            "Login rate limiting: trusted proxies configured: {:?}",
            config.auth.trusted_proxies
        );
    }

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);
        let state = state.clone();

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .configure(move |cfg| api::configure(cfg, &state))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_settings() {
        let server = ServerConfig {
            cors_allowed_origins: vec!["*".into()],
            ..ServerConfig::default()
        };
        let settings = CorsSettings::from_config(&server);
        assert!(settings.enabled());
        assert!(settings.is_any_origin());

        let settings = CorsSettings::from_config(&ServerConfig::default());
        assert!(!settings.enabled());
    }
}
