//! # HTTP Server
//!
//! Axum server over the sharemap routes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::SchemaDocument;

use super::config::ServerConfig;
use super::errors::{ServerError, ServerResult};
use super::routes::{sharemap_routes, SharemapState};

/// HTTP server for the sharemap configuration API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Loads the configured schema section once and builds the router.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let table = SchemaDocument::from_path(&config.schema_path)?.section(&config.section)?;
        let state = SharemapState::new(config.section.clone(), table)
            .with_groups(config.field_groups.clone())
            .with_udp_target(config.udp_host.clone(), config.udp_port);
        Ok(Self::with_state(config, state))
    }

    /// Builds a server over an already loaded state
    pub fn with_state(config: ServerConfig, state: SharemapState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    fn build_router(config: &ServerConfig, state: Arc<SharemapState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        sharemap_routes(state).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> ServerResult<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| ServerError::Config(format!("Invalid socket address: {}", e)))?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(
            Event::ServerStart,
            &[
                ("addr", &addr.to_string()),
                ("schema", &self.config.schema_path.display().to_string()),
                ("section", &self.config.section),
            ],
        );

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
