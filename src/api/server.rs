//! HTTP server wiring
//!
//! Builds the web API router on top of the service factory and serves it
//! until the process receives Ctrl+C.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use crate::api::handlers;
use crate::config::{ServerConfig, Settings};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let Some(origins) = config.cors_origins.as_deref().filter(|o| !o.trim().is_empty()) else {
        warn!("cors_origins not set, using permissive CORS");
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/api/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/me", get(handlers::me))
        .route("/api/deals", post(handlers::create_deal).get(handlers::list_deals))
        .route("/api/tickets", post(handlers::create_ticket).get(handlers::list_tickets))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(server)),
        )
        .with_state(state)
}

/// Serve the API until Ctrl+C
pub async fn run(settings: &Settings, services: ServiceFactory) -> Result<()> {
    let app = create_router(AppState { services }, &settings.server);
    let address = settings.bind_address();

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Web API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn server(cors_origins: Option<&str>) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: cors_origins.map(str::to_string),
        }
    }

    async fn preflight(config: &ServerConfig, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/api/deals", post(|| async { "ok" }))
            .layer(cors_layer(config));

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/deals")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_configured_origins_are_allowed() {
        let config = server(Some("https://magante.example, https://admin.magante.example"));
        assert_eq!(
            preflight(&config, "https://admin.magante.example").await.as_deref(),
            Some("https://admin.magante.example")
        );
        assert_eq!(preflight(&config, "https://evil.example").await, None);
    }

    #[tokio::test]
    async fn test_unset_origins_are_permissive() {
        assert_eq!(preflight(&server(None), "https://anywhere.example").await.as_deref(), Some("*"));
        assert_eq!(preflight(&server(Some("  ")), "https://anywhere.example").await.as_deref(), Some("*"));
    }
}
