//! Thin frontend HTTP server: static demo pages, a pass-through JSON proxy
//! to the authentication backend, and a health endpoint. The session core
//! lives in [`crate::auth`] and [`crate::ui`]; nothing here implements
//! authentication.

pub mod handlers;

use crate::auth::{session::SessionStore, AuthConfig, AuthService};
use crate::nav::Navigator;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared state for the page and proxy handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub api_url: String,
    pub public_dir: PathBuf,
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::proxy_login))
        .route("/api/forgot-password", post(handlers::proxy_forgot_password))
        .route("/", get(handlers::index))
        .route("/admin", get(handlers::admin))
        .route("/public-trips", get(handlers::public_trips))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the frontend. Backend reachability is probed once at
/// startup for the log; it never blocks serving.
pub async fn new(port: u16, public_dir: PathBuf, api_url: String) -> Result<()> {
    let client = Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .timeout(Duration::from_secs(10))
        .build()?;

    {
        let api_url = api_url.clone();
        tokio::spawn(async move { log_backend_status(&api_url).await });
    }

    let state = AppState {
        client,
        api_url,
        public_dir,
    };

    let listener = TcpListener::bind(format!("::0:{port}")).await?;
    info!("listening on port {port}");

    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

async fn log_backend_status(api_url: &str) {
    match AuthService::new(
        AuthConfig::new(api_url),
        SessionStore::in_memory(),
        Navigator::new(),
    ) {
        Ok(service) => {
            if service.check_api_status().await {
                info!("authentication API is online");
            } else {
                warn!("authentication API is not reachable; logins will fail until it is");
            }
        }
        Err(err) => warn!("could not build the health probe client: {err}"),
    }
}
