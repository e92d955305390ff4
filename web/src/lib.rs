//! Web layer for the authorization relay: routing, controllers, and mapping
//! of domain errors onto HTTP responses.

use domain::gateway::oidc::OidcClient;
use log::*;
use service::config::Config;
use std::sync::Arc;

pub(crate) mod controller;
pub mod error;
pub mod router;

pub use error::Error;
pub use router::define_routes;

/// Application state shared by all request handlers.
/// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub oidc: Arc<OidcClient>,
}

impl AppState {
    pub fn new(config: Config, oidc: Arc<OidcClient>) -> Self {
        Self { config, oidc }
    }
}

/// Bind the configured interface and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let listener = tokio::net::TcpListener::bind((interface.as_str(), port)).await?;
    info!("Server listening for requests on {}:{}", interface, port);

    axum::serve(listener, define_routes(app_state)).await
}
