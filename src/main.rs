use domain::gateway::oidc::{self, OidcClient};
use log::*;
use service::config::Config;
use service::logging::Logger;
use std::sync::Arc;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Auth relay starting up ({})", config.runtime_env());

    // Both steps below are configuration concerns: the service cannot operate
    // without a fully resolved provider, so any failure aborts startup.
    let endpoints = oidc::resolve_endpoints(&config)
        .await
        .expect("Failed to resolve identity provider endpoints");
    let oidc_client = OidcClient::from_config(&config, endpoints)
        .expect("Incomplete identity provider configuration");

    let app_state = AppState::new(config, Arc::new(oidc_client));

    web::init_server(app_state)
        .await
        .expect("Failed to start server");
}
