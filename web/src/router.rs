use crate::controller::oauth_controller;
use crate::AppState;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{routing::get, Router};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the full route table.
///
/// Dispatch is total: exactly `/login` and `/callback` are served, everything
/// else falls through to the not-found handler.
pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origins);

    Router::new()
        .merge(oauth_routes(app_state))
        .fallback(route_not_found)
        .layer(cors)
}

/// Routes for the two steps of the Authorization Code flow
fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(oauth_controller::login))
        .route("/callback", get(oauth_controller::callback))
        .with_state(app_state)
}

/// Terminal handler for every path outside the authorization flow.
async fn route_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Route not found")
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}
