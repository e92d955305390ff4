//! Controller for the OAuth2 Authorization Code flow.
//!
//! Handles the login redirect to the identity provider and the callback that
//! exchanges the returned authorization code for tokens.
//!
//! Note: both endpoints are driven by browser redirects, so they cannot rely
//! on custom request headers.

use crate::error::WebErrorKind;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::oauth_flow;
use log::*;
use serde::Deserialize;

/// Query parameters for starting the login flow
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Federated identity provider hint, forwarded verbatim when present
    pub provider: Option<String>,
}

/// Query parameters for the OAuth callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /login
///
/// Redirects the caller to the identity provider's authorization endpoint.
/// This step never fails: a missing or empty `provider` hint simply omits the
/// `identity_provider` parameter from the redirect.
pub async fn login(
    State(app_state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> impl IntoResponse {
    let url = oauth_flow::authorization_url(&app_state.oidc, params.provider.as_deref());
    (StatusCode::FOUND, [(header::LOCATION, url)])
}

/// GET /callback
///
/// Exchanges the authorization code for tokens and returns the decoded access
/// token claims as JSON.
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if params.state.is_some() {
        // No session exists to bind the state token to, so it cannot be
        // validated here; it only keeps the login redirect non-constant.
        debug!("Ignoring state parameter on callback");
    }

    let code = params
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(Error::Web(WebErrorKind::MissingAuthorizationCode))?;

    let result = oauth_flow::exchange_code_for_claims(&app_state.oidc, code).await?;
    Ok(Json(result))
}
