//! OIDC identity provider client.
//!
//! This module provides an HTTP client for the OAuth2 Authorization Code flow
//! against an OpenID Connect identity provider: endpoint resolution from the
//! provider's discovery document, authorization URL construction, and the
//! authorization-code-for-tokens exchange.

use crate::error::{config_error, DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

/// Authorization and token endpoint URLs for an identity provider.
///
/// Field names follow the OIDC discovery document, so the relevant subset of
/// `<issuer>/.well-known/openid-configuration` deserializes directly into it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpoints {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
}

/// OAuth token response from the identity provider
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

/// Request to exchange an authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    grant_type: String,
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// Fetch the provider's discovery document and extract the endpoint URLs.
pub async fn discover(issuer_url: &str, timeout: Duration) -> Result<ProviderEndpoints, Error> {
    let url = format!(
        "{}/.well-known/openid-configuration",
        issuer_url.trim_end_matches('/')
    );

    debug!("Fetching OIDC provider metadata from {}", url);

    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .build()?;

    let response = client.get(&url).send().await.map_err(|e| {
        warn!("Failed to fetch OIDC provider metadata: {:?}", e);
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
        }
    })?;

    if response.status().is_success() {
        let endpoints: ProviderEndpoints = response.json().await.map_err(|e| {
            warn!("Failed to parse OIDC provider metadata: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Invalid OIDC discovery document".to_string(),
                )),
            }
        })?;
        info!(
            "Resolved OIDC endpoints: authorization={}, token={}",
            endpoints.authorization_endpoint, endpoints.token_endpoint
        );
        Ok(endpoints)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        warn!("OIDC provider metadata error: {}", error_text);
        Err(Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
        })
    }
}

/// Resolve the provider endpoints from config.
///
/// Explicit endpoint overrides win; otherwise the issuer's discovery document
/// is fetched. Called once at startup, before the server binds.
pub async fn resolve_endpoints(config: &Config) -> Result<ProviderEndpoints, Error> {
    let overrides = (
        config.authorization_endpoint().filter(|url| !url.is_empty()),
        config.token_endpoint().filter(|url| !url.is_empty()),
    );
    if let (Some(authorization_endpoint), Some(token_endpoint)) = overrides {
        info!("Using configured OIDC endpoints, skipping discovery");
        return Ok(ProviderEndpoints {
            authorization_endpoint,
            token_endpoint,
        });
    }

    let issuer_url = config
        .oidc_issuer_url()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| config_error("No OIDC issuer URL provided"))?;

    discover(&issuer_url, Duration::from_secs(config.http_timeout_secs)).await
}

/// Identity provider client for the Authorization Code flow.
///
/// Holds the immutable provider configuration: constructed once at startup and
/// shared read-only across requests.
pub struct OidcClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: ProviderEndpoints,
}

impl OidcClient {
    /// Create a new identity provider client.
    ///
    /// The timeout bounds every outbound call, so a hung provider surfaces as
    /// a transport error instead of stalling the request forever.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        endpoints: ProviderEndpoints,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            endpoints,
        })
    }

    /// Build a client from the startup configuration.
    ///
    /// Every provider value is required and must be non-empty; a missing one
    /// yields a `Config` error, which the caller treats as fatal.
    pub fn from_config(config: &Config, endpoints: ProviderEndpoints) -> Result<Self, Error> {
        let client_id = config
            .oidc_client_id()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| config_error("No OIDC client ID provided"))?;

        let client_secret = config
            .oidc_client_secret()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| config_error("No OIDC client secret provided"))?;

        let redirect_uri = config
            .oidc_redirect_uri()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| config_error("No OIDC redirect URI provided"))?;

        Self::new(
            &client_id,
            &client_secret,
            &redirect_uri,
            endpoints,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Generate the authorization URL the caller is redirected to.
    ///
    /// `identity_provider` is the optional federated IdP hint; it is appended
    /// only when non-empty.
    pub fn authorization_url(&self, state: &str, identity_provider: Option<&str>) -> String {
        let scopes = ["openid", "email", "profile"].join(" ");

        let mut url = format!(
            "{}?\
            response_type=code&\
            client_id={}&\
            redirect_uri={}&\
            scope={}&\
            state={}",
            self.endpoints.authorization_endpoint,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        );

        if let Some(hint) = identity_provider.filter(|hint| !hint.is_empty()) {
            url.push_str(&format!(
                "&identity_provider={}",
                urlencoding::encode(hint)
            ));
        }

        url
    }

    /// Exchange an authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            grant_type: "authorization_code".to_string(),
            code: code.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
        };

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(&self.endpoints.token_endpoint)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange authorization code: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from identity provider".to_string(),
                    )),
                }
            })?;
            info!("Successfully exchanged authorization code for tokens");
            Ok(tokens)
        } else {
            // Provider error detail stays server-side; callers map this to a
            // generic failure response.
            let error_text = response.text().await.unwrap_or_default();
            warn!("Token exchange error from identity provider: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}
