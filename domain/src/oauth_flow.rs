//! Operations for the two steps of the Authorization Code flow.
//!
//! The login step builds the redirect to the identity provider; the callback
//! step exchanges the authorization code and decodes the access token's
//! claims. Both are pure functions of the request plus the shared provider
//! client; nothing is persisted between the two steps.

use crate::error::Error;
use crate::gateway::oidc::OidcClient;
use crate::jwt;
use log::*;
use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of a successful code exchange, serialized verbatim into the
/// callback response body.
#[derive(Debug, Serialize)]
pub struct TokenResult {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub jwt_claims: Map<String, Value>,
}

/// Build the authorization URL the caller is redirected to.
///
/// A fresh anti-forgery `state` token is generated per request. The callback
/// does not validate it: with no session store there is nothing to bind it
/// to, so it only serves as a non-constant value the provider echoes back.
pub fn authorization_url(oidc: &OidcClient, provider_hint: Option<&str>) -> String {
    let state = generate_state();
    info!("Redirecting caller to the identity provider's authorization endpoint");
    oidc.authorization_url(&state, provider_hint)
}

/// Exchange an authorization code for tokens and decode the access token's claims.
pub async fn exchange_code_for_claims(
    oidc: &OidcClient,
    authorization_code: &str,
) -> Result<TokenResult, Error> {
    let tokens = oidc
        .exchange_code(authorization_code)
        .await
        .inspect_err(|e| warn!("Failed to exchange authorization code: {:?}", e))?;

    let jwt_claims = jwt::decode_unverified_claims(&tokens.access_token)
        .inspect_err(|e| warn!("Failed to decode access token claims: {:?}", e))?;

    Ok(TokenResult {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        jwt_claims,
    })
}

/// Generate an unpredictable per-request state token.
fn generate_state() -> String {
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind, InternalErrorKind};
    use crate::gateway::oidc::ProviderEndpoints;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use serde_json::json;
    use std::time::Duration;

    fn oidc_client(server_url: &str) -> OidcClient {
        OidcClient::new(
            "test-client",
            "test-secret",
            "https://app.example.com/callback",
            ProviderEndpoints {
                authorization_endpoint: format!("{}/oauth2/authorize", server_url),
                token_endpoint: format!("{}/oauth2/token", server_url),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn access_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.{}", header, payload, "sig")
    }

    #[test]
    fn test_state_token_is_hex_and_unpredictable() {
        let first = generate_state();
        let second = generate_state();

        assert_eq!(first.len(), 64); // 32 bytes hex encoded
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_authorization_url_carries_fresh_state() {
        let client = oidc_client("https://idp.example.com");

        let first = authorization_url(&client, None);
        let second = authorization_url(&client, None);

        assert!(first.contains("state="));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_exchange_code_for_claims_success() {
        let mut server = mockito::Server::new_async().await;
        let token = access_token(&json!({"sub": "123"}));
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": token,
                    "refresh_token": "refresh-y",
                    "expires_in": 3600,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = exchange_code_for_claims(&oidc_client(&server.url()), "abc")
            .await
            .unwrap();

        assert_eq!(result.access_token, token);
        assert_eq!(result.refresh_token.as_deref(), Some("refresh-y"));
        assert_eq!(result.jwt_claims.get("sub"), Some(&json!("123")));
    }

    #[tokio::test]
    async fn test_exchange_code_for_claims_serializes_expected_shape() {
        let mut server = mockito::Server::new_async().await;
        let token = access_token(&json!({"sub": "123"}));
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": token,
                    "expires_in": 3600,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = exchange_code_for_claims(&oidc_client(&server.url()), "abc")
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::to_value(&result).unwrap();

        // A provider that issues no refresh token serializes it as null
        assert_eq!(
            body,
            json!({
                "access_token": token,
                "refresh_token": null,
                "jwt_claims": {"sub": "123"}
            })
        );
    }

    #[tokio::test]
    async fn test_exchange_failure_is_external() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let result = exchange_code_for_claims(&oidc_client(&server.url()), "bad").await;

        assert!(matches!(
            result.unwrap_err().error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_opaque_access_token_is_jwt_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "opaque-token",
                    "expires_in": 3600,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = exchange_code_for_claims(&oidc_client(&server.url()), "abc").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Jwt)
        );
    }
}
