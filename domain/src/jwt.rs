//! Unverified JWT claim extraction.
//!
//! The callback flow returns the decoded claims of the provider-issued access
//! token to the caller. The token arrives over the encrypted token-endpoint
//! channel directly from the provider, and this service holds no session of
//! its own, so the claims are decoded without checking the token's signature.
//! Anything that needs to *trust* these claims must verify the token against
//! the provider's published signing keys instead of calling this.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{Map, Value};

fn jwt_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Jwt),
    }
}

/// Decode the claim set from a compact-serialized JWT without verifying its signature.
///
/// The token must have the standard three dot-separated segments; the payload
/// segment must be base64url-encoded JSON holding an object.
pub fn decode_unverified_claims(token: &str) -> Result<Map<String, Value>, Error> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(jwt_error("Token is not in compact JWS form"));
    }

    let payload = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Jwt),
    })?;

    let claims: Value = serde_json::from_slice(&payload).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Jwt),
    })?;

    match claims {
        Value::Object(map) => Ok(map),
        _ => Err(jwt_error("Token payload is not a JSON object")),
    }
}
