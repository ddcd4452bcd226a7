//! Bearer credential handling for the MemberHub gateway.
//!
//! Verification is deliberately narrow: take a token string and a secret,
//! hand back verified claims or a failure that says why. Who a failure is
//! reported to, and with which status code, is the HTTP layer's business.
//! The three failure kinds matter: a missing credential, a structurally
//! broken one, and one that fails verification each call for a different
//! remediation by the client.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("authorization credential missing")]
    MissingCredential,

    #[error("malformed authorization credential")]
    MalformedCredential,

    #[error("credential verification failed")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthnError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            // Structural decode failures: the bytes never were a token.
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthnError::MalformedCredential,
            // Signature, expiry, and anything else the verifier can throw.
            _ => AuthnError::InvalidCredential(err),
        }
    }
}

/// Verified token payload.
///
/// `role` defaults to empty when the claim is absent so a role-less token
/// still verifies structurally; the authorization layer turns the empty
/// role into its own failure kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The header must be exactly `Bearer <token>`; anything else is malformed,
/// a missing header is its own failure kind.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthnError> {
    let header = header.ok_or(AuthnError::MissingCredential)?;
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthnError::MalformedCredential),
    }
}

/// Decode and verify a token (HS256, expiry checked).
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthnError> {
    jsonwebtoken::decode::<Claims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
        .map_err(AuthnError::from)
}

/// Mint a signed token for `user_id` with the given role.
///
/// There is no issuance endpoint; this exists for the CLI and for tests.
pub fn issue_token(
    user_id: Uuid,
    role: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.token_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}
