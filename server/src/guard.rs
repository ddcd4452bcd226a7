//! Request authentication and the per-route authorization gate.
//!
//! Requests move through two checks with distinct failure surfaces: the
//! credential is verified first (failures are 401s, before any role is
//! looked at), then the verified role is checked against the permission
//! table (failures are 403s). Each variant keeps a stable reason code so
//! clients can tell re-authenticate apart from insufficient privilege.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use platform_authn::{AuthnError, bearer_token, verify_token};
use platform_authz::{Action, AuthzError, Subject};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::http::AppState;

/// Identity attached to a request once its credential has verified.
///
/// Built once per request by the extractor, read by the handler's
/// authorization check, dropped at the end of the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: String,
}

impl CurrentUser {
    /// Gate the current operation on the permission table.
    pub fn require(&self, action: Action, subject: Subject) -> Result<(), AuthRejection> {
        platform_authz::authorize(&self.role, action, subject).map_err(AuthRejection::from)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthnError::MalformedCredential))
            .transpose()?;
        let token = bearer_token(header)?;
        let claims = verify_token(token, &state.config.auth)?;
        Ok(CurrentUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// Boundary mapping for the auth failure taxonomy.
#[derive(Debug)]
pub enum AuthRejection {
    Authn(AuthnError),
    Authz(AuthzError),
}

impl From<AuthnError> for AuthRejection {
    fn from(err: AuthnError) -> Self {
        AuthRejection::Authn(err)
    }
}

impl From<AuthzError> for AuthRejection {
    fn from(err: AuthzError) -> Self {
        AuthRejection::Authz(err)
    }
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::Authn(_) => StatusCode::UNAUTHORIZED,
            AuthRejection::Authz(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthRejection::Authn(AuthnError::MissingCredential) => "MISSING_CREDENTIAL",
            AuthRejection::Authn(AuthnError::MalformedCredential) => "MALFORMED_CREDENTIAL",
            AuthRejection::Authn(AuthnError::InvalidCredential(_)) => "INVALID_CREDENTIAL",
            AuthRejection::Authz(AuthzError::MissingRole) => "MISSING_ROLE",
            AuthRejection::Authz(AuthzError::PermissionDenied { .. }) => "PERMISSION_DENIED",
        }
    }

    fn message(&self) -> String {
        match self {
            AuthRejection::Authn(err) => err.to_string(),
            AuthRejection::Authz(err) => err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.message(),
        };
        warn!(code = body.error, "request rejected: {}", body.message);
        (self.status(), Json(body)).into_response()
    }
}
