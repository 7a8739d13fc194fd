//! Authentication and role guards for Axum
//!
//! `authenticate` runs once for every API request: a valid bearer token puts
//! the caller's [`Identity`] into the request extensions, an invalid one
//! leaves an [`AuthFailure`] behind. Public handlers read
//! `Option<Extension<Identity>>`; protected routes add one of the
//! `require_*` guards as a route layer.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::ApiError;
use super::router::AppState;
use crate::application::identity::{require_role, ADMINS_ONLY, CONTENT_EDITORS};
use crate::domain::{DomainError, Identity, UserRole};

/// Why a supplied token was not accepted.
#[derive(Clone, Debug)]
pub struct AuthFailure(pub String);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the bearer token, if any, to a stored identity.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.users.authenticate(&token).await {
            Ok(identity) => {
                debug!(user = %identity.username, role = %identity.role, "Authenticated");
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                let reason = match e {
                    DomainError::Unauthorized(reason) => reason,
                    other => return ApiError::from(other).into_response(),
                };
                request.extensions_mut().insert(AuthFailure(reason));
            }
        }
    }
    next.run(request).await
}

fn check(request: &Request, allowed: Option<&[UserRole]>) -> Result<(), DomainError> {
    let Some(identity) = request.extensions().get::<Identity>() else {
        let reason = request
            .extensions()
            .get::<AuthFailure>()
            .map(|f| f.0.clone())
            .unwrap_or_else(|| "Authentication required".into());
        return Err(DomainError::Unauthorized(reason));
    };
    match allowed {
        Some(roles) => require_role(identity, roles),
        None => Ok(()),
    }
}

async fn guard(request: Request, next: Next, allowed: Option<&[UserRole]>) -> Response {
    match check(&request, allowed) {
        Ok(()) => next.run(request).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Any signed-in user.
pub async fn require_auth(request: Request, next: Next) -> Response {
    guard(request, next, None).await
}

/// Editors and admins.
pub async fn require_editor(request: Request, next: Next) -> Response {
    guard(request, next, Some(CONTENT_EDITORS)).await
}

pub async fn require_admin(request: Request, next: Next) -> Response {
    guard(request, next, Some(ADMINS_ONLY)).await
}

/// Key identifying the client for login throttling: the peer IP address, or
/// `local` when the server runs without connection info (tests).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "local".to_string());
        Ok(Self(key))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
