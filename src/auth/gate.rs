//! Authorization gate for protected routes.
//!
//! The gate only checks the header shape itself; whether the token is any
//! good is decided by the [`TokenVerifier`] held in application state. On
//! success the caller's [`Identity`] is stored in the request extensions,
//! where handlers pick it up as an extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::warn;

use crate::{error::AppError, state::AppState};

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("invalid Authorization header")]
    InvalidHeader,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("access token required")]
    WrongTokenKind,
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
}

/// Turns an `Authorization` header value into an identity.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, header: Option<&str>) -> Result<Identity, AuthError>;
}

/// Strips the exact `"Bearer "` prefix. Scheme matching is case-sensitive.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidHeader)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::InvalidHeader))
        .transpose()?;

    let identity = state.verifier.verify(header).map_err(|e| {
        warn!(error = %e, path = %request.uri().path(), "request rejected");
        e
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("not authenticated".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_header() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingHeader));
    }

    #[test]
    fn bearer_token_requires_exact_prefix() {
        for bad in ["", "Bearer", "bearer abc", "Basic abc", "Token abc", "Bearerabc"] {
            assert_eq!(
                bearer_token(Some(bad)),
                Err(AuthError::InvalidHeader),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn bearer_token_returns_remainder() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(bearer_token(Some("Bearer ")), Ok(""));
    }
}
