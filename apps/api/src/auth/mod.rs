//! Registration, login and request authentication.
//!
//! Tokens travel in the `auth-token` cookie (HttpOnly, SameSite=Strict) or an
//! `Authorization: Bearer` header. The cookie wins when both are present.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub mod handlers;
pub mod password;
pub mod token;

pub const AUTH_COOKIE: &str = "auth-token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Token lifetime of {0} days is out of range")]
    TokenLifetime(i64),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

/// The verified caller. Add it to a handler's arguments to require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = token::verify_token(&token, &state.config.jwt_secret).map_err(|e| {
            debug!("Rejected auth token: {e}");
            AppError::Unauthorized
        })?;
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// Cookie first, then bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

pub fn session_cookie(token: &str, ttl_days: i64, secure: bool) -> String {
    build_cookie(token, ttl_days.saturating_mul(24 * 60 * 60), secure)
}

pub fn expired_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
