//! Axum route handlers for the Auth API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::auth::{expired_cookie, session_cookie, AuthUser};
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

const MIN_PASSWORD_CHARS: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Registration input after validation and normalization.
#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(request: RegisterRequest) -> Result<NewUser, AppError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(name), Some(email), Some(password)) = (
        non_empty(request.name),
        non_empty(request.email),
        non_empty(request.password),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }

    Ok(NewUser {
        name: name.trim().to_string(),
        email: normalize_email(&email),
        password,
    })
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=3b82f6&color=fff",
        urlencoding::encode(name)
    )
}

fn duplicate_email() -> AppError {
    AppError::Conflict("User already exists with this email".to_string())
}

/// A concurrent registration can pass the existence check and still lose on
/// the `users.email` unique constraint.
fn user_insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => duplicate_email(),
        _ => AppError::Database(e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = validate_registration(request)?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&new_user.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(duplicate_email());
    }

    let password = new_user.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash, avatar)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&password_hash)
    .bind(avatar_url(&new_user.name))
    .fetch_one(&state.db)
    .await
    .map_err(user_insert_error)?;

    info!(user_id = %user.id, "Registered new user");

    let token = issue_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;
    let cookie = session_cookie(
        &token,
        state.config.token_ttl_days,
        state.config.secure_cookies,
    );

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            user: UserProfile::from(&user),
            token,
            message: Some("Account created successfully".to_string()),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(normalize_email(&email))
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    sqlx::query("UPDATE users SET last_login = $1, updated_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(user.id)
        .execute(&state.db)
        .await?;

    info!(user_id = %user.id, "User logged in");

    let token = issue_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;
    let cookie = session_cookie(
        &token,
        state.config.token_ttl_days,
        state.config.secure_cookies,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            user: UserProfile::from(&user),
            token,
            message: None,
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Stateless tokens cannot be revoked; this only clears the cookie.
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, expired_cookie(state.config.secure_cookies))],
        Json(serde_json::json!({ "success": true, "message": "Logged out" })),
    )
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(auth.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}
