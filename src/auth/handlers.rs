use axum::extract::{FromRef, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::routing::{get, post};
use axum::{Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, ProfileResponse, PublicUser, RegisterRequest};
use crate::auth::extractors::AuthUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/test", get(|| async { "Api is working" }))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", get(logout))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are stored and looked up normalized, so "A@X.com" and "a@x.com"
/// are the same account.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!("token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.name = payload.name.trim().to_string();

    if payload.name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!("register with invalid email shape");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!("register with already registered email");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name, &user.email)?;
    let cookie = session_cookie(&token, keys.ttl.as_secs());

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            success: true,
            token,
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    payload.email = normalize_email(&payload.email);

    // Unknown email and wrong password answer identically so the endpoint
    // cannot be used to enumerate accounts.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!("login with unknown email");
            ApiError::Unauthorized("Invalid email or password".into())
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name, &user.email)?;
    let cookie = session_cookie(&token, keys.ttl.as_secs());

    info!(user_id = %user.id, "user logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            success: true,
            token,
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip_all)]
async fn profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    })
}

#[instrument(skip_all)]
async fn logout(AuthUser(user): AuthUser) -> impl axum::response::IntoResponse {
    info!(user_id = %user.id, "user logged out");
    (
        AppendHeaders([(SET_COOKIE, session_cookie("", 0))]),
        Json(serde_json::json!({ "success": true, "message": "Logged out" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@x.com"));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = session_cookie("", 0);
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }
}
