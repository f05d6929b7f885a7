//! Authentication middleware for Axum
//!
//! Accepts `Authorization: Bearer <jwt>` or the session cookie set by
//! `POST /api/v1/auth/login`. The header wins when both are present.
//! A valid token is only accepted while its account exists and is active.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::{debug, error};

use crate::domain::UserRepositoryInterface;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    AccountDisabled,
    Unavailable,
}

/// Token verification settings shared by every protected route
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub cookie_name: String,
    pub users: Arc<dyn UserRepositoryInterface>,
}

/// Caller identity, stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            username: claims.username,
        })
    }
}

fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn extract_token(request: &Request<Body>, cookie_name: &str) -> Option<String> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer)
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(cookie_name)
            .map(|cookie| cookie.value().to_string())
    })
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request, &auth_state.cookie_name) else {
        return auth_error_response(AuthError::MissingToken);
    };

    let user = verify_token(&token, &auth_state.jwt_config)
        .ok()
        .and_then(AuthenticatedUser::from_claims);

    let Some(user) = user else {
        return auth_error_response(AuthError::InvalidToken);
    };

    // soft-deleted accounts are not found
    match auth_state.users.find_by_id(user.user_id).await {
        Ok(Some(account)) if account.is_active => {
            debug!(user_id = user.user_id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(Some(_)) => {
            debug!(user_id = user.user_id, "Token of a disabled account rejected");
            auth_error_response(AuthError::AccountDisabled)
        }
        Ok(None) => auth_error_response(AuthError::InvalidToken),
        Err(e) => {
            error!(user_id = user.user_id, error = %e, "Failed to load the authenticated account");
            auth_error_response(AuthError::Unavailable)
        }
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            "Invalid or expired authentication token",
        ),
        AuthError::AccountDisabled => (StatusCode::UNAUTHORIZED, "Account is disabled"),
        AuthError::Unavailable => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}
