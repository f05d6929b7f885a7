//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::dto::{LoginResponse, UserInfo};
use crate::application::AuthService;
use crate::domain::{LoginDto, RegisterUserDto};
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub service: Arc<AuthService<UserRepository>>,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl AuthHandlerState {
    fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .http_only(true)
            .path("/")
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Empty, already expired session cookie
    fn cleared_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username or email already exists", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterUserDto>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .service
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Successful login; also sets the session cookie", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account", body = ApiResponse<String>)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginDto>,
) -> ApiResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let auth = state.service.login(&request.login, &request.password).await?;
    let jar = jar.add(state.session_cookie(auth.token.clone()));

    Ok((jar, Json(ApiResponse::success(auth.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session cookie cleared", body = ApiResponse<EmptyData>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<EmptyData>>) {
    tracing::info!(user_id = user.user_id, "User logged out");
    // emitted even when the request carried no cookie
    let jar = jar.add(state.cleared_cookie());

    (jar, Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists", body = ApiResponse<String>)
    )
)]
pub async fn profile(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UserInfo>>> {
    let user = state.service.profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}
