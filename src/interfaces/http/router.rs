//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, CrudService};
use crate::domain::catalog::{
    ArtifactType, CreateArtifactDto, CreateArtifactSetDto, CreateNationDto, CreatePersonDto,
    CreateSpaceDto, CreateVersionDto, UpdateArtifactDto, UpdateArtifactSetDto, UpdateNationDto,
    UpdatePersonDto, UpdateSpaceDto, UpdateVersionDto,
};
use crate::domain::{CreateUserDto, LoginDto, RegisterUserDto, UpdateUserDto};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::entities::{
    artifact, artifact_set, nation, person, space, user, version,
};
use crate::infrastructure::database::repositories::{SeaOrmRepository, UserRepository};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::auth::{self, AuthHandlerState, LoginResponse, UserInfo};
use crate::interfaces::http::modules::catalog::{
    artifact_sets, artifacts, nations, persons, spaces, users, versions,
};
use crate::interfaces::http::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::shared::{PageRequest, SortOrder};

/// Everything the router needs to build its handler states
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// `/metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ApiContext {
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig) -> Self {
        Self {
            db,
            jwt_config,
            cookie_name: "token".to_string(),
            cookie_secure: false,
            metrics: None,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token; the session cookie works too"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::profile,
        // Persons
        persons::list,
        persons::get_one,
        persons::create,
        persons::update,
        persons::delete,
        // Nations
        nations::list,
        nations::get_one,
        nations::create,
        nations::update,
        nations::delete,
        // Versions
        versions::list,
        versions::get_one,
        versions::create,
        versions::update,
        versions::delete,
        // Artifact sets
        artifact_sets::list,
        artifact_sets::get_one,
        artifact_sets::create,
        artifact_sets::update,
        artifact_sets::delete,
        // Artifacts
        artifacts::list,
        artifacts::get_one,
        artifacts::create,
        artifacts::update,
        artifacts::delete,
        // Spaces
        spaces::list,
        spaces::get_one,
        spaces::create,
        spaces::update,
        spaces::delete,
        // Users
        users::list,
        users::get_one,
        users::create,
        users::update,
        users::delete,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            PageRequest,
            SortOrder,
            HealthResponse,
            ComponentHealth,
            RegisterUserDto,
            LoginDto,
            LoginResponse,
            UserInfo,
            CreateUserDto,
            UpdateUserDto,
            CreatePersonDto,
            UpdatePersonDto,
            CreateNationDto,
            UpdateNationDto,
            CreateVersionDto,
            UpdateVersionDto,
            CreateArtifactSetDto,
            UpdateArtifactSetDto,
            CreateArtifactDto,
            UpdateArtifactDto,
            ArtifactType,
            CreateSpaceDto,
            UpdateSpaceDto,
            person::Model,
            nation::Model,
            version::Model,
            artifact_set::Model,
            artifact::Model,
            space::Model,
            user::Model,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Register, login, logout and profile"),
        (name = "Persons", description = "Characters"),
        (name = "Nations", description = "Nations"),
        (name = "Versions", description = "Game versions"),
        (name = "Artifacts", description = "Artifact sets and their pieces"),
        (name = "Spaces", description = "User-owned spaces"),
        (name = "Users", description = "Account administration (authenticated)"),
    ),
    info(
        title = "toge-api",
        version = "0.1.0",
        description = "CRUD API with paging, sorting and keyword search"
    )
)]
pub struct ApiDoc;

fn crud<E>(db: &DatabaseConnection) -> CrudService<SeaOrmRepository<E>>
where
    SeaOrmRepository<E>: crate::domain::CrudRepository,
{
    CrudService::new(SeaOrmRepository::new(db.clone()))
}

/// Create the full API router
pub fn create_api_router(ctx: ApiContext) -> Router {
    let users = Arc::new(UserRepository::new(ctx.db.clone()));
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
        cookie_name: ctx.cookie_name.clone(),
        users: users.clone(),
    };
    let require_auth = middleware::from_fn_with_state(auth_state, auth_middleware);

    let auth_handler_state = AuthHandlerState {
        service: Arc::new(AuthService::new(users, ctx.jwt_config.clone())),
        cookie_name: ctx.cookie_name.clone(),
        cookie_secure: ctx.cookie_secure,
    };

    let auth_public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    let auth_private = Router::new()
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
        .route_layer(require_auth.clone());
    let auth_routes = auth_public
        .merge(auth_private)
        .with_state(auth_handler_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(health_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/persons", persons::routes(crud(&ctx.db)))
        .nest("/api/v1/nations", nations::routes(crud(&ctx.db)))
        .nest("/api/v1/versions", versions::routes(crud(&ctx.db)))
        .nest("/api/v1/artifact-sets", artifact_sets::routes(crud(&ctx.db)))
        .nest("/api/v1/artifacts", artifacts::routes(crud(&ctx.db)))
        .nest("/api/v1/spaces", spaces::routes(crud(&ctx.db)))
        .nest(
            "/api/v1/users",
            users::routes(crud(&ctx.db)).route_layer(require_auth),
        );

    if let Some(handle) = ctx.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use crate::infrastructure::database::test_support::migrated_db;

    async fn app() -> Router {
        let ctx = ApiContext::new(migrated_db().await, JwtConfig::new("router-test", 1));
        create_api_router(ctx)
    }

    async fn call(app: &Router, request: Request<Body>) -> Response<Body> {
        let mut svc = app.clone().into_service();
        svc.call(request).await.unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registers and logs in; returns the token and the `Set-Cookie` header
    async fn login(app: &Router) -> (String, String) {
        let register = json!({
            "username": "traveler",
            "email": "traveler@teyvat.io",
            "password": "password123"
        });
        let resp = call(app, json_request("POST", "/api/v1/auth/register", register)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let credentials = json!({"login": "traveler", "password": "password123"});
        let resp = call(app, json_request("POST", "/api/v1/auth/login", credentials)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let body = body_json(resp).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        (token, cookie)
    }

    #[tokio::test]
    async fn create_then_list_persons() {
        let app = app().await;

        for name in ["Amber", "Lisa", "Kaeya"] {
            let body = json!({"name": name, "age": 20});
            let resp = call(&app, json_request("POST", "/api/v1/persons", body)).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = call(
            &app,
            get_request("/api/v1/persons?page=1&page_size=2&sort_by=name&sort_order=asc"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total"], 3);
        let names: Vec<&str> = body["data"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Amber", "Kaeya"]);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_400_naming_the_field() {
        let app = app().await;
        let resp = call(&app, get_request("/api/v1/persons?sort_by=favourite_food")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("favourite_food"));
    }

    #[tokio::test]
    async fn extreme_paging_values_return_an_empty_page() {
        let app = app().await;
        call(&app, json_request("POST", "/api/v1/nations", json!({"name": "Mondstadt"}))).await;

        let resp = call(&app, get_request("/api/v1/nations?page=9223372036854775807")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["data"], json!([]));
        assert_eq!(body["data"]["total"], 1);

        let uri = "/api/v1/persons?page=100000000000000000&page_size=9223372036854775807";
        let resp = call(&app, get_request(uri)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["page_size"], 100);
        assert_eq!(body["data"]["data"], json!([]));
    }

    #[tokio::test]
    async fn malformed_page_or_id_gets_the_json_envelope() {
        let app = app().await;

        let resp = call(&app, get_request("/api/v1/persons?page=abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);

        let resp = call(&app, get_request("/api/v1/persons/abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[tokio::test]
    async fn missing_record_is_404() {
        let app = app().await;
        let resp = call(&app, get_request("/api/v1/nations/999")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_body_is_422() {
        let app = app().await;
        let resp = call(&app, json_request("POST", "/api/v1/persons", json!({"name": "", "age": 20}))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deleted_record_disappears() {
        let app = app().await;
        let resp = call(&app, json_request("POST", "/api/v1/versions", json!({"name": "4.0"}))).await;
        let id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/v1/versions/{id}");
        let delete = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(&app, delete).await.status(), StatusCode::OK);
        assert_eq!(call(&app, get_request(&uri)).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_require_authentication() {
        let app = app().await;
        let resp = call(&app, get_request("/api/v1/users")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let (token, _) = login(&app).await;
        let request = Request::builder()
            .uri("/api/v1/users")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = call(&app, request).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["total"], 1);
        assert!(body["data"]["data"][0].get("password_hash").is_none());
    }

    fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn own_id(app: &Router, token: &str) -> i64 {
        let resp = call(app, authed("GET", "/api/v1/users", token, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await["data"]["data"][0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn disabled_account_token_is_rejected() {
        let app = app().await;
        let (token, _) = login(&app).await;
        let id = own_id(&app, &token).await;

        let disable = authed(
            "PUT",
            &format!("/api/v1/users/{id}"),
            &token,
            Some(json!({"is_active": false})),
        );
        assert_eq!(call(&app, disable).await.status(), StatusCode::OK);

        let resp = call(&app, authed("GET", "/api/v1/auth/profile", &token, None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"], "Account is disabled");
    }

    #[tokio::test]
    async fn deleted_account_token_is_rejected() {
        let app = app().await;
        let (token, _) = login(&app).await;
        let id = own_id(&app, &token).await;

        let delete = authed("DELETE", &format!("/api/v1/users/{id}"), &token, None);
        assert_eq!(call(&app, delete).await.status(), StatusCode::OK);

        let resp = call(&app, authed("GET", "/api/v1/users", &token, None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[tokio::test]
    async fn login_sets_an_http_only_session_cookie() {
        let app = app().await;
        let (_, cookie) = login(&app).await;
        assert!(cookie.starts_with("token="), "{cookie}");
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
    }

    #[tokio::test]
    async fn profile_accepts_bearer_or_cookie() {
        let app = app().await;
        let (token, cookie) = login(&app).await;

        let by_bearer = Request::builder()
            .uri("/api/v1/auth/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = call(&app, by_bearer).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["username"], "traveler");

        let pair = cookie.split(';').next().unwrap().to_string();
        let by_cookie = Request::builder()
            .uri("/api/v1/auth/profile")
            .header(header::COOKIE, pair)
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(&app, by_cookie).await.status(), StatusCode::OK);

        let anonymous = get_request("/api/v1/auth/profile");
        assert_eq!(call(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = app().await;
        login(&app).await;

        let credentials = json!({"login": "traveler", "password": "not-the-password"});
        let resp = call(&app, json_request("POST", "/api/v1/auth/login", credentials)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        let app = app().await;
        let (token, _) = login(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = call(&app, request).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cleared = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cleared.starts_with("token=;"), "{cleared}");
        assert!(cleared.contains("Max-Age=0"), "{cleared}");
    }

    #[tokio::test]
    async fn logout_by_cookie_expires_that_cookie() {
        let app = app().await;
        let (_, cookie) = login(&app).await;
        let pair = cookie.split(';').next().unwrap().to_string();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/logout")
            .header(header::COOKIE, pair)
            .body(Body::empty())
            .unwrap();
        let resp = call(&app, request).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cleared: Vec<&str> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert_eq!(cleared.len(), 1, "{cleared:?}");
        assert!(cleared[0].starts_with("token=;"), "{}", cleared[0]);
        assert!(cleared[0].contains("Max-Age=0"), "{}", cleared[0]);
    }

    #[tokio::test]
    async fn health_reports_database_ok() {
        let app = app().await;
        let resp = call(&app, get_request("/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app().await;
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = call(&app, request).await;
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");

        let resp = call(&app, get_request("/health")).await;
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/persons",
            "/api/v1/nations/{id}",
            "/api/v1/artifact-sets",
            "/api/v1/users/{id}",
            "/api/v1/auth/login",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
