//! Query and path extractors that reject with the JSON envelope
//!
//! `ApiQuery<T>` and `ApiPath<T>` behave like `axum::extract::Query` and
//! `axum::extract::Path`, but a malformed `?page=abc` or `/persons/abc`
//! answers `{"success": false, "error": ...}` instead of plain text.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiResponse;

pub struct ApiQuery<T>(pub T);

pub struct ApiPath<T>(pub T);

/// Keeps axum's status code, swaps the body for the envelope
pub struct ExtractRejection {
    status: StatusCode,
    message: String,
}

impl From<QueryRejection> for ExtractRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ExtractRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ExtractRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message);
        (self.status, Json(body)).into_response()
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::Service;

    use crate::shared::PageRequest;

    async fn page_of(ApiQuery(page): ApiQuery<PageRequest>) -> String {
        page.page().to_string()
    }

    async fn id_of(ApiPath(id): ApiPath<i32>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/items", get(page_of))
            .route("/items/{id}", get(id_of))
    }

    async fn send(uri: &str) -> Response<Body> {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().into_service().call(req).await.unwrap()
    }

    async fn envelope(resp: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn well_formed_values_pass_through() {
        assert_eq!(send("/items?page=4").await.status(), StatusCode::OK);
        assert_eq!(send("/items/7").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_query_is_a_json_400() {
        let resp = send("/items?page=abc").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = envelope(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().to_lowercase().contains("query"));
    }

    #[tokio::test]
    async fn malformed_path_is_a_json_400() {
        let resp = send("/items/abc").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(resp).await["success"], false);
    }
}
