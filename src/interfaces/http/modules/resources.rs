//! Generic CRUD handlers
//!
//! The bodies live in the generic functions below. [`crud_endpoints!`]
//! stamps out a concrete, OpenAPI-documented handler set per resource that
//! delegates to them, plus the resource's router.

use axum::http::StatusCode;
use axum::Json;

use crate::application::CrudService;
use crate::domain::CrudRepository;
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData};
use crate::shared::{PageRequest, PageResponse};

pub async fn list<R: CrudRepository>(
    service: CrudService<R>,
    page: PageRequest,
) -> ApiResult<Json<ApiResponse<PageResponse<R::Record>>>> {
    let page = service.list(&page).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get<R: CrudRepository>(
    service: CrudService<R>,
    id: i32,
) -> ApiResult<Json<ApiResponse<R::Record>>> {
    let record = service.get(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn create<R: CrudRepository>(
    service: CrudService<R>,
    input: R::Create,
) -> ApiResult<(StatusCode, Json<ApiResponse<R::Record>>)> {
    let record = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

pub async fn update<R: CrudRepository>(
    service: CrudService<R>,
    id: i32,
    input: R::Update,
) -> ApiResult<Json<ApiResponse<R::Record>>> {
    let record = service.update(id, input).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn delete<R: CrudRepository>(
    service: CrudService<R>,
    id: i32,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Generates `list`, `get`, `create`, `update`, `delete` and `routes` for
/// one entity module under `crate::infrastructure::database::entities`.
macro_rules! crud_endpoints {
    (
        $module:ident {
            entity: $entity:ident,
            path: $path:literal,
            item_path: $item_path:literal,
            tag: $tag:literal,
            create: $create:ident,
            update: $update:ident,
            security: [$($security:tt)*] $(,)?
        }
    ) => {
        pub mod $module {
            use axum::extract::State;
            use axum::http::StatusCode;
            use axum::routing::get;
            use axum::{Json, Router};

            use super::*;
            use crate::application::CrudService;
            use crate::infrastructure::database::entities::$entity;
            use crate::infrastructure::database::repositories::SeaOrmRepository;
            use crate::interfaces::http::common::{
                ApiPath, ApiQuery, ApiResponse, ApiResult, EmptyData, ValidatedJson,
            };
            use crate::interfaces::http::modules::resources;
            use crate::shared::{PageRequest, PageResponse};

            pub type Service = CrudService<SeaOrmRepository<$entity::Entity>>;

            #[utoipa::path(
                get,
                path = $path,
                tag = $tag,
                params(PageRequest),
                security($($security)*),
                responses(
                    (status = 200, description = "One page of records", body = ApiResponse<PageResponse<$entity::Model>>),
                    (status = 400, description = "Unknown sort or search field", body = ApiResponse<String>)
                )
            )]
            pub async fn list(
                State(service): State<Service>,
                ApiQuery(page): ApiQuery<PageRequest>,
            ) -> ApiResult<Json<ApiResponse<PageResponse<$entity::Model>>>> {
                resources::list(service, page).await
            }

            #[utoipa::path(
                get,
                path = $item_path,
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                security($($security)*),
                responses(
                    (status = 200, description = "The record", body = ApiResponse<$entity::Model>),
                    (status = 404, description = "No such record", body = ApiResponse<String>)
                )
            )]
            pub async fn get_one(
                State(service): State<Service>,
                ApiPath(id): ApiPath<i32>,
            ) -> ApiResult<Json<ApiResponse<$entity::Model>>> {
                resources::get(service, id).await
            }

            #[utoipa::path(
                post,
                path = $path,
                tag = $tag,
                request_body = $create,
                security($($security)*),
                responses(
                    (status = 201, description = "Created", body = ApiResponse<$entity::Model>),
                    (status = 409, description = "Unique value already taken", body = ApiResponse<String>),
                    (status = 422, description = "Validation error", body = ApiResponse<String>)
                )
            )]
            pub async fn create(
                State(service): State<Service>,
                ValidatedJson(input): ValidatedJson<$create>,
            ) -> ApiResult<(StatusCode, Json<ApiResponse<$entity::Model>>)> {
                resources::create(service, input).await
            }

            #[utoipa::path(
                put,
                path = $item_path,
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                request_body = $update,
                security($($security)*),
                responses(
                    (status = 200, description = "Updated", body = ApiResponse<$entity::Model>),
                    (status = 404, description = "No such record", body = ApiResponse<String>),
                    (status = 422, description = "Validation error", body = ApiResponse<String>)
                )
            )]
            pub async fn update(
                State(service): State<Service>,
                ApiPath(id): ApiPath<i32>,
                ValidatedJson(input): ValidatedJson<$update>,
            ) -> ApiResult<Json<ApiResponse<$entity::Model>>> {
                resources::update(service, id, input).await
            }

            #[utoipa::path(
                delete,
                path = $item_path,
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                security($($security)*),
                responses(
                    (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
                    (status = 404, description = "No such record", body = ApiResponse<String>)
                )
            )]
            pub async fn delete(
                State(service): State<Service>,
                ApiPath(id): ApiPath<i32>,
            ) -> ApiResult<Json<ApiResponse<EmptyData>>> {
                resources::delete(service, id).await
            }

            /// Routes relative to the resource's mount point
            pub fn routes(service: Service) -> Router {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/{id}", get(get_one).put(update).delete(delete))
                    .with_state(service)
            }
        }
    };
}

pub(crate) use crud_endpoints;
