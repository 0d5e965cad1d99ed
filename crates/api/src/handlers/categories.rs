//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::listing::Page;
use catalog_db::models::category::{Category, CreateCategory, UpdateCategory};
use catalog_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, QueryParams, ValidatedJson};
use crate::query::CategoryListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Category";

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CategoryListParams>,
) -> AppResult<Json<Page<Category>>> {
    let page = CategoryRepo::list(&state.pool, &params.query(), &params.filter()).await?;
    Ok(Json(page))
}

/// GET /api/v1/categories/{id}
pub async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let category = CategoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT|PATCH /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Soft delete. Deleting an already-deleted category succeeds again.
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    if CategoryRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
