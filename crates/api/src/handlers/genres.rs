//! Handlers for the `/genres` resource.
//!
//! Genre payloads embed their categories, soft-deleted ones included.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::listing::Page;
use catalog_db::models::genre::{CreateGenre, GenreWithCategories, UpdateGenre};
use catalog_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, QueryParams, ValidatedJson};
use crate::query::GenreListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Genre";

/// GET /api/v1/genres
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<GenreListParams>,
) -> AppResult<Json<Page<GenreWithCategories>>> {
    let page = GenreRepo::list(&state.pool, &params.query(), &params.filter()).await?;
    Ok(Json(page))
}

/// GET /api/v1/genres/{id}
pub async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<GenreWithCategories>>> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: genre }))
}

/// POST /api/v1/genres
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<DataResponse<GenreWithCategories>>)> {
    let genre = GenreRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// PUT|PATCH /api/v1/genres/{id}
///
/// `categories_id`, when present, replaces the category set.
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateGenre>,
) -> AppResult<Json<DataResponse<GenreWithCategories>>> {
    let genre = GenreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: genre }))
}

/// DELETE /api/v1/genres/{id}
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    if GenreRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
