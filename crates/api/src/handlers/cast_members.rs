//! Handlers for the `/cast_members` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::listing::Page;
use catalog_db::models::cast_member::{CastMember, CreateCastMember, UpdateCastMember};
use catalog_db::repositories::CastMemberRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, QueryParams, ValidatedJson};
use crate::query::CastMemberListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "CastMember";

/// GET /api/v1/cast_members
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CastMemberListParams>,
) -> AppResult<Json<Page<CastMember>>> {
    let page = CastMemberRepo::list(&state.pool, &params.query(), &params.filter()).await?;
    Ok(Json(page))
}

/// GET /api/v1/cast_members/{id}
pub async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<CastMember>>> {
    let member = CastMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: member }))
}

/// POST /api/v1/cast_members
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCastMember>,
) -> AppResult<(StatusCode, Json<DataResponse<CastMember>>)> {
    let member = CastMemberRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT|PATCH /api/v1/cast_members/{id}
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCastMember>,
) -> AppResult<Json<DataResponse<CastMember>>> {
    let member = CastMemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/cast_members/{id}
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    if CastMemberRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
