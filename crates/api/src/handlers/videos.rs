//! Handlers for the `/videos` resource.
//!
//! Video payloads embed categories, genres and cast members, and expose
//! public URLs for the stored files.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::listing::Page;
use catalog_core::video::{file_url, VideoFile};
use catalog_db::models::video::{CreateVideo, UpdateVideo, VideoWithRelations};
use catalog_db::repositories::VideoRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, QueryParams, ValidatedJson};
use crate::query::VideoListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Video";

/// A video as returned by the API: stored row, relations and file URLs.
///
/// A URL is `null` when the corresponding file reference is unset.
#[derive(Debug, Serialize)]
pub struct VideoResource {
    #[serde(flatten)]
    pub video: VideoWithRelations,
    pub banner_file_url: Option<String>,
    pub thumb_file_url: Option<String>,
    pub trailer_file_url: Option<String>,
    pub video_file_url: Option<String>,
}

impl VideoResource {
    pub fn new(video: VideoWithRelations, storage_base_url: &str) -> Self {
        let url = |file| file_url(storage_base_url, video.video.id, video.video.file_name(file));
        let banner_file_url = url(VideoFile::Banner);
        let thumb_file_url = url(VideoFile::Thumb);
        let trailer_file_url = url(VideoFile::Trailer);
        let video_file_url = url(VideoFile::Video);
        Self {
            video,
            banner_file_url,
            thumb_file_url,
            trailer_file_url,
            video_file_url,
        }
    }
}

/// GET /api/v1/videos
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<VideoListParams>,
) -> AppResult<Json<Page<VideoResource>>> {
    let page = VideoRepo::list(&state.pool, &params.query(), &params.filter()).await?;
    let base = &state.config.storage_base_url;
    Ok(Json(page.map(|video| VideoResource::new(video, base))))
}

/// GET /api/v1/videos/{id}
pub async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<VideoResource>>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse {
        data: VideoResource::new(video, &state.config.storage_base_url),
    }))
}

/// POST /api/v1/videos
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateVideo>,
) -> AppResult<(StatusCode, Json<DataResponse<VideoResource>>)> {
    let video = VideoRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: VideoResource::new(video, &state.config.storage_base_url),
        }),
    ))
}

/// PUT|PATCH /api/v1/videos/{id}
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateVideo>,
) -> AppResult<Json<DataResponse<VideoResource>>> {
    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse {
        data: VideoResource::new(video, &state.config.storage_base_url),
    }))
}

/// DELETE /api/v1/videos/{id}
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    if VideoRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
