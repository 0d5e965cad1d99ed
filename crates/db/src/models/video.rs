//! Video entity model and DTOs.
//!
//! A video links to categories, genres and cast members. File columns hold
//! the names of files kept by the external storage service; the API turns
//! them into URLs.

use catalog_core::types::{EntityId, Timestamp};
use catalog_core::video::{validate_rating, VideoFile};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::cast_member::CastMember;
use super::category::Category;
use super::genre::Genre;
use crate::associations::Association;
use crate::capabilities::{Filterable, Identifiable, SoftDeletable};
use crate::listing::Condition;

/// A video row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    /// Duration in minutes.
    pub duration: i32,
    /// Stored [`Rating`](catalog_core::video::Rating) label.
    pub rating: String,
    pub opened: bool,
    pub banner_file: Option<String>,
    pub thumb_file: Option<String>,
    pub trailer_file: Option<String>,
    pub video_file: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Video {
    pub const CATEGORIES: Association<Category> = Association::new(
        "category_video",
        "videos",
        "video_id",
        "category_id",
        "categories_id",
    );

    pub const GENRES: Association<Genre> =
        Association::new("genre_video", "videos", "video_id", "genre_id", "genres_id");

    pub const CAST_MEMBERS: Association<CastMember> = Association::new(
        "cast_member_video",
        "videos",
        "video_id",
        "cast_member_id",
        "cast_members_id",
    );

    /// Stored file name for one of the file slots.
    pub fn file_name(&self, file: VideoFile) -> Option<&str> {
        match file {
            VideoFile::Banner => self.banner_file.as_deref(),
            VideoFile::Thumb => self.thumb_file.as_deref(),
            VideoFile::Trailer => self.trailer_file.as_deref(),
            VideoFile::Video => self.video_file.as_deref(),
        }
    }
}

impl Identifiable for Video {
    const TABLE: &'static str = "videos";
    const ENTITY: &'static str = "Video";
    const COLUMNS: &'static str = "id, title, description, year_launched, duration, rating, \
        opened, banner_file, thumb_file, trailer_file, video_file, \
        created_at, updated_at, deleted_at";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl SoftDeletable for Video {}

impl Filterable for Video {
    const SEARCH_COLUMNS: &'static [&'static str] = &["title"];
    const SORTABLE_COLUMNS: &'static [&'static str] = &[
        "title",
        "year_launched",
        "duration",
        "rating",
        "opened",
        "created_at",
    ];

    type Filter = VideoFilter;

    fn filter_conditions(filter: &VideoFilter) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if !filter.categories.is_empty() {
            conditions.push(Self::CATEGORIES.linked_to_any(&filter.categories));
        }
        if !filter.genres.is_empty() {
            conditions.push(Self::GENRES.linked_to_any(&filter.genres));
        }
        if !filter.cast_members.is_empty() {
            conditions.push(Self::CAST_MEMBERS.linked_to_any(&filter.cast_members));
        }
        conditions
    }
}

/// A video enriched with all of its relations.
#[derive(Debug, Clone, Serialize)]
pub struct VideoWithRelations {
    #[serde(flatten)]
    pub video: Video,
    pub categories: Vec<Category>,
    pub genres: Vec<Genre>,
    pub cast_members: Vec<CastMember>,
}

/// DTO for creating a new video.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideo {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 9999))]
    pub year_launched: i16,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub duration: i32,
    #[serde(default)]
    #[validate(custom(function = "validate_rating"))]
    pub rating: String,
    /// Defaults to `false` if omitted.
    pub opened: Option<bool>,
    #[validate(length(max = 255))]
    pub banner_file: Option<String>,
    #[validate(length(max = 255))]
    pub thumb_file: Option<String>,
    #[validate(length(max = 255))]
    pub trailer_file: Option<String>,
    #[validate(length(max = 255))]
    pub video_file: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub categories_id: Vec<EntityId>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub genres_id: Vec<EntityId>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub cast_members_id: Vec<EntityId>,
}

/// DTO for updating an existing video.
///
/// Relation fields, when present, replace the whole link set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVideo {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 9999))]
    pub year_launched: Option<i16>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    #[validate(custom(function = "validate_rating"))]
    pub rating: Option<String>,
    pub opened: Option<bool>,
    /// File references: `Some(None)` detaches the file.
    #[serde(default, deserialize_with = "super::present")]
    #[validate(length(max = 255))]
    pub banner_file: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::present")]
    #[validate(length(max = 255))]
    pub thumb_file: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::present")]
    #[validate(length(max = 255))]
    pub trailer_file: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::present")]
    #[validate(length(max = 255))]
    pub video_file: Option<Option<String>>,
    #[validate(length(min = 1))]
    pub categories_id: Option<Vec<EntityId>>,
    #[validate(length(min = 1))]
    pub genres_id: Option<Vec<EntityId>>,
    #[validate(length(min = 1))]
    pub cast_members_id: Option<Vec<EntityId>>,
}

/// Relation filters for video listings.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub categories: Vec<EntityId>,
    pub genres: Vec<EntityId>,
    pub cast_members: Vec<EntityId>,
}
