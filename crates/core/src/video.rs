//! Video ratings, file references and the genre/category consistency rule.

use std::collections::{BTreeSet, HashSet};

use validator::ValidationError;

use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Age rating. Stored as its label (`"L"`, `"10"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    General,
    Ten,
    Twelve,
    Fourteen,
    Sixteen,
    Eighteen,
}

impl Rating {
    pub const ALL: [Rating; 6] = [
        Self::General,
        Self::Ten,
        Self::Twelve,
        Self::Fourteen,
        Self::Sixteen,
        Self::Eighteen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "L",
            Self::Ten => "10",
            Self::Twelve => "12",
            Self::Fourteen => "14",
            Self::Sixteen => "16",
            Self::Eighteen => "18",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

/// `validator` hook for the `rating` field.
pub fn validate_rating(value: &str) -> Result<(), ValidationError> {
    if Rating::parse(value).is_some() {
        return Ok(());
    }
    let allowed: Vec<&str> = Rating::ALL.iter().map(Rating::as_str).collect();
    let mut error = ValidationError::new("rating");
    error.message = Some(format!("must be one of: {}", allowed.join(", ")).into());
    Err(error)
}

// ---------------------------------------------------------------------------
// File references
// ---------------------------------------------------------------------------

/// The four file slots a video carries. Files are stored by an external
/// storage service under `<video id>/<file name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFile {
    Banner,
    Thumb,
    Trailer,
    Video,
}

/// Public URL of a stored video file, or `None` when no file is attached.
pub fn file_url(base_url: &str, video_id: EntityId, file_name: Option<&str>) -> Option<String> {
    let file_name = file_name.filter(|f| !f.is_empty())?;
    Some(format!(
        "{}/{video_id}/{file_name}",
        base_url.trim_end_matches('/')
    ))
}

// ---------------------------------------------------------------------------
// Genre / category consistency
// ---------------------------------------------------------------------------

/// Genres that are not linked to any of the chosen categories.
///
/// `links` are `(genre_id, category_id)` pairs for the requested genres.
/// Every requested genre must share at least one category with
/// `category_ids`; the offenders are returned sorted and deduplicated.
pub fn genres_without_category(
    genre_ids: &[EntityId],
    category_ids: &[EntityId],
    links: &[(EntityId, EntityId)],
) -> Vec<EntityId> {
    let categories: HashSet<EntityId> = category_ids.iter().copied().collect();
    let satisfied: HashSet<EntityId> = links
        .iter()
        .filter(|(_, category)| categories.contains(category))
        .map(|(genre, _)| *genre)
        .collect();

    genre_ids
        .iter()
        .copied()
        .filter(|genre| !satisfied.contains(genre))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
