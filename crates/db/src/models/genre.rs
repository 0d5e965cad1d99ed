//! Genre entity model and DTOs.
//!
//! Genres link to categories through the `category_genre` junction table.
//! The linked categories are embedded in every genre payload, soft-deleted
//! categories included.

use catalog_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::category::Category;
use crate::associations::Association;
use crate::capabilities::{Filterable, Identifiable, SoftDeletable};
use crate::listing::{BindValue, Condition};

/// A genre row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Genre {
    /// Genre -> categories through `category_genre`.
    pub const CATEGORIES: Association<Category> = Association::new(
        "category_genre",
        "genres",
        "genre_id",
        "category_id",
        "categories_id",
    );
}

impl Identifiable for Genre {
    const TABLE: &'static str = "genres";
    const ENTITY: &'static str = "Genre";
    const COLUMNS: &'static str = "id, name, is_active, created_at, updated_at, deleted_at";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl SoftDeletable for Genre {}

impl Filterable for Genre {
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];
    const SORTABLE_COLUMNS: &'static [&'static str] = &["name", "is_active", "created_at"];

    type Filter = GenreFilter;

    fn filter_conditions(filter: &GenreFilter) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(active) = filter.is_active {
            conditions.push(Condition::Equals {
                column: "is_active",
                value: BindValue::Bool(active),
            });
        }
        if !filter.categories.is_empty() {
            conditions.push(Self::CATEGORIES.linked_to_any(&filter.categories));
        }
        conditions
    }
}

/// A genre enriched with its linked categories.
#[derive(Debug, Clone, Serialize)]
pub struct GenreWithCategories {
    #[serde(flatten)]
    pub genre: Genre,
    pub categories: Vec<Category>,
}

/// DTO for creating a new genre.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    /// Category ids to link. At least one is required.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub categories_id: Vec<EntityId>,
}

/// DTO for updating an existing genre.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGenre {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    /// If `Some`, replaces all category links. If `None`, leaves them unchanged.
    #[validate(length(min = 1))]
    pub categories_id: Option<Vec<EntityId>>,
}

/// Exact-match filters for genre listings.
#[derive(Debug, Clone, Default)]
pub struct GenreFilter {
    pub is_active: Option<bool>,
    /// Keep genres linked to any of these categories.
    pub categories: Vec<EntityId>,
}
