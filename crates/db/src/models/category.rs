//! Category entity model and DTOs.

use catalog_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::capabilities::{Filterable, Identifiable, SoftDeletable};
use crate::listing::{BindValue, Condition};

/// A category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Identifiable for Category {
    const TABLE: &'static str = "categories";
    const ENTITY: &'static str = "Category";
    const COLUMNS: &'static str =
        "id, name, description, is_active, created_at, updated_at, deleted_at";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl SoftDeletable for Category {}

impl Filterable for Category {
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];
    const SORTABLE_COLUMNS: &'static [&'static str] = &["name", "is_active", "created_at"];

    type Filter = CategoryFilter;

    fn filter_conditions(filter: &CategoryFilter) -> Vec<Condition> {
        filter
            .is_active
            .map(|active| Condition::Equals {
                column: "is_active",
                value: BindValue::Bool(active),
            })
            .into_iter()
            .collect()
    }
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "super::present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Exact-match filters for category listings.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub is_active: Option<bool>,
}
