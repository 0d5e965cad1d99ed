//! Cast member entity model and DTOs.

use catalog_core::cast_member::{validate_cast_member_type, CastMemberType};
use catalog_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::capabilities::{Filterable, Identifiable, SoftDeletable};
use crate::listing::{BindValue, Condition};

/// A cast member row from the `cast_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastMember {
    pub id: EntityId,
    pub name: String,
    /// Stored [`CastMemberType`] value.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub member_type: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Identifiable for CastMember {
    const TABLE: &'static str = "cast_members";
    const ENTITY: &'static str = "CastMember";
    const COLUMNS: &'static str = "id, name, type, created_at, updated_at, deleted_at";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl SoftDeletable for CastMember {}

impl Filterable for CastMember {
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];
    const SORTABLE_COLUMNS: &'static [&'static str] = &["name", "type", "created_at"];

    type Filter = CastMemberFilter;

    fn filter_conditions(filter: &CastMemberFilter) -> Vec<Condition> {
        filter
            .member_type
            .map(|member_type| Condition::Equals {
                column: "type",
                value: BindValue::SmallInt(member_type.id()),
            })
            .into_iter()
            .collect()
    }
}

/// DTO for creating a new cast member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCastMember {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// 1 = director, 2 = actor.
    #[serde(default)]
    #[validate(custom(function = "validate_cast_member_type"))]
    pub r#type: i16,
}

/// DTO for updating an existing cast member. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCastMember {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_cast_member_type"))]
    pub r#type: Option<i16>,
}

/// Exact-match filters for cast member listings.
#[derive(Debug, Clone, Default)]
pub struct CastMemberFilter {
    pub member_type: Option<CastMemberType>,
}
