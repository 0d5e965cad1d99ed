//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - The capability impls ([`Identifiable`](crate::capabilities::Identifiable),
//!   [`SoftDeletable`](crate::capabilities::SoftDeletable),
//!   [`Filterable`](crate::capabilities::Filterable)) for that row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//! - A listing filter struct
//!
//! Nullable columns in update DTOs are `Option<Option<T>>`: the outer
//! `Option` says whether the field was sent, the inner one carries `null`.

use serde::{Deserialize, Deserializer};

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod video;

/// Deserialize a present field (including an explicit `null`) as `Some(_)`.
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
