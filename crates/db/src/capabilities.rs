//! Capability traits composed onto each entity row type.
//!
//! - [`Identifiable`]: UUID-keyed table metadata (table, columns, entity name).
//! - [`SoftDeletable`]: the table carries a `deleted_at` marker.
//! - [`Filterable`]: the table can be listed through
//!   [`crate::listing::list_page`] (search columns, sortable columns and
//!   entity-specific filter conditions).
//!
//! The free functions below implement the shared behaviour once, generic
//! over these traits; repositories call them with a concrete row type.

use catalog_core::types::EntityId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::listing::Condition;

/// A row type stored in a table keyed by a UUID `id` column.
pub trait Identifiable {
    /// Table holding the rows.
    const TABLE: &'static str;
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;
    /// Column list used for `SELECT` and `RETURNING`.
    const COLUMNS: &'static str;

    fn id(&self) -> EntityId;
}

/// Marker for tables with a nullable `deleted_at` column.
pub trait SoftDeletable: Identifiable {}

/// A soft-deletable row type that supports search/sort/paginate listings.
pub trait Filterable: SoftDeletable + for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Text columns matched case-insensitively by `search`.
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Columns accepted by `sort`.
    const SORTABLE_COLUMNS: &'static [&'static str];

    /// Entity-specific exact-match filters.
    type Filter;

    fn filter_conditions(filter: &Self::Filter) -> Vec<Condition>;
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a live (not soft-deleted) row by id.
pub async fn find_active<T>(
    conn: &mut PgConnection,
    id: EntityId,
) -> Result<Option<T>, sqlx::Error>
where
    T: SoftDeletable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = format!(
        "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
        T::COLUMNS,
        T::TABLE
    );
    sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Find a row by id, including soft-deleted rows.
pub async fn find_including_deleted<T>(
    conn: &mut PgConnection,
    id: EntityId,
) -> Result<Option<T>, sqlx::Error>
where
    T: Identifiable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Return which of `ids` exist in `T`'s table, soft-deleted rows included.
pub async fn existing_ids<T: Identifiable>(
    conn: &mut PgConnection,
    ids: &[EntityId],
) -> Result<Vec<EntityId>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let query = format!("SELECT id FROM {} WHERE id = ANY($1)", T::TABLE);
    sqlx::query_scalar::<_, EntityId>(&query)
        .bind(ids)
        .fetch_all(conn)
        .await
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

/// Soft-delete a row. Idempotent: an already-deleted row keeps its original
/// `deleted_at` and still counts as success.
///
/// Returns `false` only if no row with `id` exists at all.
pub async fn soft_delete<T: SoftDeletable>(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {} SET deleted_at = COALESCE(deleted_at, NOW()) WHERE id = $1",
        T::TABLE
    );
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    let found = result.rows_affected() > 0;
    if found {
        tracing::info!(entity = T::ENTITY, %id, "Soft-deleted");
    }
    Ok(found)
}

/// Clear the soft-delete marker. Returns `true` if a deleted row was restored.
pub async fn restore<T: SoftDeletable>(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {} SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        T::TABLE
    );
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
