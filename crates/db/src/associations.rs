//! Many-to-many association manager.
//!
//! An [`Association`] describes one junction table from the owner's side.
//! Relation traversal is `withTrashed`: soft-deleted peers are still
//! returned, and still accepted as sync targets. Only ids that never existed
//! are rejected.

use std::collections::HashMap;
use std::marker::PhantomData;

use catalog_core::association::{diff, missing_ids, SyncChanges};
use catalog_core::error::CoreError;
use catalog_core::types::EntityId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::capabilities::{existing_ids, Identifiable};
use crate::error::DbError;
use crate::listing::Condition;

/// A junction table linking owner rows to related rows of type `R`.
#[derive(Debug)]
pub struct Association<R> {
    /// Junction table name.
    pub junction: &'static str,
    /// Table of the owning entity (locked during sync).
    pub owner_table: &'static str,
    /// Junction column referencing the owner.
    pub owner_column: &'static str,
    /// Junction column referencing the related row.
    pub related_column: &'static str,
    /// Request field carrying the related ids, used in error messages.
    pub field: &'static str,
    related: PhantomData<fn() -> R>,
}

impl<R> Association<R> {
    pub const fn new(
        junction: &'static str,
        owner_table: &'static str,
        owner_column: &'static str,
        related_column: &'static str,
        field: &'static str,
    ) -> Self {
        Self {
            junction,
            owner_table,
            owner_column,
            related_column,
            field,
            related: PhantomData,
        }
    }

    /// Listing filter: owner is linked to any of `ids`.
    pub fn linked_to_any(&self, ids: &[EntityId]) -> Condition {
        Condition::RelatedToAny {
            junction: self.junction,
            owner_column: self.owner_column,
            related_column: self.related_column,
            ids: ids.to_vec(),
        }
    }
}

/// Fail with [`CoreError::UnknownRelation`] if any of `ids` does not exist in
/// `R`'s table. Soft-deleted rows count as existing.
pub async fn ensure_exist<R: Identifiable>(
    conn: &mut PgConnection,
    association: &Association<R>,
    ids: &[EntityId],
) -> Result<(), DbError> {
    let known = existing_ids::<R>(conn, ids).await?;
    let missing = missing_ids(ids, &known);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::UnknownRelation {
            field: association.field,
            ids: missing,
        }
        .into())
    }
}

/// Ids currently linked to `owner_id`.
pub async fn related_ids<R>(
    conn: &mut PgConnection,
    association: &Association<R>,
    owner_id: EntityId,
) -> Result<Vec<EntityId>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        association.related_column, association.junction, association.owner_column
    );
    sqlx::query_scalar::<_, EntityId>(&query)
        .bind(owner_id)
        .fetch_all(conn)
        .await
}

/// Replace the owner's relation set with `desired`.
///
/// Must run inside the caller's transaction. The owner row is locked first
/// so concurrent syncs of the same owner serialize; only the difference
/// between the current and desired sets is written.
pub async fn sync<R: Identifiable>(
    conn: &mut PgConnection,
    association: &Association<R>,
    owner_id: EntityId,
    desired: &[EntityId],
) -> Result<SyncChanges, DbError> {
    ensure_exist(&mut *conn, association, desired).await?;

    let lock = format!(
        "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
        association.owner_table
    );
    sqlx::query(&lock).bind(owner_id).execute(&mut *conn).await?;

    let current = related_ids(&mut *conn, association, owner_id).await?;
    let changes = diff(&current, desired);

    if !changes.detached.is_empty() {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = ANY($2)",
            association.junction, association.owner_column, association.related_column
        );
        sqlx::query(&query)
            .bind(owner_id)
            .bind(&changes.detached[..])
            .execute(&mut *conn)
            .await?;
    }

    if !changes.attached.is_empty() {
        let query = format!(
            "INSERT INTO {} ({}, {}) SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
            association.junction, association.owner_column, association.related_column
        );
        sqlx::query(&query)
            .bind(owner_id)
            .bind(&changes.attached[..])
            .execute(&mut *conn)
            .await?;
    }

    tracing::debug!(
        junction = association.junction,
        %owner_id,
        attached = changes.attached.len(),
        detached = changes.detached.len(),
        "Synced association"
    );
    Ok(changes)
}

/// Sync inside a fresh transaction.
pub async fn sync_in_transaction<R: Identifiable>(
    pool: &PgPool,
    association: &Association<R>,
    owner_id: EntityId,
    desired: &[EntityId],
) -> Result<SyncChanges, DbError> {
    let mut tx = pool.begin().await?;
    let changes = sync(&mut tx, association, owner_id, desired).await?;
    tx.commit().await?;
    Ok(changes)
}

/// Related rows for one owner, soft-deleted peers included.
pub async fn fetch_related<R>(
    conn: &mut PgConnection,
    association: &Association<R>,
    owner_id: EntityId,
) -> Result<Vec<R>, sqlx::Error>
where
    R: Identifiable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = format!(
        "SELECT {} FROM {} WHERE id IN (SELECT {} FROM {} WHERE {} = $1) \
         ORDER BY created_at, id",
        R::COLUMNS,
        R::TABLE,
        association.related_column,
        association.junction,
        association.owner_column
    );
    sqlx::query_as::<_, R>(&query)
        .bind(owner_id)
        .fetch_all(conn)
        .await
}

/// Related rows for many owners at once (two queries regardless of the
/// number of owners). Owners without links map to an empty list.
pub async fn fetch_related_for_many<R>(
    conn: &mut PgConnection,
    association: &Association<R>,
    owner_ids: &[EntityId],
) -> Result<HashMap<EntityId, Vec<R>>, sqlx::Error>
where
    R: Identifiable + Clone + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut grouped: HashMap<EntityId, Vec<R>> =
        owner_ids.iter().map(|id| (*id, Vec::new())).collect();
    if owner_ids.is_empty() {
        return Ok(grouped);
    }

    let links_query = format!(
        "SELECT {}, {} FROM {} WHERE {} = ANY($1)",
        association.owner_column,
        association.related_column,
        association.junction,
        association.owner_column
    );
    let links: Vec<(EntityId, EntityId)> = sqlx::query_as(&links_query)
        .bind(owner_ids)
        .fetch_all(&mut *conn)
        .await?;
    if links.is_empty() {
        return Ok(grouped);
    }

    let mut related: Vec<EntityId> = links.iter().map(|(_, r)| *r).collect();
    related.sort_unstable();
    related.dedup();

    let rows_query = format!(
        "SELECT {} FROM {} WHERE id = ANY($1) ORDER BY created_at, id",
        R::COLUMNS,
        R::TABLE
    );
    let rows: Vec<R> = sqlx::query_as::<_, R>(&rows_query)
        .bind(&related[..])
        .fetch_all(&mut *conn)
        .await?;

    // Position in `rows` keeps each owner's list in (created_at, id) order.
    let position: HashMap<EntityId, usize> =
        rows.iter().enumerate().map(|(i, r)| (r.id(), i)).collect();

    let mut positions: HashMap<EntityId, Vec<usize>> = HashMap::new();
    for (owner, related_id) in links {
        if let Some(&pos) = position.get(&related_id) {
            positions.entry(owner).or_default().push(pos);
        }
    }
    for (owner, mut indexes) in positions {
        indexes.sort_unstable();
        grouped.insert(owner, indexes.into_iter().map(|i| rows[i].clone()).collect());
    }

    Ok(grouped)
}
