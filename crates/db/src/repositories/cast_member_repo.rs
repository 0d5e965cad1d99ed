//! Repository for the `cast_members` table.

use catalog_core::listing::{ListQuery, Page};
use catalog_core::types::{new_id, EntityId};
use sqlx::PgPool;

use crate::capabilities::{self, Identifiable};
use crate::listing::list_page;
use crate::models::cast_member::{
    CastMember, CastMemberFilter, CreateCastMember, UpdateCastMember,
};

const COLUMNS: &str = <CastMember as Identifiable>::COLUMNS;

/// Provides CRUD operations for cast members.
pub struct CastMemberRepo;

impl CastMemberRepo {
    /// Insert a new cast member, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCastMember,
    ) -> Result<CastMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO cast_members (id, name, type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, CastMember>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(input.r#type)
            .fetch_one(pool)
            .await?;
        tracing::info!(id = %member.id, "Cast member created");
        Ok(member)
    }

    /// Find a cast member by id. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<CastMember>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        capabilities::find_active(&mut conn, id).await
    }

    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filter: &CastMemberFilter,
    ) -> Result<Page<CastMember>, sqlx::Error> {
        list_page::<CastMember>(pool, query, filter).await
    }

    /// Update a cast member. Returns `None` if no live row matches `id`.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateCastMember,
    ) -> Result<Option<CastMember>, sqlx::Error> {
        let query = format!(
            "UPDATE cast_members SET
                name = COALESCE($2, name),
                type = COALESCE($3, type),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.r#type)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::soft_delete::<CastMember>(pool, id).await
    }

    pub async fn restore(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::restore::<CastMember>(pool, id).await
    }
}
