//! Repository for the `categories` table.

use catalog_core::listing::{ListQuery, Page};
use catalog_core::types::{new_id, EntityId};
use sqlx::PgPool;

use crate::capabilities::{self, Identifiable};
use crate::listing::list_page;
use crate::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = <Category as Identifiable>::COLUMNS;

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// If `is_active` is `None` in the input, defaults to `true`.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (id, name, description, is_active)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await?;
        tracing::info!(id = %category.id, "Category created");
        Ok(category)
    }

    /// Find a category by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Category>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        capabilities::find_active(&mut conn, id).await
    }

    /// Find a category by id, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        capabilities::find_including_deleted(&mut conn, id).await
    }

    /// Search, filter, sort and paginate live categories.
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filter: &CategoryFilter,
    ) -> Result<Page<Category>, sqlx::Error> {
        list_page::<Category>(pool, query, filter).await
    }

    /// Update a category. Only fields present in `input` are applied;
    /// `description: Some(None)` clears the description.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a category. Returns `false` only if the id is unknown.
    pub async fn soft_delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::soft_delete::<Category>(pool, id).await
    }

    /// Restore a soft-deleted category. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::restore::<Category>(pool, id).await
    }
}
