//! Repository for the `genres` table and its category links.

use catalog_core::listing::{ListQuery, Page};
use catalog_core::types::{new_id, EntityId};
use sqlx::{PgConnection, PgPool};

use crate::associations::{fetch_related, fetch_related_for_many, sync};
use crate::capabilities::{self, Identifiable};
use crate::error::DbError;
use crate::listing::list_page;
use crate::models::genre::{CreateGenre, Genre, GenreFilter, GenreWithCategories, UpdateGenre};

const COLUMNS: &str = <Genre as Identifiable>::COLUMNS;

/// Provides CRUD operations for genres. Writes keep the genre row and its
/// category links consistent in one transaction.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a genre and link it to `input.categories_id`.
    ///
    /// Fails with `UnknownRelation` (and inserts nothing) if any category id
    /// never existed.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<GenreWithCategories, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO genres (id, name, is_active)
             VALUES ($1, $2, COALESCE($3, true))
             RETURNING {COLUMNS}"
        );
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        sync(&mut tx, &Genre::CATEGORIES, genre.id, &input.categories_id).await?;
        let result = Self::with_categories(&mut tx, genre).await?;

        tx.commit().await?;
        tracing::info!(id = %result.genre.id, "Genre created");
        Ok(result)
    }

    /// Find a live genre by id together with its categories.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<GenreWithCategories>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        match capabilities::find_active::<Genre>(&mut conn, id).await? {
            Some(genre) => Ok(Some(Self::with_categories(&mut conn, genre).await?)),
            None => Ok(None),
        }
    }

    /// Search, filter, sort and paginate live genres. Categories for the
    /// whole page are loaded in one batch.
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filter: &GenreFilter,
    ) -> Result<Page<GenreWithCategories>, sqlx::Error> {
        let page = list_page::<Genre>(pool, query, filter).await?;

        let ids: Vec<EntityId> = page.data.iter().map(|g| g.id).collect();
        let mut conn = pool.acquire().await?;
        let mut categories = fetch_related_for_many(&mut conn, &Genre::CATEGORIES, &ids).await?;

        Ok(page.map(|genre| GenreWithCategories {
            categories: categories.remove(&genre.id).unwrap_or_default(),
            genre,
        }))
    }

    /// Update a genre. When `categories_id` is present the link set is
    /// replaced; otherwise links are left untouched.
    ///
    /// Returns `None` if no live genre with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateGenre,
    ) -> Result<Option<GenreWithCategories>, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE genres SET
                name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(genre) = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(categories_id) = &input.categories_id {
            sync(&mut tx, &Genre::CATEGORIES, genre.id, categories_id).await?;
        }
        let result = Self::with_categories(&mut tx, genre).await?;

        tx.commit().await?;
        Ok(Some(result))
    }

    /// Soft-delete a genre. Category links are kept.
    pub async fn soft_delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::soft_delete::<Genre>(pool, id).await
    }

    pub async fn restore(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::restore::<Genre>(pool, id).await
    }

    async fn with_categories(
        conn: &mut PgConnection,
        genre: Genre,
    ) -> Result<GenreWithCategories, sqlx::Error> {
        let categories = fetch_related(conn, &Genre::CATEGORIES, genre.id).await?;
        Ok(GenreWithCategories { genre, categories })
    }
}
