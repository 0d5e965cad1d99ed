//! Repository for the `videos` table and its three relation sets.

use catalog_core::error::{format_ids, CoreError};
use catalog_core::listing::{ListQuery, Page};
use catalog_core::types::{new_id, EntityId};
use catalog_core::video::genres_without_category;
use sqlx::{PgConnection, PgPool};

use crate::associations::{fetch_related, fetch_related_for_many, related_ids, sync};
use crate::capabilities::{self, Identifiable};
use crate::error::DbError;
use crate::listing::list_page;
use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoFilter, VideoWithRelations};

const COLUMNS: &str = <Video as Identifiable>::COLUMNS;

/// Provides CRUD operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video and link its categories, genres and cast members.
    ///
    /// All-or-nothing: an unknown relation id, or a genre that belongs to
    /// none of the chosen categories, rolls back the whole insert.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<VideoWithRelations, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos
                (id, title, description, year_launched, duration, rating, opened,
                 banner_file, thumb_file, trailer_file, video_file)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, false), $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(new_id())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.duration)
            .bind(&input.rating)
            .bind(input.opened)
            .bind(&input.banner_file)
            .bind(&input.thumb_file)
            .bind(&input.trailer_file)
            .bind(&input.video_file)
            .fetch_one(&mut *tx)
            .await?;

        sync(&mut tx, &Video::CATEGORIES, video.id, &input.categories_id).await?;
        sync(&mut tx, &Video::GENRES, video.id, &input.genres_id).await?;
        sync(&mut tx, &Video::CAST_MEMBERS, video.id, &input.cast_members_id).await?;
        ensure_genres_match_categories(&mut tx, &input.genres_id, &input.categories_id).await?;

        let result = Self::with_relations(&mut tx, video).await?;
        tx.commit().await?;
        tracing::info!(id = %result.video.id, "Video created");
        Ok(result)
    }

    /// Find a live video by id together with all of its relations.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<VideoWithRelations>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        match capabilities::find_active::<Video>(&mut conn, id).await? {
            Some(video) => Ok(Some(Self::with_relations(&mut conn, video).await?)),
            None => Ok(None),
        }
    }

    /// Search, filter, sort and paginate live videos. Relations for the
    /// whole page are loaded in batches.
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filter: &VideoFilter,
    ) -> Result<Page<VideoWithRelations>, sqlx::Error> {
        let page = list_page::<Video>(pool, query, filter).await?;

        let ids: Vec<EntityId> = page.data.iter().map(|v| v.id).collect();
        let mut conn = pool.acquire().await?;
        let mut categories = fetch_related_for_many(&mut conn, &Video::CATEGORIES, &ids).await?;
        let mut genres = fetch_related_for_many(&mut conn, &Video::GENRES, &ids).await?;
        let mut cast_members =
            fetch_related_for_many(&mut conn, &Video::CAST_MEMBERS, &ids).await?;

        Ok(page.map(|video| VideoWithRelations {
            categories: categories.remove(&video.id).unwrap_or_default(),
            genres: genres.remove(&video.id).unwrap_or_default(),
            cast_members: cast_members.remove(&video.id).unwrap_or_default(),
            video,
        }))
    }

    /// Update a video. Each relation field that is present replaces its
    /// link set; absent ones are left untouched. The genre/category rule is
    /// checked against the resulting sets whenever either side changes.
    ///
    /// Returns `None` if no live video with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateVideo,
    ) -> Result<Option<VideoWithRelations>, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                year_launched = COALESCE($4, year_launched),
                duration = COALESCE($5, duration),
                rating = COALESCE($6, rating),
                opened = COALESCE($7, opened),
                banner_file = CASE WHEN $8 THEN $9 ELSE banner_file END,
                thumb_file = CASE WHEN $10 THEN $11 ELSE thumb_file END,
                trailer_file = CASE WHEN $12 THEN $13 ELSE trailer_file END,
                video_file = CASE WHEN $14 THEN $15 ELSE video_file END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(video) = sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.duration)
            .bind(&input.rating)
            .bind(input.opened)
            .bind(input.banner_file.is_some())
            .bind(file_value(&input.banner_file))
            .bind(input.thumb_file.is_some())
            .bind(file_value(&input.thumb_file))
            .bind(input.trailer_file.is_some())
            .bind(file_value(&input.trailer_file))
            .bind(input.video_file.is_some())
            .bind(file_value(&input.video_file))
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.categories_id {
            sync(&mut tx, &Video::CATEGORIES, video.id, ids).await?;
        }
        if let Some(ids) = &input.genres_id {
            sync(&mut tx, &Video::GENRES, video.id, ids).await?;
        }
        if let Some(ids) = &input.cast_members_id {
            sync(&mut tx, &Video::CAST_MEMBERS, video.id, ids).await?;
        }

        if input.categories_id.is_some() || input.genres_id.is_some() {
            let categories = related_ids(&mut tx, &Video::CATEGORIES, video.id).await?;
            let genres = related_ids(&mut tx, &Video::GENRES, video.id).await?;
            ensure_genres_match_categories(&mut tx, &genres, &categories).await?;
        }

        let result = Self::with_relations(&mut tx, video).await?;
        tx.commit().await?;
        Ok(Some(result))
    }

    /// Soft-delete a video. Relation links are kept.
    pub async fn soft_delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::soft_delete::<Video>(pool, id).await
    }

    pub async fn restore(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        capabilities::restore::<Video>(pool, id).await
    }

    async fn with_relations(
        conn: &mut PgConnection,
        video: Video,
    ) -> Result<VideoWithRelations, sqlx::Error> {
        let categories = fetch_related(&mut *conn, &Video::CATEGORIES, video.id).await?;
        let genres = fetch_related(&mut *conn, &Video::GENRES, video.id).await?;
        let cast_members = fetch_related(&mut *conn, &Video::CAST_MEMBERS, video.id).await?;
        Ok(VideoWithRelations {
            video,
            categories,
            genres,
            cast_members,
        })
    }
}

/// Inner value of a clearable file field.
fn file_value(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|f| f.as_deref())
}

/// Every genre on a video must be linked to at least one of its categories.
async fn ensure_genres_match_categories(
    conn: &mut PgConnection,
    genre_ids: &[EntityId],
    category_ids: &[EntityId],
) -> Result<(), DbError> {
    let links: Vec<(EntityId, EntityId)> =
        sqlx::query_as("SELECT genre_id, category_id FROM category_genre WHERE genre_id = ANY($1)")
            .bind(genre_ids)
            .fetch_all(conn)
            .await?;

    let offenders = genres_without_category(genre_ids, category_ids, &links);
    if offenders.is_empty() {
        return Ok(());
    }
    Err(CoreError::invalid_field(
        "genres_id",
        format!(
            "genres not linked to any of the chosen categories: {}",
            format_ids(&offenders)
        ),
    )
    .into())
}
