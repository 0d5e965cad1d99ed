//! Integration tests for relation sync between genres and categories.

use assert_matches::assert_matches;
use catalog_core::error::CoreError;
use catalog_core::listing::ListQuery;
use catalog_core::types::EntityId;
use catalog_db::associations::sync_in_transaction;
use catalog_db::models::category::CreateCategory;
use catalog_db::models::genre::{CreateGenre, Genre, GenreFilter, UpdateGenre};
use catalog_db::repositories::{CategoryRepo, GenreRepo};
use catalog_db::DbError;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn category(pool: &PgPool, name: &str) -> EntityId {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_genre(name: &str, categories_id: Vec<EntityId>) -> CreateGenre {
    CreateGenre {
        name: name.to_string(),
        is_active: None,
        categories_id,
    }
}

fn sorted(mut ids: Vec<EntityId>) -> Vec<EntityId> {
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// Test: Sync replaces the link set
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_replaces_categories(pool: PgPool) {
    let a = category(&pool, "A").await;
    let b = category(&pool, "B").await;
    let c = category(&pool, "C").await;

    let genre = GenreRepo::create(&pool, &new_genre("Thriller", vec![a, b]))
        .await
        .unwrap();
    assert!(genre.genre.is_active, "is_active defaults to true");
    assert_eq!(
        sorted(genre.categories.iter().map(|c| c.id).collect()),
        sorted(vec![a, b])
    );

    let update = UpdateGenre {
        categories_id: Some(vec![b, c]),
        ..Default::default()
    };
    let updated = GenreRepo::update(&pool, genre.genre.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        sorted(updated.categories.iter().map(|c| c.id).collect()),
        sorted(vec![b, c])
    );
    assert_eq!(updated.genre.name, "Thriller");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_trashed_category_is_a_valid_sync_target(pool: PgPool) {
    let live = category(&pool, "Live").await;
    let trashed = category(&pool, "Trashed").await;
    assert!(CategoryRepo::soft_delete(&pool, trashed).await.unwrap());

    let genre = GenreRepo::create(&pool, &new_genre("Noir", vec![trashed]))
        .await
        .unwrap();
    assert_eq!(genre.categories.len(), 1);
    assert_eq!(genre.categories[0].id, trashed);
    assert!(genre.categories[0].deleted_at.is_some());

    let update = UpdateGenre {
        categories_id: Some(vec![live, trashed]),
        ..Default::default()
    };
    let updated = GenreRepo::update(&pool, genre.genre.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        sorted(updated.categories.iter().map(|c| c.id).collect()),
        sorted(vec![live, trashed])
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_without_categories_keeps_links(pool: PgPool) {
    let a = category(&pool, "A").await;
    let genre = GenreRepo::create(&pool, &new_genre("Horror", vec![a]))
        .await
        .unwrap();

    let update = UpdateGenre {
        name: Some("Gothic Horror".to_string()),
        ..Default::default()
    };
    let updated = GenreRepo::update(&pool, genre.genre.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.genre.name, "Gothic Horror");
    assert_eq!(updated.categories.len(), 1);
    assert_eq!(updated.categories[0].id, a);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sync_reports_changes(pool: PgPool) {
    let a = category(&pool, "A").await;
    let b = category(&pool, "B").await;
    let genre = GenreRepo::create(&pool, &new_genre("Western", vec![a]))
        .await
        .unwrap();

    let changes = sync_in_transaction(&pool, &Genre::CATEGORIES, genre.genre.id, &[b, b])
        .await
        .unwrap();
    assert_eq!(changes.attached, vec![b]);
    assert_eq!(changes.detached, vec![a]);

    let again = sync_in_transaction(&pool, &Genre::CATEGORIES, genre.genre.id, &[b])
        .await
        .unwrap();
    assert!(again.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Unknown ids abort the whole write
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_unknown_category_inserts_nothing(pool: PgPool) {
    let a = category(&pool, "A").await;
    let ghost = Uuid::now_v7();

    let result = GenreRepo::create(&pool, &new_genre("Ghost", vec![a, ghost])).await;
    assert_matches!(
        result,
        Err(DbError::Core(CoreError::UnknownRelation { field: "categories_id", ref ids }))
            if ids == &vec![ghost]
    );

    let page = GenreRepo::list(&pool, &ListQuery::default(), &GenreFilter::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_with_unknown_category_keeps_old_state(pool: PgPool) {
    let a = category(&pool, "A").await;
    let genre = GenreRepo::create(&pool, &new_genre("Mystery", vec![a]))
        .await
        .unwrap();

    let update = UpdateGenre {
        name: Some("Renamed".to_string()),
        categories_id: Some(vec![Uuid::now_v7()]),
        ..Default::default()
    };
    let result = GenreRepo::update(&pool, genre.genre.id, &update).await;
    assert_matches!(result, Err(DbError::Core(CoreError::UnknownRelation { .. })));

    let current = GenreRepo::find_by_id(&pool, genre.genre.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.genre.name, "Mystery");
    assert_eq!(current.categories[0].id, a);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_embeds_categories_per_genre(pool: PgPool) {
    let a = category(&pool, "A").await;
    let b = category(&pool, "B").await;
    GenreRepo::create(&pool, &new_genre("One", vec![a])).await.unwrap();
    GenreRepo::create(&pool, &new_genre("Two", vec![a, b])).await.unwrap();

    let filter = GenreFilter {
        is_active: None,
        categories: vec![b],
    };
    let page = GenreRepo::list(&pool, &ListQuery::default(), &filter)
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].genre.name, "Two");
    assert_eq!(
        page.data[0].categories.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![a, b]
    );
}
