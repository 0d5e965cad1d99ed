//! Integration tests for soft-delete and restore.
//!
//! Verifies that soft-deleted rows:
//! - are hidden from `find_by_id` and listings
//! - can be deleted again without error (idempotent)
//! - remain reachable through relations of other entities

use catalog_core::listing::ListQuery;
use catalog_db::models::category::{CategoryFilter, CreateCategory};
use catalog_db::models::genre::{CreateGenre, GenreFilter};
use catalog_db::repositories::{CategoryRepo, GenreRepo};
use sqlx::PgPool;
use uuid::Uuid;

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: Some("soft delete test".to_string()),
        is_active: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_category_is_hidden(pool: PgPool) {
    let kept = CategoryRepo::create(&pool, &new_category("Kept")).await.unwrap();
    let gone = CategoryRepo::create(&pool, &new_category("Gone")).await.unwrap();

    assert!(CategoryRepo::soft_delete(&pool, gone.id).await.unwrap());

    assert!(CategoryRepo::find_by_id(&pool, gone.id).await.unwrap().is_none());
    let page = CategoryRepo::list(&pool, &ListQuery::default(), &CategoryFilter::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].id, kept.id);

    let row = CategoryRepo::find_by_id_include_deleted(&pool, gone.id)
        .await
        .unwrap()
        .expect("row still stored");
    assert!(row.deleted_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Twice")).await.unwrap();

    assert!(CategoryRepo::soft_delete(&pool, category.id).await.unwrap());
    let first = CategoryRepo::find_by_id_include_deleted(&pool, category.id)
        .await
        .unwrap()
        .unwrap()
        .deleted_at;

    assert!(CategoryRepo::soft_delete(&pool, category.id).await.unwrap());
    let second = CategoryRepo::find_by_id_include_deleted(&pool, category.id)
        .await
        .unwrap()
        .unwrap()
        .deleted_at;

    assert_eq!(first, second, "second delete keeps the original marker");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_unknown_id_reports_missing(pool: PgPool) {
    assert!(!CategoryRepo::soft_delete(&pool, Uuid::now_v7()).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_of_soft_deleted_row_is_not_found(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Frozen")).await.unwrap();
    CategoryRepo::soft_delete(&pool, category.id).await.unwrap();

    let updated = CategoryRepo::update(&pool, category.id, &Default::default())
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_makes_row_visible_again(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Back")).await.unwrap();
    CategoryRepo::soft_delete(&pool, category.id).await.unwrap();

    assert!(CategoryRepo::restore(&pool, category.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_some());
    assert!(!CategoryRepo::restore(&pool, category.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_category_still_resolves_from_genre(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Archived")).await.unwrap();
    let genre = GenreRepo::create(
        &pool,
        &CreateGenre {
            name: "Noir".to_string(),
            is_active: None,
            categories_id: vec![category.id],
        },
    )
    .await
    .unwrap();

    CategoryRepo::soft_delete(&pool, category.id).await.unwrap();

    let found = GenreRepo::find_by_id(&pool, genre.genre.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.categories.len(), 1);
    assert_eq!(found.categories[0].id, category.id);
    assert!(found.categories[0].deleted_at.is_some());

    // Listing filters by relation also see the trashed category.
    let filter = GenreFilter {
        is_active: None,
        categories: vec![category.id],
    };
    let page = GenreRepo::list(&pool, &ListQuery::default(), &filter)
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
}
