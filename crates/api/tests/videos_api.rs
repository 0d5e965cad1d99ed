//! HTTP-level integration tests for `/api/v1/videos`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json, put_json, STORAGE_BASE_URL};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Fixture {
    movies: String,
    series: String,
    drama: String,
    sitcom: String,
    actor: String,
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn seed(pool: &PgPool) -> Fixture {
    let movies = id_of(&common::create(pool, "/api/v1/categories", json!({"name": "Movies"})).await);
    let series = id_of(&common::create(pool, "/api/v1/categories", json!({"name": "Series"})).await);
    let drama = id_of(
        &common::create(
            pool,
            "/api/v1/genres",
            json!({"name": "Drama", "categories_id": [movies]}),
        )
        .await,
    );
    let sitcom = id_of(
        &common::create(
            pool,
            "/api/v1/genres",
            json!({"name": "Sitcom", "categories_id": [series]}),
        )
        .await,
    );
    let actor = id_of(
        &common::create(
            pool,
            "/api/v1/cast_members",
            json!({"name": "Meryl", "type": 2}),
        )
        .await,
    );
    Fixture {
        movies,
        series,
        drama,
        sitcom,
        actor,
    }
}

fn video_payload(title: &str, f: &Fixture) -> Value {
    json!({
        "title": title,
        "description": "A story",
        "year_launched": 1999,
        "duration": 120,
        "rating": "14",
        "categories_id": [f.movies],
        "genres_id": [f.drama],
        "cast_members_id": [f.actor],
        "banner_file": "banner.jpg",
    })
}

// ---------------------------------------------------------------------------
// Create / show
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_video_returns_relations_and_urls(pool: PgPool) {
    let f = seed(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/videos", video_payload("Magnolia", &f)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    let id = data["id"].as_str().unwrap();
    assert_eq!(data["title"], "Magnolia");
    assert_eq!(data["opened"], false);
    assert_eq!(data["rating"], "14");
    assert_eq!(data["categories"][0]["id"], f.movies.as_str());
    assert_eq!(data["genres"][0]["id"], f.drama.as_str());
    assert_eq!(data["cast_members"][0]["id"], f.actor.as_str());
    assert_eq!(
        data["banner_file_url"],
        format!("{STORAGE_BASE_URL}/{id}/banner.jpg")
    );
    assert!(data["video_file_url"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_null_detaches_file(pool: PgPool) {
    let f = seed(&pool).await;
    let video = common::create(&pool, "/api/v1/videos", video_payload("Heat", &f)).await;
    let uri = format!("/api/v1/videos/{}", id_of(&video));

    let response = patch_json(
        common::build_test_app(pool),
        &uri,
        json!({"banner_file": null, "thumb_file": "thumb.png"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["banner_file"].is_null());
    assert!(data["banner_file_url"].is_null());
    assert_eq!(data["thumb_file"], "thumb.png");
    assert_eq!(data["title"], "Heat");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_fields_are_reported_together(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/videos",
        json!({"title": "", "year_launched": 0, "duration": 10, "rating": "PG"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    let errors = &json["errors"];
    for field in [
        "title",
        "description",
        "year_launched",
        "rating",
        "categories_id",
        "genres_id",
        "cast_members_id",
    ] {
        assert!(errors[field].is_array(), "expected an error for {field}");
    }
    assert!(errors.get("duration").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_genre_from_other_category_returns_422(pool: PgPool) {
    let f = seed(&pool).await;
    let mut payload = video_payload("Mixed", &f);
    payload["genres_id"] = json!([f.drama, f.sitcom]);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/videos", payload).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["errors"]["genres_id"][0]
        .as_str()
        .unwrap()
        .contains(&f.sitcom));
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_moves_video_to_other_category(pool: PgPool) {
    let f = seed(&pool).await;
    let video = common::create(&pool, "/api/v1/videos", video_payload("Pilot", &f)).await;
    let uri = format!("/api/v1/videos/{}", id_of(&video));

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"categories_id": [f.series], "genres_id": [f.sitcom], "opened": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(common::build_test_app(pool), &uri).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["opened"], true);
    assert_eq!(json["data"]["categories"][0]["id"], f.series.as_str());
    assert_eq!(json["data"]["genres"][0]["id"], f.sitcom.as_str());
    assert_eq!(json["data"]["cast_members"][0]["id"], f.actor.as_str());
    assert_eq!(json["data"]["title"], "Pilot");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deleted_video_is_gone_but_relations_survive(pool: PgPool) {
    let f = seed(&pool).await;
    let video = common::create(&pool, "/api/v1/videos", video_payload("Short", &f)).await;
    let uri = format!("/api/v1/videos/{}", id_of(&video));

    // Deleting the genre first must not break the video payload.
    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/genres/{}", f.drama),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["genres"][0]["id"], f.drama.as_str());

    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(common::build_test_app(pool), "/api/v1/videos").await;
    assert_eq!(body_json(response).await["meta"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters_by_cast_member(pool: PgPool) {
    let f = seed(&pool).await;
    common::create(&pool, "/api/v1/videos", video_payload("With Meryl", &f)).await;

    let director = id_of(
        &common::create(
            &pool,
            "/api/v1/cast_members",
            json!({"name": "Paul", "type": 1}),
        )
        .await,
    );
    let mut other = video_payload("Without Meryl", &f);
    other["cast_members_id"] = json!([director]);
    common::create(&pool, "/api/v1/videos", other).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/videos?cast_members={}", f.actor)).await;
    let json = body_json(response).await;

    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["title"], "With Meryl");
    assert!(json["data"][0]["banner_file_url"].is_string());
}
