pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod health;
pub mod videos;

use axum::middleware::from_extractor_with_state;
use axum::Router;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy (every route requires a Bearer token):
///
/// ```text
/// /categories          list, create
/// /categories/{id}     show, update (PUT/PATCH), delete
///
/// /genres              list, create
/// /genres/{id}         show, update (PUT/PATCH), delete
///
/// /cast_members        list, create
/// /cast_members/{id}   show, update (PUT/PATCH), delete
///
/// /videos              list, create
/// /videos/{id}         show, update (PUT/PATCH), delete
/// ```
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/cast_members", cast_members::router())
        .nest("/videos", videos::router())
        // Rejects with 401 before any handler runs.
        .route_layer(from_extractor_with_state::<AuthUser, AppState>(state))
}
