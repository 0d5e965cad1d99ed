//! Route definitions for the `/genres` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::genres;
use crate::state::AppState;

/// Routes mounted at `/genres`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> show
/// PUT    /{id}   -> update
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(genres::list).post(genres::create))
        .route(
            "/{id}",
            get(genres::show)
                .put(genres::update)
                .patch(genres::update)
                .delete(genres::delete),
        )
}
