//! Route definitions for the `/videos` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
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
        .route("/", get(videos::list).post(videos::create))
        .route(
            "/{id}",
            get(videos::show)
                .put(videos::update)
                .patch(videos::update)
                .delete(videos::delete),
        )
}
