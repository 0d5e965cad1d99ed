//! Shared response envelope types for API handlers.
//!
//! Single-record responses use a `{ "data": ... }` envelope. Listings
//! return [`Page`](catalog_core::listing::Page), which adds `meta`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: category }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
