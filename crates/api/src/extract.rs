//! Request extractors that report failures through [`AppError`].
//!
//! - [`ValidatedJson`] -- JSON body deserialized and validated with
//!   `validator`; both failure kinds become a 422 field-error response.
//! - [`IdPath`] -- `{id}` path segment parsed as a UUID.
//! - [`QueryParams`] -- query string; malformed ones become a JSON 400.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::EntityId;
use catalog_core::validation::FieldErrors;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// A JSON request body that passed `T::validate()`.
///
/// Malformed or mistyped bodies are reported under the `body` field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::Core(CoreError::Validation(FieldErrors::single(
                    "body",
                    rejection.body_text(),
                )))
            })?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(errors.into())))?;

        Ok(Self(value))
    }
}

/// The `{id}` path parameter of a resource route.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub EntityId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<EntityId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(id))
    }
}

/// Query-string parameters of a listing route.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(params))
    }
}
