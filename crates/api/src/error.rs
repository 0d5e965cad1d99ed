use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::{format_ids, CoreError};
use catalog_core::validation::FieldErrors;
use catalog_db::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Database(db) => AppError::Database(db),
        }
    }
}

/// Status, machine-readable code, message and optional per-field errors.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    errors: Option<FieldErrors>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
        }
    }

    fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(errors) => ErrorParts::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "The given data was invalid",
                )
                .with_errors(errors.clone()),
                CoreError::UnknownRelation { field, ids } => ErrorParts::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNKNOWN_RELATION",
                    self.to_string(),
                )
                .with_errors(FieldErrors::single(
                    field,
                    format!("unknown ids: {}", format_ids(ids)),
                )),
                CoreError::Unauthorized(msg) => {
                    ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(errors) = parts.errors {
            body["errors"] = json!(errors);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`) map to 409.
/// - Foreign-key (`23503`) and check (`23514`) violations map to 422.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") => ErrorParts::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                Some("23503") => ErrorParts::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNKNOWN_RELATION",
                    format!("Referenced row does not exist: {constraint}"),
                ),
                Some("23514") => ErrorParts::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorParts::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
