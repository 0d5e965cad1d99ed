use catalog_core::error::CoreError;

/// Error returned by repository operations that apply domain rules inside a
/// transaction (relation syncs, cross-relation validation).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
