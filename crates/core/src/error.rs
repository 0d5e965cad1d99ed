use crate::types::EntityId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// One or more ids submitted for a relation do not exist at all
    /// (soft-deleted rows still count as existing).
    #[error("Unknown {field} ids: {}", format_ids(.ids))]
    UnknownRelation {
        field: &'static str,
        ids: Vec<EntityId>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a validation error on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

/// Render ids as a comma-separated list for error messages.
pub fn format_ids(ids: &[EntityId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
