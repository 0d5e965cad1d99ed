//! Cast member roles.

use validator::ValidationError;

/// Role of a cast member. Discriminants are the stored `SMALLINT` values.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastMemberType {
    Director = 1,
    Actor = 2,
}

impl CastMemberType {
    /// Resolve a stored value to the corresponding variant.
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Director),
            2 => Some(Self::Actor),
            _ => None,
        }
    }

    /// Return the stored value.
    pub fn id(&self) -> i16 {
        *self as i16
    }
}

/// `validator` hook for the `type` field of cast member payloads.
pub fn validate_cast_member_type(value: i16) -> Result<(), ValidationError> {
    if CastMemberType::from_id(value).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("cast_member_type");
        error.message = Some("must be 1 (director) or 2 (actor)".into());
        Err(error)
    }
}
