use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupnestError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient members: group metrics need at least 2 eligible members, found {eligible}")]
    InsufficientMembers { eligible: usize },

    #[error("No eligible members remain after filtering")]
    NoEligibleMembers,

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for GroupnestError {
    fn from(e: serde_json::Error) -> Self {
        GroupnestError::SerializationError(e.to_string())
    }
}
