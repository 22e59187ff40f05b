//! Engine error taxonomy.
//!
//! Two kinds of failure exist and neither is retried inside the engine:
//! malformed canonical input (`Validation`) and a request for a move that the
//! state does not offer (`InvalidAction`).

/// Errors raised by engine constructors, lookups and decoders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),
}

impl GameError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn invalid_action(message: impl Into<String>) -> Self {
        Self::InvalidAction(message.into())
    }

    /// True for `Validation` errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for `InvalidAction` errors.
    #[must_use]
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, Self::InvalidAction(_))
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::validation("grid has 5 rows, expected 6");
        assert_eq!(err.to_string(), "validation error: grid has 5 rows, expected 6");

        let err = GameError::invalid_action("column 7 is out of range");
        assert_eq!(err.to_string(), "invalid action: column 7 is out of range");
    }

    #[test]
    fn test_error_kinds() {
        assert!(GameError::validation("x").is_validation());
        assert!(!GameError::validation("x").is_invalid_action());
        assert!(GameError::invalid_action("x").is_invalid_action());
    }

    #[test]
    fn test_serde_errors_become_validation() {
        let err: GameError = serde_json::from_str::<i32>("\"nope\"").unwrap_err().into();
        assert!(err.is_validation());
    }
}
