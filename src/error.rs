use crate::types::EntryId;
use std::path::PathBuf;

/// Errors surfaced by session and protocol operations.
///
/// None of these are retried internally; each maps to a client-visible
/// rejection carrying `code()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Catalog is empty, cannot start a session")]
    EmptyCatalog,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session id already registered")]
    DuplicateSessionId,

    #[error("No more reveals left")]
    RevealLimitReached,

    #[error("Maximum number of questions reached")]
    QuestionLimitReached,

    #[error("No data for category '{0}'")]
    NoDataForCategory(String),

    #[error("Category '{0}' was already revealed")]
    CategoryAlreadyRevealed(String),

    #[error("Session is already finished")]
    SessionFinished,

    #[error("Unknown question type '{0}'")]
    UnknownQuestion(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Secret entry {0} missing from catalog")]
    SecretMissing(EntryId),
}

impl GameError {
    /// Short machine-readable reason string
    pub fn code(&self) -> &'static str {
        match self {
            GameError::EmptyCatalog => "empty_catalog",
            GameError::SessionNotFound => "session_not_found",
            GameError::DuplicateSessionId => "duplicate_session_id",
            GameError::RevealLimitReached => "reveal_limit_reached",
            GameError::QuestionLimitReached => "question_limit_reached",
            GameError::NoDataForCategory(_) => "no_data_for_category",
            GameError::CategoryAlreadyRevealed(_) => "category_already_revealed",
            GameError::SessionFinished => "session_finished",
            GameError::UnknownQuestion(_) => "unknown_question",
            GameError::InvalidRequest(_) => "invalid_request",
            GameError::SecretMissing(_) => "secret_missing",
        }
    }
}

/// Catalog load failures. Fatal for the service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures of the image collaborators
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Image request failed: {0}")]
    Request(String),

    #[error("Obscuring image failed: {0}")]
    Obscure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_snake_case() {
        let errors = [
            GameError::EmptyCatalog,
            GameError::SessionNotFound,
            GameError::RevealLimitReached,
            GameError::NoDataForCategory("year".to_string()),
            GameError::InvalidRequest("missing category".to_string()),
        ];

        for err in errors {
            let code = err.code();
            assert!(!code.is_empty());
            assert!(code
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_display_includes_category() {
        let err = GameError::NoDataForCategory("series".to_string());
        assert_eq!(err.to_string(), "No data for category 'series'");
    }
}
