use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Catalog unavailable at {}: {source}", path.display())]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Interaction source error: {0}")]
    InteractionSource(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MatchError {
    pub fn catalog_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MatchError::CatalogUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Infrastructure failures the caller may retry; everything else is a
    /// programming or configuration fault.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MatchError::CatalogUnavailable { .. } | MatchError::InteractionSource(_)
        )
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        MatchError::Vocabulary(err.to_string())
    }
}

impl From<envy::Error> for MatchError {
    fn from(err: envy::Error) -> Self {
        MatchError::Configuration(err.to_string())
    }
}

impl From<tokio::task::JoinError> for MatchError {
    fn from(err: tokio::task::JoinError) -> Self {
        MatchError::Internal(format!("blocking task failed: {}", err))
    }
}
