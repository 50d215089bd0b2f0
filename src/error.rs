use crate::catalog::validation::{IsbnError, RatingError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibrarianError {
    #[error(transparent)]
    Isbn(#[from] IsbnError),

    #[error("ISBN {0} fails checksum validation")]
    InvalidChecksum(String),

    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("No book matching `{0}` found")]
    NotFound(String),

    #[error(transparent)]
    RatingRange(#[from] RatingError),

    #[error("No books with tags [{}] were found", .0.join(", "))]
    NoMatch(Vec<String>),

    #[error("Unknown tag matching mode `{0}` (expected loose or strict)")]
    UnknownMatchMode(String),

    #[error("The library is empty")]
    EmptyCatalog,

    #[error("User {user} has not completed {isbn}")]
    NotCompleted { isbn: String, user: String },

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Failed to persist catalog to {target}: {reason}")]
    Persistence { target: String, reason: String },

    #[error("Catalog document is corrupt: {0}")]
    CorruptCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl LibrarianError {
    /// Conditions a user can cause and fix by retrying with different input
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            LibrarianError::Persistence { .. }
                | LibrarianError::CorruptCatalog(_)
                | LibrarianError::Io(_)
                | LibrarianError::JsonSerialization(_)
                | LibrarianError::YamlSerialization(_)
                | LibrarianError::Path(_)
                | LibrarianError::Config(_)
                | LibrarianError::Generic(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LibrarianError>;
