use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default command prefix for chat lines
pub const DEFAULT_PREFIX: &str = "lib!";

/// Global settings for the librarian
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Prefix that marks a chat line as a command
    pub prefix: String,

    /// Catalog document location; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Shown alongside failures the user cannot fix themselves
    pub unhandled_error: String,

    /// Enable verbose debug logging
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            catalog_path: None,
            unhandled_error: "Something went wrong on our side. Please report it!".to_string(),
            debug_mode: false,
        }
    }
}

/// Root configuration file structure for librarian.yaml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LibrarianConfig {
    #[serde(default)]
    pub settings: Settings,
}
