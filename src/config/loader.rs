use super::types::LibrarianConfig;
use crate::io::paths::{LibrarianPaths, CONFIG_FILE_NAME};
use crate::{LibrarianError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locates and parses librarian.yaml
pub struct ConfigLoader {
    /// Directories searched in order when no explicit path is given
    search_dirs: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Search the working directory first, then the platform config directory
    pub fn new() -> Self {
        let mut search_dirs = Vec::new();
        if let Ok(current_dir) = std::env::current_dir() {
            search_dirs.push(current_dir);
        }
        search_dirs.push(LibrarianPaths::default().config_dir);
        Self { search_dirs }
    }

    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// First existing config file in the search directories
    pub fn discover(&self) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load from `explicit` if given (it must exist), else discover, else defaults
    pub fn load(&self, explicit: Option<&Path>) -> Result<LibrarianConfig> {
        if let Some(path) = explicit {
            return self.load_file(path);
        }

        match self.discover() {
            Some(path) => self.load_file(&path),
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(LibrarianConfig::default())
            }
        }
    }

    /// Load and validate a single config file
    pub fn load_file(&self, path: &Path) -> Result<LibrarianConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LibrarianError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: LibrarianConfig = serde_yaml_ng::from_str(&contents).map_err(|e| {
            LibrarianError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.validate(&config)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self, config: &LibrarianConfig) -> Result<()> {
        validate_prefix(&config.settings.prefix)
    }
}

/// A prefix must be non-empty and free of whitespace, wherever it comes from
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(LibrarianError::Config(
            "Command prefix must not be empty".to_string(),
        ));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(LibrarianError::Config(format!(
            "Command prefix {:?} must not contain whitespace",
            prefix
        )));
    }
    Ok(())
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
