use crate::{LibrarianError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name of the catalog document inside the data directory
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// File name of the configuration file
pub const CONFIG_FILE_NAME: &str = "librarian.yaml";

/// Path management for Librarian configuration and data files
#[derive(Debug, Clone)]
pub struct LibrarianPaths {
    /// Configuration directory
    pub config_dir: PathBuf,
    /// Data directory holding the catalog
    pub data_dir: PathBuf,
}

impl LibrarianPaths {
    /// Create new paths instance using standard platform directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "librarian").ok_or_else(|| {
            LibrarianError::Path("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }

    /// Keep everything under `<root>/.librarian`
    pub fn for_project(project_root: &Path) -> Self {
        let base = project_root.join(".librarian");
        Self {
            config_dir: base.clone(),
            data_dir: base,
        }
    }

    /// Config file in the config directory
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Catalog document used when no path is configured
    pub fn default_catalog_file(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    /// Ensure all directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for LibrarianPaths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if platform directories fail
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::for_project(&current_dir)
        })
    }
}
