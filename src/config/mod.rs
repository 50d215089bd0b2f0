pub mod loader;
pub mod types;

pub use loader::{validate_prefix, ConfigLoader};
pub use types::{LibrarianConfig, Settings, DEFAULT_PREFIX};
