pub mod persistence;
pub mod query;
pub mod store;
pub mod types;
pub mod validation;

pub use persistence::{CatalogBackend, InMemoryBackend, JsonFileBackend};
pub use query::{CatalogQuery, CatalogSummary, TagMatch};
pub use store::{CatalogStore, CompletionOutcome};
pub use types::{split_tags, Book, CatalogDocument, CATALOG_VERSION};
pub use validation::{classify_and_validate, parse_rating, IsbnError, IsbnKind, Rating, RatingError};
