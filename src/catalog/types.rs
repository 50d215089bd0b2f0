use crate::catalog::validation::{self, Rating};
use crate::{LibrarianError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Current on-disk document version
pub const CATALOG_VERSION: u32 = 1;

/// A single book in the shared library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Normalized identifier, also the catalog key
    pub isbn: String,
    /// Insertion ordered, no duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// One rating per user, keyed by user id
    #[serde(default)]
    pub ratings: BTreeMap<String, Rating>,
    /// Users who finished the book, each at most once
    #[serde(default, deserialize_with = "user_ids")]
    pub completions: Vec<String>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl AsRef<str>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: validation::normalize(isbn.as_ref()),
            tags: Vec::new(),
            ratings: BTreeMap::new(),
            completions: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merge_tags(tags);
        self
    }

    /// Append tags that are not already present. Returns how many were added.
    pub fn merge_tags<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.tags.len();
        for tag in tags {
            let tag = tag.into();
            if !tag.is_empty() && !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.tags.len() - before
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_completed(&self, user: &str) -> bool {
        self.completions.iter().any(|u| u == user)
    }

    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }

    pub fn rating_for(&self, user: &str) -> Option<Rating> {
        self.ratings.get(user).copied()
    }

    /// Mean of all ratings, `None` when nobody has rated the book
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: u32 = self.ratings.values().map(|r| r.value() as u32).sum();
        Some(total as f64 / self.ratings.len() as f64)
    }

    /// Comma separated tag list for display
    pub fn tag_list(&self) -> String {
        if self.tags.is_empty() {
            "N/A".to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// Split a `"comma,separated,tags"` argument into trimmed, non-empty tags
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// The durable form of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Missing in documents written before versioning existed
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub books: BTreeMap<String, Book>,
}

fn legacy_version() -> u32 {
    1
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            books: BTreeMap::new(),
        }
    }
}

impl CatalogDocument {
    pub fn new(books: BTreeMap<String, Book>) -> Self {
        Self {
            version: CATALOG_VERSION,
            books,
        }
    }

    /// Reject documents that would break catalog invariants once loaded
    pub fn verify(&self) -> Result<()> {
        if self.version > CATALOG_VERSION {
            return Err(LibrarianError::CorruptCatalog(format!(
                "Unsupported catalog version: {}. Expected at most: {}",
                self.version, CATALOG_VERSION
            )));
        }

        let mut seen = BTreeMap::new();
        for (key, book) in &self.books {
            if key != &book.isbn {
                return Err(LibrarianError::CorruptCatalog(format!(
                    "Key {} does not match book ISBN {}",
                    key, book.isbn
                )));
            }

            match validation::classify_and_validate(key) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(LibrarianError::CorruptCatalog(format!(
                        "ISBN {} fails checksum validation",
                        key
                    )))
                }
                Err(e) => {
                    return Err(LibrarianError::CorruptCatalog(format!(
                        "ISBN {} is malformed: {}",
                        key, e
                    )))
                }
            }

            if let Ok(Some(canonical)) = validation::to_isbn13(key) {
                if let Some(other) = seen.insert(canonical, key) {
                    return Err(LibrarianError::CorruptCatalog(format!(
                        "ISBNs {} and {} name the same book",
                        other, key
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserId {
    Text(String),
    Number(u64),
}

// Older catalogs stored completions as numeric chat ids
fn user_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<UserId>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            UserId::Text(text) => text,
            UserId::Number(number) => number.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_book_normalizes_isbn() {
        let book = Book::new("T", "A", "978-0-37-542052-8");
        assert_eq!(book.isbn, "9780375420528");
        assert!(book.tags.is_empty());
        assert!(book.ratings.is_empty());
        assert!(book.completions.is_empty());
    }

    #[test]
    fn test_merge_tags_preserves_order_and_skips_duplicates() {
        let mut book = Book::new("T", "A", "9780375420528");

        assert_eq!(book.merge_tags(split_tags("a,b,a")), 2);
        assert_eq!(book.tags, vec!["a", "b"]);

        assert_eq!(book.merge_tags(split_tags("b,c")), 1);
        assert_eq!(book.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let book = Book::new("T", "A", "9780375420528").with_tags(["SciFi", "scifi"]);
        assert_eq!(book.tags, vec!["SciFi", "scifi"]);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags(" nonfiction, essays ,, queer "),
            vec!["nonfiction", "essays", "queer"]
        );
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_average_rating() {
        let mut book = Book::new("T", "A", "9780375420528");
        assert_eq!(book.average_rating(), None);

        book.ratings.insert("alice".into(), Rating::new(7).unwrap());
        book.ratings.insert("bob".into(), Rating::new(8).unwrap());
        assert_eq!(book.average_rating(), Some(7.5));
    }

    #[test]
    fn test_legacy_document_loads() {
        let legacy = r#"{
            "books": {
                "9780375420528": {
                    "title": "T",
                    "author": "A",
                    "isbn": "9780375420528",
                    "tags": ["fiction"],
                    "ratings": {"123456789": 9},
                    "completions": [123456789]
                }
            }
        }"#;

        let document: CatalogDocument = serde_json::from_str(legacy).unwrap();
        assert_eq!(document.version, 1);
        document.verify().unwrap();

        let book = &document.books["9780375420528"];
        assert_eq!(book.completions, vec!["123456789"]);
        assert!(book.has_completed("123456789"));
        assert_eq!(book.rating_for("123456789").map(Rating::value), Some(9));
    }

    #[test]
    fn test_verify_rejects_mismatched_key() {
        let mut books = BTreeMap::new();
        books.insert(
            "9781982158507".to_string(),
            Book::new("T", "A", "9780375420528"),
        );

        let result = CatalogDocument::new(books).verify();
        assert!(matches!(result, Err(LibrarianError::CorruptCatalog(_))));
    }

    #[test]
    fn test_verify_rejects_bad_checksum() {
        let mut books = BTreeMap::new();
        books.insert(
            "9780375420529".to_string(),
            Book::new("T", "A", "9780375420529"),
        );

        let result = CatalogDocument::new(books).verify();
        assert!(matches!(result, Err(LibrarianError::CorruptCatalog(_))));
    }

    #[test]
    fn test_verify_rejects_future_version() {
        let document = CatalogDocument {
            version: CATALOG_VERSION + 1,
            books: BTreeMap::new(),
        };
        assert!(document.verify().is_err());
    }
}
