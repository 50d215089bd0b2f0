use crate::catalog::types::Book;
use crate::{LibrarianError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How a tag query is matched against a book's tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMatch {
    /// At least one of the requested tags
    #[default]
    Loose,
    /// Every requested tag
    Strict,
}

impl TagMatch {
    pub fn matches(self, book: &Book, tags: &[String]) -> bool {
        match self {
            TagMatch::Loose => tags.iter().any(|tag| book.has_tag(tag)),
            TagMatch::Strict => tags.iter().all(|tag| book.has_tag(tag)),
        }
    }
}

impl FromStr for TagMatch {
    type Err = LibrarianError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "loose" => Ok(TagMatch::Loose),
            "strict" => Ok(TagMatch::Strict),
            other => Err(LibrarianError::UnknownMatchMode(other.to_string())),
        }
    }
}

impl fmt::Display for TagMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagMatch::Loose => write!(f, "loose"),
            TagMatch::Strict => write!(f, "strict"),
        }
    }
}

/// Headline numbers for the whole library
#[derive(Debug, Clone, Copy)]
pub struct CatalogSummary<'a> {
    pub total_books: usize,
    /// Most completions
    pub most_popular: &'a Book,
    /// Highest average rating
    pub favorite: &'a Book,
}

/// Read-only queries over a catalog snapshot.
///
/// Books are visited in ascending ISBN order, and every "best of" query keeps
/// the first leader it sees, so ties always resolve to the smallest ISBN.
pub struct CatalogQuery<'a> {
    books: &'a BTreeMap<String, Book>,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(books: &'a BTreeMap<String, Book>) -> Self {
        Self { books }
    }

    pub fn total(&self) -> usize {
        self.books.len()
    }

    pub fn all(&self) -> Vec<&'a Book> {
        self.books.values().collect()
    }

    /// The book finished by the most users
    pub fn most_completed(&self) -> Option<&'a Book> {
        self.leader(|book| book.completion_count() as f64)
    }

    /// The book with the best mean rating; unrated books count as zero
    pub fn highest_average_rating(&self) -> Option<&'a Book> {
        self.leader(|book| book.average_rating().unwrap_or(0.0))
    }

    fn leader(&self, score: impl Fn(&Book) -> f64) -> Option<&'a Book> {
        self.books
            .values()
            .fold(None, |best: Option<(&'a Book, f64)>, book| {
                let value = score(book);
                match best {
                    Some((_, best_value)) if best_value >= value => best,
                    _ => Some((book, value)),
                }
            })
            .map(|(book, _)| book)
    }

    /// Books whose tags satisfy the query under `mode`
    pub fn filter_by_tags(&self, tags: &[String], mode: TagMatch) -> Result<Vec<&'a Book>> {
        let matches: Vec<&'a Book> = self
            .books
            .values()
            .filter(|book| mode.matches(book, tags))
            .collect();

        if matches.is_empty() {
            return Err(LibrarianError::NoMatch(tags.to_vec()));
        }
        Ok(matches)
    }

    /// Candidate pool for a recommendation: everything when no tags are given
    pub fn candidates(&self, tags: &[String], mode: TagMatch) -> Result<Vec<&'a Book>> {
        if self.books.is_empty() {
            return Err(LibrarianError::EmptyCatalog);
        }
        if tags.is_empty() {
            return Ok(self.all());
        }
        self.filter_by_tags(tags, mode)
    }

    /// Uniform choice from the candidates
    pub fn random_pick<R: Rng + ?Sized>(candidates: &[&'a Book], rng: &mut R) -> Option<&'a Book> {
        candidates.choose(rng).copied()
    }

    pub fn random_book<R: Rng + ?Sized>(
        &self,
        tags: &[String],
        mode: TagMatch,
        rng: &mut R,
    ) -> Result<&'a Book> {
        let candidates = self.candidates(tags, mode)?;
        Self::random_pick(&candidates, rng).ok_or(LibrarianError::EmptyCatalog)
    }

    pub fn summary(&self) -> Result<CatalogSummary<'a>> {
        match (self.most_completed(), self.highest_average_rating()) {
            (Some(most_popular), Some(favorite)) => Ok(CatalogSummary {
                total_books: self.total(),
                most_popular,
                favorite,
            }),
            _ => Err(LibrarianError::EmptyCatalog),
        }
    }
}
