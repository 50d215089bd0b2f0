use crate::catalog::persistence::{CatalogBackend, InMemoryBackend, JsonFileBackend};
use crate::catalog::query::CatalogQuery;
use crate::catalog::types::{Book, CatalogDocument};
use crate::catalog::validation::{self, Rating};
use crate::{LibrarianError, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of marking a book as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Recorded,
    /// The user had already finished the book; nothing changed
    AlreadyCompleted,
}

/// Owns the catalog and keeps it in step with its backend.
///
/// Every mutation is written through before it returns. When the write fails
/// the in-memory change is undone and the persistence error is returned.
pub struct CatalogStore<B: CatalogBackend = JsonFileBackend> {
    document: CatalogDocument,
    backend: B,
}

impl CatalogStore<JsonFileBackend> {
    /// Open the JSON catalog at `path`, starting empty if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(JsonFileBackend::new(path))
    }
}

impl CatalogStore<InMemoryBackend> {
    pub fn in_memory() -> Self {
        Self {
            document: CatalogDocument::default(),
            backend: InMemoryBackend::new(),
        }
    }
}

impl<B: CatalogBackend> CatalogStore<B> {
    /// Read the catalog from `backend`. Malformed content is an error.
    pub fn load(backend: B) -> Result<Self> {
        let document = backend.load()?;
        info!(
            "Loaded catalog with {} books from {}",
            document.books.len(),
            backend.describe()
        );
        Ok(Self { document, backend })
    }

    /// Write the whole catalog to the backend
    pub fn flush(&mut self) -> Result<()> {
        self.backend.save(&self.document)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.books.is_empty()
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.document.books.values()
    }

    pub fn query(&self) -> CatalogQuery<'_> {
        CatalogQuery::new(&self.document.books)
    }

    /// Exact key lookup on the normalized identifier
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.document.books.get(&validation::normalize(isbn))
    }

    /// Insert a new book and persist it
    pub fn add(&mut self, mut book: Book) -> Result<&Book> {
        if book.title.trim().is_empty() {
            return Err(LibrarianError::MissingArgument("title"));
        }
        if book.author.trim().is_empty() {
            return Err(LibrarianError::MissingArgument("author"));
        }

        let isbn = accept_isbn(&book.isbn)?;
        if let Some(existing) = self.equivalent_key(&isbn)? {
            debug!(isbn = %isbn, existing = %existing, "Rejecting duplicate");
            return Err(LibrarianError::DuplicateIsbn(existing));
        }
        book.isbn = isbn.clone();

        self.document.books.insert(isbn.clone(), book);
        if let Err(e) = self.flush() {
            warn!("Rolling back add of {}: {}", isbn, e);
            self.document.books.remove(&isbn);
            return Err(e);
        }

        info!(isbn = %isbn, "Added book");
        self.require(&isbn)
    }

    /// Resolve an identifier to a stored book.
    ///
    /// An ISBN-10 and its ISBN-13 form name the same book, whichever one it was
    /// stored under.
    pub fn find(&self, isbn: &str) -> Result<&Book> {
        let key = accept_isbn(isbn)?;
        match self.equivalent_key(&key)? {
            Some(stored) => self.require(&stored),
            None => Err(LibrarianError::NotFound(isbn.to_string())),
        }
    }

    /// Stored key naming the same book as the accepted identifier `key`
    fn equivalent_key(&self, key: &str) -> Result<Option<String>> {
        if self.document.books.contains_key(key) {
            return Ok(Some(key.to_string()));
        }

        let Some(wanted) = validation::to_isbn13(key)? else {
            return Ok(None);
        };
        for stored in self.document.books.keys() {
            if validation::to_isbn13(stored)?.as_deref() == Some(wanted.as_str()) {
                return Ok(Some(stored.clone()));
            }
        }
        Ok(None)
    }

    /// Resolve a user supplied token, either an ISBN or an exact title
    pub fn lookup(&self, token: &str) -> Result<&Book> {
        if validation::looks_like_isbn(token) {
            debug!("Resolving {} as an ISBN", token);
            return self.find(token);
        }

        debug!("Resolving {:?} as a title", token);
        self.document
            .books
            .values()
            .find(|book| book.title == token)
            .ok_or_else(|| LibrarianError::NotFound(token.to_string()))
    }

    /// Append tags that are not already on the book
    pub fn append_tags(&mut self, isbn: &str, tags: &[String]) -> Result<&Book> {
        let key = self.find(isbn)?.isbn.clone();
        let added = self.commit(&key, |book| book.merge_tags(tags.iter().cloned()))?;

        info!(isbn = %key, added, "Tagged book");
        self.require(&key)
    }

    /// Record that `user` finished the book. Finishing twice is a no-op.
    pub fn mark_completed(&mut self, isbn: &str, user: &str) -> Result<CompletionOutcome> {
        self.finish(isbn, user, None)
    }

    /// Record a completion and, when given, the user's rating in one write.
    ///
    /// Finishing twice changes nothing, including the rating.
    pub fn finish(
        &mut self,
        isbn: &str,
        user: &str,
        rating: Option<Rating>,
    ) -> Result<CompletionOutcome> {
        let book = self.find(isbn)?;
        if book.has_completed(user) {
            debug!(isbn = %book.isbn, user, "Already completed");
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let key = book.isbn.clone();
        self.commit(&key, |book| {
            book.completions.push(user.to_string());
            if let Some(rating) = rating {
                book.ratings.insert(user.to_string(), rating);
            }
        })?;

        info!(
            isbn = %key,
            user,
            rating = ?rating.map(Rating::value),
            "Recorded completion"
        );
        Ok(CompletionOutcome::Recorded)
    }

    /// Set or replace `user`'s rating. Only users who finished the book may rate it.
    pub fn set_rating(&mut self, isbn: &str, user: &str, rating: Rating) -> Result<&Book> {
        let book = self.find(isbn)?;
        if !book.has_completed(user) {
            return Err(LibrarianError::NotCompleted {
                isbn: book.isbn.clone(),
                user: user.to_string(),
            });
        }

        let key = book.isbn.clone();
        self.commit(&key, |book| book.ratings.insert(user.to_string(), rating))?;

        info!(isbn = %key, user, rating = rating.value(), "Recorded rating");
        self.require(&key)
    }

    /// Apply `change` to one book and flush, undoing the change if the flush fails
    fn commit<T>(&mut self, key: &str, change: impl FnOnce(&mut Book) -> T) -> Result<T> {
        let book = self
            .document
            .books
            .get_mut(key)
            .ok_or_else(|| LibrarianError::NotFound(key.to_string()))?;

        let snapshot = book.clone();
        let outcome = change(book);

        if let Err(e) = self.flush() {
            warn!("Rolling back change to {}: {}", key, e);
            self.document.books.insert(key.to_string(), snapshot);
            return Err(e);
        }
        Ok(outcome)
    }

    fn require(&self, key: &str) -> Result<&Book> {
        self.document
            .books
            .get(key)
            .ok_or_else(|| LibrarianError::NotFound(key.to_string()))
    }
}

/// Normalize an identifier and insist that it validates
fn accept_isbn(raw: &str) -> Result<String> {
    let isbn = validation::normalize(raw);
    if validation::classify_and_validate(&isbn)? {
        Ok(isbn)
    } else {
        Err(LibrarianError::InvalidChecksum(isbn))
    }
}
