//! Identifier and rating validation
//!
//! Malformed input (wrong length, stray characters) is reported through
//! [`IsbnError`]. A well-formed identifier whose check digit is wrong is not an
//! error: [`classify_and_validate`] answers `Ok(false)` and leaves the decision
//! to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shape problems with a candidate ISBN
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    #[error("Input isn't 10 or 13 numbers long (got {0})")]
    Length(usize),

    #[error("Input contains non-integer: {0:?}")]
    NonNumeric(char),
}

/// Which checksum scheme an identifier falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

impl fmt::Display for IsbnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsbnKind::Isbn10 => write!(f, "ISBN-10"),
            IsbnKind::Isbn13 => write!(f, "ISBN-13"),
        }
    }
}

/// Remove every hyphen from the identifier
pub fn strip_hyphens(id: &str) -> String {
    id.chars().filter(|c| *c != '-').collect()
}

/// Classify by length alone, after hyphen stripping
pub fn classify(id: &str) -> Result<IsbnKind, IsbnError> {
    match strip_hyphens(id).chars().count() {
        10 => Ok(IsbnKind::Isbn10),
        13 => Ok(IsbnKind::Isbn13),
        other => Err(IsbnError::Length(other)),
    }
}

/// Check the identifier's check digit.
///
/// Returns `Ok(true)` for a valid ISBN, `Ok(false)` when the checksum does not
/// hold, and an error when the input is not shaped like an ISBN at all.
pub fn classify_and_validate(id: &str) -> Result<bool, IsbnError> {
    let stripped = strip_hyphens(id);
    match classify(&stripped)? {
        IsbnKind::Isbn13 => isbn13_checksum(&stripped).map(|total| total % 10 == 0),
        IsbnKind::Isbn10 => isbn10_checksum(&stripped).map(|total| total % 11 == 0),
    }
}

fn digit(c: char) -> Result<u32, IsbnError> {
    c.to_digit(10).ok_or(IsbnError::NonNumeric(c))
}

fn isbn13_checksum(stripped: &str) -> Result<u32, IsbnError> {
    stripped
        .chars()
        .enumerate()
        .try_fold(0u32, |total, (position, c)| -> Result<u32, IsbnError> {
            let weight = if position % 2 == 0 { 1 } else { 3 };
            Ok(total + digit(c)? * weight)
        })
}

fn isbn10_checksum(stripped: &str) -> Result<u32, IsbnError> {
    let chars: Vec<char> = stripped.chars().collect();
    let (check, body) = chars.split_last().ok_or(IsbnError::Length(0))?;

    let check_value = match check {
        'x' | 'X' => 10,
        other => digit(*other)?,
    };

    let body_total = body
        .iter()
        .enumerate()
        .try_fold(0u32, |total, (index, c)| -> Result<u32, IsbnError> {
            Ok(total + digit(*c)? * (index as u32 + 1))
        })?;

    Ok(body_total + check_value * 10)
}

/// Canonical storage form: hyphens removed, check character upper-cased
pub fn normalize(id: &str) -> String {
    strip_hyphens(id.trim()).to_ascii_uppercase()
}

/// Whether a lookup token should be treated as an identifier rather than a title.
///
/// Digits and hyphens only, optionally ending in an `x`/`X` check character.
pub fn looks_like_isbn(token: &str) -> bool {
    let stripped = strip_hyphens(token.trim());
    let body = stripped
        .strip_suffix(|c: char| c == 'x' || c == 'X')
        .unwrap_or(stripped.as_str());

    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}

/// Convert a valid identifier to its 13-digit form.
///
/// ISBN-13 input is returned normalized. ISBN-10 input gains the `978` prefix
/// and a recomputed check digit. `Ok(None)` means the checksum does not hold.
pub fn to_isbn13(id: &str) -> Result<Option<String>, IsbnError> {
    if !classify_and_validate(id)? {
        return Ok(None);
    }

    let stripped = normalize(id);
    if classify(&stripped)? == IsbnKind::Isbn13 {
        return Ok(Some(stripped));
    }

    let mut converted = String::with_capacity(13);
    converted.push_str("978");
    converted.push_str(&stripped[..9]);

    let partial = isbn13_checksum(&converted)?;
    let check = (10 - partial % 10) % 10;
    converted.push_str(&check.to_string());

    Ok(Some(converted))
}

/// A user's score for a book, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as i64)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("That rating doesn't look right! A rating can only be a whole number from 1 to 10.")]
    NotANumber(String),

    #[error("A rating can only be a whole number from 1 to 10 (got {0}).")]
    OutOfRange(i64),
}

/// Parse a rating argument. An empty argument means no rating was supplied.
pub fn parse_rating(raw: &str) -> Result<Option<Rating>, RatingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: i64 = raw
        .parse()
        .map_err(|_| RatingError::NotANumber(raw.to_string()))?;

    Rating::new(value).map(Some)
}
