//! Checks on what the user typed before it is sent anywhere.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// The shortest query, in characters, that is worth searching for.
pub const MIN_QUERY_CHARS: usize = 3;

lazy_static! {
    /// Letters of any script (with their combining accents), digits and whitespace.
    static ref ALLOWED: Regex =
        Regex::new(r"^[\p{L}\p{M}\p{N}\s]*$").expect("allow-list pattern is valid");
}

/// A trimmed query that passed validation. Only [`validate`] creates these.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// The query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the query text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a query was rejected. The `Display` text is shown next to the input.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The text has punctuation, symbols or control characters.
    #[error("Input contains invalid or meaningless characters")]
    InvalidCharacters,

    /// Nothing but whitespace was typed.
    #[error("Please enter a search term")]
    Empty,

    /// Fewer than [`MIN_QUERY_CHARS`] characters were typed.
    #[error("Search term must be at least 3 characters long")]
    TooShort,
}

/// Validate raw input.
///
/// Checks run in a fixed order and the first failure wins: allowed characters,
/// then emptiness, then length. Length counts characters, not bytes.
pub fn validate(raw: &str) -> Result<Query, ValidationError> {
    let trimmed = raw.trim();

    if !ALLOWED.is_match(trimmed) {
        return Err(ValidationError::InvalidCharacters);
    }
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Err(ValidationError::TooShort);
    }

    Ok(Query(trimmed.to_string()))
}
