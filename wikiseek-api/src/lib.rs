#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A client for the encyclopedia API that backs Wikiseek.
//!
//! The [`WikiApi`] trait is the seam the rest of the workspace talks to. The
//! production implementation, [`MediaWikiClient`], speaks the MediaWiki
//! `api.php` query protocol over HTTPS and normalizes the many shapes its
//! responses come in (keyed or listed pages, missing markers, wrapped error
//! payloads, rate limiting) into the types in this crate.

mod domain;
mod mediawiki;
mod wire;

use async_trait::async_trait;
use thiserror::Error;

pub use crate::domain::{ArticleDetail, PageId, SearchResultSummary, Thumbnail};
pub use crate::mediawiki::{MediaWikiClient, RequestKind};

/// Message reported when the upstream service rate limits us.
pub const RATE_LIMIT_MESSAGE: &str =
    "Rate limit exceeded. Please wait a moment before trying again.";

/// Message reported when a request exceeds its deadline.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your internet connection.";

/// A source of encyclopedia pages.
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// An operator-visible name for this API client.
    fn name(&self) -> String;

    /// Run a full-text search for `query`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, ApiError>;

    /// Fetch at most `limit` lightweight matches for `query`, to show while
    /// the user is still typing.
    async fn suggest(&self, query: &str, limit: usize)
        -> Result<Vec<SearchResultSummary>, ApiError>;

    /// Fetch a single article by its page id.
    async fn fetch_article(&self, id: PageId) -> Result<ArticleDetail, ApiError>;
}

/// Errors that may occur while setting up an API client.
#[derive(Debug, Error)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub enum SetupError {
    #[error("The API client cannot be used with the current Wikiseek configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    #[error("There was a network error while setting up the API client")]
    Network(#[source] anyhow::Error),
}

/// Errors that may occur while querying the encyclopedia.
///
/// The `Display` text of each variant is meant to be shown to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service could not be reached, or answered with an unexpected status.
    #[error("There was a network error while contacting the encyclopedia: {0}")]
    Network(#[source] anyhow::Error),

    /// The request did not complete before its deadline.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// The service answered with HTTP 429.
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    /// The service answered, but the payload reported an error.
    #[error("{info}")]
    Upstream {
        /// The machine readable error code, such as `badvalue`.
        code: String,
        /// The human readable explanation sent by the service.
        info: String,
    },

    /// The requested page does not exist.
    #[error("Article not found")]
    NotFound(PageId),

    /// The service answered with a body that could not be understood.
    #[error("The encyclopedia returned data in an unexpected format")]
    Format(#[source] anyhow::Error),
}

impl ApiError {
    /// Classify a transport level failure from the HTTP client.
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(anyhow::Error::new(error).context("Couldn't reach the encyclopedia"))
        }
    }
}
