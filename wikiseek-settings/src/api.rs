//! Settings for the encyclopedia API client and the search session.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Settings for the MediaWiki API client.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// The `api.php` endpoint to query, such as
    /// `https://en.wikipedia.org/w/api.php`.
    pub endpoint: String,

    /// The longest a single request may take before it is reported as timed out.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "timeout_ms")]
    pub timeout: Duration,

    /// The longest to wait for a connection to the endpoint to be established.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "connect_timeout_ms")]
    pub connect_timeout: Duration,

    /// A fixed pause taken before every full search, to stay under the
    /// upstream service's informal rate limit. Suggestions and article
    /// fetches are not delayed.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "search_delay_ms")]
    pub search_delay: Duration,

    /// The maximum number of pages a full search returns.
    pub search_limit: u32,

    /// The width in pixels requested for thumbnails in search results.
    pub search_thumbnail_size: u32,

    /// The width in pixels requested for the thumbnail of an article.
    pub article_thumbnail_size: u32,

    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            search_delay: Duration::from_millis(1000),
            search_limit: 20,
            search_thumbnail_size: 200,
            article_thumbnail_size: 400,
            user_agent: concat!("wikiseek/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Settings for the interactive search session.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long input must stay idle before suggestions are fetched.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "debounce_ms")]
    pub debounce: Duration,

    /// The number of suggestions to show under the search field.
    pub suggest_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            suggest_limit: 3,
        }
    }
}
