//! An API client that queries a MediaWiki `api.php` endpoint.

use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    StatusCode, Url,
};
use wikiseek_settings::ApiSettings;

use crate::wire::{ApiResponse, Pages, QueryBlock};
use crate::{ApiError, ArticleDetail, PageId, SearchResultSummary, SetupError, WikiApi};

/// The kinds of request the client makes. Used to label logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// A full search, `generator=search`.
    Search,
    /// A short search while typing, `list=search`.
    Suggest,
    /// A single page by id.
    Article,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestKind::Search => "search",
            RequestKind::Suggest => "suggest",
            RequestKind::Article => "article",
        })
    }
}

/// A [`WikiApi`] backed by a MediaWiki installation, such as Wikipedia.
pub struct MediaWikiClient {
    /// The HTTP client to query the endpoint with.
    client: reqwest::Client,

    /// The `api.php` endpoint.
    endpoint: Url,

    /// Pause taken before each full search.
    search_delay: Duration,

    /// Maximum number of pages a full search asks for.
    search_limit: u32,

    /// Thumbnail width for search results.
    search_thumbnail_size: u32,

    /// Thumbnail width for articles.
    article_thumbnail_size: u32,
}

impl MediaWikiClient {
    /// Create a client from settings.
    ///
    /// # Errors
    /// If the endpoint is not a valid URL, or the HTTP client cannot be built.
    pub fn new(settings: &ApiSettings) -> Result<Self, SetupError> {
        let endpoint = Url::parse(&settings.endpoint)
            .with_context(|| format!("parsing API endpoint {:?}", settings.endpoint))
            .map_err(SetupError::InvalidConfiguration)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Unable to create the Reqwest client")
            .map_err(SetupError::Network)?;

        Ok(Self {
            client,
            endpoint,
            search_delay: settings.search_delay,
            search_limit: settings.search_limit,
            search_thumbnail_size: settings.search_thumbnail_size,
            article_thumbnail_size: settings.article_thumbnail_size,
        })
    }

    /// Run an `action=query` request and unwrap its `query` block.
    ///
    /// HTTP 429 is always [`ApiError::RateLimited`]. An `error` payload is
    /// [`ApiError::Upstream`] whatever the status was.
    async fn query(
        &self,
        kind: RequestKind,
        params: &[(&str, String)],
    ) -> Result<QueryBlock, ApiError> {
        tracing::debug!(r#type = "wikiseek.api", %kind, ?params, "Querying encyclopedia");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("action", "query"), ("format", "json")])
            .query(params)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(r#type = "wikiseek.api", %kind, "Rate limited by the encyclopedia");
            return Err(ApiError::RateLimited);
        }

        let body = response.bytes().await.map_err(ApiError::from_transport)?;
        let parsed = match serde_json::from_slice::<ApiResponse>(&body) {
            Ok(ApiResponse {
                error: Some(error), ..
            }) => {
                tracing::warn!(r#type = "wikiseek.api", %kind, code = %error.code, "Upstream error");
                return Err(ApiError::Upstream {
                    code: error.code,
                    info: error.info,
                });
            }
            parsed => parsed,
        };

        if !status.is_success() {
            return Err(ApiError::Network(anyhow!(
                "the encyclopedia responded with status {}",
                status
            )));
        }

        let parsed = parsed
            .context("decoding the API response")
            .map_err(ApiError::Format)?;
        Ok(parsed.query.unwrap_or_default())
    }
}

#[async_trait]
impl WikiApi for MediaWikiClient {
    fn name(&self) -> String {
        format!("MediaWikiClient({})", self.endpoint)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, ApiError> {
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }

        let block = self
            .query(
                RequestKind::Search,
                &[
                    ("generator", "search".to_string()),
                    ("gsrsearch", query.to_string()),
                    ("gsrlimit", self.search_limit.to_string()),
                    ("prop", "pageimages|extracts".to_string()),
                    ("exintro", "1".to_string()),
                    ("explaintext", "1".to_string()),
                    ("exlimit", "max".to_string()),
                    ("piprop", "thumbnail".to_string()),
                    ("pithumbsize", self.search_thumbnail_size.to_string()),
                ],
            )
            .await?;

        Ok(block.pages.map(Pages::into_summaries).unwrap_or_default())
    }

    async fn suggest(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultSummary>, ApiError> {
        let block = self
            .query(
                RequestKind::Suggest,
                &[
                    ("list", "search".to_string()),
                    ("srsearch", query.to_string()),
                    ("srlimit", limit.to_string()),
                    ("srprop", "snippet".to_string()),
                ],
            )
            .await?;

        Ok(block
            .search
            .into_iter()
            .take(limit)
            .map(SearchResultSummary::from)
            .collect())
    }

    async fn fetch_article(&self, id: PageId) -> Result<ArticleDetail, ApiError> {
        let block = self
            .query(
                RequestKind::Article,
                &[
                    ("prop", "extracts|pageimages|info".to_string()),
                    ("pageids", id.to_string()),
                    ("pithumbsize", self.article_thumbnail_size.to_string()),
                    ("inprop", "url".to_string()),
                    ("redirects", "1".to_string()),
                    ("exintro", "1".to_string()),
                    ("explaintext", "1".to_string()),
                ],
            )
            .await?;

        let page = block
            .pages
            .and_then(|pages| pages.take(id))
            .ok_or(ApiError::NotFound(id))?;
        if page.is_absent() {
            return Err(ApiError::NotFound(id));
        }
        Ok(page.into_article(id))
    }
}
