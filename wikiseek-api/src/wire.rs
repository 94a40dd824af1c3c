//! The shapes of MediaWiki `action=query` responses, and their conversion
//! into domain types.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{ArticleDetail, PageId, SearchResultSummary, Thumbnail};

lazy_static! {
    /// Matches any markup tag, such as the `<span class="searchmatch">`
    /// highlights in search snippets.
    static ref MARKUP: Regex = Regex::new(r"<[^>]*>").expect("markup pattern is valid");
}

/// The top level of every response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    /// Present when the query produced anything at all.
    #[serde(default)]
    pub query: Option<QueryBlock>,

    /// Present when the service rejected the request.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// An error reported inside an otherwise successful response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    /// Machine readable error code.
    #[serde(default)]
    pub code: String,

    /// Human readable explanation.
    #[serde(default)]
    pub info: String,
}

/// The `query` member of a response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryBlock {
    /// Hits from `list=search`, in relevance order.
    #[serde(default)]
    pub search: Vec<SearchHit>,

    /// Pages from `generator=` or `pageids=` queries.
    #[serde(default)]
    pub pages: Option<Pages>,
}

/// Pages come keyed by id in format version 1 and as a list in version 2.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Pages {
    /// An unordered mapping of page id (as a string) to page.
    Keyed(HashMap<String, Page>),
    /// A list of pages, already in the order the service intended.
    Listed(Vec<Page>),
}

impl Pages {
    /// Convert to summaries. Keyed pages are sorted ascending by id so output
    /// does not depend on map iteration order; listed pages keep their order.
    pub fn into_summaries(self) -> Vec<SearchResultSummary> {
        match self {
            Pages::Keyed(map) => {
                let mut summaries: Vec<SearchResultSummary> =
                    map.into_values().filter_map(Page::into_summary).collect();
                summaries.sort_by_key(|summary| summary.id);
                summaries
            }
            Pages::Listed(list) => list.into_iter().filter_map(Page::into_summary).collect(),
        }
    }

    /// Remove the page for `id`. Redirects resolve to a page with a different
    /// id, so a response holding exactly one page is taken as the answer.
    pub fn take(self, id: PageId) -> Option<Page> {
        let mut pages = match self {
            Pages::Keyed(mut map) => {
                if let Some(page) = map.remove(&id.to_string()) {
                    return Some(page);
                }
                map.into_values().collect::<Vec<_>>()
            }
            Pages::Listed(list) => list,
        };

        match pages.iter().position(|page| page.pageid == Some(id)) {
            Some(idx) => Some(pages.swap_remove(idx)),
            None if pages.len() == 1 => pages.pop(),
            None => None,
        }
    }
}

/// A single page record.
#[derive(Debug, Deserialize)]
pub(crate) struct Page {
    /// Missing pages have no id.
    #[serde(default)]
    pub pageid: Option<PageId>,

    /// Page title.
    #[serde(default)]
    pub title: String,

    /// Plain text introduction, when `prop=extracts` was requested.
    #[serde(default)]
    pub extract: Option<String>,

    /// Preview image, when `prop=pageimages` was requested.
    #[serde(default)]
    pub thumbnail: Option<RawThumbnail>,

    /// Canonical URL, when `inprop=url` was requested.
    #[serde(default)]
    pub fullurl: Option<String>,

    /// Set when the page does not exist.
    #[serde(default, deserialize_with = "marker")]
    pub missing: bool,

    /// Set when the requested id or title is not valid.
    #[serde(default, deserialize_with = "marker")]
    pub invalid: bool,
}

impl Page {
    /// Whether this record stands for a page that can't be shown.
    pub fn is_absent(&self) -> bool {
        self.missing || self.invalid
    }

    /// Convert to a summary, skipping records without an id.
    fn into_summary(self) -> Option<SearchResultSummary> {
        if self.is_absent() {
            return None;
        }
        Some(SearchResultSummary {
            id: self.pageid?,
            title: self.title,
            snippet: self.extract.unwrap_or_default(),
            thumbnail: self.thumbnail.and_then(RawThumbnail::into_thumbnail),
        })
    }

    /// Convert to an article. `requested` is used when the record has no id.
    pub fn into_article(self, requested: PageId) -> ArticleDetail {
        ArticleDetail {
            id: self.pageid.unwrap_or(requested),
            title: self.title,
            full_extract: self.extract.unwrap_or_default(),
            thumbnail: self.thumbnail.and_then(RawThumbnail::into_thumbnail),
            canonical_url: self.fullurl,
        }
    }
}

/// A thumbnail as the service describes it.
#[derive(Debug, Deserialize)]
pub(crate) struct RawThumbnail {
    /// Image URL. A thumbnail without one is dropped, not the whole page.
    #[serde(default)]
    source: Option<String>,
    /// Width in pixels.
    #[serde(default)]
    width: u32,
    /// Height in pixels.
    #[serde(default)]
    height: u32,
}

impl RawThumbnail {
    /// Convert to a [`Thumbnail`], if there is an image to show.
    fn into_thumbnail(self) -> Option<Thumbnail> {
        let url = self.source.filter(|source| !source.is_empty())?;
        Some(Thumbnail {
            url,
            width: self.width,
            height: self.height,
        })
    }
}

/// One hit from `list=search`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    /// Page id.
    pageid: PageId,
    /// Page title.
    title: String,
    /// Snippet with search-match markup.
    #[serde(default)]
    snippet: String,
}

impl From<SearchHit> for SearchResultSummary {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.pageid,
            title: hit.title,
            snippet: strip_markup(&hit.snippet),
            thumbnail: None,
        }
    }
}

/// Existence markers are `""` in format version 1 and booleans in version 2.
fn marker<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Null => false,
        _ => true,
    })
}

/// Remove markup tags and decode the entities the search API emits.
pub(crate) fn strip_markup(snippet: &str) -> String {
    MARKUP
        .replace_all(snippet, "")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
