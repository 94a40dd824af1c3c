//! Datatypes that represent encyclopedia pages the way the rest of Wikiseek
//! sees them.

use fake::{
    faker::lorem::en::{Paragraph, Sentence, Words},
    Fake, Faker,
};
use lazy_static::lazy_static;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// The identifier of a page. Unique per encyclopedia page.
pub type PageId = u64;

lazy_static! {
    /// Where articles without a canonical URL are linked to.
    static ref ARTICLE_BASE: Url =
        Url::parse("https://en.wikipedia.org/wiki/").expect("article base URL is valid");
}

/// A preview image for a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Where the image can be downloaded from.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl<F> fake::Dummy<F> for Thumbnail {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &F, rng: &mut R) -> Self {
        Self {
            url: format!(
                "https://upload.wikimedia.org/fake/{}.jpg",
                Words(1..3).fake_with_rng::<Vec<String>, R>(rng).join("_")
            ),
            width: rng.gen_range(50..400),
            height: rng.gen_range(50..400),
        }
    }
}

/// A lightweight search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSummary {
    /// The page this result points at.
    pub id: PageId,
    /// The title to display to the user.
    pub title: String,
    /// A short plain-text excerpt of the page.
    pub snippet: String,
    /// A preview image, if the page has one.
    pub thumbnail: Option<Thumbnail>,
}

impl<F> fake::Dummy<F> for SearchResultSummary {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &F, rng: &mut R) -> Self {
        Self {
            id: rng.gen_range(1..100_000_000),
            title: Words(1..4).fake_with_rng::<Vec<String>, R>(rng).join(" "),
            snippet: Sentence(4..12).fake_with_rng(rng),
            thumbnail: if rng.gen_bool(0.5) {
                Some(Faker.fake_with_rng(rng))
            } else {
                None
            },
        }
    }
}

/// A full article, fetched on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    /// The page id of the article.
    pub id: PageId,
    /// The human readable title.
    pub title: String,
    /// The plain text introduction of the article.
    pub full_extract: String,
    /// A preview image, if the page has one.
    pub thumbnail: Option<Thumbnail>,
    /// The canonical location of the article, if the service reported one.
    pub canonical_url: Option<String>,
}

impl ArticleDetail {
    /// A link to read the full article.
    ///
    /// Falls back to a link built from the title when the service did not
    /// report a canonical URL.
    pub fn link(&self) -> String {
        if let Some(url) = &self.canonical_url {
            return url.clone();
        }

        let mut url = ARTICLE_BASE.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.title.replace(' ', "_"));
        }
        url.to_string()
    }
}

impl<F> fake::Dummy<F> for ArticleDetail {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &F, rng: &mut R) -> Self {
        Self {
            id: rng.gen_range(1..100_000_000),
            title: Words(1..4).fake_with_rng::<Vec<String>, R>(rng).join(" "),
            full_extract: Paragraph(2..6).fake_with_rng(rng),
            thumbnail: if rng.gen_bool(0.5) {
                Some(Faker.fake_with_rng(rng))
            } else {
                None
            },
            canonical_url: None,
        }
    }
}
