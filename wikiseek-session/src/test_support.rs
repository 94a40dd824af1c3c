//! Test doubles for the API and the presenter.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use fake::{Fake, Faker};
use wikiseek_api::{ApiError, ArticleDetail, PageId, SearchResultSummary, WikiApi};

use crate::presenter::{EventSink, Presenter};

/// An in-memory [`WikiApi`] that records what it was asked.
#[derive(Default)]
pub struct FakeApi {
    results: Vec<SearchResultSummary>,
    suggestions: Vec<SearchResultSummary>,
    articles: HashMap<PageId, ArticleDetail>,
    delay: Option<Duration>,
    search_failure: Option<fn() -> ApiError>,
    suggest_failure: Option<fn() -> ApiError>,

    searched: Mutex<Vec<String>>,
    suggest_limits: Mutex<Vec<usize>>,
    article_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_results(mut self, results: Vec<SearchResultSummary>) -> Self {
        self.results = results;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<SearchResultSummary>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Make a fake article with this id available.
    pub fn with_article(mut self, id: PageId) -> Self {
        self.articles.insert(id, ArticleDetail { id, ..Faker.fake() });
        self
    }

    /// Make every call take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_searches_with(mut self, error: fn() -> ApiError) -> Self {
        self.search_failure = Some(error);
        self
    }

    pub fn failing_suggestions_with(mut self, error: fn() -> ApiError) -> Self {
        self.suggest_failure = Some(error);
        self
    }

    pub fn results(&self) -> Vec<SearchResultSummary> {
        self.results.clone()
    }

    pub fn article(&self, id: PageId) -> Option<ArticleDetail> {
        self.articles.get(&id).cloned()
    }

    /// The queries passed to `search`, in call order.
    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().expect("lock is not poisoned").clone()
    }

    pub fn search_calls(&self) -> usize {
        self.searched().len()
    }

    /// The limits passed to `suggest`, in call order.
    pub fn suggest_limits(&self) -> Vec<usize> {
        self.suggest_limits.lock().expect("lock is not poisoned").clone()
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_limits().len()
    }

    pub fn article_calls(&self) -> usize {
        self.article_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl WikiApi for FakeApi {
    fn name(&self) -> String {
        "FakeApi".to_string()
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, ApiError> {
        self.searched
            .lock()
            .expect("lock is not poisoned")
            .push(query.to_string());
        self.wait().await;
        match self.search_failure {
            Some(error) => Err(error()),
            None => Ok(self.results.clone()),
        }
    }

    async fn suggest(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultSummary>, ApiError> {
        self.suggest_limits
            .lock()
            .expect("lock is not poisoned")
            .push(limit);
        self.wait().await;
        match self.suggest_failure {
            Some(error) => Err(error()),
            None => Ok(self.suggestions.iter().take(limit).cloned().collect()),
        }
    }

    async fn fetch_article(&self, id: PageId) -> Result<ArticleDetail, ApiError> {
        self.article_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.article(id).ok_or(ApiError::NotFound(id))
    }
}

/// One call made on a [`RecordingPresenter`]. Results are recorded by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ShowSuggestions(Vec<PageId>),
    HideSuggestions,
    DisplayResults { ids: Vec<PageId>, query: String },
    DisplayError(String),
    DisplayArticle(PageId),
    SetBusy(bool),
    ShowInputError(String),
    ClearInputError,
}

/// A [`Presenter`] that remembers every call made on it.
#[derive(Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<Call>>,
}

impl RecordingPresenter {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock is not poisoned").clone()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("lock is not poisoned").clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock is not poisoned").push(call);
    }
}

fn ids(summaries: &[SearchResultSummary]) -> Vec<PageId> {
    summaries.iter().map(|summary| summary.id).collect()
}

impl Presenter for RecordingPresenter {
    fn show_suggestions(&self, suggestions: &[SearchResultSummary], _on_select: &EventSink) {
        self.record(Call::ShowSuggestions(ids(suggestions)));
    }

    fn hide_suggestions(&self) {
        self.record(Call::HideSuggestions);
    }

    fn display_results(&self, results: &[SearchResultSummary], query: &str, _on_select: &EventSink) {
        self.record(Call::DisplayResults {
            ids: ids(results),
            query: query.to_string(),
        });
    }

    fn display_error(&self, message: &str) {
        self.record(Call::DisplayError(message.to_string()));
    }

    fn display_article(&self, detail: &ArticleDetail, _on_back: &EventSink) {
        self.record(Call::DisplayArticle(detail.id));
    }

    fn set_busy(&self, busy: bool) {
        self.record(Call::SetBusy(busy));
    }

    fn show_input_error(&self, message: &str) {
        self.record(Call::ShowInputError(message.to_string()));
    }

    fn clear_input_error(&self) {
        self.record(Call::ClearInputError);
    }
}
