//! The session controller: owns what was searched and what came back, and
//! decides which requests may run.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use tokio::sync::{RwLock, RwLockReadGuard};
use wikiseek_api::{ApiError, ArticleDetail, PageId, SearchResultSummary, WikiApi};
use wikiseek_settings::SessionSettings;

use crate::presenter::{EventSink, Presenter};
use crate::validator::{validate, Query, ValidationError};

/// The outcome of the most recent full search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The query that produced `last_results`. Empty before the first search.
    pub last_query: String,

    /// The results of the last successful search, in display order.
    pub last_results: Vec<SearchResultSummary>,
}

impl SessionState {
    /// Whether a search has completed yet.
    pub fn has_results(&self) -> bool {
        !self.last_query.is_empty()
    }
}

/// What happened to a user-initiated action.
#[derive(Debug)]
pub enum Outcome {
    /// The action ran and its result was shown.
    Completed,
    /// The input did not pass validation. Nothing was sent.
    Rejected(ValidationError),
    /// Another request held the lane, or a newer request superseded this one.
    Dropped,
    /// The request failed.
    Failed(ApiError),
}

/// Holds the primary lane for as long as it lives.
///
/// Acquiring marks the presenter busy, dropping releases the lane and clears
/// the busy marker, on every exit path.
struct PrimaryLane<'a> {
    /// The flag this guard set.
    busy: &'a AtomicBool,
    /// Told when the lane is taken and released.
    presenter: &'a dyn Presenter,
}

impl<'a> PrimaryLane<'a> {
    /// Take the lane, or return `None` if it is already taken.
    fn acquire(busy: &'a AtomicBool, presenter: &'a dyn Presenter) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        presenter.set_busy(true);
        Some(Self { busy, presenter })
    }
}

impl Drop for PrimaryLane<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        self.presenter.set_busy(false);
    }
}

/// Sequences validation, API requests and rendering for one search session.
///
/// Full searches and article fetches share the primary lane: while one runs,
/// new requests for either are dropped. Suggestions run on their own lane and
/// only the most recently issued one may render.
pub struct SessionController {
    /// Where pages come from.
    api: Arc<dyn WikiApi>,

    /// Where results go.
    presenter: Arc<dyn Presenter>,

    /// Handed to the presenter for clickable results.
    events: EventSink,

    /// How many suggestions to ask for.
    suggest_limit: usize,

    /// The last search and its results.
    state: RwLock<SessionState>,

    /// Set while a search or article fetch runs.
    primary_busy: AtomicBool,

    /// Bumped by every suggestion request and every full search.
    suggestion_generation: AtomicU64,
}

impl SessionController {
    /// Create a controller with an empty session.
    pub fn new(
        api: Arc<dyn WikiApi>,
        presenter: Arc<dyn Presenter>,
        events: EventSink,
        settings: &SessionSettings,
    ) -> Self {
        Self {
            api,
            presenter,
            events,
            suggest_limit: settings.suggest_limit,
            state: RwLock::new(SessionState::default()),
            primary_busy: AtomicBool::new(false),
            suggestion_generation: AtomicU64::new(0),
        }
    }

    /// Whether a search or article fetch is running.
    pub fn in_flight(&self) -> bool {
        self.primary_busy.load(Ordering::Acquire)
    }

    /// Read the session state.
    pub async fn state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    /// The user edited the query. Any earlier complaint about it is stale.
    pub fn input_changed(&self) {
        self.presenter.clear_input_error();
    }

    /// Validate `raw` and run a full search for it.
    pub async fn submit(&self, raw: &str) -> Outcome {
        let query = match self.check(raw) {
            Ok(query) => query,
            Err(reason) => return Outcome::Rejected(reason),
        };

        let Some(_lane) = PrimaryLane::acquire(&self.primary_busy, &*self.presenter) else {
            tracing::debug!(%query, "Search already in flight, dropping submit");
            return Outcome::Dropped;
        };
        self.dismiss_suggestions();

        match self.api.search(query.as_str()).await {
            Ok(results) => {
                tracing::info!(%query, count = results.len(), "Search completed");
                let mut state = self.state.write().await;
                *state = SessionState {
                    last_query: query.into_string(),
                    last_results: results,
                };
                self.presenter
                    .display_results(&state.last_results, &state.last_query, &self.events);
                Outcome::Completed
            }
            Err(error) => {
                tracing::warn!(%query, %error, "Search failed");
                self.presenter.display_error(&error.to_string());
                Outcome::Failed(error)
            }
        }
    }

    /// Fetch suggestions for `raw` and show them, unless a newer suggestion
    /// request or a full search has been issued in the meantime.
    ///
    /// Suggestion failures only hide the dropdown; they are never shown as
    /// errors.
    pub async fn suggest(&self, raw: &str) -> Outcome {
        let generation = self.suggestion_generation.fetch_add(1, Ordering::AcqRel) + 1;

        let query = match validate(raw) {
            Ok(query) => query,
            Err(reason) => {
                self.presenter.hide_suggestions();
                return Outcome::Rejected(reason);
            }
        };

        let response = self.api.suggest(query.as_str(), self.suggest_limit).await;

        if self.suggestion_generation.load(Ordering::Acquire) != generation {
            tracing::debug!(%query, "Dropping stale suggestions");
            return Outcome::Dropped;
        }

        match response {
            Ok(suggestions) if suggestions.is_empty() => {
                self.presenter.hide_suggestions();
                Outcome::Completed
            }
            Ok(suggestions) => {
                self.presenter.show_suggestions(&suggestions, &self.events);
                Outcome::Completed
            }
            Err(error) => {
                tracing::warn!(%query, %error, "Suggestions failed");
                self.presenter.hide_suggestions();
                Outcome::Failed(error)
            }
        }
    }

    /// Fetch the article `id` on the primary lane.
    ///
    /// Returns `Ok(None)` without calling the API if the lane is taken.
    /// Rendering, and recovering from errors, is left to the caller.
    pub async fn fetch_article(&self, id: PageId) -> Result<Option<ArticleDetail>, ApiError> {
        let Some(_lane) = PrimaryLane::acquire(&self.primary_busy, &*self.presenter) else {
            tracing::debug!(id, "Request already in flight, dropping article fetch");
            return Ok(None);
        };
        self.dismiss_suggestions();

        match self.api.fetch_article(id).await {
            Ok(detail) => Ok(Some(detail)),
            Err(error) => {
                tracing::warn!(id, %error, "Article fetch failed");
                Err(error)
            }
        }
    }

    /// Run the validator and report its verdict on the input field.
    fn check(&self, raw: &str) -> Result<Query, ValidationError> {
        match validate(raw) {
            Ok(query) => {
                self.presenter.clear_input_error();
                Ok(query)
            }
            Err(reason) => {
                tracing::debug!(%reason, "Rejected search input");
                self.presenter.show_input_error(&reason.to_string());
                Err(reason)
            }
        }
    }

    /// Hide the dropdown and make any suggestion still in flight stale.
    fn dismiss_suggestions(&self) {
        self.suggestion_generation.fetch_add(1, Ordering::AcqRel);
        self.presenter.hide_suggestions();
    }
}
