//! Switching between the result list and a single article.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::sync::Mutex;
use wikiseek_api::PageId;

use crate::controller::{Outcome, SessionController};
use crate::presenter::{EventSink, Presenter};

/// Which view is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// The results of the last search.
    #[default]
    List,
    /// A single article.
    Detail {
        /// The page being shown.
        id: PageId,
    },
}

impl Route {
    /// Resolve a path. Anything that isn't a well formed article path is the
    /// list.
    pub fn resolve(path: &str) -> Self {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        path.strip_prefix("/article/")
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|id| id.parse::<PageId>().ok())
            .filter(|&id| id > 0)
            .map_or(Self::List, |id| Self::Detail { id })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("/"),
            Self::Detail { id } => write!(f, "/article/{}", id),
        }
    }
}

/// Renders the current route, fetching articles through the controller.
pub struct Router {
    /// Runs the article fetches and remembers the result list.
    controller: Arc<SessionController>,

    /// Where views are drawn.
    presenter: Arc<dyn Presenter>,

    /// Handed to the article view for its back action.
    events: EventSink,

    /// The view that is showing.
    current: Mutex<Route>,

    /// Bumped whenever the list replaces the view. An article that arrives
    /// after that is stale.
    list_generation: AtomicU64,
}

impl Router {
    /// Create a router showing the list.
    pub fn new(
        controller: Arc<SessionController>,
        presenter: Arc<dyn Presenter>,
        events: EventSink,
    ) -> Self {
        Self {
            controller,
            presenter,
            events,
            current: Mutex::new(Route::List),
            list_generation: AtomicU64::new(0),
        }
    }

    /// The view that is showing.
    pub async fn current(&self) -> Route {
        *self.current.lock().await
    }

    /// Resolve `path` and go there.
    pub async fn navigate_to(&self, path: &str) -> Route {
        self.navigate(Route::resolve(path)).await
    }

    /// Show `route` and return the route that ends up showing.
    ///
    /// Going to an article fetches it first. If the fetch fails the list is
    /// restored and the error is shown over it. If another request holds the
    /// primary lane nothing changes. If the list was shown while the fetch
    /// ran, its result is ignored.
    pub async fn navigate(&self, route: Route) -> Route {
        let Route::Detail { id } = route else {
            let mut current = self.current.lock().await;
            self.show_list(&mut current).await;
            return *current;
        };

        let generation = self.list_generation.load(Ordering::Acquire);
        let fetched = self.controller.fetch_article(id).await;

        let mut current = self.current.lock().await;
        if self.list_generation.load(Ordering::Acquire) != generation {
            tracing::debug!(id, "Ignoring article, the list was shown meanwhile");
            return *current;
        }

        match fetched {
            Ok(Some(detail)) => {
                *current = route;
                self.presenter.display_article(&detail, &self.events);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::debug!(id, "Falling back to the result list");
                self.show_list(&mut current).await;
                self.presenter.display_error(&error.to_string());
            }
        }
        *current
    }

    /// Run a full search. Its results or its error panel replace whatever
    /// view was showing, so the route becomes the list.
    pub async fn submit(&self, raw: &str) -> Outcome {
        let outcome = self.controller.submit(raw).await;
        if matches!(outcome, Outcome::Completed | Outcome::Failed(_)) {
            self.list_generation.fetch_add(1, Ordering::AcqRel);
            *self.current.lock().await = Route::List;
        }
        outcome
    }

    /// Switch to the list and redraw the last results without searching again.
    async fn show_list(&self, current: &mut Route) {
        self.list_generation.fetch_add(1, Ordering::AcqRel);
        *current = Route::List;
        let state = self.controller.state().await;
        if state.has_results() {
            self.presenter
                .display_results(&state.last_results, &state.last_query, &self.events);
        }
    }
}
