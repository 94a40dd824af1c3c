//! The event loop that ties the session together.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use wikiseek_api::WikiApi;
use wikiseek_settings::SessionSettings;

use crate::controller::SessionController;
use crate::debounce::Debouncer;
use crate::presenter::{EventSink, Presenter, UiEvent};
use crate::router::{Route, Router};
use crate::validator::validate;

/// A search session, driven by [`UiEvent`]s.
pub struct App {
    /// Runs searches and suggestions.
    controller: Arc<SessionController>,

    /// Runs navigation.
    router: Arc<Router>,

    /// Delays suggestions until typing pauses.
    debouncer: Debouncer,

    /// Where user actions arrive.
    events: UnboundedReceiver<UiEvent>,
}

impl App {
    /// Assemble a session. Returns the app and the sink the front end posts
    /// events to.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(
        api: Arc<dyn WikiApi>,
        presenter: Arc<dyn Presenter>,
        settings: &SessionSettings,
    ) -> (Self, EventSink) {
        let (sink, events) = EventSink::channel();
        let controller = Arc::new(SessionController::new(
            api,
            presenter.clone(),
            sink.clone(),
            settings,
        ));
        let router = Arc::new(Router::new(controller.clone(), presenter, sink.clone()));

        let suggester = controller.clone();
        let debouncer = Debouncer::new(settings.debounce, move |query: String| {
            let controller = suggester.clone();
            async move {
                controller.suggest(&query).await;
            }
        });

        let app = Self {
            controller,
            router,
            debouncer,
            events,
        };
        (app, sink)
    }

    /// Show `initial_path`, then handle events until the user quits or every
    /// sink is dropped.
    pub async fn run(mut self, initial_path: &str) {
        self.router.navigate_to(initial_path).await;

        while let Some(event) = self.events.recv().await {
            if event == UiEvent::Quit {
                break;
            }
            self.dispatch(event);
        }
        tracing::debug!("Event loop finished");
    }

    /// Route one event. Anything that talks to the API runs as its own task
    /// so the loop keeps taking events while it waits.
    fn dispatch(&self, event: UiEvent) {
        tracing::trace!(?event, "Handling event");
        match event {
            UiEvent::Input(text) => {
                self.controller.input_changed();
                self.debouncer.call(text);
            }
            UiEvent::Focus(text) => {
                if validate(&text).is_ok() {
                    self.debouncer.call(text);
                }
            }
            UiEvent::Submit(text) => {
                let router = self.router.clone();
                tokio::spawn(async move {
                    router.submit(&text).await;
                });
            }
            UiEvent::Select(id) => self.go(Route::Detail { id }),
            UiEvent::Back => self.go(Route::List),
            UiEvent::Navigate(path) => self.go(Route::resolve(&path)),
            UiEvent::Quit => {}
        }
    }

    /// Navigate in the background.
    fn go(&self, route: Route) {
        let router = self.router.clone();
        tokio::spawn(async move {
            router.navigate(route).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::presenter::{EventSink, UiEvent};
    use crate::router::Route;
    use crate::test_support::{Call, FakeApi, RecordingPresenter};
    use fake::{Fake, Faker};
    use pretty_assertions::assert_eq;
    use std::{sync::Arc, time::Duration};
    use tokio::task::JoinHandle;
    use wikiseek_api::SearchResultSummary;
    use wikiseek_settings::SessionSettings;

    fn results(ids: &[u64]) -> Vec<SearchResultSummary> {
        ids.iter()
            .map(|&id| SearchResultSummary { id, ..Faker.fake() })
            .collect()
    }

    fn start(api: &Arc<FakeApi>, presenter: &Arc<RecordingPresenter>) -> (JoinHandle<()>, EventSink) {
        let (app, sink) = App::new(api.clone(), presenter.clone(), &SessionSettings::default());
        (tokio::spawn(app.run("/")), sink)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_asks_for_suggestions_once() {
        let api = Arc::new(FakeApi::default().with_suggestions(results(&[5, 6, 7, 8])));
        let presenter = Arc::new(RecordingPresenter::default());
        let (_app, sink) = start(&api, &presenter);

        for text in ["Ein", "Einst", "Einstein"] {
            sink.send(UiEvent::Input(text.to_string()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(api.suggest_calls(), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(api.suggest_calls(), 1);
        assert_eq!(
            presenter.calls(),
            vec![
                Call::ClearInputError,
                Call::ClearInputError,
                Call::ClearInputError,
                Call::ShowSuggestions(vec![5, 6, 7]),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_only_suggests_for_valid_text() {
        let api = Arc::new(FakeApi::default().with_suggestions(results(&[5])));
        let presenter = Arc::new(RecordingPresenter::default());
        let (_app, sink) = start(&api, &presenter);

        sink.send(UiEvent::Focus("Ei".to_string()));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(api.suggest_calls(), 0);

        sink.send(UiEvent::Focus("Einstein".to_string()));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(api.suggest_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_open_and_back() {
        let api = Arc::new(
            FakeApi::default()
                .with_results(results(&[3, 42]))
                .with_article(42),
        );
        let presenter = Arc::new(RecordingPresenter::default());
        let (_app, sink) = start(&api, &presenter);

        sink.send(UiEvent::Submit("Douglas Adams".to_string()));
        settle().await;
        sink.select(42);
        settle().await;
        sink.back();
        settle().await;

        let shown: Vec<Call> = presenter
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::DisplayResults { .. } | Call::DisplayArticle(_)))
            .collect();
        let list = Call::DisplayResults {
            ids: vec![3, 42],
            query: "Douglas Adams".to_string(),
        };
        assert_eq!(shown, vec![list.clone(), Call::DisplayArticle(42), list]);
        assert_eq!(api.search_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_from_article_shows_the_list() {
        let api = Arc::new(
            FakeApi::default()
                .with_results(results(&[7]))
                .with_article(42),
        );
        let presenter = Arc::new(RecordingPresenter::default());
        let (app, sink) = App::new(api.clone(), presenter.clone(), &SessionSettings::default());
        let router = app.router.clone();
        let _running = tokio::spawn(app.run("/article/42"));
        settle().await;
        assert_eq!(router.current().await, Route::Detail { id: 42 });

        sink.send(UiEvent::Submit("Marie Curie".to_string()));
        settle().await;

        assert_eq!(router.current().await, Route::List);
        assert_eq!(api.searched(), vec!["Marie Curie".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_path_opens_article() {
        let api = Arc::new(FakeApi::default().with_article(42));
        let presenter = Arc::new(RecordingPresenter::default());
        let (app, _sink) = App::new(api.clone(), presenter.clone(), &SessionSettings::default());
        let _running = tokio::spawn(app.run("/article/42"));
        settle().await;

        assert!(presenter.calls().contains(&Call::DisplayArticle(42)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_the_loop() {
        let api = Arc::new(FakeApi::default());
        let presenter = Arc::new(RecordingPresenter::default());
        let (app, sink) = start(&api, &presenter);

        sink.send(UiEvent::Quit);

        tokio::time::timeout(Duration::from_secs(1), app)
            .await
            .expect("loop should stop")
            .expect("loop should not panic");
    }
}
