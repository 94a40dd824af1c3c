//! The boundary between the session core and whatever draws it.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use wikiseek_api::{ArticleDetail, PageId, SearchResultSummary};

/// Shown under every error panel.
pub const RETRY_HINT: &str = "Please try again in a few moments.";

/// Something the user did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// The text in the search field changed.
    Input(String),
    /// The search field gained focus, holding this text.
    Focus(String),
    /// The user asked for a full search of this text.
    Submit(String),
    /// A result or suggestion was picked.
    Select(PageId),
    /// The user asked to go back to the result list.
    Back,
    /// The user navigated to a path directly.
    Navigate(String),
    /// The user is done.
    Quit,
}

/// A handle views use to report user actions back to the event loop.
///
/// Handed to the presenter with every view that has something to click, so
/// that no callback ever has to live in a global slot.
#[derive(Clone, Debug)]
pub struct EventSink(UnboundedSender<UiEvent>);

impl EventSink {
    /// Create a sink and the receiver the event loop reads from.
    pub fn channel() -> (Self, UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    /// Post an event. Returns false if the event loop has shut down.
    pub fn send(&self, event: UiEvent) -> bool {
        self.0.send(event).is_ok()
    }

    /// Report that the page `id` was picked.
    pub fn select(&self, id: PageId) -> bool {
        self.send(UiEvent::Select(id))
    }

    /// Report that the user wants to return to the result list.
    pub fn back(&self) -> bool {
        self.send(UiEvent::Back)
    }
}

/// Renders session state. Implementations must not block.
pub trait Presenter: Send + Sync {
    /// Show the suggestion dropdown. Picking one should call `on_select.select(id)`.
    fn show_suggestions(&self, suggestions: &[SearchResultSummary], on_select: &EventSink);

    /// Hide the suggestion dropdown.
    fn hide_suggestions(&self);

    /// Show the results of a full search for `query`.
    fn display_results(&self, results: &[SearchResultSummary], query: &str, on_select: &EventSink);

    /// Show an error panel with `message`, followed by [`RETRY_HINT`].
    fn display_error(&self, message: &str);

    /// Show an article. Going back should call `on_back.back()`.
    fn display_article(&self, detail: &ArticleDetail, on_back: &EventSink);

    /// Disable or re-enable the search action while a request runs.
    fn set_busy(&self, busy: bool);

    /// Mark the search field invalid and show `message` next to it.
    fn show_input_error(&self, message: &str);

    /// Clear any invalid marking on the search field.
    fn clear_input_error(&self);
}
