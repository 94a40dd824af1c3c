//! A line based terminal front end.

use std::{io::Write, sync::Mutex};

use wikiseek_api::{ArticleDetail, PageId, SearchResultSummary, Thumbnail};
use wikiseek_session::{EventSink, Presenter, UiEvent, RETRY_HINT};

/// Previews longer than this many characters are cut short.
const PREVIEW_CHARS: usize = 150;

/// Printed on start and for `help`.
pub const HELP: &str = "\
Commands:
  <text>           type into the search field (suggestions follow a short pause)
  search [<text>]  search for <text>, or for what was typed last (also: s)
  open <id>        read the article with page id <id>
  back             return to the results
  go <path>        go to a path such as / or /article/<id>
  focus            show suggestions for what was typed last
  help             show this message
  quit             leave (also: end of input)";

/// One line of user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Nothing but whitespace.
    Blank,
    /// Free text typed into the search field.
    Type(String),
    /// Run a full search, for this text or for what was typed last.
    Search(Option<String>),
    /// Read an article.
    Open(PageId),
    /// Return to the results.
    Back,
    /// Go to a path.
    Go(String),
    /// Re-focus the search field.
    Focus,
    /// Print the command list.
    Help,
    /// Leave.
    Quit,
    /// A command that could not be understood, with a hint for the user.
    Invalid(String),
}

impl Command {
    /// Parse one line of input.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word, rest) {
            ("search" | "s", "") => Self::Search(None),
            ("search" | "s", text) => Self::Search(Some(text.to_string())),
            ("open", id) => match id.parse::<PageId>() {
                Ok(id) if id > 0 => Self::Open(id),
                _ => Self::Invalid("Usage: open <page id>".to_string()),
            },
            ("go", "") => Self::Invalid("Usage: go <path>".to_string()),
            ("go", path) => Self::Go(path.to_string()),
            ("back", "") => Self::Back,
            ("focus", "") => Self::Focus,
            ("help", "") => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            _ => Self::Type(line.to_string()),
        }
    }

    /// The event this command stands for. `typed` holds the search field's
    /// text and is updated by commands that change it.
    pub fn into_event(self, typed: &mut String) -> Option<UiEvent> {
        match self {
            Self::Type(text) => {
                typed.clone_from(&text);
                Some(UiEvent::Input(text))
            }
            Self::Search(Some(text)) => {
                typed.clone_from(&text);
                Some(UiEvent::Submit(text))
            }
            Self::Search(None) => Some(UiEvent::Submit(typed.clone())),
            Self::Open(id) => Some(UiEvent::Select(id)),
            Self::Back => Some(UiEvent::Back),
            Self::Go(path) => Some(UiEvent::Navigate(path)),
            Self::Focus => Some(UiEvent::Focus(typed.clone())),
            Self::Quit => Some(UiEvent::Quit),
            Self::Blank | Self::Help | Self::Invalid(_) => None,
        }
    }
}

/// Draws the session as plain text.
pub struct TerminalPresenter<W> {
    /// Where text goes, usually stdout.
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    /// Create a presenter that writes to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Print the command list.
    pub fn print_help(&self) {
        self.emit(HELP);
    }

    /// Print a short note that isn't part of any view.
    pub fn print_notice(&self, notice: &str) {
        self.emit(notice);
    }

    /// Take back the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write `text` and a newline.
    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(error) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::warn!(%error, "Couldn't write to the terminal");
        }
    }
}

/// A one line description of a preview image.
fn image_line(thumbnail: &Thumbnail) -> String {
    format!(
        "Image ({}x{}): {}",
        thumbnail.width, thumbnail.height, thumbnail.url
    )
}

/// Shorten `text` to at most [`PREVIEW_CHARS`] characters plus an ellipsis.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn show_suggestions(&self, suggestions: &[SearchResultSummary], _on_select: &EventSink) {
        let mut text = String::from("Suggestions:");
        for suggestion in suggestions {
            text.push_str(&format!("\n  [{}] {}", suggestion.id, suggestion.title));
        }
        self.emit(&text);
    }

    fn hide_suggestions(&self) {
        // Printed suggestions scroll away on their own.
    }

    fn display_results(&self, results: &[SearchResultSummary], query: &str, _on_select: &EventSink) {
        if results.is_empty() {
            self.emit("No results found.");
            return;
        }

        let mut text = format!("Search Results for \"{}\"", query);
        for result in results {
            text.push_str(&format!("\n\n  [{}] {}", result.id, result.title));
            if let Some(thumbnail) = &result.thumbnail {
                text.push_str(&format!("\n      {}", image_line(thumbnail)));
            }
            if !result.snippet.is_empty() {
                text.push_str(&format!("\n      {}", preview(&result.snippet)));
            }
        }
        text.push_str("\n\nType `open <id>` to read an article.");
        self.emit(&text);
    }

    fn display_error(&self, message: &str) {
        self.emit(&format!("Error: {}\n{}", message, RETRY_HINT));
    }

    fn display_article(&self, detail: &ArticleDetail, _on_back: &EventSink) {
        let mut text = format!("{}\n{}", detail.title, "=".repeat(detail.title.chars().count()));
        if let Some(thumbnail) = &detail.thumbnail {
            text.push_str(&format!("\n{}", image_line(thumbnail)));
        }
        text.push_str(&format!("\n\n{}\n\nRead more: {}", detail.full_extract, detail.link()));
        text.push_str("\nType `back` to return to the results.");
        self.emit(&text);
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            self.emit("Loading...");
        }
    }

    fn show_input_error(&self, message: &str) {
        self.emit(&format!("! {}", message));
    }

    fn clear_input_error(&self) {}
}
