#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! The interactive side of Wikiseek.
//!
//! An [`App`] receives [`UiEvent`]s from a front end, runs them through the
//! [`SessionController`] and the [`Router`], and draws the outcome through a
//! [`Presenter`]. Nothing in here knows how pages are fetched beyond the
//! [`WikiApi`](wikiseek_api::WikiApi) trait, or how they are drawn beyond the
//! [`Presenter`] trait.

mod app;
mod controller;
mod debounce;
mod presenter;
mod router;
mod validator;

#[cfg(test)]
mod test_support;

pub use crate::app::App;
pub use crate::controller::{Outcome, SessionController, SessionState};
pub use crate::debounce::Debouncer;
pub use crate::presenter::{EventSink, Presenter, UiEvent, RETRY_HINT};
pub use crate::router::{Route, Router};
pub use crate::validator::{validate, Query, ValidationError, MIN_QUERY_CHARS};
