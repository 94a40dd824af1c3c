//! # Developer documentation for working on Wikiseek
//!
//! ## tl;dr
//!
//! Run the app
//! ```shell
//! $ cargo run -p wikiseek
//! ```
//!
//! Run specific tests for one crate
//! ```shell
//! $ cargo test -p wikiseek-session -- router
//! ```
//!
//! ## Local configuration
//!
//! The default environment is development, which logs in the pretty format
//! with debug output from the API client. To change settings locally, either
//! create `config/local.yaml` (it is git-ignored) or set environment variables
//! such as `WIKISEEK_SESSION__DEBOUNCE_MS=250`.
//!
//! Logs are written to stderr, so they can be redirected without disturbing
//! the terminal front end:
//!
//! ```shell
//! $ cargo run -p wikiseek 2>wikiseek.log
//! ```
