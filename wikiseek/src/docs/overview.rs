//! # High level overview of Wikiseek
//!
//! This project is a Cargo workspace with one crate for each broad area of
//! behavior.
//!
//! ## [`wikiseek`](../)
//!
//! The binary. It loads settings, sets up logging, and runs a session behind a
//! line based terminal front end.
//!
//! ## [`wikiseek-settings`](../../wikiseek_settings/index.html)
//!
//! Defines and documents the settings of the application. The binary loads
//! them and passes the relevant sections into the other crates.
//!
//! ## [`wikiseek-api`](../../wikiseek_api/index.html)
//!
//! The `WikiApi` trait, the domain types it returns, and `MediaWikiClient`,
//! which speaks the MediaWiki `api.php` protocol.
//!
//! ## [`wikiseek-session`](../../wikiseek_session/index.html)
//!
//! Everything between a keystroke and a drawn view: query validation,
//! suggestion debouncing, the session controller with its request lanes, the
//! list/article router, and the `Presenter` trait that front ends implement.
