//! # Testing strategies
//!
//! Unit tests live next to the code they test. Async code is tested with
//! `#[tokio::test]`; anything involving the debounce timer or the artificial
//! search delay uses `start_paused = true`, so timers advance instantly and
//! deterministically.
//!
//! The API client is tested against [`httpmock`] servers, so no test talks to
//! the real encyclopedia. Session logic is tested against in-memory doubles of
//! the `WikiApi` and `Presenter` traits, which record every call made on them.
//!
//! Fixtures are built with the [`fake`] crate, which every domain type
//! supports:
//!
//! ```ignore
//! let summary = SearchResultSummary { id: 42, ..Faker.fake() };
//! ```
//!
//! Table driven tests use [`parameterized`].
//!
//! [`httpmock`]: https://docs.rs/httpmock
//! [`fake`]: https://docs.rs/fake
//! [`parameterized`]: https://docs.rs/parameterized
