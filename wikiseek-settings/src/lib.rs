#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # Wikiseek Settings
//!
//! Configuration is specified in several ways, with later methods overriding earlier ones.
//!
//! 1. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 2. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `WIKISEEK_ENV`.
//!    The settings for that environment are then loaded from
//!    `config/${env}.yaml`, if it exists. The default environment is
//!    "development".
//! 3. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is safe to use for
//!    local configuration if desired.
//! 4. Environment variables that begin with `WIKISEEK_` and use `__` to
//!    separate levels. For example, `Settings::api::timeout` can be controlled
//!    from the environment variable `WIKISEEK_API__TIMEOUT_MS`.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.
//!
//! Configuration files are canonically YAML files. However, any format supported
//! by the [config] crate can be used, including JSON and TOML. To choose another
//! format, simply use a different extension for your file, like
//! `config/local.toml`.

mod api;
mod logging;

pub use api::{ApiSettings, SessionSettings};
pub use logging::{DirectiveWrapper, LogFormat, LoggingSettings};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Top level settings object for Wikiseek.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[doc(inline)]
pub struct Settings {
    /// The environment Wikiseek is running in. Should only be set with the
    /// `WIKISEEK_ENV` environment variable.
    pub env: String,

    /// Enable additional features to debug the application. This should not be
    /// set to true for regular use.
    pub debug: bool,

    /// Logging settings.
    pub logging: LoggingSettings,

    /// Settings for the encyclopedia API client.
    pub api: ApiSettings,

    /// Settings for the interactive search session.
    pub session: SessionSettings,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, or if any of the required
    /// configuration files are missing.
    pub fn load() -> Result<Self, ConfigError> {
        let wikiseek_env =
            std::env::var("WIKISEEK_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("./config/base"))
            .set_override("env", wikiseek_env.as_str())?
            // Merge in an environment specific config.
            .add_source(File::with_name(&format!("config/{}", wikiseek_env)).required(false))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables that start with "WIKISEEK_" and have
            // "__" to separate levels. For example, `WIKISEEK_API__TIMEOUT_MS`
            // maps to `Settings::api::timeout`.
            .add_source(
                Environment::with_prefix("WIKISEEK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()
            .and_then(|mut settings| {
                // RUST_LOG is always respected, on top of the configured levels.
                let rust_log = std::env::var("RUST_LOG").ok();
                settings
                    .logging
                    .levels
                    .merge_rust_log(rust_log.as_deref())
                    .map_err(|error| ConfigError::Message(format!("{:#}", error)))?;
                Ok(settings)
            })
    }

    /// Load settings from configuration files for tests.
    ///
    /// Neither `WIKISEEK_*` variables nor `RUST_LOG` are read.
    ///
    /// `changer` is given the loaded settings and may adjust them before they
    /// are returned.
    pub fn load_for_tests<F: FnOnce(&mut Self)>(changer: F) -> Self {
        let mut settings: Self = Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("../config/base"))
            // Merge in test specific config.
            .set_override("env", "test")
            .expect("Could not set env for tests")
            .add_source(File::with_name("../config/test"))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("../config/local_test").required(false))
            .build()
            .expect("Could not load settings for tests")
            .try_deserialize()
            .expect("Could not convert settings");

        changer(&mut settings);
        settings
    }
}
