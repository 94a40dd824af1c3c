// Only overview documentation that is not relevant to one of the more specific
// crates should go here.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Search the encyclopedia from a terminal.
//!
//! Wikiseek is split into several subcrates that work in collaboration.
//!
//! - [wikiseek-settings](../wikiseek_settings/index.html)
//! - [wikiseek-api](../wikiseek_api/index.html)
//! - [wikiseek-session](../wikiseek_session/index.html)

mod docs;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;
use wikiseek_api::{MediaWikiClient, WikiApi};
use wikiseek_session::{App, EventSink, UiEvent};
use wikiseek_settings::{LogFormat, Settings};

use crate::terminal::{Command, TerminalPresenter};

/// Primary entry point
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Loading settings")?;
    init_logging(&settings)?;

    let api = MediaWikiClient::new(&settings.api).context("Setting up the encyclopedia client")?;
    tracing::info!(api = %api.name(), env = %settings.env, "Starting Wikiseek");

    let presenter = Arc::new(TerminalPresenter::new(std::io::stdout()));
    let (app, sink) = App::new(Arc::new(api), presenter.clone(), &settings.session);
    let session = tokio::spawn(app.run("/"));

    presenter.print_help();
    read_commands(&sink, &presenter)
        .await
        .context("Reading commands")?;

    sink.send(UiEvent::Quit);
    session.await.context("Running the session")?;
    Ok(())
}

/// Turn lines from stdin into events until the user quits or input ends.
async fn read_commands(
    sink: &EventSink,
    presenter: &TerminalPresenter<std::io::Stdout>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut typed = String::new();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Help => presenter.print_help(),
            Command::Invalid(hint) => presenter.print_notice(&hint),
            Command::Quit => break,
            command => {
                if let Some(event) = command.into_event(&mut typed) {
                    if !sink.send(event) {
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Set up logging for Wikiseek, based on settings and the `RUST_LOG` environment variable.
///
/// Logs go to stderr, leaving stdout to the terminal front end.
fn init_logging(settings: &Settings) -> Result<()> {
    LogTracer::init().context("Forwarding log records")?;
    let env_filter: EnvFilter = (&settings.logging.levels).into();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match settings.logging.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish()),
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
    .context("Installing the log subscriber")?;

    Ok(())
}
