//! Terminal study client for flashcard decks.
//!
//! Wires the core scheduler to the deck backend over HTTP and keeps saved
//! sessions in a local SQLite file.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod study;

use clap::Parser;
use flashcard_core::RngSource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::HttpDeckApi;
use crate::cli::{Cli, Command, Prompt};
use crate::config::Config;
use crate::db::SqliteSessionStore;
use crate::study::StudySession;

pub use error::{ClientError, Result};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    let api = HttpDeckApi::new(config.api_url.clone());
    tracing::debug!(api_url = %api.base_url(), "using deck service");

    match &cli.command {
        Command::Import { deck_id, file } => {
            cli::run_import(&api, deck_id, file).await?;
        }
        Command::Study { decks } => {
            let decks = cli::deck_key(decks)?;
            tracing::info!(path = %config.session_db.display(), "opening session database");
            let store = SqliteSessionStore::open(&config.session_db)?;

            let mut session = StudySession::new(api, store, decks)
                .with_user(config.user_id.clone())
                .with_auto_advance(config.auto_advance);
            if let Some(seed) = config.seed {
                session = session.with_random(RngSource::seeded(seed));
            }

            let mut prompt = Prompt::new();
            cli::run_study(&mut session, &mut prompt).await?;
        }
    }

    Ok(())
}
