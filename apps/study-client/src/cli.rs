//! Terminal front-end.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use flashcard_core::{
    parse_import, DeckKey, FlashcardUpdate, ResponseOutcome, SessionStore, StudyMode,
};

use crate::api::{import_flashcards, DeckService};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::study::StudySession;

#[derive(Debug, Parser)]
#[command(name = "study-client", about = "Study flashcard decks in the terminal", version)]
pub struct Cli {
    /// Deck service base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Signed-in user id, needed to edit or delete cards
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// SQLite file for saved sessions
    #[arg(long, global = true)]
    pub session_db: Option<PathBuf>,

    /// Delay before the next card after multiple-choice feedback
    #[arg(long, global = true)]
    pub auto_advance_ms: Option<u64>,

    /// Fixed shuffle seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Study one or more decks together
    Study {
        /// Deck ids, separated by spaces or commas
        #[arg(required = true)]
        decks: Vec<String>,
    },

    /// Import cards from a JSON file into a deck
    Import {
        deck_id: String,
        file: PathBuf,
    },
}

impl Cli {
    /// Apply command line overrides on top of the environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(user) = &self.user {
            config.user_id = Some(user.clone());
        }
        if let Some(path) = &self.session_db {
            config.session_db = path.clone();
        }
        if let Some(ms) = self.auto_advance_ms {
            config.auto_advance = std::time::Duration::from_millis(ms);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

/// Build the deck key from arguments like `a b,c`.
pub fn deck_key(args: &[String]) -> Result<DeckKey> {
    Ok(DeckKey::new(args.iter().flat_map(|arg| arg.split(',')))?)
}

/// Line-oriented prompt over stdin.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `message` and read one trimmed line. `None` on end of input.
    pub async fn ask(&mut self, message: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(message.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

/// Read a JSON file and create its cards in `deck_id`.
pub async fn run_import<S: DeckService>(service: &S, deck_id: &str, file: &Path) -> Result<usize> {
    let content = tokio::fs::read_to_string(file).await?;
    let cards = parse_import(&content)?;
    println!("Importing {} cards into {deck_id}...", cards.len());
    let imported = import_flashcards(service, deck_id, &cards).await?;
    println!("Imported {imported} cards.");
    Ok(imported)
}

/// Interactive study loop.
pub async fn run_study<S, K>(session: &mut StudySession<S, K>, prompt: &mut Prompt) -> Result<()>
where
    S: DeckService,
    K: SessionStore,
{
    if !choose_mode(session, prompt).await? {
        return Ok(());
    }

    loop {
        let Some(card) = session.current_card().cloned() else {
            let progress = session.progress();
            println!(
                "\nNo cards available. Session complete, {} cards mastered.",
                progress.completed
            );
            return Ok(());
        };

        let progress = session.progress();
        println!(
            "\n[{} left | {} mastered] {}",
            progress.remaining, progress.completed, card.deck_id
        );
        println!("Q: {}", card.front);

        let keep_going = match session.mode() {
            Some(StudyMode::InitialLearning) => multiple_choice_turn(session, prompt).await?,
            Some(StudyMode::Review) => review_turn(session, prompt).await?,
            None => false,
        };
        if !keep_going {
            session.close();
            println!("Progress saved.");
            return Ok(());
        }
    }
}

async fn choose_mode<S, K>(session: &mut StudySession<S, K>, prompt: &mut Prompt) -> Result<bool>
where
    S: DeckService,
    K: SessionStore,
{
    let summary = session.open().await?;

    println!("Study {}", session.decks());
    if let Some(summary) = &summary {
        println!(
            "  c) Continue {} ({} mastered, {} left)",
            summary.mode.label(),
            summary.completed,
            summary.remaining
        );
    }
    for (i, mode) in StudyMode::ALL.iter().enumerate() {
        println!("  {}) {}: {}", i + 1, mode.label(), mode.description());
    }

    loop {
        let Some(choice) = prompt.ask("Choose: ").await? else {
            return Ok(false);
        };
        match choice.as_str() {
            "c" if summary.is_some() => return Ok(session.resume()),
            "q" => return Ok(false),
            other => {
                let mode = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| StudyMode::ALL.get(i).copied());
                if let Some(mode) = mode {
                    let queued = session.start(mode).await?;
                    println!("Starting {} with {queued} cards.", mode.label());
                    return Ok(true);
                }
                println!("Unknown choice.");
            }
        }
    }
}

/// Returns false when the user quits.
async fn multiple_choice_turn<S, K>(
    session: &mut StudySession<S, K>,
    prompt: &mut Prompt,
) -> Result<bool>
where
    S: DeckService,
    K: SessionStore,
{
    let options = session.question().options().to_vec();
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }

    loop {
        let Some(input) = prompt.ask("Answer (number, e=edit, d=delete, q=quit): ").await? else {
            return Ok(false);
        };
        match input.as_str() {
            "q" => return Ok(false),
            "e" => return edit_turn(session, prompt).await.map(|_| true),
            "d" => return delete_turn(session, prompt).await.map(|_| true),
            other => {
                let picked = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i));
                let Some(picked) = picked else {
                    println!("Pick 1-{}.", options.len());
                    continue;
                };
                let feedback = session.select_option(picked)?;
                println!("{}", feedback.message);
                if let Some(outcome) = session.complete_auto_advance().await? {
                    report(&outcome);
                }
                return Ok(true);
            }
        }
    }
}

async fn review_turn<S, K>(session: &mut StudySession<S, K>, prompt: &mut Prompt) -> Result<bool>
where
    S: DeckService,
    K: SessionStore,
{
    loop {
        let Some(input) = prompt.ask("Enter to flip (e=edit, d=delete, q=quit): ").await? else {
            return Ok(false);
        };
        match input.as_str() {
            "q" => return Ok(false),
            "e" => return edit_turn(session, prompt).await.map(|_| true),
            "d" => return delete_turn(session, prompt).await.map(|_| true),
            _ => {}
        }

        if session.flip()? {
            if let Some(card) = session.current_card() {
                println!("A: {}", card.back);
            }
            break;
        }
    }

    loop {
        let Some(input) = prompt.ask("Did you know it? (y/n): ").await? else {
            return Ok(false);
        };
        let correct = match input.to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => continue,
        };
        let outcome = session.judge_self(correct)?;
        report(&outcome);
        return Ok(true);
    }
}

async fn edit_turn<S, K>(session: &mut StudySession<S, K>, prompt: &mut Prompt) -> Result<()>
where
    S: DeckService,
    K: SessionStore,
{
    let Some(card) = session.current_card().cloned() else {
        return Ok(());
    };
    let front = prompt.ask(&format!("Front [{}]: ", card.front)).await?;
    let back = prompt.ask(&format!("Back [{}]: ", card.back)).await?;
    let keep = |input: Option<String>, current: &str| {
        input
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| current.to_string())
    };

    let update = FlashcardUpdate {
        front: keep(front, &card.front),
        back: keep(back, &card.back),
        wrong_options: None,
    };
    match session.edit_current(update).await {
        Ok(_) => println!("Card updated."),
        Err(ClientError::PermissionDenied(p)) => println!("{p}"),
        Err(e) => println!("Could not update card: {e}"),
    }
    Ok(())
}

async fn delete_turn<S, K>(session: &mut StudySession<S, K>, prompt: &mut Prompt) -> Result<()>
where
    S: DeckService,
    K: SessionStore,
{
    let confirm = prompt.ask("Delete this card? (y/n): ").await?;
    if confirm.as_deref() != Some("y") {
        return Ok(());
    }
    match session.delete_current().await {
        Ok(()) => println!("Card deleted."),
        Err(ClientError::PermissionDenied(p)) => println!("{p}"),
        Err(e) => println!("Could not delete card: {e}"),
    }
    Ok(())
}

fn report(outcome: &ResponseOutcome) {
    if outcome.graduated() {
        println!("Mastered!");
    } else {
        println!("Level {} -> {}", outcome.previous_level.value(), outcome.level.value());
    }
}
