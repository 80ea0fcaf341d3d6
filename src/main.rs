//! Connections - terminal client
//!
//! Plays word-grouping puzzles from a REST backend or a local file.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, SourceArgs};
use connections::{
    ApiClient, ClientConfig, GameController, HttpPuzzleSource, HttpStatsReporter,
    JwtClaimsDecoder, LoadMode, LocalPuzzleSource, LogStatsReporter, PuzzleId, PuzzleSource,
    StatsReporter, UserContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,connections=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            source,
            puzzle_id,
            max_wrong_tries,
        } => run_play(source, puzzle_id, max_wrong_tries).await,
        Command::List { source } => run_list(source).await,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Resolves the logged-in user from the configured token.
fn user_context(config: &ClientConfig) -> UserContext {
    match config.auth_token() {
        Some(token) => UserContext::login(token.clone(), &JwtClaimsDecoder).unwrap_or_else(|| {
            warn!("Configured auth token could not be read, playing as guest");
            UserContext::anonymous()
        }),
        None => UserContext::anonymous(),
    }
}

/// Builds the puzzle source and stats reporter the config asks for.
fn collaborators(
    config: &ClientConfig,
    user: &UserContext,
) -> Result<(Arc<dyn PuzzleSource>, Arc<dyn StatsReporter>)> {
    if let Some(path) = config.puzzles_file() {
        info!(path = %path.display(), "Playing offline");
        return Ok((
            Arc::new(LocalPuzzleSource::new(path)),
            Arc::new(LogStatsReporter),
        ));
    }

    let client = ApiClient::new(config.api_url(), config.request_timeout())
        .context("Failed to build HTTP client")?
        .with_user(user);
    info!(api_url = %client.base_url(), "Using puzzle backend");
    Ok((
        Arc::new(HttpPuzzleSource::new(client.clone())),
        Arc::new(HttpStatsReporter::new(client)),
    ))
}

/// Run the terminal board
#[instrument(skip(source))]
async fn run_play(
    source: SourceArgs,
    puzzle_id: Option<String>,
    max_wrong_tries: Option<u32>,
) -> Result<()> {
    // Log to a file so the board is not overwritten
    let log_file = std::fs::File::create("connections_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let mut config = source.resolve()?;
    if let Some(max) = max_wrong_tries {
        config = config.with_max_wrong_tries(max);
    }
    config.validate()?;

    let user = user_context(&config);
    let (puzzles, reporter) = collaborators(&config, &user)?;

    let mode = match puzzle_id {
        Some(id) => LoadMode::ById(PuzzleId::new(id)),
        None => LoadMode::Random,
    };
    info!(%mode, "Starting game");

    let mut controller = GameController::new(puzzles, reporter, mode.clone(), config.rules());
    controller.start_load(mode);

    connections::run_play(controller, user).await
}

/// Print the available puzzles
#[instrument(skip(source))]
async fn run_list(source: SourceArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = source.resolve()?;
    config.validate()?;
    let user = user_context(&config);
    let (puzzles, _) = collaborators(&config, &user)?;

    let list = puzzles.list().await.context("Failed to list puzzles")?;
    if list.is_empty() {
        println!("No puzzles available");
        return Ok(());
    }

    for puzzle in &list {
        let creator = puzzle
            .created_by()
            .as_ref()
            .map_or("unknown", |c| c.username().as_str());
        let difficulty = puzzle.difficulty().as_deref().unwrap_or("-");
        let tags = if puzzle.tags().is_empty() {
            "-".to_string()
        } else {
            puzzle.tags().join(", ")
        };
        println!(
            "{}\t{}\tby {}\tdifficulty {}\ttags {}",
            puzzle.id(),
            puzzle.name(),
            creator,
            difficulty,
            tags
        );
        if let Err(e) = puzzle.validate() {
            println!("\t! {}", e);
        }
    }
    info!(count = list.len(), "Listed puzzles");
    Ok(())
}
