//! Command-line interface for the Connections client.

use clap::{Args, Parser, Subcommand};
use connections::{ClientConfig, ConfigError};
use std::path::PathBuf;

/// Connections - sort sixteen words into four groups of four
#[derive(Parser, Debug)]
#[command(name = "connections")]
#[command(about = "Terminal client for the Connections word puzzle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where puzzles come from, shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend URL including the /api prefix (overrides config and env)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Play offline from a JSON file of puzzles instead of the backend
    #[arg(long)]
    pub puzzles_file: Option<PathBuf>,
}

impl SourceArgs {
    /// Loads the config file and environment, then applies these flags.
    pub fn resolve(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::load(self.config.as_deref())?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(path) = &self.puzzles_file {
            config = config.with_puzzles_file(path.clone());
        }
        Ok(config)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play puzzles on a terminal board
    Play {
        #[command(flatten)]
        source: SourceArgs,

        /// Play this puzzle instead of a random one
        #[arg(long)]
        puzzle_id: Option<String>,

        /// Wrong guesses allowed before the game is lost
        #[arg(long)]
        max_wrong_tries: Option<u32>,
    },

    /// List available puzzles
    List {
        #[command(flatten)]
        source: SourceArgs,
    },
}
