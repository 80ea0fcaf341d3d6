//! Where puzzles come from.

use crate::api::{ApiClient, ApiError, ApiErrorKind, puzzles_from_values};
use async_trait::async_trait;
use connections_core::{LoadMode, Puzzle, PuzzleId};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Supplies puzzles, by id or at random.
#[async_trait]
pub trait PuzzleSource: Send + Sync {
    /// Every available puzzle.
    async fn list(&self) -> Result<Vec<Puzzle>, ApiError>;

    /// One puzzle by id.
    async fn by_id(&self, id: &PuzzleId) -> Result<Puzzle, ApiError>;

    /// A puzzle picked uniformly from [`PuzzleSource::list`].
    async fn random(&self) -> Result<Puzzle, ApiError> {
        let mut puzzles = self.list().await?;
        if puzzles.is_empty() {
            return Err(ApiError::new(
                ApiErrorKind::NoPuzzles,
                "The puzzle list is empty",
            ));
        }
        let index = rand::rng().random_range(0..puzzles.len());
        debug!(index, available = puzzles.len(), "Picked random puzzle");
        Ok(puzzles.swap_remove(index))
    }

    /// Fetches the puzzle `mode` asks for.
    async fn fetch(&self, mode: &LoadMode) -> Result<Puzzle, ApiError> {
        match mode {
            LoadMode::Random => self.random().await,
            LoadMode::ById(id) => self.by_id(id).await,
        }
    }
}

/// Puzzles served by the backend.
#[derive(Debug, Clone)]
pub struct HttpPuzzleSource {
    client: ApiClient,
}

impl HttpPuzzleSource {
    /// Wraps an API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PuzzleSource for HttpPuzzleSource {
    async fn list(&self) -> Result<Vec<Puzzle>, ApiError> {
        self.client.list_games().await
    }

    async fn by_id(&self, id: &PuzzleId) -> Result<Puzzle, ApiError> {
        self.client.get_game(id).await
    }
}

/// Puzzles read from a JSON file in the backend's wire format.
///
/// The file holds an array of puzzle objects, as `GET /games` returns.
/// It is re-read on every request so edits show up on the next game.
#[derive(Debug, Clone)]
pub struct LocalPuzzleSource {
    path: PathBuf,
}

impl LocalPuzzleSource {
    /// Serves puzzles from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PuzzleSource for LocalPuzzleSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list(&self) -> Result<Vec<Puzzle>, ApiError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;
        let puzzles = puzzles_from_values(values);
        info!(count = puzzles.len(), "Loaded local puzzles");
        Ok(puzzles)
    }

    async fn by_id(&self, id: &PuzzleId) -> Result<Puzzle, ApiError> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| {
                ApiError::new(ApiErrorKind::NotFound, format!("No puzzle with id {}", id))
            })
    }
}
