//! HTTP client for the puzzle backend.

use crate::api::dto::{puzzle_from_value, puzzles_from_values};
use crate::api::{ApiError, ApiErrorKind};
use crate::auth::UserContext;
use connections_core::{Puzzle, PuzzleId};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Client for the `/games` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url` with a per-request timeout.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        debug!("API client created");
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
            token: None,
        })
    }

    /// Attaches the user's token, if any, to every request.
    pub fn with_user(mut self, user: &UserContext) -> Self {
        self.token = user.token().map(str::to_string);
        self
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::new(
                ApiErrorKind::NotFound,
                format!("{} returned 404", response.url()),
            ));
        }
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::Http {
                    status: status.as_u16(),
                },
                format!("{} returned {}", response.url(), status),
            ));
        }
        Ok(response)
    }

    /// Fetches every puzzle, skipping entries that are not valid puzzles.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn list_games(&self) -> Result<Vec<Puzzle>, ApiError> {
        debug!("Listing puzzles");
        let response = self
            .authorize(self.client.get(self.url("games")))
            .send()
            .await?;
        let body = Self::check(response)?.bytes().await?;
        let values: Vec<serde_json::Value> = serde_json::from_slice(&body)?;

        let puzzles = puzzles_from_values(values);
        info!(count = puzzles.len(), "Puzzles listed");
        Ok(puzzles)
    }

    /// Fetches one puzzle by id.
    #[instrument(skip(self), fields(base_url = %self.base_url, puzzle_id = %id))]
    pub async fn get_game(&self, id: &PuzzleId) -> Result<Puzzle, ApiError> {
        debug!("Fetching puzzle");
        let response = self
            .authorize(self.client.get(self.url(&format!("games/{}", id))))
            .send()
            .await?;
        let body = Self::check(response)?.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;

        let puzzle = puzzle_from_value(value)?;
        info!(name = %puzzle.name(), "Puzzle fetched");
        Ok(puzzle)
    }

    /// Records one play of a puzzle. The response body is ignored.
    #[instrument(skip(self), fields(base_url = %self.base_url, puzzle_id = %id))]
    pub async fn report_play(&self, id: &PuzzleId, won: bool) -> Result<(), ApiError> {
        debug!("Reporting play");
        let response = self
            .authorize(self.client.post(self.url(&format!("games/{}/play", id))))
            .json(&serde_json::json!({ "won": won }))
            .send()
            .await?;
        Self::check(response)?;
        info!("Play reported");
        Ok(())
    }
}
