//! Reporting finished sessions.

use crate::api::{ApiClient, ApiError};
use async_trait::async_trait;
use connections_core::OutcomeReport;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Accepts the outcome of a finished session.
#[async_trait]
pub trait StatsReporter: Send + Sync {
    /// Records one outcome.
    async fn report(&self, report: &OutcomeReport) -> Result<(), ApiError>;
}

/// Records outcomes through `POST /games/{id}/play`.
#[derive(Debug, Clone)]
pub struct HttpStatsReporter {
    client: ApiClient,
}

impl HttpStatsReporter {
    /// Wraps an API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsReporter for HttpStatsReporter {
    async fn report(&self, report: &OutcomeReport) -> Result<(), ApiError> {
        self.client.report_play(&report.puzzle_id, report.won).await
    }
}

/// Writes outcomes to the log only, for offline play.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatsReporter;

#[async_trait]
impl StatsReporter for LogStatsReporter {
    async fn report(&self, report: &OutcomeReport) -> Result<(), ApiError> {
        info!(puzzle_id = %report.puzzle_id, won = report.won, "Session finished");
        Ok(())
    }
}

/// Sends `report` on a background task.
///
/// Failures are logged and dropped; nothing retries.
#[instrument(skip_all, fields(puzzle_id = %report.puzzle_id, won = report.won))]
pub fn report_in_background(
    reporter: Arc<dyn StatsReporter>,
    report: OutcomeReport,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = reporter.report(&report).await {
            warn!(error = %e, puzzle_id = %report.puzzle_id, "Failed to report outcome");
        }
    })
}
