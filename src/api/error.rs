//! Backend error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiErrorKind {
    /// The requested puzzle does not exist.
    #[display("not found")]
    NotFound,
    /// The backend answered with a non-success status.
    #[display("HTTP {status}")]
    Http {
        /// Response status code.
        status: u16,
    },
    /// The request never got a response.
    #[display("network")]
    Network,
    /// The response body could not be parsed.
    #[display("decode")]
    Decode,
    /// The backend has no puzzles to pick from.
    #[display("no puzzles")]
    NoPuzzles,
    /// A puzzle had the wrong shape.
    #[display("invalid puzzle")]
    InvalidPuzzle,
    /// A local puzzle file could not be read.
    #[display("io")]
    Io,
}

/// Backend error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("API error ({}): {} at {}:{}", kind, message, file, line)]
pub struct ApiError {
    /// What kind of failure this is.
    pub kind: ApiErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ApiError {
    /// Creates a new API error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Whether the failure was a missing puzzle.
    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    /// Message shown in place of the board when a load fails.
    pub fn user_message(&self) -> String {
        match self.kind {
            ApiErrorKind::NotFound => "Puzzle not found".to_string(),
            ApiErrorKind::NoPuzzles => "No puzzles available".to_string(),
            _ => format!("Could not load puzzle: {}", self.message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(ApiErrorKind::Decode, format!("Response decode error: {}", err))
        } else if let Some(status) = err.status() {
            Self::new(
                ApiErrorKind::Http {
                    status: status.as_u16(),
                },
                format!("HTTP error: {}", err),
            )
        } else {
            Self::new(ApiErrorKind::Network, format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(ApiErrorKind::Decode, format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(ApiErrorKind::Io, format!("I/O error: {}", err))
    }
}
