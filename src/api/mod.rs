//! REST access to the puzzle backend.

mod client;
mod dto;
mod error;

pub use client::ApiClient;
pub use dto::{CategoryDto, CreatorDto, PuzzleDto, puzzle_from_value, puzzles_from_values};
pub use error::{ApiError, ApiErrorKind};
