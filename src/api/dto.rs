//! Wire format of puzzles as served by the backend.
//!
//! Categories travel as four numbered fields, `category1` through
//! `category4`, which map to category indices 0 through 3. Older backends
//! spell the word list `word` instead of `words`.

use crate::api::{ApiError, ApiErrorKind};
use connections_core::{Category, Creator, Puzzle, PuzzleId, WORDS_PER_CATEGORY};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One category on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    /// Category name.
    pub name: String,
    /// Member words; exactly four are required.
    #[serde(alias = "word")]
    pub words: Vec<String>,
}

/// Puzzle creator, either populated or a bare user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatorDto {
    /// Populated user document.
    Populated {
        /// Creator's username.
        username: String,
    },
    /// Unpopulated reference.
    Id(String),
}

/// One puzzle on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDto {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creator, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatorDto>,
    /// Difficulty label, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Content tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category at index 0.
    pub category1: Option<CategoryDto>,
    /// Category at index 1.
    pub category2: Option<CategoryDto>,
    /// Category at index 2.
    pub category3: Option<CategoryDto>,
    /// Category at index 3.
    pub category4: Option<CategoryDto>,
}

fn category_from_dto(
    puzzle_id: &str,
    slot: usize,
    dto: Option<CategoryDto>,
) -> Result<Category, ApiError> {
    let dto = dto.ok_or_else(|| {
        ApiError::new(
            ApiErrorKind::InvalidPuzzle,
            format!("Puzzle {} is missing category{}", puzzle_id, slot),
        )
    })?;

    let count = dto.words.len();
    let words: [String; WORDS_PER_CATEGORY] = dto.words.try_into().map_err(|_| {
        ApiError::new(
            ApiErrorKind::InvalidPuzzle,
            format!(
                "Puzzle {} category{} has {} words, expected {}",
                puzzle_id, slot, count, WORDS_PER_CATEGORY
            ),
        )
    })?;

    Ok(Category::new(dto.name, words))
}

impl TryFrom<PuzzleDto> for Puzzle {
    type Error = ApiError;

    fn try_from(dto: PuzzleDto) -> Result<Self, Self::Error> {
        let id = dto.id;
        let categories = [
            category_from_dto(&id, 1, dto.category1)?,
            category_from_dto(&id, 2, dto.category2)?,
            category_from_dto(&id, 3, dto.category3)?,
            category_from_dto(&id, 4, dto.category4)?,
        ];

        let mut puzzle = Puzzle::new(PuzzleId::new(id), dto.name, categories).with_tags(dto.tags);
        if let Some(CreatorDto::Populated { username }) = dto.created_by {
            puzzle = puzzle.with_creator(Creator::new(username));
        }
        if let Some(difficulty) = dto.difficulty {
            puzzle = puzzle.with_difficulty(difficulty);
        }
        Ok(puzzle)
    }
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name().clone(),
            words: category.words().to_vec(),
        }
    }
}

impl From<&Puzzle> for PuzzleDto {
    fn from(puzzle: &Puzzle) -> Self {
        let [c1, c2, c3, c4] = puzzle.categories();
        Self {
            id: puzzle.id().to_string(),
            name: puzzle.name().clone(),
            created_by: puzzle.created_by().as_ref().map(|c| CreatorDto::Populated {
                username: c.username().clone(),
            }),
            difficulty: puzzle.difficulty().clone(),
            tags: puzzle.tags().clone(),
            category1: Some(c1.into()),
            category2: Some(c2.into()),
            category3: Some(c3.into()),
            category4: Some(c4.into()),
        }
    }
}

/// Parses one puzzle from a JSON value.
pub fn puzzle_from_value(value: serde_json::Value) -> Result<Puzzle, ApiError> {
    let dto: PuzzleDto = serde_json::from_value(value)?;
    Puzzle::try_from(dto)
}

/// Parses a puzzle list, skipping entries that are not valid puzzles.
pub fn puzzles_from_values(values: Vec<serde_json::Value>) -> Vec<Puzzle> {
    let total = values.len();
    let puzzles: Vec<Puzzle> = values
        .into_iter()
        .filter_map(|value| match puzzle_from_value(value) {
            Ok(puzzle) => Some(puzzle),
            Err(e) => {
                warn!(error = %e, "Skipping malformed puzzle");
                None
            }
        })
        .collect();
    debug!(total, kept = puzzles.len(), "Parsed puzzle list");
    puzzles
}
