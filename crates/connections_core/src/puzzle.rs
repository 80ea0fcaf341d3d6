//! Puzzle data: four named categories of exactly four words each.

use derive_getters::Getters;
use derive_more::{Display, Error, From};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Number of categories in every puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in every category.
pub const WORDS_PER_CATEGORY: usize = 4;

/// Number of tiles on the board.
pub const TILE_COUNT: usize = CATEGORY_COUNT * WORDS_PER_CATEGORY;

/// Longest word accepted when authoring a puzzle.
pub const MAX_WORD_LENGTH: usize = 15;

/// Identifier of a puzzle as assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    /// Creates a puzzle id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PuzzleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Position of a category within its puzzle, 0 (easiest) to 3 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct CategoryIndex(u8);

impl CategoryIndex {
    /// All category indices in order.
    pub const ALL: [CategoryIndex; CATEGORY_COUNT] = [
        CategoryIndex(0),
        CategoryIndex(1),
        CategoryIndex(2),
        CategoryIndex(3),
    ];

    /// Returns the index if it is in `0..CATEGORY_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        (index < CATEGORY_COUNT).then_some(Self(index as u8))
    }

    /// Returns the index as a `usize`.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Conventional colour of the category.
    pub fn color(self) -> CategoryColor {
        match self.0 {
            0 => CategoryColor::Yellow,
            1 => CategoryColor::Green,
            2 => CategoryColor::Red,
            _ => CategoryColor::Blue,
        }
    }

    /// Conventional difficulty label of the category.
    pub fn difficulty_label(self) -> &'static str {
        match self.0 {
            0 => "Easiest",
            1 => "Harder",
            2 => "Even Harder",
            _ => "Hardest",
        }
    }
}

/// Colour a category is rendered with once found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum CategoryColor {
    /// Category 0.
    Yellow,
    /// Category 1.
    Green,
    /// Category 2.
    Red,
    /// Category 3.
    Blue,
}

impl CategoryColor {
    /// Pastel RGB value used for found groups.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Yellow => (0xfd, 0xe6, 0x8a),
            Self::Green => (0xa7, 0xf3, 0xd0),
            Self::Red => (0xfc, 0xa5, 0xa5),
            Self::Blue => (0x93, 0xc5, 0xfd),
        }
    }
}

/// A named group of exactly four words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Category {
    /// Category name, hidden from the player until found.
    name: String,
    /// The four member words.
    words: [String; WORDS_PER_CATEGORY],
}

/// Attribution of the user who created a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Creator {
    /// Creator's username.
    username: String,
}

/// A complete puzzle as supplied by a puzzle source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Puzzle {
    /// Backend identifier.
    id: PuzzleId,
    /// Display name of the board.
    name: String,
    /// The four categories, index 0 easiest.
    categories: [Category; CATEGORY_COUNT],
    /// Who created the puzzle.
    #[new(default)]
    created_by: Option<Creator>,
    /// Optional difficulty label.
    #[new(default)]
    difficulty: Option<String>,
    /// Content tags such as `NSFW`.
    #[new(default)]
    tags: Vec<String>,
}

impl Puzzle {
    /// Sets the creator attribution.
    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.created_by = Some(creator);
        self
    }

    /// Sets the difficulty label.
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Sets the content tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns the category at `index`.
    pub fn category(&self, index: CategoryIndex) -> &Category {
        &self.categories[index.get()]
    }

    /// Returns true if the puzzle carries `tag`, compared case-insensitively.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Checks the puzzle against the authoring rules.
    ///
    /// Every category needs a name, every word must be non-blank, free of
    /// whitespace and at most [`MAX_WORD_LENGTH`] characters, and no word
    /// may appear twice. Sessions do not require this: category membership
    /// is by index, so a puzzle failing these rules is still playable.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation found, scanning categories in order.
    #[instrument(skip(self), fields(puzzle_id = %self.id))]
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let mut seen = HashSet::new();

        for (index, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(PuzzleError::MissingCategoryName { category: index });
            }

            for (position, word) in category.words.iter().enumerate() {
                if word.trim().is_empty() {
                    return Err(PuzzleError::BlankWord {
                        category: index,
                        position,
                    });
                }
                if word.chars().any(char::is_whitespace) {
                    return Err(PuzzleError::WordHasWhitespace { word: word.clone() });
                }
                if word.chars().count() > MAX_WORD_LENGTH {
                    return Err(PuzzleError::WordTooLong { word: word.clone() });
                }
                if !seen.insert(word.to_lowercase()) {
                    return Err(PuzzleError::DuplicateWord { word: word.clone() });
                }
            }
        }

        debug!("Puzzle passed validation");
        Ok(())
    }
}

/// Authoring rule violated by a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PuzzleError {
    /// A category has a blank name.
    #[display("category {} has no name", category + 1)]
    MissingCategoryName {
        /// Zero-based category index.
        category: usize,
    },
    /// A word slot is blank.
    #[display("category {} word {} is blank", category + 1, position + 1)]
    BlankWord {
        /// Zero-based category index.
        category: usize,
        /// Zero-based word position.
        position: usize,
    },
    /// A word contains whitespace.
    #[display("word '{word}' contains whitespace")]
    WordHasWhitespace {
        /// Offending word.
        word: String,
    },
    /// A word is longer than [`MAX_WORD_LENGTH`].
    #[display("word '{word}' is longer than 15 characters")]
    WordTooLong {
        /// Offending word.
        word: String,
    },
    /// A word appears in more than one slot.
    #[display("word '{word}' appears more than once")]
    DuplicateWord {
        /// Offending word.
        word: String,
    },
}
