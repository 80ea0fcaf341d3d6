//! Board tiles.

use crate::puzzle::{CategoryIndex, Puzzle};
use serde::{Deserialize, Serialize};

/// One word on the board, tagged with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    word: String,
    category: CategoryIndex,
}

impl Tile {
    /// Creates a tile.
    pub fn new(word: impl Into<String>, category: CategoryIndex) -> Self {
        Self {
            word: word.into(),
            category,
        }
    }

    /// Word shown on the tile.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Category the tile belongs to.
    pub fn category(&self) -> CategoryIndex {
        self.category
    }

    /// Flattens a puzzle into its sixteen tiles, category by category.
    pub fn flatten(puzzle: &Puzzle) -> Vec<Tile> {
        CategoryIndex::ALL
            .iter()
            .flat_map(|&index| {
                puzzle
                    .category(index)
                    .words()
                    .iter()
                    .map(move |word| Tile::new(word.clone(), index))
            })
            .collect()
    }
}

/// What the presentation layer needs to draw one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView<'a> {
    /// Board position.
    pub position: usize,
    /// Word on the tile.
    pub word: &'a str,
    /// Whether the tile is part of the current selection.
    pub selected: bool,
    /// The tile's category, present only once that category is found.
    pub found: Option<CategoryIndex>,
    /// The category name, present only once that category is found.
    pub category_name: Option<&'a str>,
}
