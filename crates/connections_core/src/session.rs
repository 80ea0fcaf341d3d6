//! The puzzle-solving state machine for a single play-through.

use crate::arrange::{organize_found, shuffle_all, shuffle_unfound};
use crate::puzzle::{Category, CategoryIndex, Puzzle, PuzzleId, WORDS_PER_CATEGORY};
use crate::tile::{Tile, TileView};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Default number of wrong submissions before the game is lost.
pub const DEFAULT_MAX_WRONG_TRIES: u32 = 4;

/// Tunable rules of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Wrong submissions allowed before the game is lost.
    #[serde(default = "default_max_wrong_tries")]
    max_wrong_tries: u32,
}

fn default_max_wrong_tries() -> u32 {
    DEFAULT_MAX_WRONG_TRIES
}

impl Rules {
    /// Creates rules with the given wrong-try budget, at least 1.
    pub fn new(max_wrong_tries: u32) -> Self {
        Self {
            max_wrong_tries: max_wrong_tries.max(1),
        }
    }

    /// Wrong submissions allowed before the game is lost.
    pub fn max_wrong_tries(&self) -> u32 {
        self.max_wrong_tries
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WRONG_TRIES)
    }
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum SessionStatus {
    /// Still solving.
    InProgress,
    /// All four categories found.
    Won,
    /// Out of tries; the player may choose to keep playing.
    Lost,
    /// Lost, but the player chose to keep going.
    LostButContinuing,
}

impl SessionStatus {
    /// Whether submissions are evaluated in this status.
    pub fn accepts_submissions(self) -> bool {
        matches!(self, Self::InProgress | Self::LostButContinuing)
    }
}

/// Notifications a presentation layer may animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A category was just solved.
    CategoryFound(CategoryIndex),
    /// The final category was just solved.
    GameWon,
    /// The wrong-try budget was just exhausted.
    GameLost,
}

/// Result of a [`PuzzleSession::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Preconditions failed; nothing changed.
    Ignored,
    /// The four tiles formed the given category.
    Correct(CategoryIndex),
    /// The four tiles did not share a category.
    Incorrect,
}

/// The one outcome a finished session sends to the stats reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeReport {
    /// Puzzle that was played.
    pub puzzle_id: PuzzleId,
    /// Whether the player won.
    pub won: bool,
}

/// One play-through of one puzzle.
///
/// Every operation is total: calls that violate a precondition (submitting
/// fewer than four tiles, clicking a found tile, continuing when not lost)
/// leave the session untouched.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    rules: Rules,
    tiles: Vec<Tile>,
    selected: Vec<usize>,
    found: Vec<CategoryIndex>,
    wrong_tries: u32,
    status: SessionStatus,
    events: Vec<SessionEvent>,
    pending_report: Option<OutcomeReport>,
    reported: bool,
}

impl PuzzleSession {
    /// Starts a session: flattens the puzzle into tiles and shuffles them.
    #[instrument(skip_all, fields(puzzle_id = %puzzle.id()))]
    pub fn start<R: Rng>(puzzle: Puzzle, rules: Rules, rng: &mut R) -> Self {
        let mut session = Self::unshuffled(puzzle, rules);
        shuffle_all(&mut session.tiles, rng);
        info!(max_wrong_tries = rules.max_wrong_tries, "Session started");
        session
    }

    /// Starts a session with tiles in category order, without shuffling.
    pub fn unshuffled(puzzle: Puzzle, rules: Rules) -> Self {
        let tiles = Tile::flatten(&puzzle);
        Self {
            puzzle,
            rules,
            tiles,
            selected: Vec::with_capacity(WORDS_PER_CATEGORY),
            found: Vec::new(),
            wrong_tries: 0,
            status: SessionStatus::InProgress,
            events: Vec::new(),
            pending_report: None,
            reported: false,
        }
    }

    /// The puzzle being played.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// The rules in force.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Tiles in display order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Selected positions, in the order they were selected.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Found categories in discovery order.
    pub fn found_categories(&self) -> &[CategoryIndex] {
        &self.found
    }

    /// Number of incorrect submissions so far.
    pub fn wrong_tries(&self) -> u32 {
        self.wrong_tries
    }

    /// Tries left before the game is lost, zero once exhausted.
    pub fn remaining_tries(&self) -> u32 {
        self.rules.max_wrong_tries.saturating_sub(self.wrong_tries)
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the tile at `position` is selected.
    pub fn is_selected(&self, position: usize) -> bool {
        self.selected.contains(&position)
    }

    /// Whether the given category has been found.
    pub fn is_found(&self, category: CategoryIndex) -> bool {
        self.found.contains(&category)
    }

    /// Whether a submit would currently be evaluated.
    pub fn can_submit(&self) -> bool {
        self.status.accepts_submissions() && self.selected.len() == WORDS_PER_CATEGORY
    }

    /// First board position holding `word`, if any.
    pub fn position_of(&self, word: &str) -> Option<usize> {
        self.tiles.iter().position(|t| t.word() == word)
    }

    /// Selects or deselects the tile at `position`.
    ///
    /// Found tiles and out-of-range positions are ignored, and a fifth tile
    /// cannot be added to a full selection. Returns whether the selection
    /// changed.
    #[instrument(skip(self), fields(puzzle_id = %self.puzzle.id()))]
    pub fn toggle_tile(&mut self, position: usize) -> bool {
        let Some(tile) = self.tiles.get(position) else {
            debug!("Position out of range");
            return false;
        };

        if self.found.contains(&tile.category()) {
            debug!("Tile already found, ignoring");
            return false;
        }

        if let Some(index) = self.selected.iter().position(|&p| p == position) {
            self.selected.remove(index);
            debug!(selected = self.selected.len(), "Tile deselected");
            true
        } else if self.selected.len() < WORDS_PER_CATEGORY {
            self.selected.push(position);
            debug!(selected = self.selected.len(), "Tile selected");
            true
        } else {
            debug!("Selection full, ignoring");
            false
        }
    }

    /// Clears the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Evaluates the current four-tile selection.
    ///
    /// A correct group is appended to the found list and moved to the top of
    /// the board; finding the fourth wins. A wrong group costs a try; running
    /// out while in progress loses. The selection is always consumed.
    #[instrument(skip(self), fields(puzzle_id = %self.puzzle.id(), status = %self.status))]
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.selected.len() != WORDS_PER_CATEGORY {
            debug!(selected = self.selected.len(), "Submit needs a full selection");
            return SubmitOutcome::Ignored;
        }
        if !self.status.accepts_submissions() {
            debug!("Submit rejected in terminal status");
            return SubmitOutcome::Ignored;
        }

        let category = self.tiles[self.selected[0]].category();
        let all_same = self
            .selected
            .iter()
            .all(|&p| self.tiles[p].category() == category);

        let outcome = if all_same {
            self.accept_group(category);
            SubmitOutcome::Correct(category)
        } else {
            self.reject_group();
            SubmitOutcome::Incorrect
        };

        self.selected.clear();
        outcome
    }

    fn accept_group(&mut self, category: CategoryIndex) {
        self.found.push(category);
        organize_found(&mut self.tiles, &self.found);
        self.events.push(SessionEvent::CategoryFound(category));
        info!(category = %category, found = self.found.len(), "Category found");

        if self.found.len() == CategoryIndex::ALL.len() {
            self.status = SessionStatus::Won;
            self.events.push(SessionEvent::GameWon);
            self.queue_report(true);
            info!(wrong_tries = self.wrong_tries, "Puzzle solved");
        }
    }

    fn reject_group(&mut self) {
        self.wrong_tries += 1;
        info!(wrong_tries = self.wrong_tries, "Wrong group");

        if self.status == SessionStatus::InProgress
            && self.wrong_tries >= self.rules.max_wrong_tries
        {
            self.status = SessionStatus::Lost;
            self.events.push(SessionEvent::GameLost);
            self.queue_report(false);
            info!("Out of tries");
        }
    }

    /// Queues the session outcome unless one was already issued.
    fn queue_report(&mut self, won: bool) {
        if self.reported {
            debug!(won, "Outcome already reported, not reporting again");
            return;
        }
        self.reported = true;
        self.pending_report = Some(OutcomeReport {
            puzzle_id: self.puzzle.id().clone(),
            won,
        });
    }

    /// Shuffles the unfound tiles, leaving found groups in place.
    ///
    /// Clears the selection, since positions change.
    #[instrument(skip_all, fields(puzzle_id = %self.puzzle.id()))]
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        shuffle_unfound(&mut self.tiles, &self.found, rng);
        self.selected.clear();
    }

    /// Lets a player who has lost keep solving. Returns whether it applied.
    #[instrument(skip(self), fields(puzzle_id = %self.puzzle.id(), status = %self.status))]
    pub fn accept_continue(&mut self) -> bool {
        if self.status != SessionStatus::Lost {
            debug!("Keep playing only applies after a loss");
            return false;
        }
        self.status = SessionStatus::LostButContinuing;
        info!("Player keeps playing");
        true
    }

    /// Takes the pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Takes the outcome report, if the session just finished.
    ///
    /// A session yields at most one report over its lifetime.
    pub fn take_report(&mut self) -> Option<OutcomeReport> {
        self.pending_report.take()
    }

    /// Name of `category`, only if it has been found.
    pub fn category_name(&self, category: CategoryIndex) -> Option<&str> {
        self.is_found(category)
            .then(|| self.puzzle.category(category).name().as_str())
    }

    /// Found categories in discovery order.
    pub fn revealed_categories(&self) -> Vec<(CategoryIndex, &Category)> {
        self.found
            .iter()
            .map(|&index| (index, self.puzzle.category(index)))
            .collect()
    }

    /// All four categories, available once the game is won or lost.
    pub fn reveal_all(&self) -> Option<&[Category]> {
        matches!(self.status, SessionStatus::Won | SessionStatus::Lost)
            .then(|| self.puzzle.categories().as_slice())
    }

    /// Per-tile rendering data in display order.
    pub fn tile_views(&self) -> Vec<TileView<'_>> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(position, tile)| {
                let found = self.is_found(tile.category()).then_some(tile.category());
                TileView {
                    position,
                    word: tile.word(),
                    selected: self.is_selected(position),
                    found,
                    category_name: found.and_then(|c| self.category_name(c)),
                }
            })
            .collect()
    }
}
