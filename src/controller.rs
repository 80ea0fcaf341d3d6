//! Drives a [`GameBoard`] from player gestures and network results.
//!
//! Loads run on spawned tasks and report back through a channel tagged
//! with their ticket, so the board can drop results that arrive after a
//! newer load has started. Finished sessions are reported in the
//! background without blocking play.

use crate::source::PuzzleSource;
use crate::stats::{StatsReporter, report_in_background};
use connections_core::{GameBoard, LoadMode, LoadTicket, Puzzle, Rules, SessionEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Something the player did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Clicked the tile at a board position.
    ToggleTile(usize),
    /// Submitted the current selection.
    Submit,
    /// Asked for the unfound tiles to be shuffled.
    Shuffle,
    /// Asked for a new game in the current mode.
    NewGame,
    /// Answered yes to keep playing after a loss.
    KeepPlaying,
    /// Answered no to keep playing after a loss.
    StopPlaying,
    /// Asked for a specific puzzle or a random one.
    Load(LoadMode),
}

type LoadResult = (LoadTicket, Result<Puzzle, String>);

/// Owns the board and its collaborators.
pub struct GameController {
    board: GameBoard,
    source: Arc<dyn PuzzleSource>,
    reporter: Arc<dyn StatsReporter>,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
    rng: StdRng,
    reports: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("board", &self.board)
            .field("pending_reports", &self.reports.len())
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller. Nothing is loaded until [`Self::start_load`].
    pub fn new(
        source: Arc<dyn PuzzleSource>,
        reporter: Arc<dyn StatsReporter>,
        mode: LoadMode,
        rules: Rules,
    ) -> Self {
        Self::with_rng(source, reporter, mode, rules, StdRng::from_os_rng())
    }

    /// Creates a controller whose shuffles are reproducible.
    pub fn with_seed(
        source: Arc<dyn PuzzleSource>,
        reporter: Arc<dyn StatsReporter>,
        mode: LoadMode,
        rules: Rules,
        seed: u64,
    ) -> Self {
        Self::with_rng(source, reporter, mode, rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        source: Arc<dyn PuzzleSource>,
        reporter: Arc<dyn StatsReporter>,
        mode: LoadMode,
        rules: Rules,
        rng: StdRng,
    ) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        Self {
            board: GameBoard::new(mode, rules),
            source,
            reporter,
            load_tx,
            load_rx,
            rng,
            reports: Vec::new(),
        }
    }

    /// The board being played.
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    /// Starts loading a puzzle in `mode`, superseding any load in flight.
    pub fn start_load(&mut self, mode: LoadMode) -> LoadTicket {
        let ticket = self.board.begin_load(mode);
        self.spawn_load(ticket);
        ticket
    }

    #[instrument(skip(self), fields(mode = %self.board.mode()))]
    fn spawn_load(&self, ticket: LoadTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.load_tx.clone();
        let mode = self.board.mode().clone();

        tokio::spawn(async move {
            let result = source.fetch(&mode).await.map_err(|e| {
                info!(error = %e, "Load failed");
                e.user_message()
            });
            if tx.send((ticket, result)).is_err() {
                debug!("Controller dropped before load finished");
            }
        });
    }

    /// Applies a gesture and returns the events it produced.
    #[instrument(skip(self))]
    pub fn handle(&mut self, gesture: Gesture) -> Vec<SessionEvent> {
        match gesture {
            Gesture::ToggleTile(position) => {
                if let Some(session) = self.board.session_mut() {
                    session.toggle_tile(position);
                }
            }
            Gesture::Submit => {
                if let Some(session) = self.board.session_mut() {
                    session.submit();
                }
            }
            Gesture::Shuffle => {
                if let Some(session) = self.board.session_mut() {
                    session.shuffle(&mut self.rng);
                }
            }
            Gesture::KeepPlaying => {
                if let Some(session) = self.board.session_mut() {
                    session.accept_continue();
                }
            }
            Gesture::StopPlaying => {
                if let Some(ticket) = self.board.decline_continue() {
                    self.spawn_load(ticket);
                }
            }
            Gesture::NewGame => {
                let ticket = self.board.new_game();
                self.spawn_load(ticket);
            }
            Gesture::Load(mode) => {
                self.start_load(mode);
            }
        }
        self.collect()
    }

    /// Drains session events and dispatches a pending outcome report.
    fn collect(&mut self) -> Vec<SessionEvent> {
        self.reports.retain(|handle| !handle.is_finished());

        let Some(session) = self.board.session_mut() else {
            return Vec::new();
        };
        let events = session.drain_events();
        if let Some(report) = session.take_report() {
            self.reports
                .push(report_in_background(Arc::clone(&self.reporter), report));
        }
        events
    }

    fn apply(&mut self, ticket: LoadTicket, result: Result<Puzzle, String>) -> bool {
        self.board.finish_load(ticket, result, &mut self.rng)
    }

    /// Applies every load result that has already arrived.
    ///
    /// Returns whether any of them changed the board.
    pub fn poll_loads(&mut self) -> bool {
        let mut changed = false;
        while let Ok((ticket, result)) = self.load_rx.try_recv() {
            changed |= self.apply(ticket, result);
        }
        changed
    }

    /// Waits for the next load result and applies it.
    ///
    /// Returns whether it changed the board; a stale result does not.
    pub async fn next_load(&mut self) -> bool {
        match self.load_rx.recv().await {
            Some((ticket, result)) => self.apply(ticket, result),
            None => false,
        }
    }

    /// Waits for outstanding outcome reports to finish.
    pub async fn flush_reports(&mut self) {
        for handle in self.reports.drain(..) {
            if let Err(e) = handle.await {
                debug!(error = %e, "Report task did not complete");
            }
        }
    }
}
