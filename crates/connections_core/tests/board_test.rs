//! Tests for board load bookkeeping.

use rand::SeedableRng;
use rand::rngs::StdRng;

use connections_core::{
    BoardState, Category, GameBoard, LoadMode, Puzzle, PuzzleId, Rules, SessionStatus,
};

fn puzzle(id: &str) -> Puzzle {
    let category = |name: &str, prefix: &str| {
        Category::new(
            name.to_string(),
            [1, 2, 3, 4].map(|n| format!("{prefix}{n}")),
        )
    };
    Puzzle::new(
        PuzzleId::new(id),
        format!("Puzzle {id}"),
        [
            category("A", "a"),
            category("B", "b"),
            category("C", "c"),
            category("D", "d"),
        ],
    )
}

fn loaded_id(board: &GameBoard) -> Option<&str> {
    board.session().map(|s| s.puzzle().id().as_str())
}

fn lose(board: &mut GameBoard) {
    let session = board.session_mut().expect("session loaded");
    for _ in 0..4 {
        for word in ["a1", "a2", "a3", "b1"] {
            let position = session.position_of(word).expect("word on board");
            session.toggle_tile(position);
        }
        session.submit();
    }
    assert_eq!(session.status(), SessionStatus::Lost);
}

#[test]
fn test_new_board_is_loading() {
    let board = GameBoard::new(LoadMode::Random, Rules::default());
    assert!(board.is_loading());
    assert!(board.session().is_none());
}

#[test]
fn test_finish_load_installs_session() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let ticket = board.begin_load(LoadMode::Random);

    assert!(board.finish_load(ticket, Ok(puzzle("p1")), &mut rng));
    assert_eq!(loaded_id(&board), Some("p1"));
    assert_eq!(board.session().map(|s| s.status()), Some(SessionStatus::InProgress));
}

#[test]
fn test_stale_result_is_discarded() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let first = board.begin_load(LoadMode::ById(PuzzleId::new("p1")));
    let second = board.begin_load(LoadMode::ById(PuzzleId::new("p2")));

    // The second response wins the race.
    assert!(board.finish_load(second, Ok(puzzle("p2")), &mut rng));
    assert!(!board.finish_load(first, Ok(puzzle("p1")), &mut rng));
    assert_eq!(loaded_id(&board), Some("p2"));
}

#[test]
fn test_stale_result_arriving_first_is_discarded() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let first = board.begin_load(LoadMode::Random);
    let second = board.begin_load(LoadMode::Random);

    assert!(!board.finish_load(first, Ok(puzzle("p1")), &mut rng));
    assert!(board.is_loading());
    assert!(board.finish_load(second, Ok(puzzle("p2")), &mut rng));
    assert_eq!(loaded_id(&board), Some("p2"));
}

#[test]
fn test_duplicate_delivery_does_not_reset_session() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let ticket = board.begin_load(LoadMode::Random);
    board.finish_load(ticket, Ok(puzzle("p1")), &mut rng);
    lose(&mut board);

    assert!(!board.finish_load(ticket, Ok(puzzle("p1")), &mut rng));
    assert_eq!(board.session().map(|s| s.wrong_tries()), Some(4));
}

#[test]
fn test_failed_load_shows_error() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let ticket = board.begin_load(LoadMode::ById(PuzzleId::new("missing")));

    assert!(board.finish_load(ticket, Err("Puzzle not found".to_string()), &mut rng));
    match board.state() {
        BoardState::Error(message) => assert_eq!(message, "Puzzle not found"),
        other => panic!("expected error state, got {other:?}"),
    }
    assert!(board.session().is_none());
}

#[test]
fn test_new_game_keeps_mode() {
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let mode = LoadMode::ById(PuzzleId::new("p9"));
    let first = board.begin_load(mode.clone());

    let second = board.new_game();
    assert!(second > first);
    assert_eq!(board.mode(), &mode);
    assert!(board.is_loading());
}

#[test]
fn test_decline_continue_starts_new_game_only_after_loss() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let ticket = board.begin_load(LoadMode::Random);
    board.finish_load(ticket, Ok(puzzle("p1")), &mut rng);

    assert!(board.decline_continue().is_none());
    assert_eq!(loaded_id(&board), Some("p1"));

    lose(&mut board);
    let next = board.decline_continue().expect("new game after loss");
    assert!(next > ticket);
    assert!(board.is_loading());
}

#[test]
fn test_decline_after_keep_playing_is_ignored() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut board = GameBoard::new(LoadMode::Random, Rules::default());
    let ticket = board.begin_load(LoadMode::Random);
    board.finish_load(ticket, Ok(puzzle("p1")), &mut rng);
    lose(&mut board);
    assert!(board.session_mut().expect("session loaded").accept_continue());

    assert!(board.decline_continue().is_none());
    assert_eq!(
        board.session().map(|s| s.status()),
        Some(SessionStatus::LostButContinuing)
    );
}

#[test]
fn test_board_rules_flow_into_sessions() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut board = GameBoard::new(LoadMode::Random, Rules::new(6));
    let ticket = board.begin_load(LoadMode::Random);
    board.finish_load(ticket, Ok(puzzle("p1")), &mut rng);

    assert_eq!(board.session().map(|s| s.remaining_tries()), Some(6));
}

#[test]
fn test_load_mode_display() {
    assert_eq!(LoadMode::Random.to_string(), "random");
    assert_eq!(LoadMode::ById(PuzzleId::new("abc")).to_string(), "id abc");
}
