//! Bounce scenario tests.
//!
//! Boards are written top row first, goal rows included, with `.` for an
//! empty cell.

use std::sync::Arc;

use serde_json::json;

use board_sim::games::bounce::{BounceConfig, BounceState};
use board_sim::{Coord, GameAction, GameConfig, GameState, PlayerId};

fn parse(drawing: &str) -> Vec<Vec<u8>> {
    let mut rows: Vec<Vec<u8>> = drawing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().map(|cell| cell.parse().unwrap_or(0)).collect())
        .collect();
    rows.reverse();
    rows
}

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

fn targets(state: &BounceState, source: Coord) -> Vec<Coord> {
    state.actions_at(source).unwrap().iter().map(|a| a.target()).collect()
}

fn small_config() -> Arc<BounceConfig> {
    Arc::new(
        BounceConfig::new(&parse(
            "
            . . .
            1 2 3
            . . .
            . . .
            1 2 3
            . . .
            ",
        ))
        .unwrap(),
    )
}

/// The four-move game on the 6x3 board ends with player 1 in the goal.
#[test]
fn test_small_board_game() {
    let config = small_config();
    let state = config.sample_initial_state();

    assert_eq!(targets(&state, c(1, 1)), vec![c(0, 2), c(2, 2), c(1, 3)]);
    let state = state.action_at(c(1, 1), c(1, 3)).unwrap().sample_next_state();

    assert_eq!(state.player(), PlayerId::new(1));
    assert_eq!(targets(&state, c(0, 4)), vec![c(0, 3)]);
    let state = state.action_at(c(0, 4), c(0, 3)).unwrap().sample_next_state();

    assert_eq!(targets(&state, c(0, 1)), vec![c(1, 1), c(0, 2)]);
    let state = state.action_at(c(0, 1), c(1, 1)).unwrap().sample_next_state();

    // The 2 bounces off three pieces on its way down to the goal row.
    assert_eq!(targets(&state, c(1, 4)), vec![c(1, 0), c(0, 1), c(0, 2), c(2, 2)]);
    let state = state.action_at(c(1, 4), c(1, 0)).unwrap().sample_next_state();

    let expected = parse(
        "
        . . .
        . . 3
        1 2 .
        . . .
        . 1 3
        . 2 .
        ",
    );
    assert_eq!(state.grid(), expected);
    assert!(state.has_ended());
    assert!(state.actions().is_empty());
    assert_eq!(state.winner(), Some(PlayerId::new(1)));
    assert_eq!(state.reward().as_slice(), &[-1, 1]);
}

/// The first three turns on the standard board highlight these targets.
#[test]
fn test_standard_board_opening() {
    let config = Arc::new(BounceConfig::default());
    let state = config.sample_initial_state();

    assert_eq!(targets(&state, c(0, 1)), vec![c(0, 2), c(2, 2), c(1, 3)]);
    let state = state.action_at(c(0, 1), c(1, 3)).unwrap().sample_next_state();

    assert_eq!(
        targets(&state, c(2, 7)),
        vec![c(2, 4), c(1, 5), c(3, 5), c(0, 6), c(4, 6)]
    );
    let state = state.action_at(c(2, 7), c(2, 4)).unwrap().sample_next_state();

    assert_eq!(
        targets(&state, c(1, 1)),
        vec![c(0, 2), c(2, 2), c(0, 3), c(2, 3), c(1, 4)]
    );

    let expected = parse(
        "
        . . . . . .
        1 2 . 3 2 1
        . . . . . .
        . . . . . .
        . . 3 . . .
        . 1 . . . .
        . . . . . .
        . 2 3 3 2 1
        . . . . . .
        ",
    );
    assert_eq!(state.grid(), expected);
    assert!(!state.has_ended());
}

/// Two interlocked full rows leave player 0 without a move.
#[test]
fn test_blocked_board_is_a_draw() {
    let config = Arc::new(
        BounceConfig::new(&parse(
            "
            . . . . . .
            3 2 3 2 3 2
            2 3 2 3 2 3
            . . . . . .
            ",
        ))
        .unwrap(),
    );
    let state = config.sample_initial_state();

    assert!(state.has_ended());
    assert!(state.actions().is_empty());
    assert_eq!(state.winner(), None);
    assert_eq!(state.reward().as_slice(), &[0, 0]);
    assert!(state.actions_at(c(0, 1)).unwrap_err().is_invalid_action());
}

/// A position mid-game survives encode and decode, and the decoded state
/// offers the same moves.
#[test]
fn test_mid_game_round_trip() {
    let config = small_config();
    let state = config
        .sample_initial_state()
        .action_at(c(1, 1), c(1, 3))
        .unwrap()
        .sample_next_state();

    let json = state.to_json();
    let decoded = BounceState::from_json(&config, &json).unwrap();
    assert_eq!(decoded, state);

    let before: Vec<_> = state.actions().iter().map(|a| a.to_json()).collect();
    let after: Vec<_> = decoded.actions().iter().map(|a| a.to_json()).collect();
    assert_eq!(before, after);

    assert_eq!(config.to_json(), json!({"grid": parse(
        "
        . . .
        1 2 3
        . . .
        . . .
        1 2 3
        . . .
        "
    )}));
}
