//! Chinese Checkers scenario tests on the standard 121-hole board.

use std::sync::Arc;

use serde_json::json;

use board_sim::games::chinese_checkers::{ChineseCheckersConfig, ChineseCheckersState};
use board_sim::{Coord, GameAction, GameConfig, GameState, PlayerId};

fn coords(pairs: &[(i32, i32)]) -> Vec<Coord> {
    pairs.iter().map(|&p| Coord::from(p)).collect()
}

fn destinations(state: &ChineseCheckersState, index: usize) -> Vec<Coord> {
    state.actions_for(index).unwrap().iter().map(|a| a.destination()).collect()
}

/// Both players start with a full home triangle.
#[test]
fn test_initial_position() {
    let config = Arc::new(ChineseCheckersConfig::default());
    let state = config.sample_initial_state();

    assert_eq!(
        state.pieces(PlayerId::new(0)),
        coords(&[(4, 4), (4, 5), (4, 6), (4, 7), (5, 4), (5, 5), (5, 6), (6, 4), (6, 5), (7, 4)]).as_slice()
    );
    assert_eq!(
        state.pieces(PlayerId::new(1)),
        coords(&[(9, 12), (10, 11), (10, 12), (11, 10), (11, 11), (11, 12), (12, 9), (12, 10), (12, 11), (12, 12)])
            .as_slice()
    );
    assert_eq!(state.reward().as_slice(), &[0, 0]);
}

/// The first two documented turns.
#[test]
fn test_documented_sequence() {
    let config = Arc::new(ChineseCheckersConfig::default());
    let state = config.sample_initial_state();

    assert_eq!(destinations(&state, 6), coords(&[(5, 7), (6, 6)]));
    let state = state.action_at(6, Coord::new(6, 6)).unwrap().sample_next_state();

    assert_eq!(state.player(), PlayerId::new(1));
    assert_eq!(state.pieces(PlayerId::new(1))[2], Coord::new(10, 12));
    assert_eq!(destinations(&state, 2), coords(&[(8, 12), (10, 10)]));
    let state = state.action_at(2, Coord::new(10, 10)).unwrap().sample_next_state();

    assert_eq!(state.player(), PlayerId::new(0));
    assert_eq!(
        state.pieces(PlayerId::new(0)),
        coords(&[(4, 4), (4, 5), (4, 6), (4, 7), (5, 4), (5, 5), (6, 4), (6, 5), (6, 6), (7, 4)]).as_slice()
    );
    assert_eq!(
        state.pieces(PlayerId::new(1)),
        coords(&[(9, 12), (10, 10), (10, 11), (11, 10), (11, 11), (11, 12), (12, 9), (12, 10), (12, 11), (12, 12)])
            .as_slice()
    );
}

/// A decoded mid-game position with long jump chains.
#[test]
fn test_individual_position() {
    let config = Arc::new(ChineseCheckersConfig::default());
    let json = json!({
        "pieces": [
            [[4, 4], [4, 5], [4, 6], [4, 7], [5, 4], [6, 4], [6, 6], [7, 4], [7, 6], [7, 9]],
            [[5, 9], [5, 11], [6, 7], [9, 12], [10, 12], [11, 11], [11, 12], [12, 10], [12, 11], [12, 12]],
        ],
        "player": 0,
        "winner": -1,
    });
    let state = ChineseCheckersState::from_json(&config, &json).unwrap();

    assert_eq!(state.pieces(PlayerId::new(0))[8], Coord::new(7, 6));
    let found: Vec<Coord> = state.actions_at(Coord::new(7, 6)).unwrap().iter().map(|a| a.destination()).collect();
    assert_eq!(
        found,
        coords(&[(5, 6), (5, 8), (5, 10), (5, 12), (7, 5), (7, 7), (8, 5), (8, 6)])
    );
    assert_eq!(destinations(&state, 8), found);

    assert_eq!(state.to_json(), json);
}

/// Every action's JSON names the right source marble.
#[test]
fn test_action_sources() {
    let config = Arc::new(ChineseCheckersConfig::default());
    let state = config.sample_initial_state();

    for action in state.actions() {
        let json = action.to_json();
        let index = json["index"].as_u64().unwrap() as usize;
        assert_eq!(action.source(), state.pieces(state.player())[index]);
    }
}
