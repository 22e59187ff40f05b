//! Uniform random playouts over any game.

use std::sync::Arc;

use log::debug;

use crate::core::player::PlayerMap;
use crate::core::rng::GameRng;
use crate::rules::engine::{GameAction, GameConfig, GameResult, GameState};

/// Outcome of a playout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayoutSummary {
    /// Number of moves played.
    pub moves: usize,
    /// `None` if the move cap was hit first.
    pub result: Option<GameResult>,
    /// Reward of the final state.
    pub reward: PlayerMap<i32>,
}

/// Play uniformly random moves from the initial position.
///
/// Stops when the game ends or after `max_moves` moves.
pub fn random_playout<C: GameConfig>(config: &Arc<C>, rng: &mut GameRng, max_moves: usize) -> PlayoutSummary {
    random_playout_from(config.sample_initial_state(), rng, max_moves)
}

/// Play uniformly random moves from `state`.
pub fn random_playout_from<S: GameState>(mut state: S, rng: &mut GameRng, max_moves: usize) -> PlayoutSummary {
    let mut moves = 0;

    while moves < max_moves {
        let next = {
            let actions = state.actions();
            match rng.choose(&actions) {
                Some(action) => action.sample_next_state(),
                None => break,
            }
        };
        state = next;
        moves += 1;
    }

    let result = state.result();
    debug!("playout finished after {} moves: {:?}", moves, result);

    PlayoutSummary {
        moves,
        result,
        reward: state.reward().clone(),
    }
}
