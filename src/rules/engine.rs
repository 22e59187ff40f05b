//! The simulation contract shared by every game.
//!
//! A game is three cooperating types:
//!
//! - a `GameConfig`: immutable parameters, shared through `Arc`
//! - a `GameState`: an immutable snapshot that knows its legal actions
//! - a `GameAction<'a>`: a move borrowed from the state it was enumerated on
//!
//! Drivers only ever talk to these traits, so random playouts, benchmarks
//! and agents run unchanged against any game.
//!
//! ## Implementation Notes
//!
//! - `actions()` must be empty exactly when `has_ended()` is true
//! - `sample_next_state()` must be deterministic
//! - `reward()` is all zeros until the game ends and fixed afterwards

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::core::player::{PlayerId, PlayerMap};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }

    /// Reward vector for this result: +1/-1 for a win, zeros for a draw.
    #[must_use]
    pub fn rewards(&self, player_count: usize) -> PlayerMap<i32> {
        match self {
            GameResult::Winner(p) => PlayerMap::win_for(player_count, *p),
            GameResult::Draw => PlayerMap::with_value(player_count, 0),
        }
    }
}

/// Immutable game parameters.
pub trait GameConfig: Sized + Debug + PartialEq + Send + Sync {
    type State: GameState<Config = Self>;

    /// Number of players taking turns.
    fn num_players(&self) -> usize;

    /// The starting position. Every game here starts deterministically.
    fn sample_initial_state(self: &Arc<Self>) -> Self::State;
}

/// Immutable game snapshot.
pub trait GameState: Clone + PartialEq + Eq + Hash + Debug + Send + Sync {
    type Config: GameConfig<State = Self>;

    /// A legal move, borrowing the state it was enumerated on.
    type Action<'a>: GameAction<'a, State = Self>
    where
        Self: 'a;

    fn config(&self) -> &Arc<Self::Config>;

    /// True once no further moves exist.
    fn has_ended(&self) -> bool;

    /// The player to move. After a win this is game-specific.
    fn player(&self) -> PlayerId;

    /// The winner, if the game ended with one.
    fn winner(&self) -> Option<PlayerId>;

    /// One entry per player.
    fn reward(&self) -> &PlayerMap<i32>;

    /// All legal actions, in the game's canonical order.
    fn actions(&self) -> Vec<Self::Action<'_>>;

    /// `None` while the game is running.
    fn result(&self) -> Option<GameResult> {
        if !self.has_ended() {
            return None;
        }
        Some(match self.winner() {
            Some(player) => GameResult::Winner(player),
            None => GameResult::Draw,
        })
    }
}

/// A legal move of some state.
pub trait GameAction<'a>: Clone + PartialEq + Eq + Hash + Debug {
    type State: GameState + 'a;

    /// The state this action was enumerated on.
    fn state(&self) -> &'a Self::State;

    /// The state reached by playing this action.
    fn sample_next_state(&self) -> Self::State;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));
    }

    #[test]
    fn test_game_result_rewards() {
        let win = GameResult::Winner(PlayerId::new(0));
        assert_eq!(win.rewards(2).as_slice(), &[1, -1]);
        assert_eq!(win.rewards(3).as_slice(), &[1, -1, -1]);
        assert_eq!(GameResult::Draw.rewards(2).as_slice(), &[0, 0]);
    }
}
