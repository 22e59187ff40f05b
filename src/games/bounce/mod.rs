//! Bounce: a two-sided race across a rectangular board.
//!
//! ## Rules
//!
//! - Pieces carry a value 1-9 and belong to nobody in particular
//! - Player 0 moves pieces from the lowest occupied row, player 1 from the
//!   highest occupied row
//! - A piece walks exactly `value` orthogonal steps over empty cells
//! - Finishing on another piece bounces: the walk continues with that
//!   piece's value
//! - Sideways steps off the board reflect off the wall
//! - No cell is visited twice in one move
//! - Reaching the far goal row (with the last step) wins
//!
//! A player left without moves draws the game.

mod game;
mod search;

pub use game::{BounceAction, BounceConfig, BounceState};
