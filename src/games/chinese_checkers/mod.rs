//! Chinese Checkers for two players on the star board.
//!
//! - Each player starts with a full home triangle of marbles
//! - A move steps to an adjacent empty hole or makes a chain of jumps over
//!   single marbles
//! - Moving every marble into the opposite triangle wins
//! - A player with no move left draws the game
//!
//! Moves are addressed by an index into the mover's piece list, which is
//! kept sorted by coordinate.

mod board;
mod game;

pub use board::{HexBoard, NEIGHBORS};
pub use game::{ChineseCheckersAction, ChineseCheckersConfig, ChineseCheckersState};
