//! Connect: a gravity-drop line connection game.
//!
//! - Players take turns dropping a piece into a column
//! - The piece falls to the lowest empty row
//! - A line of `count` pieces in any of the four directions wins
//! - A full board without a line is a draw
//!
//! Board size, line length and player count (2-8) are configurable. The
//! default is the classic 6x7 board with lines of four.

mod game;

pub use game::{ConnectAction, ConnectConfig, ConnectState};
