//! Game-agnostic contract and drivers.
//!
//! Games implement `GameConfig`, `GameState` and `GameAction`. Everything
//! in this module is written against those traits only and never
//! interprets game-specific concepts.

pub mod engine;
pub mod playout;

pub use engine::{GameAction, GameConfig, GameResult, GameState};
pub use playout::{random_playout, random_playout_from, PlayoutSummary};
