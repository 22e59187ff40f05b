//! # board-sim
//!
//! Rule engines for abstract board games, built for fast simulation.
//!
//! ## Design Principles
//!
//! 1. **One Contract**: Every game implements `GameConfig`, `GameState` and
//!    `GameAction`. Drivers never need to know which game is loaded.
//!
//! 2. **Immutable States**: A transition builds a new state. Legal actions
//!    are computed once per state and cached.
//!
//! 3. **Deterministic**: Engines draw no randomness. Playout drivers take an
//!    explicit seeded `GameRng`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use board_sim::games::connect::ConnectConfig;
//! use board_sim::{random_playout, GameRng};
//!
//! let config = Arc::new(ConnectConfig::default());
//! let mut rng = GameRng::new(42);
//! let summary = random_playout(&config, &mut rng, 100);
//!
//! assert!(summary.result.is_some());
//! assert_eq!(summary.reward.total(), 0);
//! ```
//!
//! ## Modules
//!
//! - `core`: players, coordinates, errors, RNG
//! - `rules`: the game contract and the random playout driver
//! - `games`: Connect, Bounce and Chinese Checkers
//! - `python`: PyO3 bindings (feature `python`)

mod codec;
pub mod core;
pub mod games;
pub mod rules;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{Coord, GameError, GameRng, PlayerId, PlayerMap, Result};

pub use crate::rules::{
    random_playout, random_playout_from, GameAction, GameConfig, GameResult, GameState, PlayoutSummary,
};

pub use crate::games::bounce::{BounceAction, BounceConfig, BounceState};
pub use crate::games::chinese_checkers::{ChineseCheckersAction, ChineseCheckersConfig, ChineseCheckersState};
pub use crate::games::connect::{ConnectAction, ConnectConfig, ConnectState};
