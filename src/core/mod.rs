//! Core building blocks shared by every game: players, coordinates, errors
//! and the deterministic RNG used by playout drivers.

pub mod coord;
pub mod error;
pub mod player;
pub mod rng;

pub use coord::Coord;
pub use error::{GameError, Result};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
