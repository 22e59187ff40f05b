//! Game implementations.
//!
//! Each game provides a config, state and action type implementing the
//! contract in `rules`.

pub mod bounce;
pub mod chinese_checkers;
pub mod connect;
