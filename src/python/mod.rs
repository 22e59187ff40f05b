//! Python bindings for the board-sim game engines.
//!
//! Every game is exposed as a `Config`/`State`/`Action` class triple with
//! the same surface, so agents and UIs can drive any of them.
//!
//! # Quick Start
//!
//! ```python
//! import board_sim as bs
//!
//! config = bs.ConnectConfig(height=6, width=7, count=4)
//! state = config.sample_initial_state()
//!
//! while not state.has_ended:
//!     state = state.actions[0].sample_next_state()
//!
//! print(state.winner, state.reward)
//! ```
//!
//! Malformed JSON raises `ValueError`; asking for a move that does not exist
//! raises `RuntimeError`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::GameError;

mod py_bounce;
mod py_chinese_checkers;
mod py_connect;

pub use py_bounce::*;
pub use py_chinese_checkers::*;
pub use py_connect::*;

impl From<GameError> for PyErr {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Validation(_) => PyValueError::new_err(err.to_string()),
            GameError::InvalidAction(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Convert canonical JSON into plain Python objects.
fn to_py_json(py: Python<'_>, value: &serde_json::Value) -> PyResult<PyObject> {
    let json = py.import_bound("json")?;
    Ok(json.call_method1("loads", (value.to_string(),))?.unbind())
}

/// Convert plain Python objects into canonical JSON.
fn from_py_json(obj: &Bound<'_, PyAny>) -> PyResult<serde_json::Value> {
    let json = obj.py().import_bound("json")?;
    let text: String = json.call_method1("dumps", (obj,))?.extract()?;
    serde_json::from_str(&text).map_err(|err| PyValueError::new_err(err.to_string()))
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// board_sim: abstract board game engines for simulation.
///
/// This module provides:
/// - Connect (configurable gravity-drop line game)
/// - Bounce (exact-count race with bounces and wall reflection)
/// - Chinese Checkers (two-player star board race)
#[pymodule]
fn board_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConnectConfig>()?;
    m.add_class::<PyConnectState>()?;
    m.add_class::<PyConnectAction>()?;

    m.add_class::<PyBounceConfig>()?;
    m.add_class::<PyBounceState>()?;
    m.add_class::<PyBounceAction>()?;

    m.add_class::<PyChineseCheckersConfig>()?;
    m.add_class::<PyChineseCheckersState>()?;
    m.add_class::<PyChineseCheckersAction>()?;

    Ok(())
}
