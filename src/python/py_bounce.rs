//! Bounce bindings for Python.

use std::sync::Arc;

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::Coord;
use crate::games::bounce::{BounceAction, BounceConfig, BounceState};
use crate::rules::{GameAction, GameConfig, GameState};

use super::{from_py_json, hash_of, to_py_json};

/// Python wrapper for BounceConfig.
#[pyclass(name = "BounceConfig", frozen)]
#[derive(Clone, Debug)]
pub struct PyBounceConfig(pub Arc<BounceConfig>);

#[pymethods]
impl PyBounceConfig {
    /// Create from rows listed bottom-to-top, goal rows included.
    ///
    /// Without a grid, the standard 9x6 layout is used.
    #[new]
    #[pyo3(signature = (grid = None))]
    fn new(grid: Option<Vec<Vec<u8>>>) -> PyResult<Self> {
        let config = match grid {
            Some(rows) => BounceConfig::new(&rows)?,
            None => BounceConfig::default(),
        };
        Ok(Self(Arc::new(config)))
    }

    #[getter]
    fn num_players(&self) -> usize {
        self.0.num_players()
    }

    #[getter]
    fn grid(&self) -> Vec<Vec<u8>> {
        self.0.grid()
    }

    fn sample_initial_state(&self) -> PyBounceState {
        PyBounceState(self.0.sample_initial_state())
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    fn from_json(data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let config = BounceConfig::from_json(&from_py_json(data)?)?;
        Ok(Self(Arc::new(config)))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        hash_of(&*self.0)
    }

    fn __repr__(&self) -> String {
        format!("BounceConfig(height={}, width={})", self.0.height(), self.0.width())
    }
}

fn config_or_default(config: Option<&PyBounceConfig>) -> Arc<BounceConfig> {
    config.map_or_else(|| Arc::new(BounceConfig::default()), |c| Arc::clone(&c.0))
}

/// Python wrapper for BounceState.
#[pyclass(name = "BounceState", frozen)]
#[derive(Clone, Debug)]
pub struct PyBounceState(pub BounceState);

impl PyBounceState {
    fn wrap(slf: &Bound<'_, Self>, action: &BounceAction<'_>) -> PyBounceAction {
        PyBounceAction {
            state: slf.clone().unbind(),
            source: action.source(),
            target: action.target(),
        }
    }
}

#[pymethods]
impl PyBounceState {
    #[staticmethod]
    #[pyo3(signature = (config = None))]
    fn sample_initial_state(config: Option<&PyBounceConfig>) -> Self {
        Self(config_or_default(config).sample_initial_state())
    }

    #[getter]
    fn config(&self) -> PyBounceConfig {
        PyBounceConfig(Arc::clone(self.0.config()))
    }

    #[getter]
    fn has_ended(&self) -> bool {
        self.0.has_ended()
    }

    #[getter]
    fn player(&self) -> usize {
        self.0.player().index()
    }

    #[getter]
    fn winner(&self) -> Option<usize> {
        self.0.winner().map(|p| p.index())
    }

    #[getter]
    fn reward<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i32>> {
        PyArray1::from_slice_bound(py, self.0.reward().as_slice())
    }

    #[getter]
    fn grid(&self) -> Vec<Vec<u8>> {
        self.0.grid()
    }

    #[getter]
    fn actions(slf: &Bound<'_, Self>) -> Vec<PyBounceAction> {
        slf.get().0.actions().iter().map(|a| Self::wrap(slf, a)).collect()
    }

    fn actions_at(slf: &Bound<'_, Self>, source: (i32, i32)) -> PyResult<Vec<PyBounceAction>> {
        let actions = slf.get().0.actions_at(Coord::from(source))?;
        Ok(actions.iter().map(|a| Self::wrap(slf, a)).collect())
    }

    fn action_at(slf: &Bound<'_, Self>, source: (i32, i32), target: (i32, i32)) -> PyResult<PyBounceAction> {
        let action = slf.get().0.action_at(Coord::from(source), Coord::from(target))?;
        Ok(Self::wrap(slf, &action))
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    #[pyo3(signature = (data, config = None))]
    fn from_json(data: &Bound<'_, PyAny>, config: Option<&PyBounceConfig>) -> PyResult<Self> {
        let state = BounceState::from_json(&config_or_default(config), &from_py_json(data)?)?;
        Ok(Self(state))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        hash_of(&self.0)
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __repr__(&self) -> String {
        format!("BounceState(player={}, winner={:?})", self.0.player().0, self.winner())
    }
}

/// Python wrapper for BounceAction.
#[pyclass(name = "BounceAction", frozen)]
pub struct PyBounceAction {
    state: Py<PyBounceState>,
    source: Coord,
    target: Coord,
}

impl PyBounceAction {
    fn resolve(&self) -> PyResult<BounceAction<'_>> {
        Ok(self.state.get().0.action_at(self.source, self.target)?)
    }
}

#[pymethods]
impl PyBounceAction {
    #[getter]
    fn state(&self, py: Python<'_>) -> Py<PyBounceState> {
        self.state.clone_ref(py)
    }

    #[getter]
    fn source(&self) -> (i32, i32) {
        (self.source.x, self.source.y)
    }

    #[getter]
    fn target(&self) -> (i32, i32) {
        (self.target.x, self.target.y)
    }

    fn sample_next_state(&self) -> PyResult<PyBounceState> {
        Ok(PyBounceState(self.resolve()?.sample_next_state()))
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.resolve()?.to_json())
    }

    #[staticmethod]
    fn from_json(state: &Bound<'_, PyBounceState>, data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let action = BounceAction::from_json(&state.get().0, &from_py_json(data)?)?;
        Ok(PyBounceState::wrap(state, &action))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.state.get().0 == other.state.get().0 && self.source == other.source && self.target == other.target
    }

    fn __hash__(&self) -> u64 {
        hash_of(&(&self.state.get().0, self.source, self.target))
    }

    fn __repr__(&self) -> String {
        format!("BounceAction(source={}, target={})", self.source, self.target)
    }
}
