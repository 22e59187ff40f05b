//! Chinese Checkers bindings for Python.

use std::sync::Arc;

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::{Coord, PlayerId};
use crate::games::chinese_checkers::{ChineseCheckersAction, ChineseCheckersConfig, ChineseCheckersState};
use crate::rules::{GameAction, GameConfig, GameState};

use super::{from_py_json, hash_of, to_py_json};

/// Python wrapper for ChineseCheckersConfig.
#[pyclass(name = "ChineseCheckersConfig", frozen)]
#[derive(Clone, Debug)]
pub struct PyChineseCheckersConfig(pub Arc<ChineseCheckersConfig>);

#[pymethods]
impl PyChineseCheckersConfig {
    /// Create a star board whose home triangles have side `size`.
    #[new]
    #[pyo3(signature = (size = 4))]
    fn new(size: usize) -> PyResult<Self> {
        Ok(Self(Arc::new(ChineseCheckersConfig::new(size)?)))
    }

    #[getter]
    fn num_players(&self) -> usize {
        self.0.num_players()
    }

    #[getter]
    fn size(&self) -> usize {
        self.0.size()
    }

    fn sample_initial_state(&self) -> PyChineseCheckersState {
        PyChineseCheckersState(self.0.sample_initial_state())
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    fn from_json(data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let config = ChineseCheckersConfig::from_json(&from_py_json(data)?)?;
        Ok(Self(Arc::new(config)))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        hash_of(&*self.0)
    }

    fn __repr__(&self) -> String {
        format!("ChineseCheckersConfig(size={})", self.0.size())
    }
}

fn config_or_default(config: Option<&PyChineseCheckersConfig>) -> Arc<ChineseCheckersConfig> {
    config.map_or_else(|| Arc::new(ChineseCheckersConfig::default()), |c| Arc::clone(&c.0))
}

/// Python wrapper for ChineseCheckersState.
#[pyclass(name = "ChineseCheckersState", frozen)]
#[derive(Clone, Debug)]
pub struct PyChineseCheckersState(pub ChineseCheckersState);

impl PyChineseCheckersState {
    fn wrap(slf: &Bound<'_, Self>, action: &ChineseCheckersAction<'_>) -> PyChineseCheckersAction {
        PyChineseCheckersAction {
            state: slf.clone().unbind(),
            index: action.index(),
            destination: action.destination(),
        }
    }
}

#[pymethods]
impl PyChineseCheckersState {
    #[staticmethod]
    #[pyo3(signature = (config = None))]
    fn sample_initial_state(config: Option<&PyChineseCheckersConfig>) -> Self {
        Self(config_or_default(config).sample_initial_state())
    }

    #[getter]
    fn config(&self) -> PyChineseCheckersConfig {
        PyChineseCheckersConfig(Arc::clone(self.0.config()))
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

    /// Each player's marbles as `(x, y)` pairs, sorted.
    #[getter]
    fn pieces(&self) -> Vec<Vec<(i32, i32)>> {
        PlayerId::all(2)
            .map(|p| self.0.pieces(p).iter().map(|c| (c.x, c.y)).collect())
            .collect()
    }

    #[getter]
    fn actions(slf: &Bound<'_, Self>) -> Vec<PyChineseCheckersAction> {
        slf.get().0.actions().iter().map(|a| Self::wrap(slf, a)).collect()
    }

    fn actions_at(slf: &Bound<'_, Self>, source: (i32, i32)) -> PyResult<Vec<PyChineseCheckersAction>> {
        let actions = slf.get().0.actions_at(Coord::from(source))?;
        Ok(actions.iter().map(|a| Self::wrap(slf, a)).collect())
    }

    fn actions_for(slf: &Bound<'_, Self>, index: usize) -> PyResult<Vec<PyChineseCheckersAction>> {
        let actions = slf.get().0.actions_for(index)?;
        Ok(actions.iter().map(|a| Self::wrap(slf, a)).collect())
    }

    fn action_at(
        slf: &Bound<'_, Self>,
        index: usize,
        destination: (i32, i32),
    ) -> PyResult<PyChineseCheckersAction> {
        let action = slf.get().0.action_at(index, Coord::from(destination))?;
        Ok(Self::wrap(slf, &action))
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    #[pyo3(signature = (data, config = None))]
    fn from_json(data: &Bound<'_, PyAny>, config: Option<&PyChineseCheckersConfig>) -> PyResult<Self> {
        let state = ChineseCheckersState::from_json(&config_or_default(config), &from_py_json(data)?)?;
        Ok(Self(state))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        hash_of(&self.0)
    }

    fn __repr__(&self) -> String {
        format!(
            "ChineseCheckersState(player={}, winner={:?})",
            self.0.player().0,
            self.winner()
        )
    }
}

/// Python wrapper for ChineseCheckersAction.
#[pyclass(name = "ChineseCheckersAction", frozen)]
pub struct PyChineseCheckersAction {
    state: Py<PyChineseCheckersState>,
    index: usize,
    destination: Coord,
}

impl PyChineseCheckersAction {
    fn resolve(&self) -> PyResult<ChineseCheckersAction<'_>> {
        Ok(self.state.get().0.action_at(self.index, self.destination)?)
    }
}

#[pymethods]
impl PyChineseCheckersAction {
    #[getter]
    fn state(&self, py: Python<'_>) -> Py<PyChineseCheckersState> {
        self.state.clone_ref(py)
    }

    #[getter]
    fn index(&self) -> usize {
        self.index
    }

    #[getter]
    fn source(&self) -> PyResult<(i32, i32)> {
        let source = self.resolve()?.source();
        Ok((source.x, source.y))
    }

    #[getter]
    fn destination(&self) -> (i32, i32) {
        (self.destination.x, self.destination.y)
    }

    fn sample_next_state(&self) -> PyResult<PyChineseCheckersState> {
        Ok(PyChineseCheckersState(self.resolve()?.sample_next_state()))
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.resolve()?.to_json())
    }

    #[staticmethod]
    fn from_json(state: &Bound<'_, PyChineseCheckersState>, data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let action = ChineseCheckersAction::from_json(&state.get().0, &from_py_json(data)?)?;
        Ok(PyChineseCheckersState::wrap(state, &action))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.state.get().0 == other.state.get().0
            && self.index == other.index
            && self.destination == other.destination
    }

    fn __hash__(&self) -> u64 {
        hash_of(&(&self.state.get().0, self.index, self.destination))
    }

    fn __repr__(&self) -> String {
        format!(
            "ChineseCheckersAction(index={}, destination={})",
            self.index, self.destination
        )
    }
}
