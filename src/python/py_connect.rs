//! Connect bindings for Python.

use std::sync::Arc;

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::games::connect::{ConnectAction, ConnectConfig, ConnectState};
use crate::rules::{GameAction, GameConfig, GameState};

use super::{from_py_json, hash_of, to_py_json};

/// Python wrapper for ConnectConfig.
#[pyclass(name = "ConnectConfig", frozen)]
#[derive(Clone, Debug)]
pub struct PyConnectConfig(pub Arc<ConnectConfig>);

#[pymethods]
impl PyConnectConfig {
    /// Create a board of `height` rows and `width` columns where lines of
    /// `count` win.
    #[new]
    #[pyo3(signature = (height = 6, width = 7, count = 4, num_players = 2))]
    fn new(height: usize, width: usize, count: usize, num_players: usize) -> PyResult<Self> {
        let config = ConnectConfig::new(height, width, count)?.with_num_players(num_players)?;
        Ok(Self(Arc::new(config)))
    }

    #[getter]
    fn num_players(&self) -> usize {
        self.0.num_players()
    }

    #[getter]
    fn height(&self) -> usize {
        self.0.height()
    }

    #[getter]
    fn width(&self) -> usize {
        self.0.width()
    }

    #[getter]
    fn count(&self) -> usize {
        self.0.count()
    }

    fn sample_initial_state(&self) -> PyConnectState {
        PyConnectState(self.0.sample_initial_state())
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    fn from_json(data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let config = ConnectConfig::from_json(&from_py_json(data)?)?;
        Ok(Self(Arc::new(config)))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        hash_of(&*self.0)
    }

    fn __repr__(&self) -> String {
        format!(
            "ConnectConfig(height={}, width={}, count={}, num_players={})",
            self.0.height(),
            self.0.width(),
            self.0.count(),
            self.0.num_players()
        )
    }
}

fn config_or_default(config: Option<&PyConnectConfig>) -> Arc<ConnectConfig> {
    config.map_or_else(|| Arc::new(ConnectConfig::default()), |c| Arc::clone(&c.0))
}

/// Python wrapper for ConnectState.
#[pyclass(name = "ConnectState", frozen)]
#[derive(Clone, Debug)]
pub struct PyConnectState(pub ConnectState);

#[pymethods]
impl PyConnectState {
    /// Empty board, on the default 6x7 config unless one is given.
    #[staticmethod]
    #[pyo3(signature = (config = None))]
    fn sample_initial_state(config: Option<&PyConnectConfig>) -> Self {
        Self(config_or_default(config).sample_initial_state())
    }

    #[getter]
    fn config(&self) -> PyConnectConfig {
        PyConnectConfig(Arc::clone(self.0.config()))
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

    /// Rows bottom-to-top, `-1` for empty cells.
    #[getter]
    fn grid(&self) -> Vec<Vec<i64>> {
        self.0.grid()
    }

    #[getter]
    fn actions(slf: &Bound<'_, Self>) -> Vec<PyConnectAction> {
        slf.get()
            .0
            .actions()
            .iter()
            .map(|action| PyConnectAction {
                state: slf.clone().unbind(),
                column: action.column(),
            })
            .collect()
    }

    fn action_at(slf: &Bound<'_, Self>, column: usize) -> PyResult<PyConnectAction> {
        let action = slf.get().0.action_at(column)?;
        Ok(PyConnectAction {
            state: slf.clone().unbind(),
            column: action.column(),
        })
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.0.to_json())
    }

    #[staticmethod]
    #[pyo3(signature = (data, config = None))]
    fn from_json(data: &Bound<'_, PyAny>, config: Option<&PyConnectConfig>) -> PyResult<Self> {
        let state = ConnectState::from_json(&config_or_default(config), &from_py_json(data)?)?;
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
        format!("ConnectState(player={}, winner={:?})", self.0.player().0, self.winner())
    }
}

/// Python wrapper for ConnectAction.
///
/// Holds its state alive and re-resolves the move on use.
#[pyclass(name = "ConnectAction", frozen)]
pub struct PyConnectAction {
    state: Py<PyConnectState>,
    column: usize,
}

impl PyConnectAction {
    fn resolve(&self) -> PyResult<ConnectAction<'_>> {
        Ok(self.state.get().0.action_at(self.column)?)
    }
}

#[pymethods]
impl PyConnectAction {
    #[getter]
    fn state(&self, py: Python<'_>) -> Py<PyConnectState> {
        self.state.clone_ref(py)
    }

    #[getter]
    fn column(&self) -> usize {
        self.column
    }

    fn sample_next_state(&self) -> PyResult<PyConnectState> {
        Ok(PyConnectState(self.resolve()?.sample_next_state()))
    }

    fn to_json(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_json(py, &self.resolve()?.to_json())
    }

    #[staticmethod]
    fn from_json(state: &Bound<'_, PyConnectState>, data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let action = ConnectAction::from_json(&state.get().0, &from_py_json(data)?)?;
        Ok(Self {
            state: state.clone().unbind(),
            column: action.column(),
        })
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.state.get().0 == other.state.get().0 && self.column == other.column
    }

    fn __hash__(&self) -> u64 {
        hash_of(&(&self.state.get().0, self.column))
    }

    fn __repr__(&self) -> String {
        format!("ConnectAction(column={})", self.column)
    }
}
