// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Crystal Kernel.
//!
//! Exposes `RustCrystalCalculator`, `RustTimeCrystal`, and the two
//! configuration records to the Python service layer, which keeps
//! request validation, rate limiting, and monitoring on its side.
//!
//! # FFI Safety
//!
//! - Results are returned as plain dicts mirroring the JSON payload.
//! - Every `CrystalError` surfaces as `ValueError`; nothing panics
//!   across the boundary.
//! - All config validated before storage.
//!
//! Install: `pip install -e crates/crystal-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from crystal_kernel import RustCrystalCalculator, analyze_path
//!
//! calc = RustCrystalCalculator(evolution_steps=100)
//! result = calc.simulate(100.0, "currency")
//! path = analyze_path(result["time_series"])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crystal_core::{analyze, CrystalCalculator};
use crystal_physics::{Category, CrystalStability, TimeCrystalOscillator};
use crystal_types::{
    CalculationResult, CrystalConfig, CrystalError, OscillatorParams, PathMetrics, TimeSeries,
};

fn to_py_err(e: CrystalError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn time_series_dict<'py>(py: Python<'py>, ts: &TimeSeries) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("void", ts.void.clone())?;
    dict.set_item("filament", ts.filament.clone())?;
    dict.set_item("emergence", ts.emergence.clone())?;
    dict.set_item("resonance", ts.resonance.clone())?;
    dict.set_item("crystal_phase", ts.crystal_phase.clone())?;
    dict.set_item("convergence", ts.convergence.clone())?;
    Ok(dict)
}

fn result_dict<'py>(py: Python<'py>, r: &CalculationResult) -> PyResult<Bound<'py, PyDict>> {
    let m = &r.convergence_metrics;
    let metrics = PyDict::new(py);
    metrics.set_item("stability_score", m.stability_score)?;
    metrics.set_item("convergence_rate", m.convergence_rate)?;
    metrics.set_item("final_convergence", m.final_convergence)?;
    metrics.set_item("phase_coherence", m.phase_coherence)?;
    metrics.set_item("amplitude_stability", m.amplitude_stability)?;
    metrics.set_item("converged_at", m.converged_at)?;

    let dict = PyDict::new(py);
    dict.set_item("original_value", r.original_value)?;
    dict.set_item("qdt_value", r.qdt_value)?;
    dict.set_item("void_energy", r.void_energy)?;
    dict.set_item("filament_energy", r.filament_energy)?;
    dict.set_item("emergence_energy", r.emergence_energy)?;
    dict.set_item("time_series", time_series_dict(py, &r.time_series)?)?;
    dict.set_item("convergence_metrics", metrics)?;
    Ok(dict)
}

fn path_dict<'py>(py: Python<'py>, p: &PathMetrics) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("void_filament_coupling", p.void_filament_coupling)?;
    dict.set_item("crystal_resonance_coupling", p.crystal_resonance_coupling)?;
    dict.set_item("convergence_stability", p.convergence_stability)?;
    dict.set_item("effective_dimensionality", p.effective_dimensionality)?;
    dict.set_item("final_convergence", p.final_convergence)?;
    dict.set_item("eigenvalues", p.eigenvalues.clone())?;
    Ok(dict)
}

fn stability_dict<'py>(py: Python<'py>, s: &CrystalStability) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("time", s.time.clone())?;
    dict.set_item("oscillations", s.oscillations.clone())?;
    dict.set_item("modulations", s.modulations.clone())?;
    dict.set_item("phase_coherence", s.phase_coherence)?;
    dict.set_item("amplitude_stability", s.amplitude_stability)?;
    Ok(dict)
}

fn extract_channel(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Vec<f64>> {
    match dict.get_item(key)? {
        Some(value) => value.extract::<Vec<f64>>(),
        None => Err(PyValueError::new_err(format!(
            "time_series is missing channel '{key}'"
        ))),
    }
}

// ─── PyCrystalConfig ────────────────────────────────────────────────

/// Python-visible simulation configuration.
#[pyclass(name = "CrystalConfig")]
#[derive(Clone)]
struct PyCrystalConfig {
    inner: CrystalConfig,
}

#[pymethods]
impl PyCrystalConfig {
    #[new]
    #[pyo3(signature = (
        evolution_steps = 100,
        convergence_threshold = 0.01,
        stability_window = 10,
        resonance_depth = 5,
    ))]
    fn new(
        evolution_steps: usize,
        convergence_threshold: f64,
        stability_window: usize,
        resonance_depth: usize,
    ) -> PyResult<Self> {
        let config = CrystalConfig {
            evolution_steps,
            convergence_threshold,
            stability_window,
            resonance_depth,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = CrystalConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn evolution_steps(&self) -> usize {
        self.inner.evolution_steps
    }

    #[getter]
    fn stability_window(&self) -> usize {
        self.inner.stability_window
    }

    #[getter]
    fn resonance_depth(&self) -> usize {
        self.inner.resonance_depth
    }

    #[getter]
    fn convergence_threshold(&self) -> f64 {
        self.inner.convergence_threshold
    }

    fn __repr__(&self) -> String {
        format!(
            "CrystalConfig(evolution_steps={}, stability_window={}, resonance_depth={})",
            self.inner.evolution_steps, self.inner.stability_window, self.inner.resonance_depth
        )
    }
}

// ─── PyOscillatorParams ─────────────────────────────────────────────

/// Python-visible time-crystal oscillator parameters.
#[pyclass(name = "OscillatorParams")]
#[derive(Clone)]
struct PyOscillatorParams {
    inner: OscillatorParams,
}

#[pymethods]
impl PyOscillatorParams {
    #[new]
    #[pyo3(signature = (frequency = 1.618033, amplitude = 0.1, damping = 0.289))]
    fn new(frequency: f64, amplitude: f64, damping: f64) -> PyResult<Self> {
        let params = OscillatorParams {
            frequency,
            amplitude,
            damping,
        };
        params.validate().map_err(to_py_err)?;
        Ok(Self { inner: params })
    }

    fn __repr__(&self) -> String {
        format!(
            "OscillatorParams(frequency={}, amplitude={}, damping={})",
            self.inner.frequency, self.inner.amplitude, self.inner.damping
        )
    }
}

// ─── RustCrystalCalculator ──────────────────────────────────────────

/// Crystal-enhanced value calculator.
#[pyclass(name = "RustCrystalCalculator")]
struct PyCrystalCalculator {
    inner: CrystalCalculator,
}

#[pymethods]
impl PyCrystalCalculator {
    /// Either pass `config` / `params` objects or just `evolution_steps`
    /// (the window shrinks to fit short runs).
    #[new]
    #[pyo3(signature = (config = None, params = None, evolution_steps = None))]
    fn new(
        config: Option<PyCrystalConfig>,
        params: Option<PyOscillatorParams>,
        evolution_steps: Option<usize>,
    ) -> PyResult<Self> {
        let config = match (config, evolution_steps) {
            (Some(c), _) => c.inner,
            (None, Some(steps)) => CrystalConfig::with_steps(steps),
            (None, None) => CrystalConfig::default(),
        };
        let params = params.map(|p| p.inner).unwrap_or_default();
        let inner = CrystalCalculator::new(config, params).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Run the simulation. Unknown categories use multiplier 1.0.
    ///
    /// Returns the result payload as a dict.
    fn simulate(&self, py: Python<'_>, value: f64, category: &str) -> PyResult<PyObject> {
        let result = self
            .inner
            .simulate(value, Category::from_label(category))
            .map_err(to_py_err)?;
        Ok(result_dict(py, &result)?.into_any().unbind())
    }

    /// `qdt_value` for every defined category, as a {label: value} dict.
    fn compare_categories(&self, py: Python<'_>, value: f64) -> PyResult<PyObject> {
        let pairs = self.inner.compare_categories(value).map_err(to_py_err)?;
        let dict = PyDict::new(py);
        for (category, qdt_value) in pairs {
            dict.set_item(category.label(), qdt_value)?;
        }
        Ok(dict.into_any().unbind())
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "RustCrystalCalculator(evolution_steps={}, resonance_depth={})",
            cfg.evolution_steps, cfg.resonance_depth
        )
    }
}

// ─── analyze_path ───────────────────────────────────────────────────

/// Analyze a `time_series` dict as returned by `simulate`.
#[pyfunction]
fn analyze_path(py: Python<'_>, time_series: &Bound<'_, PyDict>) -> PyResult<PyObject> {
    let series = TimeSeries {
        void: extract_channel(time_series, "void")?,
        filament: extract_channel(time_series, "filament")?,
        emergence: extract_channel(time_series, "emergence")?,
        resonance: extract_channel(time_series, "resonance")?,
        crystal_phase: extract_channel(time_series, "crystal_phase")?,
        convergence: extract_channel(time_series, "convergence")?,
    };
    let metrics = analyze(&series).map_err(to_py_err)?;
    Ok(path_dict(py, &metrics)?.into_any().unbind())
}

// ─── RustTimeCrystal ────────────────────────────────────────────────

/// Time-crystal oscillator.
#[pyclass(name = "RustTimeCrystal")]
struct PyTimeCrystal {
    inner: TimeCrystalOscillator,
}

#[pymethods]
impl PyTimeCrystal {
    #[new]
    #[pyo3(signature = (params = None))]
    fn new(params: Option<PyOscillatorParams>) -> Self {
        let params = params.map(|p| p.inner).unwrap_or_default();
        Self {
            inner: TimeCrystalOscillator::new(params),
        }
    }

    /// A·sin(2π f t); frequency / amplitude override the configured ones.
    #[pyo3(signature = (t, frequency = None, amplitude = None))]
    fn oscillation(&self, t: f64, frequency: Option<f64>, amplitude: Option<f64>) -> f64 {
        let p = &self.inner.params;
        self.inner.oscillation_with(
            t,
            frequency.unwrap_or(p.frequency),
            amplitude.unwrap_or(p.amplitude),
        )
    }

    fn modulation(&self, step: f64) -> f64 {
        self.inner.modulation(step)
    }

    #[pyo3(signature = (t_max = 10.0, n_steps = 1000))]
    fn stability(&self, py: Python<'_>, t_max: f64, n_steps: usize) -> PyResult<PyObject> {
        let s = self.inner.stability(t_max, n_steps);
        Ok(stability_dict(py, &s)?.into_any().unbind())
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Crystal Kernel — Rust core for crystal-enhanced value calculation.
///
/// - `CrystalConfig`, `OscillatorParams` — configuration
/// - `RustCrystalCalculator` — simulation engine
/// - `analyze_path` — convergence-path statistics
/// - `RustTimeCrystal` — oscillator
#[pymodule]
fn crystal_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCrystalConfig>()?;
    m.add_class::<PyOscillatorParams>()?;
    m.add_class::<PyCrystalCalculator>()?;
    m.add_class::<PyTimeCrystal>()?;
    m.add_function(wrap_pyfunction!(analyze_path, m)?)?;
    Ok(())
}
