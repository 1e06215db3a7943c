// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Action Kernel PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Rust action kernel.
//!
//! Exposes `ActionConfig`, `CompositePotential`, and `ActionKernel` to
//! Python via PyO3.
//!
//! # FFI Safety
//!
//! - All config validated before storage (`ActionConfig::validate()`).
//! - Potential encodings validated before any numerical work.
//! - Per-point non-convergence never raises: it is reported through the
//!   aggregate error flag with NaN sentinels, matching the historical
//!   kernel contract.
//!
//! Install: `pip install -e crates/galkin-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from galkin_kernel import ActionKernel, CompositePotential
//!
//! pot = CompositePotential.miyamoto_nagai(1.0, 1.25, 0.25)
//! kernel = ActionKernel()
//! jr, jz, err = kernel.adiabatic_actions([1.0], [0.1], [0.9], [0.0], [0.05], pot, 0.0)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use galkin_actions::{compute_adiabatic_actions, compute_staeckel_u0};
use galkin_potential::{encode, AxisymPotential, EncodedPotential, PotentialComponent};
use galkin_types::{ActionConfig, GalkinError, Layout, PhaseSpaceBatch};

fn to_py_err(e: GalkinError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ─── PyActionConfig ─────────────────────────────────────────────────

/// Python-visible solver configuration.
#[pyclass(name = "ActionConfig")]
#[derive(Clone)]
struct PyActionConfig {
    inner: ActionConfig,
}

#[pymethods]
impl PyActionConfig {
    #[new]
    #[pyo3(signature = (
        max_bracket_iter = 64,
        root_tol = 1e-12,
        root_max_iter = 100,
        circular_tol = 1e-8,
        radicand_floor = 1e-10,
        domain_floor = 1e-8,
    ))]
    fn new(
        max_bracket_iter: usize,
        root_tol: f64,
        root_max_iter: usize,
        circular_tol: f64,
        radicand_floor: f64,
        domain_floor: f64,
    ) -> PyResult<Self> {
        let config = ActionConfig {
            max_bracket_iter,
            root_tol,
            root_max_iter,
            circular_tol,
            radicand_floor,
            domain_floor,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = ActionConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("max_bracket_iter", self.inner.max_bracket_iter)?;
        dict.set_item("root_tol", self.inner.root_tol)?;
        dict.set_item("root_max_iter", self.inner.root_max_iter)?;
        dict.set_item("circular_tol", self.inner.circular_tol)?;
        dict.set_item("radicand_floor", self.inner.radicand_floor)?;
        dict.set_item("domain_floor", self.inner.domain_floor)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "ActionConfig(max_bracket_iter={}, root_tol={:.1e}, root_max_iter={})",
            self.inner.max_bracket_iter, self.inner.root_tol, self.inner.root_max_iter
        )
    }
}

// ─── PyCompositePotential ───────────────────────────────────────────

/// Python-visible composite potential: an ordered list of components
/// flattened to the tagged wire form the kernel consumes.
#[pyclass(name = "CompositePotential")]
#[derive(Clone)]
struct PyCompositePotential {
    components: Vec<PotentialComponent>,
    encoded: EncodedPotential,
}

impl PyCompositePotential {
    fn from_components(components: Vec<PotentialComponent>) -> PyResult<Self> {
        let encoded = encode(&components).map_err(to_py_err)?;
        Ok(Self { components, encoded })
    }
}

#[pymethods]
impl PyCompositePotential {
    /// Build from `[(tag, [params...]), ...]`.
    #[new]
    fn new(components: Vec<(i32, Vec<f64>)>) -> PyResult<Self> {
        let comps = components
            .iter()
            .map(|(tag, params)| PotentialComponent::from_tag_params(*tag, params))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?;
        Self::from_components(comps)
    }

    #[staticmethod]
    fn plummer(amp: f64, b: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::Plummer { amp, b }])
    }

    #[staticmethod]
    fn hernquist(amp: f64, a: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::Hernquist { amp, a }])
    }

    #[staticmethod]
    fn jaffe(amp: f64, a: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::Jaffe { amp, a }])
    }

    #[staticmethod]
    fn miyamoto_nagai(amp: f64, a: f64, b: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::MiyamotoNagai { amp, a, b }])
    }

    #[staticmethod]
    fn logarithmic_halo(amp: f64, core: f64, q: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::LogarithmicHalo { amp, core, q }])
    }

    #[staticmethod]
    fn isochrone(amp: f64, b: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::Isochrone { amp, b }])
    }

    #[staticmethod]
    fn nfw(amp: f64, a: f64) -> PyResult<Self> {
        Self::from_components(vec![PotentialComponent::Nfw { amp, a }])
    }

    /// Concatenate two composites (evaluation order preserved).
    fn __add__(&self, other: &Self) -> PyResult<Self> {
        let mut comps = self.components.clone();
        comps.extend(other.components.iter().copied());
        Self::from_components(comps)
    }

    fn __len__(&self) -> usize {
        self.components.len()
    }

    /// Wire tags, in component order.
    #[getter]
    fn tags(&self) -> Vec<i32> {
        self.encoded.tags.clone()
    }

    /// Flattened parameter array, in tag order.
    #[getter]
    fn params(&self) -> Vec<f64> {
        self.encoded.params.clone()
    }

    /// Evaluate (Phi, dPhi/dR, dPhi/dz) at a single point.
    fn evaluate(&self, r: f64, z: f64) -> (f64, f64, f64) {
        (
            self.components.phi(r, z),
            self.components.dphi_dr(r, z),
            self.components.dphi_dz(r, z),
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "CompositePotential(components={}, tags={:?})",
            self.components.len(),
            self.encoded.tags
        )
    }
}

// ─── PyActionKernel ─────────────────────────────────────────────────

/// Batch action solver exposed to Python.
///
/// Drop-in replacement for the historical compiled-kernel entry points
/// `adiabatic_actions` and `staeckel_u0`.
#[pyclass(name = "ActionKernel")]
struct PyActionKernel {
    config: ActionConfig,
}

#[pymethods]
impl PyActionKernel {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyActionConfig>) -> Self {
        Self {
            config: config.map(|c| c.inner).unwrap_or_default(),
        }
    }

    /// Compute adiabatic actions for a batch of points.
    ///
    /// Args:
    ///     r, vr, vt, z, vz: equal-length coordinate arrays.
    ///     pot: CompositePotential.
    ///     gamma: anisotropy coupling, Lz_eff = R*vT + gamma*Jz.
    ///
    /// Returns:
    ///     (jr, jz, err) — err is the aggregate flag, 0 on full success;
    ///     failed points hold NaN.
    #[pyo3(signature = (r, vr, vt, z, vz, pot, gamma = 0.0))]
    #[allow(clippy::too_many_arguments)]
    fn adiabatic_actions(
        &self,
        r: Vec<f64>,
        vr: Vec<f64>,
        vt: Vec<f64>,
        z: Vec<f64>,
        vz: Vec<f64>,
        pot: PyCompositePotential,
        gamma: f64,
    ) -> PyResult<(Vec<f64>, Vec<f64>, i32)> {
        let mut batch =
            PhaseSpaceBatch::from_fields(&r, &vr, &vt, &z, &vz).map_err(to_py_err)?;
        let result = compute_adiabatic_actions(&mut batch, &pot.encoded, gamma, &self.config)
            .map_err(to_py_err)?;
        Ok((result.jr, result.jz, result.err))
    }

    /// Same computation over a flat 5×N buffer.
    ///
    /// `layout` is "field" (one contiguous run per field, the kernel's
    /// canonical form) or "point" (interleaved per point).
    #[pyo3(signature = (data, layout, pot, gamma = 0.0))]
    fn adiabatic_actions_packed(
        &self,
        data: Vec<f64>,
        layout: &str,
        pot: PyCompositePotential,
        gamma: f64,
    ) -> PyResult<(Vec<f64>, Vec<f64>, i32)> {
        let layout = match layout {
            "field" => Layout::FieldMajor,
            "point" => Layout::PointMajor,
            other => {
                return Err(PyValueError::new_err(format!(
                    "layout must be 'field' or 'point', got '{other}'"
                )))
            }
        };
        let mut batch = PhaseSpaceBatch::new(data, layout).map_err(to_py_err)?;
        let result = compute_adiabatic_actions(&mut batch, &pot.encoded, gamma, &self.config)
            .map_err(to_py_err)?;
        Ok((result.jr, result.jz, result.err))
    }

    /// Compute the Staeckel u0 for batches of (E, Lz) with a shared
    /// focal length delta.
    fn staeckel_u0(
        &self,
        e: Vec<f64>,
        lz: Vec<f64>,
        pot: PyCompositePotential,
        delta: f64,
    ) -> PyResult<(Vec<f64>, i32)> {
        let result =
            compute_staeckel_u0(&e, &lz, &pot.encoded, delta, &self.config).map_err(to_py_err)?;
        Ok((result.u0, result.err))
    }

    fn __repr__(&self) -> String {
        format!(
            "ActionKernel(root_tol={:.1e}, max_bracket_iter={})",
            self.config.root_tol, self.config.max_bracket_iter
        )
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Galkin action kernel — Rust-accelerated Jr/Jz and Staeckel u0.
#[pymodule]
fn galkin_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyActionConfig>()?;
    m.add_class::<PyCompositePotential>()?;
    m.add_class::<PyActionKernel>()?;
    Ok(())
}
