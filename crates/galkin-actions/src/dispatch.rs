// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Batch Dispatcher
// Mirrors: src/galkin/actions/dispatch.py
// ─────────────────────────────────────────────────────────────────────
//! Batch entry points over the per-point solvers. The dispatcher owns
//! two contracts:
//!
//! - **Layout**: inputs may arrive point-major or field-major. A scoped
//!   guard normalises the caller's buffer to the kernel's field-major
//!   layout and restores the original layout on every exit path,
//!   including early configuration failures — call sites reuse backing
//!   storage across repeated calls.
//! - **Errors**: configuration problems reject the whole batch before
//!   numerical work; per-point domain failures set the sentinel for
//!   that point, OR into the aggregate flag, and let the rest of the
//!   batch proceed.

use galkin_potential::EncodedPotential;
use galkin_types::{
    ActionBatch, ActionConfig, GalkinError, GalkinResult, Layout, PhaseSpaceBatch, U0Batch,
    SENTINEL,
};

use crate::adiabatic::AdiabaticSolver;
use crate::staeckel::U0Solver;

/// Scoped canonical-layout acquisition.
///
/// Construction transposes the caller's buffer to field-major; Drop
/// transposes back to whatever layout the caller supplied. Early `?`
/// returns go through Drop like any other exit.
struct CanonicalGuard<'a> {
    batch: &'a mut PhaseSpaceBatch,
    original: Layout,
}

impl<'a> CanonicalGuard<'a> {
    fn acquire(batch: &'a mut PhaseSpaceBatch) -> Self {
        let original = batch.layout();
        batch.set_layout(Layout::FieldMajor);
        Self { batch, original }
    }

    fn batch(&self) -> &PhaseSpaceBatch {
        self.batch
    }
}

impl Drop for CanonicalGuard<'_> {
    fn drop(&mut self) {
        self.batch.set_layout(self.original);
    }
}

/// Compute adiabatic (Jr, Jz) for every point in the batch.
///
/// Returns `Err` only for whole-batch configuration problems; per-point
/// non-convergence is reported through `ActionBatch::err` and the
/// [`SENTINEL`] slots.
pub fn compute_adiabatic_actions(
    batch: &mut PhaseSpaceBatch,
    pot: &EncodedPotential,
    gamma: f64,
    config: &ActionConfig,
) -> GalkinResult<ActionBatch> {
    let guard = CanonicalGuard::acquire(batch);

    config.validate()?;
    if !gamma.is_finite() {
        return Err(GalkinError::Config(format!(
            "gamma must be finite, got {gamma}"
        )));
    }
    let components = pot.components()?;

    let n = guard.batch().len();
    let solver = AdiabaticSolver::new(&components, gamma, config);

    let mut jr = Vec::with_capacity(n);
    let mut jz = Vec::with_capacity(n);
    let mut err = 0i32;

    let b = guard.batch();
    let (r, vr, vt, z, vz) = (b.field(0), b.field(1), b.field(2), b.field(3), b.field(4));
    for i in 0..n {
        match solver.actions(r[i], vr[i], vt[i], z[i], vz[i]) {
            Ok((jri, jzi)) => {
                jr.push(jri);
                jz.push(jzi);
            }
            Err(e) => {
                log::debug!("point {i} failed: {e}");
                jr.push(SENTINEL);
                jz.push(SENTINEL);
                err |= 1;
            }
        }
    }

    Ok(ActionBatch { jr, jz, err })
}

/// Compute the Staeckel u0 for every (E, Lz) pair.
pub fn compute_staeckel_u0(
    e: &[f64],
    lz: &[f64],
    pot: &EncodedPotential,
    delta: f64,
    config: &ActionConfig,
) -> GalkinResult<U0Batch> {
    config.validate()?;
    if e.len() != lz.len() {
        return Err(GalkinError::Config(format!(
            "E has length {}, Lz has length {}",
            e.len(),
            lz.len()
        )));
    }
    let components = pot.components()?;
    let solver = U0Solver::new(&components, delta, config)?;

    let mut u0 = Vec::with_capacity(e.len());
    let mut err = 0i32;
    for i in 0..e.len() {
        match solver.u0(e[i], lz[i]) {
            Ok(u) => u0.push(u),
            Err(why) => {
                log::debug!("u0 query {i} failed: {why}");
                u0.push(SENTINEL);
                err |= 1;
            }
        }
    }

    Ok(U0Batch { u0, err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use galkin_potential::{encode, PotentialComponent};

    fn isochrone_encoded() -> EncodedPotential {
        encode(&[PotentialComponent::Isochrone { amp: 1.0, b: 0.9 }]).unwrap()
    }

    fn disk_encoded() -> EncodedPotential {
        encode(&[
            PotentialComponent::MiyamotoNagai { amp: 1.0, a: 1.25, b: 0.25 },
            PotentialComponent::Nfw { amp: 0.6, a: 4.0 },
        ])
        .unwrap()
    }

    fn sample_fields() -> [Vec<f64>; 5] {
        [
            vec![0.8, 1.0, 1.5, 2.2],  // R
            vec![0.15, -0.2, 0.1, 0.3], // vR
            vec![0.9, 1.0, 0.8, 0.6],  // vT
            vec![0.05, -0.1, 0.0, 0.2], // z
            vec![0.1, 0.05, -0.2, 0.1], // vz
        ]
    }

    fn field_major_batch() -> PhaseSpaceBatch {
        let [r, vr, vt, z, vz] = sample_fields();
        PhaseSpaceBatch::from_fields(&r, &vr, &vt, &z, &vz).unwrap()
    }

    fn point_major_batch() -> PhaseSpaceBatch {
        let mut batch = field_major_batch();
        batch.set_layout(Layout::PointMajor);
        batch
    }

    #[test]
    fn test_batch_smoke_converges() {
        let mut batch = field_major_batch();
        let result =
            compute_adiabatic_actions(&mut batch, &disk_encoded(), 0.0, &ActionConfig::default())
                .unwrap();
        assert_eq!(result.err, 0);
        assert!(result.converged());
        assert!(result.jr.iter().all(|&v| v >= 0.0));
        assert!(result.jz.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_layout_invariance_and_restoration() {
        let cfg = ActionConfig::default();
        let pot = disk_encoded();

        let mut fm = field_major_batch();
        let mut pm = point_major_batch();
        let pm_data_before = pm.data().to_vec();

        let a = compute_adiabatic_actions(&mut fm, &pot, 0.25, &cfg).unwrap();
        let b = compute_adiabatic_actions(&mut pm, &pot, 0.25, &cfg).unwrap();

        for i in 0..a.jr.len() {
            assert!((a.jr[i] - b.jr[i]).abs() < 1e-12, "Jr differs at {i}");
            assert!((a.jz[i] - b.jz[i]).abs() < 1e-12, "Jz differs at {i}");
        }

        assert_eq!(fm.layout(), Layout::FieldMajor);
        assert_eq!(pm.layout(), Layout::PointMajor);
        assert_eq!(pm.data(), pm_data_before.as_slice(), "caller buffer changed");
    }

    #[test]
    fn test_layout_restored_on_config_error() {
        let mut batch = point_major_batch();
        let data_before = batch.data().to_vec();

        let mut bad = ActionConfig::default();
        bad.root_tol = -1.0;
        let result = compute_adiabatic_actions(&mut batch, &disk_encoded(), 0.0, &bad);

        assert!(matches!(result, Err(GalkinError::Config(_))));
        assert_eq!(batch.layout(), Layout::PointMajor);
        assert_eq!(batch.data(), data_before.as_slice());
    }

    #[test]
    fn test_bad_potential_rejected_before_numerics() {
        let mut batch = field_major_batch();
        let mut pot = disk_encoded();
        pot.tags[0] = 77;
        let result =
            compute_adiabatic_actions(&mut batch, &pot, 0.0, &ActionConfig::default());
        assert!(matches!(result, Err(GalkinError::Config(_))));
    }

    #[test]
    fn test_failed_point_does_not_corrupt_neighbours() {
        let cfg = ActionConfig::default();
        let pot = isochrone_encoded();

        let r = vec![0.8, 1.0, 1.5];
        let vr = vec![0.1, 0.2, 0.15];
        let vt = vec![0.7, 9.0, 0.6]; // middle point far beyond escape speed
        let z = vec![0.0, 0.0, 0.0];
        let vz = vec![0.0, 0.0, 0.0];
        let mut batch = PhaseSpaceBatch::from_fields(&r, &vr, &vt, &z, &vz).unwrap();
        let result = compute_adiabatic_actions(&mut batch, &pot, 0.0, &cfg).unwrap();

        assert_ne!(result.err, 0);
        assert!(result.jr[1].is_nan() && result.jz[1].is_nan());

        // Clean batch without the offender reproduces the neighbours.
        let mut clean = PhaseSpaceBatch::from_fields(
            &[r[0], r[2]],
            &[vr[0], vr[2]],
            &[vt[0], vt[2]],
            &[z[0], z[2]],
            &[vz[0], vz[2]],
        )
        .unwrap();
        let reference = compute_adiabatic_actions(&mut clean, &pot, 0.0, &cfg).unwrap();
        assert_eq!(reference.err, 0);
        assert_eq!(result.jr[0], reference.jr[0]);
        assert_eq!(result.jr[2], reference.jr[1]);
        assert_eq!(result.jz[0], reference.jz[0]);
        assert_eq!(result.jz[2], reference.jz[1]);
    }

    #[test]
    fn test_planar_spherical_batch_zero_jz() {
        let cfg = ActionConfig::default();
        let pot = isochrone_encoded();
        let r = vec![0.5, 1.0, 2.0];
        let vr = vec![0.1, 0.0, 0.3];
        let vt = vec![0.9, 0.7, 0.4];
        let zeros = vec![0.0; 3];
        let mut batch = PhaseSpaceBatch::from_fields(&r, &vr, &vt, &zeros, &zeros).unwrap();
        let result = compute_adiabatic_actions(&mut batch, &pot, 0.0, &cfg).unwrap();
        assert_eq!(result.err, 0);
        assert!(result.jz.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_finite_gamma_rejected() {
        let mut batch = field_major_batch();
        let result = compute_adiabatic_actions(
            &mut batch,
            &disk_encoded(),
            f64::NAN,
            &ActionConfig::default(),
        );
        assert!(matches!(result, Err(GalkinError::Config(_))));
    }

    #[test]
    fn test_u0_length_mismatch_rejected() {
        let result = compute_staeckel_u0(
            &[-0.5, -0.4],
            &[0.5],
            &isochrone_encoded(),
            0.5,
            &ActionConfig::default(),
        );
        assert!(matches!(result, Err(GalkinError::Config(_))));
    }

    #[test]
    fn test_u0_nonpositive_delta_rejected() {
        let result = compute_staeckel_u0(
            &[-0.5],
            &[0.5],
            &isochrone_encoded(),
            -1.0,
            &ActionConfig::default(),
        );
        assert!(matches!(result, Err(GalkinError::Config(_))));
    }

    #[test]
    fn test_u0_batch_partial_failure() {
        let result = compute_staeckel_u0(
            &[-0.5, -0.4, -0.3],
            &[0.6, 0.0, 0.8], // zero Lz has no guiding radius
            &isochrone_encoded(),
            0.5,
            &ActionConfig::default(),
        )
        .unwrap();
        assert_ne!(result.err, 0);
        assert!(result.u0[1].is_nan());
        assert!(result.u0[0] > 0.0 && result.u0[2] > 0.0);
    }
}
