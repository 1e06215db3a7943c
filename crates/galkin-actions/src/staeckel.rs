// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Staeckel u0 Solver
// Mirrors: src/galkin/actions/staeckel.py
// ─────────────────────────────────────────────────────────────────────
//! Extremal prolate-spheroidal coordinate u0 for the Staeckel
//! approximation. In the equatorial plane (v = π/2, R = Δ·sinh u) the
//! extremum condition
//!
//!   d/du [ Φ(Δ sinh u, 0) + Lz²/(2 Δ² sinh²u) ] = 0
//!
//! factors through Δ·cosh u > 0 into the guiding-radius condition
//! dΦ/dR = Lz²/R³, so u0 = asinh(R_c/Δ).

use galkin_potential::AxisymPotential;
use galkin_types::{ActionConfig, GalkinError, GalkinResult};

use crate::turning;

/// Per-batch u0 solver with a shared focal length.
pub struct U0Solver<'a> {
    pot: &'a dyn AxisymPotential,
    delta: f64,
    config: &'a ActionConfig,
}

impl<'a> U0Solver<'a> {
    /// Rejects a non-positive or non-finite focal length up front.
    pub fn new(
        pot: &'a dyn AxisymPotential,
        delta: f64,
        config: &'a ActionConfig,
    ) -> GalkinResult<Self> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(GalkinError::Config(format!(
                "focal length delta must be positive and finite, got {delta}"
            )));
        }
        Ok(Self { pot, delta, config })
    }

    /// u0 for one (E, Lz) pair, bounded below by the domain floor.
    ///
    /// E is validated and carried for interface compatibility; in the
    /// equatorial plane the extremum depends only on Lz.
    pub fn u0(&self, e: f64, lz: f64) -> GalkinResult<f64> {
        if !e.is_finite() || !lz.is_finite() {
            return Err(GalkinError::Domain(format!(
                "non-finite query E = {e}, Lz = {lz}"
            )));
        }
        let seed = lz.abs().max(10.0 * self.config.domain_floor);
        let rc = turning::circular_radius(self.pot, lz, seed, self.config)?;
        Ok((rc / self.delta).asinh().max(self.config.domain_floor))
    }
}
