// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Reduced-Energy Functions
// Mirrors: src/galkin/actions/adiabatic.py (energy bookkeeping)
// ─────────────────────────────────────────────────────────────────────
//! The two scalar functions the adiabatic decoupling reduces a point
//! to: vertical reduced energy K_z(z; R) at fixed R, and radial
//! reduced energy K_r(R′; Lz_eff) in the plane.

use galkin_potential::AxisymPotential;

/// Vertical sub-problem at fixed cylindrical radius R.
///
/// `ez` is the vertical energy referenced to the plane:
/// `Ez = ½vz² + Φ(R, z) − Φ(R, 0)` at the point's actual z, so
/// `K_z(0) = Ez ≥ 0` always holds.
pub struct VerticalProblem<'a> {
    pot: &'a dyn AxisymPotential,
    pub r: f64,
    pub ez: f64,
    phi_plane: f64,
}

impl<'a> VerticalProblem<'a> {
    pub fn new(pot: &'a dyn AxisymPotential, r: f64, z: f64, vz: f64) -> Self {
        let phi_plane = pot.phi(r, 0.0);
        let ez = 0.5 * vz * vz + pot.phi(r, z) - phi_plane;
        Self { pot, r, ez, phi_plane }
    }

    /// K_z(z) = Ez − [Φ(R, z) − Φ(R, 0)]. Positive inside the
    /// oscillation, zero at the turning point zmax.
    pub fn kz(&self, z: f64) -> f64 {
        self.ez - (self.pot.phi(self.r, z) - self.phi_plane)
    }
}

/// Radial sub-problem in the plane at fixed effective angular momentum.
pub struct RadialProblem<'a> {
    pot: &'a dyn AxisymPotential,
    /// Planar energy E = ½vR² + ½vT² + Φ(R, 0).
    pub e: f64,
    /// Lz_eff² / 2.
    half_lz2: f64,
}

impl<'a> RadialProblem<'a> {
    pub fn new(pot: &'a dyn AxisymPotential, r: f64, vr: f64, vt: f64, lz_eff: f64) -> Self {
        let e = 0.5 * (vr * vr + vt * vt) + pot.phi(r, 0.0);
        Self {
            pot,
            e,
            half_lz2: 0.5 * lz_eff * lz_eff,
        }
    }

    /// K_r(R′) = E − Φ(R′, 0) − Lz_eff²/(2R′²). Positive between the
    /// two radial turning points Rmin and Rmax.
    pub fn kr(&self, rp: f64) -> f64 {
        if rp == 0.0 {
            // Radial orbit limit: the centrifugal term vanishes with Lz_eff.
            return if self.half_lz2 == 0.0 {
                self.e - self.pot.phi(0.0, 0.0)
            } else {
                f64::NEG_INFINITY
            };
        }
        self.e - self.pot.phi(rp, 0.0) - self.half_lz2 / (rp * rp)
    }

    /// Residual of the circular-orbit condition dΦ/dR = Lz_eff²/R³ at R.
    pub fn circular_residual(&self, r: f64) -> f64 {
        self.pot.dphi_dr(r, 0.0) - 2.0 * self.half_lz2 / (r * r * r)
    }
}
