// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Adiabatic Action Solver
// Mirrors: src/galkin/actions/adiabatic.py
// ─────────────────────────────────────────────────────────────────────
//! Per-point Jr/Jz under the adiabatic decoupling: the vertical
//! oscillation is solved at fixed R, its action feeds the effective
//! angular momentum Lz_eff = R·vT + γ·Jz, and the radial problem is
//! solved in the plane with that Lz_eff.

use std::f64::consts::{FRAC_PI_2, PI};

use galkin_potential::AxisymPotential;
use galkin_types::{batch::clamp_radicand, ActionConfig, GalkinError, GalkinResult};

use crate::effective::{RadialProblem, VerticalProblem};
use crate::quadrature::gauss_legendre;
use crate::turning;

/// Per-point adiabatic action solver over an injected potential.
///
/// Holds only shared references; cheap to construct per batch and safe
/// to share across points.
pub struct AdiabaticSolver<'a> {
    pot: &'a dyn AxisymPotential,
    gamma: f64,
    config: &'a ActionConfig,
}

impl<'a> AdiabaticSolver<'a> {
    pub fn new(pot: &'a dyn AxisymPotential, gamma: f64, config: &'a ActionConfig) -> Self {
        Self { pot, gamma, config }
    }

    /// Compute (Jr, Jz) for a single phase-space point.
    ///
    /// Domain errors are scoped to this point; the batch dispatcher
    /// maps them to the sentinel and the aggregate flag.
    pub fn actions(&self, r: f64, vr: f64, vt: f64, z: f64, vz: f64) -> GalkinResult<(f64, f64)> {
        for (name, v) in [("R", r), ("vR", vr), ("vT", vt), ("z", z), ("vz", vz)] {
            if !v.is_finite() {
                return Err(GalkinError::Domain(format!(
                    "non-finite phase-space input {name} = {v}"
                )));
            }
        }
        if r < self.config.domain_floor {
            return Err(GalkinError::Domain(format!(
                "R = {r:.3e} below the domain floor"
            )));
        }

        let jz = self.vertical_action(r, z, vz)?;
        let lz_eff = r * vt + self.gamma * jz;
        let jr = self.radial_action(r, vr, vt, lz_eff)?;
        Ok((jr, jz))
    }

    /// Jz = (1/π) ∫₀^zmax √(2·max(K_z, 0)) dz, via z = zmax·sinθ.
    fn vertical_action(&self, r: f64, z: f64, vz: f64) -> GalkinResult<f64> {
        if z == 0.0 && vz == 0.0 {
            return Ok(0.0);
        }
        let vert = VerticalProblem::new(self.pot, r, z, vz);
        if vert.ez <= 0.0 {
            return Ok(0.0);
        }
        let zmax = turning::find_zmax(&vert, z, self.config)?;
        if zmax == 0.0 {
            return Ok(0.0);
        }
        let floor = self.config.radicand_floor;
        let integral = gauss_legendre(
            |t| {
                let (s, c) = t.sin_cos();
                (2.0 * clamp_radicand(vert.kz(zmax * s), floor)).sqrt() * c
            },
            0.0,
            FRAC_PI_2,
        );
        Ok(zmax * integral / PI)
    }

    /// Jr = (1/π) ∫_{Rmin}^{Rmax} √(2·max(K_r, 0)) dR′, via
    /// R′ = Rmid + ΔR·sinθ.
    fn radial_action(&self, r: f64, vr: f64, vt: f64, lz_eff: f64) -> GalkinResult<f64> {
        let rad = RadialProblem::new(self.pot, r, vr, vt, lz_eff);

        // Circular-orbit shortcut: vR = 0 at the guiding radius.
        if vr == 0.0 {
            let scale = self.pot.dphi_dr(r, 0.0).abs().max(self.config.circular_tol);
            if rad.circular_residual(r).abs() <= self.config.circular_tol * scale {
                return Ok(0.0);
            }
        }

        let kr_at_r = rad.kr(r);
        let (rmin, rmax) = if kr_at_r > 0.0 {
            // The input radius lies strictly inside the oscillation.
            turning::find_radial_bracket(&rad, r, self.config)?
        } else if kr_at_r == 0.0 {
            // The input radius IS a turning point; which one depends on
            // its side of the guiding radius.
            if lz_eff == 0.0 {
                // At rest radially and tangentially: apocentre of a
                // radial orbit through the centre.
                (0.0, r)
            } else {
                let rc = turning::circular_radius(self.pot, lz_eff, r, self.config)?;
                if r >= rc {
                    (turning::find_rmin(&rad, rc, self.config)?, r)
                } else {
                    (r, turning::find_rmax(&rad, rc, self.config)?)
                }
            }
        } else {
            // The γ·Jz shift pushed K_r(R) negative: re-centre on the
            // guiding radius for the shifted momentum.
            let rc = turning::circular_radius(self.pot, lz_eff, r, self.config)?;
            if rad.kr(rc) < 0.0 {
                return Err(GalkinError::Domain(format!(
                    "E below the effective-potential minimum at Lz_eff = {lz_eff:.3e}"
                )));
            }
            turning::find_radial_bracket(&rad, rc, self.config)?
        };
        if rmax - rmin <= self.config.root_tol {
            return Ok(0.0);
        }
        let rmid = 0.5 * (rmax + rmin);
        let dr = 0.5 * (rmax - rmin);
        let floor = self.config.radicand_floor;
        let integral = gauss_legendre(
            |t| {
                let (s, c) = t.sin_cos();
                (2.0 * clamp_radicand(rad.kr(rmid + dr * s), floor)).sqrt() * c
            },
            -FRAC_PI_2,
            FRAC_PI_2,
        );
        Ok(dr * integral / PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galkin_potential::PotentialComponent;

    fn cfg() -> ActionConfig {
        ActionConfig::default()
    }

    fn isochrone(amp: f64, b: f64) -> Vec<PotentialComponent> {
        vec![PotentialComponent::Isochrone { amp, b }]
    }

    /// Exact radial action in an isochrone potential:
    /// Jr = amp/√(−2E) − ½·(L + √(L² + 4·amp·b)).
    fn isochrone_jr_exact(amp: f64, b: f64, e: f64, l: f64) -> f64 {
        amp / (-2.0 * e).sqrt() - 0.5 * (l + (l * l + 4.0 * amp * b).sqrt())
    }

    #[test]
    fn test_planar_isochrone_matches_exact_jr() {
        // In the plane the adiabatic radial action is the true one, and
        // the isochrone has it in closed form.
        let (amp, b) = (1.0, 0.9);
        let pot = isochrone(amp, b);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        let (r, vr, vt) = (1.4, 0.25, 0.55);
        let (jr, jz) = solver.actions(r, vr, vt, 0.0, 0.0).unwrap();
        assert_eq!(jz, 0.0);

        let e = 0.5 * (vr * vr + vt * vt) + pot.phi(r, 0.0);
        let exact = isochrone_jr_exact(amp, b, e, r * vt);
        assert!(
            (jr - exact).abs() < 1e-6,
            "Jr = {jr}, exact = {exact}"
        );
    }

    #[test]
    fn test_planar_point_has_zero_jz() {
        // Spherical potential, z = 0, vz = 0 ⇒ Jz = 0 exactly, any R/vR/vT.
        let pot = isochrone(1.0, 0.9);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        for &(r, vr, vt) in &[(0.5, 0.1, 0.9), (1.0, 0.0, 0.7), (3.0, 0.4, 0.3)] {
            let (_, jz) = solver.actions(r, vr, vt, 0.0, 0.0).unwrap();
            assert_eq!(jz, 0.0, "Jz nonzero at R = {r}");
        }
    }

    #[test]
    fn test_circular_orbit_zero_actions() {
        let pot = isochrone(1.0, 0.9);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        let rc = 1.2;
        let vc = (rc * pot.dphi_dr(rc, 0.0)).sqrt();
        let (jr, jz) = solver.actions(rc, 0.0, vc, 0.0, 0.0).unwrap();
        assert_eq!(jr, 0.0);
        assert_eq!(jz, 0.0);
    }

    #[test]
    fn test_actions_non_negative() {
        let pot = vec![
            PotentialComponent::MiyamotoNagai { amp: 1.0, a: 1.25, b: 0.25 },
            PotentialComponent::Nfw { amp: 0.6, a: 4.0 },
        ];
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        for &(r, vr, vt, z, vz) in &[
            (0.8, 0.15, 0.9, 0.05, 0.1),
            (1.0, -0.2, 1.1, -0.1, 0.05),
            (2.5, 0.3, 0.7, 0.2, -0.15),
        ] {
            let (jr, jz) = solver.actions(r, vr, vt, z, vz).unwrap();
            assert!(jr >= 0.0, "Jr = {jr} at R = {r}");
            assert!(jz >= 0.0, "Jz = {jz} at R = {r}");
        }
    }

    #[test]
    fn test_vertical_action_epicyclic_limit() {
        // Small vertical amplitude: Jz → Ez/ν with ν² = ∂²Φ/∂z²(R, 0).
        let pot = vec![PotentialComponent::MiyamotoNagai { amp: 1.0, a: 1.25, b: 0.25 }];
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        let (r, vz) = (1.0, 1e-3);
        let (_, jz) = solver.actions(r, 0.1, 0.9, 0.0, vz).unwrap();

        let h = 1e-4;
        let nu2 = (pot.dphi_dz(r, h) - pot.dphi_dz(r, -h)) / (2.0 * h);
        let expected = 0.5 * vz * vz / nu2.sqrt();
        assert!(
            (jz - expected).abs() < 1e-3 * expected,
            "Jz = {jz}, epicyclic = {expected}"
        );
    }

    #[test]
    fn test_gamma_couples_jz_into_lz() {
        // γ > 0 raises Lz_eff, which shrinks the radial excursion.
        let pot = vec![PotentialComponent::MiyamotoNagai { amp: 1.0, a: 1.25, b: 0.25 }];
        let point = (1.0, 0.2, 0.9, 0.1, 0.15);
        let (r, vr, vt, z, vz) = point;

        let cfg = cfg();
        let free = AdiabaticSolver::new(&pot, 0.0, &cfg);
        let coupled = AdiabaticSolver::new(&pot, 1.0, &cfg);
        let (jr0, jz0) = free.actions(r, vr, vt, z, vz).unwrap();
        let (jr1, jz1) = coupled.actions(r, vr, vt, z, vz).unwrap();

        assert_eq!(jz0, jz1, "γ must not feed back into Jz");
        assert!(jz0 > 0.0);
        assert!(jr1 < jr0, "Jr should shrink with γ·Jz: {jr1} vs {jr0}");
    }

    #[test]
    fn test_apocentre_start_matches_interior_start() {
        // Same orbit sampled at two phases: at apocentre (vR = 0, K_r = 0
        // exactly) and at an interior radius. Jr must agree.
        let pot = vec![PotentialComponent::Plummer { amp: 1.0, b: 0.8 }];
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);

        let (r_apo, vt_apo) = (2.0, 0.5);
        let lz = r_apo * vt_apo;
        let e = 0.5 * vt_apo * vt_apo + pot.phi(r_apo, 0.0);
        let (jr_apo, _) = solver.actions(r_apo, 0.0, vt_apo, 0.0, 0.0).unwrap();
        assert!(jr_apo > 0.0);

        // Interior sample of the same (E, Lz).
        let r_in = 1.2;
        let vt_in = lz / r_in;
        let kr = e - pot.phi(r_in, 0.0) - 0.5 * lz * lz / (r_in * r_in);
        assert!(kr > 0.0);
        let vr_in = (2.0 * kr).sqrt();
        let (jr_in, _) = solver.actions(r_in, vr_in, vt_in, 0.0, 0.0).unwrap();

        assert!(
            (jr_apo - jr_in).abs() < 1e-6,
            "Jr(apo) = {jr_apo}, Jr(interior) = {jr_in}"
        );
    }

    #[test]
    fn test_escape_velocity_is_domain_error() {
        let pot = isochrone(1.0, 0.9);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        assert!(matches!(
            solver.actions(1.0, 8.0, 8.0, 0.0, 0.0),
            Err(GalkinError::Domain(_))
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let pot = isochrone(1.0, 0.9);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        assert!(solver.actions(1.0, f64::NAN, 0.5, 0.0, 0.0).is_err());
        assert!(solver.actions(f64::INFINITY, 0.0, 0.5, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_radial_orbit_through_centre() {
        // vT = 0 in a cored potential: Rmin = 0 is not an error.
        let pot = isochrone(1.0, 0.9);
        let config = cfg();
        let solver = AdiabaticSolver::new(&pot, 0.0, &config);
        let (jr, jz) = solver.actions(1.0, 0.3, 0.0, 0.0, 0.0).unwrap();
        assert!(jr > 0.0);
        assert_eq!(jz, 0.0);
    }
}
