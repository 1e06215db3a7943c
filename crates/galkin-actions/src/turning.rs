// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Turning-Point Bracketing
// Mirrors: src/galkin/actions/turning.py
// ─────────────────────────────────────────────────────────────────────
//! Locates the zeros of the reduced-energy functions: zmax for the
//! vertical oscillation, (Rmin, Rmax) for the radial one, and the
//! circular (guiding) radius for a given angular momentum.
//!
//! All searches expand a bracket by doubling/halving under the
//! configured iteration cap, then hand the sign change to Brent.
//! Failure to bracket is a per-point domain error (unbound orbit or a
//! point outside the approximation's valid domain).

use galkin_potential::AxisymPotential;
use galkin_types::{ActionConfig, GalkinError, GalkinResult};

use crate::brent::BrentSolver;
use crate::effective::{RadialProblem, VerticalProblem};

fn root_solver(config: &ActionConfig) -> BrentSolver {
    BrentSolver::new(config.root_tol, config.root_max_iter)
}

/// Solve K_z(zmax) = 0 for zmax ≥ |z|.
///
/// The point's own height is a guaranteed lower bracket edge
/// (K_z(|z|) = ½vz² ≥ 0); the upper edge doubles until K_z turns
/// non-positive.
pub fn find_zmax(vert: &VerticalProblem<'_>, z: f64, config: &ActionConfig) -> GalkinResult<f64> {
    if vert.ez <= 0.0 {
        return Ok(0.0);
    }
    let mut lo = z.abs();
    let mut hi = (2.0 * lo).max(0.1 * vert.r);
    let mut bracketed = false;
    for _ in 0..config.max_bracket_iter {
        if vert.kz(hi) <= 0.0 {
            bracketed = true;
            break;
        }
        lo = hi;
        hi *= 2.0;
    }
    if !bracketed {
        return Err(GalkinError::Domain(format!(
            "vertical turning point not bracketed below z = {hi:.3e} (unbound in z?)"
        )));
    }
    let (zmax, _) = root_solver(config)
        .find_root(|zp| vert.kz(zp), lo, hi)
        .map_err(|e| GalkinError::Domain(format!("zmax solve failed: {e}")))?;
    Ok(zmax)
}

/// Solve for the circular (guiding) radius of angular momentum `lz`:
/// the root of dΦ/dR(R, 0) − Lz²/R³.
pub fn circular_radius(
    pot: &dyn AxisymPotential,
    lz: f64,
    seed: f64,
    config: &ActionConfig,
) -> GalkinResult<f64> {
    if lz == 0.0 {
        return Err(GalkinError::Domain(
            "no circular radius for zero angular momentum".to_string(),
        ));
    }
    let lz2 = lz * lz;
    let g = |r: f64| pot.dphi_dr(r, 0.0) - lz2 / (r * r * r);

    let seed = seed.max(config.domain_floor);
    let mut lo = seed;
    let mut hi = seed;
    if g(seed) > 0.0 {
        // Guiding radius lies inside the seed: halve down to a sign change.
        let mut bracketed = false;
        for _ in 0..config.max_bracket_iter {
            hi = lo;
            lo = (0.5 * lo).max(config.domain_floor);
            if g(lo) <= 0.0 {
                bracketed = true;
                break;
            }
            if lo == config.domain_floor {
                break;
            }
        }
        if !bracketed {
            return Err(GalkinError::Domain(format!(
                "circular radius for Lz = {lz:.3e} not bracketed above the domain floor"
            )));
        }
    } else {
        // Guiding radius lies outside the seed: double up to a sign change.
        let mut bracketed = false;
        for _ in 0..config.max_bracket_iter {
            lo = hi;
            hi *= 2.0;
            if g(hi) >= 0.0 {
                bracketed = true;
                break;
            }
        }
        if !bracketed {
            return Err(GalkinError::Domain(format!(
                "circular radius for Lz = {lz:.3e} not bracketed below R = {hi:.3e}"
            )));
        }
    }
    let (rc, _) = root_solver(config)
        .find_root(g, lo, hi)
        .map_err(|e| GalkinError::Domain(format!("circular radius solve failed: {e}")))?;
    Ok(rc)
}

/// Inner turning point: solve K_r = 0 inward from `from`, where
/// K_r(from) ≥ 0.
///
/// Returns exactly 0 for the radial-orbit edge case where K_r stays
/// positive down to the domain floor (vanishing Lz_eff): the orbit
/// passes through the centre.
pub fn find_rmin(rad: &RadialProblem<'_>, from: f64, config: &ActionConfig) -> GalkinResult<f64> {
    let mut hi = from;
    let mut lo = 0.5 * from;
    let mut iters = 0usize;
    while lo > config.domain_floor && rad.kr(lo) > 0.0 && iters < config.max_bracket_iter {
        hi = lo;
        lo *= 0.5;
        iters += 1;
    }
    if rad.kr(lo) > 0.0 {
        return Ok(0.0);
    }
    let (rmin, _) = root_solver(config)
        .find_root(|rp| rad.kr(rp), lo, hi)
        .map_err(|e| GalkinError::Domain(format!("Rmin solve failed: {e}")))?;
    Ok(rmin)
}

/// Outer turning point: solve K_r = 0 outward from `from`, where
/// K_r(from) ≥ 0. Failure to bracket means the orbit is unbound.
pub fn find_rmax(rad: &RadialProblem<'_>, from: f64, config: &ActionConfig) -> GalkinResult<f64> {
    let mut lo = from;
    let mut hi = 2.0 * from;
    let mut bracketed = false;
    for _ in 0..config.max_bracket_iter {
        if rad.kr(hi) <= 0.0 {
            bracketed = true;
            break;
        }
        lo = hi;
        hi *= 2.0;
    }
    if !bracketed {
        return Err(GalkinError::Domain(format!(
            "outer turning point not bracketed below R = {hi:.3e} (unbound orbit)"
        )));
    }
    let (rmax, _) = root_solver(config)
        .find_root(|rp| rad.kr(rp), lo, hi)
        .map_err(|e| GalkinError::Domain(format!("Rmax solve failed: {e}")))?;
    Ok(rmax)
}

/// Both turning points around `center`, which must lie strictly inside
/// the oscillation (K_r(center) > 0). A center that is itself a turning
/// point (vR = 0 at peri/apocentre) must be disambiguated by the caller
/// against the guiding radius before searching.
pub fn find_radial_bracket(
    rad: &RadialProblem<'_>,
    center: f64,
    config: &ActionConfig,
) -> GalkinResult<(f64, f64)> {
    Ok((
        find_rmin(rad, center, config)?,
        find_rmax(rad, center, config)?,
    ))
}
