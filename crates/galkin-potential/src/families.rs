// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Analytic Potential Families
// Mirrors: src/galkin/potential/families.py
// ─────────────────────────────────────────────────────────────────────
//! The closed variant set of axisymmetric potential models and their
//! closed-form Φ, ∂Φ/∂R, ∂Φ/∂z.
//!
//! Amplitudes are GM-like in natural units (G = 1). All evaluation is
//! at cylindrical (R, z); spherical families go through r² = R² + z².

use serde::{Deserialize, Serialize};

use galkin_types::{GalkinError, GalkinResult};

/// Wire tag enumeration version. Tags are append-only: a new family
/// appends the next integer and bumps this; existing tags never change
/// meaning or arity.
pub const TAG_ENUM_VERSION: u32 = 3;

/// Evaluation capability injected into the solvers.
///
/// Implementations must be pure and safe for concurrent reads; the
/// solvers hold only shared references.
pub trait AxisymPotential {
    /// Potential Φ(R, z).
    fn phi(&self, r: f64, z: f64) -> f64;
    /// Radial derivative ∂Φ/∂R at (R, z).
    fn dphi_dr(&self, r: f64, z: f64) -> f64;
    /// Vertical derivative ∂Φ/∂z at (R, z).
    fn dphi_dz(&self, r: f64, z: f64) -> f64;
}

/// One analytic potential model. Immutable once constructed.
///
/// Wire tags and parameter order (see [`PotentialComponent::tag`]):
///
/// | tag | family          | params        |
/// |-----|-----------------|---------------|
/// | 0   | Plummer         | amp, b        |
/// | 1   | Hernquist       | amp, a        |
/// | 2   | Jaffe           | amp, a        |
/// | 3   | MiyamotoNagai   | amp, a, b     |
/// | 4   | LogarithmicHalo | amp, core, q  |
/// | 5   | Isochrone       | amp, b        |
/// | 6   | Nfw             | amp, a        |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PotentialComponent {
    /// Plummer sphere: Φ = −amp/√(r² + b²).
    Plummer { amp: f64, b: f64 },
    /// Hernquist sphere: Φ = −amp/(r + a).
    Hernquist { amp: f64, a: f64 },
    /// Jaffe sphere: Φ = −(amp/a)·ln(1 + a/r).
    Jaffe { amp: f64, a: f64 },
    /// Miyamoto–Nagai disk: Φ = −amp/√(R² + (a + √(z² + b²))²).
    MiyamotoNagai { amp: f64, a: f64, b: f64 },
    /// Flattened logarithmic halo: Φ = (amp/2)·ln(R² + (z/q)² + core²).
    LogarithmicHalo { amp: f64, core: f64, q: f64 },
    /// Isochrone sphere: Φ = −amp/(b + √(b² + r²)).
    Isochrone { amp: f64, b: f64 },
    /// NFW halo: Φ = −amp·ln(1 + r/a)/r.
    Nfw { amp: f64, a: f64 },
}

/// Declared parameter count per wire tag, indexed by tag.
const ARITY: [usize; 7] = [2, 2, 2, 3, 3, 2, 2];

impl PotentialComponent {
    /// Wire tag of this family.
    pub fn tag(&self) -> i32 {
        match self {
            Self::Plummer { .. } => 0,
            Self::Hernquist { .. } => 1,
            Self::Jaffe { .. } => 2,
            Self::MiyamotoNagai { .. } => 3,
            Self::LogarithmicHalo { .. } => 4,
            Self::Isochrone { .. } => 5,
            Self::Nfw { .. } => 6,
        }
    }

    /// Declared arity for a wire tag, or None for an unknown tag.
    pub fn arity_of(tag: i32) -> Option<usize> {
        usize::try_from(tag).ok().and_then(|t| ARITY.get(t).copied())
    }

    /// Parameter vector in wire order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Self::Plummer { amp, b } => vec![amp, b],
            Self::Hernquist { amp, a } => vec![amp, a],
            Self::Jaffe { amp, a } => vec![amp, a],
            Self::MiyamotoNagai { amp, a, b } => vec![amp, a, b],
            Self::LogarithmicHalo { amp, core, q } => vec![amp, core, q],
            Self::Isochrone { amp, b } => vec![amp, b],
            Self::Nfw { amp, a } => vec![amp, a],
        }
    }

    /// Reconstruct a component from its wire tag and parameter window.
    pub fn from_tag_params(tag: i32, params: &[f64]) -> GalkinResult<Self> {
        let arity = Self::arity_of(tag).ok_or_else(|| {
            GalkinError::Config(format!("unsupported potential tag {tag}"))
        })?;
        if params.len() != arity {
            return Err(GalkinError::Config(format!(
                "tag {tag} expects {arity} parameters, got {}",
                params.len()
            )));
        }
        Ok(match tag {
            0 => Self::Plummer { amp: params[0], b: params[1] },
            1 => Self::Hernquist { amp: params[0], a: params[1] },
            2 => Self::Jaffe { amp: params[0], a: params[1] },
            3 => Self::MiyamotoNagai { amp: params[0], a: params[1], b: params[2] },
            4 => Self::LogarithmicHalo { amp: params[0], core: params[1], q: params[2] },
            5 => Self::Isochrone { amp: params[0], b: params[1] },
            6 => Self::Nfw { amp: params[0], a: params[1] },
            _ => unreachable!("tag validated against ARITY above"),
        })
    }

    /// True for families with no z-dependence beyond spherical symmetry.
    pub fn is_spherical(&self) -> bool {
        !matches!(
            self,
            Self::MiyamotoNagai { .. } | Self::LogarithmicHalo { .. }
        )
    }
}

impl AxisymPotential for PotentialComponent {
    fn phi(&self, r: f64, z: f64) -> f64 {
        let rad2 = r * r + z * z;
        match *self {
            Self::Plummer { amp, b } => -amp / (rad2 + b * b).sqrt(),
            Self::Hernquist { amp, a } => -amp / (rad2.sqrt() + a),
            Self::Jaffe { amp, a } => -(amp / a) * (1.0 + a / rad2.sqrt()).ln(),
            Self::MiyamotoNagai { amp, a, b } => {
                let d = a + (z * z + b * b).sqrt();
                -amp / (r * r + d * d).sqrt()
            }
            Self::LogarithmicHalo { amp, core, q } => {
                0.5 * amp * (r * r + (z / q) * (z / q) + core * core).ln()
            }
            Self::Isochrone { amp, b } => -amp / (b + (b * b + rad2).sqrt()),
            Self::Nfw { amp, a } => {
                let rr = rad2.sqrt();
                -amp * (1.0 + rr / a).ln() / rr
            }
        }
    }

    fn dphi_dr(&self, r: f64, z: f64) -> f64 {
        let rad2 = r * r + z * z;
        match *self {
            Self::Plummer { amp, b } => {
                let s = rad2 + b * b;
                amp * r / (s * s.sqrt())
            }
            Self::Hernquist { amp, a } => {
                let rr = rad2.sqrt();
                let s = rr + a;
                amp * r / (rr * s * s)
            }
            Self::Jaffe { amp, a } => {
                let rr = rad2.sqrt();
                amp * r / (rad2 * (rr + a))
            }
            Self::MiyamotoNagai { amp, a, b } => {
                let d = a + (z * z + b * b).sqrt();
                let s = r * r + d * d;
                amp * r / (s * s.sqrt())
            }
            Self::LogarithmicHalo { amp, core, q } => {
                amp * r / (r * r + (z / q) * (z / q) + core * core)
            }
            Self::Isochrone { amp, b } => {
                let s = (b * b + rad2).sqrt();
                let bs = b + s;
                amp * r / (s * bs * bs)
            }
            Self::Nfw { amp, a } => {
                let rr = rad2.sqrt();
                let dphi = amp * ((1.0 + rr / a).ln() / rad2 - 1.0 / (rr * (rr + a)));
                dphi * r / rr
            }
        }
    }

    fn dphi_dz(&self, r: f64, z: f64) -> f64 {
        let rad2 = r * r + z * z;
        match *self {
            Self::Plummer { amp, b } => {
                let s = rad2 + b * b;
                amp * z / (s * s.sqrt())
            }
            Self::Hernquist { amp, a } => {
                let rr = rad2.sqrt();
                let s = rr + a;
                amp * z / (rr * s * s)
            }
            Self::Jaffe { amp, a } => {
                let rr = rad2.sqrt();
                amp * z / (rad2 * (rr + a))
            }
            Self::MiyamotoNagai { amp, a, b } => {
                let zb = (z * z + b * b).sqrt();
                let d = a + zb;
                let s = r * r + d * d;
                amp * z * d / (zb * s * s.sqrt())
            }
            Self::LogarithmicHalo { amp, core, q } => {
                amp * z / (q * q * (r * r + (z / q) * (z / q) + core * core))
            }
            Self::Isochrone { amp, b } => {
                let s = (b * b + rad2).sqrt();
                let bs = b + s;
                amp * z / (s * bs * bs)
            }
            Self::Nfw { amp, a } => {
                let rr = rad2.sqrt();
                let dphi = amp * ((1.0 + rr / a).ln() / rad2 - 1.0 / (rr * (rr + a)));
                dphi * z / rr
            }
        }
    }
}

/// Additive composite: evaluation sums every component's contribution.
impl AxisymPotential for [PotentialComponent] {
    fn phi(&self, r: f64, z: f64) -> f64 {
        self.iter().map(|c| c.phi(r, z)).sum()
    }

    fn dphi_dr(&self, r: f64, z: f64) -> f64 {
        self.iter().map(|c| c.dphi_dr(r, z)).sum()
    }

    fn dphi_dz(&self, r: f64, z: f64) -> f64 {
        self.iter().map(|c| c.dphi_dz(r, z)).sum()
    }
}

impl AxisymPotential for Vec<PotentialComponent> {
    fn phi(&self, r: f64, z: f64) -> f64 {
        self.as_slice().phi(r, z)
    }

    fn dphi_dr(&self, r: f64, z: f64) -> f64 {
        self.as_slice().dphi_dr(r, z)
    }

    fn dphi_dz(&self, r: f64, z: f64) -> f64 {
        self.as_slice().dphi_dz(r, z)
    }
}
