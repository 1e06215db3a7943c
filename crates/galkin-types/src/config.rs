// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Action Kernel Configuration
// Mirrors solver-relevant subset of: src/galkin/core/config.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{GalkinError, GalkinResult};

/// Runtime configuration for the action kernel's per-point solvers.
///
/// Contains only the knobs the hot path reads. Unit handling and the
/// full potential object model stay on the Python side; this is the
/// subset that crosses into the kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Maximum number of bracket-expansion doublings before a point is
    /// declared out of domain. Default: 64.
    pub max_bracket_iter: usize,

    /// Absolute convergence tolerance for the Brent root finder.
    /// Default: 1e-12.
    pub root_tol: f64,

    /// Iteration cap for the Brent root finder. Default: 100.
    pub root_max_iter: usize,

    /// Residual tolerance for the circular-orbit shortcut:
    /// |dPhi/dR - Lz_eff^2/R^3| below this at the input radius
    /// short-circuits Jr to 0. Default: 1e-8.
    pub circular_tol: f64,

    /// Noise floor for radicand clamping. Negative radicands smaller in
    /// magnitude than this are silently zeroed; larger ones are logged
    /// as numerical warnings. Default: 1e-10.
    pub radicand_floor: f64,

    /// Smallest admissible cylindrical radius / prolate coordinate.
    /// Brackets never shrink below this. Default: 1e-8.
    pub domain_floor: f64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            max_bracket_iter: 64,
            root_tol: 1e-12,
            root_max_iter: 100,
            circular_tol: 1e-8,
            radicand_floor: 1e-10,
            domain_floor: 1e-8,
        }
    }
}

impl ActionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> GalkinResult<()> {
        if self.max_bracket_iter < 1 {
            return Err(GalkinError::Config(format!(
                "max_bracket_iter must be >= 1, got {}",
                self.max_bracket_iter
            )));
        }
        if !self.root_tol.is_finite() || self.root_tol <= 0.0 {
            return Err(GalkinError::Config(format!(
                "root_tol must be positive and finite, got {}",
                self.root_tol
            )));
        }
        if self.root_max_iter < 1 {
            return Err(GalkinError::Config(format!(
                "root_max_iter must be >= 1, got {}",
                self.root_max_iter
            )));
        }
        if !self.circular_tol.is_finite() || self.circular_tol <= 0.0 {
            return Err(GalkinError::Config(format!(
                "circular_tol must be positive and finite, got {}",
                self.circular_tol
            )));
        }
        if !self.radicand_floor.is_finite() || self.radicand_floor < 0.0 {
            return Err(GalkinError::Config(format!(
                "radicand_floor must be non-negative and finite, got {}",
                self.radicand_floor
            )));
        }
        if !self.domain_floor.is_finite() || self.domain_floor <= 0.0 {
            return Err(GalkinError::Config(format!(
                "domain_floor must be positive and finite, got {}",
                self.domain_floor
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> GalkinResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GalkinError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(ActionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_bracket_iter_rejected() {
        let mut cfg = ActionConfig::default();
        cfg.max_bracket_iter = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_negative_root_tol_rejected() {
        let mut cfg = ActionConfig::default();
        cfg.root_tol = -1e-12;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nan_circular_tol_rejected() {
        let mut cfg = ActionConfig::default();
        cfg.circular_tol = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_domain_floor_rejected() {
        let mut cfg = ActionConfig::default();
        cfg.domain_floor = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_roundtrip() {
        let cfg = ActionConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = ActionConfig::from_json(&json).unwrap();
        assert_eq!(back.max_bracket_iter, cfg.max_bracket_iter);
        assert_eq!(back.root_tol, cfg.root_tol);
    }

    #[test]
    fn test_from_json_garbage_rejected() {
        assert!(ActionConfig::from_json("not json").is_err());
    }
}
