// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Action Kernel Error Hierarchy
// Mirrors: src/galkin/core/exceptions.py
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all action-kernel failures.
#[derive(Error, Debug)]
pub enum GalkinError {
    /// Invalid configuration, potential encoding, or batch shape.
    /// Rejects the whole call before any numerical work starts.
    #[error("config error: {0}")]
    Config(String),

    /// A turning point or extremum could not be bracketed within the
    /// iteration cap (unbound orbit or point outside the approximation's
    /// valid domain). Scoped to a single point.
    #[error("domain error: {0}")]
    Domain(String),

    /// Numerical failure (NaN/Inf reached a solver input).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type GalkinResult<T> = Result<T, GalkinError>;
