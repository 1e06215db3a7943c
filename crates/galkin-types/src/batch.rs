// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Phase-Space Batch & Result Types
// Mirrors: src/galkin/actions/batch.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{GalkinError, GalkinResult};

/// Number of phase-space fields per point: R, vR, vT, z, vz (in order).
pub const N_FIELDS: usize = 5;

/// Documented sentinel for a point whose solver did not converge.
/// Such slots are always paired with a nonzero aggregate error flag.
pub const SENTINEL: f64 = f64::NAN;

/// Memory layout of a flat 5×N phase-space buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// Row-major: one point's five fields are contiguous
    /// `[R0, vR0, vT0, z0, vz0, R1, ...]`.
    PointMajor,
    /// Column-major: one field's N values are contiguous
    /// `[R0..R(N-1), vR0..vR(N-1), ...]`. This is the kernel's
    /// canonical layout.
    FieldMajor,
}

/// A batch of N phase-space points in cylindrical coordinates.
///
/// Owns a flat buffer of `5 * N` values in either [`Layout`]. The batch
/// dispatcher normalises to [`Layout::FieldMajor`] for the duration of a
/// call and restores the original layout before returning, so callers
/// can reuse the backing storage across repeated calls.
#[derive(Debug, Clone)]
pub struct PhaseSpaceBatch {
    data: Vec<f64>,
    layout: Layout,
}

impl PhaseSpaceBatch {
    /// Wrap a flat buffer. Length must be a multiple of [`N_FIELDS`].
    pub fn new(data: Vec<f64>, layout: Layout) -> GalkinResult<Self> {
        if data.len() % N_FIELDS != 0 {
            return Err(GalkinError::Config(format!(
                "batch length {} is not a multiple of {N_FIELDS}",
                data.len()
            )));
        }
        Ok(Self { data, layout })
    }

    /// Build a field-major batch from five equal-length field slices.
    pub fn from_fields(
        r: &[f64],
        vr: &[f64],
        vt: &[f64],
        z: &[f64],
        vz: &[f64],
    ) -> GalkinResult<Self> {
        let n = r.len();
        for (name, field) in [("vR", vr), ("vT", vt), ("z", z), ("vz", vz)] {
            if field.len() != n {
                return Err(GalkinError::Config(format!(
                    "field {name} has length {}, expected {n}",
                    field.len()
                )));
            }
        }
        let mut data = Vec::with_capacity(N_FIELDS * n);
        for field in [r, vr, vt, z, vz] {
            data.extend_from_slice(field);
        }
        Ok(Self {
            data,
            layout: Layout::FieldMajor,
        })
    }

    /// Number of points in the batch.
    pub fn len(&self) -> usize {
        self.data.len() / N_FIELDS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// One field's contiguous slice. Only meaningful in field-major
    /// layout; the dispatcher normalises before reading.
    pub fn field(&self, idx: usize) -> &[f64] {
        debug_assert_eq!(self.layout, Layout::FieldMajor);
        let n = self.len();
        &self.data[idx * n..(idx + 1) * n]
    }

    /// The five fields of point `i`, regardless of current layout.
    pub fn point(&self, i: usize) -> [f64; N_FIELDS] {
        let n = self.len();
        let mut out = [0.0; N_FIELDS];
        match self.layout {
            Layout::PointMajor => {
                out.copy_from_slice(&self.data[i * N_FIELDS..(i + 1) * N_FIELDS]);
            }
            Layout::FieldMajor => {
                for (f, slot) in out.iter_mut().enumerate() {
                    *slot = self.data[f * n + i];
                }
            }
        }
        out
    }

    /// Transpose the buffer to the requested layout (no-op if already
    /// there). Uses a scratch copy; the buffer itself is rewritten so
    /// the caller's storage carries the new layout.
    pub fn set_layout(&mut self, layout: Layout) {
        if self.layout == layout {
            return;
        }
        let n = self.len();
        let scratch = self.data.clone();
        match layout {
            Layout::FieldMajor => {
                // point-major -> field-major
                for i in 0..n {
                    for f in 0..N_FIELDS {
                        self.data[f * n + i] = scratch[i * N_FIELDS + f];
                    }
                }
            }
            Layout::PointMajor => {
                // field-major -> point-major
                for i in 0..n {
                    for f in 0..N_FIELDS {
                        self.data[i * N_FIELDS + f] = scratch[f * n + i];
                    }
                }
            }
        }
        self.layout = layout;
    }
}

/// Batch result of the adiabatic action computation.
///
/// `err` is the aggregate error flag: 0 when every point converged,
/// nonzero when at least one point raised a domain error. Failed points
/// carry [`SENTINEL`] in both `jr` and `jz`; which points failed is not
/// recoverable from the flag (kept lossy for contract compatibility).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionBatch {
    /// Radial actions, one per point. Non-negative where converged.
    pub jr: Vec<f64>,
    /// Vertical actions, one per point. Non-negative where converged.
    pub jz: Vec<f64>,
    /// Aggregate error flag (0 = all converged).
    pub err: i32,
}

impl ActionBatch {
    pub fn converged(&self) -> bool {
        self.err == 0
    }
}

/// Batch result of the Staeckel u0 computation. Same aggregate-flag and
/// sentinel conventions as [`ActionBatch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U0Batch {
    /// Extremal prolate coordinate u0, one per (E, Lz) pair.
    pub u0: Vec<f64>,
    /// Aggregate error flag (0 = all converged).
    pub err: i32,
}

impl U0Batch {
    pub fn converged(&self) -> bool {
        self.err == 0
    }
}

/// Clamp a reduced-energy radicand to be non-negative.
///
/// Small negative values near turning points are quadrature round-off;
/// they are zeroed. A clamp deeper than `floor` is logged as a
/// numerical warning but still never propagates as NaN.
#[inline]
pub fn clamp_radicand(value: f64, floor: f64) -> f64 {
    if value >= 0.0 {
        return value;
    }
    if -value > floor {
        log::warn!("radicand {value:.3e} clamped to 0 (below noise floor {floor:.1e})");
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_length_divisibility() {
        assert!(PhaseSpaceBatch::new(vec![0.0; 10], Layout::FieldMajor).is_ok());
        assert!(PhaseSpaceBatch::new(vec![0.0; 7], Layout::FieldMajor).is_err());
    }

    #[test]
    fn test_from_fields_length_mismatch() {
        let r = [1.0, 1.1];
        let short = [0.1];
        let ok = [0.0, 0.0];
        assert!(PhaseSpaceBatch::from_fields(&r, &short, &ok, &ok, &ok).is_err());
    }

    #[test]
    fn test_point_accessor_both_layouts() {
        let r = [1.0, 2.0];
        let vr = [0.1, 0.2];
        let vt = [1.1, 1.2];
        let z = [0.01, 0.02];
        let vz = [0.3, 0.4];
        let mut batch = PhaseSpaceBatch::from_fields(&r, &vr, &vt, &z, &vz).unwrap();
        let p1 = batch.point(1);
        batch.set_layout(Layout::PointMajor);
        assert_eq!(batch.point(1), p1);
        assert_eq!(p1, [2.0, 0.2, 1.2, 0.02, 0.4]);
    }

    #[test]
    fn test_transpose_roundtrip_exact() {
        let data: Vec<f64> = (0..15).map(|i| i as f64 * 0.37).collect();
        let mut batch = PhaseSpaceBatch::new(data.clone(), Layout::PointMajor).unwrap();
        batch.set_layout(Layout::FieldMajor);
        assert_ne!(batch.data(), data.as_slice());
        batch.set_layout(Layout::PointMajor);
        assert_eq!(batch.data(), data.as_slice());
    }

    #[test]
    fn test_field_slices() {
        let r = [1.0, 2.0, 3.0];
        let vr = [0.1, 0.2, 0.3];
        let zeros = [0.0; 3];
        let batch = PhaseSpaceBatch::from_fields(&r, &vr, &zeros, &zeros, &zeros).unwrap();
        assert_eq!(batch.field(0), &r);
        assert_eq!(batch.field(1), &vr);
    }

    #[test]
    fn test_clamp_radicand_positive_untouched() {
        assert_eq!(clamp_radicand(0.5, 1e-10), 0.5);
    }

    #[test]
    fn test_clamp_radicand_small_negative_zeroed() {
        assert_eq!(clamp_radicand(-1e-14, 1e-10), 0.0);
    }

    #[test]
    fn test_clamp_radicand_large_negative_zeroed() {
        // Still clamps (never NaN), just louder about it.
        assert_eq!(clamp_radicand(-1e-3, 1e-10), 0.0);
    }

    #[test]
    fn test_sentinel_is_nan() {
        assert!(SENTINEL.is_nan());
    }
}
