// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Potential Wire Encoding
// Mirrors: src/galkin/potential/parse.py
// ─────────────────────────────────────────────────────────────────────
//! Flattening of an ordered component list into the tagged-variant
//! record the numerical kernel consumes: component count, a type-tag
//! array, and the concatenated parameter array in tag order.
//!
//! The encode/decode pair is a pure allocation-only transform; it is
//! the join point between the dynamically extensible potential model
//! and the fixed-arity kernel.

use serde::{Deserialize, Serialize};

use galkin_types::{GalkinError, GalkinResult};

use crate::families::{AxisymPotential, PotentialComponent};

/// The wire form of a composite potential: the only representation
/// crossing into the numerical kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedPotential {
    /// Component count.
    pub count: i32,
    /// One wire tag per component, in order.
    pub tags: Vec<i32>,
    /// Concatenated parameter vectors, in tag order.
    pub params: Vec<f64>,
}

/// Flatten an ordered component list into the wire form.
///
/// Fails with a config error on an empty list; tags and arities are
/// correct by construction of [`PotentialComponent`].
pub fn encode(components: &[PotentialComponent]) -> GalkinResult<EncodedPotential> {
    if components.is_empty() {
        return Err(GalkinError::Config(
            "composite potential must have at least one component".to_string(),
        ));
    }
    let mut tags = Vec::with_capacity(components.len());
    let mut params = Vec::new();
    for c in components {
        tags.push(c.tag());
        params.extend(c.params());
    }
    Ok(EncodedPotential {
        count: components.len() as i32,
        tags,
        params,
    })
}

/// Reconstruct the component list from the wire form.
///
/// Rejects unknown tags, arity/parameter-array length mismatches, and
/// inconsistent counts before any numerical work can consume the record.
pub fn decode(encoded: &EncodedPotential) -> GalkinResult<Vec<PotentialComponent>> {
    if encoded.count as usize != encoded.tags.len() {
        return Err(GalkinError::Config(format!(
            "encoded count {} does not match tag array length {}",
            encoded.count,
            encoded.tags.len()
        )));
    }
    if encoded.tags.is_empty() {
        return Err(GalkinError::Config(
            "encoded potential has no components".to_string(),
        ));
    }
    let mut components = Vec::with_capacity(encoded.tags.len());
    let mut cursor = 0usize;
    for &tag in &encoded.tags {
        let arity = PotentialComponent::arity_of(tag).ok_or_else(|| {
            GalkinError::Config(format!("unsupported potential tag {tag}"))
        })?;
        let window = encoded
            .params
            .get(cursor..cursor + arity)
            .ok_or_else(|| {
                GalkinError::Config(format!(
                    "parameter array exhausted decoding tag {tag} at offset {cursor}"
                ))
            })?;
        components.push(PotentialComponent::from_tag_params(tag, window)?);
        cursor += arity;
    }
    if cursor != encoded.params.len() {
        return Err(GalkinError::Config(format!(
            "parameter array has {} trailing values after decoding {} components",
            encoded.params.len() - cursor,
            components.len()
        )));
    }
    Ok(components)
}

impl EncodedPotential {
    /// Decode and validate, returning the evaluable component list.
    pub fn components(&self) -> GalkinResult<Vec<PotentialComponent>> {
        decode(self)
    }

    /// Evaluate (Φ, ∂Φ/∂R, ∂Φ/∂z) at a single point. Convenience for
    /// callers holding only the wire form; batch paths decode once
    /// instead.
    pub fn evaluate(&self, r: f64, z: f64) -> GalkinResult<(f64, f64, f64)> {
        let comps = self.components()?;
        Ok((
            comps.phi(r, z),
            comps.dphi_dr(r, z),
            comps.dphi_dz(r, z),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_halo() -> Vec<PotentialComponent> {
        vec![
            PotentialComponent::MiyamotoNagai { amp: 1.0, a: 1.25, b: 0.25 },
            PotentialComponent::Nfw { amp: 2.0, a: 4.0 },
            PotentialComponent::Hernquist { amp: 0.3, a: 0.2 },
        ]
    }

    #[test]
    fn test_encode_shape() {
        let enc = encode(&disk_halo()).unwrap();
        assert_eq!(enc.count, 3);
        assert_eq!(enc.tags, vec![3, 6, 1]);
        assert_eq!(enc.params.len(), 3 + 2 + 2);
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(encode(&[]).is_err());
    }

    #[test]
    fn test_roundtrip_identical_evaluation() {
        // Encode→decode must reproduce identical evaluation on a grid.
        let comps = disk_halo();
        let enc = encode(&comps).unwrap();
        let back = decode(&enc).unwrap();
        for &r in &[0.3, 1.0, 2.5, 8.0] {
            for &z in &[-1.0, 0.0, 0.4] {
                assert_eq!(comps.phi(r, z), back.phi(r, z));
                assert_eq!(comps.dphi_dr(r, z), back.dphi_dr(r, z));
                assert_eq!(comps.dphi_dz(r, z), back.dphi_dz(r, z));
            }
        }
    }

    #[test]
    fn test_decode_unknown_tag() {
        let mut enc = encode(&disk_halo()).unwrap();
        enc.tags[1] = 42;
        assert!(decode(&enc).is_err());
    }

    #[test]
    fn test_decode_count_mismatch() {
        let mut enc = encode(&disk_halo()).unwrap();
        enc.count = 2;
        assert!(decode(&enc).is_err());
    }

    #[test]
    fn test_decode_truncated_params() {
        let mut enc = encode(&disk_halo()).unwrap();
        enc.params.pop();
        assert!(decode(&enc).is_err());
    }

    #[test]
    fn test_decode_trailing_params() {
        let mut enc = encode(&disk_halo()).unwrap();
        enc.params.push(7.0);
        assert!(decode(&enc).is_err());
    }

    #[test]
    fn test_evaluate_sums_components() {
        let comps = disk_halo();
        let enc = encode(&comps).unwrap();
        let (phi, dr, dz) = enc.evaluate(1.2, 0.3).unwrap();
        assert!((phi - comps.phi(1.2, 0.3)).abs() < 1e-15);
        assert!((dr - comps.dphi_dr(1.2, 0.3)).abs() < 1e-15);
        assert!((dz - comps.dphi_dz(1.2, 0.3)).abs() < 1e-15);
    }
}
