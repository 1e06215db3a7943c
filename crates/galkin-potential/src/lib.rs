// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Potential Families & Wire Encoding
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Closed set of analytic axisymmetric potential families, the composite
//! (additive) potential built from them, and the flat tagged-variant
//! encoding that crosses into the numerical kernel.

pub mod encode;
pub mod families;

pub use encode::{decode, encode, EncodedPotential};
pub use families::{AxisymPotential, PotentialComponent, TAG_ENUM_VERSION};
