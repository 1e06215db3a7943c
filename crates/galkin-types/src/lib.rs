// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Action Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Galkin action kernel — the batch Jr/Jz engine of the galactic
//! dynamics toolkit.

pub mod batch;
pub mod config;
pub mod error;

pub use batch::{ActionBatch, Layout, PhaseSpaceBatch, U0Batch, N_FIELDS, SENTINEL};
pub use config::ActionConfig;
pub use error::{GalkinError, GalkinResult};
