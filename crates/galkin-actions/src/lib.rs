// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Action Kernel
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Per-point solvers and batch dispatch for the adiabatic action
//! computation (Jr, Jz) and the Staeckel u0 companion solver.
//!
//! Pipeline per point: reduced-energy functions → turning-point
//! bracketing → fixed-order quadrature. Points are independent; the
//! dispatcher owns the array-layout contract and the aggregate error
//! flag.

pub mod adiabatic;
pub mod brent;
pub mod dispatch;
pub mod effective;
pub mod quadrature;
pub mod staeckel;
pub mod turning;

pub use adiabatic::AdiabaticSolver;
pub use brent::{BrentSolver, RootError};
pub use dispatch::{compute_adiabatic_actions, compute_staeckel_u0};
pub use effective::{RadialProblem, VerticalProblem};
pub use staeckel::U0Solver;
