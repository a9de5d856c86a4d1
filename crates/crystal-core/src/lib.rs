// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Crystal-modulated simulation engine and convergence-path analyzer.
//!
//! Data flows one way: oscillator → `CrystalCalculator::simulate` →
//! `TimeSeries` → `analyze`.
//!
//! # Invariants
//!
//! 1. **Energy normalisation**: at every step of a successful
//!    simulation, `void + filament + emergence == 1` within 1e-10. A step
//!    whose raw energy sum is zero or non-finite aborts the run with
//!    `CrystalError::Numerical`; no partial result is returned.
//!
//! 2. **Determinism**: identical arguments produce bit-identical
//!    results. There is no randomness and no shared mutable state
//!    besides the append-only prime cache.
//!
//! 3. **Bounded work**: each run costs O(evolution_steps × resonance_depth);
//!    the prime table is built before the step loop.

pub mod calculator;
pub mod eigen;
pub mod path;

pub use calculator::{simulate, CrystalCalculator, ENERGY_EPSILON};
pub use eigen::symmetric_eigenvalues;
pub use path::{analyze, correlation_matrix, pearson, DIMENSION_THRESHOLD, MIN_SAMPLES};
