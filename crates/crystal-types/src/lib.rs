// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Crystal Kernel — the crystal-modulated value simulation core.

pub mod config;
pub mod error;
pub mod metrics;

pub use config::{CrystalConfig, ModelConstants, OscillatorParams};
pub use error::{CrystalError, CrystalResult};
pub use metrics::{
    mean, population_std, CalculationResult, ConvergenceMetrics, PathMetrics, StepSample, TimeSeries,
};
