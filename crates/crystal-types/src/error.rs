// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Crystal Kernel failures.
///
/// Every failure is local to one invocation. The computation is
/// deterministic, so none of these are worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrystalError {
    /// Invalid configuration (steps, window, depth, oscillator params).
    #[error("config error: {0}")]
    Config(String),

    /// Malformed input record (e.g. time-series channels of unequal length).
    #[error("validation error: {0}")]
    Validation(String),

    /// Numerical degeneracy (zero or non-finite energy sum).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Too few samples for a statistic to be defined.
    #[error("insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
}

pub type CrystalResult<T> = Result<T, CrystalError>;
