// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{CrystalError, CrystalResult};

/// Per-invocation configuration for a crystal-enhanced calculation.
///
/// Created once per `simulate` call and never mutated. Range limits
/// beyond basic positivity (e.g. the 10–1000 step window of the public
/// endpoint) are enforced by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    /// Number of samples taken over the fixed [0, 10] horizon.
    /// Default: 100.
    pub evolution_steps: usize,

    /// Smoothed convergence at or below this marks the run as converged.
    /// Default: 0.01.
    pub convergence_threshold: f64,

    /// Most-recent convergence samples averaged per history entry.
    /// Default: 10. Must not exceed `evolution_steps`.
    pub stability_window: usize,

    /// Number of prime-indexed resonance terms summed per step.
    /// Default: 5.
    pub resonance_depth: usize,
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self {
            evolution_steps: 100,
            convergence_threshold: 0.01,
            stability_window: 10,
            resonance_depth: 5,
        }
    }
}

impl CrystalConfig {
    /// Config with `evolution_steps` overridden and the window shrunk to
    /// fit when the step count is smaller than the default window.
    pub fn with_steps(evolution_steps: usize) -> Self {
        let base = Self::default();
        Self {
            evolution_steps,
            stability_window: base.stability_window.min(evolution_steps.max(1)),
            ..base
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> CrystalResult<()> {
        if self.evolution_steps < 1 {
            return Err(CrystalError::Config(format!(
                "evolution_steps must be >= 1, got {}",
                self.evolution_steps
            )));
        }
        if self.stability_window < 1 {
            return Err(CrystalError::Config(format!(
                "stability_window must be >= 1, got {}",
                self.stability_window
            )));
        }
        if self.stability_window > self.evolution_steps {
            return Err(CrystalError::Config(format!(
                "stability_window ({}) must not exceed evolution_steps ({})",
                self.stability_window, self.evolution_steps
            )));
        }
        if self.resonance_depth < 1 {
            return Err(CrystalError::Config(format!(
                "resonance_depth must be >= 1, got {}",
                self.resonance_depth
            )));
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(CrystalError::Config(format!(
                "convergence_threshold must be finite and >= 0, got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CrystalResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CrystalError::Config(format!("JSON parse error: {e}")))
    }
}

/// Time-crystal oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorParams {
    /// Oscillation frequency. Default: 1.618033 (golden ratio, truncated).
    pub frequency: f64,
    /// Peak amplitude. Default: 0.1.
    pub amplitude: f64,
    /// Temporal damping constant γ_t. Default: 0.289.
    pub damping: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            frequency: 1.618033,
            amplitude: 0.1,
            damping: 0.289,
        }
    }
}

impl OscillatorParams {
    pub fn validate(&self) -> CrystalResult<()> {
        if !self.frequency.is_finite() {
            return Err(CrystalError::Config(format!(
                "frequency must be finite, got {}",
                self.frequency
            )));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(CrystalError::Config(format!(
                "amplitude must be finite and >= 0, got {}",
                self.amplitude
            )));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(CrystalError::Config(format!(
                "damping must be finite and >= 0, got {}",
                self.damping
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CrystalResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CrystalError::Config(format!("JSON parse error: {e}")))
    }
}

/// Fixed model parameters of the void/filament/emergence dynamics.
///
/// One explicit record handed to the engine; nothing reads these from
/// global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConstants {
    /// λ — coupling between void loss and filament gain.
    pub coupling: f64,
    /// γ — exponential damping of the void channel.
    pub damping: f64,
    /// β — fractal recursion exponent.
    pub recursion: f64,
    /// η — energy transfer rate into emergence.
    pub transfer_rate: f64,
    /// φ
    pub golden_ratio: f64,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            coupling: 0.867,
            damping: 0.4497,
            recursion: 0.310,
            transfer_rate: 0.520,
            golden_ratio: 1.618033988749,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let cfg = CrystalConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.evolution_steps, 100);
        assert_eq!(cfg.convergence_threshold, 0.01);
        assert_eq!(cfg.stability_window, 10);
        assert_eq!(cfg.resonance_depth, 5);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let cfg = CrystalConfig {
            evolution_steps: 0,
            stability_window: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, CrystalError::Config(_)));
        assert!(err.to_string().contains("evolution_steps"));
    }

    #[test]
    fn test_window_larger_than_steps_rejected() {
        let cfg = CrystalConfig {
            evolution_steps: 5,
            stability_window: 6,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("stability_window"), "{err}");
    }

    #[test]
    fn test_zero_depth_rejected() {
        let cfg = CrystalConfig {
            resonance_depth: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let cfg = CrystalConfig {
            convergence_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_with_steps_shrinks_window() {
        let cfg = CrystalConfig::with_steps(4);
        assert_eq!(cfg.evolution_steps, 4);
        assert_eq!(cfg.stability_window, 4);
        assert!(cfg.validate().is_ok());

        let cfg = CrystalConfig::with_steps(200);
        assert_eq!(cfg.stability_window, 10);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = CrystalConfig::from_json(r#"{"evolution_steps": 200, "resonance_depth": 10}"#)
            .unwrap();
        assert_eq!(cfg.evolution_steps, 200);
        assert_eq!(cfg.resonance_depth, 10);
        assert_eq!(cfg.stability_window, 10);
    }

    #[test]
    fn test_from_json_malformed() {
        let err = CrystalConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CrystalError::Config(_)));
    }

    #[test]
    fn test_oscillator_defaults() {
        let p = OscillatorParams::default();
        assert!((p.frequency - 1.618033).abs() < 1e-12);
        assert_eq!(p.amplitude, 0.1);
        assert_eq!(p.damping, 0.289);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_oscillator_negative_amplitude_rejected() {
        let p = OscillatorParams {
            amplitude: -0.1,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_oscillator_from_json() {
        let p = OscillatorParams::from_json(r#"{"frequency": 2.0}"#).unwrap();
        assert_eq!(p.frequency, 2.0);
        assert_eq!(p.amplitude, 0.1);
    }
}
