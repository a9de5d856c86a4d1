// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Result Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Arithmetic mean. Empty input yields 0.0.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N). Empty input yields 0.0.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / values.len() as f64;
    var.max(0.0).sqrt()
}

/// One simulation step, appended to every channel at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSample {
    pub void: f64,
    pub filament: f64,
    pub emergence: f64,
    pub resonance: f64,
    pub crystal_phase: f64,
    pub convergence: f64,
}

/// Index-aligned trace of a simulation, one element per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub void: Vec<f64>,
    pub filament: Vec<f64>,
    pub emergence: Vec<f64>,
    pub resonance: Vec<f64>,
    pub crystal_phase: Vec<f64>,
    pub convergence: Vec<f64>,
}

impl TimeSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            void: Vec::with_capacity(n),
            filament: Vec::with_capacity(n),
            emergence: Vec::with_capacity(n),
            resonance: Vec::with_capacity(n),
            crystal_phase: Vec::with_capacity(n),
            convergence: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, sample: StepSample) {
        self.void.push(sample.void);
        self.filament.push(sample.filament);
        self.emergence.push(sample.emergence);
        self.resonance.push(sample.resonance);
        self.crystal_phase.push(sample.crystal_phase);
        self.convergence.push(sample.convergence);
    }

    /// Channel lengths in declaration order.
    pub fn channel_lengths(&self) -> [usize; 6] {
        [
            self.void.len(),
            self.filament.len(),
            self.emergence.len(),
            self.resonance.len(),
            self.crystal_phase.len(),
            self.convergence.len(),
        ]
    }

    /// Common length if every channel has the same number of samples.
    pub fn uniform_len(&self) -> Option<usize> {
        let lens = self.channel_lengths();
        if lens.iter().all(|&l| l == lens[0]) {
            Some(lens[0])
        } else {
            None
        }
    }

    /// Number of steps (length of the void channel).
    pub fn len(&self) -> usize {
        self.void.len()
    }

    pub fn is_empty(&self) -> bool {
        self.void.is_empty()
    }
}

/// Convergence statistics of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceMetrics {
    /// 1 - mean of the last `stability_window` smoothed convergence values.
    pub stability_score: f64,
    /// Mean first difference of the smoothed convergence history.
    pub convergence_rate: f64,
    /// Last smoothed convergence value.
    pub final_convergence: f64,
    /// |⟨e^{i·2π·f·t}⟩| over the horizon, in [0, 1].
    pub phase_coherence: f64,
    /// Standard deviation of |oscillation(t)| over the horizon.
    pub amplitude_stability: f64,
    /// First step with a full stability window whose smoothed convergence
    /// is ≤ the configured threshold.
    pub converged_at: Option<usize>,
}

/// Outcome of `simulate`: final energies, full trace, convergence metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub original_value: f64,
    pub qdt_value: f64,
    pub void_energy: f64,
    pub filament_energy: f64,
    pub emergence_energy: f64,
    pub time_series: TimeSeries,
    pub convergence_metrics: ConvergenceMetrics,
}

impl CalculationResult {
    /// Sum of the final normalized energies (1.0 up to rounding).
    pub fn energy_total(&self) -> f64 {
        self.void_energy + self.filament_energy + self.emergence_energy
    }
}

/// Correlation / dimensionality statistics of a finished trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    /// Pearson r between void and filament, in [-1, 1].
    pub void_filament_coupling: f64,
    /// Pearson r between crystal_phase and resonance, in [-1, 1].
    pub crystal_resonance_coupling: f64,
    /// 1 - population std of the convergence channel.
    pub convergence_stability: f64,
    /// Correlation-matrix eigenvalues above 0.1, clamped to [1, 4].
    pub effective_dimensionality: usize,
    /// Last raw convergence sample.
    pub final_convergence: f64,
    /// Correlation-matrix eigenvalues, descending.
    pub eigenvalues: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64) -> StepSample {
        StepSample {
            void: x,
            filament: x,
            emergence: x,
            resonance: x,
            crystal_phase: x,
            convergence: x,
        }
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-12);
        assert!((population_std(&v) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_std_constant_is_zero() {
        assert_eq!(population_std(&[0.3; 7]), 0.0);
    }

    #[test]
    fn test_push_keeps_channels_aligned() {
        let mut ts = TimeSeries::with_capacity(3);
        for i in 0..3 {
            ts.push(sample(i as f64));
        }
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.uniform_len(), Some(3));
        assert_eq!(ts.convergence, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_uniform_len_detects_mismatch() {
        let mut ts = TimeSeries::default();
        ts.push(sample(1.0));
        ts.filament.push(2.0);
        assert_eq!(ts.uniform_len(), None);
    }

    #[test]
    fn test_time_series_payload_keys() {
        let mut ts = TimeSeries::default();
        ts.push(sample(0.5));
        let json = serde_json::to_value(&ts).unwrap();
        for key in [
            "void",
            "filament",
            "emergence",
            "resonance",
            "crystal_phase",
            "convergence",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
