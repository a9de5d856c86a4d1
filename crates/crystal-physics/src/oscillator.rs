// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Time-Crystal Oscillator
// ─────────────────────────────────────────────────────────────────────
//! Bounded periodic signal and its damped modulation:
//!
//!   x(t)    = A sin(2π f t)
//!   m(step) = A sin(2π f step / 100) · exp(-γ_t step / 100)
//!
//! Both are pure functions of their argument. The oscillator holds only
//! read-only parameters and may be shared across threads.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crystal_types::{population_std, ModelConstants, OscillatorParams};

/// `n` evenly spaced samples over [start, stop], both ends included.
///
/// `n == 1` yields `[start]`; `n == 0` yields an empty vector.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Stability sweep of the oscillator over [0, t_max].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrystalStability {
    pub time: Vec<f64>,
    pub oscillations: Vec<f64>,
    pub modulations: Vec<f64>,
    /// |⟨e^{i·2π·f·t}⟩| ∈ [0, 1].
    pub phase_coherence: f64,
    /// Population std of |x(t)|, ≥ 0.
    pub amplitude_stability: f64,
}

/// Damped periodic "crystal" signal generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCrystalOscillator {
    pub params: OscillatorParams,
    pub constants: ModelConstants,
}

impl TimeCrystalOscillator {
    pub fn new(params: OscillatorParams) -> Self {
        Self::with_constants(params, ModelConstants::default())
    }

    pub fn with_constants(params: OscillatorParams, constants: ModelConstants) -> Self {
        Self { params, constants }
    }

    /// x(t) with the configured frequency and amplitude.
    #[inline]
    pub fn oscillation(&self, t: f64) -> f64 {
        self.oscillation_with(t, self.params.frequency, self.params.amplitude)
    }

    /// x(t) = amplitude · sin(2π t frequency). |x| ≤ |amplitude|.
    #[inline]
    pub fn oscillation_with(&self, t: f64, frequency: f64, amplitude: f64) -> f64 {
        amplitude * (TAU * t * frequency).sin()
    }

    /// Damped modulation m(step). The envelope A·exp(-γ_t step / 100)
    /// is non-increasing in `step`.
    #[inline]
    pub fn modulation(&self, step: f64) -> f64 {
        let base = (TAU * step * self.params.frequency / 100.0).sin();
        base * self.envelope(step)
    }

    /// Envelope of `modulation`, independent of the oscillatory sign.
    #[inline]
    pub fn envelope(&self, step: f64) -> f64 {
        self.params.amplitude * (-self.params.damping * step / 100.0).exp()
    }

    /// Magnitude of the mean unit phasor e^{i·2π·f·t} over `times`.
    pub fn phase_coherence(&self, times: &[f64]) -> f64 {
        let n = times.len() as f64;
        if n < 1.0 {
            return 0.0;
        }
        let (sum_sin, sum_cos) = times.iter().fold((0.0, 0.0), |(s, c), &t| {
            let phase = TAU * self.params.frequency * t;
            (s + phase.sin(), c + phase.cos())
        });
        ((sum_sin / n).powi(2) + (sum_cos / n).powi(2))
            .sqrt()
            .clamp(0.0, 1.0)
    }

    /// Sample the oscillator at `n_steps` points over [0, t_max].
    pub fn stability(&self, t_max: f64, n_steps: usize) -> CrystalStability {
        let time = linspace(0.0, t_max, n_steps);
        let oscillations: Vec<f64> = time.iter().map(|&t| self.oscillation(t)).collect();
        let modulations: Vec<f64> = time.iter().map(|&t| self.modulation(t)).collect();

        let magnitudes: Vec<f64> = oscillations.iter().map(|x| x.abs()).collect();
        let amplitude_stability = population_std(&magnitudes);
        let phase_coherence = self.phase_coherence(&time);

        CrystalStability {
            time,
            oscillations,
            modulations,
            phase_coherence,
            amplitude_stability,
        }
    }

    /// Scale every value of every field by one crystalized evolution step:
    ///
    ///   (1 + 0.1·(Δt mod 2)) · (1 + m(Δt)·λ) · exp(-γ_t Δt / 1000)
    ///
    /// Field names and lengths are left untouched.
    pub fn evolve_fields(&self, fields: &mut BTreeMap<String, Vec<f64>>, time_step: f64) {
        let factor = self.evolution_factor(time_step);
        for values in fields.values_mut() {
            for v in values.iter_mut() {
                *v *= factor;
            }
        }
    }

    /// The multiplicative factor `evolve_fields` applies at `time_step`.
    pub fn evolution_factor(&self, time_step: f64) -> f64 {
        let coherence = 1.0 + self.modulation(time_step) * self.constants.coupling;
        let evolution = (1.0 + 0.1 * time_step.rem_euclid(2.0)) * coherence;
        let damping = (-self.params.damping * time_step / 1000.0).exp();
        evolution * damping
    }
}
