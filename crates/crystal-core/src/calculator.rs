// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Crystal Calculator (Simulation Engine)
// ─────────────────────────────────────────────────────────────────────
//! Time-stepped evolution of the void / filament / emergence energies
//! under crystal modulation, sampled evenly over t ∈ [0, 10]:
//!
//!   V(t) = e^{-γt} · max(1, t)^{-β} · (1 + 0.1 m)
//!   E(t) = η (1 - e^{-0.1t}) sin(π φ t) λ γ (1 + 0.05 m)
//!   R(t) = Σ_p sin(2π p λ t) cos(π p β t)(1 + 0.1 m) / Σ_p |…|
//!   F(t) = λ (1 - V) + R (V + E)/2 · (1 + 0.1 m)
//!
//! with m = crystal modulation at t. (V, F, E) are renormalised to sum
//! to 1 at every step; the final mix scales the input value.

use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};

use crystal_physics::{linspace, shared_primes, Category, TimeCrystalOscillator, HORIZON};
use crystal_types::{
    mean, CalculationResult, ConvergenceMetrics, CrystalConfig, CrystalError, CrystalResult,
    ModelConstants, OscillatorParams, StepSample, TimeSeries,
};

/// Energy sums with magnitude below this cannot be normalised.
pub const ENERGY_EPSILON: f64 = 1e-12;

/// Weights of the final (void, filament, emergence) mix.
const MIX_WEIGHTS: (f64, f64, f64) = (0.4, 0.4, 0.2);

/// Crystal-enhanced value calculator.
///
/// Holds only read-only configuration. Every `simulate` call owns its
/// own trace, so one calculator can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct CrystalCalculator {
    config: CrystalConfig,
    crystal: TimeCrystalOscillator,
}

impl CrystalCalculator {
    /// Validates both records before accepting them.
    pub fn new(config: CrystalConfig, params: OscillatorParams) -> CrystalResult<Self> {
        Self::with_constants(config, params, ModelConstants::default())
    }

    pub fn with_constants(
        config: CrystalConfig,
        params: OscillatorParams,
        constants: ModelConstants,
    ) -> CrystalResult<Self> {
        config.validate()?;
        params.validate()?;
        Ok(Self {
            config,
            crystal: TimeCrystalOscillator::with_constants(params, constants),
        })
    }

    /// Default config and oscillator parameters.
    pub fn default_params() -> Self {
        Self {
            config: CrystalConfig::default(),
            crystal: TimeCrystalOscillator::default(),
        }
    }

    pub fn config(&self) -> &CrystalConfig {
        &self.config
    }

    pub fn oscillator(&self) -> &TimeCrystalOscillator {
        &self.crystal
    }

    /// Run the full evolution for `value` in `category`.
    pub fn simulate(&self, value: f64, category: Category) -> CrystalResult<CalculationResult> {
        let cfg = &self.config;
        let n = cfg.evolution_steps;
        let window_len = cfg.stability_window;
        log::debug!(
            "simulate: value={value}, category={}, steps={n}, depth={}",
            category.label(),
            cfg.resonance_depth
        );

        let primes = shared_primes(cfg.resonance_depth);
        let mut series = TimeSeries::with_capacity(n);
        let mut window: VecDeque<f64> = VecDeque::with_capacity(window_len);
        let mut history: Vec<f64> = Vec::with_capacity(n);

        for (step, t) in linspace(0.0, HORIZON, n).into_iter().enumerate() {
            let sample = self.evolve_step(t, &primes).map_err(|e| {
                log::error!("simulate: step {step} (t={t:.4}) degenerated: {e}");
                e
            })?;

            window.push_back(sample.convergence);
            if window.len() > window_len {
                window.pop_front();
            }
            history.push(window.iter().sum::<f64>() / window.len() as f64);
            series.push(sample);
        }

        // `validate` guarantees n ≥ 1, so every channel has a last element.
        let void_energy = last_or_zero(&series.void);
        let filament_energy = last_or_zero(&series.filament);
        let emergence_energy = last_or_zero(&series.emergence);

        let (wv, wf, we) = MIX_WEIGHTS;
        let mix = wv * void_energy + wf * filament_energy + we * emergence_energy;
        let qdt_value = value * category.multiplier() * mix;

        let convergence_metrics = self.convergence_metrics(&history);
        log::debug!(
            "simulate: qdt_value={qdt_value:.6}, final_convergence={:.6}",
            convergence_metrics.final_convergence
        );

        Ok(CalculationResult {
            original_value: value,
            qdt_value,
            void_energy,
            filament_energy,
            emergence_energy,
            time_series: series,
            convergence_metrics,
        })
    }

    /// `simulate` for every defined category, in `Category::ALL` order.
    pub fn compare_categories(&self, value: f64) -> CrystalResult<Vec<(Category, f64)>> {
        Category::ALL
            .iter()
            .map(|&cat| Ok((cat, self.simulate(value, cat)?.qdt_value)))
            .collect()
    }

    /// One step of the coupled dynamics at time `t`, normalised.
    fn evolve_step(&self, t: f64, primes: &[u64]) -> CrystalResult<StepSample> {
        let k = &self.crystal.constants;
        let crystal_mod = self.crystal.modulation(t);
        let coupling_mod = 1.0 + 0.1 * crystal_mod;

        let void = (-k.damping * t).exp() * (1.0 / t.max(1.0)).powf(k.recursion) * coupling_mod;

        let emergence = k.transfer_rate
            * (1.0 - (-0.1 * t).exp())
            * (PI * t * k.golden_ratio).sin()
            * k.coupling
            * k.damping
            * (1.0 + 0.05 * crystal_mod);

        let resonance = normalized_resonance(t, primes, k, coupling_mod);

        let filament =
            k.coupling * (1.0 - void) + resonance * (void + emergence) / 2.0 * coupling_mod;

        let total = void + filament + emergence;
        if !total.is_finite() || total.abs() < ENERGY_EPSILON {
            return Err(CrystalError::Numerical(format!(
                "energy sum {total:e} at t={t} cannot be normalised"
            )));
        }

        let crystal_phase = self.crystal.oscillation(t);
        Ok(StepSample {
            void: void / total,
            filament: filament / total,
            emergence: emergence / total,
            resonance,
            crystal_phase,
            convergence: (crystal_phase - resonance).abs(),
        })
    }

    fn convergence_metrics(&self, history: &[f64]) -> ConvergenceMetrics {
        let tail = &history[history.len().saturating_sub(self.config.stability_window)..];
        let stability_score = 1.0 - mean(tail);

        let diffs: Vec<f64> = history.windows(2).map(|w| w[1] - w[0]).collect();
        let convergence_rate = mean(&diffs);

        let final_convergence = history.last().copied().unwrap_or(0.0);
        // Only steps with a full window count; earlier entries average
        // too few samples to mean anything.
        let warmup = self.config.stability_window.saturating_sub(1);
        let converged_at = history
            .iter()
            .enumerate()
            .skip(warmup)
            .find(|&(_, &c)| c <= self.config.convergence_threshold)
            .map(|(step, _)| step);

        let stability = self
            .crystal
            .stability(HORIZON, self.config.evolution_steps);

        ConvergenceMetrics {
            stability_score,
            convergence_rate,
            final_convergence,
            phase_coherence: stability.phase_coherence,
            amplitude_stability: stability.amplitude_stability,
            converged_at,
        }
    }
}

/// Σ term_p / Σ |term_p| over the prime table; 0 when every term is 0.
fn normalized_resonance(t: f64, primes: &[u64], k: &ModelConstants, coupling_mod: f64) -> f64 {
    let (sum, abs_sum) = primes.iter().fold((0.0, 0.0), |(s, a), &p| {
        let p = p as f64;
        let term =
            (TAU * p * k.coupling * t).sin() * (PI * p * k.recursion * t).cos() * coupling_mod;
        (s + term, a + term.abs())
    });
    if abs_sum > 0.0 {
        sum / abs_sum
    } else {
        0.0
    }
}

fn last_or_zero(channel: &[f64]) -> f64 {
    channel.last().copied().unwrap_or(0.0)
}

/// Free-function form: validate, build a calculator, run it.
pub fn simulate(
    value: f64,
    category: Category,
    config: &CrystalConfig,
    params: &OscillatorParams,
) -> CrystalResult<CalculationResult> {
    CrystalCalculator::new(config.clone(), *params)?.simulate(value, category)
}
