// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Convergence Path Analyzer
// ─────────────────────────────────────────────────────────────────────
//! Correlation, stability, and dimensionality statistics over a
//! finished simulation trace.

use crystal_types::{population_std, CrystalError, CrystalResult, PathMetrics, TimeSeries};

use crate::eigen::symmetric_eigenvalues;

/// Correlation-matrix eigenvalues above this count toward dimensionality.
pub const DIMENSION_THRESHOLD: f64 = 0.1;

/// Fewest samples for which a correlation coefficient is defined.
pub const MIN_SAMPLES: usize = 2;

/// Channels spanning the phase space: void, filament, emergence, crystal_phase.
const N_PHASE_CHANNELS: usize = 4;

/// Pearson correlation of two equal-length samples.
///
/// A zero-variance input has no defined coefficient; it is reported as
/// 0.0 (uncorrelated). The result is clamped to [-1, 1].
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom <= 0.0 || !denom.is_finite() {
        log::warn!("pearson: zero-variance channel, reporting r = 0");
        return 0.0;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Row-major k×k correlation matrix of `channels` (unit diagonal).
pub fn correlation_matrix(channels: &[&[f64]]) -> Vec<f64> {
    let k = channels.len();
    let mut m = vec![0.0; k * k];
    for i in 0..k {
        m[i * k + i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(channels[i], channels[j]);
            m[i * k + j] = r;
            m[j * k + i] = r;
        }
    }
    m
}

/// Analyze a finished trace.
///
/// Requires all six channels to have the same length N ≥ 2.
pub fn analyze(series: &TimeSeries) -> CrystalResult<PathMetrics> {
    let n = series.uniform_len().ok_or_else(|| {
        CrystalError::Validation(format!(
            "time-series channels differ in length: {:?}",
            series.channel_lengths()
        ))
    })?;
    if n < MIN_SAMPLES {
        return Err(CrystalError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: n,
        });
    }

    let void_filament_coupling = pearson(&series.void, &series.filament);
    let crystal_resonance_coupling = pearson(&series.crystal_phase, &series.resonance);
    let convergence_stability = 1.0 - population_std(&series.convergence);

    let channels: [&[f64]; N_PHASE_CHANNELS] = [
        &series.void,
        &series.filament,
        &series.emergence,
        &series.crystal_phase,
    ];
    let corr = correlation_matrix(&channels);
    let eigenvalues = symmetric_eigenvalues(&corr, N_PHASE_CHANNELS);
    let effective_dimensionality = eigenvalues
        .iter()
        .filter(|&&v| v > DIMENSION_THRESHOLD)
        .count()
        .clamp(1, N_PHASE_CHANNELS);

    let final_convergence = series.convergence.last().copied().unwrap_or(0.0);

    Ok(PathMetrics {
        void_filament_coupling,
        crystal_resonance_coupling,
        convergence_stability,
        effective_dimensionality,
        final_convergence,
        eigenvalues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::simulate;
    use crystal_physics::Category;
    use crystal_types::{CrystalConfig, OscillatorParams, StepSample};

    fn simulated(steps: usize) -> TimeSeries {
        simulate(
            100.0,
            Category::Currency,
            &CrystalConfig::with_steps(steps),
            &OscillatorParams::default(),
        )
        .unwrap()
        .time_series
    }

    fn constant_sample() -> StepSample {
        StepSample {
            void: 0.5,
            filament: 0.3,
            emergence: 0.2,
            resonance: 0.0,
            crystal_phase: 0.0,
            convergence: 0.0,
        }
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_zero() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let a = [1.0, 2.0, 3.0, 5.0];
        let b = [2.0, 1.0, 4.0, 3.0];
        let c = [0.0, 1.0, 0.0, 1.0];
        let m = correlation_matrix(&[&a, &b, &c]);
        for i in 0..3 {
            assert_eq!(m[i * 3 + i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i * 3 + j], m[j * 3 + i]);
            }
        }
    }

    #[test]
    fn test_analyze_simulated_bounds() {
        let ts = simulated(100);
        let m = analyze(&ts).unwrap();
        assert!((-1.0..=1.0).contains(&m.void_filament_coupling));
        assert!((-1.0..=1.0).contains(&m.crystal_resonance_coupling));
        assert!((0.0..=1.0).contains(&m.convergence_stability), "{}", m.convergence_stability);
        assert!((1..=4).contains(&m.effective_dimensionality));
        assert_eq!(m.final_convergence, *ts.convergence.last().unwrap());
        assert_eq!(m.eigenvalues.len(), 4);
    }

    #[test]
    fn test_void_and_filament_anticorrelated() {
        // Filament grows as the void drains.
        let m = analyze(&simulated(100)).unwrap();
        assert!(m.void_filament_coupling < -0.9, "{}", m.void_filament_coupling);
    }

    #[test]
    fn test_energy_constraint_drops_a_dimension() {
        // void + filament + emergence = 1 makes the energy channels
        // linearly dependent, so at most three eigenvalues survive.
        let m = analyze(&simulated(200)).unwrap();
        assert!(m.effective_dimensionality <= 3, "{:?}", m.eigenvalues);
        let trace: f64 = m.eigenvalues.iter().sum();
        assert!((trace - 4.0).abs() < 1e-9, "Σλ = {trace}");
    }

    #[test]
    fn test_insufficient_samples() {
        let ts = simulated(1);
        let err = analyze(&ts).unwrap_err();
        assert_eq!(
            err,
            CrystalError::InsufficientSamples {
                required: 2,
                actual: 1
            }
        );

        let err = analyze(&TimeSeries::default()).unwrap_err();
        assert!(matches!(err, CrystalError::InsufficientSamples { actual: 0, .. }));
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let mut ts = simulated(10);
        ts.resonance.pop();
        let err = analyze(&ts).unwrap_err();
        assert!(matches!(err, CrystalError::Validation(_)), "{err}");
    }

    #[test]
    fn test_constant_trace_has_identity_correlation() {
        let mut ts = TimeSeries::default();
        for _ in 0..5 {
            ts.push(constant_sample());
        }
        let m = analyze(&ts).unwrap();
        assert_eq!(m.void_filament_coupling, 0.0);
        assert_eq!(m.convergence_stability, 1.0);
        // Identity correlation matrix: four unit eigenvalues.
        assert_eq!(m.effective_dimensionality, 4);
    }
}
