// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Symmetric Eigensolver
// ─────────────────────────────────────────────────────────────────────
//! Cyclic Jacobi eigenvalues for small symmetric matrices.
//! For the 4×4 channel correlation matrix this converges in a handful
//! of sweeps.

const MAX_SWEEPS: usize = 50;
const TOL: f64 = 1e-14;

/// Eigenvalues of a symmetric n×n row-major matrix, sorted descending.
///
/// Only the upper triangle is read; `a` is not modified.
pub fn symmetric_eigenvalues(a: &[f64], n: usize) -> Vec<f64> {
    debug_assert_eq!(a.len(), n * n);
    let mut m = a.to_vec();
    // Mirror the upper triangle so slight asymmetry in the input is ignored.
    for p in 0..n {
        for q in (p + 1)..n {
            m[q * n + p] = m[p * n + q];
        }
    }

    jacobi_diagonalise(&mut m, n);

    let mut eigvals: Vec<f64> = (0..n).map(|i| m[i * n + i]).collect();
    eigvals.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    eigvals
}

/// In-place cyclic Jacobi rotations until the off-diagonal vanishes.
/// The diagonal of `a` holds the (unsorted) eigenvalues afterwards.
fn jacobi_diagonalise(a: &mut [f64], n: usize) {
    for sweep in 0..MAX_SWEEPS {
        let mut max_off: f64 = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                max_off = max_off.max(a[p * n + q].abs());
            }
        }
        if max_off < TOL {
            break;
        }

        // Skip tiny elements during the first sweeps.
        let threshold = if sweep < 4 {
            0.2 * max_off / (n * n) as f64
        } else {
            0.0
        };

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq.abs() < threshold || apq == 0.0 {
                    continue;
                }

                let diff = a[q * n + q] - a[p * n + p];
                let t = if diff.abs() < 1e-300 {
                    apq.signum()
                } else {
                    let theta = diff / (2.0 * apq);
                    let root = 1.0 / (theta.abs() + (1.0 + theta * theta).sqrt());
                    if theta >= 0.0 {
                        root
                    } else {
                        -root
                    }
                };

                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                let tau = s / (1.0 + c);

                a[p * n + p] -= t * apq;
                a[q * n + q] += t * apq;
                a[p * n + q] = 0.0;
                a[q * n + p] = 0.0;

                for r in 0..n {
                    if r == p || r == q {
                        continue;
                    }
                    let arp = a[r * n + p];
                    let arq = a[r * n + q];
                    a[r * n + p] = arp - s * (arq + tau * arp);
                    a[p * n + r] = a[r * n + p];
                    a[r * n + q] = arq + s * (arp - tau * arq);
                    a[q * n + r] = a[r * n + q];
                }
            }
        }
    }
}
