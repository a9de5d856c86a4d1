// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Category multipliers, the sampling horizon, and the prime table
//! feeding the resonance sum.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Simulated time runs over [0, HORIZON].
pub const HORIZON: f64 = 10.0;

/// Number of defined (non-fallback) categories.
pub const N_CATEGORIES: usize = 6;

/// Valuation category. Unknown labels resolve to `Unclassified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Currency,
    HumanLife,
    NaturalResource,
    Crypto,
    Art,
    RadioactivePotato,
    #[serde(other)]
    Unclassified,
}

impl Category {
    /// The defined categories, in table order.
    pub const ALL: [Category; N_CATEGORIES] = [
        Category::Currency,
        Category::HumanLife,
        Category::NaturalResource,
        Category::Crypto,
        Category::Art,
        Category::RadioactivePotato,
    ];

    /// Resolve a label. Anything outside the table is `Unclassified`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "currency" => Category::Currency,
            "human_life" => Category::HumanLife,
            "natural_resource" => Category::NaturalResource,
            "crypto" => Category::Crypto,
            "art" => Category::Art,
            "radioactive_potato" => Category::RadioactivePotato,
            other => {
                log::warn!("unknown category {other:?}, using multiplier 1.0");
                Category::Unclassified
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Currency => "currency",
            Category::HumanLife => "human_life",
            Category::NaturalResource => "natural_resource",
            Category::Crypto => "crypto",
            Category::Art => "art",
            Category::RadioactivePotato => "radioactive_potato",
            Category::Unclassified => "unclassified",
        }
    }

    /// Value multiplier applied to the final energy mix.
    #[allow(clippy::approx_constant)]
    pub fn multiplier(self) -> f64 {
        match self {
            Category::Currency => 0.867,
            Category::HumanLife => 1.618,
            Category::NaturalResource => 1.414,
            Category::Crypto => 0.618,
            Category::Art => 1.732,
            Category::RadioactivePotato => std::f64::consts::PI,
            Category::Unclassified => 1.0,
        }
    }
}

/// First `n` primes by trial division against the primes found so far.
pub fn prime_table(n: usize) -> Vec<u64> {
    let mut primes = Vec::with_capacity(n);
    extend_primes(&mut primes, n);
    primes
}

fn extend_primes(primes: &mut Vec<u64>, n: usize) {
    let mut candidate = primes.last().map_or(2, |&p| p + 1);
    while primes.len() < n {
        let is_prime = primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0);
        if is_prime {
            primes.push(candidate);
        }
        candidate += 1;
    }
}

static PRIME_CACHE: RwLock<Vec<u64>> = parking_lot::const_rwlock(Vec::new());

/// First `n` primes from a process-wide cache, grown on demand.
pub fn shared_primes(n: usize) -> Vec<u64> {
    {
        let cache = PRIME_CACHE.read();
        if cache.len() >= n {
            return cache[..n].to_vec();
        }
    }
    let mut cache = PRIME_CACHE.write();
    // Another writer may have grown it between the two locks.
    if cache.len() < n {
        extend_primes(&mut cache, n);
    }
    cache[..n].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_primes() {
        assert_eq!(prime_table(10), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_prime_table_empty() {
        assert!(prime_table(0).is_empty());
    }

    #[test]
    fn test_shared_primes_matches_table() {
        assert_eq!(shared_primes(3), vec![2, 3, 5]);
        assert_eq!(shared_primes(25), prime_table(25));
        assert_eq!(shared_primes(4), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(Category::Currency.multiplier(), 0.867);
        assert_eq!(Category::HumanLife.multiplier(), 1.618);
        assert_eq!(Category::NaturalResource.multiplier(), 1.414);
        assert_eq!(Category::Crypto.multiplier(), 0.618);
        assert_eq!(Category::Art.multiplier(), 1.732);
        assert_eq!(
            Category::RadioactivePotato.multiplier(),
            std::f64::consts::PI
        );
        assert_eq!(Category::Unclassified.multiplier(), 1.0);
    }

    #[test]
    fn test_label_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_label(cat.label()), cat);
        }
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let cat = Category::from_label("tulip_bulbs");
        assert_eq!(cat, Category::Unclassified);
        assert_eq!(cat.multiplier(), 1.0);
    }

    #[test]
    fn test_serde_unknown_label() {
        let cat: Category = serde_json::from_str("\"tulip_bulbs\"").unwrap();
        assert_eq!(cat, Category::Unclassified);
        let cat: Category = serde_json::from_str("\"human_life\"").unwrap();
        assert_eq!(cat, Category::HumanLife);
    }
}
