// ─────────────────────────────────────────────────────────────────────
// QDT Crystal Kernel — Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Time-crystal oscillator, category multipliers, and the prime table
//! used by the resonance sum.

pub mod oscillator;
pub mod params;

pub use oscillator::{linspace, CrystalStability, TimeCrystalOscillator};
pub use params::{prime_table, shared_primes, Category, HORIZON, N_CATEGORIES};
