//! Closed-end auto lease payment calculation.

pub mod calculator;

pub use calculator::{calculate_lease, compute_lease, LeaseCalculation, LeaseInputs};
