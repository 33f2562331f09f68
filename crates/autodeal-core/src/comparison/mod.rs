//! Lease vs. buy comparison built on the lease and loan engines.

pub mod lease_vs_buy;

pub use lease_vs_buy::{
    compare_lease_vs_buy, compute_comparison, recommend, ComparisonInputs, ComparisonOutput,
    HorizonProjection, Recommendation, Verdict, COMPARISON_HORIZON_MONTHS,
};
