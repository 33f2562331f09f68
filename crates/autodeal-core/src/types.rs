use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Whole-number percentages as entered on a deal sheet (7.75 = 7.75%).
/// Divided by 100 at the point of use.
pub type Percent = Decimal;

/// Lease money factor (0.00125 ≈ 3% APR)
pub type MoneyFactor = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Whole-dollar currency string with thousands separators, e.g. `$1,234`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Currency string with cents, e.g. `$618.53`.
pub fn format_currency_detailed(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = format_currency(rounded.trunc());
    let cents = (rounded.abs().fract() * Decimal::ONE_HUNDRED).trunc().to_string();
    let sign = if rounded.is_sign_negative() && rounded.trunc().is_zero() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{whole}.{cents:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1234567.4)), "$1,234,567");
        assert_eq!(format_currency(dec!(999.5)), "$1,000");
        assert_eq!(format_currency(dec!(12)), "$12");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-2500)), "-$2,500");
        assert_eq!(format_currency(dec!(-0.2)), "$0");
    }

    #[test]
    fn test_format_currency_detailed() {
        assert_eq!(format_currency_detailed(dec!(618.5293)), "$618.53");
        assert_eq!(format_currency_detailed(dec!(1200.05)), "$1,200.05");
        assert_eq!(format_currency_detailed(dec!(-0.5)), "-$0.50");
    }
}
