//! Monthly payment, drive-off and total cost for a closed-end vehicle lease.
//!
//! The payment is built the way a dealer's lease worksheet builds it: the
//! adjusted capitalized cost is depreciated down to the contractual residual
//! over the term, a rent charge is levied on (cap cost + residual) via the
//! money factor, and sales tax is applied to each monthly payment rather
//! than to the vehicle price.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::money_factor_to_apr;
use crate::types::{format_currency, with_metadata, ComputationOutput, Money, MoneyFactor, Percent};
use crate::validation::{require_non_negative, require_term};
use crate::AutoDealResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TYPICAL_MIN_TERM_MONTHS: u32 = 12;
const TYPICAL_MAX_TERM_MONTHS: u32 = 60;
const TYPICAL_MIN_RESIDUAL: Decimal = dec!(30);
const TYPICAL_MAX_RESIDUAL: Decimal = dec!(80);
const HIGH_MONEY_FACTOR: Decimal = dec!(0.004);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A lease negotiation as entered on the deal sheet.
///
/// Missing fields deserialize to the values of [`LeaseInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseInputs {
    /// Manufacturer's suggested retail price (residual is based on this)
    pub msrp: Money,
    /// Negotiated selling price before incentives
    pub selling_price: Money,
    /// Cash down
    pub down_payment: Money,
    /// Appraised value of the trade-in
    pub trade_in_value: Money,
    /// Amount still owed on the trade-in
    pub trade_in_payoff: Money,
    /// Manufacturer rebates applied as cap cost reduction
    pub rebates: Money,
    /// Residual value as a percent of MSRP (55 = 55%)
    pub residual_percent: Percent,
    /// Money factor (0.00125 ≈ 3% APR)
    pub money_factor: MoneyFactor,
    /// Lease term in months
    pub term: u32,
    /// Bank acquisition fee, capitalized
    pub acquisition_fee: Money,
    /// Dealer documentation fee, capitalized
    pub doc_fee: Money,
    /// Sales tax on the monthly payment, in percent
    pub tax_rate: Percent,
}

impl Default for LeaseInputs {
    /// The starting worksheet: a $45k vehicle on a 36-month lease.
    fn default() -> Self {
        Self {
            msrp: dec!(45000),
            selling_price: dec!(43000),
            down_payment: dec!(2000),
            trade_in_value: Decimal::ZERO,
            trade_in_payoff: Decimal::ZERO,
            rebates: Decimal::ZERO,
            residual_percent: dec!(55),
            money_factor: dec!(0.00125),
            term: 36,
            acquisition_fee: dec!(895),
            doc_fee: dec!(499),
            tax_rate: dec!(7.75),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The lease inputs together with every derived figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseCalculation {
    #[serde(flatten)]
    pub inputs: LeaseInputs,
    /// Contractual value at lease end
    pub residual_value: Money,
    /// Selling price plus capitalized fees
    pub gross_cap_cost: Money,
    /// Cash down, positive trade equity and rebates
    pub cap_cost_reduction: Money,
    /// Amount capitalized, including any rolled-in negative equity
    pub adjusted_cap_cost: Money,
    /// Monthly depreciation charge
    pub depreciation: Money,
    /// Monthly rent (finance) charge
    pub rent_charge: Money,
    /// Depreciation plus rent charge, before tax
    pub base_payment: Money,
    pub monthly_tax: Money,
    pub monthly_payment: Money,
    /// Cash due at signing
    pub drive_off: Money,
    /// All payments over the term plus cash down
    pub total_cost: Money,
    /// APR equivalent of the money factor, in percent
    pub effective_apr: Percent,
}

impl LeaseCalculation {
    /// Trade-in value less payoff. Negative when the trade is underwater.
    pub fn net_trade_in(&self) -> Money {
        self.inputs.trade_in_value - self.inputs.trade_in_payoff
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a lease worksheet.
///
/// Pure and total for any `term > 0`. Negative depreciation (residual above
/// the adjusted cap cost) is a legitimate outcome and is returned as is.
///
/// # Panics
///
/// Divides by `inputs.term`; callers must not pass a zero term. Use
/// [`calculate_lease`] when the inputs have not been validated.
pub fn compute_lease(inputs: &LeaseInputs) -> LeaseCalculation {
    let term = Decimal::from(inputs.term);

    let residual_value = inputs.msrp * inputs.residual_percent / Decimal::ONE_HUNDRED;
    let net_trade_in = inputs.trade_in_value - inputs.trade_in_payoff;

    let gross_cap_cost = inputs.selling_price + inputs.acquisition_fee + inputs.doc_fee;
    // Underwater trades reduce nothing here; the shortfall is capitalized below
    let cap_cost_reduction =
        inputs.down_payment + net_trade_in.max(Decimal::ZERO) + inputs.rebates;

    let mut adjusted_cap_cost = gross_cap_cost - cap_cost_reduction;
    if net_trade_in < Decimal::ZERO {
        adjusted_cap_cost += net_trade_in.abs();
    }

    let depreciation = (adjusted_cap_cost - residual_value) / term;
    let rent_charge = (adjusted_cap_cost + residual_value) * inputs.money_factor;
    let base_payment = depreciation + rent_charge;
    let monthly_tax = base_payment * inputs.tax_rate / Decimal::ONE_HUNDRED;
    let monthly_payment = base_payment + monthly_tax;

    // First month is due at signing alongside fees and cash down
    let drive_off =
        inputs.down_payment + monthly_payment + inputs.acquisition_fee + inputs.doc_fee;
    let total_cost = monthly_payment * term + inputs.down_payment;

    LeaseCalculation {
        inputs: inputs.clone(),
        residual_value,
        gross_cap_cost,
        cap_cost_reduction,
        adjusted_cap_cost,
        depreciation,
        rent_charge,
        base_payment,
        monthly_tax,
        monthly_payment,
        drive_off,
        total_cost,
        effective_apr: money_factor_to_apr(inputs.money_factor),
    }
}

/// Validate the deal sheet, compute the lease and attach advisory warnings.
pub fn calculate_lease(inputs: &LeaseInputs) -> AutoDealResult<ComputationOutput<LeaseCalculation>> {
    let start = Instant::now();

    validate_input(inputs)?;
    let calculation = compute_lease(inputs);
    let warnings = lease_warnings(&calculation);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Closed-end lease: (cap cost - residual)/term + (cap cost + residual) x money factor, taxed monthly",
        inputs,
        warnings,
        elapsed,
        calculation,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(inputs: &LeaseInputs) -> AutoDealResult<()> {
    require_term("term", inputs.term)?;
    require_non_negative(&[
        ("msrp", inputs.msrp),
        ("selling_price", inputs.selling_price),
        ("down_payment", inputs.down_payment),
        ("trade_in_value", inputs.trade_in_value),
        ("trade_in_payoff", inputs.trade_in_payoff),
        ("rebates", inputs.rebates),
        ("residual_percent", inputs.residual_percent),
        ("money_factor", inputs.money_factor),
        ("acquisition_fee", inputs.acquisition_fee),
        ("doc_fee", inputs.doc_fee),
        ("tax_rate", inputs.tax_rate),
    ])
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn lease_warnings(calc: &LeaseCalculation) -> Vec<String> {
    let inputs = &calc.inputs;
    let mut warnings = Vec::new();

    if inputs.selling_price < inputs.msrp && !inputs.msrp.is_zero() {
        let discount = inputs.msrp - inputs.selling_price;
        let pct = (Decimal::ONE - inputs.selling_price / inputs.msrp) * Decimal::ONE_HUNDRED;
        warnings.push(format!(
            "Selling price is {} below MSRP ({}% discount)",
            format_currency(discount),
            pct.round_dp(1)
        ));
    }

    let net_trade_in = calc.net_trade_in();
    if net_trade_in < Decimal::ZERO {
        warnings.push(format!(
            "Negative equity of {} will be rolled into the lease",
            format_currency(net_trade_in.abs())
        ));
    }

    if calc.depreciation < Decimal::ZERO {
        warnings.push(
            "Residual value exceeds adjusted cap cost; depreciation is negative".to_string(),
        );
    }

    if inputs.term < TYPICAL_MIN_TERM_MONTHS || inputs.term > TYPICAL_MAX_TERM_MONTHS {
        warnings.push(format!(
            "Lease term of {} months is outside the usual {}-{} month range",
            inputs.term, TYPICAL_MIN_TERM_MONTHS, TYPICAL_MAX_TERM_MONTHS
        ));
    }

    if inputs.residual_percent < TYPICAL_MIN_RESIDUAL
        || inputs.residual_percent > TYPICAL_MAX_RESIDUAL
    {
        warnings.push(format!(
            "Residual of {}% is outside the usual {}-{}% range; verify with the lender",
            inputs.residual_percent, TYPICAL_MIN_RESIDUAL, TYPICAL_MAX_RESIDUAL
        ));
    }

    if inputs.money_factor > HIGH_MONEY_FACTOR {
        warnings.push(format!(
            "Money factor {} (≈{}% APR) is high; check for dealer markup",
            inputs.money_factor,
            calc.effective_apr.round_dp(2)
        ));
    }

    warnings
}
