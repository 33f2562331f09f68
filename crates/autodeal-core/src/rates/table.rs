//! Reference money factors and residuals by make and model.
//!
//! The table ships inside the binary as JSON and is parsed on first use.
//! Records are community-reported or manufacturer program rates; they are
//! starting points for a negotiation, not quotes.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::comparison::lease_vs_buy::ComparisonInputs;
use crate::error::AutoDealError;
use crate::lease::calculator::LeaseInputs;
use crate::time_value::money_factor_to_apr;
use crate::types::{Money, MoneyFactor, Percent};
use crate::AutoDealResult;

const RATES_JSON: &str = include_str!("../../data/vehicle_rates.json");

/// Annual mileage the selector starts on.
pub const DEFAULT_MILEAGE: u32 = 10_000;

/// Term preferred when several are published for a mileage band.
const PREFERRED_TERM_MONTHS: u32 = 36;

static RATE_TABLE: OnceCell<Vec<VehicleRate>> = OnceCell::new();

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Who reported a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Manufacturer,
    Community,
    Dealer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsrpRange {
    pub min: Money,
    pub max: Money,
}

/// Lease program terms for one term length and mileage band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRate {
    pub months: u32,
    pub money_factor: MoneyFactor,
    pub residual_percent: Percent,
    /// Annual mileage allowance
    pub mileage: u32,
}

/// Published lease programs for one model year and trim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRate {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    pub msrp_range: MsrpRange,
    pub terms: Vec<TermRate>,
    pub region: String,
    pub last_updated: NaiveDate,
    pub source: RateSource,
    pub verified: bool,
}

impl VehicleRate {
    /// Distinct mileage bands, ascending.
    pub fn available_mileages(&self) -> Vec<u32> {
        let mut mileages: Vec<u32> = self.terms.iter().map(|t| t.mileage).collect();
        mileages.sort_unstable();
        mileages.dedup();
        mileages
    }

    /// Pick the program for a mileage band: the 36-month program at that
    /// mileage, else any program at that mileage, else the first listed.
    pub fn select_term(&self, mileage: u32) -> Option<&TermRate> {
        self.terms
            .iter()
            .find(|t| t.months == PREFERRED_TERM_MONTHS && t.mileage == mileage)
            .or_else(|| self.terms.iter().find(|t| t.mileage == mileage))
            .or_else(|| self.terms.first())
    }

    /// The overrides this record contributes to a deal at `mileage`.
    pub fn selection(&self, mileage: u32) -> Option<RateSelection> {
        self.select_term(mileage).map(|term| RateSelection {
            vehicle_id: self.id.clone(),
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            term_months: term.months,
            mileage: term.mileage,
            money_factor: term.money_factor,
            residual_percent: term.residual_percent,
            effective_apr: money_factor_to_apr(term.money_factor),
            msrp: self.msrp_range.min,
            verified: self.verified,
        })
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Money factor, residual and MSRP chosen from the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSelection {
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub term_months: u32,
    pub mileage: u32,
    pub money_factor: MoneyFactor,
    pub residual_percent: Percent,
    pub effective_apr: Percent,
    /// Base MSRP (low end of the published range)
    pub msrp: Money,
    pub verified: bool,
}

impl RateSelection {
    /// Overwrite money factor, residual and MSRP; the selling price restarts
    /// at MSRP.
    pub fn apply_to_lease(&self, inputs: &LeaseInputs) -> LeaseInputs {
        LeaseInputs {
            money_factor: self.money_factor,
            residual_percent: self.residual_percent,
            msrp: self.msrp,
            selling_price: self.msrp,
            ..inputs.clone()
        }
    }

    pub fn apply_to_comparison(&self, inputs: &ComparisonInputs) -> ComparisonInputs {
        ComparisonInputs {
            lease_money_factor: self.money_factor,
            lease_residual_percent: self.residual_percent,
            msrp: self.msrp,
            selling_price: self.msrp,
            ..inputs.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Every record in the reference table.
pub fn vehicle_rates() -> AutoDealResult<&'static [VehicleRate]> {
    RATE_TABLE
        .get_or_try_init(|| {
            serde_json::from_str(RATES_JSON).map_err(|e| AutoDealError::RateTable(e.to_string()))
        })
        .map(Vec::as_slice)
}

/// Distinct makes, sorted.
pub fn makes() -> AutoDealResult<Vec<String>> {
    let mut makes: Vec<String> = vehicle_rates()?.iter().map(|v| v.make.clone()).collect();
    makes.sort();
    makes.dedup();
    Ok(makes)
}

/// Distinct models for a make, sorted. Empty when the make is unknown.
pub fn models_by_make(make: &str) -> AutoDealResult<Vec<String>> {
    let mut models: Vec<String> = vehicle_rates()?
        .iter()
        .filter(|v| v.make == make)
        .map(|v| v.model.clone())
        .collect();
    models.sort();
    models.dedup();
    Ok(models)
}

/// The record for an exact make and model.
pub fn vehicle_rate(make: &str, model: &str) -> AutoDealResult<&'static VehicleRate> {
    vehicle_rates()?
        .iter()
        .find(|v| v.make == make && v.model == model)
        .ok_or_else(|| AutoDealError::NotFound(format!("No rate data for {make} {model}")))
}

/// Case-insensitive match against make, model, or "make model".
pub fn search(query: &str) -> AutoDealResult<Vec<&'static VehicleRate>> {
    let needle = query.to_lowercase();
    Ok(vehicle_rates()?
        .iter()
        .filter(|v| {
            let make = v.make.to_lowercase();
            let model = v.model.to_lowercase();
            make.contains(&needle)
                || model.contains(&needle)
                || format!("{make} {model}").contains(&needle)
        })
        .collect())
}

/// Look up a vehicle and pick its program for a mileage band.
pub fn select_vehicle(make: &str, model: &str, mileage: u32) -> AutoDealResult<RateSelection> {
    let rate = vehicle_rate(make, model)?;
    rate.selection(mileage).ok_or_else(|| {
        AutoDealError::NotFound(format!("{make} {model} has no published lease programs"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_parses() {
        let rates = vehicle_rates().unwrap();
        assert_eq!(rates.len(), 43);
        assert!(rates.iter().all(|r| !r.terms.is_empty()));
    }

    #[test]
    fn test_makes_sorted_and_unique() {
        let makes = makes().unwrap();
        assert_eq!(makes.first().map(String::as_str), Some("Acura"));
        let mut sorted = makes.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), makes.len());
        assert!(makes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_models_by_make() {
        assert_eq!(
            models_by_make("BMW").unwrap(),
            vec!["3 Series".to_string(), "X3".to_string(), "X5".to_string()]
        );
        assert!(models_by_make("Yugo").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_vehicle_not_found() {
        assert!(matches!(
            vehicle_rate("BMW", "Isetta"),
            Err(AutoDealError::NotFound(_))
        ));
    }

    #[test]
    fn test_select_term_prefers_36_months() {
        let bmw = vehicle_rate("BMW", "3 Series").unwrap();
        let term = bmw.select_term(10_000).unwrap();
        assert_eq!(term.months, 36);
        assert_eq!(term.residual_percent, dec!(57));
    }

    #[test]
    fn test_select_term_falls_back_to_first() {
        let bmw = vehicle_rate("BMW", "X5").unwrap();
        let term = bmw.select_term(15_000).unwrap();
        assert_eq!(term.mileage, 10_000);
    }

    #[test]
    fn test_available_mileages() {
        let bmw = vehicle_rate("BMW", "3 Series").unwrap();
        assert_eq!(bmw.available_mileages(), vec![10_000, 12_000, 15_000]);
    }

    #[test]
    fn test_selection_applies_to_lease() {
        let selection = select_vehicle("Toyota", "RAV4", 12_000).unwrap();
        let lease = selection.apply_to_lease(&LeaseInputs::default());
        assert_eq!(lease.money_factor, dec!(0.00095));
        assert_eq!(lease.residual_percent, dec!(60));
        assert_eq!(lease.msrp, dec!(32525));
        assert_eq!(lease.selling_price, dec!(32525));
        assert_eq!(lease.down_payment, dec!(2000));
    }
}
