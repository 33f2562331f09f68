use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use autodeal_core::rates::DEFAULT_MILEAGE;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_lease(input_json: String) -> NapiResult<String> {
    let input: autodeal_core::lease::LeaseInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = autodeal_core::lease::calculate_lease(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: autodeal_core::loan::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = autodeal_core::loan::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_lease_vs_buy(input_json: String) -> NapiResult<String> {
    let input: autodeal_core::comparison::ComparisonInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        autodeal_core::comparison::compare_lease_vs_buy(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_schedule(input_json: String) -> NapiResult<String> {
    let input: autodeal_core::loan::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = autodeal_core::loan::calculate_loan(&input).map_err(to_napi_error)?;
    let rows = autodeal_core::loan::amortization_schedule(&output.result);
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rate table
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct VehicleQuery {
    make: String,
    model: String,
    #[serde(default = "default_mileage")]
    mileage: u32,
}

fn default_mileage() -> u32 {
    DEFAULT_MILEAGE
}

#[napi]
pub fn list_makes() -> NapiResult<String> {
    let makes = autodeal_core::rates::makes().map_err(to_napi_error)?;
    serde_json::to_string(&makes).map_err(to_napi_error)
}

#[napi]
pub fn list_models(make: String) -> NapiResult<String> {
    let models = autodeal_core::rates::models_by_make(&make).map_err(to_napi_error)?;
    serde_json::to_string(&models).map_err(to_napi_error)
}

#[napi]
pub fn get_vehicle_rate(make: String, model: String) -> NapiResult<String> {
    let rate = autodeal_core::rates::vehicle_rate(&make, &model).map_err(to_napi_error)?;
    serde_json::to_string(rate).map_err(to_napi_error)
}

#[napi]
pub fn search_vehicles(query: String) -> NapiResult<String> {
    let hits = autodeal_core::rates::search(&query).map_err(to_napi_error)?;
    serde_json::to_string(&hits).map_err(to_napi_error)
}

/// `{"make", "model", "mileage"?}` → the money factor, residual and MSRP to
/// load into the lease form.
#[napi]
pub fn select_vehicle_rate(query_json: String) -> NapiResult<String> {
    let query: VehicleQuery = serde_json::from_str(&query_json).map_err(to_napi_error)?;
    let selection =
        autodeal_core::rates::select_vehicle(&query.make, &query.model, query.mileage)
            .map_err(to_napi_error)?;
    serde_json::to_string(&selection).map_err(to_napi_error)
}

#[napi]
pub fn submit_rate(input_json: String) -> NapiResult<String> {
    let input: autodeal_core::rates::RateSubmission =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let receipt = autodeal_core::rates::submit_rate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&receipt).map_err(to_napi_error)
}
