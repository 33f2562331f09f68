//! Reference lease rates and user rate submissions.

pub mod submission;
pub mod table;

pub use submission::{submit_rate, RateSubmission, SubmissionReceipt, SubmissionSource};
pub use table::{
    makes, models_by_make, search, select_vehicle, vehicle_rate, vehicle_rates, RateSelection,
    TermRate, VehicleRate, DEFAULT_MILEAGE,
};
