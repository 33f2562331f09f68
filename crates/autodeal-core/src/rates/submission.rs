//! User-reported lease rates.
//!
//! Submissions are validated and logged for review. Nothing is written to
//! the reference table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AutoDealError;
use crate::types::{Money, MoneyFactor, Percent};
use crate::AutoDealResult;

/// Where the submitted numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSource {
    DealerQuote,
    SignedContract,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSubmission {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub trim: String,
    pub msrp: Money,
    pub money_factor: MoneyFactor,
    pub residual_percent: Percent,
    #[serde(default = "default_term")]
    pub term: u32,
    #[serde(default = "default_mileage")]
    pub mileage: u32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub dealer_name: String,
    pub source: SubmissionSource,
    #[serde(default)]
    pub notes: String,
}

fn default_term() -> u32 {
    36
}

fn default_mileage() -> u32 {
    super::table::DEFAULT_MILEAGE
}

/// Receipt for an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub accepted: bool,
    pub received_at: DateTime<Utc>,
    pub message: String,
}

impl RateSubmission {
    /// Make and model are required; MSRP, money factor and residual must be
    /// positive.
    pub fn validate(&self) -> AutoDealResult<()> {
        if self.make.trim().is_empty() {
            return Err(AutoDealError::InvalidInput {
                field: "make".into(),
                reason: "Make is required".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(AutoDealError::InvalidInput {
                field: "model".into(),
                reason: "Model is required".into(),
            });
        }
        for (field, value) in [
            ("msrp", self.msrp),
            ("money_factor", self.money_factor),
            ("residual_percent", self.residual_percent),
        ] {
            if value <= Decimal::ZERO {
                return Err(AutoDealError::InvalidInput {
                    field: field.into(),
                    reason: "Must be positive".into(),
                });
            }
        }
        Ok(())
    }
}

/// Validate a submission and log it for review.
pub fn submit_rate(submission: &RateSubmission) -> AutoDealResult<SubmissionReceipt> {
    submission.validate()?;

    tracing::info!(
        make = %submission.make,
        model = %submission.model,
        year = submission.year,
        trim = %submission.trim,
        msrp = %submission.msrp,
        money_factor = %submission.money_factor,
        residual_percent = %submission.residual_percent,
        term = submission.term,
        mileage = submission.mileage,
        region = %submission.region,
        dealer = %submission.dealer_name,
        source = ?submission.source,
        "rate submission received"
    );

    Ok(SubmissionReceipt {
        accepted: true,
        received_at: Utc::now(),
        message: "Your rate submission has been received. We'll review and add it to the database."
            .to_string(),
    })
}
