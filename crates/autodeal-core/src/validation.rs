//! Input checks shared by the validating entry points.
//!
//! The pure engines assume these have already passed; the deal-sheet fields
//! are all amounts, counts or percentages that can never be negative.

use rust_decimal::Decimal;

use crate::error::AutoDealError;
use crate::AutoDealResult;

/// Longest term any calculator accepts: 100 years.
pub const MAX_TERM_MONTHS: u32 = 1200;

pub(crate) fn require_term(field: &str, months: u32) -> AutoDealResult<()> {
    if months == 0 {
        return Err(AutoDealError::InvalidInput {
            field: field.into(),
            reason: "Term must be at least one month".into(),
        });
    }
    if months > MAX_TERM_MONTHS {
        return Err(AutoDealError::InvalidInput {
            field: field.into(),
            reason: format!("Term of {months} months exceeds the {MAX_TERM_MONTHS}-month limit"),
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative(fields: &[(&str, Decimal)]) -> AutoDealResult<()> {
    for (field, value) in fields {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AutoDealError::InvalidInput {
                field: (*field).into(),
                reason: format!("Must not be negative, got {value}"),
            });
        }
    }
    Ok(())
}
