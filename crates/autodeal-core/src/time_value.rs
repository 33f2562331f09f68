use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::AutoDealError;
use crate::types::{Money, MoneyFactor, Percent, Rate};
use crate::AutoDealResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Industry rule of thumb: money factor × 2400 ≈ APR in percent.
const MONEY_FACTOR_APR_MULTIPLIER: Decimal = dec!(2400);

/// Convert an annual percentage rate (6.5 = 6.5%) to a monthly decimal rate.
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Approximate APR (in percent) implied by a lease money factor.
pub fn money_factor_to_apr(money_factor: MoneyFactor) -> Percent {
    money_factor * MONEY_FACTOR_APR_MULTIPLIER
}

/// Money factor implied by an APR quoted in percent.
pub fn apr_to_money_factor(apr_percent: Percent) -> MoneyFactor {
    apr_percent / MONEY_FACTOR_APR_MULTIPLIER
}

/// Level monthly payment that amortizes `principal` over `nper` months.
///
/// Closed-form annuity: P · r / (1 − (1+r)^−n), or P / n when r = 0.
/// A negative principal yields a negative payment. Rates and terms whose
/// growth factor leaves the 96-bit decimal range are an `Overflow` error.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> AutoDealResult<Money> {
    if nper == 0 {
        return Err(AutoDealError::DivisionByZero {
            context: "level payment over zero periods".into(),
        });
    }
    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let overflow = || AutoDealError::Overflow {
        context: format!("level payment at {rate} per period over {nper} periods"),
    };
    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(overflow)?;
    let discount = Decimal::ONE - Decimal::ONE / factor;
    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(discount))
        .ok_or_else(overflow)
}

/// Split one month's payment into (interest, principal) at the given rate.
pub fn split_payment(balance: Money, payment: Money, rate: Rate) -> (Money, Money) {
    let interest = balance * rate;
    (interest, payment - interest)
}

/// Outstanding balance after `months` level payments.
///
/// Walks the schedule month by month rather than using the closed form so the
/// result matches an amortization table row for row.
pub fn remaining_balance_after(principal: Money, payment: Money, rate: Rate, months: u32) -> Money {
    let mut balance = principal;
    for _ in 0..months {
        let (_, principal_paid) = split_payment(balance, payment, rate);
        balance -= principal_paid;
    }
    balance
}
