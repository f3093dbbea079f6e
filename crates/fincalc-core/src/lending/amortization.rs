use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::Calculator;
use crate::error::{in_range, FinCalcError};
use crate::time_value;
use crate::types::{
    monthly_rate_from_annual_percent, with_metadata, ComputationOutput, Money, Percent, Rate,
    Years,
};
use crate::FinCalcResult;

const MAX_TENURE_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate, fixed-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed
    pub principal: Money,
    /// Nominal annual interest rate in percent (8.5 = 8.5%)
    pub annual_rate_pct: Percent,
    /// Tenure in years; fractional years are rounded to whole months
    pub tenure_years: Years,
    /// Date the loan is disbursed. Row `k` falls due `k` months later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// One installment of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Outstanding balance after this installment, clamped at zero
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_rate: Rate,
    pub periods: u32,
    /// Equated monthly installment
    pub payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub total_principal: Money,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Build the full month-by-month amortization schedule of an EMI loan.
pub fn build_amortization(input: &LoanInput) -> FinCalcResult<ComputationOutput<AmortizationOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    let periods = validate_input(input)?;
    let monthly_rate = monthly_rate_from_annual_percent(input.annual_rate_pct);

    // PMT returns the lender's view (negative outflow for the borrower).
    let payment = -time_value::pmt(monthly_rate, periods, input.principal, Decimal::ZERO)
        .map_err(|e| e.for_field("principal"))?;

    let mut schedule = Vec::with_capacity(periods as usize);
    let mut balance = input.principal;
    let mut total_principal = Decimal::ZERO;

    for period in 1..=periods {
        let interest = in_range(balance.checked_mul(monthly_rate), "principal")?;
        let principal = payment - interest;
        balance -= principal;
        total_principal += principal;

        let payment_date = match input.start_date {
            Some(d) => Some(d.checked_add_months(Months::new(period)).ok_or_else(|| {
                FinCalcError::invalid("start_date", "Payment date out of calendar range")
            })?),
            None => None,
        };

        schedule.push(AmortizationRow {
            period,
            payment_date,
            payment,
            principal,
            interest,
            balance: balance.max(Decimal::ZERO),
        });
    }

    let residual = balance.abs();
    if residual > dec!(0.000001) {
        warnings.push(format!("Final balance residual of {residual} after rounding"));
    }

    let total_payment = in_range(payment.checked_mul(Decimal::from(periods)), "principal")?;
    let output = AmortizationOutput {
        monthly_rate,
        periods,
        payment,
        total_interest: total_payment - input.principal,
        total_payment,
        total_principal,
        schedule,
    };

    Ok(with_metadata(
        "Fixed-payment annuity amortization (EMI = P·i·(1+i)^N / ((1+i)^N − 1))",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_months": periods,
        }),
        warnings,
        output,
    ))
}

/// Validate loan terms and return the tenure in whole months.
fn validate_input(input: &LoanInput) -> FinCalcResult<u32> {
    if input.principal <= Decimal::ZERO {
        return Err(FinCalcError::invalid("principal", "Principal must be positive"));
    }
    if input.annual_rate_pct <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "annual_rate_pct",
            "Interest rate must be positive",
        ));
    }
    if input.tenure_years <= Decimal::ZERO {
        return Err(FinCalcError::invalid("tenure_years", "Tenure must be positive"));
    }

    // Half a month rounds up: 0.375 years is 5 months, not 4.
    let months = input
        .tenure_years
        .checked_mul(dec!(12))
        .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|m| m.to_u32())
        .filter(|m| *m <= MAX_TENURE_MONTHS)
        .ok_or_else(|| FinCalcError::invalid("tenure_years", "Tenure must not exceed 100 years"))?;
    if months == 0 {
        return Err(FinCalcError::invalid(
            "tenure_years",
            "Tenure must be at least one month",
        ));
    }
    Ok(months)
}

pub struct EmiCalculator;

impl Calculator for EmiCalculator {
    type Input = LoanInput;
    type Output = AmortizationOutput;
    const NAME: &'static str = "emi";

    fn calculate(input: &LoanInput) -> FinCalcResult<ComputationOutput<AmortizationOutput>> {
        build_amortization(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn home_loan() -> LoanInput {
        LoanInput {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(8.5),
            tenure_years: dec!(20),
            start_date: None,
        }
    }

    #[test]
    fn test_home_loan_emi() {
        let out = build_amortization(&home_loan()).unwrap().result;
        assert_eq!(out.periods, 240);
        // Closed form: 1e6 * i * (1+i)^240 / ((1+i)^240 - 1), i = 0.085/12
        assert!((out.payment - dec!(8678.2323)).abs() < dec!(0.001), "emi={}", out.payment);
        assert_eq!(out.schedule.len(), 240);
    }

    #[test]
    fn test_totals_are_consistent() {
        let out = build_amortization(&home_loan()).unwrap().result;
        assert_eq!(out.total_payment, out.payment * dec!(240));
        assert_eq!(out.total_interest, out.total_payment - dec!(1_000_000));
        assert!((out.total_principal - dec!(1_000_000)).abs() < dec!(0.000001));

        let interest_sum: Decimal = out.schedule.iter().map(|r| r.interest).sum();
        assert!((interest_sum - out.total_interest).abs() < dec!(0.0001));
    }

    #[test]
    fn test_first_row_split() {
        let out = build_amortization(&home_loan()).unwrap().result;
        let first = &out.schedule[0];
        // Interest on the full principal for one month
        assert_eq!(first.interest, dec!(1_000_000) * out.monthly_rate);
        assert!((first.interest - dec!(7083.3333)).abs() < dec!(0.0001));
        assert_eq!(first.principal, first.payment - first.interest);
        assert_eq!(first.balance, dec!(1_000_000) - first.principal);
    }

    #[test]
    fn test_final_balance_is_zero() {
        let out = build_amortization(&home_loan()).unwrap().result;
        let last = out.schedule.last().unwrap();
        assert!(last.balance < dec!(0.000001));
        assert!(last.balance >= Decimal::ZERO);
    }

    #[test]
    fn test_interest_declines_over_time() {
        let out = build_amortization(&home_loan()).unwrap().result;
        for pair in out.schedule.windows(2) {
            assert!(pair[1].interest < pair[0].interest);
            assert!(pair[1].principal > pair[0].principal);
        }
    }

    #[test]
    fn test_fractional_tenure_rounds_to_months() {
        let mut input = home_loan();
        input.tenure_years = dec!(0.5);
        assert_eq!(build_amortization(&input).unwrap().result.periods, 6);

        input.tenure_years = dec!(1) / dec!(12);
        let out = build_amortization(&input).unwrap().result;
        assert_eq!(out.periods, 1);
        // One installment repays everything plus a month's interest
        let expected = dec!(1_000_000) * (Decimal::ONE + dec!(8.5) / dec!(1200));
        assert!((out.payment - expected).abs() < dec!(0.0001));
    }

    #[test]
    fn test_payment_dates_follow_start_date() {
        let mut input = home_loan();
        input.tenure_years = dec!(1);
        input.start_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let out = build_amortization(&input).unwrap().result;

        assert_eq!(out.schedule[0].payment_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(out.schedule[1].payment_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(out.schedule[11].payment_date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_no_dates_without_start() {
        let out = build_amortization(&home_loan()).unwrap().result;
        assert!(out.schedule.iter().all(|r| r.payment_date.is_none()));
    }

    #[test]
    fn test_validation_rejects_non_positive_terms() {
        let mut input = home_loan();
        input.principal = Decimal::ZERO;
        assert_eq!(build_amortization(&input).unwrap_err().field(), "principal");

        let mut input = home_loan();
        input.annual_rate_pct = dec!(-1);
        assert_eq!(build_amortization(&input).unwrap_err().field(), "annual_rate_pct");

        let mut input = home_loan();
        input.annual_rate_pct = Decimal::ZERO;
        assert!(build_amortization(&input).is_err());

        let mut input = home_loan();
        input.tenure_years = Decimal::ZERO;
        assert_eq!(build_amortization(&input).unwrap_err().field(), "tenure_years");
    }

    #[test]
    fn test_validation_rejects_sub_month_and_huge_tenure() {
        let mut input = home_loan();
        input.tenure_years = dec!(0.01);
        assert!(build_amortization(&input).is_err());

        input.tenure_years = dec!(101);
        assert!(build_amortization(&input).is_err());

        input.tenure_years = Decimal::MAX;
        assert_eq!(build_amortization(&input).unwrap_err().field(), "tenure_years");
    }

    #[test]
    fn test_half_months_round_up() {
        let mut input = home_loan();
        input.tenure_years = dec!(0.125);
        assert_eq!(build_amortization(&input).unwrap().result.periods, 2);

        input.tenure_years = dec!(0.375);
        assert_eq!(build_amortization(&input).unwrap().result.periods, 5);

        // 0.4992 months is still under half
        input.tenure_years = dec!(0.0416);
        assert_eq!(build_amortization(&input).unwrap_err().field(), "tenure_years");
    }

    #[test]
    fn test_extreme_terms_do_not_panic() {
        // 100% a year over 100 years: the growth factor is far out of range
        // but the payment is not.
        let input = LoanInput {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(100),
            tenure_years: dec!(100),
            start_date: None,
        };
        let out = build_amortization(&input).unwrap().result;
        assert_eq!(out.periods, 1200);
        // Effectively interest-only
        assert!((out.payment - dec!(1_000_000) / dec!(12)).abs() < dec!(0.01), "emi={}", out.payment);

        let huge = LoanInput {
            principal: Decimal::MAX,
            ..input
        };
        assert_eq!(build_amortization(&huge).unwrap_err().field(), "principal");
    }
}
