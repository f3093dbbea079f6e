use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::{in_range, FinCalcError};
use crate::types::{Money, Rate};
use crate::FinCalcResult;

// Cash-flow sign convention follows spreadsheet PV/FV/PMT: money paid out is
// negative, money received is positive.
//
// Errors name the parameter of these functions ("rate", "pmt", ...). Engines
// relabel them with `FinCalcError::for_field` to point at their own inputs.

fn checked_pow(base: Decimal, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

fn require_above_minus_one(rate: Rate) -> FinCalcResult<()> {
    if rate <= dec!(-1) {
        return Err(FinCalcError::invalid(
            "rate",
            "Rate must be greater than -100%",
        ));
    }
    Ok(())
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> FinCalcResult<Decimal> {
    let base = in_range(Decimal::ONE.checked_add(rate), "rate")?;
    in_range(checked_pow(base, n), "rate")
}

/// 1 / (1 + r)^n. Shrinks toward zero for positive rates instead of
/// overflowing the way the growth factor does.
pub fn discount_factor(rate: Rate, n: u32) -> FinCalcResult<Decimal> {
    require_above_minus_one(rate)?;
    in_range(checked_pow(Decimal::ONE / (Decimal::ONE + rate), n), "rate")
}

/// Present value of one amount received `n` periods out.
///
/// Divides by the growth factor while it is representable, so ordinary
/// inputs get exact quotients; past that the discount factor takes over.
pub fn discount(amount: Money, rate: Rate, n: u32) -> FinCalcResult<Money> {
    require_above_minus_one(rate)?;
    match compound(rate, n) {
        Ok(factor) => in_range(amount.checked_div(factor), "rate"),
        Err(_) => in_range(amount.checked_mul(discount_factor(rate, n)?), "amount"),
    }
}

/// Monthly rate that compounds to `annual` over twelve months: (1 + a)^(1/12) - 1.
/// Errors are reported against `field`.
pub fn monthly_equivalent_rate(annual: Rate, field: &str) -> FinCalcResult<Rate> {
    if annual <= dec!(-1) {
        return Err(FinCalcError::invalid(
            field,
            "Annual rate must be greater than -100%",
        ));
    }
    if annual.is_zero() {
        return Ok(Decimal::ZERO);
    }
    (Decimal::ONE + annual)
        .checked_powd(Decimal::ONE / dec!(12))
        .map(|monthly_factor| monthly_factor - Decimal::ONE)
        .ok_or_else(|| FinCalcError::out_of_range(field))
}

/// Present Value
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> FinCalcResult<Money> {
    if rate.is_zero() {
        let paid = in_range(pmt.checked_mul(Decimal::from(nper)), "pmt")?;
        return Ok(-in_range(paid.checked_add(fv), "fv")?);
    }

    let v = discount_factor(rate, nper)?;
    let annuity_factor = (Decimal::ONE - v) / rate;

    let annuity_value = in_range(pmt.checked_mul(annuity_factor), "pmt")?;
    let lump_value = in_range(fv.checked_mul(v), "fv")?;
    Ok(-in_range(annuity_value.checked_add(lump_value), "pmt")?)
}

/// Future Value
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> FinCalcResult<Money> {
    if rate.is_zero() {
        let paid = in_range(pmt.checked_mul(Decimal::from(nper)), "pmt")?;
        return Ok(-in_range(present_value.checked_add(paid), "pv")?);
    }

    let factor = compound(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    let grown = in_range(present_value.checked_mul(factor), "pv")?;
    let annuity_value = in_range(pmt.checked_mul(annuity_factor), "pmt")?;
    Ok(-in_range(grown.checked_add(annuity_value), "pmt")?)
}

/// Payment (PMT)
///
/// Evaluated as -(pv + fv·v^n)·r / (1 − v^n) with v = 1/(1 + r), which is
/// the textbook form divided through by (1 + r)^n and never needs the
/// growth factor itself.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> FinCalcResult<Money> {
    if nper == 0 {
        return Err(FinCalcError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        let total = in_range(present_value.checked_add(future_value), "pv")?;
        return Ok(-total / Decimal::from(nper));
    }

    let v = discount_factor(rate, nper)?;
    let denominator = Decimal::ONE - v;

    if denominator.is_zero() {
        return Err(FinCalcError::invalid(
            "rate",
            "Rate produces a zero annuity factor",
        ));
    }

    let discounted_fv = in_range(future_value.checked_mul(v), "fv")?;
    let balance = in_range(present_value.checked_add(discounted_fv), "pv")?;
    let per_period = in_range(balance.checked_mul(rate), "pv")?;
    Ok(-in_range(per_period.checked_div(denominator), "rate")?)
}
