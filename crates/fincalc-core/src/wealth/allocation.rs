use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::Calculator;
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::FinCalcResult;

const MAX_AGE: u32 = 120;
const MIN_EQUITY_PCT: Decimal = dec!(10);

/// How the equity share is derived from age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationRule {
    /// Fixed bands by decade of age
    #[default]
    AgeBands,
    /// Equity = 100 − age, floored at 10%
    HundredMinusAge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    pub age: u32,
    #[serde(default)]
    pub rule: AllocationRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutput {
    pub rule: AllocationRule,
    pub equity_pct: Percent,
    pub debt_pct: Percent,
    pub alternatives_pct: Percent,
}

/// Suggest an equity/debt/alternatives split for an investor's age.
/// The three weights always sum to 100.
pub fn suggest_allocation(
    input: &AllocationInput,
) -> FinCalcResult<ComputationOutput<AllocationOutput>> {
    if input.age > MAX_AGE {
        return Err(FinCalcError::invalid("age", "Age must not exceed 120"));
    }

    let (equity_pct, debt_pct, alternatives_pct) = match input.rule {
        AllocationRule::AgeBands => age_band(input.age),
        AllocationRule::HundredMinusAge => {
            let equity = (dec!(100) - Decimal::from(input.age)).max(MIN_EQUITY_PCT);
            (equity, dec!(100) - equity, Decimal::ZERO)
        }
    };

    let output = AllocationOutput {
        rule: input.rule,
        equity_pct,
        debt_pct,
        alternatives_pct,
    };

    Ok(with_metadata(
        "Age-based strategic asset allocation",
        input,
        Vec::new(),
        output,
    ))
}

fn age_band(age: u32) -> (Decimal, Decimal, Decimal) {
    match age {
        0..=29 => (dec!(80), dec!(15), dec!(5)),
        30..=39 => (dec!(70), dec!(25), dec!(5)),
        40..=49 => (dec!(60), dec!(30), dec!(10)),
        50..=59 => (dec!(50), dec!(40), dec!(10)),
        _ => (dec!(30), dec!(60), dec!(10)),
    }
}

pub struct AllocationCalculator;

impl Calculator for AllocationCalculator {
    type Input = AllocationInput;
    type Output = AllocationOutput;
    const NAME: &'static str = "allocation";

    fn calculate(input: &AllocationInput) -> FinCalcResult<ComputationOutput<AllocationOutput>> {
        suggest_allocation(input)
    }
}
