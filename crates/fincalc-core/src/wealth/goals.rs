use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::Calculator;
use crate::error::{in_range, FinCalcError};
use crate::time_value::{self, compound};
use crate::types::{
    monthly_rate_from_annual_percent, percent_to_rate, with_metadata, ComputationOutput, Money,
    Percent, Rate,
};
use crate::FinCalcResult;

const MAX_YEARS_TO_GOAL: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named savings goal priced in today's money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInput {
    pub name: String,
    pub target_amount: Money,
    pub years_to_goal: u32,
    pub inflation_pct: Percent,
    pub expected_return_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalResult {
    pub name: String,
    pub target_amount: Money,
    pub years_to_goal: u32,
    /// Target restated in money of the goal year
    pub inflated_target: Money,
    pub monthly_rate: Rate,
    pub periods: u32,
    pub required_monthly_sip: Money,
    pub total_invested: Money,
    pub expected_gains: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBatchInput {
    pub goals: Vec<GoalInput>,
}

/// A goal left out of a batch, with the reason it failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedGoal {
    /// Position in the submitted list
    pub index: usize,
    pub name: String,
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBatchOutput {
    pub accepted: Vec<GoalResult>,
    pub rejected: Vec<RejectedGoal>,
    /// Sum of the required SIPs of accepted goals
    pub total_monthly_sip: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly SIP needed to reach one inflation-adjusted goal.
pub fn plan_goal(input: &GoalInput) -> FinCalcResult<ComputationOutput<GoalResult>> {
    let mut warnings = Vec::new();

    let result = solve_goal(input)?;
    if result.monthly_rate.is_zero() {
        warnings.push("Zero expected return; SIP is the inflated target split evenly".into());
    }

    Ok(with_metadata(
        "Goal SIP (inflated target, inverted future value of a monthly annuity)",
        input,
        warnings,
        result,
    ))
}

/// Plan several goals at once. Each goal is validated on its own; invalid
/// goals are reported in `rejected` and do not prevent the rest from being
/// planned. Only an empty list is an error.
pub fn plan_goals(input: &GoalBatchInput) -> FinCalcResult<ComputationOutput<GoalBatchOutput>> {
    let mut warnings = Vec::new();

    if input.goals.is_empty() {
        return Err(FinCalcError::invalid("goals", "At least one goal is required"));
    }

    let mut accepted = Vec::with_capacity(input.goals.len());
    let mut rejected = Vec::new();

    for (index, goal) in input.goals.iter().enumerate() {
        match solve_goal(goal) {
            Ok(result) => accepted.push(result),
            Err(e) => rejected.push(RejectedGoal {
                index,
                name: goal.name.clone(),
                field: e.field().to_string(),
                reason: e.reason().to_string(),
            }),
        }
    }

    log::debug!(
        "goal batch: {} accepted, {} rejected",
        accepted.len(),
        rejected.len()
    );
    if accepted.is_empty() {
        warnings.push("No goal in the batch passed validation".into());
    }

    let total_monthly_sip = accepted
        .iter()
        .try_fold(Decimal::ZERO, |sum, g| sum.checked_add(g.required_monthly_sip));
    let total_monthly_sip = in_range(total_monthly_sip, "target_amount")?;
    let output = GoalBatchOutput {
        accepted,
        rejected,
        total_monthly_sip,
    };

    Ok(with_metadata(
        "Goal SIP batch (skip-and-report)",
        &serde_json::json!({ "goals": input.goals.len() }),
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn solve_goal(goal: &GoalInput) -> FinCalcResult<GoalResult> {
    validate_goal(goal)?;

    let inflation_factor = compound(percent_to_rate(goal.inflation_pct), goal.years_to_goal)
        .map_err(|e| e.for_field("inflation_pct"))?;
    let inflated_target = in_range(
        goal.target_amount.checked_mul(inflation_factor),
        "inflation_pct",
    )?;
    let monthly_rate = monthly_rate_from_annual_percent(goal.expected_return_pct);
    let periods = goal.years_to_goal * 12;

    // Zero rate degenerates to target / periods inside pmt.
    let sip = -time_value::pmt(monthly_rate, periods, Decimal::ZERO, inflated_target)
        .map_err(|e| e.for_field("expected_return_pct"))?;
    let total_invested = in_range(sip.checked_mul(Decimal::from(periods)), "target_amount")?;

    Ok(GoalResult {
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        years_to_goal: goal.years_to_goal,
        inflated_target,
        monthly_rate,
        periods,
        required_monthly_sip: sip,
        total_invested,
        expected_gains: inflated_target - total_invested,
    })
}

fn validate_goal(goal: &GoalInput) -> FinCalcResult<()> {
    if goal.name.trim().is_empty() {
        return Err(FinCalcError::invalid("name", "Goal name cannot be blank"));
    }
    if goal.target_amount <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "target_amount",
            "Target amount must be positive",
        ));
    }
    if goal.years_to_goal < 1 {
        return Err(FinCalcError::invalid(
            "years_to_goal",
            "Goal must be at least 1 year away",
        ));
    }
    if goal.years_to_goal > MAX_YEARS_TO_GOAL {
        return Err(FinCalcError::invalid(
            "years_to_goal",
            "Goal must be at most 100 years away",
        ));
    }
    if goal.inflation_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "inflation_pct",
            "Inflation cannot be negative",
        ));
    }
    if goal.expected_return_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "expected_return_pct",
            "Expected return cannot be negative",
        ));
    }
    Ok(())
}

pub struct GoalCalculator;

impl Calculator for GoalCalculator {
    type Input = GoalInput;
    type Output = GoalResult;
    const NAME: &'static str = "goal";

    fn calculate(input: &GoalInput) -> FinCalcResult<ComputationOutput<GoalResult>> {
        plan_goal(input)
    }
}

pub struct GoalBatchCalculator;

impl Calculator for GoalBatchCalculator {
    type Input = GoalBatchInput;
    type Output = GoalBatchOutput;
    const NAME: &'static str = "goals";

    fn calculate(input: &GoalBatchInput) -> FinCalcResult<ComputationOutput<GoalBatchOutput>> {
        plan_goals(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn car() -> GoalInput {
        GoalInput {
            name: "Buy a Car".into(),
            target_amount: dec!(500_000),
            years_to_goal: 5,
            inflation_pct: dec!(6),
            expected_return_pct: dec!(12),
        }
    }

    #[test]
    fn test_inflated_target() {
        let out = plan_goal(&car()).unwrap().result;
        // 500,000 × 1.06^5
        assert_eq!(out.inflated_target, dec!(500_000) * compound(dec!(0.06), 5).unwrap());
        assert!((out.inflated_target - dec!(669_112.7888)).abs() < dec!(0.0001));
        assert_eq!(out.periods, 60);
        assert_eq!(out.monthly_rate, dec!(0.01));
    }

    #[test]
    fn test_sip_reaches_inflated_target() {
        let out = plan_goal(&car()).unwrap().result;
        assert!((out.required_monthly_sip - dec!(8192.9165)).abs() < dec!(0.001));

        let fv = time_value::fv(dec!(0.01), 60, -out.required_monthly_sip, Decimal::ZERO).unwrap();
        assert!((fv - out.inflated_target).abs() < dec!(0.000001));
    }

    #[test]
    fn test_gains_and_invested() {
        let out = plan_goal(&car()).unwrap().result;
        assert_eq!(out.total_invested, out.required_monthly_sip * dec!(60));
        assert_eq!(out.expected_gains, out.inflated_target - out.total_invested);
        assert!(out.expected_gains > Decimal::ZERO);
    }

    #[test]
    fn test_zero_return_splits_evenly() {
        let mut goal = car();
        goal.expected_return_pct = Decimal::ZERO;
        let result = plan_goal(&goal).unwrap();
        let out = &result.result;
        assert_eq!(out.required_monthly_sip, out.inflated_target / dec!(60));
        assert!(out.expected_gains.abs() < dec!(0.000001));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_single_year_goal() {
        let mut goal = car();
        goal.years_to_goal = 1;
        goal.inflation_pct = Decimal::ZERO;
        let out = plan_goal(&goal).unwrap().result;
        assert_eq!(out.periods, 12);
        assert_eq!(out.inflated_target, dec!(500_000));
    }

    #[test]
    fn test_goal_validation() {
        let mut goal = car();
        goal.name = "   ".into();
        assert_eq!(plan_goal(&goal).unwrap_err().field(), "name");

        let mut goal = car();
        goal.target_amount = Decimal::ZERO;
        assert_eq!(plan_goal(&goal).unwrap_err().field(), "target_amount");

        let mut goal = car();
        goal.years_to_goal = 0;
        assert_eq!(plan_goal(&goal).unwrap_err().field(), "years_to_goal");

        let mut goal = car();
        goal.inflation_pct = dec!(-1);
        assert_eq!(plan_goal(&goal).unwrap_err().field(), "inflation_pct");
    }

    #[test]
    fn test_batch_skips_and_reports_invalid_goals() {
        let mut bad = car();
        bad.name = "Holiday".into();
        bad.years_to_goal = 0;
        let mut house = car();
        house.name = "House".into();
        house.target_amount = dec!(5_000_000);
        house.years_to_goal = 10;

        let batch = GoalBatchInput {
            goals: vec![car(), bad, house],
        };
        let out = plan_goals(&batch).unwrap().result;

        assert_eq!(out.accepted.len(), 2);
        assert_eq!(out.accepted[0].name, "Buy a Car");
        assert_eq!(out.accepted[1].name, "House");
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].index, 1);
        assert_eq!(out.rejected[0].name, "Holiday");
        assert_eq!(out.rejected[0].field, "years_to_goal");
        assert_eq!(
            out.total_monthly_sip,
            out.accepted[0].required_monthly_sip + out.accepted[1].required_monthly_sip
        );
    }

    #[test]
    fn test_batch_matches_single_goal() {
        let single = plan_goal(&car()).unwrap().result;
        let batch = plan_goals(&GoalBatchInput { goals: vec![car()] })
            .unwrap()
            .result;
        assert_eq!(batch.accepted[0], single);
    }

    #[test]
    fn test_batch_all_rejected_still_reports() {
        let mut bad = car();
        bad.target_amount = dec!(-5);
        let result = plan_goals(&GoalBatchInput { goals: vec![bad] }).unwrap();
        assert!(result.result.accepted.is_empty());
        assert_eq!(result.result.rejected.len(), 1);
        assert_eq!(result.result.total_monthly_sip, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        let err = plan_goals(&GoalBatchInput { goals: vec![] }).unwrap_err();
        assert_eq!(err.field(), "goals");
    }

    #[test]
    fn test_runaway_inflation_is_rejected() {
        let mut goal = car();
        goal.inflation_pct = dec!(200);
        goal.years_to_goal = 100;
        let err = plan_goal(&goal).unwrap_err();
        assert_eq!(err.field(), "inflation_pct");
        assert!(err.reason().contains("representable range"));
    }

    #[test]
    fn test_batch_rejects_out_of_range_goal() {
        let mut runaway = car();
        runaway.name = "Moon base".into();
        runaway.inflation_pct = dec!(200);
        runaway.years_to_goal = 100;

        let result = plan_goals(&GoalBatchInput {
            goals: vec![car(), runaway],
        })
        .unwrap();
        let out = &result.result;

        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].index, 1);
        assert_eq!(out.rejected[0].field, "inflation_pct");
        assert_eq!(out.total_monthly_sip, out.accepted[0].required_monthly_sip);
    }

    #[test]
    fn test_high_return_long_horizon() {
        // (1 + 10%)^1200 is out of range; the SIP still resolves
        let mut goal = car();
        goal.expected_return_pct = dec!(120);
        goal.years_to_goal = 100;
        goal.inflation_pct = Decimal::ZERO;
        let out = plan_goal(&goal).unwrap().result;
        // Discounting 1200 months at 10% leaves nothing to save
        assert!(out.required_monthly_sip >= Decimal::ZERO);
        assert!(out.required_monthly_sip < dec!(0.000001));
    }
}
