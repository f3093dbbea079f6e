use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::Calculator;
use crate::error::{in_range, FinCalcError};
use crate::time_value::{self, compound, monthly_equivalent_rate};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FinCalcResult;

const MAX_LIFE_EXPECTANCY: u32 = 150;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for retirement planning. Rates are annual percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Household expenses per month in today's money
    pub monthly_expenses: Money,
    pub inflation_pct: Percent,
    pub current_savings: Money,
    pub monthly_contribution: Money,
    pub pre_retirement_return_pct: Percent,
    pub post_retirement_return_pct: Percent,
    /// Yearly increase applied to the monthly contribution. `None` or zero
    /// keeps contributions level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_up_pct: Option<Percent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Accumulation,
    Decumulation,
}

/// One year of the monthly-deposit accumulation used for the projected corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationYear {
    /// Age at the end of the year
    pub age: u32,
    pub monthly_contribution: Money,
    pub annual_contribution: Money,
    pub investment_return: Money,
    pub closing_corpus: Money,
}

/// One age of the lifetime corpus trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub age: u32,
    pub phase: Phase,
    pub opening_balance: Money,
    pub contribution: Money,
    /// Inflation-adjusted expense for the year (zero while accumulating)
    pub expense_due: Money,
    /// Amount actually drawn, capped at the opening balance
    pub withdrawal: Money,
    pub investment_return: Money,
    pub closing_balance: Money,
}

/// Top-level output from `plan_retirement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementOutput {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub monthly_expenses_at_retirement: Money,
    pub annual_expenses_at_retirement: Money,
    /// Inflation-adjusted post-retirement return; `None` when it is not
    /// positive and the undiscounted fallback was used
    pub real_return_rate: Option<Rate>,
    pub required_corpus: Money,
    pub projected_corpus: Money,
    /// required - projected (positive means a shortfall)
    pub gap: Money,
    pub shortfall: Money,
    pub surplus: Money,
    /// Extra level monthly contribution that closes the shortfall by retirement
    pub additional_monthly_contribution: Money,
    pub accumulation: Vec<AccumulationYear>,
    pub trajectory: Vec<TrajectoryPoint>,
    /// First age at which the corpus cannot cover that year's expenses
    pub depletion_age: Option<u32>,
    pub corpus_lasts: bool,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Plan retirement: corpus required at retirement, corpus projected from
/// savings and contributions, the gap between them, and an age-by-age
/// trajectory through decumulation.
pub fn plan_retirement(input: &RetirementInput) -> FinCalcResult<ComputationOutput<RetirementOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let years_in_retirement = input.life_expectancy - input.retirement_age;
    let inflation = percent_to_rate(input.inflation_pct);
    let pre_return = percent_to_rate(input.pre_retirement_return_pct);
    let post_return = percent_to_rate(input.post_retirement_return_pct);
    let step_up = percent_to_rate(input.step_up_pct.unwrap_or(Decimal::ZERO));

    // ===================================================================
    // Required corpus
    // ===================================================================
    let monthly_expenses_at_retirement =
        inflate(input.monthly_expenses, inflation, years_to_retirement)?;
    let annual_expenses_at_retirement = in_range(
        monthly_expenses_at_retirement.checked_mul(dec!(12)),
        "monthly_expenses",
    )?;

    let (required_corpus, real_return_rate) = if post_return > inflation {
        let real = (post_return - inflation) / (Decimal::ONE + inflation);
        let corpus = -time_value::pv(
            real,
            years_in_retirement,
            annual_expenses_at_retirement,
            Decimal::ZERO,
        )
        .map_err(|e| e.for_field("monthly_expenses"))?;
        (corpus, Some(real))
    } else {
        log::debug!("retirement: real return not positive, using undiscounted corpus");
        warnings.push(
            "Post-retirement return does not exceed inflation; required corpus is \
             annual expenses × years in retirement"
                .into(),
        );
        let corpus = in_range(
            annual_expenses_at_retirement.checked_mul(Decimal::from(years_in_retirement)),
            "monthly_expenses",
        )?;
        (corpus, None)
    };

    // ===================================================================
    // Projected corpus (monthly deposits, yearly step-up)
    // ===================================================================
    let monthly_rate = monthly_equivalent_rate(pre_return, "pre_retirement_return_pct")?;
    let deposit_factor = time_value::fv(monthly_rate, 12, -Decimal::ONE, Decimal::ZERO)
        .map_err(|e| e.for_field("pre_retirement_return_pct"))?;

    let mut accumulation = Vec::with_capacity(years_to_retirement as usize);
    let mut corpus = input.current_savings;
    let mut contribution = input.monthly_contribution;

    for year in 1..=years_to_retirement {
        let annual_contribution =
            in_range(contribution.checked_mul(dec!(12)), "monthly_contribution")?;
        let deposits_value =
            in_range(contribution.checked_mul(deposit_factor), "monthly_contribution")?;
        let growth = in_range(corpus.checked_mul(pre_return), "pre_retirement_return_pct")?;
        let investment_return = in_range(
            growth.checked_add(deposits_value - annual_contribution),
            "pre_retirement_return_pct",
        )?;
        corpus = in_range(
            corpus
                .checked_add(growth)
                .and_then(|c| c.checked_add(deposits_value)),
            "pre_retirement_return_pct",
        )?;

        accumulation.push(AccumulationYear {
            age: input.current_age + year,
            monthly_contribution: contribution,
            annual_contribution,
            investment_return,
            closing_corpus: corpus,
        });

        contribution = in_range(contribution.checked_mul(Decimal::ONE + step_up), "step_up_pct")?;
    }
    let projected_corpus = corpus;

    // ===================================================================
    // Shortfall / surplus
    // ===================================================================
    let gap = required_corpus - projected_corpus;
    let shortfall = gap.max(Decimal::ZERO);
    let surplus = (-gap).max(Decimal::ZERO);
    let additional_monthly_contribution = if shortfall > Decimal::ZERO {
        -time_value::pmt(
            monthly_rate,
            years_to_retirement * 12,
            Decimal::ZERO,
            shortfall,
        )
        .map_err(|e| e.for_field("monthly_expenses"))?
    } else {
        Decimal::ZERO
    };

    // ===================================================================
    // Lifetime trajectory
    // ===================================================================
    let (trajectory, depletion_age) = project_trajectory(
        input,
        pre_return,
        post_return,
        inflation,
        step_up,
        annual_expenses_at_retirement,
    )?;

    if let Some(age) = depletion_age {
        log::debug!("retirement: corpus depleted at age {age}");
        warnings.push(format!(
            "Corpus is exhausted at age {} (before life expectancy of {})",
            age, input.life_expectancy
        ));
    }

    let output = RetirementOutput {
        years_to_retirement,
        years_in_retirement,
        monthly_expenses_at_retirement,
        annual_expenses_at_retirement,
        real_return_rate,
        required_corpus,
        projected_corpus,
        gap,
        shortfall,
        surplus,
        additional_monthly_contribution,
        accumulation,
        trajectory,
        depletion_age,
        corpus_lasts: depletion_age.is_none(),
    };

    Ok(with_metadata(
        "Retirement corpus planning (real-rate annuity PV requirement, monthly-deposit accumulation with step-up)",
        &serde_json::json!({
            "current_age": input.current_age,
            "retirement_age": input.retirement_age,
            "life_expectancy": input.life_expectancy,
            "inflation_pct": input.inflation_pct.to_string(),
            "pre_retirement_return_pct": input.pre_retirement_return_pct.to_string(),
            "post_retirement_return_pct": input.post_retirement_return_pct.to_string(),
            "step_up_pct": input.step_up_pct.map(|p| p.to_string()),
        }),
        warnings,
        output,
    ))
}

/// `amount` after `years` of inflation.
fn inflate(amount: Money, inflation: Rate, years: u32) -> FinCalcResult<Money> {
    let factor = compound(inflation, years).map_err(|e| e.for_field("inflation_pct"))?;
    in_range(amount.checked_mul(factor), "inflation_pct")
}

/// Age-by-age corpus from current age to life expectancy inclusive.
///
/// Accumulation years add the year's contribution, then grow. Decumulation
/// years draw the inflated expense (capped at what is left), then grow the
/// remainder, so an exhausted corpus stays at zero.
fn project_trajectory(
    input: &RetirementInput,
    pre_return: Rate,
    post_return: Rate,
    inflation: Rate,
    step_up: Rate,
    annual_expenses_at_retirement: Money,
) -> FinCalcResult<(Vec<TrajectoryPoint>, Option<u32>)> {
    let mut points = Vec::with_capacity((input.life_expectancy - input.current_age + 1) as usize);
    let mut balance = input.current_savings;
    let mut yearly_contribution =
        in_range(input.monthly_contribution.checked_mul(dec!(12)), "monthly_contribution")?;
    let mut depletion_age = None;

    for age in input.current_age..=input.life_expectancy {
        let opening = balance;

        if age < input.retirement_age {
            let invested =
                in_range(opening.checked_add(yearly_contribution), "monthly_contribution")?;
            let investment_return =
                in_range(invested.checked_mul(pre_return), "pre_retirement_return_pct")?;
            balance = in_range(
                invested.checked_add(investment_return),
                "pre_retirement_return_pct",
            )?;

            points.push(TrajectoryPoint {
                age,
                phase: Phase::Accumulation,
                opening_balance: opening,
                contribution: yearly_contribution,
                expense_due: Decimal::ZERO,
                withdrawal: Decimal::ZERO,
                investment_return,
                closing_balance: balance,
            });

            yearly_contribution = in_range(
                yearly_contribution.checked_mul(Decimal::ONE + step_up),
                "step_up_pct",
            )?;
        } else {
            let expense_due = inflate(
                annual_expenses_at_retirement,
                inflation,
                age - input.retirement_age,
            )?;
            let withdrawal = expense_due.min(opening);
            if withdrawal < expense_due && depletion_age.is_none() {
                depletion_age = Some(age);
            }
            let remaining = opening - withdrawal;
            let investment_return =
                in_range(remaining.checked_mul(post_return), "post_retirement_return_pct")?;
            balance = in_range(
                remaining.checked_add(investment_return),
                "post_retirement_return_pct",
            )?;

            points.push(TrajectoryPoint {
                age,
                phase: Phase::Decumulation,
                opening_balance: opening,
                contribution: Decimal::ZERO,
                expense_due,
                withdrawal,
                investment_return,
                closing_balance: balance,
            });
        }
    }

    Ok((points, depletion_age))
}

fn validate_input(input: &RetirementInput) -> FinCalcResult<()> {
    if input.retirement_age <= input.current_age {
        return Err(FinCalcError::invalid(
            "retirement_age",
            "retirement_age must be greater than current_age",
        ));
    }
    if input.life_expectancy <= input.retirement_age {
        return Err(FinCalcError::invalid(
            "life_expectancy",
            "life_expectancy must be greater than retirement_age",
        ));
    }
    if input.life_expectancy > MAX_LIFE_EXPECTANCY {
        return Err(FinCalcError::invalid(
            "life_expectancy",
            "life_expectancy must not exceed 150",
        ));
    }

    let non_negative = [
        ("monthly_expenses", input.monthly_expenses),
        ("inflation_pct", input.inflation_pct),
        ("current_savings", input.current_savings),
        ("monthly_contribution", input.monthly_contribution),
        ("pre_retirement_return_pct", input.pre_retirement_return_pct),
        ("post_retirement_return_pct", input.post_retirement_return_pct),
        ("step_up_pct", input.step_up_pct.unwrap_or(Decimal::ZERO)),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(FinCalcError::invalid(field, format!("{field} cannot be negative")));
        }
    }

    Ok(())
}

pub struct RetirementCalculator;

impl Calculator for RetirementCalculator {
    type Input = RetirementInput;
    type Output = RetirementOutput;
    const NAME: &'static str = "retirement";

    fn calculate(input: &RetirementInput) -> FinCalcResult<ComputationOutput<RetirementOutput>> {
        plan_retirement(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
