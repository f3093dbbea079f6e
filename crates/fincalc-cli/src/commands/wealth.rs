use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::wealth::allocation::{AllocationCalculator, AllocationInput, AllocationRule};
use fincalc_core::wealth::goals::{GoalBatchCalculator, GoalBatchInput, GoalCalculator, GoalInput};
use fincalc_core::wealth::retirement::{RetirementCalculator, RetirementInput};

use super::{evaluate, read_structured};

/// Arguments for retirement planning
#[derive(Args)]
pub struct RetirementArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub current_age: Option<u32>,

    #[arg(long)]
    pub retirement_age: Option<u32>,

    #[arg(long)]
    pub life_expectancy: Option<u32>,

    /// Monthly expenses in today's money
    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,

    /// Annual inflation in percent
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    #[arg(long, default_value = "0")]
    pub current_savings: Decimal,

    #[arg(long, default_value = "0")]
    pub monthly_contribution: Decimal,

    /// Expected annual return before retirement, in percent
    #[arg(long)]
    pub pre_return: Option<Decimal>,

    /// Expected annual return after retirement, in percent
    #[arg(long)]
    pub post_return: Option<Decimal>,

    /// Yearly step-up of the monthly contribution, in percent
    #[arg(long)]
    pub step_up: Option<Decimal>,
}

/// Arguments for a single goal SIP
#[derive(Args)]
pub struct GoalArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Target amount in today's money
    #[arg(long)]
    pub target: Option<Decimal>,

    #[arg(long)]
    pub years: Option<u32>,

    /// Annual inflation in percent
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    /// Expected annual return in percent
    #[arg(long = "return")]
    pub expected_return: Option<Decimal>,
}

/// Arguments for a batch of goals
#[derive(Args)]
pub struct GoalsArgs {
    /// Path to JSON or YAML file with a `goals` list
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for asset allocation
#[derive(Args)]
pub struct AllocationArgs {
    #[arg(long)]
    pub age: u32,

    /// Use equity = 100 − age instead of fixed age bands
    #[arg(long)]
    pub hundred_minus_age: bool,
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: RetirementInput = if let Some(plan) = read_structured(args.input.as_deref())? {
        plan
    } else {
        RetirementInput {
            current_age: args
                .current_age
                .ok_or("--current-age is required (or provide --input)")?,
            retirement_age: args
                .retirement_age
                .ok_or("--retirement-age is required (or provide --input)")?,
            life_expectancy: args
                .life_expectancy
                .ok_or("--life-expectancy is required (or provide --input)")?,
            monthly_expenses: args
                .monthly_expenses
                .ok_or("--monthly-expenses is required (or provide --input)")?,
            inflation_pct: args.inflation,
            current_savings: args.current_savings,
            monthly_contribution: args.monthly_contribution,
            pre_retirement_return_pct: args
                .pre_return
                .ok_or("--pre-return is required (or provide --input)")?,
            post_retirement_return_pct: args
                .post_return
                .ok_or("--post-return is required (or provide --input)")?,
            step_up_pct: args.step_up,
        }
    };

    evaluate::<RetirementCalculator>(&plan)
}

pub fn run_goal(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal: GoalInput = if let Some(goal) = read_structured(args.input.as_deref())? {
        goal
    } else {
        GoalInput {
            name: args.name.unwrap_or_else(|| "Goal".to_string()),
            target_amount: args.target.ok_or("--target is required (or provide --input)")?,
            years_to_goal: args.years.ok_or("--years is required (or provide --input)")?,
            inflation_pct: args.inflation,
            expected_return_pct: args
                .expected_return
                .ok_or("--return is required (or provide --input)")?,
        }
    };

    evaluate::<GoalCalculator>(&goal)
}

pub fn run_goals(args: GoalsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: GoalBatchInput = read_structured(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for a goal batch")?;
    evaluate::<GoalBatchCalculator>(&batch)
}

pub fn run_allocation(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rule = if args.hundred_minus_age {
        AllocationRule::HundredMinusAge
    } else {
        AllocationRule::AgeBands
    };
    evaluate::<AllocationCalculator>(&AllocationInput {
        age: args.age,
        rule,
    })
}
