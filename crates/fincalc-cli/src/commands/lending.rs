use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::lending::amortization::{EmiCalculator, LoanInput};

use super::{evaluate, read_structured};

/// Arguments for EMI / amortization schedule
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years (fractions allowed, rounded to whole months)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Disbursement date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInput = if let Some(loan) = read_structured(args.input.as_deref())? {
        loan
    } else {
        LoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_years: args.years.ok_or("--years is required (or provide --input)")?,
            start_date: Some(args.start_date.unwrap_or_else(|| Local::now().date_naive())),
        }
    };

    evaluate::<EmiCalculator>(&loan)
}
