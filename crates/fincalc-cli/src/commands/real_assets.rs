use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::real_assets::rental_npv::{RentalInvestmentInput, RentalNpvCalculator};

use super::{evaluate, read_structured};

/// Arguments for rental property NPV
#[derive(Args)]
pub struct RentalNpvArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price (initial outlay)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Monthly rent in year 1
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual rent growth in percent
    #[arg(long, default_value = "0")]
    pub rent_growth: Decimal,

    /// Annual maintenance and running costs in year 1
    #[arg(long, default_value = "0")]
    pub expenses: Decimal,

    /// Annual expense growth in percent
    #[arg(long, default_value = "0")]
    pub expense_growth: Decimal,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Discount rate in percent
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// Sell at the horizon, appreciating at this annual percent
    #[arg(long, allow_hyphen_values = true)]
    pub appreciation: Option<Decimal>,
}

pub fn run_rental_npv(args: RentalNpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rental: RentalInvestmentInput =
        if let Some(rental) = read_structured(args.input.as_deref())? {
            rental
        } else {
            RentalInvestmentInput {
                purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
                monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
                rent_growth_pct: args.rent_growth,
                annual_expenses: args.expenses,
                expense_growth_pct: args.expense_growth,
                horizon_years: args.years.ok_or("--years is required (or provide --input)")?,
                discount_rate_pct: args
                    .discount
                    .ok_or("--discount is required (or provide --input)")?,
                sale_appreciation_pct: args.appreciation,
            }
        };

    evaluate::<RentalNpvCalculator>(&rental)
}
