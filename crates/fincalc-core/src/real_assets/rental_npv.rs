use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::Calculator;
use crate::error::{in_range, FinCalcError};
use crate::time_value::{compound, discount};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

const MAX_HORIZON_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Buy-to-let assumptions: an upfront purchase funded from equity, yearly rent
/// and running costs that each grow at their own rate, and an optional sale at
/// the end of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalInvestmentInput {
    /// Initial outlay (purchase price)
    pub purchase_price: Money,
    /// Rent received per month in year 1
    pub monthly_rent: Money,
    /// Annual rent growth in percent
    pub rent_growth_pct: Percent,
    /// Maintenance and other running costs in year 1
    pub annual_expenses: Money,
    /// Annual expense growth in percent, independent of rent growth
    pub expense_growth_pct: Percent,
    /// Holding period in years
    pub horizon_years: u32,
    /// Discount rate in percent
    pub discount_rate_pct: Percent,
    /// Property appreciation in percent per year. `None` means the property
    /// is held, not sold, at the end of the horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_appreciation_pct: Option<Percent>,
}

/// One year of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCashFlow {
    pub year: u32,
    pub gross_income: Money,
    pub expenses: Money,
    /// Rent less expenses, plus sale proceeds in the final year
    pub net_cash_flow: Money,
    /// Sale proceeds folded into this row (zero except in the sale year)
    pub sale_proceeds: Money,
    pub present_value: Money,
    /// -purchase_price + sum of present values up to and including this year
    pub cumulative_npv: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalNpvOutput {
    pub npv: Money,
    /// NPV strictly positive
    pub viable: bool,
    /// Nominal sale value at the horizon (zero when not selling)
    pub sale_value: Money,
    pub sale_present_value: Money,
    /// Present value of rent less expenses, excluding the sale
    pub pv_operating_cash_flows: Money,
    pub yearly: Vec<YearlyCashFlow>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Discount a rental property's yearly net cash flows (and optional terminal
/// sale) back to today and report NPV with a per-year breakdown.
pub fn analyze_rental_investment(
    input: &RentalInvestmentInput,
) -> FinCalcResult<ComputationOutput<RentalNpvOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let rent_growth = percent_to_rate(input.rent_growth_pct);
    let expense_growth = percent_to_rate(input.expense_growth_pct);
    let discount_rate = percent_to_rate(input.discount_rate_pct);
    let annual_rent = in_range(input.monthly_rent.checked_mul(dec!(12)), "monthly_rent")?;

    if discount_rate.is_zero() {
        log::debug!("rental npv: zero discount rate, present values equal nominal values");
    }

    // Terminal sale, folded into the final year's row.
    let (sale_value, sale_present_value) = match input.sale_appreciation_pct {
        Some(pct) => {
            let horizon = input.horizon_years;
            let growth = compound(percent_to_rate(pct), horizon)
                .map_err(|e| e.for_field("sale_appreciation_pct"))?;
            let sale_value = in_range(
                input.purchase_price.checked_mul(growth),
                "sale_appreciation_pct",
            )?;
            let sale_pv = discount(sale_value, discount_rate, horizon)
                .map_err(|e| e.for_field("discount_rate_pct"))?;
            (sale_value, sale_pv)
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let mut yearly = Vec::with_capacity(input.horizon_years as usize);
    let mut cumulative = -input.purchase_price;
    let mut pv_operating = Decimal::ZERO;

    for year in 1..=input.horizon_years {
        let gross_income = grown(annual_rent, rent_growth, year - 1, "rent_growth_pct")?;
        let expenses = grown(
            input.annual_expenses,
            expense_growth,
            year - 1,
            "expense_growth_pct",
        )?;
        let operating = gross_income - expenses;
        let operating_pv = discount(operating, discount_rate, year)
            .map_err(|e| e.for_field("discount_rate_pct"))?;
        pv_operating = in_range(pv_operating.checked_add(operating_pv), "monthly_rent")?;

        let (sale_proceeds, present_value) = if year == input.horizon_years {
            let present_value = in_range(
                operating_pv.checked_add(sale_present_value),
                "sale_appreciation_pct",
            )?;
            (sale_value, present_value)
        } else {
            (Decimal::ZERO, operating_pv)
        };
        cumulative = in_range(cumulative.checked_add(present_value), "monthly_rent")?;
        let net_cash_flow = in_range(
            operating.checked_add(sale_proceeds),
            "sale_appreciation_pct",
        )?;

        yearly.push(YearlyCashFlow {
            year,
            gross_income,
            expenses,
            net_cash_flow,
            sale_proceeds,
            present_value,
            cumulative_npv: cumulative,
        });
    }

    let npv = cumulative;
    let output = RentalNpvOutput {
        npv,
        viable: npv > Decimal::ZERO,
        sale_value,
        sale_present_value,
        pv_operating_cash_flows: pv_operating,
        yearly,
    };

    Ok(with_metadata(
        "Rental property NPV (grown rent less grown expenses, discounted yearly, optional terminal sale)",
        &serde_json::json!({
            "purchase_price": input.purchase_price.to_string(),
            "horizon_years": input.horizon_years,
            "rent_growth_pct": input.rent_growth_pct.to_string(),
            "expense_growth_pct": input.expense_growth_pct.to_string(),
            "discount_rate_pct": input.discount_rate_pct.to_string(),
            "sale_appreciation_pct": input.sale_appreciation_pct.map(|p| p.to_string()),
        }),
        warnings,
        output,
    ))
}

/// `base` grown at `rate` for `years`. Overflow is reported against `field`.
fn grown(base: Money, rate: Decimal, years: u32, field: &str) -> FinCalcResult<Money> {
    let factor = compound(rate, years).map_err(|e| e.for_field(field))?;
    in_range(base.checked_mul(factor), field)
}

fn validate_input(input: &RentalInvestmentInput, warnings: &mut Vec<String>) -> FinCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    if input.horizon_years < 1 {
        return Err(FinCalcError::invalid(
            "horizon_years",
            "Investment horizon must be at least 1 year",
        ));
    }
    if input.horizon_years > MAX_HORIZON_YEARS {
        return Err(FinCalcError::invalid(
            "horizon_years",
            "Investment horizon must not exceed 100 years",
        ));
    }
    if input.discount_rate_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "discount_rate_pct",
            "Discount rate cannot be negative",
        ));
    }
    if input.monthly_rent < Decimal::ZERO {
        return Err(FinCalcError::invalid("monthly_rent", "Rent cannot be negative"));
    }
    if input.annual_expenses < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "annual_expenses",
            "Expenses cannot be negative",
        ));
    }
    if input.rent_growth_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "rent_growth_pct",
            "Rent growth cannot be negative",
        ));
    }
    if input.expense_growth_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "expense_growth_pct",
            "Expense growth cannot be negative",
        ));
    }
    if let Some(pct) = input.sale_appreciation_pct {
        if pct <= dec!(-100) {
            return Err(FinCalcError::invalid(
                "sale_appreciation_pct",
                "Appreciation must be greater than -100%",
            ));
        }
    }

    if input.monthly_rent.checked_mul(dec!(12)).is_some_and(|rent| input.annual_expenses > rent) {
        warnings.push("Year-1 expenses exceed year-1 rent; operating cash flow is negative".into());
    }

    Ok(())
}

pub struct RentalNpvCalculator;

impl Calculator for RentalNpvCalculator {
    type Input = RentalInvestmentInput;
    type Output = RentalNpvOutput;
    const NAME: &'static str = "rental-npv";

    fn calculate(input: &RentalInvestmentInput) -> FinCalcResult<ComputationOutput<RentalNpvOutput>> {
        analyze_rental_investment(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
