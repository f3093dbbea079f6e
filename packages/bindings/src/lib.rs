use napi::Result as NapiResult;
use napi_derive::napi;
use std::time::Instant;

use fincalc_core::lending::amortization::EmiCalculator;
use fincalc_core::real_assets::rental_npv::RentalNpvCalculator;
use fincalc_core::wealth::allocation::AllocationCalculator;
use fincalc_core::wealth::goals::{GoalBatchCalculator, GoalCalculator};
use fincalc_core::wealth::retirement::RetirementCalculator;
use fincalc_core::Calculator;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// JSON in, JSON envelope out. Parse failures and invalid inputs both come
/// back to JavaScript as a thrown Error carrying the message.
///
/// Timing is measured here and added as `metadata.computation_time_us`; the
/// core envelope itself never reads the clock.
fn run<C: Calculator>(input_json: &str) -> NapiResult<String> {
    let input: C::Input = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let start = Instant::now();
    let output = C::calculate(&input).map_err(to_napi_error)?;
    let elapsed = start.elapsed().as_micros() as u64;

    let mut envelope = serde_json::to_value(&output).map_err(to_napi_error)?;
    if let Some(metadata) = envelope.get_mut("metadata").and_then(|m| m.as_object_mut()) {
        metadata.insert("computation_time_us".into(), elapsed.into());
    }
    serde_json::to_string(&envelope).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[napi]
pub fn build_amortization(input_json: String) -> NapiResult<String> {
    run::<EmiCalculator>(&input_json)
}

// ---------------------------------------------------------------------------
// Real assets
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_rental_investment(input_json: String) -> NapiResult<String> {
    run::<RentalNpvCalculator>(&input_json)
}

// ---------------------------------------------------------------------------
// Wealth
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_retirement(input_json: String) -> NapiResult<String> {
    run::<RetirementCalculator>(&input_json)
}

#[napi]
pub fn plan_goal(input_json: String) -> NapiResult<String> {
    run::<GoalCalculator>(&input_json)
}

#[napi]
pub fn plan_goals(input_json: String) -> NapiResult<String> {
    run::<GoalBatchCalculator>(&input_json)
}

#[napi]
pub fn suggest_allocation(input_json: String) -> NapiResult<String> {
    run::<AllocationCalculator>(&input_json)
}
