pub mod lending;
pub mod real_assets;
pub mod wealth;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;

use fincalc_core::Calculator;

use crate::input;

/// Run a calculator and hand back its envelope as JSON, with the wall
/// clock time of the run added to `metadata.computation_time_us`.
pub fn evaluate<C: Calculator>(input: &C::Input) -> Result<Value, Box<dyn std::error::Error>> {
    log::info!("running {} calculator", C::NAME);
    let start = Instant::now();
    let result = C::calculate(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    log::debug!("{} finished in {}us", C::NAME, elapsed);
    if !result.warnings.is_empty() {
        log::info!("{}: {} warning(s)", C::NAME, result.warnings.len());
    }

    let mut value = serde_json::to_value(result)?;
    stamp_elapsed(&mut value, elapsed);
    Ok(value)
}

fn stamp_elapsed(envelope: &mut Value, elapsed_us: u64) {
    if let Some(metadata) = envelope.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.insert("computation_time_us".into(), elapsed_us.into());
    }
}

/// Input precedence shared by every command: `--input` file, then piped
/// stdin. `None` means the caller should fall back to its flags.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_input(path)?));
    }
    match input::stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_core::wealth::allocation::{AllocationCalculator, AllocationInput, AllocationRule};

    #[test]
    fn test_evaluate_adds_timing_to_metadata() {
        let value = evaluate::<AllocationCalculator>(&AllocationInput {
            age: 30,
            rule: AllocationRule::AgeBands,
        })
        .unwrap();
        let metadata = &value["metadata"];
        assert!(metadata["computation_time_us"].is_u64());
        assert_eq!(metadata["precision"], "rust_decimal_128bit");
    }
}
