pub mod csv_out;
pub mod currency;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, inr: bool) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value, inr),
    }
}

/// Split a result object into its scalar fields and its array-of-records
/// fields (schedules, trajectories, goal lists).
pub fn split_result(
    result: &serde_json::Map<String, Value>,
) -> (Vec<(&str, &Value)>, Vec<(&str, &[Value])>) {
    let mut scalars = Vec::new();
    let mut records = Vec::new();
    for (key, val) in result {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                records.push((key.as_str(), items.as_slice()))
            }
            _ => scalars.push((key.as_str(), val)),
        }
    }
    (scalars, records)
}

/// Plain-text rendering of a JSON leaf.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
