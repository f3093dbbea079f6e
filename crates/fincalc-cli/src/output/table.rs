use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_value, split_result};

/// Scalar result fields as a Field/Value table, then one table per
/// schedule-like array, then warnings and methodology.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => print_result(result),
        Some(other) => println!("{}", format_value(other)),
        None => print_fields(envelope.iter().map(|(k, v)| (k.as_str(), v))),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_result(result: &Map<String, Value>) {
    let (scalars, records) = split_result(result);
    print_fields(scalars.into_iter());

    for (name, rows) in records {
        println!("\n{}:", name);
        println!("{}", records_table(rows));
    }
}

fn print_fields<'a>(fields: impl Iterator<Item = (&'a str, &'a Value)>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.to_string(), format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn records_table(rows: &[Value]) -> Table {
    let headers: Vec<String> = rows
        .first()
        .and_then(Value::as_object)
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default()),
        );
    }
    Table::from(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_table_has_header_and_rows() {
        let rows = vec![
            json!({"period": 1, "balance": "900"}),
            json!({"period": 2, "balance": "800"}),
        ];
        let rendered = records_table(&rows).to_string();
        assert!(rendered.contains("period"));
        assert!(rendered.contains("balance"));
        assert!(rendered.contains("800"));
    }
}
