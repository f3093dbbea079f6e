use serde_json::{Map, Value};
use std::io;

use super::{format_value, split_result};

/// Write the result as CSV to stdout: the first array-of-records field
/// (the schedule) as rows when there is one, else field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let written = write_result(&mut wtr, result).and_then(|()| wtr.flush().map_err(csv::Error::from));
    if let Err(e) = written {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_result<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    match result {
        Value::Object(map) => {
            let (scalars, records) = split_result(map);
            match records.first() {
                Some((_, rows)) => write_records(wtr, rows),
                None => write_pairs(wtr, scalars),
            }
        }
        Value::Array(rows) => write_records(wtr, rows),
        other => wtr.write_record([format_value(other)]),
    }
}

fn write_pairs<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    fields: Vec<(&str, &Value)>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.to_string(), format_value(val)])?;
    }
    Ok(())
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(first) = rows.first().and_then(Value::as_object) else {
        return Ok(());
    };
    let headers: Vec<&String> = first.keys().collect();
    wtr.write_record(headers.iter().map(|h| h.as_str()))?;

    for row in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(headers.iter().map(|h| cell(row, h)))?;
    }
    Ok(())
}

fn cell(row: &Map<String, Value>, key: &str) -> String {
    row.get(key).map(format_value).unwrap_or_default()
}
