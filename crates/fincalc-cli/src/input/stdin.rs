use serde_json::Value;
use std::io::{self, Read};

/// Read a piped input document from stdin. Returns `None` when stdin is a
/// terminal or the pipe is empty, so the caller falls back to its flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

/// JSON first; YAML is accepted as a fallback for hand-written pipes.
fn parse_document(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            log::debug!("stdin is not JSON ({json_err}), trying YAML");
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|_| format!("Failed to parse stdin as JSON: {json_err}"))?;
            Ok(Some(value))
        }
    }
}
