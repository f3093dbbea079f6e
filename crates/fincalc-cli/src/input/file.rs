use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Input file encodings recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yaml` / `.yml` read as YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                InputFormat::Yaml
            }
            _ => InputFormat::Json,
        }
    }
}

/// Read a JSON or YAML input file and deserialise into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let format = InputFormat::from_path(&canonical);
    log::debug!("reading {:?} input from {}", format, canonical.display());

    let value: T = match format {
        InputFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?,
        InputFormat::Yaml => serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?,
    };
    Ok(value)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("plan.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("plan.YML")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("loan.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("loan")), InputFormat::Json);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_input::<serde_json::Value>("definitely/not/here.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
