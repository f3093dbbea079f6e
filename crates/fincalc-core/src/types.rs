use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Internal to the engines.
pub type Rate = Decimal;

/// Rates as they arrive from callers: annual percentages (8.5 = 8.5%).
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Convert an annual percentage to a decimal annual rate.
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Nominal monthly rate from an annual percentage: annual / 12 / 100.
pub fn monthly_rate_from_annual_percent(pct: Percent) -> Rate {
    pct / dec!(1200)
}

/// Standard computation output envelope.
///
/// Engines are pure: the same input always yields the same envelope. Wall
/// clock timing is the drivers' concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_conversions() {
        assert_eq!(percent_to_rate(dec!(8.5)), dec!(0.085));
        assert_eq!(monthly_rate_from_annual_percent(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "a": 1 }),
            vec!["w".into()],
            dec!(1.5),
        );
        assert_eq!(out.result, dec!(1.5));
        assert_eq!(out.assumptions["a"], 1);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.warnings.len(), 1);
    }
}
