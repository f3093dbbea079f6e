use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::currency::format_currency;
use super::format_value;

/// Headline figure of each calculator, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "payment",
    "npv",
    "gap",
    "required_monthly_sip",
    "total_monthly_sip",
    "equity_pct",
];

/// Monetary headline keys; `equity_pct` is a weight and never gets a ₹.
const MONEY_KEYS: [&str; 5] = [
    "payment",
    "npv",
    "gap",
    "required_monthly_sip",
    "total_monthly_sip",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value, inr: bool) {
    println!("{}", render_minimal(value, inr));
}

fn render_minimal(value: &Value, inr: bool) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        return format_value(result);
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return match (inr && MONEY_KEYS.contains(&key), as_decimal(val)) {
                (true, Some(amount)) => format_currency(amount),
                _ => format_value(val),
            };
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_value(val)),
        None => String::new(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_picks_headline_figure() {
        let envelope = json!({"result": {"monthly_rate": "0.007", "payment": "8678.2323"}});
        assert_eq!(render_minimal(&envelope, false), "8678.2323");
        assert_eq!(render_minimal(&envelope, true), "₹ 8,678");
    }

    #[test]
    fn test_weights_are_not_currency() {
        let envelope = json!({"result": {"equity_pct": "70", "debt_pct": "25"}});
        assert_eq!(render_minimal(&envelope, true), "70");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let envelope = json!({"result": {"accepted": 2}});
        assert_eq!(render_minimal(&envelope, false), "accepted: 2");
    }
}
