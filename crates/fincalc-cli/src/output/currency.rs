use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const CRORE: Decimal = dec!(10_000_000);
const LAKH: Decimal = dec!(100_000);

/// Indian-style rupee rendering: crores and lakhs to two decimals, smaller
/// amounts as whole rupees with thousands separators.
pub fn format_currency(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = value.abs();

    if abs >= CRORE {
        format!("{sign}₹ {} Cr", two_places(abs / CRORE))
    } else if abs >= LAKH {
        format!("{sign}₹ {} L", two_places(abs / LAKH))
    } else {
        let rupees = abs
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or_default();
        if rupees == 0 {
            return "₹ 0".to_string();
        }
        format!("{sign}₹ {}", group_thousands(rupees))
    }
}

fn two_places(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crores() {
        assert_eq!(format_currency(dec!(50_949_908.62)), "₹ 5.09 Cr");
        assert_eq!(format_currency(dec!(10_000_000)), "₹ 1.00 Cr");
    }

    #[test]
    fn test_lakhs() {
        assert_eq!(format_currency(dec!(669_112.79)), "₹ 6.69 L");
        assert_eq!(format_currency(dec!(100_000)), "₹ 1.00 L");
        assert_eq!(format_currency(dec!(9_999_999)), "₹ 100.00 L");
    }

    #[test]
    fn test_small_amounts_grouped() {
        assert_eq!(format_currency(dec!(8678.2323)), "₹ 8,678");
        assert_eq!(format_currency(dec!(99_999.4)), "₹ 99,999");
        assert_eq!(format_currency(dec!(999)), "₹ 999");
        assert_eq!(format_currency(dec!(0.4)), "₹ 0");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(dec!(-3_920_000)), "-₹ 39.20 L");
        assert_eq!(format_currency(dec!(-12_345)), "-₹ 12,345");
    }
}
