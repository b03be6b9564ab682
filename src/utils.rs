use chrono::Month;
use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Reads an amount from a loosely typed JSON value.
///
/// Numbers and numeric strings are accepted; `null`, booleans, arrays, objects
/// and unparseable strings yield `None`. Numbers too large for a `Decimal` are
/// clamped to `Decimal::MAX` (or `Decimal::MIN`).
pub fn lenient_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if let Ok(amount) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Some(amount);
    }

    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    let clamped = if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    warn!("Amount {} is out of range, clamped to {}", text, clamped);
    Some(clamped)
}

/// Uppercases the first character of a category name ("food" -> "Food").
pub fn capitalize_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// English month name for a 0-based month index (0 = January).
pub fn month_name(month0: u32) -> String {
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

/// Renders an amount with its currency symbol and without trailing zeros.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    format!("{}{}", symbol, amount.normalize())
}

/// Sums amounts, returning `None` if the total does not fit in a `Decimal`.
pub fn checked_sum<'a, I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_lenient_amount() {
        assert_eq!(lenient_amount(&json!(150)), Some(dec!(150)));
        assert_eq!(lenient_amount(&json!(99.95)), Some(dec!(99.95)));
        assert_eq!(lenient_amount(&json!(" 42 ")), Some(dec!(42)));
        assert_eq!(lenient_amount(&json!(1e3)), Some(dec!(1000)));
        assert_eq!(lenient_amount(&json!(null)), None);
        assert_eq!(lenient_amount(&json!("lots")), None);
        assert_eq!(lenient_amount(&json!([1, 2])), None);
    }

    #[test]
    fn test_out_of_range_numbers_are_clamped() {
        assert_eq!(lenient_amount(&json!(1e30)), Some(Decimal::MAX));
        assert_eq!(lenient_amount(&json!("2.5e31")), Some(Decimal::MAX));
        assert_eq!(lenient_amount(&json!(-1e30)), Some(Decimal::MIN));
        assert_eq!(lenient_amount(&json!("inf")), None);
    }

    #[test]
    fn test_checked_sum() {
        let amounts = [dec!(1.5), dec!(2), dec!(0)];
        assert_eq!(checked_sum(&amounts), Some(dec!(3.5)));
        assert_eq!(checked_sum(&[]), Some(Decimal::ZERO));
        assert_eq!(checked_sum(&[Decimal::MAX, dec!(1)]), None);
    }

    #[test]
    fn test_capitalize_category() {
        assert_eq!(capitalize_category("food"), "Food");
        assert_eq!(capitalize_category("Rent"), "Rent");
        assert_eq!(capitalize_category("éclairs"), "Éclairs");
        assert_eq!(capitalize_category(""), "");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(11), "December");
        assert_eq!(month_name(12), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("₹", dec!(50.00)), "₹50");
        assert_eq!(format_amount("₹", dec!(12.50)), "₹12.5");
        assert_eq!(format_amount("$", dec!(0)), "$0");
    }
}
