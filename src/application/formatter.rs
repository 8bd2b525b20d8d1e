// Formatter - Numeric coercion and display formatting for aggregate values
use crate::domain::asset::StationAggregate;
use serde_json::Value;

const CURRENCY_SYMBOL: &str = "TSh";

/// Coerce a raw price value to a float.
///
/// Strings may carry `,` grouping separators and are parsed leniently (the
/// leading numeric prefix wins). Anything unparseable is 0.
pub fn normalize_number(raw: &Value) -> f64 {
    match raw {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(&s.replace(',', "")).unwrap_or_else(|| {
            tracing::debug!("Unparseable price string {:?}, using 0", s);
            0.0
        }),
        other => {
            tracing::warn!("Invalid price value: {}", other);
            0.0
        }
    }
}

/// Coerce a raw quantity value to a whole number, truncating any fraction.
pub fn integer_quantity(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int_prefix(&s.replace(',', "")).unwrap_or(0),
        _ => 0,
    }
}

/// Sum of `price * quantity` over a list of aggregates
pub fn total_value(aggregates: &[StationAggregate]) -> f64 {
    aggregates
        .iter()
        .map(|a| normalize_number(&a.total_price) * integer_quantity(&a.total_quantity) as f64)
        .sum()
}

/// Render an amount in Tanzanian shillings, e.g. `TSh 1,234,567`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{} 0", CURRENCY_SYMBOL);
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{} {}", sign, CURRENCY_SYMBOL, group_digits(rounded.abs() as u64))
}

/// Render a value as a grouped integer, e.g. `12,500`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(rounded.abs() as u64))
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Longest leading decimal literal of `s` (after leading whitespace)
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number(&json!("1,234.5")), 1234.5);
        assert_eq!(normalize_number(&Value::Null), 0.0);
        assert_eq!(normalize_number(&json!(42)), 42.0);
        assert_eq!(normalize_number(&json!(12.75)), 12.75);
        assert_eq!(normalize_number(&json!("abc")), 0.0);
        assert_eq!(normalize_number(&json!("")), 0.0);
        assert_eq!(normalize_number(&json!("  2,500,000")), 2_500_000.0);
        assert_eq!(normalize_number(&json!("99.9 TZS")), 99.9);
        assert_eq!(normalize_number(&json!("1.5e3")), 1500.0);
        assert_eq!(normalize_number(&json!("-.5")), -0.5);
    }

    #[test]
    fn test_normalize_number_unrecognized_shapes() {
        assert_eq!(normalize_number(&json!(true)), 0.0);
        assert_eq!(normalize_number(&json!([1, 2])), 0.0);
        assert_eq!(normalize_number(&json!({ "value": 3 })), 0.0);
    }

    #[test]
    fn test_integer_quantity() {
        assert_eq!(integer_quantity(&json!(7)), 7);
        assert_eq!(integer_quantity(&json!(7.9)), 7);
        assert_eq!(integer_quantity(&json!("12")), 12);
        assert_eq!(integer_quantity(&json!("12.8")), 12);
        assert_eq!(integer_quantity(&json!("1,200")), 1200);
        assert_eq!(integer_quantity(&json!("n/a")), 0);
        assert_eq!(integer_quantity(&Value::Null), 0);
        assert_eq!(integer_quantity(&json!(false)), 0);
    }

    #[test]
    fn test_total_value() {
        let aggregates = vec![
            StationAggregate::new("Dodoma", "3", "1,000.5"),
            StationAggregate::new("Arusha", 2, 250),
            StationAggregate::new("Tanga", "bad", 900),
            StationAggregate::new("Mbeya", 4, Value::Null),
        ];

        assert_eq!(total_value(&aggregates), 3001.5 + 500.0);
        assert_eq!(total_value(&[]), 0.0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "TSh 0");
        assert_eq!(format_currency(999.0), "TSh 999");
        assert_eq!(format_currency(1234567.0), "TSh 1,234,567");
        assert_eq!(format_currency(30_000_000.0), "TSh 30,000,000");
        assert_eq!(format_currency(1500.6), "TSh 1,501");
        assert_eq!(format_currency(-2500.0), "-TSh 2,500");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(300.0), "300");
        assert_eq!(format_grouped(12500.0), "12,500");
        assert_eq!(format_grouped(1_000_000.0), "1,000,000");
    }
}
