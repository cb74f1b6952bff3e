//! Conversions from raw JSON cells to typed fields.
//!
//! Both APIs send numbers either as JSON numbers or as strings, and years as
//! object keys or `"date"` strings.

use serde_json::Value;

/// Parse a year from a JSON string or integer.
pub fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::String(s) => parse_year_str(s),
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        _ => None,
    }
}

pub fn parse_year_str(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

/// Numeric conversion of a JSON number or numeric string.
///
/// Returns `None` for anything that does not convert. Non-finite spellings
/// such as `"NaN"` do convert; the cleaner nulls them later.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn years_from_strings_and_numbers() {
        assert_eq!(parse_year(&json!("2020")), Some(2020));
        assert_eq!(parse_year(&json!(" 2021 ")), Some(2021));
        assert_eq!(parse_year(&json!(2019)), Some(2019));
        assert_eq!(parse_year(&json!("")), None);
        assert_eq!(parse_year(&json!("2020Q1")), None);
        assert_eq!(parse_year(&json!(null)), None);
        assert_eq!(parse_year(&json!(1e12)), None);
    }

    #[test]
    fn numbers_from_strings_and_numbers() {
        assert_eq!(to_number(&json!(11.9)), Some(11.9));
        assert_eq!(to_number(&json!(212559409)), Some(212559409.0));
        assert_eq!(to_number(&json!("5.2")), Some(5.2));
        assert_eq!(to_number(&json!("n/a")), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!(true)), None);
        assert_eq!(to_number(&json!([1.0])), None);
        assert!(to_number(&json!("NaN")).unwrap().is_nan());
    }
}
