// Defensive numeric coercion for loosely-shaped JSON payloads
use serde_json::Value;

/// Ordered numeric sequence; insertion order is the x-axis order.
pub type Series = Vec<f64>;

/// Numbers pass through, numeric strings are parsed, anything else is zero.
/// Non-finite results are also treated as zero.
pub fn coerce_f64(value: &Value) -> f64 {
    let v = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if v.is_finite() { v } else { 0.0 }
}

/// Reads `field` from every object in `items`, defaulting missing values to zero.
pub fn field_series(items: &[Value], field: &str) -> Series {
    items
        .iter()
        .map(|item| item.get(field).map(coerce_f64).unwrap_or(0.0))
        .collect()
}

/// Array at `pointer`, or an empty slice when absent or not an array.
pub fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Largest value of the series, never below `floor`.
pub fn max_with_floor(series: &[f64], floor: f64) -> f64 {
    series.iter().copied().fold(floor, f64::max)
}

/// Replaces non-finite entries with zero.
pub fn sanitize(series: &[f64]) -> Series {
    series
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(&json!(12.5)), 12.5);
        assert_eq!(coerce_f64(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_f64(&json!("n/a")), 0.0);
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!({"x": 1})), 0.0);
        assert_eq!(coerce_f64(&json!("inf")), 0.0);
    }

    #[test]
    fn test_field_series_defaults_missing() {
        let items = vec![json!({"reports": 3}), json!({}), json!({"reports": "4"})];
        assert_eq!(field_series(&items, "reports"), vec![3.0, 0.0, 4.0]);
    }

    #[test]
    fn test_array_at() {
        let v = json!({"weekly": {"traffic": [1, 2]}, "daily": {"traffic": "oops"}});
        assert_eq!(array_at(&v, "/weekly/traffic").len(), 2);
        assert!(array_at(&v, "/daily/traffic").is_empty());
        assert!(array_at(&v, "/monthly/traffic").is_empty());
    }

    #[test]
    fn test_max_with_floor() {
        assert_eq!(max_with_floor(&[], 1.0), 1.0);
        assert_eq!(max_with_floor(&[0.0, 0.0], 1.0), 1.0);
        assert_eq!(max_with_floor(&[3.0, 9.0], 1.0), 9.0);
    }
}
