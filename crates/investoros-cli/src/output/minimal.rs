use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline figures, most informative first.
const PRIORITY_KEYS: [&str; 4] = [
    "cash_on_cash_roi",
    "monthly_payment",
    "annual_cash_flow",
    "monthly_noi",
];

/// Print just the headline figure of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

pub fn headline(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return format_scalar(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_roi() {
        let value = json!({ "result": { "loan_amount": 160000.0, "cash_on_cash_roi": 0.0806 } });
        assert_eq!(headline(&value), "0.0806");
    }

    #[test]
    fn test_headline_for_payment() {
        let value = json!({ "result": { "monthly_payment": "1011.31", "periods": 360 } });
        assert_eq!(headline(&value), "1011.31");
    }
}
