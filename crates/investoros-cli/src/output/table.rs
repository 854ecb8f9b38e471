use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_of};

/// Print the result as a two-column table, followed by warnings and methodology.
pub fn print_table(value: &Value) {
    println!("{}", render_table(value));
}

pub fn render_table(value: &Value) -> String {
    let mut out = String::new();

    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    match result_of(value) {
        Value::Object(fields) => {
            for (key, val) in fields {
                builder.push_record([key.clone(), format_scalar(val)]);
            }
        }
        other => builder.push_record(["result".to_string(), format_scalar(other)]),
    }
    out.push_str(&Table::from(builder).to_string());

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str("\n  - ");
                out.push_str(w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        out.push_str("\n\nMethodology: ");
        out.push_str(meth);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_lists_metrics_and_warnings() {
        let value = json!({
            "result": { "loan_amount": 160000.0, "cash_on_cash_roi": 0.0806 },
            "warnings": ["DSCR of 1.10 is below 1.20x: lender covenant risk"],
            "methodology": "Rental Property Underwriting"
        });
        let rendered = render_table(&value);
        assert!(rendered.contains("loan_amount"));
        assert!(rendered.contains("0.0806"));
        assert!(rendered.contains("  - DSCR of 1.10"));
        assert!(rendered.ends_with("Methodology: Rental Property Underwriting"));
    }
}
