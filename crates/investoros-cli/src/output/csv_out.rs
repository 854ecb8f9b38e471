use serde_json::Value;
use std::io;

use super::{format_scalar, result_of};

/// Write the result as `metric,value` rows to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

pub fn write_csv<W: io::Write>(writer: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["metric", "value"])?;

    match result_of(value) {
        Value::Object(fields) => {
            for (key, val) in fields {
                wtr.write_record([key.as_str(), &format_scalar(val)])?;
            }
        }
        other => wtr.write_record(["result", &format_scalar(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_rows() {
        let value = json!({ "result": { "monthly_payment": "1011.31", "periods": 360 } });
        let mut buf = Vec::new();
        write_csv(&mut buf, &value).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "metric,value\nmonthly_payment,1011.31\nperiods,360\n");
    }
}
