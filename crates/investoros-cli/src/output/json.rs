use serde_json::Value;
use std::io::{self, Write};

/// Write the underwriting envelope as indented JSON, one trailing newline.
pub fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(&mut stdout.lock(), value) {
        eprintln!("Failed to write JSON output: {}", e);
    }
}
