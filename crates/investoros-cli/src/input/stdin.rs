use serde_json::Value;
use std::io::{self, Read};

/// Deal document piped on stdin, if any.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped_deal(&buffer)
}

/// An empty pipe yields `None` so the caller falls back to flags.
fn parse_piped_deal(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("stdin is not a JSON deal document: {}", e))?;
    Ok(Some(value))
}
