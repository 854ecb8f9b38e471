use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Underwriting
// ---------------------------------------------------------------------------

/// Underwrite a deal given as a JSON string (snake_case or camelCase keys).
///
/// Returns the computation envelope (result, warnings, methodology, metadata)
/// as JSON. Validation failures reject with every offending field listed.
#[napi]
pub fn underwrite_deal(input_json: String) -> NapiResult<String> {
    let deal = investoros_core::underwriting::DealInput::from_json_str(&input_json)
        .map_err(to_napi_error)?;
    let output = investoros_core::underwriting::analyze_deal(&deal).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validate a deal without computing it; returns the violations as JSON (`[]` when valid).
#[napi]
pub fn validate_deal(input_json: String) -> NapiResult<String> {
    let violations = match investoros_core::underwriting::DealInput::from_json_str(&input_json) {
        Ok(_) => Vec::new(),
        Err(e @ investoros_core::UnderwritingError::Serialization(_)) => {
            return Err(to_napi_error(e))
        }
        Err(e) => e.violations().to_vec(),
    };
    serde_json::to_string(&violations).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Time value
// ---------------------------------------------------------------------------

/// Monthly payment on a fixed-rate loan. Decimal arguments are passed as strings.
#[napi]
pub fn amortized_payment(principal: String, annual_rate: String, years: u32) -> NapiResult<String> {
    let principal = parse_decimal("principal", &principal)?;
    let annual_rate = parse_decimal("annual_rate", &annual_rate)?;
    let periods = years
        .checked_mul(12)
        .ok_or_else(|| to_napi_error("years: term too long"))?;
    let payment = investoros_core::time_value::amortized_payment(
        principal,
        annual_rate / Decimal::from(12),
        periods,
    )
    .map_err(to_napi_error)?;
    Ok(payment.round_dp(2).to_string())
}
