use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::UnderwritingError;
use crate::time_value::amortized_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CoreResult;

use super::deal::DealInput;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const CURRENCY_DP: u32 = 2;
const ROI_DP: u32 = 4;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Underwriting metrics for one deal.
///
/// Currency fields are rounded to cents and the ROI fraction to four places,
/// all with banker's rounding. Serialized as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderwritingResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub loan_amount: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_principal_and_interest: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_taxes: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_insurance: Money,
    /// Vacancy, maintenance, management, taxes, insurance and HOA
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_operating_expenses: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_noi: Money,
    /// Debt service plus escrowed taxes, insurance and HOA
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_piti: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_cash_flow: Money,
    /// Annual cash flow over down payment plus rehab; 0 when nothing is invested
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_on_cash_roi: Rate,
}

/// Full-precision intermediate figures. Never rounded.
#[derive(Debug, Clone)]
struct DealMetrics {
    total_basis: Money,
    loan_amount: Money,
    monthly_pi: Money,
    monthly_taxes: Money,
    monthly_insurance: Money,
    operating_expenses: Money,
    noi: Money,
    piti: Money,
    annual_cash_flow: Money,
    cash_invested: Money,
    cash_on_cash_roi: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a deal and compute its underwriting metrics.
///
/// Pure and deterministic: identical input yields bit-identical output.
pub fn underwrite(input: &DealInput) -> CoreResult<UnderwritingResult> {
    input.validate()?;
    let metrics = compute_metrics(input)?;
    Ok(metrics.rounded())
}

/// Underwrite a deal and wrap the result with warnings and metadata.
///
/// Warnings flag deals that underwrite without error but deserve a second
/// look (negative cash flow, thin coverage, high leverage).
pub fn analyze_deal(input: &DealInput) -> CoreResult<ComputationOutput<UnderwritingResult>> {
    let start = Instant::now();

    input.validate()?;
    let metrics = compute_metrics(input)?;
    let warnings = collect_warnings(input, &metrics);
    let output = metrics.rounded();

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Property Underwriting (Amortized Debt Service, Cash-on-Cash Return)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

fn compute_metrics(input: &DealInput) -> CoreResult<DealMetrics> {
    // --- Basis & financing ---
    let total_basis = input
        .purchase_price
        .checked_add(input.rehab_cost)
        .ok_or_else(|| out_of_range("purchase_price", input.purchase_price))?;
    // fraction of a representable basis, cannot overflow
    let down_payment = total_basis * input.down_payment_percent;
    let loan_amount = (total_basis - down_payment).max(Decimal::ZERO);

    // --- Debt service ---
    let monthly_rate = input.interest_rate / MONTHS_PER_YEAR;
    let periods = input.loan_term_years.checked_mul(12).ok_or_else(|| {
        UnderwritingError::invalid(
            "loan_term_years",
            format!("at most {} years", u32::MAX / 12),
            Some(input.loan_term_years.to_string()),
        )
    })?;
    let monthly_pi = amortized_payment(loan_amount, monthly_rate, periods).map_err(|_| {
        UnderwritingError::invalid(
            "interest_rate",
            "small enough to amortize within decimal range",
            Some(input.interest_rate.to_string()),
        )
    })?;

    // --- Operating expenses ---
    let rent = input.monthly_rent;
    let monthly_taxes = input.annual_taxes / MONTHS_PER_YEAR;
    let monthly_insurance = input.annual_insurance / MONTHS_PER_YEAR;

    let operating_expenses = checked_sum(&[
        ("monthly_rent", rent, rent * input.vacancy_rate),
        ("monthly_rent", rent, rent * input.maintenance_rate),
        ("monthly_rent", rent, rent * input.management_rate),
        ("annual_taxes", input.annual_taxes, monthly_taxes),
        ("annual_insurance", input.annual_insurance, monthly_insurance),
        ("monthly_hoa", input.monthly_hoa, input.monthly_hoa),
    ])?;
    // both terms non-negative
    let noi = rent - operating_expenses;

    // --- Payment, cash flow & return ---
    let piti = checked_sum(&[
        ("purchase_price", input.purchase_price, monthly_pi),
        ("annual_taxes", input.annual_taxes, monthly_taxes),
        ("annual_insurance", input.annual_insurance, monthly_insurance),
        ("monthly_hoa", input.monthly_hoa, input.monthly_hoa),
    ])?;
    let annual_cash_flow = noi
        .checked_sub(monthly_pi)
        .and_then(|monthly| monthly.checked_mul(MONTHS_PER_YEAR))
        .ok_or_else(|| out_of_range("monthly_rent", rent))?;

    let cash_invested = down_payment
        .checked_add(input.rehab_cost)
        .ok_or_else(|| out_of_range("rehab_cost", input.rehab_cost))?;
    let cash_on_cash_roi = if cash_invested > Decimal::ZERO {
        annual_cash_flow
            .checked_div(cash_invested)
            .ok_or_else(|| out_of_range("down_payment_percent", input.down_payment_percent))?
    } else {
        Decimal::ZERO
    };

    Ok(DealMetrics {
        total_basis,
        loan_amount,
        monthly_pi,
        monthly_taxes,
        monthly_insurance,
        operating_expenses,
        noi,
        piti,
        annual_cash_flow,
        cash_invested,
        cash_on_cash_roi,
    })
}

/// Sum `(field, input value, term)` triples, blaming the field whose term
/// overflows the running total.
fn checked_sum(terms: &[(&str, Decimal, Decimal)]) -> CoreResult<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |acc, &(field, value, term)| {
        acc.checked_add(term).ok_or_else(|| out_of_range(field, value))
    })
}

/// Violation for a field whose value pushes an intermediate figure past
/// the decimal range.
fn out_of_range(field: &str, value: Decimal) -> UnderwritingError {
    UnderwritingError::invalid(
        field,
        "small enough to compute within decimal range",
        Some(value.to_string()),
    )
}

impl DealMetrics {
    fn rounded(&self) -> UnderwritingResult {
        UnderwritingResult {
            loan_amount: round_to(self.loan_amount, CURRENCY_DP),
            monthly_principal_and_interest: round_to(self.monthly_pi, CURRENCY_DP),
            monthly_taxes: round_to(self.monthly_taxes, CURRENCY_DP),
            monthly_insurance: round_to(self.monthly_insurance, CURRENCY_DP),
            monthly_operating_expenses: round_to(self.operating_expenses, CURRENCY_DP),
            monthly_noi: round_to(self.noi, CURRENCY_DP),
            monthly_piti: round_to(self.piti, CURRENCY_DP),
            annual_cash_flow: round_to(self.annual_cash_flow, CURRENCY_DP),
            cash_on_cash_roi: round_to(self.cash_on_cash_roi, ROI_DP),
        }
    }
}

/// Banker's rounding; a result that rounds to zero is reported as plain 0.
fn round_to(value: Decimal, dp: u32) -> Decimal {
    let rounded = value.round_dp(dp);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(input: &DealInput, m: &DealMetrics) -> Vec<String> {
    let mut warnings = Vec::new();

    if input.monthly_rent.is_zero() {
        warnings.push("Monthly rent is zero: the deal produces no income".to_string());
    }

    if m.annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative annual cash flow of {:.2}: rent does not cover expenses and debt service",
            m.annual_cash_flow
        ));
    }

    if m.monthly_pi > Decimal::ZERO {
        match m.noi.checked_div(m.monthly_pi) {
            Some(dscr) if dscr < dec!(1.2) => warnings.push(format!(
                "DSCR of {dscr:.2} is below 1.20x: lender covenant risk"
            )),
            // ratio beyond decimal range; only its sign matters here
            None if m.noi < Decimal::ZERO => warnings.push(
                "DSCR is negative: NOI does not cover debt service".to_string(),
            ),
            _ => {}
        }
    }

    if m.total_basis > Decimal::ZERO {
        let loan_to_cost = m.loan_amount / m.total_basis;
        if loan_to_cost > dec!(0.80) {
            warnings.push(format!(
                "Loan-to-cost of {:.1}% exceeds 80%: high leverage",
                loan_to_cost * dec!(100)
            ));
        }
    }

    if m.cash_invested.is_zero() {
        warnings.push("No cash invested: cash-on-cash ROI reported as 0".to_string());
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
