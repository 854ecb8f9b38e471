use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Map, Value};

use investoros_core::time_value;
use investoros_core::underwriting::{self, DealInput};

use crate::input;

/// Arguments for deal underwriting
#[derive(Args)]
pub struct UnderwriteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the property
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Renovation budget paid at acquisition
    #[arg(long)]
    pub rehab_cost: Option<Decimal>,

    /// Gross monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    #[arg(long)]
    pub annual_taxes: Option<Decimal>,

    #[arg(long)]
    pub annual_insurance: Option<Decimal>,

    #[arg(long)]
    pub monthly_hoa: Option<Decimal>,

    /// Vacancy allowance as a fraction of rent (default 0.05)
    #[arg(long)]
    pub vacancy_rate: Option<Decimal>,

    /// Maintenance allowance as a fraction of rent (default 0.08)
    #[arg(long)]
    pub maintenance_rate: Option<Decimal>,

    /// Property management fee as a fraction of rent (default 0.08)
    #[arg(long)]
    pub management_rate: Option<Decimal>,

    /// Annual nominal mortgage rate (default 0.065)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Mortgage term in years (default 30)
    #[arg(long)]
    pub loan_term_years: Option<u32>,

    /// Down payment as a fraction of price plus rehab (default 0.2)
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,
}

impl UnderwriteArgs {
    /// Assemble the flags into the same JSON shape the HTTP API accepts, so
    /// defaults and validation are shared.
    fn to_request(&self) -> Value {
        let mut body = Map::new();
        let decimals = [
            ("purchase_price", self.purchase_price),
            ("rehab_cost", self.rehab_cost),
            ("monthly_rent", self.monthly_rent),
            ("annual_taxes", self.annual_taxes),
            ("annual_insurance", self.annual_insurance),
            ("monthly_hoa", self.monthly_hoa),
            ("vacancy_rate", self.vacancy_rate),
            ("maintenance_rate", self.maintenance_rate),
            ("management_rate", self.management_rate),
            ("interest_rate", self.interest_rate),
            ("down_payment_percent", self.down_payment_percent),
        ];
        for (key, value) in decimals {
            if let Some(v) = value {
                body.insert(key.to_string(), Value::String(v.to_string()));
            }
        }
        if let Some(years) = self.loan_term_years {
            body.insert("loan_term_years".to_string(), json!(years));
        }
        Value::Object(body)
    }
}

pub fn run_underwrite(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let body: Value = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        if args.purchase_price.is_none() || args.monthly_rent.is_none() {
            return Err(
                "--purchase-price and --monthly-rent are required (or provide --input)".into(),
            );
        }
        args.to_request()
    };

    let deal = DealInput::from_json_value(&body)?;
    let result = underwriting::analyze_deal(&deal)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a standalone mortgage payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual nominal interest rate (0.065 = 6.5%)
    #[arg(long, default_value = "0.065")]
    pub rate: Decimal,

    /// Term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let periods = args
        .years
        .checked_mul(12)
        .ok_or("--years is too large to express in months")?;
    let payment = time_value::amortized_payment(args.principal, args.rate / dec!(12), periods)?;
    let total_paid = payment
        .checked_mul(Decimal::from(periods))
        .ok_or("--principal is too large: total repaid exceeds decimal range")?;

    Ok(json!({
        "result": {
            "monthly_payment": payment.round_dp(2),
            "periods": periods,
            "total_paid": total_paid.round_dp(2),
            "total_interest": (total_paid - args.principal).round_dp(2),
        }
    }))
}
