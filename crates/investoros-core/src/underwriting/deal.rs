use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldViolation, UnderwritingError};
use crate::types::{Money, Rate};
use crate::CoreResult;

use super::rules::{
    rule_for, FieldRule, DEAL_FIELD_RULES, DEFAULT_DOWN_PAYMENT_PERCENT, DEFAULT_INTEREST_RATE,
    DEFAULT_LOAN_TERM_YEARS, DEFAULT_MAINTENANCE_RATE, DEFAULT_MANAGEMENT_RATE,
    DEFAULT_VACANCY_RATE,
};

/// Inputs for underwriting a single rental property acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    /// Contract price of the property
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Money,
    /// Up-front renovation budget, funded in cash and financed with the purchase
    #[serde(default, alias = "rehabCost")]
    pub rehab_cost: Money,
    /// Scheduled gross rent per month
    #[serde(alias = "monthlyRent")]
    pub monthly_rent: Money,
    #[serde(default, alias = "annualTaxes")]
    pub annual_taxes: Money,
    #[serde(default, alias = "annualInsurance")]
    pub annual_insurance: Money,
    #[serde(default, alias = "monthlyHoa")]
    pub monthly_hoa: Money,
    /// Vacancy and collection loss as a share of gross rent
    #[serde(default = "default_vacancy_rate", alias = "vacancyRate")]
    pub vacancy_rate: Rate,
    #[serde(default = "default_maintenance_rate", alias = "maintenanceRate")]
    pub maintenance_rate: Rate,
    #[serde(default = "default_management_rate", alias = "managementRate")]
    pub management_rate: Rate,
    /// Annual nominal mortgage rate
    #[serde(default = "default_interest_rate", alias = "interestRate")]
    pub interest_rate: Rate,
    #[serde(default = "default_loan_term_years", alias = "loanTermYears")]
    pub loan_term_years: u32,
    /// Share of total basis (price + rehab) paid in cash
    #[serde(default = "default_down_payment_percent", alias = "downPaymentPercent")]
    pub down_payment_percent: Rate,
}

fn default_vacancy_rate() -> Rate {
    DEFAULT_VACANCY_RATE
}

fn default_maintenance_rate() -> Rate {
    DEFAULT_MAINTENANCE_RATE
}

fn default_management_rate() -> Rate {
    DEFAULT_MANAGEMENT_RATE
}

fn default_interest_rate() -> Rate {
    DEFAULT_INTEREST_RATE
}

fn default_loan_term_years() -> u32 {
    DEFAULT_LOAN_TERM_YEARS
}

fn default_down_payment_percent() -> Rate {
    DEFAULT_DOWN_PAYMENT_PERCENT
}

impl DealInput {
    /// Deal with every optional field at its documented default.
    pub fn new(purchase_price: Money, monthly_rent: Money) -> Self {
        DealInput {
            purchase_price,
            rehab_cost: Decimal::ZERO,
            monthly_rent,
            annual_taxes: Decimal::ZERO,
            annual_insurance: Decimal::ZERO,
            monthly_hoa: Decimal::ZERO,
            vacancy_rate: DEFAULT_VACANCY_RATE,
            maintenance_rate: DEFAULT_MAINTENANCE_RATE,
            management_rate: DEFAULT_MANAGEMENT_RATE,
            interest_rate: DEFAULT_INTEREST_RATE,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
        }
    }

    /// Field values paired with their rules, in rule-table order.
    fn field_values(&self) -> [(&'static FieldRule, Decimal); 12] {
        let values = [
            self.purchase_price,
            self.rehab_cost,
            self.monthly_rent,
            self.annual_taxes,
            self.annual_insurance,
            self.monthly_hoa,
            self.vacancy_rate,
            self.maintenance_rate,
            self.management_rate,
            self.interest_rate,
            Decimal::from(self.loan_term_years),
            self.down_payment_percent,
        ];
        std::array::from_fn(|i| (&DEAL_FIELD_RULES[i], values[i]))
    }

    /// Check every field against its declared bound.
    ///
    /// All violations are collected so a caller can correct the request in
    /// one pass. Nothing is clamped.
    pub fn validate(&self) -> CoreResult<()> {
        let violations: Vec<FieldViolation> = self
            .field_values()
            .iter()
            .filter_map(|(rule, value)| rule.check(*value))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(UnderwritingError::InvalidInput { violations })
        }
    }

    /// Decode and validate a JSON request body.
    ///
    /// Accepts snake_case or camelCase keys, fills documented defaults for
    /// absent optional fields and ignores unknown keys. Missing required
    /// fields, wrong-typed values (including `null`) and out-of-bound values
    /// are all reported together as a single InvalidInput.
    pub fn from_json_value(body: &Value) -> CoreResult<Self> {
        let map = match body {
            Value::Object(map) => map,
            other => {
                return Err(UnderwritingError::invalid(
                    "body",
                    "a JSON object",
                    Some(json_kind(other).to_string()),
                ))
            }
        };

        let mut values: [Option<Decimal>; 12] = [None; 12];
        let mut violations = Vec::new();

        for (key, raw) in map {
            let Some(rule) = rule_for(key) else {
                continue;
            };
            let idx = rule_index(rule);
            match decode_decimal(raw) {
                Some(v) => values[idx] = Some(v),
                None => violations.push(FieldViolation {
                    field: rule.name.to_string(),
                    constraint: "a number".to_string(),
                    value: Some(raw.to_string()),
                }),
            }
        }

        let mut resolved = [Decimal::ZERO; 12];
        for (idx, rule) in DEAL_FIELD_RULES.iter().enumerate() {
            let value = match (values[idx], rule.default) {
                (Some(v), _) => v,
                (None, Some(default)) => default,
                (None, None) => {
                    if !violations.iter().any(|v| v.field == rule.name) {
                        violations.push(FieldViolation {
                            field: rule.name.to_string(),
                            constraint: "present".to_string(),
                            value: None,
                        });
                    }
                    continue;
                }
            };
            if let Some(violation) = rule.check(value) {
                violations.push(violation);
            }
            resolved[idx] = value;
        }

        if !violations.is_empty() {
            violations.sort_by_key(|v| rule_for(&v.field).map(rule_index));
            return Err(UnderwritingError::InvalidInput { violations });
        }

        // Bounds already checked, so the term fits in u32.
        let loan_term_years = resolved[10].to_u32().unwrap_or(DEFAULT_LOAN_TERM_YEARS);

        Ok(DealInput {
            purchase_price: resolved[0],
            rehab_cost: resolved[1],
            monthly_rent: resolved[2],
            annual_taxes: resolved[3],
            annual_insurance: resolved[4],
            monthly_hoa: resolved[5],
            vacancy_rate: resolved[6],
            maintenance_rate: resolved[7],
            management_rate: resolved[8],
            interest_rate: resolved[9],
            loan_term_years,
            down_payment_percent: resolved[11],
        })
    }

    /// Parse a JSON document, then decode it as with [`DealInput::from_json_value`].
    pub fn from_json_str(body: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_json_value(&value)
    }
}

fn rule_index(rule: &FieldRule) -> usize {
    DEAL_FIELD_RULES
        .iter()
        .position(|r| r.name == rule.name)
        .unwrap_or(0)
}

/// Numbers and numeric strings decode; anything else (bool, null, objects) does not.
fn decode_decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(_) | Value::String(_) => serde_json::from_value(raw.clone()).ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_new_applies_defaults() {
        let deal = DealInput::new(dec!(200000), dec!(2000));
        assert_eq!(deal.vacancy_rate, dec!(0.05));
        assert_eq!(deal.maintenance_rate, dec!(0.08));
        assert_eq!(deal.management_rate, dec!(0.08));
        assert_eq!(deal.interest_rate, dec!(0.065));
        assert_eq!(deal.loan_term_years, 30);
        assert_eq!(deal.down_payment_percent, dec!(0.2));
        assert_eq!(deal.rehab_cost, Decimal::ZERO);
        assert!(deal.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let mut deal = DealInput::new(dec!(-1), dec!(2000));
        deal.vacancy_rate = dec!(1.5);
        deal.loan_term_years = 0;
        let err = deal.validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["purchase_price", "vacancy_rate", "loan_term_years"]);
    }

    #[test]
    fn test_json_snake_and_camel_case() {
        let snake = DealInput::from_json_value(&json!({
            "purchase_price": 200000,
            "monthly_rent": 2000,
            "annual_taxes": 2400
        }))
        .unwrap();
        let camel = DealInput::from_json_value(&json!({
            "purchasePrice": 200000,
            "monthlyRent": 2000,
            "annualTaxes": 2400
        }))
        .unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.annual_taxes, dec!(2400));
        assert_eq!(snake.loan_term_years, 30);
    }

    #[test]
    fn test_json_missing_required_fields() {
        let err = DealInput::from_json_value(&json!({ "rehab_cost": 5000 })).unwrap_err();
        let v = err.violations();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].field, "purchase_price");
        assert_eq!(v[0].constraint, "present");
        assert_eq!(v[1].field, "monthly_rent");
    }

    #[test]
    fn test_json_wrong_type_reported_per_field() {
        let err = DealInput::from_json_value(&json!({
            "purchase_price": "lots",
            "monthly_rent": true,
            "vacancy_rate": null
        }))
        .unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["purchase_price", "monthly_rent", "vacancy_rate"]);
        assert!(err.violations().iter().all(|v| v.constraint == "a number"));
    }

    #[test]
    fn test_json_numeric_strings_accepted() {
        let deal = DealInput::from_json_value(&json!({
            "purchase_price": "250000.50",
            "monthly_rent": "1800"
        }))
        .unwrap();
        assert_eq!(deal.purchase_price, dec!(250000.50));
    }

    #[test]
    fn test_json_fractional_term_rejected() {
        let err = DealInput::from_json_value(&json!({
            "purchase_price": 200000,
            "monthly_rent": 2000,
            "loan_term_years": 29.5
        }))
        .unwrap_err();
        assert_eq!(err.violations()[0].field, "loan_term_years");
        assert_eq!(err.violations()[0].constraint, "a whole number > 0");
    }

    #[test]
    fn test_json_integral_float_term_accepted() {
        let deal = DealInput::from_json_value(&json!({
            "purchase_price": 200000,
            "monthly_rent": 2000,
            "loan_term_years": 15.0
        }))
        .unwrap();
        assert_eq!(deal.loan_term_years, 15);
    }

    #[test]
    fn test_json_unknown_keys_ignored() {
        let deal = DealInput::from_json_value(&json!({
            "purchase_price": 200000,
            "monthly_rent": 2000,
            "property_name": "Elm St duplex"
        }));
        assert!(deal.is_ok());
    }

    #[test]
    fn test_json_non_object_body() {
        let err = DealInput::from_json_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.violations()[0].field, "body");
        assert_eq!(err.violations()[0].value.as_deref(), Some("array"));
    }

    #[test]
    fn test_json_malformed_document() {
        let err = DealInput::from_json_str("{ purchase_price: ").unwrap_err();
        assert!(matches!(err, UnderwritingError::Serialization(_)));
    }

    #[test]
    fn test_serde_deserialize_applies_defaults() {
        let deal: DealInput =
            serde_json::from_str(r#"{"purchasePrice": "100000", "monthlyRent": "1200"}"#).unwrap();
        assert_eq!(deal, DealInput::new(dec!(100000), dec!(1200)));
    }
}
