use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FieldViolation;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Admissible range for a single deal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// Closed unit interval [0, 1]
    Fraction,
    /// Whole number greater than zero, representable as u32
    PositiveInteger,
}

impl Bound {
    pub fn contains(&self, value: Decimal) -> bool {
        match self {
            Bound::Positive => value > Decimal::ZERO,
            Bound::NonNegative => value >= Decimal::ZERO,
            Bound::Fraction => value >= Decimal::ZERO && value <= Decimal::ONE,
            Bound::PositiveInteger => {
                value > Decimal::ZERO
                    && value.fract().is_zero()
                    && value <= Decimal::from(u32::MAX)
            }
        }
    }

    /// Human-readable constraint, as reported back to callers.
    pub fn describe(&self) -> &'static str {
        match self {
            Bound::Positive => "> 0",
            Bound::NonNegative => ">= 0",
            Bound::Fraction => "between 0 and 1",
            Bound::PositiveInteger => "a whole number > 0",
        }
    }
}

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Declared bound and default for one DealInput field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// snake_case name, used in output and error reports
    pub name: &'static str,
    /// camelCase spelling accepted on input
    pub alias: &'static str,
    pub bound: Bound,
    /// `None` marks the field as required
    pub default: Option<Decimal>,
}

impl FieldRule {
    const fn required(name: &'static str, alias: &'static str, bound: Bound) -> Self {
        FieldRule {
            name,
            alias,
            bound,
            default: None,
        }
    }

    const fn optional(
        name: &'static str,
        alias: &'static str,
        bound: Bound,
        default: Decimal,
    ) -> Self {
        FieldRule {
            name,
            alias,
            bound,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Check `value` against the bound, producing the violation on failure.
    pub fn check(&self, value: Decimal) -> Option<FieldViolation> {
        if self.bound.contains(value) {
            None
        } else {
            Some(FieldViolation {
                field: self.name.to_string(),
                constraint: self.bound.describe().to_string(),
                value: Some(value.to_string()),
            })
        }
    }
}

pub const DEFAULT_VACANCY_RATE: Decimal = dec!(0.05);
pub const DEFAULT_MAINTENANCE_RATE: Decimal = dec!(0.08);
pub const DEFAULT_MANAGEMENT_RATE: Decimal = dec!(0.08);
pub const DEFAULT_INTEREST_RATE: Decimal = dec!(0.065);
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
pub const DEFAULT_DOWN_PAYMENT_PERCENT: Decimal = dec!(0.2);

/// Every DealInput field, in declaration order.
pub static DEAL_FIELD_RULES: [FieldRule; 12] = [
    FieldRule::required("purchase_price", "purchasePrice", Bound::Positive),
    FieldRule::optional("rehab_cost", "rehabCost", Bound::NonNegative, Decimal::ZERO),
    FieldRule::required("monthly_rent", "monthlyRent", Bound::NonNegative),
    FieldRule::optional("annual_taxes", "annualTaxes", Bound::NonNegative, Decimal::ZERO),
    FieldRule::optional(
        "annual_insurance",
        "annualInsurance",
        Bound::NonNegative,
        Decimal::ZERO,
    ),
    FieldRule::optional("monthly_hoa", "monthlyHoa", Bound::NonNegative, Decimal::ZERO),
    FieldRule::optional(
        "vacancy_rate",
        "vacancyRate",
        Bound::Fraction,
        DEFAULT_VACANCY_RATE,
    ),
    FieldRule::optional(
        "maintenance_rate",
        "maintenanceRate",
        Bound::Fraction,
        DEFAULT_MAINTENANCE_RATE,
    ),
    FieldRule::optional(
        "management_rate",
        "managementRate",
        Bound::Fraction,
        DEFAULT_MANAGEMENT_RATE,
    ),
    FieldRule::optional(
        "interest_rate",
        "interestRate",
        Bound::NonNegative,
        DEFAULT_INTEREST_RATE,
    ),
    FieldRule::optional(
        "loan_term_years",
        "loanTermYears",
        Bound::PositiveInteger,
        dec!(30),
    ),
    FieldRule::optional(
        "down_payment_percent",
        "downPaymentPercent",
        Bound::Fraction,
        DEFAULT_DOWN_PAYMENT_PERCENT,
    ),
];

/// Look up a rule by its snake_case name or camelCase alias.
pub fn rule_for(key: &str) -> Option<&'static FieldRule> {
    DEAL_FIELD_RULES
        .iter()
        .find(|r| r.name == key || r.alias == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_bound_is_closed() {
        assert!(Bound::Fraction.contains(Decimal::ZERO));
        assert!(Bound::Fraction.contains(Decimal::ONE));
        assert!(!Bound::Fraction.contains(dec!(1.5)));
        assert!(!Bound::Fraction.contains(dec!(-0.01)));
    }

    #[test]
    fn test_positive_excludes_zero() {
        assert!(!Bound::Positive.contains(Decimal::ZERO));
        assert!(Bound::Positive.contains(dec!(0.01)));
    }

    #[test]
    fn test_positive_integer_rejects_fractions() {
        assert!(Bound::PositiveInteger.contains(dec!(30)));
        assert!(Bound::PositiveInteger.contains(dec!(30.0)));
        assert!(!Bound::PositiveInteger.contains(dec!(29.5)));
        assert!(!Bound::PositiveInteger.contains(Decimal::ZERO));
        assert!(!Bound::PositiveInteger.contains(dec!(5000000000)));
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<&str> = DEAL_FIELD_RULES
            .iter()
            .filter(|r| r.is_required())
            .map(|r| r.name)
            .collect();
        assert_eq!(required, vec!["purchase_price", "monthly_rent"]);
    }

    #[test]
    fn test_defaults_satisfy_their_own_bounds() {
        for rule in DEAL_FIELD_RULES.iter() {
            if let Some(default) = rule.default {
                assert!(rule.check(default).is_none(), "{} default", rule.name);
            }
        }
    }

    #[test]
    fn test_loan_term_default_is_thirty() {
        let rule = rule_for("loan_term_years").unwrap();
        assert_eq!(rule.default, Some(Decimal::from(DEFAULT_LOAN_TERM_YEARS)));
    }

    #[test]
    fn test_lookup_by_alias() {
        assert_eq!(rule_for("vacancyRate").unwrap().name, "vacancy_rate");
        assert!(rule_for("cap_rate").is_none());
    }

    #[test]
    fn test_check_reports_value_and_constraint() {
        let v = rule_for("vacancy_rate").unwrap().check(dec!(1.5)).unwrap();
        assert_eq!(v.field, "vacancy_rate");
        assert_eq!(v.constraint, "between 0 and 1");
        assert_eq!(v.value.as_deref(), Some("1.5"));
    }
}
