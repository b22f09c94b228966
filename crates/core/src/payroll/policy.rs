//! Pluggable deduction policies.
//!
//! A policy maps gross pay to deduction amounts by category. The engine
//! never hard-codes rates; callers inject whichever policy applies.

use std::collections::BTreeMap;

use payday_shared::config::PayrollConfig;
use payday_shared::{round_money, round_rate};
use rust_decimal::Decimal;

use crate::deduction::DeductionType;
use crate::error::PayrollError;

/// Computes policy deductions from gross pay.
pub trait DeductionPolicy: Send + Sync {
    /// Deduction amounts by category for the given gross pay.
    fn deductions(&self, gross_pay: Decimal) -> BTreeMap<DeductionType, Decimal>;
}

impl<F> DeductionPolicy for F
where
    F: Fn(Decimal) -> BTreeMap<DeductionType, Decimal> + Send + Sync,
{
    fn deductions(&self, gross_pay: Decimal) -> BTreeMap<DeductionType, Decimal> {
        self(gross_pay)
    }
}

/// Policy that deducts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeductions;

impl DeductionPolicy for NoDeductions {
    fn deductions(&self, _gross_pay: Decimal) -> BTreeMap<DeductionType, Decimal> {
        BTreeMap::new()
    }
}

fn validate_rate(rate: Decimal) -> Result<Decimal, PayrollError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PayrollError::InvalidContributionRate(rate));
    }
    Ok(round_rate(rate))
}

/// A single percentage of gross booked to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRatePolicy {
    category: DeductionType,
    rate: Decimal,
}

impl FlatRatePolicy {
    /// Creates a flat-rate policy. `rate` must be within `0..=1`.
    pub fn new(category: DeductionType, rate: Decimal) -> Result<Self, PayrollError> {
        Ok(Self {
            category,
            rate: validate_rate(rate)?,
        })
    }
}

impl DeductionPolicy for FlatRatePolicy {
    fn deductions(&self, gross_pay: Decimal) -> BTreeMap<DeductionType, Decimal> {
        BTreeMap::from([(self.category, round_money(gross_pay * self.rate))])
    }
}

/// Percentage-of-gross contribution with an optional cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionRule {
    /// Category the contribution is booked to.
    pub category: DeductionType,
    /// Fraction of gross pay.
    pub rate: Decimal,
    /// Upper bound on the contribution.
    pub cap: Option<Decimal>,
}

impl ContributionRule {
    /// Contribution for the given gross pay.
    #[must_use]
    pub fn amount(&self, gross_pay: Decimal) -> Decimal {
        let raw = round_money(gross_pay.max(Decimal::ZERO) * self.rate);
        match self.cap {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }
}

/// Government-style contributions: a list of capped percentage rules.
///
/// Rules for the same category add up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatutoryPolicy {
    rules: Vec<ContributionRule>,
}

impl StatutoryPolicy {
    /// Creates a policy, validating every rate and cap.
    pub fn new(rules: Vec<ContributionRule>) -> Result<Self, PayrollError> {
        for rule in &rules {
            validate_rate(rule.rate)?;
            if rule.cap.is_some_and(|cap| cap < Decimal::ZERO) {
                return Err(PayrollError::NegativeAmount("Contribution cap"));
            }
        }
        Ok(Self { rules })
    }

    /// Builds the policy from the `payroll.contributions` configuration.
    pub fn from_config(config: &PayrollConfig) -> Result<Self, PayrollError> {
        let rules = config
            .contributions
            .iter()
            .map(|c| {
                Ok(ContributionRule {
                    category: c.category.parse()?,
                    rate: c.rate,
                    cap: c.cap,
                })
            })
            .collect::<Result<Vec<_>, PayrollError>>()?;
        Self::new(rules)
    }

    /// Configured rules.
    #[must_use]
    pub fn rules(&self) -> &[ContributionRule] {
        &self.rules
    }
}

impl DeductionPolicy for StatutoryPolicy {
    fn deductions(&self, gross_pay: Decimal) -> BTreeMap<DeductionType, Decimal> {
        let mut amounts = BTreeMap::new();
        for rule in &self.rules {
            *amounts.entry(rule.category).or_insert(Decimal::ZERO) += rule.amount(gross_pay);
        }
        amounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payday_shared::config::ContributionConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_rate() {
        let policy = FlatRatePolicy::new(DeductionType::Other, dec!(0.10)).unwrap();
        let amounts = policy.deductions(dec!(8500));
        assert_eq!(amounts.get(&DeductionType::Other), Some(&dec!(850.00)));
    }

    #[test]
    fn test_flat_rate_rejects_bad_rate() {
        assert!(matches!(
            FlatRatePolicy::new(DeductionType::Tax, dec!(1.5)),
            Err(PayrollError::InvalidContributionRate(_))
        ));
        assert!(FlatRatePolicy::new(DeductionType::Tax, dec!(-0.1)).is_err());
    }

    #[test]
    fn test_closure_is_a_policy() {
        let policy = |gross: Decimal| BTreeMap::from([(DeductionType::Tax, gross / dec!(4))]);
        assert_eq!(policy.deductions(dec!(1000))[&DeductionType::Tax], dec!(250));
    }

    #[test]
    fn test_statutory_caps() {
        let policy = StatutoryPolicy::new(vec![
            ContributionRule {
                category: DeductionType::Sss,
                rate: dec!(0.045),
                cap: Some(dec!(1350)),
            },
            ContributionRule {
                category: DeductionType::PagIbig,
                rate: dec!(0.02),
                cap: Some(dec!(100)),
            },
        ])
        .unwrap();

        let low = policy.deductions(dec!(4000));
        assert_eq!(low[&DeductionType::Sss], dec!(180.00));
        assert_eq!(low[&DeductionType::PagIbig], dec!(80.00));

        let high = policy.deductions(dec!(50000));
        assert_eq!(high[&DeductionType::Sss], dec!(1350));
        assert_eq!(high[&DeductionType::PagIbig], dec!(100));
    }

    #[test]
    fn test_statutory_from_default_config() {
        let policy = StatutoryPolicy::from_config(&PayrollConfig::default()).unwrap();
        assert_eq!(policy.rules().len(), 3);

        let amounts = policy.deductions(dec!(10000));
        assert_eq!(amounts[&DeductionType::Sss], dec!(450.00));
        assert_eq!(amounts[&DeductionType::Philhealth], dec!(250.00));
        assert_eq!(amounts[&DeductionType::PagIbig], dec!(100));
    }

    #[test]
    fn test_statutory_rejects_unknown_category() {
        let config = PayrollConfig {
            currency: "PHP".into(),
            contributions: vec![ContributionConfig {
                category: "union-dues".into(),
                rate: dec!(0.01),
                cap: None,
            }],
        };
        assert!(matches!(
            StatutoryPolicy::from_config(&config),
            Err(PayrollError::UnknownDeductionType(_))
        ));
    }

    #[test]
    fn test_no_deductions() {
        assert!(NoDeductions.deductions(dec!(10000)).is_empty());
    }
}
