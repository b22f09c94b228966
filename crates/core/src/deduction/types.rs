//! Deduction domain types.

use std::fmt;
use std::str::FromStr;

use payday_shared::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;

/// Fixed set of deduction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeductionType {
    /// Social Security System contribution.
    Sss,
    /// `PhilHealth` contribution.
    Philhealth,
    /// Pag-IBIG fund contribution.
    PagIbig,
    /// Withholding tax.
    Tax,
    /// Loan repayment.
    Loan,
    /// Cash advance repayment.
    Advance,
    /// Anything else.
    Other,
}

impl DeductionType {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Sss,
        Self::Philhealth,
        Self::PagIbig,
        Self::Tax,
        Self::Loan,
        Self::Advance,
        Self::Other,
    ];

    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sss => "sss",
            Self::Philhealth => "philhealth",
            Self::PagIbig => "pag-ibig",
            Self::Tax => "tax",
            Self::Loan => "loan",
            Self::Advance => "advance",
            Self::Other => "other",
        }
    }
}

impl FromStr for DeductionType {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| PayrollError::UnknownDeductionType(s.to_string()))
    }
}

impl fmt::Display for DeductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a deduction row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionSource {
    /// Written by compute from the deduction policy; replaced on recompute.
    Policy,
    /// Added through `add_deduction`; survives recompute.
    Manual,
}

impl DeductionSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::Manual => "manual",
        }
    }
}

/// Input for adding a manual deduction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeductionInput {
    /// Category.
    pub deduction_type: DeductionType,
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Whether the deduction repeats every period.
    #[serde(default)]
    pub is_recurring: bool,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

impl DeductionInput {
    /// Validates the amount and returns it rounded to cents.
    pub fn validate(&self) -> Result<Decimal, PayrollError> {
        if self.amount < Decimal::ZERO {
            return Err(PayrollError::NegativeAmount("Deduction amount"));
        }
        let amount = round_money(self.amount);
        if amount.is_zero() {
            return Err(PayrollError::ZeroAmount("Deduction amount"));
        }
        Ok(amount)
    }
}

/// Per-category deduction totals of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// SSS total.
    pub sss: Decimal,
    /// `PhilHealth` total.
    pub philhealth: Decimal,
    /// Pag-IBIG total.
    pub pag_ibig: Decimal,
    /// Tax total.
    pub tax: Decimal,
    /// Loan total.
    pub loan: Decimal,
    /// Advance total.
    pub advance: Decimal,
    /// Other total.
    pub other: Decimal,
}

impl DeductionBreakdown {
    /// Returns the total for one category.
    #[must_use]
    pub const fn get(&self, deduction_type: DeductionType) -> Decimal {
        match deduction_type {
            DeductionType::Sss => self.sss,
            DeductionType::Philhealth => self.philhealth,
            DeductionType::PagIbig => self.pag_ibig,
            DeductionType::Tax => self.tax,
            DeductionType::Loan => self.loan,
            DeductionType::Advance => self.advance,
            DeductionType::Other => self.other,
        }
    }

    fn slot(&mut self, deduction_type: DeductionType) -> &mut Decimal {
        match deduction_type {
            DeductionType::Sss => &mut self.sss,
            DeductionType::Philhealth => &mut self.philhealth,
            DeductionType::PagIbig => &mut self.pag_ibig,
            DeductionType::Tax => &mut self.tax,
            DeductionType::Loan => &mut self.loan,
            DeductionType::Advance => &mut self.advance,
            DeductionType::Other => &mut self.other,
        }
    }

    /// Adds `amount` to one category.
    pub fn add(&mut self, deduction_type: DeductionType, amount: Decimal) {
        *self.slot(deduction_type) += amount;
    }

    /// Sum of every category.
    #[must_use]
    pub fn total(&self) -> Decimal {
        DeductionType::ALL.into_iter().map(|t| self.get(t)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("sss", DeductionType::Sss)]
    #[case("PhilHealth", DeductionType::Philhealth)]
    #[case("pag-ibig", DeductionType::PagIbig)]
    #[case(" tax ", DeductionType::Tax)]
    #[case("other", DeductionType::Other)]
    fn test_parse_deduction_type(#[case] input: &str, #[case] expected: DeductionType) {
        assert_eq!(input.parse::<DeductionType>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_deduction_type() {
        let err = "union-dues".parse::<DeductionType>().unwrap_err();
        assert!(matches!(err, PayrollError::UnknownDeductionType(ref s) if s == "union-dues"));
    }

    #[test]
    fn test_display_round_trips() {
        for t in DeductionType::ALL {
            assert_eq!(t.to_string().parse::<DeductionType>().unwrap(), t);
        }
    }

    #[rstest]
    #[case(dec!(-5), "Deduction amount cannot be negative")]
    #[case(dec!(0), "Deduction amount must be greater than zero")]
    #[case(dec!(0.001), "Deduction amount must be greater than zero")]
    fn test_input_validation(#[case] amount: Decimal, #[case] message: &str) {
        let input = DeductionInput {
            deduction_type: DeductionType::Loan,
            amount,
            is_recurring: false,
            note: None,
        };
        assert_eq!(input.validate().unwrap_err().to_string(), message);
    }

    #[test]
    fn test_input_rounds_to_cents() {
        let input = DeductionInput {
            deduction_type: DeductionType::Advance,
            amount: dec!(100.125),
            is_recurring: true,
            note: Some("March advance".into()),
        };
        assert_eq!(input.validate().unwrap(), dec!(100.12));
    }

    #[test]
    fn test_breakdown_add_and_total() {
        let mut breakdown = DeductionBreakdown::default();
        breakdown.add(DeductionType::Sss, dec!(100));
        breakdown.add(DeductionType::Sss, dec!(50));
        breakdown.add(DeductionType::Loan, dec!(200));

        assert_eq!(breakdown.get(DeductionType::Sss), dec!(150));
        assert_eq!(breakdown.get(DeductionType::Tax), Decimal::ZERO);
        assert_eq!(breakdown.total(), dec!(350));
    }
}
