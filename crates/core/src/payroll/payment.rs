//! Cumulative payment rules.

use chrono::{DateTime, Utc};
use payday_shared::round_money;
use rust_decimal::Decimal;

use super::types::{PaymentInfo, PaymentOutcome, PaymentStatus};
use crate::error::PayrollError;

/// Stateless payment calculation service.
pub struct PaymentCalculator;

impl PaymentCalculator {
    /// Balance still owed on a record. Never negative.
    #[must_use]
    pub fn outstanding(net_pay: Decimal, amount_paid: Decimal) -> Decimal {
        (net_pay - amount_paid).max(Decimal::ZERO)
    }

    /// Applies a payment to a record with `net_pay` and `amount_paid` so far.
    ///
    /// An omitted amount pays the outstanding balance. Reaching net pay marks
    /// the record paid; anything less leaves it partially paid.
    pub fn apply(
        net_pay: Decimal,
        amount_paid: Decimal,
        info: &PaymentInfo,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome, PayrollError> {
        let outstanding = Self::outstanding(net_pay, amount_paid);
        let amount = round_money(info.amount.unwrap_or(outstanding));

        if amount < Decimal::ZERO {
            return Err(PayrollError::NegativeAmount("Payment amount"));
        }
        if amount.is_zero() && outstanding > Decimal::ZERO {
            return Err(PayrollError::ZeroAmount("Payment amount"));
        }
        if amount > outstanding {
            return Err(PayrollError::Overpayment {
                amount,
                outstanding,
            });
        }

        let total_paid = amount_paid + amount;
        if total_paid >= net_pay {
            Ok(PaymentOutcome {
                amount_paid: total_paid,
                status: PaymentStatus::Paid,
                paid_at: Some(info.paid_at.unwrap_or(now)),
            })
        } else {
            Ok(PaymentOutcome {
                amount_paid: total_paid,
                status: PaymentStatus::PartiallyPaid,
                paid_at: None,
            })
        }
    }
}
