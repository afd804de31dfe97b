//! The monthly-deposit soft limit applied before a deposit is committed.

use time::OffsetDateTime;

use crate::models::{Transaction, TransactionDraft, TransactionType, month_key};

/// The default month-to-date deposit total above which the guard asks for
/// confirmation, in currency units.
pub const MONTHLY_DEPOSIT_WARNING_THRESHOLD: f64 = 500.0;

/// The guard's answer for a pending draft.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardVerdict {
    /// The draft may be committed without confirmation.
    Clear,
    /// Committing the draft would push the month's deposits past the
    /// threshold. The caller must get an explicit confirmation before
    /// recording the transaction; cancelling simply discards the draft.
    Warned {
        /// What the month-to-date deposit total would become, pending draft
        /// included.
        projected_total: f64,
    },
}

/// A soft-limit confirmation gate applied to deposit drafts only.
///
/// The guard holds no state across checks: every verdict is recomputed from
/// the transaction set the caller supplies, so a session restart or a
/// refreshed ledger needs no bookkeeping here.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositGuard {
    threshold: f64,
}

impl Default for DepositGuard {
    fn default() -> Self {
        Self::new(MONTHLY_DEPOSIT_WARNING_THRESHOLD)
    }
}

impl DepositGuard {
    /// Create a guard with a custom warning threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The threshold above which deposits require confirmation.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide whether `draft` may be committed against `transactions`.
    ///
    /// Withdrawals always pass. For deposits, the month-to-date deposit
    /// total for the calendar month of `now` is summed and the verdict is
    /// [GuardVerdict::Warned] when adding the pending amount would take it
    /// strictly past the threshold. Reaching the threshold exactly does not
    /// warn.
    pub fn check(
        &self,
        transactions: &[Transaction],
        draft: &TransactionDraft,
        now: OffsetDateTime,
    ) -> GuardVerdict {
        if draft.kind != TransactionType::Deposit {
            return GuardVerdict::Clear;
        }

        let month = month_key(now);
        let month_to_date: f64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Deposit && month_key(t.timestamp) == month)
            .map(|t| t.amount)
            .sum();

        let projected_total = month_to_date + draft.amount;
        if projected_total > self.threshold {
            GuardVerdict::Warned { projected_total }
        } else {
            GuardVerdict::Clear
        }
    }
}
