//! Marketplace participants
//!
//! Borrowers carry the repayment history that drives interest pricing:
//! - `total`: loans that reached full funding
//! - `success`/`fail`: loans fully repaid on time / late
//! - `reward_points`: days of early repayment on the last on-time loan,
//!   consumed by the next loan's pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{BorrowerId, LenderId};
use crate::error::ValidationError;

/// A participant requesting loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: BorrowerId,

    /// Spendable balance in ledger currency units
    pub account_balance: Decimal,

    /// Loans that reached full funding
    pub total: u32,

    /// Loans fully repaid on or before their end date
    pub success: u32,

    /// Loans fully repaid after their end date
    pub fail: u32,

    /// Early-repayment bonus, reset once pricing consumes it
    pub reward_points: u64,
}

impl Borrower {
    /// Create a borrower with no history
    pub fn new(id: impl Into<BorrowerId>, account_balance: Decimal) -> Self {
        Self {
            id: id.into(),
            account_balance,
            total: 0,
            success: 0,
            fail: 0,
            reward_points: 0,
        }
    }

    /// On-time repayment percentage, `None` while the borrower has no history
    pub fn reputation(&self) -> Option<Decimal> {
        if self.total == 0 {
            return None;
        }
        Some(Decimal::from(self.success) / Decimal::from(self.total) * Decimal::ONE_HUNDRED)
    }

    pub fn ensure_balance(&self, amount: Decimal) -> Result<(), ValidationError> {
        ensure_covers(self.account_balance, amount)
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.account_balance += amount;
    }

    pub fn debit(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        self.ensure_balance(amount)?;
        self.account_balance -= amount;
        Ok(())
    }

    /// Record an on-time full repayment; reward points are overwritten
    pub fn record_on_time(&mut self, reward_points: u64) {
        self.success += 1;
        self.reward_points = reward_points;
    }

    /// Record a late full repayment
    pub fn record_late(&mut self) {
        self.fail += 1;
    }
}

/// A participant funding loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lender {
    pub id: LenderId,
    pub account_balance: Decimal,
}

impl Lender {
    pub fn new(id: impl Into<LenderId>, account_balance: Decimal) -> Self {
        Self {
            id: id.into(),
            account_balance,
        }
    }

    pub fn ensure_balance(&self, amount: Decimal) -> Result<(), ValidationError> {
        ensure_covers(self.account_balance, amount)
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.account_balance += amount;
    }

    pub fn debit(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        self.ensure_balance(amount)?;
        self.account_balance -= amount;
        Ok(())
    }
}

fn ensure_covers(available: Decimal, required: Decimal) -> Result<(), ValidationError> {
    if available < required {
        return Err(ValidationError::InsufficientBalance {
            required,
            available,
        });
    }
    Ok(())
}
