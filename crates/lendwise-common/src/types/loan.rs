//! Loan asset and per-lender ledger lines

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{LenderId, LoanId, RequestId};

/// One lender's position on a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderDetails {
    pub lender: LenderId,

    /// Cumulative principal plus interest owed to this lender
    pub amount: Decimal,

    /// Cumulative amount returned to this lender
    pub repaid: Decimal,
}

impl LenderDetails {
    pub fn new(lender: LenderId, amount: Decimal) -> Self {
        Self {
            lender,
            amount,
            repaid: Decimal::ZERO,
        }
    }

    /// Amount still owed to this lender; negative after overpayment
    pub fn owed(&self) -> Decimal {
        self.amount - self.repaid
    }
}

/// Loan asset created alongside its [`BorrowerRequest`](crate::BorrowerRequest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub borrower_request: RequestId,

    /// One entry per distinct lender, in first-contribution order
    pub lenders: Vec<LenderDetails>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    /// Annual interest rate in percent, fixed when the request is created
    pub interest: Decimal,
}

impl Loan {
    /// Create a loan shell with no lenders
    pub fn new(
        id: LoanId,
        borrower_request: RequestId,
        interest: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            borrower_request,
            lenders: Vec::new(),
            start_date: now,
            end_date: now,
            interest,
        }
    }

    pub fn lender_line(&self, lender: &LenderId) -> Option<&LenderDetails> {
        self.lenders.iter().find(|line| &line.lender == lender)
    }

    pub fn lender_line_mut(&mut self, lender: &LenderId) -> Option<&mut LenderDetails> {
        self.lenders.iter_mut().find(|line| &line.lender == lender)
    }

    /// Add `amount` to the lender's line, appending a new line on first contribution
    pub fn allocate(&mut self, lender: &LenderId, amount: Decimal) {
        match self.lender_line_mut(lender) {
            Some(line) => line.amount += amount,
            None => self.lenders.push(LenderDetails::new(lender.clone(), amount)),
        }
    }

    /// Sum of all lender lines
    pub fn total_allocated(&self) -> Decimal {
        self.lenders.iter().map(|line| line.amount).sum()
    }
}
