//! Borrower funding requests
//!
//! A request moves through `Open -> Funded -> Repaid` and never backwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{BorrowerId, RequestId};

/// Lifecycle state derived from the `is_done`/`is_repaid` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Accepting lender contributions
    Open,
    /// Fully funded, awaiting repayment
    Funded,
    /// Principal and interest repaid
    Repaid,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Open => write!(f, "open"),
            RequestStatus::Funded => write!(f, "funded"),
            RequestStatus::Repaid => write!(f, "repaid"),
        }
    }
}

/// A borrower's request for funding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerRequest {
    pub id: RequestId,
    pub borrower: BorrowerId,
    pub amount_requested: Decimal,

    /// Running sum of funded principal
    pub amount_fulfilled: Decimal,

    /// Running sum of interest accrued across all contributions
    pub interest_amount: Decimal,

    /// Running sum of repayments received
    pub amount_repaid: Decimal,

    pub duration_of_loan_in_months: u32,
    pub loan_requirement_purpose: String,
    pub is_done: bool,
    pub is_repaid: bool,
}

impl BorrowerRequest {
    /// Create an open request with no funding or repayment
    pub fn new(
        id: RequestId,
        borrower: BorrowerId,
        amount_requested: Decimal,
        duration_of_loan_in_months: u32,
        loan_requirement_purpose: impl Into<String>,
    ) -> Self {
        Self {
            id,
            borrower,
            amount_requested,
            amount_fulfilled: Decimal::ZERO,
            interest_amount: Decimal::ZERO,
            amount_repaid: Decimal::ZERO,
            duration_of_loan_in_months,
            loan_requirement_purpose: loan_requirement_purpose.into(),
            is_done: false,
            is_repaid: false,
        }
    }

    pub fn status(&self) -> RequestStatus {
        if self.is_repaid {
            RequestStatus::Repaid
        } else if self.is_done {
            RequestStatus::Funded
        } else {
            RequestStatus::Open
        }
    }

    /// Principal still needed to fully fund the request
    #[inline]
    pub fn remaining(&self) -> Decimal {
        self.amount_requested - self.amount_fulfilled
    }

    /// Principal plus accrued interest owed across all lenders
    #[inline]
    pub fn total_owed(&self) -> Decimal {
        self.amount_fulfilled + self.interest_amount
    }

    /// Amount still to be repaid, floored at zero
    pub fn outstanding(&self) -> Decimal {
        (self.total_owed() - self.amount_repaid).max(Decimal::ZERO)
    }
}
