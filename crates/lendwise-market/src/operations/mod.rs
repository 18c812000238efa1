//! Marketplace state transitions
//!
//! Each operation is a pure function from the current entities to their next
//! state plus a receipt. All preconditions are checked before the first
//! mutation, so a rejected call returns the error and nothing else.
//!
//! ```text
//! request_loan ──▶ OPEN ──fund_loan*──▶ FUNDED ──repay_loan*──▶ REPAID
//! ```

pub mod fund;
pub mod repay;
pub mod request;

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use lendwise_common::{BorrowerRequest, ConsistencyError, LendwiseError, Loan, Result};

pub use fund::{fund_loan, Funded, FundingReceipt};
pub use repay::{repay_loan, Repaid, RepaymentOutcome, RepaymentReceipt};
pub use request::{request_loan, LoanApplication, LoanRequestReceipt, Requested};

/// Ensure the loan was created for this request
pub(crate) fn ensure_pair(loan: &Loan, request: &BorrowerRequest) -> Result<()> {
    if loan.borrower_request != request.id {
        return Err(ConsistencyError::LoanRequestMismatch {
            loan: loan.id.to_string(),
            expected: request.id.to_string(),
            actual: loan.borrower_request.to_string(),
        }
        .into());
    }
    Ok(())
}

/// `start` plus whole calendar months; a day past the end of the target
/// month rolls over into the following month (Jan 31 + 1 month = Mar 2 in a
/// leap year)
pub(crate) fn add_months(start: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    let overflow = || {
        LendwiseError::Internal(format!("date overflow adding {} months to {}", months, start))
    };
    let first_of_month = start.with_day(1).ok_or_else(overflow)?;
    let shifted = first_of_month
        .checked_add_months(Months::new(months))
        .ok_or_else(overflow)?;
    shifted
        .checked_add_signed(Duration::days(i64::from(start.day()) - 1))
        .ok_or_else(overflow)
}
