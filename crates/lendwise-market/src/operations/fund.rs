//! Loan funding
//!
//! A lender's contribution is debited, accrues interest for the full loan
//! duration, and lands on that lender's single ledger line. The contribution
//! that closes the gap releases all funded principal to the borrower.

use chrono::{DateTime, Utc};
use lendwise_common::{
    Borrower, BorrowerRequest, Lender, LenderId, Loan, LoanId, RequestId, Result,
    ValidationError,
};
use lendwise_pricing::ContributionInterest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{add_months, ensure_pair};

/// Returned to the caller of `fund_loan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingReceipt {
    pub loan_id: LoanId,
    pub request_id: RequestId,
    pub lender: LenderId,
    pub amount: Decimal,
    /// Interest this contribution added to the request
    pub accrued_interest: Decimal,
    /// Principal plus interest this contribution added to the lender's line
    pub lender_owed: Decimal,
    /// Principal still needed after this contribution
    pub remaining: Decimal,
    pub fully_funded: bool,
    pub end_date: DateTime<Utc>,
}

/// Next state after a contribution
#[derive(Debug, Clone)]
pub struct Funded {
    pub lender: Lender,
    pub borrower: Borrower,
    pub request: BorrowerRequest,
    pub loan: Loan,
    pub receipt: FundingReceipt,
}

/// Allocate `amount` from `lender` against an open request
pub fn fund_loan(
    mut lender: Lender,
    mut borrower: Borrower,
    mut request: BorrowerRequest,
    mut loan: Loan,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Funded> {
    ensure_pair(&loan, &request)?;

    if request.is_done {
        return Err(ValidationError::RequestAlreadyFulfilled.into());
    }
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount.into());
    }
    lender.ensure_balance(amount)?;
    let remaining = request.remaining();
    if amount > remaining {
        return Err(ValidationError::AmountExceedsRemaining {
            requested: amount,
            remaining,
        }
        .into());
    }
    let end_date = add_months(now, request.duration_of_loan_in_months)?;

    lender.debit(amount)?;
    request.amount_fulfilled += amount;

    let interest =
        ContributionInterest::compute(amount, loan.interest, request.duration_of_loan_in_months);
    request.interest_amount += interest.accrued;
    loan.allocate(&lender.id, interest.lender_total);

    let fully_funded = request.amount_fulfilled >= request.amount_requested;
    if fully_funded {
        request.is_done = true;
        borrower.credit(request.amount_fulfilled);
        borrower.total += 1;
    }

    // Tracks the latest contribution, not the first
    loan.end_date = end_date;

    let receipt = FundingReceipt {
        loan_id: loan.id.clone(),
        request_id: request.id.clone(),
        lender: lender.id.clone(),
        amount,
        accrued_interest: interest.accrued,
        lender_owed: interest.lender_total,
        remaining: request.remaining(),
        fully_funded,
        end_date,
    };

    Ok(Funded {
        lender,
        borrower,
        request,
        loan,
        receipt,
    })
}
