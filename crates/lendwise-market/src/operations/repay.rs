//! Loan repayment
//!
//! Each repayment moves funds from the borrower to one lender and is recorded
//! on that lender's ledger line. The repayment that covers the request's
//! principal plus accrued interest closes the loan and scores the borrower:
//! on time earns reward points for the days left, late counts a failure.

use chrono::{DateTime, Utc};
use lendwise_common::{
    Borrower, BorrowerRequest, ConsistencyError, Lender, LenderId, Loan, LoanId, Result,
    ValidationError, MILLIS_PER_DAY,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ensure_pair;

/// Reputation effect of the final repayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RepaymentOutcome {
    OnTime { reward_points: u64 },
    Late,
}

/// Returned to the caller of `repay_loan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentReceipt {
    pub loan_id: LoanId,
    pub lender: LenderId,
    pub amount: Decimal,
    /// Principal plus interest still owed across all lenders
    pub outstanding: Decimal,
    pub fully_repaid: bool,
    /// Present only on the repayment that closes the loan
    pub outcome: Option<RepaymentOutcome>,
}

/// Next state after a repayment
#[derive(Debug, Clone)]
pub struct Repaid {
    pub lender: Lender,
    pub borrower: Borrower,
    pub request: BorrowerRequest,
    pub loan: Loan,
    pub receipt: RepaymentReceipt,
}

/// Whole days from `now` until `end_date`, rounded up
pub fn reward_points_until(end_date: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (end_date - now).num_milliseconds().max(0);
    ((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY) as u64
}

/// Apply a borrower repayment of `amount` to `lender`'s contribution
pub fn repay_loan(
    mut lender: Lender,
    mut borrower: Borrower,
    mut request: BorrowerRequest,
    mut loan: Loan,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Repaid> {
    ensure_pair(&loan, &request)?;

    if request.is_repaid {
        return Err(ValidationError::RequestAlreadyRepaid.into());
    }
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount.into());
    }
    borrower.ensure_balance(amount)?;
    if loan.lender_line(&lender.id).is_none() {
        return Err(ConsistencyError::LenderNotFunded {
            lender: lender.id.to_string(),
            loan: loan.id.to_string(),
        }
        .into());
    }

    borrower.debit(amount)?;
    lender.credit(amount);
    request.amount_repaid += amount;
    if let Some(line) = loan.lender_line_mut(&lender.id) {
        line.repaid += amount;
    }

    // A request can only close once it has been fully funded
    let fully_repaid = request.is_done && request.amount_repaid >= request.total_owed();
    let outcome = fully_repaid.then(|| {
        request.is_repaid = true;
        if now > loan.end_date {
            borrower.record_late();
            RepaymentOutcome::Late
        } else {
            let reward_points = reward_points_until(loan.end_date, now);
            borrower.record_on_time(reward_points);
            RepaymentOutcome::OnTime { reward_points }
        }
    });

    let receipt = RepaymentReceipt {
        loan_id: loan.id.clone(),
        lender: lender.id.clone(),
        amount,
        outstanding: request.outstanding(),
        fully_repaid,
        outcome,
    };

    Ok(Repaid {
        lender,
        borrower,
        request,
        loan,
        receipt,
    })
}
