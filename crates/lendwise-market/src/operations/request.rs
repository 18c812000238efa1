//! Loan request creation

use chrono::{DateTime, Utc};
use lendwise_common::{
    Borrower, BorrowerRequest, IdGenerator, Loan, LoanId, RequestId, Result, ValidationError,
};
use lendwise_pricing::{InterestPricer, InterestQuote, ReputationBand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Borrower-supplied terms for a new request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub amount_requested: Decimal,
    pub purpose: String,
    pub duration_months: u32,
}

impl LoanApplication {
    pub fn new(amount_requested: Decimal, purpose: impl Into<String>, duration_months: u32) -> Self {
        Self {
            amount_requested,
            purpose: purpose.into(),
            duration_months,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.amount_requested <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount);
        }
        if self.duration_months == 0 {
            return Err(ValidationError::InvalidDuration(self.duration_months));
        }
        Ok(())
    }
}

/// Returned to the caller of `request_loan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequestReceipt {
    pub request_id: RequestId,
    pub loan_id: LoanId,
    pub interest_rate: Decimal,
    pub band: ReputationBand,
}

/// Next state after a loan request
#[derive(Debug, Clone)]
pub struct Requested {
    /// Borrower with consumed reward points reset
    pub borrower: Borrower,
    pub request: BorrowerRequest,
    pub loan: Loan,
    pub quote: InterestQuote,
}

impl Requested {
    pub fn receipt(&self) -> LoanRequestReceipt {
        LoanRequestReceipt {
            request_id: self.request.id.clone(),
            loan_id: self.loan.id.clone(),
            interest_rate: self.loan.interest,
            band: self.quote.band,
        }
    }
}

/// Open a request and its priced loan shell; no balances move
pub fn request_loan(
    pricer: &InterestPricer,
    ids: &dyn IdGenerator,
    now: DateTime<Utc>,
    mut borrower: Borrower,
    application: &LoanApplication,
) -> Result<Requested> {
    application.validate()?;

    let quote = pricer.quote_for(application.duration_months, &borrower);
    quote.settle(&mut borrower);

    let request = BorrowerRequest::new(
        ids.next_request_id(),
        borrower.id.clone(),
        application.amount_requested,
        application.duration_months,
        application.purpose.clone(),
    );
    let loan = Loan::new(ids.next_loan_id(), request.id.clone(), quote.rate, now);

    Ok(Requested {
        borrower,
        request,
        loan,
        quote,
    })
}
