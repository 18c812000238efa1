//! Lending marketplace service
//!
//! Orchestrates one operation end to end: load the entities from the
//! [`LedgerStore`], run the pure transition, commit the resulting batch, and
//! journal the accepted events. The host is responsible for serializing
//! operations that touch the same loan.

use std::sync::Arc;

use lendwise_common::{
    BorrowerId, BorrowerRequest, Clock, IdGenerator, LenderId, Loan, LoanId, RequestId, Result,
};
use lendwise_pricing::InterestPricer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::LendwiseConfig;
use crate::journal::{EventJournal, LedgerEvent};
use crate::operations::{
    self, FundingReceipt, LoanApplication, LoanRequestReceipt, RepaymentOutcome,
    RepaymentReceipt,
};
use crate::store::{LedgerStore, LedgerWrite};

/// Loan together with its request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSnapshot {
    pub loan: Loan,
    pub request: BorrowerRequest,
}

/// Peer-to-peer lending marketplace
pub struct LendingMarket {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    pricer: InterestPricer,
    journal: EventJournal,
}

impl LendingMarket {
    /// Create a market with the default pricing schedule
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            pricer: InterestPricer::default(),
            journal: EventJournal::default(),
        }
    }

    /// Create a market from loaded configuration
    pub fn from_config(
        config: &LendwiseConfig,
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            ids: config.ids.build(),
            pricer: InterestPricer::new(config.pricing.clone()),
            journal: config.journal.build(),
        })
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Open a funding request and its priced loan
    #[instrument(skip(self, purpose), fields(borrower = %borrower_id))]
    pub async fn request_loan(
        &self,
        amount_requested: Decimal,
        purpose: &str,
        duration_months: u32,
        borrower_id: &BorrowerId,
    ) -> Result<LoanRequestReceipt> {
        let application = LoanApplication::new(amount_requested, purpose, duration_months);
        let borrower = self.store.borrower(borrower_id).await?;
        let now = self.clock.now();

        let requested =
            operations::request_loan(&self.pricer, self.ids.as_ref(), now, borrower, &application)
                .map_err(|e| {
                    warn!(error = %e, "Loan request rejected");
                    e
                })?;
        let receipt = requested.receipt();

        self.store
            .commit(
                LedgerWrite::new()
                    .update_borrower(requested.borrower)
                    .create_request(requested.request)
                    .create_loan(requested.loan),
            )
            .await?;

        self.journal.record([LedgerEvent::LoanRequested {
            request_id: receipt.request_id.clone(),
            loan_id: receipt.loan_id.clone(),
            borrower: borrower_id.clone(),
            amount_requested,
            duration_months,
            interest_rate: receipt.interest_rate,
            timestamp: now.timestamp_millis(),
        }]);

        info!(
            request_id = %receipt.request_id,
            loan_id = %receipt.loan_id,
            rate = %receipt.interest_rate,
            band = %receipt.band,
            "Loan request created"
        );
        Ok(receipt)
    }

    /// Allocate a lender's contribution against an open request
    #[instrument(skip(self), fields(loan = %loan_id, lender = %lender_id))]
    pub async fn fund_loan(
        &self,
        loan_id: &LoanId,
        request_id: &RequestId,
        lender_id: &LenderId,
        amount: Decimal,
    ) -> Result<FundingReceipt> {
        let loan = self.store.loan(loan_id).await?;
        let request = self.store.request(request_id).await?;
        let lender = self.store.lender(lender_id).await?;
        let borrower = self.store.borrower(&request.borrower).await?;
        let now = self.clock.now();

        let funded = operations::fund_loan(lender, borrower, request, loan, amount, now)
            .map_err(|e| {
                warn!(error = %e, "Funding rejected");
                e
            })?;
        let receipt = funded.receipt;
        let borrower_id = funded.borrower.id.clone();
        let amount_fulfilled = funded.request.amount_fulfilled;

        self.store
            .commit(
                LedgerWrite::new()
                    .update_lender(funded.lender)
                    .update_request(funded.request)
                    .update_borrower(funded.borrower)
                    .update_loan(funded.loan),
            )
            .await?;

        let timestamp = now.timestamp_millis();
        let mut events = vec![LedgerEvent::LoanFunded {
            loan_id: loan_id.clone(),
            lender: lender_id.clone(),
            amount,
            accrued_interest: receipt.accrued_interest,
            lender_owed: receipt.lender_owed,
            timestamp,
        }];
        if receipt.fully_funded {
            info!(%amount_fulfilled, borrower = %borrower_id, "Request fully funded");
            events.push(LedgerEvent::RequestFulfilled {
                request_id: request_id.clone(),
                loan_id: loan_id.clone(),
                borrower: borrower_id,
                amount_fulfilled,
                timestamp,
            });
        }
        self.journal.record(events);

        info!(
            %amount,
            accrued_interest = %receipt.accrued_interest,
            remaining = %receipt.remaining,
            "Loan funded"
        );
        Ok(receipt)
    }

    /// Apply a borrower repayment to one lender's contribution
    #[instrument(skip(self), fields(loan = %loan_id, lender = %lender_id))]
    pub async fn repay_loan(
        &self,
        loan_id: &LoanId,
        request_id: &RequestId,
        lender_id: &LenderId,
        amount: Decimal,
    ) -> Result<RepaymentReceipt> {
        let loan = self.store.loan(loan_id).await?;
        let request = self.store.request(request_id).await?;
        let lender = self.store.lender(lender_id).await?;
        let borrower = self.store.borrower(&request.borrower).await?;
        let now = self.clock.now();

        let repaid = operations::repay_loan(lender, borrower, request, loan, amount, now)
            .map_err(|e| {
                warn!(error = %e, "Repayment rejected");
                e
            })?;
        let receipt = repaid.receipt;
        let borrower_id = repaid.borrower.id.clone();

        self.store
            .commit(
                LedgerWrite::new()
                    .update_lender(repaid.lender)
                    .update_request(repaid.request)
                    .update_borrower(repaid.borrower)
                    .update_loan(repaid.loan),
            )
            .await?;

        let timestamp = now.timestamp_millis();
        let mut events = vec![LedgerEvent::RepaymentReceived {
            loan_id: loan_id.clone(),
            lender: lender_id.clone(),
            amount,
            outstanding: receipt.outstanding,
            timestamp,
        }];
        if let Some(outcome) = receipt.outcome {
            let (on_time, reward_points) = match outcome {
                RepaymentOutcome::OnTime { reward_points } => (true, reward_points),
                RepaymentOutcome::Late => (false, 0),
            };
            info!(on_time, reward_points, borrower = %borrower_id, "Loan fully repaid");
            events.push(LedgerEvent::LoanRepaid {
                request_id: request_id.clone(),
                loan_id: loan_id.clone(),
                borrower: borrower_id,
                on_time,
                reward_points,
                timestamp,
            });
        }
        self.journal.record(events);

        info!(%amount, outstanding = %receipt.outstanding, "Repayment applied");
        Ok(receipt)
    }

    /// Current state of a loan and its request
    pub async fn loan_snapshot(&self, loan_id: &LoanId) -> Result<LoanSnapshot> {
        let loan = self.store.loan(loan_id).await?;
        let request = self.store.request(&loan.borrower_request).await?;
        Ok(LoanSnapshot { loan, request })
    }
}
