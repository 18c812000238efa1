//! Ledger storage backends
//!
//! The marketplace never mutates stored records in place. Operations read the
//! entities they need, compute the next state, and hand the whole result to
//! [`LedgerStore::commit`] as one [`LedgerWrite`] batch.

pub mod memory;

use async_trait::async_trait;
use lendwise_common::{
    Borrower, BorrowerId, BorrowerRequest, Lender, LenderId, Loan, LoanId, RequestId, StoreError,
};

pub use memory::{InMemoryLedgerStore, StoreStats};

/// Registry of participants, requests, and loans
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn borrower(&self, id: &BorrowerId) -> Result<Borrower, StoreError>;

    async fn lender(&self, id: &LenderId) -> Result<Lender, StoreError>;

    async fn request(&self, id: &RequestId) -> Result<BorrowerRequest, StoreError>;

    async fn loan(&self, id: &LoanId) -> Result<Loan, StoreError>;

    /// Add a borrower from the participant registry
    async fn register_borrower(&self, borrower: Borrower) -> Result<(), StoreError>;

    /// Add a lender from the participant registry
    async fn register_lender(&self, lender: Lender) -> Result<(), StoreError>;

    /// Apply a batch atomically; nothing is written if any entry is rejected
    async fn commit(&self, write: LedgerWrite) -> Result<(), StoreError>;
}

/// Batch of entity writes produced by one market operation
#[derive(Debug, Clone, Default)]
pub struct LedgerWrite {
    /// Updates to existing borrowers
    pub borrowers: Vec<Borrower>,
    /// Updates to existing lenders
    pub lenders: Vec<Lender>,
    /// Requests that must not exist yet
    pub new_requests: Vec<BorrowerRequest>,
    /// Loans that must not exist yet
    pub new_loans: Vec<Loan>,
    /// Updates to existing requests
    pub requests: Vec<BorrowerRequest>,
    /// Updates to existing loans
    pub loans: Vec<Loan>,
}

impl LedgerWrite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_borrower(mut self, borrower: Borrower) -> Self {
        self.borrowers.push(borrower);
        self
    }

    pub fn update_lender(mut self, lender: Lender) -> Self {
        self.lenders.push(lender);
        self
    }

    pub fn create_request(mut self, request: BorrowerRequest) -> Self {
        self.new_requests.push(request);
        self
    }

    pub fn create_loan(mut self, loan: Loan) -> Self {
        self.new_loans.push(loan);
        self
    }

    pub fn update_request(mut self, request: BorrowerRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn update_loan(mut self, loan: Loan) -> Self {
        self.loans.push(loan);
        self
    }
}
