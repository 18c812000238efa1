//! In-memory ledger store
//!
//! Uses DashMap tables for concurrent lookups. A commit lock is held for
//! writing while a batch is applied and for reading on every lookup, so no
//! reader ever observes half of a batch.

use async_trait::async_trait;
use dashmap::DashMap;
use lendwise_common::{
    Borrower, BorrowerId, BorrowerRequest, Lender, LenderId, Loan, LoanId, RequestId, StoreError,
};
use parking_lot::RwLock;
use tracing::debug;

use super::{LedgerStore, LedgerWrite};

/// In-memory storage implementation
#[derive(Default)]
pub struct InMemoryLedgerStore {
    borrowers: DashMap<BorrowerId, Borrower>,
    lenders: DashMap<LenderId, Lender>,
    requests: DashMap<RequestId, BorrowerRequest>,
    loans: DashMap<LoanId, Loan>,
    commit_lock: RwLock<()>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the batch if any entry targets a missing or already existing record
    fn check(&self, write: &LedgerWrite) -> Result<(), StoreError> {
        if let Some(b) = write.borrowers.iter().find(|b| !self.borrowers.contains_key(&b.id)) {
            return Err(StoreError::not_found("borrower", &b.id));
        }
        if let Some(l) = write.lenders.iter().find(|l| !self.lenders.contains_key(&l.id)) {
            return Err(StoreError::not_found("lender", &l.id));
        }
        if let Some(r) = write.requests.iter().find(|r| !self.requests.contains_key(&r.id)) {
            return Err(StoreError::not_found("borrower request", &r.id));
        }
        if let Some(l) = write.loans.iter().find(|l| !self.loans.contains_key(&l.id)) {
            return Err(StoreError::not_found("loan", &l.id));
        }
        if let Some(r) = write.new_requests.iter().find(|r| self.requests.contains_key(&r.id)) {
            return Err(StoreError::Conflict {
                kind: "borrower request",
                id: r.id.to_string(),
            });
        }
        if let Some(l) = write.new_loans.iter().find(|l| self.loans.contains_key(&l.id)) {
            return Err(StoreError::Conflict {
                kind: "loan",
                id: l.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn borrowers(&self) -> Vec<Borrower> {
        let _guard = self.commit_lock.read();
        let mut all: Vec<_> = self.borrowers.iter().map(|b| b.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn lenders(&self) -> Vec<Lender> {
        let _guard = self.commit_lock.read();
        let mut all: Vec<_> = self.lenders.iter().map(|l| l.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn loans(&self) -> Vec<Loan> {
        let _guard = self.commit_lock.read();
        let mut all: Vec<_> = self.loans.iter().map(|l| l.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn stats(&self) -> StoreStats {
        let _guard = self.commit_lock.read();
        StoreStats {
            borrowers: self.borrowers.len(),
            lenders: self.lenders.len(),
            requests: self.requests.len(),
            loans: self.loans.len(),
            open_requests: self.requests.iter().filter(|r| !r.is_done).count(),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn borrower(&self, id: &BorrowerId) -> Result<Borrower, StoreError> {
        let _guard = self.commit_lock.read();
        self.borrowers
            .get(id)
            .map(|b| b.clone())
            .ok_or_else(|| StoreError::not_found("borrower", id))
    }

    async fn lender(&self, id: &LenderId) -> Result<Lender, StoreError> {
        let _guard = self.commit_lock.read();
        self.lenders
            .get(id)
            .map(|l| l.clone())
            .ok_or_else(|| StoreError::not_found("lender", id))
    }

    async fn request(&self, id: &RequestId) -> Result<BorrowerRequest, StoreError> {
        let _guard = self.commit_lock.read();
        self.requests
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| StoreError::not_found("borrower request", id))
    }

    async fn loan(&self, id: &LoanId) -> Result<Loan, StoreError> {
        let _guard = self.commit_lock.read();
        self.loans
            .get(id)
            .map(|l| l.clone())
            .ok_or_else(|| StoreError::not_found("loan", id))
    }

    async fn register_borrower(&self, borrower: Borrower) -> Result<(), StoreError> {
        let _guard = self.commit_lock.write();
        if self.borrowers.contains_key(&borrower.id) {
            return Err(StoreError::Conflict {
                kind: "borrower",
                id: borrower.id.to_string(),
            });
        }
        self.borrowers.insert(borrower.id.clone(), borrower);
        Ok(())
    }

    async fn register_lender(&self, lender: Lender) -> Result<(), StoreError> {
        let _guard = self.commit_lock.write();
        if self.lenders.contains_key(&lender.id) {
            return Err(StoreError::Conflict {
                kind: "lender",
                id: lender.id.to_string(),
            });
        }
        self.lenders.insert(lender.id.clone(), lender);
        Ok(())
    }

    async fn commit(&self, write: LedgerWrite) -> Result<(), StoreError> {
        let _guard = self.commit_lock.write();
        self.check(&write)?;

        let LedgerWrite {
            borrowers,
            lenders,
            new_requests,
            new_loans,
            requests,
            loans,
        } = write;

        let count = borrowers.len()
            + lenders.len()
            + new_requests.len()
            + new_loans.len()
            + requests.len()
            + loans.len();

        for borrower in borrowers {
            self.borrowers.insert(borrower.id.clone(), borrower);
        }
        for lender in lenders {
            self.lenders.insert(lender.id.clone(), lender);
        }
        for request in new_requests.into_iter().chain(requests) {
            self.requests.insert(request.id.clone(), request);
        }
        for loan in new_loans.into_iter().chain(loans) {
            self.loans.insert(loan.id.clone(), loan);
        }

        debug!(records = count, "Committed ledger write");
        Ok(())
    }
}

/// Statistics about the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub borrowers: usize,
    pub lenders: usize,
    pub requests: usize,
    pub loans: usize,
    pub open_requests: usize,
}
