//! Marketplace event journal
//!
//! Records every accepted state transition in a bounded in-process buffer.
//! Rejected operations leave no trace here; they are only logged.

use std::collections::VecDeque;

use lendwise_common::{BorrowerId, LenderId, LoanId, RequestId};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default number of retained events
pub const DEFAULT_JOURNAL_CAPACITY: usize = 10_000;

/// Accepted marketplace transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    /// Borrower opened a request and its loan shell was priced
    LoanRequested {
        request_id: RequestId,
        loan_id: LoanId,
        borrower: BorrowerId,
        amount_requested: Decimal,
        duration_months: u32,
        interest_rate: Decimal,
        timestamp: i64,
    },
    /// Lender contributed principal
    LoanFunded {
        loan_id: LoanId,
        lender: LenderId,
        amount: Decimal,
        accrued_interest: Decimal,
        lender_owed: Decimal,
        timestamp: i64,
    },
    /// Contributions reached the requested amount; principal released to borrower
    RequestFulfilled {
        request_id: RequestId,
        loan_id: LoanId,
        borrower: BorrowerId,
        amount_fulfilled: Decimal,
        timestamp: i64,
    },
    /// Borrower paid a lender back
    RepaymentReceived {
        loan_id: LoanId,
        lender: LenderId,
        amount: Decimal,
        outstanding: Decimal,
        timestamp: i64,
    },
    /// Principal and interest fully repaid
    LoanRepaid {
        request_id: RequestId,
        loan_id: LoanId,
        borrower: BorrowerId,
        on_time: bool,
        reward_points: u64,
        timestamp: i64,
    },
}

impl LedgerEvent {
    pub fn loan_id(&self) -> &LoanId {
        match self {
            LedgerEvent::LoanRequested { loan_id, .. }
            | LedgerEvent::LoanFunded { loan_id, .. }
            | LedgerEvent::RequestFulfilled { loan_id, .. }
            | LedgerEvent::RepaymentReceived { loan_id, .. }
            | LedgerEvent::LoanRepaid { loan_id, .. } => loan_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::LoanRequested { .. } => "LoanRequested",
            LedgerEvent::LoanFunded { .. } => "LoanFunded",
            LedgerEvent::RequestFulfilled { .. } => "RequestFulfilled",
            LedgerEvent::RepaymentReceived { .. } => "RepaymentReceived",
            LedgerEvent::LoanRepaid { .. } => "LoanRepaid",
        }
    }
}

/// Bounded ring buffer of ledger events; capacity 0 disables recording
#[derive(Debug)]
pub struct EventJournal {
    events: RwLock<VecDeque<LedgerEvent>>,
    capacity: usize,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Append events, evicting the oldest once capacity is reached
    pub fn record(&self, batch: impl IntoIterator<Item = LedgerEvent>) {
        if !self.is_enabled() {
            return;
        }
        let mut events = self.events.write();
        for event in batch {
            if events.len() == self.capacity {
                events.pop_front();
            }
            events.push_back(event);
        }
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.read().iter().cloned().collect()
    }

    pub fn events_for_loan(&self, loan_id: &LoanId) -> Vec<LedgerEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.loan_id() == loan_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}
