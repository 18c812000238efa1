//! # Lendwise Market
//!
//! Peer-to-peer lending marketplace: borrowers request loans, several lenders
//! fund one request in partial contributions, and repayments flow back to
//! each lender's ledger line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      LendingMarket                       │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐    │
//! │  │ request_loan │  │  fund_loan   │  │  repay_loan  │    │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘    │
//! │         │   pure transitions (operations)   │            │
//! │  ┌──────┴─────────────────┴─────────────────┴──────┐     │
//! │  │   LedgerStore (atomic batch commit)  │ Journal  │     │
//! │  └─────────────────────────────────────────────────┘     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Atomicity and ordering across concurrent callers are the host's concern;
//! within one call all checks precede all writes and the writes land as one
//! batch.

pub mod config;
pub mod journal;
pub mod market;
pub mod operations;
pub mod scenario;
pub mod store;

pub use config::{IdSettings, IdStrategy, JournalSettings, LendwiseConfig};
pub use journal::{EventJournal, LedgerEvent};
pub use market::{LendingMarket, LoanSnapshot};
pub use operations::{
    FundingReceipt, LoanApplication, LoanRequestReceipt, RepaymentOutcome, RepaymentReceipt,
};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, Step};
pub use store::{InMemoryLedgerStore, LedgerStore, LedgerWrite};
