//! # Lendwise Common
//!
//! Shared entities, identifiers, and errors for the Lendwise peer-to-peer
//! lending marketplace.
//!
//! ## Core Types
//!
//! - [`Borrower`]/[`Lender`]: marketplace participants with account balances
//! - [`BorrowerRequest`]: a borrower's open call for funding
//! - [`Loan`]: the asset tracking per-lender ledger lines ([`LenderDetails`])
//!
//! ## Collaborators
//!
//! - [`Clock`]: source of the current time for date arithmetic
//! - [`IdGenerator`]: collision-resistant request/loan identifiers

pub mod clock;
pub mod error;
pub mod id_gen;
pub mod types;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConsistencyError, LendwiseError, Result, StoreError, ValidationError};
pub use id_gen::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use types::{
    ids::{BorrowerId, LenderId, LoanId, RequestId},
    loan::{LenderDetails, Loan},
    participant::{Borrower, Lender},
    request::{BorrowerRequest, RequestStatus},
};

/// Lendwise version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Months in a year, used to pro-rate annual interest
pub const MONTHS_PER_YEAR: u32 = 12;

/// Milliseconds in one day, used for early-repayment reward points
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
