//! Error types for the lending marketplace
//!
//! Errors fall into three families:
//! - [`ValidationError`]: caller-correctable, raised before any mutation
//! - [`ConsistencyError`]: out-of-order or mismatched calls, fatal
//! - [`StoreError`]: host/infrastructure failures, propagated unchanged

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using LendwiseError
pub type Result<T> = std::result::Result<T, LendwiseError>;

/// Unified error type for Lendwise operations
#[derive(Debug, Error)]
pub enum LendwiseError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LendwiseError {
    /// Whether the caller can correct the request and retry
    pub fn is_validation(&self) -> bool {
        matches!(self, LendwiseError::Validation(_))
    }

    /// Whether the error signals a sequencing bug on the caller side
    pub fn is_consistency(&self) -> bool {
        matches!(self, LendwiseError::Consistency(_))
    }
}

/// Caller-correctable rejections
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("request already fulfilled")]
    RequestAlreadyFulfilled,

    #[error("request already repaid")]
    RequestAlreadyRepaid,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid duration: {0} months")]
    InvalidDuration(u32),

    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    #[error("amount exceeds remaining: requested {requested}, remaining {remaining}")]
    AmountExceedsRemaining {
        requested: Decimal,
        remaining: Decimal,
    },
}

/// Errors that only occur when operations are sequenced incorrectly
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConsistencyError {
    #[error("lender {lender} has no funding record on loan {loan}")]
    LenderNotFunded { lender: String, loan: String },

    #[error("loan {loan} belongs to request {actual}, not {expected}")]
    LoanRequestMismatch {
        loan: String,
        expected: String,
        actual: String,
    },
}

/// Errors raised by the backing ledger store
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for LendwiseError {
    fn from(err: serde_json::Error) -> Self {
        LendwiseError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for LendwiseError {
    fn from(err: anyhow::Error) -> Self {
        LendwiseError::Internal(err.to_string())
    }
}
