//! Request and loan identifier generation
//!
//! Identifiers must stay unique for the lifetime of the deployment. The
//! default generator draws UUIDv7 values; the sequential generator is unique
//! within one process and keeps test output readable.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::ids::{LoanId, RequestId};

pub const DEFAULT_REQUEST_PREFIX: &str = "req";
pub const DEFAULT_LOAN_PREFIX: &str = "loan";

/// Mints identifiers for newly created requests and loans
pub trait IdGenerator: Send + Sync {
    fn next_request_id(&self) -> RequestId;
    fn next_loan_id(&self) -> LoanId;
}

/// UUIDv7-backed identifiers, e.g. `req-01901c3e-...`
#[derive(Debug, Clone)]
pub struct UuidIdGenerator {
    request_prefix: String,
    loan_prefix: String,
}

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self::with_prefixes(DEFAULT_REQUEST_PREFIX, DEFAULT_LOAN_PREFIX)
    }

    pub fn with_prefixes(request_prefix: &str, loan_prefix: &str) -> Self {
        Self {
            request_prefix: request_prefix.to_string(),
            loan_prefix: loan_prefix.to_string(),
        }
    }
}

impl Default for UuidIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_request_id(&self) -> RequestId {
        RequestId::new(format!("{}-{}", self.request_prefix, uuid::Uuid::now_v7()))
    }

    fn next_loan_id(&self) -> LoanId {
        LoanId::new(format!("{}-{}", self.loan_prefix, uuid::Uuid::now_v7()))
    }
}

/// Monotonic counter identifiers, e.g. `req-1`, `loan-1`
#[derive(Debug)]
pub struct SequentialIdGenerator {
    request_prefix: String,
    loan_prefix: String,
    requests: AtomicU64,
    loans: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::with_prefixes(DEFAULT_REQUEST_PREFIX, DEFAULT_LOAN_PREFIX)
    }

    pub fn with_prefixes(request_prefix: &str, loan_prefix: &str) -> Self {
        Self {
            request_prefix: request_prefix.to_string(),
            loan_prefix: loan_prefix.to_string(),
            requests: AtomicU64::new(0),
            loans: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_request_id(&self) -> RequestId {
        let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId::new(format!("{}-{}", self.request_prefix, n))
    }

    fn next_loan_id(&self) -> LoanId {
        let n = self.loans.fetch_add(1, Ordering::Relaxed) + 1;
        LoanId::new(format!("{}-{}", self.loan_prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidIdGenerator::new();
        let ids: HashSet<_> = (0..1000).map(|_| ids.next_request_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.as_str().starts_with("req-")));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::with_prefixes("r", "l");
        assert_eq!(ids.next_request_id().as_str(), "r-1");
        assert_eq!(ids.next_request_id().as_str(), "r-2");
        assert_eq!(ids.next_loan_id().as_str(), "l-1");
    }
}
