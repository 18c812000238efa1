//! Per-contribution interest accrual
//!
//! The raw interest term `amount * rate/100 * months/12` is computed once.
//! Both the request's accrued interest and the lender's owed total are
//! rounded up from that single value, so they can never drift apart.

use lendwise_common::MONTHS_PER_YEAR;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Interest on one lender contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionInterest {
    /// Unrounded interest term
    pub raw: Decimal,
    /// `ceil(raw)`, added to the request's interest total
    pub accrued: Decimal,
    /// `ceil(amount + raw)`, added to the lender's ledger line
    pub lender_total: Decimal,
}

impl ContributionInterest {
    pub fn compute(amount: Decimal, annual_rate: Decimal, duration_months: u32) -> Self {
        // Single division keeps the term exact for whole-month durations
        let raw = amount * annual_rate * Decimal::from(duration_months)
            / (Decimal::ONE_HUNDRED * Decimal::from(MONTHS_PER_YEAR));
        Self {
            raw,
            accrued: raw.ceil(),
            lender_total: (amount + raw).ceil(),
        }
    }
}
