//! # Lendwise Pricing
//!
//! Interest pricing for peer-to-peer loan requests.
//!
//! ## Pricing Formula
//!
//! ```text
//! rate = base + duration premium + reputation premium - reward points / 100
//! ```
//!
//! Where:
//! - base: minimum annual interest (8%)
//! - duration premium: +2 / +3 / +5 / +6 for loans up to 3 / 6 / 12 / 12+ months
//! - reputation premium: +2 / +5 / +9 / +14 from good to risky repayment history
//! - reward points: days of early repayment earned on the previous loan
//!
//! Per-contribution interest is pro-rated over the loan duration and rounded
//! up to whole currency units (see [`accrual`]).

pub mod accrual;
pub mod engine;
pub mod policy;

pub use accrual::ContributionInterest;
pub use engine::{compute_interest_rate, InterestPricer, InterestQuote, ReputationBand};
pub use policy::{DurationPremiums, PricingPolicy, ReputationPremiums};
