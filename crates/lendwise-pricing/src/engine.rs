//! Interest rate pricing
//!
//! Pricing is a pure computation over the borrower's history. Consuming the
//! borrower's reward points is a separate, explicit step
//! ([`InterestQuote::settle`]) applied by the caller that persists the result.

use lendwise_common::Borrower;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::PricingPolicy;

/// Reputation bracket a borrower falls into at pricing time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationBand {
    /// No completed loans yet; priced like a good borrower
    NoHistory,
    Good,
    Mediocre,
    BelowAverage,
    Risky,
}

impl std::fmt::Display for ReputationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReputationBand::NoHistory => write!(f, "no_history"),
            ReputationBand::Good => write!(f, "good"),
            ReputationBand::Mediocre => write!(f, "mediocre"),
            ReputationBand::BelowAverage => write!(f, "below_average"),
            ReputationBand::Risky => write!(f, "risky"),
        }
    }
}

/// Priced interest with its breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestQuote {
    /// Final annual rate in percent
    pub rate: Decimal,
    /// Base rate plus duration premium
    pub duration_rate: Decimal,
    pub band: ReputationBand,
    /// On-time percentage, absent for borrowers without history
    pub reputation: Option<Decimal>,
    /// Percentage points removed by reward points
    pub reward_discount: Decimal,
    /// Reward points this quote consumes from the borrower
    pub reward_points_consumed: u64,
}

impl InterestQuote {
    /// Apply the quote's side effect: consumed reward points are reset
    pub fn settle(&self, borrower: &mut Borrower) {
        if self.reward_points_consumed > 0 {
            borrower.reward_points = 0;
        }
    }
}

/// Prices loan requests against a [`PricingPolicy`]
#[derive(Debug, Clone, Default)]
pub struct InterestPricer {
    policy: PricingPolicy,
}

impl InterestPricer {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// Price a loan of `duration_months` for the given repayment history
    pub fn quote(
        &self,
        duration_months: u32,
        total: u32,
        success: u32,
        reward_points: u64,
    ) -> InterestQuote {
        let duration_rate =
            self.policy.base_rate + self.policy.duration.premium_for(duration_months);

        let reputation = (total > 0)
            .then(|| Decimal::from(success) / Decimal::from(total) * Decimal::ONE_HUNDRED);
        let band = self.band_for(reputation);
        let mut rate = duration_rate + self.reputation_premium(band);

        let reward_discount = if reward_points > 0 {
            Decimal::from(reward_points) / self.policy.reward_points_per_percent
        } else {
            Decimal::ZERO
        };
        rate -= reward_discount;

        debug!(
            duration_months,
            %duration_rate,
            %band,
            %reward_discount,
            %rate,
            "Priced loan request"
        );

        InterestQuote {
            rate,
            duration_rate,
            band,
            reputation,
            reward_discount,
            reward_points_consumed: reward_points,
        }
    }

    /// Price a loan for a borrower's current history
    pub fn quote_for(&self, duration_months: u32, borrower: &Borrower) -> InterestQuote {
        self.quote(
            duration_months,
            borrower.total,
            borrower.success,
            borrower.reward_points,
        )
    }

    fn band_for(&self, reputation: Option<Decimal>) -> ReputationBand {
        let premiums = &self.policy.reputation;
        match reputation {
            None => ReputationBand::NoHistory,
            Some(r) if r > premiums.good_above => ReputationBand::Good,
            Some(r) if r > premiums.mediocre_above => ReputationBand::Mediocre,
            Some(r) if r > premiums.below_average_above => ReputationBand::BelowAverage,
            Some(_) => ReputationBand::Risky,
        }
    }

    fn reputation_premium(&self, band: ReputationBand) -> Decimal {
        let premiums = &self.policy.reputation;
        match band {
            ReputationBand::NoHistory => premiums.no_history,
            ReputationBand::Good => premiums.good,
            ReputationBand::Mediocre => premiums.mediocre,
            ReputationBand::BelowAverage => premiums.below_average,
            ReputationBand::Risky => premiums.risky,
        }
    }
}

/// Price a loan with the default schedule
pub fn compute_interest_rate(
    duration_months: u32,
    total: u32,
    success: u32,
    reward_points: u64,
) -> InterestQuote {
    InterestPricer::default().quote(duration_months, total, success, reward_points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_good_reputation_medium_duration() {
        let quote = compute_interest_rate(6, 10, 8, 0);
        assert_eq!(quote.rate, dec!(13));
        assert_eq!(quote.duration_rate, dec!(11));
        assert_eq!(quote.band, ReputationBand::Good);
        assert_eq!(quote.reputation, Some(dec!(80)));
    }

    #[test]
    fn test_no_history_priced_as_good() {
        let quote = compute_interest_rate(6, 0, 0, 0);
        assert_eq!(quote.rate, dec!(13));
        assert_eq!(quote.band, ReputationBand::NoHistory);
        assert_eq!(quote.reputation, None);
    }

    #[test]
    fn test_duration_brackets() {
        assert_eq!(compute_interest_rate(3, 0, 0, 0).rate, dec!(12));
        assert_eq!(compute_interest_rate(12, 0, 0, 0).rate, dec!(15));
        assert_eq!(compute_interest_rate(24, 0, 0, 0).rate, dec!(16));
    }

    #[test]
    fn test_reputation_brackets() {
        // 70% sits in the mediocre band, boundaries are exclusive below
        assert_eq!(compute_interest_rate(3, 10, 7, 0).band, ReputationBand::Mediocre);
        assert_eq!(compute_interest_rate(3, 10, 7, 0).rate, dec!(15));
        assert_eq!(compute_interest_rate(3, 2, 1, 0).band, ReputationBand::BelowAverage);
        assert_eq!(compute_interest_rate(3, 2, 1, 0).rate, dec!(19));
        assert_eq!(compute_interest_rate(3, 4, 1, 0).band, ReputationBand::Risky);
        assert_eq!(compute_interest_rate(3, 4, 1, 0).rate, dec!(24));
    }

    #[test]
    fn test_zero_reputation_is_risky() {
        let quote = compute_interest_rate(3, 5, 0, 0);
        assert_eq!(quote.band, ReputationBand::Risky);
        assert_eq!(quote.rate, dec!(24));
    }

    #[test]
    fn test_reward_points_discount() {
        let quote = compute_interest_rate(6, 1, 1, 45);
        assert_eq!(quote.reward_discount, dec!(0.45));
        assert_eq!(quote.rate, dec!(12.55));
        assert_eq!(quote.reward_points_consumed, 45);
    }

    #[test]
    fn test_settle_resets_reward_points() {
        let mut borrower = Borrower::new("b-1", dec!(0));
        borrower.total = 1;
        borrower.success = 1;
        borrower.reward_points = 30;

        let pricer = InterestPricer::default();
        let quote = pricer.quote_for(6, &borrower);
        assert_eq!(borrower.reward_points, 30);

        quote.settle(&mut borrower);
        assert_eq!(borrower.reward_points, 0);
    }

    #[test]
    fn test_custom_policy() {
        let mut policy = PricingPolicy::default();
        policy.base_rate = dec!(5);
        let pricer = InterestPricer::new(policy);
        assert_eq!(pricer.quote(6, 0, 0, 0).rate, dec!(10));
    }

    proptest! {
        #[test]
        fn prop_rate_within_schedule(
            months in 1u32..120,
            total in 0u32..500,
            success_frac in 0u32..=100,
        ) {
            let success = total * success_frac / 100;
            let quote = compute_interest_rate(months, total, success, 0);
            prop_assert!(quote.rate >= dec!(12));
            prop_assert!(quote.rate <= dec!(28));
        }

        #[test]
        fn prop_pricing_is_deterministic(months in 1u32..60, total in 0u32..50, points in 0u64..400) {
            let success = total / 2;
            prop_assert_eq!(
                compute_interest_rate(months, total, success, points),
                compute_interest_rate(months, total, success, points)
            );
        }
    }
}
