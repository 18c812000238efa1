//! Configurable pricing schedule
//!
//! Defaults reproduce the marketplace's published schedule. Every field can be
//! overridden from configuration; [`PricingPolicy::validate`] rejects
//! schedules whose tiers are out of order.

use lendwise_common::{LendwiseError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Minimum annual interest applied to every loan
pub const DEFAULT_MINIMUM_INTEREST: Decimal = dec!(8);

/// Reward points needed to shave one percentage point off the rate
pub const DEFAULT_REWARD_POINTS_PER_PERCENT: Decimal = dec!(100);

/// Complete pricing schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub base_rate: Decimal,
    pub duration: DurationPremiums,
    pub reputation: ReputationPremiums,
    pub reward_points_per_percent: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_rate: DEFAULT_MINIMUM_INTEREST,
            duration: DurationPremiums::default(),
            reputation: ReputationPremiums::default(),
            reward_points_per_percent: DEFAULT_REWARD_POINTS_PER_PERCENT,
        }
    }
}

impl PricingPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.base_rate < Decimal::ZERO {
            return Err(LendwiseError::Config(format!(
                "pricing.base_rate must not be negative, got {}",
                self.base_rate
            )));
        }
        if self.reward_points_per_percent <= Decimal::ZERO {
            return Err(LendwiseError::Config(
                "pricing.reward_points_per_percent must be positive".to_string(),
            ));
        }
        self.duration.validate()?;
        self.reputation.validate()
    }
}

/// Premiums by loan duration; each `*_max_months` bound is inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationPremiums {
    pub short_max_months: u32,
    pub short: Decimal,
    pub medium_max_months: u32,
    pub medium: Decimal,
    pub long_max_months: u32,
    pub long: Decimal,
    /// Applied above `long_max_months`
    pub extended: Decimal,
}

impl Default for DurationPremiums {
    fn default() -> Self {
        Self {
            short_max_months: 3,
            short: dec!(2),
            medium_max_months: 6,
            medium: dec!(3),
            long_max_months: 12,
            long: dec!(5),
            extended: dec!(6),
        }
    }
}

impl DurationPremiums {
    pub fn premium_for(&self, months: u32) -> Decimal {
        if months <= self.short_max_months {
            self.short
        } else if months <= self.medium_max_months {
            self.medium
        } else if months <= self.long_max_months {
            self.long
        } else {
            self.extended
        }
    }

    fn validate(&self) -> Result<()> {
        if self.short_max_months < self.medium_max_months
            && self.medium_max_months < self.long_max_months
        {
            return Ok(());
        }
        Err(LendwiseError::Config(format!(
            "pricing.duration bounds must ascend, got {}/{}/{}",
            self.short_max_months, self.medium_max_months, self.long_max_months
        )))
    }
}

/// Premiums by on-time repayment percentage; each `*_above` bound is exclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationPremiums {
    /// Applied to borrowers with no completed loans
    pub no_history: Decimal,
    pub good_above: Decimal,
    pub good: Decimal,
    pub mediocre_above: Decimal,
    pub mediocre: Decimal,
    pub below_average_above: Decimal,
    pub below_average: Decimal,
    /// Applied at or below `below_average_above`, including 0%
    pub risky: Decimal,
}

impl Default for ReputationPremiums {
    fn default() -> Self {
        Self {
            no_history: dec!(2),
            good_above: dec!(70),
            good: dec!(2),
            mediocre_above: dec!(50),
            mediocre: dec!(5),
            below_average_above: dec!(25),
            below_average: dec!(9),
            risky: dec!(14),
        }
    }
}

impl ReputationPremiums {
    fn validate(&self) -> Result<()> {
        if self.good_above > self.mediocre_above
            && self.mediocre_above > self.below_average_above
            && self.below_average_above >= Decimal::ZERO
        {
            return Ok(());
        }
        Err(LendwiseError::Config(format!(
            "pricing.reputation thresholds must descend, got {}/{}/{}",
            self.good_above, self.mediocre_above, self.below_average_above
        )))
    }
}
