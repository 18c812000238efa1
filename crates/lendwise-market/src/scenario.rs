//! Scripted marketplace scenarios
//!
//! A scenario seeds participants, then replays request/fund/repay steps
//! against an in-memory store with a manually advanced clock. Requests are
//! named by an alias so later steps can refer to them before their ids exist.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lendwise_common::{
    Borrower, BorrowerId, Lender, LenderId, LendwiseError, LoanId, ManualClock, RequestId, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::LendwiseConfig;
use crate::journal::LedgerEvent;
use crate::market::{LendingMarket, LoanSnapshot};
use crate::store::{InMemoryLedgerStore, LedgerStore};

/// Participant with an opening balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSeed {
    pub id: String,
    pub balance: Decimal,
}

/// One scripted action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Request {
        alias: String,
        borrower: BorrowerId,
        amount: Decimal,
        duration_months: u32,
        #[serde(default)]
        purpose: String,
    },
    Fund {
        loan: String,
        lender: LenderId,
        amount: Decimal,
    },
    Repay {
        loan: String,
        lender: LenderId,
        amount: Decimal,
    },
    AdvanceDays {
        days: i64,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Request { .. } => "request",
            Step::Fund { .. } => "fund",
            Step::Repay { .. } => "repay",
            Step::AdvanceDays { .. } => "advance_days",
        }
    }
}

/// Scenario document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Clock start; defaults to the current time
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub borrowers: Vec<ParticipantSeed>,
    #[serde(default)]
    pub lenders: Vec<ParticipantSeed>,
    pub steps: Vec<Step>,
}

/// Result of one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub op: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final marketplace state after replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepResult>,
    pub borrowers: Vec<Borrower>,
    pub lenders: Vec<Lender>,
    pub loans: Vec<LoanSnapshot>,
    pub events: Vec<LedgerEvent>,
}

impl ScenarioReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }
}

/// Replays scenarios against a fresh in-memory market
pub struct ScenarioRunner {
    market: LendingMarket,
    store: Arc<InMemoryLedgerStore>,
    clock: Arc<ManualClock>,
    aliases: HashMap<String, (LoanId, RequestId)>,
}

impl ScenarioRunner {
    pub fn new(config: &LendwiseConfig) -> Result<Self> {
        let store = Arc::new(InMemoryLedgerStore::new());
        let clock = Arc::new(ManualClock::default());
        let market = LendingMarket::from_config(config, store.clone(), clock.clone())?;
        Ok(Self {
            market,
            store,
            clock,
            aliases: HashMap::new(),
        })
    }

    pub async fn run(mut self, scenario: &Scenario) -> Result<ScenarioReport> {
        if let Some(start) = scenario.start {
            self.clock.set(start);
        }
        for seed in &scenario.borrowers {
            self.store
                .register_borrower(Borrower::new(seed.id.as_str(), seed.balance))
                .await?;
        }
        for seed in &scenario.lenders {
            self.store
                .register_lender(Lender::new(seed.id.as_str(), seed.balance))
                .await?;
        }
        info!(
            borrowers = scenario.borrowers.len(),
            lenders = scenario.lenders.len(),
            steps = scenario.steps.len(),
            "Replaying scenario"
        );

        let mut steps = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            let result = match self.apply(step).await {
                Ok(receipt) => StepResult {
                    index,
                    op: step.name().to_string(),
                    ok: true,
                    receipt,
                    error: None,
                },
                Err(e) => {
                    warn!(index, op = step.name(), error = %e, "Scenario step failed");
                    StepResult {
                        index,
                        op: step.name().to_string(),
                        ok: false,
                        receipt: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            steps.push(result);
        }

        let mut loans = Vec::new();
        for loan in self.store.loans() {
            loans.push(self.market.loan_snapshot(&loan.id).await?);
        }

        Ok(ScenarioReport {
            steps,
            borrowers: self.store.borrowers(),
            lenders: self.store.lenders(),
            loans,
            events: self.market.journal().events(),
        })
    }

    async fn apply(&mut self, step: &Step) -> Result<Option<Value>> {
        match step {
            Step::Request {
                alias,
                borrower,
                amount,
                duration_months,
                purpose,
            } => {
                if self.aliases.contains_key(alias) {
                    return Err(LendwiseError::Config(format!(
                        "duplicate loan alias '{}'",
                        alias
                    )));
                }
                let receipt = self
                    .market
                    .request_loan(*amount, purpose, *duration_months, borrower)
                    .await?;
                self.aliases.insert(
                    alias.clone(),
                    (receipt.loan_id.clone(), receipt.request_id.clone()),
                );
                Ok(Some(serde_json::to_value(receipt)?))
            }
            Step::Fund {
                loan,
                lender,
                amount,
            } => {
                let (loan_id, request_id) = self.resolve(loan)?;
                let receipt = self
                    .market
                    .fund_loan(&loan_id, &request_id, lender, *amount)
                    .await?;
                Ok(Some(serde_json::to_value(receipt)?))
            }
            Step::Repay {
                loan,
                lender,
                amount,
            } => {
                let (loan_id, request_id) = self.resolve(loan)?;
                let receipt = self
                    .market
                    .repay_loan(&loan_id, &request_id, lender, *amount)
                    .await?;
                Ok(Some(serde_json::to_value(receipt)?))
            }
            Step::AdvanceDays { days } => {
                self.clock.advance_days(*days);
                Ok(None)
            }
        }
    }

    fn resolve(&self, alias: &str) -> Result<(LoanId, RequestId)> {
        self.aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| LendwiseError::Config(format!("unknown loan alias '{}'", alias)))
    }
}
