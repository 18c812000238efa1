//! Marketplace configuration
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. `LENDWISE__*` environment variables, nested with `__`
//!    (e.g. `LENDWISE__PRICING__BASE_RATE=9`)

use std::path::Path;
use std::sync::Arc;

use config::{Config, Environment, File, FileFormat};
use lendwise_common::{IdGenerator, LendwiseError, Result, SequentialIdGenerator, UuidIdGenerator};
use lendwise_pricing::PricingPolicy;
use serde::{Deserialize, Serialize};

use crate::journal::{EventJournal, DEFAULT_JOURNAL_CAPACITY};

/// Top-level marketplace configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendwiseConfig {
    pub pricing: PricingPolicy,
    pub ids: IdSettings,
    pub journal: JournalSettings,
}

impl LendwiseConfig {
    /// Load configuration from environment and an optional file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(Environment::with_prefix("LENDWISE").separator("__"))
            .build()
            .map_err(|e| LendwiseError::Config(format!("Failed to load configuration: {}", e)))?;

        Self::from_settings(settings)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| LendwiseError::Config(format!("Failed to parse configuration: {}", e)))?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self> {
        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| LendwiseError::Config(format!("Invalid configuration: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.pricing.validate()?;
        if self.ids.request_prefix.is_empty() || self.ids.loan_prefix.is_empty() {
            return Err(LendwiseError::Config(
                "ids prefixes must not be empty".to_string(),
            ));
        }
        if self.ids.request_prefix == self.ids.loan_prefix {
            return Err(LendwiseError::Config(format!(
                "ids.request_prefix and ids.loan_prefix must differ, both are '{}'",
                self.ids.request_prefix
            )));
        }
        Ok(())
    }
}

/// Identifier generation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// UUIDv7, unique across processes
    #[default]
    Uuid,
    /// Per-process counter, readable ids for local runs
    Sequential,
}

/// Identifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSettings {
    pub strategy: IdStrategy,
    pub request_prefix: String,
    pub loan_prefix: String,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::default(),
            request_prefix: lendwise_common::id_gen::DEFAULT_REQUEST_PREFIX.to_string(),
            loan_prefix: lendwise_common::id_gen::DEFAULT_LOAN_PREFIX.to_string(),
        }
    }
}

impl IdSettings {
    pub fn build(&self) -> Arc<dyn IdGenerator> {
        match self.strategy {
            IdStrategy::Uuid => Arc::new(UuidIdGenerator::with_prefixes(
                &self.request_prefix,
                &self.loan_prefix,
            )),
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::with_prefixes(
                &self.request_prefix,
                &self.loan_prefix,
            )),
        }
    }
}

/// Event journal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    pub enabled: bool,
    /// Maximum retained events
    pub capacity: usize,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl JournalSettings {
    pub fn build(&self) -> EventJournal {
        if self.enabled {
            EventJournal::new(self.capacity)
        } else {
            EventJournal::disabled()
        }
    }
}
