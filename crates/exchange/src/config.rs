//! Configuration loading for the exchange service
//!
//! Supports JSON configuration files for:
//! - Engine collaborators (clock, match policy, event delivery)
//! - The command queue size
//! - Seed orders submitted when the service starts

use std::path::Path;

use meridian_clock::ClockKind;
use meridian_core::{Currency, OrderError, OrderRequest, Timestamp};
use meridian_notify::DeliveryPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root configuration for the exchange service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange name/identifier
    #[serde(default = "default_exchange_name")]
    pub name: String,

    /// Commands buffered before submitters wait
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,

    /// Timestamp source for orders submitted without one
    #[serde(default)]
    pub clock: ClockKind,

    #[serde(default)]
    pub match_policy: MatchPolicyKind,

    /// How subscriber failures are handled
    #[serde(default)]
    pub delivery: DeliveryPolicy,

    /// Log every engine event through `LoggingSink`
    #[serde(default = "default_log_events")]
    pub log_events: bool,

    /// Orders submitted, in order, before the first command is served
    #[serde(default)]
    pub seed_orders: Vec<SeedOrderConfig>,
}

fn default_exchange_name() -> String {
    "Meridian Exchange".to_string()
}

fn default_command_buffer_size() -> usize {
    1_024
}

fn default_log_events() -> bool {
    true
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: default_exchange_name(),
            command_buffer_size: default_command_buffer_size(),
            clock: ClockKind::default(),
            match_policy: MatchPolicyKind::default(),
            delivery: DeliveryPolicy::default(),
            log_events: default_log_events(),
            seed_orders: Vec::new(),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde can't express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "command_buffer_size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the order requests for all seed orders
    pub fn seed_requests(&self) -> Result<Vec<OrderRequest>, ConfigError> {
        self.seed_orders
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                seed.to_request()
                    .map_err(|error| ConfigError::InvalidSeedOrder { index, error })
            })
            .collect()
    }
}

/// Named match policies, see `meridian_matching::create_match_policy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicyKind {
    #[default]
    AllowAll,
    PreventSelfTrade,
}

impl MatchPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicyKind::AllowAll => "allow-all",
            MatchPolicyKind::PreventSelfTrade => "prevent-self-trade",
        }
    }
}

/// Initial order for the book
///
/// Amounts are decimals and go through the same rounding as any other order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SeedOrderConfig {
    /// Sell an amount at a price nominated in the desired currency
    Sell {
        amount_for_sale: Decimal,
        price: Decimal,
        currency_for_sale: Currency,
        currency_desired: Currency,
        #[serde(default)]
        owner: Option<String>,
    },
    /// Buy an amount at a price nominated in the currency for sale
    Buy {
        amount_desired: Decimal,
        price: Decimal,
        currency_desired: Currency,
        currency_for_sale: Currency,
        #[serde(default)]
        owner: Option<String>,
    },
    /// Both amounts given explicitly
    Limit {
        currency_for_sale: Currency,
        amount_for_sale: Decimal,
        currency_desired: Currency,
        amount_desired: Decimal,
        #[serde(default)]
        timestamp: Option<Timestamp>,
        #[serde(default)]
        owner: Option<String>,
    },
}

impl SeedOrderConfig {
    pub fn to_request(&self) -> Result<OrderRequest, OrderError> {
        let (request, owner) = match self {
            SeedOrderConfig::Sell {
                amount_for_sale,
                price,
                currency_for_sale,
                currency_desired,
                owner,
            } => (
                OrderRequest::sell(
                    *amount_for_sale,
                    *price,
                    currency_for_sale.as_str(),
                    currency_desired.as_str(),
                )?,
                owner,
            ),
            SeedOrderConfig::Buy {
                amount_desired,
                price,
                currency_desired,
                currency_for_sale,
                owner,
            } => (
                OrderRequest::buy(
                    *amount_desired,
                    *price,
                    currency_desired.as_str(),
                    currency_for_sale.as_str(),
                )?,
                owner,
            ),
            SeedOrderConfig::Limit {
                currency_for_sale,
                amount_for_sale,
                currency_desired,
                amount_desired,
                timestamp,
                owner,
            } => {
                let mut request = OrderRequest::new(
                    currency_for_sale.as_str(),
                    *amount_for_sale,
                    currency_desired.as_str(),
                    *amount_desired,
                );
                request.timestamp = *timestamp;
                (request, owner)
            }
        };

        Ok(match owner {
            Some(owner) => request.with_owner(owner.as_str()),
            None => request,
        })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid seed order #{index}: {error}")]
    InvalidSeedOrder { index: usize, error: OrderError },
}
