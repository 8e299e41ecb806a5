use meridian_ports::MatchingError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Matching(#[from] MatchingError),

    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("Channel receive error: {0}")]
    ChannelReceive(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExchangeError {
    /// The order was refused, as opposed to the service being unreachable
    pub fn is_rejection(&self) -> bool {
        matches!(self, ExchangeError::Matching(_))
    }

    /// The engine reported broken matching logic and the service stopped
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExchangeError::Matching(err) if err.is_fatal())
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
