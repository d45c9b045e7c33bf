use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgoraError {
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("no price history; the store must be seeded with `agora init` before the market is queried")]
    NoPriceHistory,
    #[error("insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds { balance: i64, needed: i64 },
    #[error("insufficient shares: held {held}, needed {needed}")]
    InsufficientShares { held: i64, needed: i64 },
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),
}

impl AgoraError {
    /// Legitimate business outcomes, reported to the caller and never retried.
    /// Everything else is a fault (store unavailable, bad configuration).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AgoraError::InsufficientFunds { .. }
                | AgoraError::InsufficientShares { .. }
                | AgoraError::InvalidQuantity(_)
        )
    }
}
