//! Daily generation-token replenishment, the legacy second scheduled job.
//!
//! Grants every registered account a flat token amount up to the configured
//! cap. Operates on its own per-member counter; shares the Scheduler with the
//! price cycle but none of its state.

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use rusqlite::params;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ReplenishReport {
    /// Accounts whose counter moved (already-capped accounts excluded).
    pub replenished: i64,
    pub grant: i64,
    pub cap: i64,
}

pub fn run_grant(root: &Path, cfg: &EconomyConfig) -> Result<ReplenishReport, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "replenish.grant", |conn| {
        let replenished = conn.execute(
            "UPDATE accounts SET tokens = MIN(tokens + ?1, ?2) WHERE tokens < ?2",
            params![cfg.token_grant, cfg.max_tokens],
        )?;
        Ok(ReplenishReport {
            replenished: replenished as i64,
            grant: cfg.token_grant,
            cap: cfg.max_tokens,
        })
    })
}
