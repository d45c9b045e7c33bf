//! Double-or-nothing wager on the points ledger.
//!
//! The coin flip is drawn outside the settlement transaction so tests can
//! drive both branches deterministically through [`settle`].

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::engine::ledger;
use rand::Rng;
use rusqlite::params;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct GambleOutcome {
    pub won: bool,
    pub wager: i64,
    /// Points returned to the account: `2 * wager` on a win, 0 on a loss.
    pub payout: i64,
    pub balance: i64,
}

/// Wager `wager` points on a fair coin flip.
pub fn gamble(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    wager: i64,
    cfg: &EconomyConfig,
) -> Result<GambleOutcome, AgoraError> {
    let won = rand::thread_rng().gen_bool(0.5);
    settle(root, member_id, community_id, display_name, wager, won, cfg)
}

/// Settle a wager with a known outcome: debit the wager, then credit the
/// payout, in one transaction. Rejects a non-positive wager and a wager
/// beyond the current balance.
pub fn settle(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    wager: i64,
    won: bool,
    cfg: &EconomyConfig,
) -> Result<GambleOutcome, AgoraError> {
    if wager <= 0 {
        return Err(AgoraError::InvalidQuantity(wager));
    }
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "gamble.settle", |conn| {
        let tx = conn.transaction()?;
        ledger::ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let balance = ledger::account_points(&tx, member_id, community_id)?;
        if balance < wager {
            return Err(AgoraError::InsufficientFunds {
                balance,
                needed: wager,
            });
        }
        let payout = if won { wager * 2 } else { 0 };
        tx.execute(
            "UPDATE accounts SET points = points - ?3 + ?4
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, wager, payout],
        )?;
        let balance = ledger::account_points(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(GambleOutcome {
            won,
            wager,
            payout,
            balance,
        })
    })
}
