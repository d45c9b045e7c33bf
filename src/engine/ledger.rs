//! Points Ledger: atomic credit/debit on member balances, lazy account
//! registration, leaderboard reads, and the legacy generation-token counter.
//!
//! Every entry point routes through [`ensure_account`], so the new-member
//! bootstrap (starting points and shares) happens exactly once no matter
//! which operation observes the member first.

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::core::time;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Register the account if absent, applying the one-time new-member grant.
/// Returns true when the row was created by this call.
///
/// Takes a plain connection so callers already inside a transaction can pass
/// the transaction handle (it derefs to `Connection`).
pub fn ensure_account(
    conn: &Connection,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    cfg: &EconomyConfig,
) -> Result<bool, AgoraError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM accounts WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        if !display_name.is_empty() {
            conn.execute(
                "UPDATE accounts SET display_name = ?3
                 WHERE member_id = ?1 AND community_id = ?2 AND display_name <> ?3",
                params![member_id, community_id, display_name],
            )?;
        }
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO accounts (member_id, community_id, display_name, points, shares, tokens, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![
            member_id,
            community_id,
            display_name,
            cfg.new_member_points,
            cfg.new_member_shares,
            time::now_epoch()
        ],
    )?;
    Ok(true)
}

pub(crate) fn account_points(
    conn: &Connection,
    member_id: i64,
    community_id: i64,
) -> Result<i64, AgoraError> {
    let points = conn.query_row(
        "SELECT points FROM accounts WHERE member_id = ?1 AND community_id = ?2",
        params![member_id, community_id],
        |row| row.get(0),
    )?;
    Ok(points)
}

/// Increase a balance. A negative amount expresses subtraction from the
/// activity path and floors at zero instead of erroring; checked removal of
/// points goes through [`debit`].
pub fn credit(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    amount: i64,
    cfg: &EconomyConfig,
) -> Result<i64, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.credit", |conn| {
        let tx = conn.transaction()?;
        ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        tx.execute(
            "UPDATE accounts SET points = MAX(points + ?3, 0)
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, amount],
        )?;
        let balance = account_points(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(balance)
    })
}

/// Remove points, checked-then-applied in one transaction. A balance below
/// `amount` rejects with `InsufficientFunds`; the balance is never clamped.
pub fn debit(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    amount: i64,
    cfg: &EconomyConfig,
) -> Result<i64, AgoraError> {
    if amount <= 0 {
        return Err(AgoraError::InvalidQuantity(amount));
    }
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.debit", |conn| {
        let tx = conn.transaction()?;
        ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let balance = account_points(&tx, member_id, community_id)?;
        if balance < amount {
            return Err(AgoraError::InsufficientFunds {
                balance,
                needed: amount,
            });
        }
        tx.execute(
            "UPDATE accounts SET points = points - ?3
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, amount],
        )?;
        tx.commit()?;
        Ok(balance - amount)
    })
}

/// Current balance; registers the account first if absent.
pub fn balance(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    cfg: &EconomyConfig,
) -> Result<i64, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.balance", |conn| {
        let tx = conn.transaction()?;
        ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let balance = account_points(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(balance)
    })
}

/// Top accounts of a community by points, descending. Ties keep insertion
/// order (`rowid`), so earlier-registered members rank first at equal points.
pub fn leaderboard(
    root: &Path,
    community_id: i64,
    limit: i64,
) -> Result<Vec<(i64, String, i64)>, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.leaderboard", |conn| {
        let mut stmt = conn.prepare(
            "SELECT member_id, display_name, points FROM accounts
             WHERE community_id = ?1
             ORDER BY points DESC, rowid ASC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![community_id, limit], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Generation-token balance; registers the account first if absent.
pub fn tokens(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    cfg: &EconomyConfig,
) -> Result<i64, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.tokens", |conn| {
        let tx = conn.transaction()?;
        ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let tokens = tx.query_row(
            "SELECT tokens FROM accounts WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(tokens)
    })
}

/// Consume one generation token, rejected when none remain.
pub fn spend_token(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    cfg: &EconomyConfig,
) -> Result<i64, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "ledger.spend_token", |conn| {
        let tx = conn.transaction()?;
        ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let held: i64 = tx.query_row(
            "SELECT tokens FROM accounts WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id],
            |row| row.get(0),
        )?;
        if held < 1 {
            return Err(AgoraError::InsufficientFunds {
                balance: held,
                needed: 1,
            });
        }
        tx.execute(
            "UPDATE accounts SET tokens = tokens - 1
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id],
        )?;
        tx.commit()?;
        Ok(held - 1)
    })
}
