//! Stock Market: the current share price and the buy/sell transactions.
//!
//! Trades are priced at the newest price record and settle points and shares
//! inside one SQLite transaction, so a trade either fully happens or leaves
//! the account untouched. A concurrent price cycle is a single-row insert
//! serialized by the broker, so a trade observes either the pre- or
//! post-adjustment price, never a partial write.

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::engine::ledger;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::path::Path;

/// Newest price row, for callers already holding a connection.
pub(crate) fn current_price_conn(conn: &Connection) -> Result<i64, AgoraError> {
    conn.query_row(
        "SELECT price FROM price_history ORDER BY id DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(AgoraError::NoPriceHistory)
}

/// Most recent recorded share price. `NoPriceHistory` means the startup
/// sequencing was broken (init seeds the table) and is fatal at boot.
pub fn current_price(root: &Path) -> Result<i64, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "market.price", |conn| {
        current_price_conn(conn)
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    pub quantity: i64,
    pub price: i64,
    /// `quantity * price`, the integer product (no per-unit rounding).
    pub value: i64,
    pub points: i64,
    pub shares: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    pub points: i64,
    pub shares: i64,
    pub price: i64,
    pub value: i64,
}

fn trade_value(quantity: i64, price: i64) -> Result<i64, AgoraError> {
    quantity
        .checked_mul(price)
        .ok_or_else(|| AgoraError::Validation(format!("trade value {} x {} overflows", quantity, price)))
}

/// Buy shares at the current price: debit `quantity * price` points, credit
/// `quantity` shares, both or neither.
pub fn buy(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    quantity: i64,
    cfg: &EconomyConfig,
) -> Result<Trade, AgoraError> {
    if quantity <= 0 {
        return Err(AgoraError::InvalidQuantity(quantity));
    }
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "market.buy", |conn| {
        let tx = conn.transaction()?;
        ledger::ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let price = current_price_conn(&tx)?;
        let cost = trade_value(quantity, price)?;
        let balance = ledger::account_points(&tx, member_id, community_id)?;
        if balance < cost {
            return Err(AgoraError::InsufficientFunds {
                balance,
                needed: cost,
            });
        }
        tx.execute(
            "UPDATE accounts SET points = points - ?3, shares = shares + ?4
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, cost, quantity],
        )?;
        let (points, shares) = holdings(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(Trade {
            quantity,
            price,
            value: cost,
            points,
            shares,
        })
    })
}

/// Sell shares at the current price: debit `quantity` shares, credit
/// `quantity * price` points, both or neither.
pub fn sell(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    quantity: i64,
    cfg: &EconomyConfig,
) -> Result<Trade, AgoraError> {
    if quantity <= 0 {
        return Err(AgoraError::InvalidQuantity(quantity));
    }
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "market.sell", |conn| {
        let tx = conn.transaction()?;
        ledger::ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let price = current_price_conn(&tx)?;
        let proceeds = trade_value(quantity, price)?;
        let (_, held) = holdings(&tx, member_id, community_id)?;
        if held < quantity {
            return Err(AgoraError::InsufficientShares {
                held,
                needed: quantity,
            });
        }
        tx.execute(
            "UPDATE accounts SET points = points + ?3, shares = shares - ?4
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, proceeds, quantity],
        )?;
        let (points, shares) = holdings(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(Trade {
            quantity,
            price,
            value: proceeds,
            points,
            shares,
        })
    })
}

/// Points, shares, and holdings value at the current price.
pub fn portfolio(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    cfg: &EconomyConfig,
) -> Result<Portfolio, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "market.portfolio", |conn| {
        let tx = conn.transaction()?;
        ledger::ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let price = current_price_conn(&tx)?;
        let (points, shares) = holdings(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(Portfolio {
            points,
            shares,
            price,
            value: trade_value(shares, price)?,
        })
    })
}

fn holdings(conn: &Connection, member_id: i64, community_id: i64) -> Result<(i64, i64), AgoraError> {
    let row = conn.query_row(
        "SELECT points, shares FROM accounts WHERE member_id = ?1 AND community_id = ?2",
        params![member_id, community_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(row)
}
