//! Price Adjustment Engine: the once-per-cycle stock revaluation.
//!
//! A cycle is a pure function of store state at invocation time and appends
//! exactly one price record. The raw signal is the ratio of the last day's
//! activity volume to the average daily volume over a trailing window; it is
//! smoothed toward 1.0 and then hard-capped, so sustained trends move the
//! price while a single viral day cannot destabilize the economy.
//!
//! Running a cycle twice in the same window compounds the factor. Once per
//! day is the Scheduler's contract, not enforced here.

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::core::time::DAY_SECONDS;
use crate::engine::market;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub previous: i64,
    pub price: i64,
    /// The capped adjustment factor actually applied.
    pub factor: f64,
    /// Event count over the trailing 24 hours (floored at 1).
    pub daily_volume: i64,
    /// Event count over the trailing window (floored at 1).
    pub baseline_volume: i64,
    /// Effective window length in days.
    pub window_days: u32,
}

fn activity_volume(conn: &Connection, since: i64, until: i64) -> Result<i64, AgoraError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM activity WHERE ts > ?1 AND ts <= ?2",
        params![since, until],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Run one price-adjustment cycle as of `now` (unix-epoch seconds).
pub fn run_cycle(root: &Path, cfg: &EconomyConfig, now: i64) -> Result<CycleReport, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "pricing.cycle", |conn| {
        let tx = conn.transaction()?;
        let current = market::current_price_conn(&tx)?;

        // The window never exceeds the recorded history, so the engine is
        // well-defined before `average_days` of cycles exist.
        let history: i64 = tx.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))?;
        let window_days = cfg.average_days.min(history.max(1) as u32).max(1);

        // Volume = event count, independent of point sign. Zero-signal days
        // count as 1 so a silent community holds the price instead of
        // collapsing the ratio.
        let daily_volume = activity_volume(&tx, now - DAY_SECONDS, now)?.max(1);
        let baseline_volume =
            activity_volume(&tx, now - i64::from(window_days) * DAY_SECONDS, now)?.max(1);

        let average_daily = baseline_volume as f64 / f64::from(window_days);
        let raw = (daily_volume as f64 / average_daily) * cfg.weight;
        let smoothed = 1.0 + cfg.smoothing * (raw - 1.0);
        let factor = smoothed.clamp(1.0 - cfg.max_adjustment, 1.0 + cfg.max_adjustment);

        // Floor at 1: the stock never becomes worthless.
        let price = ((current as f64 * factor).floor() as i64).max(1);

        tx.execute(
            "INSERT INTO price_history (ts, price) VALUES (?1, ?2)",
            params![now, price],
        )?;
        tx.commit()?;

        Ok(CycleReport {
            previous: current,
            price,
            factor,
            daily_volume,
            baseline_volume,
            window_days,
        })
    })
}
