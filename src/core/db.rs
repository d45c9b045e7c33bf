use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::error::AgoraError;
use crate::core::schemas;
use crate::core::time;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &Path) -> Result<Connection, AgoraError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
    conn.execute("PRAGMA foreign_keys=ON;", [])?;
    Ok(conn)
}

pub fn economy_db_path(root: &Path) -> PathBuf {
    root.join(schemas::ECONOMY_DB_NAME)
}

/// Create the schema and seed the price log with the configured initial price.
/// Seeding happens exactly once; re-running init against an existing store is
/// a no-op on the price history.
pub fn initialize_economy_db(root: &Path, cfg: &EconomyConfig) -> Result<(), AgoraError> {
    fs::create_dir_all(root).map_err(AgoraError::Io)?;

    let broker = LedgerBroker::new(root);
    let db_path = economy_db_path(root);
    broker.with_conn(&db_path, "agora", "store.init", |conn| {
        conn.execute(schemas::ACCOUNTS_SCHEMA, [])?;
        conn.execute(schemas::ACTIVITY_SCHEMA, [])?;
        conn.execute(schemas::ACTIVITY_TS_INDEX, [])?;
        conn.execute(schemas::PRICE_HISTORY_SCHEMA, [])?;

        let seeded: i64 = conn.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))?;
        if seeded == 0 {
            conn.execute(
                "INSERT INTO price_history (ts, price) VALUES (?1, ?2)",
                params![time::now_epoch(), cfg.initial_price],
            )?;
        }
        Ok(())
    })
}
