//! Centralized schema definitions for the economy store.
//!
//! Agora keeps all durable state in a single SQLite database, `economy.db`:
//! 1. `accounts`: one row per member x community (points, shares, tokens).
//! 2. `activity`: append-only log of observed engagement events.
//! 3. `price_history`: append-only log of stock prices; the newest row is
//!    the current price.

pub const ECONOMY_DB_NAME: &str = "economy.db";
pub const CONFIG_FILE_NAME: &str = "agora.toml";

/// Account rows are created lazily on first observed activity or first ledger
/// query and are never deleted. `rowid` is the stable insertion order used to
/// break leaderboard ties. The CHECK constraints back the non-negative
/// invariants at the storage layer.
pub const ACCOUNTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        member_id INTEGER NOT NULL,
        community_id INTEGER NOT NULL,
        display_name TEXT NOT NULL DEFAULT '',
        points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
        shares INTEGER NOT NULL DEFAULT 0 CHECK (shares >= 0),
        tokens INTEGER NOT NULL DEFAULT 0 CHECK (tokens >= 0),
        created_at INTEGER NOT NULL,
        PRIMARY KEY (member_id, community_id)
    )
";

pub const ACTIVITY_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS activity (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ts INTEGER NOT NULL,
        member_id INTEGER NOT NULL,
        community_id INTEGER NOT NULL,
        kind TEXT NOT NULL,
        delta INTEGER NOT NULL
    )
";

/// The pricing engine scans bounded trailing windows by timestamp.
pub const ACTIVITY_TS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_activity_ts ON activity(ts)";

pub const PRICE_HISTORY_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS price_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ts INTEGER NOT NULL,
        price INTEGER NOT NULL CHECK (price > 0)
    )
";
