use crate::core::db;
use crate::core::error::AgoraError;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ulid::Ulid;

/// The Ledger Broker is the single writer seam for economy state.
///
/// Every read-modify-write on the store routes through `with_conn`, which
/// serializes access behind a process-wide lock and appends one audit event
/// per operation to `broker.events.jsonl`. Operations on different accounts
/// could in principle proceed in parallel; serializing all of them keeps the
/// atomicity story trivial at this scale.
pub struct LedgerBroker {
    audit_log_path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BrokerEvent {
    pub ts: String,
    pub event_id: String,
    pub actor: String,
    pub op: String,
    pub status: String,
}

impl LedgerBroker {
    pub fn new(root: &Path) -> Self {
        Self {
            audit_log_path: root.join("broker.events.jsonl"),
        }
    }

    /// Execute a closure with a serialized connection to the economy DB.
    ///
    /// The closure receives a mutable connection so callers can open SQLite
    /// transactions for multi-row mutations (buy/sell, debit-after-check).
    /// Rejections (insufficient funds/shares, bad quantity) are audited as
    /// `rejected`; faults as `error`.
    pub fn with_conn<F, R>(
        &self,
        db_path: &Path,
        actor: &str,
        op_name: &str,
        f: F,
    ) -> Result<R, AgoraError>
    where
        F: FnOnce(&mut Connection) -> Result<R, AgoraError>,
    {
        static DB_LOCK: Mutex<()> = Mutex::new(());
        let _lock = DB_LOCK.lock().unwrap();

        let mut conn = db::db_connect(db_path)?;
        let result = f(&mut conn);

        let status = match &result {
            Ok(_) => "success",
            Err(e) if e.is_rejection() => "rejected",
            Err(_) => "error",
        };
        self.log_event(actor, op_name, status)?;

        result
    }

    fn log_event(&self, actor: &str, op: &str, status: &str) -> Result<(), AgoraError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let ev = BrokerEvent {
            ts: crate::core::time::now_epoch_z(),
            event_id: Ulid::new().to_string(),
            actor: actor.to_string(),
            op: op.to_string(),
            status: status.to_string(),
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_log_path)
            .map_err(AgoraError::Io)?;

        writeln!(f, "{}", serde_json::to_string(&ev).unwrap()).map_err(AgoraError::Io)?;
        Ok(())
    }
}
