//! Activity Recorder: the single ingestion point for engagement events.
//!
//! The chat-gateway collaborator calls [`record`] for each qualifying message
//! or reaction change. One call is one logical operation: register the
//! account if it is new (the bootstrap grant happens before the event's own
//! delta), append the activity row, then apply the point delta.

use crate::core::broker::LedgerBroker;
use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::core::time;
use crate::engine::ledger;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Message,
    ReactionAdd,
    ReactionRemove,
}

impl ActivityKind {
    /// Canonical point delta carried by the event.
    pub fn delta(self) -> i64 {
        match self {
            ActivityKind::Message | ActivityKind::ReactionAdd => 1,
            ActivityKind::ReactionRemove => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Message => "message",
            ActivityKind::ReactionAdd => "reaction_add",
            ActivityKind::ReactionRemove => "reaction_remove",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(ActivityKind::Message),
            "reaction_add" => Ok(ActivityKind::ReactionAdd),
            "reaction_remove" => Ok(ActivityKind::ReactionRemove),
            other => Err(AgoraError::Validation(format!(
                "unknown activity kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedActivity {
    pub kind: ActivityKind,
    pub delta: i64,
    /// True when this event registered the account (bootstrap grant applied).
    pub registered: bool,
    pub balance: i64,
}

/// Ingest one activity event. Point removal from a retraction floors at zero:
/// a member who already spent their points does not go negative when a
/// reaction is withdrawn, but the activity row is appended either way.
pub fn record(
    root: &Path,
    member_id: i64,
    community_id: i64,
    display_name: &str,
    kind: ActivityKind,
    cfg: &EconomyConfig,
) -> Result<RecordedActivity, AgoraError> {
    let broker = LedgerBroker::new(root);
    broker.with_conn(&db::economy_db_path(root), "agora", "activity.record", |conn| {
        let tx = conn.transaction()?;
        let registered = ledger::ensure_account(&tx, member_id, community_id, display_name, cfg)?;
        let delta = kind.delta();
        tx.execute(
            "INSERT INTO activity (ts, member_id, community_id, kind, delta)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![time::now_epoch(), member_id, community_id, kind.as_str(), delta],
        )?;
        tx.execute(
            "UPDATE accounts SET points = MAX(points + ?3, 0)
             WHERE member_id = ?1 AND community_id = ?2",
            params![member_id, community_id, delta],
        )?;
        let balance = ledger::account_points(&tx, member_id, community_id)?;
        tx.commit()?;
        Ok(RecordedActivity {
            kind,
            delta,
            registered,
            balance,
        })
    })
}
