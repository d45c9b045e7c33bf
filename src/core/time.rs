//! Shared timestamp helpers and the daily fire-time computation.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use ulid::Ulid;

pub const DAY_SECONDS: i64 = 86_400;

/// Unix-epoch seconds, the timestamp format of all store rows.
pub fn now_epoch() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    format!("{}Z", now_epoch())
}

pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

/// Wall-clock "now" in the configured community offset.
pub fn now_local(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// The next instant at which the daily jobs should fire: today at `fire_at`
/// if that is still ahead of `now`, otherwise tomorrow at `fire_at`.
///
/// Pure function of its inputs, so a restarted process recomputes the
/// schedule from wall clock alone. Days the process slept through are not
/// backfilled; the next fire simply resumes the once-daily cadence.
pub fn next_fire(now: DateTime<FixedOffset>, fire_at: NaiveTime) -> DateTime<FixedOffset> {
    // A fixed offset has no DST gaps, so the local datetime is always valid.
    let today = now.with_time(fire_at).unwrap();
    if today > now {
        today
    } else {
        today + Duration::seconds(DAY_SECONDS)
    }
}

/// Standard command response envelope shape used across CLI surfaces.
pub fn command_envelope(cmd: &str, status: &str, extra: JsonValue) -> JsonValue {
    let mut base = serde_json::json!({
        "ts": now_epoch_z(),
        "event_id": new_event_id(),
        "cmd": cmd,
        "status": status
    });
    if let (Some(base_obj), Some(extra_obj)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_obj {
            base_obj.insert(k.clone(), v.clone());
        }
    }
    base
}
