use agora::core::config::EconomyConfig;
use agora::core::db::{db_connect, economy_db_path, initialize_economy_db};
use agora::core::store::Store;
use agora::core::time::{next_fire, now_local};
use agora::engine::ledger;
use agora::engine::scheduler::Scheduler;
use chrono::{Duration as ChronoDuration, Timelike};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use tempfile::tempdir;

fn setup(cfg: &EconomyConfig) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let root = tmp.path().to_path_buf();
    initialize_economy_db(&root, cfg).unwrap();
    (tmp, root)
}

fn price_rows(root: &PathBuf) -> i64 {
    let conn = db_connect(&economy_db_path(root)).unwrap();
    conn.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))
        .unwrap()
}

/// An offset that puts local wall-clock time near noon, so fire times
/// computed relative to "now" never wrap past midnight during the test.
fn noon_offset_minutes() -> i32 {
    let now = chrono::Utc::now();
    720 - (now.hour() as i32 * 60 + now.minute() as i32)
}

#[test]
fn test_stop_before_fire_writes_nothing() {
    let cfg = EconomyConfig {
        // Fire far from now; local clock pinned near noon.
        fire_time: "23:59".to_string(),
        utc_offset_minutes: noon_offset_minutes(),
        ..Default::default()
    };
    let (_tmp, root) = setup(&cfg);

    let scheduler = Scheduler::start(Store::new(&root), cfg.clone()).unwrap();
    sleep(Duration::from_millis(300));
    scheduler.stop();

    // Only the seed record: a clean stop never leaves a partial price row.
    assert_eq!(price_rows(&root), 1);
}

#[test]
fn test_fires_once_and_runs_both_jobs() {
    let offset_minutes = noon_offset_minutes();
    let offset = chrono::FixedOffset::east_opt(offset_minutes * 60).unwrap();
    let fire = now_local(offset) + ChronoDuration::seconds(3);
    let cfg = EconomyConfig {
        fire_time: fire.format("%H:%M:%S").to_string(),
        utc_offset_minutes: offset_minutes,
        ..Default::default()
    };
    let (_tmp, root) = setup(&cfg);
    ledger::balance(&root, 1, 10, "alice", &cfg).unwrap();

    let scheduler = Scheduler::start(Store::new(&root), cfg.clone()).unwrap();
    let mut fired = false;
    for _ in 0..100 {
        if price_rows(&root) == 2 {
            fired = true;
            break;
        }
        sleep(Duration::from_millis(200));
    }
    scheduler.stop();

    assert!(fired, "price cycle did not fire within the wait budget");
    assert_eq!(ledger::tokens(&root, 1, 10, "alice", &cfg).unwrap(), cfg.token_grant);
}

#[test]
fn test_next_fire_recomputes_from_wall_clock() {
    let offset = chrono::FixedOffset::east_opt(0).unwrap();
    let now = now_local(offset);
    let fire_at = (now + ChronoDuration::hours(1)).time();

    let fire = next_fire(now, fire_at);
    assert!(fire > now);
    assert!(fire - now <= ChronoDuration::hours(1));

    // A fire time already behind us lands tomorrow, never backfilled.
    let past = (now - ChronoDuration::hours(1)).time();
    let fire = next_fire(now, past);
    assert!(fire > now);
    assert!(fire - now >= ChronoDuration::hours(22));
}
