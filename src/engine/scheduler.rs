//! Process-wide daily scheduler for the price cycle and token replenishment.
//!
//! One background thread waits until the configured local wall-clock fire
//! time, runs both jobs, and recomputes the next fire instant from wall
//! clock. Shutdown interrupts the wait before any job write starts, so a
//! stopping process never leaves a partial price record.

use crate::core::config::EconomyConfig;
use crate::core::error::AgoraError;
use crate::core::store::Store;
use crate::core::time::{self, command_envelope};
use crate::engine::{pricing, replenish};
use chrono::{FixedOffset, NaiveTime};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

pub struct Scheduler {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Validate the schedule configuration and spawn the timer thread.
    pub fn start(store: Store, cfg: EconomyConfig) -> Result<Self, AgoraError> {
        let fire_at = cfg.fire_at()?;
        let offset = cfg.tz_offset()?;
        let (shutdown, rx) = mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("agora-scheduler".to_string())
            .spawn(move || run_loop(store, cfg, fire_at, offset, rx))
            .map_err(AgoraError::Io)?;
        Ok(Self { shutdown, handle })
    }

    /// Request shutdown and join the timer thread.
    pub fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.join();
    }
}

fn run_loop(
    store: Store,
    cfg: EconomyConfig,
    fire_at: NaiveTime,
    offset: FixedOffset,
    rx: Receiver<()>,
) {
    loop {
        let now = time::now_local(offset);
        let fire = time::next_fire(now, fire_at);
        let wait = (fire - now).to_std().unwrap_or(Duration::ZERO);
        match rx.recv_timeout(wait) {
            // Clean stop: exit before any job write.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => run_jobs(&store, &cfg),
        }
    }
}

/// Run both daily jobs. A failed job is logged and left for the next cycle;
/// there is no retry and no backfill of missed days.
fn run_jobs(store: &Store, cfg: &EconomyConfig) {
    match pricing::run_cycle(&store.root, cfg, time::now_epoch()) {
        Ok(report) => println!(
            "{}",
            command_envelope(
                "scheduler.cycle",
                "ok",
                serde_json::json!({
                    "previous": report.previous,
                    "price": report.price,
                    "factor": report.factor,
                    "daily_volume": report.daily_volume,
                })
            )
        ),
        Err(e) => eprintln!(
            "{}",
            command_envelope("scheduler.cycle", "error", serde_json::json!({ "error": e.to_string() }))
        ),
    }

    match replenish::run_grant(&store.root, cfg) {
        Ok(report) => println!(
            "{}",
            command_envelope(
                "scheduler.replenish",
                "ok",
                serde_json::json!({ "replenished": report.replenished, "grant": report.grant })
            )
        ),
        Err(e) => eprintln!(
            "{}",
            command_envelope("scheduler.replenish", "error", serde_json::json!({ "error": e.to_string() }))
        ),
    }
}
