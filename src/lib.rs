//! Agora: a community virtual-economy engine.
//!
//! Members earn points for observed activity (messages, reactions), wager
//! them double-or-nothing, or convert them into a synthetic stock whose price
//! is revalued once per day from aggregate engagement.
//!
//! # Architecture
//!
//! All durable state lives in one SQLite store owned by the Ledger Broker,
//! the single writer seam: every read-modify-write routes through it and is
//! serialized behind a process-wide lock, with one JSONL audit event per
//! operation.
//!
//! - [`core`]: store handle, broker, schema DDL, configuration, timestamps,
//!   error taxonomy.
//! - [`engine`]: the economy subsystems — points ledger, activity recorder,
//!   stock market, gamble, price-adjustment cycle, token replenishment, and
//!   the daily scheduler.
//! - [`cli`]: the command surface consumed by collaborators (chat gateway,
//!   command dispatcher).
//!
//! # Data flow
//!
//! Activity events feed the ledger (immediate point credit) and the
//! append-only activity log. The scheduler fires once per local calendar day,
//! runs the price cycle (one new price record, smoothed and capped at +/-5%)
//! and the generation-token grant. Trades price at the newest record and
//! settle points and shares in one transaction.

pub mod cli;
pub mod core;
pub mod engine;
