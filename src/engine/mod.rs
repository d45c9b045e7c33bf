//! Economy subsystems: the points ledger, activity ingestion, the stock
//! market, the gamble, the price-adjustment cycle, token replenishment, and
//! the daily scheduler that drives the two jobs.

pub mod activity;
pub mod gamble;
pub mod ledger;
pub mod market;
pub mod pricing;
pub mod replenish;
pub mod scheduler;
