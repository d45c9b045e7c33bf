//! Shared primitives for the economy engine: the store handle, the serialized
//! DB broker, schema DDL, configuration, timestamps, and the error taxonomy.

pub mod broker;
pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod schemas;
pub mod store;
pub mod time;
