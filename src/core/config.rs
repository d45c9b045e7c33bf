//! Startup configuration for the economy engine.
//!
//! Read once from `agora.toml` at the store root; a missing file means all
//! defaults. Every field has a default so partial files stay valid.

use crate::core::error::AgoraError;
use crate::core::schemas;
use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Seed price for the very first price record.
    pub initial_price: i64,
    /// Points granted once when an account is first observed.
    pub new_member_points: i64,
    /// Shares granted once when an account is first observed.
    pub new_member_shares: i64,
    /// Baseline window length for the price adjustment, in days.
    pub average_days: u32,
    /// Reserved tuning knob on the raw activity factor.
    pub weight: f64,
    /// Blend weight damping the raw activity signal (0 = never move).
    pub smoothing: f64,
    /// Hard ceiling on the fractional price change per cycle.
    pub max_adjustment: f64,
    /// Local wall-clock time of the daily fire, "HH:MM" or "HH:MM:SS".
    pub fire_time: String,
    /// Community timezone as minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Generation tokens granted per daily replenishment.
    pub token_grant: i64,
    /// Cap on the generation-token counter.
    pub max_tokens: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_price: 100,
            new_member_points: 0,
            new_member_shares: 0,
            average_days: 30,
            weight: 1.0,
            smoothing: 0.1,
            max_adjustment: 0.05,
            fire_time: "00:00".to_string(),
            utc_offset_minutes: 0,
            token_grant: 4,
            max_tokens: 20,
        }
    }
}

impl EconomyConfig {
    pub fn load(root: &Path) -> Result<Self, AgoraError> {
        let path = root.join(schemas::CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(AgoraError::Io)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|e| AgoraError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AgoraError> {
        if self.initial_price <= 0 {
            return Err(AgoraError::Config("initial_price must be > 0".into()));
        }
        if self.average_days == 0 {
            return Err(AgoraError::Config("average_days must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(AgoraError::Config("smoothing must be within [0, 1]".into()));
        }
        if !(0.0..1.0).contains(&self.max_adjustment) {
            return Err(AgoraError::Config("max_adjustment must be within [0, 1)".into()));
        }
        if self.new_member_points < 0 || self.new_member_shares < 0 {
            return Err(AgoraError::Config("new-member grants must be >= 0".into()));
        }
        if self.token_grant < 0 || self.max_tokens < 0 {
            return Err(AgoraError::Config("token grant and cap must be >= 0".into()));
        }
        self.fire_at()?;
        self.tz_offset()?;
        Ok(())
    }

    pub fn fire_at(&self) -> Result<NaiveTime, AgoraError> {
        NaiveTime::parse_from_str(&self.fire_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.fire_time, "%H:%M"))
            .map_err(|_| {
                AgoraError::Config(format!("fire_time '{}' is not HH:MM[:SS]", self.fire_time))
            })
    }

    pub fn tz_offset(&self) -> Result<FixedOffset, AgoraError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AgoraError::Config(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            ))
        })
    }
}
