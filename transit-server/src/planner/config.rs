//! Routing configuration for the planner.

use chrono::Duration;

/// Error reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but is not an integer in `0..=max`
    #[error("{var} must be an integer from 0 to {max}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        value: String,
        max: i64,
    },
}

/// Configuration parameters for routing and time estimates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Cost added whenever the rider changes line.
    pub transfer_penalty: u32,

    /// Riding time per block (minutes).
    pub minutes_per_hop: i64,

    /// Waiting time per transfer (minutes).
    pub minutes_per_transfer: i64,

    /// Width of the rider-facing estimate range, as a percentage either
    /// side of the total.
    pub estimate_spread_percent: i64,
}

impl RoutingConfig {
    pub const TRANSFER_PENALTY_VAR: &'static str = "TRANSIT_TRANSFER_PENALTY";
    pub const MINUTES_PER_HOP_VAR: &'static str = "TRANSIT_MINUTES_PER_HOP";
    pub const MINUTES_PER_TRANSFER_VAR: &'static str = "TRANSIT_MINUTES_PER_TRANSFER";

    /// Largest accepted transfer penalty.
    pub const MAX_TRANSFER_PENALTY: u32 = 10_000;

    /// Largest accepted per-hop or per-transfer time: one day.
    pub const MAX_MINUTES: i64 = 1_440;

    /// Create a new configuration with the given parameters.
    pub fn new(
        transfer_penalty: u32,
        minutes_per_hop: i64,
        minutes_per_transfer: i64,
        estimate_spread_percent: i64,
    ) -> Self {
        Self {
            transfer_penalty,
            minutes_per_hop,
            minutes_per_transfer,
            estimate_spread_percent,
        }
    }

    /// Defaults overridden by any `TRANSIT_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::TRANSFER_PENALTY_VAR) {
            config.transfer_penalty =
                parse_var(Self::TRANSFER_PENALTY_VAR, &value, Self::MAX_TRANSFER_PENALTY)?;
        }
        if let Some(value) = lookup(Self::MINUTES_PER_HOP_VAR) {
            config.minutes_per_hop = parse_var(Self::MINUTES_PER_HOP_VAR, &value, Self::MAX_MINUTES)?;
        }
        if let Some(value) = lookup(Self::MINUTES_PER_TRANSFER_VAR) {
            config.minutes_per_transfer =
                parse_var(Self::MINUTES_PER_TRANSFER_VAR, &value, Self::MAX_MINUTES)?;
        }

        Ok(config)
    }

    /// Returns the riding time per block, or `None` if it is out of range.
    pub fn per_hop(&self) -> Option<Duration> {
        Duration::try_minutes(self.minutes_per_hop)
    }

    /// Returns the waiting time per transfer, or `None` if it is out of range.
    pub fn per_transfer(&self) -> Option<Duration> {
        Duration::try_minutes(self.minutes_per_transfer)
    }
}

fn parse_var<T>(var: &'static str, value: &str, max: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialOrd + Copy + Into<i64>,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|v| *v >= T::default() && *v <= max)
        .ok_or_else(|| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            max: max.into(),
        })
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            transfer_penalty: 15,
            minutes_per_hop: 1,
            minutes_per_transfer: 5,
            estimate_spread_percent: 10,
        }
    }
}
