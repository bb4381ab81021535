use crate::error::{EcsError, EcsResult};
use std::time::Duration;
use serde::Deserialize;

/// Runtime configuration of an [EcsContext](crate::context::EcsContext).
///
/// - `tick_rate`: target ticks per second when the run loop is rate limited
/// - `limit_tick_rate`: whether [`run`](crate::context::EcsContext::run) waits between ticks or runs at full speed
/// - `log_events`: whether lifecycle events are traced at debug level
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
	pub tick_rate: f64,
	pub limit_tick_rate: bool,
	pub log_events: bool,
}

impl Default for EcsConfig {
	fn default() -> Self {
		Self {
			tick_rate: 60.0,
			limit_tick_rate: false,
			log_events: true,
		}
	}
}

impl EcsConfig {
	/// Parses and validates a TOML document. Missing keys keep their default value.
	pub fn from_toml_str(source: &str) -> EcsResult<Self> {
		let config: EcsConfig = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// A rate-limited loop needs a positive tick rate whose interval fits in a [Duration].
	pub fn validate(&self) -> EcsResult<()> {
		if self.limit_tick_rate && self.rate_interval().is_none() {
			return Err(EcsError::InvalidConfig(format!(
				"tick_rate must be a positive number of ticks per second with a representable interval, got {}",
				self.tick_rate
			)));
		}
		Ok(())
	}

	/// The time between two ticks, or `None` when the loop runs at full speed.
	pub fn tick_interval(&self) -> Option<Duration> {
		if !self.limit_tick_rate {
			return None;
		}
		self.rate_interval()
	}

	fn rate_interval(&self) -> Option<Duration> {
		if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
			return None;
		}
		Duration::try_from_secs_f64(1.0 / self.tick_rate).ok()
	}
}
