use crate::config::EcsConfig;
use crate::error::EcsError;
use crate::EcsContext;
use std::time::Duration;

#[test]
pub fn missing_keys_keep_their_defaults() {
	let config = EcsConfig::from_toml_str("limit_tick_rate = true").unwrap();

	assert_eq!(
		config,
		EcsConfig {
			limit_tick_rate: true,
			..EcsConfig::default()
		}
	);
	assert_eq!(EcsConfig::from_toml_str("").unwrap(), EcsConfig::default());
}

#[test]
pub fn tick_interval_follows_the_rate() {
	let config = EcsConfig::from_toml_str("tick_rate = 50.0\nlimit_tick_rate = true").unwrap();
	assert_eq!(config.tick_interval(), Some(Duration::from_millis(20)));

	let unlimited = EcsConfig {
		limit_tick_rate: false,
		..config
	};
	assert_eq!(unlimited.tick_interval(), None, "An unlimited loop never waits");
}

#[test]
pub fn invalid_rate_is_rejected() {
	let result = EcsConfig::from_toml_str("tick_rate = 0.0\nlimit_tick_rate = true");
	assert!(matches!(result, Err(EcsError::InvalidConfig(_))));

	let config = EcsConfig {
		tick_rate: -1.0,
		limit_tick_rate: true,
		log_events: false,
	};
	assert!(EcsContext::with_config(config).is_err());

	let ignored = EcsConfig {
		tick_rate: 0.0,
		..EcsConfig::default()
	};
	assert!(ignored.validate().is_ok(), "The rate only matters when it is limited");
}

#[test]
pub fn malformed_toml_is_a_config_error() {
	assert!(matches!(
		EcsConfig::from_toml_str("tick_rate = \"fast\""),
		Err(EcsError::InvalidConfig(_))
	));
}

#[test]
pub fn unrepresentable_interval_is_rejected() {
	let result = EcsConfig::from_toml_str("tick_rate = 1e-300\nlimit_tick_rate = true");
	assert!(matches!(result, Err(EcsError::InvalidConfig(_))));

	let config = EcsConfig {
		tick_rate: 1e-300,
		limit_tick_rate: true,
		..EcsConfig::default()
	};
	assert!(EcsContext::with_config(config.clone()).is_err());
	assert_eq!(config.tick_interval(), None, "An interval that does not fit is never built");
}
