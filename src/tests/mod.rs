mod config_tests;
mod scheduler_tests;
mod component_registry_tests;

use crate::components::ComponentData;

pub(crate) fn position(x: i64, y: i64) -> ComponentData {
	ComponentData::new().with("x", x).with("y", y)
}
