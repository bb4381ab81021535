use crate::components::{ComponentData, ComponentRegistry};
use crate::events::{event_channel, EcsEvent};
use crate::tests::position;
use crate::error::EcsError;
use serde_json::json;

#[test]
pub fn declare_is_idempotent_by_name() {
	let (events, pending) = event_channel();
	let mut registry = ComponentRegistry::new(events);

	let first = registry.declare("position", position(0, 0));
	let second = registry.declare("position", position(7, 7));

	assert_eq!(first, position(0, 0));
	assert_eq!(second, position(0, 0), "Re-declaring must return the existing template");
	assert_eq!(
		pending.drain(),
		vec![EcsEvent::TemplateDeclared { name: "position".into() }],
		"Only the first declaration publishes an event"
	);
}

#[test]
pub fn lookup_returns_independent_copies() {
	let (events, _pending) = event_channel();
	let mut registry = ComponentRegistry::new(events);
	registry.declare("position", position(0, 0));

	let altered = registry.lookup("position").map(|copy| copy.with("x", 99));
	assert_eq!(altered, Some(position(99, 0)));
	assert_eq!(registry.lookup("position"), Some(position(0, 0)), "The template must be unaffected");
	assert_eq!(registry.lookup("velocity"), None);
}

#[test]
pub fn instantiate_only_overrides_declared_fields() {
	let (events, _pending) = event_channel();
	let mut registry = ComponentRegistry::new(events);
	registry.declare("position", position(0, 3));

	let overrides = ComponentData::new().with("x", 5).with("z", 9);
	let instance = registry.instantiate("position", Some(&overrides));

	assert_eq!(instance, Ok(position(5, 3)), "`z` is not a template field and must be dropped");
}

#[test]
pub fn instantiate_without_overrides_copies_the_template() {
	let (events, _pending) = event_channel();
	let mut registry = ComponentRegistry::new(events);
	registry.declare("position", position(1, 2));

	assert_eq!(registry.instantiate("position", None), Ok(position(1, 2)));
	assert_eq!(registry.instantiate("position", Some(&ComponentData::new())), Ok(position(1, 2)));
}

#[test]
pub fn instantiate_unknown_template_fails() {
	let (events, _pending) = event_channel();
	let registry = ComponentRegistry::new(events);

	assert_eq!(
		registry.instantiate("position", None),
		Err(EcsError::UnknownTemplate("position".into()))
	);
}

#[test]
pub fn retire_reports_whether_the_template_existed() {
	let (events, pending) = event_channel();
	let mut registry = ComponentRegistry::new(events);
	registry.declare("position", position(0, 0));
	pending.drain();

	assert!(registry.retire("position"));
	assert!(!registry.retire("position"));
	assert!(!registry.exists("position"));
	assert_eq!(
		pending.drain(),
		vec![EcsEvent::TemplateRetired { name: "position".into() }]
	);
}

#[test]
pub fn load_is_not_available() {
	let (events, _pending) = event_channel();
	let registry = ComponentRegistry::new(events);

	assert_eq!(
		registry.load("file:components/position.json"),
		Err(EcsError::LoadNotImplemented("file:components/position.json".into()))
	);
	assert_eq!(
		registry.load("db:world.position"),
		Err(EcsError::LoadNotImplemented("db:world.position".into()))
	);
	assert_eq!(
		registry.load("http://example.org/position"),
		Err(EcsError::UnsupportedLoadSource("http://example.org/position".into()))
	);
}

#[test]
pub fn component_data_from_json() {
	let data = ComponentData::from_json(json!({ "name": "test", "hp": 10 }));
	assert_eq!(data, Ok(ComponentData::new().with("name", "test").with("hp", 10)));
	assert_eq!(ComponentData::from_json(json!(null)), Ok(ComponentData::new()));
	assert!(matches!(
		ComponentData::from_json(json!([1, 2])),
		Err(EcsError::InvalidComponentData(_))
	));
}

#[test]
pub fn component_data_displays_as_a_flat_record() {
	assert_eq!(position(1, 2).to_string(), r#"{"x":1,"y":2}"#);
}
