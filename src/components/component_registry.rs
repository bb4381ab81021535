use crate::events::{EcsEvent, EventSender};
use crate::error::{EcsError, EcsResult};
use crate::components::ComponentData;
use std::collections::BTreeMap;

/// Anything able to build component instances from a template name.
///
/// The [entity registry](crate::entities::EntityRegistry) receives one of these whenever it attaches a component,
/// so it never needs to know where templates live.
pub trait ComponentSource {
	/// Builds an instance of the template `name`, customised by `overrides`.
	fn instantiate(&self, name: &str, overrides: Option<&ComponentData>) -> EcsResult<ComponentData>;
}

/// A container for named component templates.
///
/// Every read hands out an independent copy, so callers can never alter a declared template.
pub struct ComponentRegistry {
	events: EventSender,
	templates: BTreeMap<String, ComponentData>,
}

impl ComponentRegistry {
	pub fn new(events: EventSender) -> Self {
		Self {
			events,
			templates: BTreeMap::new(),
		}
	}

	/// Declares the template `name` with `data` as its default fields.
	/// If the template already exists it is left unchanged and a copy of it is returned.
	pub fn declare(&mut self, name: &str, data: ComponentData) -> ComponentData {
		if let Some(existing) = self.templates.get(name) {
			return existing.clone();
		}

		self.templates.insert(name.to_owned(), data.clone());
		self.events.publish(EcsEvent::TemplateDeclared { name: name.to_owned() });
		data
	}

	/// Returns a copy of the template `name`.
	pub fn lookup(&self, name: &str) -> Option<ComponentData> {
		self.templates.get(name).cloned()
	}

	pub fn exists(&self, name: &str) -> bool {
		self.templates.contains_key(name)
	}

	/// Builds an instance of the template `name`.
	///
	/// Without overrides (or with empty ones) the instance is a plain copy of the template;
	/// otherwise see [`ComponentData::instantiate_with_overrides`].
	pub fn instantiate(&self, name: &str, overrides: Option<&ComponentData>) -> EcsResult<ComponentData> {
		let template = self
			.templates
			.get(name)
			.ok_or_else(|| EcsError::UnknownTemplate(name.to_owned()))?;

		match overrides {
			Some(overrides) if !overrides.is_empty() => Ok(template.instantiate_with_overrides(overrides)),
			_ => Ok(template.clone()),
		}
	}

	/// Removes the template `name`, returning whether it existed.
	/// Instances already attached to entities are not affected.
	pub fn retire(&mut self, name: &str) -> bool {
		if self.templates.remove(name).is_none() {
			return false;
		}

		self.events.publish(EcsEvent::TemplateRetired { name: name.to_owned() });
		true
	}

	/// Loads a template from an external source.
	///
	/// Recognised sources are `file:path/to/component` and `db:database.component`,
	/// neither of which has a backend yet, so this always fails.
	pub fn load(&self, source: &str) -> EcsResult<ComponentData> {
		if source.starts_with("file:") || source.starts_with("db:") {
			return Err(EcsError::LoadNotImplemented(source.to_owned()));
		}

		Err(EcsError::UnsupportedLoadSource(source.to_owned()))
	}

	/// The declared template names, in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.templates.keys().map(String::as_str)
	}

	/// Copies of all declared templates, keyed by name.
	pub fn all(&self) -> Vec<(String, ComponentData)> {
		self.templates.iter().map(|(name, data)| (name.clone(), data.clone())).collect()
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

impl ComponentSource for ComponentRegistry {
	fn instantiate(&self, name: &str, overrides: Option<&ComponentData>) -> EcsResult<ComponentData> {
		ComponentRegistry::instantiate(self, name, overrides)
	}
}
