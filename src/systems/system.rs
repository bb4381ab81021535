use crate::components::{ComponentData, Signature};
use crate::entities::{Entity, EntityId, EntityRegistry};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The processing routine of a [System], invoked once per attached entity per tick.
pub type SystemRoutine = Box<dyn FnMut(&EntityId, &ComponentView<'_>)>;

/// A named component [signature](Signature) plus the routine applied to every entity attached to it.
pub struct System {
	name: String,
	required: Signature,
	routine: SystemRoutine,
	entities: BTreeSet<EntityId>,
}

impl System {
	pub(crate) fn new(name: String, required: Signature, routine: SystemRoutine) -> Self {
		Self {
			name,
			required,
			routine,
			entities: BTreeSet::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The components an entity must carry to be attached.
	pub fn required(&self) -> &Signature {
		&self.required
	}

	/// The ids of the currently attached entities.
	pub fn entities(&self) -> impl Iterator<Item = &EntityId> {
		self.entities.iter()
	}

	pub fn has_entity(&self, entity: &str) -> bool {
		self.entities.contains(entity)
	}

	pub fn entity_count(&self) -> usize {
		self.entities.len()
	}

	pub(crate) fn insert_entity(&mut self, entity: EntityId) -> bool {
		self.entities.insert(entity)
	}

	pub(crate) fn remove_entity(&mut self, entity: &str) -> bool {
		self.entities.remove(entity)
	}

	/// Runs the routine over every attached entity, returning how many invocations happened.
	///
	/// Attached entities are resolved through `registry`, so the routine sees their current components.
	pub(crate) fn update(&mut self, registry: &EntityRegistry) -> usize {
		let Self {
			required,
			routine,
			entities,
			..
		} = self;

		let mut invoked = 0;
		for id in entities.iter() {
			let Some(entity) = registry.lookup(id) else {
				continue;
			};
			if !required.is_satisfied_by(entity) {
				continue;
			}

			routine(id, &ComponentView::new(entity, required));
			invoked += 1;
		}
		invoked
	}
}

impl fmt::Debug for System {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("System")
			.field("name", &self.name)
			.field("required", &self.required)
			.field("entities", &self.entities)
			.finish_non_exhaustive()
	}
}

/// A read-only view over the components a [System] requires, for a single entity.
///
/// Components on the entity outside the system's signature are not reachable through the view.
pub struct ComponentView<'l> {
	entity: &'l Entity,
	signature: &'l Signature,
}

impl<'l> ComponentView<'l> {
	pub(crate) fn new(entity: &'l Entity, signature: &'l Signature) -> Self {
		Self { entity, signature }
	}

	pub fn get(&self, name: &str) -> Option<&'l ComponentData> {
		if !self.signature.contains(name) {
			return None;
		}
		self.entity.component(name)
	}

	/// Iterates the visible components in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&'l str, &'l ComponentData)> + 'l {
		let entity = self.entity;
		self.signature
			.iter()
			.filter_map(move |name| entity.component(name).map(|data| (name.as_str(), data)))
	}

	pub fn names(&self) -> impl Iterator<Item = &'l str> + 'l {
		self.iter().map(|(name, _)| name)
	}

	pub fn len(&self) -> usize {
		self.iter().count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copies the visible components out of the view.
	pub fn to_owned_map(&self) -> BTreeMap<String, ComponentData> {
		self.iter().map(|(name, data)| (name.to_owned(), data.clone())).collect()
	}
}
