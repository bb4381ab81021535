use crate::entities::{Entity, EntityId, EntityKey, IdGenerator, UuidGenerator};
use crate::components::{ComponentData, ComponentSource, Signature};
use crate::events::{EcsEvent, EventSender};
use crate::error::{EcsError, EcsResult};
use std::collections::BTreeMap;

/// A container for [entities](Entity) and the [component](ComponentData) instances attached to them.
///
/// Guarantees that entity ids are unique and that no entity holds two instances under the same component name.
/// Every structural change is published as an [event](EcsEvent).
pub struct EntityRegistry {
	events: EventSender,
	ids: Box<dyn IdGenerator>,
	entities: BTreeMap<EntityId, Entity>,
}

impl EntityRegistry {
	/// Creates an empty registry generating UUID ids.
	pub fn new(events: EventSender) -> Self {
		Self::with_id_generator(events, UuidGenerator)
	}

	pub fn with_id_generator(events: EventSender, ids: impl IdGenerator + 'static) -> Self {
		Self {
			events,
			ids: Box::new(ids),
			entities: BTreeMap::new(),
		}
	}

	/// Returns the [entity](Entity) with the given id, creating it if needed.
	///
	/// Without an id, or with an empty one, a fresh id is generated. A newly created entity has no components.
	/// Only creation publishes [`EcsEvent::EntityCreated`].
	pub fn ensure(&mut self, id: Option<&str>) -> &Entity {
		let id = match id.filter(|id| !id.is_empty()) {
			Some(id) => EntityId::from(id),
			None => self.fresh_id(),
		};

		if !self.entities.contains_key(&id) {
			self.entities.insert(id.clone(), Entity::new(id.clone()));
			self.events.publish(EcsEvent::EntityCreated { entity: id.clone() });
		}

		&self.entities[&id]
	}

	pub fn lookup(&self, entity: impl EntityKey) -> Option<&Entity> {
		self.entities.get(entity.entity_id())
	}

	pub fn exists(&self, entity: impl EntityKey) -> bool {
		self.entities.contains_key(entity.entity_id())
	}

	/// Removes an [entity](Entity), returning whether it existed.
	///
	/// [`EcsEvent::EntityRemoved`] carries the entity as it was before deletion,
	/// so subscribers can still see its final component set.
	pub fn remove(&mut self, entity: impl EntityKey) -> bool {
		match self.entities.remove(entity.entity_id()) {
			None => false,
			Some(removed) => {
				self.events.publish(EcsEvent::EntityRemoved { entity: removed });
				true
			},
		}
	}

	/// Iterates every [entity](Entity) carrying all components of `signature`, extra components allowed.
	pub fn query_by_signature<'l>(&'l self, signature: &'l Signature) -> impl Iterator<Item = &'l Entity> + 'l {
		self.entities.values().filter(move |entity| entity.matches(signature))
	}

	/// Attaches an instance of the template `component` to an [entity](Entity).
	///
	/// Returns `Ok(false)` without touching the existing instance if the entity already carries that component.
	/// Fails with [`EcsError::UnknownEntity`] if the entity does not exist,
	/// or with whatever error `source` reports while building the instance.
	pub fn attach_component(
		&mut self, entity: impl EntityKey, component: &str, overrides: Option<&ComponentData>,
		source: &impl ComponentSource,
	) -> EcsResult<bool> {
		let id = entity.entity_id();
		let entity = self
			.entities
			.get_mut(id)
			.ok_or_else(|| EcsError::UnknownEntity(id.to_owned()))?;

		if entity.has_component(component) {
			return Ok(false);
		}

		let instance = source.instantiate(component, overrides)?;
		entity.components.insert(component.to_owned(), instance);

		self.events.publish(EcsEvent::ComponentAdded {
			entity: entity.id().clone(),
			component: component.to_owned(),
		});
		Ok(true)
	}

	/// Returns true if the [entity](Entity) exists and carries `component`. Never fails.
	pub fn has_component(&self, entity: impl EntityKey, component: &str) -> bool {
		self.lookup(entity).map_or(false, |entity| entity.has_component(component))
	}

	/// Detaches `component` from an [entity](Entity), returning whether it was present.
	pub fn detach_component(&mut self, entity: impl EntityKey, component: &str) -> bool {
		let Some(entity) = self.entities.get_mut(entity.entity_id()) else {
			return false;
		};

		if entity.components.remove(component).is_none() {
			return false;
		}

		self.events.publish(EcsEvent::ComponentRemoved {
			entity: entity.id().clone(),
			component: component.to_owned(),
		});
		true
	}

	/// Iterates all [entities](Entity) in id order.
	pub fn iter(&self) -> impl Iterator<Item = &Entity> {
		self.entities.values()
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	fn fresh_id(&mut self) -> EntityId {
		loop {
			let id = self.ids.next_id();
			if !self.entities.contains_key(&id) {
				return id;
			}
		}
	}
}
