use crate::systems::{ComponentView, System, SystemRoutine};
use crate::entities::{Entity, EntityId, EntityKey, EntityRegistry};
use crate::events::{EcsEvent, EventSender};
use crate::components::Signature;

/// A container for [systems](System), kept in declaration order.
///
/// Membership of entities in systems is only ever changed here, and only for entities carrying
/// every component the system requires.
/// Attachment is probed speculatively, so rejections are reported as `false` rather than errors.
pub struct SystemRegistry {
	events: EventSender,
	systems: Vec<System>,
}

impl SystemRegistry {
	pub fn new(events: EventSender) -> Self {
		Self {
			events,
			systems: Vec::new(),
		}
	}

	/// Declares a [system](System) with no attached entities.
	/// If a system with that name already exists it is returned unchanged and `routine` is discarded.
	pub fn declare(
		&mut self, name: &str, required: Signature, routine: impl FnMut(&EntityId, &ComponentView<'_>) + 'static,
	) -> &System {
		let index = self.declare_at(name, required, Box::new(routine));
		&self.systems[index]
	}

	/// Same as [`declare`](Self::declare), returning the position of the system in declaration order.
	pub(crate) fn declare_at(&mut self, name: &str, required: Signature, routine: SystemRoutine) -> usize {
		if let Some(index) = self.position(name) {
			return index;
		}

		self.systems.push(System::new(name.to_owned(), required, routine));
		self.events.publish(EcsEvent::SystemDeclared { name: name.to_owned() });
		self.systems.len() - 1
	}

	pub(crate) fn at(&self, index: usize) -> &System {
		&self.systems[index]
	}

	pub fn lookup(&self, name: &str) -> Option<&System> {
		self.systems.iter().find(|system| system.name() == name)
	}

	pub fn exists(&self, name: &str) -> bool {
		self.position(name).is_some()
	}

	/// Iterates the [systems](System) whose signature includes every name in `names`.
	///
	/// Used to find the systems affected by a change to a given component.
	pub fn query_by_signature<'l, S: AsRef<str>>(&'l self, names: &'l [S]) -> impl Iterator<Item = &'l System> + 'l {
		self.systems.iter().filter(move |system| system.required().contains_all(names))
	}

	/// Attaches `entity` to the system `name`.
	///
	/// Succeeds only if the system exists, the entity is not attached yet and it carries every required component.
	pub fn attach(&mut self, name: &str, entity: &Entity) -> bool {
		let Some(system) = self.systems.iter_mut().find(|system| system.name() == name) else {
			return false;
		};

		if system.has_entity(entity.id().as_str()) || !system.required().is_satisfied_by(entity) {
			return false;
		}

		system.insert_entity(entity.id().clone());
		self.events.publish(EcsEvent::EntityAttached {
			entity: entity.id().clone(),
			system: name.to_owned(),
		});
		true
	}

	/// Detaches `entity` from the system `name`, returning whether it was attached.
	pub fn detach(&mut self, name: &str, entity: impl EntityKey) -> bool {
		let Some(system) = self.systems.iter_mut().find(|system| system.name() == name) else {
			return false;
		};

		let id = entity.entity_id();
		if !system.remove_entity(id) {
			return false;
		}

		self.events.publish(EcsEvent::EntityDetached {
			entity: EntityId::from(id),
			system: name.to_owned(),
		});
		true
	}

	/// Removes the system `name` and its attachments, returning whether it existed.
	pub fn retire(&mut self, name: &str) -> bool {
		let Some(index) = self.position(name) else {
			return false;
		};

		self.systems.remove(index);
		self.events.publish(EcsEvent::SystemRetired { name: name.to_owned() });
		true
	}

	/// Iterates all [systems](System) in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &System> {
		self.systems.iter()
	}

	/// The system names in declaration order.
	pub fn names(&self) -> Vec<String> {
		self.systems.iter().map(|system| system.name().to_owned()).collect()
	}

	pub fn len(&self) -> usize {
		self.systems.len()
	}

	pub fn is_empty(&self) -> bool {
		self.systems.is_empty()
	}

	/// Runs every system once over its attached entities, in declaration order.
	pub(crate) fn run_systems(&mut self, entities: &EntityRegistry) -> usize {
		self.systems.iter_mut().map(|system| system.update(entities)).sum()
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.systems.iter().position(|system| system.name() == name)
	}
}
