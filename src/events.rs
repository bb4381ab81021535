//! Lifecycle events published by the registries and the [`EcsContext`](crate::context::EcsContext).
//!
//! Registries never call each other. Each one publishes typed [`EcsEvent`] values through the
//! [`EventSender`] it was constructed with, and the context drains the matching [`EventReceiver`],
//! applies its reactions and then forwards every event to external listeners.

use crossbeam_channel::{unbounded, Receiver, Sender};
use crate::entities::{Entity, EntityId};
use std::fmt;

/// A lifecycle event together with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum EcsEvent {
	/// An entity was created.
	EntityCreated { entity: EntityId },
	/// An entity was removed. The payload is the entity as it was right before deletion.
	EntityRemoved { entity: Entity },
	/// A component instance was attached to an entity.
	ComponentAdded { entity: EntityId, component: String },
	/// A component instance was detached from an entity.
	ComponentRemoved { entity: EntityId, component: String },
	/// A component template was declared.
	TemplateDeclared { name: String },
	/// A component template was retired. Existing instances are untouched.
	TemplateRetired { name: String },
	/// A system was declared.
	SystemDeclared { name: String },
	/// A system was retired along with its attachments.
	SystemRetired { name: String },
	/// An entity joined a system.
	EntityAttached { entity: EntityId, system: String },
	/// An entity left a system.
	EntityDetached { entity: EntityId, system: String },
	/// A tick is about to run the listed systems.
	BeforeTick { systems: Vec<String> },
	/// A tick finished running the listed systems.
	AfterTick { systems: Vec<String> },
	/// The run loop started or resumed.
	Run,
	/// The run loop was paused.
	Pause,
	/// The run loop was stopped.
	Stop,
}

/// The payload-free discriminant of an [`EcsEvent`], used to filter listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
	EntityCreated,
	EntityRemoved,
	ComponentAdded,
	ComponentRemoved,
	TemplateDeclared,
	TemplateRetired,
	SystemDeclared,
	SystemRetired,
	EntityAttached,
	EntityDetached,
	BeforeTick,
	AfterTick,
	Run,
	Pause,
	Stop,
}

impl EcsEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			EcsEvent::EntityCreated { .. } => EventKind::EntityCreated,
			EcsEvent::EntityRemoved { .. } => EventKind::EntityRemoved,
			EcsEvent::ComponentAdded { .. } => EventKind::ComponentAdded,
			EcsEvent::ComponentRemoved { .. } => EventKind::ComponentRemoved,
			EcsEvent::TemplateDeclared { .. } => EventKind::TemplateDeclared,
			EcsEvent::TemplateRetired { .. } => EventKind::TemplateRetired,
			EcsEvent::SystemDeclared { .. } => EventKind::SystemDeclared,
			EcsEvent::SystemRetired { .. } => EventKind::SystemRetired,
			EcsEvent::EntityAttached { .. } => EventKind::EntityAttached,
			EcsEvent::EntityDetached { .. } => EventKind::EntityDetached,
			EcsEvent::BeforeTick { .. } => EventKind::BeforeTick,
			EcsEvent::AfterTick { .. } => EventKind::AfterTick,
			EcsEvent::Run => EventKind::Run,
			EcsEvent::Pause => EventKind::Pause,
			EcsEvent::Stop => EventKind::Stop,
		}
	}
}

impl EventKind {
	/// The stable dotted name of the event.
	pub const fn name(self) -> &'static str {
		match self {
			EventKind::EntityCreated => "entity.created",
			EventKind::EntityRemoved => "entity.deleted",
			EventKind::ComponentAdded => "component.added",
			EventKind::ComponentRemoved => "component.removed",
			EventKind::TemplateDeclared => "component.created",
			EventKind::TemplateRetired => "component.deleted",
			EventKind::SystemDeclared => "system.created",
			EventKind::SystemRetired => "system.deleted",
			EventKind::EntityAttached => "entity.attached",
			EventKind::EntityDetached => "entity.dettached",
			EventKind::BeforeTick => "ecs:before.tick",
			EventKind::AfterTick => "ecs:after.tick",
			EventKind::Run => "ecs:run",
			EventKind::Pause => "ecs:pause",
			EventKind::Stop => "ecs:stop",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Creates a connected publishing/draining pair.
pub fn event_channel() -> (EventSender, EventReceiver) {
	let (sender, receiver) = unbounded();
	(EventSender { sender }, EventReceiver { receiver })
}

/// The publishing end handed to each registry.
#[derive(Clone, Debug)]
pub struct EventSender {
	sender: Sender<EcsEvent>,
}

impl EventSender {
	/// Publishes an event. Events published after the receiver is gone are discarded.
	pub fn publish(&self, event: EcsEvent) {
		if let Err(err) = self.sender.send(event) {
			tracing::trace!(event = %err.0.kind(), "event dropped, no receiver");
		}
	}
}

/// The draining end owned by the context.
#[derive(Debug)]
pub struct EventReceiver {
	receiver: Receiver<EcsEvent>,
}

impl EventReceiver {
	/// Takes the oldest pending event, if any.
	pub fn try_next(&self) -> Option<EcsEvent> {
		self.receiver.try_recv().ok()
	}

	/// Takes every pending event in publication order.
	pub fn drain(&self) -> Vec<EcsEvent> {
		self.receiver.try_iter().collect()
	}

	pub fn is_empty(&self) -> bool {
		self.receiver.is_empty()
	}
}

/// Identifies a listener registered on an [`EcsContext`](crate::context::EcsContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&EcsEvent)>;

/// External listeners, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
	next_id: u64,
	entries: Vec<(ListenerId, Option<EventKind>, Listener)>,
}

impl Listeners {
	pub fn add(&mut self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		self.entries.push((id, kind, listener));
		id
	}

	pub fn remove(&mut self, id: ListenerId) -> bool {
		let len = self.entries.len();
		self.entries.retain(|(entry, _, _)| *entry != id);
		self.entries.len() != len
	}

	pub fn notify(&mut self, event: &EcsEvent) {
		let kind = event.kind();
		for (_, filter, listener) in self.entries.iter_mut() {
			if filter.map_or(true, |filter| filter == kind) {
				listener(event);
			}
		}
	}
}
