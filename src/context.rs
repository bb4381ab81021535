use crate::events::{event_channel, EcsEvent, EventKind, EventReceiver, EventSender, ListenerId, Listeners};
use crate::entities::{EntityId, EntityKey, EntityRegistry, IdGenerator, UuidGenerator};
use crate::components::{ComponentData, ComponentRegistry, Signature};
use crate::systems::{ComponentView, System, SystemRegistry};
use crate::error::{EcsError, EcsResult};
use crate::scheduler::{RunHandle, RunState};
use std::time::{Duration, Instant};
use crate::config::EcsConfig;
use std::ops::Deref;

/// A container for [entities](crate::entities::Entity), component templates and [systems](System).
///
/// The context owns the three registries and is the only subscriber to their events.
/// After every operation it drains the pending events and applies the reactions that keep
/// system membership consistent:
///
/// | event | reaction |
/// |---|---|
/// | entity created | logged |
/// | entity removed | detached from every system holding it |
/// | component added | attached to every system requiring that component, if it now qualifies |
/// | component removed | detached from every system requiring that component |
/// | system declared | every qualifying entity is attached |
/// | system retired | logged, the attachments went away with the system |
///
/// Each event is then forwarded to the listeners registered with [`on`](Self::on) and [`on_any`](Self::on_any).
pub struct EcsContext {
	config: EcsConfig,
	events: EventSender,
	pending: EventReceiver,
	listeners: Listeners,
	run_handle: RunHandle,

	component_registry: ComponentRegistry,
	entity_registry: EntityRegistry,
	system_registry: SystemRegistry,
}

impl EcsContext {
	/// Creates an empty context with the default [configuration](EcsConfig) and UUID entity ids.
	pub fn new() -> Self {
		Self::build(EcsConfig::default(), UuidGenerator)
	}

	pub fn with_config(config: EcsConfig) -> EcsResult<Self> {
		config.validate()?;
		Ok(Self::build(config, UuidGenerator))
	}

	pub fn with_id_generator(config: EcsConfig, ids: impl IdGenerator + 'static) -> EcsResult<Self> {
		config.validate()?;
		Ok(Self::build(config, ids))
	}

	fn build(config: EcsConfig, ids: impl IdGenerator + 'static) -> Self {
		let (events, pending) = event_channel();
		Self {
			config,
			listeners: Listeners::default(),
			run_handle: RunHandle::new(),
			component_registry: ComponentRegistry::new(events.clone()),
			entity_registry: EntityRegistry::with_id_generator(events.clone(), ids),
			system_registry: SystemRegistry::new(events.clone()),
			events,
			pending,
		}
	}

	pub fn config(&self) -> &EcsConfig {
		&self.config
	}

	pub fn entities(&self) -> &EntityRegistry {
		&self.entity_registry
	}

	pub fn components(&self) -> &ComponentRegistry {
		&self.component_registry
	}

	pub fn systems(&self) -> &SystemRegistry {
		&self.system_registry
	}

	/// Returns the id of the entity `id`, creating it first if it does not exist.
	/// Without an id a new entity with a generated id is created.
	pub fn entity(&mut self, id: Option<&str>) -> EntityId {
		let id = self.entity_registry.ensure(id).id().clone();
		self.pump();
		id
	}

	/// Deletes an entity and detaches it from every system. Returns whether it existed.
	pub fn delete_entity(&mut self, entity: impl EntityKey) -> bool {
		let removed = self.entity_registry.remove(entity);
		self.pump();
		removed
	}

	/// Attaches the declared components `names` to an entity, customising component `i` with `data[i]` when present.
	///
	/// Fails on the first undeclared name. Components attached before the failure stay attached.
	/// Components the entity already carries are left untouched.
	pub fn add_components<S: AsRef<str>>(
		&mut self, entity: impl EntityKey, names: &[S], data: &[ComponentData],
	) -> EcsResult<()> {
		let id = entity.entity_id();
		for (index, name) in names.iter().enumerate() {
			let name = name.as_ref();
			if !self.component_registry.exists(name) {
				tracing::warn!(entity = id, component = name, "cannot add undeclared component");
				return Err(EcsError::UnknownComponentTemplate(name.to_owned()));
			}

			let attached =
				self.entity_registry
					.attach_component(id, name, data.get(index), &self.component_registry);
			self.pump();

			if let Err(err) = attached {
				tracing::warn!(entity = id, component = name, %err, "cannot add component");
				return Err(err);
			}
		}
		Ok(())
	}

	/// Detaches the components `names` from an entity, returning how many were actually present.
	pub fn remove_components<S: AsRef<str>>(&mut self, entity: impl EntityKey, names: &[S]) -> EcsResult<usize> {
		let id = entity.entity_id();
		if !self.entity_registry.exists(id) {
			return Err(EcsError::UnknownEntity(id.to_owned()));
		}

		let mut removed = 0;
		for name in names {
			if self.entity_registry.detach_component(id, name.as_ref()) {
				removed += 1;
			}
			self.pump();
		}
		Ok(removed)
	}

	/// Declares a component template, returning a copy of it.
	/// An existing template with the same name wins over `data`.
	pub fn component(&mut self, name: &str, data: ComponentData) -> ComponentData {
		let template = self.component_registry.declare(name, data);
		self.pump();
		template
	}

	/// Retires a component template. Instances already attached to entities are kept.
	pub fn delete_component(&mut self, name: &str) -> bool {
		let retired = self.component_registry.retire(name);
		self.pump();
		retired
	}

	/// See [`ComponentRegistry::load`].
	pub fn load_component(&self, source: &str) -> EcsResult<ComponentData> {
		self.component_registry.load(source)
	}

	/// Declares a system and attaches every entity that already satisfies `required`.
	/// An existing system with the same name is returned unchanged.
	pub fn system(
		&mut self, name: &str, required: impl Into<Signature>,
		routine: impl FnMut(&EntityId, &ComponentView<'_>) + 'static,
	) -> &System {
		let index = self.system_registry.declare_at(name, required.into(), Box::new(routine));
		self.pump();
		self.system_registry.at(index)
	}

	/// Retires a system along with its attachments.
	pub fn delete_system(&mut self, name: &str) -> bool {
		let retired = self.system_registry.retire(name);
		self.pump();
		retired
	}

	/// Attaches an entity to a system.
	///
	/// Fails if either does not exist, or with [`EcsError::AttachmentRejected`] when the entity is already
	/// attached or lacks one of the required components.
	pub fn attach_entity(&mut self, system: &str, entity: impl EntityKey) -> EcsResult<()> {
		let required = match self.system_registry.lookup(system) {
			Some(found) => found.required().to_vec(),
			None => return Err(EcsError::UnknownSystem(system.to_owned())),
		};

		let id = entity.entity_id();
		let Some(resolved) = self.entity_registry.lookup(id) else {
			return Err(EcsError::UnknownEntity(id.to_owned()));
		};

		let attached = self.system_registry.attach(system, resolved);
		self.pump();

		if !attached {
			tracing::warn!(entity = id, system, "attachment rejected");
			return Err(EcsError::AttachmentRejected {
				system: system.to_owned(),
				entity: id.to_owned(),
				required,
			});
		}
		Ok(())
	}

	/// Detaches an entity from a system, returning whether it was attached.
	///
	/// Fails if the system or the entity does not exist.
	pub fn detach_entity(&mut self, system: &str, entity: impl EntityKey) -> EcsResult<bool> {
		if !self.system_registry.exists(system) {
			return Err(EcsError::UnknownSystem(system.to_owned()));
		}

		let id = entity.entity_id();
		if !self.entity_registry.exists(id) {
			return Err(EcsError::UnknownEntity(id.to_owned()));
		}

		let detached = self.system_registry.detach(system, id);
		self.pump();
		Ok(detached)
	}

	/// Registers a listener for one kind of event.
	pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&EcsEvent) + 'static) -> ListenerId {
		self.listeners.add(Some(kind), Box::new(listener))
	}

	/// Registers a listener for every event.
	pub fn on_any(&mut self, listener: impl FnMut(&EcsEvent) + 'static) -> ListenerId {
		self.listeners.add(None, Box::new(listener))
	}

	/// Removes a listener, returning whether it was registered.
	pub fn off(&mut self, listener: ListenerId) -> bool {
		self.listeners.remove(listener)
	}

	/// Runs every system once over its attached entities, in declaration order,
	/// between [`EcsEvent::BeforeTick`] and [`EcsEvent::AfterTick`].
	///
	/// Returns the number of routine invocations. Can be called in any run state.
	pub fn tick(&mut self) -> usize {
		let systems = self.system_registry.names();
		self.events.publish(EcsEvent::BeforeTick { systems: systems.clone() });
		self.pump();

		let started = Instant::now();
		let invoked = self.system_registry.run_systems(&self.entity_registry);
		tracing::trace!(systems = systems.len(), invoked, elapsed = ?started.elapsed(), "tick");

		self.events.publish(EcsEvent::AfterTick { systems });
		self.pump();
		invoked
	}

	pub fn run_state(&self) -> RunState {
		self.run_handle.state()
	}

	/// A handle that can pause, resume or stop the run loop from a listener or another thread.
	pub fn run_handle(&self) -> RunHandle {
		self.run_handle.clone()
	}

	/// Ticks until the run state becomes [`RunState::Stopped`].
	///
	/// With [`EcsConfig::limit_tick_rate`] the loop sleeps between ticks to honour [`EcsConfig::tick_rate`];
	/// otherwise it ticks back to back. This call blocks the current thread, so it has to be stopped
	/// through a [`RunHandle`].
	pub fn run(&mut self) -> u64 {
		self.run_loop(None)
	}

	/// Same as [`run`](Self::run), but stops on its own after `ticks` ticks.
	pub fn run_ticks(&mut self, ticks: u64) -> u64 {
		if ticks == 0 {
			return 0;
		}
		self.run_loop(Some(ticks))
	}

	/// Pauses a running loop. Returns whether the state changed.
	pub fn pause(&mut self) -> bool {
		self.change_state(RunHandle::pause, RunState::Paused)
	}

	/// Stops a running or paused loop. Returns whether the state changed.
	pub fn stop(&mut self) -> bool {
		self.change_state(RunHandle::stop, RunState::Stopped)
	}

	fn change_state(&mut self, transition: fn(&RunHandle) -> bool, state: RunState) -> bool {
		if !transition(&self.run_handle) {
			return false;
		}
		self.publish_state(state);
		true
	}

	fn run_loop(&mut self, limit: Option<u64>) -> u64 {
		self.run_handle.run();
		self.publish_state(RunState::Running);

		let interval = self.config.tick_interval();
		let mut observed = RunState::Running;
		let mut next_tick = Instant::now();
		let mut ticks = 0;

		loop {
			let state = self.run_handle.state();
			if state != observed {
				self.publish_state(state);
				observed = state;
			}

			match state {
				RunState::Stopped => break,
				RunState::Paused => {
					self.run_handle.wait_for_change(RunState::Paused, None);
				},
				RunState::Running => {
					if let Some(wait) = remaining(next_tick, interval) {
						self.run_handle.wait_for_change(RunState::Running, Some(wait));
						continue;
					}

					if let Some(interval) = interval {
						next_tick = Instant::now() + interval;
					}

					self.tick();
					ticks += 1;

					if limit.map_or(false, |limit| ticks >= limit) && self.run_handle.stop() {
						self.publish_state(RunState::Stopped);
						break;
					}
				},
			}
		}

		ticks
	}

	fn publish_state(&mut self, state: RunState) {
		tracing::info!(?state, "run state changed");
		let event = match state {
			RunState::Running => EcsEvent::Run,
			RunState::Paused => EcsEvent::Pause,
			RunState::Stopped => EcsEvent::Stop,
		};
		self.events.publish(event);
		self.pump();
	}

	/// Drains pending events in publication order, reacting to each before notifying listeners.
	/// Events published by the reactions themselves are drained in the same pass.
	fn pump(&mut self) {
		while let Some(event) = self.pending.try_next() {
			if self.config.log_events {
				log_event(&event);
			}
			self.react(&event);
			self.listeners.notify(&event);
		}
	}

	fn react(&mut self, event: &EcsEvent) {
		match event {
			EcsEvent::EntityRemoved { entity } => {
				let holding = self
					.system_registry
					.iter()
					.filter(|system| system.has_entity(entity.id().as_str()))
					.map(|system| system.name().to_owned())
					.collect::<Vec<_>>();

				for system in holding {
					self.system_registry.detach(&system, entity);
				}
			},

			EcsEvent::ComponentAdded { entity, component } => {
				let Some(entity) = self.entity_registry.lookup(entity) else {
					return;
				};

				for system in self.systems_requiring(component) {
					self.system_registry.attach(&system, entity);
				}
			},

			EcsEvent::ComponentRemoved { entity, component } => {
				for system in self.systems_requiring(component) {
					self.system_registry.detach(&system, entity);
				}
			},

			EcsEvent::SystemDeclared { name } => {
				let Some(required) = self.system_registry.lookup(name).map(|system| system.required().clone()) else {
					return;
				};

				for entity in self.entity_registry.query_by_signature(&required) {
					self.system_registry.attach(name, entity);
				}
			},

			_ => {},
		}
	}

	fn systems_requiring(&self, component: &str) -> Vec<String> {
		self.system_registry
			.query_by_signature(&[component])
			.map(|system| system.name().to_owned())
			.collect()
	}
}

fn remaining(next_tick: Instant, interval: Option<Duration>) -> Option<Duration> {
	interval
		.and_then(|_| next_tick.checked_duration_since(Instant::now()))
		.filter(|wait| !wait.is_zero())
}

fn log_event(event: &EcsEvent) {
	let kind = event.kind().name();
	match event {
		EcsEvent::EntityCreated { entity } => tracing::debug!(kind, %entity, "entity created"),
		EcsEvent::EntityRemoved { entity } => tracing::debug!(kind, %entity, "entity removed"),
		EcsEvent::ComponentAdded { entity, component } => {
			tracing::debug!(kind, %entity, %component, "component added")
		},
		EcsEvent::ComponentRemoved { entity, component } => {
			tracing::debug!(kind, %entity, %component, "component removed")
		},
		EcsEvent::TemplateDeclared { name } => tracing::debug!(kind, component = %name, "component created"),
		EcsEvent::TemplateRetired { name } => tracing::debug!(kind, component = %name, "component deleted"),
		EcsEvent::SystemDeclared { name } => tracing::debug!(kind, system = %name, "system created"),
		EcsEvent::SystemRetired { name } => tracing::debug!(kind, system = %name, "system deleted"),
		EcsEvent::EntityAttached { entity, system } => {
			tracing::debug!(kind, %entity, %system, "entity attached")
		},
		EcsEvent::EntityDetached { entity, system } => {
			tracing::debug!(kind, %entity, %system, "entity detached")
		},
		EcsEvent::BeforeTick { .. } | EcsEvent::AfterTick { .. } => tracing::trace!(kind),
		EcsEvent::Run | EcsEvent::Pause | EcsEvent::Stop => tracing::debug!(kind),
	}
}

impl Default for EcsContext {
	fn default() -> Self {
		Self::new()
	}
}

impl Deref for EcsContext {
	type Target = EntityRegistry;

	#[inline(always)]
	fn deref(&self) -> &Self::Target {
		&self.entity_registry
	}
}
