pub mod error;
pub mod events;
pub mod config;
pub mod systems;
pub mod entities;
pub mod scheduler;
pub mod components;
mod context;

pub mod prelude {
	pub use crate::systems::*;
	pub use crate::components::*;
	pub use crate::config::EcsConfig;
	pub use crate::context::EcsContext;
	pub use crate::error::{EcsError, EcsResult};
	pub use crate::scheduler::{RunHandle, RunState};
	pub use crate::events::{EcsEvent, EventKind, ListenerId};
	pub use crate::entities::{
		Entity, EntityId, EntityKey, EntityRegistry, IdGenerator, SequentialIds, UuidGenerator,
	};
}

pub use context::EcsContext;

#[cfg(test)]
mod tests;
