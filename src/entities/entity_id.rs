use crate::entities::EntityId;
use uuid::Uuid;

/// Produces fresh entity ids on demand.
pub trait IdGenerator {
	fn next_id(&mut self) -> EntityId;
}

/// Generates random v4 UUIDs. This is the default generator.
#[derive(Default, Clone, Copy, Debug)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
	fn next_id(&mut self) -> EntityId {
		EntityId::new(Uuid::new_v4().to_string())
	}
}

/// Generates `prefix-0`, `prefix-1`, ... Handy when ids must be predictable.
#[derive(Clone, Debug)]
pub struct SequentialIds {
	prefix: String,
	next: u64,
}

impl SequentialIds {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			next: 0,
		}
	}
}

impl Default for SequentialIds {
	fn default() -> Self {
		Self::new("entity")
	}
}

impl IdGenerator for SequentialIds {
	fn next_id(&mut self) -> EntityId {
		let id = EntityId::new(format!("{}-{}", self.prefix, self.next));
		self.next += 1;
		id
	}
}
