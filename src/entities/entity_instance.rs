use crate::components::{ComponentData, Signature};
use std::collections::btree_map::Keys;
use std::collections::BTreeMap;
use std::borrow::Borrow;
use std::fmt;

/// A unique handle to an [Entity], unique within its registry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(String);

impl EntityId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for EntityId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for EntityId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl Borrow<str> for EntityId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for EntityId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Anything that designates an entity: a raw id, an [EntityId] or the [Entity] itself.
pub trait EntityKey {
	fn entity_id(&self) -> &str;
}

impl EntityKey for str {
	fn entity_id(&self) -> &str {
		self
	}
}

impl EntityKey for String {
	fn entity_id(&self) -> &str {
		self
	}
}

impl EntityKey for EntityId {
	fn entity_id(&self) -> &str {
		&self.0
	}
}

impl EntityKey for Entity {
	fn entity_id(&self) -> &str {
		&self.id.0
	}
}

impl<T: EntityKey + ?Sized> EntityKey for &T {
	fn entity_id(&self) -> &str {
		(**self).entity_id()
	}
}

/// An identity plus the component instances attached to it, at most one per component name.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
	id: EntityId,
	pub(crate) components: BTreeMap<String, ComponentData>,
}

impl Entity {
	pub(crate) fn new(id: EntityId) -> Self {
		Self {
			id,
			components: BTreeMap::new(),
		}
	}

	pub fn id(&self) -> &EntityId {
		&self.id
	}

	pub fn has_component(&self, name: &str) -> bool {
		self.components.contains_key(name)
	}

	pub fn component(&self, name: &str) -> Option<&ComponentData> {
		self.components.get(name)
	}

	/// The names of the attached components, in sorted order.
	pub fn component_names(&self) -> Keys<'_, String, ComponentData> {
		self.components.keys()
	}

	pub fn components(&self) -> impl Iterator<Item = (&str, &ComponentData)> {
		self.components.iter().map(|(name, data)| (name.as_str(), data))
	}

	/// Returns true if the entity carries every component of `signature`.
	pub fn matches(&self, signature: &Signature) -> bool {
		signature.is_satisfied_by(self)
	}
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.id, f)
	}
}
