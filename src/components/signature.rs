use std::collections::btree_set::Iter;
use std::collections::BTreeSet;
use crate::entities::Entity;
use std::fmt;

/// The set of component names a [system](crate::systems::System) requires, or a query asks for.
///
/// Order and repetitions are irrelevant. An empty signature is satisfied by every [entity](Entity).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
	names: BTreeSet<String>,
}

impl Signature {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	/// Returns true if every name in `names` is part of this signature.
	pub fn contains_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
		names.iter().all(|name| self.names.contains(name.as_ref()))
	}

	/// Returns true if the [entity](Entity) carries every component of this signature.
	/// Extra components on the entity are allowed.
	pub fn is_satisfied_by(&self, entity: &Entity) -> bool {
		self.names.iter().all(|name| entity.has_component(name))
	}

	pub fn iter(&self) -> Iter<'_, String> {
		self.names.iter()
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// The component names in sorted order.
	pub fn to_vec(&self) -> Vec<String> {
		self.names.iter().cloned().collect()
	}
}

impl<S: Into<String>> FromIterator<S> for Signature {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self {
			names: iter.into_iter().map(Into::into).collect(),
		}
	}
}

impl<S: AsRef<str>> From<&[S]> for Signature {
	fn from(names: &[S]) -> Self {
		names.iter().map(|name| name.as_ref().to_owned()).collect()
	}
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Signature {
	fn from(names: [S; N]) -> Self {
		names.iter().map(|name| name.as_ref().to_owned()).collect()
	}
}

impl<S: AsRef<str>> From<Vec<S>> for Signature {
	fn from(names: Vec<S>) -> Self {
		names.iter().map(|name| name.as_ref().to_owned()).collect()
	}
}

impl<'l> IntoIterator for &'l Signature {
	type Item = &'l String;
	type IntoIter = Iter<'l, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.names.iter()
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]", self.to_vec().join(","))
	}
}
