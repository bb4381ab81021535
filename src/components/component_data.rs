use serde::{Deserialize, Serialize};
use crate::error::{EcsError, EcsResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A flat record of named fields.
///
/// The same type serves as a template's default field set and as the per-entity instance built from it.
/// Field values are opaque to the runtime: it only clones, merges and passes them through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentData {
	fields: BTreeMap<String, Value>,
}

impl ComponentData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds component data from a JSON value, which must be an object.
	pub fn from_json(value: Value) -> EcsResult<Self> {
		match value {
			Value::Object(map) => Ok(map.into()),
			Value::Null => Ok(Self::default()),
			other => Err(EcsError::InvalidComponentData(format!(
				"expected an object of fields, found `{other}`"
			))),
		}
	}

	/// Sets `field` to `value`, returning the updated data.
	pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(field.into(), value.into());
		self
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	pub fn contains(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Iterates the fields in name order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Creates an instance of this template customised by `overrides`.
	///
	/// Only override fields that already exist on the template are applied.
	/// Unknown override fields are silently dropped, so instances can never invent field names
	/// their template does not declare.
	pub fn instantiate_with_overrides(&self, overrides: &ComponentData) -> ComponentData {
		let mut instance = self.clone();
		for (field, value) in instance.fields.iter_mut() {
			if let Some(replacement) = overrides.fields.get(field) {
				*value = replacement.clone();
			}
		}
		instance
	}
}

impl From<Map<String, Value>> for ComponentData {
	fn from(map: Map<String, Value>) -> Self {
		Self {
			fields: map.into_iter().collect(),
		}
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ComponentData {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self {
			fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

impl fmt::Display for ComponentData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let json = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
		f.write_str(&json)
	}
}
