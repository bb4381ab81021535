//! Errors raised by the strict half of the API.
//!
//! Registry primitives report rejected preconditions through `bool` and [`Option`] results,
//! since they are probed speculatively on every structural change.
//! The [`EcsContext`](crate::context::EcsContext) facade validates its preconditions
//! and fails with one of the variants below.

use thiserror::Error;

/// Errors that can occur while manipulating an [`EcsContext`](crate::context::EcsContext).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
	/// The template registry has no template with this name.
	#[error("component template `{0}` does not exist")]
	UnknownTemplate(String),

	/// A facade call referenced a component that was never declared.
	#[error("component `{0}` does not exist")]
	UnknownComponentTemplate(String),

	/// The entity could not be resolved.
	#[error("entity `{0}` does not exist")]
	UnknownEntity(String),

	/// The system could not be resolved.
	#[error("system `{0}` does not exist")]
	UnknownSystem(String),

	/// The system refused the entity because it is already attached or lacks a required component.
	#[error(
		"entity `{entity}` could not be attached to system `{system}`: already attached or incompatible, required components are [{}]",
		required.join(",")
	)]
	AttachmentRejected {
		/// The system that refused the entity.
		system: String,
		/// The entity that was refused.
		entity: String,
		/// Every component name the system requires.
		required: Vec<String>,
	},

	/// Component data was not a flat record of fields.
	#[error("invalid component data: {0}")]
	InvalidComponentData(String),

	/// The load source does not name a known protocol.
	#[error("undefined load protocol in `{0}`")]
	UnsupportedLoadSource(String),

	/// The load source names a known protocol that has no backend.
	#[error("loading components from `{0}` is not implemented")]
	LoadNotImplemented(String),

	/// The configuration could not be parsed or is inconsistent.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Result type for fallible ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

impl From<serde_json::Error> for EcsError {
	fn from(err: serde_json::Error) -> Self {
		EcsError::InvalidComponentData(err.to_string())
	}
}

impl From<toml::de::Error> for EcsError {
	fn from(err: toml::de::Error) -> Self {
		EcsError::InvalidConfig(err.to_string())
	}
}
