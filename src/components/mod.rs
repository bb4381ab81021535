//! [Components](ComponentData) are the data attached to [entities](crate::entities::Entity).
//!
//! Components are declared once as named templates in the [ComponentRegistry].
//! Attaching a component to an entity stores an independent copy of the template,
//! optionally customised with per-entity overrides.

mod signature;
mod component_data;
mod component_registry;

pub use signature::*;
pub use component_data::*;
pub use component_registry::*;
