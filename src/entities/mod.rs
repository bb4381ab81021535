//! [Entities](Entity) represent the individual "things" in your game or application.
//!
//! An [Entity] has no behaviour of its own;
//! it identifies which pieces of data ([Components](crate::components::ComponentData)) belong together.

mod entity_id;
mod entity_registry;
mod entity_instance;

pub use entity_id::*;
pub use entity_registry::*;
pub use entity_instance::*;
