//! [Systems](System) provide the logic applied to [Entities](crate::entities::Entity)
//! and their associated [Components](crate::components::ComponentData).
//!
//! A [System] must be declared in an [EcsContext](crate::context::EcsContext)
//! for it to become active. The context then keeps it attached to every entity matching its signature.

mod system;
mod system_registry;

pub use system::*;
pub use system_registry::*;
