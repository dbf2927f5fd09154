pub mod data_structures;
pub mod components;
pub mod entities;
pub mod systems;
mod context;
mod error;

pub mod prelude {
	pub use crate::components::{
		AsAny, Component, ComponentInstance, ComponentPool, ComponentRegistry, Message, PendingAction, SiblingView,
		TypeHandle,
	};
	pub use crate::context::World;
	pub use crate::entities::{Aspect, AspectBuilder, Entity, EntityStore, PendingFlags};
	pub use crate::error::EcsError;
	pub use crate::systems::{EntityFilter, System};
}

#[cfg(test)]
mod tests;
