use crate::components::{ComponentInstance, ComponentRegistry, TypeHandle};
use crate::entities::Entity;
use crate::error::EcsError;
use std::any::Any;

/// Object-safe access to the concrete type behind a boxed [Component].
pub trait AsAny: Any {
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// A typed bag of data attached to at most one entity at a time.
///
/// Implementors must also be [Default]: registration requires a no-argument
/// construction path so the type's pool can recycle and construct instances.
/// All methods have empty defaults; a plain data struct is a valid component.
pub trait Component: AsAny {
	/// The name this type is registered under, used by data loaders to
	/// resolve handles by name. Defaults to the unqualified type name.
	fn type_name() -> &'static str
	where
		Self: Sized,
	{
		short_type_name(std::any::type_name::<Self>())
	}

	/// Called during sync when the component lands on `owner`.
	fn on_added(&mut self, _owner: Entity) {}

	/// Called during sync when the component is detached from `owner`,
	/// just before it returns to its pool.
	fn on_removed(&mut self, _owner: Entity) {}

	/// Handle a message broadcast to the owning entity.
	fn receive_message(&mut self, _message: &Message) {}

	/// Called during sync for every attached component of an entity whose
	/// composition changed. `siblings` looks up the co-attached components;
	/// copy out whatever this component needs.
	fn resolve_dependencies(&mut self, _owner: Entity, _siblings: &SiblingView) {}

	/// Set a named field from its string representation. Data loaders use
	/// this to populate pool-constructed components.
	fn set_field(&mut self, field: &str, _value: &str) -> Result<(), EcsError> {
		Err(EcsError::UnknownField {
			component: short_type_name(std::any::type_name_of_val(self)),
			field: field.to_string(),
		})
	}

	/// Clear instance state before the component returns to its pool.
	/// A recycled instance must be indistinguishable from a fresh one.
	fn reset(&mut self) {}
}

/// An opaque tagged payload delivered through
/// [broadcast](crate::entities::EntityStore::broadcast).
pub struct Message {
	tag: &'static str,
	payload: Option<Box<dyn Any>>,
}

impl Message {
	pub fn new(tag: &'static str) -> Self {
		Self { tag, payload: None }
	}

	pub fn with_payload<T: 'static>(tag: &'static str, payload: T) -> Self {
		Self {
			tag,
			payload: Some(Box::new(payload)),
		}
	}

	pub fn tag(&self) -> &str {
		self.tag
	}

	/// The payload, if one was attached and is of type `T`.
	pub fn payload<T: 'static>(&self) -> Option<&T> {
		self.payload.as_ref()?.downcast_ref::<T>()
	}
}

/// A read-only view of the components attached to one entity, handed to
/// [Component::resolve_dependencies].
///
/// The component being resolved is detached from its slot for the duration
/// of the call, so it cannot observe itself through the view.
pub struct SiblingView<'l> {
	components: &'l [Option<ComponentInstance>],
	registry: &'l ComponentRegistry,
}

impl<'l> SiblingView<'l> {
	pub(crate) fn new(components: &'l [Option<ComponentInstance>], registry: &'l ComponentRegistry) -> Self {
		Self { components, registry }
	}

	pub fn get<T: Component>(&self) -> Option<&T> {
		let handle = self.registry.lookup::<T>()?;
		self.get_by_handle(handle)?.as_any().downcast_ref::<T>()
	}

	pub fn get_by_handle(&self, handle: TypeHandle) -> Option<&dyn Component> {
		self.components.get(handle.index())?.as_ref().map(ComponentInstance::component)
	}

	pub fn contains(&self, handle: TypeHandle) -> bool {
		self.get_by_handle(handle).is_some()
	}
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
	match full.rfind("::") {
		Some(position) => &full[position + 2..],
		None => full,
	}
}
