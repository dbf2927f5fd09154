use crate::components::{Component, ComponentInstance, ComponentPool};
use std::any::TypeId;
use std::collections::HashMap;

/// An opaque, densely assigned identifier for a registered component type.
///
/// Handles are assigned on first request and remain stable for the lifetime
/// of the [ComponentRegistry] that issued them; the type-to-handle mapping
/// is a bijection. They are not stable between registries or program runs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TypeHandle {
	index: usize,
}

impl TypeHandle {
	pub(crate) const fn new(index: usize) -> Self {
		Self { index }
	}

	#[inline(always)]
	pub(crate) const fn index(&self) -> usize {
		self.index
	}
}

struct RegisteredType {
	name: &'static str,
	pool: ComponentPool,
}

/// Interns component types to [TypeHandles](TypeHandle) and owns the
/// per-type [ComponentPools](ComponentPool).
///
/// The registry is owned by its store and lives exactly as long as it does.
/// Lookup after the first registration is a single hash-map probe.
pub struct ComponentRegistry {
	handles: HashMap<TypeId, TypeHandle>,
	names: HashMap<&'static str, TypeHandle>,
	types: Vec<RegisteredType>,
}

impl ComponentRegistry {
	pub(crate) fn new() -> Self {
		Self {
			handles: HashMap::new(),
			names: HashMap::new(),
			types: Vec::new(),
		}
	}

	/// Returns the handle of `T`, interning the type and creating its pool
	/// on first request.
	pub fn handle_of<T: Component + Default>(&mut self) -> TypeHandle {
		let key = TypeId::of::<T>();
		if let Some(handle) = self.handles.get(&key) {
			return *handle;
		}

		let handle = TypeHandle::new(self.types.len());
		let name = T::type_name();

		self.handles.insert(key, handle);
		self.names.insert(name, handle);
		self.types.push(RegisteredType {
			name,
			pool: ComponentPool::new::<T>(),
		});

		log::debug!("registered component type `{}` as handle {}", name, handle.index());
		handle
	}

	/// Returns the handle of `T` if the type has been registered.
	pub fn lookup<T: Component>(&self) -> Option<TypeHandle> {
		self.handles.get(&TypeId::of::<T>()).copied()
	}

	/// Returns the handle registered under `name`, if any.
	pub fn handle_by_name(&self, name: &str) -> Option<TypeHandle> {
		self.names.get(name).copied()
	}

	pub fn type_name(&self, handle: TypeHandle) -> &'static str {
		self.types[handle.index()].name
	}

	pub fn type_count(&self) -> usize {
		self.types.len()
	}

	pub fn pool(&self, handle: TypeHandle) -> &ComponentPool {
		&self.types[handle.index()].pool
	}

	pub(crate) fn acquire(&mut self, handle: TypeHandle) -> ComponentInstance {
		self.types[handle.index()].pool.acquire(handle)
	}

	pub(crate) fn release(&mut self, instance: ComponentInstance) {
		let handle = instance.handle();
		self.types[handle.index()].pool.release(instance);
	}
}
