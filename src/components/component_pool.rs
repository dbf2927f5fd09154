use crate::components::{Component, TypeHandle};
use crate::entities::Entity;

/// Pending-action marker of a [ComponentInstance].
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PendingAction {
	#[default]
	None,
	Add,
	Remove,
}

/// A boxed [Component] together with the bookkeeping the store needs:
/// its type handle, the owning entity (set only while attached), and the
/// pending-action marker.
pub struct ComponentInstance {
	handle: TypeHandle,
	owner: Option<Entity>,
	pending: PendingAction,
	inner: Box<dyn Component>,
}

impl ComponentInstance {
	pub(crate) fn new(handle: TypeHandle, inner: Box<dyn Component>) -> Self {
		Self {
			handle,
			owner: None,
			pending: PendingAction::None,
			inner,
		}
	}

	pub fn handle(&self) -> TypeHandle {
		self.handle
	}

	/// The entity this instance is attached to, if any.
	pub fn owner(&self) -> Option<Entity> {
		self.owner
	}

	pub fn pending(&self) -> PendingAction {
		self.pending
	}

	pub fn component(&self) -> &dyn Component {
		self.inner.as_ref()
	}

	pub fn component_mut(&mut self) -> &mut dyn Component {
		self.inner.as_mut()
	}

	pub(crate) fn set_owner(&mut self, owner: Option<Entity>) {
		self.owner = owner;
	}

	pub(crate) fn set_pending(&mut self, pending: PendingAction) {
		self.pending = pending;
	}

	pub(crate) fn into_inner(self) -> Box<dyn Component> {
		self.inner
	}
}

/// A per-type free-list of released component instances.
///
/// [acquire](ComponentPool::acquire) pops a recycled instance if one is
/// available and constructs a default instance otherwise; either way the
/// returned instance carries no owner and no pending action.
pub struct ComponentPool {
	make_component: fn() -> Box<dyn Component>,
	recycled: Vec<Box<dyn Component>>,
}

impl ComponentPool {
	pub(crate) fn new<T: Component + Default>() -> Self {
		Self {
			make_component: make_default::<T>,
			recycled: Vec::new(),
		}
	}

	pub(crate) fn acquire(&mut self, handle: TypeHandle) -> ComponentInstance {
		let inner = self.recycled.pop().unwrap_or_else(self.make_component);
		ComponentInstance::new(handle, inner)
	}

	pub(crate) fn release(&mut self, instance: ComponentInstance) {
		let mut inner = instance.into_inner();
		inner.reset();
		self.recycled.push(inner);
	}

	/// Number of released instances currently waiting for reuse.
	pub fn recycled_count(&self) -> usize {
		self.recycled.len()
	}
}

fn make_default<T: Component + Default>() -> Box<dyn Component> {
	Box::new(T::default())
}
