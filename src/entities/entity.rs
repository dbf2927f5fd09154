use crate::components::{ComponentInstance, TypeHandle};
use crate::data_structures::BitField;

/// A unique handle to an entity.
///
/// Handles are cheap to copy and safe to hold across ticks: destroying an
/// entity bumps the record's version, so a stale handle stops validating
/// instead of silently addressing a recycled slot.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Entity {
	pub(crate) index: u32,
	pub(crate) version: u32,
}

impl Entity {
	pub fn index(&self) -> u32 {
		self.index
	}
}

/// Bit-flag set of the kinds of mutation queued against an entity for the
/// next sync. Flags are combinable; an empty set means the entity is clean.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct PendingFlags(u8);

impl PendingFlags {
	/// Queued for insertion into the live entity table.
	pub const ADD: PendingFlags = PendingFlags(1);
	/// Queued for removal from the live entity table.
	pub const REMOVE: PendingFlags = PendingFlags(1 << 1);
	/// Component composition changed; dependency resolution is due.
	pub const RESOLVE: PendingFlags = PendingFlags(1 << 2);
	/// Group membership changed.
	pub const REGROUP: PendingFlags = PendingFlags(1 << 3);

	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	pub fn contains(&self, flags: PendingFlags) -> bool {
		self.0 & flags.0 == flags.0
	}

	pub(crate) fn insert(&mut self, flags: PendingFlags) {
		self.0 |= flags.0;
	}

	pub(crate) fn clear(&mut self) {
		self.0 = 0;
	}
}

pub(crate) enum ComponentAction {
	Add(ComponentInstance),
	Remove(TypeHandle),
}

pub(crate) enum GroupAction {
	Join(usize),
	Leave(usize),
}

/// The backing storage of one entity slot.
///
/// Live components sit in a dense array indexed by the integer type handle,
/// mirrored by `component_bits` for O(1) aspect tests. Queued actions only
/// land in the live state during sync.
pub(crate) struct EntityRecord {
	pub(crate) version: u32,
	pub(crate) live: bool,
	pub(crate) tag: Option<String>,
	pub(crate) components: Vec<Option<ComponentInstance>>,
	pub(crate) component_bits: BitField,
	pub(crate) group_bits: BitField,
	pub(crate) system_bits: BitField,
	pub(crate) pending: PendingFlags,
	pub(crate) queued_components: Vec<ComponentAction>,
	pub(crate) queued_groups: Vec<GroupAction>,
}

impl EntityRecord {
	pub fn new() -> Self {
		Self {
			version: 1,
			live: false,
			tag: None,
			components: Vec::new(),
			component_bits: BitField::new(),
			group_bits: BitField::new(),
			system_bits: BitField::new(),
			pending: PendingFlags::default(),
			queued_components: Vec::new(),
			queued_groups: Vec::new(),
		}
	}

	pub fn slot(&self, handle: TypeHandle) -> Option<&ComponentInstance> {
		self.components.get(handle.index())?.as_ref()
	}

	pub fn slot_mut(&mut self, handle: TypeHandle) -> Option<&mut ComponentInstance> {
		self.components.get_mut(handle.index())?.as_mut()
	}

	pub fn has_queued_add(&self, handle: TypeHandle) -> bool {
		self.queued_components
			.iter()
			.any(|action| matches!(action, ComponentAction::Add(instance) if instance.handle() == handle))
	}

	pub fn has_queued_remove(&self, handle: TypeHandle) -> bool {
		self.queued_components
			.iter()
			.any(|action| matches!(action, ComponentAction::Remove(queued) if *queued == handle))
	}

	pub fn component_count(&self) -> usize {
		self.component_bits.count_ones()
	}
}
