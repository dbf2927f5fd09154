use crate::data_structures::BitField;
use crate::entities::{Aspect, Entity, EntityRecord, EntityStore};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;

type Hasher = BuildHasherDefault<NoHashHasher<u32>>;

/// A live, incrementally maintained set of entities matching an [Aspect]
/// and an optional group mask.
///
/// The cached set holds entity handles, never references, so it cannot keep
/// entities alive past their lifecycle. After every sync the set is
/// guaranteed to equal what a full [rescan](EntityFilter::rescan) over the
/// live population would produce.
pub struct EntityFilter {
	aspect: Aspect,
	group_mask: BitField,
	bit: Option<usize>,
	matched: Vec<Entity>,
	positions: HashMap<u32, usize, Hasher>,
}

impl EntityFilter {
	pub fn new(aspect: Aspect) -> Self {
		Self::with_group_mask(aspect, BitField::new())
	}

	/// A filter that additionally requires membership in at least one of
	/// the masked groups. An empty mask applies no group constraint.
	pub fn with_group_mask(aspect: Aspect, group_mask: BitField) -> Self {
		Self {
			aspect,
			group_mask,
			bit: None,
			matched: Vec::new(),
			positions: HashMap::default(),
		}
	}

	pub fn aspect(&self) -> &Aspect {
		&self.aspect
	}

	/// The currently matching entities, in no guaranteed order.
	pub fn entities(&self) -> &[Entity] {
		&self.matched
	}

	pub fn len(&self) -> usize {
		self.matched.len()
	}

	pub fn is_empty(&self) -> bool {
		self.matched.is_empty()
	}

	/// Full re-scan: clears the cached set and re-adds every live entity
	/// the filter is interested in.
	pub fn rescan(&mut self, entities: &mut EntityStore) {
		self.matched.clear();
		self.positions.clear();

		for (entity, record) in entities.records_mut() {
			let matches = self.matches(record);
			if let Some(bit) = self.bit {
				record.system_bits.set(bit, matches);
			}
			if matches {
				self.insert(entity);
			}
		}
	}

	/// Incremental update for one entity out of the sync batch. The cached
	/// set and the entity's system bit change only if membership actually
	/// changed.
	pub(crate) fn sync_entity(&mut self, entity: Entity, record: &mut EntityRecord) {
		let bit = match self.bit {
			Some(bit) => bit,
			None => return,
		};

		let matches = self.matches(record);
		let contained = record.system_bits.get(bit);

		if matches && !contained {
			record.system_bits.set(bit, true);
			self.insert(entity);
		} else if !matches && contained {
			record.system_bits.set(bit, false);
			self.remove(entity);
		}
	}

	pub(crate) fn assign_bit(&mut self, bit: usize) {
		self.bit = Some(bit);
	}

	fn matches(&self, record: &EntityRecord) -> bool {
		record.live
			&& self.aspect.interests(&record.component_bits)
			&& (self.group_mask.is_empty() || record.group_bits.intersects(&self.group_mask))
	}

	fn insert(&mut self, entity: Entity) {
		self.positions.insert(entity.index, self.matched.len());
		self.matched.push(entity);
	}

	fn remove(&mut self, entity: Entity) {
		let Some(position) = self.positions.remove(&entity.index) else {
			return;
		};

		self.matched.swap_remove(position);
		if let Some(moved) = self.matched.get(position) {
			self.positions.insert(moved.index, position);
		}
	}
}

/// It provides the logic for modifying the state of entities and their
/// associated [Components](crate::components::Component).
///
/// A system owns an [EntityFilter]; the store keeps the filter's matching
/// set up to date across syncs, and `process` runs the per-tick logic over
/// the cached set only.
pub trait System {
	fn filter(&self) -> &EntityFilter;

	fn filter_mut(&mut self) -> &mut EntityFilter;

	/// Initialises the [System].
	/// **This function should not be called by user code.**
	fn setup(&mut self, _entities: &mut EntityStore) {}

	/// Executes the system over its cached matching set.
	fn process(&mut self, entities: &mut EntityStore);
}
