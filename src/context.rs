use crate::entities::EntityStore;
use crate::systems::{System, SystemStore};
use std::ops::{Deref, DerefMut};

/// A container for entities and systems, and the single synchronization
/// point that makes queued changes visible.
///
/// All mutation calls on the underlying [EntityStore] only queue intent;
/// [sync](World::sync) applies them between simulation steps. The world is
/// single-threaded cooperative: nothing here locks, and the owning game
/// loop must not call `sync` concurrently with itself or with any
/// iteration over entities.
pub struct World {
	entities: EntityStore,
	systems: SystemStore,
}

impl World {
	pub fn new() -> Self {
		Self {
			entities: EntityStore::new(),
			systems: SystemStore::new(),
		}
	}

	/// Add a new [System] to the [World].
	pub fn register_system<T: 'static + System>(&mut self, system: T) {
		self.systems.add_system(system);
	}

	/// Initialize all [Systems](System) and populate their filters from
	/// the current live population.
	/// Must be called before any system can be run.
	pub fn setup_systems(&mut self) {
		self.systems.setup_systems(&mut self.entities);
	}

	/// Execute all [Systems](System) over their cached matching sets.
	pub fn process(&mut self) {
		self.systems.run_systems(&mut self.entities);
	}

	pub fn system_count(&self) -> usize {
		self.systems.len()
	}

	/// Applies every queued mutation and re-evaluates system membership for
	/// the touched entities.
	///
	/// In order: queued component actions land (firing `on_added` and
	/// `on_removed`), queued entity creations and destructions hit the live
	/// table (destroyed entities return their components to the pools),
	/// group changes apply, dependency resolution runs for entities whose
	/// composition changed, every touched entity passes through every
	/// registered filter, and finally the pending markers clear.
	pub fn sync(&mut self) {
		let batch = self.entities.apply_queued();

		for entity in &batch {
			let record = self.entities.record_mut(entity.index);
			self.systems.sync_entity(*entity, record);
		}

		log::trace!("synchronized {} entities ({} live)", batch.len(), self.entities.entity_count());
		self.entities.finish_sync(batch);
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new()
	}
}

impl Deref for World {
	type Target = EntityStore;

	#[inline(always)]
	fn deref(&self) -> &Self::Target {
		&self.entities
	}
}

impl DerefMut for World {
	#[inline(always)]
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.entities
	}
}
