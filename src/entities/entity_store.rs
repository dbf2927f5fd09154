use crate::components::{Component, ComponentInstance, ComponentRegistry, Message, PendingAction, SiblingView, TypeHandle};
use crate::data_structures::BitField;
use crate::entities::{Aspect, ComponentAction, Entity, EntityRecord, GroupAction, GroupRegistry, PendingFlags};
use crate::error::EcsError;
use std::collections::HashMap;

struct EntityDefinition {
	components: Vec<TypeHandle>,
}

/// A container for entities and their associated [Components](Component).
///
/// Every public mutation (`create_entity`, `destroy_entity`, component
/// add/remove, group join/leave) only queues intent and returns immediately;
/// the queued changes land in the live state during the owning
/// [World](crate::context::World)'s `sync`. Reads always answer from the
/// live, post-sync state.
pub struct EntityStore {
	registry: ComponentRegistry,
	groups: GroupRegistry,
	records: Vec<EntityRecord>,
	free_indices: Vec<u32>,
	touched: Vec<Entity>,
	definitions: HashMap<String, EntityDefinition>,
	tags: HashMap<String, Entity>,
	live_count: usize,
}

impl EntityStore {
	pub(crate) fn new() -> Self {
		Self {
			registry: ComponentRegistry::new(),
			groups: GroupRegistry::new(),
			records: Vec::new(),
			free_indices: Vec::new(),
			touched: Vec::new(),
			definitions: HashMap::new(),
			tags: HashMap::new(),
			live_count: 0,
		}
	}

	/// Returns the handle of `T`, registering the type on first request.
	pub fn handle_of<T: Component + Default>(&mut self) -> TypeHandle {
		self.registry.handle_of::<T>()
	}

	pub fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	/// Creates a single entity with no components attached.
	/// The entity joins the live table on the next sync.
	pub fn create_entity(&mut self) -> Entity {
		let index = match self.free_indices.pop() {
			Some(index) => index,
			None => {
				self.records.push(EntityRecord::new());
				(self.records.len() - 1) as u32
			},
		};

		let entity = Entity {
			index,
			version: self.records[index as usize].version,
		};
		self.touch(entity, PendingFlags::ADD);
		entity
	}

	/// Creates an entity carrying a human-readable tag. The tag becomes
	/// resolvable through [entity_by_tag](EntityStore::entity_by_tag) once
	/// the entity is live.
	pub fn create_entity_tagged(&mut self, tag: &str) -> Entity {
		let entity = self.create_entity();
		self.records[entity.index as usize].tag = Some(tag.to_string());
		entity
	}

	/// Registers a named entity definition for later instantiation.
	pub fn define(&mut self, name: &str, components: &[TypeHandle]) -> Result<(), EcsError> {
		if self.definitions.contains_key(name) {
			return Err(EcsError::DuplicateDefinition(name.to_string()));
		}
		for (i, handle) in components.iter().enumerate() {
			if components[..i].contains(handle) {
				return Err(EcsError::DuplicateDefinitionComponent {
					definition: name.to_string(),
					type_name: self.registry.type_name(*handle),
				});
			}
		}

		self.definitions.insert(
			name.to_string(),
			EntityDefinition {
				components: components.to_vec(),
			},
		);
		log::debug!("registered entity definition `{}` ({} components)", name, components.len());
		Ok(())
	}

	/// Creates an entity from a registered definition. The components are
	/// pool-acquired defaults; data loaders populate them through
	/// [set_field](Component::set_field) afterwards.
	pub fn create_entity_from_definition(&mut self, name: &str) -> Result<Entity, EcsError> {
		let handles = match self.definitions.get(name) {
			Some(definition) => definition.components.clone(),
			None => return Err(EcsError::UnknownDefinition(name.to_string())),
		};

		let entity = self.create_entity();
		for handle in handles {
			let instance = self.registry.acquire(handle);
			self.queue_add(entity, instance);
		}

		Ok(entity)
	}

	/// Queues the entity for destruction. Its components return to their
	/// pools during the next sync and the handle stops validating.
	/// Returns *false* for a stale handle.
	pub fn destroy_entity(&mut self, entity: Entity) -> bool {
		if !self.is_valid(entity) {
			return false;
		}

		self.touch(entity, PendingFlags::REMOVE);
		true
	}

	/// Whether the handle still addresses its entity (live or queued).
	pub fn is_valid(&self, entity: Entity) -> bool {
		self.valid_record(entity).is_some()
	}

	/// Whether the entity is part of the live table (post-sync).
	pub fn is_live(&self, entity: Entity) -> bool {
		self.valid_record(entity).map_or(false, |record| record.live)
	}

	/// Queues `component` for attachment to `entity`.
	///
	/// Errors immediately if the entity already owns a component of this
	/// type, or already has one queued; the call leaves no intent behind.
	pub fn add_component<T: Component + Default>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
		let handle = self.registry.handle_of::<T>();
		self.validate_add(entity, handle)?;
		self.queue_add(entity, ComponentInstance::new(handle, Box::new(component)));
		Ok(())
	}

	/// Queues a pool-acquired default component of the given type.
	/// This is the path data loaders use after resolving a handle by name.
	pub fn add_component_by_handle(&mut self, entity: Entity, handle: TypeHandle) -> Result<(), EcsError> {
		self.validate_add(entity, handle)?;
		let instance = self.registry.acquire(handle);
		self.queue_add(entity, instance);
		Ok(())
	}

	/// Queues removal of the component of type `T`.
	/// Returns *false* (a silent no-op) if the entity does not own one.
	pub fn remove_component<T: Component>(&mut self, entity: Entity) -> bool {
		match self.registry.lookup::<T>() {
			Some(handle) => self.remove_component_by_handle(entity, handle),
			None => false,
		}
	}

	/// Queues removal of the component with the given handle.
	/// Returns *false* (a silent no-op) if the entity does not own one.
	pub fn remove_component_by_handle(&mut self, entity: Entity, handle: TypeHandle) -> bool {
		let record = match self.records.get_mut(entity.index as usize) {
			Some(record) if record.version == entity.version => record,
			_ => return false,
		};

		if !record.component_bits.get(handle.index()) {
			return false;
		}
		if record.has_queued_remove(handle) {
			return true;
		}

		if let Some(instance) = record.slot_mut(handle) {
			instance.set_pending(PendingAction::Remove);
		}
		record.queued_components.push(ComponentAction::Remove(handle));
		self.touch(entity, PendingFlags::RESOLVE);
		true
	}

	/// Queues the entity into the named group, creating the group on first
	/// use. Joining a group the entity is already in is a no-op.
	pub fn join_group(&mut self, entity: Entity, group: &str) -> Result<(), EcsError> {
		if !self.is_valid(entity) {
			return Err(EcsError::StaleEntity(entity));
		}

		let bit = self.groups.bit_of(group);
		self.records[entity.index as usize].queued_groups.push(GroupAction::Join(bit));
		self.touch(entity, PendingFlags::REGROUP);
		Ok(())
	}

	/// Queues the entity out of the named group.
	/// Returns *false* (a silent no-op) if the entity is not a member or
	/// the group was never created.
	pub fn leave_group(&mut self, entity: Entity, group: &str) -> bool {
		if !self.is_valid(entity) {
			return false;
		}
		let Some(bit) = self.groups.lookup(group) else {
			return false;
		};
		if !self.records[entity.index as usize].group_bits.get(bit) {
			return false;
		}

		self.records[entity.index as usize].queued_groups.push(GroupAction::Leave(bit));
		self.touch(entity, PendingFlags::REGROUP);
		true
	}

	/// Whether the entity is a live member of the named group.
	pub fn in_group(&self, entity: Entity, group: &str) -> bool {
		let Some(bit) = self.groups.lookup(group) else {
			return false;
		};
		self.valid_record(entity).map_or(false, |record| record.group_bits.get(bit))
	}

	/// A group mask over the named groups, for use with
	/// [EntityFilter::with_group_mask](crate::systems::EntityFilter::with_group_mask).
	/// Groups are created on first use.
	pub fn group_mask(&mut self, groups: &[&str]) -> BitField {
		let mut mask = BitField::new();
		for group in groups {
			mask.set(self.groups.bit_of(group), true);
		}

		mask
	}

	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	/// Delivers `message` synchronously to every currently-attached
	/// component of the entity. Delivery order across components is
	/// unspecified; an entity with zero components is a silent no-op.
	pub fn broadcast(&mut self, entity: Entity, message: &Message) -> Result<(), EcsError> {
		let record = match self.records.get_mut(entity.index as usize) {
			Some(record) if record.version == entity.version => record,
			_ => return Err(EcsError::StaleEntity(entity)),
		};

		for instance in record.components.iter_mut().flatten() {
			instance.component_mut().receive_message(message);
		}

		Ok(())
	}

	/// Gets a reference to the component of type `T`, if live.
	pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
		let handle = self.registry.lookup::<T>()?;
		self.component_by_handle(entity, handle)?.as_any().downcast_ref::<T>()
	}

	/// Gets a mutable reference to the component of type `T`, if live.
	pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
		let handle = self.registry.lookup::<T>()?;
		self.component_mut_by_handle(entity, handle)?.as_any_mut().downcast_mut::<T>()
	}

	pub fn component_by_handle(&self, entity: Entity, handle: TypeHandle) -> Option<&dyn Component> {
		self.valid_record(entity)?.slot(handle).map(ComponentInstance::component)
	}

	pub fn component_mut_by_handle(&mut self, entity: Entity, handle: TypeHandle) -> Option<&mut dyn Component> {
		let record = self.records.get_mut(entity.index as usize).filter(|record| record.version == entity.version)?;
		record.slot_mut(handle).map(ComponentInstance::component_mut)
	}

	pub fn contains_component<T: Component>(&self, entity: Entity) -> bool {
		match self.registry.lookup::<T>() {
			Some(handle) => self.contains_component_by_handle(entity, handle),
			None => false,
		}
	}

	pub fn contains_component_by_handle(&self, entity: Entity, handle: TypeHandle) -> bool {
		self.valid_record(entity).map_or(false, |record| record.component_bits.get(handle.index()))
	}

	/// Number of live components attached to the entity.
	pub fn component_count(&self, entity: Entity) -> usize {
		self.valid_record(entity).map_or(0, EntityRecord::component_count)
	}

	/// The handles of every live component attached to the entity.
	pub fn component_handles(&self, entity: Entity) -> Vec<TypeHandle> {
		match self.valid_record(entity) {
			Some(record) => record.component_bits.ones().map(TypeHandle::new).collect(),
			None => Vec::new(),
		}
	}

	/// Iterates the live components attached to the entity.
	pub fn components(&self, entity: Entity) -> impl Iterator<Item = &dyn Component> + '_ {
		self.valid_record(entity)
			.into_iter()
			.flat_map(|record| record.components.iter().flatten().map(ComponentInstance::component))
	}

	/// Tests an [Aspect] against the entity's live component set.
	pub fn interests(&self, aspect: &Aspect, entity: Entity) -> bool {
		self.valid_record(entity).map_or(false, |record| aspect.interests(&record.component_bits))
	}

	pub fn tag(&self, entity: Entity) -> Option<&str> {
		self.valid_record(entity)?.tag.as_deref()
	}

	/// Resolves a tag to its live entity.
	pub fn entity_by_tag(&self, tag: &str) -> Option<Entity> {
		self.tags.get(tag).copied()
	}

	/// Number of live entities.
	pub fn entity_count(&self) -> usize {
		self.live_count
	}

	/// Iterates the handles of all live entities.
	pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
		self.records.iter().enumerate().filter_map(|(index, record)| match record.live {
			true => Some(Entity {
				index: index as u32,
				version: record.version,
			}),
			false => None,
		})
	}

	/// Applies all queued mutations, in order: component actions (firing
	/// `on_added`/`on_removed`), entity add/remove against the live table,
	/// group changes, then dependency resolution. Returns the batch of
	/// touched entities for system re-evaluation. Each entity's queue is
	/// drained independently; one entity never blocks the rest.
	pub(crate) fn apply_queued(&mut self) -> Vec<Entity> {
		let touched = std::mem::take(&mut self.touched);

		// (1) component add / remove
		for entity in &touched {
			let record = &mut self.records[entity.index as usize];
			if record.version != entity.version {
				continue;
			}

			for action in record.queued_components.drain(..) {
				match action {
					ComponentAction::Add(mut instance) => {
						let handle = instance.handle();
						if record.components.len() <= handle.index() {
							record.components.resize_with(handle.index() + 1, || None);
						}
						debug_assert!(record.components[handle.index()].is_none());

						instance.set_owner(Some(*entity));
						instance.set_pending(PendingAction::None);
						instance.component_mut().on_added(*entity);

						record.components[handle.index()] = Some(instance);
						record.component_bits.set(handle.index(), true);
					},

					ComponentAction::Remove(handle) => {
						let slot = record.components.get_mut(handle.index()).and_then(Option::take);
						if let Some(mut instance) = slot {
							instance.component_mut().on_removed(*entity);
							instance.set_owner(None);
							record.component_bits.set(handle.index(), false);
							self.registry.release(instance);
						}
					},
				}
			}
		}

		// (2) entity add / remove
		for entity in &touched {
			let record = &mut self.records[entity.index as usize];
			if record.version != entity.version {
				continue;
			}

			if record.pending.contains(PendingFlags::REMOVE) {
				for slot in record.components.iter_mut() {
					if let Some(mut instance) = slot.take() {
						instance.component_mut().on_removed(*entity);
						instance.set_owner(None);
						self.registry.release(instance);
					}
				}

				if let Some(tag) = record.tag.take() {
					self.tags.remove(&tag);
				}
				if record.live {
					self.live_count -= 1;
				}

				record.live = false;
				record.version = record.version.wrapping_add(1);
				record.component_bits.clear();
				record.group_bits.clear();
				record.queued_groups.clear();
				record.pending.clear();
				// System bits stay set: the filters clear them when they
				// drop the entity later in this same sync.
				self.free_indices.push(entity.index);
				continue;
			}

			if record.pending.contains(PendingFlags::ADD) && !record.live {
				record.live = true;
				self.live_count += 1;
				if let Some(tag) = &record.tag {
					self.tags.insert(tag.clone(), *entity);
				}
			}
		}

		// (3) group changes
		for entity in &touched {
			let record = &mut self.records[entity.index as usize];
			if record.version != entity.version {
				continue;
			}

			for action in record.queued_groups.drain(..) {
				match action {
					GroupAction::Join(bit) => record.group_bits.set(bit, true),
					GroupAction::Leave(bit) => record.group_bits.set(bit, false),
				}
			}
		}

		// (4) dependency resolution for entities whose composition changed
		for entity in &touched {
			let index = entity.index as usize;
			let record = &self.records[index];
			if record.version != entity.version || !record.live || !record.pending.contains(PendingFlags::RESOLVE) {
				continue;
			}

			for slot in 0..self.records[index].components.len() {
				let Some(mut instance) = self.records[index].components[slot].take() else {
					continue;
				};

				{
					let record = &self.records[index];
					let siblings = SiblingView::new(&record.components, &self.registry);
					instance.component_mut().resolve_dependencies(*entity, &siblings);
				}

				self.records[index].components[slot] = Some(instance);
			}
		}

		touched
	}

	/// Clears the pending markers of the sync batch. Called after every
	/// system has re-evaluated the batch.
	pub(crate) fn finish_sync(&mut self, batch: Vec<Entity>) {
		for entity in batch {
			let record = &mut self.records[entity.index as usize];
			if record.version == entity.version {
				record.pending.clear();
			}
		}
	}

	pub(crate) fn record_mut(&mut self, index: u32) -> &mut EntityRecord {
		&mut self.records[index as usize]
	}

	pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = (Entity, &mut EntityRecord)> + '_ {
		self.records.iter_mut().enumerate().map(|(index, record)| {
			(
				Entity {
					index: index as u32,
					version: record.version,
				},
				record,
			)
		})
	}

	fn valid_record(&self, entity: Entity) -> Option<&EntityRecord> {
		self.records.get(entity.index as usize).filter(|record| record.version == entity.version)
	}

	fn validate_add(&self, entity: Entity, handle: TypeHandle) -> Result<(), EcsError> {
		let record = self.valid_record(entity).ok_or(EcsError::StaleEntity(entity))?;
		if record.component_bits.get(handle.index()) || record.has_queued_add(handle) {
			return Err(EcsError::DuplicateComponent {
				entity,
				type_name: self.registry.type_name(handle),
			});
		}

		Ok(())
	}

	fn queue_add(&mut self, entity: Entity, mut instance: ComponentInstance) {
		instance.set_pending(PendingAction::Add);
		self.records[entity.index as usize].queued_components.push(ComponentAction::Add(instance));
		self.touch(entity, PendingFlags::RESOLVE);
	}

	fn touch(&mut self, entity: Entity, flags: PendingFlags) {
		let record = &mut self.records[entity.index as usize];
		if record.pending.is_empty() {
			self.touched.push(entity);
		}
		record.pending.insert(flags);
	}
}
