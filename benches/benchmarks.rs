use aspect_ecs::prelude::*;
use criterion::*;
use nalgebra_glm::{Mat4, Vec3};

const COUNT: usize = 10000;

#[derive(Default)]
struct Transform(Mat4);

impl Component for Transform {}

#[derive(Default)]
struct Translation(Vec3);

impl Component for Translation {}

#[derive(Default)]
struct Rotation(Vec3);

impl Component for Rotation {}

#[derive(Default)]
struct Velocity(Vec3);

impl Component for Velocity {}

struct MovementSystem {
	filter: EntityFilter,
}

impl MovementSystem {
	fn new(entities: &mut EntityStore) -> Self {
		let transform = entities.handle_of::<Transform>();
		let translation = entities.handle_of::<Translation>();
		let rotation = entities.handle_of::<Rotation>();
		let velocity = entities.handle_of::<Velocity>();
		Self {
			filter: EntityFilter::new(Aspect::all(&[transform, translation, rotation, velocity])),
		}
	}
}

impl System for MovementSystem {
	fn filter(&self) -> &EntityFilter {
		&self.filter
	}

	fn filter_mut(&mut self) -> &mut EntityFilter {
		&mut self.filter
	}

	fn process(&mut self, entities: &mut EntityStore) {
		for entity in self.filter.entities() {
			let velocity = entities.component::<Velocity>(*entity).unwrap().0;
			let rotation = entities.component::<Rotation>(*entity).unwrap().0;

			let translation = {
				let translation = entities.component_mut::<Translation>(*entity).unwrap();
				translation.0 += velocity;
				translation.0
			};

			let transform = entities.component_mut::<Transform>(*entity).unwrap();
			transform.0 = Mat4::new_translation(&translation) * Mat4::new_rotation(rotation);
		}
	}
}

fn populate(world: &mut World, count: usize) -> Vec<Entity> {
	let entities = (0..count)
		.map(|_| {
			let entity = world.create_entity();
			world.add_component(entity, Transform::default()).unwrap();
			world.add_component(entity, Translation::default()).unwrap();
			world.add_component(entity, Rotation::default()).unwrap();
			world.add_component(entity, Velocity(Vec3::new(1.0, 0.0, 0.0))).unwrap();
			entity
		})
		.collect();

	world.sync();
	entities
}

fn create_entities(c: &mut Criterion) {
	c.bench_function("Create entities", |b| {
		b.iter_batched(
			World::new,
			|mut world| {
				populate(&mut world, COUNT);
				world
			},
			BatchSize::PerIteration,
		);
	});
}

fn destroy_entities(c: &mut Criterion) {
	c.bench_function("Destroy entities", |b| {
		b.iter_batched(
			|| {
				let mut world = World::new();
				let entities = populate(&mut world, COUNT);
				(world, entities)
			},
			|(mut world, entities)| {
				for entity in entities {
					world.destroy_entity(entity);
				}
				world.sync();
				world
			},
			BatchSize::PerIteration,
		);
	});
}

fn process_entities(c: &mut Criterion) {
	c.bench_function("Process entities", |b| {
		let mut world = World::new();
		let system = MovementSystem::new(&mut world);
		world.register_system(system);
		world.setup_systems();
		populate(&mut world, COUNT);

		b.iter(|| world.process());
	});
}

fn membership_churn(c: &mut Criterion) {
	c.bench_function("Membership churn", |b| {
		let mut world = World::new();
		let system = MovementSystem::new(&mut world);
		world.register_system(system);
		world.setup_systems();
		let entities = populate(&mut world, COUNT);

		b.iter(|| {
			for entity in &entities {
				world.remove_component::<Velocity>(*entity);
			}
			world.sync();

			for entity in &entities {
				world.add_component(*entity, Velocity::default()).unwrap();
			}
			world.sync();
		});
	});
}

fn broadcast_messages(c: &mut Criterion) {
	c.bench_function("Broadcast messages", |b| {
		let mut world = World::new();
		let entities = populate(&mut world, COUNT);
		let message = Message::with_payload("pulse", 1.0f32);

		b.iter(|| {
			for entity in &entities {
				world.broadcast(*entity, &message).unwrap();
			}
		});
	});
}

criterion_group!(
	benchmarks,
	create_entities,
	destroy_entities,
	process_entities,
	membership_churn,
	broadcast_messages,
);
criterion_main!(benchmarks);
