mod bit_field_tests;
mod aspect_tests;

use crate::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct Position {
	pub x: f32,
	pub y: f32,
}

impl Component for Position {
	fn set_field(&mut self, field: &str, value: &str) -> Result<(), EcsError> {
		match field {
			"x" => self.x = value.parse().unwrap_or_default(),
			"y" => self.y = value.parse().unwrap_or_default(),
			_ => {
				return Err(EcsError::UnknownField {
					component: "Position",
					field: field.to_string(),
				})
			},
		}
		Ok(())
	}
}

#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct Velocity {
	pub dx: f32,
	pub dy: f32,
}

impl Component for Velocity {}

#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct Health {
	pub current: i32,
	pub max: i32,
}

impl Component for Health {
	fn receive_message(&mut self, message: &Message) {
		if message.tag() == "damage" {
			if let Some(amount) = message.payload::<i32>() {
				self.current -= amount;
			}
		}
	}

	fn reset(&mut self) {
		*self = Health::default();
	}
}

/// Reports its lifecycle hooks through shared cells.
#[derive(Default)]
pub struct Hook {
	pub added: Rc<Cell<bool>>,
	pub removed: Rc<Cell<bool>>,
}

impl Component for Hook {
	fn on_added(&mut self, _owner: Entity) {
		self.added.set(true);
	}

	fn on_removed(&mut self, _owner: Entity) {
		self.removed.set(true);
	}
}

/// Caches the owner's position at dependency-resolution time.
#[derive(Default)]
pub struct Anchor {
	pub anchored_at: Option<(f32, f32)>,
}

impl Component for Anchor {
	fn resolve_dependencies(&mut self, _owner: Entity, siblings: &SiblingView) {
		self.anchored_at = siblings.get::<Position>().map(|position| (position.x, position.y));
	}
}
