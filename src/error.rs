use crate::entities::Entity;
use thiserror::Error;

/// Usage errors surfaced immediately at the call site.
///
/// These are never deferred to [sync](crate::context::World::sync) and never
/// swallowed by it: a failed call leaves no queued intent behind.
#[derive(Debug, Error)]
pub enum EcsError {
	#[error("entity {0:?} is stale or has been destroyed")]
	StaleEntity(Entity),

	#[error("component `{type_name}` is already attached or queued on entity {entity:?}")]
	DuplicateComponent { entity: Entity, type_name: &'static str },

	#[error("unknown entity definition `{0}`")]
	UnknownDefinition(String),

	#[error("entity definition `{0}` is already registered")]
	DuplicateDefinition(String),

	#[error("entity definition `{definition}` lists component `{type_name}` more than once")]
	DuplicateDefinitionComponent { definition: String, type_name: &'static str },

	#[error("component `{component}` has no field `{field}`")]
	UnknownField { component: &'static str, field: String },
}
