mod component;
mod component_pool;
mod component_registry;

pub use component::*;
pub use component_pool::*;
pub use component_registry::*;
