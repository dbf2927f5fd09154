use std::collections::HashMap;

/// Interns group names to bit indices in an entity's group membership field.
///
/// Groups partition entities by coarse tags independently of component
/// composition. A bit is assigned the first time a name is joined and stays
/// stable for the registry's lifetime.
pub(crate) struct GroupRegistry {
	bits: HashMap<String, usize>,
	names: Vec<String>,
}

impl GroupRegistry {
	pub fn new() -> Self {
		Self {
			bits: HashMap::new(),
			names: Vec::new(),
		}
	}

	/// Returns the bit of `name`, interning it on first use.
	pub fn bit_of(&mut self, name: &str) -> usize {
		if let Some(bit) = self.bits.get(name) {
			return *bit;
		}

		let bit = self.names.len();
		self.bits.insert(name.to_string(), bit);
		self.names.push(name.to_string());

		log::debug!("created entity group `{}` as bit {}", name, bit);
		bit
	}

	pub fn lookup(&self, name: &str) -> Option<usize> {
		self.bits.get(name).copied()
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}
}
