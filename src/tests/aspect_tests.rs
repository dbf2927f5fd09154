use crate::components::TypeHandle;
use crate::data_structures::BitField;
use crate::entities::Aspect;

fn handles() -> (TypeHandle, TypeHandle, TypeHandle) {
	(TypeHandle::new(0), TypeHandle::new(1), TypeHandle::new(2))
}

#[test]
pub fn unconfigured_aspect_matches_nothing() {
	let aspect = Aspect::builder().build();

	assert!(!aspect.interests(&BitField::new()));
	assert!(!aspect.interests(&BitField::from(&[0, 1, 2][..])));
}

#[test]
pub fn all_requires_every_listed_type() {
	let (a, b, _) = handles();
	let aspect = Aspect::all(&[a, b]);

	assert!(aspect.interests(&BitField::from(&[0, 1][..])));
	assert!(aspect.interests(&BitField::from(&[0, 1, 2][..])), "Extra components must not disqualify");
	assert!(!aspect.interests(&BitField::from(&[0][..])));
	assert!(!aspect.interests(&BitField::new()));
}

#[test]
pub fn any_requires_at_least_one_listed_type() {
	let (a, b, _) = handles();
	let aspect = Aspect::any(&[a, b]);

	assert!(aspect.interests(&BitField::from(&[0][..])));
	assert!(aspect.interests(&BitField::from(&[1, 2][..])));
	assert!(!aspect.interests(&BitField::from(&[2][..])));
}

#[test]
pub fn exclude_rejects_listed_types() {
	let (a, b, c) = handles();
	let aspect = Aspect::builder().all(a).exclude(c).build();

	assert!(aspect.interests(&BitField::from(&[0][..])));
	assert!(!aspect.interests(&BitField::from(&[0, 2][..])));

	// A pure exclusion matches anything not carrying the excluded types.
	let exclusion = Aspect::exclude(&[b]);
	assert!(exclusion.interests(&BitField::from(&[0][..])));
	assert!(exclusion.interests(&BitField::new()));
	assert!(!exclusion.interests(&BitField::from(&[1][..])));
}

#[test]
pub fn clauses_combine_conjunctively() {
	let (a, b, c) = handles();
	let aspect = Aspect::builder().all(a).any(b).any(c).exclude(TypeHandle::new(3)).build();

	assert!(aspect.interests(&BitField::from(&[0, 1][..])));
	assert!(aspect.interests(&BitField::from(&[0, 2][..])));
	assert!(!aspect.interests(&BitField::from(&[0][..])), "The any clause must reject when none are present");
	assert!(!aspect.interests(&BitField::from(&[1, 2][..])), "The all clause must reject when missing");
	assert!(!aspect.interests(&BitField::from(&[0, 1, 3][..])), "The exclude clause must reject");
}
