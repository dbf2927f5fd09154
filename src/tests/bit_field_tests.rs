use crate::data_structures::BitField;

#[test]
pub fn set_and_get() {
	let mut bitfield = BitField::new();
	assert!(!bitfield.get(0), "A fresh bitfield should have no bits set");

	bitfield.set(3, true);
	bitfield.set(64, true);

	assert!(bitfield.get(3));
	assert!(bitfield.get(64), "Setting a bit past the first block should grow the field");
	assert!(!bitfield.get(4));
	assert!(!bitfield.get(1000), "Bits that were never set must read as false");
}

#[test]
pub fn clearing_a_bit_beyond_capacity_is_a_no_op() {
	let mut bitfield = BitField::new();
	bitfield.set(500, false);
	assert_eq!(0, bitfield.capacity(), "Clearing an unset bit should not grow the field");
}

#[test]
pub fn clear_resets_all_bits() {
	let mut bitfield = BitField::from(&[1, 40, 130][..]);
	bitfield.clear();

	assert!(bitfield.is_empty());
	assert!(bitfield.capacity() >= 130, "Clear should retain the capacity");
}

#[test]
pub fn contains_all_and_intersects() {
	let a = BitField::from(&[1, 5, 70][..]);
	let b = BitField::from(&[1, 70][..]);
	let c = BitField::from(&[2][..]);

	assert!(a.contains_all(&b));
	assert!(!b.contains_all(&a));
	assert!(a.contains_all(&BitField::new()), "The empty set is a subset of everything");

	assert!(a.intersects(&b));
	assert!(!a.intersects(&c));
	assert!(!a.intersects(&BitField::new()));
}

#[test]
pub fn contains_all_ignores_trailing_zero_blocks() {
	let small = BitField::from(&[3][..]);
	let mut large = BitField::from(&[3][..]);
	large.ensure_capacity(512);

	assert!(small.contains_all(&large));
	assert!(large.contains_all(&small));

	large.set(700, true);
	assert!(!small.contains_all(&large));
}

#[test]
pub fn equality_ignores_capacity() {
	let a = BitField::from(&[0, 90][..]);
	let mut b = BitField::from(&[0, 90][..]);
	b.ensure_capacity(1024);

	assert_eq!(a, b);

	b.set(1023, true);
	assert_ne!(a, b);
}

#[test]
pub fn ones_iterates_in_ascending_order() {
	let bitfield = BitField::from(&[0, 63, 64, 200][..]);
	let indices = bitfield.ones().collect::<Vec<_>>();

	assert_eq!(vec![0, 63, 64, 200], indices);
	assert_eq!(4, bitfield.count_ones());
}
