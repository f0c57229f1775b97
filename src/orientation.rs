//! Axis-aligned orientations of an item.
//!
//! An orientation assigns the item's three extents to the container's
//! length, width and height axes. The enumeration order is fixed because the
//! grid fit keeps the first orientation reaching the best count.

use crate::types::Dimensions;

/// Index orders of the six axis permutations, in enumeration order:
/// (l,w,h), (l,h,w), (w,l,h), (w,h,l), (h,l,w), (h,w,l).
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Generates the candidate orientations of `item`.
///
/// Without rotation only the item as given is returned. With rotation all
/// distinct permutations are returned in the fixed (l,w,h), (l,h,w), (w,l,h),
/// (w,h,l), (h,l,w), (h,w,l) order;
/// permutations equal to an earlier one are dropped, so a cube yields one
/// orientation and an item with two equal extents yields three.
pub fn enumerate_orientations(item: &Dimensions, allow_rotation: bool) -> Vec<Dimensions> {
    if !allow_rotation {
        return vec![*item];
    }

    let extents = item.as_array();
    let mut orientations: Vec<Dimensions> = Vec::with_capacity(PERMUTATIONS.len());
    for [a, b, c] in PERMUTATIONS {
        let candidate = Dimensions::new(extents[a], extents[b], extents[c]);
        if !orientations.contains(&candidate) {
            orientations.push(candidate);
        }
    }
    orientations
}
