//! Geometry module - right-angle transforms and rectangle predicates
//!
//! Pure functions on grid coordinates. Angles are plain degrees so that the
//! matching engine can subtract rotations and normalise the result here.

use crate::types::{Pos, Size};

/// Normalise an angle into [0, 360)
#[inline]
pub fn normalize_degrees(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

/// Rotate a point about the origin by a multiple of 90 degrees.
/// Angles that are not right angles leave the point unchanged.
pub fn rotate_point(p: Pos, angle: i32) -> Pos {
    match normalize_degrees(angle) {
        90 => Pos::new(-p.y, p.x),
        180 => Pos::new(-p.x, -p.y),
        270 => Pos::new(p.y, -p.x),
        _ => p,
    }
}

/// Footprint after rotation (width and height swap at 90 and 270 degrees)
pub fn rotate_size(size: Size, angle: i32) -> Size {
    match normalize_degrees(angle) {
        90 | 270 => Size::new(size.h, size.w),
        _ => size,
    }
}

/// Check that `[pos, pos + size)` lies within `[min, max)` on both axes
#[inline]
pub fn within_bounds(pos: Pos, size: Size, min: Pos, max: Pos) -> bool {
    pos.x >= min.x && pos.y >= min.y && pos.x + size.w <= max.x && pos.y + size.h <= max.y
}

/// Half-open rectangle intersection
#[inline]
pub fn overlaps(pos_a: Pos, size_a: Size, pos_b: Pos, size_b: Size) -> bool {
    pos_a.x < pos_b.x + size_b.w
        && pos_b.x < pos_a.x + size_a.w
        && pos_a.y < pos_b.y + size_b.h
        && pos_b.y < pos_a.y + size_a.h
}

/// Angle equality modulo 360
#[inline]
pub fn angle_equals(a: i32, b: i32) -> bool {
    normalize_degrees(a - b) == 0
}
