//! Piece module - a placed or falling game object

use crate::geometry::{overlaps, rotate_size};
use crate::types::{PieceKind, Pos, Rotation, Size};

/// A single piece: kind, top-left grid position, rotation and unrotated footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub pos: Pos,
    pub rotation: Rotation,
    pub size: Size,
}

impl Piece {
    /// Create a piece with the intrinsic footprint of its kind
    pub fn new(kind: PieceKind, pos: Pos, rotation: Rotation) -> Self {
        Self {
            kind,
            pos,
            rotation,
            size: kind.size(),
        }
    }

    /// Footprint actually covered on the grid
    pub fn rotated_size(&self) -> Size {
        rotate_size(self.size, self.rotation.degrees())
    }

    /// Check whether this piece's footprint intersects the given region
    pub fn collides_with(&self, pos: Pos, size: Size) -> bool {
        overlaps(self.pos, self.rotated_size(), pos, size)
    }

    /// Every cell covered by the rotated footprint, row by row
    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let origin = self.pos;
        let size = self.rotated_size();
        (0..size.h).flat_map(move |dy| (0..size.w).map(move |dx| Pos::new(origin.x + dx, origin.y + dy)))
    }

    pub fn is_bomb(&self) -> bool {
        self.kind.is_bomb()
    }
}
