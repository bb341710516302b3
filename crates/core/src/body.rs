//! Body module - shape templates and the matching engine
//!
//! A body is a named, scored arrangement of piece kinds at fixed relative
//! positions and rotations. The template is expressed in its own local
//! coordinate system; matching pins that system onto a locked anchor piece:
//!
//! - the anchor's template slot becomes the origin
//! - `slot.rotation - anchor.rotation` is the rotation that maps template space
//!   onto grid space
//!
//! Every slot is then transformed and checked against the grid. A body matches
//! completely or not at all.

use std::fmt;

use crate::geometry::{angle_equals, overlaps, rotate_point, rotate_size};
use crate::grid::{Grid, PieceId};
use crate::types::{PieceKind, Pos, Rotation, Size};

/// One slot of a body template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPiece {
    /// Position in the body's local coordinate system
    pub pos: Pos,
    pub rotation: Rotation,
    pub kind: PieceKind,
}

impl BodyPiece {
    pub fn new(x: i32, y: i32, rotation: Rotation, kind: PieceKind) -> Self {
        Self {
            pos: Pos::new(x, y),
            rotation,
            kind,
        }
    }

    fn rotated_size(&self) -> Size {
        rotate_size(self.kind.size(), self.rotation.degrees())
    }
}

/// A named, scored body shape
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTemplate {
    name: String,
    score: u32,
    pieces: Vec<BodyPiece>,
    /// Piece kind -> indices into `pieces`, in declaration order
    slots_by_kind: [Vec<usize>; PieceKind::COUNT],
}

impl BodyTemplate {
    pub fn new(name: impl Into<String>, score: u32, pieces: Vec<BodyPiece>) -> Self {
        let mut slots_by_kind: [Vec<usize>; PieceKind::COUNT] = Default::default();
        for (idx, piece) in pieces.iter().enumerate() {
            slots_by_kind[piece.kind.index()].push(idx);
        }

        Self {
            name: name.into(),
            score,
            pieces,
            slots_by_kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pieces(&self) -> &[BodyPiece] {
        &self.pieces
    }

    /// Slots requiring the given kind, in declaration order
    pub fn slots_for(&self, kind: PieceKind) -> &[usize] {
        &self.slots_by_kind[kind.index()]
    }

    /// Top-left corner and extent of the template in its local coordinates
    pub fn bounding_box(&self) -> (Pos, Size) {
        let Some(first) = self.pieces.first() else {
            return (Pos::ORIGIN, Size::default());
        };

        let mut min = first.pos;
        let mut max = first.pos;
        for piece in &self.pieces {
            let size = piece.rotated_size();
            min.x = min.x.min(piece.pos.x);
            min.y = min.y.min(piece.pos.y);
            max.x = max.x.max(piece.pos.x + size.w);
            max.y = max.y.max(piece.pos.y + size.h);
        }
        (min, Size::new(max.x - min.x, max.y - min.y))
    }

    /// Check the template on its own
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.pieces.is_empty() {
            return Err(CatalogError::EmptyBody {
                name: self.name.clone(),
            });
        }
        if self.score == 0 {
            return Err(CatalogError::ZeroScore {
                name: self.name.clone(),
            });
        }
        if self.pieces.iter().any(|p| p.kind.is_bomb()) {
            return Err(CatalogError::BombSlot {
                name: self.name.clone(),
            });
        }

        for (i, a) in self.pieces.iter().enumerate() {
            for b in &self.pieces[i + 1..] {
                if overlaps(a.pos, a.rotated_size(), b.pos, b.rotated_size()) {
                    return Err(CatalogError::OverlappingSlots {
                        name: self.name.clone(),
                        pos: b.pos,
                    });
                }
            }
        }
        Ok(())
    }

    /// Try to find this body on the grid, anchored at a locked piece.
    ///
    /// Every slot whose kind equals the anchor's kind is tried as the anchor's
    /// place in the template, in declaration order; the first complete match
    /// wins. Returns the handles of all matched pieces.
    pub fn match_at_locked_piece(&self, grid: &Grid, anchor: PieceId) -> Option<Vec<PieceId>> {
        let kind = grid.get(anchor)?.kind;

        self.slots_for(kind)
            .iter()
            .find_map(|&idx| self.match_body_piece_at_locked_piece(grid, &self.pieces[idx], anchor))
            .filter(|matched| !matched.is_empty())
    }

    /// Try to find this body on the grid assuming the anchor sits in `slot`.
    pub fn match_body_piece_at_locked_piece(
        &self,
        grid: &Grid,
        slot: &BodyPiece,
        anchor: PieceId,
    ) -> Option<Vec<PieceId>> {
        let anchor_piece = grid.get(anchor)?;
        let origin = slot.pos;
        let body_rotation = slot.rotation.degrees() - anchor_piece.rotation.degrees();

        let mut matched = Vec::with_capacity(self.pieces.len());
        for bp in &self.pieces {
            let target = anchor_piece.pos + rotate_point(bp.pos - origin, body_rotation);

            if !grid.contains(target) {
                return None;
            }
            let id = grid.piece_at(target)?;
            let piece = grid.get(id)?;

            if piece.kind != bp.kind {
                return None;
            }
            // The cell may only be covered by a larger piece anchored elsewhere.
            if piece.pos != target {
                return None;
            }
            if !angle_equals(piece.rotation.degrees(), bp.rotation.degrees() - body_rotation) {
                return None;
            }

            matched.push(id);
        }

        Some(matched)
    }
}

/// Immutable, validated set of body templates
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCatalog {
    bodies: Vec<BodyTemplate>,
}

impl BodyCatalog {
    /// Validate and wrap a list of templates
    pub fn new(bodies: Vec<BodyTemplate>) -> Result<Self, CatalogError> {
        if bodies.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (i, body) in bodies.iter().enumerate() {
            body.validate()?;
            if bodies[..i].iter().any(|other| other.name == body.name) {
                return Err(CatalogError::DuplicateName {
                    name: body.name.clone(),
                });
            }
        }

        Ok(Self { bodies })
    }

    /// The designer catalog shipped with the game
    pub fn builtin() -> Self {
        use PieceKind::*;
        use Rotation::Up;

        Self {
            bodies: vec![
                BodyTemplate::new(
                    "Fellow",
                    1000,
                    vec![
                        BodyPiece::new(0, 0, Up, Head),
                        BodyPiece::new(0, 1, Up, Torso),
                        BodyPiece::new(0, 2, Up, Leg),
                    ],
                ),
                BodyTemplate::new(
                    "Long Fellow",
                    2500,
                    vec![
                        BodyPiece::new(0, 0, Up, Head),
                        BodyPiece::new(0, 1, Up, Torso),
                        BodyPiece::new(0, 2, Up, Torso),
                        BodyPiece::new(0, 3, Up, Leg),
                    ],
                ),
                BodyTemplate::new(
                    "Siamese Twins",
                    4000,
                    vec![
                        BodyPiece::new(0, 0, Up, Head),
                        BodyPiece::new(1, 0, Up, Head),
                        BodyPiece::new(0, 1, Up, TorsoBrokenRight),
                        BodyPiece::new(1, 1, Up, TorsoBrokenLeft),
                        BodyPiece::new(0, 2, Up, Leg),
                        BodyPiece::new(1, 2, Up, Leg),
                    ],
                ),
            ],
        }
    }

    pub fn bodies(&self) -> &[BodyTemplate] {
        &self.bodies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BodyTemplate> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&BodyTemplate> {
        self.bodies.iter().find(|body| body.name == name)
    }
}

impl Default for BodyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a BodyCatalog {
    type Item = &'a BodyTemplate;
    type IntoIter = std::slice::Iter<'a, BodyTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

/// Rejected catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    EmptyBody { name: String },
    ZeroScore { name: String },
    DuplicateName { name: String },
    OverlappingSlots { name: String, pos: Pos },
    BombSlot { name: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "body catalog is empty"),
            CatalogError::EmptyBody { name } => write!(f, "body '{}' has no pieces", name),
            CatalogError::ZeroScore { name } => write!(f, "body '{}' must award a positive score", name),
            CatalogError::DuplicateName { name } => write!(f, "body '{}' is defined more than once", name),
            CatalogError::OverlappingSlots { name, pos } => {
                write!(f, "body '{}' has overlapping pieces at {}", name, pos)
            }
            CatalogError::BombSlot { name } => {
                write!(f, "body '{}' uses a bomb, which never locks on the grid", name)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = BodyCatalog::builtin();
        let validated = BodyCatalog::new(builtin.bodies().to_vec()).unwrap();
        assert_eq!(validated, builtin);
        assert!(builtin.find("Fellow").is_some());
    }

    #[test]
    fn test_slots_index_keeps_declaration_order() {
        let catalog = BodyCatalog::builtin();
        let twins = catalog.find("Siamese Twins").unwrap();
        assert_eq!(twins.slots_for(PieceKind::Head), &[0, 1]);
        assert_eq!(twins.slots_for(PieceKind::Leg), &[4, 5]);
        assert!(twins.slots_for(PieceKind::Torso).is_empty());
    }

    #[test]
    fn test_bounding_box() {
        let catalog = BodyCatalog::builtin();
        let (pos, size) = catalog.find("Siamese Twins").unwrap().bounding_box();
        assert_eq!(pos, Pos::new(0, 0));
        assert_eq!(size, Size::new(2, 3));
    }
}
