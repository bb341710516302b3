//! Grid module - owns locked pieces and the occupancy matrix
//!
//! The grid keeps three structures in step:
//! - a piece arena that exclusively owns every locked piece
//! - a flat occupancy array (row-major, `y * width + x`) mapping cells to piece ids
//! - the locked list, sorted by `(pos.y, pos.x)`
//!
//! All mutation goes through `link`/`unlink`, so the occupancy array and the
//! locked list never diverge. Violating that pairing (locking a piece twice,
//! unlocking an unknown piece) is a caller bug and panics.
//!
//! Coordinates: (x, y) where x ranges 0..width, y ranges 0..height. The playable
//! region leaves one wall column on the left and on the right and one wall row
//! at the bottom.

use std::fmt;

use crate::geometry::{overlaps, within_bounds};
use crate::piece::Piece;
use crate::types::{Pos, Size};

/// Handle to a locked piece.
///
/// Handles are non-owning: once the piece is unlocked the handle never resolves
/// again, even if its arena slot is reused by a later piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    piece: Option<Piece>,
}

/// The game grid
#[derive(Debug, Clone)]
pub struct Grid {
    size: Size,
    /// Flat array of cells, row-major order (y * width + x)
    occupancy: Vec<Option<PieceId>>,
    /// Locked pieces sorted by (y, x)
    locked: Vec<PieceId>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Grid {
    /// Create an empty grid. Panics on a non-positive size.
    pub fn new(size: Size) -> Self {
        assert!(
            size.w > 0 && size.h > 0,
            "grid size must be positive, got {}x{}",
            size.w,
            size.h
        );
        Self {
            size,
            occupancy: vec![None; size.area() as usize],
            locked: Vec::new(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.w
    }

    pub fn height(&self) -> i32 {
        self.size.h
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.y * self.size.w + pos.x) as usize)
    }

    /// Check if a cell lies inside the grid (walls included)
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.size.w && pos.y >= 0 && pos.y < self.size.h
    }

    /// Top-left corner of the playable region (inclusive)
    pub fn playable_min(&self) -> Pos {
        Pos::new(1, 0)
    }

    /// Bottom-right corner of the playable region (exclusive)
    pub fn playable_max(&self) -> Pos {
        Pos::new(self.size.w - 1, self.size.h - 1)
    }

    /// Check if a piece moved by (dx, dy) stays inside the playable region
    /// without overlapping any locked piece
    pub fn can_move(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        self.can_move_excluding(piece, dx, dy, None)
    }

    /// Check if a piece fits where it currently is
    pub fn fits(&self, piece: &Piece) -> bool {
        self.can_move(piece, 0, 0)
    }

    fn can_move_excluding(&self, piece: &Piece, dx: i32, dy: i32, skip: Option<PieceId>) -> bool {
        let pos = Pos::new(piece.pos.x + dx, piece.pos.y + dy);
        let size = piece.rotated_size();

        if !within_bounds(pos, size, self.playable_min(), self.playable_max()) {
            return false;
        }

        // Pairwise test against every locked piece; boards are small.
        !self.locked.iter().any(|&id| {
            Some(id) != skip && self.piece(id).collides_with(pos, size)
        })
    }

    /// Move a piece down as far as possible. Only the piece itself changes.
    /// Returns the number of rows dropped.
    pub fn drop_to_bottom(&self, piece: &mut Piece) -> i32 {
        let mut rows = 0;
        while self.can_move(piece, 0, 1) {
            piece.pos.y += 1;
            rows += 1;
        }
        rows
    }

    /// Hand a piece over to the grid and return its handle.
    ///
    /// Panics if any footprint cell is outside the grid or already occupied.
    pub fn lock_piece(&mut self, piece: Piece) -> PieceId {
        let id = self.alloc(piece);
        self.link(id);
        id
    }

    /// Remove a locked piece from the grid and return it by value.
    ///
    /// Panics if the piece is not locked.
    pub fn unlock_piece(&mut self, id: PieceId) -> Piece {
        let piece = self.unlink(id);
        self.release(id);
        piece
    }

    /// Resolve a handle to the locked piece
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.piece.as_ref())
    }

    /// Check whether a handle still refers to a locked piece
    pub fn is_locked(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// Handle of the piece covering a cell
    pub fn piece_at(&self, pos: Pos) -> Option<PieceId> {
        self.index(pos).and_then(|idx| self.occupancy[idx])
    }

    /// The piece covering a cell
    pub fn get_piece(&self, pos: Pos) -> Option<&Piece> {
        self.piece_at(pos).and_then(|id| self.get(id))
    }

    /// Locked piece handles, top-to-bottom then left-to-right
    pub fn locked_ids(&self) -> &[PieceId] {
        &self.locked
    }

    /// Locked pieces, top-to-bottom then left-to-right
    pub fn locked_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.locked.iter().map(move |&id| (id, self.piece(id)))
    }

    pub fn len(&self) -> usize {
        self.locked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
    }

    /// Apply gravity to the locked pieces.
    ///
    /// Pieces are visited from the bottom of the sorted list to the top so that
    /// every piece sees the settled positions of the pieces beneath it. A moved
    /// piece keeps its handle. Returns the handles of the pieces that fell.
    pub fn compact(&mut self) -> Vec<PieceId> {
        let mut fallen = Vec::new();

        // A falling piece is re-inserted further down the list, so the entries
        // before `i` are never disturbed.
        let mut i = self.locked.len();
        while i > 0 {
            i -= 1;
            let id = self.locked[i];
            let piece = *self.piece(id);

            let mut dy = 0;
            while self.can_move_excluding(&piece, 0, dy + 1, Some(id)) {
                dy += 1;
            }

            if dy > 0 {
                self.unlink(id);
                if let Some(slot_piece) = self.slot_piece_mut(id) {
                    slot_piece.pos.y += dy;
                }
                self.link(id);
                fallen.push(id);
            }
        }

        fallen
    }

    /// Remove every piece
    pub fn clear(&mut self) {
        for cell in &mut self.occupancy {
            *cell = None;
        }
        // Release rather than drop the slots so old handles stay dead.
        for id in std::mem::take(&mut self.locked) {
            self.release(id);
        }
    }

    /// Check the sort invariant and occupancy consistency
    pub fn is_consistent(&self) -> bool {
        let sorted = self
            .locked
            .windows(2)
            .all(|w| sort_key(self.piece(w[0])) < sort_key(self.piece(w[1])));
        if !sorted {
            return false;
        }

        let mut covered = 0usize;
        for (id, piece) in self.locked_pieces() {
            for cell in piece.cells() {
                if self.piece_at(cell) != Some(id) {
                    return false;
                }
                covered += 1;
            }
        }

        let occupied = self.occupancy.iter().filter(|cell| cell.is_some()).count();
        let live = self.slots.iter().filter(|slot| slot.piece.is_some()).count();
        covered == occupied && live == self.locked.len()
    }

    /// Check whether two locked pieces overlap (never true on a consistent grid)
    pub fn has_overlaps(&self) -> bool {
        let pieces: Vec<&Piece> = self.locked_pieces().map(|(_, p)| p).collect();
        pieces.iter().enumerate().any(|(i, a)| {
            pieces[i + 1..]
                .iter()
                .any(|b| overlaps(a.pos, a.rotated_size(), b.pos, b.rotated_size()))
        })
    }

    fn piece(&self, id: PieceId) -> &Piece {
        match self.get(id) {
            Some(piece) => piece,
            None => panic!("piece {:?} is not owned by the grid", id),
        }
    }

    fn slot_piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.piece.as_mut())
    }

    fn alloc(&mut self, piece: Piece) -> PieceId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.piece = Some(piece);
                PieceId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    piece: Some(piece),
                });
                PieceId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, id: PieceId) {
        let slot = &mut self.slots[id.index as usize];
        slot.piece = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Lower bound of `pos` in the locked list
    fn search(&self, pos: Pos) -> usize {
        let key = (pos.y, pos.x);
        self.locked
            .partition_point(|&other| sort_key(self.piece(other)) < key)
    }

    /// Insert into the locked list and mark the footprint cells
    fn link(&mut self, id: PieceId) {
        let piece = *self.piece(id);
        let idx = self.search(piece.pos);

        if self.locked.get(idx) == Some(&id) {
            panic!("piece {:?} at {} is already in the locked list", piece.kind, piece.pos);
        }

        for cell in piece.cells() {
            let Some(cell_idx) = self.index(cell) else {
                panic!("locking {:?} at {}: cell {} is outside the grid", piece.kind, piece.pos, cell);
            };
            if let Some(other) = self.occupancy[cell_idx] {
                panic!(
                    "locking {:?} at {}: cell {} is already occupied by {:?}",
                    piece.kind, piece.pos, cell, other
                );
            }
        }

        self.locked.insert(idx, id);
        for cell in piece.cells() {
            if let Some(cell_idx) = self.index(cell) {
                self.occupancy[cell_idx] = Some(id);
            }
        }
    }

    /// Remove from the locked list and clear the footprint cells
    fn unlink(&mut self, id: PieceId) -> Piece {
        let Some(&piece) = self.get(id) else {
            panic!("piece {:?} is expected in the locked list", id);
        };
        let idx = self.search(piece.pos);

        if self.locked.get(idx) != Some(&id) {
            panic!("piece {:?} at {} is expected in the locked list", piece.kind, piece.pos);
        }

        self.locked.remove(idx);
        for cell in piece.cells() {
            if let Some(cell_idx) = self.index(cell) {
                debug_assert_eq!(self.occupancy[cell_idx], Some(id));
                self.occupancy[cell_idx] = None;
            }
        }
        piece
    }
}

#[inline]
fn sort_key(piece: &Piece) -> (i32, i32) {
    (piece.pos.y, piece.pos.x)
}

impl fmt::Display for Grid {
    /// One line per row; a piece is drawn on its anchor cell as rotation + kind
    /// (`^H`, `<T`, ...), the rest of its footprint as `##`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.h {
            for x in 0..self.size.w {
                let pos = Pos::new(x, y);
                match self.get_piece(pos) {
                    Some(piece) if piece.pos == pos => {
                        write!(f, "{}{}", piece.rotation.as_char(), piece.kind.as_char())?
                    }
                    Some(_) => f.write_str("##")?,
                    None => f.write_str(" .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
