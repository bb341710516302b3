//! Cascade module - match, remove, compact, repeat
//!
//! A landing piece seeds a work queue. Each round drains the queue, trying every
//! body of the catalog at every queued piece that is still on the grid. Matched
//! pieces are scored and removed. If anything matched, the grid is compacted and
//! the pieces that fell seed the next round. The loop ends on the first round
//! without a match, or when compaction moves nothing.
//!
//! Every match removes at least one piece, so the number of rounds is bounded
//! by the number of locked pieces.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::body::BodyCatalog;
use crate::geometry::within_bounds;
use crate::grid::{Grid, PieceId};
use crate::piece::Piece;
use crate::types::{Pos, Size};

/// Widest bomb footprint the blast scan supports
pub const MAX_BOMB_WIDTH: usize = 8;

/// One completed body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMatch {
    pub body: String,
    pub score: u32,
    /// The removed pieces, in template slot order
    pub pieces: Vec<Piece>,
    /// Zero for the round seeded by the landing piece
    pub round: u32,
}

/// Outcome of a cascade
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeReport {
    pub score: u32,
    pub matches: Vec<BodyMatch>,
    /// Rounds that were run (at least one for a non-empty seed)
    pub rounds: u32,
    /// Pieces moved by compaction over the whole cascade
    pub fallen: usize,
}

impl CascadeReport {
    pub fn removed(&self) -> usize {
        self.matches.iter().map(|m| m.pieces.len()).sum()
    }

    fn absorb(&mut self, other: CascadeReport) {
        self.score = self.score.saturating_add(other.score);
        self.matches.extend(other.matches);
        self.rounds += other.rounds;
        self.fallen += other.fallen;
    }
}

/// Outcome of a bomb landing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BombReport {
    /// Pieces destroyed by the blast (never scored)
    pub destroyed: Vec<Piece>,
    /// Follow-up cascade of the pieces that fell into the gap
    pub cascade: CascadeReport,
}

/// Resolve all body matches triggered by `seeds`, until the board is stable.
pub fn join_and_score_pieces(grid: &mut Grid, catalog: &BodyCatalog, seeds: &[PieceId]) -> CascadeReport {
    let mut report = CascadeReport::default();
    let mut queue: VecDeque<PieceId> = seeds.iter().copied().collect();

    while !queue.is_empty() {
        let round = report.rounds;
        report.rounds += 1;

        let mut matched_any = false;
        while let Some(id) = queue.pop_front() {
            for body in catalog {
                // Consumed earlier in this round, or by a previous body.
                if !grid.is_locked(id) {
                    break;
                }
                let Some(ids) = body.match_at_locked_piece(grid, id) else {
                    continue;
                };

                matched_any = true;
                report.score = report.score.saturating_add(body.score());
                let pieces = ids.into_iter().map(|id| grid.unlock_piece(id)).collect();
                report.matches.push(BodyMatch {
                    body: body.name().to_string(),
                    score: body.score(),
                    pieces,
                    round,
                });
            }
        }

        if !matched_any {
            break;
        }

        let fallen = grid.compact();
        report.fallen += fallen.len();
        queue.extend(fallen);
    }

    report
}

/// Handles of the locked pieces in the row directly beneath a bomb
pub fn pieces_below(grid: &Grid, bomb: &Piece) -> ArrayVec<PieceId, MAX_BOMB_WIDTH> {
    let mut found = ArrayVec::new();
    let footprint = bomb.rotated_size();
    let below = Pos::new(bomb.pos.x, bomb.pos.y + footprint.h);
    let width = footprint.w;

    let inner_min = Pos::new(1, 1);
    let inner_max = Pos::new(grid.width() - 1, grid.height() - 1);
    if !within_bounds(below, Size::UNIT, inner_min, inner_max) {
        return found;
    }

    for dx in 0..width {
        let Some(id) = grid.piece_at(Pos::new(below.x + dx, below.y)) else {
            continue;
        };
        if !found.contains(&id) && found.try_push(id).is_err() {
            break;
        }
    }
    found
}

/// Detonate a landed bomb: destroy the pieces beneath it without scoring, then
/// let the board settle. The bomb itself never touches the grid.
pub fn detonate_bomb(grid: &mut Grid, catalog: &BodyCatalog, bomb: Piece) -> BombReport {
    let destroyed: Vec<Piece> = pieces_below(grid, &bomb)
        .into_iter()
        .map(|id| grid.unlock_piece(id))
        .collect();

    let mut report = BombReport {
        destroyed,
        cascade: CascadeReport::default(),
    };

    if !report.destroyed.is_empty() {
        let fallen = grid.compact();
        report.cascade.fallen += fallen.len();
        if !fallen.is_empty() {
            report
                .cascade
                .absorb(join_and_score_pieces(grid, catalog, &fallen));
        }
    }

    report
}
