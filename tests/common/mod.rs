//! Shared helpers for the integration tests

#![allow(dead_code)]

use body_tetris::core::{BodyCatalog, Grid, Piece, PieceId};
use body_tetris::types::{PieceKind, Pos, Rotation, Size};

/// Lock the pieces of a board diagram onto the grid.
///
/// Each row is a list of whitespace-separated cells: `_` for empty, otherwise
/// rotation arrow plus kind letter (`^H`, `<T`, `vL`, `>K`, ...). Columns start
/// at x = 1 (inside the left wall) and the last row sits directly on the
/// bottom wall. Returns the handles row by row, `None` for empty cells.
pub fn fill_grid(grid: &mut Grid, rows: &[&str]) -> Vec<Vec<Option<PieceId>>> {
    let top = grid.height() - 1 - rows.len() as i32;
    rows.iter()
        .enumerate()
        .map(|(row, line)| {
            line.split_whitespace()
                .enumerate()
                .map(|(col, cell)| {
                    let piece = parse_cell(cell)?;
                    let pos = Pos::new(1 + col as i32, top + row as i32);
                    Some(grid.lock_piece(Piece { pos, ..piece }))
                })
                .collect()
        })
        .collect()
}

fn parse_cell(cell: &str) -> Option<Piece> {
    if cell == "_" {
        return None;
    }
    let mut chars = cell.chars();
    let rotation = chars.next().and_then(Rotation::from_char);
    let kind = chars.next().and_then(PieceKind::from_char);
    match (rotation, kind) {
        (Some(rotation), Some(kind)) => Some(Piece::new(kind, Pos::ORIGIN, rotation)),
        _ => panic!("bad cell '{}'", cell),
    }
}

pub fn piece(kind: PieceKind, x: i32, y: i32, rotation: Rotation) -> Piece {
    Piece::new(kind, Pos::new(x, y), rotation)
}

/// Catalog with the Fellow body only
pub fn fellow_only() -> BodyCatalog {
    let fellow = BodyCatalog::builtin().find("Fellow").cloned();
    match fellow {
        Some(fellow) => BodyCatalog::new(vec![fellow]).unwrap(),
        None => panic!("builtin catalog lost its Fellow"),
    }
}

pub fn grid(w: i32, h: i32) -> Grid {
    Grid::new(Size::new(w, h))
}
