//! Cascade tests - match, remove, compact, re-match

mod common;

use body_tetris::core::{
    detonate_bomb, join_and_score_pieces, pieces_below, BodyCatalog, BodyPiece, BodyTemplate,
};
use body_tetris::types::{PieceKind, Pos, Rotation};

use common::{fellow_only, fill_grid, grid, piece};

#[test]
fn test_three_fellows_in_one_landing() {
    let mut grid = grid(12, 20);
    let rows = fill_grid(
        &mut grid,
        &[
            "_ _ ^T _ <H",
            "_ >H >H _ vT <T <L",
            ">L >T <H <T <L ^L vH",
        ],
    );
    let before = grid.len();

    let report = join_and_score_pieces(&mut grid, &fellow_only(), &[rows[2][3].unwrap()]);

    assert_eq!(report.score, 3000);
    assert_eq!(report.matches.len(), 3);
    assert!(report.matches.iter().all(|m| m.body == "Fellow" && m.score == 1000));
    assert_eq!(grid.len(), before - report.removed());

    let survivors = [
        (rows[1][1], Pos::new(2, 18)),
        (rows[0][2], Pos::new(3, 18)),
        (rows[1][4], Pos::new(5, 18)),
        (rows[2][5], Pos::new(6, 18)),
        (rows[2][6], Pos::new(7, 18)),
    ];
    assert_eq!(grid.len(), survivors.len());
    for (id, pos) in survivors {
        let id = id.unwrap();
        assert_eq!(grid.get(id).map(|p| p.pos), Some(pos));
    }
    assert!(grid.is_consistent());
}

#[test]
fn test_fallen_pieces_complete_a_second_body() {
    let mut grid = grid(12, 20);
    let rows = fill_grid(&mut grid, &["^H", "^T", "_", "^L", "<H <T <L _ ^H"]);
    let before = grid.len();

    let report = join_and_score_pieces(&mut grid, &BodyCatalog::builtin(), &[rows[4][2].unwrap()]);

    assert_eq!(report.score, 2000);
    let rounds: Vec<u32> = report.matches.iter().map(|m| m.round).collect();
    assert_eq!(rounds, vec![0, 1]);
    assert_eq!(report.fallen, 3);
    assert_eq!(grid.len(), before - 6);

    let bystander = rows[4][4].unwrap();
    assert_eq!(grid.get(bystander).map(|p| p.pos), Some(Pos::new(5, 18)));
}

#[test]
fn test_landing_without_match_runs_one_round() {
    let mut grid = grid(12, 20);
    let rows = fill_grid(&mut grid, &["^H", "^L"]);

    let report = join_and_score_pieces(&mut grid, &BodyCatalog::builtin(), &[rows[1][0].unwrap()]);
    assert_eq!(report.score, 0);
    assert_eq!(report.rounds, 1);
    assert!(report.matches.is_empty());
    assert_eq!(grid.len(), 2);
}

#[test]
fn test_consumed_seed_is_skipped() {
    let mut grid = grid(12, 20);
    let rows = fill_grid(&mut grid, &["^H", "^T", "^L"]);
    let ids: Vec<_> = rows.iter().map(|r| r[0].unwrap()).collect();

    // Every piece of the body is seeded; it must be scored once.
    let report = join_and_score_pieces(&mut grid, &BodyCatalog::builtin(), &ids);
    assert_eq!(report.score, 1000);
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn test_huge_body_scores_saturate() {
    let big = BodyTemplate::new(
        "Big",
        3_000_000_000,
        vec![
            BodyPiece::new(0, 0, Rotation::Up, PieceKind::Head),
            BodyPiece::new(0, 1, Rotation::Up, PieceKind::Torso),
        ],
    );
    let catalog = BodyCatalog::new(vec![big]).unwrap();
    let mut grid = grid(12, 20);
    let rows = fill_grid(&mut grid, &["_ ^H _ ^H", "_ ^T _ ^T"]);

    let seeds = [rows[0][1].unwrap(), rows[0][3].unwrap()];
    let report = join_and_score_pieces(&mut grid, &catalog, &seeds);

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.score, u32::MAX);
    assert!(grid.is_empty());
}

#[test]
fn test_bomb_destroys_row_beneath() {
    let mut grid = grid(12, 20);
    fill_grid(&mut grid, &["_ ^L ^L ^L _ ^H"]);
    let bomb = piece(PieceKind::Bomb, 2, 17, Rotation::Up);

    assert_eq!(pieces_below(&grid, &bomb).len(), 3);
    let report = detonate_bomb(&mut grid, &BodyCatalog::builtin(), bomb);

    assert_eq!(report.destroyed.len(), 3);
    assert!(report.destroyed.iter().all(|p| p.kind == PieceKind::Leg));
    assert_eq!(report.cascade.score, 0);
    assert_eq!(grid.len(), 1);
    assert!(grid.locked_pieces().all(|(_, p)| !p.is_bomb()));
    assert!(grid.piece_at(Pos::new(2, 17)).is_none());
}

#[test]
fn test_bomb_counts_wide_piece_once() {
    let mut grid = grid(12, 20);
    let wide = grid.lock_piece(piece(PieceKind::Bomb, 3, 18, Rotation::Up));
    let bomb = piece(PieceKind::Bomb, 2, 17, Rotation::Up);

    assert_eq!(pieces_below(&grid, &bomb).as_slice(), &[wide]);
    let report = detonate_bomb(&mut grid, &BodyCatalog::builtin(), bomb);
    assert_eq!(report.destroyed.len(), 1);
    assert!(grid.is_empty());
}

#[test]
fn test_bomb_on_floor_destroys_nothing() {
    let mut grid = grid(12, 20);
    fill_grid(&mut grid, &["^L"]);
    let bomb = piece(PieceKind::Bomb, 2, 18, Rotation::Up);

    let report = detonate_bomb(&mut grid, &BodyCatalog::builtin(), bomb);
    assert!(report.destroyed.is_empty());
    assert_eq!(report.cascade.rounds, 0);
    assert_eq!(grid.len(), 1);
}

#[test]
fn test_bomb_gap_lets_pieces_fall_and_match() {
    let mut grid = grid(12, 20);
    let rows = fill_grid(
        &mut grid,
        &["_ _ _ _ _ <L", "", "_ _ _ _ ^J ^J ^J", "_ _ _ <H <T"],
    );
    let bomb = piece(PieceKind::Bomb, 5, 16, Rotation::Up);

    let report = detonate_bomb(&mut grid, &BodyCatalog::builtin(), bomb);

    assert_eq!(report.destroyed.len(), 3);
    assert!(report.destroyed.iter().all(|p| p.kind == PieceKind::TorsoBrokenLeft));
    assert_eq!(report.cascade.fallen, 1);
    assert_eq!(report.cascade.score, 1000);
    assert_eq!(report.cascade.matches[0].pieces.len(), 3);
    assert!(grid.is_empty());
    assert!(grid.get(rows[0][5].unwrap()).is_none());
}
