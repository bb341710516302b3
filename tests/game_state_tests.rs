//! Game state tests - spawn, movement, landing and game over

use body_tetris::core::{
    BodyCatalog, BodyPiece, BodyTemplate, GameState, LandingOutcome, SimpleRng, SpawnWeights,
};
use body_tetris::types::{GameAction, PieceKind, Pos, Rotation, Size};

fn only(kind: PieceKind) -> SpawnWeights {
    let mut weights = SpawnWeights::uniform();
    for other in PieceKind::ALL {
        if other != kind {
            weights.set(other, 1e-9);
        }
    }
    weights
}

fn started(size: Size, catalog: BodyCatalog, weights: SpawnWeights, seed: u32) -> GameState {
    let mut game = GameState::new(size, catalog, weights, seed);
    game.start();
    game
}

#[test]
fn test_move_stops_at_walls() {
    let mut game = started(Size::new(12, 20), BodyCatalog::builtin(), only(PieceKind::Head), 1);
    let mut moves = 0;
    while game.apply_action(GameAction::MoveLeft) {
        moves += 1;
    }
    assert_eq!(moves, 5);
    assert_eq!(game.active().unwrap().pos, Pos::new(1, 0));

    while game.apply_action(GameAction::MoveRight) {}
    assert_eq!(game.active().unwrap().pos.x, 10);
}

#[test]
fn test_soft_drop_moves_one_row_then_lands() {
    let mut game = started(Size::new(8, 5), BodyCatalog::builtin(), only(PieceKind::Torso), 1);
    for y in 1..=3 {
        assert!(game.apply_action(GameAction::SoftDrop));
        assert_eq!(game.active().unwrap().pos.y, y);
    }
    assert_eq!(game.pieces_landed(), 0);
    assert!(game.apply_action(GameAction::SoftDrop));
    assert_eq!(game.pieces_landed(), 1);
    assert_eq!(game.grid().len(), 1);
}

#[test]
fn test_landing_leg_completes_single_piece_body() {
    let solo = BodyTemplate::new("Solo", 10, vec![BodyPiece::new(0, 0, Rotation::Up, PieceKind::Leg)]);
    let catalog = BodyCatalog::new(vec![solo]).unwrap();
    let mut game = started(Size::new(12, 20), catalog, only(PieceKind::Leg), 3);

    for n in 1..=5 {
        assert!(game.apply_action(GameAction::HardDrop));
        let event = game.take_last_event().unwrap();
        assert_eq!(event.piece_index, n);
        assert_eq!(event.outcome.score(), 10);
        assert_eq!(event.total_score, 10 * n);
        assert!(matches!(event.outcome, LandingOutcome::Locked(_)));
    }
    assert!(game.grid().is_empty());
    assert_eq!(game.score(), 50);
}

#[test]
fn test_bomb_never_locks() {
    let mut game = started(Size::new(12, 20), BodyCatalog::builtin(), only(PieceKind::Bomb), 3);
    for _ in 0..10 {
        game.apply_action(GameAction::HardDrop);
        let event = game.take_last_event().unwrap();
        match event.outcome {
            LandingOutcome::Detonated(report) => assert!(report.destroyed.is_empty()),
            other => panic!("expected a detonation, got {:?}", other),
        }
    }
    assert!(game.grid().is_empty());
    assert!(!game.game_over());
    assert_eq!(game.score(), 0);
}

#[test]
fn test_game_over_then_restart() {
    let mut game = started(Size::new(5, 4), BodyCatalog::builtin(), only(PieceKind::Head), 11);
    // Three playable rows in the centre column.
    for _ in 0..3 {
        game.apply_action(GameAction::HardDrop);
    }
    assert!(game.game_over());
    assert!(!game.apply_action(GameAction::HardDrop));
    assert!(!game.tick());

    assert!(game.apply_action(GameAction::Restart));
    assert!(!game.game_over());
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.pieces_landed(), 0);
    assert!(game.grid().is_empty());
    assert!(game.active().is_some());
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed: u32| {
        let mut game = started(Size::new(12, 20), BodyCatalog::builtin(), SpawnWeights::default(), seed);
        let mut rng = SimpleRng::new(seed);
        let actions = [GameAction::MoveLeft, GameAction::MoveRight, GameAction::Rotate, GameAction::HardDrop];
        for _ in 0..400 {
            if game.game_over() {
                break;
            }
            game.apply_action(actions[rng.next_range(4) as usize]);
        }
        (game.score(), game.pieces_landed(), game.grid().to_string())
    };
    assert_eq!(play(17), play(17));
}

#[test]
fn test_random_play_keeps_grid_consistent() {
    let mut game = started(Size::new(10, 16), BodyCatalog::builtin(), SpawnWeights::default(), 2718);
    let mut rng = SimpleRng::new(99);
    let mut scored = 0;

    while game.pieces_landed() < 300 && !game.game_over() {
        for _ in 0..rng.next_range(4) {
            game.apply_action(GameAction::Rotate);
        }
        let shift = rng.next_range(9) as i32 - 4;
        let action = if shift < 0 { GameAction::MoveLeft } else { GameAction::MoveRight };
        for _ in 0..shift.abs() {
            game.apply_action(action);
        }
        game.apply_action(GameAction::HardDrop);

        if let Some(event) = game.take_last_event() {
            scored += event.outcome.score();
            assert_eq!(event.total_score, scored);
        }
        assert!(game.grid().is_consistent());
        assert!(!game.grid().has_overlaps());
        if let Some(active) = game.active() {
            assert!(game.grid().fits(&active));
        }
    }
    assert_eq!(game.score(), scored);
    let spawned: u32 = game.spawn_stats().iter().sum();
    assert!(spawned >= game.pieces_landed());
}

#[test]
fn test_ghost_matches_hard_drop() {
    let mut game = started(Size::new(12, 20), BodyCatalog::builtin(), only(PieceKind::Torso), 4);
    let ghost = game.ghost_y().unwrap();
    let x = game.active().unwrap().pos.x;
    game.apply_action(GameAction::HardDrop);
    assert_eq!(game.take_last_event().unwrap().piece.pos, Pos::new(x, ghost));
}
