//! Game state module - the piece life cycle of one game
//!
//! Ties the grid, the body catalog and the piece generator together: a piece
//! spawns at the top, is moved by actions and gravity, and lands. A landing bomb
//! detonates; any other piece locks and triggers the body cascade. The game ends
//! when a freshly spawned piece does not fit.

use crate::body::BodyCatalog;
use crate::cascade::{detonate_bomb, join_and_score_pieces, BombReport, CascadeReport};
use crate::grid::Grid;
use crate::piece::Piece;
use crate::rng::{PieceGenerator, SpawnWeights};
use crate::types::{GameAction, PieceKind, Size};

/// What happened when a piece landed
#[derive(Debug, Clone, PartialEq)]
pub enum LandingOutcome {
    /// The piece locked; the cascade it triggered (possibly empty)
    Locked(CascadeReport),
    /// A bomb went off
    Detonated(BombReport),
}

impl LandingOutcome {
    pub fn score(&self) -> u32 {
        match self {
            LandingOutcome::Locked(report) => report.score,
            LandingOutcome::Detonated(report) => report.cascade.score,
        }
    }

    pub fn cascade(&self) -> &CascadeReport {
        match self {
            LandingOutcome::Locked(report) => report,
            LandingOutcome::Detonated(report) => &report.cascade,
        }
    }
}

/// Landing event (consumed by observers)
#[derive(Debug, Clone, PartialEq)]
pub struct LandingEvent {
    pub episode_id: u32,
    /// 1-based count of landed pieces in this episode
    pub piece_index: u32,
    /// The piece at its landing position
    pub piece: Piece,
    pub outcome: LandingOutcome,
    /// Score after the landing
    pub total_score: u32,
    /// The landing ended the game
    pub game_over: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    catalog: BodyCatalog,
    generator: PieceGenerator,
    active: Option<Piece>,
    next: Option<Piece>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    pieces_landed: u32,
    last_event: Option<LandingEvent>,
    score: u32,
    game_over: bool,
    started: bool,
}

impl GameState {
    /// Create a new game; call [`GameState::start`] to spawn the first piece
    pub fn new(grid_size: Size, catalog: BodyCatalog, weights: SpawnWeights, seed: u32) -> Self {
        Self {
            grid: Grid::new(grid_size),
            catalog,
            generator: PieceGenerator::new(seed, weights),
            active: None,
            next: None,
            episode_id: 0,
            pieces_landed: 0,
            last_event: None,
            score: 0,
            game_over: false,
            started: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_landed(&self) -> u32 {
        self.pieces_landed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    /// Pieces generated so far, per kind
    pub fn spawn_stats(&self) -> &[u32; PieceKind::COUNT] {
        self.generator.spawn_stats()
    }

    /// Current RNG state
    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }

    /// Take and clear the last landing event.
    pub fn take_last_event(&mut self) -> Option<LandingEvent> {
        self.last_event.take()
    }

    /// Promote the next piece and roll a new one
    pub fn spawn_piece(&mut self) -> bool {
        let width = self.grid.width();
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.generator.generate(width),
        };
        self.next = Some(self.generator.generate(width));

        if !self.grid.fits(&piece) {
            self.game_over = true;
            self.active = None;
            return false;
        }

        self.active = Some(piece);
        true
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        if !self.grid.can_move(active, dx, dy) {
            return false;
        }
        active.pos.x += dx;
        active.pos.y += dy;
        true
    }

    /// Turn the active piece by +90°, keeping the old rotation if the new footprint is blocked
    pub(crate) fn try_rotate(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        if !active.kind.can_rotate() {
            return false;
        }

        let turned = Piece {
            rotation: active.rotation.rotate_ccw(),
            ..*active
        };
        if !self.grid.fits(&turned) {
            return false;
        }
        *active = turned;
        true
    }

    /// Move down one row, landing the piece if it cannot
    fn step_down(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        if !self.try_move(0, 1) {
            self.land();
        }
        true
    }

    /// Hard drop the active piece to the bottom and land it
    pub(crate) fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        self.grid.drop_to_bottom(active);
        self.land();
        true
    }

    /// Land the active piece: detonate or lock, resolve, spawn the next piece
    pub fn land(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let outcome = if piece.is_bomb() {
            LandingOutcome::Detonated(detonate_bomb(&mut self.grid, &self.catalog, piece))
        } else {
            let id = self.grid.lock_piece(piece);
            LandingOutcome::Locked(join_and_score_pieces(&mut self.grid, &self.catalog, &[id]))
        };

        debug_assert!(self.grid.is_consistent(), "grid diverged after landing");

        self.score = self.score.saturating_add(outcome.score());
        self.pieces_landed = self.pieces_landed.wrapping_add(1);

        self.spawn_piece();

        self.last_event = Some(LandingEvent {
            episode_id: self.episode_id,
            piece_index: self.pieces_landed,
            piece,
            outcome,
            total_score: self.score,
            game_over: self.game_over,
        });
    }

    /// One gravity step: move the active piece down or land it
    pub fn tick(&mut self) -> bool {
        if self.game_over || !self.started {
            return false;
        }
        self.step_down()
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                self.restart();
                true
            }
            _ if self.game_over || !self.started => false,
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::Rotate => self.try_rotate(),
            GameAction::SoftDrop => self.step_down(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Start over on an empty grid, continuing the RNG lineage
    fn restart(&mut self) {
        let seed = self.generator.seed();
        let weights = *self.generator.weights();
        self.generator = PieceGenerator::new(seed, weights);
        self.grid.clear();
        self.active = None;
        self.next = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.pieces_landed = 0;
        self.last_event = None;
        self.score = 0;
        self.game_over = false;
        self.started = false;
        self.start();
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self) -> Option<i32> {
        let mut ghost = self.active?;
        self.grid.drop_to_bottom(&mut ghost);
        Some(ghost.pos.y)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(
            Size::new(crate::types::DEFAULT_GRID_WIDTH, crate::types::DEFAULT_GRID_HEIGHT),
            BodyCatalog::builtin(),
            SpawnWeights::default(),
            1,
        )
    }
}
