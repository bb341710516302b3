//! Core types module - shared value types and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain `Copy` data with no external dependencies, so they can be
//! used by the engine, the configuration loader and any rendering collaborator.
//!
//! # Coordinates
//!
//! Grid coordinates are integer cells with the origin in the top-left corner:
//!
//! - **x** grows to the right
//! - **y** grows downward
//!
//! A piece's [`Pos`] is the top-left cell of its rotated footprint.
//!
//! # Rotations
//!
//! Rotations are right angles measured in degrees, counter-clockwise on screen:
//!
//! | Variant | Degrees | Notation |
//! |---------|---------|----------|
//! | `Up`    | 0       | `^`      |
//! | `Left`  | 90      | `<`      |
//! | `Down`  | 180     | `v`      |
//! | `Right` | 270     | `>`      |
//!
//! # Examples
//!
//! ```
//! use body_tetris_types::{PieceKind, Pos, Rotation, Size};
//!
//! let kind = PieceKind::from_str("torso").unwrap();
//! assert_eq!(kind, PieceKind::Torso);
//! assert_eq!(PieceKind::Bomb.size(), Size::new(3, 1));
//!
//! assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Right));
//! assert_eq!(Rotation::Up.rotate_ccw(), Rotation::Left);
//!
//! assert_eq!(Pos::new(2, 3) + Pos::new(1, -1), Pos::new(3, 2));
//! ```

use std::fmt;
use std::ops::{Add, Sub};

/// Default grid width in cells (including the left and right wall columns)
pub const DEFAULT_GRID_WIDTH: i32 = 12;

/// Default grid height in cells (including the bottom wall row)
pub const DEFAULT_GRID_HEIGHT: i32 = 20;

/// Smallest grid accepted by the configuration loader
pub const MIN_GRID_WIDTH: i32 = 5;
pub const MIN_GRID_HEIGHT: i32 = 4;

/// Largest grid accepted by the configuration loader
pub const MAX_GRID_WIDTH: i32 = 1024;
pub const MAX_GRID_HEIGHT: i32 = 1024;

/// Relative spawn weight of a piece kind without an override
pub const DEFAULT_SPAWN_WEIGHT: f32 = 1.0;

/// Relative spawn weight of the Bomb in the built-in configuration
pub const DEFAULT_BOMB_WEIGHT: f32 = 0.1;

/// Integer grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Footprint dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const UNIT: Size = Size { w: 1, h: 1 };

    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Number of cells covered
    pub const fn area(&self) -> i32 {
        self.w * self.h
    }
}

/// Right-angle rotation of a piece (counter-clockwise, in 90° steps)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Up,
    Left,
    Down,
    Right,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Up, Rotation::Left, Rotation::Down, Rotation::Right];

    /// Angle in degrees (0, 90, 180 or 270)
    pub const fn degrees(&self) -> i32 {
        match self {
            Rotation::Up => 0,
            Rotation::Left => 90,
            Rotation::Down => 180,
            Rotation::Right => 270,
        }
    }

    /// Build from any multiple of 90 degrees, negative values included.
    /// Returns None for angles that are not right angles.
    pub const fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Up),
            90 => Some(Rotation::Left),
            180 => Some(Rotation::Down),
            270 => Some(Rotation::Right),
            _ => None,
        }
    }

    /// Quarter turn counter-clockwise (+90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::Up => Rotation::Left,
            Rotation::Left => Rotation::Down,
            Rotation::Down => Rotation::Right,
            Rotation::Right => Rotation::Up,
        }
    }

    /// Arrow notation used in board diagrams
    pub fn as_char(&self) -> char {
        match self {
            Rotation::Up => '^',
            Rotation::Left => '<',
            Rotation::Down => 'v',
            Rotation::Right => '>',
        }
    }

    /// Parse the arrow notation
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '^' => Some(Rotation::Up),
            '<' => Some(Rotation::Left),
            'v' => Some(Rotation::Down),
            '>' => Some(Rotation::Right),
            _ => None,
        }
    }
}

/// Piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Head,
    Torso,
    Leg,
    TorsoBrokenLeft,
    TorsoBrokenRight,
    Bomb,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PieceKind; PieceKind::COUNT] = [
        PieceKind::Head,
        PieceKind::Torso,
        PieceKind::Leg,
        PieceKind::TorsoBrokenLeft,
        PieceKind::TorsoBrokenRight,
        PieceKind::Bomb,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "head" => Some(PieceKind::Head),
            "torso" => Some(PieceKind::Torso),
            "leg" => Some(PieceKind::Leg),
            "torso_broken_left" => Some(PieceKind::TorsoBrokenLeft),
            "torso_broken_right" => Some(PieceKind::TorsoBrokenRight),
            "bomb" => Some(PieceKind::Bomb),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Head => "head",
            PieceKind::Torso => "torso",
            PieceKind::Leg => "leg",
            PieceKind::TorsoBrokenLeft => "torso_broken_left",
            PieceKind::TorsoBrokenRight => "torso_broken_right",
            PieceKind::Bomb => "bomb",
        }
    }

    /// Single-letter tag used in board diagrams
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::Head => 'H',
            PieceKind::Torso => 'T',
            PieceKind::Leg => 'L',
            PieceKind::TorsoBrokenLeft => 'J',
            PieceKind::TorsoBrokenRight => 'K',
            PieceKind::Bomb => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        PieceKind::ALL.into_iter().find(|kind| kind.as_char() == c)
    }

    /// Position of this kind in [`PieceKind::ALL`]
    pub const fn index(&self) -> usize {
        match self {
            PieceKind::Head => 0,
            PieceKind::Torso => 1,
            PieceKind::Leg => 2,
            PieceKind::TorsoBrokenLeft => 3,
            PieceKind::TorsoBrokenRight => 4,
            PieceKind::Bomb => 5,
        }
    }

    /// Unrotated footprint
    pub const fn size(&self) -> Size {
        match self {
            PieceKind::Bomb => Size::new(3, 1),
            _ => Size::UNIT,
        }
    }

    pub const fn is_bomb(&self) -> bool {
        matches!(self, PieceKind::Bomb)
    }

    /// Bombs are rotation-symmetric and never turn.
    pub const fn can_rotate(&self) -> bool {
        !self.is_bomb()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game actions issued by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Restart,
}
