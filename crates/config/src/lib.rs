//! Engine configuration - JSON file plus environment overrides
//!
//! Everything is validated here, at load time, so that a running game never
//! sees a malformed catalog or weight table.
//!
//! Environment variables:
//!
//! - `BODY_TETRIS_CONFIG`: path of a JSON config file
//! - `BODY_TETRIS_SEED`: overrides the seed
//! - `BODY_TETRIS_LOG_PATH`: enables the JSON-lines landing log
//!
//! # Example
//!
//! ```
//! use body_tetris_config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "grid": { "width": 10, "height": 16 }, "seed": 7 }"#).unwrap();
//! assert_eq!(config.grid_size.w, 10);
//! assert_eq!(config.catalog.len(), 3);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use body_tetris_core::{BodyCatalog, BodyPiece, BodyTemplate, CatalogError, GameState, SpawnWeights};
use body_tetris_types::{
    PieceKind, Rotation, Size, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, MAX_GRID_HEIGHT, MAX_GRID_WIDTH, MIN_GRID_HEIGHT,
    MIN_GRID_WIDTH,
};

pub mod event_log;

pub use event_log::{EventLog, LandingRecord};

pub const ENV_CONFIG: &str = "BODY_TETRIS_CONFIG";
pub const ENV_SEED: &str = "BODY_TETRIS_SEED";
pub const ENV_LOG_PATH: &str = "BODY_TETRIS_LOG_PATH";

pub const DEFAULT_SEED: u32 = 1;

/// On-disk layout of a config file. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Piece kind spelling -> relative weight
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub spawn_weights: BTreeMap<String, f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodies: Option<Vec<BodyDef>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyDef {
    pub name: String,
    pub score: u32,
    pub pieces: Vec<BodyPieceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyPieceDef {
    pub x: i32,
    pub y: i32,
    /// Degrees; any multiple of 90, negative allowed
    #[serde(default)]
    pub rotation: i32,
    pub kind: String,
}

impl From<&BodyTemplate> for BodyDef {
    fn from(body: &BodyTemplate) -> Self {
        Self {
            name: body.name().to_string(),
            score: body.score(),
            pieces: body
                .pieces()
                .iter()
                .map(|p| BodyPieceDef {
                    x: p.pos.x,
                    y: p.pos.y,
                    rotation: p.rotation.degrees(),
                    kind: p.kind.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Validated engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub grid_size: Size,
    pub seed: u32,
    pub weights: SpawnWeights,
    pub catalog: BodyCatalog,
    pub log_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: Size::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT),
            seed: DEFAULT_SEED,
            weights: SpawnWeights::default(),
            catalog: BodyCatalog::builtin(),
            log_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json).map_err(ConfigError::Json)?;
        Self::from_file(file)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validate a parsed config file, filling gaps with the built-in defaults
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(grid) = file.grid {
            if grid.width < MIN_GRID_WIDTH || grid.height < MIN_GRID_HEIGHT {
                return Err(ConfigError::GridTooSmall {
                    width: grid.width,
                    height: grid.height,
                });
            }
            if grid.width > MAX_GRID_WIDTH || grid.height > MAX_GRID_HEIGHT {
                return Err(ConfigError::GridTooLarge {
                    width: grid.width,
                    height: grid.height,
                });
            }
            config.grid_size = Size::new(grid.width, grid.height);
        }

        if let Some(seed) = file.seed {
            config.seed = seed;
        }

        for (name, weight) in &file.spawn_weights {
            let kind = parse_kind(name)?;
            if !config.weights.set(kind, *weight) {
                return Err(ConfigError::BadWeight { kind, weight: *weight });
            }
        }

        if let Some(bodies) = file.bodies {
            let templates = bodies
                .into_iter()
                .map(build_template)
                .collect::<Result<Vec<_>, _>>()?;
            config.catalog = BodyCatalog::new(templates).map_err(ConfigError::Catalog)?;
        }

        Ok(config)
    }

    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = lookup(ENV_CONFIG)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(seed) = lookup(ENV_SEED).and_then(|s| s.trim().parse().ok()) {
            config.seed = seed;
        }

        config.log_path = lookup(ENV_LOG_PATH)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Ok(config)
    }

    /// A fresh, not yet started game with this configuration
    pub fn new_game(&self) -> GameState {
        GameState::new(self.grid_size, self.catalog.clone(), self.weights, self.seed)
    }

    /// Serialisable form (for writing a starter config file)
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            grid: Some(GridSection {
                width: self.grid_size.w,
                height: self.grid_size.h,
            }),
            seed: Some(self.seed),
            spawn_weights: PieceKind::ALL
                .iter()
                .map(|&kind| (kind.as_str().to_string(), self.weights.get(kind)))
                .collect(),
            bodies: Some(self.catalog.iter().map(BodyDef::from).collect()),
        }
    }
}

fn parse_kind(name: &str) -> Result<PieceKind, ConfigError> {
    PieceKind::from_str(name).ok_or_else(|| ConfigError::UnknownKind(name.to_string()))
}

fn build_template(def: BodyDef) -> Result<BodyTemplate, ConfigError> {
    let mut pieces = Vec::with_capacity(def.pieces.len());
    for p in &def.pieces {
        let kind = parse_kind(&p.kind)?;
        let rotation = Rotation::from_degrees(p.rotation).ok_or_else(|| ConfigError::BadRotation {
            body: def.name.clone(),
            degrees: p.rotation,
        })?;
        pieces.push(BodyPiece::new(p.x, p.y, rotation, kind));
    }
    Ok(BodyTemplate::new(def.name, def.score, pieces))
}

/// Rejected configuration
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    UnknownKind(String),
    BadRotation { body: String, degrees: i32 },
    GridTooSmall { width: i32, height: i32 },
    GridTooLarge { width: i32, height: i32 },
    BadWeight { kind: PieceKind, weight: f32 },
    Catalog(CatalogError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            ConfigError::Json(e) => write!(f, "invalid config JSON: {}", e),
            ConfigError::UnknownKind(name) => write!(f, "unknown piece kind '{}'", name),
            ConfigError::BadRotation { body, degrees } => {
                write!(f, "body '{}' has rotation {}, expected a multiple of 90", body, degrees)
            }
            ConfigError::GridTooSmall { width, height } => write!(
                f,
                "grid {}x{} is smaller than the minimum {}x{}",
                width, height, MIN_GRID_WIDTH, MIN_GRID_HEIGHT
            ),
            ConfigError::GridTooLarge { width, height } => write!(
                f,
                "grid {}x{} is larger than the maximum {}x{}",
                width, height, MAX_GRID_WIDTH, MAX_GRID_HEIGHT
            ),
            ConfigError::BadWeight { kind, weight } => {
                write!(f, "spawn weight {} for '{}' must be positive and finite", weight, kind)
            }
            ConfigError::Catalog(e) => write!(f, "invalid body catalog: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json(e) => Some(e),
            ConfigError::Catalog(e) => Some(e),
            _ => None,
        }
    }
}
