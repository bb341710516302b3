//! RNG module - weighted random piece generation
//!
//! Piece kinds are drawn with relative weights (1.0 unless overridden; the Bomb
//! is rarer by default). Every piece except the Bomb also gets a random
//! right-angle rotation.
//!
//! Also provides a simple LCG so that a seed reproduces a game exactly.

use crate::piece::Piece;
use crate::types::{PieceKind, Pos, Rotation, DEFAULT_BOMB_WEIGHT, DEFAULT_SPAWN_WEIGHT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Scale from the high bits; the low bits of an LCG have short periods.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Generate random value in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Current state (seeds a new game with the same lineage)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Relative spawn weight per piece kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWeights {
    weights: [f32; PieceKind::COUNT],
}

impl SpawnWeights {
    /// Every kind equally likely
    pub fn uniform() -> Self {
        Self {
            weights: [DEFAULT_SPAWN_WEIGHT; PieceKind::COUNT],
        }
    }

    pub fn get(&self, kind: PieceKind) -> f32 {
        self.weights[kind.index()]
    }

    /// Override the weight of a kind.
    /// Returns false (and keeps the old weight) unless the weight is positive and finite.
    pub fn set(&mut self, kind: PieceKind, weight: f32) -> bool {
        if !(weight.is_finite() && weight > 0.0) {
            return false;
        }
        self.weights[kind.index()] = weight;
        true
    }

    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Pick the kind that a uniform sample in [0, 1) falls on
    fn pick(&self, sample: f32) -> PieceKind {
        let mut remaining = sample * self.total();
        for kind in PieceKind::ALL {
            let weight = self.get(kind);
            if remaining < weight {
                return kind;
            }
            remaining -= weight;
        }
        // Rounding may leave a sliver past the last bucket.
        PieceKind::ALL[PieceKind::COUNT - 1]
    }
}

impl Default for SpawnWeights {
    fn default() -> Self {
        let mut weights = Self::uniform();
        weights.set(PieceKind::Bomb, DEFAULT_BOMB_WEIGHT);
        weights
    }
}

/// Weighted piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    weights: SpawnWeights,
    /// Pieces generated per kind
    spawn_stats: [u32; PieceKind::COUNT],
}

impl PieceGenerator {
    pub fn new(seed: u32, weights: SpawnWeights) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            weights,
            spawn_stats: [0; PieceKind::COUNT],
        }
    }

    /// Draw a piece kind and count it
    pub fn choose_kind(&mut self) -> PieceKind {
        let kind = self.weights.pick(self.rng.next_f32());
        self.spawn_stats[kind.index()] += 1;
        kind
    }

    /// Generate the next piece, centred on the top row of a grid of the given width
    pub fn generate(&mut self, grid_width: i32) -> Piece {
        let kind = self.choose_kind();
        let rotation = if kind.can_rotate() {
            Rotation::ALL[self.rng.next_range(4) as usize]
        } else {
            Rotation::Up
        };

        let mut piece = Piece::new(kind, Pos::ORIGIN, rotation);
        piece.pos.x = grid_width / 2 - piece.rotated_size().w / 2;
        piece
    }

    pub fn weights(&self) -> &SpawnWeights {
        &self.weights
    }

    pub fn spawn_stats(&self) -> &[u32; PieceKind::COUNT] {
        &self.spawn_stats
    }

    pub fn spawn_count(&self, kind: PieceKind) -> u32 {
        self.spawn_stats[kind.index()]
    }

    /// Get the current RNG state (for restarting game with same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1, SpawnWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_range_and_f32_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(4) < 4);
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_rotation_is_not_periodic() {
        // The low two bits of the LCG repeat every four draws; rotations must not.
        let mut rng = SimpleRng::new(99);
        let draws: Vec<u32> = (0..64).map(|_| rng.next_range(4)).collect();
        assert!(draws.chunks(4).any(|c| c != &draws[0..4]));
    }

    #[test]
    fn test_pick_buckets() {
        let mut weights = SpawnWeights::uniform();
        assert!(weights.set(PieceKind::Bomb, 0.5));
        // total = 5.5
        assert_eq!(weights.pick(0.0), PieceKind::Head);
        assert_eq!(weights.pick(1.5 / 5.5), PieceKind::Torso);
        assert_eq!(weights.pick(5.2 / 5.5), PieceKind::Bomb);
        assert_eq!(weights.pick(0.999_999), PieceKind::Bomb);
    }

    #[test]
    fn test_set_rejects_invalid_weight() {
        let mut weights = SpawnWeights::uniform();
        assert!(!weights.set(PieceKind::Leg, 0.0));
        assert!(!weights.set(PieceKind::Leg, -1.0));
        assert!(!weights.set(PieceKind::Leg, f32::NAN));
        assert_eq!(weights.get(PieceKind::Leg), 1.0);
    }

    #[test]
    fn test_bomb_never_rotates() {
        let mut weights = SpawnWeights::uniform();
        for kind in PieceKind::ALL {
            if kind != PieceKind::Bomb {
                weights.set(kind, 1e-6);
            }
        }
        let mut generator = PieceGenerator::new(3, weights);
        for _ in 0..200 {
            let piece = generator.generate(12);
            if piece.kind == PieceKind::Bomb {
                assert_eq!(piece.rotation, Rotation::Up);
                assert_eq!(piece.pos, Pos::new(5, 0));
            }
        }
        assert!(generator.spawn_count(PieceKind::Bomb) > 150);
    }
}
