//! Zobrist keys for position hashing.
//!
//! Two independent key sets exist: the primary one produces the score-cache
//! key, the check set produces a digest stored alongside each cache entry so
//! that a colliding key is detected instead of returning a foreign score.
//! Both are generated once from fixed seeds, so hashes are reproducible
//! across runs and threads.

use std::sync::OnceLock;

use crate::constants::{MAX_BOARD_SIZE, ZOBRIST_SEED};
use crate::location::Location;
use crate::position::Color;

/// Random keys for every (point, color) pair, every ko point and the side
/// to move.
#[derive(Debug)]
pub struct ZobristKeys {
    stones: Vec<[u64; 2]>,
    ko: Vec<u64>,
    pub white_to_move: u64,
}

impl ZobristKeys {
    /// Generate a key set from `seed`.
    pub fn generate(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let points = MAX_BOARD_SIZE * MAX_BOARD_SIZE;
        Self {
            stones: (0..points).map(|_| [rng.u64(..), rng.u64(..)]).collect(),
            ko: (0..points).map(|_| rng.u64(..)).collect(),
            white_to_move: rng.u64(..),
        }
    }

    fn slot(loc: Location) -> usize {
        (usize::from(loc.row) - 1) * MAX_BOARD_SIZE + usize::from(loc.col) - 1
    }

    pub fn stone(&self, loc: Location, color: Color) -> u64 {
        self.stones[Self::slot(loc)][color.index()]
    }

    pub fn ko(&self, loc: Location) -> u64 {
        self.ko[Self::slot(loc)]
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
static CHECK_KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Primary key set.
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| ZobristKeys::generate(ZOBRIST_SEED))
}

/// Independent key set for cache-hit verification.
pub fn check_keys() -> &'static ZobristKeys {
    CHECK_KEYS.get_or_init(|| ZobristKeys::generate(mix(ZOBRIST_SEED)))
}

/// SplitMix64 finalizer, used to fold plain counters into a digest.
pub fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
