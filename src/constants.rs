//! Tuning constants for board analysis, evaluation and search.
//!
//! Several of the life-and-death thresholds are empirically tuned. Changing
//! them alters playing strength, so they are kept together here rather than
//! scattered through the analyzers.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 5;

/// Largest supported board size (limited by the two-letter point encoding).
pub const MAX_BOARD_SIZE: usize = 25;

/// Default board size.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Maximum handicap stones that can be placed on star points.
pub const MAX_HANDICAP: usize = 9;

/// Orthogonal ("nobi") neighbor offsets as (row, col) deltas.
pub const NOBI_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Diagonal neighbor offsets as (row, col) deltas.
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

/// One-point jump offsets as (row, col) deltas.
pub const JUMP_OFFSETS: [(i32, i32); 4] = [(-2, 0), (0, 2), (2, 0), (0, -2)];

// =============================================================================
// Life and Death
// =============================================================================

/// Health gap between neighboring enemy groups beyond which the weaker one
/// is considered to be losing the fight.
pub const DIFFERENCE_THRESHOLD: f32 = 0.6;

/// Groups whose health is below the negative of this value count as dead.
pub const MIN_LIFE_THRESH: f32 = 0.2;

/// Upper bound of the eye potential of a group.
pub const MAX_EYE_POTENTIAL: f32 = 1.9;

/// Divisor applied to the square root of the summed run potentials.
pub const EYE_POTENTIAL_SCALE: f32 = 1.3;

/// Expanded bounding boxes closer than this to an edge snap to it.
pub const EDGE_SNAP_THRESHOLD: usize = 1;

/// Eye spaces of this size or larger are plain territory.
pub const TERRITORIAL_EYE_SIZE: usize = 8;

/// Liberties at or above which a group is not in short-term danger.
pub const SAFE_LIBERTIES: usize = 4;

// =============================================================================
// Territory
// =============================================================================

/// Damping applied to empty regions larger than half the board.
pub const OPEN_REGION_DAMPING: f32 = 0.5;

// =============================================================================
// Evaluation
// =============================================================================

/// Worth assigned to a won game (resignation of the opponent).
pub const WINNING_VALUE: f64 = 10_000.0;

/// Positional value of a stone by line number (index 0 = first line).
pub const LINE_VALUES: [f32; 5] = [-0.5, -0.1, 0.2, 0.15, 0.05];

// =============================================================================
// Search
// =============================================================================

/// Default alpha-beta depth in plies.
pub const DEFAULT_SEARCH_DEPTH: u8 = 2;

/// Default capacity of the shared score cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Default share of ordered candidates kept for the search (percent).
pub const DEFAULT_BEST_MOVES_PERCENTAGE: u8 = 60;

/// Default hard cap on candidates per node.
pub const DEFAULT_MAX_CANDIDATES: usize = 16;

/// Nodes between deadline checks.
pub const TIME_CHECK_INTERVAL: u64 = 256;

/// Splat footprint: Chebyshev radius 2 around a stone, corners excluded.
pub const SPLAT_RADIUS: i32 = 2;

/// Seed for the Zobrist key generator, so hashes are stable across runs.
pub const ZOBRIST_SEED: u64 = 0x5EED_C0DE_600B_A11;
