//! Minesight: statistics and recommendations for the Mines tile-reveal game
//!
//! The host feeds one `Observation` per polling tick into a `RoundTracker`,
//! which records per-tile outcomes at round resolution, re-ranks tiles and
//! sizes recovery bets. Everything here is synchronous and in-memory;
//! persistence goes through the `PatternRepository` port.

pub mod core;
pub mod logging;
pub mod types;

// =============================================================================
// BOARD
// =============================================================================

/// Number of tiles on the 5x5 board
pub const BOARD_SIZE: usize = 25;

/// Outcomes kept per tile (FIFO)
pub const RECENT_OUTCOMES_CAPACITY: usize = 10;

/// Completed rounds kept for exclusion-based suggestions (FIFO)
pub const RECENT_ROUNDS_CAPACITY: usize = 5;

/// Rounds of history before the exclusion panel is considered ready
pub const EXCLUSION_MIN_ROUNDS: usize = 2;

// =============================================================================
// SAFETY SCORE WEIGHTS
// =============================================================================

/// How many trailing outcomes count as "recent"
pub const RECENT_WINDOW: usize = 3;

/// Penalty per bomb in the recent window
pub const RECENT_BOMB_PENALTY: f64 = 10.0;

/// Safe streak must exceed this before the bonus applies
pub const SAFE_STREAK_THRESHOLD: u32 = 2;

/// Bonus per consecutive safe reveal (once above threshold)
pub const SAFE_STREAK_BONUS: f64 = 2.0;

/// Penalty per consecutive mine
pub const MINE_STREAK_PENALTY: f64 = 5.0;

/// Weight applied to the current time bucket's mine rate
pub const TIME_BUCKET_WEIGHT: f64 = 0.5;

/// Adjustment for tiles in the user's win/loss pattern sets
pub const USER_PATTERN_ADJUSTMENT: f64 = 5.0;

/// Upper bound of the safety score
pub const MAX_SCORE: f64 = 100.0;

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Ranked suggestions produced after each resolution
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

/// Tiles returned by the exclusion-based panel
pub const EXCLUSION_SUGGESTION_COUNT: usize = 5;

/// Minimum win rate for a tile to stay in the exclusion panel
pub const EXCLUSION_MIN_WIN_RATE: f64 = 50.0;

/// Win rate above which it is quoted as a reason
pub const REASON_WIN_RATE_THRESHOLD: f64 = 80.0;

/// Hot streak length reported in insights
pub const HOT_STREAK_INSIGHT: u32 = 3;

/// Cold streak length reported in insights
pub const COLD_STREAK_INSIGHT: u32 = 2;

// =============================================================================
// RECOVERY
// =============================================================================

/// Share of bankroll a single recovery bet may use
pub const MAX_BANKROLL_FRACTION: f64 = 0.10;

/// Multiplier used when (mines, gems) is outside the payout table
pub const DEFAULT_MULTIPLIER: f64 = 1.99;

/// Recovery attempts before the display flags exhaustion
pub const MAX_RECOVERY_ATTEMPTS: u32 = 3;

/// Gem goal used when recovery starts
pub const DEFAULT_GEM_GOAL: u32 = 2;

/// Allowed gem goal range
pub const MIN_GEM_GOAL: u32 = 2;
pub const MAX_GEM_GOAL: u32 = 5;

// =============================================================================
// HOST
// =============================================================================

/// Currency code assumed until the site reports one
pub const DEFAULT_CURRENCY: &str = "inr";

/// Polling interval the host is expected to use (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 1000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.3.0";
