//! SafetyScorer: bounded heuristic score for one tile
//!
//! score = winRate
//!       - 10 * bombs in the last 3 outcomes
//!       + 2 * consecutiveSafe      (only when consecutiveSafe > 2)
//!       - 5 * consecutiveMine
//!       - 0.5 * current bucket mine rate
//!       +/- 5 for user win/loss association
//! clamped to [0, 100]. Not a probability.

use crate::{
    MAX_SCORE, MINE_STREAK_PENALTY, RECENT_BOMB_PENALTY, RECENT_WINDOW,
    SAFE_STREAK_BONUS, SAFE_STREAK_THRESHOLD, TIME_BUCKET_WEIGHT, USER_PATTERN_ADJUSTMENT,
};
use crate::core::TileStatsStore;
use crate::types::{BoardPosition, TimeBucket};

/// Stateless scorer over a `TileStatsStore`
#[derive(Debug, Default, Clone, Copy)]
pub struct SafetyScorer;

impl SafetyScorer {
    /// Create new scorer
    pub fn new() -> Self {
        Self
    }

    /// Score using the current local time bucket
    pub fn score(&self, store: &TileStatsStore, position: BoardPosition) -> f64 {
        self.score_in_bucket(store, position, TimeBucket::current())
    }

    /// Score with an explicit time bucket
    pub fn score_in_bucket(&self, store: &TileStatsStore, position: BoardPosition, bucket: TimeBucket) -> f64 {
        let tile = store.tile(position);

        // no data counts as a zero base, the tile is still ranked
        let mut score = tile.win_rate.unwrap_or(0.0);

        score -= RECENT_BOMB_PENALTY * tile.recent_bombs(RECENT_WINDOW) as f64;

        if tile.consecutive_safe > SAFE_STREAK_THRESHOLD {
            score += SAFE_STREAK_BONUS * tile.consecutive_safe as f64;
        }
        if tile.consecutive_mine > 0 {
            score -= MINE_STREAK_PENALTY * tile.consecutive_mine as f64;
        }

        if let Some(mine_rate) = tile.time_bucket_stats.get(bucket).mine_rate() {
            score -= TIME_BUCKET_WEIGHT * mine_rate;
        }

        let patterns = store.patterns();
        if patterns.is_win_associated(position) {
            score += USER_PATTERN_ADJUSTMENT;
        } else if patterns.is_loss_associated(position) {
            score -= USER_PATTERN_ADJUSTMENT;
        }

        score.clamp(0.0, MAX_SCORE)
    }
}

// =============================================================================
// TESTS
// =============================================================================
