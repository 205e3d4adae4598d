//! TileStatsStore: per-position history plus the user's pattern sets
//!
//! Mutated once per revealed tile when a round resolves. All updates are
//! in-memory and infallible; positions are valid by construction.

use chrono::{DateTime, Local, Timelike, Utc};
use tracing::debug;
use crate::BOARD_SIZE;
use crate::types::{
    BoardPosition, GlobalStats, Outcome, RoundResult, TileRecord, TimeBucket, UserPatternSet,
};

/// Learned state for the whole board
#[derive(Debug, Clone, PartialEq)]
pub struct TileStatsStore {
    /// Exactly `BOARD_SIZE` entries, indexed by position
    tiles: Vec<TileRecord>,
    patterns: UserPatternSet,
    global: GlobalStats,
}

impl Default for TileStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TileStatsStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            tiles: vec![TileRecord::default(); BOARD_SIZE],
            patterns: UserPatternSet::default(),
            global: GlobalStats::default(),
        }
    }

    /// Rebuild from persisted parts
    ///
    /// The tile list is padded or truncated to the board, and each record and
    /// the pattern sets are normalized.
    pub fn from_parts(tiles: Vec<TileRecord>, patterns: UserPatternSet, global: GlobalStats) -> Self {
        let mut tiles: Vec<TileRecord> = tiles.into_iter().map(TileRecord::normalized).collect();
        tiles.resize(BOARD_SIZE, TileRecord::default());
        Self {
            tiles,
            patterns: patterns.normalized(),
            global,
        }
    }

    /// Record one reveal at the current local time
    pub fn record_reveal(&mut self, position: BoardPosition, is_mine: bool, round_result: RoundResult) {
        self.record_reveal_at(position, is_mine, round_result, Local::now());
    }

    /// Record one reveal at `at`; the bucket comes from `at`'s local hour
    pub fn record_reveal_at(
        &mut self,
        position: BoardPosition,
        is_mine: bool,
        round_result: RoundResult,
        at: DateTime<Local>,
    ) {
        let outcome = Outcome::from_is_mine(is_mine);
        let bucket = TimeBucket::from_hour(at.hour());
        let tile = &mut self.tiles[position.index()];
        tile.apply(outcome, bucket, at.with_timezone(&Utc));

        self.patterns.associate(position, round_result);

        debug!(
            tile = position.number(),
            ?outcome,
            ?bucket,
            clicks = tile.clicks,
            win_rate = ?tile.win_rate,
            "tile outcome recorded"
        );
    }

    /// Count a resolved round in the global stats
    pub fn record_round(&mut self, result: RoundResult, mine_count: u32, at: DateTime<Utc>) {
        self.global.record_round(result, mine_count, at);
    }

    pub fn tile(&self, position: BoardPosition) -> &TileRecord {
        &self.tiles[position.index()]
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn patterns(&self) -> &UserPatternSet {
        &self.patterns
    }

    pub fn global_stats(&self) -> &GlobalStats {
        &self.global
    }

    /// Forget everything learned
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================
