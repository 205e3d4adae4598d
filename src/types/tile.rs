//! Per-tile history records

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::RECENT_OUTCOMES_CAPACITY;

/// Result of revealing one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Safe,
    Bomb,
}

impl Outcome {
    pub fn from_is_mine(is_mine: bool) -> Self {
        if is_mine {
            Outcome::Bomb
        } else {
            Outcome::Safe
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self, Outcome::Bomb)
    }
}

/// Local time-of-day window used to segment statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    /// [6, 12)
    Morning,
    /// [12, 18)
    Afternoon,
    /// [18, 24)
    Evening,
    /// [0, 6)
    Night,
}

impl TimeBucket {
    /// Display order used by the time-slot panel
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
    ];

    /// Bucket for a local hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeBucket::Night,
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            _ => TimeBucket::Evening,
        }
    }

    /// Bucket for the current local time
    pub fn current() -> Self {
        use chrono::Timelike;
        Self::from_hour(chrono::Local::now().hour())
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "Morning (6-12)",
            TimeBucket::Afternoon => "Afternoon (12-18)",
            TimeBucket::Evening => "Evening (18-24)",
            TimeBucket::Night => "Night (0-6)",
        }
    }
}

/// Games and mines seen in one time bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    pub games: u32,
    pub mines: u32,
}

impl BucketStats {
    /// Mine rate in percent, `None` without games
    pub fn mine_rate(&self) -> Option<f64> {
        (self.games > 0).then(|| 100.0 * self.mines as f64 / self.games as f64)
    }
}

/// Bucket breakdown for one tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucketStats {
    pub morning: BucketStats,
    pub afternoon: BucketStats,
    pub evening: BucketStats,
    pub night: BucketStats,
}

impl TimeBucketStats {
    pub fn get(&self, bucket: TimeBucket) -> &BucketStats {
        match bucket {
            TimeBucket::Morning => &self.morning,
            TimeBucket::Afternoon => &self.afternoon,
            TimeBucket::Evening => &self.evening,
            TimeBucket::Night => &self.night,
        }
    }

    pub fn get_mut(&mut self, bucket: TimeBucket) -> &mut BucketStats {
        match bucket {
            TimeBucket::Morning => &mut self.morning,
            TimeBucket::Afternoon => &mut self.afternoon,
            TimeBucket::Evening => &mut self.evening,
            TimeBucket::Night => &mut self.night,
        }
    }
}

/// Everything learned about one board position
///
/// Invariants after every update:
/// - `clicks == safe_count + bomb_count`
/// - at most one of `consecutive_safe` / `consecutive_mine` is non-zero
/// - `hot_streak == consecutive_safe`, `cold_streak == consecutive_mine`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileRecord {
    pub clicks: u32,
    pub safe_count: u32,
    pub bomb_count: u32,
    pub last_outcome: Option<Outcome>,
    pub last_update: Option<DateTime<Utc>>,
    pub last_mine_time: Option<DateTime<Utc>>,
    /// Oldest first, capped at `RECENT_OUTCOMES_CAPACITY`
    pub recent_outcomes: VecDeque<Outcome>,
    pub consecutive_safe: u32,
    pub consecutive_mine: u32,
    pub hot_streak: u32,
    pub cold_streak: u32,
    /// `100 * safe / clicks`; `None` until the first reveal
    pub win_rate: Option<f64>,
    pub time_bucket_stats: TimeBucketStats,
}

impl TileRecord {
    /// Fold one outcome into the record
    pub fn apply(&mut self, outcome: Outcome, bucket: TimeBucket, at: DateTime<Utc>) {
        self.clicks += 1;
        match outcome {
            Outcome::Safe => {
                self.safe_count += 1;
                self.consecutive_safe += 1;
                self.consecutive_mine = 0;
            }
            Outcome::Bomb => {
                self.bomb_count += 1;
                self.consecutive_mine += 1;
                self.consecutive_safe = 0;
                self.last_mine_time = Some(at);
            }
        }
        self.hot_streak = self.consecutive_safe;
        self.cold_streak = self.consecutive_mine;

        self.last_outcome = Some(outcome);
        self.last_update = Some(at);

        self.recent_outcomes.push_back(outcome);
        self.trim_recent();
        self.refresh_win_rate();

        let slot = self.time_bucket_stats.get_mut(bucket);
        slot.games += 1;
        if outcome.is_bomb() {
            slot.mines += 1;
        }
    }

    /// Re-derive the cached fields of a record read from storage
    ///
    /// The win rate is recomputed from the counters, so a value that lost
    /// a bit in text form never comes back.
    pub fn normalized(mut self) -> Self {
        self.trim_recent();
        self.refresh_win_rate();
        self
    }

    fn trim_recent(&mut self) {
        while self.recent_outcomes.len() > RECENT_OUTCOMES_CAPACITY {
            self.recent_outcomes.pop_front();
        }
    }

    fn refresh_win_rate(&mut self) {
        self.win_rate = (self.clicks > 0).then(|| 100.0 * self.safe_count as f64 / self.clicks as f64);
    }

    /// Bombs among the last `n` outcomes
    pub fn recent_bombs(&self, n: usize) -> usize {
        self.recent_outcomes
            .iter()
            .rev()
            .take(n)
            .filter(|o| o.is_bomb())
            .count()
    }

    pub fn has_data(&self) -> bool {
        self.clicks > 0
    }

    /// Counter-only view written to the blob's `basic` section
    pub fn to_basic(&self) -> BasicTile {
        BasicTile {
            clicks: self.clicks,
            safe: self.safe_count,
            bombs: self.bomb_count,
            last_result: self.last_outcome,
            last_update: self.last_update,
        }
    }

    /// Seed a record from counters alone (blobs without an analysis section)
    pub fn from_basic(basic: &BasicTile) -> Self {
        let mut record = Self {
            clicks: basic.safe + basic.bombs,
            safe_count: basic.safe,
            bomb_count: basic.bombs,
            last_outcome: basic.last_result,
            last_update: basic.last_update,
            ..Self::default()
        };
        record.refresh_win_rate();
        record
    }
}

/// TileRecord without the analysis fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicTile {
    pub clicks: u32,
    pub safe: u32,
    pub bombs: u32,
    pub last_result: Option<Outcome>,
    pub last_update: Option<DateTime<Utc>>,
}
