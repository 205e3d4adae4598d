//! Cross-tile pattern sets and global counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{BoardPosition, RoundResult};

/// Positions associated with the user's wins or losses
///
/// A position is in at most one set. Insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatternSet {
    pub win_associated: Vec<BoardPosition>,
    pub loss_associated: Vec<BoardPosition>,
}

impl UserPatternSet {
    /// Move `position` into the set matching `result`
    pub fn associate(&mut self, position: BoardPosition, result: RoundResult) {
        let (target, other) = match result {
            RoundResult::Win => (&mut self.win_associated, &mut self.loss_associated),
            RoundResult::Loss => (&mut self.loss_associated, &mut self.win_associated),
        };
        if !target.contains(&position) {
            target.push(position);
        }
        other.retain(|p| *p != position);
    }

    /// Drop duplicates; a position in both sets stays win-associated
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::new();
        self.win_associated.retain(|p| {
            let first = !seen.contains(p);
            seen.push(*p);
            first
        });
        self.loss_associated.retain(|p| {
            let first = !seen.contains(p);
            seen.push(*p);
            first
        });
        self
    }

    pub fn is_win_associated(&self, position: BoardPosition) -> bool {
        self.win_associated.contains(&position)
    }

    pub fn is_loss_associated(&self, position: BoardPosition) -> bool {
        self.loss_associated.contains(&position)
    }
}

/// Lifetime round counters, persisted with the analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    /// Running mean over resolved rounds
    pub average_mine_count: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl GlobalStats {
    pub fn record_round(&mut self, result: RoundResult, mine_count: u32, at: DateTime<Utc>) {
        self.total_games += 1;
        match result {
            RoundResult::Win => self.total_wins += 1,
            RoundResult::Loss => self.total_losses += 1,
        }
        let n = self.total_games as f64;
        self.average_mine_count += (mine_count as f64 - self.average_mine_count) / n;
        self.last_updated = Some(at);
    }

    /// Percentage of recorded rounds won, `None` before the first round
    pub fn win_rate(&self) -> Option<f64> {
        (self.total_games > 0).then(|| 100.0 * self.total_wins as f64 / self.total_games as f64)
    }
}
