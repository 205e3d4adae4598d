//! Round lifecycle types

use std::collections::{BTreeSet, VecDeque};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::BoardPosition;
use crate::RECENT_ROUNDS_CAPACITY;

/// Terminal result of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
}

impl std::fmt::Display for RoundResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundResult::Win => write!(f, "Win"),
            RoundResult::Loss => write!(f, "Loss"),
        }
    }
}

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    /// No reveal observed in the armed round
    Idle,
    /// At least one reveal, no result yet
    InProgress,
    /// Result processed, waiting for the board to clear
    Resolved(RoundResult),
}

impl RoundPhase {
    pub fn emoji(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "⏳",
            RoundPhase::InProgress => "💎",
            RoundPhase::Resolved(RoundResult::Win) => "✅",
            RoundPhase::Resolved(RoundResult::Loss) => "💣",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, RoundPhase::Resolved(_))
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundPhase::Idle => write!(f, "IDLE"),
            RoundPhase::InProgress => write!(f, "IN_PROGRESS"),
            RoundPhase::Resolved(RoundResult::Win) => write!(f, "RESOLVED_WIN"),
            RoundPhase::Resolved(RoundResult::Loss) => write!(f, "RESOLVED_LOSS"),
        }
    }
}

/// The round currently on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub mine_count: u32,
    /// Reveal order, no duplicates
    pub revealed_positions: Vec<BoardPosition>,
    pub start_time: DateTime<Utc>,
}

impl RoundState {
    pub fn new(mine_count: u32) -> Self {
        Self {
            mine_count,
            revealed_positions: Vec::new(),
            start_time: Utc::now(),
        }
    }

    /// Append a reveal; returns false if it was already recorded
    pub fn reveal(&mut self, position: BoardPosition) -> bool {
        if self.revealed_positions.contains(&position) {
            return false;
        }
        self.revealed_positions.push(position);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.revealed_positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.revealed_positions.len()
    }
}

/// Reveal sets of the last completed rounds, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentRoundsHistory {
    rounds: VecDeque<Vec<BoardPosition>>,
}

impl RecentRoundsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot; empty snapshots are ignored, oldest evicted past capacity
    pub fn push(&mut self, revealed: Vec<BoardPosition>) {
        if revealed.is_empty() {
            return;
        }
        self.rounds.push_front(revealed);
        self.rounds.truncate(RECENT_ROUNDS_CAPACITY);
    }

    /// Drop empty snapshots and anything past capacity, e.g. after a load
    pub fn normalized(mut self) -> Self {
        self.rounds.retain(|r| !r.is_empty());
        self.rounds.truncate(RECENT_ROUNDS_CAPACITY);
        self
    }

    /// Every position played in the kept rounds
    pub fn union(&self) -> BTreeSet<BoardPosition> {
        self.rounds.iter().flatten().copied().collect()
    }

    pub fn rounds(&self) -> impl Iterator<Item = &Vec<BoardPosition>> {
        self.rounds.iter()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn clear(&mut self) {
        self.rounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(indices: &[usize]) -> Vec<BoardPosition> {
        indices.iter().map(|&i| BoardPosition::new(i).unwrap()).collect()
    }

    #[test]
    fn test_reveal_rejects_duplicates() {
        let mut round = RoundState::new(3);
        let p = BoardPosition::new(4).unwrap();
        assert!(round.reveal(p));
        assert!(!round.reveal(p));
        assert_eq!(round.len(), 1);
    }

    #[test]
    fn test_history_fifo() {
        let mut history = RecentRoundsHistory::new();
        for i in 0..7 {
            history.push(positions(&[i]));
        }
        assert_eq!(history.len(), RECENT_ROUNDS_CAPACITY);
        // rounds 0 and 1 were evicted
        let union: Vec<usize> = history.union().iter().map(|p| p.index()).collect();
        assert_eq!(union, vec![2, 3, 4, 5, 6]);
        assert_eq!(history.rounds().next(), Some(&positions(&[6])));
    }

    #[test]
    fn test_history_skips_empty() {
        let mut history = RecentRoundsHistory::new();
        history.push(Vec::new());
        assert!(history.is_empty());
    }

    #[test]
    fn test_normalized_caps_loaded_history() {
        let loaded: RecentRoundsHistory =
            serde_json::from_str("[[0], [], [1, 2], [3], [4], [5], [6], [7]]").unwrap();
        assert_eq!(loaded.len(), 8);

        let history = loaded.normalized();
        assert_eq!(history.len(), RECENT_ROUNDS_CAPACITY);
        assert_eq!(history.rounds().next(), Some(&positions(&[0])));
        let union: Vec<usize> = history.union().iter().map(|p| p.index()).collect();
        assert_eq!(union, vec![0, 1, 2, 3, 4, 5]);
    }
}
