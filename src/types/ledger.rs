//! Session money counters and recovery mode state
//!
//! Neither type is persisted: both reset on a fresh load.

use serde::{Deserialize, Serialize};
use crate::{DEFAULT_GEM_GOAL, MAX_GEM_GOAL, MAX_RECOVERY_ATTEMPTS, MIN_GEM_GOAL};

/// Per-session win/loss and money totals
///
/// Invariant: `rounds_played == wins + losses`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLedger {
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_wagered: f64,
    pub total_won: f64,
    pub total_lost: f64,
}

impl SessionLedger {
    /// Count a win paying `bet * multiplier`
    pub fn record_win(&mut self, bet: f64, multiplier: f64) {
        self.wins += 1;
        self.rounds_played += 1;
        self.total_wagered += bet;
        self.total_won += bet * multiplier;
    }

    /// Count a loss of the whole stake
    pub fn record_loss(&mut self, bet: f64) {
        self.losses += 1;
        self.rounds_played += 1;
        self.total_wagered += bet;
        self.total_lost += bet;
    }

    pub fn profit(&self) -> f64 {
        self.total_won - self.total_lost
    }

    /// Win percentage rounded to one decimal, 0 with no rounds
    pub fn win_rate(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        let rate = 100.0 * self.wins as f64 / self.rounds_played as f64;
        (rate * 10.0).round() / 10.0
    }
}

/// Loss-recovery bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryState {
    pub cumulative_loss: f64,
    /// Always within [MIN_GEM_GOAL, MAX_GEM_GOAL]
    pub target_gem_goal: u32,
    pub attempt_count: u32,
    pub max_attempts: u32,
    pub active: bool,
}

impl Default for RecoveryState {
    fn default() -> Self {
        Self {
            cumulative_loss: 0.0,
            target_gem_goal: DEFAULT_GEM_GOAL,
            attempt_count: 0,
            max_attempts: MAX_RECOVERY_ATTEMPTS,
            active: false,
        }
    }
}

impl RecoveryState {
    /// A lost round adds its stake and (re)enters recovery
    pub fn register_loss(&mut self, bet: f64) {
        self.cumulative_loss += bet;
        self.active = true;
        self.attempt_count += 1;
    }

    /// A won round while active ends recovery. Returns true if it was active.
    pub fn register_win(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.cumulative_loss = 0.0;
        self.active = false;
        self.attempt_count = 0;
        true
    }

    /// Set the gem goal, clamped to the supported range
    pub fn set_gem_goal(&mut self, goal: u32) -> u32 {
        self.target_gem_goal = goal.clamp(MIN_GEM_GOAL, MAX_GEM_GOAL);
        self.target_gem_goal
    }

    pub fn exhausted(&self) -> bool {
        self.attempt_count >= self.max_attempts
    }
}

/// Recommended stake for recouping the cumulative loss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub bet_amount: f64,
    /// Raw stake exceeds the bankroll cap
    pub needs_split: bool,
    pub rounds_needed: u32,
    pub multiplier: f64,
    pub profit_multiplier: f64,
}

impl RecoveryPlan {
    /// Profit if one planned bet hits the gem goal
    pub fn expected_win(&self) -> f64 {
        self.bet_amount * self.profit_multiplier
    }
}
