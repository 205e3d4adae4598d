//! Reason codes for tick outcomes

use serde::{Deserialize, Serialize};

/// Why a tick did (or did not) move the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum TickReason {
    // =========================================================================
    // R001: Data availability
    // =========================================================================
    /// Board state could not be read this tick
    R001_NO_BOARD_DATA,

    // =========================================================================
    // R002: Idle
    // =========================================================================
    /// Board armed, waiting for the first reveal
    R002_WAITING_FOR_REVEAL,

    // =========================================================================
    // R003: In progress
    // =========================================================================
    /// First reveal of the round observed
    R003_ROUND_STARTED,
    /// Further reveals appended to the round
    R003_REVEALS_APPENDED,
    /// Round running, nothing new
    R003_ROUND_IN_PROGRESS,

    // =========================================================================
    // R004: Resolution
    // =========================================================================
    /// Payout observed, round recorded as a win
    R004_WIN_RESOLVED,
    /// Mine observed, round recorded as a loss
    R004_LOSS_RESOLVED,
    /// Result already processed, waiting for the board to clear
    R004_AWAITING_CLEAR,
    /// Result signal arrived outside a running round
    R004_SIGNAL_IGNORED,

    // =========================================================================
    // R005: Reset
    // =========================================================================
    /// Board cleared after a result, next round armed
    R005_ROUND_ARMED,
    /// Board cleared before any result, reveals dropped unrecorded
    R005_ROUND_ABANDONED,
}

impl TickReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R001_NO_BOARD_DATA => "R001_NO_BOARD_DATA",
            Self::R002_WAITING_FOR_REVEAL => "R002_WAITING_FOR_REVEAL",
            Self::R003_ROUND_STARTED => "R003_ROUND_STARTED",
            Self::R003_REVEALS_APPENDED => "R003_REVEALS_APPENDED",
            Self::R003_ROUND_IN_PROGRESS => "R003_ROUND_IN_PROGRESS",
            Self::R004_WIN_RESOLVED => "R004_WIN_RESOLVED",
            Self::R004_LOSS_RESOLVED => "R004_LOSS_RESOLVED",
            Self::R004_AWAITING_CLEAR => "R004_AWAITING_CLEAR",
            Self::R004_SIGNAL_IGNORED => "R004_SIGNAL_IGNORED",
            Self::R005_ROUND_ARMED => "R005_ROUND_ARMED",
            Self::R005_ROUND_ABANDONED => "R005_ROUND_ABANDONED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R001_NO_BOARD_DATA => "No board data this tick",
            Self::R002_WAITING_FOR_REVEAL => "Waiting for first reveal",
            Self::R003_ROUND_STARTED => "Round started",
            Self::R003_REVEALS_APPENDED => "New reveals recorded",
            Self::R003_ROUND_IN_PROGRESS => "Round in progress",
            Self::R004_WIN_RESOLVED => "Round won",
            Self::R004_LOSS_RESOLVED => "Round lost",
            Self::R004_AWAITING_CLEAR => "Waiting for board to clear",
            Self::R004_SIGNAL_IGNORED => "Result signal outside a round",
            Self::R005_ROUND_ARMED => "Next round armed",
            Self::R005_ROUND_ABANDONED => "Round abandoned without result",
        }
    }

    /// True for ticks that changed persisted analysis
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::R004_WIN_RESOLVED | Self::R004_LOSS_RESOLVED)
    }
}

impl std::fmt::Display for TickReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
