//! Render model handed to the display layer after each tick

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use crate::types::{
    BoardPosition, ExclusionAdvice, RecoveryPlan, RoundPhase, RoundResult,
    SessionLedger, SuggestionSummary, TickReason, TimeBucket,
};

/// Everything the overlay shows, recomputed every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub timestamp: DateTime<Utc>,
    pub phase: RoundPhase,
    pub reason: TickReason,
    /// "Waiting...", "New Round", "In Progress", "Win" or "Loss"
    pub status: String,
    pub multiplier: f64,
    pub potential_win: f64,
    pub tiles_revealed: usize,
    pub mine_count: u32,
    /// Percent chance the next reveal is a gem
    pub gem_chance: f64,
    pub gems_left: i64,
    pub tiles_left: i64,
    pub currency: String,
    pub ledger: SessionLedger,
    pub profit: f64,
    pub recovery: RecoveryDisplay,
    pub suggestions: SuggestionSummary,
    pub exclusion: ExclusionAdvice,
    pub insights: Insights,
    pub time_slots: Vec<TimeSlotSummary>,
    /// Empty when the heatmap is disabled
    pub heatmap: Vec<HeatmapCell>,
}

impl RenderModel {
    /// One-line summary with colors
    pub fn to_terminal_string(&self) -> String {
        let line = self.to_parseable_string();
        let tinted = match self.phase {
            RoundPhase::Idle => line.dimmed(),
            RoundPhase::InProgress => line.yellow(),
            RoundPhase::Resolved(RoundResult::Win) => line.green(),
            RoundPhase::Resolved(RoundResult::Loss) => line.red(),
        };
        format!("{} {}", self.phase.emoji(), tinted)
    }

    /// One-line summary without colors
    pub fn to_parseable_string(&self) -> String {
        let mut line = format!(
            "status={} | tiles={} | mult={:.2}x | gem={:.1}% | W/L={}/{} | profit={:.2}",
            self.status,
            self.tiles_revealed,
            self.multiplier,
            self.gem_chance,
            self.ledger.wins,
            self.ledger.losses,
            self.profit,
        );
        if let Some(plan) = self.recovery.plan.filter(|_| self.recovery.active) {
            line.push_str(&format!(" | recovery_bet={:.2}", plan.bet_amount));
        }
        if let Some(first) = self.suggestions.current_suggestions.first() {
            line.push_str(&format!(" | best={} ({:.1})", first.position.number(), first.confidence_score));
        }
        line
    }
}

/// Recovery panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryDisplay {
    pub active: bool,
    pub cumulative_loss: f64,
    pub gem_goal: u32,
    pub attempts: u32,
    pub max_attempts: u32,
    pub exhausted: bool,
    /// Present only while active
    pub plan: Option<RecoveryPlan>,
    pub expected_win: f64,
    /// "Split into N rounds of X" when the cap bites
    pub split_warning: Option<String>,
}

/// Compact stats for the popup window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupStats {
    pub total_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

impl From<&SessionLedger> for PopupStats {
    fn from(ledger: &SessionLedger) -> Self {
        Self {
            total_rounds: ledger.rounds_played,
            wins: ledger.wins,
            losses: ledger.losses,
            win_rate: ledger.win_rate(),
        }
    }
}

/// Insight panel lines and status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// "Active" once any round was recorded, else "Analyzing..."
    pub status: String,
    pub lines: Vec<String>,
    pub hot_tiles: Vec<BoardPosition>,
    pub cold_tiles: Vec<BoardPosition>,
}

/// Board-wide totals for one time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotSummary {
    pub bucket: TimeBucket,
    pub label: String,
    pub games: u32,
    pub mines: u32,
    pub mine_rate: f64,
    pub current: bool,
}

/// Heatmap value band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatBand {
    VeryHigh,
    High,
    Neutral,
    Low,
    VeryLow,
    NoData,
}

impl HeatBand {
    pub fn classify(value: Option<f64>) -> Self {
        match value {
            None => HeatBand::NoData,
            Some(v) if v >= 80.0 => HeatBand::VeryHigh,
            Some(v) if v >= 60.0 => HeatBand::High,
            Some(v) if v >= 40.0 => HeatBand::Neutral,
            Some(v) if v >= 20.0 => HeatBand::Low,
            Some(_) => HeatBand::VeryLow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub position: BoardPosition,
    pub value: Option<f64>,
    pub band: HeatBand,
    pub clicks: u32,
}
