//! Suggestion outputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::BoardPosition;

/// One ranked tile with the reasons it ranked well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub position: BoardPosition,
    /// Safety score, 0-100
    pub confidence_score: f64,
    pub reasons: Vec<String>,
}

impl Suggestion {
    /// `Tile N: S% safe (reasons)`
    pub fn reasoning_line(&self) -> String {
        format!(
            "{}: {:.1}% safe ({})",
            self.position,
            self.confidence_score,
            self.reasons.join(", ")
        )
    }
}

/// Last ranked list, kept in the analysis blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionSummary {
    pub current_suggestions: Vec<Suggestion>,
    /// Score of the first suggestion, 0 when empty
    pub confidence: f64,
    pub last_update: Option<DateTime<Utc>>,
    pub reasoning: String,
}

impl SuggestionSummary {
    pub fn from_suggestions(suggestions: Vec<Suggestion>, at: DateTime<Utc>) -> Self {
        let confidence = suggestions.first().map(|s| s.confidence_score).unwrap_or(0.0);
        let reasoning = suggestions
            .iter()
            .map(Suggestion::reasoning_line)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            current_suggestions: suggestions,
            confidence,
            last_update: Some(at),
            reasoning,
        }
    }
}

/// Tile from the exclusion-based panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionSuggestion {
    pub position: BoardPosition,
    /// Win rate, `None` for an unplayed tile
    pub success_rate: Option<f64>,
}

/// Exclusion panel contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionAdvice {
    /// Enough rounds of history to be worth showing
    pub ready: bool,
    pub tiles: Vec<ExclusionSuggestion>,
}
