//! Shape of the persisted key-value blob
//!
//! `{ basic: {tiles, settings, lastGames}, analysis: {globalStats, tileStats,
//! userPatterns, suggestions} }`. Session counters are not part of it.

use serde::{Deserialize, Serialize};
use crate::types::{
    BasicTile, GlobalStats, RecentRoundsHistory, Settings, SuggestionSummary,
    TileRecord, UserPatternSet,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub basic: BasicSection,
    /// Missing in blobs written before analysis existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicSection {
    pub tiles: Vec<BasicTile>,
    pub settings: Settings,
    pub last_games: RecentRoundsHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSection {
    pub global_stats: GlobalStats,
    pub tile_stats: Vec<TileRecord>,
    pub user_patterns: UserPatternSet,
    pub suggestions: SuggestionSummary,
}
