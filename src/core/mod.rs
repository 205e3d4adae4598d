//! Core modules for Minesight

pub mod tile_stats;
pub mod scorer;
pub mod suggestions;
pub mod recovery;
pub mod currency;
pub mod insights;
pub mod repository;
pub mod tracker;
pub mod api;

pub use tile_stats::TileStatsStore;
pub use scorer::SafetyScorer;
pub use suggestions::SuggestionEngine;
pub use recovery::{RecoveryCalculator, split_warning};
pub use currency::{parse_amount, parse_multiplier, currency_symbol, format_amount};
pub use insights::{build_insights, time_slot_summary, heatmap, remaining_safe_chance};
pub use repository::{
    PatternRepository, RepositoryError, InMemoryRepository, JsonFileRepository, RestoredState, capture, restore,
};
pub use tracker::{RoundTracker, SessionContext};
pub use api::{create_router, run_server};
