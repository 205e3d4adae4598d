//! Core types for Minesight

mod position;
mod tile;
mod patterns;
mod round;
mod ledger;
mod suggestion;
mod observation;
mod settings;
mod persisted;
mod reason;
mod output;

pub use position::BoardPosition;
pub use tile::{Outcome, TimeBucket, BucketStats, TimeBucketStats, TileRecord, BasicTile};
pub use patterns::{UserPatternSet, GlobalStats};
pub use round::{RoundResult, RoundPhase, RoundState, RecentRoundsHistory};
pub use ledger::{SessionLedger, RecoveryState, RecoveryPlan};
pub use suggestion::{Suggestion, SuggestionSummary, ExclusionSuggestion, ExclusionAdvice};
pub use observation::Observation;
pub use settings::{Settings, HeatmapMode};
pub use persisted::{PersistedState, BasicSection, AnalysisSection};
pub use reason::TickReason;
pub use output::{RenderModel, RecoveryDisplay, PopupStats, Insights, TimeSlotSummary, HeatBand, HeatmapCell};
