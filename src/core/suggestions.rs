//! SuggestionEngine: ranked and exclusion-based tile suggestions
//!
//! The two lists are independent and may disagree:
//! - ranked: every tile by safety score, top K with reasons
//! - exclusion: tiles not played in recent rounds, by win rate, top 5

use std::cmp::Ordering;
use crate::{
    EXCLUSION_MIN_ROUNDS, EXCLUSION_MIN_WIN_RATE, EXCLUSION_SUGGESTION_COUNT,
    REASON_WIN_RATE_THRESHOLD, SAFE_STREAK_THRESHOLD,
};
use crate::core::{SafetyScorer, TileStatsStore};
use crate::types::{
    BoardPosition, ExclusionAdvice, ExclusionSuggestion, RecentRoundsHistory, Suggestion, TimeBucket,
};

/// Suggestion engine
#[derive(Debug, Default, Clone, Copy)]
pub struct SuggestionEngine {
    scorer: SafetyScorer,
}

impl SuggestionEngine {
    /// Create new engine
    pub fn new() -> Self {
        Self { scorer: SafetyScorer::new() }
    }

    /// Top `top_k` tiles for the current time bucket
    pub fn generate(&self, store: &TileStatsStore, top_k: usize) -> Vec<Suggestion> {
        self.generate_in_bucket(store, top_k, TimeBucket::current())
    }

    /// Top `top_k` tiles scored against `bucket`
    ///
    /// Sorted by non-increasing score, ties by ascending position.
    pub fn generate_in_bucket(&self, store: &TileStatsStore, top_k: usize, bucket: TimeBucket) -> Vec<Suggestion> {
        let mut scored: Vec<(BoardPosition, f64)> = BoardPosition::all()
            .map(|p| (p, self.scorer.score_in_bucket(store, p, bucket)))
            .collect();

        // stable sort keeps index order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(position, score)| Suggestion {
                position,
                confidence_score: score,
                reasons: self.reasons(store, position),
            })
            .collect()
    }

    /// Why a tile ranked, in fixed order, only the ones that hold
    fn reasons(&self, store: &TileStatsStore, position: BoardPosition) -> Vec<String> {
        let tile = store.tile(position);
        let mut reasons = Vec::new();

        if tile.consecutive_safe > SAFE_STREAK_THRESHOLD {
            reasons.push(format!("{} consecutive safe reveals", tile.consecutive_safe));
        }
        if let Some(rate) = tile.win_rate.filter(|r| *r > REASON_WIN_RATE_THRESHOLD) {
            reasons.push(format!("{:.1}% win rate", rate));
        }
        if store.patterns().is_win_associated(position) {
            reasons.push("historically successful for you".to_string());
        }
        reasons
    }

    /// Tiles untouched in the recent rounds with win rate >= 50 or no data
    ///
    /// Unplayed tiles sort as if their rate were 100.
    pub fn exclusion_suggestions(
        &self,
        store: &TileStatsStore,
        history: &RecentRoundsHistory,
    ) -> Vec<ExclusionSuggestion> {
        let recently_played = history.union();

        let mut candidates: Vec<ExclusionSuggestion> = BoardPosition::all()
            .filter(|p| !recently_played.contains(p))
            .filter_map(|position| {
                let rate = store.tile(position).win_rate;
                match rate {
                    Some(r) if r < EXCLUSION_MIN_WIN_RATE => None,
                    _ => Some(ExclusionSuggestion { position, success_rate: rate }),
                }
            })
            .collect();

        let sort_key = |s: &ExclusionSuggestion| s.success_rate.unwrap_or(100.0);
        candidates.sort_by(|a, b| sort_key(b).partial_cmp(&sort_key(a)).unwrap_or(Ordering::Equal));
        candidates.truncate(EXCLUSION_SUGGESTION_COUNT);
        candidates
    }

    /// Exclusion list plus whether enough rounds back it
    pub fn exclusion_advice(&self, store: &TileStatsStore, history: &RecentRoundsHistory) -> ExclusionAdvice {
        ExclusionAdvice {
            ready: history.len() >= EXCLUSION_MIN_ROUNDS,
            tiles: self.exclusion_suggestions(store, history),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use crate::types::RoundResult;

    fn pos(i: usize) -> BoardPosition {
        BoardPosition::new(i).unwrap()
    }

    fn afternoon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_store_ranks_by_index() {
        let engine = SuggestionEngine::new();
        let store = TileStatsStore::new();
        let suggestions = engine.generate_in_bucket(&store, 3, TimeBucket::Afternoon);
        let indices: Vec<usize> = suggestions.iter().map(|s| s.position.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(suggestions.iter().all(|s| s.reasons.is_empty()));
    }

    #[test]
    fn test_best_tile_first_with_reasons() {
        let engine = SuggestionEngine::new();
        let mut store = TileStatsStore::new();
        for _ in 0..4 {
            store.record_reveal_at(pos(12), false, RoundResult::Win, afternoon());
        }
        store.record_reveal_at(pos(3), false, RoundResult::Loss, afternoon());

        let suggestions = engine.generate_in_bucket(&store, 3, TimeBucket::Afternoon);
        assert_eq!(suggestions[0].position, pos(12));
        assert_eq!(
            suggestions[0].reasons,
            vec![
                "4 consecutive safe reveals".to_string(),
                "100.0% win rate".to_string(),
                "historically successful for you".to_string(),
            ]
        );
        // tile 3: 100 - 5 (loss association) = 95, still second
        assert_eq!(suggestions[1].position, pos(3));
        assert_eq!(suggestions[1].confidence_score, 95.0);
    }

    #[test]
    fn test_sorted_no_duplicates() {
        let engine = SuggestionEngine::new();
        let mut store = TileStatsStore::new();
        for (i, is_mine) in [false, true, false, false, true].iter().enumerate() {
            let result = if *is_mine { RoundResult::Loss } else { RoundResult::Win };
            store.record_reveal_at(pos(i * 2), *is_mine, result, afternoon());
        }
        let suggestions = engine.generate_in_bucket(&store, 3, TimeBucket::Afternoon);
        assert!(suggestions.len() <= 3);
        for pair in suggestions.windows(2) {
            assert!(pair[0].confidence_score >= pair[1].confidence_score);
            assert_ne!(pair[0].position, pair[1].position);
        }
    }

    #[test]
    fn test_exclusion_skips_recent_and_weak_tiles() {
        let engine = SuggestionEngine::new();
        let mut store = TileStatsStore::new();
        // tile 10: 1 safe, 2 bombs -> 33% (dropped)
        store.record_reveal_at(pos(10), false, RoundResult::Win, afternoon());
        store.record_reveal_at(pos(10), true, RoundResult::Loss, afternoon());
        store.record_reveal_at(pos(10), true, RoundResult::Loss, afternoon());
        // tile 20: 1 safe, 1 bomb -> 50% (kept, sorts after no-data tiles)
        store.record_reveal_at(pos(20), false, RoundResult::Win, afternoon());
        store.record_reveal_at(pos(20), true, RoundResult::Loss, afternoon());

        let mut history = RecentRoundsHistory::new();
        history.push(vec![pos(0), pos(1)]);
        history.push(vec![pos(2)]);

        let tiles = engine.exclusion_suggestions(&store, &history);
        let indices: Vec<usize> = tiles.iter().map(|t| t.position.index()).collect();
        assert_eq!(indices, vec![3, 4, 5, 6, 7]);
        assert!(tiles.iter().all(|t| t.success_rate.is_none()));
    }

    #[test]
    fn test_exclusion_prefers_proven_tiles_over_low_rates() {
        let engine = SuggestionEngine::new();
        let mut store = TileStatsStore::new();
        store.record_reveal_at(pos(24), false, RoundResult::Win, afternoon());

        // everything except 20..=24 played recently
        let mut history = RecentRoundsHistory::new();
        history.push((0..20).map(pos).collect());
        store.record_reveal_at(pos(21), true, RoundResult::Loss, afternoon());
        store.record_reveal_at(pos(21), false, RoundResult::Win, afternoon());

        let advice = engine.exclusion_advice(&store, &history);
        assert!(!advice.ready);
        let tiles: Vec<(usize, Option<f64>)> =
            advice.tiles.iter().map(|t| (t.position.index(), t.success_rate)).collect();
        assert_eq!(
            tiles,
            vec![(20, None), (22, None), (23, None), (24, Some(100.0)), (21, Some(50.0))]
        );
    }
}
