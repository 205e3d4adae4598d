//! Derived panels: insight lines, time-slot totals and heatmap cells

use crate::{BOARD_SIZE, COLD_STREAK_INSIGHT, HOT_STREAK_INSIGHT};
use crate::core::TileStatsStore;
use crate::types::{
    BoardPosition, HeatBand, HeatmapCell, HeatmapMode, Insights, Settings, TimeBucket, TimeSlotSummary,
};

fn numbers(positions: &[BoardPosition]) -> String {
    positions
        .iter()
        .map(|p| p.number().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insight lines from global stats, streaks and the user's winning tiles
pub fn build_insights(store: &TileStatsStore) -> Insights {
    let global = store.global_stats();
    let mut lines = Vec::new();

    if let Some(rate) = global.win_rate() {
        lines.push(format!("Overall win rate: {:.1}% ({} games)", rate, global.total_games));
    }

    let hot_tiles: Vec<BoardPosition> = BoardPosition::all()
        .filter(|p| store.tile(*p).hot_streak >= HOT_STREAK_INSIGHT)
        .collect();
    if !hot_tiles.is_empty() {
        lines.push(format!("Hot streak tiles: {}", numbers(&hot_tiles)));
    }

    let cold_tiles: Vec<BoardPosition> = BoardPosition::all()
        .filter(|p| store.tile(*p).cold_streak >= COLD_STREAK_INSIGHT)
        .collect();
    if !cold_tiles.is_empty() {
        lines.push(format!("Cold streak tiles: {}", numbers(&cold_tiles)));
    }

    let successful = &store.patterns().win_associated;
    if !successful.is_empty() {
        lines.push(format!("Your successful tiles: {}", numbers(successful)));
    }

    let status = if global.total_games > 0 { "Active" } else { "Analyzing..." };

    Insights {
        status: status.to_string(),
        lines,
        hot_tiles,
        cold_tiles,
    }
}

/// Board-wide games and mines per time bucket
pub fn time_slot_summary(store: &TileStatsStore, current: TimeBucket) -> Vec<TimeSlotSummary> {
    TimeBucket::ALL
        .iter()
        .map(|bucket| {
            let (games, mines) = store.tiles().iter().fold((0, 0), |(g, m), tile| {
                let stats = tile.time_bucket_stats.get(*bucket);
                (g + stats.games, m + stats.mines)
            });
            let mine_rate = if games > 0 { 100.0 * mines as f64 / games as f64 } else { 0.0 };
            TimeSlotSummary {
                bucket: *bucket,
                label: bucket.label().to_string(),
                games,
                mines,
                mine_rate,
                current: *bucket == current,
            }
        })
        .collect()
}

/// Uniform gem chance over the unrevealed tiles
pub fn remaining_safe_chance(revealed: usize, mine_count: u32) -> f64 {
    let remaining = BOARD_SIZE.saturating_sub(revealed) as f64;
    if remaining <= 0.0 {
        return 0.0;
    }
    (100.0 * (remaining - mine_count as f64) / remaining).max(0.0)
}

/// One cell per tile, empty when the heatmap is off
pub fn heatmap(store: &TileStatsStore, settings: &Settings, revealed: usize, mine_count: u32) -> Vec<HeatmapCell> {
    if !settings.heatmap_enabled {
        return Vec::new();
    }

    BoardPosition::all()
        .map(|position| {
            let tile = store.tile(position);
            let value = match settings.heatmap_mode {
                HeatmapMode::Pattern => tile.win_rate,
                HeatmapMode::Probability => Some(remaining_safe_chance(revealed, mine_count)),
            };
            HeatmapCell {
                position,
                value,
                band: HeatBand::classify(value),
                clicks: tile.clicks,
            }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone, Utc};
    use crate::types::RoundResult;

    fn pos(i: usize) -> BoardPosition {
        BoardPosition::new(i).unwrap()
    }

    #[test]
    fn test_empty_store_is_analyzing() {
        let insights = build_insights(&TileStatsStore::new());
        assert_eq!(insights.status, "Analyzing...");
        assert!(insights.lines.is_empty());
    }

    #[test]
    fn test_insight_lines() {
        let mut store = TileStatsStore::new();
        let at = Local.with_ymd_and_hms(2024, 5, 5, 13, 0, 0).unwrap();
        for _ in 0..3 {
            store.record_reveal_at(pos(0), false, RoundResult::Win, at);
        }
        store.record_reveal_at(pos(4), true, RoundResult::Loss, at);
        store.record_reveal_at(pos(4), true, RoundResult::Loss, at);
        store.record_round(RoundResult::Win, 3, Utc::now());
        store.record_round(RoundResult::Win, 3, Utc::now());
        store.record_round(RoundResult::Loss, 3, Utc::now());

        let insights = build_insights(&store);
        assert_eq!(insights.status, "Active");
        assert_eq!(
            insights.lines,
            vec![
                "Overall win rate: 66.7% (3 games)".to_string(),
                "Hot streak tiles: 1".to_string(),
                "Cold streak tiles: 5".to_string(),
                "Your successful tiles: 1".to_string(),
            ]
        );
        assert_eq!(insights.hot_tiles, vec![pos(0)]);
        assert_eq!(insights.cold_tiles, vec![pos(4)]);
    }

    #[test]
    fn test_time_slots_sum_tiles() {
        let mut store = TileStatsStore::new();
        let evening = Local.with_ymd_and_hms(2024, 5, 5, 20, 0, 0).unwrap();
        store.record_reveal_at(pos(1), false, RoundResult::Loss, evening);
        store.record_reveal_at(pos(2), true, RoundResult::Loss, evening);

        let slots = time_slot_summary(&store, TimeBucket::Evening);
        assert_eq!(slots.len(), 4);
        let slot = slots.iter().find(|s| s.bucket == TimeBucket::Evening).unwrap();
        assert_eq!((slot.games, slot.mines), (2, 1));
        assert_eq!(slot.mine_rate, 50.0);
        assert!(slot.current);
        assert_eq!(slots.iter().filter(|s| s.current).count(), 1);
    }

    #[test]
    fn test_remaining_safe_chance() {
        assert_eq!(remaining_safe_chance(0, 5), 80.0);
        assert_eq!(remaining_safe_chance(5, 5), 75.0);
        assert_eq!(remaining_safe_chance(25, 3), 0.0);
    }

    #[test]
    fn test_heatmap_modes() {
        let mut store = TileStatsStore::new();
        let at = Local.with_ymd_and_hms(2024, 5, 5, 9, 0, 0).unwrap();
        store.record_reveal_at(pos(3), false, RoundResult::Win, at);

        let mut settings = Settings::default();
        let cells = heatmap(&store, &settings, 0, 3);
        assert_eq!(cells.len(), BOARD_SIZE);
        assert_eq!(cells[3].value, Some(100.0));
        assert_eq!(cells[3].band, HeatBand::VeryHigh);
        assert_eq!(cells[0].band, HeatBand::NoData);

        settings.heatmap_mode = HeatmapMode::Probability;
        let cells = heatmap(&store, &settings, 5, 3);
        assert!(cells.iter().all(|c| c.value == Some(85.0)));

        settings.heatmap_enabled = false;
        assert!(heatmap(&store, &settings, 0, 3).is_empty());
    }
}
