//! Integration tests for the round state machine
//!
//! Observation stream → RoundTracker → ledger, recovery and tile store

use chrono::{DateTime, Local, TimeZone};
use minesight::core::{InMemoryRepository, RoundTracker};
use minesight::types::{BoardPosition, Observation, RoundPhase, RoundResult, TickReason};
use pretty_assertions::assert_eq;

fn at(hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 7, 1, hour, 15, 0).unwrap()
}

fn pos(i: usize) -> BoardPosition {
    BoardPosition::new(i).unwrap()
}

fn new_tracker() -> RoundTracker {
    RoundTracker::new(Box::new(InMemoryRepository::new()))
}

/// Idle → three reveals → loss on tile 7 (one of the three)
#[test]
fn test_loss_round_lifecycle() {
    let mut tracker = new_tracker();
    let bet = 25.0;

    let model = tracker.on_tick_at(&Observation::armed(3, bet), at(10));
    assert_eq!(model.phase, RoundPhase::Idle);

    tracker.on_tick_at(&Observation::revealed(&[2]), at(10));
    tracker.on_tick_at(&Observation::revealed(&[2, 7]), at(10));
    let model = tracker.on_tick_at(&Observation::revealed(&[2, 7, 13]), at(10));
    assert_eq!(model.phase, RoundPhase::InProgress);
    assert_eq!(model.tiles_revealed, 3);

    let model = tracker.on_tick_at(&Observation::revealed(&[2, 7, 13]).with_mine_at(7), at(10));
    assert_eq!(model.phase, RoundPhase::Resolved(RoundResult::Loss));
    assert_eq!(model.reason, TickReason::R004_LOSS_RESOLVED);

    let ctx = tracker.context();
    assert_eq!(ctx.ledger.losses, 1);
    assert_eq!(ctx.ledger.rounds_played, 1);
    assert!(ctx.recovery.active);
    assert_eq!(ctx.recovery.cumulative_loss, bet);

    let store = tracker.store();
    assert_eq!(store.tile(pos(7)).bomb_count, 1);
    assert_eq!(store.tile(pos(7)).safe_count, 0);
    assert_eq!(store.tile(pos(2)).safe_count, 1);
    assert_eq!(store.tile(pos(13)).safe_count, 1);
    for tile in store.tiles() {
        assert_eq!(tile.clicks, tile.safe_count + tile.bomb_count);
    }
}

/// Several rounds keep the ledger invariant and feed recent history
#[test]
fn test_multi_round_session() {
    let mut tracker = new_tracker();

    // win
    tracker.on_tick_at(&Observation::armed(2, 10.0), at(9));
    tracker.on_tick_at(&Observation::revealed(&[0, 1]), at(9));
    tracker.on_tick_at(&Observation::revealed(&[0, 1]).with_multiplier("1.19x").with_payout(), at(9));

    // loss
    tracker.on_tick_at(&Observation::armed(2, 10.0), at(9));
    tracker.on_tick_at(&Observation::revealed(&[4]).with_mine_at(4), at(9));

    // win, clears recovery
    tracker.on_tick_at(&Observation::armed(2, 10.0), at(9));
    tracker.on_tick_at(&Observation::revealed(&[5, 6, 7]), at(9));
    let model = tracker.on_tick_at(
        &Observation::revealed(&[5, 6, 7]).with_multiplier("1.80x").with_payout(),
        at(9),
    );
    assert!(!model.recovery.active);

    let model = tracker.on_tick_at(&Observation::armed(2, 10.0), at(9));
    assert_eq!(model.reason, TickReason::R005_ROUND_ARMED);

    let ctx = tracker.context();
    assert_eq!(ctx.ledger.rounds_played, ctx.ledger.wins + ctx.ledger.losses);
    assert_eq!((ctx.ledger.wins, ctx.ledger.losses), (2, 1));
    assert!((ctx.ledger.profit() - (11.9 + 18.0 - 10.0)).abs() < 1e-9);
    assert_eq!(ctx.history.len(), 3);

    // three resolved rounds, exclusion panel is ready and skips played tiles
    assert!(model.exclusion.ready);
    let played = [0, 1, 4, 5, 6, 7];
    assert!(model
        .exclusion
        .tiles
        .iter()
        .all(|t| !played.contains(&t.position.index())));

    assert_eq!(tracker.store().global_stats().total_games, 3);
    assert_eq!(model.insights.status, "Active");
}

/// A tick with nothing readable never moves the machine
#[test]
fn test_missing_observation_mid_round() {
    let mut tracker = new_tracker();
    tracker.on_tick_at(&Observation::armed(3, 5.0), at(20));
    tracker.on_tick_at(&Observation::revealed(&[3]), at(20));

    let model = tracker.on_tick_at(&Observation::default(), at(20));
    assert_eq!(model.phase, RoundPhase::InProgress);
    assert_eq!(model.reason, TickReason::R001_NO_BOARD_DATA);
    assert_eq!(model.tiles_revealed, 1);
}

/// Reveals seen while resolved belong to no round
#[test]
fn test_reveals_after_resolution_ignored() {
    let mut tracker = new_tracker();
    tracker.on_tick_at(&Observation::armed(3, 5.0), at(20));
    tracker.on_tick_at(&Observation::revealed(&[3]).with_payout(), at(20));
    let model = tracker.on_tick_at(&Observation::revealed(&[3, 8, 9]), at(20));

    assert_eq!(model.reason, TickReason::R004_AWAITING_CLEAR);
    assert_eq!(tracker.context().round.revealed_positions, vec![pos(3)]);
    assert_eq!(tracker.store().tile(pos(8)).clicks, 0);
}

/// Display numbers follow the board
#[test]
fn test_render_numbers() {
    let mut tracker = new_tracker();
    tracker.on_tick_at(&Observation::armed(5, 2.0), at(12));
    let model = tracker.on_tick_at(&Observation::revealed(&[0, 1, 2, 3, 4]).with_multiplier("1.58x"), at(12));

    assert_eq!(model.gems_left, 15);
    assert_eq!(model.tiles_left, 20);
    assert!((model.gem_chance - 75.0).abs() < 1e-9);
    assert!((model.potential_win - 3.16).abs() < 1e-9);
    assert_eq!(model.status, "In Progress");
    assert_eq!(model.time_slots.iter().filter(|s| s.current).count(), 1);
}
