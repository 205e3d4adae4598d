//! RoundTracker: per-tick state machine
//!
//! State transitions:
//! - IDLE → IN_PROGRESS: first reveal of an armed round
//! - IN_PROGRESS → RESOLVED(WIN): fresh payout signal
//! - IN_PROGRESS → RESOLVED(LOSS): fresh mine signal
//! - RESOLVED → IDLE: board cleared (reveals back to zero)
//! - IN_PROGRESS → IDLE: board cleared and betting re-enabled with no result
//!
//! Tile outcomes are recorded in one batch when the round resolves, since
//! the mine position is only known at the end.

use chrono::{DateTime, Local, Timelike, Utc};
use tracing::{debug, info, warn};
use crate::{DEFAULT_CURRENCY, DEFAULT_SUGGESTION_COUNT};
use crate::core::currency::{parse_amount, parse_multiplier};
use crate::core::insights::{build_insights, heatmap, remaining_safe_chance, time_slot_summary};
use crate::core::recovery::split_warning;
use crate::core::repository::{capture, restore, PatternRepository, RestoredState};
use crate::core::{RecoveryCalculator, SuggestionEngine, TileStatsStore};
use crate::types::{
    BoardPosition, Observation, PopupStats, RecentRoundsHistory, RecoveryDisplay, RecoveryState,
    RenderModel, RoundPhase, RoundResult, RoundState, SessionLedger, Settings, SuggestionSummary,
    TickReason, TimeBucket,
};

/// Session state owned by the tracker; only `history` is persisted
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub phase: RoundPhase,
    pub round: RoundState,
    pub history: RecentRoundsHistory,
    pub ledger: SessionLedger,
    pub recovery: RecoveryState,
    /// Mines selected for the next round
    pub mine_count: u32,
    pub bet_amount: f64,
    /// 0 when unknown
    pub bankroll: f64,
    /// Last parsed multiplier, 0 on parse failure
    pub multiplier: f64,
    pub currency: String,
    pub betting_enabled: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SessionContext {
    pub fn new(mine_count: u32) -> Self {
        Self {
            phase: RoundPhase::Idle,
            round: RoundState::new(mine_count),
            history: RecentRoundsHistory::new(),
            ledger: SessionLedger::default(),
            recovery: RecoveryState::default(),
            mine_count,
            bet_amount: 0.0,
            bankroll: 0.0,
            multiplier: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            betting_enabled: false,
        }
    }
}

/// Orchestrator owning the session, the learned store and the repository
pub struct RoundTracker {
    ctx: SessionContext,
    store: TileStatsStore,
    settings: Settings,
    suggestions: SuggestionSummary,
    engine: SuggestionEngine,
    calculator: RecoveryCalculator,
    repo: Box<dyn PatternRepository>,
    /// Learned state changed and has not been saved yet
    dirty: bool,
    last_reason: TickReason,
    tick_count: u64,
}

impl RoundTracker {
    /// Load learned state from `repo`; a failed load starts fresh
    pub fn new(repo: Box<dyn PatternRepository>) -> Self {
        let restored = match repo.load() {
            Ok(Some(state)) => {
                info!("restored persisted analysis");
                restore(state)
            }
            Ok(None) => RestoredState::default(),
            Err(err) => {
                warn!(error = %err, "failed to load persisted state, starting fresh");
                RestoredState::default()
            }
        };

        let mut ctx = SessionContext::default();
        ctx.history = restored.history;

        Self {
            ctx,
            store: restored.store,
            settings: restored.settings,
            suggestions: restored.suggestions,
            engine: SuggestionEngine::new(),
            calculator: RecoveryCalculator::new(),
            repo,
            dirty: false,
            last_reason: TickReason::R001_NO_BOARD_DATA,
            tick_count: 0,
        }
    }

    /// Process one observation at the current local time
    pub fn on_tick(&mut self, obs: &Observation) -> RenderModel {
        self.on_tick_at(obs, Local::now())
    }

    /// Process one observation at `now`
    pub fn on_tick_at(&mut self, obs: &Observation, now: DateTime<Local>) -> RenderModel {
        self.tick_count += 1;
        self.absorb_ambient(obs);

        let revealed = obs.revealed_positions.as_deref().map(valid_positions);
        let reason = self.transition(obs, revealed.as_deref(), now);

        if reason != self.last_reason {
            debug!(code = reason.code(), phase = %self.ctx.phase, "tick");
        }
        self.last_reason = reason;

        self.persist_if_dirty();
        self.render_at(now)
    }

    /// Copy bet, bankroll, multiplier and currency out of the observation
    fn absorb_ambient(&mut self, obs: &Observation) {
        if let Some(text) = &obs.multiplier_text {
            self.ctx.multiplier = parse_multiplier(text);
        }
        if let Some(bet) = obs.current_bet_amount {
            self.ctx.bet_amount = if bet.is_finite() { bet.max(0.0) } else { 0.0 };
        }
        let bankroll = obs
            .bankroll_amount
            .or_else(|| obs.wallet_text.as_deref().map(parse_amount));
        if let Some(bankroll) = bankroll {
            self.ctx.bankroll = if bankroll.is_finite() { bankroll } else { 0.0 };
        }
        if let Some(currency) = obs.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            self.ctx.currency = currency.trim().to_lowercase();
        }
        if let Some(enabled) = obs.betting_enabled {
            self.ctx.betting_enabled = enabled;
        }
        if let Some(mines) = obs.current_mine_count {
            self.ctx.mine_count = mines;
        }
    }

    fn transition(&mut self, obs: &Observation, revealed: Option<&[BoardPosition]>, now: DateTime<Local>) -> TickReason {
        let has_signal = obs.win_signal() || obs.loss_signal();

        match self.ctx.phase {
            RoundPhase::Idle => match revealed {
                None if has_signal => TickReason::R004_SIGNAL_IGNORED,
                None => TickReason::R001_NO_BOARD_DATA,
                Some([]) => {
                    // armed round follows the selected mine count until play starts
                    self.ctx.round.mine_count = self.ctx.mine_count;
                    if has_signal {
                        TickReason::R004_SIGNAL_IGNORED
                    } else {
                        TickReason::R002_WAITING_FOR_REVEAL
                    }
                }
                Some(positions) => {
                    self.ctx.round = RoundState::new(self.ctx.mine_count);
                    self.append_reveals(positions);
                    self.ctx.phase = RoundPhase::InProgress;
                    info!(mines = self.ctx.round.mine_count, bet = self.ctx.bet_amount, "round started");
                    self.resolve_if_signalled(obs, now)
                        .unwrap_or(TickReason::R003_ROUND_STARTED)
                }
            },

            RoundPhase::InProgress => {
                if matches!(revealed, Some([])) && !has_signal && obs.betting_enabled == Some(true) {
                    info!(reveals = self.ctx.round.len(), "round abandoned before a result");
                    self.ctx.round = RoundState::new(self.ctx.mine_count);
                    self.ctx.phase = RoundPhase::Idle;
                    return TickReason::R005_ROUND_ABANDONED;
                }

                let appended = revealed.map(|p| self.append_reveals(p)).unwrap_or(0);
                if let Some(reason) = self.resolve_if_signalled(obs, now) {
                    return reason;
                }
                match (revealed, appended) {
                    (None, _) => TickReason::R001_NO_BOARD_DATA,
                    (Some(_), 0) => TickReason::R003_ROUND_IN_PROGRESS,
                    (Some(_), _) => TickReason::R003_REVEALS_APPENDED,
                }
            }

            RoundPhase::Resolved(_) => match revealed {
                Some([]) => {
                    let finished = std::mem::replace(&mut self.ctx.round, RoundState::new(self.ctx.mine_count));
                    self.ctx.history.push(finished.revealed_positions);
                    self.ctx.phase = RoundPhase::Idle;
                    self.dirty = true;
                    debug!(history = self.ctx.history.len(), "board cleared, next round armed");
                    TickReason::R005_ROUND_ARMED
                }
                _ => TickReason::R004_AWAITING_CLEAR,
            },
        }
    }

    /// Append unseen reveals, returns how many were new
    fn append_reveals(&mut self, positions: &[BoardPosition]) -> usize {
        positions
            .iter()
            .filter(|p| self.ctx.round.reveal(**p))
            .count()
    }

    fn resolve_if_signalled(&mut self, obs: &Observation, now: DateTime<Local>) -> Option<TickReason> {
        if obs.win_signal() {
            self.resolve(RoundResult::Win, None, now);
            Some(TickReason::R004_WIN_RESOLVED)
        } else if obs.loss_signal() {
            let mine = obs.mine_position.and_then(|i| {
                let position = BoardPosition::new(i);
                if position.is_none() {
                    warn!(index = i, "mine position outside the board, ignored");
                }
                position
            });
            self.resolve(RoundResult::Loss, mine, now);
            Some(TickReason::R004_LOSS_RESOLVED)
        } else {
            None
        }
    }

    /// Book the result and record every revealed tile
    fn resolve(&mut self, result: RoundResult, mine: Option<BoardPosition>, now: DateTime<Local>) {
        let bet = self.ctx.bet_amount;

        match result {
            RoundResult::Win => {
                self.ctx.ledger.record_win(bet, self.ctx.multiplier);
                if self.ctx.recovery.register_win() {
                    info!("recovery complete");
                }
            }
            RoundResult::Loss => {
                if let Some(position) = mine {
                    self.ctx.round.reveal(position);
                }
                self.ctx.ledger.record_loss(bet);
                self.ctx.recovery.register_loss(bet);
            }
        }

        for position in self.ctx.round.revealed_positions.clone() {
            let is_mine = mine == Some(position);
            self.store.record_reveal_at(position, is_mine, result, now);
        }
        self.store.record_round(result, self.ctx.round.mine_count, now.with_timezone(&Utc));

        let bucket = TimeBucket::from_hour(now.hour());
        let ranked = self.engine.generate_in_bucket(&self.store, DEFAULT_SUGGESTION_COUNT, bucket);
        self.suggestions = SuggestionSummary::from_suggestions(ranked, now.with_timezone(&Utc));

        self.ctx.phase = RoundPhase::Resolved(result);
        self.dirty = true;

        info!(
            %result,
            bet,
            multiplier = self.ctx.multiplier,
            tiles = self.ctx.round.len(),
            profit = self.ctx.ledger.profit(),
            cumulative_loss = self.ctx.recovery.cumulative_loss,
            "round resolved"
        );
    }

    /// Save if anything learned changed; a failure keeps the flag for next tick
    fn persist_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        let blob = capture(&self.store, &self.settings, &self.ctx.history, &self.suggestions);
        match self.repo.save(&blob) {
            Ok(()) => self.dirty = false,
            Err(err) => warn!(error = %err, "failed to persist analysis, will retry"),
        }
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Current render model at the current local time
    pub fn render(&self) -> RenderModel {
        self.render_at(Local::now())
    }

    pub fn render_at(&self, now: DateTime<Local>) -> RenderModel {
        let ctx = &self.ctx;
        let revealed = ctx.round.len();
        let mines = match ctx.phase {
            RoundPhase::Idle => ctx.mine_count,
            _ => ctx.round.mine_count,
        };

        RenderModel {
            timestamp: now.with_timezone(&Utc),
            phase: ctx.phase,
            reason: self.last_reason,
            status: self.status().to_string(),
            multiplier: ctx.multiplier,
            potential_win: ctx.bet_amount * ctx.multiplier,
            tiles_revealed: revealed,
            mine_count: mines,
            gem_chance: remaining_safe_chance(revealed, mines),
            gems_left: crate::BOARD_SIZE as i64 - mines as i64 - revealed as i64,
            tiles_left: crate::BOARD_SIZE as i64 - revealed as i64,
            currency: ctx.currency.clone(),
            ledger: ctx.ledger.clone(),
            profit: ctx.ledger.profit(),
            recovery: self.recovery_display(),
            suggestions: self.suggestions.clone(),
            exclusion: self.engine.exclusion_advice(&self.store, &ctx.history),
            insights: build_insights(&self.store),
            time_slots: time_slot_summary(&self.store, TimeBucket::from_hour(now.hour())),
            heatmap: heatmap(&self.store, &self.settings, revealed, mines),
        }
    }

    fn status(&self) -> &'static str {
        match self.ctx.phase {
            RoundPhase::Idle if self.ctx.betting_enabled => "New Round",
            RoundPhase::Idle => "Waiting...",
            RoundPhase::InProgress => "In Progress",
            RoundPhase::Resolved(RoundResult::Win) => "Win",
            RoundPhase::Resolved(RoundResult::Loss) => "Loss",
        }
    }

    fn recovery_display(&self) -> RecoveryDisplay {
        let recovery = &self.ctx.recovery;
        let plan = self.calculator.plan_for(recovery, self.ctx.mine_count, self.ctx.bankroll);

        RecoveryDisplay {
            active: recovery.active,
            cumulative_loss: recovery.cumulative_loss,
            gem_goal: recovery.target_gem_goal,
            attempts: recovery.attempt_count,
            max_attempts: recovery.max_attempts,
            exhausted: recovery.active && recovery.exhausted(),
            plan,
            expected_win: plan.map(|p| p.expected_win()).unwrap_or(0.0),
            split_warning: plan.as_ref().and_then(split_warning),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace display settings and save them
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.normalized();
        self.dirty = true;
        self.persist_if_dirty();
    }

    /// Change the recovery gem goal, returns the clamped value
    pub fn set_gem_goal(&mut self, goal: u32) -> u32 {
        let applied = self.ctx.recovery.set_gem_goal(goal);
        debug!(requested = goal, applied, "gem goal changed");
        applied
    }

    /// Clear session counters and recent history, keep the tile analysis
    pub fn reset_session(&mut self) {
        let gem_goal = self.ctx.recovery.target_gem_goal;
        let mut ctx = SessionContext::new(self.ctx.mine_count);
        ctx.currency = std::mem::take(&mut self.ctx.currency);
        ctx.recovery.target_gem_goal = gem_goal;
        self.ctx = ctx;
        self.last_reason = TickReason::R001_NO_BOARD_DATA;
        self.dirty = true;
        self.persist_if_dirty();
        info!("session reset");
    }

    /// Session reset plus wiping every learned tile statistic
    pub fn reset_analysis(&mut self) {
        self.store.reset();
        self.suggestions = SuggestionSummary::default();
        self.reset_session();
        info!("analysis reset");
    }

    pub fn popup_stats(&self) -> PopupStats {
        PopupStats::from(&self.ctx.ledger)
    }

    /// Retry a pending save outside of a tick
    pub fn flush(&mut self) -> bool {
        self.persist_if_dirty();
        !self.dirty
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn store(&self) -> &TileStatsStore {
        &self.store
    }

    pub fn suggestions(&self) -> &SuggestionSummary {
        &self.suggestions
    }

    pub fn phase(&self) -> RoundPhase {
        self.ctx.phase
    }

    pub fn last_reason(&self) -> TickReason {
        self.last_reason
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn calculator(&self) -> &RecoveryCalculator {
        &self.calculator
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }
}

/// Board positions from raw indices, skipping anything off the board
fn valid_positions(indices: &[usize]) -> Vec<BoardPosition> {
    indices
        .iter()
        .filter_map(|&i| {
            let position = BoardPosition::new(i);
            if position.is_none() {
                warn!(index = i, "revealed index outside the board, skipped");
            }
            position
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::core::repository::InMemoryRepository;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 4, 10, 14, 0, 0).unwrap()
    }

    fn pos(i: usize) -> BoardPosition {
        BoardPosition::new(i).unwrap()
    }

    fn tracker() -> (RoundTracker, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (RoundTracker::new(Box::new(repo.clone())), repo)
    }

    #[test]
    fn test_initial_state() {
        let (t, _) = tracker();
        assert_eq!(t.phase(), RoundPhase::Idle);
        assert_eq!(t.context().currency, "inr");
        assert!(!t.is_dirty());
    }

    #[test]
    fn test_missing_data_is_no_transition() {
        let (mut t, _) = tracker();
        let model = t.on_tick_at(&Observation::default(), at());
        assert_eq!(model.reason, TickReason::R001_NO_BOARD_DATA);
        assert_eq!(t.phase(), RoundPhase::Idle);
        assert_eq!(model.status, "Waiting...");
    }

    #[test]
    fn test_armed_board_shows_new_round() {
        let (mut t, _) = tracker();
        let model = t.on_tick_at(&Observation::armed(3, 10.0), at());
        assert_eq!(model.reason, TickReason::R002_WAITING_FOR_REVEAL);
        assert_eq!(model.status, "New Round");
        assert_eq!(model.gem_chance, 88.0);
    }

    #[test]
    fn test_reveals_start_and_append() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());

        let model = t.on_tick_at(&Observation::revealed(&[4]), at());
        assert_eq!(model.reason, TickReason::R003_ROUND_STARTED);
        assert_eq!(model.status, "In Progress");

        let model = t.on_tick_at(&Observation::revealed(&[4, 9]), at());
        assert_eq!(model.reason, TickReason::R003_REVEALS_APPENDED);
        assert_eq!(model.tiles_revealed, 2);

        let model = t.on_tick_at(&Observation::revealed(&[9, 4]), at());
        assert_eq!(model.reason, TickReason::R003_ROUND_IN_PROGRESS);
        assert_eq!(t.context().round.revealed_positions, vec![pos(4), pos(9)]);
        // nothing recorded mid-round
        assert_eq!(t.store().tile(pos(4)).clicks, 0);
    }

    #[test]
    fn test_invalid_indices_skipped() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[2, 25, 99, 3]), at());
        assert_eq!(t.context().round.revealed_positions, vec![pos(2), pos(3)]);
    }

    #[test]
    fn test_win_resolution() {
        let (mut t, repo) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[0, 1]), at());
        let model = t.on_tick_at(
            &Observation::revealed(&[0, 1]).with_multiplier("1.50x").with_payout(),
            at(),
        );

        assert_eq!(model.reason, TickReason::R004_WIN_RESOLVED);
        assert_eq!(model.status, "Win");
        assert_eq!(t.context().ledger.wins, 1);
        assert!((t.context().ledger.total_won - 15.0).abs() < 1e-9);
        assert_eq!(t.store().tile(pos(0)).safe_count, 1);
        assert_eq!(t.store().global_stats().total_wins, 1);
        assert_eq!(t.suggestions().current_suggestions.len(), 3);
        assert_eq!(repo.save_count(), 1);
    }

    #[test]
    fn test_signal_repeated_is_not_double_counted() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        let win = Observation::revealed(&[0]).with_multiplier("1.10x").with_payout();
        t.on_tick_at(&win, at());
        let model = t.on_tick_at(&win, at());
        assert_eq!(model.reason, TickReason::R004_AWAITING_CLEAR);
        assert_eq!(t.context().ledger.rounds_played, 1);
    }

    #[test]
    fn test_signal_while_idle_ignored() {
        let (mut t, _) = tracker();
        let obs = Observation::armed(3, 10.0).with_payout();
        let model = t.on_tick_at(&obs, at());
        assert_eq!(model.reason, TickReason::R004_SIGNAL_IGNORED);
        assert_eq!(t.context().ledger.rounds_played, 0);
    }

    #[test]
    fn test_loss_lifecycle() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 20.0).with_bankroll(1000.0), at());
        t.on_tick_at(&Observation::revealed(&[2, 7, 11]), at());
        let model = t.on_tick_at(&Observation::revealed(&[2, 7, 11]).with_mine_at(7), at());

        assert_eq!(model.reason, TickReason::R004_LOSS_RESOLVED);
        let ctx = t.context();
        assert_eq!(ctx.ledger.losses, 1);
        assert!(ctx.recovery.active);
        assert_eq!(ctx.recovery.cumulative_loss, 20.0);
        assert_eq!(t.store().tile(pos(7)).bomb_count, 1);
        assert_eq!(t.store().tile(pos(2)).safe_count, 1);
        assert_eq!(t.store().tile(pos(11)).safe_count, 1);

        let plan = model.recovery.plan.unwrap();
        assert_eq!(plan.multiplier, 1.97);
        assert!(model.recovery.split_warning.is_none());
    }

    #[test]
    fn test_mine_outside_reveals_is_recorded() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(1, 5.0), at());
        t.on_tick_at(&Observation::revealed(&[3]).with_mine_at(8), at());
        assert_eq!(t.store().tile(pos(8)).bomb_count, 1);
        assert_eq!(t.store().tile(pos(3)).safe_count, 1);
    }

    #[test]
    fn test_clear_snapshots_history() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[5, 6]).with_payout(), at());
        let model = t.on_tick_at(&Observation::armed(4, 10.0), at());

        assert_eq!(model.reason, TickReason::R005_ROUND_ARMED);
        assert_eq!(t.phase(), RoundPhase::Idle);
        assert_eq!(t.context().history.len(), 1);
        assert_eq!(t.context().round.mine_count, 4);
        assert!(t.context().round.is_empty());
    }

    #[test]
    fn test_abandoned_round_records_nothing() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[1, 2]), at());
        let model = t.on_tick_at(&Observation::armed(3, 10.0), at());

        assert_eq!(model.reason, TickReason::R005_ROUND_ABANDONED);
        assert_eq!(t.store().tile(pos(1)).clicks, 0);
        assert!(t.context().history.is_empty());
        assert_eq!(t.context().ledger.rounds_played, 0);
    }

    #[test]
    fn test_win_clears_recovery() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[0]).with_mine_at(0), at());
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        assert!(t.context().recovery.active);

        t.on_tick_at(&Observation::revealed(&[1]).with_multiplier("2.0x").with_payout(), at());
        let recovery = &t.context().recovery;
        assert!(!recovery.active);
        assert_eq!(recovery.cumulative_loss, 0.0);
        assert_eq!(recovery.attempt_count, 0);
    }

    #[test]
    fn test_failed_save_retried_next_tick() {
        let (mut t, repo) = tracker();
        repo.set_fail_saves(true);
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[0]).with_payout(), at());
        assert!(t.is_dirty());
        assert!(repo.stored().is_none());

        repo.set_fail_saves(false);
        t.on_tick_at(&Observation::revealed(&[0]), at());
        assert!(!t.is_dirty());
        assert!(repo.stored().is_some());
    }

    #[test]
    fn test_reset_session_keeps_analysis() {
        let (mut t, _) = tracker();
        t.on_tick_at(&Observation::armed(3, 10.0), at());
        t.on_tick_at(&Observation::revealed(&[0]).with_mine_at(0), at());
        t.set_gem_goal(4);
        t.reset_session();

        assert_eq!(t.context().ledger, SessionLedger::default());
        assert!(!t.context().recovery.active);
        assert_eq!(t.context().recovery.target_gem_goal, 4);
        assert_eq!(t.store().tile(pos(0)).bomb_count, 1);

        t.reset_analysis();
        assert_eq!(t.store().tile(pos(0)).clicks, 0);
        assert!(t.suggestions().current_suggestions.is_empty());
    }

    #[test]
    fn test_gem_goal_clamped() {
        let (mut t, _) = tracker();
        assert_eq!(t.set_gem_goal(9), 5);
        assert_eq!(t.set_gem_goal(0), 2);
    }

    #[test]
    fn test_exhausted_after_max_attempts() {
        let (mut t, _) = tracker();
        for _ in 0..3 {
            t.on_tick_at(&Observation::armed(3, 10.0), at());
            t.on_tick_at(&Observation::revealed(&[0]).with_mine_at(0), at());
        }
        let model = t.render_at(at());
        assert_eq!(model.recovery.attempts, 3);
        assert!(model.recovery.exhausted);
    }

    #[test]
    fn test_settings_persisted() {
        let (mut t, repo) = tracker();
        let settings = Settings { heatmap_opacity: 3.0, ..Settings::default() };
        t.set_settings(settings);
        assert_eq!(t.settings().heatmap_opacity, 1.0);
        assert_eq!(repo.stored().unwrap().basic.settings.heatmap_opacity, 1.0);
    }

    #[test]
    fn test_wallet_text_used_without_amount() {
        let (mut t, _) = tracker();
        let mut obs = Observation::armed(3, 10.0);
        obs.wallet_text = Some("₹2,000.00".to_string());
        t.on_tick_at(&obs, at());
        assert_eq!(t.context().bankroll, 2000.0);

        t.on_tick_at(&Observation::armed(3, 10.0).with_bankroll(50.0), at());
        assert_eq!(t.context().bankroll, 50.0);
    }
}
