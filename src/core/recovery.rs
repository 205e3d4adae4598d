//! RecoveryCalculator: stake that recoups the cumulative loss
//!
//! bet = loss / (multiplier - 1), capped at 10% of bankroll. When the cap
//! bites the loss is spread over ceil(raw / cap) rounds.

use crate::{DEFAULT_MULTIPLIER, MAX_BANKROLL_FRACTION};
use crate::types::{RecoveryPlan, RecoveryState};

/// Published payout multipliers, rows are mine counts 1-5, columns gem goals 2-5
const MULTIPLIER_TABLE: [[f64; 4]; 5] = [
    [1.99, 2.94, 3.88, 4.81],
    [1.98, 2.92, 3.85, 4.77],
    [1.97, 2.90, 3.82, 4.73],
    [1.96, 2.88, 3.79, 4.69],
    [1.95, 2.86, 3.76, 4.65],
];

/// Pure bet-sizing calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct RecoveryCalculator;

impl RecoveryCalculator {
    /// Create new calculator
    pub fn new() -> Self {
        Self
    }

    /// Payout multiplier for surviving `gem_goal` reveals with `mine_count` mines
    ///
    /// Pairs outside the table, or a table value that would not pay a
    /// profit, fall back to `DEFAULT_MULTIPLIER`.
    pub fn multiplier(mine_count: u32, gem_goal: u32) -> f64 {
        let value = match (mine_count, gem_goal) {
            (1..=5, 2..=5) => MULTIPLIER_TABLE[(mine_count - 1) as usize][(gem_goal - 2) as usize],
            _ => DEFAULT_MULTIPLIER,
        };
        if value > 1.0 { value } else { DEFAULT_MULTIPLIER }
    }

    /// Size the recovery bet
    ///
    /// A bankroll of zero or less is treated as unknown and the cap is skipped.
    pub fn compute(&self, cumulative_loss: f64, mine_count: u32, gem_goal: u32, bankroll: f64) -> RecoveryPlan {
        let multiplier = Self::multiplier(mine_count, gem_goal);
        let profit_multiplier = multiplier - 1.0;
        let raw_bet = cumulative_loss.max(0.0) / profit_multiplier;
        let max_bet = bankroll * MAX_BANKROLL_FRACTION;

        if bankroll > 0.0 && raw_bet > max_bet {
            RecoveryPlan {
                bet_amount: max_bet,
                needs_split: true,
                rounds_needed: (raw_bet / max_bet).ceil() as u32,
                multiplier,
                profit_multiplier,
            }
        } else {
            RecoveryPlan {
                bet_amount: raw_bet,
                needs_split: false,
                rounds_needed: 1,
                multiplier,
                profit_multiplier,
            }
        }
    }

    /// Plan for the current recovery state, `None` while inactive
    pub fn plan_for(&self, state: &RecoveryState, mine_count: u32, bankroll: f64) -> Option<RecoveryPlan> {
        state
            .active
            .then(|| self.compute(state.cumulative_loss, mine_count, state.target_gem_goal, bankroll))
    }
}

/// Warning shown when the loss has to be spread over several rounds
pub fn split_warning(plan: &RecoveryPlan) -> Option<String> {
    plan.needs_split
        .then(|| format!("Split into {} rounds of {:.2}", plan.rounds_needed, plan.bet_amount))
}

// =============================================================================
// TESTS
// =============================================================================
