//! One polling tick's view of the game page
//!
//! Produced by a site adapter outside this crate. A `None` field means the
//! adapter could not read that element this tick, which is "no new data".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    /// Raw multiplier label, e.g. "2.90x"
    pub multiplier_text: Option<String>,
    /// Win payout is on screen
    pub payout_available: bool,
    /// Adapter already reported this payout
    pub payout_already_counted: bool,
    /// A mine is showing on the board
    pub mine_revealed_available: bool,
    /// Adapter already reported this mine
    pub mine_already_counted: bool,
    /// Board index of the revealed mine
    pub mine_position: Option<usize>,
    /// Board indices currently revealed
    pub revealed_positions: Option<Vec<usize>>,
    /// Bet button enabled, i.e. a new round can start
    pub betting_enabled: Option<bool>,
    /// Mines selected for the next round
    pub current_mine_count: Option<u32>,
    pub current_bet_amount: Option<f64>,
    pub bankroll_amount: Option<f64>,
    /// Raw wallet label, parsed when `bankroll_amount` is absent
    pub wallet_text: Option<String>,
    /// Currency code shown by the site, e.g. "btc"
    pub currency: Option<String>,
}

impl Observation {
    /// Armed board: betting enabled, nothing revealed
    pub fn armed(mine_count: u32, bet: f64) -> Self {
        Self {
            revealed_positions: Some(Vec::new()),
            betting_enabled: Some(true),
            current_mine_count: Some(mine_count),
            current_bet_amount: Some(bet),
            ..Self::default()
        }
    }

    /// Board with the given tiles revealed, round in play
    pub fn revealed(indices: &[usize]) -> Self {
        Self {
            revealed_positions: Some(indices.to_vec()),
            betting_enabled: Some(false),
            ..Self::default()
        }
    }

    pub fn with_multiplier(mut self, text: &str) -> Self {
        self.multiplier_text = Some(text.to_string());
        self
    }

    pub fn with_bet(mut self, bet: f64) -> Self {
        self.current_bet_amount = Some(bet);
        self
    }

    pub fn with_bankroll(mut self, amount: f64) -> Self {
        self.bankroll_amount = Some(amount);
        self
    }

    pub fn with_mine_count(mut self, mines: u32) -> Self {
        self.current_mine_count = Some(mines);
        self
    }

    /// Payout shown and not yet counted
    pub fn with_payout(mut self) -> Self {
        self.payout_available = true;
        self
    }

    /// Mine shown at `index` and not yet counted
    pub fn with_mine_at(mut self, index: usize) -> Self {
        self.mine_revealed_available = true;
        self.mine_position = Some(index);
        self
    }

    /// Fresh payout edge this tick
    pub fn win_signal(&self) -> bool {
        self.payout_available && !self.payout_already_counted
    }

    /// Fresh mine edge this tick
    pub fn loss_signal(&self) -> bool {
        self.mine_revealed_available && !self.mine_already_counted
    }
}
