//! The capital ledger — the single write path for every dollar.
//!
//! RULE: No component adjusts capital directly. Gradual drift, shocks,
//! leaks, and penalties all route through `adjust`, which clamps,
//! records history, and latches depletion. That keeps the history
//! buffer and the clamp consistent no matter who is spending.

use crate::types::Amount;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sliding-window length of the capital history (oldest evicted first).
pub const HISTORY_SAMPLES: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalLedger {
    capital:     Amount,
    max_capital: Amount,
    history:     VecDeque<Amount>,
    depleted:    bool,
}

impl CapitalLedger {
    pub fn new(starting_capital: Amount, max_capital: Amount) -> Self {
        let capital = starting_capital.clamp(0.0, max_capital);
        let mut history = VecDeque::with_capacity(HISTORY_SAMPLES);
        history.push_back(capital);
        Self {
            capital,
            max_capital,
            history,
            depleted: capital <= 0.0,
        }
    }

    /// Apply a signed delta. The result is clamped to [0, max], appended
    /// to the history window, and returned. Hitting zero latches
    /// `depleted` — the latch never clears for the life of the ledger.
    pub fn adjust(&mut self, delta: Amount) -> Amount {
        self.capital = (self.capital + delta).clamp(0.0, self.max_capital);
        if self.history.len() == HISTORY_SAMPLES {
            self.history.pop_front();
        }
        self.history.push_back(self.capital);
        if self.capital <= 0.0 {
            self.depleted = true;
        }
        self.capital
    }

    pub fn capital(&self) -> Amount {
        self.capital
    }

    pub fn max_capital(&self) -> Amount {
        self.max_capital
    }

    /// Current capital as a fraction of the ceiling, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.max_capital <= 0.0 {
            0.0
        } else {
            self.capital / self.max_capital
        }
    }

    pub fn history(&self) -> impl Iterator<Item = Amount> + '_ {
        self.history.iter().copied()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }
}
