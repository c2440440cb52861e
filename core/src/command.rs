//! Player intents and their outcomes.
//!
//! RULE: Command misuse is never an error. Setting a locked rate,
//! dispatching mitigation on cooldown, deciding outside a round —
//! each returns a no-op outcome the caller can surface in-narrative.
//! Errors are reserved for the store and serialization boundaries.

use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants added as the desk grows — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    BeginShift,
    SetRate { rate: f64 },
    AdjustRate { delta: f64 },
    Decide { approved: bool },
    DispatchMitigation,
    AcknowledgeEndOfDay,
    Reset,
}

/// What a resolved decision led to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DecisionOutcome {
    Resolved {
        correct: bool,
        penalty: Amount,
        leak_started: bool,
        progress: RoundProgress,
    },
    /// No case is open for a decision (wrong phase, or game over).
    NotInRound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundProgress {
    NextCase,
    DayComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum RateOutcome {
    Set { rate: f64 },
    /// The rate is locked for the trading day; the request is a no-op.
    Locked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MitigationOutcome {
    Dispatched,
    /// Field teams still on operational cooldown; no state change.
    OnCooldown { cases_remaining: u64 },
    /// Nothing to contain; no state change.
    NotLeaking,
}
