//! The event bus — all inter-subsystem communication.
//!
//! RULE: Subsystems communicate ONLY through events.
//! A subsystem may never call another subsystem's functions directly.
//! Earlier subsystems' events for the current tick are passed into
//! later subsystems as `events_in`.

use crate::types::{Amount, RunId, Tick};
use serde::{Deserialize, Serialize};

/// Every event emitted during a session.
/// Variants are appended as mechanics grow — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },
    ShiftStarted {
        run_id: RunId,
        seed: u64,
    },

    // ── Economy drift ──────────────────────────────
    EconomyTicked {
        tick: Tick,
        net_change: Amount,
        capital: Amount,
        cycle: EconomicCycle,
    },
    /// Cycle subsystem requesting a delayed geopolitical evaluation.
    AlertProbe {
        tick: Tick,
    },

    // ── Market shocks ──────────────────────────────
    MarketEventFired {
        tick: Tick,
        name: String,
        impact: Amount,
        capital: Amount,
        forced_cycle: Option<EconomicCycle>,
        message: String,
    },
    MarketEventExpired {
        tick: Tick,
        name: String,
    },
    CycleShifted {
        tick: Tick,
        from: EconomicCycle,
        to: EconomicCycle,
    },

    // ── Leak mechanic ──────────────────────────────
    LeakStarted {
        tick: Tick,
    },
    LeakDrained {
        tick: Tick,
        amount: Amount,
        capital: Amount,
    },
    LeakStopped {
        tick: Tick,
        reason: LeakStopReason,
    },
    MitigationDispatched {
        tick: Tick,
        cooldown_until_case: u64,
    },

    // ── Geopolitical alerts ────────────────────────
    AlertRaised {
        tick: Tick,
        severity: AlertSeverity,
        message: String,
    },

    // ── Case progression ───────────────────────────
    CaseOpened {
        tick: Tick,
        day: u32,
        case_no: u32,
        customer_name: String,
        transaction_type: String,
    },
    DecisionResolved {
        tick: Tick,
        day: u32,
        case_no: u32,
        approved: bool,
        is_scam: bool,
        correct: bool,
        penalty: Amount,
    },
    RateSet {
        tick: Tick,
        rate: f64,
    },
    DayEnded {
        tick: Tick,
        day: u32,
        correct: u32,
        incorrect: u32,
        capital_lost: Amount,
        final_capital: Amount,
    },
    GameOver {
        tick: Tick,
        day: u32,
        total_cases: u64,
        accuracy: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeakStopReason {
    Mitigated,
    CapitalDepleted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Success,
    Info,
}

/// The macro-economic regime modulating gradual capital flows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EconomicCycle {
    Growth,
    Recession,
    Crisis,
}

/// Per-cycle factors applied to the gradual flow model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleMultipliers {
    pub deposit: f64,
    pub lending: f64,
    pub cost:    f64,
}

impl EconomicCycle {
    pub fn multipliers(&self) -> CycleMultipliers {
        match self {
            Self::Growth    => CycleMultipliers { deposit: 1.2, lending: 1.3, cost: 0.9 },
            Self::Recession => CycleMultipliers { deposit: 0.8, lending: 0.7, cost: 1.1 },
            Self::Crisis    => CycleMultipliers { deposit: 0.5, lending: 0.4, cost: 1.4 },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Growth    => "Growth",
            Self::Recession => "Recession",
            Self::Crisis    => "Crisis",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub tick: Tick,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized GameEvent
}
