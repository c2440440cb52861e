//! Read-only state snapshot for the presentation boundary.
//!
//! The front end never touches engine state directly: it renders
//! snapshots and forwards intents. A snapshot row is also written to
//! the run log every SNAPSHOT_INTERVAL ticks for replay tooling.

use crate::{
    economy::ActiveEvent,
    event::EconomicCycle,
    session::{DayStats, GamePhase},
    types::{Amount, RunId, Tick},
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_INTERVAL: Tick = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub run_id:             RunId,
    pub tick:               Tick,
    pub phase:              GamePhase,
    pub day:                u32,
    pub cases_today:        u32,
    pub cases_per_day:      u32,
    pub capital:            Amount,
    pub max_capital:        Amount,
    pub capital_history:    Vec<Amount>,
    pub interest_rate:      f64,
    pub rate_locked:        bool,
    pub cycle:              EconomicCycle,
    pub is_leaking:         bool,
    pub active_event:       Option<ActiveEvent>,
    pub last_event_message: String,
    pub day_stats:          DayStats,
}
