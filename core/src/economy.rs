//! Shared economy state.
//!
//! Owned exclusively by the engine. Subsystems receive a mutable
//! handle during their update slot; the presentation boundary only
//! ever sees snapshots.

use crate::{
    config::EconomyConfig,
    event::EconomicCycle,
    ledger::CapitalLedger,
    types::Tick,
};
use serde::{Deserialize, Serialize};

/// The currently running market shock, surfaced to the front end
/// while its countdown lasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveEvent {
    pub name:      String,
    pub remaining: Tick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyState {
    pub ledger:             CapitalLedger,
    pub is_leaking:         bool,
    pub interest_rate:      f64,
    pub rate_locked:        bool,
    pub cycle:              EconomicCycle,
    pub active_event:       Option<ActiveEvent>,
    pub last_event_message: String,
}

impl EconomyState {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            ledger: CapitalLedger::new(config.starting_capital, config.max_capital),
            is_leaking: false,
            interest_rate: config.base_rate,
            rate_locked: false,
            cycle: EconomicCycle::Growth,
            active_event: None,
            last_event_message: String::new(),
        }
    }
}
