//! Leak subsystem — continuous capital drain after an approved scam.
//!
//! While the leak flag is up, a fixed amount drains every tick. The
//! drain stops only when mitigation succeeds (handled by the engine's
//! command path) or capital runs out. The engine folds each drained
//! amount into the day's capital-lost total.
//!
//! Execution: every tick.

use crate::{
    config::LeakConfig,
    economy::EconomyState,
    error::GameResult,
    event::{GameEvent, LeakStopReason},
    rng::SubsystemRng,
    subsystem::EconomySubsystem,
    types::Tick,
};

pub struct LeakSubsystem {
    config: LeakConfig,
}

impl LeakSubsystem {
    pub fn new(config: LeakConfig) -> Self {
        Self { config }
    }
}

impl EconomySubsystem for LeakSubsystem {
    fn name(&self) -> &'static str {
        "leak"
    }

    fn update(
        &mut self,
        tick: Tick,
        _events_in: &[GameEvent],
        economy: &mut EconomyState,
        _rng: &mut SubsystemRng,
    ) -> GameResult<Vec<GameEvent>> {
        if !economy.is_leaking {
            return Ok(vec![]);
        }

        let capital = economy.ledger.adjust(-self.config.drain_per_tick);
        let mut out = vec![GameEvent::LeakDrained {
            tick,
            amount: self.config.drain_per_tick,
            capital,
        }];

        if economy.ledger.is_depleted() {
            economy.is_leaking = false;
            out.push(GameEvent::LeakStopped {
                tick,
                reason: LeakStopReason::CapitalDepleted,
            });
            log::warn!("tick={tick} leak: capital exhausted");
        }

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
