//! Subsystem trait and registry contract.
//!
//! RULE: Every timer-driven simulation stream implements EconomySubsystem.
//! The engine calls update() on each registered subsystem in registration
//! order, every tick of an active round. Execution order is fixed and
//! documented in engine.rs.

use crate::{
    economy::EconomyState,
    error::GameResult,
    event::GameEvent,
    rng::SubsystemRng,
    types::Tick,
};
use std::any::Any;

/// The contract every simulation stream must fulfill.
pub trait EconomySubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine while a round is active.
    ///
    /// - `tick`:      the current tick number
    /// - `events_in`: events emitted by earlier subsystems this tick
    /// - `economy`:   the shared economy state handle
    /// - `rng`:       this subsystem's persistent deterministic stream
    ///
    /// Returns new events to append to the tick's event log.
    fn update(
        &mut self,
        tick: Tick,
        events_in: &[GameEvent],
        economy: &mut EconomyState,
        rng: &mut SubsystemRng,
    ) -> GameResult<Vec<GameEvent>>;

    /// For downcasting in tests and tooling only.
    /// Production engine code never uses this.
    fn as_any(&self) -> &dyn Any;
}
