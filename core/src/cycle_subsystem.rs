//! Economic cycle subsystem — gradual capital drift.
//!
//! The core deposit/lending base reacts slowly to policy while shocks
//! and leaks hit instantly; this asymmetry is a design property of the
//! desk, not an artifact. This subsystem owns only the slow half.
//!
//! Execution: every `tick_interval` ticks of an active round.
//! Each firing:
//!   1. spread        = interest_rate − base_rate
//!   2. deposit flow  = base × (1 + spread × deposit_sensitivity), floored at 0
//!   3. lending rev.  = base × (1 − spread × lending_sensitivity), floored at 0
//!   4. interest exp. = deposits × (rate/100) × (interval / seconds-per-year)
//!   5. per-cycle {deposit, lending, cost} multipliers
//!   6. bounded symmetric volatility (amplified in the uncertainty zone)
//!   7. ledger.adjust(net)
//!   8. small chance of arming a delayed geopolitical evaluation

use crate::{
    config::EconomyConfig,
    economy::EconomyState,
    error::GameResult,
    event::GameEvent,
    rng::SubsystemRng,
    subsystem::EconomySubsystem,
    timer::IntervalTimer,
    types::Tick,
};

pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

pub struct CycleSubsystem {
    config: EconomyConfig,
    timer:  IntervalTimer,
}

impl CycleSubsystem {
    pub fn new(config: EconomyConfig) -> Self {
        let timer = IntervalTimer::new(config.tick_interval);
        Self { config, timer }
    }

    fn in_uncertainty_zone(&self, rate: f64) -> bool {
        rate > self.config.uncertainty_zone_low && rate <= self.config.uncertainty_zone_high
    }

    /// Net gradual flow for one economy tick, before volatility.
    fn gradual_flow(&self, economy: &EconomyState) -> f64 {
        let rate = economy.interest_rate;
        let spread = rate - self.config.base_rate;
        let m = economy.cycle.multipliers();

        let deposit_flow = (self.config.base_deposit_flow
            * (1.0 + spread * self.config.deposit_sensitivity))
            .max(0.0)
            * m.deposit;
        let lending_revenue = (self.config.base_lending_revenue
            * (1.0 - spread * self.config.lending_sensitivity))
            .max(0.0)
            * m.lending;
        let interest_expense = deposit_flow
            * (rate / 100.0)
            * (self.config.tick_interval as f64 / SECONDS_PER_YEAR)
            * m.cost;

        deposit_flow + (lending_revenue - interest_expense)
    }
}

impl EconomySubsystem for CycleSubsystem {
    fn name(&self) -> &'static str {
        "cycle"
    }

    fn update(
        &mut self,
        tick: Tick,
        _events_in: &[GameEvent],
        economy: &mut EconomyState,
        rng: &mut SubsystemRng,
    ) -> GameResult<Vec<GameEvent>> {
        if !self.timer.tick() {
            return Ok(vec![]);
        }

        let mut volatility = self.config.volatility;
        if self.in_uncertainty_zone(economy.interest_rate) {
            volatility *= self.config.uncertainty_volatility_mult;
        }

        let net_change = self.gradual_flow(economy) + rng.jitter(volatility);
        let capital = economy.ledger.adjust(net_change);

        log::debug!(
            "tick={tick} cycle: {:?} rate={:.2} net={net_change:+.0} capital={capital:.0}",
            economy.cycle,
            economy.interest_rate
        );

        let mut out = vec![GameEvent::EconomyTicked {
            tick,
            net_change,
            capital,
            cycle: economy.cycle,
        }];

        if rng.chance(self.config.alert_probe_probability) {
            out.push(GameEvent::AlertProbe { tick });
        }

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
