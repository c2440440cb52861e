//! Geopolitical alert subsystem — capital-band narrative headlines.
//!
//! The cycle subsystem occasionally emits an AlertProbe; this subsystem
//! arms a short one-shot and, when it fires, classifies the then-current
//! capital into a band. Each severity channel carries its own cooldown
//! stamp. The stable mid-range band is a dead zone: no alert fires there
//! regardless of cooldown state.
//!
//! The info channel is not capital-driven — it carries cycle-shift
//! headlines, cooldown-gated like the rest.

use crate::{
    config::AlertConfig,
    economy::EconomyState,
    error::GameResult,
    event::{AlertSeverity, EconomicCycle, GameEvent},
    rng::SubsystemRng,
    subsystem::EconomySubsystem,
    timer::OneShot,
    types::Tick,
};

const CRITICAL_MESSAGES: &[&str] = &[
    "EMERGENCY: Treasury convenes crisis talks over bank solvency.",
    "Capital reserves critically low — regulators demand a recovery plan.",
    "Credit rating agencies place the bank on immediate downgrade watch.",
    "Overnight funding markets freeze the bank out of interbank lending.",
];

const WARNING_MESSAGES: &[&str] = &[
    "Analysts flag deteriorating capital ratios in quarterly review.",
    "Foreign counterparties quietly trim exposure to the bank.",
    "Finance ministry requests briefing on reserve adequacy.",
    "Deposit outflows accelerate amid capital concerns.",
];

const SUCCESS_MESSAGES: &[&str] = &[
    "Reserves at record strength — bank cited as sector safe haven.",
    "Sovereign wealth funds court the bank for flagship mandates.",
    "Capital buffer draws praise in central bank stability report.",
    "Institutional inflows surge on balance-sheet confidence.",
];

fn cycle_headline(cycle: EconomicCycle, rng: &mut SubsystemRng) -> &'static str {
    let pool: &[&str] = match cycle {
        EconomicCycle::Growth => &[
            "Macro desks call the turn: expansion regime confirmed.",
            "Leading indicators swing positive across the board.",
        ],
        EconomicCycle::Recession => &[
            "Economists declare the downturn official.",
            "Industrial output contracts for a second straight quarter.",
        ],
        EconomicCycle::Crisis => &[
            "Markets enter full crisis footing — circuit breakers triggered.",
            "Contagion spreads as credit spreads blow out.",
        ],
    };
    *rng.pick(pool)
}

pub struct AlertSubsystem {
    config: AlertConfig,
    probe:  OneShot,
    /// Last-fired tick per severity channel, in AlertSeverity order:
    /// critical, warning, success, info.
    last_fired: [Option<Tick>; 4],
}

impl AlertSubsystem {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            probe: OneShot::idle(),
            last_fired: [None; 4],
        }
    }

    fn channel(severity: AlertSeverity) -> usize {
        match severity {
            AlertSeverity::Critical => 0,
            AlertSeverity::Warning  => 1,
            AlertSeverity::Success  => 2,
            AlertSeverity::Info     => 3,
        }
    }

    fn cooldown(&self, severity: AlertSeverity) -> Tick {
        match severity {
            AlertSeverity::Critical => self.config.critical_cooldown,
            AlertSeverity::Warning  => self.config.warning_cooldown,
            AlertSeverity::Success  => self.config.success_cooldown,
            AlertSeverity::Info     => self.config.info_cooldown,
        }
    }

    fn off_cooldown(&self, severity: AlertSeverity, tick: Tick) -> bool {
        match self.last_fired[Self::channel(severity)] {
            None => true,
            Some(last) => tick.saturating_sub(last) >= self.cooldown(severity),
        }
    }

    fn stamp(&mut self, severity: AlertSeverity, tick: Tick) {
        self.last_fired[Self::channel(severity)] = Some(tick);
    }

    /// Capital band for the current fraction, or None in the stable
    /// dead zone.
    fn classify(&self, fraction: f64) -> Option<AlertSeverity> {
        if fraction < self.config.critical_below {
            Some(AlertSeverity::Critical)
        } else if fraction < self.config.warning_below {
            Some(AlertSeverity::Warning)
        } else if fraction >= self.config.success_above {
            Some(AlertSeverity::Success)
        } else {
            None
        }
    }

    fn raise(
        &mut self,
        tick: Tick,
        severity: AlertSeverity,
        message: &str,
        out: &mut Vec<GameEvent>,
    ) {
        self.stamp(severity, tick);
        match severity {
            AlertSeverity::Critical => log::warn!("tick={tick} alert: {message}"),
            _ => log::info!("tick={tick} alert: {message}"),
        }
        out.push(GameEvent::AlertRaised {
            tick,
            severity,
            message: message.to_string(),
        });
    }
}

impl EconomySubsystem for AlertSubsystem {
    fn name(&self) -> &'static str {
        "alerts"
    }

    fn update(
        &mut self,
        tick: Tick,
        events_in: &[GameEvent],
        economy: &mut EconomyState,
        rng: &mut SubsystemRng,
    ) -> GameResult<Vec<GameEvent>> {
        let mut out = Vec::new();

        // Cycle shifts earlier this tick feed the info channel.
        for event in events_in {
            if let GameEvent::CycleShifted { to, .. } = event {
                if self.off_cooldown(AlertSeverity::Info, tick) {
                    let message = cycle_headline(*to, rng);
                    self.raise(tick, AlertSeverity::Info, message, &mut out);
                }
            }
        }

        if events_in
            .iter()
            .any(|e| matches!(e, GameEvent::AlertProbe { .. }))
        {
            self.probe.arm(self.config.probe_delay);
        }

        if self.probe.tick() {
            if let Some(severity) = self.classify(economy.ledger.fraction()) {
                if self.off_cooldown(severity, tick) {
                    let message = *match severity {
                        AlertSeverity::Critical => rng.pick(CRITICAL_MESSAGES),
                        AlertSeverity::Warning  => rng.pick(WARNING_MESSAGES),
                        AlertSeverity::Success  => rng.pick(SUCCESS_MESSAGES),
                        AlertSeverity::Info     => unreachable!("info is not a capital band"),
                    };
                    self.raise(tick, severity, message, &mut out);
                }
            }
        }

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
