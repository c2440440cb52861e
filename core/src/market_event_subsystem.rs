//! Market event subsystem — time-boxed shocks.
//!
//! On each roll interval one catalog entry fires: an immediate ledger
//! impact (bypassing the gradual model), an optional forced cycle, and
//! a narrative headline. A 30-tick countdown exposes the shock as the
//! active event; starting a new shock cancels any running countdown —
//! there is only ever one active event.
//!
//! Execution: every tick (countdown), rolls every `interval` ticks.

use crate::{
    config::EventConfig,
    economy::{ActiveEvent, EconomyState},
    error::GameResult,
    event::{EconomicCycle, GameEvent},
    rng::SubsystemRng,
    subsystem::EconomySubsystem,
    timer::{Countdown, IntervalTimer},
    types::{Amount, Tick},
};

/// The shock catalog. Each entry carries a pure (rate, cycle) → amount
/// impact; magnitudes are rolled fresh on every firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketEventKind {
    MarketRally,
    TechSectorSurge,
    ForeignInvestment,
    StimulusPackage,
    FlashCrash,
    RegulatoryFine,
    SovereignDefaultScare,
    BankingCrisis,
}

impl MarketEventKind {
    pub const ALL: [MarketEventKind; 8] = [
        Self::MarketRally,
        Self::TechSectorSurge,
        Self::ForeignInvestment,
        Self::StimulusPackage,
        Self::FlashCrash,
        Self::RegulatoryFine,
        Self::SovereignDefaultScare,
        Self::BankingCrisis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketRally           => "Market Rally",
            Self::TechSectorSurge       => "Tech Sector Surge",
            Self::ForeignInvestment     => "Foreign Investment Inflow",
            Self::StimulusPackage       => "Emergency Stimulus Package",
            Self::FlashCrash            => "Flash Crash",
            Self::RegulatoryFine        => "Regulatory Fine",
            Self::SovereignDefaultScare => "Sovereign Default Scare",
            Self::BankingCrisis         => "Banking Crisis",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MarketRally           => "Broad market rally lifts institutional holdings.",
            Self::TechSectorSurge       => "Tech sector surge drives commercial account inflows.",
            Self::ForeignInvestment     => "Foreign capital chases domestic yields.",
            Self::StimulusPackage       => "Central bank announces emergency stimulus package.",
            Self::FlashCrash            => "Flash crash wipes out intraday trading positions.",
            Self::RegulatoryFine        => "Regulator levies a fine over compliance lapses.",
            Self::SovereignDefaultScare => "Sovereign default fears rattle bond desks.",
            Self::BankingCrisis         => "Interbank confidence collapses — banking crisis declared.",
        }
    }

    /// Shock that forces the macro regime, if any.
    pub fn forced_cycle(&self) -> Option<EconomicCycle> {
        match self {
            Self::StimulusPackage       => Some(EconomicCycle::Growth),
            Self::SovereignDefaultScare => Some(EconomicCycle::Recession),
            Self::BankingCrisis         => Some(EconomicCycle::Crisis),
            _ => None,
        }
    }

    /// Signed capital impact, parameterized by the current policy rate
    /// and macro regime. Base ranges are per-event; rate and cycle
    /// scale them.
    pub fn impact(&self, rate: f64, cycle: EconomicCycle, rng: &mut SubsystemRng) -> Amount {
        let spread = rate - 4.0;
        match self {
            Self::MarketRally => {
                let base = rng.amount_between(2_000_000.0, 7_500_000.0);
                if cycle == EconomicCycle::Growth { base * 1.25 } else { base }
            }
            Self::TechSectorSurge => {
                // High rates choke growth-sector funding.
                let base = rng.amount_between(3_000_000.0, 9_000_000.0);
                base * (1.0 - 0.05 * spread.max(0.0)).max(0.5)
            }
            Self::ForeignInvestment => {
                // Yield-seeking inflows strengthen with the spread.
                let base = rng.amount_between(4_000_000.0, 10_000_000.0);
                base * (1.0 + 0.08 * spread).max(0.5)
            }
            Self::StimulusPackage => rng.amount_between(6_000_000.0, 14_000_000.0),
            Self::FlashCrash => {
                let base = -rng.amount_between(5_000_000.0, 12_000_000.0);
                if cycle == EconomicCycle::Crisis { base * 1.3 } else { base }
            }
            Self::RegulatoryFine => -rng.amount_between(3_000_000.0, 9_000_000.0),
            Self::SovereignDefaultScare => -rng.amount_between(6_000_000.0, 15_000_000.0),
            Self::BankingCrisis => {
                let base = -rng.amount_between(8_000_000.0, 23_000_000.0);
                base * (1.0 + 0.06 * spread.max(0.0))
            }
        }
    }
}

pub struct MarketEventSubsystem {
    config:    EventConfig,
    roll:      IntervalTimer,
    countdown: Countdown,
    current:   Option<MarketEventKind>,
}

impl MarketEventSubsystem {
    pub fn new(config: EventConfig) -> Self {
        let roll = IntervalTimer::new(config.interval);
        Self {
            config,
            roll,
            countdown: Countdown::idle(),
            current: None,
        }
    }

    fn fire(
        &mut self,
        tick: Tick,
        economy: &mut EconomyState,
        rng: &mut SubsystemRng,
        out: &mut Vec<GameEvent>,
    ) {
        let kind = *rng.pick(&MarketEventKind::ALL);
        let impact = kind.impact(economy.interest_rate, economy.cycle, rng);
        let capital = economy.ledger.adjust(impact);

        let forced = kind.forced_cycle();
        if let Some(to) = forced {
            if to != economy.cycle {
                out.push(GameEvent::CycleShifted {
                    tick,
                    from: economy.cycle,
                    to,
                });
                economy.cycle = to;
            }
        }

        // Replaces any running countdown — one active event at a time.
        self.countdown.start(self.config.countdown);
        self.current = Some(kind);
        economy.active_event = Some(ActiveEvent {
            name: kind.label().to_string(),
            remaining: self.config.countdown,
        });
        economy.last_event_message = kind.message().to_string();

        log::info!(
            "tick={tick} event: {} impact={impact:+.0} capital={capital:.0}",
            kind.label()
        );

        out.push(GameEvent::MarketEventFired {
            tick,
            name: kind.label().to_string(),
            impact,
            capital,
            forced_cycle: forced,
            message: kind.message().to_string(),
        });
    }
}

impl EconomySubsystem for MarketEventSubsystem {
    fn name(&self) -> &'static str {
        "market_events"
    }

    fn update(
        &mut self,
        tick: Tick,
        _events_in: &[GameEvent],
        economy: &mut EconomyState,
        rng: &mut SubsystemRng,
    ) -> GameResult<Vec<GameEvent>> {
        let mut out = Vec::new();

        if self.countdown.tick() {
            let expired = self.current.take();
            economy.active_event = None;
            if let Some(kind) = expired {
                // last_event_message stays for passive display.
                out.push(GameEvent::MarketEventExpired {
                    tick,
                    name: kind.label().to_string(),
                });
            }
        } else if let (Some(active), Some(remaining)) =
            (economy.active_event.as_mut(), self.countdown.remaining())
        {
            active.remaining = remaining;
        }

        if self.roll.tick() {
            self.fire(tick, economy, rng, &mut out);
        }

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
