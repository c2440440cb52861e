//! Geopolitical alerts: band classification, per-severity cooldowns,
//! the stable dead zone, and the info channel.
//!
//! Driven directly against the subsystem: probes are forged as
//! events_in, ticks are passed explicitly.

use aegis_core::{
    alert_subsystem::AlertSubsystem,
    config::{AlertConfig, EconomyConfig},
    economy::EconomyState,
    event::{AlertSeverity, EconomicCycle, GameEvent},
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    subsystem::EconomySubsystem,
    types::Tick,
};

fn economy_at_fraction(fraction: f64) -> EconomyState {
    let config = EconomyConfig {
        starting_capital: fraction * 300_000_000.0,
        max_capital: 300_000_000.0,
        ..EconomyConfig::default()
    };
    EconomyState::new(&config)
}

fn rng(seed: u64) -> SubsystemRng {
    RngBank::new(seed).for_slot(SubsystemSlot::Alerts)
}

/// Send a probe at `tick`, then tick the subsystem until the delayed
/// evaluation fires. Returns any alert raised.
fn probe(
    subsystem: &mut AlertSubsystem,
    economy: &mut EconomyState,
    rng: &mut SubsystemRng,
    tick: Tick,
) -> Option<(AlertSeverity, String)> {
    let probe_event = GameEvent::AlertProbe { tick };
    let mut raised = None;
    for offset in 0..AlertConfig::default().probe_delay {
        let events_in: &[GameEvent] = if offset == 0 {
            std::slice::from_ref(&probe_event)
        } else {
            &[]
        };
        let out = subsystem
            .update(tick + offset, events_in, economy, rng)
            .unwrap();
        for event in out {
            if let GameEvent::AlertRaised { severity, message, .. } = event {
                raised = Some((severity, message));
            }
        }
    }
    raised
}

#[test]
fn capital_bands_map_to_severities() {
    for (fraction, expected) in [
        (0.10, Some(AlertSeverity::Critical)),
        (0.25, Some(AlertSeverity::Warning)),
        (0.80, Some(AlertSeverity::Success)),
    ] {
        let mut subsystem = AlertSubsystem::new(AlertConfig::default());
        let mut economy = economy_at_fraction(fraction);
        let mut rng = rng(81);
        let raised = probe(&mut subsystem, &mut economy, &mut rng, 10);
        assert_eq!(
            raised.map(|(severity, _)| severity),
            expected,
            "fraction {fraction}"
        );
    }
}

#[test]
fn stable_band_is_a_dead_zone() {
    let mut subsystem = AlertSubsystem::new(AlertConfig::default());
    let mut economy = economy_at_fraction(0.50);
    let mut rng = rng(83);

    // Repeated probes far apart: cooldowns cannot be the reason for
    // silence, the band itself is.
    for tick in [10u64, 500, 2_000, 10_000] {
        assert!(
            probe(&mut subsystem, &mut economy, &mut rng, tick).is_none(),
            "stable capital must never alert (tick {tick})"
        );
    }
}

#[test]
fn severity_cooldown_gates_repeat_alerts() {
    let config = AlertConfig::default();
    let mut subsystem = AlertSubsystem::new(config.clone());
    let mut economy = economy_at_fraction(0.10);
    let mut rng = rng(87);

    assert!(probe(&mut subsystem, &mut economy, &mut rng, 10).is_some());

    // Inside the critical cooldown: silent.
    assert!(probe(&mut subsystem, &mut economy, &mut rng, 20).is_none());

    // Past it: fires again.
    let later = 10 + config.critical_cooldown + 1;
    assert!(probe(&mut subsystem, &mut economy, &mut rng, later).is_some());
}

#[test]
fn cooldowns_are_independent_per_severity() {
    let mut subsystem = AlertSubsystem::new(AlertConfig::default());
    let mut rng = rng(89);

    // Critical fires at tick 10 …
    let mut low = economy_at_fraction(0.10);
    assert!(probe(&mut subsystem, &mut low, &mut rng, 10).is_some());

    // … and success still fires right after on its own channel.
    let mut high = economy_at_fraction(0.80);
    let raised = probe(&mut subsystem, &mut high, &mut rng, 12);
    assert_eq!(
        raised.map(|(severity, _)| severity),
        Some(AlertSeverity::Success)
    );
}

#[test]
fn cycle_shifts_feed_the_info_channel() {
    let mut subsystem = AlertSubsystem::new(AlertConfig::default());
    let mut economy = economy_at_fraction(0.50);
    let mut rng = rng(91);

    let shift = GameEvent::CycleShifted {
        tick: 5,
        from: EconomicCycle::Growth,
        to: EconomicCycle::Crisis,
    };
    let out = subsystem
        .update(5, std::slice::from_ref(&shift), &mut economy, &mut rng)
        .unwrap();
    assert!(matches!(
        out.as_slice(),
        [GameEvent::AlertRaised {
            severity: AlertSeverity::Info,
            ..
        }]
    ));

    // A second shift inside the info cooldown stays quiet.
    let out = subsystem
        .update(6, std::slice::from_ref(&shift), &mut economy, &mut rng)
        .unwrap();
    assert!(out.is_empty());
}
