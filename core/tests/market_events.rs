//! Market shocks: roll cadence, countdown singularity, expiry, forced
//! cycles, and countdown freeze across suspension.

use aegis_core::{
    command::{DecisionOutcome, RoundProgress},
    config::GameConfig,
    engine::GameEngine,
    event::EconomicCycle,
    market_event_subsystem::MarketEventKind,
    rng::{RngBank, SubsystemSlot},
    scenario::Scenario,
};

fn event_config(interval: u64, countdown: u64) -> GameConfig {
    let mut config = GameConfig::default();
    config.economy.base_deposit_flow = 0.0;
    config.economy.base_lending_revenue = 0.0;
    config.economy.volatility = 0.0;
    config.economy.alert_probe_probability = 0.0;
    config.events.interval = interval;
    config.events.countdown = countdown;
    config
}

fn started_engine(config: GameConfig, run_id: &str, seed: u64) -> GameEngine {
    let script = (0..10).map(|_| Scenario::drill(false)).collect();
    let mut engine = GameEngine::build_test_with(config, run_id, seed, script).unwrap();
    engine.begin_shift().unwrap();
    engine.set_interest_rate(4.0).unwrap();
    engine
}

#[test]
fn shock_fires_on_the_roll_interval_and_moves_capital() {
    let mut engine = started_engine(event_config(10, 30), "shock-test", 51);

    engine.run_ticks(9).unwrap();
    assert!(engine.economy().active_event.is_none());
    assert_eq!(engine.economy().ledger.capital(), 150_000_000.0);

    engine.run_ticks(1).unwrap();
    let active = engine.economy().active_event.clone().expect("active event");
    assert_eq!(active.remaining, 30);
    assert!(!engine.economy().last_event_message.is_empty());
    assert_ne!(engine.economy().ledger.capital(), 150_000_000.0);
    assert_eq!(
        engine.store().event_count_of_type("shock-test", "market_event_fired").unwrap(),
        1
    );
}

#[test]
fn new_shock_replaces_the_running_countdown() {
    // Countdown (30) outlives the roll interval (10), so every roll
    // lands while the previous countdown is still running.
    let mut engine = started_engine(event_config(10, 30), "singular-test", 53);

    engine.run_ticks(15).unwrap();
    let remaining_mid = engine.economy().active_event.clone().unwrap().remaining;
    assert_eq!(remaining_mid, 25, "5 decrements after the tick-10 roll");

    engine.run_ticks(5).unwrap();
    let active = engine.economy().active_event.clone().unwrap();
    assert_eq!(
        active.remaining, 30,
        "second roll must restart the countdown, not double-decrement"
    );
    assert_eq!(
        engine.store().event_count_of_type("singular-test", "market_event_fired").unwrap(),
        2
    );
    // The replaced countdown never expired.
    assert_eq!(
        engine.store().event_count_of_type("singular-test", "market_event_expired").unwrap(),
        0
    );
}

#[test]
fn countdown_expiry_clears_active_event_and_keeps_the_headline() {
    let mut engine = started_engine(event_config(10, 5), "expiry-test", 59);

    engine.run_ticks(10).unwrap();
    assert!(engine.economy().active_event.is_some());

    engine.run_ticks(5).unwrap();
    assert!(engine.economy().active_event.is_none());
    assert!(
        !engine.economy().last_event_message.is_empty(),
        "headline stays for passive display"
    );
    assert_eq!(
        engine.store().event_count_of_type("expiry-test", "market_event_expired").unwrap(),
        1
    );
}

#[test]
fn countdown_freezes_across_end_of_day() {
    let mut engine = started_engine(event_config(10, 30), "freeze-test", 61);

    engine.run_ticks(12).unwrap();
    assert_eq!(engine.economy().active_event.clone().unwrap().remaining, 28);

    // Burn the day down without ticking the clock.
    for case in 1..=5 {
        let outcome = engine.submit_decision(true).unwrap();
        if case == 5 {
            assert!(matches!(
                outcome,
                DecisionOutcome::Resolved {
                    progress: RoundProgress::DayComplete,
                    ..
                }
            ));
        }
    }
    assert_eq!(
        engine.economy().active_event.clone().unwrap().remaining,
        28,
        "suspension must not consume countdown time"
    );

    engine.acknowledge_end_of_day().unwrap();
    engine.set_interest_rate(4.0).unwrap();
    engine.run_ticks(1).unwrap();
    assert_eq!(
        engine.economy().active_event.clone().unwrap().remaining,
        27,
        "resume continues from the frozen remainder"
    );
}

#[test]
fn forced_cycle_shocks_move_the_regime() {
    // Roll every tick: across 120 rolls a regime-forcing shock is
    // practically certain, and the run is deterministic for the seed.
    let mut engine = started_engine(event_config(1, 2), "force-test", 67);
    engine.run_ticks(120).unwrap();

    let shifted = engine
        .store()
        .event_count_of_type("force-test", "cycle_shifted")
        .unwrap();
    assert!(shifted > 0, "no cycle shift across 120 shocks");
}

#[test]
fn catalog_impacts_have_the_documented_signs_and_forcings() {
    let mut rng = RngBank::new(71).for_slot(SubsystemSlot::MarketEvents);

    for kind in MarketEventKind::ALL {
        for cycle in [
            EconomicCycle::Growth,
            EconomicCycle::Recession,
            EconomicCycle::Crisis,
        ] {
            let impact = kind.impact(4.0, cycle, &mut rng);
            match kind {
                MarketEventKind::MarketRally
                | MarketEventKind::TechSectorSurge
                | MarketEventKind::ForeignInvestment
                | MarketEventKind::StimulusPackage => {
                    assert!(impact > 0.0, "{} must be income", kind.label())
                }
                _ => assert!(impact < 0.0, "{} must be a loss", kind.label()),
            }
        }
    }

    assert_eq!(
        MarketEventKind::BankingCrisis.forced_cycle(),
        Some(EconomicCycle::Crisis)
    );
    assert_eq!(
        MarketEventKind::SovereignDefaultScare.forced_cycle(),
        Some(EconomicCycle::Recession)
    );
    assert_eq!(
        MarketEventKind::StimulusPackage.forced_cycle(),
        Some(EconomicCycle::Growth)
    );
    assert_eq!(MarketEventKind::MarketRally.forced_cycle(), None);
}

#[test]
fn banking_crisis_impact_sits_in_the_documented_band() {
    let mut rng = RngBank::new(73).for_slot(SubsystemSlot::MarketEvents);
    for _ in 0..200 {
        let impact = MarketEventKind::BankingCrisis.impact(4.0, EconomicCycle::Crisis, &mut rng);
        assert!(
            (-23_000_000.0..=-8_000_000.0).contains(&impact),
            "impact {impact} outside the crisis band at base rate"
        );
    }
}
