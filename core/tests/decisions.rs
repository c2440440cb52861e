//! Decision scoring, penalties, and leak activation.
//!
//! Uses a quiet economy (no drift, no volatility, no shocks) so every
//! capital movement in these tests is attributable to a decision or
//! the leak drain.

use aegis_core::{
    command::{DecisionOutcome, RoundProgress},
    config::GameConfig,
    engine::GameEngine,
    scenario::Scenario,
};

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.economy.base_deposit_flow = 0.0;
    config.economy.base_lending_revenue = 0.0;
    config.economy.volatility = 0.0;
    config.economy.alert_probe_probability = 0.0;
    config.events.interval = 1_000_000;
    config
}

fn engine_with(scenarios: Vec<Scenario>, seed: u64) -> GameEngine {
    let mut engine =
        GameEngine::build_test_with(quiet_config(), "decision-test", seed, scenarios)
            .expect("build test engine");
    engine.begin_shift().expect("begin shift");
    engine.set_interest_rate(4.0).expect("set rate");
    engine
}

fn resolve(engine: &mut GameEngine, approved: bool) -> (bool, f64, bool) {
    match engine.submit_decision(approved).expect("decision") {
        DecisionOutcome::Resolved {
            correct,
            penalty,
            leak_started,
            ..
        } => (correct, penalty, leak_started),
        DecisionOutcome::NotInRound => panic!("no case open"),
    }
}

#[test]
fn scoring_matrix() {
    // (is_scam, approved) → expected correctness, exhaustively.
    for (is_scam, approved, expect_correct) in [
        (false, true, true),
        (true, false, true),
        (true, true, false),
        (false, false, false),
    ] {
        let mut engine = engine_with(
            vec![Scenario::drill(is_scam), Scenario::drill(false)],
            7,
        );
        let (correct, _, _) = resolve(&mut engine, approved);
        assert_eq!(
            correct, expect_correct,
            "is_scam={is_scam} approved={approved}"
        );
    }
}

#[test]
fn approving_a_scam_penalizes_and_starts_the_leak() {
    let mut engine = engine_with(vec![Scenario::drill(true), Scenario::drill(false)], 11);
    let start_capital = engine.economy().ledger.capital();
    assert_eq!(start_capital, 150_000_000.0);

    let (correct, penalty, leak_started) = resolve(&mut engine, true);
    assert!(!correct);
    assert!(leak_started);
    assert!(engine.economy().is_leaking);
    assert!(
        (30_000_000.0..=50_000_000.0).contains(&penalty),
        "penalty {penalty} outside configured range"
    );
    assert_eq!(engine.economy().ledger.capital(), start_capital - penalty);
    assert_eq!(engine.session().day_stats.capital_lost, penalty);
    assert_eq!(engine.session().day_stats.incorrect, 1);
}

#[test]
fn leak_drains_per_tick_until_mitigated() {
    let mut engine = engine_with(vec![Scenario::drill(true), Scenario::drill(false)], 13);
    let (_, penalty, _) = resolve(&mut engine, true);
    let after_penalty = engine.economy().ledger.capital();

    engine.run_ticks(10).expect("ticks");
    let drained = 10.0 * engine.config().leak.drain_per_tick;
    assert_eq!(engine.economy().ledger.capital(), after_penalty - drained);
    assert_eq!(
        engine.session().day_stats.capital_lost,
        penalty + drained
    );
    assert!(engine.economy().is_leaking, "leak must persist until mitigated");
}

#[test]
fn denying_a_legitimate_client_costs_a_flat_penalty_and_never_leaks() {
    let mut engine = engine_with(vec![Scenario::drill(false), Scenario::drill(false)], 17);
    let (correct, penalty, leak_started) = resolve(&mut engine, false);

    assert!(!correct);
    assert!(!leak_started);
    assert!(!engine.economy().is_leaking);
    assert_eq!(penalty, engine.config().session.false_denial_penalty);
    assert_eq!(
        engine.economy().ledger.capital(),
        150_000_000.0 - penalty
    );

    // Ticks after a false denial drain nothing.
    engine.run_ticks(5).expect("ticks");
    assert_eq!(
        engine.economy().ledger.capital(),
        150_000_000.0 - penalty
    );
}

#[test]
fn correct_decisions_cost_nothing() {
    let mut engine = engine_with(vec![Scenario::drill(false), Scenario::drill(false)], 19);
    let (correct, penalty, leak_started) = resolve(&mut engine, true);
    assert!(correct);
    assert_eq!(penalty, 0.0);
    assert!(!leak_started);
    assert_eq!(engine.economy().ledger.capital(), 150_000_000.0);
    assert_eq!(engine.session().day_stats.correct, 1);
}

#[test]
fn exhausted_scenario_source_falls_back_to_a_benign_case() {
    // Empty script: the very first case already needs the fallback.
    let mut engine = engine_with(vec![], 23);

    let scenario = engine.current_scenario().expect("fallback case open");
    assert!(!scenario.is_scam);
    assert_eq!(scenario.customer_name, "Branch Systems Desk");

    // Progression is unaffected: the fallback scores like any case.
    let (correct, penalty, _) = resolve(&mut engine, true);
    assert!(correct);
    assert_eq!(penalty, 0.0);
    assert!(matches!(
        engine.submit_decision(true).expect("second decision"),
        DecisionOutcome::Resolved {
            progress: RoundProgress::NextCase,
            ..
        }
    ));
}
