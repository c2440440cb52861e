//! Mitigation dispatch: case-indexed cooldown monotonicity.

use aegis_core::{
    command::MitigationOutcome,
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

fn build(run_id: &str, seed: u64) -> GameEngine {
    // A long script of scams lets every case re-trigger the leak.
    let script = (0..12).map(|_| Scenario::drill(true)).collect();
    let mut engine = GameEngine::build_test_with(quiet_config(), run_id, seed, script).unwrap();
    engine.begin_shift().unwrap();
    engine.set_interest_rate(4.0).unwrap();
    engine
}

#[test]
fn dispatch_without_a_leak_is_a_noop() {
    let mut engine = build("mit-idle-test", 31);
    assert_eq!(
        engine.dispatch_mitigation().unwrap(),
        MitigationOutcome::NotLeaking
    );
    assert_eq!(engine.session().mitigation_ready_at, 0);
}

#[test]
fn cooldown_window_blocks_redispatch_until_enough_cases_resolve() {
    let mut engine = build("mit-cooldown-test", 37);
    let cooldown = engine.config().leak.mitigation_cooldown_cases;
    assert_eq!(cooldown, 2);

    // Case 1: approve the scam, leak starts; dispatch succeeds.
    engine.submit_decision(true).unwrap();
    assert!(engine.economy().is_leaking);
    assert_eq!(
        engine.dispatch_mitigation().unwrap(),
        MitigationOutcome::Dispatched
    );
    assert!(!engine.economy().is_leaking);
    let ready_at = engine.session().mitigation_ready_at;
    assert_eq!(ready_at, 1 + cooldown);

    // Case 2: leak re-triggers inside the window — dispatch is a no-op
    // and the leak keeps running.
    engine.submit_decision(true).unwrap();
    assert!(engine.economy().is_leaking);
    assert_eq!(
        engine.dispatch_mitigation().unwrap(),
        MitigationOutcome::OnCooldown { cases_remaining: 1 }
    );
    assert!(engine.economy().is_leaking, "no-op must not stop the leak");

    // Case 3 resolves; the window [1, 3) has passed and dispatch works.
    engine.submit_decision(false).unwrap(); // denied the scam — correct
    assert_eq!(
        engine.dispatch_mitigation().unwrap(),
        MitigationOutcome::Dispatched
    );
    assert!(!engine.economy().is_leaking);
    assert_eq!(engine.session().mitigation_ready_at, 3 + cooldown);
}
