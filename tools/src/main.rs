//! desk-runner: headless session driver for the Aegis fraud desk.
//!
//! Plays full trading days with a bot analyst that misjudges cases at
//! a configurable rate, then prints the per-day ledger and the final
//! report.
//!
//! Usage:
//!   desk-runner --seed 12345 --days 5 --error-rate 0.2 --db run.db

use aegis_core::{
    command::{DecisionOutcome, MitigationOutcome, RoundProgress},
    config::GameConfig,
    engine::GameEngine,
    rng::{RngBank, SubsystemSlot},
    scenario::RosterScenarioSource,
    session::GamePhase,
    store::RunStore,
};
use anyhow::Result;
use rand::{Rng, SeedableRng};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 5u32);
    let error_rate = parse_arg(&args, "--error-rate", 0.2f64);
    let ticks_per_case = parse_arg(&args, "--ticks-per-case", 45u64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");

    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => GameConfig::load(&w[1])?,
        None => GameConfig::default(),
    };

    println!("Aegis Desk — desk-runner");
    println!("  seed:           {seed}");
    println!("  days:           {days}");
    println!("  error rate:     {error_rate}");
    println!("  ticks per case: {ticks_per_case}");
    println!("  db:             {db}");
    println!();

    let store = if db == ":memory:" {
        RunStore::in_memory()?
    } else {
        RunStore::open(db)?
    };
    store.migrate()?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    store.insert_run(
        &run_id,
        seed,
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().timestamp(),
    )?;

    // The roster source draws from the scenario stream; hand it a
    // throwaway stream seeded the same way the engine will seed its own.
    let mut roster_rng = RngBank::new(seed).for_slot(SubsystemSlot::Scenario);
    let source = RosterScenarioSource::new(&config.session, &mut roster_rng);

    let mut engine = GameEngine::build(run_id.clone(), seed, config, Box::new(source), store);

    // Bot decisions use their own stream so engine determinism is
    // observable run-to-run for a fixed bot seed.
    let mut bot_rng = rand::rngs::StdRng::seed_from_u64(seed ^ 0x00b0_7a11);

    engine.begin_shift()?;
    'session: for _ in 0..days {
        engine.set_interest_rate(3.0 + bot_rng.gen_range(0.0..3.5))?;

        loop {
            engine.run_ticks(ticks_per_case)?;
            if engine.session().phase == GamePhase::GameOver {
                break 'session;
            }

            if engine.economy().is_leaking {
                if let MitigationOutcome::Dispatched = engine.dispatch_mitigation()? {
                    log::info!("bot dispatched mitigation");
                }
            }

            let is_scam = match engine.current_scenario() {
                Some(scenario) => scenario.is_scam,
                None => break,
            };
            let judge_correctly = bot_rng.gen::<f64>() >= error_rate;
            let approved = is_scam != judge_correctly;

            match engine.submit_decision(approved)? {
                DecisionOutcome::Resolved { progress, .. } => match progress {
                    RoundProgress::NextCase => {}
                    RoundProgress::DayComplete => {
                        engine.acknowledge_end_of_day()?;
                        break;
                    }
                    RoundProgress::GameOver => break 'session,
                },
                DecisionOutcome::NotInRound => break,
            }
        }
    }

    print_summary(&engine);
    Ok(())
}

fn print_summary(engine: &GameEngine) {
    let session = engine.session();

    println!("=== DAY LEDGER ===");
    if session.daily_reports.is_empty() {
        println!("  (no completed days)");
    }
    for report in &session.daily_reports {
        println!(
            "  day {:>2} | {}✓ {}✗ | lost ${:>12.0} | close ${:>12.0} | {} event(s)",
            report.day,
            report.stats.correct,
            report.stats.incorrect,
            report.stats.capital_lost,
            report.final_capital,
            report.economic_events.len()
        );
    }

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:    {}", engine.run_id);
    println!("  ticks:     {}", engine.clock.current_tick);
    println!("  phase:     {:?}", session.phase);
    println!("  capital:   ${:.0}", engine.economy().ledger.capital());
    println!("  cycle:     {}", engine.economy().cycle.label());

    if let Some(report) = engine.final_report() {
        println!();
        println!("=== FINAL REPORT ===");
        println!("  days played:  {}", report.total_days);
        println!("  total cases:  {}", report.total_cases);
        println!(
            "  accuracy:     {:.0}% ({}/{})",
            report.accuracy * 100.0,
            report.total_correct,
            report.total_cases
        );
        if let Some((day, correct)) = report.best_day {
            println!("  best day:     day {day} ({correct} correct)");
        }
        if let Some((day, lost)) = report.worst_day {
            println!("  worst day:    day {day} (${lost:.0} lost)");
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
