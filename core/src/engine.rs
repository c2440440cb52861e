//! The session engine — the heart of the fraud desk.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Leak subsystem          (per-tick drain)
//!   2. Cycle subsystem         (gradual drift)
//!   3. Market event subsystem  (shocks + countdown)
//!   4. Alert subsystem         (geopolitical headlines)
//!
//! RULES:
//!   - Subsystems execute in registration order, every tick of an
//!     active round. The clock is paused in every other phase, so a
//!     suspended round freezes every timer with remaining time intact.
//!   - Each subsystem's ledger adjustment completes (and clamps, and is
//!     depletion-checked) before the next subsystem runs.
//!   - Player commands are synchronous and never error on misuse; they
//!     return no-op outcomes instead.
//!   - All randomness flows through the RngBank streams.
//!   - All state changes are recorded in the run log.

use crate::{
    alert_subsystem::AlertSubsystem,
    clock::GameClock,
    command::{DecisionOutcome, MitigationOutcome, RateOutcome, RoundProgress},
    config::GameConfig,
    cycle_subsystem::CycleSubsystem,
    economy::EconomyState,
    error::GameResult,
    event::{EventLogEntry, GameEvent, LeakStopReason},
    leak_subsystem::LeakSubsystem,
    market_event_subsystem::MarketEventSubsystem,
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    scenario::{fallback_scenario, Scenario, ScenarioSource, SequenceSource},
    session::{is_correct, Decision, GamePhase, GameReport, ResolvedCase, SessionState},
    snapshot::{GameSnapshot, SNAPSHOT_INTERVAL},
    store::RunStore,
    subsystem::EconomySubsystem,
    types::{RunId, Tick},
};

pub struct GameEngine {
    pub run_id:   RunId,
    pub clock:    GameClock,
    config:       GameConfig,
    seed:         u64,
    economy:      EconomyState,
    session:      SessionState,
    scenario:     Option<Scenario>,
    source:       Box<dyn ScenarioSource>,
    subsystems:   Vec<(SubsystemSlot, Box<dyn EconomySubsystem>, SubsystemRng)>,
    scenario_rng: SubsystemRng,
    decision_rng: SubsystemRng,
    store:        RunStore,
    final_report: Option<GameReport>,
}

impl GameEngine {
    /// Build a fully wired engine. The run row must already exist in
    /// the store (the runner and tests insert it with their own
    /// timestamps; the engine itself never reads the wall clock).
    pub fn build(
        run_id: RunId,
        seed: u64,
        config: GameConfig,
        source: Box<dyn ScenarioSource>,
        store: RunStore,
    ) -> Self {
        let bank = RngBank::new(seed);

        // EXECUTION ORDER — fixed, documented, never reordered.
        let subsystems: Vec<(SubsystemSlot, Box<dyn EconomySubsystem>, SubsystemRng)> = vec![
            (
                SubsystemSlot::Leak,
                Box::new(LeakSubsystem::new(config.leak.clone())),
                bank.for_slot(SubsystemSlot::Leak),
            ),
            (
                SubsystemSlot::Cycle,
                Box::new(CycleSubsystem::new(config.economy.clone())),
                bank.for_slot(SubsystemSlot::Cycle),
            ),
            (
                SubsystemSlot::MarketEvents,
                Box::new(MarketEventSubsystem::new(config.events.clone())),
                bank.for_slot(SubsystemSlot::MarketEvents),
            ),
            (
                SubsystemSlot::Alerts,
                Box::new(AlertSubsystem::new(config.alerts.clone())),
                bank.for_slot(SubsystemSlot::Alerts),
            ),
        ];

        Self {
            clock: GameClock::new(run_id.clone()),
            economy: EconomyState::new(&config.economy),
            session: SessionState::new(),
            scenario: None,
            source,
            subsystems,
            scenario_rng: bank.for_slot(SubsystemSlot::Scenario),
            decision_rng: bank.for_slot(SubsystemSlot::Decision),
            store,
            final_report: None,
            config,
            seed,
            run_id,
        }
    }

    /// In-memory engine with a scripted scenario queue. Test builder.
    pub fn build_test(run_id: &str, seed: u64, scenarios: Vec<Scenario>) -> GameResult<Self> {
        Self::build_test_with(GameConfig::default(), run_id, seed, scenarios)
    }

    /// Test builder with explicit config.
    pub fn build_test_with(
        config: GameConfig,
        run_id: &str,
        seed: u64,
        scenarios: Vec<Scenario>,
    ) -> GameResult<Self> {
        let store = RunStore::in_memory()?;
        store.migrate()?;
        store.insert_run(run_id, seed, env!("CARGO_PKG_VERSION"), 0)?;
        Ok(Self::build(
            run_id.to_string(),
            seed,
            config,
            Box::new(SequenceSource::new(scenarios)),
            store,
        ))
    }

    // ── Phase transitions ──────────────────────────────────────

    /// Leave onboarding. Returns false if the shift already started.
    pub fn begin_shift(&mut self) -> GameResult<bool> {
        if self.session.phase != GamePhase::Onboarding {
            return Ok(false);
        }
        let event = GameEvent::ShiftStarted {
            run_id: self.run_id.clone(),
            seed: self.seed,
        };
        self.persist_event(0, "engine", &event)?;
        self.session.phase = GamePhase::RateSetting;
        log::info!("shift started — day 1 rate setting");
        Ok(true)
    }

    /// Lock the daily rate and open the round. Clamped to the
    /// configured band; a locked rate makes this a no-op.
    pub fn set_interest_rate(&mut self, rate: f64) -> GameResult<RateOutcome> {
        if self.session.phase != GamePhase::RateSetting || self.economy.rate_locked {
            return Ok(RateOutcome::Locked);
        }
        let rate = rate.clamp(self.config.economy.min_rate, self.config.economy.max_rate);
        self.economy.interest_rate = rate;
        self.economy.rate_locked = true;

        let tick = self.clock.current_tick;
        self.persist_event(tick, "engine", &GameEvent::RateSet { tick, rate })?;
        log::info!(
            "day {} rate locked at {rate:.2}%",
            self.session.current_day
        );

        self.session.phase = GamePhase::InRound;
        self.clock.resume();
        if self.scenario.is_none() {
            self.open_next_case()?;
        }
        Ok(RateOutcome::Set { rate })
    }

    /// Nudge the pending rate while it is still unlocked. Does not
    /// lock and does not start the round.
    pub fn adjust_interest_rate(&mut self, delta: f64) -> GameResult<RateOutcome> {
        if self.session.phase != GamePhase::RateSetting || self.economy.rate_locked {
            return Ok(RateOutcome::Locked);
        }
        let rate = (self.economy.interest_rate + delta)
            .clamp(self.config.economy.min_rate, self.config.economy.max_rate);
        self.economy.interest_rate = rate;
        Ok(RateOutcome::Set { rate })
    }

    /// Fold the finished day into a report and move to rate setting.
    /// Returns false outside EndOfDay.
    pub fn acknowledge_end_of_day(&mut self) -> GameResult<bool> {
        if self.session.phase != GamePhase::EndOfDay {
            return Ok(false);
        }
        let report = self.session.close_day(self.economy.ledger.capital());
        self.store.insert_daily_report(&self.run_id, &report)?;

        self.session.current_day += 1;
        self.economy.rate_locked = false;
        self.session.phase = GamePhase::RateSetting;
        log::info!("day {} begins — rate setting", self.session.current_day);
        Ok(true)
    }

    /// Discard the session and start a new run on the same store.
    /// The scenario source is retained.
    pub fn reset(&mut self, run_id: RunId, seed: u64) -> GameResult<()> {
        self.store
            .insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), 0)?;

        let bank = RngBank::new(seed);
        self.subsystems = vec![
            (
                SubsystemSlot::Leak,
                Box::new(LeakSubsystem::new(self.config.leak.clone())),
                bank.for_slot(SubsystemSlot::Leak),
            ),
            (
                SubsystemSlot::Cycle,
                Box::new(CycleSubsystem::new(self.config.economy.clone())),
                bank.for_slot(SubsystemSlot::Cycle),
            ),
            (
                SubsystemSlot::MarketEvents,
                Box::new(MarketEventSubsystem::new(self.config.events.clone())),
                bank.for_slot(SubsystemSlot::MarketEvents),
            ),
            (
                SubsystemSlot::Alerts,
                Box::new(AlertSubsystem::new(self.config.alerts.clone())),
                bank.for_slot(SubsystemSlot::Alerts),
            ),
        ];
        self.scenario_rng = bank.for_slot(SubsystemSlot::Scenario);
        self.decision_rng = bank.for_slot(SubsystemSlot::Decision);
        self.clock = GameClock::new(run_id.clone());
        self.economy = EconomyState::new(&self.config.economy);
        self.session = SessionState::new();
        self.scenario = None;
        self.final_report = None;
        self.seed = seed;
        self.run_id = run_id;
        log::info!("session reset — new run {}", self.run_id);
        Ok(())
    }

    // ── Simulation step ────────────────────────────────────────

    /// Advance one tick. A paused clock (any phase but InRound) makes
    /// this a benign no-op, which is how suspension works.
    pub fn tick(&mut self) -> GameResult<Vec<GameEvent>> {
        if self.clock.paused {
            return Ok(vec![]);
        }
        let tick = self.clock.advance();
        let mut tick_events = vec![GameEvent::TickStarted { tick }];

        // Execute each subsystem in registration order.
        // Each subsystem sees all events emitted so far this tick.
        for i in 0..self.subsystems.len() {
            let new_events = {
                let (_, subsystem, rng) = &mut self.subsystems[i];
                subsystem.update(tick, &tick_events, &mut self.economy, rng)?
            };
            let name = self.subsystems[i].1.name();
            for event in &new_events {
                self.persist_event(tick, name, event)?;
                self.absorb_day_effects(event);
            }
            tick_events.extend(new_events);

            // Depletion is terminal; later subsystems must not run.
            if self.economy.ledger.is_depleted() && self.session.phase != GamePhase::GameOver {
                self.enter_game_over(tick)?;
                break;
            }
        }

        tick_events.push(GameEvent::TickCompleted { tick });

        if self.session.phase != GamePhase::GameOver && tick.is_multiple_of(SNAPSHOT_INTERVAL) {
            let snapshot = self.snapshot();
            self.store
                .save_snapshot(&self.run_id, tick, &serde_json::to_string(&snapshot)?)?;
            log::debug!("snapshot saved at tick {tick}");
        }

        Ok(tick_events)
    }

    /// Run up to n ticks. Stops early if the round suspends.
    pub fn run_ticks(&mut self, n: u64) -> GameResult<()> {
        for _ in 0..n {
            if self.clock.paused {
                break;
            }
            self.tick()?;
        }
        Ok(())
    }

    // ── Player commands ────────────────────────────────────────

    /// Judge the open case. Scoring, penalties, leak trigger, and
    /// case/day progression in one synchronous step.
    pub fn submit_decision(&mut self, approved: bool) -> GameResult<DecisionOutcome> {
        if self.session.phase != GamePhase::InRound {
            return Ok(DecisionOutcome::NotInRound);
        }
        let Some(scenario) = self.scenario.take() else {
            return Ok(DecisionOutcome::NotInRound);
        };

        let tick = self.clock.current_tick;
        let correct = is_correct(approved, scenario.is_scam);
        let mut penalty = 0.0;
        let mut leak_started = false;

        if correct {
            self.session.day_stats.correct += 1;
        } else {
            self.session.day_stats.incorrect += 1;
            if scenario.is_scam && approved {
                // Approved a scam: one-time hemorrhage plus an ongoing leak.
                penalty = self.decision_rng.amount_between(
                    self.config.session.scam_penalty_min,
                    self.config.session.scam_penalty_max,
                );
                self.economy.ledger.adjust(-penalty);
                self.session.day_stats.capital_lost += penalty;
                if !self.economy.is_leaking {
                    self.economy.is_leaking = true;
                    leak_started = true;
                    self.persist_event(tick, "engine", &GameEvent::LeakStarted { tick })?;
                    log::warn!("tick={tick} leak started after approved scam");
                }
            } else {
                // Denied a legitimate client: flat penalty, never a leak.
                penalty = self.config.session.false_denial_penalty;
                self.economy.ledger.adjust(-penalty);
                self.session.day_stats.capital_lost += penalty;
            }
        }

        let case_no = self.session.cases_today + 1;
        let is_scam = scenario.is_scam;
        self.session.resolved_cases.push(ResolvedCase {
            scenario,
            decision: if approved { Decision::Approved } else { Decision::Denied },
            correct,
        });
        self.session.cases_today += 1;
        self.session.cases_resolved += 1;

        self.persist_event(
            tick,
            "engine",
            &GameEvent::DecisionResolved {
                tick,
                day: self.session.current_day,
                case_no,
                approved,
                is_scam,
                correct,
                penalty,
            },
        )?;

        if self.economy.ledger.is_depleted() {
            self.enter_game_over(tick)?;
            return Ok(DecisionOutcome::Resolved {
                correct,
                penalty,
                leak_started,
                progress: RoundProgress::GameOver,
            });
        }

        let progress = if self.session.cases_today >= self.config.session.cases_per_day {
            self.enter_end_of_day(tick)?;
            RoundProgress::DayComplete
        } else {
            self.open_next_case()?;
            RoundProgress::NextCase
        };

        Ok(DecisionOutcome::Resolved {
            correct,
            penalty,
            leak_started,
            progress,
        })
    }

    /// Send the field team after an active leak. Cooldown is measured
    /// in resolved cases; on-cooldown and not-leaking are no-ops.
    pub fn dispatch_mitigation(&mut self) -> GameResult<MitigationOutcome> {
        if !self.economy.is_leaking {
            return Ok(MitigationOutcome::NotLeaking);
        }
        let case_index = self.session.cases_resolved;
        if case_index < self.session.mitigation_ready_at {
            return Ok(MitigationOutcome::OnCooldown {
                cases_remaining: self.session.mitigation_ready_at - case_index,
            });
        }

        self.economy.is_leaking = false;
        self.session.mitigation_ready_at =
            case_index + self.config.leak.mitigation_cooldown_cases;

        let tick = self.clock.current_tick;
        self.persist_event(
            tick,
            "engine",
            &GameEvent::LeakStopped {
                tick,
                reason: LeakStopReason::Mitigated,
            },
        )?;
        self.persist_event(
            tick,
            "engine",
            &GameEvent::MitigationDispatched {
                tick,
                cooldown_until_case: self.session.mitigation_ready_at,
            },
        )?;
        log::info!(
            "tick={tick} leak contained; mitigation on cooldown until case {}",
            self.session.mitigation_ready_at
        );
        Ok(MitigationOutcome::Dispatched)
    }

    // ── Read model ─────────────────────────────────────────────

    pub fn economy(&self) -> &EconomyState {
        &self.economy
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The aggregate report, present once the session has ended.
    pub fn final_report(&self) -> Option<&GameReport> {
        self.final_report.as_ref()
    }

    pub fn store(&self) -> &RunStore {
        &self.store
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            run_id: self.run_id.clone(),
            tick: self.clock.current_tick,
            phase: self.session.phase,
            day: self.session.current_day,
            cases_today: self.session.cases_today,
            cases_per_day: self.config.session.cases_per_day,
            capital: self.economy.ledger.capital(),
            max_capital: self.economy.ledger.max_capital(),
            capital_history: self.economy.ledger.history().collect(),
            interest_rate: self.economy.interest_rate,
            rate_locked: self.economy.rate_locked,
            cycle: self.economy.cycle,
            is_leaking: self.economy.is_leaking,
            active_event: self.economy.active_event.clone(),
            last_event_message: self.economy.last_event_message.clone(),
            day_stats: self.session.day_stats,
        }
    }

    /// Query events for a specific tick from the store.
    /// Used by the determinism tests and replay tooling.
    pub fn store_events_for_tick(
        &self,
        run_id: &str,
        tick: Tick,
    ) -> GameResult<Vec<EventLogEntry>> {
        self.store.events_for_tick(run_id, tick)
    }

    // ── Internals ──────────────────────────────────────────────

    fn open_next_case(&mut self) -> GameResult<()> {
        let scenario = match self.source.next_scenario(&mut self.scenario_rng) {
            Ok(scenario) => scenario,
            Err(e) => {
                log::warn!("scenario supply failed: {e} — substituting fallback");
                fallback_scenario()
            }
        };

        let tick = self.clock.current_tick;
        self.persist_event(
            tick,
            "engine",
            &GameEvent::CaseOpened {
                tick,
                day: self.session.current_day,
                case_no: self.session.cases_today + 1,
                customer_name: scenario.customer_name.clone(),
                transaction_type: scenario.transaction_type.clone(),
            },
        )?;
        self.scenario = Some(scenario);
        Ok(())
    }

    fn enter_end_of_day(&mut self, tick: Tick) -> GameResult<()> {
        self.session.phase = GamePhase::EndOfDay;
        self.clock.pause();
        self.persist_event(
            tick,
            "engine",
            &GameEvent::DayEnded {
                tick,
                day: self.session.current_day,
                correct: self.session.day_stats.correct,
                incorrect: self.session.day_stats.incorrect,
                capital_lost: self.session.day_stats.capital_lost,
                final_capital: self.economy.ledger.capital(),
            },
        )?;
        log::info!(
            "day {} complete: {}/{} correct",
            self.session.current_day,
            self.session.day_stats.correct,
            self.session.day_stats.correct + self.session.day_stats.incorrect
        );
        Ok(())
    }

    /// Terminal transition. Idempotent: a second depletion signal
    /// changes nothing.
    fn enter_game_over(&mut self, tick: Tick) -> GameResult<()> {
        if self.session.phase == GamePhase::GameOver {
            return Ok(());
        }

        self.economy.is_leaking = false;
        self.economy.active_event = None;
        self.scenario = None;

        // Fold the in-progress day into a final report first.
        let report = self.session.close_day(self.economy.ledger.capital());
        self.store.insert_daily_report(&self.run_id, &report)?;

        let final_report = self.session.final_report(self.economy.ledger.capital());
        self.persist_event(
            tick,
            "engine",
            &GameEvent::GameOver {
                tick,
                day: report.day,
                total_cases: final_report.total_cases,
                accuracy: final_report.accuracy,
            },
        )?;
        log::warn!(
            "tick={tick} GAME OVER on day {} — {} cases, {:.0}% accuracy",
            report.day,
            final_report.total_cases,
            final_report.accuracy * 100.0
        );

        self.final_report = Some(final_report);
        self.session.phase = GamePhase::GameOver;
        self.clock.pause();
        Ok(())
    }

    /// Day-scoped bookkeeping derived from the event stream.
    fn absorb_day_effects(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LeakDrained { amount, .. } => {
                self.session.day_stats.capital_lost += amount;
            }
            GameEvent::MarketEventFired { message, .. } => {
                self.session.day_event_messages.push(message.clone());
            }
            GameEvent::AlertRaised { message, .. } => {
                self.session.day_event_messages.push(message.clone());
            }
            _ => {}
        }
    }

    fn persist_event(&self, tick: Tick, subsystem: &str, event: &GameEvent) -> GameResult<()> {
        let entry = EventLogEntry {
            id: None,
            run_id: self.run_id.clone(),
            tick,
            subsystem: subsystem.to_string(),
            event_type: event_type_name(event).to_string(),
            payload: serde_json::to_string(event)?,
        };
        self.store.append_event(&entry)
    }
}

/// Extract a stable string name from a GameEvent variant.
/// Used for the event_type column in event_log.
fn event_type_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::TickStarted { .. }          => "tick_started",
        GameEvent::TickCompleted { .. }        => "tick_completed",
        GameEvent::ShiftStarted { .. }         => "shift_started",
        GameEvent::EconomyTicked { .. }        => "economy_ticked",
        GameEvent::AlertProbe { .. }           => "alert_probe",
        GameEvent::MarketEventFired { .. }     => "market_event_fired",
        GameEvent::MarketEventExpired { .. }   => "market_event_expired",
        GameEvent::CycleShifted { .. }         => "cycle_shifted",
        GameEvent::LeakStarted { .. }          => "leak_started",
        GameEvent::LeakDrained { .. }          => "leak_drained",
        GameEvent::LeakStopped { .. }          => "leak_stopped",
        GameEvent::MitigationDispatched { .. } => "mitigation_dispatched",
        GameEvent::AlertRaised { .. }          => "alert_raised",
        GameEvent::CaseOpened { .. }           => "case_opened",
        GameEvent::DecisionResolved { .. }     => "decision_resolved",
        GameEvent::RateSet { .. }              => "rate_set",
        GameEvent::DayEnded { .. }             => "day_ended",
        GameEvent::GameOver { .. }             => "game_over",
    }
}
