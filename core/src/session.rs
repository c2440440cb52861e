//! Session state — phases, day accounting, and reports.
//!
//! The decision/day state machine's data lives here; the transitions
//! themselves are driven by the engine so that penalties, leaks, and
//! the run log stay in one place.

use crate::{scenario::Scenario, types::Amount};
use serde::{Deserialize, Serialize};

/// Session phases. The clock runs only in InRound; GameOver is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Onboarding,
    RateSetting,
    InRound,
    EndOfDay,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Denied,
}

/// One judged case. Append-only within a day, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCase {
    pub scenario: Scenario,
    pub decision: Decision,
    pub correct:  bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DayStats {
    pub correct:      u32,
    pub incorrect:    u32,
    pub capital_lost: Amount,
}

/// Immutable once created at a day transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub day:             u32,
    pub stats:           DayStats,
    pub cases:           Vec<ResolvedCase>,
    pub final_capital:   Amount,
    pub economic_events: Vec<String>,
}

/// Aggregate statistics presented when the session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub total_days:    u32,
    pub total_cases:   u64,
    pub total_correct: u64,
    pub accuracy:      f64,
    /// (day, correct decisions) of the strongest day.
    pub best_day:      Option<(u32, u32)>,
    /// (day, capital lost) of the costliest day.
    pub worst_day:     Option<(u32, Amount)>,
    pub final_capital: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase:               GamePhase,
    pub current_day:         u32,
    pub cases_today:         u32,
    /// Session-wide monotonic resolved-case counter; the mitigation
    /// cooldown is measured against it.
    pub cases_resolved:      u64,
    pub day_stats:           DayStats,
    pub resolved_cases:      Vec<ResolvedCase>,
    pub daily_reports:       Vec<DailyReport>,
    /// Narrative economy messages accumulated for the current day.
    pub day_event_messages:  Vec<String>,
    /// Mitigation dispatch is a no-op until this case index.
    pub mitigation_ready_at: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Onboarding,
            current_day: 1,
            cases_today: 0,
            cases_resolved: 0,
            day_stats: DayStats::default(),
            resolved_cases: Vec::new(),
            daily_reports: Vec::new(),
            day_event_messages: Vec::new(),
            mitigation_ready_at: 0,
        }
    }

    /// Fold the in-progress day into an immutable report and clear
    /// day-scoped state. The caller appends the report and decides
    /// the next phase.
    pub fn close_day(&mut self, final_capital: Amount) -> DailyReport {
        let report = DailyReport {
            day: self.current_day,
            stats: self.day_stats,
            cases: std::mem::take(&mut self.resolved_cases),
            final_capital,
            economic_events: std::mem::take(&mut self.day_event_messages),
        };
        self.day_stats = DayStats::default();
        self.cases_today = 0;
        self.daily_reports.push(report.clone());
        report
    }

    /// Aggregate the session. Best day by correct count, worst day by
    /// capital lost.
    pub fn final_report(&self, final_capital: Amount) -> GameReport {
        let total_cases: u64 = self
            .daily_reports
            .iter()
            .map(|r| (r.stats.correct + r.stats.incorrect) as u64)
            .sum();
        let total_correct: u64 = self
            .daily_reports
            .iter()
            .map(|r| r.stats.correct as u64)
            .sum();
        let accuracy = if total_cases > 0 {
            total_correct as f64 / total_cases as f64
        } else {
            0.0
        };

        let best_day = self
            .daily_reports
            .iter()
            .max_by_key(|r| r.stats.correct)
            .map(|r| (r.day, r.stats.correct));
        let worst_day = self
            .daily_reports
            .iter()
            .max_by(|a, b| {
                a.stats
                    .capital_lost
                    .partial_cmp(&b.stats.capital_lost)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| (r.day, r.stats.capital_lost));

        GameReport {
            total_days: self.daily_reports.len() as u32,
            total_cases,
            total_correct,
            accuracy,
            best_day,
            worst_day,
            final_capital,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Approving a legitimate request or denying a scam is correct;
/// the other two combinations are not.
pub fn is_correct(approved: bool, is_scam: bool) -> bool {
    approved != is_scam
}
