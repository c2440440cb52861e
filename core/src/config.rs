//! Engine tuning constants.
//!
//! Defaults are the canonical values of the desk simulation; a JSON
//! file with any subset of fields can override them. Nothing outside
//! this module hardcodes an interval, bound, penalty, or probability.

use crate::types::{Amount, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cases per trading day.
    pub cases_per_day: u32,
    /// Chance a generated case is a scam.
    pub scam_probability: f64,
    /// Of scams, chance the scammer impersonates a real client.
    pub impersonation_probability: f64,
    /// Clients generated into the ledger roster.
    pub roster_size: usize,
    /// One-time penalty range for approving a scam.
    pub scam_penalty_min: Amount,
    pub scam_penalty_max: Amount,
    /// Flat penalty for denying a legitimate client. Never leaks.
    pub false_denial_penalty: Amount,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cases_per_day: 5,
            scam_probability: 0.4,
            impersonation_probability: 0.6,
            roster_size: 100,
            scam_penalty_min: 30_000_000.0,
            scam_penalty_max: 50_000_000.0,
            false_denial_penalty: 5_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_capital: Amount,
    pub max_capital: Amount,
    /// Gradual-flow computation period, in ticks.
    pub tick_interval: Tick,
    /// The neutral policy rate the spread is measured against.
    pub base_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    /// Gradual deposit inflow per economy tick at zero spread.
    pub base_deposit_flow: Amount,
    /// Gradual lending revenue per economy tick at zero spread.
    pub base_lending_revenue: Amount,
    /// Deposit response per percentage point of spread.
    pub deposit_sensitivity: f64,
    /// Lending response per percentage point of spread.
    pub lending_sensitivity: f64,
    /// Symmetric volatility bound per economy tick.
    pub volatility: Amount,
    /// Rates in (zone_low, zone_high] sit in the uncertainty zone.
    pub uncertainty_zone_low: f64,
    pub uncertainty_zone_high: f64,
    /// Volatility amplification inside the uncertainty zone.
    pub uncertainty_volatility_mult: f64,
    /// Chance an economy tick arms a geopolitical evaluation.
    pub alert_probe_probability: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_capital: 150_000_000.0,
            max_capital: 300_000_000.0,
            tick_interval: 5,
            base_rate: 4.0,
            min_rate: 2.0,
            max_rate: 7.0,
            base_deposit_flow: 180_000.0,
            base_lending_revenue: 140_000.0,
            deposit_sensitivity: 0.15,
            lending_sensitivity: 0.20,
            volatility: 450_000.0,
            uncertainty_zone_low: 4.0,
            uncertainty_zone_high: 5.0,
            uncertainty_volatility_mult: 2.5,
            alert_probe_probability: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Ticks between shock rolls. Earlier iterations of the desk ran
    /// this at 30; the canonical cadence is 120.
    pub interval: Tick,
    /// Active-event countdown length, in ticks.
    pub countdown: Tick,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            interval: 120,
            countdown: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakConfig {
    /// Capital drained per tick while a leak is active.
    pub drain_per_tick: Amount,
    /// Mitigation cooldown, measured in resolved cases, not ticks.
    pub mitigation_cooldown_cases: u64,
}

impl Default for LeakConfig {
    fn default() -> Self {
        Self {
            drain_per_tick: 50_000.0,
            mitigation_cooldown_cases: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Capital fraction below which the situation is critical.
    pub critical_below: f64,
    /// Capital fraction below which the desk gets a warning.
    pub warning_below: f64,
    /// Capital fraction at or above which success headlines run.
    /// Between `warning_below` and this bound lies the stable dead
    /// zone: no alert fires there, ever.
    pub success_above: f64,
    /// Delay, in ticks, between a probe and the evaluation it arms.
    pub probe_delay: Tick,
    pub critical_cooldown: Tick,
    pub warning_cooldown: Tick,
    pub success_cooldown: Tick,
    pub info_cooldown: Tick,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            critical_below: 0.15,
            warning_below: 0.35,
            success_above: 0.75,
            probe_delay: 2,
            critical_cooldown: 45,
            warning_cooldown: 90,
            success_cooldown: 120,
            info_cooldown: 150,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub economy: EconomyConfig,
    pub events:  EventConfig,
    pub leak:    LeakConfig,
    pub alerts:  AlertConfig,
}

impl GameConfig {
    /// Load overrides from a JSON file. Missing fields keep defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
