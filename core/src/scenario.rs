//! Scenario supply — the cases the analyst judges.
//!
//! The engine requests exactly one scenario per case through the
//! ScenarioSource seam and treats supply as fallible: any failure is
//! recovered locally with a benign fallback so case progression never
//! blocks. A generative back end can sit behind the same trait; the
//! built-in source derives everything from the client roster.

use crate::{config::SessionConfig, rng::SubsystemRng, roster::ClientRoster};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One customer request, immutable once issued for a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub customer_name:           String,
    pub phone_number:            String,
    pub transaction_type:        String,
    pub details:                 String,
    pub initial_message:         String,
    pub initial_message_english: String,
    pub language:                String,
    pub is_scam:                 bool,
    pub scam_rationale:          String,
    pub personality:             String,
    pub suggested_prompts:       Vec<String>,
    pub cybersecurity_tip:       String,
}

impl Scenario {
    /// A minimal fixed scenario for scripted drills and tests.
    pub fn drill(is_scam: bool) -> Self {
        Self {
            customer_name: "Jordan Vale".into(),
            phone_number: "(212) 555-0147".into(),
            transaction_type: "Fund Transfer Authorization".into(),
            details: "Routine drill request".into(),
            initial_message: "Hello, I need to authorize a transfer.".into(),
            initial_message_english: "Hello, I need to authorize a transfer.".into(),
            language: "English".into(),
            is_scam,
            scam_rationale: if is_scam {
                "Drill: caller details do not match any ledger record.".into()
            } else {
                "Drill: caller details match the ledger record.".into()
            },
            personality: "Calm and professional".into(),
            suggested_prompts: vec!["Can you confirm your account number?".into()],
            cybersecurity_tip: "Verify every caller against the ledger before acting.".into(),
        }
    }
}

/// The deterministic non-scam placeholder substituted whenever a
/// source fails. Progression continues; the player sees a neutral
/// in-narrative systems hiccup, never a raw fault.
pub fn fallback_scenario() -> Scenario {
    Scenario {
        customer_name: "Branch Systems Desk".into(),
        phone_number: "(212) 555-0100".into(),
        transaction_type: "Account Balance Inquiry".into(),
        details: "Internal systems check after a terminal error".into(),
        initial_message:
            "Hello — our branch terminal dropped the last request. Could you re-run a balance inquiry for verification?"
                .into(),
        initial_message_english:
            "Hello — our branch terminal dropped the last request. Could you re-run a balance inquiry for verification?"
                .into(),
        language: "English".into(),
        is_scam: false,
        scam_rationale: "Internal verification request routed through the branch systems desk.".into(),
        personality: "Apologetic branch colleague".into(),
        suggested_prompts: vec!["Which terminal raised the error?".into()],
        cybersecurity_tip: "System errors are routine; unsolicited urgency is not.".into(),
    }
}

/// The collaborator seam: one scenario per case, fallible.
pub trait ScenarioSource: Send {
    fn next_scenario(&mut self, rng: &mut SubsystemRng) -> anyhow::Result<Scenario>;
}

// ── Roster-driven source ─────────────────────────────────────────────

const LEGIT_TRANSACTIONS: &[&str] = &[
    "Account Balance Inquiry",
    "Fund Transfer Authorization",
    "Password Reset Request",
    "Account Unlock Request",
    "Statement Request",
    "Card Replacement",
    "Email Update",
];

const SCAM_TRANSACTIONS: &[&str] = &[
    "Urgent Fund Transfer",
    "Emergency Account Access",
    "Suspicious Activity Report",
    "Account Verification",
    "Security Alert Response",
];

const SPOOFED_NUMBERS: &[&str] = &[
    "(555) 123-4567",
    "(555) 987-6543",
    "(555) 456-7890",
    "(555) 789-0123",
    "(555) 321-6547",
];

const FAKE_IDENTITIES: &[&str] = &[
    "John Anderson",
    "Sarah Wilson",
    "Michael Brown",
    "Jennifer Davis",
    "Robert Miller",
];

const VERIFICATION_PROMPTS: &[&str] = &[
    "What is your full name?",
    "Can you confirm your phone number?",
    "What is your account number?",
    "What is your email address?",
    "What type of account do you have?",
];

/// Supported greeting translations. English dominates the mix.
const LANGUAGES: &[(&str, &str)] = &[
    ("English", "Hello, I need to access my account. My name is "),
    ("Spanish", "Hola, necesito acceder a mi cuenta. Mi nombre es "),
    ("French", "Bonjour, j'ai besoin d'accéder à mon compte. Mon nom est "),
];

/// Generates cases from the client roster: legitimate requests from
/// real records, scams as impersonations (real name, wrong callback
/// number) or wholesale fabrications.
pub struct RosterScenarioSource {
    roster: ClientRoster,
    scam_probability: f64,
    impersonation_probability: f64,
}

impl RosterScenarioSource {
    pub fn new(config: &SessionConfig, rng: &mut SubsystemRng) -> Self {
        Self {
            roster: ClientRoster::generate(config.roster_size, rng),
            scam_probability: config.scam_probability,
            impersonation_probability: config.impersonation_probability,
        }
    }

    pub fn roster(&self) -> &ClientRoster {
        &self.roster
    }

    fn legitimate(&self, rng: &mut SubsystemRng) -> Scenario {
        let client = self.roster.random_client(rng).clone();
        let transaction = *rng.pick(LEGIT_TRANSACTIONS);

        let (language, greeting) = if rng.chance(0.7) {
            LANGUAGES[0]
        } else {
            *rng.pick(LANGUAGES)
        };
        let english = format!("{}{}.", LANGUAGES[0].1, client.name);
        let message = format!("{greeting}{}.", client.name);

        let prompt_count = 3 + rng.next_u64_below(2) as usize;
        let prompts = pick_prompts(rng, prompt_count);

        Scenario {
            customer_name: client.name.clone(),
            phone_number: client.phone_number.clone(),
            transaction_type: transaction.to_string(),
            details: format!("Customer requesting {}", transaction.to_lowercase()),
            initial_message: message,
            initial_message_english: english,
            language: language.to_string(),
            is_scam: false,
            scam_rationale:
                "Legitimate customer request - all verification details match our database records."
                    .into(),
            personality: "Professional and cooperative bank customer".into(),
            suggested_prompts: prompts,
            cybersecurity_tip:
                "Always verify customer identity using multiple data points from our secure database."
                    .into(),
        }
    }

    fn scam(&self, rng: &mut SubsystemRng) -> Scenario {
        let impersonating = rng.chance(self.impersonation_probability);
        let (customer_name, phone_number, rationale) = if impersonating {
            let real = self.roster.random_client(rng);
            let spoofed = *rng.pick(SPOOFED_NUMBERS);
            (
                real.name.clone(),
                spoofed.to_string(),
                format!(
                    "Scammer impersonating real customer {} but using wrong phone number {}",
                    real.name, spoofed
                ),
            )
        } else {
            (
                rng.pick(FAKE_IDENTITIES).to_string(),
                "(555) 000-3253".to_string(),
                "Completely fake identity not found in our customer database".to_string(),
            )
        };

        let transaction = *rng.pick(SCAM_TRANSACTIONS);
        let message = format!(
            "Hello, this is {customer_name}. I have an urgent security issue with my account that needs immediate attention."
        );

        Scenario {
            customer_name,
            phone_number,
            transaction_type: transaction.to_string(),
            details: "Urgent security matter requiring immediate attention".into(),
            initial_message: message.clone(),
            initial_message_english: message,
            language: "English".into(),
            is_scam: true,
            scam_rationale: rationale,
            personality: "Urgent and pushy, trying to rush the transaction".into(),
            suggested_prompts: pick_prompts(rng, 4),
            cybersecurity_tip:
                "Be suspicious of urgent requests and always verify caller identity through multiple data points."
                    .into(),
        }
    }
}

impl ScenarioSource for RosterScenarioSource {
    fn next_scenario(&mut self, rng: &mut SubsystemRng) -> anyhow::Result<Scenario> {
        if rng.chance(self.scam_probability) {
            Ok(self.scam(rng))
        } else {
            Ok(self.legitimate(rng))
        }
    }
}

fn pick_prompts(rng: &mut SubsystemRng, count: usize) -> Vec<String> {
    let mut pool: Vec<&str> = VERIFICATION_PROMPTS.to_vec();
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count && !pool.is_empty() {
        let idx = rng.next_u64_below(pool.len() as u64) as usize;
        picked.push(pool.swap_remove(idx).to_string());
    }
    picked
}

// ── Scripted source ──────────────────────────────────────────────────

/// Plays back a fixed scenario script, in order. Once exhausted it
/// fails, which exercises the engine's fallback path. Used by tests
/// and scripted drills.
pub struct SequenceSource {
    queue: VecDeque<Scenario>,
}

impl SequenceSource {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            queue: scenarios.into(),
        }
    }
}

impl ScenarioSource for SequenceSource {
    fn next_scenario(&mut self, _rng: &mut SubsystemRng) -> anyhow::Result<Scenario> {
        self.queue
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scenario script exhausted"))
    }
}
