//! Deterministic client-ledger generation using curated name lists.
//!
//! The roster is the ground truth the analyst verifies callers against:
//! every legitimate scenario references a real record, every impersonation
//! scam references a real record with spoofed contact details.
//! All generation is deterministic (same RNG seed = same roster).

use crate::rng::SubsystemRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const COMPLIANCE_PROTOCOLS: [&str; 6] = [
    "Wire transfers over $10,000 require secondary voice signature verification.",
    "Changes to account contact details (email, phone) must be initiated through the official banking portal, not via chat.",
    "Never ask for passwords, PINs, or full social security numbers.",
    "Official bank communications will not use urgent, threatening language or contain links to non-official login pages.",
    "Grammatical errors and spelling mistakes from official-looking emails are a major red flag for phishing.",
    "Cross-reference all names and account numbers with the client ledger before proceeding.",
];

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda",
    "William", "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa",
    "Anthony", "Betty", "Mark", "Dorothy", "Donald", "Sandra", "Steven", "Ashley",
    "Paul", "Kimberly", "Andrew", "Donna", "Joshua", "Emily", "Kenneth", "Carol",
    "Kevin", "Michelle", "Brian", "Amanda", "George", "Melissa", "Edward", "Deborah",
    "Ronald", "Stephanie",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker",
    "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen", "Hill",
    "Flores", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera", "Campbell",
    "Mitchell", "Carter", "Roberts",
];

const ACCOUNT_TYPES: &[&str] = &[
    "Premium Checking", "Investment Portfolio", "Small Business", "Standard Savings",
    "IRA", "Student Account", "Corporate", "Trust Fund",
];

// "Active" weighted 5-of-8, matching real-ledger composition.
const STATUSES: &[&str] = &[
    "Active", "Active", "Active", "Active", "Active", "Locked", "Closed", "Under Review",
];

const SECURITY_NOTES: &[&str] = &[
    "No issues on record.",
    "Prefers email communication.",
    "High net worth individual.",
    "Frequently changes passwords.",
    "Account flagged for prior fraud attempt.",
    "Lost debit card last month.",
    "Authorized for international transfers.",
    "Power of attorney on file.",
    "Requires accessibility accommodations.",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "aol.com",
    "icloud.com", "comcast.net", "verizon.net", "sbcglobal.net", "att.net",
];

const AREA_CODES: &[&str] = &[
    "212", "310", "415", "617", "312", "713", "214", "305", "404", "206",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientRecord {
    pub name:           String,
    pub account_number: String,
    pub account_type:   String,
    pub account_status: String,
    pub security_notes: String,
    pub email:          String,
    pub phone_number:   String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRoster {
    clients: Vec<ClientRecord>,
}

impl ClientRoster {
    /// Generate `size` clients with unique names, sorted for display.
    pub fn generate(size: usize, rng: &mut SubsystemRng) -> Self {
        let mut clients = Vec::with_capacity(size);
        let mut used_names: HashSet<String> = HashSet::new();

        let mut index = 0usize;
        while clients.len() < size {
            let first = *rng.pick(FIRST_NAMES);
            let last = *rng.pick(LAST_NAMES);
            let name = format!("{first} {last}");
            if !used_names.insert(name.clone()) {
                continue;
            }

            clients.push(ClientRecord {
                name,
                account_number: format!("ACCT-{}", 10_000_000 + index),
                account_type: ACCOUNT_TYPES[index % ACCOUNT_TYPES.len()].to_string(),
                account_status: STATUSES[index % STATUSES.len()].to_string(),
                security_notes: SECURITY_NOTES[index % SECURITY_NOTES.len()].to_string(),
                email: make_email(first, last, index),
                phone_number: make_phone(index, rng),
            });
            index += 1;
        }

        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Self { clients }
    }

    pub fn clients(&self) -> &[ClientRecord] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.name == name)
    }

    pub fn random_client<'a>(&'a self, rng: &mut SubsystemRng) -> &'a ClientRecord {
        rng.pick(&self.clients)
    }
}

fn make_email(first: &str, last: &str, index: usize) -> String {
    let first = first.to_lowercase();
    let last = last.to_lowercase();
    let domain = EMAIL_DOMAINS[index % EMAIL_DOMAINS.len()];
    match index % 5 {
        0 => format!("{first}.{last}@{domain}"),
        1 => format!("{first}{last}@{domain}"),
        2 => format!("{first}_{last}@{domain}"),
        3 => format!("{first}{last}{}@{domain}", (index % 99) + 1),
        _ => format!("{}{last}@{domain}", &first[..1]),
    }
}

fn make_phone(index: usize, rng: &mut SubsystemRng) -> String {
    let area = AREA_CODES[index % AREA_CODES.len()];
    let exchange = 100 + rng.next_u64_below(900);
    let number = 1000 + rng.next_u64_below(9000);
    format!("({area}) {exchange}-{number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, SubsystemSlot};

    fn rng(seed: u64) -> SubsystemRng {
        RngBank::new(seed).for_slot(SubsystemSlot::Scenario)
    }

    #[test]
    fn roster_is_deterministic() {
        let a = ClientRoster::generate(40, &mut rng(7));
        let b = ClientRoster::generate(40, &mut rng(7));
        assert_eq!(a.clients(), b.clients());
    }

    #[test]
    fn roster_names_are_unique() {
        let roster = ClientRoster::generate(100, &mut rng(42));
        let mut seen = HashSet::new();
        for client in roster.clients() {
            assert!(seen.insert(client.name.clone()), "duplicate name {}", client.name);
        }
        assert_eq!(roster.len(), 100);
    }

    #[test]
    fn lookup_finds_every_client() {
        let roster = ClientRoster::generate(25, &mut rng(9));
        for client in roster.clients() {
            assert_eq!(roster.lookup(&client.name), Some(client));
        }
        assert!(roster.lookup("Nobody Atall").is_none());
    }
}
