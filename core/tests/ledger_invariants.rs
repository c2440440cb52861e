//! Capital ledger invariants: clamping, the bounded history window,
//! and the one-shot depletion latch.

use aegis_core::ledger::{CapitalLedger, HISTORY_SAMPLES};

#[test]
fn capital_stays_clamped_under_any_adjustment_sequence() {
    let mut ledger = CapitalLedger::new(150_000_000.0, 300_000_000.0);

    let deltas = [
        1e9, -5e8, 42.0, -1e12, 7e7, 7e7, 7e7, 7e7, 7e7, -1.0, 0.0, 3e8,
    ];
    for delta in deltas {
        let capital = ledger.adjust(delta);
        assert!(
            (0.0..=300_000_000.0).contains(&capital),
            "capital {capital} escaped [0, max] after delta {delta}"
        );
        assert_eq!(capital, ledger.capital());
    }
}

#[test]
fn history_never_exceeds_window() {
    let mut ledger = CapitalLedger::new(10_000.0, 1_000_000.0);
    for i in 0..200 {
        ledger.adjust(100.0);
        assert!(
            ledger.history_len() <= HISTORY_SAMPLES,
            "history grew past {HISTORY_SAMPLES} after {i} adjustments"
        );
    }
    assert_eq!(ledger.history_len(), HISTORY_SAMPLES);

    // Oldest-first eviction: the seed value is long gone, the latest
    // sample is the current capital.
    let last = ledger.history().last().unwrap();
    assert_eq!(last, ledger.capital());
    assert!(ledger.history().next().unwrap() > 10_000.0);
}

#[test]
fn depletion_latch_never_clears() {
    let mut ledger = CapitalLedger::new(5_000.0, 1_000_000.0);
    assert!(!ledger.is_depleted());

    ledger.adjust(-10_000.0);
    assert_eq!(ledger.capital(), 0.0);
    assert!(ledger.is_depleted());

    // Later income does not un-deplete; the session is already over.
    ledger.adjust(50_000.0);
    assert!(ledger.is_depleted());
}

#[test]
fn new_ledger_seeds_history_with_starting_capital() {
    let ledger = CapitalLedger::new(150_000_000.0, 300_000_000.0);
    assert_eq!(ledger.history_len(), 1);
    assert_eq!(ledger.history().next(), Some(150_000_000.0));
    assert_eq!(ledger.fraction(), 0.5);
}
