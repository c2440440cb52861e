//! Tick-driven timers — the multiplexer behind every simulation stream.
//!
//! RULES:
//!   - Timers advance only when explicitly ticked. The engine ticks them
//!     solely during an active round, so suspension freezes remaining
//!     time exactly — no drift, no catch-up on resume.
//!   - Starting a countdown or arming a one-shot replaces any running
//!     instance. There is never more than one pending fire per timer.
//!   - Cancellation is a plain state clear; nothing leaks.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

/// A repeating timer with a fixed period, measured in ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntervalTimer {
    period:  Tick,
    elapsed: Tick,
}

impl IntervalTimer {
    pub fn new(period: Tick) -> Self {
        assert!(period > 0, "interval period must be > 0");
        Self { period, elapsed: 0 }
    }

    /// Advance one tick. Returns true exactly on period boundaries.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// A one-shot countdown with observable remaining time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<Tick>,
}

impl Countdown {
    pub fn idle() -> Self {
        Self { remaining: None }
    }

    /// Start (or restart) the countdown. Any running countdown is
    /// cancelled first — there is only ever one.
    pub fn start(&mut self, duration: Tick) {
        assert!(duration > 0, "countdown duration must be > 0");
        self.remaining = Some(duration);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advance one tick. Returns true on the tick the countdown expires;
    /// the countdown clears itself at that point.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn remaining(&self) -> Option<Tick> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }
}

/// A delayed single fire. Arming replaces any pending fire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OneShot {
    delay: Option<Tick>,
}

impl OneShot {
    pub fn idle() -> Self {
        Self { delay: None }
    }

    pub fn arm(&mut self, delay: Tick) {
        self.delay = Some(delay.max(1));
    }

    pub fn cancel(&mut self) {
        self.delay = None;
    }

    /// Advance one tick. Returns true on the tick the delay elapses.
    pub fn tick(&mut self) -> bool {
        match self.delay {
            Some(1) => {
                self.delay = None;
                true
            }
            Some(n) => {
                self.delay = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.delay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_on_period_boundaries() {
        let mut t = IntervalTimer::new(3);
        let fires: Vec<bool> = (0..9).map(|_| t.tick()).collect();
        assert_eq!(
            fires,
            vec![false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn countdown_expires_once_and_clears() {
        let mut c = Countdown::idle();
        c.start(2);
        assert!(!c.tick());
        assert_eq!(c.remaining(), Some(1));
        assert!(c.tick());
        assert!(!c.is_running());
        assert!(!c.tick(), "expired countdown must not fire again");
    }

    #[test]
    fn restart_replaces_running_countdown() {
        let mut c = Countdown::idle();
        c.start(10);
        c.tick();
        c.start(3);
        assert_eq!(c.remaining(), Some(3), "restart must not inherit elapsed time");
    }

    #[test]
    fn cancelled_countdown_never_fires() {
        let mut c = Countdown::idle();
        c.start(5);
        c.cancel();
        for _ in 0..10 {
            assert!(!c.tick());
        }
    }

    #[test]
    fn oneshot_fires_after_delay() {
        let mut s = OneShot::idle();
        s.arm(2);
        assert!(!s.tick());
        assert!(s.tick());
        assert!(!s.is_armed());
    }
}
