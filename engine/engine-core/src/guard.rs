//! Rolling-window limiter for automated play
//!
//! Computer turns are driven by the session host, not by a human, so a bug in
//! turn sequencing could make the computer play forever. `RunawayGuard` counts
//! automated actions in a sliding window and latches once the limit is
//! exceeded; the host stops automated play until the session is reset.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::warn;

/// Outcome of recording one automated action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// The action may proceed
    Allowed,
    /// This action pushed the window over the limit; the guard is now halted
    Tripped { count: usize, window_ms: u64 },
    /// The guard tripped earlier and still refuses automated actions
    Halted,
}

#[derive(Debug, Clone)]
pub struct RunawayGuard {
    max_actions: usize,
    window: Duration,
    recent: VecDeque<Instant>,
    halted: bool,
}

impl RunawayGuard {
    /// Allow at most `max_actions` automated actions in any `window`.
    pub fn new(max_actions: usize, window: Duration) -> Self {
        Self {
            max_actions,
            window,
            recent: VecDeque::with_capacity(max_actions + 1),
            halted: false,
        }
    }

    /// Record an automated action taken at `now`.
    pub fn record(&mut self, now: Instant) -> GuardVerdict {
        if self.halted {
            return GuardVerdict::Halted;
        }

        while let Some(&oldest) = self.recent.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.recent.pop_front();
            } else {
                break;
            }
        }
        self.recent.push_back(now);

        let count = self.recent.len();
        if count > self.max_actions {
            self.halted = true;
            let window_ms = self.window_ms();
            warn!(count, window_ms, "Runaway automated play detected");
            return GuardVerdict::Tripped { count, window_ms };
        }
        GuardVerdict::Allowed
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn window_ms(&self) -> u64 {
        self.window.as_millis() as u64
    }

    /// Clear the window and lift a halt (new game).
    pub fn reset(&mut self) {
        self.recent.clear();
        self.halted = false;
    }
}

impl Default for RunawayGuard {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(2000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let mut guard = RunawayGuard::default();
        let start = Instant::now();

        for i in 0..5 {
            let verdict = guard.record(start + Duration::from_millis(i * 100));
            assert_eq!(verdict, GuardVerdict::Allowed);
        }
        assert!(!guard.is_halted());
    }

    #[test]
    fn test_trips_on_sixth_action_in_window() {
        let mut guard = RunawayGuard::default();
        let start = Instant::now();

        for i in 0..5 {
            guard.record(start + Duration::from_millis(i * 100));
        }
        let verdict = guard.record(start + Duration::from_millis(500));

        assert_eq!(
            verdict,
            GuardVerdict::Tripped {
                count: 6,
                window_ms: 2000
            }
        );
        assert!(guard.is_halted());
        assert_eq!(
            guard.record(start + Duration::from_secs(60)),
            GuardVerdict::Halted
        );
    }

    #[test]
    fn test_old_actions_slide_out() {
        let mut guard = RunawayGuard::default();
        let start = Instant::now();

        // One action every second never exceeds 5 in a 2 s window
        for i in 0..20 {
            let verdict = guard.record(start + Duration::from_secs(i));
            assert_eq!(verdict, GuardVerdict::Allowed);
        }
    }

    #[test]
    fn test_reset_lifts_halt() {
        let mut guard = RunawayGuard::new(1, Duration::from_millis(100));
        let start = Instant::now();

        guard.record(start);
        assert!(matches!(guard.record(start), GuardVerdict::Tripped { .. }));

        guard.reset();
        assert!(!guard.is_halted());
        assert_eq!(guard.record(start), GuardVerdict::Allowed);
    }
}
