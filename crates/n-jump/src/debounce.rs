//! Trigger debouncing — coalescing overlapping pipeline requests.
//!
//! A burst of motion triggers can outrun the pipeline: a run is still
//! showing hints when the next trigger lands. The debouncer serializes
//! this without building a queue — a request arriving during a run is
//! *coalesced*, and after the run completes at most one trailing run
//! executes, using whatever cursor/word context the host reports at that
//! point (the freshest, by definition).
//!
//! The trailing run only happens when the pending request is still warm:
//! arrived within `debounce_delay` of the run completing. A request the
//! user abandoned seconds ago does not resurrect as a surprise hint
//! display.

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// What to do with a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No run in progress — run the pipeline now.
    Run,
    /// A run is in progress — the request was folded into it.
    Coalesced,
}

/// Coalesces trigger requests around an in-progress pipeline run.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    running: bool,
    pending: Option<Instant>,
}

impl Debouncer {
    /// A debouncer with the given coalescing window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            running: false,
            pending: None,
        }
    }

    /// Submit a trigger request at `now`.
    ///
    /// [`Decision::Run`] marks a run as started; the caller must report
    /// back through [`finish`](Self::finish). While a run is in progress
    /// every request coalesces — only the arrival time of the latest one
    /// is kept.
    pub fn request(&mut self, now: Instant) -> Decision {
        if self.running {
            self.pending = Some(now);
            return Decision::Coalesced;
        }
        self.running = true;
        Decision::Run
    }

    /// Report the current run complete at `now`.
    ///
    /// Returns `true` when a warm coalesced request should produce one
    /// trailing run — in that case the run is already marked as started
    /// and the caller reports back through `finish` again.
    pub fn finish(&mut self, now: Instant) -> bool {
        self.running = false;
        if let Some(requested) = self.pending.take() {
            if now.saturating_duration_since(requested) <= self.delay {
                self.running = true;
                return true;
            }
            log::trace!("dropping stale coalesced trigger");
        }
        false
    }

    /// Whether a pipeline run is currently in progress.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(ms: u64) -> Instant {
        static BASE: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        *BASE.get_or_init(Instant::now) + Duration::from_millis(ms)
    }

    fn debouncer() -> Debouncer {
        Debouncer::new(Duration::from_millis(80))
    }

    // -- Idle requests ------------------------------------------------------

    #[test]
    fn idle_request_runs_immediately() {
        let mut d = debouncer();
        assert_eq!(d.request(at(0)), Decision::Run);
        assert!(d.is_running());
    }

    #[test]
    fn finish_without_pending_goes_idle() {
        let mut d = debouncer();
        d.request(at(0));
        assert!(!d.finish(at(50)));
        assert!(!d.is_running());
        // Next request runs again.
        assert_eq!(d.request(at(60)), Decision::Run);
    }

    // -- Coalescing ---------------------------------------------------------

    #[test]
    fn request_during_run_coalesces() {
        let mut d = debouncer();
        d.request(at(0));
        assert_eq!(d.request(at(30)), Decision::Coalesced);
    }

    #[test]
    fn warm_pending_request_yields_one_trailing_run() {
        let mut d = debouncer();
        d.request(at(0));
        d.request(at(30)); // coalesced

        // Pipeline completes 20ms later: the pending request is warm.
        assert!(d.finish(at(50)));
        assert!(d.is_running());

        // Trailing run completes with nothing further pending.
        assert!(!d.finish(at(90)));
        assert!(!d.is_running());
    }

    #[test]
    fn many_overlapping_requests_collapse_to_one_trailing_run() {
        let mut d = debouncer();
        d.request(at(0));
        for ms in [10, 20, 30, 40] {
            assert_eq!(d.request(at(ms)), Decision::Coalesced);
        }
        assert!(d.finish(at(60)));
        // One trailing run, not four.
        assert!(!d.finish(at(100)));
    }

    #[test]
    fn stale_pending_request_is_dropped() {
        let mut d = debouncer();
        d.request(at(0));
        d.request(at(10)); // coalesced early in a long run

        // The run took 500ms; the pending request is long stale.
        assert!(!d.finish(at(510)));
        assert!(!d.is_running());
    }

    #[test]
    fn latest_pending_arrival_wins() {
        let mut d = debouncer();
        d.request(at(0));
        d.request(at(10)); // would be stale by completion
        d.request(at(440)); // fresh re-request

        assert!(d.finish(at(500)));
    }
}
