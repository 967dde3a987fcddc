//! Motion tracking — counting repeated navigation presses into triggers.
//!
//! Each key name owns an independent press counter. A press increments the
//! counter and re-arms that key's timeout deadline; a press arriving after
//! the deadline finds a reset counter. When the counter reaches the key's
//! required count the tracker fires a trigger and resets to zero.
//!
//! Deadlines are wall-clock and checked at press edges — no timer threads.
//! At any moment a key has exactly one live deadline: the one armed by its
//! latest press. Callers pass `now` explicitly, which keeps the tracker
//! pure enough to test with synthetic clocks.
//!
//! # Key repeat
//!
//! Holding a key down produces a burst of machine-generated presses that
//! the user never meant as "press w three times". Consecutive presses of
//! any key closer together than `key_repeat_threshold` classify the stream
//! as repeating; while repeating (and suppression is enabled) presses
//! reset the counter instead of accumulating, so a held key can never
//! creep up to a trigger. The classification clears once a gap exceeds
//! `key_repeat_reset_delay`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use n_hint::config::HopConfig;

// ---------------------------------------------------------------------------
// Press outcome
// ---------------------------------------------------------------------------

/// What one press did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// Counted toward the threshold; this many presses accumulated so far.
    Counted(u32),
    /// The threshold was reached — run the hint pipeline.
    Triggered,
    /// Ignored: the stream is classified as key repeat.
    Suppressed,
}

// ---------------------------------------------------------------------------
// KeyRepeatState
// ---------------------------------------------------------------------------

/// Global auto-repeat classification across all keys.
#[derive(Debug, Default)]
pub struct KeyRepeatState {
    last_press: Option<Instant>,
    repeating: bool,
}

impl KeyRepeatState {
    /// Record a press and reclassify. Returns the new `repeating` state.
    fn observe(&mut self, now: Instant, threshold: Duration, reset_delay: Duration) -> bool {
        if let Some(last) = self.last_press {
            let gap = now.saturating_duration_since(last);
            if gap <= threshold {
                self.repeating = true;
            } else if gap >= reset_delay {
                self.repeating = false;
            }
            // Gaps between the two bounds keep the current classification.
        }
        self.last_press = Some(now);
        self.repeating
    }
}

// ---------------------------------------------------------------------------
// MotionTracker
// ---------------------------------------------------------------------------

/// Per-key press state: accumulated count and the deadline-arming press.
#[derive(Debug)]
struct MotionState {
    count: u32,
    last_press: Instant,
}

/// Counts repeated presses per key and fires triggers.
#[derive(Debug)]
pub struct MotionTracker {
    per_key: HashMap<String, u32>,
    default_count: u32,
    motion_timeout: Duration,
    repeat_threshold: Duration,
    repeat_reset_delay: Duration,
    suppress_on_repeat: bool,
    states: HashMap<String, MotionState>,
    repeat: KeyRepeatState,
}

impl MotionTracker {
    /// Build a tracker from the engine configuration.
    #[must_use]
    pub fn new(config: &HopConfig) -> Self {
        Self {
            per_key: config.per_key_motion_count.clone(),
            default_count: config.default_motion_count,
            motion_timeout: config.motion_timeout,
            repeat_threshold: config.key_repeat_threshold,
            repeat_reset_delay: config.key_repeat_reset_delay,
            suppress_on_repeat: config.suppress_on_key_repeat,
            states: HashMap::new(),
            repeat: KeyRepeatState::default(),
        }
    }

    /// The press count required to trigger for this key.
    #[must_use]
    pub fn required_count(&self, key: &str) -> u32 {
        self.per_key.get(key).copied().unwrap_or(self.default_count)
    }

    /// Record one press of `key` at `now`.
    pub fn on_press(&mut self, key: &str, now: Instant) -> Press {
        let repeating =
            self.repeat
                .observe(now, self.repeat_threshold, self.repeat_reset_delay);
        let required = self.required_count(key);

        let state = self
            .states
            .entry(key.to_string())
            .or_insert(MotionState {
                count: 0,
                last_press: now,
            });

        // The deadline armed by the previous press fired before this one
        // arrived: start counting from scratch.
        if now.saturating_duration_since(state.last_press) > self.motion_timeout {
            state.count = 0;
        }
        state.last_press = now;

        if repeating && self.suppress_on_repeat {
            state.count = 0;
            return Press::Suppressed;
        }

        state.count += 1;
        if state.count >= required {
            state.count = 0;
            log::debug!("motion trigger on {key:?}");
            return Press::Triggered;
        }
        Press::Counted(state.count)
    }

    /// Reset one key's counter (e.g. after the host consumed the key).
    pub fn reset(&mut self, key: &str) {
        if let Some(state) = self.states.get_mut(key) {
            state.count = 0;
        }
    }

    /// Whether the press stream is currently classified as auto-repeat.
    #[inline]
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.repeat.repeating
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Config with deliberate, test-friendly timing.
    fn config() -> HopConfig {
        let mut config = HopConfig::default();
        config.default_motion_count = 2;
        config.motion_timeout = Duration::from_millis(1000);
        config.key_repeat_threshold = Duration::from_millis(50);
        config.key_repeat_reset_delay = Duration::from_millis(300);
        config.suppress_on_key_repeat = true;
        config
    }

    fn tracker_with(per_key: &[(&str, u32)]) -> MotionTracker {
        let mut cfg = config();
        cfg.per_key_motion_count = per_key
            .iter()
            .map(|(k, n)| ((*k).to_string(), *n))
            .collect();
        MotionTracker::new(&cfg)
    }

    /// A press timeline starting at an arbitrary epoch.
    fn at(ms: u64) -> Instant {
        // A fixed base keeps arithmetic readable; only differences matter.
        static BASE: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        *BASE.get_or_init(Instant::now) + Duration::from_millis(ms)
    }

    // -- Counting & triggering ----------------------------------------------

    #[test]
    fn default_count_triggers_on_second_press() {
        let mut tracker = tracker_with(&[]);
        assert_eq!(tracker.on_press("w", at(0)), Press::Counted(1));
        assert_eq!(tracker.on_press("w", at(200)), Press::Triggered);
        // Counter reset: the cycle starts over.
        assert_eq!(tracker.on_press("w", at(400)), Press::Counted(1));
    }

    #[test]
    fn per_key_counts_override_default() {
        // Two presses of "h" do not trigger; the third does and resets.
        let mut tracker = tracker_with(&[("v", 1), ("h", 3)]);
        assert_eq!(tracker.on_press("h", at(0)), Press::Counted(1));
        assert_eq!(tracker.on_press("h", at(200)), Press::Counted(2));
        assert_eq!(tracker.on_press("h", at(400)), Press::Triggered);
        assert_eq!(tracker.on_press("h", at(600)), Press::Counted(1));

        // "v" fires on every press.
        assert_eq!(tracker.on_press("v", at(800)), Press::Triggered);
        assert_eq!(tracker.on_press("v", at(1000)), Press::Triggered);
    }

    #[test]
    fn keys_count_independently() {
        let mut tracker = tracker_with(&[]);
        assert_eq!(tracker.on_press("w", at(0)), Press::Counted(1));
        assert_eq!(tracker.on_press("b", at(100)), Press::Counted(1));
        assert_eq!(tracker.on_press("w", at(200)), Press::Triggered);
        assert_eq!(tracker.on_press("b", at(300)), Press::Triggered);
    }

    // -- Timeout reset ------------------------------------------------------

    #[test]
    fn stale_press_restarts_the_count() {
        let mut tracker = tracker_with(&[]);
        assert_eq!(tracker.on_press("w", at(0)), Press::Counted(1));
        // 1500ms > motion_timeout: the deadline fired, count went back to 0.
        assert_eq!(tracker.on_press("w", at(1500)), Press::Counted(1));
        assert_eq!(tracker.on_press("w", at(1700)), Press::Triggered);
    }

    #[test]
    fn each_press_rearms_the_deadline() {
        let mut tracker = tracker_with(&[("w", 3)]);
        // Presses 900ms apart never exceed the 1000ms timeout even though
        // the total span does — each press re-arms the deadline.
        assert_eq!(tracker.on_press("w", at(0)), Press::Counted(1));
        assert_eq!(tracker.on_press("w", at(900)), Press::Counted(2));
        assert_eq!(tracker.on_press("w", at(1800)), Press::Triggered);
    }

    #[test]
    fn reset_clears_one_key_only() {
        let mut tracker = tracker_with(&[("w", 3), ("b", 3)]);
        tracker.on_press("w", at(0));
        tracker.on_press("w", at(100));
        tracker.on_press("b", at(200));
        tracker.on_press("b", at(300));

        tracker.reset("w");
        assert_eq!(tracker.on_press("w", at(400)), Press::Counted(1));
        assert_eq!(tracker.on_press("b", at(500)), Press::Triggered);
    }

    // -- Key repeat ---------------------------------------------------------

    #[test]
    fn rapid_presses_classify_as_repeat_and_suppress() {
        let mut tracker = tracker_with(&[]);
        assert_eq!(tracker.on_press("j", at(0)), Press::Counted(1));
        // 10ms gaps: machine repeat. Nothing accumulates, nothing fires.
        assert_eq!(tracker.on_press("j", at(10)), Press::Suppressed);
        assert_eq!(tracker.on_press("j", at(20)), Press::Suppressed);
        assert_eq!(tracker.on_press("j", at(30)), Press::Suppressed);
        assert!(tracker.is_repeating());
    }

    #[test]
    fn repeat_clears_after_reset_delay() {
        let mut tracker = tracker_with(&[]);
        tracker.on_press("j", at(0));
        tracker.on_press("j", at(10));
        assert!(tracker.is_repeating());

        // 400ms ≥ reset delay: deliberate pressing resumed.
        assert_eq!(tracker.on_press("j", at(410)), Press::Counted(1));
        assert!(!tracker.is_repeating());
        assert_eq!(tracker.on_press("j", at(610)), Press::Triggered);
    }

    #[test]
    fn gap_between_bounds_keeps_classification() {
        let mut tracker = tracker_with(&[]);
        tracker.on_press("j", at(0));
        tracker.on_press("j", at(10)); // repeating
        // 100ms: above the 50ms threshold, below the 300ms reset delay —
        // still classified as repeating.
        assert_eq!(tracker.on_press("j", at(110)), Press::Suppressed);
        assert!(tracker.is_repeating());
    }

    #[test]
    fn suppression_disabled_lets_repeat_trigger() {
        let mut cfg = config();
        cfg.suppress_on_key_repeat = false;
        let mut tracker = MotionTracker::new(&cfg);

        assert_eq!(tracker.on_press("j", at(0)), Press::Counted(1));
        assert_eq!(tracker.on_press("j", at(10)), Press::Triggered);
        assert!(tracker.is_repeating()); // classified, just not suppressed
    }

    #[test]
    fn repeat_classification_spans_keys() {
        let mut tracker = tracker_with(&[]);
        tracker.on_press("j", at(0));
        // A different key arriving within the threshold still marks the
        // stream as repeating — the classification is global.
        assert_eq!(tracker.on_press("k", at(10)), Press::Suppressed);
    }

    #[test]
    fn required_count_lookup() {
        let tracker = tracker_with(&[("h", 3)]);
        assert_eq!(tracker.required_count("h"), 3);
        assert_eq!(tracker.required_count("w"), 2);
    }
}
