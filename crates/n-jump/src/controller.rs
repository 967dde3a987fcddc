//! The jump controller — motion presses in, cursor jumps out.
//!
//! [`JumpController`] wires the whole engine together: motion tracking
//! decides *when* hints appear, the hint core decides *what* they look
//! like, the scheduler puts them on screen, and the resolver turns typed
//! labels into a jump. Collaborators are injected at construction — word
//! source, render backend, key reader — and the per-interaction [`Host`]
//! carries the cursor, the viewport, and ordinary-input re-injection.
//! There is no process-wide instance; embedders own as many controllers
//! as they have windows.
//!
//! # One session at a time
//!
//! The session and the marker namespace belong to exactly one display
//! cycle. Every pipeline run starts by hiding whatever the previous run
//! left behind, so two visible hint sets can never coexist, and
//! [`hide`](JumpController::hide) is safe to call at any moment, any
//! number of times.

use std::time::Instant;

use n_hint::alphabet::HintKeys;
use n_hint::assign::{AssignOptions, Assigner, HintMode};
use n_hint::config::{ConfigError, HopConfig};
use n_hint::position::Position;
use n_hint::session::Session;
use n_hint::word::{Viewport, WordSource};

use crate::backend::RenderBackend;
use crate::debounce::{Debouncer, Decision};
use crate::keys::KeyReader;
use crate::motion::{MotionTracker, Press};
use crate::resolver::{self, Outcome};
use crate::sched::RenderScheduler;

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// What the engine needs from its embedder during one interaction.
pub trait Host {
    /// The currently visible text.
    fn viewport(&self) -> Viewport;

    /// The current cursor position.
    fn cursor(&self) -> Position;

    /// The interaction mode, used to key the assignment cache.
    fn mode(&self) -> HintMode {
        HintMode::Normal
    }

    /// Move the cursor to a jump target.
    fn move_cursor(&mut self, pos: Position);

    /// Re-inject a character into ordinary input handling.
    ///
    /// Called for the lowercase pass-through path, *before* the session
    /// is cleared, so the keystroke that cancelled hint mode still does
    /// its normal job.
    fn forward_char(&mut self, c: char);
}

// ---------------------------------------------------------------------------
// JumpOutcome
// ---------------------------------------------------------------------------

/// How one triggered pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The user picked a hint; the cursor moved here.
    Jumped(Position),
    /// A lowercase key cancelled hint mode and was handed to the host.
    PassedThrough(char),
    /// Escape, a dead-end key, or a closed key source.
    Cancelled,
    /// The viewport produced nothing to hint. A no-op, not an error.
    NoWords,
    /// A run was already in progress; this request was folded into it.
    Coalesced,
}

// ---------------------------------------------------------------------------
// JumpController
// ---------------------------------------------------------------------------

/// The motion-triggered hint pipeline.
pub struct JumpController<W, B, K> {
    config: HopConfig,
    keys: HintKeys,
    words: W,
    scheduler: RenderScheduler<B>,
    reader: K,
    tracker: MotionTracker,
    debouncer: Debouncer,
    assigner: Assigner,
    session: Session,
}

impl<W: WordSource, B: RenderBackend, K: KeyReader> JumpController<W, B, K> {
    /// Build a controller, validating the hint-space configuration.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] — an invalid configuration never gets as far
    /// as a session.
    pub fn new(config: HopConfig, words: W, backend: B, reader: K) -> Result<Self, ConfigError> {
        let keys = config.validate()?;
        let tracker = MotionTracker::new(&config);
        let debouncer = Debouncer::new(config.debounce_delay);
        Ok(Self {
            config,
            keys,
            words,
            scheduler: RenderScheduler::new(backend),
            reader,
            tracker,
            debouncer,
            assigner: Assigner::new(),
            session: Session::new(),
        })
    }

    /// Feed one navigation key press. Runs the pipeline when the press
    /// completes the key's motion count; returns what the run decided.
    pub fn on_key<H: Host>(&mut self, key_name: &str, host: &mut H, now: Instant) -> Option<JumpOutcome> {
        match self.tracker.on_press(key_name, now) {
            Press::Triggered => Some(self.trigger(host, now)),
            Press::Counted(_) | Press::Suppressed => None,
        }
    }

    /// Run the hint pipeline now, subject to debouncing.
    pub fn trigger<H: Host>(&mut self, host: &mut H, now: Instant) -> JumpOutcome {
        if self.debouncer.request(now) == Decision::Coalesced {
            return JumpOutcome::Coalesced;
        }
        let mut outcome = self.run_pipeline(host);
        // A warm coalesced request earns one trailing run against the
        // context the host reports *now* — not the one it had earlier.
        while self.debouncer.finish(now) {
            outcome = self.run_pipeline(host);
        }
        outcome
    }

    /// Tear down the visible session, if any. Idempotent.
    pub fn hide(&mut self) {
        if self.session.hide() {
            self.scheduler.clear_all();
        }
    }

    /// Whether a hint session is currently visible.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_visible()
    }

    /// Drain one pending render batch (for host idle ticks).
    pub fn pump(&mut self) -> bool {
        self.scheduler.pump()
    }

    /// The render backend, for hosts that paint from it.
    pub const fn backend(&self) -> &B {
        self.scheduler.backend()
    }

    /// The active configuration.
    pub const fn config(&self) -> &HopConfig {
        &self.config
    }

    /// The live session (what is currently hinted).
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// One full pipeline run: detect → assign → display → resolve.
    fn run_pipeline<H: Host>(&mut self, host: &mut H) -> JumpOutcome {
        // Exclusive ownership of the render namespace: the previous
        // session goes away before the new one appears.
        self.hide();

        let viewport = host.viewport();
        let words = self.words.words(&viewport);
        if words.is_empty() {
            log::debug!("no words in viewport, skipping hint display");
            return JumpOutcome::NoWords;
        }

        let cursor = host.cursor();
        let labels = self.keys.generate(words.len());
        let options = AssignOptions {
            direction: self.config.directional_filter,
            suppress_adjacent: self.config.suppress_adjacent,
        };
        let mappings = self.assigner.assign(&words, &labels, cursor, host.mode(), options);
        if mappings.is_empty() {
            return JumpOutcome::NoWords;
        }

        self.session.show(mappings);
        let ticket = self.scheduler.issue_ticket();
        self.scheduler.display_all(self.session.mappings(), &ticket);

        let outcome = resolver::resolve(
            &self.session,
            &mut self.scheduler,
            &mut self.reader,
            self.config.highlight_selected,
        );
        match outcome {
            Outcome::Jump(mapping) => {
                let target = mapping.word.position();
                host.move_cursor(target);
                self.hide();
                JumpOutcome::Jumped(target)
            }
            Outcome::PassThrough(c) => {
                // Forward first, then clear — the host sees the keystroke
                // while its own state still predates the cancel.
                host.forward_char(c);
                self.hide();
                JumpOutcome::PassedThrough(c)
            }
            Outcome::Cancelled => {
                self.hide();
                JumpOutcome::Cancelled
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
