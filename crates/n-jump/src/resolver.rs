//! Keystroke resolution — from visible hints to a single jump target.
//!
//! Once hints are on screen the resolver owns the keyboard. It reads one
//! key at a time and narrows the candidate set by label prefix until
//! exactly one hint is chosen or the interaction dies:
//!
//! | On                        | While awaiting first char                |
//! |---------------------------|------------------------------------------|
//! | escape                    | cancel                                   |
//! | lowercase letter          | cancel, hand the char back to the host   |
//! | char matching no label    | cancel                                   |
//! | char == one 1-char label  | resolve immediately                      |
//! | char prefixing several    | highlight candidates, await next char    |
//!
//! With two or more chars typed, a unique exact label match resolves; no
//! remaining prefix match cancels; prefix matches on longer labels keep
//! the narrowing going (3-char label spaces).
//!
//! # Input is never blocked on rendering
//!
//! Entering the narrowing state *schedules* a candidate highlight and
//! immediately returns to the keystroke read — it never waits for the
//! highlight to land. Render batches drain only inside read timeouts
//! ([`READ_TICK`] ticks), so a slow backend adds zero latency between two
//! keystrokes that are already queued up. Highlight failures are logged
//! by the scheduler and never reach this loop.

use std::time::Duration;

use n_hint::session::{HintMapping, Session};

use crate::backend::RenderBackend;
use crate::keys::{Key, KeyRead, KeyReader};
use crate::sched::RenderScheduler;

/// Tick granularity for the logically-blocking key read.
///
/// Between ticks the resolver pumps the render scheduler, so background
/// batches progress while the user thinks.
pub const READ_TICK: Duration = Duration::from_millis(8);

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a resolution interaction ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user picked this hint — jump to its word.
    Jump(HintMapping),
    /// Cancelled: escape, a non-matching key, or the key source closing.
    Cancelled,
    /// A lowercase character that is not hint input; the host must
    /// re-inject it into ordinary navigation handling so it is not lost.
    PassThrough(char),
}

/// Typed-so-far state of the narrowing loop.
#[derive(Debug)]
enum State {
    AwaitingFirst,
    AwaitingMore(String),
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Run the disambiguation loop against the active session.
///
/// Blocks logically until the interaction ends, but keeps the scheduler's
/// cooperative work moving during read timeouts. An empty session cancels
/// immediately — there is nothing to disambiguate.
pub fn resolve<B: RenderBackend, K: KeyReader>(
    session: &Session,
    scheduler: &mut RenderScheduler<B>,
    reader: &mut K,
    highlight_selected: bool,
) -> Outcome {
    if !session.is_visible() {
        return Outcome::Cancelled;
    }

    let mut state = State::AwaitingFirst;
    loop {
        let key = loop {
            match reader.read_key(READ_TICK) {
                KeyRead::Key(key) => break key,
                KeyRead::TimedOut => {
                    scheduler.pump();
                }
                KeyRead::Closed => return Outcome::Cancelled,
            }
        };

        let c = match key {
            Key::Escape | Key::Other => return Outcome::Cancelled,
            Key::Char(c) => c,
        };

        match state {
            State::AwaitingFirst => {
                if c.is_lowercase() {
                    return Outcome::PassThrough(c);
                }
                let typed = c.to_ascii_uppercase().to_string();
                let candidates = session.candidates(&typed);
                match candidates.as_slice() {
                    [] => return Outcome::Cancelled,
                    [only] if only.label.chars().count() == 1 => {
                        return Outcome::Jump(only.clone());
                    }
                    _ => {
                        schedule_highlight(scheduler, session, &typed, highlight_selected);
                        state = State::AwaitingMore(typed);
                    }
                }
            }
            State::AwaitingMore(mut typed) => {
                typed.push(c.to_ascii_uppercase());
                let candidates = session.candidates(&typed);
                if candidates.is_empty() {
                    return Outcome::Cancelled;
                }
                let mut exact = candidates.iter().filter(|m| m.label == typed);
                if let (Some(only), None) = (exact.next(), exact.next()) {
                    return Outcome::Jump(only.clone());
                }
                // No exact hit; narrowing continues only while longer
                // labels can still complete.
                let typed_len = typed.chars().count();
                if candidates.iter().all(|m| m.label.chars().count() <= typed_len) {
                    return Outcome::Cancelled;
                }
                schedule_highlight(scheduler, session, &typed, highlight_selected);
                state = State::AwaitingMore(typed);
            }
        }
    }
}

/// Fire-and-forget candidate highlight.
///
/// Issues a fresh ticket (abandoning any earlier cycle's pending batches)
/// and schedules the re-render. Returns as soon as the work is queued.
fn schedule_highlight<B: RenderBackend>(
    scheduler: &mut RenderScheduler<B>,
    session: &Session,
    partial: &str,
    enabled: bool,
) {
    if !enabled {
        return;
    }
    let ticket = scheduler.issue_ticket();
    scheduler.highlight_candidates(partial, session.mappings(), &ticket);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
