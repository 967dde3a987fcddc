//! Hint sessions — the live mapping set behind visible hints.
//!
//! A [`Session`] owns every [`HintMapping`] created when hints are shown.
//! Mappings are created on show and destroyed on hide/jump/cancel — they
//! never outlive the session that produced them, and at most one session
//! is ever active (the controller hides the previous one before showing a
//! new one).
//!
//! Visibility is not stored as a separate flag: a session is visible
//! exactly when its mapping set is non-empty, so the "visible iff
//! non-empty" invariant holds by construction and [`Session::hide`] is
//! idempotent for free.

use crate::position::Position;
use crate::word::Word;

// ---------------------------------------------------------------------------
// HintMapping
// ---------------------------------------------------------------------------

/// One word ↔ label pairing in the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintMapping {
    /// The word this hint jumps to.
    pub word: Word,
    /// The label typed to select this hint. Unique within the session.
    pub label: String,
    /// Where the label overlay is drawn. Defaults to the word's first
    /// character; hosts may nudge it (e.g. off the edge of the screen).
    pub render_pos: Position,
}

impl HintMapping {
    /// Pair a word with its label; the overlay lands on the word.
    #[must_use]
    pub fn new(word: Word, label: impl Into<String>) -> Self {
        let render_pos = word.position();
        Self {
            word,
            label: label.into(),
            render_pos,
        }
    }

    /// True when this hint's label starts with the typed prefix.
    #[inline]
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.label.starts_with(prefix)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The set of hints currently on screen.
#[derive(Debug, Default)]
pub struct Session {
    mappings: Vec<HintMapping>,
}

impl Session {
    /// An empty (hidden) session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Replace the mapping set. An empty set leaves the session hidden.
    pub fn show(&mut self, mappings: Vec<HintMapping>) {
        self.mappings = mappings;
    }

    /// Drop all mappings. Returns `true` if the session was visible.
    ///
    /// Idempotent: a second call finds nothing to drop and returns `false`.
    pub fn hide(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.mappings.clear();
        was_visible
    }

    /// Visible iff the mapping set is non-empty.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.mappings.is_empty()
    }

    /// The active mappings.
    #[inline]
    #[must_use]
    pub fn mappings(&self) -> &[HintMapping] {
        &self.mappings
    }

    /// Mappings whose label starts with the typed prefix.
    #[must_use]
    pub fn candidates(&self, prefix: &str) -> Vec<HintMapping> {
        self.mappings
            .iter()
            .filter(|m| m.matches_prefix(prefix))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping(label: &str, line: usize, col: usize) -> HintMapping {
        HintMapping::new(Word::new(label.to_lowercase(), line, col), label)
    }

    // -- HintMapping --------------------------------------------------------

    #[test]
    fn render_pos_defaults_to_word_position() {
        let m = mapping("A", 3, 9);
        assert_eq!(m.render_pos, Position::new(3, 9));
    }

    #[test]
    fn prefix_matching() {
        let m = mapping("BC", 0, 0);
        assert!(m.matches_prefix(""));
        assert!(m.matches_prefix("B"));
        assert!(m.matches_prefix("BC"));
        assert!(!m.matches_prefix("C"));
        assert!(!m.matches_prefix("BCD"));
    }

    // -- Session visibility invariant ---------------------------------------

    #[test]
    fn new_session_is_hidden() {
        assert!(!Session::new().is_visible());
    }

    #[test]
    fn visible_iff_nonempty() {
        let mut session = Session::new();
        session.show(vec![mapping("A", 0, 0)]);
        assert!(session.is_visible());

        session.show(Vec::new());
        assert!(!session.is_visible());
    }

    #[test]
    fn hide_is_idempotent() {
        let mut session = Session::new();
        session.show(vec![mapping("A", 0, 0), mapping("S", 1, 0)]);

        assert!(session.hide());
        assert!(!session.is_visible());
        assert_eq!(session.mappings().len(), 0);

        // Second hide: nothing left to do.
        assert!(!session.hide());
        assert!(!session.is_visible());
    }

    #[test]
    fn show_replaces_previous_mappings() {
        let mut session = Session::new();
        session.show(vec![mapping("A", 0, 0)]);
        session.show(vec![mapping("S", 1, 1), mapping("D", 2, 2)]);
        assert_eq!(session.mappings().len(), 2);
        assert_eq!(session.mappings()[0].label, "S");
    }

    // -- Candidates ---------------------------------------------------------

    #[test]
    fn candidates_filter_by_prefix() {
        let mut session = Session::new();
        session.show(vec![mapping("A", 0, 0), mapping("BB", 1, 0), mapping("BC", 2, 0)]);

        let b = session.candidates("B");
        assert_eq!(b.len(), 2);
        assert!(b.iter().all(|m| m.label.starts_with('B')));

        assert_eq!(session.candidates("A").len(), 1);
        assert_eq!(session.candidates("Z").len(), 0);
        assert_eq!(session.candidates("").len(), 3);
    }
}
