//! Hint assignment — pairing detected words with labels by distance.
//!
//! Given the words on screen and an ordered label sequence from the
//! alphabet, assignment ranks words by jump distance from the cursor and
//! hands out labels in rank order, so the nearest words get the shortest,
//! earliest labels. Two optional narrowing passes run before ranking:
//!
//! - a **directional filter** restricts candidates to words strictly
//!   before or after the cursor;
//! - **adjacency suppression** drops words whose span sits within one
//!   column of an already-hinted word on the same line, thinning dense
//!   clusters that would otherwise stack overlays.
//!
//! Results are cached per [`HintMode`]: computing the normal-mode
//! assignment never recomputes or invalidates the visual-mode entry, and
//! vice versa. A cache entry is keyed by a fingerprint of the full input
//! (cursor, words, labels, options), so any context change recomputes.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::position::Position;
use crate::session::HintMapping;
use crate::word::Word;

// ---------------------------------------------------------------------------
// HintMode
// ---------------------------------------------------------------------------

/// The interaction mode an assignment belongs to.
///
/// Modes differ in how the host consumes the jump (plain cursor move vs.
/// selection extension); the assigner only uses the mode as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HintMode {
    /// Plain navigation.
    #[default]
    Normal,
    /// Selection-extending navigation.
    Visual,
}

// ---------------------------------------------------------------------------
// DirectionalFilter
// ---------------------------------------------------------------------------

/// Restrict candidate words relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DirectionalFilter {
    /// Keep every word.
    #[default]
    None,
    /// Keep words before the cursor: `line < cursor.line`, or the same
    /// line with `col <= cursor.col`.
    Up,
    /// Keep words after the cursor: `line > cursor.line`, or the same
    /// line with `col >= cursor.col`.
    Down,
}

impl DirectionalFilter {
    /// Does a word at `pos` survive the filter for this cursor?
    #[must_use]
    pub fn keeps(self, pos: Position, cursor: Position) -> bool {
        match self {
            Self::None => true,
            Self::Down => {
                pos.line > cursor.line || (pos.line == cursor.line && pos.col >= cursor.col)
            }
            Self::Up => {
                pos.line < cursor.line || (pos.line == cursor.line && pos.col <= cursor.col)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AssignOptions
// ---------------------------------------------------------------------------

/// Per-assignment behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AssignOptions {
    /// Candidate narrowing relative to the cursor.
    pub direction: DirectionalFilter,
    /// Drop candidates adjacent to an already-hinted word.
    pub suppress_adjacent: bool,
}

// ---------------------------------------------------------------------------
// Assigner
// ---------------------------------------------------------------------------

/// Distance-ranking label assigner with a per-mode result cache.
#[derive(Debug, Default)]
pub struct Assigner {
    cache: HashMap<HintMode, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: u64,
    mappings: Vec<HintMapping>,
}

impl Assigner {
    /// A fresh assigner with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign labels to words for one interaction mode.
    ///
    /// When labels run short, the farthest-ranked words simply get no
    /// mapping — the caller renders what it receives.
    pub fn assign(
        &mut self,
        words: &[Word],
        labels: &[String],
        cursor: Position,
        mode: HintMode,
        options: AssignOptions,
    ) -> Vec<HintMapping> {
        let fingerprint = fingerprint(words, labels, cursor, options);
        if let Some(entry) = self.cache.get(&mode) {
            if entry.fingerprint == fingerprint {
                log::trace!("assign: cache hit for {mode:?}");
                return entry.mappings.clone();
            }
        }

        let mappings = compute(words, labels, cursor, options);
        log::debug!(
            "assign: {} words -> {} hints ({mode:?})",
            words.len(),
            mappings.len()
        );
        self.cache.insert(
            mode,
            CacheEntry {
                fingerprint,
                mappings: mappings.clone(),
            },
        );
        mappings
    }

    /// Drop one mode's cached assignment, leaving the others intact.
    pub fn invalidate(&mut self, mode: HintMode) {
        self.cache.remove(&mode);
    }

    /// Drop every cached assignment.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Hash the full assignment input into one cache key.
fn fingerprint(
    words: &[Word],
    labels: &[String],
    cursor: Position,
    options: AssignOptions,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    cursor.hash(&mut hasher);
    options.hash(&mut hasher);
    labels.hash(&mut hasher);
    for word in words {
        word.text.hash(&mut hasher);
        word.line.hash(&mut hasher);
        word.col.hash(&mut hasher);
    }
    hasher.finish()
}

/// The ranking core: filter, sort by distance, consume labels in order.
fn compute(
    words: &[Word],
    labels: &[String],
    cursor: Position,
    options: AssignOptions,
) -> Vec<HintMapping> {
    let mut candidates: Vec<&Word> = words
        .iter()
        .filter(|w| options.direction.keeps(w.position(), cursor))
        .collect();

    // Stable sort: equidistant words keep their detection (position) order.
    candidates.sort_by_key(|w| cursor.distance_to(w.position()));

    let mut accepted: Vec<&Word> = Vec::new();
    let mut mappings = Vec::new();
    let mut labels = labels.iter();

    for word in candidates {
        if options.suppress_adjacent && accepted.iter().any(|a| adjacent(a, word)) {
            continue;
        }
        let Some(label) = labels.next() else {
            break; // label space exhausted — remaining words get no hint
        };
        accepted.push(word);
        mappings.push(HintMapping::new(word.clone(), label.clone()));
    }

    mappings
}

/// Same line with character spans within one column of touching.
fn adjacent(a: &Word, b: &Word) -> bool {
    a.line == b.line && b.col <= a.end_col() + 1 && a.col <= b.end_col() + 1
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
