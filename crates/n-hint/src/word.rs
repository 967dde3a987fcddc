//! Navigable words and word detection.
//!
//! A [`Word`] is a token somewhere in the host's text that a hint label can
//! be attached to. The engine never tokenizes the host's buffer itself —
//! it consumes a [`WordSource`], which turns the visible [`Viewport`] into
//! candidate words. Hosts with their own segmentation (morphological
//! analyzers, language-specific tokenizers) implement the trait; everyone
//! else uses [`RegexWordSource`], which finds word-character runs per line.
//!
//! # Coordinates
//!
//! Word columns are char offsets within the line (see
//! [`Position`](crate::position::Position)). `RegexWordSource` converts the
//! regex crate's byte offsets to char offsets, so multi-byte text yields
//! the same columns the host's rope indexing produces.

use regex::Regex;

use crate::position::Position;

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// A navigable token: its text and the position of its first character.
///
/// Words are externally supplied and immutable — the engine only reads
/// them, ranks them, and jumps to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The token text.
    pub text: String,
    /// 0-indexed line of the first character.
    pub line: usize,
    /// 0-indexed char column of the first character.
    pub col: usize,
}

impl Word {
    /// Create a word at the given position.
    #[must_use]
    pub fn new(text: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            text: text.into(),
            line,
            col,
        }
    }

    /// The position of the word's first character.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// The column one past the word's last character.
    #[inline]
    #[must_use]
    pub fn end_col(&self) -> usize {
        self.col + self.text.chars().count()
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The visible slice of the host's buffer, handed to a [`WordSource`].
///
/// `top_line` is the absolute line number of `lines[0]`, so detected words
/// carry buffer coordinates, not screen coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Absolute line number of the first visible line.
    pub top_line: usize,
    /// The visible lines, in order, without trailing newlines.
    pub lines: Vec<String>,
}

impl Viewport {
    /// Create a viewport from any iterable of lines.
    #[must_use]
    pub fn new(top_line: usize, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            top_line,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate `(absolute_line_number, line_text)` pairs.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, l)| (self.top_line + i, l.as_str()))
    }

    /// True when the viewport holds no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WordSource
// ---------------------------------------------------------------------------

/// Produces the candidate words for one viewport.
///
/// Implementations must return words in (line, col) order; the assigner
/// relies on that order as the stable tiebreak for equidistant words.
pub trait WordSource {
    /// Detect navigable words in the viewport.
    ///
    /// An empty result is normal (blank screen) — never an error.
    fn words(&self, viewport: &Viewport) -> Vec<Word>;
}

// ---------------------------------------------------------------------------
// RegexWordSource
// ---------------------------------------------------------------------------

/// Default word detector: one [`Word`] per regex match per line.
///
/// The default pattern matches runs of word characters (letters, digits,
/// underscore — Unicode-aware), the same class the host's word motions
/// step over.
pub struct RegexWordSource {
    pattern: Regex,
}

impl RegexWordSource {
    /// Default word pattern: runs of word characters.
    pub const DEFAULT_PATTERN: &'static str = r"\w+";

    /// Create a detector with the default pattern.
    ///
    /// # Panics
    ///
    /// Never — the default pattern is known-valid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Compiling a literal constant pattern cannot fail.
            pattern: Regex::new(Self::DEFAULT_PATTERN).unwrap(),
        }
    }

    /// Create a detector with a custom pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Default for RegexWordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSource for RegexWordSource {
    fn words(&self, viewport: &Viewport) -> Vec<Word> {
        let mut words = Vec::new();
        for (line_no, line) in viewport.numbered_lines() {
            // Track the char offset alongside the byte offset so columns
            // stay correct in multi-byte text without rescanning the line
            // prefix for every match.
            let mut chars_before = 0;
            let mut scanned_bytes = 0;
            for m in self.pattern.find_iter(line) {
                chars_before += line[scanned_bytes..m.start()].chars().count();
                let col = chars_before;
                chars_before += m.as_str().chars().count();
                scanned_bytes = m.end();
                words.push(Word::new(m.as_str(), line_no, col));
            }
        }
        words
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
