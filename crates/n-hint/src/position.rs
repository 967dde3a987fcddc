//! Text position type.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line, column 0 is
//! the first character. Columns count Unicode scalar values (chars), not
//! bytes or grapheme clusters — the same indexing the host's text storage
//! uses, so positions travel across the `WordSource` boundary unchanged.
//!
//! Display layers should convert to 1-indexed for the user — that
//! conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte
/// offset. For the line `"café"`, column 3 is `'é'`.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column. This
/// means `Position { line: 0, col: 5 }` < `Position { line: 1, col: 0 }`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin — line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Jump distance from `self` to `other`: absolute line delta first,
    /// absolute column delta second.
    ///
    /// This is the ranking key hint assignment sorts by — comparing two
    /// distances with the derived tuple ordering ranks "fewer lines away"
    /// above "fewer columns away".
    #[inline]
    #[must_use]
    pub const fn distance_to(self, other: Self) -> (usize, usize) {
        (self.line.abs_diff(other.line), self.col.abs_diff(other.col))
    }
}

// Natural ordering: line first, then column.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display, matching Vim's `line:col` status.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Construction & constants -------------------------------------------

    #[test]
    fn position_zero() {
        let p = Position::ZERO;
        assert_eq!(p.line, 0);
        assert_eq!(p.col, 0);
    }

    #[test]
    fn position_new() {
        let p = Position::new(5, 10);
        assert_eq!(p.line, 5);
        assert_eq!(p.col, 10);
    }

    // -- Ordering -----------------------------------------------------------

    #[test]
    fn ordering_same_line() {
        assert!(Position::new(1, 3) < Position::new(1, 7));
    }

    #[test]
    fn ordering_line_dominates_col() {
        assert!(Position::new(0, 100) < Position::new(1, 0));
    }

    #[test]
    fn ordering_equal() {
        let a = Position::new(3, 3);
        assert!(a <= a && a >= a);
    }

    // -- Distance -----------------------------------------------------------

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(2, 8);
        let b = Position::new(5, 1);
        assert_eq!(a.distance_to(b), (3, 7));
        assert_eq!(b.distance_to(a), (3, 7));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Position::new(4, 4);
        assert_eq!(p.distance_to(p), (0, 0));
    }

    #[test]
    fn distance_ranks_line_before_col() {
        let cursor = Position::new(10, 0);
        let near = Position::new(11, 90); // one line, far column
        let far = Position::new(12, 0); // two lines, same column
        assert!(cursor.distance_to(near) < cursor.distance_to(far));
    }

    // -- Display ------------------------------------------------------------

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Position::new(2, 5)), "Pos(2:5)");
    }

    #[test]
    fn display_is_1_indexed() {
        assert_eq!(format!("{}", Position::new(0, 0)), "1:1");
        assert_eq!(format!("{}", Position::new(9, 14)), "10:15");
    }

    // -- Hashing ------------------------------------------------------------

    #[test]
    fn hash_consistency() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Position::new(1, 2));
        set.insert(Position::new(1, 2));
        set.insert(Position::new(3, 4));
        assert_eq!(set.len(), 2);
    }
}
