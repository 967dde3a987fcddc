//! Hint label alphabets — deterministic label-space generation.
//!
//! [`HintKeys`] holds a validated label alphabet and generates an ordered
//! label sequence for N targets. Generation is pure and deterministic:
//! the same configuration and count always produce the same labels.
//!
//! # Label ladder
//!
//! Demand is filled in four rungs, each engaged only when the previous is
//! exhausted:
//!
//! | Rung | Labels                                   | Cap                  |
//! |------|------------------------------------------|----------------------|
//! | 1    | single keys, in configured order         | `max_single_hints`   |
//! | 2    | 2-char combos over multi keys, row-major | `|multi|²`           |
//! | 3    | `"01".."09"`, `"10".."99"`, `"00"`       | 100, optional        |
//! | 4    | 3-char combos over multi keys            | `|multi|³`, optional |
//!
//! `"00"` sorts last within the numeric rung: it is visually the least
//! distinctive two-digit label, so every other pair is spent first.
//!
//! # Invariants
//!
//! Returned labels are pairwise distinct, and no multi-character label
//! begins with a character reserved for single-character hints — the first
//! keystroke alone always distinguishes "a whole hint" from "the start of
//! a longer one". Both hold by construction for the letter rungs (the key
//! sets are disjoint) and are enforced by skipping for the numeric rung,
//! where digit keys can otherwise collide.

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// HintKeys
// ---------------------------------------------------------------------------

/// A validated hint-label alphabet.
///
/// Construct with [`HintKeys::new`], which fails fast on invalid key sets
/// (see [`ConfigError`]); an invalid alphabet never reaches generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintKeys {
    single: Vec<char>,
    multi: Vec<char>,
    max_single_hints: usize,
    numeric_fallback: bool,
    triple_fallback: bool,
}

impl HintKeys {
    /// Validate raw key configuration into an alphabet.
    ///
    /// `single` and `multi` are the host-supplied key lists; each entry
    /// must be exactly one character, the lists must be duplicate-free and
    /// disjoint, and under `numeric_only` every multi key must be an ASCII
    /// digit.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ConfigError`].
    pub fn new(
        single: &[String],
        multi: &[String],
        max_single_hints: usize,
        numeric_fallback: bool,
        numeric_only: bool,
        triple_fallback: bool,
    ) -> Result<Self, ConfigError> {
        let single = Self::validate_keys(single)?;
        let multi = Self::validate_keys(multi)?;

        if let Some(&shared) = single.iter().find(|c| multi.contains(c)) {
            return Err(ConfigError::OverlappingKeys(shared));
        }
        if numeric_only {
            if let Some(&bad) = multi.iter().find(|c| !c.is_ascii_digit()) {
                return Err(ConfigError::NonDigitKey(bad));
            }
        }

        Ok(Self {
            single,
            multi,
            max_single_hints,
            numeric_fallback,
            triple_fallback,
        })
    }

    /// Check one key list: every entry one char, no duplicates.
    fn validate_keys(keys: &[String]) -> Result<Vec<char>, ConfigError> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(ConfigError::NotSingleChar(key.clone()));
            };
            if out.contains(&c) {
                return Err(ConfigError::DuplicateKey(c));
            }
            out.push(c);
        }
        Ok(out)
    }

    /// Generate an ordered label sequence for `count` targets.
    ///
    /// Returns exactly `count` labels, or the alphabet's full capacity when
    /// that is smaller — callers treat words beyond the returned labels as
    /// "no hint", never as an error.
    #[must_use]
    pub fn generate(&self, count: usize) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();

        // Rung 1: single-character hints.
        let singles = count.min(self.max_single_hints).min(self.single.len());
        labels.extend(self.single[..singles].iter().map(char::to_string));

        // Rung 2: two-character combinations, row-major.
        'pairs: for &a in &self.multi {
            for &b in &self.multi {
                if labels.len() >= count {
                    break 'pairs;
                }
                labels.push([a, b].iter().collect());
            }
        }

        // Rung 3: two-digit numeric fallback, "00" last.
        if self.numeric_fallback && labels.len() < count {
            for n in (1..=99).chain(std::iter::once(0)) {
                if labels.len() >= count {
                    break;
                }
                let label = format!("{n:02}");
                // A digit reserved for single-char hints would make the
                // first keystroke ambiguous; a label already emitted by the
                // pair rung (digit multi keys) would break distinctness.
                let first = label.as_bytes()[0] as char;
                if self.single.contains(&first) || labels.contains(&label) {
                    continue;
                }
                labels.push(label);
            }
        }

        // Rung 4: three-character combinations.
        if self.triple_fallback && labels.len() < count {
            'triples: for &a in &self.multi {
                for &b in &self.multi {
                    for &c in &self.multi {
                        if labels.len() >= count {
                            break 'triples;
                        }
                        labels.push([a, b, c].iter().collect());
                    }
                }
            }
        }

        labels
    }

    /// Total number of labels this alphabet can produce.
    #[must_use]
    pub fn capacity(&self) -> usize {
        // The numeric rung's yield depends on skip rules, so capacity is
        // measured by running generation unbounded (all rungs are finite).
        self.generate(usize::MAX).len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(keys: &[&str]) -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    }

    fn keys(single: &[&str], multi: &[&str]) -> HintKeys {
        HintKeys::new(&strings(single), &strings(multi), usize::MAX, false, false, false)
            .unwrap()
    }

    // -- Validation ---------------------------------------------------------

    #[test]
    fn rejects_overlapping_key_sets() {
        let err =
            HintKeys::new(&strings(&["a", "b"]), &strings(&["b", "c"]), 5, false, false, false)
                .unwrap_err();
        assert_eq!(err, ConfigError::OverlappingKeys('b'));
    }

    #[test]
    fn rejects_multi_char_key_entry() {
        let err = HintKeys::new(&strings(&["ab"]), &[], 5, false, false, false).unwrap_err();
        assert_eq!(err, ConfigError::NotSingleChar("ab".into()));
    }

    #[test]
    fn rejects_empty_key_entry() {
        let err = HintKeys::new(&strings(&[""]), &[], 5, false, false, false).unwrap_err();
        assert_eq!(err, ConfigError::NotSingleChar(String::new()));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err =
            HintKeys::new(&strings(&["a", "a"]), &[], 5, false, false, false).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateKey('a'));
    }

    #[test]
    fn numeric_only_requires_digit_multi_keys() {
        let err = HintKeys::new(&[], &strings(&["1", "x"]), 5, true, true, false).unwrap_err();
        assert_eq!(err, ConfigError::NonDigitKey('x'));

        assert!(HintKeys::new(&[], &strings(&["1", "2"]), 5, true, true, false).is_ok());
    }

    // -- Scenario A: no fallback, capacity-limited --------------------------

    #[test]
    fn single_then_pairs_stops_at_capacity() {
        let keys = HintKeys::new(
            &strings(&["A", "S", "D"]),
            &strings(&["B", "C"]),
            3,
            false,
            false,
            false,
        )
        .unwrap();
        assert_eq!(
            keys.generate(20),
            vec!["A", "S", "D", "BB", "BC", "CB", "CC"]
        );
    }

    // -- Scenario B: numeric fallback ---------------------------------------

    #[test]
    fn numeric_fallback_fills_remaining_demand() {
        let keys = HintKeys::new(
            &strings(&["a", "b"]),
            &strings(&["x", "y"]),
            usize::MAX,
            true,
            false,
            false,
        )
        .unwrap();
        assert_eq!(
            keys.generate(10),
            vec!["a", "b", "xx", "xy", "yx", "yy", "01", "02", "03", "04"]
        );
    }

    #[test]
    fn numeric_rung_emits_double_zero_last() {
        let keys = HintKeys::new(&[], &[], 0, true, false, false).unwrap();
        let labels = keys.generate(100);
        assert_eq!(labels.len(), 100);
        assert_eq!(labels[0], "01");
        assert_eq!(labels[8], "09");
        assert_eq!(labels[9], "10");
        assert_eq!(labels[98], "99");
        assert_eq!(labels[99], "00");
    }

    // -- Digit-key collisions -----------------------------------------------

    #[test]
    fn numeric_labels_skip_reserved_and_duplicate_digits() {
        let keys = HintKeys::new(
            &strings(&["0"]),
            &strings(&["1", "2"]),
            usize::MAX,
            true,
            true,
            false,
        )
        .unwrap();
        // "01".."09" start with the reserved single key '0'; "11" and "12"
        // were already emitted by the pair rung.
        assert_eq!(
            keys.generate(8),
            vec!["0", "11", "12", "21", "22", "10", "13", "14"]
        );
    }

    // -- Triple fallback ----------------------------------------------------

    #[test]
    fn triple_fallback_extends_past_pairs() {
        let keys =
            HintKeys::new(&[], &strings(&["x", "y"]), 0, false, false, true).unwrap();
        assert_eq!(
            keys.generate(7),
            vec!["xx", "xy", "yx", "yy", "xxx", "xxy", "xyx"]
        );
    }

    #[test]
    fn triple_fallback_off_stops_at_pairs() {
        let keys = HintKeys::new(&[], &strings(&["x", "y"]), 0, false, false, false).unwrap();
        assert_eq!(keys.generate(7).len(), 4);
    }

    // -- Size & distinctness properties -------------------------------------

    #[test]
    fn length_is_min_of_count_and_capacity() {
        let keys = keys(&["a", "b", "c"], &["x", "y"]);
        let capacity = keys.capacity();
        assert_eq!(capacity, 3 + 4);
        for n in [0, 1, 3, 5, capacity, capacity + 10] {
            assert_eq!(keys.generate(n).len(), n.min(capacity));
        }
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(keys(&["a"], &["x", "y"]).generate(0).is_empty());
    }

    #[test]
    fn labels_are_pairwise_distinct() {
        let keys = HintKeys::new(
            &strings(&["a", "b"]),
            &strings(&["x", "y", "z"]),
            usize::MAX,
            true,
            false,
            true,
        )
        .unwrap();
        let labels = keys.generate(usize::MAX);
        let mut dedup = labels.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), labels.len());
    }

    #[test]
    fn no_multi_label_starts_with_a_single_key() {
        let keys = HintKeys::new(
            &strings(&["a", "b", "1"]),
            &strings(&["x", "y"]),
            usize::MAX,
            true,
            false,
            true,
        )
        .unwrap();
        for label in keys.generate(usize::MAX) {
            if label.chars().count() > 1 {
                let first = label.chars().next().unwrap();
                assert!(
                    !['a', 'b', '1'].contains(&first),
                    "label {label:?} shadows a single-char hint"
                );
            }
        }
    }

    #[test]
    fn max_single_hints_caps_rung_one() {
        let keys = HintKeys::new(
            &strings(&["a", "b", "c", "d"]),
            &strings(&["x", "y"]),
            2,
            false,
            false,
            false,
        )
        .unwrap();
        assert_eq!(keys.generate(4), vec!["a", "b", "xx", "xy"]);
    }

    #[test]
    fn generation_is_deterministic() {
        let keys = keys(&["a", "b"], &["x", "y", "z"]);
        assert_eq!(keys.generate(9), keys.generate(9));
    }

    #[test]
    fn small_count_truncates_single_rung() {
        let keys = keys(&["a", "b", "c"], &[]);
        assert_eq!(keys.generate(2), vec!["a", "b"]);
    }
}
