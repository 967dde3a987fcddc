//! Engine configuration — canonical options and alias normalization.
//!
//! [`HopConfig`] is the single canonical options struct the engine reads.
//! Hosts feed settings through [`HopConfig::apply`], which accepts both the
//! canonical snake_case names and the legacy spellings that accumulated in
//! earlier releases. Aliases are normalized **here, once** — no algorithm
//! downstream ever branches on an alias spelling.
//!
//! # Recognized options
//!
//! | Canonical name           | Legacy aliases                        | Type      |
//! |--------------------------|---------------------------------------|-----------|
//! | `per_key_motion_count`   | `perKeyMotionCount`                   | key:count |
//! | `default_motion_count`   | `defaultMotionCount`, `motion_count`  | integer   |
//! | `motion_timeout`         | `motionTimeout`, `timeout`            | millis    |
//! | `debounce_delay`         | `debounceDelay`                       | millis    |
//! | `key_repeat_threshold`   | `keyRepeatThreshold`                  | millis    |
//! | `key_repeat_reset_delay` | `keyRepeatResetDelay`                 | millis    |
//! | `suppress_on_key_repeat` | `suppressOnKeyRepeat`                 | bool      |
//! | `single_char_keys`       | `singleCharKeys`, `keys1`             | key list  |
//! | `multi_char_keys`        | `multiCharKeys`, `keys2`              | key list  |
//! | `max_single_char_hints`  | `maxSingleCharHints`                  | integer   |
//! | `use_numeric_fallback`   | `useNumericFallback`, `numeric_hints` | bool      |
//! | `numeric_only`           | `numericOnly`                         | bool      |
//! | `triple_hint_fallback`   | `tripleHintFallback`                  | bool      |
//! | `directional_filter`     | `directionalFilter`, `direction`      | none/up/down |
//! | `suppress_adjacent`      | `suppressAdjacent`, `overlap_filter`  | bool      |
//! | `highlight_selected`     | `highlightSelected`                   | bool      |
//!
//! A key list value is either one character per key (`"ASDF"`) or a
//! comma-separated list (`"A,S,D,F"`). A `per_key_motion_count` value is
//! comma-separated `key:count` pairs (`"v:1,h:3"`).
//!
//! Validation is fail-fast: [`HopConfig::validate`] builds the
//! [`HintKeys`] alphabet and rejects invalid hint-space configuration
//! before any session can start.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::alphabet::HintKeys;
use crate::assign::DirectionalFilter;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A key appears in both `single_char_keys` and `multi_char_keys`.
    #[error("key {0:?} is in both single_char_keys and multi_char_keys")]
    OverlappingKeys(char),

    /// A key entry is not exactly one character.
    #[error("hint key {0:?} must be exactly one character")]
    NotSingleChar(String),

    /// A key appears twice in the same list.
    #[error("duplicate hint key {0:?}")]
    DuplicateKey(char),

    /// `numeric_only` is set but a multi-char key is not a digit.
    #[error("key {0:?} is not a digit but numeric_only is set")]
    NonDigitKey(char),

    /// The option name is not recognized under any spelling.
    #[error("unknown option {0:?}")]
    UnknownOption(String),

    /// The option value failed to parse.
    #[error("invalid value {value:?} for option {name:?}")]
    InvalidValue { name: String, value: String },
}

// ---------------------------------------------------------------------------
// HopConfig
// ---------------------------------------------------------------------------

/// Canonical engine configuration.
///
/// Every field has a working default; hosts override through
/// [`apply`](Self::apply) or by mutating fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopConfig {
    /// Trigger threshold per key name; keys absent here use
    /// `default_motion_count`.
    pub per_key_motion_count: HashMap<String, u32>,
    /// Presses of a key required before hints trigger for it.
    pub default_motion_count: u32,
    /// Idle gap after which a key's press count resets.
    pub motion_timeout: Duration,
    /// Coalescing window for trigger requests around a pipeline run.
    pub debounce_delay: Duration,
    /// Inter-press gap below which presses count as auto-repeat.
    pub key_repeat_threshold: Duration,
    /// Inter-press gap above which the repeating classification clears.
    pub key_repeat_reset_delay: Duration,
    /// Suppress triggers while key repeat is active.
    pub suppress_on_key_repeat: bool,
    /// Keys spent on single-character hints, nearest words first.
    pub single_char_keys: Vec<String>,
    /// Keys combined into 2- and 3-character hints.
    pub multi_char_keys: Vec<String>,
    /// Cap on rung-one single-character hints.
    pub max_single_char_hints: usize,
    /// Extend the label space with two-digit hints when letters run out.
    pub use_numeric_fallback: bool,
    /// Require every multi-char key to be a digit.
    pub numeric_only: bool,
    /// Extend the label space with 3-character hints as a last resort.
    pub triple_hint_fallback: bool,
    /// Restrict candidate words relative to the cursor.
    pub directional_filter: DirectionalFilter,
    /// Drop candidates immediately adjacent to an already-hinted word.
    pub suppress_adjacent: bool,
    /// Re-render matching hints in the selected style while disambiguating.
    pub highlight_selected: bool,
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            per_key_motion_count: HashMap::new(),
            default_motion_count: 2,
            motion_timeout: Duration::from_millis(2000),
            debounce_delay: Duration::from_millis(80),
            key_repeat_threshold: Duration::from_millis(50),
            key_repeat_reset_delay: Duration::from_millis(300),
            suppress_on_key_repeat: true,
            single_char_keys: split_keys("ASDFGHJKLQWERUIO"),
            multi_char_keys: split_keys("BCMNPTVXYZ"),
            max_single_char_hints: 16,
            use_numeric_fallback: true,
            numeric_only: false,
            triple_hint_fallback: false,
            directional_filter: DirectionalFilter::None,
            suppress_adjacent: false,
            highlight_selected: true,
        }
    }
}

impl HopConfig {
    /// Apply one option by name, accepting canonical names and aliases.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownOption`] for an unrecognized name,
    /// [`ConfigError::InvalidValue`] for an unparsable value.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let canonical =
            canonical_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;

        let invalid = || ConfigError::InvalidValue {
            name: canonical.to_string(),
            value: value.to_string(),
        };

        match canonical {
            "per_key_motion_count" => {
                self.per_key_motion_count = parse_key_counts(value).ok_or_else(invalid)?;
            }
            "default_motion_count" => {
                let n: u32 = value.parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(invalid());
                }
                self.default_motion_count = n;
            }
            "motion_timeout" => self.motion_timeout = parse_millis(value).ok_or_else(invalid)?,
            "debounce_delay" => self.debounce_delay = parse_millis(value).ok_or_else(invalid)?,
            "key_repeat_threshold" => {
                self.key_repeat_threshold = parse_millis(value).ok_or_else(invalid)?;
            }
            "key_repeat_reset_delay" => {
                self.key_repeat_reset_delay = parse_millis(value).ok_or_else(invalid)?;
            }
            "suppress_on_key_repeat" => {
                self.suppress_on_key_repeat = parse_bool(value).ok_or_else(invalid)?;
            }
            "single_char_keys" => self.single_char_keys = split_keys(value),
            "multi_char_keys" => self.multi_char_keys = split_keys(value),
            "max_single_char_hints" => {
                self.max_single_char_hints = value.parse().map_err(|_| invalid())?;
            }
            "use_numeric_fallback" => {
                self.use_numeric_fallback = parse_bool(value).ok_or_else(invalid)?;
            }
            "numeric_only" => self.numeric_only = parse_bool(value).ok_or_else(invalid)?,
            "triple_hint_fallback" => {
                self.triple_hint_fallback = parse_bool(value).ok_or_else(invalid)?;
            }
            "directional_filter" => {
                self.directional_filter = match value {
                    "none" => DirectionalFilter::None,
                    "up" => DirectionalFilter::Up,
                    "down" => DirectionalFilter::Down,
                    _ => return Err(invalid()),
                };
            }
            "suppress_adjacent" => {
                self.suppress_adjacent = parse_bool(value).ok_or_else(invalid)?;
            }
            "highlight_selected" => {
                self.highlight_selected = parse_bool(value).ok_or_else(invalid)?;
            }
            _ => unreachable!("canonical_name returned an unhandled option"),
        }
        Ok(())
    }

    /// Build the validated hint alphabet from the key options.
    ///
    /// # Errors
    ///
    /// Any hint-space rule violation, per [`HintKeys::new`].
    pub fn validate(&self) -> Result<HintKeys, ConfigError> {
        HintKeys::new(
            &self.single_char_keys,
            &self.multi_char_keys,
            self.max_single_char_hints,
            self.use_numeric_fallback,
            self.numeric_only,
            self.triple_hint_fallback,
        )
    }

    /// The trigger threshold for a key: its per-key override or the default.
    #[must_use]
    pub fn required_count(&self, key: &str) -> u32 {
        self.per_key_motion_count
            .get(key)
            .copied()
            .unwrap_or(self.default_motion_count)
    }
}

// ---------------------------------------------------------------------------
// Name & value parsing
// ---------------------------------------------------------------------------

/// Map any accepted spelling to the canonical option name.
///
/// Returns `None` for unknown names. This is the only place alias
/// spellings exist.
#[must_use]
fn canonical_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "per_key_motion_count" | "perKeyMotionCount" => "per_key_motion_count",
        "default_motion_count" | "defaultMotionCount" | "motion_count" => "default_motion_count",
        "motion_timeout" | "motionTimeout" | "timeout" => "motion_timeout",
        "debounce_delay" | "debounceDelay" => "debounce_delay",
        "key_repeat_threshold" | "keyRepeatThreshold" => "key_repeat_threshold",
        "key_repeat_reset_delay" | "keyRepeatResetDelay" => "key_repeat_reset_delay",
        "suppress_on_key_repeat" | "suppressOnKeyRepeat" => "suppress_on_key_repeat",
        "single_char_keys" | "singleCharKeys" | "keys1" => "single_char_keys",
        "multi_char_keys" | "multiCharKeys" | "keys2" => "multi_char_keys",
        "max_single_char_hints" | "maxSingleCharHints" => "max_single_char_hints",
        "use_numeric_fallback" | "useNumericFallback" | "numeric_hints" => "use_numeric_fallback",
        "numeric_only" | "numericOnly" => "numeric_only",
        "triple_hint_fallback" | "tripleHintFallback" => "triple_hint_fallback",
        "directional_filter" | "directionalFilter" | "direction" => "directional_filter",
        "suppress_adjacent" | "suppressAdjacent" | "overlap_filter" => "suppress_adjacent",
        "highlight_selected" | "highlightSelected" => "highlight_selected",
        _ => return None,
    })
}

/// Split a key-list value: comma-separated entries, or one key per char.
fn split_keys(value: &str) -> Vec<String> {
    if value.contains(',') {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    } else {
        value.chars().map(|c| c.to_string()).collect()
    }
}

/// Parse `key:count` pairs: `"v:1,h:3"`.
fn parse_key_counts(value: &str) -> Option<HashMap<String, u32>> {
    let mut map = HashMap::new();
    for pair in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, count) = pair.split_once(':')?;
        let count: u32 = count.trim().parse().ok()?;
        if count == 0 {
            return None;
        }
        map.insert(key.trim().to_string(), count);
    }
    Some(map)
}

/// Parse a millisecond duration value. Negative input is rejected by the
/// unsigned parse, satisfying "non-negative" validation.
fn parse_millis(value: &str) -> Option<Duration> {
    value.parse::<u64>().ok().map(Duration::from_millis)
}

/// Parse a boolean value in the accepted spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // -- Defaults -----------------------------------------------------------

    #[test]
    fn default_config_validates() {
        let config = HopConfig::default();
        let keys = config.validate().unwrap();
        assert!(keys.capacity() > 100);
    }

    #[test]
    fn default_thresholds() {
        let config = HopConfig::default();
        assert_eq!(config.default_motion_count, 2);
        assert_eq!(config.motion_timeout, Duration::from_millis(2000));
        assert!(config.suppress_on_key_repeat);
    }

    // -- Alias normalization ------------------------------------------------

    #[test]
    fn canonical_and_alias_spellings_agree() {
        let mut canonical = HopConfig::default();
        canonical.apply("motion_timeout", "1500").unwrap();

        let mut legacy = HopConfig::default();
        legacy.apply("motionTimeout", "1500").unwrap();

        let mut legacier = HopConfig::default();
        legacier.apply("timeout", "1500").unwrap();

        assert_eq!(canonical, legacy);
        assert_eq!(canonical, legacier);
    }

    #[test]
    fn key_list_aliases() {
        let mut a = HopConfig::default();
        a.apply("single_char_keys", "ASD").unwrap();
        let mut b = HopConfig::default();
        b.apply("keys1", "ASD").unwrap();
        assert_eq!(a.single_char_keys, b.single_char_keys);
        assert_eq!(a.single_char_keys, vec!["A", "S", "D"]);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = HopConfig::default().apply("warp_factor", "9").unwrap_err();
        assert_eq!(err, ConfigError::UnknownOption("warp_factor".into()));
    }

    // -- Value parsing ------------------------------------------------------

    #[test]
    fn per_key_motion_counts_parse() {
        let mut config = HopConfig::default();
        config.apply("perKeyMotionCount", "v:1, h:3").unwrap();
        assert_eq!(config.required_count("v"), 1);
        assert_eq!(config.required_count("h"), 3);
        assert_eq!(config.required_count("j"), 2); // default
    }

    #[test]
    fn negative_millis_rejected() {
        let err = HopConfig::default()
            .apply("debounce_delay", "-10")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn zero_motion_count_rejected() {
        let err = HopConfig::default()
            .apply("default_motion_count", "0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn bool_spellings() {
        let mut config = HopConfig::default();
        for (value, expected) in [("on", true), ("off", false), ("1", true), ("no", false)] {
            config.apply("highlight_selected", value).unwrap();
            assert_eq!(config.highlight_selected, expected);
        }
        assert!(config.apply("highlight_selected", "maybe").is_err());
    }

    #[test]
    fn directional_filter_values() {
        let mut config = HopConfig::default();
        config.apply("direction", "down").unwrap();
        assert_eq!(config.directional_filter, DirectionalFilter::Down);
        config.apply("directional_filter", "none").unwrap();
        assert_eq!(config.directional_filter, DirectionalFilter::None);
        assert!(config.apply("directional_filter", "sideways").is_err());
    }

    #[test]
    fn comma_separated_key_list() {
        let mut config = HopConfig::default();
        config.apply("multi_char_keys", "B, C, M").unwrap();
        assert_eq!(config.multi_char_keys, vec!["B", "C", "M"]);
    }

    // -- Validation flows through to the alphabet ---------------------------

    #[test]
    fn overlapping_keys_fail_validation() {
        let mut config = HopConfig::default();
        config.apply("single_char_keys", "AB").unwrap();
        config.apply("multi_char_keys", "BC").unwrap();
        assert_eq!(config.validate().unwrap_err(), ConfigError::OverlappingKeys('B'));
    }

    #[test]
    fn numeric_only_validation_flows_through() {
        let mut config = HopConfig::default();
        config.apply("numeric_only", "true").unwrap();
        assert_eq!(config.validate().unwrap_err(), ConfigError::NonDigitKey('B'));

        config.apply("multi_char_keys", "0123").unwrap();
        config.apply("single_char_keys", "ASDF").unwrap();
        assert!(config.validate().is_ok());
    }
}
