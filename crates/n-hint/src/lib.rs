//! # n-hint — Hint core for n-hop
//!
//! This crate contains the pure logic of hint-label navigation — no I/O,
//! no timing, no rendering:
//!
//! - **[`position`]** — `Position` (line, col), 0-indexed
//! - **[`word`]** — `Word`, `Viewport`, the `WordSource` trait, and the
//!   default regex-based detector
//! - **[`alphabet`]** — validated hint-key alphabets and deterministic
//!   label generation
//! - **[`assign`]** — distance ranking, directional filtering, adjacency
//!   suppression, and the per-mode assignment cache
//! - **[`session`]** — the live mapping set behind visible hints
//! - **[`config`]** — canonical options with legacy-alias normalization
//!
//! The runtime half (render scheduling, keystroke resolution, motion
//! triggers) lives in the sibling `n-jump` crate.

pub mod alphabet;
pub mod assign;
pub mod config;
pub mod position;
pub mod session;
pub mod word;

pub use alphabet::HintKeys;
pub use assign::{AssignOptions, Assigner, DirectionalFilter, HintMode};
pub use config::{ConfigError, HopConfig};
pub use position::Position;
pub use session::{HintMapping, Session};
pub use word::{RegexWordSource, Viewport, Word, WordSource};
