//! # n-jump — Engine runtime for n-hop
//!
//! The interactive half of hint navigation. `n-hint` decides what the
//! hints are; this crate puts them on screen and turns keystrokes into a
//! jump:
//!
//! - **[`backend`]** — the `RenderBackend` seam and two stock backends
//! - **[`sched`]** — hybrid sync/async render batching with cooperative,
//!   ticket-based cancellation
//! - **[`keys`]** — the single-keystroke read primitive
//! - **[`resolver`]** — the label-disambiguation state machine
//! - **[`motion`]** — per-key press counting and key-repeat suppression
//! - **[`debounce`]** — trigger coalescing around in-progress runs
//! - **[`controller`]** — the `JumpController` that ties it all together
//!
//! Everything here is single-threaded and cooperative: the only blocking
//! wait is the keystroke read, and it ticks so queued render batches can
//! drain while the user thinks. The engine never spawns threads — hosts
//! deliver keys however they like (the demo uses a reader thread feeding
//! a channel).

pub mod backend;
pub mod controller;
pub mod debounce;
pub mod keys;
pub mod motion;
pub mod resolver;
pub mod sched;

pub use backend::{GridBackend, HighlightListBackend, MarkerStyle, RenderBackend};
pub use controller::{Host, JumpController, JumpOutcome};
pub use debounce::Debouncer;
pub use keys::{ChannelKeyReader, Key, KeyRead, KeyReader};
pub use motion::{MotionTracker, Press};
pub use resolver::{resolve, Outcome};
pub use sched::{RenderScheduler, RenderTicket};
