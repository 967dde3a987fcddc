//! Keystroke source — the single-key read primitive the resolver blocks on.
//!
//! The engine reads one key at a time through [`KeyReader`], a narrow seam
//! over whatever the host's input pipeline produces. Reads take a timeout:
//! the resolver uses short ticks so it can pump the render scheduler while
//! logically blocked, exactly like a hybrid `recv_timeout` event loop.
//!
//! [`ChannelKeyReader`] is the stock implementation — an mpsc receiver fed
//! by the host's input thread. Tests script their own readers.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// One keystroke, as the resolver sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// The cancel key.
    Escape,
    /// Anything else (arrows, function keys, chords) — never a hint.
    Other,
}

/// The result of one timed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRead {
    /// A key arrived.
    Key(Key),
    /// The timeout elapsed with no input — a cooperative yield point.
    TimedOut,
    /// The source is gone (host shut down, channel dropped).
    Closed,
}

// ---------------------------------------------------------------------------
// KeyReader
// ---------------------------------------------------------------------------

/// Blocking single-keystroke read with a timeout.
pub trait KeyReader {
    /// Wait up to `timeout` for the next key.
    fn read_key(&mut self, timeout: Duration) -> KeyRead;
}

// ---------------------------------------------------------------------------
// ChannelKeyReader
// ---------------------------------------------------------------------------

/// A [`KeyReader`] over an mpsc channel.
///
/// The sending half lives wherever the host parses input (the demo's stdin
/// thread); the engine owns the receiving half.
#[derive(Debug)]
pub struct ChannelKeyReader {
    rx: Receiver<Key>,
}

impl ChannelKeyReader {
    /// Wrap an existing receiver.
    #[must_use]
    pub fn new(rx: Receiver<Key>) -> Self {
        Self { rx }
    }

    /// Create a connected sender/reader pair.
    #[must_use]
    pub fn channel() -> (Sender<Key>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl KeyReader for ChannelKeyReader {
    fn read_key(&mut self, timeout: Duration) -> KeyRead {
        match self.rx.recv_timeout(timeout) {
            Ok(key) => KeyRead::Key(key),
            Err(RecvTimeoutError::Timeout) => KeyRead::TimedOut,
            Err(RecvTimeoutError::Disconnected) => KeyRead::Closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
