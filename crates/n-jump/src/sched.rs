//! Render scheduling — hybrid sync/async marker batching with cooperative
//! cancellation.
//!
//! Showing a full screen of hints through a backend call per marker can
//! take long enough to delay the next keystroke. The scheduler splits the
//! work: the first [`SYNC_DISPLAY_COUNT`] markers render immediately (the
//! nearest hints, which the user reads first), one redraw is signalled,
//! and the remainder is queued in [`ASYNC_BATCH_SIZE`]-marker batches. The
//! driving loop calls [`RenderScheduler::pump`] whenever it has a moment —
//! between keystroke polls — so no single call blocks input for more than
//! one batch's cost.
//!
//! # Cancellation
//!
//! Every scheduling call takes a [`RenderTicket`]. Issuing a new ticket
//! invalidates all previous ones; `pump` discards batches whose ticket has
//! gone stale and re-checks the live ticket between items, so a cycle's
//! leftover work quietly evaporates once a newer cycle starts.
//! Cancellation is advisory: markers already placed are never rolled back
//! (the next clear-and-redraw owns final consistency), and one in-flight
//! item may land after invalidation is requested.
//!
//! # Failure policy
//!
//! A failing `place_marker` is logged and skipped; the batch continues.
//! Best-effort rendering — a half-drawn hint set is still navigable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use n_hint::session::HintMapping;

use crate::backend::{MarkerStyle, RenderBackend};

/// Markers rendered synchronously before control returns to the caller.
pub const SYNC_DISPLAY_COUNT: usize = 16;

/// Markers per cooperatively-drained batch.
pub const ASYNC_BATCH_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// RenderTicket
// ---------------------------------------------------------------------------

/// An abortable handle for one scheduling cycle.
///
/// Tickets are generation-stamped: the scheduler remembers only the latest
/// generation, and a ticket is cancelled as soon as a newer one is issued.
/// Checks are cooperative — batch loops test the ticket between items;
/// nothing is interrupted mid-call.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    id: u64,
    current: Arc<AtomicU64>,
}

impl RenderTicket {
    /// True once a newer ticket has been issued.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Relaxed) != self.id
    }
}

// ---------------------------------------------------------------------------
// RenderScheduler
// ---------------------------------------------------------------------------

/// One queued marker, stamped with the cycle that scheduled it.
#[derive(Debug)]
struct QueuedMarker {
    line: usize,
    col: usize,
    label: String,
    style: MarkerStyle,
}

#[derive(Debug)]
struct Batch {
    ticket: RenderTicket,
    items: Vec<QueuedMarker>,
}

/// Drives a [`RenderBackend`] through the sync-first/async-rest protocol.
#[derive(Debug)]
pub struct RenderScheduler<B> {
    backend: B,
    queue: VecDeque<Batch>,
    generation: Arc<AtomicU64>,
}

impl<B: RenderBackend> RenderScheduler<B> {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            queue: VecDeque::new(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start a new scheduling cycle, invalidating every earlier ticket.
    pub fn issue_ticket(&mut self) -> RenderTicket {
        let id = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        RenderTicket {
            id,
            current: Arc::clone(&self.generation),
        }
    }

    /// Render a full mapping set: sync prefix, redraw, queued remainder.
    pub fn display_all(&mut self, mappings: &[HintMapping], ticket: &RenderTicket) {
        let sync = mappings.len().min(SYNC_DISPLAY_COUNT);
        for mapping in &mappings[..sync] {
            self.render_one(mapping, MarkerStyle::Label);
        }
        if let Err(e) = self.backend.redraw() {
            log::warn!("redraw failed: {e}");
        }
        self.enqueue(&mappings[sync..], MarkerStyle::Label, ticket);
    }

    /// Queue a selected-style re-render of the hints matching `partial`.
    ///
    /// Never drains inline: the work lands on the queue and this returns,
    /// so the caller can go straight back to reading input.
    pub fn highlight_candidates(
        &mut self,
        partial: &str,
        mappings: &[HintMapping],
        ticket: &RenderTicket,
    ) {
        let matching: Vec<HintMapping> = mappings
            .iter()
            .filter(|m| m.matches_prefix(partial))
            .cloned()
            .collect();
        log::trace!("highlight: {} candidates for {partial:?}", matching.len());
        self.enqueue(&matching, MarkerStyle::Selected, ticket);
    }

    /// Drain one batch. Returns `true` while more async work remains.
    ///
    /// Batches from cancelled cycles are discarded without rendering; the
    /// ticket is re-checked between items so a cycle invalidated mid-batch
    /// stops issuing calls (already-placed markers stay put).
    pub fn pump(&mut self) -> bool {
        self.queue.retain(|batch| !batch.ticket.is_cancelled());
        if let Some(batch) = self.queue.pop_front() {
            for item in batch.items {
                if batch.ticket.is_cancelled() {
                    log::trace!("render cycle cancelled mid-batch");
                    break;
                }
                self.place(&item);
            }
        }
        self.is_rendering()
    }

    /// True while an async batch is waiting to be drained.
    #[inline]
    #[must_use]
    pub fn is_rendering(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Clear the backend and drop any pending batches.
    pub fn clear_all(&mut self) {
        self.queue.clear();
        if let Err(e) = self.backend.clear_all() {
            log::warn!("clear failed: {e}");
        }
    }

    /// The wrapped backend.
    #[inline]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The wrapped backend, mutably.
    #[inline]
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn enqueue(&mut self, mappings: &[HintMapping], style: MarkerStyle, ticket: &RenderTicket) {
        for chunk in mappings.chunks(ASYNC_BATCH_SIZE) {
            self.queue.push_back(Batch {
                ticket: ticket.clone(),
                items: chunk
                    .iter()
                    .map(|m| QueuedMarker {
                        line: m.render_pos.line,
                        col: m.render_pos.col,
                        label: m.label.clone(),
                        style,
                    })
                    .collect(),
            });
        }
    }

    fn render_one(&mut self, mapping: &HintMapping, style: MarkerStyle) {
        if let Err(e) =
            self.backend
                .place_marker(mapping.render_pos.line, mapping.render_pos.col, &mapping.label, style)
        {
            log::warn!(
                "marker {:?} at {} failed: {e}",
                mapping.label,
                mapping.render_pos
            );
        }
    }

    fn place(&mut self, item: &QueuedMarker) {
        if let Err(e) = self
            .backend
            .place_marker(item.line, item.col, &item.label, item.style)
        {
            log::warn!("marker {:?} at {}:{} failed: {e}", item.label, item.line, item.col);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
