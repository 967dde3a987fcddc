//! Render backends — where hint markers actually land.
//!
//! The engine never draws. It drives a [`RenderBackend`]: place one marker,
//! clear everything, signal a redraw. Two concrete backends ship:
//!
//! - [`GridBackend`] — markers keyed by cell position, the shape a batched
//!   marker/extmark API wants. The demo paints from it; tests inspect it.
//! - [`HighlightListBackend`] — an append-only span list, the shape of the
//!   legacy match-highlight API some hosts still use.
//!
//! Backend calls are fallible; the scheduler's policy is log-and-skip, so
//! one failing marker never takes down a batch.

use std::collections::HashMap;
use std::io;

// ---------------------------------------------------------------------------
// MarkerStyle
// ---------------------------------------------------------------------------

/// Visual style of one hint marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// A plain hint label.
    #[default]
    Label,
    /// A label whose hint matches the partially-typed input.
    Selected,
}

// ---------------------------------------------------------------------------
// RenderBackend
// ---------------------------------------------------------------------------

/// The rendering seam between the engine and the host.
pub trait RenderBackend {
    /// Place one hint label at a cell position.
    ///
    /// # Errors
    ///
    /// Backend-specific; the scheduler logs and skips failures.
    fn place_marker(
        &mut self,
        line: usize,
        col: usize,
        label: &str,
        style: MarkerStyle,
    ) -> io::Result<()>;

    /// Remove every marker this backend has placed.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn clear_all(&mut self) -> io::Result<()>;

    /// Ask the host to refresh the screen now.
    ///
    /// Issued once after the synchronous prefix of a display cycle so the
    /// first markers appear before the async remainder drains.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn redraw(&mut self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// GridBackend
// ---------------------------------------------------------------------------

/// A marker placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub label: String,
    pub style: MarkerStyle,
}

/// Cell-grid marker store (batched marker API shape).
///
/// Placing a marker at an occupied cell overwrites it — re-rendering a
/// candidate in the selected style is an overwrite, not a duplicate.
#[derive(Debug, Default)]
pub struct GridBackend {
    markers: HashMap<(usize, usize), Marker>,
    redraws: u32,
    clears: u32,
}

impl GridBackend {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The marker at a cell, if any.
    #[must_use]
    pub fn marker_at(&self, line: usize, col: usize) -> Option<&Marker> {
        self.markers.get(&(line, col))
    }

    /// Number of markers currently placed.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Every placed marker with its position, in unspecified order.
    pub fn markers(&self) -> impl Iterator<Item = (&(usize, usize), &Marker)> {
        self.markers.iter()
    }

    /// How many redraw signals have been issued.
    #[must_use]
    pub const fn redraw_count(&self) -> u32 {
        self.redraws
    }

    /// How many clears have been issued.
    #[must_use]
    pub const fn clear_count(&self) -> u32 {
        self.clears
    }
}

impl RenderBackend for GridBackend {
    fn place_marker(
        &mut self,
        line: usize,
        col: usize,
        label: &str,
        style: MarkerStyle,
    ) -> io::Result<()> {
        self.markers.insert(
            (line, col),
            Marker {
                label: label.to_string(),
                style,
            },
        );
        Ok(())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        self.markers.clear();
        self.clears += 1;
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.redraws += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HighlightListBackend
// ---------------------------------------------------------------------------

/// One entry in the legacy highlight list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub line: usize,
    pub col: usize,
    /// Width of the highlight in cells — the label's char count.
    pub len: usize,
    pub style: MarkerStyle,
}

/// Legacy match-highlight backend: an ordered span list.
///
/// Hosts that predate marker APIs highlight label-width spans instead;
/// the list is rebuilt from scratch on every clear.
#[derive(Debug, Default)]
pub struct HighlightListBackend {
    spans: Vec<HighlightSpan>,
}

impl HighlightListBackend {
    /// An empty span list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The spans placed since the last clear, in placement order.
    #[must_use]
    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }
}

impl RenderBackend for HighlightListBackend {
    fn place_marker(
        &mut self,
        line: usize,
        col: usize,
        label: &str,
        style: MarkerStyle,
    ) -> io::Result<()> {
        self.spans.push(HighlightSpan {
            line,
            col,
            len: label.chars().count(),
            style,
        });
        Ok(())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        self.spans.clear();
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        // The legacy API repaints on its own schedule; nothing to signal.
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // -- GridBackend --------------------------------------------------------

    #[test]
    fn grid_places_and_reads_markers() {
        let mut grid = GridBackend::new();
        grid.place_marker(3, 7, "A", MarkerStyle::Label).unwrap();

        let marker = grid.marker_at(3, 7).unwrap();
        assert_eq!(marker.label, "A");
        assert_eq!(marker.style, MarkerStyle::Label);
        assert_eq!(grid.marker_count(), 1);
        assert!(grid.marker_at(3, 8).is_none());
    }

    #[test]
    fn grid_overwrites_same_cell() {
        let mut grid = GridBackend::new();
        grid.place_marker(0, 0, "BB", MarkerStyle::Label).unwrap();
        grid.place_marker(0, 0, "BB", MarkerStyle::Selected).unwrap();

        assert_eq!(grid.marker_count(), 1);
        assert_eq!(grid.marker_at(0, 0).unwrap().style, MarkerStyle::Selected);
    }

    #[test]
    fn grid_clear_all_empties_and_counts() {
        let mut grid = GridBackend::new();
        grid.place_marker(0, 0, "A", MarkerStyle::Label).unwrap();
        grid.place_marker(1, 0, "S", MarkerStyle::Label).unwrap();
        grid.clear_all().unwrap();

        assert_eq!(grid.marker_count(), 0);
        assert_eq!(grid.clear_count(), 1);
    }

    #[test]
    fn grid_counts_redraw_signals() {
        let mut grid = GridBackend::new();
        assert_eq!(grid.redraw_count(), 0);
        grid.redraw().unwrap();
        grid.redraw().unwrap();
        assert_eq!(grid.redraw_count(), 2);
    }

    // -- HighlightListBackend -----------------------------------------------

    #[test]
    fn highlight_list_records_spans_in_order() {
        let mut list = HighlightListBackend::new();
        list.place_marker(0, 0, "A", MarkerStyle::Label).unwrap();
        list.place_marker(2, 5, "BC", MarkerStyle::Selected).unwrap();

        assert_eq!(
            list.spans(),
            &[
                HighlightSpan {
                    line: 0,
                    col: 0,
                    len: 1,
                    style: MarkerStyle::Label
                },
                HighlightSpan {
                    line: 2,
                    col: 5,
                    len: 2,
                    style: MarkerStyle::Selected
                },
            ]
        );
    }

    #[test]
    fn highlight_list_clear_rebuilds_from_scratch() {
        let mut list = HighlightListBackend::new();
        list.place_marker(0, 0, "A", MarkerStyle::Label).unwrap();
        list.clear_all().unwrap();
        assert!(list.spans().is_empty());
    }
}
