// SPDX-License-Identifier: MIT
//
// n-hop — hint-label jump navigation for the terminal.
//
// This binary wires the engine crates to a real terminal:
//
//   n-hint → label alphabets, word detection, distance assignment
//   n-jump → render scheduling, keystroke resolution, motion triggers
//
// A background thread (term.rs) reads raw stdin and feeds `Key` events
// into a channel. The event loop applies ordinary motions itself and
// forwards motion presses to the JumpController; pressing `w` or `b`
// twice in quick succession overlays hint labels, and typing a label
// jumps the cursor to that word. Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 1 (markers overlay here)
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   └──────────────────────────────┘
//
// Logging goes through env_logger to stderr; run with RUST_LOG=debug and
// stderr redirected to a file to watch the pipeline decide.

mod term;

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;
use std::{env, fs, process};

use n_hint::config::HopConfig;
use n_hint::position::Position;
use n_hint::word::{RegexWordSource, Viewport, Word, WordSource};
use n_jump::backend::{MarkerStyle, RenderBackend};
use n_jump::controller::{Host, JumpController};
use n_jump::keys::{ChannelKeyReader, Key, KeyRead, KeyReader};
use ropey::Rope;
use unicode_width::UnicodeWidthChar;

use crate::term::Size;

/// Built-in text shown when no file argument is given.
const SAMPLE: &str = "\
fn main() {
    let config = HopConfig::default();
    let words = detect_words(viewport);
    let labels = keys.generate(words.len());

    for (word, label) in words.iter().zip(&labels) {
        place_marker(word.line, word.col, label);
    }

    match resolve(session, scheduler, reader) {
        Outcome::Jump(mapping) => move_cursor(mapping.word),
        Outcome::PassThrough(c) => forward(c),
        Outcome::Cancelled => hide(),
    }
}

// Press w twice quickly to light up the hints, then
// type a label to jump. Lowercase keys fall through to
// ordinary motions; escape cancels; q quits.
";

/// Poll granularity of the main loop.
const TICK: std::time::Duration = std::time::Duration::from_millis(8);

// ─── Editor state (the engine's Host) ───────────────────────────────────────

/// The demo's whole editing model: a rope, a cursor, and a scroll offset.
struct EditorState {
    rope: Rope,
    cursor: Position,
    top: usize,
    text_rows: usize,
    cols: usize,
    /// Shared with the ANSI backend so marker rows track scrolling.
    origin: Rc<Cell<usize>>,
    detector: RegexWordSource,
}

impl EditorState {
    fn new(text: &str, size: Size, origin: Rc<Cell<usize>>) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Position::ZERO,
            top: 0,
            text_rows: (size.rows.max(2) - 1) as usize,
            cols: size.cols as usize,
            origin,
            detector: RegexWordSource::new(),
        }
    }

    /// Number of addressable lines (ignores a trailing empty slice).
    fn len_lines(&self) -> usize {
        let len = self.rope.len_lines();
        if len > 1 && self.rope.line(len - 1).len_chars() == 0 {
            len - 1
        } else {
            len
        }
    }

    /// One line's text without its newline.
    fn line_text(&self, line: usize) -> String {
        let slice = self.rope.line(line);
        let mut text: String = slice.chars().collect();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        text
    }

    fn line_len(&self, line: usize) -> usize {
        self.line_text(line).chars().count()
    }

    /// Keep the cursor on real text and the viewport around it.
    fn clamp_and_scroll(&mut self) {
        let last = self.len_lines().saturating_sub(1);
        self.cursor.line = self.cursor.line.min(last);
        let width = self.line_len(self.cursor.line);
        self.cursor.col = self.cursor.col.min(width.saturating_sub(1));

        if self.cursor.line < self.top {
            self.top = self.cursor.line;
        } else if self.cursor.line >= self.top + self.text_rows {
            self.top = self.cursor.line + 1 - self.text_rows;
        }
        self.origin.set(self.top);
    }

    /// Every word in the buffer, for the `w`/`b` motions.
    fn all_words(&self) -> Vec<Word> {
        let lines: Vec<String> = (0..self.len_lines()).map(|l| self.line_text(l)).collect();
        self.detector.words(&Viewport::new(0, lines))
    }

    /// Apply one ordinary motion key.
    fn apply_motion(&mut self, c: char) {
        match c {
            'h' => self.cursor.col = self.cursor.col.saturating_sub(1),
            'l' => self.cursor.col += 1,
            'k' => self.cursor.line = self.cursor.line.saturating_sub(1),
            'j' => self.cursor.line += 1,
            '0' => self.cursor.col = 0,
            '$' => self.cursor.col = self.line_len(self.cursor.line).saturating_sub(1),
            'g' => self.cursor = Position::ZERO,
            'G' => self.cursor = Position::new(self.len_lines().saturating_sub(1), 0),
            'w' => {
                if let Some(next) = self
                    .all_words()
                    .into_iter()
                    .find(|w| w.position() > self.cursor)
                {
                    self.cursor = next.position();
                }
            }
            'b' => {
                if let Some(prev) = self
                    .all_words()
                    .into_iter()
                    .rev()
                    .find(|w| w.position() < self.cursor)
                {
                    self.cursor = prev.position();
                }
            }
            _ => {}
        }
        self.clamp_and_scroll();
    }
}

impl Host for EditorState {
    fn viewport(&self) -> Viewport {
        let end = (self.top + self.text_rows).min(self.len_lines());
        let lines: Vec<String> = (self.top..end).map(|l| self.line_text(l)).collect();
        Viewport::new(self.top, lines)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn move_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.clamp_and_scroll();
    }

    fn forward_char(&mut self, c: char) {
        self.apply_motion(c);
    }
}

// ─── ANSI marker backend ────────────────────────────────────────────────────

/// Draws hint markers straight onto the terminal.
///
/// `clear_all` is intentionally a no-op on screen: the event loop repaints
/// the text after every interaction, and that repaint is what erases stale
/// markers — the clear-and-redraw owns final consistency.
struct AnsiBackend {
    origin: Rc<Cell<usize>>,
    size: Size,
}

impl RenderBackend for AnsiBackend {
    fn place_marker(
        &mut self,
        line: usize,
        col: usize,
        label: &str,
        style: MarkerStyle,
    ) -> io::Result<()> {
        let top = self.origin.get();
        let text_rows = self.size.rows.max(2) as usize - 1;
        if line < top || line >= top + text_rows {
            return Ok(()); // scrolled out since assignment — nothing to draw
        }
        if col >= self.size.cols as usize {
            return Ok(());
        }
        let row = line - top;
        let sgr = match style {
            MarkerStyle::Label => "\x1b[30;43m",
            MarkerStyle::Selected => "\x1b[97;41m",
        };
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write!(lock, "\x1b[{};{}H{sgr}{label}\x1b[0m", row + 1, col + 1)?;
        Ok(())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ─── Shared key reader ──────────────────────────────────────────────────────

/// One key channel, two consumers: the event loop between interactions and
/// the resolver during one. Single-threaded, so a shared handle suffices.
#[derive(Clone)]
struct SharedReader(Rc<RefCell<ChannelKeyReader>>);

impl KeyReader for SharedReader {
    fn read_key(&mut self, timeout: std::time::Duration) -> KeyRead {
        self.0.borrow_mut().read_key(timeout)
    }
}

// ─── Painting ───────────────────────────────────────────────────────────────

/// Truncate a line to the terminal width by display columns.
fn fit_to_width(line: &str, cols: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in line.chars() {
        width += UnicodeWidthChar::width(c).unwrap_or(0);
        if width > cols {
            break;
        }
        out.push(c);
    }
    out
}

/// Full-screen repaint: text, status line, hardware cursor.
fn paint(state: &EditorState) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write!(lock, "\x1b[2J\x1b[H")?;

    let end = (state.top + state.text_rows).min(state.len_lines());
    for (row, line) in (state.top..end).enumerate() {
        let text = fit_to_width(&state.line_text(line), state.cols);
        write!(lock, "\x1b[{};1H{text}", row + 1)?;
    }

    let status = format!(
        " {}  ·  ww / bb → hints  ·  hjkl w b 0 $ g G move  ·  q quit",
        state.cursor
    );
    write!(
        lock,
        "\x1b[{};1H\x1b[7m{:<width$}\x1b[0m",
        state.text_rows + 1,
        fit_to_width(&status, state.cols),
        width = state.cols
    )?;

    // Park the hardware cursor on the logical cursor.
    let row = state.cursor.line - state.top + 1;
    write!(lock, "\x1b[{};{}H\x1b[?25h", row, state.cursor.col + 1)?;
    lock.flush()
}

// ─── Event loop ─────────────────────────────────────────────────────────────

fn event_loop(
    state: &mut EditorState,
    controller: &mut JumpController<RegexWordSource, AnsiBackend, SharedReader>,
    reader: &SharedReader,
) -> io::Result<()> {
    paint(state)?;
    let mut reader = reader.clone();
    loop {
        match reader.read_key(TICK) {
            KeyRead::Key(Key::Escape) | KeyRead::Closed => return Ok(()),
            KeyRead::Key(Key::Char('q')) => return Ok(()),
            KeyRead::Key(Key::Char(c)) => {
                state.apply_motion(c);
                if matches!(c, 'w' | 'b') {
                    // Show the ordinary motion before hints come up.
                    paint(state)?;
                    if let Some(outcome) =
                        controller.on_key(&c.to_string(), state, Instant::now())
                    {
                        log::debug!("hint outcome: {outcome:?}");
                    }
                }
                paint(state)?;
            }
            KeyRead::Key(Key::Other) => {}
            KeyRead::TimedOut => {
                controller.pump();
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> io::Result<()> {
    let text = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let size = term::size();
    let origin = Rc::new(Cell::new(0));
    let mut state = EditorState::new(&text, size, Rc::clone(&origin));

    let (tx, channel_reader) = ChannelKeyReader::channel();
    let reader = SharedReader(Rc::new(RefCell::new(channel_reader)));
    let backend = AnsiBackend { origin, size };

    let mut controller = JumpController::new(
        HopConfig::default(),
        RegexWordSource::new(),
        backend,
        reader.clone(),
    )
    .map_err(io::Error::other)?;

    let mut terminal = term::RawTerminal::enter()?;
    let mut keys = term::KeyThread::spawn(tx);

    let result = event_loop(&mut state, &mut controller, &reader);

    keys.stop();
    terminal.leave()?;
    result
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("n-hop: {e}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
