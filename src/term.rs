// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal plumbing for the demo — raw mode, size queries, and the
// background key thread.
//
// Safety: termios (tcgetattr/tcsetattr), ioctl (TIOCGWINSZ), isatty, and
// poll are the standard POSIX interfaces for terminal control; there is no
// safe alternative. Each unsafe block is minimal.
//
// The engine itself is platform-agnostic — everything unix-specific lives
// here, in the binary. A dedicated thread reads stdin in blocking mode
// (with a short poll so shutdown never hangs), folds bytes into `Key`
// events, and feeds the channel the engine reads from. The panic hook
// writes a restore sequence straight to fd 1 so a panic mid-frame never
// leaves the user's terminal raw.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::{Arc, Once};
use std::thread::{self, JoinHandle};

use n_jump::keys::Key;

/// How often the key thread checks its stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Restore sequence for emergency use: reset attributes, show cursor,
/// leave the alternate screen (last, so shell content reappears clean).
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l";

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Query the terminal size via `ioctl(TIOCGWINSZ)`, 80×24 if unavailable.
#[cfg(unix)]
#[must_use]
pub fn size() -> Size {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        }
    } else {
        Size { cols: 80, rows: 24 }
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn size() -> Size {
    Size { cols: 80, rows: 24 }
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Termios backup for the panic hook, which cannot reach the `RawTerminal`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Bypass the stdout lock — it may be held by the panicking frame.
            #[cfg(unix)]
            unsafe {
                let _ = libc::write(
                    libc::STDOUT_FILENO,
                    EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                    EMERGENCY_RESTORE.len(),
                );
            }
            #[cfg(not(unix))]
            {
                use io::Write;
                let _ = io::stdout().write_all(EMERGENCY_RESTORE);
                let _ = io::stdout().flush();
            }
            #[cfg(unix)]
            if let Ok(guard) = TERMIOS_BACKUP.lock() {
                if let Some(ref termios) = *guard {
                    unsafe {
                        let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, termios);
                    }
                }
            }
            original(info);
        }));
    });
}

/// Raw-mode terminal handle with RAII restore.
pub struct RawTerminal {
    #[cfg(unix)]
    original: Option<libc::termios>,
    active: bool,
}

impl RawTerminal {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if termios setup fails.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        let mut term = Self {
            #[cfg(unix)]
            original: None,
            active: false,
        };
        term.enable_raw()?;
        print!("\x1b[?1049h\x1b[?25l\x1b[2J");
        use io::Write;
        io::stdout().flush()?;
        term.active = true;
        Ok(term)
    }

    /// Restore the terminal. Idempotent; also runs on drop.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        print!("\x1b[0m\x1b[?25h\x1b[?1049l");
        use io::Write;
        io::stdout().flush()?;
        self.disable_raw()?;
        self.active = false;
        Ok(())
    }

    #[cfg(unix)]
    fn enable_raw(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(());
        }
        let fd = io::stdin().as_raw_fd();
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            self.original = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &= !(libc::ICRNL | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if let Some(ref original) = self.original {
            let fd = io::stdin().as_raw_fd();
            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Key thread ─────────────────────────────────────────────────────────────

/// Background stdin reader feeding [`Key`] events into a channel.
///
/// Polls stdin with a short timeout, checking a stop flag between polls,
/// so `stop()` returns within one poll interval instead of waiting on a
/// blocked `read()`.
pub struct KeyThread {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl KeyThread {
    /// Spawn the reader, sending keys to `tx`.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a thread.
    #[must_use]
    pub fn spawn(tx: Sender<Key>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("key-reader".into())
            .spawn(move || reader_loop(&tx, &stop_flag))
            .expect("failed to spawn key reader thread");
        Self {
            handle: Some(handle),
            stop,
        }
    }

    /// Signal the thread to stop and join it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for KeyThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn reader_loop(tx: &Sender<Key>, stop: &Arc<AtomicBool>) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0_u8; 1024];

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };
        if ready <= 0 {
            continue;
        }
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }
        #[allow(clippy::cast_sign_loss)] // n > 0 checked above
        let n = n as usize;
        let mut keys = Vec::new();
        parse_bytes(&buf[..n], &mut keys);
        for key in keys {
            if tx.send(key).is_err() {
                return;
            }
        }
    }
}

#[cfg(not(unix))]
fn reader_loop(tx: &Sender<Key>, stop: &Arc<AtomicBool>) {
    use std::io::Read;

    let stdin = io::stdin();
    let mut buf = [0_u8; 1024];
    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut keys = Vec::new();
                parse_bytes(&buf[..n], &mut keys);
                for key in keys {
                    if tx.send(key).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

// ─── Byte → Key parsing ─────────────────────────────────────────────────────

/// Fold raw bytes into keys.
///
/// Deliberately simpler than a full terminal input parser: escape
/// sequences (arrows, function keys) collapse to [`Key::Other`], Ctrl-C
/// behaves like escape, and a lone ESC is the Escape key. Sequences are
/// assumed to arrive in one read — good enough for an interactive demo.
fn parse_bytes(buf: &[u8], out: &mut Vec<Key>) {
    let mut i = 0;
    while i < buf.len() {
        let b = buf[i];
        match b {
            0x1b => {
                match buf.get(i + 1) {
                    // CSI / SS3: skip parameters through the final byte.
                    Some(b'[' | b'O') => {
                        i += 2;
                        while i < buf.len() && !(0x40..=0x7e).contains(&buf[i]) {
                            i += 1;
                        }
                        i += 1;
                        out.push(Key::Other);
                    }
                    // Alt+char: swallow both.
                    Some(_) => {
                        i += 2;
                        out.push(Key::Other);
                    }
                    None => {
                        i += 1;
                        out.push(Key::Escape);
                    }
                }
            }
            // Ctrl-C cancels like escape.
            0x03 => {
                i += 1;
                out.push(Key::Escape);
            }
            _ if b < 0x20 || b == 0x7f => {
                i += 1;
                out.push(Key::Other);
            }
            _ if b < 0x80 => {
                i += 1;
                out.push(Key::Char(b as char));
            }
            _ => {
                // UTF-8 lead byte: decode one scalar.
                let len = utf8_len(b);
                let end = (i + len).min(buf.len());
                if let Ok(s) = std::str::from_utf8(&buf[i..end]) {
                    if let Some(c) = s.chars().next() {
                        out.push(Key::Char(c));
                    }
                }
                i = end;
            }
        }
    }
}

/// Byte length of a UTF-8 sequence from its lead byte.
const fn utf8_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(bytes: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        parse_bytes(bytes, &mut keys);
        keys
    }

    #[test]
    fn plain_chars() {
        assert_eq!(
            parsed(b"wb"),
            vec![Key::Char('w'), Key::Char('b')]
        );
    }

    #[test]
    fn lone_escape_is_escape() {
        assert_eq!(parsed(b"\x1b"), vec![Key::Escape]);
    }

    #[test]
    fn arrow_key_is_other() {
        assert_eq!(parsed(b"\x1b[A"), vec![Key::Other]);
        assert_eq!(parsed(b"\x1b[1;5C"), vec![Key::Other]);
    }

    #[test]
    fn alt_char_is_other() {
        assert_eq!(parsed(b"\x1bx"), vec![Key::Other]);
    }

    #[test]
    fn ctrl_c_cancels_like_escape() {
        assert_eq!(parsed(b"\x03"), vec![Key::Escape]);
    }

    #[test]
    fn control_bytes_are_other() {
        assert_eq!(parsed(b"\t"), vec![Key::Other]);
        assert_eq!(parsed(b"\x7f"), vec![Key::Other]);
    }

    #[test]
    fn utf8_char_decodes() {
        assert_eq!(parsed("é".as_bytes()), vec![Key::Char('é')]);
    }

    #[test]
    fn mixed_stream() {
        assert_eq!(
            parsed(b"w\x1b[Bq"),
            vec![Key::Char('w'), Key::Other, Key::Char('q')]
        );
    }

    #[test]
    fn utf8_len_table() {
        assert_eq!(utf8_len(b'a'), 1);
        assert_eq!(utf8_len(0xc3), 2);
        assert_eq!(utf8_len(0xe4), 3);
        assert_eq!(utf8_len(0xf0), 4);
    }
}
