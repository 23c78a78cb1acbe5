//! Rendering surface and key source.
//!
//! The renderer only needs [`Surface`]; the input worker only needs
//! [`KeySource`]. Both have a crossterm-backed implementation and can be
//! swapped for in-memory ones in tests.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};

use super::output::OutputBuffer;
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::{Frame, Style};
use crate::error::{Error, Result};
use crate::worker::messages::{KeyCode, KeyEvent, KeyModifiers};

/// Something a frame can be drawn on.
pub trait Surface {
    /// Blank the pending frame.
    fn clear(&mut self);

    /// Draw text into the pending frame at viewport `(row, col)`.
    fn draw(&mut self, row: u16, col: u16, text: &str, style: Style);

    /// Make the pending frame visible.
    fn refresh(&mut self) -> io::Result<()>;
}

/// Longest a key source blocks before giving the caller a chance to check
/// for `Exit`.
pub const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A blocking source of key presses.
pub trait KeySource {
    /// Block until the next key press, or for at most
    /// [`KEY_POLL_INTERVAL`].
    ///
    /// A poll with no key returns an [`io::ErrorKind::TimedOut`] error.
    fn read_key(&mut self) -> io::Result<KeyEvent>;
}

/// Double-buffered surface writing minimal ANSI to any writer.
///
/// `draw` goes to the back frame; `refresh` diffs it against the front frame,
/// writes the difference in one call and swaps.
pub struct FrameSurface<W: Write> {
    writer: W,
    front: Frame,
    back: Frame,
    origin: (u16, u16),
    output: OutputBuffer,
    diff_state: DiffState,
    needs_full_redraw: bool,
    frames: u64,
}

impl<W: Write> FrameSurface<W> {
    /// Create a surface for a `width` x `height` viewport at `origin` on screen.
    pub fn new(writer: W, width: u16, height: u16, origin: (u16, u16)) -> Self {
        Self {
            writer,
            front: Frame::new(width, height),
            back: Frame::new(width, height),
            origin,
            output: OutputBuffer::with_capacity(usize::from(width) * usize::from(height) * 2),
            diff_state: DiffState::new(),
            needs_full_redraw: true,
            frames: 0,
        }
    }

    /// The frame currently on screen.
    #[inline]
    pub const fn front(&self) -> &Frame {
        &self.front
    }

    /// Frames refreshed so far.
    #[inline]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The underlying writer.
    #[inline]
    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> Surface for FrameSurface<W> {
    fn clear(&mut self) {
        self.back.clear();
    }

    fn draw(&mut self, row: u16, col: u16, text: &str, style: Style) {
        self.back.draw_text(col, row, text, style);
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.output.clear();

        if self.needs_full_redraw {
            self.output.reset_attrs();
            self.output.clear_screen();
            self.output.cursor_hide();
            self.diff_state.reset();
            render_full(
                &self.back,
                self.origin,
                self.output.bytes_mut(),
                &mut self.diff_state,
            );
            self.needs_full_redraw = false;
        } else {
            render_diff(
                &self.front,
                &self.back,
                self.origin,
                self.output.bytes_mut(),
                &mut self.diff_state,
            );
        }

        if !self.output.is_empty() {
            self.output.flush_to(&mut self.writer)?;
        }
        self.front.copy_from(&self.back);
        self.frames += 1;
        Ok(())
    }
}

/// Scripted keys, mainly for tests and demos.
///
/// A disconnected channel reads as an error, which the input worker treats
/// as a quit.
impl KeySource for Receiver<KeyEvent> {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        self.recv_timeout(KEY_POLL_INTERVAL).map_err(|e| match e {
            RecvTimeoutError::Timeout => io::ErrorKind::TimedOut.into(),
            RecvTimeoutError::Disconnected => {
                io::Error::new(io::ErrorKind::UnexpectedEof, "key channel closed")
            }
        })
    }
}

/// Key presses from the terminal via crossterm.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if !event::poll(KEY_POLL_INTERVAL)? {
                return Err(io::ErrorKind::TimedOut.into());
            }
            if let Event::Key(key) = event::read()? {
                // Only process key press events (not release or repeat)
                if key.kind == KeyEventKind::Press {
                    return Ok(convert_key(key));
                }
            }
        }
    }
}

/// Convert a crossterm key event to ours.
fn convert_key(key: event::KeyEvent) -> KeyEvent {
    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => KeyCode::Other,
    };
    KeyEvent {
        code,
        modifiers: KeyModifiers {
            shift: key.modifiers.contains(event::KeyModifiers::SHIFT),
            control: key.modifiers.contains(event::KeyModifiers::CONTROL),
            alt: key.modifiers.contains(event::KeyModifiers::ALT),
        },
    }
}

/// Owns the terminal mode: raw input, alternate screen, hidden cursor.
///
/// [`TerminalGuard::teardown`] restores the terminal; it is idempotent and
/// also runs on drop, so every exit path leaves a usable shell.
#[derive(Debug)]
pub struct TerminalGuard {
    active: AtomicBool,
    origin: (u16, u16),
}

impl TerminalGuard {
    /// Take over the terminal for a `width` x `height` viewport.
    ///
    /// The viewport is centred when the terminal is larger.
    pub fn init(width: u16, height: u16) -> Result<Self> {
        let (actual_width, actual_height) = terminal::size()?;
        if actual_width < width || actual_height < height {
            return Err(Error::TerminalTooSmall {
                width,
                height,
                actual_width,
                actual_height,
            });
        }

        let guard = Self {
            active: AtomicBool::new(true),
            origin: ((actual_width - width) / 2, (actual_height - height) / 2),
        };

        // From here on a failure drops `guard`, which restores what was set.
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;

        log::info!(
            "terminal {actual_width}x{actual_height}, viewport {width}x{height} at {:?}",
            guard.origin
        );
        Ok(guard)
    }

    /// Screen position of the viewport's top-left cell.
    #[inline]
    pub const fn origin(&self) -> (u16, u16) {
        self.origin
    }

    /// Surface drawing to stdout at this guard's origin.
    pub fn surface(&self, width: u16, height: u16) -> FrameSurface<Stdout> {
        FrameSurface::new(io::stdout(), width, height, self.origin)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn teardown(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let mut stdout = io::stdout();
        let _ = execute!(stdout, crossterm::style::ResetColor, cursor::Show);
        let _ = execute!(stdout, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(surface: &FrameSurface<Vec<u8>>, width: u16, height: u16) -> vt100::Parser {
        let mut parser = vt100::Parser::new(height, width, 0);
        parser.process(surface.writer());
        parser
    }

    /// What a terminal shows on `row`, trailing blanks trimmed.
    fn shown(parser: &vt100::Parser, row: u16) -> String {
        let (_, cols) = parser.screen().size();
        let text: String = (0..cols)
            .map(|col| {
                let contents = parser
                    .screen()
                    .cell(row, col)
                    .map(vt100::Cell::contents)
                    .unwrap_or_default();
                if contents.is_empty() {
                    " ".to_string()
                } else {
                    contents
                }
            })
            .collect();
        text.trim_end().to_string()
    }

    #[test]
    fn test_first_refresh_draws_everything() {
        let mut surface = FrameSurface::new(Vec::new(), 10, 3, (0, 0));
        surface.draw(1, 2, "###", Style::empty());
        surface.refresh().unwrap();

        let parser = screen(&surface, 10, 3);
        assert_eq!(shown(&parser, 1), "  ###");
        assert!(parser.screen().hide_cursor());
        assert_eq!(surface.frames(), 1);
    }

    #[test]
    fn test_refresh_only_writes_changes() {
        let mut surface = FrameSurface::new(Vec::new(), 10, 3, (0, 0));
        surface.draw(0, 0, "abc", Style::empty());
        surface.refresh().unwrap();
        let after_first = surface.writer().len();

        surface.draw(0, 0, "abc", Style::empty());
        surface.refresh().unwrap();
        assert_eq!(surface.writer().len(), after_first);

        surface.clear();
        surface.draw(0, 0, "abd", Style::empty());
        surface.refresh().unwrap();
        let written = &surface.writer()[after_first..];
        assert_eq!(written, b"\x1b[1;3Hd");
    }

    #[test]
    fn test_clear_erases_previous_frame() {
        let mut surface = FrameSurface::new(Vec::new(), 8, 2, (0, 0));
        surface.draw(0, 0, "hello", Style::BOLD);
        surface.refresh().unwrap();
        surface.clear();
        surface.draw(1, 0, "bye", Style::empty());
        surface.refresh().unwrap();

        let parser = screen(&surface, 8, 2);
        assert_eq!(shown(&parser, 0), "");
        assert_eq!(shown(&parser, 1), "bye");
        assert_eq!(surface.front().row_text(0), "        ");
    }

    #[test]
    fn test_origin_offset() {
        let mut surface = FrameSurface::new(Vec::new(), 4, 2, (3, 1));
        surface.draw(0, 0, "ab", Style::BOLD);
        surface.refresh().unwrap();

        let parser = screen(&surface, 10, 4);
        assert_eq!(shown(&parser, 1), "   ab");
        assert!(parser.screen().cell(1, 3).unwrap().bold());
    }

    #[test]
    fn test_channel_key_source() {
        let (tx, mut rx) = crossbeam_channel::unbounded();
        tx.send(KeyEvent::char(' ')).unwrap();
        assert_eq!(rx.read_key().unwrap(), KeyEvent::char(' '));
        assert_eq!(rx.read_key().unwrap_err().kind(), io::ErrorKind::TimedOut);
        drop(tx);
        assert_eq!(
            rx.read_key().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_convert_key() {
        let key = event::KeyEvent::new(event::KeyCode::Char('c'), event::KeyModifiers::CONTROL);
        assert_eq!(convert_key(key), KeyEvent::ctrl('c'));
        let key = event::KeyEvent::new(event::KeyCode::Tab, event::KeyModifiers::NONE);
        assert_eq!(convert_key(key).code, KeyCode::Other);
    }
}
