//! Diffing Engine: Generate minimal ANSI sequences from frame changes.
//!
//! 1. Compare the front (on screen) and back (just drawn) frames
//! 2. Emit cursor moves only when the next changed cell is not adjacent
//! 3. Emit SGR sequences only when the style actually changes
//!
//! Frames are placed on screen at an origin offset, so the viewport can sit
//! anywhere in a larger terminal.

use super::{Cell, Frame, Style};
use std::io::Write;

/// Terminal state tracked between writes.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// Last known cursor position in screen coordinates.
    cursor: Option<(u16, u16)>,
    /// Last emitted style.
    style: Option<Style>,
}

impl DiffState {
    /// Create a state with unknown cursor and style.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            style: None,
        }
    }

    /// Forget the terminal state (e.g. after a screen clear).
    pub const fn reset(&mut self) {
        self.cursor = None;
        self.style = None;
    }
}

/// Statistics from a diff pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Cells written.
    pub cells_changed: usize,
    /// Cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Style change sequences emitted.
    pub style_changes: usize,
}

/// Emit only the cells of `next` that differ from `current`.
pub fn render_diff(
    current: &Frame,
    next: &Frame,
    origin: (u16, u16),
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let before = current.cells();
    emit_cells(next, origin, output, state, |idx, cell| before[idx] != *cell)
}

/// Emit every cell of `frame`, e.g. for the first frame or after a clear.
pub fn render_full(
    frame: &Frame,
    origin: (u16, u16),
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    emit_cells(frame, origin, output, state, |_, _| true)
}

fn emit_cells(
    frame: &Frame,
    (ox, oy): (u16, u16),
    output: &mut Vec<u8>,
    state: &mut DiffState,
    mut changed: impl FnMut(usize, &Cell) -> bool,
) -> DiffResult {
    let mut result = DiffResult::default();

    for (y, row) in frame.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let idx = y * frame.width() as usize + x;
            if cell.is_wide_continuation() || !changed(idx, cell) {
                continue;
            }
            result.cells_changed += 1;

            let target = (ox + x as u16, oy + y as u16);
            if state.cursor != Some(target) {
                emit_cursor_move(output, target.0, target.1);
                result.cursor_moves += 1;
            }

            if state.style != Some(cell.style()) {
                emit_style(output, cell.style(), state.style);
                state.style = Some(cell.style());
                result.style_changes += 1;
            }

            let mut utf8 = [0u8; 4];
            output.extend_from_slice(cell.ch().encode_utf8(&mut utf8).as_bytes());
            state.cursor = Some((target.0 + u16::from(cell.width().max(1)), target.1));
        }
    }

    result
}

/// Emit a cursor move sequence (ANSI positions are 1-indexed).
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let row = y + 1;
    let col = x + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit the transition from `old` to `new` style.
///
/// Removing a flag needs a full reset; adding flags does not.
fn emit_style(output: &mut Vec<u8>, new: Style, old: Option<Style>) {
    let to_set = match old {
        Some(old) if old.difference(new).is_empty() => new.difference(old),
        _ => {
            output.extend_from_slice(b"\x1b[0m");
            new
        }
    };
    for (flag, sgr) in Style::SGR {
        if to_set.contains(flag) {
            output.extend_from_slice(sgr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical_frames() {
        let a = Frame::new(10, 5);
        let b = Frame::new(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, (0, 0), &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Frame::new(10, 5);
        let mut b = Frame::new(10, 5);
        b.set(5, 2, Cell::new('#'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, (0, 0), &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(output, b"\x1b[3;6H\x1b[0m#");
    }

    #[test]
    fn test_diff_adjacent_cells_one_cursor_move() {
        let a = Frame::new(10, 5);
        let mut b = Frame::new(10, 5);
        b.draw_text(3, 1, "###", Style::empty());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, (0, 0), &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
    }

    #[test]
    fn test_diff_origin_offset() {
        let a = Frame::new(4, 2);
        let mut b = Frame::new(4, 2);
        b.set(0, 0, Cell::new('x'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_diff(&a, &b, (10, 5), &mut output, &mut state);

        assert!(output.starts_with(b"\x1b[6;11H"));
    }

    #[test]
    fn test_style_tracking() {
        let a = Frame::new(10, 1);
        let mut b = Frame::new(10, 1);
        b.draw_text(0, 0, "ab", Style::BOLD);
        b.draw_text(2, 0, "c", Style::empty());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, (0, 0), &mut output, &mut state);

        // Bold once for "ab", reset for "c".
        assert_eq!(result.style_changes, 2);
        assert_eq!(output, b"\x1b[H\x1b[0m\x1b[1mab\x1b[0mc");
    }

    #[test]
    fn test_style_addition_without_reset() {
        let mut output = Vec::new();
        emit_style(&mut output, Style::BOLD | Style::DIM, Some(Style::BOLD));
        assert_eq!(output, b"\x1b[2m");
    }

    #[test]
    fn test_cursor_move_optimization() {
        let mut output = Vec::new();

        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_render_full_writes_every_cell() {
        let mut frame = Frame::new(3, 2);
        frame.draw_text(0, 0, "abc", Style::empty());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_full(&frame, (0, 0), &mut output, &mut state);

        assert_eq!(result.cells_changed, 6);
        // One move per row: the cursor is adjacent within a row.
        assert_eq!(result.cursor_moves, 2);
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("abc"));
    }
}
