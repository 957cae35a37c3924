//! Line renderer for the typewriter tagline.
//!
//! Draws a [`Frame`] as `text + cursor glyph` on the current terminal line:
//!
//! 1. Move to column 0
//! 2. Print the visible text and the cursor glyph (a space when blinked off)
//! 3. Clear the rest of the line (the text may have shrunk)
//! 4. Flush (single write per frame)
//!
//! Like the fullscreen diff renderer, it remembers the previous frame and
//! skips output entirely when nothing changed.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::state::drawn_cursor::DrawnCursorConfig;
use crate::types::Frame;

/// Single-line renderer for typewriter frames.
pub struct LineRenderer<W: Write> {
    out: W,
    cursor: DrawnCursorConfig,
    previous: Option<Frame>,
}

impl<W: Write> LineRenderer<W> {
    pub fn new(out: W, cursor: DrawnCursorConfig) -> Self {
        Self {
            out,
            cursor,
            previous: None,
        }
    }

    /// The line content a frame renders to, without escape sequences.
    pub fn compose(&self, frame: &Frame) -> String {
        let mut line = String::with_capacity(frame.text.len() + 4);
        line.push_str(&frame.text);
        line.push(self.cursor.glyph(frame.cursor_on));
        line
    }

    /// Render a frame if it differs from the last one.
    ///
    /// Returns true if anything was written.
    pub fn render(&mut self, frame: &Frame) -> io::Result<bool> {
        if self.previous.as_ref() == Some(frame) {
            return Ok(false);
        }
        self.render_full(frame)?;
        Ok(true)
    }

    /// Render a frame unconditionally.
    pub fn render_full(&mut self, frame: &Frame) -> io::Result<()> {
        let line = self.compose(frame);
        queue!(
            self.out,
            MoveToColumn(0),
            Print(line),
            Clear(ClearType::UntilNewLine)
        )?;
        self.out.flush()?;

        self.previous = Some(frame.clone());
        Ok(())
    }

    /// Forget the previous frame so the next render redraws.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::drawn_cursor::CursorStyle;

    fn output(renderer: &LineRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.writer()).into_owned()
    }

    #[test]
    fn test_compose_with_cursor() {
        let renderer = LineRenderer::new(Vec::new(), DrawnCursorConfig::default());
        assert_eq!(renderer.compose(&Frame::new("ab", true)), "ab|");
        assert_eq!(renderer.compose(&Frame::new("ab", false)), "ab ");
        assert_eq!(renderer.compose(&Frame::new("", true)), "|");
    }

    #[test]
    fn test_render_writes_line() {
        let mut renderer = LineRenderer::new(Vec::new(), DrawnCursorConfig::default());
        assert!(renderer.render(&Frame::new("Tools", true)).unwrap());

        let out = output(&renderer);
        assert!(out.contains("Tools|"));
        assert!(out.starts_with('\x1b'));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_unchanged_frame_skipped() {
        let mut renderer = LineRenderer::new(Vec::new(), DrawnCursorConfig::default());
        let frame = Frame::new("Open", false);

        assert!(renderer.render(&frame).unwrap());
        let len = renderer.writer().len();

        assert!(!renderer.render(&frame).unwrap());
        assert_eq!(renderer.writer().len(), len);

        renderer.invalidate();
        assert!(renderer.render(&frame).unwrap());
        assert!(renderer.writer().len() > len);
    }

    #[test]
    fn test_cursor_change_rerenders() {
        let mut renderer =
            LineRenderer::new(Vec::new(), DrawnCursorConfig::with_style(CursorStyle::Underline));
        renderer.render(&Frame::new("a", true)).unwrap();
        assert!(renderer.render(&Frame::new("a", false)).unwrap());

        let out = renderer.into_inner();
        let out = String::from_utf8_lossy(&out);
        assert!(out.contains("a_"));
        assert!(out.contains("a "));
    }
}
