#![forbid(unsafe_code)]

//! The styled-buffer collaborator interface.
//!
//! The console core never renders; it edits an abstract append-only styled
//! text buffer owned by the host (a text pane, a scrollback model, …). The
//! host guarantees single-threaded, in-order delivery of calls.

use glyphcon_style::TextStyle;

/// An abstract styled text buffer with a caret.
///
/// Offsets are char indices. Implementations do not need to validate
/// offsets defensively; the controller only issues in-bounds edits.
pub trait ConsoleBuffer {
    /// Current length in chars.
    fn len(&self) -> usize;

    /// Whether the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `text` at `offset`, tagged with `style`.
    fn insert(&mut self, offset: usize, text: &str, style: TextStyle);

    /// Remove `len` chars starting at `offset`.
    fn remove(&mut self, offset: usize, len: usize);

    /// Current caret position.
    fn caret(&self) -> usize;

    /// Move the caret.
    fn set_caret(&mut self, pos: usize);
}

/// In-memory [`ConsoleBuffer`] for tests and headless embedders.
///
/// Keeps the text as chars and records every styled insert so tests can
/// assert on the styles a write carried.
#[derive(Debug, Default)]
pub struct MemoryBuffer {
    chars: Vec<char>,
    caret: usize,
    inserts: Vec<(usize, String, TextStyle)>,
}

impl MemoryBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer contents as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// The contents of `[start, end)` as a string.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Every insert performed so far: (offset, text, style).
    #[must_use]
    pub fn inserts(&self) -> &[(usize, String, TextStyle)] {
        &self.inserts
    }
}

impl ConsoleBuffer for MemoryBuffer {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn insert(&mut self, offset: usize, text: &str, style: TextStyle) {
        let tail: Vec<char> = self.chars.split_off(offset);
        self.chars.extend(text.chars());
        self.chars.extend(tail);
        self.inserts.push((offset, text.to_string(), style));
    }

    fn remove(&mut self, offset: usize, len: usize) {
        self.chars.drain(offset..offset + len);
        if self.caret > self.chars.len() {
            self.caret = self.chars.len();
        }
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, pos: usize) {
        self.caret = pos.min(self.chars.len());
    }
}
