#![forbid(unsafe_code)]

//! The spliceable logical content of an input region.
//!
//! Char-indexed string editing with the ranged-window bookkeeping the
//! controller needs: a ranged region's content is always exactly its window
//! width, filled text first and pad spaces after, so ranged inserts consume
//! trailing pads and ranged removes append them back.

/// Logical input content with document-style splice operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    chars: Vec<char>,
}

impl InputLine {
    /// Create an empty line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line holding `width` pad spaces (a fresh ranged window).
    #[must_use]
    pub fn padded(width: usize) -> Self {
        Self {
            chars: vec![' '; width],
        }
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The content as a string.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Whether the last char is a pad space (the window has room).
    #[must_use]
    pub fn end_is_empty(&self) -> bool {
        self.chars.last() == Some(&' ')
    }

    /// Number of trailing pad spaces.
    #[must_use]
    pub fn trailing_pads(&self) -> usize {
        self.chars.iter().rev().take_while(|&&c| c == ' ').count()
    }

    /// Index of the first trailing pad (the filled-content boundary).
    #[must_use]
    pub fn fill_boundary(&self) -> usize {
        self.chars.len() - self.trailing_pads()
    }

    /// Splice `text` in at `pos` (no-op when `pos` is out of range).
    pub fn insert(&mut self, pos: usize, text: &str) {
        if pos <= self.chars.len() {
            let tail: Vec<char> = self.chars.split_off(pos);
            self.chars.extend(text.chars());
            self.chars.extend(tail);
        }
    }

    /// Remove `[pos, pos + len)` (no-op when the slice is out of range).
    pub fn remove(&mut self, pos: usize, len: usize) {
        if pos < self.chars.len() && pos + len <= self.chars.len() {
            self.chars.drain(pos..pos + len);
        }
    }

    /// Replace `[pos, pos + len)` with `text`; appends when out of range.
    pub fn replace(&mut self, pos: usize, len: usize, text: &str) {
        if pos < self.chars.len() && pos + len <= self.chars.len() {
            self.chars.drain(pos..pos + len);
            let tail: Vec<char> = self.chars.split_off(pos);
            self.chars.extend(text.chars());
            self.chars.extend(tail);
        } else {
            self.chars.extend(text.chars());
        }
    }

    /// Ranged insert: splice `text` at `pos`, dropping the same number of
    /// trailing pads to keep the window width constant.
    ///
    /// Rejected (returning `false`, changing nothing) when `pos` is past the
    /// filled-content boundary or the window lacks enough trailing pads.
    pub fn range_insert(&mut self, pos: usize, text: &str) -> bool {
        let n = text.chars().count();
        if n == 0 || pos > self.fill_boundary() || self.trailing_pads() < n {
            return false;
        }
        self.chars.truncate(self.chars.len() - n);
        let tail: Vec<char> = self.chars.split_off(pos);
        self.chars.extend(text.chars());
        self.chars.extend(tail);
        true
    }

    /// Ranged remove: drop `[pos, pos + len)` and append that many pads.
    pub fn range_remove(&mut self, pos: usize, len: usize) {
        if pos < self.chars.len() && pos + len <= self.chars.len() {
            self.chars.drain(pos..pos + len);
            self.chars.extend(std::iter::repeat_n(' ', len));
        }
    }

    /// The content with surrounding whitespace trimmed.
    #[must_use]
    pub fn trimmed(&self) -> String {
        self.as_string().trim().to_string()
    }
}

impl From<&str> for InputLine {
    fn from(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }
}
