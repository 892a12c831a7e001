#![forbid(unsafe_code)]

//! Bounded recall of submitted input lines.

use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 10;

/// A bounded ring of past submissions with a recall cursor.
///
/// The cursor sits at `len()` (one past the newest entry) when no recall is
/// in progress. Navigation wraps over the entries: [`prev`](Self::prev)
/// walks toward older entries and wraps from the oldest back to the newest,
/// [`next`](Self::next) walks toward newer entries and wraps from the
/// newest back to the oldest.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRing {
    /// A ring holding the default ten entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A ring holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ring is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a submission, evicting the oldest entry when full, and reset
    /// the recall cursor.
    pub fn push(&mut self, text: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(text.into());
        self.cursor = self.entries.len();
    }

    /// Step to the previous (older) entry, wrapping from the oldest back
    /// around to the newest.
    pub fn prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = if self.cursor == 0 {
            self.entries.len() - 1
        } else {
            self.cursor - 1
        };
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step to the next (newer) entry, wrapping from the newest back around
    /// to the oldest.
    pub fn next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = if self.cursor >= self.entries.len() - 1 {
            0
        } else {
            self.cursor + 1
        };
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Abandon any recall in progress.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }
}
