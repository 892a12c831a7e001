#![forbid(unsafe_code)]

//! The guarded input-region state machine.
//!
//! Exactly one input region is live at a time. Every edit to the shared
//! buffer is mediated here: ranged regions accept character overwrites
//! inside a fixed-width window, infinite regions grow at the buffer tail,
//! protected regions echo a mask character while the controller keeps the
//! true text. System output bypasses the guards with a reserved prefix.
//!
//! Rejected edits return [`EditOutcome::Rejected`], the bell-style signal.
//! State never changes on a rejection.

use tracing::{debug, trace};

use glyphcon_style::TextStyle;

use crate::buffer::ConsoleBuffer;
use crate::directive::{InputDirective, RegionMode};
use crate::line::InputLine;

/// Reserved prefix that routes an insert or replace straight to the buffer,
/// skipping the region guards.
pub const BYPASS_PREFIX: &str = "<GCb />-";

/// What happened to a guarded edit.
///
/// A rejection is a signal for the host to translate (a bell, a flash),
/// never an error to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum EditOutcome {
    /// The edit reached the buffer.
    Applied,
    /// The edit was refused; nothing changed.
    Rejected,
}

impl EditOutcome {
    /// Whether the edit reached the buffer.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the edit was refused.
    pub fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// A live input region.
#[derive(Debug, Clone)]
struct Region {
    mode: RegionMode,
    protected: bool,
    start: Option<usize>,
    content: InputLine,
}

impl Region {
    /// One past the last buffer offset of a ranged window, once anchored.
    fn end(&self) -> Option<usize> {
        match (self.mode, self.start) {
            (RegionMode::Ranged { width }, Some(start)) => Some(start + width),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum InputState {
    Idle,
    Receiving(Region),
}

/// Snapshot of an interrupted region, restorable into a matching successor.
#[derive(Debug, Clone)]
struct StoredInput {
    mode: RegionMode,
    protected: bool,
    content: InputLine,
}

/// The state machine guarding all edits to the live input region.
#[derive(Debug)]
pub struct InputRegionController {
    state: InputState,
    stored: Option<StoredInput>,
    mask_char: char,
    input_style: TextStyle,
    ignore_input: bool,
    bypass_next_remove: bool,
}

impl InputRegionController {
    /// A controller with no live region, echoing input at `input_style`.
    pub fn new(input_style: TextStyle) -> Self {
        Self {
            state: InputState::Idle,
            stored: None,
            mask_char: '*',
            input_style,
            ignore_input: false,
            bypass_next_remove: false,
        }
    }

    /// Change the style applied to echoed input.
    pub fn set_input_style(&mut self, style: TextStyle) {
        self.input_style = style;
    }

    /// Change the character echoed for protected input.
    pub fn set_mask_char(&mut self, mask: char) {
        self.mask_char = mask;
    }

    /// When set, guarded replaces and removes are dropped without an alert.
    pub fn set_ignore_input(&mut self, ignore: bool) {
        self.ignore_input = ignore;
    }

    /// Whether guarded edits are currently being dropped.
    pub fn ignores_input(&self) -> bool {
        self.ignore_input
    }

    /// Let the next remove through unguarded. Single shot.
    pub fn bypass_next_remove(&mut self) {
        self.bypass_next_remove = true;
    }

    /// Open a region from a parsed directive. Any prior live region is
    /// discarded; ranged regions start as a window of pad spaces.
    ///
    /// The region is not anchored until [`set_range_start`] supplies the
    /// buffer offset; the host prints any ranged padding first.
    ///
    /// [`set_range_start`]: Self::set_range_start
    pub fn begin(&mut self, directive: InputDirective) {
        let content = match directive.mode {
            RegionMode::Ranged { width } => InputLine::padded(width),
            RegionMode::Infinite => InputLine::new(),
        };
        self.state = InputState::Receiving(Region {
            mode: directive.mode,
            protected: directive.protected,
            start: None,
            content,
        });
    }

    /// Open an unprotected infinite region anchored at `start`. Used when an
    /// append carried no directive.
    pub fn begin_basic(&mut self, start: usize) {
        self.state = InputState::Receiving(Region {
            mode: RegionMode::Infinite,
            protected: false,
            start: Some(start),
            content: InputLine::new(),
        });
    }

    /// Anchor the live region at a buffer offset. No-op when idle.
    pub fn set_range_start(&mut self, start: usize) {
        if let InputState::Receiving(region) = &mut self.state {
            region.start = Some(start);
        }
    }

    /// Discard the live region. The snapshot slot is untouched.
    pub fn reset(&mut self) {
        self.state = InputState::Idle;
    }

    /// Whether a region is live.
    pub fn is_receiving(&self) -> bool {
        matches!(self.state, InputState::Receiving(_))
    }

    /// Whether the live region is protected. False when idle.
    pub fn is_protected(&self) -> bool {
        match &self.state {
            InputState::Receiving(region) => region.protected,
            InputState::Idle => false,
        }
    }

    /// Whether the live region is infinite. False when idle.
    pub fn is_infinite(&self) -> bool {
        match &self.state {
            InputState::Receiving(region) => region.mode == RegionMode::Infinite,
            InputState::Idle => false,
        }
    }

    /// The live region's anchored start offset.
    pub fn region_start(&self) -> Option<usize> {
        match &self.state {
            InputState::Receiving(region) => region.start,
            InputState::Idle => None,
        }
    }

    /// One past the live ranged region's window. `None` when infinite,
    /// unanchored, or idle.
    pub fn region_end(&self) -> Option<usize> {
        match &self.state {
            InputState::Receiving(region) => region.end(),
            InputState::Idle => None,
        }
    }

    /// The live region's logical content.
    pub fn content(&self) -> Option<&InputLine> {
        match &self.state {
            InputState::Receiving(region) => Some(&region.content),
            InputState::Idle => None,
        }
    }

    /// The pad run a freshly opened ranged region occupies on screen.
    pub fn pad_run(&self) -> String {
        match &self.state {
            InputState::Receiving(Region {
                mode: RegionMode::Ranged { width },
                ..
            }) => " ".repeat(*width),
            _ => String::new(),
        }
    }

    /// Whether an interrupted region is waiting to be restored.
    pub fn has_stored_input(&self) -> bool {
        self.stored.is_some()
    }

    /// Mediate an insert.
    ///
    /// Bypass-prefixed text passes through at `style`. Otherwise only an
    /// infinite region accepts inserts at or past its start; ranged regions
    /// take overwrites through [`replace`](Self::replace) only.
    pub fn insert<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        offset: usize,
        text: &str,
        style: TextStyle,
    ) -> EditOutcome {
        if let Some(raw) = text.strip_prefix(BYPASS_PREFIX) {
            buf.insert(offset, raw, style);
            return EditOutcome::Applied;
        }
        match &mut self.state {
            InputState::Receiving(region)
                if region.mode == RegionMode::Infinite
                    && region.start.is_some_and(|start| offset >= start) =>
            {
                let start = region.start.unwrap_or(0);
                if region.protected {
                    let masked = mask_run(self.mask_char, text.chars().count());
                    buf.insert(offset, &masked, self.input_style);
                } else {
                    buf.insert(offset, text, self.input_style);
                }
                region.content.insert(offset - start, text);
                trace!(offset, len = text.len(), "input insert");
                EditOutcome::Applied
            }
            _ => {
                debug!(offset, "insert rejected outside input region");
                EditOutcome::Rejected
            }
        }
    }

    /// Mediate a replace (`remove(offset, len)` then insert of `text`).
    ///
    /// Bypass-prefixed text passes through, masked-preserving-spaces when
    /// the live region is protected. Ranged regions accept the overwrite
    /// only when the replaced span lies inside the window and pad spaces
    /// remain, then trim the tail to keep the window width constant.
    /// Infinite regions splice freely at or past their start.
    pub fn replace<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        offset: usize,
        len: usize,
        text: &str,
        style: TextStyle,
    ) -> EditOutcome {
        if let Some(raw) = text.strip_prefix(BYPASS_PREFIX) {
            let echoed = if self.is_protected() {
                mask_preserving_spaces(self.mask_char, raw)
            } else {
                raw.to_string()
            };
            if len > 0 {
                buf.remove(offset, len);
            }
            buf.insert(offset, &echoed, style);
            return EditOutcome::Applied;
        }
        if self.ignore_input {
            return EditOutcome::Rejected;
        }
        let mask_char = self.mask_char;
        let input_style = self.input_style;
        match &mut self.state {
            InputState::Receiving(region) if region.start.is_some() => {
                let start = region.start.unwrap_or(0);
                if offset < start {
                    debug!(offset, start, "replace rejected before input region");
                    return EditOutcome::Rejected;
                }
                match region.end() {
                    Some(end) if offset < end => {
                        if offset + len > end {
                            debug!(offset, len, "replace rejected past ranged window");
                            return EditOutcome::Rejected;
                        }
                        let n = text.chars().count();
                        let mut next = region.content.clone();
                        if len > 0 {
                            next.range_remove(offset - start, len);
                        }
                        if !next.range_insert(offset - start, text) {
                            debug!(offset, "replace rejected, ranged window full");
                            return EditOutcome::Rejected;
                        }
                        let full = !next.end_is_empty();
                        region.content = next;
                        let echoed = if region.protected {
                            mask_run(mask_char, n)
                        } else {
                            text.to_string()
                        };
                        if len > 0 {
                            buf.remove(offset, len);
                        }
                        buf.insert(offset, &echoed, input_style);
                        if n > len {
                            // The chars shifted past the window are the pads
                            // the splice consumed.
                            let at = if full { end } else { end - 1 };
                            buf.remove(at, n - len);
                        } else if len > n {
                            let pads = " ".repeat(len - n);
                            buf.insert(end - (len - n), &pads, input_style);
                        }
                        trace!(offset, len, n, "ranged overwrite");
                        EditOutcome::Applied
                    }
                    Some(_) => {
                        debug!(offset, "replace rejected past ranged window");
                        EditOutcome::Rejected
                    }
                    None => {
                        let echoed = if region.protected {
                            mask_run(mask_char, text.chars().count())
                        } else {
                            text.to_string()
                        };
                        if len > 0 {
                            buf.remove(offset, len);
                        }
                        buf.insert(offset, &echoed, input_style);
                        region.content.replace(offset - start, len, text);
                        trace!(offset, len, "infinite replace");
                        EditOutcome::Applied
                    }
                }
            }
            _ => {
                debug!(offset, "replace rejected, no input region");
                EditOutcome::Rejected
            }
        }
    }

    /// Mediate a remove.
    ///
    /// A pending [`bypass_next_remove`](Self::bypass_next_remove) passes the
    /// deletion straight through once. Ranged regions re-pad the window tail
    /// and pull a caret sitting at the window end back inside; infinite
    /// regions shrink.
    pub fn remove<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        offset: usize,
        len: usize,
    ) -> EditOutcome {
        if self.ignore_input {
            return EditOutcome::Rejected;
        }
        if self.bypass_next_remove {
            self.bypass_next_remove = false;
            buf.remove(offset, len);
            return EditOutcome::Applied;
        }
        let input_style = self.input_style;
        match &mut self.state {
            InputState::Receiving(region)
                if region.start.is_some_and(|start| offset >= start) =>
            {
                let start = region.start.unwrap_or(0);
                match region.end() {
                    Some(end) => {
                        if offset + len > end {
                            debug!(offset, len, "remove rejected past ranged window");
                            return EditOutcome::Rejected;
                        }
                        buf.remove(offset, len);
                        let pads = " ".repeat(len);
                        buf.insert(end - len, &pads, input_style);
                        if len > 0 && buf.caret() == end {
                            buf.set_caret(end - 1);
                        }
                        region.content.range_remove(offset - start, len);
                        trace!(offset, len, "ranged remove");
                        EditOutcome::Applied
                    }
                    None => {
                        buf.remove(offset, len);
                        region.content.remove(offset - start, len);
                        trace!(offset, len, "infinite remove");
                        EditOutcome::Applied
                    }
                }
            }
            _ => {
                debug!(offset, "remove rejected outside input region");
                EditOutcome::Rejected
            }
        }
    }

    /// Take the submitted text, trimmed, and go idle. `None` when idle.
    pub fn submit(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, InputState::Idle) {
            InputState::Receiving(region) => Some(region.content.trimmed()),
            InputState::Idle => None,
        }
    }

    /// Snapshot the live region into the single stored slot and go idle.
    /// No-op when idle. An earlier snapshot is overwritten.
    pub fn interrupt(&mut self) {
        if let InputState::Receiving(region) =
            std::mem::replace(&mut self.state, InputState::Idle)
        {
            self.stored = Some(StoredInput {
                mode: region.mode,
                protected: region.protected,
                content: region.content,
            });
        }
    }

    /// Try to restore the stored snapshot into the live region.
    ///
    /// Succeeds only when a snapshot exists and the live region's mode and
    /// protection match it exactly; the snapshot content is replayed into
    /// both the logical content and the buffer (masked when protected).
    /// The slot is consumed either way.
    pub fn restore<B: ConsoleBuffer>(&mut self, buf: &mut B) -> bool {
        let Some(stored) = self.stored.take() else {
            return false;
        };
        let mask_char = self.mask_char;
        let input_style = self.input_style;
        match &mut self.state {
            InputState::Receiving(region)
                if region.start.is_some()
                    && region.mode == stored.mode
                    && region.protected == stored.protected =>
            {
                let start = region.start.unwrap_or(0);
                let replaced = match region.mode {
                    RegionMode::Ranged { width } => width,
                    RegionMode::Infinite => 0,
                };
                let text = stored.content.as_string();
                let echoed = if region.protected {
                    mask_preserving_spaces(mask_char, &text)
                } else {
                    text.clone()
                };
                if replaced > 0 {
                    buf.remove(start, replaced);
                }
                buf.insert(start, &echoed, input_style);
                region.content = stored.content;
                true
            }
            _ => {
                debug!("stored input does not match the live region");
                false
            }
        }
    }

    /// Replace an infinite region's content wholesale (paste, history
    /// recall). Rewrites the buffer tail from the region start. No-op
    /// unless an anchored infinite region is live.
    pub fn set_text<B: ConsoleBuffer>(&mut self, buf: &mut B, text: &str) {
        let mask_char = self.mask_char;
        let input_style = self.input_style;
        if let InputState::Receiving(region) = &mut self.state
            && region.mode == RegionMode::Infinite
            && let Some(start) = region.start
        {
            let tail = buf.len() - start;
            if tail > 0 {
                buf.remove(start, tail);
            }
            let echoed = if region.protected {
                mask_run(mask_char, text.chars().count())
            } else {
                text.to_string()
            };
            buf.insert(start, &echoed, input_style);
            region.content = InputLine::from(text);
        }
    }
}

fn mask_run(mask: char, len: usize) -> String {
    std::iter::repeat_n(mask, len).collect()
}

fn mask_preserving_spaces(mask: char, text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' { ' ' } else { mask })
        .collect()
}
