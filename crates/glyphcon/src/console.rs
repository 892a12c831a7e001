#![forbid(unsafe_code)]

//! The console facade.
//!
//! Wires the scanner, the style registry, the input-region controller, and
//! the history ring over a host-supplied [`ConsoleBuffer`]. One `Console`
//! drives one buffer; the host serializes all calls.

use tracing::debug;

use glyphcon_input::{
    BYPASS_PREFIX, ConsoleBuffer, EditOutcome, HistoryRing, InputRegionController,
};
use glyphcon_style::{ActiveStyle, SgrAttributes, StyleError, StyleKey, StyleRegistry, TextStyle};
use glyphcon_text::{
    RenderItem, RenderOptions, SegmentStyle, convert_to_ansi, convert_to_native, render,
};

use crate::CommandProcessor;

const DEFAULT_MARKER: char = '&';
const DEFAULT_STYLE: ActiveStyle = ActiveStyle::new('x', 'b');
const SYSTEM_STYLE: StyleKey = StyleKey::new('c', 'b');
const ERROR_STYLE: StyleKey = StyleKey::new('r', 'b');

/// The styled-console core over an abstract buffer.
///
/// Owns the style state that persists across appends (the style cursor and
/// the SGR overlay), the live input region, and the submit history.
#[derive(Debug)]
pub struct Console {
    registry: StyleRegistry,
    controller: InputRegionController,
    history: HistoryRing,
    marker: char,
    default_style: ActiveStyle,
    system_style: StyleKey,
    error_style: StyleKey,
    current: ActiveStyle,
    ansi_overlay: Option<SgrAttributes>,
    ignore_input: bool,
    input_carry_over: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// A console over the stock palette, defaulting to gray-on-black.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: StyleRegistry::with_default_palette(),
            controller: InputRegionController::new(TextStyle::Key(DEFAULT_STYLE.key())),
            history: HistoryRing::new(),
            marker: DEFAULT_MARKER,
            default_style: DEFAULT_STYLE,
            system_style: SYSTEM_STYLE,
            error_style: ERROR_STYLE,
            current: DEFAULT_STYLE,
            ansi_overlay: None,
            ignore_input: false,
            input_carry_over: true,
        }
    }

    /// Process an output string: scan it, play the styled segments into the
    /// buffer, and open the input region it ends with.
    ///
    /// A live region is interrupted first (snapshotted when carry-over is
    /// on); if the stream carried no directive an infinite region opens at
    /// the buffer tail, unless input is being ignored. A carry-over snapshot
    /// matching the new region is replayed at the end.
    pub fn append<B: ConsoleBuffer>(&mut self, buf: &mut B, text: &str) -> Result<(), StyleError> {
        if self.controller.is_receiving() {
            if self.input_carry_over {
                self.controller.interrupt();
            } else {
                self.controller.reset();
            }
        }

        let pass = render(
            text,
            self.current,
            self.ansi_overlay,
            &self.registry,
            RenderOptions {
                marker: self.marker,
                default_style: self.default_style,
                input_enabled: !self.ignore_input,
            },
        );

        let mut had_directive = false;
        for item in &pass.items {
            match item {
                RenderItem::Text { content, style } => {
                    let style = match style {
                        SegmentStyle::Native(active) => {
                            self.registry.resolve(active.key())?;
                            TextStyle::Key(active.key())
                        }
                        SegmentStyle::Ansi(attrs) => TextStyle::Sgr(*attrs),
                    };
                    self.print(buf, content, style);
                }
                RenderItem::StartInput(directive) => {
                    had_directive = true;
                    self.controller.begin(*directive);
                    self.controller.set_range_start(buf.len());
                    let pads = self.controller.pad_run();
                    if !pads.is_empty() {
                        self.registry.resolve(self.default_style.key())?;
                        self.print(buf, &pads, TextStyle::Key(self.default_style.key()));
                    }
                }
            }
        }
        self.current = pass.style;
        self.ansi_overlay = pass.ansi;

        if !had_directive && !self.ignore_input {
            self.controller.begin_basic(buf.len());
        }

        if self.ignore_input {
            buf.set_caret(0);
        } else {
            buf.set_caret(self.controller.region_start().unwrap_or(buf.len()));
        }

        if self.input_carry_over && self.controller.has_stored_input() {
            let restored = self.controller.restore(buf);
            debug!(restored, "carry-over restore attempted");
        }
        Ok(())
    }

    /// Append `text` verbatim at the default style, no scanning.
    pub fn append_without_processing<B: ConsoleBuffer>(&mut self, buf: &mut B, text: &str) {
        self.print(buf, text, TextStyle::Key(self.default_style.key()));
        buf.set_caret(buf.len());
    }

    /// Append a raw message at the system style.
    pub fn append_system_message<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        text: &str,
    ) -> Result<(), StyleError> {
        self.registry.resolve(self.system_style)?;
        self.print(buf, text, TextStyle::Key(self.system_style));
        Ok(())
    }

    /// Append a raw message at the error style.
    pub fn append_error_message<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        text: &str,
    ) -> Result<(), StyleError> {
        self.registry.resolve(self.error_style)?;
        self.print(buf, text, TextStyle::Key(self.error_style));
        Ok(())
    }

    /// Close the live region and hand its trimmed text to `processor`, or
    /// echo it back when there is none. Unprotected submissions are pushed
    /// to history. Returns the submitted text, `None` when no region was
    /// live.
    pub fn submit_input<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        processor: Option<&mut dyn CommandProcessor>,
    ) -> Option<String> {
        let protected = self.controller.is_protected();
        let text = self.controller.submit()?;
        if !protected && !text.is_empty() {
            self.history.push(text.clone());
        }
        match processor {
            Some(processor) => processor.process_command(&text),
            None => self.append_without_processing(buf, &format!("{text}\n")),
        }
        Some(text)
    }

    /// Recall the previous history entry into the live infinite region,
    /// wrapping from the oldest entry back to the newest. An empty history
    /// clears the region instead.
    pub fn history_previous<B: ConsoleBuffer>(&mut self, buf: &mut B) {
        if self.controller.is_receiving() && self.controller.is_infinite() {
            let entry = self.history.prev().map(str::to_string).unwrap_or_default();
            self.controller.set_text(buf, &entry);
        }
    }

    /// Recall the next history entry into the live infinite region.
    pub fn history_next<B: ConsoleBuffer>(&mut self, buf: &mut B) {
        if self.controller.is_receiving() && self.controller.is_infinite() {
            let entry = self.history.next().map(str::to_string).unwrap_or_default();
            self.controller.set_text(buf, &entry);
        }
    }

    /// Mediate a host insert (typed text) through the region guards.
    pub fn insert<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        offset: usize,
        text: &str,
    ) -> EditOutcome {
        let style = TextStyle::Key(self.default_style.key());
        self.controller.insert(buf, offset, text, style)
    }

    /// Mediate a host replace through the region guards.
    pub fn replace<B: ConsoleBuffer>(
        &mut self,
        buf: &mut B,
        offset: usize,
        len: usize,
        text: &str,
    ) -> EditOutcome {
        let style = TextStyle::Key(self.default_style.key());
        self.controller.replace(buf, offset, len, text, style)
    }

    /// Mediate a host remove through the region guards.
    pub fn remove<B: ConsoleBuffer>(&mut self, buf: &mut B, offset: usize, len: usize) -> EditOutcome {
        self.controller.remove(buf, offset, len)
    }

    /// Pull a caret that wandered outside the live region back inside.
    pub fn clamp_caret<B: ConsoleBuffer>(&self, buf: &mut B) {
        let pos = buf.caret();
        if let Some(start) = self.controller.region_start() {
            if pos < start {
                buf.set_caret(start);
            } else if let Some(end) = self.controller.region_end()
                && pos > end
            {
                buf.set_caret(end);
            }
        }
    }

    /// Wipe the buffer and reset all scanning and input state.
    pub fn clear<B: ConsoleBuffer>(&mut self, buf: &mut B) {
        buf.remove(0, buf.len());
        buf.set_caret(0);
        self.controller.reset();
        self.current = self.default_style;
        self.ansi_overlay = None;
    }

    /// When set, appends skip directive scanning and guarded edits are
    /// silently dropped.
    pub fn set_ignore_input(&mut self, ignore: bool) {
        self.ignore_input = ignore;
        self.controller.set_ignore_input(ignore);
    }

    /// Rewrite every native style token in `text` as an SGR sequence.
    #[must_use]
    pub fn to_ansi(&self, text: &str) -> String {
        convert_to_ansi(text, self.marker, &self.registry)
    }

    /// Rewrite every SGR sequence in `text` as a native style token.
    #[must_use]
    pub fn to_native(&self, text: &str) -> String {
        convert_to_native(text, self.marker, &self.registry, self.default_style)
    }

    /// The style-token marker character.
    #[must_use]
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Change the style-token marker character.
    pub fn set_marker(&mut self, marker: char) {
        self.marker = marker;
    }

    /// Change the default style. Both codes must be registered.
    pub fn set_default_style(&mut self, fg: char, bg: char) -> Result<(), StyleError> {
        let style = ActiveStyle::new(fg, bg);
        self.registry.resolve(style.key())?;
        self.default_style = style;
        self.current = style;
        Ok(())
    }

    /// Change the system message style.
    pub fn set_system_style(&mut self, fg: char, bg: char) -> Result<(), StyleError> {
        let key = StyleKey::new(fg, bg);
        self.registry.resolve(key)?;
        self.system_style = key;
        Ok(())
    }

    /// Change the error message style.
    pub fn set_error_style(&mut self, fg: char, bg: char) -> Result<(), StyleError> {
        let key = StyleKey::new(fg, bg);
        self.registry.resolve(key)?;
        self.error_style = key;
        Ok(())
    }

    /// Change the style echoed input is written at.
    pub fn set_input_style(&mut self, fg: char, bg: char) -> Result<(), StyleError> {
        let key = StyleKey::new(fg, bg);
        self.registry.resolve(key)?;
        self.controller.set_input_style(TextStyle::Key(key));
        Ok(())
    }

    /// Change the protected-input mask character.
    pub fn set_mask_char(&mut self, mask: char) {
        self.controller.set_mask_char(mask);
    }

    /// Whether interrupted input is snapshotted and replayed across appends.
    pub fn set_input_carry_over(&mut self, carry_over: bool) {
        self.input_carry_over = carry_over;
    }

    /// The style registry.
    #[must_use]
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// The style registry, mutable.
    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    /// The input-region controller.
    #[must_use]
    pub fn input(&self) -> &InputRegionController {
        &self.controller
    }

    fn print<B: ConsoleBuffer>(&mut self, buf: &mut B, text: &str, style: TextStyle) {
        let bypassed = format!("{BYPASS_PREFIX}{text}");
        let at = buf.len();
        let outcome = self.controller.insert(buf, at, &bypassed, style);
        debug_assert!(outcome.is_applied());
    }
}
