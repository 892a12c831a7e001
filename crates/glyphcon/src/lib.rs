#![forbid(unsafe_code)]

//! Glyphcon is a terminal-like styled-text console core: a markup scanner
//! for inline style tokens and SGR escapes, a bidirectional native⇄ANSI
//! converter, and a guarded input-region state machine, all mediated over
//! an abstract styled text buffer supplied by the host.
//!
//! The host owns rendering and key dispatch; [`Console`] owns everything
//! between an output string and the styled edits that reach the buffer.
//!
//! ```
//! use glyphcon::{Console, MemoryBuffer};
//!
//! let mut console = Console::new();
//! let mut buf = MemoryBuffer::new();
//! console.append(&mut buf, "&rbError:&00 retry? %i3;").unwrap();
//! // The user may now type into the three-char window after "retry? ".
//! ```

pub mod console;

pub use console::Console;
pub use glyphcon_input::{
    BYPASS_PREFIX, ConsoleBuffer, EditOutcome, HistoryRing, InputDirective,
    InputRegionController, MemoryBuffer, RegionMode,
};
pub use glyphcon_style::{
    ActiveStyle, Rgb, SgrAttributes, StyleError, StyleKey, StyleRegistry, TextStyle,
};
pub use glyphcon_text::{RenderItem, RenderOptions, RenderPass, SegmentStyle, render};

/// The collaborator submitted input is dispatched to.
pub trait CommandProcessor {
    /// Handle one submitted command line (already trimmed).
    fn process_command(&mut self, text: &str);
}
