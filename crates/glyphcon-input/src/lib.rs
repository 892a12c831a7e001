#![forbid(unsafe_code)]

//! Input handling for Glyphcon.
//!
//! This crate owns the live input-region state machine and its supporting
//! pieces:
//! - [`ConsoleBuffer`] - the opaque styled-buffer collaborator every edit is
//!   mediated against (plus [`MemoryBuffer`], an in-memory implementation)
//! - [`InputLine`] - the spliceable logical content of a region
//! - [`InputDirective`] - the parsed `%i…;` directive grammar
//! - [`InputRegionController`] - the guarded state machine: ranged/infinite
//!   regions, masking, bypass channel, interrupt/restore snapshot
//! - [`HistoryRing`] - bounded recall of submitted inputs
//!
//! All rejected edits surface as [`EditOutcome::Rejected`] - a bell-style
//! signal, never an error.

pub mod buffer;
pub mod directive;
pub mod history;
pub mod line;
pub mod region;

pub use buffer::{ConsoleBuffer, MemoryBuffer};
pub use directive::{DirectiveError, InputDirective, RegionMode};
pub use history::HistoryRing;
pub use line::InputLine;
pub use region::{BYPASS_PREFIX, EditOutcome, InputRegionController};
