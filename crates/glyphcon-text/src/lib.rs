#![forbid(unsafe_code)]

//! Markup scanning and ANSI SGR translation for Glyphcon.
//!
//! [`render`] runs the single-pass scanner that turns an output string with
//! inline style tokens, SGR escapes, and input directives into styled
//! segments plus control items. The [`ansi`] module converts native style
//! tokens to and from SGR sequences over the fixed 16-color palette.

pub mod ansi;
pub mod scanner;

pub use ansi::{ansi_to_native, convert_to_ansi, convert_to_native, native_to_ansi};
pub use scanner::{RenderItem, RenderOptions, RenderPass, SegmentStyle, render};
