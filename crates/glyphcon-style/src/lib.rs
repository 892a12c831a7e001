#![forbid(unsafe_code)]

//! Style vocabulary for Glyphcon.
//!
//! This crate owns the color/style data model the rest of the console builds
//! on:
//! - [`Rgb`] and the fixed 8+8 SGR palette used for ANSI translation
//! - [`StyleRegistry`] - the set of (code char → color) mappings and the
//!   derived foreground×background style table
//! - [`ActiveStyle`] - the two-character style cursor mutated by markup
//!   tokens while scanning output
//! - [`TextStyle`] - the tag attached to every styled buffer write
//!
//! # Example
//! ```
//! use glyphcon_style::{ActiveStyle, Rgb, StyleRegistry};
//!
//! let mut registry = StyleRegistry::new();
//! registry.add('r', Rgb::new(255, 0, 0)).unwrap();
//! registry.add('b', Rgb::new(0, 0, 0)).unwrap();
//!
//! let style = registry.resolve(ActiveStyle::new('r', 'b').key()).unwrap();
//! assert_eq!(style.fg, Rgb::new(255, 0, 0));
//! ```

pub mod active;
pub mod color;
pub mod registry;

pub use active::{ActiveStyle, SgrAttributes, TextStyle};
pub use color::{
    INTENSE_PALETTE, NORMAL_PALETTE, Rgb, color_for_index, intense_index, normal_index,
};
pub use registry::{ResolvedStyle, StyleError, StyleKey, StyleRegistry};
