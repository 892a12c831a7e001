#![forbid(unsafe_code)]

//! The scanning style cursor and the styles carried by buffer writes.

use crate::color::Rgb;
use crate::registry::{StyleKey, StyleRegistry};

/// The "current style" cursor mutated by markup tokens while scanning.
///
/// Two code characters, foreground then background. Tokens mutate it
/// incrementally: either channel may inherit via `'-'`, and `'0'` in either
/// slot resets the whole cursor to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveStyle {
    /// Foreground code character.
    pub fg: char,
    /// Background code character.
    pub bg: char,
}

impl ActiveStyle {
    /// Create a style cursor from two code characters.
    #[must_use]
    pub const fn new(fg: char, bg: char) -> Self {
        Self { fg, bg }
    }

    /// The registry key this cursor currently names.
    #[must_use]
    pub const fn key(self) -> StyleKey {
        StyleKey::new(self.fg, self.bg)
    }

    /// Apply a two-character style token and return the resulting cursor.
    ///
    /// Rules, in order:
    /// - `'0'` in either slot resets to `default`;
    /// - `"--"` leaves the cursor unchanged;
    /// - a single `'-'` keeps that channel from the previous cursor;
    /// - otherwise both channels are taken verbatim.
    ///
    /// A channel whose candidate code is not registered falls back to the
    /// previous cursor's code for that channel.
    #[must_use]
    pub fn apply(self, token: [char; 2], default: Self, registry: &StyleRegistry) -> Self {
        let candidate = if token[0] == '0' || token[1] == '0' {
            default
        } else if token == ['-', '-'] {
            return self;
        } else if token[0] == '-' {
            Self::new(self.fg, token[1])
        } else if token[1] == '-' {
            Self::new(token[0], self.bg)
        } else {
            Self::new(token[0], token[1])
        };

        Self::new(
            if registry.contains(candidate.fg) {
                candidate.fg
            } else {
                self.fg
            },
            if registry.contains(candidate.bg) {
                candidate.bg
            } else {
                self.bg
            },
        )
    }
}

impl std::fmt::Display for ActiveStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.fg, self.bg)
    }
}

/// Rendering attributes accumulated from SGR escape sequences.
///
/// `None` in a channel means "use the console's default style color". Once
/// any SGR escape has been seen in a stream, the overlay styles subsequent
/// literal text until the caller discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SgrAttributes {
    /// Foreground override, if any.
    pub fg: Option<Rgb>,
    /// Background override, if any.
    pub bg: Option<Rgb>,
}

impl SgrAttributes {
    /// An overlay with no overrides (both channels default).
    #[must_use]
    pub const fn empty() -> Self {
        Self { fg: None, bg: None }
    }
}

/// The style tag attached to a buffer write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// A registered two-code style.
    Key(StyleKey),
    /// An SGR attribute overlay.
    Sgr(SgrAttributes),
}
