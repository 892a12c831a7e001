#![forbid(unsafe_code)]

//! The style registry: code↔color mappings and the derived style table.
//!
//! Every registered code pairs with every other registered code (and itself)
//! to form a renderable [`StyleKey`]. The derived table grows on `add` and is
//! purged on `remove`, so `resolve` failing for a key built from two
//! registered codes indicates a broken invariant, not bad input.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::color::{INTENSE_PALETTE, NORMAL_PALETTE, Rgb};

/// Codes that the markup language reserves and that can never name a color.
///
/// `'0'` resets to the default style; `'-'` inherits a channel.
pub const RESERVED_CODES: [char; 2] = ['0', '-'];

/// Ordered pair of style codes: the canonical identity of a renderable style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    /// Foreground code character.
    pub fg: char,
    /// Background code character.
    pub bg: char,
}

impl StyleKey {
    /// Create a key from foreground and background codes.
    #[must_use]
    pub const fn new(fg: char, bg: char) -> Self {
        Self { fg, bg }
    }
}

impl std::fmt::Display for StyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.fg, self.bg)
    }
}

/// Concrete colors a [`StyleKey`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// A reserved code character was used to name a color.
    InvalidCode(char),
    /// An operation referenced a code that is not registered.
    UnknownCode(char),
    /// An operation referenced a color no registered code maps to.
    UnknownColor(Rgb),
    /// A style key built from unregistered codes was resolved.
    ///
    /// Unreachable when callers follow the add protocol; treat as fatal.
    Unresolved(StyleKey),
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCode(code) => {
                write!(f, "style code '{code}' is reserved and cannot be used")
            }
            Self::UnknownCode(code) => write!(f, "no color registered for code '{code}'"),
            Self::UnknownColor(color) => write!(f, "no code registered for color {color}"),
            Self::Unresolved(key) => write!(f, "style key '{key}' has no registered style"),
        }
    }
}

impl std::error::Error for StyleError {}

/// The set of defined (code → color) mappings plus the derived style table.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    entries: BTreeMap<char, Rgb>,
    styles: FxHashMap<StyleKey, ResolvedStyle>,
}

impl StyleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the stock console palette.
    ///
    /// Lowercase codes are the intense variants, uppercase the normal
    /// (darker) ones; `b`/`w` are black and white with no dark twin, and
    /// `o`/`p`/`d` are orange/purple/gold extras outside the SGR palette.
    #[must_use]
    pub fn with_default_palette() -> Self {
        let mut registry = Self::new();
        let stock: [(char, Rgb); 22] = [
            ('r', INTENSE_PALETTE[1]),
            ('R', NORMAL_PALETTE[1]),
            ('l', INTENSE_PALETTE[4]),
            ('L', NORMAL_PALETTE[4]),
            ('g', INTENSE_PALETTE[2]),
            ('G', NORMAL_PALETTE[2]),
            ('y', INTENSE_PALETTE[3]),
            ('Y', NORMAL_PALETTE[3]),
            ('x', NORMAL_PALETTE[7]),
            ('X', INTENSE_PALETTE[0]),
            ('c', INTENSE_PALETTE[6]),
            ('C', NORMAL_PALETTE[6]),
            ('m', INTENSE_PALETTE[5]),
            ('M', NORMAL_PALETTE[5]),
            ('o', Rgb::new(255, 200, 0)),
            ('O', Rgb::new(178, 140, 0)),
            ('p', Rgb::new(128, 0, 255)),
            ('P', Rgb::new(89, 0, 178)),
            ('d', Rgb::new(241, 234, 139)),
            ('D', Rgb::new(168, 163, 97)),
            ('b', NORMAL_PALETTE[0]),
            ('w', INTENSE_PALETTE[7]),
        ];
        for (code, color) in stock {
            // Stock codes are never reserved characters.
            let _ = registry.add(code, color);
        }
        registry
    }

    /// Register a color under `code` and derive the combined styles.
    ///
    /// Derives (new, existing) and (existing, new) keys for every existing
    /// entry plus the (new, new) self key. Re-adding an existing code
    /// overwrites its color and re-derives every affected key.
    pub fn add(&mut self, code: char, color: Rgb) -> Result<(), StyleError> {
        if RESERVED_CODES.contains(&code) {
            return Err(StyleError::InvalidCode(code));
        }
        self.entries.insert(code, color);
        for (&other, &other_color) in &self.entries {
            self.styles.insert(
                StyleKey::new(code, other),
                ResolvedStyle {
                    fg: color,
                    bg: other_color,
                },
            );
            self.styles.insert(
                StyleKey::new(other, code),
                ResolvedStyle {
                    fg: other_color,
                    bg: color,
                },
            );
        }
        Ok(())
    }

    /// Remove `code` and every derived style it participates in.
    ///
    /// Returns `false` (and changes nothing) if the code is unknown.
    pub fn remove(&mut self, code: char) -> bool {
        if self.entries.remove(&code).is_none() {
            return false;
        }
        self.styles.remove(&StyleKey::new(code, code));
        let remaining: Vec<char> = self.entries.keys().copied().collect();
        for other in remaining {
            self.styles.remove(&StyleKey::new(code, other));
            self.styles.remove(&StyleKey::new(other, code));
        }
        true
    }

    /// Rebind an existing code to a new color.
    ///
    /// A failed remove aborts the operation; nothing is added.
    pub fn update_color(&mut self, code: char, new_color: Rgb) -> Result<(), StyleError> {
        if !self.remove(code) {
            return Err(StyleError::UnknownCode(code));
        }
        self.add(code, new_color)
    }

    /// Move the code that maps to `color` onto a new code character.
    ///
    /// A failed lookup or remove aborts the operation; nothing is added.
    pub fn update_code(&mut self, color: Rgb, new_code: char) -> Result<(), StyleError> {
        let old_code = self.code_of(color).ok_or(StyleError::UnknownColor(color))?;
        if !self.remove(old_code) {
            return Err(StyleError::UnknownCode(old_code));
        }
        self.add(new_code, color)
    }

    /// Canonical style lookup.
    ///
    /// Unresolved pairs indicate a broken invariant (a key built outside the
    /// add protocol) and the error should be treated as fatal.
    pub fn resolve(&self, key: StyleKey) -> Result<ResolvedStyle, StyleError> {
        self.styles
            .get(&key)
            .copied()
            .ok_or(StyleError::Unresolved(key))
    }

    /// Whether `code` is registered.
    #[must_use]
    pub fn contains(&self, code: char) -> bool {
        self.entries.contains_key(&code)
    }

    /// The color registered under `code`.
    #[must_use]
    pub fn color_of(&self, code: char) -> Option<Rgb> {
        self.entries.get(&code).copied()
    }

    /// The first code (in code order) whose color equals `color` exactly.
    #[must_use]
    pub fn code_of(&self, color: Rgb) -> Option<char> {
        self.entries
            .iter()
            .find(|&(_, &c)| c == color)
            .map(|(&code, _)| code)
    }

    /// Registered codes in deterministic (code) order.
    pub fn codes(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of derived style keys currently registered.
    #[must_use]
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLACK: Rgb = Rgb::new(0, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[test]
    fn reserved_codes_are_rejected() {
        let mut registry = StyleRegistry::new();
        assert_eq!(registry.add('0', RED), Err(StyleError::InvalidCode('0')));
        assert_eq!(registry.add('-', RED), Err(StyleError::InvalidCode('-')));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_derives_all_pair_keys() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        assert_eq!(registry.style_count(), 1); // (r,r)
        registry.add('b', BLACK).unwrap();
        // (r,r) (b,b) (r,b) (b,r)
        assert_eq!(registry.style_count(), 4);
        registry.add('w', WHITE).unwrap();
        assert_eq!(registry.style_count(), 9);

        let style = registry.resolve(StyleKey::new('r', 'b')).unwrap();
        assert_eq!(style, ResolvedStyle { fg: RED, bg: BLACK });
    }

    #[test]
    fn resolve_unknown_pair_is_fatal_error() {
        let registry = StyleRegistry::new();
        let key = StyleKey::new('r', 'b');
        assert_eq!(registry.resolve(key), Err(StyleError::Unresolved(key)));
    }

    #[test]
    fn remove_purges_both_channels() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        registry.add('b', BLACK).unwrap();
        registry.add('w', WHITE).unwrap();

        assert!(registry.remove('b'));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.style_count(), 4);
        assert!(registry.resolve(StyleKey::new('r', 'b')).is_err());
        assert!(registry.resolve(StyleKey::new('b', 'w')).is_err());
        assert!(registry.resolve(StyleKey::new('r', 'w')).is_ok());
    }

    #[test]
    fn remove_unknown_code_is_noop() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        assert!(!registry.remove('z'));
        assert_eq!(registry.len(), 1);
    }

    // The reference implementation accepted a duplicate code and kept both
    // entries; we overwrite instead so a code has exactly one color.
    #[test]
    fn add_duplicate_code_overwrites_color() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        registry.add('b', BLACK).unwrap();
        registry.add('r', WHITE).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.color_of('r'), Some(WHITE));
        let style = registry.resolve(StyleKey::new('r', 'b')).unwrap();
        assert_eq!(style.fg, WHITE);
    }

    #[test]
    fn update_color_rebinds() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        registry.update_color('r', WHITE).unwrap();
        assert_eq!(registry.color_of('r'), Some(WHITE));
    }

    #[test]
    fn update_color_unknown_aborts() {
        let mut registry = StyleRegistry::new();
        assert_eq!(
            registry.update_color('r', WHITE),
            Err(StyleError::UnknownCode('r'))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn update_code_moves_entry() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        registry.update_code(RED, 'q').unwrap();
        assert!(!registry.contains('r'));
        assert_eq!(registry.color_of('q'), Some(RED));
    }

    #[test]
    fn update_code_unknown_color_aborts() {
        let mut registry = StyleRegistry::new();
        registry.add('r', RED).unwrap();
        assert_eq!(
            registry.update_code(WHITE, 'q'),
            Err(StyleError::UnknownColor(WHITE))
        );
        assert!(registry.contains('r'));
    }

    #[test]
    fn default_palette_registers_stock_codes() {
        let registry = StyleRegistry::with_default_palette();
        assert_eq!(registry.len(), 22);
        assert_eq!(registry.style_count(), 22 * 22);
        for code in ['r', 'R', 'x', 'X', 'b', 'w', 'o', 'P', 'd'] {
            assert!(registry.contains(code), "missing stock code {code}");
        }
        // Spot-check a derived pair used by the default console style.
        assert!(registry.resolve(StyleKey::new('x', 'b')).is_ok());
    }

    #[test]
    fn codes_iterate_in_order() {
        let mut registry = StyleRegistry::new();
        registry.add('z', RED).unwrap();
        registry.add('a', BLACK).unwrap();
        registry.add('m', WHITE).unwrap();
        let codes: Vec<char> = registry.codes().collect();
        assert_eq!(codes, vec!['a', 'm', 'z']);
    }
}
