#![forbid(unsafe_code)]

//! Native style token ⇄ ANSI SGR translation.
//!
//! Conversion matches colors against the fixed 16-color palette *exactly*;
//! registered colors outside the palette drop out of the translation rather
//! than erroring. Only codes whose colors survive the palette search and a
//! registry reverse-lookup round-trip.

use glyphcon_style::{
    ActiveStyle, INTENSE_PALETTE, NORMAL_PALETTE, StyleRegistry, intense_index, normal_index,
};

const ESC: char = '\u{1b}';

/// The "revert to defaults" sequence emitted when neither channel maps.
const SGR_DEFAULTS: &str = "\u{1b}[39;49m";

/// Translate one native style pair to an SGR sequence.
///
/// Each channel independently: registry lookup, then palette identity search
/// (normal first, then intense), emitting `3{idx}`/`4{idx}` with a `1;`
/// prefix for intense hits. Channels that miss contribute nothing; if both
/// miss the result is the fixed default sequence.
pub fn native_to_ansi(fg: char, bg: char, registry: &StyleRegistry) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(part) = channel_code(fg, 3, registry) {
        parts.push(part);
    }
    if let Some(part) = channel_code(bg, 4, registry) {
        parts.push(part);
    }
    if parts.is_empty() {
        SGR_DEFAULTS.to_string()
    } else {
        format!("{ESC}[{}m", parts.join(";"))
    }
}

fn channel_code(code: char, base: u8, registry: &StyleRegistry) -> Option<String> {
    let color = registry.color_of(code)?;
    if let Some(idx) = normal_index(color) {
        Some(format!("{base}{idx}"))
    } else {
        intense_index(color).map(|idx| format!("1;{base}{idx}"))
    }
}

/// Translate one SGR body (the text between `ESC [` and `m`) to a native
/// style token, `marker` included.
///
/// Codes are applied in order; `1` brightens the next color code only, `0`
/// resets both channels to `default_style`, `39`/`49` revert one channel.
/// A palette color with no exact registry match leaves its channel as it
/// was (the default style's char).
pub fn ansi_to_native(
    body: &str,
    registry: &StyleRegistry,
    default_style: ActiveStyle,
    marker: char,
) -> String {
    let mut fg = default_style.fg;
    let mut bg = default_style.bg;
    let mut bright = false;
    for part in body.split(';') {
        let Ok(code) = part.parse::<u8>() else {
            continue;
        };
        match code {
            0 => {
                fg = default_style.fg;
                bg = default_style.bg;
                bright = false;
            }
            1 => bright = true,
            30..=37 => {
                if let Some(code) = palette_code((code - 30) as usize, bright, registry) {
                    fg = code;
                }
                bright = false;
            }
            39 => fg = default_style.fg,
            40..=47 => {
                if let Some(code) = palette_code((code - 40) as usize, bright, registry) {
                    bg = code;
                }
                bright = false;
            }
            49 => bg = default_style.bg,
            _ => {}
        }
    }
    format!("{marker}{fg}{bg}")
}

fn palette_code(idx: usize, bright: bool, registry: &StyleRegistry) -> Option<char> {
    let palette = if bright {
        &INTENSE_PALETTE
    } else {
        &NORMAL_PALETTE
    };
    registry.code_of(*palette.get(idx)?)
}

/// Rewrite every native style token in `text` as an SGR sequence.
///
/// Doubled markers stay doubled; a trailing bare marker stays literal.
pub fn convert_to_ansi(text: &str, marker: char, registry: &StyleRegistry) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == marker {
            if chars.get(i + 1) == Some(&marker) {
                out.push(marker);
                out.push(marker);
                i += 2;
                continue;
            }
            if i + 2 < chars.len() {
                out.push_str(&native_to_ansi(chars[i + 1], chars[i + 2], registry));
                i += 3;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Rewrite every SGR sequence in `text` as a native style token.
///
/// Sequences without a terminating `m` are left untouched.
pub fn convert_to_native(
    text: &str,
    marker: char,
    registry: &StyleRegistry,
    default_style: ActiveStyle,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ESC
            && chars.get(i + 1) == Some(&'[')
            && let Some(m) = chars[i + 2..].iter().position(|&c| c == 'm')
        {
            let body: String = chars[i + 2..i + 2 + m].iter().collect();
            out.push_str(&ansi_to_native(&body, registry, default_style, marker));
            i += 2 + m + 1;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcon_style::Rgb;
    use proptest::prelude::*;

    fn registry() -> StyleRegistry {
        let mut registry = StyleRegistry::new();
        registry.add('r', Rgb::new(255, 0, 0)).unwrap(); // intense red
        registry.add('l', Rgb::new(178, 0, 0)).unwrap(); // normal red
        registry.add('b', Rgb::new(0, 0, 0)).unwrap(); // normal black
        registry.add('x', Rgb::new(182, 182, 182)).unwrap(); // normal white
        registry.add('t', Rgb::new(0, 128, 128)).unwrap(); // off palette
        registry
    }

    const DEFAULT: ActiveStyle = ActiveStyle::new('x', 'b');

    #[test]
    fn normal_channels_translate_plainly() {
        assert_eq!(native_to_ansi('l', 'b', &registry()), "\u{1b}[31;40m");
    }

    #[test]
    fn intense_channel_gets_the_bright_prefix() {
        assert_eq!(native_to_ansi('r', 'b', &registry()), "\u{1b}[1;31;40m");
    }

    #[test]
    fn off_palette_channel_contributes_nothing() {
        assert_eq!(native_to_ansi('t', 'b', &registry()), "\u{1b}[40m");
    }

    #[test]
    fn unmatched_token_emits_the_default_sequence() {
        assert_eq!(native_to_ansi('t', 't', &registry()), "\u{1b}[39;49m");
        assert_eq!(native_to_ansi('?', '?', &registry()), "\u{1b}[39;49m");
    }

    #[test]
    fn sgr_to_native_resolves_registered_colors() {
        assert_eq!(ansi_to_native("31;40", &registry(), DEFAULT, '&'), "&lb");
        assert_eq!(ansi_to_native("1;31;40", &registry(), DEFAULT, '&'), "&rb");
    }

    #[test]
    fn bright_applies_to_the_next_color_only() {
        // 47 follows a consumed bright flag: normal white, not intense.
        assert_eq!(ansi_to_native("1;31;47", &registry(), DEFAULT, '&'), "&rx");
    }

    #[test]
    fn default_codes_revert_channels() {
        assert_eq!(ansi_to_native("39;49", &registry(), DEFAULT, '&'), "&xb");
        assert_eq!(ansi_to_native("31;0", &registry(), DEFAULT, '&'), "&xb");
    }

    #[test]
    fn unregistered_palette_color_leaves_the_channel() {
        // Intense green has no registry entry here.
        assert_eq!(ansi_to_native("1;32;40", &registry(), DEFAULT, '&'), "&xb");
    }

    #[test]
    fn convert_to_ansi_rewrites_tokens() {
        let out = convert_to_ansi("&lbwarning&&more", '&', &registry());
        assert_eq!(out, "\u{1b}[31;40mwarning&&more");
    }

    #[test]
    fn convert_to_ansi_leaves_trailing_marker() {
        assert_eq!(convert_to_ansi("end &l", '&', &registry()), "end &l");
    }

    #[test]
    fn convert_to_native_rewrites_sequences() {
        let out = convert_to_native("\u{1b}[1;31;40mwarning", '&', &registry(), DEFAULT);
        assert_eq!(out, "&rbwarning");
    }

    #[test]
    fn convert_to_native_skips_unterminated_sequences() {
        let text = "tail \u{1b}[31";
        assert_eq!(convert_to_native(text, '&', &registry(), DEFAULT), text);
    }

    proptest! {
        // ============================================================
        // Round trip over codes whose colors sit in the fixed palette
        // ============================================================

        #[test]
        fn palette_tokens_round_trip(
            fg in prop::sample::select(vec!['r', 'l', 'b', 'x']),
            bg in prop::sample::select(vec!['r', 'l', 'b', 'x']),
        ) {
            let registry = registry();
            let seq = native_to_ansi(fg, bg, &registry);
            let body = &seq[2..seq.len() - 1];
            let token = ansi_to_native(body, &registry, DEFAULT, '&');
            prop_assert_eq!(token, format!("&{fg}{bg}"));
        }
    }
}
