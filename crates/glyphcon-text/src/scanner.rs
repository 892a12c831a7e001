#![forbid(unsafe_code)]

//! The single-pass markup scanner.
//!
//! One left-to-right pass over an output string, one lookahead char at a
//! time. Four token families, checked in precedence order at each position:
//!
//! 1. a doubled marker is one literal marker;
//! 2. marker plus two chars is a style token (a trailing bare marker is
//!    literal);
//! 3. `ESC [ … m` folds into the SGR attribute overlay; an escape with no
//!    terminating `m` is literal;
//! 4. while input insertion is enabled, `%%` is a literal percent and
//!    `%i…;` opens an input region.
//!
//! Everything else is literal text, flushed as styled segments.

use smallvec::SmallVec;
use tracing::debug;

use glyphcon_input::InputDirective;
use glyphcon_style::{ActiveStyle, SgrAttributes, StyleRegistry, color_for_index};

const ESC: char = '\u{1b}';

/// Per-call scanner configuration.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// The style-token marker character.
    pub marker: char,
    /// The style `'0'` resets to.
    pub default_style: ActiveStyle,
    /// Whether `%` directives are recognized in this call.
    pub input_enabled: bool,
}

/// How a literal segment is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// A registered two-code style.
    Native(ActiveStyle),
    /// The SGR attribute overlay active since the last escape.
    Ansi(SgrAttributes),
}

/// One item of scanner output, in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderItem {
    /// A run of literal text.
    Text {
        /// The literal characters.
        content: String,
        /// The style active while they were scanned.
        style: SegmentStyle,
    },
    /// An input region opens here.
    StartInput(InputDirective),
}

/// The result of one scanner pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    /// Styled segments and control items, in order.
    pub items: SmallVec<[RenderItem; 4]>,
    /// The style cursor after the pass; feed it to the next call.
    pub style: ActiveStyle,
    /// The SGR overlay after the pass, if any escape was seen.
    pub ansi: Option<SgrAttributes>,
}

struct Scanner<'a> {
    registry: &'a StyleRegistry,
    options: RenderOptions,
    style: ActiveStyle,
    ansi: Option<SgrAttributes>,
    literal: String,
    items: SmallVec<[RenderItem; 4]>,
}

impl Scanner<'_> {
    fn flush(&mut self) {
        if self.literal.is_empty() {
            return;
        }
        let style = match self.ansi {
            Some(attrs) => SegmentStyle::Ansi(attrs),
            None => SegmentStyle::Native(self.style),
        };
        self.items.push(RenderItem::Text {
            content: std::mem::take(&mut self.literal),
            style,
        });
    }
}

/// Scan `text`, starting from the caller's style cursor and SGR overlay.
pub fn render(
    text: &str,
    current_style: ActiveStyle,
    current_ansi: Option<SgrAttributes>,
    registry: &StyleRegistry,
    options: RenderOptions,
) -> RenderPass {
    let chars: Vec<char> = text.chars().collect();
    let mut s = Scanner {
        registry,
        options,
        style: current_style,
        ansi: current_ansi,
        literal: String::new(),
        items: SmallVec::new(),
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c == s.options.marker {
            if chars.get(i + 1) == Some(&s.options.marker) {
                s.literal.push(c);
                i += 2;
                continue;
            }
            if i + 2 < chars.len() {
                s.flush();
                s.style = s.style.apply(
                    [chars[i + 1], chars[i + 2]],
                    s.options.default_style,
                    s.registry,
                );
                i += 3;
                continue;
            }
            s.literal.push(c);
            i += 1;
            continue;
        }

        if c == ESC && chars.get(i + 1) == Some(&'[') {
            if let Some(m) = chars[i + 2..].iter().position(|&c| c == 'm') {
                s.flush();
                let body: String = chars[i + 2..i + 2 + m].iter().collect();
                s.ansi = Some(fold_sgr(s.ansi.unwrap_or_default(), &body));
                i += 2 + m + 1;
                continue;
            }
            s.literal.push(c);
            i += 1;
            continue;
        }

        if c == '%' && s.options.input_enabled {
            if chars.get(i + 1) == Some(&'%') {
                s.literal.push('%');
                i += 2;
                continue;
            }
            if chars.get(i + 1) == Some(&'i')
                && let Some(t) = chars[i + 2..].iter().position(|&c| c == ';')
            {
                let body: String = chars[i + 2..i + 2 + t].iter().collect();
                match InputDirective::parse(&body) {
                    Ok(directive) => {
                        s.flush();
                        s.items.push(RenderItem::StartInput(directive));
                        if directive.mode == glyphcon_input::RegionMode::Infinite {
                            // Everything after an infinite directive belongs
                            // to the region; drop it from the output.
                            break;
                        }
                        i += 2 + t + 1;
                        continue;
                    }
                    Err(err) => {
                        debug!(%err, "directive fallback to literal text");
                        s.literal.extend(&chars[i..]);
                        break;
                    }
                }
            }
            s.literal.push('%');
            i += 1;
            continue;
        }

        s.literal.push(c);
        i += 1;
    }

    s.flush();
    RenderPass {
        items: s.items,
        style: s.style,
        ansi: s.ansi,
    }
}

/// Fold one SGR body (the text between `ESC [` and `m`) into an overlay.
pub fn fold_sgr(mut attrs: SgrAttributes, body: &str) -> SgrAttributes {
    let mut bright = false;
    for part in body.split(';') {
        let Ok(code) = part.parse::<u8>() else {
            continue;
        };
        match code {
            0 => {
                attrs = SgrAttributes::empty();
                bright = false;
            }
            1 => bright = true,
            30..=37 => {
                attrs.fg = color_for_index((code - 30) as usize, bright);
                bright = false;
            }
            39 => attrs.fg = None,
            40..=47 => {
                attrs.bg = color_for_index((code - 40) as usize, bright);
                bright = false;
            }
            49 => attrs.bg = None,
            _ => {}
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcon_input::RegionMode;
    use glyphcon_style::{INTENSE_PALETTE, NORMAL_PALETTE, Rgb};

    fn registry() -> StyleRegistry {
        let mut registry = StyleRegistry::new();
        registry.add('r', Rgb::new(255, 0, 0)).unwrap();
        registry.add('b', Rgb::new(0, 0, 0)).unwrap();
        registry.add('x', Rgb::new(182, 182, 182)).unwrap();
        registry
    }

    fn options() -> RenderOptions {
        RenderOptions {
            marker: '&',
            default_style: ActiveStyle::new('x', 'b'),
            input_enabled: true,
        }
    }

    fn render_str(text: &str) -> RenderPass {
        let opts = options();
        render(text, opts.default_style, None, &registry(), opts)
    }

    fn texts(pass: &RenderPass) -> Vec<(String, SegmentStyle)> {
        pass.items
            .iter()
            .filter_map(|item| match item {
                RenderItem::Text { content, style } => Some((content.clone(), *style)),
                RenderItem::StartInput(_) => None,
            })
            .collect()
    }

    #[test]
    fn plain_text_is_one_segment() {
        let pass = render_str("hello");
        assert_eq!(
            texts(&pass),
            vec![(
                "hello".to_string(),
                SegmentStyle::Native(ActiveStyle::new('x', 'b'))
            )]
        );
    }

    #[test]
    fn doubled_marker_is_one_literal() {
        let pass = render_str("a && b");
        assert_eq!(texts(&pass)[0].0, "a & b");
        assert_eq!(pass.style, ActiveStyle::new('x', 'b'));
    }

    #[test]
    fn doubled_percent_is_one_literal() {
        let pass = render_str("100%%");
        assert_eq!(texts(&pass)[0].0, "100%");
        assert!(pass.items.len() == 1);
    }

    #[test]
    fn style_token_splits_segments() {
        let pass = render_str("&rbHello&00");
        assert_eq!(
            texts(&pass),
            vec![(
                "Hello".to_string(),
                SegmentStyle::Native(ActiveStyle::new('r', 'b'))
            )]
        );
        assert_eq!(pass.style, ActiveStyle::new('x', 'b'));
    }

    #[test]
    fn trailing_bare_marker_is_literal() {
        let pass = render_str("end &r");
        assert_eq!(texts(&pass)[0].0, "end &r");
    }

    #[test]
    fn unknown_code_falls_back_per_channel() {
        let pass = render_str("&zr text");
        assert_eq!(
            texts(&pass)[0].1,
            SegmentStyle::Native(ActiveStyle::new('x', 'r'))
        );
    }

    #[test]
    fn sgr_escape_starts_the_overlay() {
        let pass = render_str("a\u{1b}[31mred");
        let segs = texts(&pass);
        assert_eq!(segs[0].0, "a");
        assert_eq!(
            segs[1],
            (
                "red".to_string(),
                SegmentStyle::Ansi(SgrAttributes {
                    fg: Some(NORMAL_PALETTE[1]),
                    bg: None,
                })
            )
        );
        assert!(pass.ansi.is_some());
    }

    #[test]
    fn unterminated_escape_is_literal() {
        let pass = render_str("a\u{1b}[31");
        assert_eq!(texts(&pass)[0].0, "a\u{1b}[31");
        assert!(pass.ansi.is_none());
    }

    #[test]
    fn ranged_directive_keeps_scanning() {
        let pass = render_str("name: %i5;!");
        assert_eq!(pass.items.len(), 3);
        assert_eq!(
            pass.items[1],
            RenderItem::StartInput(InputDirective {
                mode: RegionMode::Ranged { width: 5 },
                protected: false,
            })
        );
        assert_eq!(texts(&pass)[1].0, "!");
    }

    #[test]
    fn infinite_directive_consumes_the_remainder() {
        let pass = render_str("> %i-;this text is dropped");
        assert_eq!(pass.items.len(), 2);
        assert_eq!(
            pass.items[1],
            RenderItem::StartInput(InputDirective {
                mode: RegionMode::Infinite,
                protected: false,
            })
        );
    }

    #[test]
    fn malformed_directive_falls_back_to_literal() {
        let pass = render_str("a %ix5; b %i3;");
        assert_eq!(texts(&pass), vec![(
            "a %ix5; b %i3;".to_string(),
            SegmentStyle::Native(ActiveStyle::new('x', 'b'))
        )]);
    }

    #[test]
    fn empty_directive_body_is_literal() {
        let pass = render_str("> %i; tail");
        assert_eq!(texts(&pass)[0].0, "> %i; tail");
        assert!(pass.items.len() == 1);
    }

    #[test]
    fn directive_without_terminator_is_literal() {
        let pass = render_str("50%i discount");
        assert_eq!(texts(&pass)[0].0, "50%i discount");
    }

    #[test]
    fn directives_are_ignored_when_input_disabled() {
        let opts = RenderOptions {
            input_enabled: false,
            ..options()
        };
        let pass = render(
            "> %i5;",
            opts.default_style,
            None,
            &registry(),
            opts,
        );
        assert_eq!(texts(&pass)[0].0, "> %i5;");
    }

    #[test]
    fn fold_sgr_reset_clears_the_overlay() {
        let attrs = fold_sgr(SgrAttributes::empty(), "1;31;44");
        assert_eq!(attrs.fg, Some(INTENSE_PALETTE[1]));
        assert_eq!(attrs.bg, Some(NORMAL_PALETTE[4]));
        let attrs = fold_sgr(attrs, "0");
        assert_eq!(attrs, SgrAttributes::empty());
    }

    #[test]
    fn fold_sgr_bright_is_consumed_by_first_color() {
        let attrs = fold_sgr(SgrAttributes::empty(), "1;31;42");
        assert_eq!(attrs.fg, Some(INTENSE_PALETTE[1]));
        assert_eq!(attrs.bg, Some(NORMAL_PALETTE[2]));
    }

    #[test]
    fn fold_sgr_default_codes_clear_channels() {
        let attrs = fold_sgr(fold_sgr(SgrAttributes::empty(), "31;41"), "39;49");
        assert_eq!(attrs, SgrAttributes::empty());
    }

    #[test]
    fn style_cursor_carries_across_calls() {
        let opts = options();
        let registry = registry();
        let pass = render("&r-warm", opts.default_style, None, &registry, opts);
        assert_eq!(pass.style, ActiveStyle::new('r', 'b'));
        let pass = render("still warm", pass.style, pass.ansi, &registry, opts);
        assert_eq!(
            texts(&pass)[0].1,
            SegmentStyle::Native(ActiveStyle::new('r', 'b'))
        );
    }
}
