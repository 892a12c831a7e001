#![forbid(unsafe_code)]

//! The `%i…;` input-directive grammar.
//!
//! A directive opens an input region inside an append stream. The scanner
//! hands this module the body between `%i` and `;`:
//!
//! - digits give a ranged region of that width;
//! - an empty remainder gives an infinite region;
//! - a trailing `+` marks the region protected (echo masked), a trailing
//!   `-` marks it unprotected (the default).
//!
//! Anything else is malformed and rejects the whole directive.

use std::fmt;

/// How an input region occupies the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    /// A fixed-width window pre-filled with pad spaces.
    Ranged {
        /// Window width in chars.
        width: usize,
    },
    /// An unbounded region growing at the buffer tail.
    Infinite,
}

/// A parsed input directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDirective {
    /// Ranged or infinite.
    pub mode: RegionMode,
    /// Whether echoed input is masked.
    pub protected: bool,
}

impl InputDirective {
    /// Parse a directive body (the text between `%i` and `;`).
    pub fn parse(body: &str) -> Result<Self, DirectiveError> {
        if body.is_empty() {
            return Err(DirectiveError::EmptyBody);
        }
        let (spec, protected) = match body.as_bytes().last() {
            Some(b'+') => (&body[..body.len() - 1], true),
            Some(b'-') => (&body[..body.len() - 1], false),
            _ => (body, false),
        };
        let mode = if spec.is_empty() {
            RegionMode::Infinite
        } else if spec.bytes().all(|b| b.is_ascii_digit()) {
            let width = spec
                .parse()
                .map_err(|_| DirectiveError::WidthOverflow(spec.to_string()))?;
            RegionMode::Ranged { width }
        } else {
            return Err(DirectiveError::BadBody(body.to_string()));
        };
        Ok(Self { mode, protected })
    }
}

/// Why a directive body failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// `%i;` with nothing between marker and terminator.
    EmptyBody,
    /// The body is neither digits nor a bare protection flag.
    BadBody(String),
    /// The width does not fit a `usize`.
    WidthOverflow(String),
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "input directive has an empty body"),
            Self::BadBody(body) => write!(f, "malformed input directive body {body:?}"),
            Self::WidthOverflow(spec) => write!(f, "input region width {spec:?} is too large"),
        }
    }
}

impl std::error::Error for DirectiveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_give_a_ranged_region() {
        assert_eq!(
            InputDirective::parse("25"),
            Ok(InputDirective {
                mode: RegionMode::Ranged { width: 25 },
                protected: false,
            })
        );
    }

    #[test]
    fn trailing_plus_marks_protected() {
        assert_eq!(
            InputDirective::parse("5+"),
            Ok(InputDirective {
                mode: RegionMode::Ranged { width: 5 },
                protected: true,
            })
        );
        assert_eq!(
            InputDirective::parse("+"),
            Ok(InputDirective {
                mode: RegionMode::Infinite,
                protected: true,
            })
        );
    }

    #[test]
    fn trailing_minus_is_explicit_unprotected() {
        assert_eq!(
            InputDirective::parse("12-"),
            Ok(InputDirective {
                mode: RegionMode::Ranged { width: 12 },
                protected: false,
            })
        );
        assert_eq!(
            InputDirective::parse("-"),
            Ok(InputDirective {
                mode: RegionMode::Infinite,
                protected: false,
            })
        );
    }

    #[test]
    fn empty_body_is_malformed() {
        assert_eq!(InputDirective::parse(""), Err(DirectiveError::EmptyBody));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            InputDirective::parse("abc"),
            Err(DirectiveError::BadBody(_))
        ));
        assert!(matches!(
            InputDirective::parse("5x+"),
            Err(DirectiveError::BadBody(_))
        ));
        assert!(matches!(
            InputDirective::parse("+5"),
            Err(DirectiveError::BadBody(_))
        ));
    }

    #[test]
    fn zero_width_parses() {
        assert_eq!(
            InputDirective::parse("0"),
            Ok(InputDirective {
                mode: RegionMode::Ranged { width: 0 },
                protected: false,
            })
        );
    }
}
