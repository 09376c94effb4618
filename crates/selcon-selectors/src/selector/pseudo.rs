//! Pseudo-class resolution.
//!
//! [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
//!
//! Every supported pseudo-class belongs to the "nth" family and resolves to a
//! single [`NthExpression`]. The name table is generated at compile time by
//! `strum` and never changes at run time.

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::NthExpression;
use crate::error::{Result, SelectorError};

/// The pseudo-class names the resolver recognizes (ASCII case-insensitive).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum NthPseudoClass {
    /// `:nth-child(An+B)`
    #[strum(serialize = "nth-child")]
    NthChild,
    /// `:nth-of-type(An+B)`
    #[strum(serialize = "nth-of-type")]
    NthOfType,
    /// `:nth-last-child(An+B)`
    #[strum(serialize = "nth-last-child")]
    NthLastChild,
    /// `:nth-last-of-type(An+B)`
    #[strum(serialize = "nth-last-of-type")]
    NthLastOfType,
    /// `:first-child`, the same as `:nth-child(1)`
    #[strum(serialize = "first-child")]
    FirstChild,
    /// `:first-of-type`, the same as `:nth-of-type(1)`
    #[strum(serialize = "first-of-type")]
    FirstOfType,
    /// `:last-child`, the same as `:nth-last-child(1)`
    #[strum(serialize = "last-child")]
    LastChild,
    /// `:last-of-type`, the same as `:nth-last-of-type(1)`
    #[strum(serialize = "last-of-type")]
    LastOfType,
}

impl NthPseudoClass {
    /// Counts from the end of the sibling list (`last-` in the name).
    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(
            self,
            Self::NthLastChild | Self::NthLastOfType | Self::LastChild | Self::LastOfType
        )
    }

    /// Counts among all siblings (`-child`) rather than same-type siblings (`-of-type`).
    #[must_use]
    pub const fn is_child(self) -> bool {
        matches!(
            self,
            Self::NthChild | Self::NthLastChild | Self::FirstChild | Self::LastChild
        )
    }

    /// Whether the pseudo-class is written with an `An+B` argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        matches!(
            self,
            Self::NthChild | Self::NthOfType | Self::NthLastChild | Self::NthLastOfType
        )
    }
}

/// Resolve `:name` or `:name(argument)` into an [`NthExpression`].
///
/// `source` is the text stored on the resulting node (marker included).
///
/// # Errors
///
/// [`SelectorError::Lookup`] for an unknown name, [`SelectorError::Syntax`]
/// for a malformed argument or an argument given to a fixed pseudo-class.
pub fn resolve_pseudo_class(
    name: &str,
    argument: Option<&str>,
    source: &str,
) -> Result<NthExpression> {
    let pseudo = NthPseudoClass::from_str(name).map_err(|_| SelectorError::Lookup {
        name: name.to_string(),
    })?;

    let (a, b) = match argument {
        Some(_) if !pseudo.takes_argument() => {
            return Err(SelectorError::syntax(
                source,
                "pseudo-class does not take an argument",
            ));
        }
        Some(argument) => parse_nth_argument(argument)?,
        // `:first-child` and friends, and an nth pseudo-class written bare
        None => (0, 1),
    };

    Ok(NthExpression {
        source: source.to_string(),
        pseudo,
        a,
        b,
    })
}

/// [§ 6.1 The An+B notation](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// Parse an `An+B` argument into `(a, b)`.
///
/// Accepts `even`, `odd`, a bare integer `B`, and `An`, `An+B`, `An-B` where
/// `A` may be omitted (`n`, `+n`, `-n`). Whitespace is allowed around the
/// sign that joins the two terms.
///
/// # Errors
///
/// [`SelectorError::Syntax`] if the argument does not match the grammar or
/// a number does not fit in an `i32`.
pub fn parse_nth_argument(argument: &str) -> Result<(i32, i32)> {
    let trimmed = argument.trim();
    if trimmed.eq_ignore_ascii_case("even") {
        return Ok((2, 0));
    }
    if trimmed.eq_ignore_ascii_case("odd") {
        return Ok((2, 1));
    }
    if trimmed.is_empty() {
        return Err(SelectorError::syntax(argument, "empty nth argument"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let Some(n_index) = lower.find('n') else {
        // a lone constant term
        let b = parse_signed_integer(&lower).ok_or_else(|| bad_nth(argument))?;
        return Ok((0, b));
    };

    let a = match &lower[..n_index] {
        "" | "+" => 1,
        "-" => -1,
        coefficient => parse_signed_integer(coefficient).ok_or_else(|| bad_nth(argument))?,
    };

    let rest = lower[n_index + 1..].trim_start();
    if rest.is_empty() {
        return Ok((a, 0));
    }
    let (negative, digits) = if let Some(digits) = rest.strip_prefix('+') {
        (false, digits.trim_start())
    } else if let Some(digits) = rest.strip_prefix('-') {
        (true, digits.trim_start())
    } else {
        return Err(bad_nth(argument));
    };
    let magnitude = parse_unsigned_integer(digits).ok_or_else(|| bad_nth(argument))?;
    let b = if negative { -magnitude } else { magnitude };
    Ok((a, b))
}

fn bad_nth(argument: &str) -> SelectorError {
    SelectorError::syntax(argument, "expected An+B, even, odd or an integer")
}

/// `[+-]?\d+`
fn parse_signed_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `\d+`
fn parse_unsigned_integer(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_keywords() {
        assert_eq!(parse_nth_argument("even"), Ok((2, 0)));
        assert_eq!(parse_nth_argument("odd"), Ok((2, 1)));
        assert_eq!(parse_nth_argument(" ODD "), Ok((2, 1)));
    }

    #[test]
    fn test_an_plus_b_forms() {
        assert_eq!(parse_nth_argument("3"), Ok((0, 3)));
        assert_eq!(parse_nth_argument("-3"), Ok((0, -3)));
        assert_eq!(parse_nth_argument("2n"), Ok((2, 0)));
        assert_eq!(parse_nth_argument("2n+1"), Ok((2, 1)));
        assert_eq!(parse_nth_argument("3n-1"), Ok((3, -1)));
        assert_eq!(parse_nth_argument("-3n-1"), Ok((-3, -1)));
        assert_eq!(parse_nth_argument("n"), Ok((1, 0)));
        assert_eq!(parse_nth_argument("-n+6"), Ok((-1, 6)));
        assert_eq!(parse_nth_argument("+n"), Ok((1, 0)));
        assert_eq!(parse_nth_argument("2n + 1"), Ok((2, 1)));
        assert_eq!(parse_nth_argument("2N-0"), Ok((2, 0)));
    }

    #[test]
    fn test_malformed_arguments() {
        for bad in ["", "  ", "2 n", "n+", "n1", "2n++1", "abc", "n-n", "1.5", "99999999999"] {
            assert!(
                matches!(parse_nth_argument(bad), Err(SelectorError::Syntax { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_flags_follow_the_name() {
        for pseudo in NthPseudoClass::iter() {
            let name: &'static str = pseudo.into();
            assert_eq!(pseudo.is_last(), name.contains("last-"), "{name}");
            assert_eq!(pseudo.is_child(), name.ends_with("-child"), "{name}");
            assert_eq!(pseudo.to_string(), name);
        }
    }

    #[test]
    fn test_resolve_fixed_and_parametrised() {
        let first = resolve_pseudo_class("first-child", None, ":first-child").unwrap();
        assert_eq!((first.a(), first.b()), (0, 1));
        assert!(first.child() && !first.last());

        let last = resolve_pseudo_class("Last-Of-Type", None, ":Last-Of-Type").unwrap();
        assert!(!last.child() && last.last());

        let odd = resolve_pseudo_class("nth-child", Some("odd"), ":nth-child(odd)").unwrap();
        assert_eq!((odd.a(), odd.b()), (2, 1));

        let bare = resolve_pseudo_class("nth-of-type", None, ":nth-of-type").unwrap();
        assert_eq!((bare.a(), bare.b()), (0, 1));
    }

    #[test]
    fn test_resolve_errors() {
        assert_eq!(
            resolve_pseudo_class("hover", None, ":hover"),
            Err(SelectorError::Lookup {
                name: "hover".to_string()
            })
        );
        assert!(matches!(
            resolve_pseudo_class("first-child", Some("2"), ":first-child(2)"),
            Err(SelectorError::Syntax { .. })
        ));
    }
}
