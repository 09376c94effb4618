//! Selector parsing.
//!
//! [§ 4 Selector syntax and structure](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! ```text
//! SelectorList     → ComplexSelector ( "," ComplexSelector )*
//! ComplexSelector  → CompoundSelector ( Combinator CompoundSelector )*
//! CompoundSelector → ElementalSelector SimpleSelector*
//! SimpleSelector   → "#" id | "." class | "[" attribute "]" | ":" pseudo-class
//! ```
//!
//! The `parse_*_selector` functions take text that has already been through
//! [`crate::escape::normalize`]; [`parse_selector`] and [`parse_selector_with`]
//! normalize first. Normalization happens exactly once, at that entry point.
//!
//! Separators (`,`, combinators, markers) are only recognized at the top
//! level: inside `[...]`, `(...)` and quoted attribute values they are plain
//! characters, which is what lets `:nth-child(2n+1)` and `[class~=nav]` parse.

use super::pseudo::resolve_pseudo_class;
use super::{
    AttrOperator, AttributeSelector, ClassSelector, Combinator, ComplexSelector, CompoundSelector,
    ElementalSelector, IdSelector, NthExpression, Selector, SelectorList, SimpleSelector,
};
use crate::error::{Result, SelectorError};
use crate::escape::normalize;
use crate::options::ParseOptions;

/// Parse a raw selector string with the default [`ParseOptions`].
///
/// # Errors
///
/// See [`parse_selector_with`].
pub fn parse_selector(raw: &str) -> Result<Selector> {
    parse_selector_with(raw, &ParseOptions::default())
}

/// Normalize and parse a raw selector string.
///
/// Returns [`Selector::Complex`] when the list has a single branch and
/// [`Selector::List`] otherwise.
///
/// # Errors
///
/// - [`SelectorError::Syntax`] for malformed text
/// - [`SelectorError::Lookup`] for an unknown pseudo-class
/// - [`SelectorError::LimitExceeded`] when `options` are exceeded
pub fn parse_selector_with(raw: &str, options: &ParseOptions) -> Result<Selector> {
    let text = prepare(raw, options)?;
    let SelectorList {
        source,
        mut branches,
    } = parse_selector_list(&text, options)?;

    if branches.len() == 1 {
        Ok(Selector::Complex(branches.remove(0)))
    } else {
        Ok(Selector::List(SelectorList { source, branches }))
    }
}

/// Normalize `raw` and check it against the length limit.
///
/// # Errors
///
/// [`SelectorError::LimitExceeded`] if the normalized text is too long.
pub fn prepare(raw: &str, options: &ParseOptions) -> Result<String> {
    let text = normalize(raw);
    if text.len() > options.max_len {
        return Err(SelectorError::LimitExceeded {
            what: "selector length",
            limit: options.max_len,
        });
    }
    Ok(text)
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// Parse normalized text as a comma-separated list.
///
/// # Errors
///
/// Fails if any branch fails to parse.
pub fn parse_selector_list(text: &str, options: &ParseOptions) -> Result<SelectorList> {
    let branches = split_top_level(text, ',')
        .into_iter()
        .map(|branch| parse_complex_selector(branch, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(SelectorList {
        source: text.trim().to_string(),
        branches,
    })
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Parse normalized text as one combinator chain.
///
/// `>`, `+` and `~` (with optional whitespace around them) are explicit
/// combinators; whitespace anywhere else is the descendant combinator.
///
/// # Errors
///
/// [`SelectorError::Syntax`] for an empty branch, a combinator with nothing
/// on one side, two combinators in a row or unbalanced brackets;
/// [`SelectorError::LimitExceeded`] for too many compounds; any error from
/// [`parse_compound_selector`].
pub fn parse_complex_selector(text: &str, options: &ParseOptions) -> Result<ComplexSelector> {
    let branch = text.trim();
    if branch.is_empty() {
        return Err(SelectorError::syntax(text, "empty selector"));
    }

    // Collected left to right as byte ranges into `branch`. For "A > B C"
    // compounds is [A, B, C] and combinators is [Child, Descendant].
    let mut compounds: Vec<(usize, usize)> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();

    let mut current_start: Option<usize> = None;
    let mut pending: Option<Combinator> = None;
    let mut nesting = Nesting::default();

    let too_many = || SelectorError::LimitExceeded {
        what: "compound selectors in one complex selector",
        limit: options.max_compounds,
    };

    for (i, c) in branch.char_indices() {
        let top_level = nesting.is_top_level();
        nesting.advance(c);

        if top_level && c.is_whitespace() {
            // [§ 16.1 Descendant combinator] unless an explicit one follows
            if let Some(start) = current_start.take() {
                compounds.push((start, i));
                pending = Some(Combinator::Descendant);
            }
            continue;
        }

        if top_level && matches!(c, '>' | '+' | '~') {
            let explicit = match c {
                '>' => Combinator::Child,
                '+' => Combinator::NextSibling,
                _ => Combinator::SubsequentSibling,
            };
            if let Some(start) = current_start.take() {
                compounds.push((start, i));
            } else if pending != Some(Combinator::Descendant) {
                let reason = if pending.is_some() {
                    "two combinators in a row"
                } else {
                    "combinator without a left-hand selector"
                };
                return Err(SelectorError::syntax(branch, reason));
            }
            pending = Some(explicit);
            continue;
        }

        if current_start.is_none() {
            if let Some(combinator) = pending.take() {
                combinators.push(combinator);
            }
            if compounds.len() >= options.max_compounds {
                return Err(too_many());
            }
            current_start = Some(i);
        }
    }

    if let Some(error) = nesting.unbalanced(branch) {
        return Err(error);
    }
    let Some(start) = current_start else {
        return Err(SelectorError::syntax(branch, "selector ends with a combinator"));
    };
    compounds.push((start, branch.len()));

    // Build right-to-left: each new compound becomes the subject and the
    // chain so far becomes its left-hand continuation.
    let mut ranges = compounds.into_iter();
    let Some((start, end)) = ranges.next() else {
        return Err(SelectorError::syntax(branch, "empty selector"));
    };
    let mut chain = ComplexSelector {
        source: branch[start..end].to_string(),
        subject: parse_compound_selector(&branch[start..end])?,
        left: None,
    };
    for (combinator, (start, end)) in combinators.into_iter().zip(ranges) {
        chain = ComplexSelector {
            source: branch[..end].to_string(),
            subject: parse_compound_selector(&branch[start..end])?,
            left: Some((combinator, Box::new(chain))),
        };
    }

    Ok(chain)
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// Parse normalized text as a single compound selector. The text is split at
/// the markers `#`, `.`, `:` and `[`; whatever precedes the first marker is
/// the type selector (`*` when empty).
///
/// # Errors
///
/// [`SelectorError::Syntax`] if the text holds a combinator, comma or
/// whitespace, or any part is malformed; [`SelectorError::Lookup`] for an
/// unknown pseudo-class.
pub fn parse_compound_selector(text: &str) -> Result<CompoundSelector> {
    if text.is_empty() {
        return Err(SelectorError::syntax(text, "empty compound selector"));
    }

    let mut markers: Vec<(usize, char)> = Vec::new();
    let mut nesting = Nesting::default();
    for (i, c) in text.char_indices() {
        let top_level = nesting.is_top_level();
        nesting.advance(c);
        if !top_level {
            continue;
        }
        if c.is_whitespace() || matches!(c, ',' | '>' | '+' | '~') {
            return Err(SelectorError::syntax(
                text,
                "combinator or comma inside a compound selector",
            ));
        }
        if matches!(c, '#' | '.' | ':' | '[') {
            markers.push((i, c));
        }
    }
    if let Some(error) = nesting.unbalanced(text) {
        return Err(error);
    }

    let head_end = markers.first().map_or(text.len(), |&(i, _)| i);
    let elemental = parse_elemental_selector(&text[..head_end])?;

    let mut simple_selectors = Vec::with_capacity(markers.len());
    for (k, &(start, marker)) in markers.iter().enumerate() {
        let end = markers.get(k + 1).map_or(text.len(), |&(i, _)| i);
        // markers are all one byte wide
        let body = &text[start + 1..end];
        simple_selectors.push(parse_simple_selector(marker, body, &text[start..end])?);
    }

    Ok(CompoundSelector {
        source: text.to_string(),
        elemental,
        simple_selectors,
    })
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
fn parse_elemental_selector(text: &str) -> Result<ElementalSelector> {
    let name = match text {
        "" | "*" => "*",
        name if is_name(name) => name,
        _ => return Err(SelectorError::syntax(text, "invalid type selector")),
    };
    Ok(ElementalSelector {
        source: text.to_string(),
        name: name.to_string(),
    })
}

/// Build the simple selector introduced by `marker`. `source` is the marker
/// plus its body.
fn parse_simple_selector(marker: char, body: &str, source: &str) -> Result<SimpleSelector> {
    match marker {
        '#' => {
            if !is_name(body) {
                return Err(SelectorError::syntax(source, "invalid id selector"));
            }
            Ok(SimpleSelector::Id(IdSelector {
                source: source.to_string(),
                id: body.to_string(),
            }))
        }
        '.' => {
            if !is_name(body) {
                return Err(SelectorError::syntax(source, "invalid class selector"));
            }
            Ok(SimpleSelector::Class(ClassSelector {
                source: source.to_string(),
                class: body.to_string(),
            }))
        }
        '[' => {
            let Some(inner) = body.strip_suffix(']') else {
                return Err(SelectorError::syntax(
                    source,
                    "attribute selector must close with `]`",
                ));
            };
            parse_attribute_selector(inner, source).map(SimpleSelector::Attribute)
        }
        _ => parse_pseudo_class(body, source).map(SimpleSelector::PseudoClass),
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// `inner` is the text between the brackets:
/// `attr (operator ("'|\")? value ("'|\")?)?`
fn parse_attribute_selector(inner: &str, source: &str) -> Result<AttributeSelector> {
    let Some(eq) = inner.find('=') else {
        let attr = inner.trim();
        if !is_name(attr) {
            return Err(SelectorError::syntax(source, "invalid attribute name"));
        }
        return Ok(AttributeSelector {
            source: source.to_string(),
            attr: attr.to_string(),
            matcher: None,
        });
    };

    // The operator is taken eagerly: a `~|^$*` right before `=` belongs to it.
    let (name, op) = match inner[..eq].chars().next_back() {
        Some('~') => (&inner[..eq - 1], AttrOperator::Includes),
        Some('|') => (&inner[..eq - 1], AttrOperator::DashMatch),
        Some('^') => (&inner[..eq - 1], AttrOperator::Prefix),
        Some('$') => (&inner[..eq - 1], AttrOperator::Suffix),
        Some('*') => (&inner[..eq - 1], AttrOperator::Substring),
        _ => (&inner[..eq], AttrOperator::Equals),
    };
    let attr = name.trim();
    if !is_name(attr) {
        return Err(SelectorError::syntax(source, "invalid attribute name"));
    }
    let value = parse_attribute_value(inner[eq + 1..].trim(), source)?;

    Ok(AttributeSelector {
        source: source.to_string(),
        attr: attr.to_string(),
        matcher: Some((op, value)),
    })
}

/// Quotes are optional but must be symmetric.
fn parse_attribute_value(raw: &str, source: &str) -> Result<String> {
    if let Some(quote) = raw.chars().next().filter(|&c| c == '"' || c == '\'') {
        return raw[1..]
            .strip_suffix(quote)
            .filter(|value| !value.contains(quote))
            .map(str::to_string)
            .ok_or_else(|| SelectorError::syntax(source, "unterminated quoted value"));
    }
    if raw.is_empty() {
        return Err(SelectorError::syntax(source, "missing attribute value"));
    }
    if raw.ends_with(['"', '\'']) {
        return Err(SelectorError::syntax(source, "mismatched quotes"));
    }
    if raw.contains(char::is_whitespace) {
        return Err(SelectorError::syntax(
            source,
            "unquoted attribute value contains whitespace",
        ));
    }
    Ok(raw.to_string())
}

/// `name` or `name(argument)`, resolved through the pseudo-class registry.
fn parse_pseudo_class(body: &str, source: &str) -> Result<NthExpression> {
    let (name, argument) = match body.find('(') {
        Some(open) => {
            let Some(argument) = body[open + 1..].strip_suffix(')') else {
                return Err(SelectorError::syntax(source, "unbalanced parentheses"));
            };
            (&body[..open], Some(argument))
        }
        None => (body, None),
    };
    if name.is_empty() {
        return Err(SelectorError::syntax(source, "missing pseudo-class name"));
    }
    resolve_pseudo_class(name, argument, source)
}

/// A non-empty run of characters with no meaning in the grammar.
fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']'
                | '('
                | ')'
                | '"'
                | '\''
                | '='
                | '*'
                | '^'
                | '$'
                | '|'
                | '~'
                | '+'
                | '>'
                | ','
                | '#'
                | '.'
                | ':'
                | '\\'
                | '/'
        )
}

/// Split normalized text at top-level occurrences of `separator`.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut nesting = Nesting::default();
    for (i, c) in text.char_indices() {
        if nesting.is_top_level() && c == separator {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
        nesting.advance(c);
    }
    parts.push(&text[start..]);
    parts
}

/// Tracks `[...]`, `(...)` and quoted strings inside them, so separators in
/// there are not mistaken for structure.
#[derive(Debug, Default)]
struct Nesting {
    brackets: usize,
    parens: usize,
    quote: Option<char>,
}

impl Nesting {
    const fn is_top_level(&self) -> bool {
        self.brackets == 0 && self.parens == 0 && self.quote.is_none()
    }

    fn advance(&mut self, c: char) {
        if let Some(quote) = self.quote {
            if c == quote {
                self.quote = None;
            }
            return;
        }
        match c {
            '"' | '\'' if !self.is_top_level() => self.quote = Some(c),
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.saturating_sub(1),
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.saturating_sub(1),
            _ => {}
        }
    }

    /// The error for input that ended while still nested, if it did.
    fn unbalanced(&self, fragment: &str) -> Option<SelectorError> {
        let reason = if self.quote.is_some() {
            "unterminated quoted value"
        } else if self.brackets > 0 {
            "attribute selector must close with `]`"
        } else if self.parens > 0 {
            "unbalanced parentheses"
        } else {
            return None;
        };
        Some(SelectorError::syntax(fragment, reason))
    }
}
