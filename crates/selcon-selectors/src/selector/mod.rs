//! CSS selector AST.
//!
//! Implements the subset of [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! that the containment algebra understands: type and universal selectors,
//! `#id`, `.class`, attribute selectors, the nth family of structural
//! pseudo-classes, the four combinators and comma-separated lists.
//!
//! Every node is immutable once built by the parser and keeps the text it
//! was parsed from, returned verbatim by `to_source()`. `Display` renders a
//! canonical form reconstructed from the structure instead.

pub mod contains;
pub mod parser;
pub mod pseudo;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::error::{Result, SelectorError, SelectorKind};
use crate::options::ParseOptions;

pub use contains::{Contains, Containment};
pub use pseudo::NthPseudoClass;

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all
/// elements selected by each of the individual selectors in the list."
///
/// Always holds at least one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorList {
    source: String,
    branches: Vec<ComplexSelector>,
}

impl SelectorList {
    /// The comma-separated alternatives, in source order.
    #[must_use]
    pub fn branches(&self) -> &[ComplexSelector] {
        &self.branches
    }

    /// The text this list was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators) `A B`
    #[strum(serialize = " ")]
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators) `A > B`
    #[strum(serialize = ">")]
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators) `A + B`
    #[strum(serialize = "+")]
    NextSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators) `A ~ B`
    #[strum(serialize = "~")]
    SubsequentSibling,
}

impl Combinator {
    /// Whether the left-hand element is an ancestor of the right-hand one.
    #[must_use]
    pub const fn is_ancestral(self) -> bool {
        matches!(self, Self::Descendant | Self::Child)
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A right-to-left chain: `div > ul a` is
/// ```text
/// subject: a  --(Descendant)-->  subject: ul  --(Child)-->  subject: div
/// ```
///
/// The combinator and the left-hand continuation live in one `Option`, so one
/// can never be present without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexSelector {
    source: String,
    subject: CompoundSelector,
    left: Option<(Combinator, Box<ComplexSelector>)>,
}

impl ComplexSelector {
    /// The rightmost compound selector, matched against the element itself.
    #[must_use]
    pub const fn subject(&self) -> &CompoundSelector {
        &self.subject
    }

    /// The combinator joining the subject to the rest of the chain, if any.
    #[must_use]
    pub fn combinator(&self) -> Option<Combinator> {
        self.left.as_ref().map(|(combinator, _)| *combinator)
    }

    /// Everything to the left of the combinator, if any.
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_ref().map(|(_, left)| left.as_ref())
    }

    /// Number of compound selectors in the chain.
    #[must_use]
    pub fn compound_count(&self) -> usize {
        let mut count = 1;
        let mut current = self;
        while let Some(left) = current.left() {
            count += 1;
            current = left;
        }
        count
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundSelector {
    source: String,
    elemental: ElementalSelector,
    simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// The type (or universal) selector, `*` when none was written.
    #[must_use]
    pub const fn elemental(&self) -> &ElementalSelector {
        &self.elemental
    }

    /// The qualifiers following the type selector, in source order.
    #[must_use]
    pub fn simple_selectors(&self) -> &[SimpleSelector] {
        &self.simple_selectors
    }

    /// The text this compound was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A type selector, or the universal selector `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementalSelector {
    source: String,
    name: String,
}

impl ElementalSelector {
    /// The element name, `*` for the universal selector.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.name == "*"
    }

    /// The text this selector was parsed from (empty for an implied `*`).
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// A single condition on an element, following the type selector in a
/// compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SimpleSelector {
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors) `#main`
    Id(IdSelector),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html) `.nav`
    Class(ClassSelector),
    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors) `[lang|=en]`
    Attribute(AttributeSelector),
    /// [§ 14 Tree-structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos) `:nth-child(2n+1)`
    PseudoClass(NthExpression),
}

impl SimpleSelector {
    /// The text this selector was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        match self {
            Self::Id(id) => id.to_source(),
            Self::Class(class) => class.to_source(),
            Self::Attribute(attr) => attr.to_source(),
            Self::PseudoClass(nth) => nth.to_source(),
        }
    }

    /// The structural kind of the wrapped selector.
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        match self {
            Self::Id(_) => SelectorKind::Id,
            Self::Class(_) => SelectorKind::Class,
            Self::Attribute(_) => SelectorKind::Attribute,
            Self::PseudoClass(_) => SelectorKind::Nth,
        }
    }
}

/// `#id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdSelector {
    source: String,
    id: String,
}

impl IdSelector {
    /// The identifier, without the `#`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// `.class`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSelector {
    source: String,
    class: String,
}

impl ClassSelector {
    /// The class name, without the `.`.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
/// and [§ 6.2 Substring matching](https://www.w3.org/TR/selectors-4/#attribute-substrings)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
pub enum AttrOperator {
    /// `[attr=val]` exactly `val`
    #[strum(serialize = "=")]
    Equals,
    /// `[attr~=val]` a whitespace-separated list containing the word `val`
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=val]` exactly `val` or beginning with `val-`
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[attr^=val]` begins with `val`
    #[strum(serialize = "^=")]
    Prefix,
    /// `[attr$=val]` ends with `val`
    #[strum(serialize = "$=")]
    Suffix,
    /// `[attr*=val]` contains `val`
    #[strum(serialize = "*=")]
    Substring,
}

/// `[attr]` or `[attr op value]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSelector {
    source: String,
    attr: String,
    matcher: Option<(AttrOperator, String)>,
}

impl AttributeSelector {
    /// The attribute name.
    #[must_use]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    /// The operator, `None` for a presence test.
    #[must_use]
    pub fn operator(&self) -> Option<AttrOperator> {
        self.matcher.as_ref().map(|(op, _)| *op)
    }

    /// The unquoted value, `None` for a presence test.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.matcher.as_ref().map(|(_, value)| value.as_str())
    }

    /// The text this selector was parsed from, brackets included.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// The positions `a·n + b` (n ≥ 0, 1-indexed) selected by an nth pseudo-class.
///
/// `:first-child` and the other fixed forms are `a = 0, b = 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NthExpression {
    source: String,
    pseudo: NthPseudoClass,
    a: i32,
    b: i32,
}

impl NthExpression {
    /// Which pseudo-class was written.
    #[must_use]
    pub const fn pseudo(&self) -> NthPseudoClass {
        self.pseudo
    }

    /// The step.
    #[must_use]
    pub const fn a(&self) -> i32 {
        self.a
    }

    /// The offset.
    #[must_use]
    pub const fn b(&self) -> i32 {
        self.b
    }

    /// Counts from the last sibling.
    #[must_use]
    pub const fn last(&self) -> bool {
        self.pseudo.is_last()
    }

    /// Counts all siblings rather than those of the same type.
    #[must_use]
    pub const fn child(&self) -> bool {
        self.pseudo.is_child()
    }

    /// The text this selector was parsed from, `:` included.
    #[must_use]
    pub fn to_source(&self) -> &str {
        &self.source
    }
}

/// Any parsed selector node.
///
/// [`Selector::parse`] produces `List` or `Complex`; the other variants exist
/// so that any two nodes can be compared through [`Selector::contains`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selector {
    /// Comma-separated branches.
    List(SelectorList),
    /// A combinator chain (also a single-branch list, collapsed).
    Complex(ComplexSelector),
    /// A single compound selector.
    Compound(CompoundSelector),
    /// A type or universal selector.
    Elemental(ElementalSelector),
    /// `#id`
    Id(IdSelector),
    /// `.class`
    Class(ClassSelector),
    /// `[attr op value]`
    Attribute(AttributeSelector),
    /// An nth-family pseudo-class.
    Nth(NthExpression),
}

impl Selector {
    /// Normalize and parse `raw` with the default [`ParseOptions`].
    ///
    /// A list with a single branch is returned as [`Selector::Complex`].
    ///
    /// # Errors
    ///
    /// See [`parser::parse_selector_with`].
    pub fn parse(raw: &str) -> Result<Self> {
        parser::parse_selector(raw)
    }

    /// Normalize and parse `raw` under the given limits.
    ///
    /// # Errors
    ///
    /// See [`parser::parse_selector_with`].
    pub fn parse_with(raw: &str, options: &ParseOptions) -> Result<Self> {
        parser::parse_selector_with(raw, options)
    }

    /// The structural kind of this node.
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        match self {
            Self::List(_) => SelectorKind::List,
            Self::Complex(_) => SelectorKind::Complex,
            Self::Compound(_) => SelectorKind::Compound,
            Self::Elemental(_) => SelectorKind::Elemental,
            Self::Id(_) => SelectorKind::Id,
            Self::Class(_) => SelectorKind::Class,
            Self::Attribute(_) => SelectorKind::Attribute,
            Self::Nth(_) => SelectorKind::Nth,
        }
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn to_source(&self) -> &str {
        match self {
            Self::List(list) => list.to_source(),
            Self::Complex(complex) => complex.to_source(),
            Self::Compound(compound) => compound.to_source(),
            Self::Elemental(elemental) => elemental.to_source(),
            Self::Id(id) => id.to_source(),
            Self::Class(class) => class.to_source(),
            Self::Attribute(attr) => attr.to_source(),
            Self::Nth(nth) => nth.to_source(),
        }
    }
}

impl From<SimpleSelector> for Selector {
    fn from(simple: SimpleSelector) -> Self {
        match simple {
            SimpleSelector::Id(id) => Self::Id(id),
            SimpleSelector::Class(class) => Self::Class(class),
            SimpleSelector::Attribute(attr) => Self::Attribute(attr),
            SimpleSelector::PseudoClass(nth) => Self::Nth(nth),
        }
    }
}

impl From<ComplexSelector> for Selector {
    fn from(complex: ComplexSelector) -> Self {
        Self::Complex(complex)
    }
}

impl From<CompoundSelector> for Selector {
    fn from(compound: CompoundSelector) -> Self {
        Self::Compound(compound)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self> {
        let options = ParseOptions::default();
        parser::parse_selector_list(&parser::prepare(raw, &options)?, &options)
    }
}

impl FromStr for ComplexSelector {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self> {
        let options = ParseOptions::default();
        parser::parse_complex_selector(&parser::prepare(raw, &options)?, &options)
    }
}

impl FromStr for CompoundSelector {
    type Err = SelectorError;

    fn from_str(raw: &str) -> Result<Self> {
        let options = ParseOptions::default();
        parser::parse_compound_selector(parser::prepare(raw, &options)?.trim())
    }
}

// Canonical serialization

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{branch}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.left {
            Some((Combinator::Descendant, left)) => write!(f, "{left} {}", self.subject),
            Some((combinator, left)) => write!(f, "{left} {combinator} {}", self.subject),
            None => write!(f, "{}", self.subject),
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `*` is implied once anything else is written
        if !self.elemental.is_universal() || self.simple_selectors.is_empty() {
            write!(f, "{}", self.elemental)?;
        }
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ElementalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Class(class) => write!(f, "{class}"),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::PseudoClass(nth) => write!(f, "{nth}"),
        }
    }
}

impl fmt::Display for IdSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.class)
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            // a parsed value never holds both quote kinds
            Some((op, value)) if value.contains('"') => {
                write!(f, "[{}{op}'{value}']", self.attr)
            }
            Some((op, value)) => write!(f, "[{}{op}\"{value}\"]", self.attr),
            None => write!(f, "[{}]", self.attr),
        }
    }
}

impl fmt::Display for NthExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.pseudo)?;
        if !self.pseudo.takes_argument() {
            return Ok(());
        }
        f.write_str("(")?;
        match self.a {
            0 => write!(f, "{}", self.b)?,
            1 => f.write_str("n")?,
            -1 => f.write_str("-n")?,
            a => write!(f, "{a}n")?,
        }
        if self.a != 0 {
            match self.b {
                0 => {}
                b if b > 0 => write!(f, "+{b}")?,
                b => write!(f, "{b}")?,
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => write!(f, "{list}"),
            Self::Complex(complex) => write!(f, "{complex}"),
            Self::Compound(compound) => write!(f, "{compound}"),
            Self::Elemental(elemental) => write!(f, "{elemental}"),
            Self::Id(id) => write!(f, "{id}"),
            Self::Class(class) => write!(f, "{class}"),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::Nth(nth) => write!(f, "{nth}"),
        }
    }
}
