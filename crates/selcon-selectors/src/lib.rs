//! CSS selector parsing and static containment for selcon.
//!
//! # Scope
//!
//! This crate implements:
//! - **Escape normalization** ([§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point))
//!   - Hex and literal escapes, comment removal
//!
//! - **Selector parsing** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class and ID selectors
//!   - Attribute selectors with `=`, `~=`, `|=`, `^=`, `$=`, `*=`
//!   - The nth family of tree-structural pseudo-classes
//!   - Descendant, child, next-sibling and subsequent-sibling combinators
//!   - Comma-separated selector lists
//!
//! - **Containment**
//!   - Does selector A match every element selector B could match?
//!   - Answered structurally, with no document, as contained, not contained
//!     or unknown
//!
//! # Not Yet Implemented
//!
//! - Pseudo-classes outside the nth family (`:hover`, `:not()`, `:is()`, ...)
//! - Pseudo-elements
//! - Namespace prefixes
//! - Specificity
//!
//! # Example
//!
//! ```
//! use selcon_selectors::{Containment, Selector};
//!
//! let container = Selector::parse("div a").unwrap();
//! let candidate = Selector::parse("div > p > a.nav").unwrap();
//! assert_eq!(container.contains(&candidate).unwrap(), Containment::Contained);
//! ```

/// Error types.
pub mod error;
/// Escape normalization run before parsing.
pub mod escape;
/// Parser limits.
pub mod options;
/// The selector AST, parser and containment algebra.
pub mod selector;

pub use error::{Result, SelectorError, SelectorKind};
pub use escape::normalize;
pub use options::{DEFAULT_MAX_COMPOUNDS, DEFAULT_MAX_LEN, ParseOptions};
pub use selector::parser::{parse_selector, parse_selector_with};
pub use selector::{
    AttrOperator, AttributeSelector, ClassSelector, Combinator, ComplexSelector, CompoundSelector,
    Containment, Contains, ElementalSelector, IdSelector, NthExpression, NthPseudoClass, Selector,
    SelectorList, SimpleSelector,
};
