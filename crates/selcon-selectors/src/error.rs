//! Error types for selector parsing and comparison.

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// The structural kind of a selector node.
///
/// Containment is only defined between nodes of the same kind (with the
/// single exception of selector lists and complex selectors, which compare
/// against each other by treating a complex selector as a one-branch list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
pub enum SelectorKind {
    /// A comma-separated list of complex selectors.
    #[strum(serialize = "SelectorList")]
    List,
    /// Compound selectors joined by combinators.
    #[strum(serialize = "ComplexSelector")]
    Complex,
    /// A type selector plus simple selectors.
    #[strum(serialize = "CompoundSelector")]
    Compound,
    /// A type or universal selector.
    #[strum(serialize = "ElementalSelector")]
    Elemental,
    /// `#id`
    #[strum(serialize = "IdSelector")]
    Id,
    /// `.class`
    #[strum(serialize = "ClassSelector")]
    Class,
    /// `[attr op value]`
    #[strum(serialize = "AttributeSelector")]
    Attribute,
    /// One of the `:nth-*` / `:first-*` / `:last-*` pseudo-classes.
    #[strum(serialize = "NthExpression")]
    Nth,
}

/// Errors raised while parsing or comparing selectors.
///
/// Every error aborts the single parse or compare call that raised it;
/// nothing is retried or recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Malformed selector text.
    #[error("syntax error in `{fragment}`: {reason}")]
    Syntax {
        /// The offending piece of (normalized) selector text.
        fragment: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A pseudo-class name that the resolver does not know.
    #[error("unknown pseudo-class `:{name}`")]
    Lookup {
        /// The pseudo-class name as written.
        name: String,
    },

    /// Containment was requested between incompatible selector kinds.
    #[error("{found} is not {expected}")]
    TypeMismatch {
        /// Kind of the containing selector.
        expected: SelectorKind,
        /// Kind of the candidate selector.
        found: SelectorKind,
    },

    /// The input exceeded one of the configured [`crate::ParseOptions`] limits.
    #[error("{what} exceeds the limit of {limit}")]
    LimitExceeded {
        /// Which limit was hit.
        what: &'static str,
        /// The configured limit.
        limit: usize,
    },
}

impl SelectorError {
    /// Build a [`SelectorError::Syntax`] for the given fragment.
    pub fn syntax(fragment: impl Into<String>, reason: &'static str) -> Self {
        Self::Syntax {
            fragment: fragment.into(),
            reason,
        }
    }
}

/// Result alias used throughout this crate.
pub type Result<T, E = SelectorError> = std::result::Result<T, E>;
