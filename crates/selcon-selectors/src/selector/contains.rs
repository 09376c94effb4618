//! Static selector containment.
//!
//! `A.contains(B)` asks whether every element that could ever match `B` is
//! guaranteed to match `A`, with no document to look at. Answers are
//! conservative: anything that cannot be proven is reported as
//! [`Containment::NotContained`] or, when the question is legitimately open,
//! [`Containment::Unknown`].
//!
//! The comparison is built bottom-up: simple selectors, then compound
//! selectors, then combinator chains, then lists.

#[cfg(feature = "contains-trace")]
use std::cell::Cell;

use selcon_common::warning::warn_once;
use serde::Serialize;
use strum_macros::Display;

use super::{
    AttrOperator, AttributeSelector, ClassSelector, Combinator, ComplexSelector, CompoundSelector,
    ElementalSelector, IdSelector, NthExpression, Selector, SelectorList, SimpleSelector,
};
use crate::error::{Result, SelectorError};

#[cfg(feature = "contains-trace")]
thread_local! {
    static TRACE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Outcome of a containment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum Containment {
    /// Every element matched by the candidate is matched by the container.
    #[strum(serialize = "contained")]
    Contained,
    /// Containment does not hold, or cannot hold given the structure.
    #[strum(serialize = "not contained")]
    NotContained,
    /// The question cannot be decided statically for this pair.
    #[strum(serialize = "unknown")]
    Unknown,
}

impl Containment {
    /// Collapse to a boolean, treating [`Containment::Unknown`] as not contained.
    #[must_use]
    pub const fn is_contained(self) -> bool {
        matches!(self, Self::Contained)
    }

    /// Both must hold: the weaker of the two.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::NotContained, _) | (_, Self::NotContained) => Self::NotContained,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::Contained, Self::Contained) => Self::Contained,
        }
    }

    /// Either may hold: the stronger of the two.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Contained, _) | (_, Self::Contained) => Self::Contained,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::NotContained, Self::NotContained) => Self::NotContained,
        }
    }

    /// Fold with [`Containment::and`], stopping at the first `NotContained`.
    /// An empty iterator is `Contained`.
    #[must_use]
    pub fn all(outcomes: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::Contained;
        for outcome in outcomes {
            result = result.and(outcome);
            if result == Self::NotContained {
                break;
            }
        }
        result
    }

    /// Fold with [`Containment::or`], stopping at the first `Contained`.
    /// An empty iterator is `NotContained`.
    #[must_use]
    pub fn any(outcomes: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::NotContained;
        for outcome in outcomes {
            result = result.or(outcome);
            if result == Self::Contained {
                break;
            }
        }
        result
    }
}

impl From<bool> for Containment {
    fn from(contained: bool) -> Self {
        if contained {
            Self::Contained
        } else {
            Self::NotContained
        }
    }
}

/// Containment between two nodes of the same kind.
pub trait Contains {
    /// Does `self` match every element `other` could match?
    fn contains(&self, other: &Self) -> Containment;
}

impl Selector {
    /// Compare two selectors of any kind.
    ///
    /// Lists and complex selectors compare with each other (a complex selector
    /// acting as a one-branch list); every other pairing must be of the exact
    /// same kind.
    ///
    /// # Errors
    ///
    /// [`SelectorError::TypeMismatch`] when the kinds cannot be compared.
    pub fn contains(&self, other: &Self) -> Result<Containment> {
        let outcome = match (self, other) {
            (Self::List(list), Self::List(candidates)) => list.contains(candidates),
            (Self::List(list), Self::Complex(candidate)) => list.contains_complex(candidate),
            (Self::Complex(complex), Self::List(candidates)) => Containment::all(
                candidates
                    .branches()
                    .iter()
                    .map(|candidate| complex.contains(candidate)),
            ),
            (Self::Complex(complex), Self::Complex(candidate)) => complex.contains(candidate),
            (Self::Compound(compound), Self::Compound(candidate)) => compound.contains(candidate),
            (Self::Elemental(elemental), Self::Elemental(candidate)) => {
                elemental.contains(candidate)
            }
            (Self::Id(id), Self::Id(candidate)) => id.contains(candidate),
            (Self::Class(class), Self::Class(candidate)) => class.contains(candidate),
            (Self::Attribute(attr), Self::Attribute(candidate)) => attr.contains(candidate),
            (Self::Nth(nth), Self::Nth(candidate)) => nth.contains(candidate),
            _ => {
                return Err(SelectorError::TypeMismatch {
                    expected: self.kind(),
                    found: other.kind(),
                });
            }
        };
        Ok(outcome)
    }

    /// Parse `other` and compare against it, like [`Selector::contains`].
    ///
    /// # Errors
    ///
    /// Any parse error for `other`, or [`SelectorError::TypeMismatch`].
    pub fn contains_str(&self, other: &str) -> Result<Containment> {
        self.contains(&Self::parse(other)?)
    }
}

impl SelectorList {
    /// Some branch of this list contains `candidate`.
    #[must_use]
    pub fn contains_complex(&self, candidate: &ComplexSelector) -> Containment {
        Containment::any(self.branches.iter().map(|branch| branch.contains(candidate)))
    }
}

/// A list contains another list when each of the other's branches is
/// contained by some branch here.
impl Contains for SelectorList {
    fn contains(&self, other: &Self) -> Containment {
        Containment::all(
            other
                .branches
                .iter()
                .map(|candidate| self.contains_complex(candidate)),
        )
    }
}

impl Contains for ComplexSelector {
    fn contains(&self, other: &Self) -> Containment {
        #[cfg(feature = "contains-trace")]
        let depth = TRACE_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });

        let outcome = self.contains_chain(other);

        #[cfg(feature = "contains-trace")]
        {
            TRACE_DEPTH.with(|d| d.set(depth));
            eprintln!(
                "[contains-trace] {:indent$}`{self}` ⊇ `{other}`: {outcome}",
                "",
                indent = depth * 2
            );
        }

        outcome
    }
}

impl ComplexSelector {
    fn contains_chain(&self, other: &Self) -> Containment {
        let subject = self.subject.contains(&other.subject);
        if !subject.is_contained() {
            return subject;
        }
        let Some((combinator, left)) = &self.left else {
            return subject;
        };
        // The candidate puts no constraint on its context, so any required
        // context on our side can be missing.
        let Some((other_combinator, other_left)) = &other.left else {
            return Containment::NotContained;
        };

        match (*combinator, *other_combinator) {
            (Combinator::Descendant, Combinator::Descendant) => {
                // `div a` vs `div span a`: the direct comparison fails but a
                // further ancestor of the candidate may still match.
                let direct = left.contains(other_left);
                if direct.is_contained() {
                    return direct;
                }
                match &other_left.left {
                    Some((link, next)) if link.is_ancestral() => {
                        direct.or(scan_ancestors(left, next))
                    }
                    Some(_) => direct.or(Containment::Unknown),
                    None => direct,
                }
            }
            (ours, theirs) if ours == theirs => left.contains(other_left),
            // Any element the candidate places as parent is also an ancestor.
            (Combinator::Descendant, Combinator::Child) => scan_ancestors(left, other_left),
            _ => Containment::Unknown,
        }
    }
}

/// Walk the candidate's chain from `start` through descendant and child
/// links, looking for an ancestor that `container` contains.
///
/// A sibling link stops the walk, as does running off the end of the chain;
/// both give `Unknown` unless a match was already found.
fn scan_ancestors(container: &ComplexSelector, start: &ComplexSelector) -> Containment {
    let mut result = Containment::NotContained;
    let mut candidate = start;
    loop {
        result = result.or(container.contains(candidate));
        if result.is_contained() {
            return result;
        }
        match &candidate.left {
            Some((link, next)) if link.is_ancestral() => candidate = next,
            _ => return result.or(Containment::Unknown),
        }
    }
}

impl Contains for CompoundSelector {
    fn contains(&self, other: &Self) -> Containment {
        let elemental = self.elemental.contains(&other.elemental);
        if !elemental.is_contained() {
            return elemental;
        }
        // Every qualifier here must be implied by some qualifier of the
        // same kind there; extra qualifiers on the candidate are fine.
        Containment::all(self.simple_selectors.iter().map(|required| {
            Containment::any(
                other
                    .simple_selectors
                    .iter()
                    .map(|offered| required.contains(offered)),
            )
        }))
    }
}

impl Contains for ElementalSelector {
    fn contains(&self, other: &Self) -> Containment {
        (self.is_universal() || self.name == other.name).into()
    }
}

/// Simple selectors of different kinds never imply each other.
impl Contains for SimpleSelector {
    fn contains(&self, other: &Self) -> Containment {
        match (self, other) {
            (Self::Id(id), Self::Id(candidate)) => id.contains(candidate),
            (Self::Class(class), Self::Class(candidate)) => class.contains(candidate),
            (Self::Attribute(attr), Self::Attribute(candidate)) => attr.contains(candidate),
            (Self::PseudoClass(nth), Self::PseudoClass(candidate)) => nth.contains(candidate),
            _ => Containment::NotContained,
        }
    }
}

impl Contains for IdSelector {
    fn contains(&self, other: &Self) -> Containment {
        (self.id == other.id).into()
    }
}

impl Contains for ClassSelector {
    fn contains(&self, other: &Self) -> Containment {
        (self.class == other.class).into()
    }
}

impl Contains for AttributeSelector {
    fn contains(&self, other: &Self) -> Containment {
        if self.attr != other.attr {
            return Containment::NotContained;
        }
        if self.matcher == other.matcher {
            return Containment::Contained;
        }
        let Some((op, value)) = &self.matcher else {
            // [attr] holds for anything that tests the same attribute
            return Containment::Contained;
        };
        let Some((other_op, other_value)) = &other.matcher else {
            return Containment::NotContained;
        };
        attribute_implies(*op, value, *other_op, other_value).into()
    }
}

/// Does every value satisfying `theirs theirs_value` satisfy `ours value`?
fn attribute_implies(
    ours: AttrOperator,
    value: &str,
    theirs: AttrOperator,
    theirs_value: &str,
) -> bool {
    use AttrOperator::{DashMatch, Equals, Includes, Prefix, Substring, Suffix};

    match ours {
        Includes => {
            // Words of the candidate's value that are certain to appear as
            // whole words in the element's attribute.
            let words: Vec<&str> = theirs_value.split(char::is_whitespace).collect();
            let certain: &[&str] = match theirs {
                Equals => words.as_slice(),
                Prefix => &words[..words.len().saturating_sub(1)],
                Suffix => words.get(1..).unwrap_or_default(),
                Substring if words.len() > 2 => &words[1..words.len() - 1],
                _ => &[],
            };
            !value.is_empty() && certain.contains(&value)
        }
        DashMatch => {
            let dashed = format!("{value}-");
            match theirs {
                Equals => theirs_value == value || theirs_value.starts_with(&dashed),
                Prefix | DashMatch => theirs_value.starts_with(&dashed),
                _ => false,
            }
        }
        Prefix => {
            !value.is_empty()
                && matches!(theirs, Equals | DashMatch | Prefix)
                && theirs_value.starts_with(value)
        }
        Suffix => {
            !value.is_empty() && matches!(theirs, Equals | Suffix) && theirs_value.ends_with(value)
        }
        Substring => !value.is_empty() && theirs_value.contains(value),
        Equals => false,
    }
}

impl Contains for NthExpression {
    fn contains(&self, other: &Self) -> Containment {
        if self.last() != other.last() {
            return Containment::NotContained;
        }

        if self.child() != other.child() {
            // Only `:first-of-type` ⊇ `:first-child` (and the `last` pair):
            // the first child is necessarily the first of its type.
            let canonical = |nth: &Self| nth.a == 0 && nth.b == 1;
            return (canonical(self) && other.child() && canonical(other)).into();
        }

        let (a, b) = (self.a, self.b);
        let (other_a, other_b) = (other.a, other.b);
        // a negative candidate step reaches positions below the shared offset
        let proven = (a > 0 && other_a >= 0 && other_a % a == 0 && other_b == b)
            || (a <= 0 && other_a == a && other_b == b);
        if proven {
            return Containment::Contained;
        }

        let Some(other_first) = first_position(other_a, other_b) else {
            return Containment::Contained;
        };
        if a < 0 || other_a < 0 {
            let _ = warn_once(
                "Selectors",
                &format!("cannot decide whether `{self}` contains `{other}`, reporting unknown"),
            );
            return Containment::Unknown;
        }
        match first_position(a, b) {
            Some(first) => progression_contains((a, first), (other_a, other_first)).into(),
            None => Containment::NotContained,
        }
    }
}

/// The smallest position `≥ 1` selected by `step·n + offset`, or `None` when
/// the progression selects nothing.
fn first_position(step: i32, offset: i32) -> Option<i64> {
    let (step, offset) = (i64::from(step), i64::from(offset));
    if offset >= 1 {
        Some(offset)
    } else if step > 0 {
        Some(offset + step * ((step - offset) / step))
    } else {
        None
    }
}

/// Does `step·n + first` include every position of the other progression?
/// Steps are non-negative and each progression starts at its `first`.
fn progression_contains(
    (step, first): (i32, i64),
    (other_step, other_first): (i32, i64),
) -> bool {
    if step == 0 {
        return other_step == 0 && other_first == first;
    }
    let step = i64::from(step);
    other_first >= first && (other_first - first) % step == 0 && i64::from(other_step) % step == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_or_tables() {
        use Containment::{Contained, NotContained, Unknown};
        assert_eq!(Contained.and(Unknown), Unknown);
        assert_eq!(Unknown.and(NotContained), NotContained);
        assert_eq!(Contained.or(NotContained), Contained);
        assert_eq!(NotContained.or(Unknown), Unknown);
        assert_eq!(Containment::all([]), Contained);
        assert_eq!(Containment::any([]), NotContained);
        assert_eq!(Containment::any([NotContained, Unknown]), Unknown);
        assert!(!Unknown.is_contained());
    }

    #[test]
    fn test_first_position() {
        assert_eq!(first_position(2, 0), Some(2));
        assert_eq!(first_position(2, 1), Some(1));
        assert_eq!(first_position(3, -1), Some(2));
        assert_eq!(first_position(4, -8), Some(4));
        assert_eq!(first_position(-1, 6), Some(6));
        assert_eq!(first_position(0, 0), None);
        assert_eq!(first_position(-2, -1), None);
    }

    #[test]
    fn test_progression_contains() {
        // n+1 ⊇ 3
        assert!(progression_contains((1, 1), (0, 3)));
        // odd ⊇ 2n+3
        assert!(progression_contains((2, 1), (2, 3)));
        // 2n+1 ⊉ 2n+2
        assert!(!progression_contains((2, 1), (2, 2)));
        // 3 ⊉ 3n+3
        assert!(!progression_contains((0, 3), (3, 3)));
        // 2n+2 ⊉ 3n+2
        assert!(!progression_contains((2, 2), (3, 2)));
        // 2n+2 ⊉ 1
        assert!(!progression_contains((2, 2), (0, 1)));
        // 2n ⊇ 4n+2
        assert!(progression_contains((2, 2), (4, 2)));
    }

    #[test]
    fn test_includes_word_positions() {
        assert!(attribute_implies(AttrOperator::Includes, "b", AttrOperator::Equals, "a b c"));
        assert!(attribute_implies(AttrOperator::Includes, "a", AttrOperator::Prefix, "a b"));
        assert!(!attribute_implies(AttrOperator::Includes, "b", AttrOperator::Prefix, "a b"));
        assert!(attribute_implies(AttrOperator::Includes, "b", AttrOperator::Suffix, "a b"));
        assert!(!attribute_implies(AttrOperator::Includes, "a", AttrOperator::Suffix, "a b"));
        assert!(attribute_implies(AttrOperator::Includes, "b", AttrOperator::Substring, "a b c"));
        assert!(!attribute_implies(AttrOperator::Includes, "a", AttrOperator::Substring, "a b c"));
    }
}
