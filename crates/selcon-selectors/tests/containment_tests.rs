//! Integration tests for selector containment.

use selcon_selectors::{
    ComplexSelector, CompoundSelector, Containment, Contains, Selector, SelectorError,
    SelectorKind, SelectorList,
};

fn check(container: &str, candidate: &str) -> Containment {
    let container = Selector::parse(container).unwrap();
    let candidate = Selector::parse(candidate).unwrap();
    container.contains(&candidate).unwrap()
}

fn contains(container: &str, candidate: &str) -> bool {
    check(container, candidate).is_contained()
}

#[test]
fn test_reflexive() {
    for selector in [
        "a",
        "*",
        ".x.y",
        "a#1.x",
        "[title]",
        "[title~=\"a b\"]",
        "[lang|=en]",
        ":nth-child(2n+1)",
        ":nth-last-of-type(-n+3)",
        ":last-child",
        "div > a",
        "ul li + li",
        "h1 ~ p",
        "body > section a, nav a",
    ] {
        assert_eq!(check(selector, selector), Containment::Contained, "{selector}");
    }
}

#[test]
fn test_universal_absorbs_everything() {
    assert!(contains("*", "a"));
    assert!(contains("*", ".x"));
    assert!(contains("*", "div#1>a:first-of-type>span:nth-of-type(3)"));
    assert!(contains("*", "a, b"));
    assert!(!contains("a", "*"));
    assert!(!contains(".x", "*"));
    assert!(!contains(":first-child", "*"));
}

#[test]
fn test_type_selectors() {
    assert!(contains("a", "a"));
    assert!(!contains("a", "b"));
    assert!(!contains("a.x", ".x"));
}

// [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)

#[test]
fn test_class_selectors() {
    assert!(contains(".x", ".x"));
    assert!(contains(".x", "a.x"));
    assert!(contains(".x", "*.x"));
    assert!(contains(".x", ".x.y"));
    assert!(contains(".x", ".y.x"));
    assert!(!contains(".x", ".y"));
    assert!(!contains(".x", "a"));
    assert!(!contains(".x.y", ".y"));
}

#[test]
fn test_id_and_class_are_independent() {
    assert!(contains("a#1", "a#1"));
    assert!(contains("a#1", "a.x.y#1"));
    assert!(contains("a.x#1", "a#1.x"));
    assert!(!contains("a.x#1.y", "a#1"));
    assert!(!contains("#1", ".1"));
}

// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)

#[test]
fn test_attribute_presence_and_prefix_suffix() {
    assert!(contains("[title]", "[title]"));
    assert!(contains("[title]", "a[title=hello]"));
    assert!(contains("[title^=h]", "a[title=hello]"));
    assert!(contains("[title$=o]", "a[title=hello]"));
    assert!(contains("[title^=he]", "[title^=hello]"));
    assert!(contains("[title$=lo]", "[title$=hello]"));
    assert!(!contains("[title^=h]", "[title$=hello]"));
    assert!(!contains("[title=hello]", "[title]"));
    assert!(!contains("[title]", "[alt]"));
    assert!(!contains("[title^=\"\"]", "[title=hello]"));
}

#[test]
fn test_attribute_dash_match() {
    assert!(contains("[lang|=en]", "a[lang=en-US]"));
    assert!(contains("[lang|=en]", "[lang=en]"));
    assert!(contains("[lang|=en]", "[lang^=en-]"));
    assert!(contains("[lang|=en]", "[lang|=en-GB]"));
    assert!(!contains("[lang|=zh]", "a[lang=zht]"));
    assert!(!contains("[lang|=en]", "[lang^=en]"));
    assert!(contains("[lang^=en]", "[lang|=en]"));
}

#[test]
fn test_attribute_word_and_substring() {
    assert!(contains("[class~=nav]", "[class=\"main nav\"]"));
    assert!(contains("[class~=main]", "[class^=\"main nav\"]"));
    assert!(!contains("[class~=nav]", "[class^=\"main nav\"]"));
    assert!(contains("[class~=nav]", "[class$=\"main nav\"]"));
    assert!(contains("[class~=b]", "[class*=\"a b c\"]"));
    assert!(!contains("[class~=a]", "[class*=\"a b c\"]"));
    assert!(!contains("[class~=nav]", "[class=navbar]"));

    assert!(contains("[title*=ell]", "[title=hello]"));
    assert!(contains("[title*=ell]", "[title^=hello]"));
    assert!(!contains("[title*=ell]", "[title]"));
    assert!(!contains("[title*=ell]", "[title=help]"));
}

// [§ 14 Tree-structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)

#[test]
fn test_nth_child_arithmetic() {
    assert!(contains(":nth-child(1)", ":nth-child(1)"));
    assert!(contains(":first-child", ":nth-child(1)"));
    assert!(contains(":nth-child(even)", ":nth-child(2n)"));
    assert!(contains(":nth-child(even)", ":nth-child(4n)"));
    assert!(contains(":nth-child(odd)", ":nth-child(2n+1)"));
    assert!(contains(":nth-child(odd)", ":first-child"));
    assert!(!contains(":nth-child(even)", ":first-child"));
    assert!(contains(":nth-child(n+1)", ":nth-child(3)"));
    assert!(contains(":nth-child(2n+1)", ":nth-child(4n+5)"));
    assert_eq!(check(":nth-child(2n+1)", ":nth-child(2n+2)"), Containment::NotContained);
}

#[test]
fn test_nth_child_and_type_flags() {
    assert!(contains(":first-of-type", ":first-child"));
    assert!(contains(":last-of-type", ":last-child"));
    assert!(!contains(":first-child", ":first-of-type"));
    assert!(!contains(":first-child", ":last-child"));
    assert!(!contains(":nth-child(1)", ":nth-last-child(1)"));
    assert!(!contains(":nth-of-type(odd)", ":first-child"));
}

#[test]
fn test_nth_offsets_below_one() {
    assert_eq!(check(":nth-child(even)", ":first-child"), Containment::NotContained);
    assert_eq!(check(":nth-child(even)", ":nth-child(2n+2)"), Containment::Contained);
    assert_eq!(check(":nth-child(2n)", ":nth-child(4n+2)"), Containment::Contained);
    assert_eq!(check(":nth-child(n)", ":nth-child(3n-1)"), Containment::Contained);
    assert_eq!(check(":nth-child(3n-1)", ":nth-child(6n+2)"), Containment::Contained);
    assert_eq!(check(":nth-child(3n-1)", ":nth-child(3n)"), Containment::NotContained);
    assert_eq!(check(":nth-child(0n+0)", ":nth-child(1)"), Containment::NotContained);
    assert_eq!(
        check(
            "div#1 span:nth-of-type(n)",
            "div#1>a:first-of-type>span:nth-of-type(3)"
        ),
        Containment::Contained
    );
}

#[test]
fn test_nth_empty_candidate_is_contained() {
    assert_eq!(check(":nth-child(3)", ":nth-child(0n+0)"), Containment::Contained);
    assert_eq!(check(":nth-child(2n+1)", ":nth-child(-3n-1)"), Containment::Contained);
}

#[test]
fn test_nth_negative_steps_are_unknown() {
    assert_eq!(check(":nth-child(n)", ":nth-child(-3n+7)"), Containment::Unknown);
    assert_eq!(check(":nth-child(-n+6)", ":nth-child(-n+5)"), Containment::Unknown);
    assert_eq!(check(":nth-child(-n+3)", ":nth-child(2)"), Containment::Unknown);
}

// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)

#[test]
fn test_equal_combinators_recurse() {
    assert!(contains("div>a", "div>a"));
    assert!(!contains("div>a", "section>a"));
    assert!(contains("h1 + p", "h1.title + p.lead"));
    assert!(contains("h1 ~ p", "h1 ~ p"));
    assert!(!contains("div a", "a"));
}

#[test]
fn test_descendant_scans_ancestor_chain() {
    assert!(contains("div a", "div>a"));
    assert!(contains("div * a", "div>div>a"));
    assert!(contains("section a", "section>div>a"));
    assert!(contains("body>section a", "body>section>div>a"));
    assert!(contains("div a", "div span a"));
    assert!(contains("div a", "div > p span a"));
    assert!(contains(
        "div#1 span",
        "div#1>a:first-of-type>span:nth-of-type(3)"
    ));
    assert!(!contains(
        "div#1 span:first-child",
        "div#1>a:first-of-type>span:nth-of-type(3)"
    ));
}

#[test]
fn test_scan_stops_at_sibling_links() {
    assert_eq!(check("div a", "div + p > a"), Containment::Unknown);
    assert_eq!(check("div a", "section > a"), Containment::Unknown);
    assert_eq!(check("div a", "h1 + a"), Containment::Unknown);
    assert_eq!(check("div > a", "div a"), Containment::Unknown);
    assert_eq!(check("section a", "body > a"), Containment::Unknown);
}

#[test]
fn test_selector_lists() {
    assert!(contains("a, b", "a"));
    assert!(contains("a, b", "b.x"));
    assert!(!contains("a, b", "c"));
    assert!(contains("a, b", "b, a.x"));
    assert!(!contains("a, b", "a, c"));
    assert!(contains("*", "a, b"));
    assert!(!contains("a", "a, b"));
}

#[test]
fn test_list_unknown_is_kept_apart_from_not_contained() {
    assert_eq!(check("p, div a", "section > a"), Containment::Unknown);
    assert_eq!(check("p, div a", "div > a"), Containment::Contained);
}

#[test]
fn test_typed_nodes_compare_directly() {
    let list: SelectorList = "a, .x".parse().unwrap();
    let other: SelectorList = "a.x, b.x".parse().unwrap();
    assert_eq!(list.contains(&other), Containment::Contained);

    let complex: ComplexSelector = "ul li".parse().unwrap();
    let deeper: ComplexSelector = "ul > li".parse().unwrap();
    assert_eq!(complex.contains(&deeper), Containment::Contained);
    assert_eq!(list.contains_complex(&deeper), Containment::NotContained);

    let compound: CompoundSelector = "a.x".parse().unwrap();
    let richer: CompoundSelector = "a.x.y#1".parse().unwrap();
    assert_eq!(compound.contains(&richer), Containment::Contained);
    assert_eq!(richer.contains(&compound), Containment::NotContained);
}

#[test]
fn test_type_mismatch_is_an_error() {
    let complex = Selector::parse("a").unwrap();
    let compound = Selector::Compound("a".parse().unwrap());
    assert_eq!(
        complex.contains(&compound),
        Err(SelectorError::TypeMismatch {
            expected: SelectorKind::Complex,
            found: SelectorKind::Compound,
        })
    );

    let list = Selector::parse("a, b").unwrap();
    assert!(matches!(
        list.contains(&compound),
        Err(SelectorError::TypeMismatch { .. })
    ));

    let compound: CompoundSelector = "a.x#1".parse().unwrap();
    let class = Selector::from(compound.simple_selectors()[0].clone());
    let id = Selector::from(compound.simple_selectors()[1].clone());
    assert_eq!(class.contains(&class), Ok(Containment::Contained));
    assert_eq!(
        class.contains(&id).unwrap_err().to_string(),
        "IdSelector is not ClassSelector"
    );
}

#[test]
fn test_contains_str() {
    let container = Selector::parse("nav a").unwrap();
    assert_eq!(container.contains_str("nav > ul > li > a"), Ok(Containment::Contained));
    assert!(matches!(
        container.contains_str("nav >"),
        Err(SelectorError::Syntax { .. })
    ));
}

#[test]
fn test_containment_display() {
    assert_eq!(Containment::Contained.to_string(), "contained");
    assert_eq!(Containment::NotContained.to_string(), "not contained");
    assert_eq!(Containment::Unknown.to_string(), "unknown");
    assert_eq!(Containment::from(true), Containment::Contained);
}
