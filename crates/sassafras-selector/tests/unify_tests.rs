//! Integration tests for selector unification, including the combinator
//! merging it inherits from the weaver.

use sassafras_selector::{parse_selector_list, SelectorList};

fn parse(source: &str) -> SelectorList {
    parse_selector_list(source).unwrap()
}

fn unify(a: &str, b: &str) -> Option<String> {
    parse(a).unify(&parse(b)).map(|unified| unified.to_string())
}

#[test]
fn test_unify_compounds() {
    assert_eq!(unify(".a.b", ".b.c").unwrap(), ".a.b.c");
    assert_eq!(unify("a", ".b").unwrap(), "a.b");
    assert_eq!(unify(".b", "a").unwrap(), "a.b");
    assert_eq!(unify(".a", ".a").unwrap(), ".a");
}

#[test]
fn test_unify_ids_conflict() {
    assert_eq!(unify("#x", "#y"), None);
    assert_eq!(unify("#x.a", "#x.b").unwrap(), "#x.a.b");
}

#[test]
fn test_unify_types_and_universal() {
    assert_eq!(unify("div", "span"), None);
    assert_eq!(unify("div", "div").unwrap(), "div");
    assert_eq!(unify("div", "*").unwrap(), "div");
    assert_eq!(unify("*", "div").unwrap(), "div");
    assert_eq!(unify("svg|rect", "*|*").unwrap(), "svg|rect");
    assert_eq!(unify("svg|rect", "html|rect"), None);
}

#[test]
fn test_unify_pseudo_ordering() {
    // Pseudo-classes stay before the single allowed pseudo-element.
    assert_eq!(unify(".a::after", ".b").unwrap(), ".a.b::after");
    assert_eq!(unify("::before", "::after"), None);
    assert_eq!(unify(".a:hover", ".b").unwrap(), ".a.b:hover");
}

#[test]
fn test_unify_complex_descendants() {
    assert_eq!(unify(".a .b", ".c").unwrap(), ".a .b.c");
    assert_eq!(
        unify(".x .y", ".p .q").unwrap(),
        ".x .p .y.q, .p .x .y.q"
    );
}

#[test]
fn test_unify_sibling_combinators() {
    // `~ ~` keeps both orders plus the unified compound.
    assert_eq!(
        unify(".a ~ .z", ".b ~ .z").unwrap(),
        ".a ~ .b ~ .z, .b ~ .a ~ .z, .a.b ~ .z"
    );
    // `~ +` prefers the stricter `+`, with the unified alternative.
    assert_eq!(
        unify(".a ~ .z", ".b + .z").unwrap(),
        ".a ~ .b + .z, .a.b + .z"
    );
    // A `~` that covers the `+` side is elided entirely.
    assert_eq!(unify(".a ~ .z", ".a + .z").unwrap(), ".a + .z");
}

#[test]
fn test_unify_child_combinators() {
    // Identical combinators force the compounds to unify.
    assert_eq!(unify(".a > .z", ".b > .z").unwrap(), ".a.b > .z");
    assert_eq!(unify("#x > .z", "#y > .z"), None);
    // `>` on one side resolves the sibling side first.
    assert_eq!(unify(".a > .z", ".b ~ .z").unwrap(), ".a > .b ~ .z");
}

#[test]
fn test_unify_rootish_selectors() {
    // Two rootish heads must unify into one.
    assert_eq!(unify(":root .a", ":root .b").unwrap(), ":root .a.b");
}

#[test]
fn test_unification_soundness() {
    // Property: if unify(a, b) = u, then a ⊇ u and b ⊇ u.
    let cases = [
        (".a.b", ".b.c"),
        ("a", ".x"),
        (".a .b", ".c"),
        (".x .y", ".p .q"),
        (".a ~ .z", ".a + .z"),
        (".a > .z", ".b > .z"),
    ];
    for (a, b) in cases {
        let left = parse(a);
        let right = parse(b);
        let unified = left.unify(&right).unwrap();
        assert!(
            left.is_superselector_of(&unified),
            "{a} is not a superselector of unify({a}, {b}) = {unified}"
        );
        assert!(
            right.is_superselector_of(&unified),
            "{b} is not a superselector of unify({a}, {b}) = {unified}"
        );
    }
}
