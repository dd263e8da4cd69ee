//! Integration tests for the superselector oracle.
//!
//! `is_superselector(a, b)` holds when every element matched by `b` is
//! also matched by `a`.

use sassafras_selector::{parse_selector_list, SelectorList};

fn parse(source: &str) -> SelectorList {
    parse_selector_list(source).unwrap()
}

fn is_super(superselector: &str, subselector: &str) -> bool {
    parse(superselector).is_superselector_of(&parse(subselector))
}

#[test]
fn test_compound_containment() {
    assert!(is_super(".a", ".a.b"));
    assert!(!is_super(".a.b", ".a"));
    assert!(is_super("a", "a.b#c"));
    assert!(!is_super("a", "b"));
    assert!(!is_super("#x", "#y"));
}

#[test]
fn test_reflexivity() {
    // Property: every non-bogus selector is a superselector of itself.
    for source in [
        "a",
        ".a.b",
        "#x:hover",
        ".a > .b + .c",
        "a ~ b",
        ":not(.a)",
        ":is(.a, .b)",
        "[href^=http]",
        "%ph .x",
    ] {
        assert!(is_super(source, source), "not reflexive for {source}");
    }
}

#[test]
fn test_transitivity() {
    // Property: a ⊇ b and b ⊇ c imply a ⊇ c.
    let cases = [
        (".a", ".a.b", ".a.b.c"),
        ("a", "a.x", "a.x#y"),
        (".a .b", ".a .b.c", ".a > .b.c.d"),
    ];
    for (a, b, c) in cases {
        assert!(is_super(a, b));
        assert!(is_super(b, c));
        assert!(is_super(a, c), "transitivity failed for {a} / {b} / {c}");
    }
}

#[test]
fn test_descendant_walk() {
    assert!(is_super(".a .c", ".a .b .c"));
    assert!(is_super(".a .c", ".a > .c"));
    assert!(!is_super(".a > .c", ".a .c"));
    assert!(!is_super(".a .c", ".a + .c"));
    assert!(!is_super(".a .b", ".b .a"));
}

#[test]
fn test_combinator_compatibility() {
    // `~` accepts `~` and `+`; `>` and `+` accept only themselves.
    assert!(is_super(".a ~ .c", ".a ~ .c"));
    assert!(is_super(".a ~ .c", ".a + .c"));
    assert!(!is_super(".a + .c", ".a ~ .c"));
    assert!(is_super(".a > .c", ".a > .c"));
    assert!(!is_super(".a > .c", ".a ~ .c"));

    // `.foo > .baz` doesn't cover `.foo > .bar > .baz` even though `.baz`
    // covers `.bar > .baz`.
    assert!(!is_super(".foo > .baz", ".foo > .bar > .baz"));
    assert!(!is_super(".foo + .baz", ".foo + .bar + .baz"));
}

#[test]
fn test_trailing_and_leading_combinators_never_qualify() {
    assert!(!is_super("a >", "a >"));
    assert!(!is_super("> a", "> a"));
    assert!(!is_super("a", "a >"));
}

#[test]
fn test_list_coverage() {
    // Every alternative of the subselector must be covered by some
    // alternative of the superselector.
    assert!(is_super(".a, .b", ".a"));
    assert!(is_super(".a, .b", ".a.x, .b.y"));
    assert!(!is_super(".a", ".a, .b"));
}

#[test]
fn test_universal_selector() {
    assert!(is_super("*", "div"));
    assert!(is_super("*", ".a"));
    assert!(is_super("*|*", "svg|rect"));
    assert!(!is_super("svg|*", "div"));
    assert!(is_super("svg|*", "svg|rect"));
}

#[test]
fn test_selector_pseudos() {
    // `.foo` covers `:is(.foo)` and vice versa.
    assert!(is_super(".a", ":is(.a)"));
    assert!(is_super(":is(.a)", ".a"));
    assert!(is_super(":matches(.a, .b)", ".a"));
    assert!(!is_super(":is(.a)", ".b"));

    // `:not(X)` covers Y when Y provably excludes X.
    assert!(is_super(":not(div)", "span"));
    assert!(!is_super(":not(.a)", ".b"));
    assert!(is_super(":not(#x)", "#y"));

    // `:has` compares its arguments structurally.
    assert!(is_super(":has(.a, .b)", ":has(.a)"));
    assert!(!is_super(":has(.a)", ":has(.b)"));
}

#[test]
fn test_pseudo_elements_must_be_shared() {
    // A selector can't cover a pseudo-element it doesn't itself carry.
    assert!(!is_super(".a", ".a::before"));
    assert!(is_super(".a::before", ".a.b::before"));
    assert!(!is_super(".a::before", ".a::after"));
}
