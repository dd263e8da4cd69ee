//! Integration tests for parent-selector resolution and the `nest`/
//! `append` built-in backings.

use sassafras_common::{Backtraces, ErrorKind};
use sassafras_selector::functions::{append_selectors, nest_selectors};
use sassafras_selector::{parse_selector_list, SelectorList};

fn parse(source: &str) -> SelectorList {
    parse_selector_list(source).unwrap()
}

fn resolve(child: &str, parent: Option<&str>, implicit_parent: bool) -> Result<String, ErrorKind> {
    let child = parse(child);
    let parent = parent.map(parse);
    child
        .resolve_parent_selectors(parent.as_ref(), implicit_parent, &Backtraces::new())
        .map(|resolved| resolved.to_string())
        .map_err(|error| error.kind)
}

#[test]
fn test_implicit_parent() {
    assert_eq!(
        resolve(".a .b", Some("x, y"), true).unwrap(),
        "x .a .b, y .a .b"
    );
}

#[test]
fn test_explicit_parent_in_compound() {
    assert_eq!(resolve("&.b", Some(".a"), true).unwrap(), ".a.b");
    assert_eq!(resolve("&:hover", Some(".a.b"), true).unwrap(), ".a.b:hover");
}

#[test]
fn test_suffix_fusion() {
    // An identifier directly after `&` fuses onto the parent's final
    // simple selector by name concatenation.
    assert_eq!(resolve("&foo", Some(".bar"), true).unwrap(), ".barfoo");
    assert_eq!(resolve("&foo", Some("a"), true).unwrap(), "afoo");
    assert_eq!(resolve("&-suffix", Some("#main"), true).unwrap(), "#main-suffix");
}

#[test]
fn test_bare_parent() {
    assert_eq!(resolve("&", Some(".a, .b"), true).unwrap(), ".a, .b");
    assert_eq!(resolve("& .c", Some(".a"), true).unwrap(), ".a .c");
    assert_eq!(resolve("& > .b", Some(".a"), true).unwrap(), ".a > .b");
    assert_eq!(resolve(".c &", Some(".a"), true).unwrap(), ".c .a");
}

#[test]
fn test_no_implicit_parent() {
    // Without implicit parents, a selector with no `&` is untouched.
    assert_eq!(resolve(".a .b", Some(".x"), false).unwrap(), ".a .b");
    // ...but explicit references still resolve.
    assert_eq!(resolve("&.b", Some(".x"), false).unwrap(), ".x.b");
}

#[test]
fn test_resolution_is_idempotent_without_parent_refs() {
    // Property: resolving a selector containing no `&` against any parent
    // with implicit_parent=false returns it unchanged.
    for source in [".a", ".a > .b", "#x:hover, .y.z", "a + b ~ c"] {
        let original = parse(source);
        let resolved = original
            .resolve_parent_selectors(Some(&parse(".parent")), false, &Backtraces::new())
            .unwrap();
        assert_eq!(resolved, original, "resolution changed {source}");
    }
}

#[test]
fn test_parent_inside_pseudo() {
    assert_eq!(resolve(":not(&)", Some(".a"), false).unwrap(), ":not(.a)");
    assert_eq!(
        resolve(".x:has(> &)", Some(".a"), false).unwrap(),
        ".x:has(> .a)"
    );
}

#[test]
fn test_alternatives_flatten_column_major() {
    assert_eq!(
        resolve("&.x, &.y", Some(".a, .b"), true).unwrap(),
        ".a.x, .a.y, .b.x, .b.y"
    );
}

#[test]
fn test_top_level_parent_is_an_error() {
    let error = resolve("&", None, true).unwrap_err();
    assert!(matches!(error, ErrorKind::TopLevelParent));
    assert_eq!(
        error.to_string(),
        "Top-level selectors may not contain the parent selector \"&\"."
    );
    // A selector without `&` resolves fine against no parent at all.
    assert_eq!(resolve(".a", None, true).unwrap(), ".a");
}

#[test]
fn test_parent_ending_in_combinator_rejects_compounds() {
    let error = resolve("&.b", Some("a >"), true).unwrap_err();
    assert!(matches!(error, ErrorKind::InvalidParent { .. }));
    assert_eq!(
        error.to_string(),
        "Selector \"a >\" can't be used as a parent in a compound selector."
    );
}

#[test]
fn test_nest_selectors() {
    let nested = nest_selectors(
        &[parse(".a"), parse(".b, .c")],
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(nested.to_string(), ".a .b, .a .c");

    let with_parent = nest_selectors(
        &[parse(".a, .b"), parse("&:hover")],
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(with_parent.to_string(), ".a:hover, .b:hover");
}

#[test]
fn test_append_selectors() {
    let appended = append_selectors(&[parse("a"), parse(".disabled")], &Backtraces::new());
    assert_eq!(appended.unwrap().to_string(), "a.disabled");

    // A bare identifier appends as a suffix.
    let suffixed = append_selectors(&[parse("a"), parse("b")], &Backtraces::new());
    assert_eq!(suffixed.unwrap().to_string(), "ab");

    // Leading combinators and universal or namespaced heads can't attach.
    let error = append_selectors(&[parse(".a"), parse("> b")], &Backtraces::new()).unwrap_err();
    assert!(matches!(error.kind, ErrorKind::CantAppend { .. }));
    assert!(append_selectors(&[parse("a"), parse("*")], &Backtraces::new()).is_err());
}
