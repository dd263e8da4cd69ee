//! Integration tests for the incremental `@extend` engine.

use sassafras_common::{Backtraces, ErrorKind};
use sassafras_selector::{
    parse_selector_list, parse_simple_selector, ExtendMode, ExtensionStore, MediaContext,
    SelectorList, SimpleSelector,
};

fn parse(source: &str) -> SelectorList {
    parse_selector_list(source).unwrap()
}

fn simple(source: &str) -> SimpleSelector {
    parse_simple_selector(source).unwrap()
}

fn new_store() -> ExtensionStore {
    ExtensionStore::new(ExtendMode::Normal, Backtraces::new())
}

fn media(queries: &[&str]) -> MediaContext {
    MediaContext::new(queries.iter().map(ToString::to_string).collect())
}

#[test]
fn test_basic_extension() {
    let mut store = new_store();
    let id = store.add_selector(parse(".a"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_extension_before_selector() {
    // Selectors registered after an extension pick it up immediately.
    let mut store = new_store();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    let id = store.add_selector(parse(".a"), None).unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_chained_extensions_cascade() {
    // .b extends .a, then .c extends .b; the chain reaches .a.
    let mut store = new_store();
    let id = store.add_selector(parse(".a"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    store
        .add_extension(&parse(".c"), &simple(".b"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b, .c");
}

#[test]
fn test_chained_extensions_reverse_order() {
    // As the evaluator does, the extender passed for `.b { @extend .a }`
    // is the rule's current (already extended) selector list.
    let mut store = new_store();
    let id_a = store.add_selector(parse(".a"), None).unwrap();
    let _ = store.add_selector(parse(".c"), None).unwrap();
    store
        .add_extension(&parse(".c"), &simple(".b"), None, false)
        .unwrap();
    let id_b = store.add_selector(parse(".b"), None).unwrap();
    assert_eq!(store.selector(id_b).to_string(), ".b, .c");
    let extender = store.selector(id_b).clone();
    store
        .add_extension(&extender, &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id_a).to_string(), ".a, .b, .c");
}

#[test]
fn test_duplicate_extension_is_merged_not_repeated() {
    let mut store = new_store();
    let id = store.add_selector(parse(".a"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, true)
        .unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_extension_into_descendant_selector() {
    let mut store = new_store();
    let id = store.add_selector(parse(".a .b"), None).unwrap();
    store
        .add_extension(&parse(".x .y"), &simple(".b"), None, false)
        .unwrap();
    assert_eq!(
        store.selector(id).to_string(),
        ".a .b, .a .x .y, .x .a .y"
    );
}

#[test]
fn test_extension_unifies_compound_targets() {
    let mut store = new_store();
    let id = store.add_selector(parse(".a.b"), None).unwrap();
    store
        .add_extension(&parse(".c"), &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a.b, .b.c");
}

#[test]
fn test_extension_into_pseudo_argument() {
    let mut store = new_store();
    let id = store.add_selector(parse(":not(.a)"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ":not(.a):not(.b)");
}

#[test]
fn test_originals_survive_self_extension() {
    // A rule that extends a component of its own selector keeps its
    // original alternative.
    let mut store = new_store();
    let id = store.add_selector(parse(".x.y"), None).unwrap();
    store
        .add_extension(&parse(".x"), &simple(".y"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".x.y, .x");
}

#[test]
fn test_placeholder_extension() {
    let mut store = new_store();
    let id = store.add_selector(parse("%base"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple("%base"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), "%base, .b");
    // The placeholder alternative stays invisible; the evaluator drops it
    // at emit time.
    assert!(parse("%base").is_invisible());
    assert!(!store.selector(id).is_invisible());
}

#[test]
fn test_media_context_compatibility() {
    // A top-level extension may reach into a media context...
    let mut store = new_store();
    let id = store
        .add_selector(parse(".a"), Some(media(&["print"])))
        .unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");

    // ...and a media-scoped extension may reach rules nested deeper in
    // the same context.
    let mut store = new_store();
    let id = store
        .add_selector(parse(".a"), Some(media(&["print", "(min-width: 100px)"])))
        .unwrap();
    store
        .add_extension(&parse(".b"), &simple(".a"), Some(&media(&["print"])), false)
        .unwrap();
    assert_eq!(store.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_extend_across_media_is_an_error() {
    let mut store = new_store();
    let _ = store.add_selector(parse(".a"), None).unwrap();
    let error = store
        .add_extension(&parse(".b"), &simple(".a"), Some(&media(&["print"])), false)
        .unwrap_err();
    assert!(matches!(error.kind, ErrorKind::ExtendAcrossMedia));
    assert_eq!(
        error.kind.to_string(),
        "You may not @extend selectors across media queries."
    );
}

#[test]
fn test_unsatisfied_extends() {
    let mut store = new_store();
    let _ = store.add_selector(parse(".a"), None).unwrap();
    store
        .add_extension(&parse(".b"), &simple(".missing"), None, false)
        .unwrap();
    let unsatisfied = store.check_for_unsatisfied_extends().unwrap();
    assert_eq!(unsatisfied.target().to_string(), ".missing");

    let error = store.assert_no_unsatisfied_extends().unwrap_err();
    assert!(matches!(error.kind, ErrorKind::UnsatisfiedExtend { .. }));
    assert!(error.kind.to_string().contains("The target selector was not found."));
}

#[test]
fn test_optional_extends_are_satisfied_by_default() {
    let mut store = new_store();
    store
        .add_extension(&parse(".b"), &simple(".missing"), None, true)
        .unwrap();
    assert!(store.check_for_unsatisfied_extends().is_none());
    store.assert_no_unsatisfied_extends().unwrap();
}

#[test]
fn test_extend_static() {
    // One-shot form backing `selector-extend()`.
    let result = ExtensionStore::extend(
        &parse(".a.b"),
        &parse(".c"),
        &parse(".a"),
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(result.to_string(), ".a.b, .b.c");

    // A selector without the target is returned unchanged.
    let unchanged = ExtensionStore::extend(
        &parse(".x"),
        &parse(".c"),
        &parse(".a"),
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(unchanged.to_string(), ".x");
}

#[test]
fn test_replace_static() {
    // One-shot form backing `selector-replace()`: the target is dropped.
    let result = ExtensionStore::replace(
        &parse(".a.b"),
        &parse(".c"),
        &parse(".a"),
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(result.to_string(), ".b.c");
}

#[test]
fn test_extend_requires_compound_targets() {
    let error = ExtensionStore::extend(
        &parse(".x"),
        &parse(".c"),
        &parse(".a .b"),
        &Backtraces::new(),
    )
    .unwrap_err();
    assert!(matches!(error.kind, ErrorKind::CompoundRequired { .. }));
    assert_eq!(
        error.kind.to_string(),
        "Can't extend complex selector .a .b."
    );
}

#[test]
fn test_targets_mode_requires_all_targets() {
    // Extending `.a` by target `.a.b` must not match a lone `.a`.
    let result = ExtensionStore::extend(
        &parse(".a"),
        &parse(".c"),
        &parse(".a.b"),
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(result.to_string(), ".a");

    // But it does match `.a.b`.
    let result = ExtensionStore::extend(
        &parse(".a.b"),
        &parse(".c"),
        &parse(".a.b"),
        &Backtraces::new(),
    )
    .unwrap();
    assert_eq!(result.to_string(), ".a.b, .c");
}

#[test]
fn test_endless_extend_is_capped() {
    let mut store = new_store();
    let _ = store.add_selector(parse(".a"), None).unwrap();
    let extenders: Vec<String> = (0..501).map(|i| format!(".x{i}")).collect();
    let extender = parse(&extenders.join(", "));
    let error = store
        .add_extension(&extender, &simple(".a"), None, false)
        .unwrap_err();
    assert!(matches!(error.kind, ErrorKind::EndlessExtend));
}

#[test]
fn test_cross_module_extensions() {
    let mut upstream = new_store();
    upstream
        .add_extension(&parse(".b"), &simple(".a"), None, false)
        .unwrap();

    let mut local = new_store();
    let id = local.add_selector(parse(".a"), None).unwrap();
    local.add_extension_stores(&[&upstream]).unwrap();
    assert_eq!(local.selector(id).to_string(), ".a, .b");
}

#[test]
fn test_private_placeholders_stay_private() {
    let mut upstream = new_store();
    upstream
        .add_extension(&parse(".b"), &simple("%-private"), None, false)
        .unwrap();

    let mut local = new_store();
    let id = local.add_selector(parse("%-private"), None).unwrap();
    local.add_extension_stores(&[&upstream]).unwrap();
    assert_eq!(local.selector(id).to_string(), "%-private");
}

#[test]
fn test_deterministic_rewrites() {
    // Property: the same operation sequence produces identical output.
    let run = || {
        let mut store = new_store();
        let id = store.add_selector(parse(".a, .q .r"), None).unwrap();
        store
            .add_extension(&parse(".b, .c .d"), &simple(".a"), None, false)
            .unwrap();
        store
            .add_extension(&parse(".e"), &simple(".d"), None, false)
            .unwrap();
        store.selector(id).to_string()
    };
    let first = run();
    for _ in 0..10 {
        assert_eq!(run(), first);
    }
}
