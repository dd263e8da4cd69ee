//! Integration tests for the weaver.
//!
//! The weaver emits orderings of ancestor chains that preserve each
//! input's relative order. Orderings that would split a chain's interior
//! are deliberately elided (merging them in would make the output
//! exponential for very little gain), so two chains interleave as whole
//! runs plus any unifiable common groups.

use sassafras_selector::{parse_selector_list, weave, ComplexSelector};

fn complex(source: &str) -> ComplexSelector {
    parse_selector_list(source).unwrap().components()[0].clone()
}

fn weave_strings(sources: &[&str], force_line_break: bool) -> Vec<String> {
    let complexes: Vec<ComplexSelector> = sources.iter().map(|source| complex(source)).collect();
    weave(&complexes, force_line_break)
        .into_iter()
        .map(|woven| woven.to_string())
        .collect()
}

#[test]
fn test_weave_single_input() {
    assert_eq!(weave_strings(&[".a .b"], false), vec![".a .b"]);
}

#[test]
fn test_weave_appends_single_compounds() {
    assert_eq!(weave_strings(&[".a", ".b"], false), vec![".a .b"]);
    assert_eq!(weave_strings(&[".a", ".b", ".c"], false), vec![".a .b .c"]);
}

#[test]
fn test_weave_interleaves_chains() {
    assert_eq!(
        weave_strings(&[".x .y", ".p .q"], false),
        vec![".x .y .p .q", ".p .x .y .q"]
    );
}

#[test]
fn test_weave_single_parent_prefix() {
    assert_eq!(
        weave_strings(&[".x", ".p .q"], false),
        vec![".x .p .q", ".p .x .q"]
    );
}

#[test]
fn test_weave_shares_common_prefix() {
    // A group common to both chains appears once, with the remainders
    // woven around it.
    assert_eq!(weave_strings(&[".a .b", ".a .c"], false), vec![".a .b .c"]);
}

#[test]
fn test_weave_respects_child_combinators() {
    // `.a > .b` groups as one run, so the other chain can't be spliced
    // into its middle.
    assert_eq!(
        weave_strings(&[".a > .b", ".c .d"], false),
        vec![".a > .b .c .d", ".c .a > .b .d"]
    );
}

#[test]
fn test_weave_marks_line_breaks() {
    let woven = {
        let complexes = vec![complex(".a"), complex(".b .c")];
        weave(&complexes, true)
    };
    assert!(woven.iter().all(ComplexSelector::line_break));
}

#[test]
fn test_weave_preserves_relative_order() {
    // Property: within every output, the components of each input appear
    // in their original relative order.
    let outputs = weave_strings(&[".x .y", ".p .q"], false);
    for output in outputs {
        let x = output.find(".x").unwrap();
        let y = output.find(".y").unwrap();
        let p = output.find(".p").unwrap();
        let q = output.find(".q").unwrap();
        assert!(x < y, "input order broken in {output}");
        assert!(p < q, "input order broken in {output}");
    }
}
