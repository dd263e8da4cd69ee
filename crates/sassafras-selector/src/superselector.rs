//! The superselector oracle.
//!
//! `A` is a superselector of `B` when every element matched by `B` is also
//! matched by `A`, though `A` may match more. The decision is a mutual recursion
//! across the selector hierarchy: lists check coverage of every
//! alternative, complex selectors walk their component chains consuming
//! compatible combinators, compound selectors check containment, and
//! simple selectors bottom out in per-kind rules (with special handling
//! for pseudo selectors that take selector arguments).
//!
//! Used by `@extend` trimming, the `is-superselector()` built-in, and the
//! unifier's redundancy checks.

use crate::selector::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::simple::{is_subselector_pseudo, PseudoSelector, QualifiedName, SimpleSelector};

/// Returns whether `list1` is a superselector of `list2`: every
/// alternative in `list2` must be covered by some alternative in `list1`.
#[must_use]
pub fn list_is_superselector(list1: &[ComplexSelector], list2: &[ComplexSelector]) -> bool {
    list2.iter().all(|complex2| {
        list1
            .iter()
            .any(|complex1| complex_is_superselector(complex1, complex2))
    })
}

/// Returns whether `complex1` is a superselector of `complex2`.
///
/// Selectors with leading combinators are neither superselectors nor
/// subselectors of anything.
#[must_use]
pub fn complex_is_superselector(complex1: &ComplexSelector, complex2: &ComplexSelector) -> bool {
    if !complex1.leading_combinators().is_empty() || !complex2.leading_combinators().is_empty() {
        return false;
    }
    complex_components_are_superselector(complex1.components(), complex2.components())
}

/// The component-chain walk behind [`complex_is_superselector`].
///
/// At each step the current super-component must cover a run of
/// sub-components, and the combinators joining the runs must be
/// compatible: `>` and `+` require themselves, `~` accepts `~` or `+`, and
/// the descendant combinator accepts anything below it.
pub(crate) fn complex_components_are_superselector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    // Selectors with trailing combinators are neither superselectors nor
    // subselectors.
    if complex1
        .last()
        .is_some_and(|component| !component.combinators().is_empty())
    {
        return false;
    }
    if complex2
        .last()
        .is_some_and(|component| !component.combinators().is_empty())
    {
        return false;
    }

    let mut i1 = 0;
    let mut i2 = 0;
    loop {
        let remaining1 = complex1.len() - i1;
        let remaining2 = complex2.len() - i2;
        if remaining1 == 0 || remaining2 == 0 {
            return false;
        }
        // More complex selectors are never superselectors of less complex
        // ones.
        if remaining1 > remaining2 {
            return false;
        }

        let component1 = &complex1[i1];
        if component1.combinators().len() > 1 {
            return false;
        }
        if remaining1 == 1 {
            let parents = &complex2[i2..complex2.len() - 1];
            if parents
                .iter()
                .any(|parent| parent.combinators().len() > 1)
            {
                return false;
            }
            let Some(last) = complex2.last() else { return false };
            return compound_is_superselector(component1.selector(), last.selector(), parents);
        }

        // Find the first run of [complex2] that [component1] covers. We
        // stop before the run would swallow all of [complex2], because
        // [complex1] still has components that need something to match.
        let mut end = i2;
        loop {
            let component2 = &complex2[end];
            if component2.combinators().len() > 1 {
                return false;
            }
            if compound_is_superselector(
                component1.selector(),
                component2.selector(),
                &complex2[i2..end],
            ) {
                break;
            }
            end += 1;
            if end == complex2.len() - 1 {
                return false;
            }
        }

        let component2 = &complex2[end];
        match (
            component1.combinators().first(),
            component2.combinators().first(),
        ) {
            (Some(combinator1), Some(combinator2)) => {
                // `.a ~ .b` is a superselector of `.a + .b`, but otherwise
                // the combinators must match.
                if *combinator1 == Combinator::FollowingSibling {
                    if *combinator2 == Combinator::Child {
                        return false;
                    }
                } else if combinator1 != combinator2 {
                    return false;
                }
                // `.foo > .baz` is not a superselector of
                // `.foo > .bar > .baz` or `.foo > .bar .baz`, despite
                // `.baz` covering `.bar > .baz` and `.bar .baz`. Same goes
                // for `+` and `~`.
                if remaining1 == 2 && remaining2 > 2 {
                    return false;
                }
            }
            (Some(_), None) => return false,
            (None, Some(combinator2)) => {
                if *combinator2 != Combinator::Child {
                    return false;
                }
            }
            (None, None) => {}
        }
        i1 += 1;
        i2 = end + 1;
    }
}

/// Like [`complex_components_are_superselector`], but compares the chains
/// as though they shared an implicit base simple selector. For example,
/// `B` is not normally a superselector of `B A`, but it *is* a parent
/// superselector, since `B X` is a superselector of `B A X`.
pub(crate) fn complex_is_parent_superselector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    if complex1.is_empty() && complex2.is_empty() {
        return false;
    }
    if complex1.len() > complex2.len() {
        return false;
    }
    let base = ComplexSelectorComponent::new(CompoundSelector::of(Vec::new()), Vec::new());
    let mut with_base1 = complex1.to_vec();
    with_base1.push(base.clone());
    let mut with_base2 = complex2.to_vec();
    with_base2.push(base);
    complex_components_are_superselector(&with_base1, &with_base2)
}

/// Returns whether `compound1` is a superselector of `compound2`.
///
/// `parents` are the components of `compound2`'s complex selector that
/// precede it; selector pseudos in `compound1` may need them to decide
/// coverage.
pub(crate) fn compound_is_superselector(
    compound1: &CompoundSelector,
    compound2: &CompoundSelector,
    parents: &[ComplexSelectorComponent],
) -> bool {
    // Every selector in [compound1] must cover something in [compound2].
    for simple1 in compound1.components() {
        let handled = match simple1 {
            SimpleSelector::Pseudo(pseudo1) if pseudo1.selector().is_some() => {
                if !selector_pseudo_is_superselector(pseudo1, compound2, parents) {
                    return false;
                }
                true
            }
            _ => false,
        };
        if !handled && !simple_is_superselector_of_compound(simple1, compound2) {
            return false;
        }
    }
    // [compound1] can't be a superselector of a selector with
    // pseudo-elements that [compound1] doesn't share.
    for simple2 in compound2.components() {
        if let SimpleSelector::Pseudo(pseudo2) = simple2 {
            if pseudo2.is_pseudo_element()
                && pseudo2.selector().is_none()
                && !simple_is_superselector_of_compound(simple2, compound1)
            {
                return false;
            }
        }
    }
    true
}

/// Returns whether `simple1` is a superselector of `simple2`.
fn simple_is_superselector(simple1: &SimpleSelector, simple2: &SimpleSelector) -> bool {
    if let SimpleSelector::Type(name1) = simple1 {
        if name1.name == "*" {
            return universal_covers(name1, simple2);
        }
    }

    if simple1 == simple2 {
        return true;
    }

    // Some selector pseudo-classes can match normal selectors: `.foo`
    // covers `:matches(.foo)`.
    if let SimpleSelector::Pseudo(pseudo2) = simple2 {
        if let Some(selector2) = pseudo2.selector() {
            if pseudo2.is_class() && is_subselector_pseudo(pseudo2.normalized()) {
                return selector2.components().iter().all(|complex| {
                    complex.leading_combinators().is_empty()
                        && complex.components().len() == 1
                        && complex.components()[0].combinators().is_empty()
                        && complex.components()[0].selector().contains(simple1)
                });
            }
        }
    }
    false
}

/// Whether the universal selector `name1` (with its namespace) covers
/// `simple2`.
fn universal_covers(name1: &QualifiedName, simple2: &SimpleSelector) -> bool {
    if name1.has_universal_namespace() {
        return true;
    }
    match simple2 {
        SimpleSelector::Type(name2) => name1.namespace == name2.namespace,
        _ => name1.namespace.is_none(),
    }
}

/// Returns whether `simple` covers at least one selector in `compound`.
fn simple_is_superselector_of_compound(
    simple: &SimpleSelector,
    compound: &CompoundSelector,
) -> bool {
    compound
        .components()
        .iter()
        .any(|other| simple_is_superselector(simple, other))
}

/// Returns all pseudo selectors in `compound` that have a selector
/// argument, the given `name`, and the given class-ness.
fn selector_pseudos_named<'a>(
    compound: &'a CompoundSelector,
    name: &str,
    is_class: bool,
) -> Vec<&'a PseudoSelector> {
    compound
        .components()
        .iter()
        .filter_map(|simple| match simple {
            SimpleSelector::Pseudo(pseudo)
                if pseudo.is_class() == is_class
                    && pseudo.selector().is_some()
                    && pseudo.name() == name =>
            {
                Some(pseudo)
            }
            _ => None,
        })
        .collect()
}

/// Returns whether the selector-argument pseudo `pseudo1` is a
/// superselector of `compound2`, given the components preceding
/// `compound2` in its complex selector.
fn selector_pseudo_is_superselector(
    pseudo1: &PseudoSelector,
    compound2: &CompoundSelector,
    parents: &[ComplexSelectorComponent],
) -> bool {
    let Some(selector1) = pseudo1.selector() else {
        return false;
    };

    match pseudo1.normalized() {
        "matches" | "any" | "is" | "where" => {
            for pseudo2 in selector_pseudos_named(compound2, pseudo1.name(), true) {
                if let Some(selector2) = pseudo2.selector() {
                    if selector1.is_superselector_of(selector2) {
                        return true;
                    }
                }
            }
            for complex1 in selector1.components() {
                let mut parents_and_compound = parents.to_vec();
                parents_and_compound
                    .push(ComplexSelectorComponent::new(compound2.clone(), Vec::new()));
                if complex_components_are_superselector(
                    complex1.components(),
                    &parents_and_compound,
                ) {
                    return true;
                }
            }
            false
        }
        "has" | "host" | "host-context" | "slotted" => {
            let is_class = pseudo1.normalized() != "slotted";
            for pseudo2 in selector_pseudos_named(compound2, pseudo1.name(), is_class) {
                if let Some(selector2) = pseudo2.selector() {
                    if selector1.is_superselector_of(selector2) {
                        return true;
                    }
                }
            }
            false
        }
        "not" => selector1.components().iter().all(|complex| {
            pseudo_not_is_superselector_of_compound(pseudo1, compound2, complex)
        }),
        "current" => selector_pseudos_named(compound2, pseudo1.name(), true)
            .into_iter()
            .any(|pseudo2| pseudo2 == pseudo1),
        "nth-child" | "nth-last-child" => {
            for simple2 in compound2.components() {
                if let SimpleSelector::Pseudo(pseudo2) = simple2 {
                    if pseudo2.name() == pseudo1.name()
                        && pseudo2.argument() == pseudo1.argument()
                    {
                        if let Some(selector2) = pseudo2.selector() {
                            if selector1.is_superselector_of(selector2) {
                                return true;
                            }
                        }
                    }
                }
            }
            false
        }
        _ => false,
    }
}

/// One alternative of a `:not(...)` superselector check: `pseudo1` (a
/// `:not` with `complex` among its alternatives) covers `compound2` when
/// `compound2` provably excludes everything `complex` matches.
fn pseudo_not_is_superselector_of_compound(
    pseudo1: &PseudoSelector,
    compound2: &CompoundSelector,
    complex: &ComplexSelector,
) -> bool {
    for simple2 in compound2.components() {
        match simple2 {
            SimpleSelector::Type(name2) => {
                if let Some(last) = complex.components().last() {
                    if compound_has_different_type(name2, last.selector()) {
                        return true;
                    }
                }
            }
            SimpleSelector::Id(name2) => {
                if let Some(last) = complex.components().last() {
                    if compound_has_different_id(name2, last.selector()) {
                        return true;
                    }
                }
            }
            SimpleSelector::Pseudo(pseudo2) => {
                if pseudo_covers_not_alternative(pseudo1, pseudo2, complex) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Whether `compound` contains a type selector different from `name`.
fn compound_has_different_type(name: &QualifiedName, compound: &CompoundSelector) -> bool {
    compound.components().iter().any(|simple| {
        matches!(simple, SimpleSelector::Type(other) if other != name)
    })
}

/// Whether `compound` contains an id selector different from `name`.
fn compound_has_different_id(name: &str, compound: &CompoundSelector) -> bool {
    compound.components().iter().any(|simple| {
        matches!(simple, SimpleSelector::Id(other) if other != name)
    })
}

/// Whether `pseudo2` (in the sub-compound) lets `pseudo1`'s `:not`
/// alternative `complex` be excluded: both must carry the same name and
/// `pseudo2`'s argument must cover the alternative.
fn pseudo_covers_not_alternative(
    pseudo1: &PseudoSelector,
    pseudo2: &PseudoSelector,
    complex: &ComplexSelector,
) -> bool {
    let Some(selector2) = pseudo2.selector() else {
        return false;
    };
    pseudo1.name() == pseudo2.name()
        && list_is_superselector(
            selector2.components(),
            core::slice::from_ref(complex),
        )
}
