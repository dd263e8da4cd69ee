//! The weaver: interleaving ancestor chains.
//!
//! Given parent chains that must all precede a common target selector,
//! [`weave`] emits every ordering that preserves the relative order within
//! each input, merging compatible combinators and unifying where two
//! chains demand the same element. For example `.foo .bar` and `.baz
//! .bang` weave into `.foo .bar .baz .bang`, `.foo .baz .bar .bang`,
//! `.foo .baz .bang .bar`, and so on through `.baz .bang .foo .bar`.
//!
//! Some orderings are elided: merged selectors like `.foo.baz .bar .bang`
//! would make the output exponentially large for very little gain.

use std::collections::VecDeque;

use crate::selector::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::simple::SimpleSelector;
use crate::superselector::{complex_is_parent_superselector, compound_is_superselector};
use crate::unify::{is_unique, unify_compound, unify_complex};
use crate::utils::{chunks, lcs, lcs_with, paths};

/// Expands "parenthesized selectors": given a list of complex selectors
/// that must all appear as ancestors of one target, returns all valid
/// interleavings. The first selector is the prefix; each later selector
/// contributes its final component verbatim and weaves the rest of its
/// chain into the prefix.
///
/// If `force_line_break` is true, all returned selectors are marked as
/// preceded by a line break.
#[must_use]
pub fn weave(complexes: &[ComplexSelector], force_line_break: bool) -> Vec<ComplexSelector> {
    let Some(first) = complexes.first() else {
        return Vec::new();
    };
    if complexes.len() == 1 {
        if !force_line_break || first.line_break() {
            return complexes.to_vec();
        }
        return vec![ComplexSelector::new(
            first.leading_combinators().to_vec(),
            first.components().to_vec(),
            true,
        )];
    }

    let mut prefixes = vec![first.clone()];
    for complex in &complexes[1..] {
        let Some(target) = complex.components().last() else {
            continue;
        };
        if complex.components().len() == 1 {
            prefixes = prefixes
                .iter()
                .map(|prefix| prefix.concatenate(complex, force_line_break))
                .collect();
            continue;
        }

        let mut new_prefixes = Vec::new();
        for prefix in &prefixes {
            for parent_prefix in weave_parents(prefix, complex) {
                new_prefixes
                    .push(parent_prefix.with_additional_component(target.clone(), force_line_break));
            }
        }
        prefixes = new_prefixes;
    }
    prefixes
}

/// Interweaves `prefix` and `base` (without its final component) as
/// parents of the same target selector. Returns all orderings that keep
/// each input's relative order, or nothing if their combinators cannot be
/// reconciled.
pub(crate) fn weave_parents(
    prefix: &ComplexSelector,
    base: &ComplexSelector,
) -> Vec<ComplexSelector> {
    let Some(leading) =
        merge_leading_combinators(prefix.leading_combinators(), base.leading_combinators())
    else {
        return Vec::new();
    };

    let mut queue1: VecDeque<ComplexSelectorComponent> =
        prefix.components().iter().cloned().collect();
    let mut queue2: VecDeque<ComplexSelectorComponent> = base.components()
        [..base.components().len() - 1]
        .iter()
        .cloned()
        .collect();

    let Some(trailing) = merge_trailing_combinators(&mut queue1, &mut queue2) else {
        return Vec::new();
    };

    // Make sure there's at most one rootish selector in the output.
    match (first_if_rootish(&mut queue1), first_if_rootish(&mut queue2)) {
        (Some(root1), Some(root2)) => {
            let Some(root) = unify_compound(root1.selector(), root2.selector()) else {
                return Vec::new();
            };
            queue1.push_front(ComplexSelectorComponent::new(
                root.clone(),
                root1.combinators().to_vec(),
            ));
            queue2.push_front(ComplexSelectorComponent::new(
                root,
                root2.combinators().to_vec(),
            ));
        }
        (Some(root), None) | (None, Some(root)) => {
            queue1.push_front(root.clone());
            queue2.push_front(root);
        }
        (None, None) => {}
    }

    let mut groups1 = group_selectors(queue1);
    let mut groups2 = group_selectors(queue2);

    let all_groups1: Vec<Vec<ComplexSelectorComponent>> = groups1.iter().cloned().collect();
    let all_groups2: Vec<Vec<ComplexSelectorComponent>> = groups2.iter().cloned().collect();
    let sequence = lcs_with(&all_groups1, &all_groups2, select_group);

    let mut choices: Vec<Vec<Vec<ComplexSelectorComponent>>> = Vec::new();
    for group in sequence {
        let before = chunks(&mut groups1, &mut groups2, |queue| {
            queue
                .front()
                .is_none_or(|first| complex_is_parent_superselector(first, &group))
        });
        choices.push(
            before
                .into_iter()
                .map(|chunk| chunk.into_iter().flatten().collect())
                .collect(),
        );
        choices.push(vec![group]);
        let _ = groups1.pop_front();
        let _ = groups2.pop_front();
    }
    let tail = chunks(&mut groups1, &mut groups2, VecDeque::is_empty);
    choices.push(
        tail.into_iter()
            .map(|chunk| chunk.into_iter().flatten().collect())
            .collect(),
    );
    choices.extend(trailing);
    choices.retain(|choice| !choice.is_empty());

    let line_break = prefix.line_break() || base.line_break();
    paths(&choices)
        .into_iter()
        .map(|path| {
            ComplexSelector::new(
                leading.clone(),
                path.into_iter().flatten().collect(),
                line_break,
            )
        })
        .collect()
}

/// Merges the leading combinators of two parent chains. One side empty
/// takes the other; otherwise the longest common subsequence must equal
/// one side, and the other (the supersequence) wins. Returns `None` when
/// the chains cannot be merged.
fn merge_leading_combinators(
    combinators1: &[Combinator],
    combinators2: &[Combinator],
) -> Option<Vec<Combinator>> {
    if combinators1.is_empty() {
        return Some(combinators2.to_vec());
    }
    if combinators2.is_empty() {
        return Some(combinators1.to_vec());
    }
    let common = lcs(combinators1, combinators2);
    if common == combinators1 {
        Some(combinators2.to_vec())
    } else if common == combinators2 {
        Some(combinators1.to_vec())
    } else {
        None
    }
}

/// Extracts trailing combinators, and the components they apply to, from
/// both queues and merges them into choices of component sequences. The
/// result is ordered front-to-back; `None` means the sequences cannot be
/// merged.
fn merge_trailing_combinators(
    components1: &mut VecDeque<ComplexSelectorComponent>,
    components2: &mut VecDeque<ComplexSelectorComponent>,
) -> Option<Vec<Vec<Vec<ComplexSelectorComponent>>>> {
    let mut result: Vec<Vec<Vec<ComplexSelectorComponent>>> = Vec::new();

    loop {
        let combinators1 = components1
            .back()
            .map(|component| component.combinators().to_vec())
            .unwrap_or_default();
        let combinators2 = components2
            .back()
            .map(|component| component.combinators().to_vec())
            .unwrap_or_default();

        if combinators1.is_empty() && combinators2.is_empty() {
            break;
        }
        if combinators1.len() > 1 || combinators2.len() > 1 {
            return None;
        }

        match (combinators1.first().copied(), combinators2.first().copied()) {
            (Some(Combinator::FollowingSibling), Some(Combinator::FollowingSibling)) => {
                let component1 = components1.pop_back()?;
                let component2 = components2.pop_back()?;
                if compound_is_superselector(component1.selector(), component2.selector(), &[]) {
                    result.push(vec![vec![component2]]);
                } else if compound_is_superselector(
                    component2.selector(),
                    component1.selector(),
                    &[],
                ) {
                    result.push(vec![vec![component1]]);
                } else {
                    let mut choices = vec![
                        vec![component1.clone(), component2.clone()],
                        vec![component2.clone(), component1.clone()],
                    ];
                    if let Some(unified) =
                        unify_compound(component1.selector(), component2.selector())
                    {
                        choices.push(vec![ComplexSelectorComponent::new(
                            unified,
                            component1.combinators().to_vec(),
                        )]);
                    }
                    result.push(choices);
                }
            }
            (Some(Combinator::FollowingSibling), Some(Combinator::NextSibling))
            | (Some(Combinator::NextSibling), Some(Combinator::FollowingSibling)) => {
                let (following, next) =
                    if combinators1.first() == Some(&Combinator::FollowingSibling) {
                        (components1.pop_back()?, components2.pop_back()?)
                    } else {
                        (components2.pop_back()?, components1.pop_back()?)
                    };
                if compound_is_superselector(following.selector(), next.selector(), &[]) {
                    result.push(vec![vec![next]]);
                } else {
                    let mut choices = vec![vec![following.clone(), next.clone()]];
                    if let Some(unified) = unify_compound(following.selector(), next.selector()) {
                        choices.push(vec![ComplexSelectorComponent::new(
                            unified,
                            next.combinators().to_vec(),
                        )]);
                    }
                    result.push(choices);
                }
            }
            (
                Some(Combinator::Child),
                Some(Combinator::NextSibling | Combinator::FollowingSibling),
            ) => {
                result.push(vec![vec![components2.pop_back()?]]);
            }
            (
                Some(Combinator::NextSibling | Combinator::FollowingSibling),
                Some(Combinator::Child),
            ) => {
                result.push(vec![vec![components1.pop_back()?]]);
            }
            (Some(combinator1), Some(combinator2)) => {
                // Identical combinators: the compounds must unify.
                if combinator1 != combinator2 {
                    return None;
                }
                let component1 = components1.pop_back()?;
                let component2 = components2.pop_back()?;
                let unified = unify_compound(component1.selector(), component2.selector())?;
                result.push(vec![vec![ComplexSelectorComponent::new(
                    unified,
                    vec![combinator1],
                )]]);
            }
            (Some(combinator1), None) => {
                if combinator1 == Combinator::Child {
                    if let (Some(descendant), Some(child)) =
                        (components2.back(), components1.back())
                    {
                        if compound_is_superselector(
                            descendant.selector(),
                            child.selector(),
                            &[],
                        ) {
                            let _ = components2.pop_back();
                        }
                    }
                }
                result.push(vec![vec![components1.pop_back()?]]);
            }
            (None, Some(combinator2)) => {
                if combinator2 == Combinator::Child {
                    if let (Some(descendant), Some(child)) =
                        (components1.back(), components2.back())
                    {
                        if compound_is_superselector(
                            descendant.selector(),
                            child.selector(),
                            &[],
                        ) {
                            let _ = components1.pop_back();
                        }
                    }
                }
                result.push(vec![vec![components2.pop_back()?]]);
            }
            (None, None) => break,
        }
    }

    result.reverse();
    Some(result)
}

/// If the queue's first component contains a rootish selector (`:root`,
/// `:scope`, `:host`, `:host-context`), removes and returns it.
fn first_if_rootish(
    queue: &mut VecDeque<ComplexSelectorComponent>,
) -> Option<ComplexSelectorComponent> {
    let is_rootish = queue
        .front()
        .is_some_and(|component| has_rootish(component.selector()));
    if is_rootish { queue.pop_front() } else { None }
}

/// Returns whether `compound` contains a pseudo-class that pins the
/// element it matches to a structural root.
fn has_rootish(compound: &CompoundSelector) -> bool {
    compound.components().iter().any(|simple| {
        matches!(
            simple,
            SimpleSelector::Pseudo(pseudo) if pseudo.is_class()
                && matches!(
                    pseudo.normalized(),
                    "root" | "scope" | "host" | "host-context"
                )
        )
    })
}

/// Groups components into maximal runs terminated by a combinator-free
/// component, so no group contains two adjacent compounds without a
/// combinator between them. `A B > C D + E ~ > G` groups into
/// `[A] [B > C] [D + E ~ > G]`.
fn group_selectors(
    components: VecDeque<ComplexSelectorComponent>,
) -> VecDeque<Vec<ComplexSelectorComponent>> {
    let mut groups = VecDeque::new();
    let mut group = Vec::new();
    for component in components {
        let ends_group = component.combinators().is_empty();
        group.push(component);
        if ends_group {
            groups.push_back(core::mem::take(&mut group));
        }
    }
    if !group.is_empty() {
        groups.push_back(group);
    }
    groups
}

/// The group equivalence used by the weaver's LCS: structurally equal
/// groups match, a parent-superselector pair selects the more specific
/// side, and groups that share a unique simple selector merge into their
/// unification.
fn select_group(
    group1: &Vec<ComplexSelectorComponent>,
    group2: &Vec<ComplexSelectorComponent>,
) -> Option<Vec<ComplexSelectorComponent>> {
    if group1 == group2 {
        return Some(group1.clone());
    }
    if complex_is_parent_superselector(group1, group2) {
        return Some(group2.clone());
    }
    if complex_is_parent_superselector(group2, group1) {
        return Some(group1.clone());
    }
    if !must_unify(group1, group2) {
        return None;
    }
    let unified = unify_complex(&[
        ComplexSelector::new(Vec::new(), group2.clone(), false),
        ComplexSelector::new(Vec::new(), group1.clone(), false),
    ])?;
    if unified.len() == 1 {
        Some(unified[0].components().to_vec())
    } else {
        None
    }
}

/// Returns whether `complex1` and `complex2` need to be unified to produce
/// a valid combined selector: both contain the same unique simple
/// selector, such as an id.
fn must_unify(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    let unique1: Vec<&SimpleSelector> = complex1
        .iter()
        .flat_map(|component| component.selector().components())
        .filter(|simple| is_unique(simple))
        .collect();
    if unique1.is_empty() {
        return false;
    }
    complex2
        .iter()
        .flat_map(|component| component.selector().components())
        .any(|simple| is_unique(simple) && unique1.iter().any(|unique| *unique == simple))
}
