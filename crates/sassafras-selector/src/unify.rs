//! Selector unification: producing a selector that matches only the
//! intersection of its inputs.
//!
//! Simple-selector unification lives with the simple selectors themselves
//! ([`SimpleSelector::unify_with`]); this module builds the compound- and
//! complex-level operations on top of it. Complex unification merges the
//! final compounds and hands the remaining ancestor chains to the weaver.

use crate::selector::complex::{ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::simple::SimpleSelector;
use crate::weave::weave;

/// Returns a compound selector matching only elements matched by both
/// `compound1` and `compound2`, or `None` if no such selector exists (for
/// example, if they carry two different id selectors).
#[must_use]
pub fn unify_compound(
    compound1: &CompoundSelector,
    compound2: &CompoundSelector,
) -> Option<CompoundSelector> {
    if compound1.is_empty() {
        return Some(compound2.clone());
    }
    let mut unified = compound2.clone();
    for simple in compound1.components() {
        unified = simple.unify_with(&unified)?;
    }
    Some(unified)
}

/// Returns the contents of a selector list that matches only elements
/// matched by every selector in `complexes`.
///
/// Returns `None` when unification is impossible: some selector ends in a
/// combinator, or the final compounds cannot be merged. An empty result
/// means the ancestor chains could not be woven.
#[must_use]
pub fn unify_complex(complexes: &[ComplexSelector]) -> Option<Vec<ComplexSelector>> {
    if complexes.len() <= 1 {
        return Some(complexes.to_vec());
    }

    // Merge the bases (the final compounds) into one.
    let mut unified_base: Option<CompoundSelector> = None;
    for complex in complexes {
        let base = complex.components().last()?;
        if !base.combinators().is_empty() {
            return None;
        }
        unified_base = Some(match unified_base {
            None => base.selector().clone(),
            Some(previous) => unify_compound(base.selector(), &previous)?,
        });
    }
    let unified_base = unified_base?;

    // Weave the remaining ancestor chains, with the unified base attached
    // to the last of them.
    let mut without_bases: Vec<ComplexSelector> = complexes
        .iter()
        .map(|complex| {
            ComplexSelector::new(
                complex.leading_combinators().to_vec(),
                complex.components()[..complex.len() - 1].to_vec(),
                complex.line_break(),
            )
        })
        .collect();
    if let Some(last) = without_bases.pop() {
        without_bases.push(last.with_additional_component(
            ComplexSelectorComponent::new(unified_base, Vec::new()),
            false,
        ));
    }
    Some(weave(&without_bases, false))
}

/// Returns whether a compound selector may contain only one simple
/// selector of the same kind as `simple`: ids and pseudo-elements are
/// unique within a compound.
pub(crate) fn is_unique(simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Id(_) => true,
        SimpleSelector::Pseudo(pseudo) => pseudo.is_pseudo_element(),
        _ => false,
    }
}
