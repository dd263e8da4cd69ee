//! Backing implementations for the `sass:selector` built-in functions.
//!
//! The evaluator converts SassScript values to selector lists and back;
//! the selector-level work each built-in does lives here. `unify`,
//! `is-superselector`, `simple-selectors`, `extend`, and `replace` are
//! thin wrappers over the corresponding core operations and don't need
//! their own functions; `nest` and `append` carry real logic.

use sassafras_common::{Backtraces, ErrorKind, SassError, SassResult};

use crate::selector::complex::{ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::list::SelectorList;
use crate::selector::simple::SimpleSelector;

/// Guards built-in arguments that require a usable selector: a bogus
/// selector (broken combinator structure) is rejected with the parameter
/// name that carried it.
pub fn assert_not_bogus(list: &SelectorList, name: &str) -> SassResult<()> {
    if list.is_bogus_lenient() {
        return Err(SassError::untraced(ErrorKind::InvalidSelectorArgument {
            name: name.to_string(),
            message: format!("\"{list}\" is not a valid selector."),
        }));
    }
    Ok(())
}

/// Backs `selector-nest()`: combines the selectors as though they were
/// nested in the stylesheet, each list resolved against the previous one
/// with implicit parents.
pub fn nest_selectors(
    selectors: &[SelectorList],
    traces: &Backtraces,
) -> SassResult<SelectorList> {
    let Some((first, rest)) = selectors.split_first() else {
        return Err(at_least_one_selector());
    };
    let mut result = first.clone();
    for list in rest {
        result = list.resolve_parent_selectors(Some(&result), true, traces)?;
    }
    Ok(result)
}

/// Backs `selector-append()`: combines the selectors without descendant
/// gaps, so `selector-append("a", ".disabled")` is `a.disabled`. Selectors
/// that can't attach to their predecessor (leading combinators,
/// namespaced or universal heads) are rejected.
pub fn append_selectors(
    selectors: &[SelectorList],
    traces: &Backtraces,
) -> SassResult<SelectorList> {
    let Some((first, rest)) = selectors.split_first() else {
        return Err(at_least_one_selector());
    };
    let mut result = first.clone();
    for list in rest {
        let mut rerooted = Vec::with_capacity(list.len());
        for complex in list.components() {
            if !complex.leading_combinators().is_empty() {
                return Err(cant_append(list, &result));
            }
            let Some(first_component) = complex.components().first() else {
                return Err(cant_append(list, &result));
            };
            let Some(compound) = prepend_parent(first_component.selector()) else {
                return Err(cant_append(list, &result));
            };
            let mut components = complex.components().to_vec();
            components[0] = ComplexSelectorComponent::new(
                compound,
                first_component.combinators().to_vec(),
            );
            rerooted.push(ComplexSelector::new(
                Vec::new(),
                components,
                complex.line_break(),
            ));
        }
        result = SelectorList::new(rerooted).resolve_parent_selectors(
            Some(&result),
            false,
            traces,
        )?;
    }
    Ok(result)
}

/// Adds a parent reference to the beginning of `compound`, or returns
/// `None` if that wouldn't produce a valid selector.
fn prepend_parent(compound: &CompoundSelector) -> Option<CompoundSelector> {
    match compound.components().first() {
        Some(first) if first.is_universal() => None,
        Some(SimpleSelector::Type(name)) if name.namespace.is_some() => None,
        _ => Some(CompoundSelector::new(compound.components().to_vec(), true)),
    }
}

fn cant_append(child: &SelectorList, parent: &SelectorList) -> SassError {
    SassError::untraced(ErrorKind::CantAppend {
        child: child.to_string(),
        parent: parent.to_string(),
    })
}

fn at_least_one_selector() -> SassError {
    SassError::untraced(ErrorKind::InvalidSelectorArgument {
        name: "selectors".to_string(),
        message: "At least one selector must be passed.".to_string(),
    })
}
