//! Selector lists per
//! [§ 4.1](https://www.w3.org/TR/selectors-4/#grouping): comma-separated
//! groups of complex selectors, matching an element that matches any of
//! the alternatives.
//!
//! This is also where nested parent references (`&`) are resolved: a
//! freshly parsed list still mentions its parent, and
//! [`SelectorList::resolve_parent_selectors`] rewrites it against the
//! enclosing rule's selector list.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use once_cell::unsync::OnceCell;
use serde::Serialize;

use sassafras_common::{Backtraces, ErrorKind, SassError, SassResult};

use crate::selector::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::simple::SimpleSelector;
use crate::superselector::list_is_superselector;
use crate::unify::unify_complex;
use crate::utils::{cmp_unordered, flatten_vertically};
use crate::Specificity;

/// A comma-separated sequence of complex selectors.
///
/// Equality, ordering and hashing treat the alternatives as a multiset, so
/// lists produced by `@extend` with reordered alternatives still compare
/// equal to their sources.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorList {
    components: Vec<ComplexSelector>,
    #[serde(skip)]
    hash: OnceCell<u64>,
    #[serde(skip)]
    max_specificity: OnceCell<Specificity>,
    #[serde(skip)]
    min_specificity: OnceCell<Specificity>,
}

impl SelectorList {
    /// Create a list from its alternatives.
    #[must_use]
    pub fn new(components: Vec<ComplexSelector>) -> Self {
        Self {
            components,
            hash: OnceCell::new(),
            max_specificity: OnceCell::new(),
            min_specificity: OnceCell::new(),
        }
    }

    /// The alternatives in source order.
    #[must_use]
    pub fn components(&self) -> &[ComplexSelector] {
        &self.components
    }

    /// The number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the list has no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The highest specificity of any alternative.
    #[must_use]
    pub fn max_specificity(&self) -> Specificity {
        *self.max_specificity.get_or_init(|| {
            self.components
                .iter()
                .map(ComplexSelector::max_specificity)
                .max()
                .unwrap_or(Specificity::ZERO)
        })
    }

    /// The lowest specificity of any alternative.
    #[must_use]
    pub fn min_specificity(&self) -> Specificity {
        *self.min_specificity.get_or_init(|| {
            self.components
                .iter()
                .map(ComplexSelector::min_specificity)
                .min()
                .unwrap_or(Specificity::ZERO)
        })
    }

    /// Whether every alternative is invisible, making the whole rule
    /// unemittable.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.components.iter().all(ComplexSelector::is_invisible)
    }

    /// Whether any alternative is useless.
    #[must_use]
    pub fn is_useless(&self) -> bool {
        self.components.iter().any(ComplexSelector::is_useless)
    }

    /// Whether any alternative is bogus, counting leading combinators.
    #[must_use]
    pub fn is_bogus_strict(&self) -> bool {
        self.components.iter().any(ComplexSelector::is_bogus_strict)
    }

    /// Whether any alternative is bogus for reasons other than a single
    /// leading combinator.
    #[must_use]
    pub fn is_bogus_lenient(&self) -> bool {
        self.components.iter().any(ComplexSelector::is_bogus_lenient)
    }

    /// Whether any alternative contains a placeholder selector.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.components.iter().any(ComplexSelector::has_placeholder)
    }

    /// Whether any alternative contains an explicit parent reference `&`.
    #[must_use]
    pub fn contains_parent_selector(&self) -> bool {
        self.components
            .iter()
            .any(ComplexSelector::contains_parent_selector)
    }

    /// Returns whether this list matches every element matched by `other`,
    /// as well as possibly additional elements.
    #[must_use]
    pub fn is_superselector_of(&self, other: &Self) -> bool {
        list_is_superselector(&self.components, &other.components)
    }

    /// Returns a list that matches only elements matched by both this list
    /// and `other`, or `None` if no such list exists. This backs the
    /// `selector-unify()` built-in.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Self> {
        let mut contents = Vec::new();
        for complex1 in &self.components {
            for complex2 in &other.components {
                if let Some(mut unified) = unify_complex(&[complex1.clone(), complex2.clone()]) {
                    contents.append(&mut unified);
                }
            }
        }
        if contents.is_empty() {
            None
        } else {
            Some(Self::new(contents))
        }
    }

    /// Returns a copy of this list with `combinators` appended to the last
    /// component of every alternative.
    #[must_use]
    pub fn with_additional_combinators(&self, combinators: &[Combinator]) -> Self {
        Self::new(
            self.components
                .iter()
                .map(|complex| complex.with_additional_combinators(combinators))
                .collect(),
        )
    }

    /// Returns a new list with all parent references replaced by `parent`.
    ///
    /// If `implicit_parent` is true, alternatives that don't contain an
    /// explicit `&` are treated as though they began with one. A `parent`
    /// of `None` returns this list as-is when it contains no `&`, and
    /// fails otherwise.
    pub fn resolve_parent_selectors(
        &self,
        parent: Option<&Self>,
        implicit_parent: bool,
        traces: &Backtraces,
    ) -> SassResult<Self> {
        let Some(parent) = parent else {
            if !self.contains_parent_selector() {
                return Ok(self.clone());
            }
            return Err(SassError::new(ErrorKind::TopLevelParent, traces));
        };

        let mut rows: Vec<Vec<ComplexSelector>> = Vec::with_capacity(self.components.len());
        for complex in &self.components {
            rows.push(resolve_complex(complex, parent, implicit_parent, traces)?);
        }
        Ok(Self::new(flatten_vertically(rows)))
    }

    /// The memoised structural hash; order-insensitive across alternatives
    /// so it agrees with the multiset equality.
    pub(crate) fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            self.components
                .iter()
                .fold(0x6c69_7374_u64, |sum, complex| {
                    sum.wrapping_add(complex.structural_hash())
                })
        })
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SelectorList {}

impl PartialOrd for SelectorList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SelectorList {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_unordered(&self.components, &other.components)
    }
}

impl Hash for SelectorList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for complex in &self.components {
            if first {
                first = false;
            } else if complex.line_break() {
                write!(f, ",\n")?;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{complex}")?;
        }
        Ok(())
    }
}

/// Resolve one alternative against `parent`, producing the alternatives it
/// expands to.
fn resolve_complex(
    complex: &ComplexSelector,
    parent: &SelectorList,
    implicit_parent: bool,
    traces: &Backtraces,
) -> SassResult<Vec<ComplexSelector>> {
    if !complex.contains_parent_selector() {
        if !implicit_parent || complex.chroots() {
            return Ok(vec![complex.clone()]);
        }
        return Ok(parent
            .components()
            .iter()
            .map(|parent_complex| parent_complex.concatenate(complex, false))
            .collect());
    }

    let mut new_complexes: Vec<ComplexSelector> = Vec::new();
    for component in complex.components() {
        match resolve_compound(component, parent, traces)? {
            None => {
                if new_complexes.is_empty() {
                    new_complexes.push(ComplexSelector::new(
                        complex.leading_combinators().to_vec(),
                        vec![component.clone()],
                        complex.line_break(),
                    ));
                } else {
                    new_complexes = new_complexes
                        .into_iter()
                        .map(|previous| previous.with_additional_component(component.clone(), false))
                        .collect();
                }
            }
            Some(resolved) => {
                if new_complexes.is_empty() {
                    for resolved_complex in resolved {
                        if complex.leading_combinators().is_empty() {
                            new_complexes.push(resolved_complex);
                        } else {
                            let mut leading = complex.leading_combinators().to_vec();
                            leading.extend(resolved_complex.leading_combinators().iter().copied());
                            new_complexes.push(
                                ComplexSelector::new(
                                    leading,
                                    resolved_complex.components().to_vec(),
                                    resolved_complex.line_break() || complex.line_break(),
                                ),
                            );
                        }
                    }
                } else {
                    let previous = core::mem::take(&mut new_complexes);
                    for new_complex in previous {
                        for resolved_complex in &resolved {
                            new_complexes.push(new_complex.concatenate(resolved_complex, false));
                        }
                    }
                }
            }
        }
    }
    Ok(new_complexes
        .into_iter()
        .map(|resolved| resolved.with_chroots(true))
        .collect())
}

/// Resolve one component of a complex selector. Returns `None` when the
/// component mentions no parent anywhere and can be kept as-is.
fn resolve_compound(
    component: &ComplexSelectorComponent,
    parent: &SelectorList,
    traces: &Backtraces,
) -> SassResult<Option<Vec<ComplexSelector>>> {
    let compound = component.selector();
    let contains_selector_pseudo = compound
        .components()
        .iter()
        .any(SimpleSelector::has_any_explicit_parent);
    if !contains_selector_pseudo && !compound.with_explicit_parent() {
        return Ok(None);
    }

    // Resolve parent references inside selector pseudo arguments first.
    let resolved_simples: Vec<SimpleSelector> = if contains_selector_pseudo {
        let mut simples = Vec::with_capacity(compound.components().len());
        for simple in compound.components() {
            match simple {
                SimpleSelector::Pseudo(pseudo)
                    if pseudo
                        .selector()
                        .is_some_and(SelectorList::contains_parent_selector) =>
                {
                    let inner = pseudo
                        .selector()
                        .map(|selector| {
                            selector.resolve_parent_selectors(Some(parent), false, traces)
                        })
                        .transpose()?;
                    simples.push(SimpleSelector::Pseudo(pseudo.with_selector(inner)));
                }
                _ => simples.push(simple.clone()),
            }
        }
        simples
    } else {
        compound.components().to_vec()
    };

    if !compound.with_explicit_parent() {
        return Ok(Some(vec![ComplexSelector::new(
            Vec::new(),
            vec![ComplexSelectorComponent::new(
                CompoundSelector::of(resolved_simples),
                component.combinators().to_vec(),
            )],
            false,
        )]));
    }

    // A type selector written directly after `&` is a suffix that fuses
    // onto the parent's final simple selector.
    let (suffix, rest): (Option<String>, &[SimpleSelector]) = match resolved_simples.first() {
        Some(SimpleSelector::Type(name)) if name.namespace.is_none() => {
            (Some(name.name.clone()), &resolved_simples[1..])
        }
        _ => (None, &resolved_simples[..]),
    };

    if suffix.is_none() && rest.is_empty() {
        // A bare `&`: splice the parent in, carrying our combinators.
        return Ok(Some(
            parent
                .components()
                .iter()
                .map(|parent_complex| {
                    parent_complex.with_additional_combinators(component.combinators())
                })
                .collect(),
        ));
    }

    let mut result = Vec::with_capacity(parent.components().len());
    for parent_complex in parent.components() {
        let Some((last_component, initial)) = parent_complex.components().split_last() else {
            return Err(SassError::new(
                ErrorKind::InvalidParent { parent: parent_complex.to_string() },
                traces,
            ));
        };
        if !last_component.combinators().is_empty() {
            return Err(SassError::new(
                ErrorKind::InvalidParent { parent: parent_complex.to_string() },
                traces,
            ));
        }

        let mut last_simples = last_component.selector().components().to_vec();
        if let Some(suffix) = &suffix {
            let Some(fused) = last_simples
                .pop()
                .and_then(|simple| simple.with_suffix(suffix))
            else {
                return Err(SassError::new(
                    ErrorKind::InvalidParent { parent: parent_complex.to_string() },
                    traces,
                ));
            };
            last_simples.push(fused);
        }
        last_simples.extend(rest.iter().cloned());

        let mut components = initial.to_vec();
        components.push(ComplexSelectorComponent::new(
            CompoundSelector::of(last_simples),
            component.combinators().to_vec(),
        ));
        result.push(ComplexSelector::new(
            parent_complex.leading_combinators().to_vec(),
            components,
            parent_complex.line_break(),
        ));
    }
    Ok(Some(result))
}
