//! Compound selectors per
//! [§ 4.2](https://www.w3.org/TR/selectors-4/#compound).
//!
//! "A compound selector is a sequence of simple selectors that are not
//! separated by a combinator, and represents a set of simultaneous
//! conditions on a single element."
//!
//! In Sass a compound selector may additionally begin with an explicit
//! parent reference `&`, which is resolved away before any algebra runs.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use once_cell::unsync::OnceCell;
use serde::Serialize;

use crate::selector::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::selector::simple::SimpleSelector;
use crate::superselector::compound_is_superselector;
use crate::unify::unify_compound;
use crate::utils::{cmp_unordered, hash_one};
use crate::Specificity;

/// An ordered sequence of simple selectors applying to one element,
/// optionally marked as beginning with an explicit parent reference `&`.
///
/// Equality, ordering and hashing treat the simple selectors as a multiset:
/// `.a.b` and `.b.a` are the same compound selector.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundSelector {
    components: Vec<SimpleSelector>,
    with_explicit_parent: bool,
    #[serde(skip)]
    hash: OnceCell<u64>,
    #[serde(skip)]
    specificity: OnceCell<Specificity>,
}

impl CompoundSelector {
    /// Create a compound selector. `with_explicit_parent` marks a selector
    /// written with a leading `&`; such a selector may be empty.
    #[must_use]
    pub fn new(components: Vec<SimpleSelector>, with_explicit_parent: bool) -> Self {
        Self {
            components,
            with_explicit_parent,
            hash: OnceCell::new(),
            specificity: OnceCell::new(),
        }
    }

    /// Create a compound selector with no parent reference.
    #[must_use]
    pub fn of(components: Vec<SimpleSelector>) -> Self {
        Self::new(components, false)
    }

    /// The simple selectors in source order.
    #[must_use]
    pub fn components(&self) -> &[SimpleSelector] {
        &self.components
    }

    /// Whether this selector was written with a leading `&`.
    #[must_use]
    pub const fn with_explicit_parent(&self) -> bool {
        self.with_explicit_parent
    }

    /// Whether this selector contains no simple selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The number of simple selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether `simple` occurs in this compound.
    #[must_use]
    pub fn contains(&self, simple: &SimpleSelector) -> bool {
        self.components.iter().any(|component| component == simple)
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// The sum of the specificities of the simple selectors.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        *self.specificity.get_or_init(|| {
            self.components
                .iter()
                .fold(Specificity::ZERO, |sum, simple| sum + simple.specificity())
        })
    }

    /// The highest specificity this selector can have; equal to
    /// [`Self::specificity`] for compounds.
    #[must_use]
    pub fn max_specificity(&self) -> Specificity {
        self.specificity()
    }

    /// The lowest specificity this selector can have; equal to
    /// [`Self::specificity`] for compounds.
    #[must_use]
    pub fn min_specificity(&self) -> Specificity {
        self.specificity()
    }

    /// Whether any simple selector is a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.components
            .iter()
            .any(|simple| matches!(simple, SimpleSelector::Placeholder(_)))
    }

    /// Whether this compound, or a selector pseudo inside it, contains an
    /// explicit parent reference `&`.
    #[must_use]
    pub fn has_any_explicit_parent(&self) -> bool {
        self.with_explicit_parent
            || self
                .components
                .iter()
                .any(SimpleSelector::has_any_explicit_parent)
    }

    /// Whether any simple selector prevents this compound from matching,
    /// and so from being emitted.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.components.iter().any(SimpleSelector::is_invisible)
    }

    /// The simple selectors serialized individually, in source order. This
    /// backs the `simple-selectors()` built-in.
    #[must_use]
    pub fn simple_selectors(&self) -> Vec<String> {
        self.components.iter().map(ToString::to_string).collect()
    }

    /// Returns whether this selector matches every element matched by
    /// `other`, as well as possibly additional elements.
    #[must_use]
    pub fn is_superselector_of(&self, other: &Self) -> bool {
        compound_is_superselector(self, other, &[])
    }

    /// Returns a compound selector matching the intersection of this
    /// selector and `other`, or `None` if no such selector exists.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Self> {
        unify_compound(self, other)
    }

    /// Wrap this compound into a complex-selector component carrying the
    /// given trailing combinators.
    #[must_use]
    pub fn wrap_in_component(self, combinators: Vec<Combinator>) -> ComplexSelectorComponent {
        ComplexSelectorComponent::new(self, combinators)
    }

    /// Wrap this compound into a single-component complex selector with no
    /// combinators.
    #[must_use]
    pub fn wrap_in_complex(self) -> ComplexSelector {
        ComplexSelector::new(Vec::new(), vec![self.wrap_in_component(Vec::new())], false)
    }

    /// The memoised structural hash. Order-insensitive across the simple
    /// selectors so it agrees with the multiset equality.
    pub(crate) fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            self.components
                .iter()
                .fold(0x636f_6d70_u64, |sum, simple| {
                    sum.wrapping_add(hash_one(simple))
                })
        })
    }
}

impl PartialEq for CompoundSelector {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CompoundSelector {}

impl PartialOrd for CompoundSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompoundSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_unordered(&self.components, &other.components)
    }
}

impl Hash for CompoundSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.with_explicit_parent {
            write!(f, "&")?;
        }
        for simple in &self.components {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}
