//! Complex selectors per
//! [§ 4.3](https://www.w3.org/TR/selectors-4/#complex) and combinators per
//! [§ 16](https://www.w3.org/TR/selectors-4/#combinators).
//!
//! "A complex selector is a chain of one or more compound selectors
//! separated by combinators." Each component here is a compound selector
//! plus the combinators that follow it; the descendant combinator is the
//! absence of one. A complex selector may also carry leading combinators,
//! which plain CSS forbids but Sass tolerates long enough to warn about.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use once_cell::unsync::OnceCell;
use serde::Serialize;
use strum_macros::Display;

use crate::selector::compound::CompoundSelector;
use crate::selector::list::SelectorList;
use crate::selector::simple::SimpleSelector;
use crate::superselector::complex_is_superselector;
use crate::utils::hash_one;
use crate::Specificity;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side." The descendant
/// combinator has no punctuation and is represented by absence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize,
)]
pub enum Combinator {
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// `A > B` matches a `B` that is a direct child of an `A`.
    #[strum(serialize = ">")]
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// `A + B` matches a `B` immediately following an `A`.
    #[strum(serialize = "+")]
    NextSibling,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// `A ~ B` matches a `B` anywhere after an `A` among its siblings.
    #[strum(serialize = "~")]
    FollowingSibling,
}

/// A compound selector paired with the combinators that follow it.
///
/// There is usually zero (descendant) or one combinator; more than one is
/// tracked so malformed input survives long enough to be reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ComplexSelectorComponent {
    selector: CompoundSelector,
    combinators: Vec<Combinator>,
}

impl ComplexSelectorComponent {
    /// Create a component from a compound selector and its trailing
    /// combinators.
    #[must_use]
    pub const fn new(selector: CompoundSelector, combinators: Vec<Combinator>) -> Self {
        Self { selector, combinators }
    }

    /// The compound selector.
    #[must_use]
    pub const fn selector(&self) -> &CompoundSelector {
        &self.selector
    }

    /// The combinators following the compound selector.
    #[must_use]
    pub fn combinators(&self) -> &[Combinator] {
        &self.combinators
    }

    /// Returns a copy of this component with `others` appended to its
    /// combinators.
    #[must_use]
    pub fn with_additional_combinators(&self, others: &[Combinator]) -> Self {
        if others.is_empty() {
            return self.clone();
        }
        let mut combinators = self.combinators.clone();
        combinators.extend_from_slice(others);
        Self::new(self.selector.clone(), combinators)
    }

    /// Wrap this component into a complex selector with the given leading
    /// combinators.
    #[must_use]
    pub fn wrap_in_complex(self, leading_combinators: Vec<Combinator>) -> ComplexSelector {
        ComplexSelector::new(leading_combinators, vec![self], false)
    }
}

impl fmt::Display for ComplexSelectorComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        for combinator in &self.combinators {
            write!(f, " {combinator}")?;
        }
        Ok(())
    }
}

/// An ordered sequence of leading combinators (usually none) followed by
/// components; matches a chain of ancestors or siblings ending at the last
/// component.
///
/// `line_break` records that the selector was preceded by a newline in a
/// comma list, and `chroots` that the selector is already rooted and must
/// not be implicitly attached to an enclosing parent selector. Neither
/// participates in equality, ordering, or hashing.
#[derive(Debug, Clone, Serialize)]
pub struct ComplexSelector {
    leading_combinators: Vec<Combinator>,
    components: Vec<ComplexSelectorComponent>,
    line_break: bool,
    chroots: bool,
    #[serde(skip)]
    hash: OnceCell<u64>,
    #[serde(skip)]
    specificity: OnceCell<Specificity>,
}

impl ComplexSelector {
    /// Create a complex selector.
    #[must_use]
    pub fn new(
        leading_combinators: Vec<Combinator>,
        components: Vec<ComplexSelectorComponent>,
        line_break: bool,
    ) -> Self {
        Self {
            leading_combinators,
            components,
            line_break,
            chroots: false,
            hash: OnceCell::new(),
            specificity: OnceCell::new(),
        }
    }

    /// Returns a copy with the `chroots` flag set, marking the selector as
    /// already rooted.
    #[must_use]
    pub fn with_chroots(mut self, chroots: bool) -> Self {
        self.chroots = chroots;
        self
    }

    /// The combinators preceding the first component.
    #[must_use]
    pub fn leading_combinators(&self) -> &[Combinator] {
        &self.leading_combinators
    }

    /// The components in source order.
    #[must_use]
    pub fn components(&self) -> &[ComplexSelectorComponent] {
        &self.components
    }

    /// Whether the selector was preceded by a newline in its comma list.
    #[must_use]
    pub const fn line_break(&self) -> bool {
        self.line_break
    }

    /// Whether the selector must not be implicitly attached to an
    /// enclosing parent selector.
    #[must_use]
    pub const fn chroots(&self) -> bool {
        self.chroots
    }

    /// The number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the selector has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// The sum of the component specificities.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        *self.specificity.get_or_init(|| {
            self.components
                .iter()
                .fold(Specificity::ZERO, |sum, component| {
                    sum + component.selector().specificity()
                })
        })
    }

    /// The highest specificity this selector can have. Selectors produced
    /// by `@extend` report the same value as [`Self::specificity`];
    /// trimming uses this as the bound a replacement must reach.
    #[must_use]
    pub fn max_specificity(&self) -> Specificity {
        self.components
            .iter()
            .fold(Specificity::ZERO, |sum, component| {
                sum + component.selector().max_specificity()
            })
    }

    /// The lowest specificity this selector can have.
    #[must_use]
    pub fn min_specificity(&self) -> Specificity {
        self.components
            .iter()
            .fold(Specificity::ZERO, |sum, component| {
                sum + component.selector().min_specificity()
            })
    }

    /// Whether this selector's combinator structure makes it unable to
    /// match anything at all: multiple leading combinators, or a component
    /// carrying more than one combinator.
    #[must_use]
    pub fn is_useless(&self) -> bool {
        self.leading_combinators.len() > 1
            || self.components.iter().any(|component| {
                component.combinators().len() > 1
                    || compound_has_bogus_pseudo(component.selector())
            })
    }

    /// Whether this selector is bogus, counting any leading combinator.
    #[must_use]
    pub fn is_bogus_strict(&self) -> bool {
        self.is_bogus(true)
    }

    /// Whether this selector is bogus for reasons other than a single
    /// leading combinator.
    #[must_use]
    pub fn is_bogus_lenient(&self) -> bool {
        self.is_bogus(false)
    }

    fn is_bogus(&self, include_leading_combinator: bool) -> bool {
        if self.components.is_empty() {
            return !self.leading_combinators.is_empty();
        }
        let allowed_leading = usize::from(!include_leading_combinator);
        if self.leading_combinators.len() > allowed_leading {
            return true;
        }
        if self
            .components
            .last()
            .is_some_and(|component| !component.combinators().is_empty())
        {
            return true;
        }
        self.components.iter().any(|component| {
            component.combinators().len() > 1 || compound_has_bogus_pseudo(component.selector())
        })
    }

    /// Whether this selector cannot match anything that should be emitted:
    /// it is bogus, or one of its compounds contains a placeholder or a
    /// dead selector pseudo.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.is_bogus_lenient()
            || self
                .components
                .iter()
                .any(|component| component.selector().is_invisible())
    }

    /// Whether any compound contains a placeholder selector.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.components
            .iter()
            .any(|component| component.selector().has_placeholder())
    }

    /// Whether any compound contains an explicit parent reference `&`,
    /// including inside selector pseudo arguments.
    #[must_use]
    pub fn contains_parent_selector(&self) -> bool {
        self.components
            .iter()
            .any(|component| component.selector().has_any_explicit_parent())
    }

    /// If this selector is a single compound with no combinators, returns
    /// it.
    #[must_use]
    pub fn get_single_compound(&self) -> Option<&CompoundSelector> {
        if !self.leading_combinators.is_empty() || self.components.len() != 1 {
            return None;
        }
        let component = &self.components[0];
        if component.combinators().is_empty() {
            Some(component.selector())
        } else {
            None
        }
    }

    /// Returns a copy with `combinators` appended to the last component
    /// (or to the leading combinators if there are no components).
    #[must_use]
    pub fn with_additional_combinators(&self, combinators: &[Combinator]) -> Self {
        if combinators.is_empty() {
            return self.clone();
        }
        if let Some((last, rest)) = self.components.split_last() {
            let mut components = rest.to_vec();
            components.push(last.with_additional_combinators(combinators));
            Self::new(self.leading_combinators.clone(), components, self.line_break)
        } else {
            let mut leading = self.leading_combinators.clone();
            leading.extend_from_slice(combinators);
            Self::new(leading, Vec::new(), self.line_break)
        }
    }

    /// Returns a copy with `component` appended.
    #[must_use]
    pub fn with_additional_component(
        &self,
        component: ComplexSelectorComponent,
        force_line_break: bool,
    ) -> Self {
        let mut components = self.components.clone();
        components.push(component);
        Self::new(
            self.leading_combinators.clone(),
            components,
            self.line_break || force_line_break,
        )
    }

    /// Returns the concatenation of this selector and `child`. If `child`
    /// has leading combinators they merge into this selector's last
    /// component.
    #[must_use]
    pub fn concatenate(&self, child: &Self, force_line_break: bool) -> Self {
        let line_break = self.line_break || child.line_break || force_line_break;
        if child.leading_combinators.is_empty() {
            let mut components = self.components.clone();
            components.extend(child.components.iter().cloned());
            Self::new(self.leading_combinators.clone(), components, line_break)
        } else if let Some((last, rest)) = self.components.split_last() {
            let mut components = rest.to_vec();
            components.push(last.with_additional_combinators(&child.leading_combinators));
            components.extend(child.components.iter().cloned());
            Self::new(self.leading_combinators.clone(), components, line_break)
        } else {
            let mut leading = self.leading_combinators.clone();
            leading.extend(child.leading_combinators.iter().copied());
            Self::new(leading, child.components.clone(), line_break)
        }
    }

    /// Returns whether this selector matches every element matched by
    /// `other`, as well as possibly additional elements.
    #[must_use]
    pub fn is_superselector_of(&self, other: &Self) -> bool {
        complex_is_superselector(self, other)
    }

    /// Wrap this selector into a single-element selector list.
    #[must_use]
    pub fn wrap_in_list(self) -> SelectorList {
        SelectorList::new(vec![self])
    }

    /// The memoised structural hash; ignores the presentation flags like
    /// equality does.
    pub(crate) fn structural_hash(&self) -> u64 {
        *self
            .hash
            .get_or_init(|| hash_one(&(&self.leading_combinators, &self.components)))
    }
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.leading_combinators == other.leading_combinators
            && self.components == other.components
    }
}

impl Eq for ComplexSelector {}

impl PartialOrd for ComplexSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.leading_combinators
            .cmp(&other.leading_combinators)
            .then_with(|| self.components.cmp(&other.components))
    }
}

impl Hash for ComplexSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for combinator in &self.leading_combinators {
            write!(f, "{combinator} ")?;
        }
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// Whether a compound contains a selector pseudo whose inner list is
/// bogus. `:has` tolerates a leading combinator in its argument; other
/// selector pseudos do not.
pub(crate) fn compound_has_bogus_pseudo(compound: &CompoundSelector) -> bool {
    compound.components().iter().any(|simple| {
        if let SimpleSelector::Pseudo(pseudo) = simple {
            match pseudo.selector() {
                Some(selector) => {
                    if pseudo.name() == "has" {
                        selector.is_bogus_lenient()
                    } else {
                        selector.is_bogus_strict()
                    }
                }
                None => false,
            }
        } else {
            false
        }
    })
}
