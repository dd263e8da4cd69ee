//! Simple selectors per
//! [§ 5](https://www.w3.org/TR/selectors-4/#elemental-selectors) and
//! [§ 6](https://www.w3.org/TR/selectors-4/#attribute-selectors) of
//! Selectors Level 4, plus the Sass-specific placeholder selector.
//!
//! A simple selector is a single condition on one element. Sass encodes
//! dedicated logic per kind for unification and `@extend`, so the kinds are
//! a tagged sum rather than a trait object.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;

use crate::selector::compound::CompoundSelector;
use crate::selector::list::SelectorList;
use crate::utils::unvendor;
use crate::Specificity;

/// A name with an optional namespace, as used by type and attribute
/// selectors.
///
/// `namespace` is `None` for `foo`, `Some("")` for `|foo`, `Some("*")` for
/// `*|foo`, and `Some("ns")` for `ns|foo`. A `name` of `"*"` is the
/// universal selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QualifiedName {
    /// The element or attribute name; `*` means any element.
    pub name: String,
    /// The namespace, if one was written.
    pub namespace: Option<String>,
}

impl QualifiedName {
    /// A plain name with no namespace.
    #[must_use]
    pub fn unnamespaced(name: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: None }
    }

    /// Whether the namespace was explicitly `*`.
    #[must_use]
    pub fn has_universal_namespace(&self) -> bool {
        self.namespace.as_deref() == Some("*")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}|")?;
        }
        write!(f, "{}", self.name)
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The operator that defines the semantics of an attribute selector's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
pub enum AttributeOp {
    /// `[attr=value]`: exact match.
    #[strum(serialize = "=")]
    Equal,
    /// `[attr~=value]`: whitespace-separated word match.
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=value]`: exact match or prefix followed by `-`.
    #[strum(serialize = "|=")]
    Dash,
    /// `[attr^=value]`: prefix match.
    #[strum(serialize = "^=")]
    Prefix,
    /// `[attr$=value]`: suffix match.
    #[strum(serialize = "$=")]
    Suffix,
    /// `[attr*=value]`: substring match.
    #[strum(serialize = "*=")]
    Substring,
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Selects elements with the given attribute, optionally with a value
/// matching the condition expressed by [`AttributeOp`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AttributeSelector {
    /// The attribute name, possibly namespaced.
    pub name: QualifiedName,
    /// The comparison operator; `None` if only presence is tested.
    /// Present if and only if `value` is present.
    pub op: Option<AttributeOp>,
    /// The value to compare against, with semantics defined by `op`.
    pub value: Option<String>,
    /// Whether `value` was written as a bare identifier rather than a
    /// quoted string; decides how it is serialized back out.
    pub is_identifier: bool,
    /// The case-sensitivity modifier
    /// ([§ 6.3](https://www.w3.org/TR/selectors-4/#attribute-case)), e.g.
    /// the `i` in `[title=hello i]`. Only present if `op` is present.
    pub modifier: Option<char>,
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.name)?;
        if let (Some(op), Some(value)) = (&self.op, &self.value) {
            write!(f, "{op}")?;
            if self.is_identifier {
                write!(f, "{value}")?;
            } else {
                write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))?;
            }
            if let Some(modifier) = self.modifier {
                write!(f, " {modifier}")?;
            }
        }
        write!(f, "]")
    }
}

/// A pseudo-class or pseudo-element selector (e.g. `:hover` or
/// `::before`). The semantics of a specific pseudo selector depend on its
/// name; Sass encodes logic for each pseudo selector that takes a selector
/// argument so that extension and the other selector operations work
/// through it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PseudoSelector {
    name: String,
    normalized: String,
    is_syntactic_class: bool,
    is_class: bool,
    argument: Option<String>,
    selector: Option<SelectorList>,
}

impl PseudoSelector {
    /// Create a pseudo selector from its name; `element` is whether it was
    /// written with two colons. `:before`, `:after`, `:first-line` and
    /// `:first-letter` are pseudo-elements even in class syntax.
    #[must_use]
    pub fn new(name: impl Into<String>, element: bool) -> Self {
        let name = name.into();
        let normalized = unvendor(&name).to_string();
        let is_class = !element && !is_fake_pseudo_element(&normalized);
        Self {
            name,
            normalized,
            is_syntactic_class: !element,
            is_class,
            argument: None,
            selector: None,
        }
    }

    /// The name as written, without colons.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with any vendor prefix removed.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether this is a pseudo-class selector (single-colon semantics).
    #[must_use]
    pub const fn is_class(&self) -> bool {
        self.is_class
    }

    /// Whether this is a pseudo-element selector.
    #[must_use]
    pub const fn is_pseudo_element(&self) -> bool {
        !self.is_class
    }

    /// Whether this was written with a single colon.
    #[must_use]
    pub const fn is_syntactic_class(&self) -> bool {
        self.is_syntactic_class
    }

    /// The non-selector argument, e.g. the `2n+1` of `:nth-child(2n+1)`.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The selector argument, e.g. the `.foo` of `:not(.foo)`.
    #[must_use]
    pub const fn selector(&self) -> Option<&SelectorList> {
        self.selector.as_ref()
    }

    /// Returns a copy of this selector with `argument` set.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Returns a copy of this selector with the selector argument replaced
    /// by `selector`.
    #[must_use]
    pub fn with_selector(&self, selector: Option<SelectorList>) -> Self {
        let mut pseudo = self.clone();
        pseudo.selector = selector;
        pseudo
    }
}

impl fmt::Display for PseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":")?;
        if !self.is_syntactic_class {
            write!(f, ":")?;
        }
        write!(f, "{}", self.name)?;
        if self.argument.is_none() && self.selector.is_none() {
            return Ok(());
        }
        write!(f, "(")?;
        if let Some(argument) = &self.argument {
            write!(f, "{argument}")?;
            if self.selector.is_some() {
                write!(f, " ")?;
            }
        }
        if let Some(selector) = &self.selector {
            write!(f, "{selector}")?;
        }
        write!(f, ")")
    }
}

/// An atomic matcher applying to a single element.
///
/// The ordering is a total order by kind tag then structural contents; it
/// exists to give the extension store deterministic iteration and carries
/// no CSS meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// (`div`, `ns|div`, or the universal `*`).
    Type(QualifiedName),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// (`#foo`), stored without the `#`.
    Id(String),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// (`.foo`), stored without the `.`.
    Class(String),
    /// A placeholder selector `%foo`, stored without the `%`. It matches
    /// nothing; it exists only to be extended, and is removed before any
    /// CSS is emitted. Names beginning with `-` or `_` are private to the
    /// module that declares them.
    Placeholder(String),
    /// [§ 6.4 Attribute selector](https://www.w3.org/TR/selectors-4/#attribute-selectors).
    Attribute(AttributeSelector),
    /// A pseudo-class or pseudo-element.
    Pseudo(PseudoSelector),
}

impl SimpleSelector {
    /// Whether this is the universal selector `*` (in any namespace).
    #[must_use]
    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Type(name) if name.name == "*")
    }

    /// Whether this is a placeholder whose name begins with `-` or `_`,
    /// making it private to its module.
    #[must_use]
    pub fn is_private_placeholder(&self) -> bool {
        match self {
            Self::Placeholder(name) => name.starts_with('-') || name.starts_with('_'),
            _ => false,
        }
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// The specificity this selector contributes to its compound. The
    /// universal selector contributes nothing; placeholders count like
    /// classes.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Placeholder(_) | Self::Attribute(_) => Specificity(0, 1, 0),
            Self::Type(name) => {
                if name.name == "*" {
                    Specificity::ZERO
                } else {
                    Specificity(0, 0, 1)
                }
            }
            Self::Pseudo(pseudo) => {
                if pseudo.is_pseudo_element() {
                    Specificity(0, 0, 1)
                } else {
                    Specificity(0, 1, 0)
                }
            }
        }
    }

    /// Whether this selector prevents the rule containing it from being
    /// emitted: placeholders never match, and so do selector pseudos whose
    /// inner list has become unusable.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Placeholder(_) => true,
            Self::Pseudo(pseudo) => match pseudo.selector() {
                Some(selector) => {
                    if pseudo.normalized() == "not" {
                        selector.is_bogus_lenient()
                    } else {
                        selector.is_invisible()
                    }
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Whether a selector pseudo argument anywhere inside this selector
    /// contains an explicit parent reference `&`.
    #[must_use]
    pub fn has_any_explicit_parent(&self) -> bool {
        match self {
            Self::Pseudo(pseudo) => pseudo
                .selector()
                .is_some_and(SelectorList::contains_parent_selector),
            _ => false,
        }
    }

    /// Returns a copy with `suffix` appended to this selector's name, used
    /// when a parent selector is followed directly by an identifier
    /// (`.bar { &foo { ... } }` resolves to `.barfoo`). Returns `None` for
    /// selectors that have no name to append to.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Option<Self> {
        match self {
            Self::Type(name) => Some(Self::Type(QualifiedName {
                name: format!("{}{suffix}", name.name),
                namespace: name.namespace.clone(),
            })),
            Self::Id(name) => Some(Self::Id(format!("{name}{suffix}"))),
            Self::Class(name) => Some(Self::Class(format!("{name}{suffix}"))),
            Self::Placeholder(name) => Some(Self::Placeholder(format!("{name}{suffix}"))),
            Self::Pseudo(pseudo) => {
                if pseudo.argument.is_some() || pseudo.selector.is_some() {
                    None
                } else {
                    Some(Self::Pseudo(PseudoSelector::new(
                        format!("{}{suffix}", pseudo.name),
                        !pseudo.is_syntactic_class,
                    )))
                }
            }
            Self::Attribute(_) => None,
        }
    }

    /// Returns the simple selectors of a [`CompoundSelector`] that matches
    /// only elements matched by both this and `compound`.
    ///
    /// By default this returns `compound` with this selector added (before
    /// any pseudo selectors), or `compound` unchanged if it already
    /// contains this selector. Type, id, and pseudo selectors refine that
    /// with their own rules. Returns `None` if unification is impossible,
    /// for example if there are two different id selectors.
    #[must_use]
    pub fn unify_with(&self, compound: &CompoundSelector) -> Option<CompoundSelector> {
        match self {
            Self::Type(name) => unify_type(name, compound),
            Self::Id(name) => unify_id(self, name, compound),
            Self::Pseudo(pseudo) => unify_pseudo(self, pseudo, compound),
            _ => base_unify(self, compound),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Placeholder(name) => write!(f, "%{name}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::Pseudo(pseudo) => write!(f, "{pseudo}"),
        }
    }
}

/// The shared unification path: insert `simple` into `compound` before any
/// pseudo selectors, deduplicating, with `*` absorbing into the inserted
/// selector.
fn base_unify(simple: &SimpleSelector, compound: &CompoundSelector) -> Option<CompoundSelector> {
    if compound.components().len() == 1 && compound.components()[0].is_universal() {
        let singleton = CompoundSelector::of(vec![simple.clone()]);
        return compound.components()[0].unify_with(&singleton);
    }
    if compound.contains(simple) {
        return Some(compound.clone());
    }

    let mut results = Vec::with_capacity(compound.components().len() + 1);
    let mut added = false;
    for other in compound.components() {
        // Make sure pseudo selectors always come last.
        if !added && matches!(other, SimpleSelector::Pseudo(_)) {
            results.push(simple.clone());
            added = true;
        }
        results.push(other.clone());
    }
    if !added {
        results.push(simple.clone());
    }
    Some(CompoundSelector::of(results))
}

/// Unification for type selectors: merge with an existing leading type
/// selector, or take the first slot.
fn unify_type(name: &QualifiedName, compound: &CompoundSelector) -> Option<CompoundSelector> {
    if compound.is_empty() {
        return Some(CompoundSelector::of(vec![SimpleSelector::Type(name.clone())]));
    }
    if let SimpleSelector::Type(other) = &compound.components()[0] {
        let unified = unify_universal_and_element(name, other)?;
        let mut components = compound.components().to_vec();
        components[0] = SimpleSelector::Type(unified);
        return Some(CompoundSelector::of(components));
    }
    if name.name != "*" || (name.namespace.is_some() && !name.has_universal_namespace()) {
        let mut components = Vec::with_capacity(compound.components().len() + 1);
        components.push(SimpleSelector::Type(name.clone()));
        components.extend(compound.components().iter().cloned());
        return Some(CompoundSelector::of(components));
    }
    Some(compound.clone())
}

/// Unification for id selectors: an element cannot carry two different ids.
fn unify_id(
    simple: &SimpleSelector,
    name: &str,
    compound: &CompoundSelector,
) -> Option<CompoundSelector> {
    for other in compound.components() {
        if let SimpleSelector::Id(other_name) = other {
            if other_name != name {
                return None;
            }
        }
    }
    base_unify(simple, compound)
}

/// Unification for pseudo selectors: a compound may contain at most one
/// pseudo-element, and pseudo-classes sort before it.
fn unify_pseudo(
    simple: &SimpleSelector,
    pseudo: &PseudoSelector,
    compound: &CompoundSelector,
) -> Option<CompoundSelector> {
    if compound.contains(simple) {
        return Some(compound.clone());
    }

    let mut results = Vec::with_capacity(compound.components().len() + 1);
    let mut added = false;
    for other in compound.components() {
        if let SimpleSelector::Pseudo(other_pseudo) = other {
            if other_pseudo.is_pseudo_element() {
                if pseudo.is_pseudo_element() {
                    return None;
                }
                if !added {
                    results.push(simple.clone());
                    added = true;
                }
            }
        }
        results.push(other.clone());
    }
    if !added {
        results.push(simple.clone());
    }
    Some(CompoundSelector::of(results))
}

/// Returns a qualified name that matches only elements matched by both
/// inputs, which must both be type or universal selectors. `*` absorbs in
/// both the name and namespace positions.
fn unify_universal_and_element(
    lhs: &QualifiedName,
    rhs: &QualifiedName,
) -> Option<QualifiedName> {
    let namespace = if lhs.namespace == rhs.namespace || rhs.has_universal_namespace() {
        lhs.namespace.clone()
    } else if lhs.has_universal_namespace() {
        rhs.namespace.clone()
    } else {
        return None;
    };

    let name = if lhs.name == rhs.name || rhs.name == "*" {
        lhs.name.clone()
    } else if lhs.name == "*" {
        rhs.name.clone()
    } else {
        return None;
    };

    Some(QualifiedName { name, namespace })
}

/// Returns whether `name` is the name of a pseudo-element that can be
/// written with pseudo-class syntax (CSS2 vs CSS3): `:before`, `:after`,
/// `:first-line`, or `:first-letter`.
pub(crate) fn is_fake_pseudo_element(name: &str) -> bool {
    matches!(name, "after" | "before" | "first-line" | "first-letter")
}

/// Names of pseudo selectors that take selectors as arguments and that are
/// subselectors of their arguments. For example, `.foo` is a superselector
/// of `:matches(.foo)`.
pub(crate) fn is_subselector_pseudo(normalized: &str) -> bool {
    matches!(
        normalized,
        "any" | "matches" | "is" | "where" | "nth-child" | "nth-last-child"
    )
}

/// Pseudo-class selectors that take full selector lists as arguments.
pub(crate) fn is_selector_pseudo_class(normalized: &str) -> bool {
    matches!(
        normalized,
        "not" | "is" | "matches" | "where" | "current" | "any" | "has" | "host" | "host-context"
    )
}

/// Pseudo-element selectors that take selector lists as arguments.
pub(crate) fn is_selector_pseudo_element(normalized: &str) -> bool {
    normalized == "slotted"
}
