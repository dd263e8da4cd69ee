//! The data carried per `@extend`: the extender, its target, and the media
//! context both live in.

use serde::Serialize;

use sassafras_common::{Backtraces, ErrorKind, SassError, SassResult};

use crate::selector::complex::ComplexSelector;
use crate::selector::simple::SimpleSelector;
use crate::Specificity;

/// The `@media` context a rule or extension was defined in: the stack of
/// raw query texts enclosing it, outermost first. An absent context means
/// the top level of the document.
///
/// `M₁` is compatible with `M₂` when `M₂` is `M₁` itself or nested inside
/// it, i.e. when `M₁`'s query stack is a prefix of `M₂`'s.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MediaContext {
    queries: Vec<String>,
}

impl MediaContext {
    /// Create a context from the enclosing query texts, outermost first.
    #[must_use]
    pub fn new(queries: Vec<String>) -> Self {
        Self { queries }
    }

    /// The enclosing query texts, outermost first.
    #[must_use]
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Whether a rule in this context may be extended from `outer`.
    #[must_use]
    pub fn is_within(&self, outer: &Self) -> bool {
        self.queries.starts_with(&outer.queries)
    }
}

/// Whether an extender defined in `outer` may rewrite a selector defined
/// in `inner`. The top level is compatible with everything.
pub(crate) fn media_contexts_are_compatible(
    outer: Option<&MediaContext>,
    inner: Option<&MediaContext>,
) -> bool {
    match (outer, inner) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(outer), Some(inner)) => inner.is_within(outer),
    }
}

/// One selector that will be injected where a target matches: either an
/// `@extend`'s extender, or a stand-in for a selector that was in the
/// document to begin with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extender {
    selector: ComplexSelector,
    specificity: Specificity,
    is_original: bool,
    media_context: Option<MediaContext>,
}

impl Extender {
    /// Create an extender.
    #[must_use]
    pub(crate) const fn new(
        selector: ComplexSelector,
        specificity: Specificity,
        is_original: bool,
        media_context: Option<MediaContext>,
    ) -> Self {
        Self { selector, specificity, is_original, media_context }
    }

    /// The selector this extender injects.
    #[must_use]
    pub const fn selector(&self) -> &ComplexSelector {
        &self.selector
    }

    /// The minimum specificity required of selectors generated from this
    /// extender.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Whether this extender stands in for a selector that was originally
    /// in the document, rather than one injected by `@extend`.
    #[must_use]
    pub const fn is_original(&self) -> bool {
        self.is_original
    }

    /// The media context this extender is restricted to, if any.
    #[must_use]
    pub const fn media_context(&self) -> Option<&MediaContext> {
        self.media_context.as_ref()
    }

    /// Asserts that a selector in `media_context` may be rewritten by this
    /// extender.
    pub(crate) fn assert_compatible_media_context(
        &self,
        media_context: Option<&MediaContext>,
        traces: &Backtraces,
    ) -> SassResult<()> {
        if media_contexts_are_compatible(self.media_context.as_ref(), media_context) {
            Ok(())
        } else {
            Err(SassError::new(ErrorKind::ExtendAcrossMedia, traces))
        }
    }
}

/// A single registered `@extend`: `extender { @extend target }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    extender: Extender,
    target: SimpleSelector,
    is_optional: bool,
    is_original: bool,
}

impl Extension {
    /// Create an extension registered by an `@extend` rule.
    #[must_use]
    pub fn new(
        extender: ComplexSelector,
        target: SimpleSelector,
        media_context: Option<MediaContext>,
        is_optional: bool,
    ) -> Self {
        let specificity = extender.max_specificity();
        Self {
            extender: Extender::new(extender, specificity, false, media_context),
            target,
            is_optional,
            is_original: false,
        }
    }

    /// Create a one-off extension for the static `extend`/`replace`
    /// operations, whose extender is a literal replacement selector rather
    /// than an `@extend` rule.
    #[must_use]
    pub fn one_off(extender: ComplexSelector, target: SimpleSelector) -> Self {
        let specificity = extender.max_specificity();
        Self {
            extender: Extender::new(extender, specificity, false, None),
            target,
            is_optional: false,
            is_original: true,
        }
    }

    /// The extender side of this extension.
    #[must_use]
    pub const fn extender(&self) -> &Extender {
        &self.extender
    }

    /// The simple selector being extended.
    #[must_use]
    pub const fn target(&self) -> &SimpleSelector {
        &self.target
    }

    /// Whether `!optional` suppressed the unsatisfied-extend check.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// Whether the extender is also a literal style-rule selector rather
    /// than a synthetic one.
    #[must_use]
    pub const fn is_original(&self) -> bool {
        self.is_original
    }

    /// The media context the extension is restricted to, if any.
    #[must_use]
    pub const fn media_context(&self) -> Option<&MediaContext> {
        self.extender.media_context()
    }

    /// Returns a copy of this extension with the extender selector
    /// replaced by `selector`; used when an extension's own extender gets
    /// extended.
    #[must_use]
    pub fn with_extender(&self, selector: ComplexSelector) -> Self {
        let specificity = selector.max_specificity();
        Self {
            extender: Extender::new(
                selector,
                specificity,
                false,
                self.extender.media_context.clone(),
            ),
            target: self.target.clone(),
            is_optional: self.is_optional,
            is_original: self.is_original,
        }
    }

    /// Returns an extension combining `self` and `other`, which must share
    /// an extender and target. The merge is optional only if both inputs
    /// are, and original if either is. Differing media contexts are an
    /// error unless both inputs are optional.
    pub(crate) fn merge(&self, other: &Self, traces: &Backtraces) -> SassResult<Self> {
        if self.media_context() != other.media_context()
            && !(self.is_optional && other.is_optional)
        {
            return Err(SassError::new(ErrorKind::MergedExtendAcrossMedia, traces));
        }

        // If one side is optional and adds no special media context, it
        // contributes nothing new.
        if other.is_optional && other.media_context().is_none() {
            return Ok(self.clone());
        }
        if self.is_optional && self.media_context().is_none() {
            return Ok(other.clone());
        }

        let mut merged = self.clone();
        merged.is_optional = self.is_optional && other.is_optional;
        merged.is_original = self.is_original || other.is_original;
        Ok(merged)
    }
}
