//! The incremental `@extend` engine.
//!
//! An [`ExtensionStore`] accumulates two things as the evaluator walks a
//! stylesheet: the selector lists of emitted style rules (via
//! [`ExtensionStore::add_selector`], which hands back a [`SelectorId`]
//! through which the current, possibly rewritten list can always be
//! fetched), and `@extend` registrations (via
//! [`ExtensionStore::add_extension`]). Each registration immediately
//! rewrites every already-registered list that mentions the target, and
//! re-expands previously registered extensions, so chains like
//! `.a { @extend .b }` / `.b { @extend .c }` cascade no matter the order
//! they appear in.
//!
//! The rewrite itself substitutes each compound containing a target with
//! the union of itself and the applicable extenders (unified per the
//! unifier), weaves the resulting ancestor chains, and finally trims
//! redundant alternatives, never trimming selectors that were in the
//! source document.

/// Extension and extender values, plus media-query contexts.
pub mod extension;

use std::collections::{BTreeMap, BTreeSet};

use sassafras_common::{Backtraces, ErrorKind, SassError, SassResult};

use crate::selector::complex::{ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::list::SelectorList;
use crate::selector::simple::{is_subselector_pseudo, PseudoSelector, SimpleSelector};
use crate::unify::unify_complex;
use crate::utils::paths;
use crate::weave::weave;
use crate::Specificity;

pub use extension::{Extender, Extension, MediaContext};

/// Rewrites above this many alternatives per complex selector abort with
/// an endless-extend error.
const EXTEND_COMPLEX_LIMIT: usize = 500;

/// Trimming is skipped entirely above this many alternatives to cap the
/// quadratic comparison cost.
const TRIM_LIMIT: usize = 100;

/// How the store treats the compounds it rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendMode {
    /// Normal `@extend` semantics: the original compound stays as one
    /// alternative next to everything it expands to.
    Normal,
    /// `selector-extend()` semantics: the original stays, but a compound
    /// is only rewritten when every target simple in it matched.
    Targets,
    /// `selector-replace()` semantics: the original compound is dropped
    /// from the output.
    Replace,
}

/// An opaque handle to a selector list registered with
/// [`ExtensionStore::add_selector`]. The list the handle refers to is
/// rewritten in place as further extensions arrive; fetch the current
/// value with [`ExtensionStore::selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectorId(usize);

/// A registered style-rule selector and the media context it appeared in.
#[derive(Debug, Clone)]
struct RegisteredRule {
    list: SelectorList,
    media_context: Option<MediaContext>,
}

/// Extensions registered against one target, keyed by extender complex
/// selector, in source order.
#[derive(Debug, Clone, Default)]
struct Sources {
    entries: Vec<(ComplexSelector, Extension)>,
}

impl Sources {
    fn get(&self, complex: &ComplexSelector) -> Option<&Extension> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == complex)
            .map(|(_, extension)| extension)
    }

    fn set(&mut self, complex: ComplexSelector, extension: Extension) {
        for entry in &mut self.entries {
            if entry.0 == complex {
                entry.1 = extension;
                return;
            }
        }
        self.entries.push((complex, extension));
    }

    fn iter(&self) -> impl Iterator<Item = &(ComplexSelector, Extension)> {
        self.entries.iter()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The per-target extension tables passed through the rewrite functions.
type ExtensionMap = BTreeMap<SimpleSelector, Sources>;

/// The incremental extension store for one stylesheet module.
#[derive(Debug, Clone)]
pub struct ExtensionStore {
    mode: ExtendMode,
    traces: Backtraces,
    /// Arena of registered style-rule selectors, indexed by [`SelectorId`].
    rules: Vec<RegisteredRule>,
    /// Which registered rules mention each simple selector; these are the
    /// lists that must be rewritten when the simple gets extended.
    selectors: BTreeMap<SimpleSelector, BTreeSet<SelectorId>>,
    /// All extensions, grouped by the simple selector they target.
    by_target: ExtensionMap,
    /// Reverse index: extensions whose extender mentions each simple
    /// selector, used to cascade extensions transitively.
    by_extender: BTreeMap<SimpleSelector, Vec<Extension>>,
    /// The specificity of the complex selector that originally introduced
    /// each simple selector; trimming may never drop below it.
    source_specificity: BTreeMap<SimpleSelector, Specificity>,
    /// Complex selectors that were in the source document; trimming must
    /// keep them no matter what subsumes them.
    originals: BTreeSet<ComplexSelector>,
}

impl ExtensionStore {
    /// Create an empty store. `traces` is the call-stack snapshot attached
    /// to any errors the store raises.
    #[must_use]
    pub fn new(mode: ExtendMode, traces: Backtraces) -> Self {
        Self {
            mode,
            traces,
            rules: Vec::new(),
            selectors: BTreeMap::new(),
            by_target: BTreeMap::new(),
            by_extender: BTreeMap::new(),
            source_specificity: BTreeMap::new(),
            originals: BTreeSet::new(),
        }
    }

    /// Whether this store has no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    /// The current value of a registered selector list.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this store.
    #[must_use]
    pub fn selector(&self, id: SelectorId) -> &SelectorList {
        &self.rules[id.0].list
    }

    /// Registers a style rule's selector list, rewriting it with any
    /// extensions already registered. Returns the handle through which the
    /// current list can be fetched; later extensions keep rewriting it.
    ///
    /// `media_context` is the media query context the rule appeared in, or
    /// `None` at the top level of the document.
    pub fn add_selector(
        &mut self,
        list: SelectorList,
        media_context: Option<MediaContext>,
    ) -> SassResult<SelectorId> {
        let mut list = list;

        if !list.is_invisible() {
            for complex in list.components() {
                let _ = self.originals.insert(complex.clone());
            }
        }

        if !self.by_target.is_empty() {
            let extensions = core::mem::take(&mut self.by_target);
            let outcome = self.extend_list(&list, &extensions, media_context.as_ref());
            self.by_target = extensions;
            if let Some(rewritten) = outcome? {
                list = rewritten;
            }
        }

        let id = SelectorId(self.rules.len());
        self.rules.push(RegisteredRule { list, media_context });
        register_selector(&mut self.selectors, &self.rules[id.0].list, id);
        Ok(id)
    }

    /// Registers `extender { @extend target }`. Every complex selector in
    /// `extender` becomes an extension of the simple selector `target`;
    /// existing extensions whose extenders mention `target` are re-expanded
    /// and every live selector list mentioning `target` is rewritten.
    ///
    /// `media_context` is the context the `@extend` appeared in; it can
    /// only rewrite selectors within compatible contexts.
    pub fn add_extension(
        &mut self,
        extender: &SelectorList,
        target: &SimpleSelector,
        media_context: Option<&MediaContext>,
        is_optional: bool,
    ) -> SassResult<()> {
        let has_rule = self.selectors.contains_key(target);
        let has_existing_extensions = self.by_extender.contains_key(target);

        let mut new_sources = Sources::default();
        for complex in extender.components() {
            if complex.is_useless() {
                continue;
            }
            let extension = Extension::new(
                complex.clone(),
                target.clone(),
                media_context.cloned(),
                is_optional,
            );

            // If there's already an extend from this extender to `target`,
            // there's no need to re-run the extension; it may need to
            // become mandatory or pick up a media context, though.
            let existing = self
                .by_target
                .get(target)
                .and_then(|sources| sources.get(complex))
                .cloned();
            if let Some(existing) = existing {
                let merged = existing.merge(&extension, &self.traces)?;
                if let Some(sources) = self.by_target.get_mut(target) {
                    sources.set(complex.clone(), merged);
                }
                continue;
            }

            self.by_target
                .entry(target.clone())
                .or_default()
                .set(complex.clone(), extension.clone());

            for component in complex.components() {
                for simple in component.selector().components() {
                    self.by_extender
                        .entry(simple.clone())
                        .or_default()
                        .push(extension.clone());
                    // Only the original selector's specificity is
                    // relevant; selectors generated by `@extend` don't
                    // introduce new specificity floors.
                    let _ = self
                        .source_specificity
                        .entry(simple.clone())
                        .or_insert_with(|| complex.max_specificity());
                }
            }

            if has_rule || has_existing_extensions {
                new_sources.set(complex.clone(), extension);
            }
        }

        if new_sources.is_empty() {
            return Ok(());
        }

        let mut new_extensions: ExtensionMap = BTreeMap::new();
        let _ = new_extensions.insert(target.clone(), new_sources);

        if has_existing_extensions {
            let existing = self.by_extender.get(target).cloned().unwrap_or_default();
            if !existing.is_empty() {
                let additional = self.extend_existing_extensions(&existing, &new_extensions)?;
                for (additional_target, additional_sources) in additional {
                    let entry = new_extensions.entry(additional_target).or_default();
                    for (complex, extension) in additional_sources.iter() {
                        entry.set(complex.clone(), extension.clone());
                    }
                }
            }
        }

        if has_rule {
            let ids: Vec<SelectorId> = self
                .selectors
                .get(target)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            self.extend_existing_selectors(&ids, &new_extensions)?;
        }
        Ok(())
    }

    /// Merges the extensions of `stores` (the stores of `@use`d and
    /// `@forward`ed modules) into this one. Their extensions extend all
    /// selectors already registered here, but not each other's extensions.
    /// Private placeholder targets don't cross the module boundary.
    pub fn add_extension_stores(&mut self, stores: &[&Self]) -> SassResult<()> {
        // Extensions already in this store whose extenders get extended by
        // the incoming ones, and thus need to be re-expanded.
        let mut extensions_to_extend: Vec<Extension> = Vec::new();
        // Selectors that mention extended targets, and thus need to be
        // rewritten themselves.
        let mut selectors_to_extend: BTreeSet<SelectorId> = BTreeSet::new();
        // The subset of incoming extensions that apply to this store.
        let mut new_extensions: ExtensionMap = BTreeMap::new();

        for store in stores {
            if store.is_empty() {
                continue;
            }
            for (simple, specificity) in &store.source_specificity {
                let _ = self
                    .source_specificity
                    .insert(simple.clone(), *specificity);
            }

            for (target, new_sources) in &store.by_target {
                // Private selectors can't be extended across module
                // boundaries.
                if target.is_private_placeholder() {
                    continue;
                }

                let has_extensions = match self.by_extender.get(target) {
                    Some(extensions) => {
                        extensions_to_extend.extend(extensions.iter().cloned());
                        true
                    }
                    None => false,
                };
                let has_selectors = match self.selectors.get(target) {
                    Some(ids) => {
                        selectors_to_extend.extend(ids.iter().copied());
                        true
                    }
                    None => false,
                };

                if self.by_target.contains_key(target) {
                    for (extender, extension) in new_sources.iter() {
                        // If this extender already extends `target` here,
                        // we don't need to re-run it.
                        if let Some(existing_sources) = self.by_target.get_mut(target) {
                            if existing_sources.get(extender).is_none() {
                                existing_sources.set(extender.clone(), extension.clone());
                            }
                        }
                        if has_extensions || has_selectors {
                            new_extensions
                                .entry(target.clone())
                                .or_default()
                                .set(extender.clone(), extension.clone());
                        }
                    }
                } else {
                    let _ = self
                        .by_target
                        .insert(target.clone(), new_sources.clone());
                    if has_extensions || has_selectors {
                        let _ = new_extensions
                            .insert(target.clone(), new_sources.clone());
                    }
                }
            }
        }

        if new_extensions.is_empty() {
            return Ok(());
        }
        if !extensions_to_extend.is_empty() {
            // The return value only matters for extend loops, which can't
            // exist across module boundaries.
            let _ = self.extend_existing_extensions(&extensions_to_extend, &new_extensions)?;
        }
        if !selectors_to_extend.is_empty() {
            let ids: Vec<SelectorId> = selectors_to_extend.into_iter().collect();
            self.extend_existing_selectors(&ids, &new_extensions)?;
        }
        Ok(())
    }

    /// Returns the first registered non-optional extension whose target is
    /// mentioned by no registered selector, or `None` when every mandatory
    /// extend matched something. Called at emit time.
    #[must_use]
    pub fn check_for_unsatisfied_extends(&self) -> Option<&Extension> {
        for (target, sources) in &self.by_target {
            if self.selectors.contains_key(target) {
                continue;
            }
            for (_, extension) in sources.iter() {
                if !extension.is_optional() {
                    return Some(extension);
                }
            }
        }
        None
    }

    /// Like [`Self::check_for_unsatisfied_extends`], but raises the
    /// unsatisfied extension as an error.
    pub fn assert_no_unsatisfied_extends(&self) -> SassResult<()> {
        match self.check_for_unsatisfied_extends() {
            None => Ok(()),
            Some(extension) => Err(SassError::new(
                ErrorKind::UnsatisfiedExtend { target: extension.target().to_string() },
                &self.traces,
            )),
        }
    }

    /// One-shot form of the store backing `selector-extend()`: extends
    /// `selector` as though `source { @extend target }` were written, for
    /// every compound target in `targets`.
    pub fn extend(
        selector: &SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        traces: &Backtraces,
    ) -> SassResult<SelectorList> {
        Self::extend_or_replace(selector, source, targets, ExtendMode::Targets, traces)
    }

    /// One-shot form backing `selector-replace()`: like [`Self::extend`],
    /// but the targets are replaced by `source` rather than joined by it.
    pub fn replace(
        selector: &SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        traces: &Backtraces,
    ) -> SassResult<SelectorList> {
        Self::extend_or_replace(selector, source, targets, ExtendMode::Replace, traces)
    }

    fn extend_or_replace(
        selector: &SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        mode: ExtendMode,
        traces: &Backtraces,
    ) -> SassResult<SelectorList> {
        let mut store = Self::new(mode, traces.clone());
        if !selector.is_invisible() {
            for complex in selector.components() {
                let _ = store.originals.insert(complex.clone());
            }
        }

        let mut results = selector.clone();
        for complex in targets.components() {
            let Some(compound) = complex.get_single_compound() else {
                return Err(SassError::new(
                    ErrorKind::CompoundRequired { selector: complex.to_string() },
                    traces,
                ));
            };

            let mut extensions: ExtensionMap = BTreeMap::new();
            for simple in compound.components() {
                let mut sources = Sources::default();
                for src in source.components() {
                    sources.set(
                        src.clone(),
                        Extension::one_off(src.clone(), simple.clone()),
                    );
                }
                let _ = extensions.insert(simple.clone(), sources);
            }

            if let Some(rewritten) = store.extend_list(&results, &extensions, None)? {
                results = rewritten;
            }
        }
        Ok(results)
    }

    /// Re-expands `old_extensions` (whose extenders mention a newly
    /// extended target) against `new_extensions`, registering what comes
    /// out. Returns extensions that must join `new_extensions` before
    /// selectors are rewritten, to close extension loops like
    /// `.c { @extend .a }` / `.x.y.a { @extend .b }` / `.z.b { @extend .c }`.
    fn extend_existing_extensions(
        &mut self,
        old_extensions: &[Extension],
        new_extensions: &ExtensionMap,
    ) -> SassResult<ExtensionMap> {
        let mut additional: ExtensionMap = BTreeMap::new();

        for extension in old_extensions {
            let target = extension.target().clone();
            let selectors = self.extend_complex(
                extension.extender().selector(),
                new_extensions,
                extension.media_context(),
            )?;
            if selectors.is_empty() {
                continue;
            }

            // If the output contains the original extender, there's no
            // need to recreate it.
            let contains_extension =
                selectors.first() == Some(extension.extender().selector());
            let mut first = true;
            for complex in selectors {
                if contains_extension && first {
                    first = false;
                    continue;
                }
                let with_extender = extension.with_extender(complex.clone());

                let existing = self
                    .by_target
                    .get(&target)
                    .and_then(|sources| sources.get(&complex))
                    .cloned();
                if let Some(existing) = existing {
                    let merged = existing.merge(&with_extender, &self.traces)?;
                    if let Some(sources) = self.by_target.get_mut(&target) {
                        sources.set(complex.clone(), merged);
                    }
                } else {
                    self.by_target
                        .entry(target.clone())
                        .or_default()
                        .set(complex.clone(), with_extender.clone());
                    for component in complex.components() {
                        for simple in component.selector().components() {
                            self.by_extender
                                .entry(simple.clone())
                                .or_default()
                                .push(with_extender.clone());
                        }
                    }
                    if new_extensions.contains_key(&target) {
                        additional
                            .entry(target.clone())
                            .or_default()
                            .set(complex.clone(), with_extender);
                    }
                }
            }
        }
        Ok(additional)
    }

    /// Rewrites each registered rule in `ids` with `new_extensions`,
    /// re-registering the simple selectors of any list that changed.
    fn extend_existing_selectors(
        &mut self,
        ids: &[SelectorId],
        new_extensions: &ExtensionMap,
    ) -> SassResult<()> {
        for &id in ids {
            let list = self.rules[id.0].list.clone();
            let media_context = self.rules[id.0].media_context.clone();
            // If no extends applied (for example because unification
            // failed), there's no need to re-register the selector.
            if let Some(rewritten) =
                self.extend_list(&list, new_extensions, media_context.as_ref())?
            {
                self.rules[id.0].list = rewritten;
                register_selector(&mut self.selectors, &self.rules[id.0].list, id);
            }
        }
        Ok(())
    }

    /// Extends every alternative of `list`, returning `None` when nothing
    /// applied anywhere.
    fn extend_list(
        &mut self,
        list: &SelectorList,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
    ) -> SassResult<Option<SelectorList>> {
        // Written to avoid any allocation in the common case where no
        // extends apply.
        let mut extended: Vec<ComplexSelector> = Vec::new();
        for (i, complex) in list.components().iter().enumerate() {
            let result = self.extend_complex(complex, extensions, media_context)?;
            if result.is_empty() {
                if !extended.is_empty() {
                    extended.push(complex.clone());
                }
            } else {
                if extended.is_empty() {
                    extended.extend(list.components()[..i].iter().cloned());
                }
                extended.extend(result);
            }
        }
        if extended.is_empty() {
            return Ok(None);
        }
        self.trim(&mut extended);
        Ok(Some(SelectorList::new(extended)))
    }

    /// Extends one complex selector, returning the alternatives it
    /// expands to (empty when no extension applies).
    fn extend_complex(
        &mut self,
        complex: &ComplexSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
    ) -> SassResult<Vec<ComplexSelector>> {
        if complex.leading_combinators().len() > 1 {
            return Ok(Vec::new());
        }

        // The complex selectors that each compound selector in `complex`
        // can expand to. For example, given
        //
        //     .a .b {...}
        //     .x .y {@extend .b}
        //
        // this contains
        //
        //     [
        //       [.a],
        //       [.b, .x .y]
        //     ]
        let mut extended_not_expanded: Vec<Vec<ComplexSelector>> = Vec::new();
        for (i, component) in complex.components().iter().enumerate() {
            let extended = self.extend_compound(component, extensions, media_context)?;
            if extended.is_empty() {
                if !extended_not_expanded.is_empty() {
                    extended_not_expanded.push(vec![ComplexSelector::new(
                        Vec::new(),
                        vec![component.clone()],
                        complex.line_break(),
                    )]);
                }
            } else if !extended_not_expanded.is_empty() {
                extended_not_expanded.push(extended);
            } else if i != 0 {
                extended_not_expanded = vec![
                    vec![ComplexSelector::new(
                        complex.leading_combinators().to_vec(),
                        complex.components()[..i].to_vec(),
                        complex.line_break(),
                    )],
                    extended,
                ];
            } else if complex.leading_combinators().is_empty() {
                extended_not_expanded = vec![extended];
            } else {
                // The leading combinators must survive onto whatever the
                // first compound expanded to; alternatives that brought
                // their own incompatible combinators are dropped.
                let mut merged = Vec::new();
                for new_complex in extended {
                    if new_complex.leading_combinators().is_empty()
                        || new_complex.leading_combinators() == complex.leading_combinators()
                    {
                        merged.push(ComplexSelector::new(
                            complex.leading_combinators().to_vec(),
                            new_complex.components().to_vec(),
                            complex.line_break() || new_complex.line_break(),
                        ));
                    }
                }
                extended_not_expanded = vec![merged];
            }
        }

        if extended_not_expanded.is_empty() {
            return Ok(Vec::new());
        }

        let mut result: Vec<ComplexSelector> = Vec::new();
        let mut first = true;
        for path in paths(&extended_not_expanded) {
            for woven in weave(&path, complex.line_break()) {
                // Make sure that copies of `complex` retain their status
                // as "original" selectors. This includes selectors that
                // are modified because a :not() was extended into.
                if first {
                    if self.originals.contains(complex) {
                        let _ = self.originals.insert(woven.clone());
                    }
                    first = false;
                }

                if !result.contains(&woven) {
                    result.push(woven);
                    if result.len() > EXTEND_COMPLEX_LIMIT {
                        return Err(SassError::new(ErrorKind::EndlessExtend, &self.traces));
                    }
                }
            }
        }
        Ok(result)
    }

    /// Extends one compound (with its trailing combinators), returning
    /// the complex selectors it expands to.
    fn extend_compound(
        &mut self,
        component: &ComplexSelectorComponent,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
    ) -> SassResult<Vec<ComplexSelector>> {
        let compound = component.selector();

        // If there's more than one target and they all need to match, we
        // track which targets actually are extended.
        let mut targets_used: Option<BTreeSet<SimpleSelector>> =
            if self.mode != ExtendMode::Normal && extensions.len() > 1 {
                Some(BTreeSet::new())
            } else {
                None
            };

        // The extenders produced from each simple selector of `compound`.
        let mut options: Vec<Vec<Extender>> = Vec::new();
        for (i, simple) in compound.components().iter().enumerate() {
            let extended =
                self.extend_simple(simple, extensions, media_context, &mut targets_used)?;
            if extended.is_empty() {
                if !options.is_empty() {
                    options.push(vec![self.extender_for_simple(simple)]);
                }
            } else {
                if options.is_empty() && i != 0 {
                    let initial = CompoundSelector::of(compound.components()[..i].to_vec());
                    options.push(vec![self.extender_for_compound(initial)]);
                }
                options.extend(extended);
            }
        }
        if options.is_empty() {
            return Ok(Vec::new());
        }

        // Outside normal mode, extension fails for this compound unless
        // every target matched somewhere in it.
        if let Some(used) = &targets_used {
            if used.len() != extensions.len() && !used.is_empty() {
                return Ok(Vec::new());
            }
        }

        // Optimize for the common case of a single simple selector that
        // doesn't need any unification.
        if options.len() == 1 {
            let mut result = Vec::new();
            for extender in &options[0] {
                extender.assert_compatible_media_context(media_context, &self.traces)?;
                let complex = extender
                    .selector()
                    .with_additional_combinators(component.combinators());
                if complex.is_useless() {
                    continue;
                }
                result.push(complex);
            }
            return Ok(result);
        }

        // Find all paths through `options`; each path is one unification
        // of the base compound. For example, with
        //
        //     .a.b {...}
        //     .w .x {@extend .a}
        //     .y .z {@extend .b}
        //
        // `options` is `[[.a, .w .x], [.b, .y .z]]` and the paths are
        //
        //     [
        //       [.a, .b],
        //       [.a, .y .z],
        //       [.w .x, .b],
        //       [.w .x, .y .z]
        //     ]
        //
        // and each path unifies into a list of complex selectors.
        let mut first = self.mode != ExtendMode::Replace;
        let mut unified_paths: Vec<ComplexSelector> = Vec::new();
        for path in paths(&options) {
            let complexes: Vec<ComplexSelector> = if first {
                // The first path is always the original selector. We can't
                // just return `compound` directly because pseudo selectors
                // may have been modified, but no unification is needed.
                first = false;
                let mut merged: Vec<SimpleSelector> = Vec::new();
                for state in &path {
                    if let Some(last) = state.selector().components().last() {
                        merged.extend(last.selector().components().iter().cloned());
                    }
                }
                vec![ComplexSelector::new(
                    Vec::new(),
                    vec![ComplexSelectorComponent::new(
                        CompoundSelector::of(merged),
                        component.combinators().to_vec(),
                    )],
                    false,
                )]
            } else {
                let mut original_simples: Vec<SimpleSelector> = Vec::new();
                let mut to_unify: Vec<ComplexSelector> = Vec::new();
                for state in &path {
                    if state.is_original() {
                        if let Some(last) = state.selector().components().last() {
                            original_simples
                                .extend(last.selector().components().iter().cloned());
                        }
                    } else if state.selector().is_useless() {
                        return Ok(Vec::new());
                    } else {
                        to_unify.push(state.selector().clone());
                    }
                }
                if !original_simples.is_empty() {
                    to_unify.insert(
                        0,
                        CompoundSelector::of(original_simples).wrap_in_complex(),
                    );
                }
                let Some(unified) = unify_complex(&to_unify) else {
                    continue;
                };
                let mut complexes = Vec::new();
                for unified_complex in unified {
                    let with_combinators =
                        unified_complex.with_additional_combinators(component.combinators());
                    if with_combinators.is_useless() {
                        continue;
                    }
                    complexes.push(with_combinators);
                }
                if complexes.is_empty() {
                    continue;
                }
                complexes
            };

            let mut line_break = false;
            for state in &path {
                state.assert_compatible_media_context(media_context, &self.traces)?;
                line_break = line_break || state.selector().line_break();
            }

            for sel in complexes {
                unified_paths.push(ComplexSelector::new(
                    sel.leading_combinators().to_vec(),
                    sel.components().to_vec(),
                    line_break,
                ));
            }
        }
        Ok(unified_paths)
    }

    /// Extends one simple selector, including the contents of any selector
    /// pseudo it carries. Each inner vector is one option group for the
    /// path expansion.
    fn extend_simple(
        &mut self,
        simple: &SimpleSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        targets_used: &mut Option<BTreeSet<SimpleSelector>>,
    ) -> SassResult<Vec<Vec<Extender>>> {
        if let SimpleSelector::Pseudo(pseudo) = simple {
            if pseudo.selector().is_some() {
                let extended = self.extend_pseudo(pseudo, extensions, media_context)?;
                if !extended.is_empty() {
                    let mut merged = Vec::new();
                    for extended_pseudo in extended {
                        let extended_simple = SimpleSelector::Pseudo(extended_pseudo);
                        let mut result =
                            self.extend_without_pseudo(&extended_simple, extensions, targets_used);
                        if result.is_empty() {
                            result = vec![self.extender_for_simple(&extended_simple)];
                        }
                        merged.push(result);
                    }
                    return Ok(merged);
                }
            }
        }
        let result = self.extend_without_pseudo(simple, extensions, targets_used);
        if result.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![result])
        }
    }

    /// Extends `simple` without descending into selector pseudos.
    fn extend_without_pseudo(
        &self,
        simple: &SimpleSelector,
        extensions: &ExtensionMap,
        targets_used: &mut Option<BTreeSet<SimpleSelector>>,
    ) -> Vec<Extender> {
        let Some(sources) = extensions.get(simple) else {
            return Vec::new();
        };
        if let Some(used) = targets_used.as_mut() {
            let _ = used.insert(simple.clone());
        }

        let mut result = Vec::new();
        if self.mode != ExtendMode::Replace {
            result.push(self.extender_for_simple(simple));
        }
        for (_, extension) in sources.iter() {
            result.push(extension.extender().clone());
        }
        result
    }

    /// Extends the selector argument of `pseudo`, returning the pseudo
    /// selectors that replace it (empty when nothing applied).
    fn extend_pseudo(
        &mut self,
        pseudo: &PseudoSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
    ) -> SassResult<Vec<PseudoSelector>> {
        let Some(selector) = pseudo.selector() else {
            return Ok(Vec::new());
        };
        let Some(extended) = self.extend_list(selector, extensions, media_context)? else {
            return Ok(Vec::new());
        };

        // For `:not()` we usually want to drop complex selectors, since
        // they won't parse everywhere. We keep them only if the original
        // already had one, or the result has nothing else, because then we
        // aren't breaking anything that isn't already broken.
        let mut complexes: Vec<ComplexSelector> = extended.components().to_vec();
        if pseudo.normalized() == "not"
            && !selector.components().iter().any(|complex| complex.len() > 1)
            && extended.components().iter().any(|complex| complex.len() == 1)
        {
            complexes.retain(|complex| complex.len() <= 1);
        }

        let mut expanded: Vec<ComplexSelector> = Vec::new();
        for complex in complexes {
            expanded.extend(extend_pseudo_complex(&complex, pseudo));
        }

        // Older browsers support `:not` only with a single complex
        // selector, so we break up the contents unless the original
        // already contained a list.
        if pseudo.normalized() == "not" && selector.components().len() == 1 {
            return Ok(expanded
                .into_iter()
                .map(|complex| pseudo.with_selector(Some(complex.wrap_in_list())))
                .collect());
        }
        Ok(vec![pseudo.with_selector(Some(SelectorList::new(expanded)))])
    }

    /// A one-off extender standing in for `simple` itself.
    fn extender_for_simple(&self, simple: &SimpleSelector) -> Extender {
        Extender::new(
            CompoundSelector::of(vec![simple.clone()]).wrap_in_complex(),
            self.max_source_specificity_simple(simple),
            true,
            None,
        )
    }

    /// A one-off extender standing in for a compound of already-seen
    /// simples.
    fn extender_for_compound(&self, compound: CompoundSelector) -> Extender {
        let specificity = self.max_source_specificity_compound(&compound);
        Extender::new(compound.wrap_in_complex(), specificity, true, None)
    }

    /// The recorded source specificity of `simple`, or zero if it never
    /// appeared in an extender.
    fn max_source_specificity_simple(&self, simple: &SimpleSelector) -> Specificity {
        self.source_specificity
            .get(simple)
            .copied()
            .unwrap_or(Specificity::ZERO)
    }

    /// The highest source specificity among the simples of `compound`.
    fn max_source_specificity_compound(&self, compound: &CompoundSelector) -> Specificity {
        compound
            .components()
            .iter()
            .map(|simple| self.max_source_specificity_simple(simple))
            .max()
            .unwrap_or(Specificity::ZERO)
    }

    /// Removes alternatives that are subselectors of other alternatives.
    /// Selectors original to the document are never removed, and a
    /// selector is only dropped for a keeper whose specificity reaches the
    /// dropped selector's source specificity.
    fn trim(&self, selectors: &mut Vec<ComplexSelector>) {
        // Avoid truly horrific quadratic behavior.
        if selectors.len() > TRIM_LIMIT {
            return;
        }

        // This is n² on the alternatives. We iterate from last to first
        // and build the result front-to-back so that, if two selectors
        // are identical, the first one is kept.
        let mut result: Vec<ComplexSelector> = Vec::new();
        let mut num_originals = 0_usize;

        let mut i = selectors.len();
        'outer: while i > 0 {
            i -= 1;
            let complex1 = &selectors[i];

            if self.originals.contains(complex1) {
                // Don't include duplicate originals, which can happen when
                // a style rule extends a component of its own selector.
                for j in 0..num_originals {
                    if result[j] == *complex1 {
                        rotate_slice(&mut result, 0, j + 1);
                        continue 'outer;
                    }
                }
                result.insert(0, complex1.clone());
                num_originals += 1;
                continue;
            }

            // The maximum specificity of the sources that caused
            // `complex1` to be generated: to be removed, another selector
            // must cover it with at least this much specificity.
            let mut max_specificity = Specificity::ZERO;
            for component in complex1.components() {
                max_specificity = max_specificity
                    .max(self.max_source_specificity_compound(component.selector()));
            }

            // Look in `result` rather than `selectors` for selectors
            // after `i`, so we don't compare against anything already
            // trimmed (and of two identical selectors only one goes).
            if result.iter().any(|complex2| {
                complex2.min_specificity() >= max_specificity
                    && complex2.is_superselector_of(complex1)
            }) {
                continue;
            }
            if selectors[..i].iter().any(|complex2| {
                complex2.min_specificity() >= max_specificity
                    && complex2.is_superselector_of(complex1)
            }) {
                continue;
            }

            result.insert(0, complex1.clone());
        }

        *selectors = result;
    }
}

/// Indexes every simple selector of `list` (including those inside
/// selector pseudo arguments) as belonging to the registered rule `id`.
fn register_selector(
    selectors: &mut BTreeMap<SimpleSelector, BTreeSet<SelectorId>>,
    list: &SelectorList,
    id: SelectorId,
) {
    for complex in list.components() {
        for component in complex.components() {
            for simple in component.selector().components() {
                let _ = selectors.entry(simple.clone()).or_default().insert(id);
                if let SimpleSelector::Pseudo(pseudo) = simple {
                    if let Some(inner) = pseudo.selector() {
                        register_selector(selectors, inner, id);
                    }
                }
            }
        }
    }
}

/// Expands one alternative of an extended pseudo argument against the
/// pseudo that holds it: nested pseudos of the same shape flatten, layered
/// pseudos (`:has`, `:host`, ...) stay opaque, and anything else inside
/// `:not` is dropped.
fn extend_pseudo_complex(
    complex: &ComplexSelector,
    pseudo: &PseudoSelector,
) -> Vec<ComplexSelector> {
    if complex.len() != 1 {
        return vec![complex.clone()];
    }
    let compound = complex.components()[0].selector();
    if compound.len() != 1 {
        return vec![complex.clone()];
    }
    let SimpleSelector::Pseudo(inner_pseudo) = &compound.components()[0] else {
        return vec![complex.clone()];
    };
    let Some(inner_selector) = inner_pseudo.selector() else {
        return vec![complex.clone()];
    };

    match pseudo.normalized() {
        "not" => {
            // In theory, a `:not` nested inside another `:not` should
            // unify its contents with the outer result: if `:not(.foo)`
            // extends `.bar`, `:not(.bar)` should become
            // `.foo:not(.bar)`. That's a narrow edge case, and supporting
            // it would complicate everything around here, so it's not
            // supported.
            if matches!(inner_pseudo.normalized(), "matches" | "where" | "is") {
                inner_selector.components().to_vec()
            } else {
                Vec::new()
            }
        }
        name if is_subselector_pseudo(name) || name == "current" => {
            if inner_pseudo.name() == pseudo.name()
                && inner_pseudo.argument() == pseudo.argument()
            {
                inner_selector.components().to_vec()
            } else {
                Vec::new()
            }
        }
        "has" | "host" | "host-context" | "slotted" => {
            // We can't expand nested selectors here: each layer adds
            // semantics. `:has(:has(img))` doesn't match `<div><img></div>`
            // but `:has(img)` does.
            vec![complex.clone()]
        }
        _ => Vec::new(),
    }
}

/// Rotates the elements in `list[start..end]` one index higher, looping
/// the final element back to `start`.
fn rotate_slice(list: &mut [ComplexSelector], start: usize, end: usize) {
    list[start..end].rotate_right(1);
}
