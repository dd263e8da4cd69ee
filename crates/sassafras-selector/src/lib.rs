//! Selector data model, parser, algebra, and `@extend` engine for the
//! Sassafras compiler.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector data model** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Simple selectors: type (with namespaces), id, class, attribute
//!     (with operators and case modifiers), pseudo (with `an+b` and
//!     selector arguments), and Sass placeholders
//!   - Compound, complex (with all combinators), and list layers, all
//!     immutable with memoised hashes and specificity
//!
//! - **Selector parser**: the CSS-selectors-with-`&` grammar Sass uses
//!
//! - **Parent resolution**: expanding `&` references against the
//!   enclosing rule's selector, including suffix fusion (`&foo`)
//!
//! - **Superselector oracle**: "does A match everything B matches",
//!   across all selector layers and selector-argument pseudos
//!
//! - **Unification**: selectors matching only the intersection of their
//!   inputs
//!
//! - **Weaving**: interleaving ancestor chains while preserving each
//!   input's order and merging compatible combinators
//!
//! - **`@extend`**: an incremental extension store that rewrites
//!   already-registered selectors as extensions arrive, honoring media
//!   contexts, optionality, and the first and second laws of extend
//!
//! # Not Implemented Here
//!
//! - The stylesheet scanner/parser, evaluator, and CSS serializer
//! - Source-map accounting
//! - `@use`/`@forward` module loading (but see
//!   [`extend::ExtensionStore::add_extension_stores`] for the selector
//!   side of module composition)

/// The incremental `@extend` engine.
pub mod extend;
/// Backing implementations for the `sass:selector` built-in functions.
pub mod functions;
/// The selector-text parser.
pub mod parser;
/// The selector data model.
pub mod selector;
/// Selector specificity per [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules).
pub mod specificity;
/// The superselector oracle.
pub mod superselector;
/// Selector unification.
pub mod unify;
/// The weaver for ancestor chains.
pub mod weave;

mod utils;

// Re-exports for convenience
pub use extend::{ExtendMode, Extension, ExtensionStore, MediaContext, SelectorId};
pub use parser::{
    parse_compound_selector, parse_selector_list, parse_simple_selector, SelectorParser,
};
pub use selector::{
    AttributeOp, AttributeSelector, Combinator, ComplexSelector, ComplexSelectorComponent,
    CompoundSelector, PseudoSelector, QualifiedName, SelectorList, SimpleSelector,
};
pub use specificity::Specificity;
pub use superselector::{complex_is_superselector, list_is_superselector};
pub use unify::{unify_complex, unify_compound};
pub use weave::weave;
