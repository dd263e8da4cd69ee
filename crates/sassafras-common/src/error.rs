//! Typed compiler errors.
//!
//! Every failure the selector core can raise is a value of [`SassError`]:
//! a kind with the user-visible message, plus a snapshot of the call-stack
//! taken when the error was constructed. Nothing is recovered inside the
//! core; callers abort the current compilation and report the message with
//! its trace.

use thiserror::Error;

use crate::backtrace::{Backtraces, StackTrace};
use crate::span::SourceSpan;

/// The kinds of error the selector core raises, with their messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A `&` was used in a context with no enclosing parent selector.
    #[error("Top-level selectors may not contain the parent selector \"&\".")]
    TopLevelParent,

    /// A parent selector cannot be fused into the compound that follows it.
    #[error("Selector \"{parent}\" can't be used as a parent in a compound selector.")]
    InvalidParent {
        /// The offending parent selector, serialized.
        parent: String,
    },

    /// A selector cannot be appended to another without a descendant gap.
    #[error("Can't append \"{child}\" to \"{parent}\".")]
    CantAppend {
        /// The selector being appended.
        child: String,
        /// The selector it was appended to.
        parent: String,
    },

    /// A mandatory `@extend` found nothing to extend.
    #[error(
        "The target selector was not found.\n\
         Use \"@extend {target} !optional\" to avoid this error."
    )]
    UnsatisfiedExtend {
        /// The extend target, serialized.
        target: String,
    },

    /// An extender defined in one `@media` context reached a selector in an
    /// incompatible one.
    #[error("You may not @extend selectors across media queries.")]
    ExtendAcrossMedia,

    /// The same extender extended the same target from two different
    /// `@media` contexts.
    #[error("You may not @extend the same selector from within different media queries.")]
    MergedExtendAcrossMedia,

    /// An extension cascade exceeded the output bound.
    #[error("Extend is creating an absurdly big selector, aborting!")]
    EndlessExtend,

    /// A built-in selector function received an argument that is not a
    /// usable selector.
    #[error("${name}: {message}")]
    InvalidSelectorArgument {
        /// The parameter name, without the `$` sigil.
        name: String,
        /// What was wrong with the value.
        message: String,
    },

    /// `@extend` was given a complex selector where a compound is required.
    #[error("Can't extend complex selector {selector}.")]
    CompoundRequired {
        /// The rejected selector, serialized.
        selector: String,
    },

    /// The selector parser rejected its input.
    #[error("Error: {message} at {span}")]
    Syntax {
        /// What the parser expected or found.
        message: String,
        /// Where in the source the failure happened.
        span: SourceSpan,
    },
}

/// An error kind plus the call-stack at the point it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SassError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Stack of evaluation frames, outermost first.
    pub traces: Vec<StackTrace>,
}

impl SassError {
    /// Build an error from a kind, snapshotting the given call-stack.
    #[must_use]
    pub fn new(kind: ErrorKind, traces: &Backtraces) -> Self {
        Self { kind, traces: traces.snapshot() }
    }

    /// Build an error with no trace (used by pure entry points).
    #[must_use]
    pub const fn untraced(kind: ErrorKind) -> Self {
        Self { kind, traces: Vec::new() }
    }

    /// Build a parse error at `span`.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::untraced(ErrorKind::Syntax { message: message.into(), span })
    }
}

/// Result alias used across the Sassafras crates.
pub type SassResult<T> = Result<T, SassError>;
