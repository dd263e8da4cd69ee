//! Shared utilities for the Sassafras compiler.
//!
//! This crate holds the pieces every other Sassafras crate leans on:
//! source spans, the explicit call-stack used to attach back-traces to
//! errors, the typed error values themselves, and deduplicated warning
//! output.

/// Explicit call-stack of source locations, snapshotted into errors.
pub mod backtrace;
/// Typed compiler errors with back-traces.
pub mod error;
/// Byte spans into source text.
pub mod span;
/// Deduplicated warnings with colored terminal output.
pub mod warning;

// Re-exports for convenience
pub use backtrace::{Backtraces, StackTrace};
pub use error::{ErrorKind, SassError, SassResult};
pub use span::SourceSpan;
pub use warning::warn_once;
