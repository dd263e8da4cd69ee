//! Explicit call-stack for error back-traces.
//!
//! The evaluator pushes one frame per evaluation step (style rule, `@extend`
//! rule, function call) before invoking the selector core, and pops it when
//! the call returns. Errors raised inside the core snapshot the stack at
//! construction time, so the trace survives even after the frames have been
//! popped.

use crate::span::SourceSpan;

/// One frame of a back-trace: where execution was, and optionally what it
/// was doing (`@extend`, a function name, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackTrace {
    /// The source location of this frame.
    pub span: SourceSpan,
    /// The name of the rule or function being evaluated, if any.
    pub name: Option<String>,
}

impl StackTrace {
    /// Create a frame with no name.
    #[must_use]
    pub const fn new(span: SourceSpan) -> Self {
        Self { span, name: None }
    }

    /// Create a named frame.
    #[must_use]
    pub fn named(span: SourceSpan, name: impl Into<String>) -> Self {
        Self { span, name: Some(name.into()) }
    }
}

/// The active call-stack, threaded through the public entry points of the
/// selector core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtraces {
    frames: Vec<StackTrace>,
}

impl Backtraces {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Push a frame. Callers must pop it again when the call returns.
    pub fn push(&mut self, frame: StackTrace) {
        self.frames.push(frame);
    }

    /// Pop the most recent frame.
    pub fn pop(&mut self) {
        let _ = self.frames.pop();
    }

    /// The current frames, innermost last.
    #[must_use]
    pub fn frames(&self) -> &[StackTrace] {
        &self.frames
    }

    /// Snapshot the stack for storage in an error.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StackTrace> {
        self.frames.clone()
    }
}
