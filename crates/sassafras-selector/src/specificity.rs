//! Selector specificity per
//! [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules).
//!
//! "A selector's specificity is calculated for a given element as follows:
//!  - count the number of ID selectors in the selector (= A)
//!  - count the number of class selectors, attributes selectors, and
//!    pseudo-classes in the selector (= B)
//!  - count the number of type selectors and pseudo-elements in the
//!    selector (= C)"
//!
//! Sass placeholders (`%foo`) count like classes; the universal selector
//! contributes nothing.

use core::ops::{Add, AddAssign};

use serde::Serialize;

/// A specificity triple `(A, B, C)` compared component-wise in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// The zero specificity (universal selector, bare combinators).
    pub const ZERO: Self = Self(0, 0, 0);

    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
