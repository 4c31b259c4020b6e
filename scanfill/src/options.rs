// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameters of a single fill call.

use crate::Error;
use peniko::Fill;

/// The default flattening tolerance, in path units.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Raw value of [`Fill::NonZero`] in [`fill_rule_from_bits`].
pub const FILL_BITS_NON_ZERO: u32 = 0;

/// Raw value of [`Fill::EvenOdd`] in [`fill_rule_from_bits`].
pub const FILL_BITS_EVEN_ODD: u32 = 1;

/// Options controlling how a path is filled.
///
/// Nothing here persists between fill calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillOptions {
    /// Maximum allowed distance between a curve and its flattened polyline.
    ///
    /// Curves are never flattened more finely than
    /// [`MIN_RELATIVE_TOLERANCE`](crate::flatten::MIN_RELATIVE_TOLERANCE) of
    /// their own size, whatever is asked for here.
    pub tolerance: f64,
    /// The rule deciding which spans are inside the path.
    pub fill_rule: Fill,
}

impl FillOptions {
    /// Options with the given fill rule and the default tolerance.
    pub const fn new(fill_rule: Fill) -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            fill_rule,
        }
    }

    /// Options for a non-zero fill.
    pub const fn non_zero() -> Self {
        Self::new(Fill::NonZero)
    }

    /// Options for an even-odd fill.
    pub const fn even_odd() -> Self {
        Self::new(Fill::EvenOdd)
    }

    /// Set the flattening tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the fill rule.
    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: Fill) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Check that the options describe a fill that can be performed.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::non_zero()
    }
}

/// Decode a fill rule passed around as a raw integer.
pub fn fill_rule_from_bits(bits: u32) -> Result<Fill, Error> {
    match bits {
        FILL_BITS_NON_ZERO => Ok(Fill::NonZero),
        FILL_BITS_EVEN_ODD => Ok(Fill::EvenOdd),
        _ => Err(Error::InvalidFillRule(bits)),
    }
}

/// Whether a span with the given accumulated winding is inside the path.
#[inline]
pub fn is_inside(fill_rule: Fill, winding: i32) -> bool {
    match fill_rule {
        Fill::NonZero => winding != 0,
        Fill::EvenOdd => winding % 2 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = FillOptions::default();
        assert_eq!(options.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(options.fill_rule, Fill::NonZero);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn bad_tolerance_is_rejected() {
        for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let options = FillOptions::even_odd().with_tolerance(tolerance);
            assert!(matches!(
                options.validate(),
                Err(Error::InvalidTolerance(_))
            ));
        }
    }

    #[test]
    fn fill_rule_bits() {
        assert_eq!(fill_rule_from_bits(0), Ok(Fill::NonZero));
        assert_eq!(fill_rule_from_bits(1), Ok(Fill::EvenOdd));
        assert_eq!(fill_rule_from_bits(7), Err(Error::InvalidFillRule(7)));
    }

    #[test]
    fn inside_rules() {
        assert!(is_inside(Fill::NonZero, -2));
        assert!(!is_inside(Fill::EvenOdd, -2));
        assert!(is_inside(Fill::EvenOdd, -1));
        assert!(!is_inside(Fill::NonZero, 0));
    }
}
