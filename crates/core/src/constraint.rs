//! Construction-time numeric invariants for measured quantities.
//!
//! A [`Constrained<C>`] wraps an `f64` that is known to satisfy the
//! constraint `C`. Once built, downstream code can rely on the invariant
//! without re-checking it.
//!
//! # Provided Constraints
//!
//! - [`StrictlyPositive`]: greater than zero (concentrations)
//! - [`NonNegative`]: zero or greater (ages, durations)
//! - [`UnitInterval`]: within `[0, 1]` (aggregation fractions)
//!
//! # Example
//!
//! ```
//! use snac_core::constraint::{StrictlyPositive, UnitInterval};
//!
//! let ppm = StrictlyPositive::new(625.0).unwrap();
//! assert_eq!(ppm.get(), 625.0);
//!
//! assert!(UnitInterval::new(0.863).is_ok());
//! assert!(UnitInterval::new(1.2).is_err());
//! assert!(StrictlyPositive::new(0.0).is_err());
//! ```

use std::marker::PhantomData;

use thiserror::Error;

/// A check applied to an `f64` before it may be wrapped.
pub trait Constraint {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] describing the violation.
    fn check(value: f64) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
}

/// An `f64` that satisfies the constraint `C`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<C: Constraint> {
    value: f64,
    _marker: PhantomData<C>,
}

impl<C: Constraint> Constrained<C> {
    /// Wraps `value` after checking it against `C`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: f64) -> Result<Self, ConstraintError> {
        C::check(value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.value
    }
}

impl<C: Constraint> AsRef<f64> for Constrained<C> {
    fn as_ref(&self) -> &f64 {
        &self.value
    }
}

/// Marker: the value is greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs `Constrained<StrictlyPositive>` if `value > 0`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstraintError::Negative`], [`ConstraintError::Zero`], or
    /// [`ConstraintError::NotANumber`].
    pub fn new(value: f64) -> Result<Constrained<StrictlyPositive>, ConstraintError> {
        Constrained::new(value)
    }
}

impl Constraint for StrictlyPositive {
    fn check(value: f64) -> Result<(), ConstraintError> {
        if value.is_nan() {
            Err(ConstraintError::NotANumber)
        } else if value < 0.0 {
            Err(ConstraintError::Negative)
        } else if value == 0.0 {
            Err(ConstraintError::Zero)
        } else {
            Ok(())
        }
    }
}

/// Marker: the value is zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs `Constrained<NonNegative>` if `value >= 0`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstraintError::Negative`] or [`ConstraintError::NotANumber`].
    pub fn new(value: f64) -> Result<Constrained<NonNegative>, ConstraintError> {
        Constrained::new(value)
    }

    #[must_use]
    pub fn zero() -> Constrained<NonNegative> {
        Constrained {
            value: 0.0,
            _marker: PhantomData,
        }
    }
}

impl Constraint for NonNegative {
    fn check(value: f64) -> Result<(), ConstraintError> {
        if value.is_nan() {
            Err(ConstraintError::NotANumber)
        } else if value < 0.0 {
            Err(ConstraintError::Negative)
        } else {
            Ok(())
        }
    }
}

/// Marker: the value lies in the closed unit interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<UnitInterval>` if `0 <= value <= 1`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstraintError::BelowMinimum`],
    /// [`ConstraintError::AboveMaximum`], or [`ConstraintError::NotANumber`].
    pub fn new(value: f64) -> Result<Constrained<UnitInterval>, ConstraintError> {
        Constrained::new(value)
    }
}

impl Constraint for UnitInterval {
    fn check(value: f64) -> Result<(), ConstraintError> {
        if value.is_nan() {
            Err(ConstraintError::NotANumber)
        } else if value < 0.0 {
            Err(ConstraintError::BelowMinimum)
        } else if value > 1.0 {
            Err(ConstraintError::AboveMaximum)
        } else {
            Ok(())
        }
    }
}
