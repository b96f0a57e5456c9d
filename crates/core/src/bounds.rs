use thiserror::Error;

/// Independent lower/upper limits for each of `N` solver variables.
///
/// Either side may be infinite. Each lower limit is guaranteed to be less
/// than or equal to its upper limit, and no limit is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    lower: [f64; N],
    upper: [f64; N],
}

/// Errors that can occur when constructing [`Bounds`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundsError {
    #[error("bound {index} is NaN")]
    NotANumber { index: usize },

    #[error("bound {index} is inverted: lower ({lower}) > upper ({upper})")]
    Inverted { index: usize, lower: f64, upper: f64 },
}

impl<const N: usize> Bounds<N> {
    /// Creates bounds from per-variable `(lower, upper)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is NaN or any pair is inverted.
    pub fn new(pairs: [(f64, f64); N]) -> Result<Self, BoundsError> {
        let mut lower = [0.0; N];
        let mut upper = [0.0; N];

        for (index, (lo, hi)) in pairs.into_iter().enumerate() {
            if lo.is_nan() || hi.is_nan() {
                return Err(BoundsError::NotANumber { index });
            }
            if lo > hi {
                return Err(BoundsError::Inverted {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
            lower[index] = lo;
            upper[index] = hi;
        }

        Ok(Self { lower, upper })
    }

    /// Bounds that place no limit on any variable.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            lower: [f64::NEG_INFINITY; N],
            upper: [f64::INFINITY; N],
        }
    }

    #[must_use]
    pub fn lower(&self) -> &[f64; N] {
        &self.lower
    }

    #[must_use]
    pub fn upper(&self) -> &[f64; N] {
        &self.upper
    }

    /// Clamps each component of `x` into its interval.
    #[must_use]
    pub fn project(&self, x: [f64; N]) -> [f64; N] {
        let mut projected = x;
        for (i, value) in projected.iter_mut().enumerate() {
            *value = value.clamp(self.lower[i], self.upper[i]);
        }
        projected
    }

    /// Returns `true` if every component of `x` lies inside its interval.
    #[must_use]
    pub fn contains(&self, x: &[f64; N]) -> bool {
        x.iter()
            .enumerate()
            .all(|(i, v)| *v >= self.lower[i] && *v <= self.upper[i])
    }

    #[must_use]
    pub fn is_at_lower(&self, x: &[f64; N], index: usize) -> bool {
        x[index] <= self.lower[index]
    }

    #[must_use]
    pub fn is_at_upper(&self, x: &[f64; N], index: usize) -> bool {
        x[index] >= self.upper[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_pair() {
        let err = Bounds::new([(0.0, 1.0), (5.0, 4.0)]).unwrap_err();
        assert_eq!(
            err,
            BoundsError::Inverted {
                index: 1,
                lower: 5.0,
                upper: 4.0
            }
        );
    }

    #[test]
    fn rejects_nan() {
        let err = Bounds::new([(f64::NAN, 1.0)]).unwrap_err();
        assert_eq!(err, BoundsError::NotANumber { index: 0 });
    }

    #[test]
    fn projects_each_component_independently() {
        let bounds = Bounds::new([(1000.0, 1450.0), (0.001, 0.12)]).unwrap();

        assert_eq!(bounds.project([900.0, 0.5]), [1000.0, 0.12]);
        assert_eq!(bounds.project([1200.0, 0.01]), [1200.0, 0.01]);
        assert!(bounds.contains(&[1450.0, 0.001]));
        assert!(!bounds.contains(&[1450.1, 0.001]));
    }

    #[test]
    fn detects_active_sides() {
        let bounds = Bounds::new([(0.0, 1.0), (-1.0, 1.0)]).unwrap();
        let x = [0.0, 1.0];

        assert!(bounds.is_at_lower(&x, 0));
        assert!(!bounds.is_at_upper(&x, 0));
        assert!(bounds.is_at_upper(&x, 1));
    }

    #[test]
    fn unbounded_projection_is_identity() {
        let bounds = Bounds::<2>::unbounded();
        assert_eq!(bounds.project([-1e300, 1e300]), [-1e300, 1e300]);
    }
}
