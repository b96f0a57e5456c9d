/// A point with its evaluated objective value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<const N: usize> {
    /// The solver variables.
    pub x: [f64; N],

    /// The objective value at x.
    pub objective: f64,
}

impl<const N: usize> Point<N> {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: [f64; N], objective: f64) -> Self {
        Self { x, objective }
    }
}
