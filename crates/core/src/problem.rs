use crate::Bounds;

/// Defines a bounded minimization problem to be solved.
///
/// A minimization problem maps solver variables to a model input, then
/// computes an objective value from the model input and output. Solvers
/// search the box returned by [`MinimizationProblem::bounds`] for the
/// variables that minimize the objective.
///
/// The const generic `N` is the number of solver variables.
pub trait MinimizationProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the box the solver variables must stay inside.
    fn bounds(&self) -> &Bounds<N>;

    /// Maps solver variables (`x`) into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: &[f64; N]) -> Result<Self::Input, Self::Error>;

    /// Computes an objective value from model input/output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot be computed.
    fn objective(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error>;
}
