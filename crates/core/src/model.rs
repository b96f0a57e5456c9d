/// A callable model that maps an input to an output.
///
/// Models are pure from the solver's point of view: calling a model twice
/// with the same input must produce the same output.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// The input a model was called with and the output it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Pairs an input with the output it produced.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}
