use std::error::Error as StdError;

use snac_core::{MinimizationProblem, Model, Snapshot};

use super::{Error, Point};

/// A successful evaluation and the model call behind it.
pub(super) struct Evaluation<I, O, const N: usize> {
    pub(super) point: Point<N>,
    pub(super) snapshot: Snapshot<I, O>,
}

/// The side of an evaluation that failed.
///
/// Kept unboxed so observers see the concrete error types.
pub(super) enum EvalError<ME, PE> {
    Model(ME),
    /// Mapping `x` to an input, or the objective, failed.
    Problem(PE),
}

impl<ME, PE> EvalError<ME, PE>
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    pub(super) fn into_error(self) -> Error {
        match self {
            Self::Model(e) => Error::Model(Box::new(e)),
            Self::Problem(e) => Error::Problem(Box::new(e)),
        }
    }
}

pub(super) type EvalResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as MinimizationProblem<N>>::Error>,
>;

/// Evaluates the objective at `x` exactly as given, without projecting.
pub(super) fn evaluate<M, P, const N: usize>(model: &M, problem: &P, x: [f64; N]) -> EvalResult<M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let objective = problem
        .objective(&input, &output)
        .map_err(EvalError::Problem)?;

    Ok(Evaluation {
        point: Point::new(x, objective),
        snapshot: Snapshot::new(input, output),
    })
}
