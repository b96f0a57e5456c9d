use snac_core::{MinimizationProblem, Model, Observer};

use super::{Action, Point, evaluate::EvalError};

/// Why the solver evaluated a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A finite-difference probe around the current iterate.
    Gradient,

    /// A trial step along the search direction.
    LineSearch,
}

/// Events emitted by the projected BFGS solver.
///
/// Each event carries the iteration it belongs to and `current`, the
/// accepted iterate the solver would return if it stopped now.
pub enum Event<'a, M, P, const N: usize>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    /// Successful evaluation.
    Evaluated {
        stage: Stage,
        iter: usize,

        /// The evaluated point (x and objective).
        point: Point<N>,

        /// The model input at this point.
        input: &'a M::Input,

        /// The model output at this point.
        output: &'a M::Output,

        current: Point<N>,
    },

    /// Model evaluation failed.
    ModelFailed {
        stage: Stage,
        iter: usize,
        x: [f64; N],
        current: Point<N>,
        error: &'a M::Error,
    },

    /// Problem method failed (input construction or objective computation).
    ProblemFailed {
        stage: Stage,
        iter: usize,
        x: [f64; N],
        current: Point<N>,
        error: &'a P::Error,
    },
}

impl<M, P, const N: usize> Event<'_, M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    /// Returns the x value that was evaluated (or attempted).
    #[must_use]
    pub fn x(&self) -> [f64; N] {
        match self {
            Self::Evaluated { point, .. } => point.x,
            Self::ModelFailed { x, .. } | Self::ProblemFailed { x, .. } => *x,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Evaluated { stage, .. }
            | Self::ModelFailed { stage, .. }
            | Self::ProblemFailed { stage, .. } => *stage,
        }
    }

    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::Evaluated { iter, .. }
            | Self::ModelFailed { iter, .. }
            | Self::ProblemFailed { iter, .. } => *iter,
        }
    }

    /// Returns the accepted iterate at the time of the event.
    #[must_use]
    pub fn current(&self) -> Point<N> {
        match self {
            Self::Evaluated { current, .. }
            | Self::ModelFailed { current, .. }
            | Self::ProblemFailed { current, .. } => *current,
        }
    }

    /// Returns the objective, or `None` if the evaluation failed.
    #[must_use]
    pub fn objective(&self) -> Option<f64> {
        match self {
            Self::Evaluated { point, .. } => Some(point.objective),
            Self::ModelFailed { .. } | Self::ProblemFailed { .. } => None,
        }
    }

    /// Emits a failure event and returns the observer's action.
    pub(super) fn emit_failure<Obs>(
        stage: Stage,
        iter: usize,
        x: [f64; N],
        current: Point<N>,
        error: &EvalError<M::Error, P::Error>,
        observer: &mut Obs,
    ) -> Option<Action>
    where
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        match error {
            EvalError::Model(e) => {
                let event = Event::ModelFailed {
                    stage,
                    iter,
                    x,
                    current,
                    error: e,
                };
                observer.observe(&event)
            }
            EvalError::Problem(e) => {
                let event = Event::ProblemFailed {
                    stage,
                    iter,
                    x,
                    current,
                    error: e,
                };
                observer.observe(&event)
            }
        }
    }
}
