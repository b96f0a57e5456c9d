use snac_core::{MinimizationProblem, Model, Observer};

use super::{
    Action, Error, Event, Stage,
    evaluate::Evaluation,
    search::{Flow, Probe, Runner},
    state::{State, dot},
};

/// Sufficient-decrease constant for the Armijo condition.
const ARMIJO: f64 = 1e-4;

type Trial<M, const N: usize> = Evaluation<<M as Model>::Input, <M as Model>::Output, N>;

impl<M, P, Obs> Runner<'_, M, P, Obs>
where
    M: Model,
{
    /// Searches along the quasi-Newton direction, retrying once along
    /// steepest descent if curvature information led nowhere.
    ///
    /// `Continue(None)` means no acceptable trial point was found.
    pub(super) fn advance<const N: usize>(
        &mut self,
        iter: usize,
        state: &mut State<M::Input, M::Output, N>,
    ) -> Result<Flow<Option<Trial<M, N>>>, Error>
    where
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        let direction = state.direction();
        match self.line_search(iter, state, &direction)? {
            Flow::Continue(None) if !state.is_fresh() => {
                state.reset();
                let direction = state.direction();
                self.line_search(iter, state, &direction)
            }
            flow => Ok(flow),
        }
    }

    /// Backtracks along the projected path `P(x + a d)`.
    fn line_search<const N: usize>(
        &mut self,
        iter: usize,
        state: &State<M::Input, M::Output, N>,
        direction: &[f64; N],
    ) -> Result<Flow<Option<Trial<M, N>>>, Error>
    where
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        let current = state.point();
        let mut alpha = if state.is_fresh() {
            initial_step(direction)
        } else {
            1.0
        };

        for _ in 0..=self.config.max_backtracks() {
            let mut trial = current.x;
            for (i, value) in trial.iter_mut().enumerate() {
                *value += alpha * direction[i];
            }
            let trial = state.bounds().project(trial);
            if trial == current.x {
                break;
            }

            match self.probe(Stage::LineSearch, iter, trial, current)? {
                Probe::Value(eval) => {
                    let mut step = trial;
                    for (i, value) in step.iter_mut().enumerate() {
                        *value -= current.x[i];
                    }
                    let threshold = current.objective + ARMIJO * dot(state.gradient(), &step);
                    if eval.point.objective < current.objective && eval.point.objective <= threshold {
                        return Ok(Flow::Continue(Some(eval)));
                    }
                }
                Probe::Rejected => {}
                Probe::Halt(status) => return Ok(Flow::Halt(status)),
            }

            alpha *= 0.5;
        }

        Ok(Flow::Continue(None))
    }
}

/// First trial step without curvature information: at most unit length
/// in the infinity norm.
fn initial_step<const N: usize>(direction: &[f64; N]) -> f64 {
    let norm = direction.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if norm > 1.0 { 1.0 / norm } else { 1.0 }
}
