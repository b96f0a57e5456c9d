use log::debug;

use snac_core::{MinimizationProblem, Model, Observer};

use super::{
    Action, Config, Criterion, Error, Event, Point, Solution, Stage, Status,
    evaluate::{Evaluation, evaluate},
    state::State,
};

/// Core projected BFGS implementation.
pub(super) fn search<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    let bounds = *problem.bounds();
    let start =
        evaluate(model, problem, bounds.project(x0)).map_err(|e| e.into_error())?;

    let mut runner = Runner {
        model,
        problem,
        config,
        observer,
        evals: 1,
    };
    let mut state = State::new(bounds, start);

    if !state.point().objective.is_finite() {
        return Ok(runner.finish(state, Status::NonFiniteStart, 0));
    }

    match runner.gradient(0, &state)? {
        Flow::Continue(gradient) => state.set_gradient(gradient),
        Flow::Halt(status) => return Ok(runner.finish(state, status, 0)),
    }

    for iter in 1..=config.max_iters() {
        if state.projected_gradient_norm() <= config.gtol() {
            let status = Status::Converged(Criterion::ProjectedGradient);
            return Ok(runner.finish(state, status, iter - 1));
        }

        let trial = match runner.advance(iter, &mut state)? {
            Flow::Continue(Some(trial)) => trial,
            Flow::Continue(None) => {
                return Ok(runner.finish(state, Status::LineSearchFailed, iter));
            }
            Flow::Halt(status) => return Ok(runner.finish(state, status, iter)),
        };

        let previous = state.point().objective;
        let previous_gradient = *state.gradient();
        let step = state.accept(trial);
        let objective = state.point().objective;

        let scale = previous.abs().max(objective.abs()).max(1.0);
        if (previous - objective) / scale <= config.ftol() {
            let status = Status::Converged(Criterion::RelativeReduction);
            return Ok(runner.finish(state, status, iter));
        }

        match runner.gradient(iter, &state)? {
            Flow::Continue(gradient) => {
                let mut change = gradient;
                for (i, value) in change.iter_mut().enumerate() {
                    *value -= previous_gradient[i];
                }
                state.set_gradient(gradient);
                state.update(&step, &change);
            }
            Flow::Halt(status) => return Ok(runner.finish(state, status, iter)),
        }
    }

    Ok(runner.finish(state, Status::MaxIters, config.max_iters()))
}

/// Whether the search should keep going or stop with a status.
pub(super) enum Flow<T> {
    Continue(T),
    Halt(Status),
}

/// Outcome of a single observed evaluation.
pub(super) enum Probe<I, O, const N: usize> {
    Value(Evaluation<I, O, N>),
    /// Line-search trial rejected by the observer.
    Rejected,
    Halt(Status),
}

/// Shared evaluation machinery for one search.
pub(super) struct Runner<'m, M, P, Obs> {
    model: &'m M,
    problem: &'m P,
    pub(super) config: &'m Config,
    observer: Obs,
    evals: usize,
}

impl<M, P, Obs> Runner<'_, M, P, Obs> {
    fn finish<I, O, const N: usize>(
        &self,
        state: State<I, O, N>,
        status: Status,
        iters: usize,
    ) -> Solution<I, O, N> {
        debug!(
            "projected BFGS stopped after {iters} iterations and {} evaluations: {status}",
            self.evals
        );
        state.into_solution(status, iters, self.evals)
    }
}

impl<M, P, Obs> Runner<'_, M, P, Obs>
where
    M: Model,
{
    /// Evaluates `x`, emits the event, and applies the observer's action.
    pub(super) fn probe<const N: usize>(
        &mut self,
        stage: Stage,
        iter: usize,
        x: [f64; N],
        current: Point<N>,
    ) -> Result<Probe<M::Input, M::Output, N>, Error>
    where
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        if self.evals >= self.config.max_evals() {
            return Ok(Probe::Halt(Status::MaxEvals));
        }
        self.evals += 1;

        match evaluate(self.model, self.problem, x) {
            Ok(eval) => {
                let event = Event::Evaluated {
                    stage,
                    iter,
                    point: eval.point,
                    input: &eval.snapshot.input,
                    output: &eval.snapshot.output,
                    current,
                };
                match self.observer.observe(&event) {
                    Some(Action::StopEarly) => Ok(Probe::Halt(Status::StoppedByObserver)),
                    Some(Action::AssumeWorse) if stage == Stage::LineSearch => {
                        Ok(Probe::Rejected)
                    }
                    _ => Ok(Probe::Value(eval)),
                }
            }
            Err(e) => {
                match Event::emit_failure(stage, iter, x, current, &e, &mut self.observer) {
                    Some(Action::StopEarly) => Ok(Probe::Halt(Status::StoppedByObserver)),
                    Some(Action::AssumeWorse) if stage == Stage::LineSearch => {
                        Ok(Probe::Rejected)
                    }
                    _ => Err(e.into_error()),
                }
            }
        }
    }
}
