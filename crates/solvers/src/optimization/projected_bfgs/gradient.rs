use snac_core::{Bounds, MinimizationProblem, Model, Observer};

use super::{
    Action, Error, Event, Point, Stage, Status,
    search::{Flow, Probe, Runner},
    state::State,
};

impl<M, P, Obs> Runner<'_, M, P, Obs>
where
    M: Model,
{
    /// Forward-difference gradient at the current iterate.
    ///
    /// Components whose interval has zero width are reported as zero. A
    /// non-finite difference is retried from the opposite side; if that is
    /// non-finite too, the search halts with [`Status::NonFiniteGradient`].
    pub(super) fn gradient<const N: usize>(
        &mut self,
        iter: usize,
        state: &State<M::Input, M::Output, N>,
    ) -> Result<Flow<[f64; N]>, Error>
    where
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        let current = state.point();
        let mut gradient = [0.0; N];

        for (i, component) in gradient.iter_mut().enumerate() {
            let step = probe_step(state.bounds(), &current.x, i, self.config.fd_step());
            if step == 0.0 {
                continue;
            }

            let mut value = match self.difference(iter, current, i, step)? {
                Flow::Continue(value) => value,
                Flow::Halt(status) => return Ok(Flow::Halt(status)),
            };

            if !value.is_finite() {
                let bounds = state.bounds();
                let opposite = (current.x[i] - step).clamp(bounds.lower()[i], bounds.upper()[i]);
                let back = opposite - current.x[i];
                if back != 0.0 {
                    value = match self.difference(iter, current, i, back)? {
                        Flow::Continue(value) => value,
                        Flow::Halt(status) => return Ok(Flow::Halt(status)),
                    };
                }
            }

            if !value.is_finite() {
                return Ok(Flow::Halt(Status::NonFiniteGradient));
            }
            *component = value;
        }

        Ok(Flow::Continue(gradient))
    }

    /// One-sided difference quotient for variable `i` with signed `step`.
    fn difference<const N: usize>(
        &mut self,
        iter: usize,
        current: Point<N>,
        i: usize,
        step: f64,
    ) -> Result<Flow<f64>, Error>
    where
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        let mut x = current.x;
        x[i] += step;
        let h = x[i] - current.x[i];

        match self.probe(Stage::Gradient, iter, x, current)? {
            Probe::Value(eval) => Ok(Flow::Continue((eval.point.objective - current.objective) / h)),
            // Gradient probes are never rejected.
            Probe::Rejected => Ok(Flow::Continue(0.0)),
            Probe::Halt(status) => Ok(Flow::Halt(status)),
        }
    }
}

/// Signed step for probing variable `i`, kept inside the bounds.
fn probe_step<const N: usize>(bounds: &Bounds<N>, x: &[f64; N], i: usize, fd_step: f64) -> f64 {
    let h = fd_step * x[i].abs().max(1.0);
    let lower = bounds.lower()[i];
    let upper = bounds.upper()[i];

    if x[i] + h <= upper {
        h
    } else if x[i] - h >= lower {
        -h
    } else if upper - x[i] >= x[i] - lower {
        upper - x[i]
    } else {
        lower - x[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_backward_at_upper_bound() {
        let bounds = Bounds::new([(0.0, 1.0), (1000.0, 1450.0)]).unwrap();

        assert_eq!(probe_step(&bounds, &[0.5, 1450.0], 0, 1e-8), 1e-8);
        assert_eq!(probe_step(&bounds, &[0.5, 1450.0], 1, 1e-8), -1450.0 * 1e-8);
    }

    #[test]
    fn degenerate_interval_has_no_step() {
        let bounds = Bounds::new([(2.0, 2.0)]).unwrap();
        assert_eq!(probe_step(&bounds, &[2.0], 0, 1e-8), 0.0);
    }
}
