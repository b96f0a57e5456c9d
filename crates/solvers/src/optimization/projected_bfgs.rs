//! Projected quasi-Newton (BFGS) search for box-bounded minimization.
//!
//! # Algorithm
//!
//! Starting from `x0` projected into the problem's bounds, each iteration:
//!
//! 1. Stops if the projected gradient `P(x - g) - x` is within `gtol`.
//! 2. Builds the direction `d = -H g` over the free variables. A variable
//!    sitting on a bound whose gradient points out of the box is held fixed.
//! 3. Backtracks along the projected path `P(x + a d)` until the Armijo
//!    condition holds.
//! 4. Stops if the relative reduction of the objective is within `ftol`.
//! 5. Updates the inverse Hessian approximation `H` with the BFGS formula.
//!
//! Gradients come from forward finite differences (backward at an upper
//! bound), so the model only needs to provide objective values.
//! The search is fully deterministic.
//!
//! # Observer Events
//!
//! The starting point is evaluated before the observer is involved. Every
//! later evaluation emits one [`Event`] tagged with its [`Stage`]:
//!
//! - [`Event::Evaluated`]: evaluation succeeded
//! - [`Event::ModelFailed`]: model returned an error
//! - [`Event::ProblemFailed`]: problem returned an error (input or objective)
//!
//! Observers can return [`Action::StopEarly`] to halt with the current iterate.
//! [`Action::AssumeWorse`] rejects a line-search trial as if its objective
//! were infinite, which also recovers from a failed trial evaluation. It has
//! no effect on gradient probes, where failures are always returned as errors.

mod action;
mod config;
mod error;
mod evaluate;
mod event;
mod gradient;
mod line_search;
mod point;
mod search;
mod solution;
mod state;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::{Event, Stage};
pub use point::Point;
pub use solution::{Criterion, Solution, Status};

use snac_core::{MinimizationProblem, Model, Observer};

use search::search;

/// Finds a local minimum of the objective inside the problem's bounds.
///
/// The observer receives an [`Event`] for each evaluation after the start.
/// See the [module docs](self) for details on event timing and observer actions.
///
/// Non-convergence is not an error: inspect [`Solution::status`].
///
/// # Errors
///
/// Returns an error if the model or problem fails at the starting point or
/// during a gradient probe, or fails during a line-search trial that the
/// observer does not recover with [`Action::AssumeWorse`].
pub fn minimize<M, P, Obs, const N: usize>(
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
    search(model, problem, x0, config, observer)
}

/// Finds a local minimum of the objective without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the model or problem fails during evaluation.
pub fn minimize_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    minimize(model, problem, x0, config, ())
}
