use std::convert::Infallible;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use snac_core::{Bounds, MinimizationProblem};
use snac_solvers::optimization::projected_bfgs::{self, Action, Event};

use crate::{
    config::{ConfigError, ThermalHistoryConfig},
    engine::{CoolingParams, ModeledAggregation, Simulation, objective_error},
    sample::Sample,
};

/// Fits `[start temperature, cooling rate]` to a sample's observed
/// aggregation, with every other history parameter held fixed.
#[derive(Debug, Clone, Copy)]
pub struct FitProblem<'a> {
    sample: &'a Sample,
    bounds: Bounds<2>,
}

impl<'a> FitProblem<'a> {
    #[must_use]
    pub fn new(sample: &'a Sample, bounds: Bounds<2>) -> Self {
        Self { sample, bounds }
    }
}

impl MinimizationProblem<2> for FitProblem<'_> {
    type Input = CoolingParams;
    type Output = ModeledAggregation;
    type Error = Infallible;

    fn bounds(&self) -> &Bounds<2> {
        &self.bounds
    }

    fn input(&self, x: &[f64; 2]) -> Result<Self::Input, Self::Error> {
        Ok(CoolingParams::from(*x))
    }

    fn objective(
        &self,
        _input: &CoolingParams,
        output: &ModeledAggregation,
    ) -> Result<f64, Self::Error> {
        Ok(objective_error(self.sample, output))
    }
}

/// Outcome of fitting a thermal history.
///
/// A fit that did not converge is still a result: check `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Best-fit start temperature (°C).
    #[serde(rename = "initial_T")]
    pub start_temperature: f64,

    /// Best-fit cooling rate (°C/Myr).
    pub cooling_rate: f64,

    #[serde(default)]
    pub success: bool,

    /// 0 converged, 1 limit reached, 2 abnormal, 3 stopped.
    #[serde(default)]
    pub status: i32,

    #[serde(default)]
    pub message: String,

    /// Objective at the fitted parameters. Recomputed on load.
    #[serde(skip_deserializing)]
    pub error: f64,

    #[serde(default)]
    pub iterations: usize,

    #[serde(default)]
    pub evaluations: usize,
}

impl FitResult {
    #[must_use]
    pub fn params(&self) -> CoolingParams {
        CoolingParams::new(self.start_temperature, self.cooling_rate)
    }
}

/// Errors that can occur while fitting.
#[derive(Debug, Error)]
pub enum FitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("solver failed")]
    Solver(#[from] projected_bfgs::Error),
}

/// Fits the start temperature and cooling rate of `config`'s scenario to
/// `sample`.
///
/// Initial guesses outside the bounds are moved onto them. The search is
/// deterministic: identical inputs give identical results.
///
/// # Errors
///
/// Returns an error if the config is invalid or the solver fails. Not
/// converging is reported through [`FitResult::success`] instead.
pub fn fit(sample: &Sample, config: &ThermalHistoryConfig) -> Result<FitResult, FitError> {
    config.validate()?;
    let simulation = Simulation::from_config(sample, config)?;
    fit_simulation(&simulation, config)
}

/// Fits an already built simulation using `config`'s guesses, bounds and
/// tolerance.
pub(crate) fn fit_simulation(
    simulation: &Simulation,
    config: &ThermalHistoryConfig,
) -> Result<FitResult, FitError> {
    let bounds = config.bounds()?;
    let solver_config = config.solver_config()?;
    let problem = FitProblem::new(simulation.sample(), bounds);

    let guess: [f64; 2] = config.initial_guess().into();
    let x0 = bounds.project(guess);
    if x0 != guess {
        warn!(
            "initial guess T = {} °C, rate = {} °C/Myr lies outside the bounds, starting from T = {} °C, rate = {} °C/Myr",
            guess[0], guess[1], x0[0], x0[1]
        );
    }

    debug!(
        "fitting {} scenario ({} cooling) over {} checkpoints",
        simulation.scenario().name(),
        simulation.cooling_law(),
        simulation.checkpoints().len()
    );

    let observer = |event: &Event<'_, _, _, 2>| -> Option<Action> {
        if let Event::Evaluated { stage, iter, point, .. } = event {
            trace!(
                "iter {iter} {stage:?}: T = {:.4}, rate = {:.6}, error = {:.6e}",
                point.x[0], point.x[1], point.objective
            );
        }
        None
    };

    let solution = projected_bfgs::minimize(simulation, &problem, x0, &solver_config, observer)?;

    let result = FitResult {
        start_temperature: solution.x[0],
        cooling_rate: solution.x[1],
        success: solution.is_success(),
        status: solution.status.code(),
        message: solution.message().to_string(),
        error: solution.objective,
        iterations: solution.iters,
        evaluations: solution.evals,
    };

    if result.success {
        debug!(
            "fit converged: T = {:.2} °C, rate = {:.2} K/Gyr, error = {:.3e}",
            result.start_temperature,
            result.params().rate_k_per_gyr(),
            result.error
        );
    } else {
        warn!("fit did not converge: {}", result.message);
    }

    Ok(result)
}
