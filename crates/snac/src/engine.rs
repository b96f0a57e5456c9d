//! Forward simulation of temperature and nitrogen aggregation.
//!
//! A [`Simulation`] steps through its checkpoints once per call. At each
//! checkpoint it evaluates the scenario temperature, then advances the
//! A-centre concentration of each zone over the interval ending there:
//!
//! - the core aggregates at every checkpoint
//! - the rim aggregates only once it has grown, where
//!   `core age - elapsed < rim age`
//!
//! Both zones start with all nitrogen in A-centres. The same stepping
//! routine backs [`Simulation::error`], used as the fit objective, and
//! [`Simulation::trace`], which keeps every checkpoint.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use snac_core::Model;

use crate::{
    checkpoints::Checkpoints,
    config::{ConfigError, ThermalHistoryConfig},
    cooling::CoolingLaw,
    history::{HistoryRow, HistoryTrace},
    kinetics,
    sample::Sample,
    scenario::Scenario,
};

/// The two fitted quantities of a thermal history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolingParams {
    /// Temperature at core growth (°C).
    pub start_temperature: f64,

    /// Cooling rate (°C/Myr).
    pub cooling_rate: f64,
}

impl CoolingParams {
    #[must_use]
    pub fn new(start_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            start_temperature,
            cooling_rate,
        }
    }

    /// Cooling rate in K/Gyr.
    #[must_use]
    pub fn rate_k_per_gyr(&self) -> f64 {
        self.cooling_rate * 1000.0
    }
}

impl From<[f64; 2]> for CoolingParams {
    fn from([start_temperature, cooling_rate]: [f64; 2]) -> Self {
        Self::new(start_temperature, cooling_rate)
    }
}

impl From<CoolingParams> for [f64; 2] {
    fn from(params: CoolingParams) -> Self {
        [params.start_temperature, params.cooling_rate]
    }
}

/// Final modeled state of both zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeledAggregation {
    /// Core A-centre concentration at eruption (ppm).
    pub core_a: f64,

    /// Rim A-centre concentration at eruption (ppm).
    pub rim_a: f64,

    /// Modeled core B-centre fraction.
    pub core_b_fraction: f64,

    /// Modeled rim B-centre fraction.
    pub rim_b_fraction: f64,
}

/// Misfit between observed and modeled aggregation, scaled by 1000.
///
/// Zero only when both zones match exactly.
#[must_use]
pub fn objective_error(sample: &Sample, modeled: &ModeledAggregation) -> f64 {
    ((sample.rim().b_fraction() - modeled.rim_b_fraction).powi(2)
        + (sample.core().b_fraction() - modeled.core_b_fraction).powi(2))
        * 1e3
}

/// A sample under a fixed scenario, cooling law and checkpoint grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    sample: Sample,
    law: CoolingLaw,
    scenario: Scenario,
    checkpoints: Checkpoints,
}

/// State after one checkpoint.
struct Step {
    elapsed: f64,
    temperature: f64,
    core_a: f64,
    rim_a: f64,
}

impl Simulation {
    #[must_use]
    pub fn new(sample: Sample, law: CoolingLaw, scenario: Scenario, checkpoints: Checkpoints) -> Self {
        Self {
            sample,
            law,
            scenario,
            checkpoints,
        }
    }

    /// Builds the simulation a config describes for `sample`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config's time step is invalid.
    pub fn from_config(sample: &Sample, config: &ThermalHistoryConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            *sample,
            config.cooling_law,
            config.scenario,
            config.checkpoints(sample)?,
        ))
    }

    #[must_use]
    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub fn cooling_law(&self) -> CoolingLaw {
        self.law
    }

    #[must_use]
    pub fn checkpoints(&self) -> &Checkpoints {
        &self.checkpoints
    }

    /// Scenario temperature (°C) at elapsed time `t`.
    #[must_use]
    pub fn temperature(&self, params: CoolingParams, t: f64) -> f64 {
        self.scenario
            .temperature(self.law, params.start_temperature, params.cooling_rate, t)
    }

    /// Runs every checkpoint, handing each step to `visit`, and returns the
    /// final A-centre concentrations of the core and rim.
    fn run(&self, params: CoolingParams, mut visit: impl FnMut(Step)) -> (f64, f64) {
        let core_age = self.sample.core().age();
        let rim_age = self.sample.rim().age();
        let mut core_a = self.sample.core().nitrogen_ppm();
        let mut rim_a = self.sample.rim().nitrogen_ppm();

        for (elapsed, dt) in self.checkpoints.steps() {
            let temperature = self.temperature(params, elapsed);

            core_a = kinetics::aggregate(core_a, temperature, dt);
            if core_age - elapsed < rim_age {
                rim_a = kinetics::aggregate(rim_a, temperature, dt);
            }

            visit(Step {
                elapsed,
                temperature,
                core_a,
                rim_a,
            });
        }

        (core_a, rim_a)
    }

    /// Final modeled state of both zones.
    #[must_use]
    pub fn modeled(&self, params: CoolingParams) -> ModeledAggregation {
        let (core_a, rim_a) = self.run(params, |_| {});
        ModeledAggregation {
            core_a,
            rim_a,
            core_b_fraction: kinetics::b_fraction(core_a, self.sample.core().nitrogen_ppm()),
            rim_b_fraction: kinetics::b_fraction(rim_a, self.sample.rim().nitrogen_ppm()),
        }
    }

    /// Objective value at `params`, see [`objective_error`].
    #[must_use]
    pub fn error(&self, params: CoolingParams) -> f64 {
        objective_error(&self.sample, &self.modeled(params))
    }

    /// Full per-checkpoint history at `params`.
    #[must_use]
    pub fn trace(&self, params: CoolingParams) -> HistoryTrace {
        let core_n = self.sample.core().nitrogen_ppm();
        let rim_n = self.sample.rim().nitrogen_ppm();

        let mut rows = Vec::with_capacity(self.checkpoints.len());
        self.run(params, |step| {
            rows.push(HistoryRow {
                elapsed: step.elapsed,
                temperature: step.temperature,
                core_a: step.core_a,
                rim_a: step.rim_a,
                core_b: core_n - step.core_a,
                rim_b: rim_n - step.rim_a,
            });
        });

        HistoryTrace::new(params, rows)
    }
}

impl Model for Simulation {
    type Input = CoolingParams;
    type Output = ModeledAggregation;
    type Error = Infallible;

    fn call(&self, input: &CoolingParams) -> Result<ModeledAggregation, Self::Error> {
        Ok(self.modeled(*input))
    }
}
