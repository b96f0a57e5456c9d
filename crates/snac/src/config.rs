use serde::{Deserialize, Serialize};
use thiserror::Error;

use snac_core::{Bounds, BoundsError};
use snac_solvers::optimization::projected_bfgs;

use crate::{
    checkpoints::{Checkpoints, CheckpointsError},
    cooling::CoolingLaw,
    engine::CoolingParams,
    sample::Sample,
    scenario::Scenario,
};

/// Free and fixed parameters of a simulated thermal history.
///
/// Temperatures are in °C, rates in °C/Myr and the time step in Myr. The
/// fitted variables are the start temperature and the cooling rate; the
/// remaining fields are held fixed during a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalHistoryConfig {
    /// Initial guess for the cooling rate.
    pub cooling_rate0: f64,

    /// Initial guess for the start temperature.
    #[serde(rename = "T_start0")]
    pub start_temperature0: f64,

    /// Lower and upper limits on the cooling rate.
    pub rate_bounds: (f64, f64),

    /// Lower and upper limits on the start temperature.
    #[serde(rename = "T_bounds")]
    pub temperature_bounds: (f64, f64),

    /// Checkpoint spacing.
    pub dt: f64,

    #[serde(flatten)]
    pub scenario: Scenario,

    #[serde(default)]
    pub cooling_law: CoolingLaw,

    /// Convergence tolerance of the fit.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-7
}

/// Errors that can occur when validating a [`ThermalHistoryConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    InitialGuess { name: &'static str, value: f64 },

    #[error("invalid {name}")]
    Bounds {
        name: &'static str,
        #[source]
        source: BoundsError,
    },

    #[error("invalid time step")]
    Checkpoints(#[from] CheckpointsError),

    #[error("invalid solver tolerance {0}")]
    Tolerance(f64),
}

impl Default for ThermalHistoryConfig {
    fn default() -> Self {
        Self {
            cooling_rate0: 0.01,
            start_temperature0: 1200.0,
            rate_bounds: (0.001, 0.12),
            temperature_bounds: (1000.0, 1450.0),
            dt: 1.0,
            scenario: Scenario::Continuous,
            cooling_law: CoolingLaw::Linear,
            tolerance: default_tolerance(),
        }
    }
}

impl ThermalHistoryConfig {
    #[must_use]
    pub fn with_initial_guess(self, start_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            start_temperature0: start_temperature,
            cooling_rate0: cooling_rate,
            ..self
        }
    }

    #[must_use]
    pub fn with_temperature_bounds(self, lower: f64, upper: f64) -> Self {
        Self {
            temperature_bounds: (lower, upper),
            ..self
        }
    }

    #[must_use]
    pub fn with_rate_bounds(self, lower: f64, upper: f64) -> Self {
        Self {
            rate_bounds: (lower, upper),
            ..self
        }
    }

    #[must_use]
    pub fn with_dt(self, dt: f64) -> Self {
        Self { dt, ..self }
    }

    #[must_use]
    pub fn with_scenario(self, scenario: Scenario) -> Self {
        Self { scenario, ..self }
    }

    #[must_use]
    pub fn with_cooling_law(self, cooling_law: CoolingLaw) -> Self {
        Self {
            cooling_law,
            ..self
        }
    }

    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Checks everything that can be checked without a sample.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite initial guesses, invalid bounds, a
    /// non-positive time step, or an invalid tolerance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("T_start0", self.start_temperature0),
            ("cooling_rate0", self.cooling_rate0),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InitialGuess { name, value });
            }
        }
        self.bounds()?;
        Checkpoints::new(0.0, self.dt)?;
        self.solver_config()?;
        Ok(())
    }

    /// The configured starting point of a fit.
    #[must_use]
    pub fn initial_guess(&self) -> CoolingParams {
        CoolingParams::new(self.start_temperature0, self.cooling_rate0)
    }

    /// Box bounds over `[start temperature, cooling rate]`.
    ///
    /// # Errors
    ///
    /// Returns an error if either pair is NaN or inverted.
    pub fn bounds(&self) -> Result<Bounds<2>, ConfigError> {
        let check = |name, pair| {
            Bounds::new([pair])
                .map(|_| ())
                .map_err(|source| ConfigError::Bounds { name, source })
        };
        check("T_bounds", self.temperature_bounds)?;
        check("rate_bounds", self.rate_bounds)?;

        Bounds::new([self.temperature_bounds, self.rate_bounds]).map_err(|source| {
            ConfigError::Bounds {
                name: "bounds",
                source,
            }
        })
    }

    /// Checkpoints covering `sample` from core growth to eruption.
    ///
    /// # Errors
    ///
    /// Returns an error if the time step is not finite and positive, or is
    /// too fine for the sample's span.
    pub fn checkpoints(&self, sample: &Sample) -> Result<Checkpoints, ConfigError> {
        Ok(Checkpoints::new(sample.span(), self.dt)?)
    }

    /// Solver settings for a fit.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or not finite.
    pub fn solver_config(&self) -> Result<projected_bfgs::Config, ConfigError> {
        projected_bfgs::Config::default()
            .with_tolerance(self.tolerance)
            .map_err(|_| ConfigError::Tolerance(self.tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::RapidAscent;

    #[test]
    fn defaults_match_reference_setup() {
        let config = ThermalHistoryConfig::default();

        assert_eq!(config.initial_guess(), CoolingParams::new(1200.0, 0.01));
        assert_eq!(config.temperature_bounds, (1000.0, 1450.0));
        assert_eq!(config.rate_bounds, (0.001, 0.12));
        assert_eq!(config.dt, 1.0);
        assert_eq!(config.scenario, Scenario::Continuous);
        assert_eq!(config.cooling_law, CoolingLaw::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bounds_order_temperature_then_rate() {
        let bounds = ThermalHistoryConfig::default().bounds().unwrap();
        assert_eq!(bounds.lower(), &[1000.0, 0.001]);
        assert_eq!(bounds.upper(), &[1450.0, 0.12]);
    }

    #[test]
    fn validate_names_the_bad_field() {
        let config = ThermalHistoryConfig::default().with_rate_bounds(0.2, 0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Bounds {
                name: "rate_bounds",
                ..
            })
        ));

        let config = ThermalHistoryConfig::default().with_temperature_bounds(f64::NAN, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Bounds {
                name: "T_bounds",
                ..
            })
        ));

        let config = ThermalHistoryConfig::default().with_initial_guess(f64::INFINITY, 0.01);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialGuess {
                name: "T_start0",
                ..
            })
        ));

        let config = ThermalHistoryConfig::default().with_dt(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Checkpoints(CheckpointsError::Step(_)))
        ));

        let config = ThermalHistoryConfig::default().with_dt(1e-300);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Checkpoints(CheckpointsError::TooMany(_)))
        ));

        let config = ThermalHistoryConfig::default().with_tolerance(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::Tolerance(-1.0)));
    }

    #[test]
    fn checkpoints_span_the_sample() {
        let config = ThermalHistoryConfig::default().with_dt(10.0);
        let checkpoints = config.checkpoints(&Sample::default()).unwrap();
        assert_eq!(checkpoints.len(), 353);
        assert_eq!(checkpoints.times()[352], 3520.0);
    }

    #[test]
    fn reads_model_file_keys() {
        let json = r#"{
            "cooling_rate0": 0.02,
            "T_start0": 1250,
            "rate_bounds": [0.001, 0.12],
            "T_bounds": [1000, 1450],
            "dt": 1,
            "T_scenario": "rapid_ascent",
            "scenario_params": [50, 2000]
        }"#;
        let config: ThermalHistoryConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.initial_guess(), CoolingParams::new(1250.0, 0.02));
        assert_eq!(
            config.scenario,
            Scenario::RapidAscent(RapidAscent {
                drop: 50.0,
                time: 2000.0
            })
        );
        assert_eq!(config.cooling_law, CoolingLaw::Linear);
        assert_eq!(config.tolerance, 1e-7);
    }

    #[test]
    fn writes_model_file_keys() {
        let json = serde_json::to_value(ThermalHistoryConfig::default()).unwrap();
        assert_eq!(json["T_start0"], 1200.0);
        assert_eq!(json["T_bounds"], serde_json::json!([1000.0, 1450.0]));
        assert_eq!(json["T_scenario"], "continuous");
        assert!(json["scenario_params"].is_null());
        assert_eq!(json["cooling_law"], "linear");
    }
}
