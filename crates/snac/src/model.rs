use crate::{
    config::{ConfigError, ThermalHistoryConfig},
    engine::{CoolingParams, Simulation},
    fit::{FitError, FitResult, fit_simulation},
    history::HistoryTrace,
    sample::Sample,
};

/// Where a set of history parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// The result of the most recent fit.
    Fitted,

    /// The configured initial guesses.
    InitialGuess,
}

/// A sample, the thermal-history setup to fit it with, and the latest fit.
///
/// The sample and config never change after construction. Running a fit
/// replaces any earlier result as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationModel {
    config: ThermalHistoryConfig,
    simulation: Simulation,
    fit: Option<FitResult>,
}

impl AggregationModel {
    /// Creates an unfitted model.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(sample: Sample, config: ThermalHistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulation = Simulation::from_config(&sample, &config)?;
        Ok(Self {
            config,
            simulation,
            fit: None,
        })
    }

    /// Attaches a previously obtained fit, recomputing its error against
    /// this model's sample.
    #[must_use]
    pub fn with_fit(mut self, mut fit: FitResult) -> Self {
        fit.error = self.error_at(fit.params());
        self.fit = Some(fit);
        self
    }

    #[must_use]
    pub fn sample(&self) -> &Sample {
        self.simulation.sample()
    }

    #[must_use]
    pub fn config(&self) -> &ThermalHistoryConfig {
        &self.config
    }

    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    #[must_use]
    pub fn fit(&self) -> Option<&FitResult> {
        self.fit.as_ref()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    /// Fits the model, replacing any earlier result.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver fails. The previous result is kept
    /// in that case.
    pub fn run(&mut self) -> Result<&FitResult, FitError> {
        let result = fit_simulation(&self.simulation, &self.config)?;
        Ok(self.fit.insert(result))
    }

    /// The fitted parameters if a fit has been run, otherwise the initial
    /// guesses, along with which one was used.
    #[must_use]
    pub fn parameters(&self) -> (CoolingParams, ParameterSource) {
        match &self.fit {
            Some(fit) => (fit.params(), ParameterSource::Fitted),
            None => (self.config.initial_guess(), ParameterSource::InitialGuess),
        }
    }

    /// Parameters from a specific source, or `None` if no fit has been run
    /// and `source` is [`ParameterSource::Fitted`].
    #[must_use]
    pub fn parameters_for(&self, source: ParameterSource) -> Option<CoolingParams> {
        match source {
            ParameterSource::Fitted => self.fit.as_ref().map(FitResult::params),
            ParameterSource::InitialGuess => Some(self.config.initial_guess()),
        }
    }

    /// History at [`AggregationModel::parameters`]: fitted when available,
    /// otherwise from the initial guesses.
    #[must_use]
    pub fn history(&self) -> HistoryTrace {
        self.simulation.trace(self.parameters().0)
    }

    /// History at the parameters from `source`, see
    /// [`AggregationModel::parameters_for`].
    #[must_use]
    pub fn history_for(&self, source: ParameterSource) -> Option<HistoryTrace> {
        self.parameters_for(source)
            .map(|params| self.simulation.trace(params))
    }

    /// Objective at the initial guesses.
    #[must_use]
    pub fn initial_error(&self) -> f64 {
        self.error_at(self.config.initial_guess())
    }

    #[must_use]
    pub fn error_at(&self, params: CoolingParams) -> f64 {
        self.simulation.error(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> AggregationModel {
        let config = ThermalHistoryConfig::default().with_dt(25.0);
        AggregationModel::new(Sample::default(), config).unwrap()
    }

    #[test]
    fn unfitted_model_uses_initial_guess() {
        let model = model();

        assert!(!model.is_fitted());
        assert_eq!(
            model.parameters(),
            (CoolingParams::new(1200.0, 0.01), ParameterSource::InitialGuess)
        );
        assert_eq!(model.parameters_for(ParameterSource::Fitted), None);
        assert_eq!(model.history_for(ParameterSource::Fitted), None);
        assert_eq!(
            Some(model.history()),
            model.history_for(ParameterSource::InitialGuess)
        );
    }

    #[test]
    fn run_switches_history_to_fitted_parameters() {
        let mut model = model();
        let fitted = model.run().unwrap().clone();

        assert!(model.is_fitted());
        assert_eq!(model.parameters(), (fitted.params(), ParameterSource::Fitted));
        assert_eq!(model.history().params(), fitted.params());
        assert_eq!(
            model.history_for(ParameterSource::InitialGuess).unwrap().params(),
            model.config().initial_guess()
        );
        assert!(fitted.error <= model.initial_error());
    }

    #[test]
    fn rerunning_replaces_the_result() {
        let mut model = model();
        let first = model.run().unwrap().clone();
        let second = model.run().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(model.fit(), Some(&second));
    }

    #[test]
    fn attached_fit_gets_a_fresh_error() {
        let model = model();
        let fit = FitResult {
            start_temperature: 1180.0,
            cooling_rate: 0.02,
            success: true,
            status: 0,
            message: String::new(),
            error: -1.0,
            iterations: 0,
            evaluations: 0,
        };
        let model = model.with_fit(fit);
        let attached = model.fit().unwrap();
        assert_eq!(attached.error, model.error_at(CoolingParams::new(1180.0, 0.02)));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ThermalHistoryConfig::default().with_dt(-1.0);
        assert!(AggregationModel::new(Sample::default(), config).is_err());
    }
}
