use thiserror::Error;

/// Configuration for the projected BFGS solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    max_evals: usize,
    ftol: f64,
    gtol: f64,
    fd_step: f64,
    max_backtracks: usize,
}

/// Errors that can occur when validating a projected BFGS solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ftol must be finite and non-negative")]
    Ftol,

    #[error("gtol must be finite and non-negative")]
    Gtol,

    #[error("fd_step must be finite and positive")]
    FdStep,

    #[error("max_evals must be at least 1")]
    MaxEvals,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(15_000, 1e-7, 1e-7).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// The evaluation budget defaults to `max_iters` (at least one), the
    /// finite-difference step to `1e-8`, and the line search to 60 halvings.
    ///
    /// # Errors
    ///
    /// Returns an error if either tolerance is negative or non-finite.
    pub fn new(max_iters: usize, ftol: f64, gtol: f64) -> Result<Self, ConfigError> {
        if !ftol.is_finite() || ftol < 0.0 {
            return Err(ConfigError::Ftol);
        }
        if !gtol.is_finite() || gtol < 0.0 {
            return Err(ConfigError::Gtol);
        }

        Ok(Self {
            max_iters,
            max_evals: max_iters.max(1),
            ftol,
            gtol,
            fd_step: 1e-8,
            max_backtracks: 60,
        })
    }

    /// Returns `self` with both `ftol` and `gtol` set to `tol`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is negative or non-finite.
    pub fn with_tolerance(self, tol: f64) -> Result<Self, ConfigError> {
        let tolerances = Self::new(self.max_iters, tol, tol)?;
        Ok(Self {
            ftol: tolerances.ftol,
            gtol: tolerances.gtol,
            ..self
        })
    }

    /// Returns `self` with the given evaluation budget.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_evals` is zero.
    pub fn with_max_evals(self, max_evals: usize) -> Result<Self, ConfigError> {
        if max_evals == 0 {
            return Err(ConfigError::MaxEvals);
        }
        Ok(Self { max_evals, ..self })
    }

    /// Returns `self` with the given relative finite-difference step.
    ///
    /// # Errors
    ///
    /// Returns an error if `fd_step` is not finite and positive.
    pub fn with_fd_step(self, fd_step: f64) -> Result<Self, ConfigError> {
        if !fd_step.is_finite() || fd_step <= 0.0 {
            return Err(ConfigError::FdStep);
        }
        Ok(Self { fd_step, ..self })
    }

    /// Returns `self` with the given maximum number of step halvings.
    #[must_use]
    pub fn with_max_backtracks(self, max_backtracks: usize) -> Self {
        Self {
            max_backtracks,
            ..self
        }
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the maximum number of objective evaluations.
    #[must_use]
    pub fn max_evals(&self) -> usize {
        self.max_evals
    }

    /// Returns the tolerance on the relative reduction of the objective.
    #[must_use]
    pub fn ftol(&self) -> f64 {
        self.ftol
    }

    /// Returns the tolerance on the projected gradient (infinity norm).
    #[must_use]
    pub fn gtol(&self) -> f64 {
        self.gtol
    }

    /// Returns the finite-difference step, relative to `max(1, |x_i|)`.
    #[must_use]
    pub fn fd_step(&self) -> f64 {
        self.fd_step
    }

    /// Returns the maximum number of step halvings per line search.
    #[must_use]
    pub fn max_backtracks(&self) -> usize {
        self.max_backtracks
    }
}
