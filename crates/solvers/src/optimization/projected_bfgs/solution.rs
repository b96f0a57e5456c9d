use std::fmt;

use snac_core::Snapshot;

/// Which convergence test was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// The projected gradient fell within `gtol`.
    ProjectedGradient,

    /// The relative reduction of the objective fell within `ftol`.
    RelativeReduction,
}

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged(Criterion),

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Reached the evaluation limit without converging.
    MaxEvals,

    /// The line search could not reduce the objective along a descent direction.
    LineSearchFailed,

    /// The objective at the starting point was NaN or infinite.
    NonFiniteStart,

    /// A finite-difference gradient component was NaN or infinite on both
    /// sides of the current point.
    NonFiniteGradient,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

impl Status {
    /// Returns `true` if the solver converged.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// Returns a numeric status code.
    ///
    /// - `0`: converged
    /// - `1`: iteration or evaluation limit reached
    /// - `2`: abnormal termination
    /// - `3`: stopped by observer
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Converged(_) => 0,
            Self::MaxIters | Self::MaxEvals => 1,
            Self::LineSearchFailed | Self::NonFiniteStart | Self::NonFiniteGradient => 2,
            Self::StoppedByObserver => 3,
        }
    }

    /// Returns a human-readable description of the termination.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Converged(Criterion::ProjectedGradient) => {
                "CONVERGENCE: NORM OF PROJECTED GRADIENT <= GTOL"
            }
            Self::Converged(Criterion::RelativeReduction) => {
                "CONVERGENCE: RELATIVE REDUCTION OF F <= FTOL"
            }
            Self::MaxIters => "STOP: TOTAL NO. OF ITERATIONS REACHED LIMIT",
            Self::MaxEvals => "STOP: TOTAL NO. OF F EVALUATIONS EXCEEDS LIMIT",
            Self::LineSearchFailed => "ABNORMAL: LINE SEARCH COULD NOT REDUCE F",
            Self::NonFiniteStart => "ABNORMAL: F IS NOT FINITE AT THE STARTING POINT",
            Self::NonFiniteGradient => "ABNORMAL: GRADIENT IS NOT FINITE",
            Self::StoppedByObserver => "STOP: REQUESTED BY OBSERVER",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The result of a projected BFGS search.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    /// Final solver status.
    pub status: Status,

    /// Best estimate of the minimizer.
    pub x: [f64; N],

    /// Objective value at the reported x.
    pub objective: f64,

    /// Snapshot at the reported x.
    pub snapshot: Snapshot<I, O>,

    /// Iteration count when the solver finished.
    pub iters: usize,

    /// Number of objective evaluations, including the starting point.
    pub evals: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}
