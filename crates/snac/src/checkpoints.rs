use thiserror::Error;

/// Elapsed time of the first checkpoint, in Myr.
///
/// Replaces the zero a uniform grid would start at, so the first
/// integration step covers a short but non-zero interval.
pub const FIRST_CHECKPOINT: f64 = 0.01;

/// Largest grid [`Checkpoints::new`] will build.
pub const MAX_CHECKPOINTS: usize = 10_000_000;

/// Increasing elapsed times (Myr since core growth) at which the simulation
/// evaluates temperature and aggregation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoints {
    times: Vec<f64>,
}

/// Errors that can occur when building checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CheckpointsError {
    #[error("time step must be finite and positive, got {0}")]
    Step(f64),

    #[error("simulated span must be finite and non-negative, got {0}")]
    Span(f64),

    #[error("time step gives {0} checkpoints, at most {MAX_CHECKPOINTS} are allowed")]
    TooMany(f64),
}

impl Checkpoints {
    /// Builds the grid `0, dt, 2 dt, ...` strictly below `span + 1`, with
    /// the first point moved to [`FIRST_CHECKPOINT`].
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive, if `span` is not
    /// finite and non-negative, or if the grid would exceed
    /// [`MAX_CHECKPOINTS`] points.
    pub fn new(span: f64, dt: f64) -> Result<Self, CheckpointsError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CheckpointsError::Step(dt));
        }
        if !span.is_finite() || span < 0.0 {
            return Err(CheckpointsError::Span(span));
        }

        let count = ((span + 1.0) / dt).ceil();
        #[allow(clippy::cast_precision_loss)]
        let limit = MAX_CHECKPOINTS as f64;
        if count > limit {
            return Err(CheckpointsError::TooMany(count));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count as usize;

        #[allow(clippy::cast_precision_loss)]
        let mut times: Vec<f64> = (0..count).map(|i| i as f64 * dt).collect();
        if let Some(first) = times.first_mut() {
            *first = FIRST_CHECKPOINT;
        }

        Ok(Self { times })
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Pairs each checkpoint with the integration interval ending at it.
    ///
    /// The first interval is the first checkpoint's own elapsed time; later
    /// ones are differences between successive checkpoints.
    pub fn steps(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().enumerate().map(|(i, &t)| {
            let delta = if i == 0 { t } else { t - self.times[i - 1] };
            (t, delta)
        })
    }

    /// Integration intervals, see [`Checkpoints::steps`].
    pub fn deltas(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps().map(|(_, delta)| delta)
    }
}
