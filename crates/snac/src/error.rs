use thiserror::Error;

use crate::{
    config::ConfigError, fit::FitError, persist::PersistError, sample::SampleError,
    scenario::ScenarioError,
};

/// Any error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
