use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How temperature falls with elapsed time at a given cooling rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoolingLaw {
    /// `T = T0 - t * rate`.
    #[default]
    Linear,

    /// `T = T0 * exp(-rate * t)`.
    Exponential,
}

/// Returned when parsing an unrecognised cooling law name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised cooling law `{0}`, must be one of linear, exponential")]
pub struct UnknownCoolingLaw(pub String);

impl CoolingLaw {
    /// Temperature after `elapsed` Myr of cooling from `start` °C at `rate`.
    ///
    /// Total for finite inputs and free of any ordering assumption, so it may
    /// be evaluated at arbitrary elapsed times. Nothing stops the linear law
    /// from going below zero.
    #[must_use]
    pub fn temperature(self, start: f64, elapsed: f64, rate: f64) -> f64 {
        match self {
            Self::Linear => start - elapsed * rate,
            Self::Exponential => start * (-rate * elapsed).exp(),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Exponential => "exponential",
        }
    }
}

impl FromStr for CoolingLaw {
    type Err = UnknownCoolingLaw;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "exponential" => Ok(Self::Exponential),
            other => Err(UnknownCoolingLaw(other.to_string())),
        }
    }
}

impl fmt::Display for CoolingLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
