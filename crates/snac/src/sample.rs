use serde::{Deserialize, Serialize};
use thiserror::Error;

use snac_core::constraint::{
    Constrained, Constraint, ConstraintError, NonNegative, StrictlyPositive, UnitInterval,
};

use crate::kinetics;

/// Measured nitrogen state of one growth zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalZone {
    nitrogen: Constrained<StrictlyPositive>,
    b_fraction: Constrained<UnitInterval>,
    age: Constrained<NonNegative>,
}

/// A diamond with a core and a later rim, erupted at `eruption_age`.
///
/// Ages are in Ma and satisfy `core.age >= rim.age >= eruption_age`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleRecord", into = "SampleRecord")]
pub struct Sample {
    core: ThermalZone,
    rim: ThermalZone,
    eruption_age: Constrained<NonNegative>,
}

/// Errors that can occur when building a [`ThermalZone`] or [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleError {
    #[error("invalid {field}")]
    Field {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("rim age ({rim} Ma) exceeds core age ({core} Ma)")]
    RimOlderThanCore { core: f64, rim: f64 },

    #[error("eruption age ({eruption} Ma) exceeds rim age ({rim} Ma)")]
    EruptionBeforeRim { rim: f64, eruption: f64 },
}

fn constrained<C: Constraint>(
    field: &'static str,
    value: f64,
) -> Result<Constrained<C>, SampleError> {
    Constrained::new(value).map_err(|source| SampleError::Field { field, source })
}

impl ThermalZone {
    /// Creates a zone from total nitrogen (ppm), B-centre fraction and
    /// growth age (Ma).
    ///
    /// # Errors
    ///
    /// Returns an error if the nitrogen content is not positive, the
    /// fraction lies outside `[0, 1]`, or the age is negative.
    pub fn new(nitrogen_ppm: f64, b_fraction: f64, age: f64) -> Result<Self, SampleError> {
        Ok(Self {
            nitrogen: constrained("nitrogen concentration", nitrogen_ppm)?,
            b_fraction: constrained("aggregation fraction", b_fraction)?,
            age: constrained("age", age)?,
        })
    }

    /// Total nitrogen concentration (ppm).
    #[must_use]
    pub fn nitrogen_ppm(&self) -> f64 {
        self.nitrogen.get()
    }

    /// Observed fraction of nitrogen held in B-centres.
    #[must_use]
    pub fn b_fraction(&self) -> f64 {
        self.b_fraction.get()
    }

    /// Growth age (Ma).
    #[must_use]
    pub fn age(&self) -> f64 {
        self.age.get()
    }

    /// Constant temperature that would produce this zone's aggregation
    /// between its growth and `eruption_age`.
    #[must_use]
    pub fn residence_temperature(&self, eruption_age: f64) -> f64 {
        kinetics::temperature_from_aggregation(
            self.age() - eruption_age,
            self.nitrogen_ppm(),
            self.b_fraction(),
        )
    }
}

impl Sample {
    /// Creates a sample after checking the age ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the eruption age is negative or the ages are out
    /// of order.
    pub fn new(core: ThermalZone, rim: ThermalZone, eruption_age: f64) -> Result<Self, SampleError> {
        let eruption_age = constrained::<NonNegative>("eruption age", eruption_age)?;

        if rim.age() > core.age() {
            return Err(SampleError::RimOlderThanCore {
                core: core.age(),
                rim: rim.age(),
            });
        }
        if eruption_age.get() > rim.age() {
            return Err(SampleError::EruptionBeforeRim {
                rim: rim.age(),
                eruption: eruption_age.get(),
            });
        }

        Ok(Self {
            core,
            rim,
            eruption_age,
        })
    }

    #[must_use]
    pub fn core(&self) -> &ThermalZone {
        &self.core
    }

    #[must_use]
    pub fn rim(&self) -> &ThermalZone {
        &self.rim
    }

    /// Eruption age of the host kimberlite (Ma).
    #[must_use]
    pub fn eruption_age(&self) -> f64 {
        self.eruption_age.get()
    }

    /// Time from core growth to eruption (Myr).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.core.age() - self.eruption_age()
    }

    /// Elapsed time since core growth at which the rim formed (Myr).
    #[must_use]
    pub fn rim_onset(&self) -> f64 {
        self.core.age() - self.rim.age()
    }
}

impl Default for Sample {
    /// A reference diamond: core grown at 3520 Ma with 625 ppm at 86.3 %B,
    /// rim at 1860 Ma with 801 ppm at 19.7 %B, erupted at 0 Ma.
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(
            ThermalZone::new(625.0, 0.863, 3520.0).unwrap(),
            ThermalZone::new(801.0, 0.197, 1860.0).unwrap(),
            0.0,
        )
        .unwrap()
    }
}

/// Flat serialized form of a [`Sample`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SampleRecord {
    age_core: f64,
    age_rim: f64,
    age_kimberlite: f64,
    #[serde(rename = "c_NT")]
    core_nitrogen: f64,
    #[serde(rename = "c_agg")]
    core_b_fraction: f64,
    #[serde(rename = "r_NT")]
    rim_nitrogen: f64,
    #[serde(rename = "r_agg")]
    rim_b_fraction: f64,
}

impl TryFrom<SampleRecord> for Sample {
    type Error = SampleError;

    fn try_from(record: SampleRecord) -> Result<Self, Self::Error> {
        let core = ThermalZone::new(record.core_nitrogen, record.core_b_fraction, record.age_core)
            .map_err(|e| rename(e, "c_NT", "c_agg", "age_core"))?;
        let rim = ThermalZone::new(record.rim_nitrogen, record.rim_b_fraction, record.age_rim)
            .map_err(|e| rename(e, "r_NT", "r_agg", "age_rim"))?;
        Self::new(core, rim, record.age_kimberlite).map_err(|e| match e {
            SampleError::Field { source, .. } => SampleError::Field {
                field: "age_kimberlite",
                source,
            },
            other => other,
        })
    }
}

/// Reports zone field errors under their serialized key.
fn rename(
    error: SampleError,
    nitrogen: &'static str,
    fraction: &'static str,
    age: &'static str,
) -> SampleError {
    match error {
        SampleError::Field { field, source } => SampleError::Field {
            field: match field {
                "nitrogen concentration" => nitrogen,
                "aggregation fraction" => fraction,
                _ => age,
            },
            source,
        },
        other => other,
    }
}

impl From<Sample> for SampleRecord {
    fn from(sample: Sample) -> Self {
        Self {
            age_core: sample.core.age(),
            age_rim: sample.rim.age(),
            age_kimberlite: sample.eruption_age(),
            core_nitrogen: sample.core.nitrogen_ppm(),
            core_b_fraction: sample.core.b_fraction(),
            rim_nitrogen: sample.rim.nitrogen_ppm(),
            rim_b_fraction: sample.rim.b_fraction(),
        }
    }
}
