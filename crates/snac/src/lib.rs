//! Thermal histories of diamonds from nitrogen aggregation.
//!
//! A diamond grows a core, later a rim, and is carried to the surface by a
//! kimberlite eruption. While it resides in the mantle its nitrogen slowly
//! aggregates from A-centres into B-centres at a temperature-dependent rate.
//! Given the measured nitrogen content and aggregation state of both zones,
//! this crate fits a start temperature and cooling rate that reproduce them.
//!
//! The pieces, bottom up:
//!
//! - [`cooling`] and [`scenario`] give the temperature at any time
//! - [`kinetics`] advances A-centre concentration through one step
//! - [`engine`] runs both zones over the [`checkpoints`] of a [`Sample`]
//! - [`fit`] searches the configured bounds for the best parameters
//! - [`AggregationModel`] ties a sample, a [`ThermalHistoryConfig`] and the
//!   latest [`FitResult`] together, and [`persist`] reads and writes it
//!
//! ```no_run
//! use snac::{AggregationModel, Sample, ThermalHistoryConfig};
//!
//! let mut model = AggregationModel::new(Sample::default(), ThermalHistoryConfig::default())?;
//! let result = model.run()?;
//! println!("{result}");
//! # Ok::<(), snac::Error>(())
//! ```

pub mod checkpoints;
pub mod config;
pub mod cooling;
pub mod engine;
mod error;
pub mod fit;
pub mod history;
pub mod kinetics;
pub mod model;
pub mod persist;
mod report;
pub mod sample;
pub mod scenario;

pub use config::ThermalHistoryConfig;
pub use cooling::CoolingLaw;
pub use engine::{CoolingParams, Simulation};
pub use error::Error;
pub use fit::{FitResult, fit};
pub use history::HistoryTrace;
pub use model::{AggregationModel, ParameterSource};
pub use sample::{Sample, ThermalZone};
pub use scenario::Scenario;
