//! JSON and CSV files for samples, models and histories.
//!
//! A model file holds the config keys at the top level, an optional
//! `diamond` object with the sample, and an optional `model_results`
//! object with the latest fit:
//!
//! ```json
//! {
//!   "diamond": { "age_core": 3520, "age_rim": 1860, "age_kimberlite": 0,
//!                "c_NT": 625, "c_agg": 0.863, "r_NT": 801, "r_agg": 0.197 },
//!   "cooling_rate0": 0.01, "T_start0": 1200,
//!   "rate_bounds": [0.001, 0.12], "T_bounds": [1000, 1450], "dt": 1,
//!   "T_scenario": "continuous", "scenario_params": null,
//!   "model_results": { "initial_T": 1190.2, "cooling_rate": 0.0213 }
//! }
//! ```

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{ConfigError, ThermalHistoryConfig},
    fit::FitResult,
    model::AggregationModel,
    sample::Sample,
};

/// Errors that can occur when reading or writing model files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model data")]
    Json(#[from] serde_json::Error),

    #[error("model data has no diamond and none was supplied")]
    MissingSample,

    #[error("invalid model configuration")]
    Config(#[from] ConfigError),
}

#[derive(Serialize, Deserialize)]
struct ModelFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diamond: Option<Sample>,

    #[serde(flatten)]
    config: ThermalHistoryConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_results: Option<FitResult>,
}

fn open(path: &Path) -> Result<BufReader<File>, PersistError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn create(path: &Path) -> Result<BufWriter<File>, PersistError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a model from JSON.
///
/// A `sample` passed here takes precedence over one stored in the data. A
/// stored fit is attached with its error recomputed against the sample in
/// use.
///
/// # Errors
///
/// Returns an error if the data is malformed, holds an invalid config, or
/// has no sample when none is supplied.
pub fn read_model<R: Read>(reader: R, sample: Option<Sample>) -> Result<AggregationModel, PersistError> {
    let file: ModelFile = serde_json::from_reader(reader)?;
    let sample = sample.or(file.diamond).ok_or(PersistError::MissingSample)?;

    let model = AggregationModel::new(sample, file.config)?;
    Ok(match file.model_results {
        Some(fit) => model.with_fit(fit),
        None => model,
    })
}

/// Writes a model as pretty-printed JSON, including its fit if it has one.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_model<W: Write>(model: &AggregationModel, writer: W) -> Result<(), PersistError> {
    let file = ModelFile {
        diamond: Some(*model.sample()),
        config: *model.config(),
        model_results: model.fit().cloned(),
    };
    serde_json::to_writer_pretty(writer, &file)?;
    Ok(())
}

/// Loads a model file, see [`read_model`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`read_model`] fails.
pub fn load_model(path: impl AsRef<Path>, sample: Option<Sample>) -> Result<AggregationModel, PersistError> {
    let path = path.as_ref();
    debug!("loading model from {}", path.display());
    read_model(open(path)?, sample)
}

/// Saves a model file, see [`write_model`].
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_model(model: &AggregationModel, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let mut writer = create(path)?;
    write_model(model, &mut writer)?;
    flush(writer, path)?;
    debug!("saved model to {}", path.display());
    Ok(())
}

/// Loads a sample file with the flat `age_core` ... `r_agg` keys.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds an invalid sample.
pub fn load_sample(path: impl AsRef<Path>) -> Result<Sample, PersistError> {
    let path = path.as_ref();
    Ok(serde_json::from_reader(open(path)?)?)
}

/// Saves a sample file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_sample(sample: &Sample, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, sample)?;
    flush(writer, path)
}

/// Writes the model's current history (see [`AggregationModel::history`])
/// next to `path`, under a name carrying the history's parameters.
///
/// Any extension on `path` is dropped: `out/model_history.csv` becomes
/// `out/model_history_1190C_21K_Gyr.csv`. Returns the path written.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_history_csv(model: &AggregationModel, path: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
    let path = path.as_ref();
    let history = model.history();

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = path.with_file_name(history.csv_file_name(&stem));

    let mut writer = create(&target)?;
    history
        .write_csv(&mut writer)
        .map_err(|source| PersistError::Io {
            path: target.clone(),
            source,
        })?;
    flush(writer, &target)?;

    debug!("saved {} history rows to {}", history.len(), target.display());
    Ok(target)
}

fn flush(mut writer: BufWriter<File>, path: &Path) -> Result<(), PersistError> {
    writer.flush().map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}
