//! Fit a diamond's thermal history from the command line.
//!
//! # Usage
//!
//! ```bash
//! snac --save-dir out \
//!   --diamond-file diamond.json \
//!   --cooling-rate0 0.01 --t-start0 1200 \
//!   --rate-bounds 0.001 0.12 --t-bounds 1000 1450
//!
//! # Refit a saved model, optionally against another diamond
//! snac --save-dir out --model-file out/model_results.json
//! ```
//!
//! Writes `model_results.json` and a `model_history_*.csv` into the save
//! directory.

use std::{
    error::Error as _,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use log::{debug, warn};
use thiserror::Error;

use snac::{
    AggregationModel, CoolingLaw, Scenario, ThermalHistoryConfig,
    persist::{self, PersistError},
};

/// SNAC thermal history fitter
#[derive(Parser, Debug)]
#[command(name = "snac", version)]
#[command(about = "Fit a start temperature and cooling rate to a diamond's nitrogen aggregation")]
struct Args {
    /// Directory to save model results
    #[arg(long, alias = "save_dir")]
    save_dir: PathBuf,

    /// Saved model file; when given, the history parameters below are ignored
    #[arg(long, alias = "model_file")]
    model_file: Option<PathBuf>,

    /// Diamond file; overrides the diamond stored in --model-file
    #[arg(long, alias = "diamond_file")]
    diamond_file: Option<PathBuf>,

    /// Initial cooling rate guess (°C/Myr)
    #[arg(long, alias = "cooling_rate0")]
    cooling_rate0: Option<f64>,

    /// Initial start temperature guess (°C)
    #[arg(long = "t-start0", alias = "T_start0")]
    t_start0: Option<f64>,

    /// Cooling rate bounds (°C/Myr)
    #[arg(long, alias = "rate_bounds", num_args = 2, value_names = ["MIN", "MAX"])]
    rate_bounds: Option<Vec<f64>>,

    /// Start temperature bounds (°C)
    #[arg(long = "t-bounds", alias = "T_bounds", num_args = 2, value_names = ["MIN", "MAX"])]
    t_bounds: Option<Vec<f64>>,

    /// Cooling scenario: continuous, hot_pulse, hot_spike, rapid_ascent or slow_ascent
    #[arg(long, default_value = "continuous")]
    scenario: String,

    /// Scenario parameters, in the order the scenario expects
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    scenario_params: Option<Vec<f64>>,

    /// Cooling law: linear or exponential
    #[arg(long, default_value_t = CoolingLaw::Linear)]
    cooling_law: CoolingLaw,

    /// Checkpoint spacing (Myr)
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Log fit progress
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("missing {}, required unless --model-file is given", .0.join(", "))]
    MissingArguments(Vec<&'static str>),

    #[error(transparent)]
    Snac(#[from] snac::Error),
}

/// History parameters that must be given when no model file is.
struct NewModel<'a> {
    diamond_file: &'a Path,
    cooling_rate0: f64,
    t_start0: f64,
    rate_bounds: (f64, f64),
    t_bounds: (f64, f64),
}

impl<'a> NewModel<'a> {
    fn from_args(args: &'a Args) -> Result<Self, CliError> {
        let pair = |values: &Option<Vec<f64>>| values.as_deref().map(|v| (v[0], v[1]));

        match (
            args.diamond_file.as_deref(),
            args.cooling_rate0,
            args.t_start0,
            pair(&args.rate_bounds),
            pair(&args.t_bounds),
        ) {
            (Some(diamond_file), Some(cooling_rate0), Some(t_start0), Some(rate_bounds), Some(t_bounds)) => {
                Ok(Self {
                    diamond_file,
                    cooling_rate0,
                    t_start0,
                    rate_bounds,
                    t_bounds,
                })
            }
            _ => {
                let missing = [
                    ("--diamond-file", args.diamond_file.is_none()),
                    ("--cooling-rate0", args.cooling_rate0.is_none()),
                    ("--t-start0", args.t_start0.is_none()),
                    ("--rate-bounds", args.rate_bounds.is_none()),
                    ("--t-bounds", args.t_bounds.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(CliError::MissingArguments(missing))
            }
        }
    }

    fn build(&self, args: &Args) -> Result<AggregationModel, snac::Error> {
        let sample = persist::load_sample(self.diamond_file)?;
        let scenario = Scenario::from_parts(&args.scenario, args.scenario_params.as_deref())?;

        let config = ThermalHistoryConfig::default()
            .with_initial_guess(self.t_start0, self.cooling_rate0)
            .with_rate_bounds(self.rate_bounds.0, self.rate_bounds.1)
            .with_temperature_bounds(self.t_bounds.0, self.t_bounds.1)
            .with_dt(args.dt)
            .with_scenario(scenario)
            .with_cooling_law(args.cooling_law);

        Ok(AggregationModel::new(sample, config)?)
    }
}

fn load(args: &Args, model_file: &Path) -> Result<AggregationModel, snac::Error> {
    let ignored = args.cooling_rate0.is_some()
        || args.t_start0.is_some()
        || args.rate_bounds.is_some()
        || args.t_bounds.is_some()
        || args.scenario_params.is_some();
    if ignored {
        warn!("history parameters are ignored when --model-file is given");
    }

    let sample = args
        .diamond_file
        .as_ref()
        .map(|path| persist::load_sample(path))
        .transpose()?;
    Ok(persist::load_model(model_file, sample)?)
}

fn fit_and_save(model: &mut AggregationModel, save_dir: &Path) -> Result<(), snac::Error> {
    debug!("{model}");
    let result = model.run()?;
    println!("{result}");

    fs::create_dir_all(save_dir).map_err(|source| PersistError::Io {
        path: save_dir.to_path_buf(),
        source,
    })?;
    persist::save_model(model, save_dir.join("model_results.json"))?;
    let history = persist::save_history_csv(model, save_dir.join("model_history.csv"))?;
    debug!("history written to {}", history.display());

    println!("Model results saved to {}", save_dir.display());
    Ok(())
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut model = match &args.model_file {
        Some(model_file) => load(args, model_file)?,
        None => NewModel::from_args(args)?.build(args)?,
    };
    fit_and_save(&mut model, &args.save_dir)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("snac").chain(line.iter().copied())).unwrap()
    }

    #[test]
    fn parses_a_full_command_line() {
        let args = parse(&[
            "--save-dir", "out",
            "--diamond-file", "diamond.json",
            "--cooling-rate0", "0.01",
            "--t-start0", "1200",
            "--rate-bounds", "0.001", "0.12",
            "--t-bounds", "1000", "1450",
            "--scenario", "rapid_ascent",
            "--scenario-params", "-50", "3000",
            "--cooling-law", "exponential",
        ]);

        let new = NewModel::from_args(&args).unwrap();
        assert_eq!(new.rate_bounds, (0.001, 0.12));
        assert_eq!(new.t_bounds, (1000.0, 1450.0));
        assert_eq!(args.scenario_params, Some(vec![-50.0, 3000.0]));
        assert_eq!(args.cooling_law, CoolingLaw::Exponential);
        assert_eq!(args.dt, 1.0);
    }

    #[test]
    fn accepts_underscore_flag_names() {
        let args = parse(&["--save_dir", "out", "--model_file", "m.json", "--T_start0", "1100"]);
        assert_eq!(args.model_file, Some(PathBuf::from("m.json")));
        assert_eq!(args.t_start0, Some(1100.0));
    }

    #[test]
    fn names_every_missing_argument() {
        let args = parse(&["--save-dir", "out", "--t-start0", "1200"]);
        match NewModel::from_args(&args) {
            Err(CliError::MissingArguments(missing)) => assert_eq!(
                missing,
                ["--diamond-file", "--cooling-rate0", "--rate-bounds", "--t-bounds"]
            ),
            _ => panic!("expected missing arguments"),
        }
    }

    #[test]
    fn bounds_take_exactly_two_values() {
        let line = ["snac", "--save-dir", "out", "--t-bounds", "1000"];
        assert!(Args::try_parse_from(line).is_err());
    }
}
