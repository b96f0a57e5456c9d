use std::io::{self, Write};

use crate::{engine::CoolingParams, sample::Sample};

/// Column names of a written history, in row order.
pub const CSV_HEADER: &str = "durations,T_all,NA_core,NA_rim,NB_core,NB_rim";

/// Simulated state at one checkpoint.
///
/// Concentrations are in ppm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow {
    /// Myr since core growth.
    pub elapsed: f64,
    /// °C.
    pub temperature: f64,
    pub core_a: f64,
    pub rim_a: f64,
    pub core_b: f64,
    pub rim_b: f64,
}

/// The full simulated history for one parameter pair.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTrace {
    params: CoolingParams,
    rows: Vec<HistoryRow>,
}

impl HistoryTrace {
    pub(crate) fn new(params: CoolingParams, rows: Vec<HistoryRow>) -> Self {
        Self { params, rows }
    }

    /// The parameters the history was simulated with.
    #[must_use]
    pub fn params(&self) -> CoolingParams {
        self.params
    }

    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// State at eruption.
    #[must_use]
    pub fn final_row(&self) -> Option<&HistoryRow> {
        self.rows.last()
    }

    /// Rows from the rim's growth onward.
    #[must_use]
    pub fn rim_rows(&self, sample: &Sample) -> &[HistoryRow] {
        let onset = sample.rim_onset();
        let first = self.rows.partition_point(|row| row.elapsed < onset);
        &self.rows[first..]
    }

    /// Writes the history as CSV, one line per checkpoint after the header.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{CSV_HEADER}")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                row.elapsed, row.temperature, row.core_a, row.rim_a, row.core_b, row.rim_b
            )?;
        }
        writer.flush()
    }

    /// File name for this history: `{base}_{T}C_{rate}K_Gyr.csv`, with the
    /// start temperature in °C and the rate in K/Gyr, both rounded.
    #[must_use]
    pub fn csv_file_name(&self, base: &str) -> String {
        format!(
            "{base}_{:.0}C_{:.0}K_Gyr.csv",
            self.params.start_temperature,
            self.params.rate_k_per_gyr()
        )
    }
}
