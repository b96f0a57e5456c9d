//! Human-readable summaries.

use std::fmt;

use crate::{
    fit::FitResult,
    model::AggregationModel,
    sample::{Sample, ThermalZone},
    scenario::Scenario,
};

impl fmt::Display for ThermalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[N_T] {} ppm, {:.1}%B",
            self.nitrogen_ppm(),
            self.b_fraction() * 100.0
        )
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Diamond with core age {} Ma,", self.core().age())?;
        writeln!(f, "rim age {} Ma,", self.rim().age())?;
        writeln!(f, "and kimberlite age {} Ma.", self.eruption_age())?;
        writeln!(f, "Core: {}.", self.core())?;
        write!(f, "Rim: {}.", self.rim())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Some(params) = self.params() {
            write!(f, " {params:?}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model result:")?;
        writeln!(f, "initial T: {:.0} deg.C", self.start_temperature)?;
        write!(f, "cooling rate: {:.0} K/Gyr", self.params().rate_k_per_gyr())?;
        if !self.success {
            write!(f, "\nnot converged ({}): {}", self.status, self.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for AggregationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config();
        let guess = config.initial_guess();

        writeln!(f, "AggregationModel:")?;
        writeln!(f, "for {}", self.sample())?;
        writeln!(f)?;
        writeln!(f, "Cooling scenario: {} ({} cooling)", config.scenario, config.cooling_law)?;
        writeln!(f, "Initial guesses:")?;
        writeln!(f, "- Starting: {} deg.C", guess.start_temperature)?;
        write!(f, "- Cooling rate: {} K/Gyr", guess.rate_k_per_gyr())?;

        if let Some(fit) = self.fit() {
            let rate = fit.params().rate_k_per_gyr();
            write!(f, "\n\nFitted model results:")?;
            write!(f, "\n- Starting T: {:.2} deg.C", fit.start_temperature)?;
            write!(f, "\n- Cooling rate: {rate:.2} K/Gyr")?;
            write!(f, "\n- Error: {:.3e}", fit.error)?;
        }
        Ok(())
    }
}
