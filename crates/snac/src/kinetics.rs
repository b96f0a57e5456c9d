//! Second-order kinetics of A-centre to B-centre nitrogen aggregation.
//!
//! The A-centre concentration after holding for `t` seconds at temperature
//! `T` follows
//!
//! ```text
//! NA' = NA / (1 + k t NA),   k = A0 exp(-Ea / (T + 273))
//! ```
//!
//! with `Ea` (in kelvin) and `A0` fixed. Temperatures are in °C, durations
//! in Myr and concentrations in ppm.

/// Activation energy divided by the gas constant, in kelvin.
pub const ACTIVATION_ENERGY_K: f64 = 81_160.0;

/// Pre-exponential factor of the aggregation rate constant.
pub const PRE_EXPONENTIAL: f64 = 293_608.0;

/// Offset from °C to K used by the rate law.
pub const CELSIUS_OFFSET: f64 = 273.0;

/// Seconds in one million Julian years.
pub const SECONDS_PER_MYR: f64 = 1e6 * 365.25 * 24.0 * 60.0 * 60.0;

/// Converts a duration in Myr to seconds.
///
/// Multiplies through the factors one at a time, which is not always
/// bit-identical to `dt * SECONDS_PER_MYR`.
#[must_use]
pub fn myr_to_seconds(dt: f64) -> f64 {
    dt * 1e6 * 365.25 * 24.0 * 60.0 * 60.0
}

/// Arrhenius rate constant at `temperature` °C.
#[must_use]
pub fn rate_constant(temperature: f64) -> f64 {
    PRE_EXPONENTIAL * (-ACTIVATION_ENERGY_K / (temperature + CELSIUS_OFFSET)).exp()
}

/// A-centre concentration after `dt` Myr at `temperature` °C, starting from `na`.
///
/// Overflow or underflow in the rate constant propagates as computed. A
/// denominator of exactly zero yields `NaN` rather than an infinity.
#[must_use]
pub fn aggregate(na: f64, temperature: f64, dt: f64) -> f64 {
    let denominator = 1.0 + rate_constant(temperature) * myr_to_seconds(dt) * na;
    if denominator == 0.0 {
        return f64::NAN;
    }
    na / denominator
}

/// Fraction of total nitrogen held in B-centres.
#[must_use]
pub fn b_fraction(na: f64, n_total: f64) -> f64 {
    1.0 - na / n_total
}

/// Isothermal temperature (°C) that takes nitrogen from pure A-centres to
/// the observed `b_fraction` in `elapsed` Myr.
///
/// This is the mantle residence temperature implied by a single zone. A
/// zone with no B-centres degenerates to -273 °C, and a zero logarithm
/// yields `NaN`.
#[must_use]
pub fn temperature_from_aggregation(elapsed: f64, n_total: f64, b_fraction: f64) -> f64 {
    let seconds = elapsed * SECONDS_PER_MYR;
    let na = n_total * (1.0 - b_fraction);
    let log = (((n_total / na) - 1.0) / (seconds * n_total * PRE_EXPONENTIAL)).ln();
    if log == 0.0 {
        return f64::NAN;
    }
    -ACTIVATION_ENERGY_K / log - CELSIUS_OFFSET
}
