//! Piecewise thermal-history shapes layered on a cooling law.
//!
//! Every scenario is defined over the whole timeline by case analysis on the
//! elapsed time `t` (Myr since core growth). Outside its event window each
//! scenario follows the base cooling law from `T0`.
//!
//! | Scenario | Parameters | Inside the window |
//! |---|---|---|
//! | `continuous` | none | base cooling throughout |
//! | `hot_pulse` | `ΔT`, start, duration | flat at `cool(T0, start) + ΔT` |
//! | `hot_spike` | `ΔT`, start, duration | linear from `cool(T0, start) + ΔT` down to `cool(T0, end)` |
//! | `rapid_ascent` | drop, time | from `time` on: cooling restarts at `cool(T0, time) - drop` |
//! | `slow_ascent` | ascent rate, start, duration | cooling at the ascent rate from `cool(T0, start)`, then at the base rate from the window's exit temperature |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cooling::CoolingLaw;

/// Names accepted by [`Scenario::from_parts`].
pub const SCENARIO_NAMES: [&str; 5] = [
    "continuous",
    "hot_pulse",
    "hot_spike",
    "rapid_ascent",
    "slow_ascent",
];

/// A transient heating event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Temperature rise above the cooling trajectory at the pulse start (°C).
    pub delta_t: f64,

    /// Elapsed time at which the pulse begins (Myr).
    pub start: f64,

    /// Length of the pulse window (Myr).
    pub duration: f64,
}

impl Pulse {
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// An instantaneous ascent to shallower, cooler mantle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RapidAscent {
    /// Temperature drop at the ascent (°C).
    pub drop: f64,

    /// Elapsed time of the ascent (Myr).
    pub time: f64,
}

/// A gradual ascent during which the cooling rate changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowAscent {
    /// Cooling rate during the ascent (°C/Myr).
    pub rate: f64,

    /// Elapsed time at which the ascent begins (Myr).
    pub start: f64,

    /// Length of the ascent (Myr).
    pub duration: f64,
}

impl SlowAscent {
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A thermal-history scenario with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ScenarioSpec", into = "ScenarioSpec")]
pub enum Scenario {
    #[default]
    Continuous,
    HotPulse(Pulse),
    HotSpike(Pulse),
    RapidAscent(RapidAscent),
    SlowAscent(SlowAscent),
}

/// Errors that can occur when building a [`Scenario`] from a name and a
/// parameter list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error(
        "unrecognised scenario `{name}`, must be one of {}",
        SCENARIO_NAMES.join(", "),
        name = .0
    )]
    UnknownName(String),

    #[error("scenario `{name}` takes {expected} parameters, got {found}")]
    Arity {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("scenario `{name}` parameter {index} is not finite")]
    NotFinite { name: &'static str, index: usize },

    #[error("scenario `{name}` duration must not be negative, got {duration}")]
    NegativeDuration { name: &'static str, duration: f64 },

    #[error("hot_spike duration must be positive")]
    ZeroSpikeDuration,
}

impl Scenario {
    /// Builds a scenario from its name and parameter list.
    ///
    /// `params` may be `None` (or empty) only for `continuous`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown name, the wrong number of
    /// parameters, non-finite parameters, a negative window duration, or a
    /// zero-length hot spike.
    pub fn from_parts(name: &str, params: Option<&[f64]>) -> Result<Self, ScenarioError> {
        let params = params.unwrap_or_default();

        match name {
            "continuous" => {
                expect_params::<0>("continuous", params)?;
                Ok(Self::Continuous)
            }
            "hot_pulse" => {
                let [delta_t, start, duration] = expect_params("hot_pulse", params)?;
                check_duration("hot_pulse", duration)?;
                Ok(Self::HotPulse(Pulse {
                    delta_t,
                    start,
                    duration,
                }))
            }
            "hot_spike" => {
                let [delta_t, start, duration] = expect_params("hot_spike", params)?;
                check_duration("hot_spike", duration)?;
                if duration == 0.0 {
                    return Err(ScenarioError::ZeroSpikeDuration);
                }
                Ok(Self::HotSpike(Pulse {
                    delta_t,
                    start,
                    duration,
                }))
            }
            "rapid_ascent" => {
                let [drop, time] = expect_params("rapid_ascent", params)?;
                Ok(Self::RapidAscent(RapidAscent { drop, time }))
            }
            "slow_ascent" => {
                let [rate, start, duration] = expect_params("slow_ascent", params)?;
                check_duration("slow_ascent", duration)?;
                Ok(Self::SlowAscent(SlowAscent {
                    rate,
                    start,
                    duration,
                }))
            }
            other => Err(ScenarioError::UnknownName(other.to_string())),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::HotPulse(_) => "hot_pulse",
            Self::HotSpike(_) => "hot_spike",
            Self::RapidAscent(_) => "rapid_ascent",
            Self::SlowAscent(_) => "slow_ascent",
        }
    }

    /// The parameter list in [`Scenario::from_parts`] order, or `None` for
    /// `continuous`.
    #[must_use]
    pub fn params(&self) -> Option<Vec<f64>> {
        match *self {
            Self::Continuous => None,
            Self::HotPulse(p) | Self::HotSpike(p) => Some(vec![p.delta_t, p.start, p.duration]),
            Self::RapidAscent(a) => Some(vec![a.drop, a.time]),
            Self::SlowAscent(a) => Some(vec![a.rate, a.start, a.duration]),
        }
    }

    /// Temperature (°C) at elapsed time `t` for a history starting at `start`
    /// and cooling at `rate` under `law`.
    #[must_use]
    pub fn temperature(&self, law: CoolingLaw, start: f64, rate: f64, t: f64) -> f64 {
        let cool = |from: f64, elapsed: f64, rate: f64| law.temperature(from, elapsed, rate);

        match *self {
            Self::Continuous => cool(start, t, rate),

            Self::HotPulse(pulse) => {
                if t < pulse.start || t > pulse.end() {
                    cool(start, t, rate)
                } else {
                    cool(start, pulse.start, rate) + pulse.delta_t
                }
            }

            Self::HotSpike(pulse) => {
                if t < pulse.start || t > pulse.end() {
                    cool(start, t, rate)
                } else {
                    let peak = cool(start, pulse.start, rate) + pulse.delta_t;
                    let after = cool(start, pulse.end(), rate);
                    peak + (after - peak) * ((t - pulse.start) / pulse.duration)
                }
            }

            Self::RapidAscent(ascent) => {
                if t < ascent.time {
                    cool(start, t, rate)
                } else {
                    let landed = cool(start, ascent.time, rate) - ascent.drop;
                    cool(landed, t - ascent.time, rate)
                }
            }

            Self::SlowAscent(ascent) => {
                if t < ascent.start {
                    return cool(start, t, rate);
                }
                let before = cool(start, ascent.start, rate);
                if t <= ascent.end() {
                    cool(before, t - ascent.start, ascent.rate)
                } else {
                    let after = cool(before, ascent.duration, ascent.rate);
                    cool(after, t - ascent.end(), rate)
                }
            }
        }
    }
}

fn expect_params<const K: usize>(
    name: &'static str,
    params: &[f64],
) -> Result<[f64; K], ScenarioError> {
    let values: [f64; K] = params.try_into().map_err(|_| ScenarioError::Arity {
        name,
        expected: K,
        found: params.len(),
    })?;

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ScenarioError::NotFinite { name, index });
    }
    Ok(values)
}

fn check_duration(name: &'static str, duration: f64) -> Result<(), ScenarioError> {
    if duration < 0.0 {
        return Err(ScenarioError::NegativeDuration { name, duration });
    }
    Ok(())
}

/// Serialized form: the scenario name and its parameter list, side by side
/// with the rest of a model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScenarioSpec {
    #[serde(rename = "T_scenario", default = "default_name")]
    name: String,

    #[serde(rename = "scenario_params", default)]
    params: Option<Vec<f64>>,
}

fn default_name() -> String {
    Scenario::Continuous.name().to_string()
}

impl TryFrom<ScenarioSpec> for Scenario {
    type Error = ScenarioError;

    fn try_from(spec: ScenarioSpec) -> Result<Self, Self::Error> {
        Self::from_parts(&spec.name, spec.params.as_deref())
    }
}

impl From<Scenario> for ScenarioSpec {
    fn from(scenario: Scenario) -> Self {
        Self {
            name: scenario.name().to_string(),
            params: scenario.params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const T0: f64 = 1200.0;
    const RATE: f64 = 0.1;

    fn laws() -> [CoolingLaw; 2] {
        [CoolingLaw::Linear, CoolingLaw::Exponential]
    }

    fn pulse() -> Pulse {
        Pulse {
            delta_t: 150.0,
            start: 1000.0,
            duration: 200.0,
        }
    }

    #[test]
    fn continuous_follows_the_law() {
        for law in laws() {
            for t in [0.01, 10.0, 3000.0] {
                assert_eq!(
                    Scenario::Continuous.temperature(law, T0, RATE, t),
                    law.temperature(T0, t, RATE)
                );
            }
        }
    }

    #[test]
    fn continuous_with_zero_rate_is_constant() {
        for t in [0.01, 1.0, 500.0, 3520.0] {
            assert_eq!(Scenario::Continuous.temperature(CoolingLaw::Linear, T0, 0.0, t), T0);
        }
    }

    #[test]
    fn hot_pulse_plateau_and_resumption() {
        let scenario = Scenario::HotPulse(pulse());
        let law = CoolingLaw::Linear;
        let plateau = law.temperature(T0, 1000.0, RATE) + 150.0;

        assert_relative_eq!(scenario.temperature(law, T0, RATE, 999.0), 1100.1);
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1000.0), plateau);
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1100.0), plateau);
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1200.0), plateau);
        // Cooling resumes as if the pulse never happened.
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1201.0), 1079.9);
    }

    #[test]
    fn hot_pulse_entry_jumps_by_delta_t() {
        for law in laws() {
            let scenario = Scenario::HotPulse(pulse());
            let before = scenario.temperature(law, T0, RATE, 1000.0 - 1e-9);
            let at = scenario.temperature(law, T0, RATE, 1000.0);
            assert_relative_eq!(at - before, 150.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn flat_pulse_without_heating_is_continuous() {
        let scenario = Scenario::HotPulse(Pulse {
            delta_t: 0.0,
            ..pulse()
        });
        let law = CoolingLaw::Linear;
        for t in [999.999_f64, 1000.0, 1000.001] {
            let expected = law.temperature(T0, t.min(1000.0), RATE);
            let value = scenario.temperature(law, T0, RATE, t);
            assert_relative_eq!(value, expected, epsilon = 1e-2);
        }
    }

    #[test]
    fn hot_spike_meets_cooling_at_its_end() {
        for law in laws() {
            let scenario = Scenario::HotSpike(pulse());
            let end = 1200.0;

            let inside = scenario.temperature(law, T0, RATE, end);
            let outside = scenario.temperature(law, T0, RATE, end + 1e-9);
            assert_relative_eq!(inside, law.temperature(T0, end, RATE), epsilon = 1e-9);
            assert_relative_eq!(inside, outside, epsilon = 1e-6);

            let peak = scenario.temperature(law, T0, RATE, 1000.0);
            assert_relative_eq!(peak, law.temperature(T0, 1000.0, RATE) + 150.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn hot_spike_interpolates_linearly() {
        let scenario = Scenario::HotSpike(pulse());
        let law = CoolingLaw::Linear;
        let peak = 1100.0 + 150.0;
        let after = 1080.0;

        assert_relative_eq!(
            scenario.temperature(law, T0, RATE, 1050.0),
            peak + (after - peak) * 0.25,
            epsilon = 1e-9
        );
    }

    #[test]
    fn rapid_ascent_drops_by_exactly_delta() {
        for law in laws() {
            let scenario = Scenario::RapidAscent(RapidAscent {
                drop: 80.0,
                time: 1500.0,
            });

            let unperturbed = law.temperature(T0, 1500.0, RATE);
            assert_relative_eq!(
                scenario.temperature(law, T0, RATE, 1500.0),
                unperturbed - 80.0,
                epsilon = 1e-9
            );
            assert_relative_eq!(
                scenario.temperature(law, T0, RATE, 1499.0),
                law.temperature(T0, 1499.0, RATE)
            );
        }
    }

    #[test]
    fn rapid_ascent_restarts_elapsed_time() {
        let scenario = Scenario::RapidAscent(RapidAscent {
            drop: 80.0,
            time: 1500.0,
        });
        let law = CoolingLaw::Linear;

        // 1200 - 150 - 80 = 970, then 100 Myr at 0.1.
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1600.0), 960.0, epsilon = 1e-9);
    }

    #[test]
    fn slow_ascent_is_continuous_at_both_ends() {
        for law in laws() {
            let ascent = SlowAscent {
                rate: 0.5,
                start: 800.0,
                duration: 100.0,
            };
            let scenario = Scenario::SlowAscent(ascent);
            let eps = 1e-9;

            let before = scenario.temperature(law, T0, RATE, ascent.start - eps);
            let entry = scenario.temperature(law, T0, RATE, ascent.start);
            assert_relative_eq!(before, entry, epsilon = 1e-6);

            let exit = scenario.temperature(law, T0, RATE, ascent.end());
            let after = scenario.temperature(law, T0, RATE, ascent.end() + eps);
            assert_relative_eq!(exit, after, epsilon = 1e-6);
        }
    }

    #[test]
    fn slow_ascent_uses_ascent_rate_inside_window() {
        let scenario = Scenario::SlowAscent(SlowAscent {
            rate: 0.5,
            start: 800.0,
            duration: 100.0,
        });
        let law = CoolingLaw::Linear;

        // 1200 - 80 = 1120 at entry; 50 Myr at 0.5 inside; exit at 1070.
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 850.0), 1095.0, epsilon = 1e-9);
        assert_relative_eq!(scenario.temperature(law, T0, RATE, 1000.0), 1060.0, epsilon = 1e-9);
    }

    #[test]
    fn from_parts_builds_each_variant() {
        assert_eq!(Scenario::from_parts("continuous", None), Ok(Scenario::Continuous));
        assert_eq!(
            Scenario::from_parts("continuous", Some(&[])),
            Ok(Scenario::Continuous)
        );
        assert_eq!(
            Scenario::from_parts("hot_pulse", Some(&[150.0, 1000.0, 200.0])),
            Ok(Scenario::HotPulse(pulse()))
        );
        assert_eq!(
            Scenario::from_parts("rapid_ascent", Some(&[80.0, 1500.0])),
            Ok(Scenario::RapidAscent(RapidAscent {
                drop: 80.0,
                time: 1500.0
            }))
        );

        for name in SCENARIO_NAMES {
            let params = match name {
                "continuous" => None,
                "rapid_ascent" => Some(vec![1.0, 2.0]),
                _ => Some(vec![1.0, 2.0, 3.0]),
            };
            let scenario = Scenario::from_parts(name, params.as_deref()).unwrap();
            assert_eq!(scenario.name(), name);
            assert_eq!(scenario.params(), params);
        }
    }

    #[test]
    fn from_parts_rejects_bad_input() {
        assert_eq!(
            Scenario::from_parts("hot_bath", None),
            Err(ScenarioError::UnknownName("hot_bath".into()))
        );
        assert_eq!(
            Scenario::from_parts("hot_pulse", Some(&[1.0, 2.0])),
            Err(ScenarioError::Arity {
                name: "hot_pulse",
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Scenario::from_parts("slow_ascent", None),
            Err(ScenarioError::Arity {
                name: "slow_ascent",
                expected: 3,
                found: 0
            })
        );
        assert_eq!(
            Scenario::from_parts("continuous", Some(&[1.0])),
            Err(ScenarioError::Arity {
                name: "continuous",
                expected: 0,
                found: 1
            })
        );
        assert_eq!(
            Scenario::from_parts("rapid_ascent", Some(&[f64::NAN, 1.0])),
            Err(ScenarioError::NotFinite {
                name: "rapid_ascent",
                index: 0
            })
        );
        assert!(matches!(
            Scenario::from_parts("slow_ascent", Some(&[0.5, 10.0, -1.0])),
            Err(ScenarioError::NegativeDuration { .. })
        ));
        assert_eq!(
            Scenario::from_parts("hot_spike", Some(&[100.0, 10.0, 0.0])),
            Err(ScenarioError::ZeroSpikeDuration)
        );
    }

    #[test]
    fn unknown_name_lists_alternatives() {
        let message = Scenario::from_parts("cold", None).unwrap_err().to_string();
        assert_eq!(
            message,
            "unrecognised scenario `cold`, must be one of \
             continuous, hot_pulse, hot_spike, rapid_ascent, slow_ascent"
        );
    }

    #[test]
    fn serializes_as_name_and_params() {
        let scenario = Scenario::HotPulse(pulse());
        let json = serde_json::to_value(scenario).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "T_scenario": "hot_pulse",
                "scenario_params": [150.0, 1000.0, 200.0]
            })
        );

        let continuous = serde_json::to_value(Scenario::Continuous).unwrap();
        assert_eq!(
            continuous,
            serde_json::json!({ "T_scenario": "continuous", "scenario_params": null })
        );

        let back: Scenario = serde_json::from_value(json).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn deserializing_validates() {
        let result: Result<Scenario, _> =
            serde_json::from_str(r#"{"T_scenario": "hot_pulse", "scenario_params": [1.0]}"#);
        assert!(result.is_err());
    }
}
