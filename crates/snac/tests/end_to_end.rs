use approx::assert_relative_eq;

use snac::{
    AggregationModel, CoolingLaw, CoolingParams, ParameterSource, Sample, Scenario, Simulation,
    ThermalHistoryConfig, ThermalZone,
    checkpoints::CheckpointsError,
    config::ConfigError,
    fit, persist,
    scenario::{Pulse, RapidAscent, ScenarioError, SlowAscent},
};

#[test]
fn reference_diamond_fit_converges_and_improves() {
    let sample = Sample::default();
    let config = ThermalHistoryConfig::default();
    let mut model = AggregationModel::new(sample, config).unwrap();

    let initial_error = model.initial_error();
    let result = model.run().unwrap().clone();

    assert!(result.success, "{}", result.message);
    assert_eq!(result.status, 0);
    assert!(result.error < initial_error);
    assert!((1000.0..=1450.0).contains(&result.start_temperature));
    assert!((0.001..=0.12).contains(&result.cooling_rate));

    let history = model.history();
    assert_eq!(history.params(), result.params());
    assert_eq!(history.len(), 3521);
}

#[test]
fn every_scenario_fits_without_error() {
    let scenarios = [
        Scenario::Continuous,
        Scenario::HotPulse(Pulse {
            delta_t: 80.0,
            start: 2000.0,
            duration: 100.0,
        }),
        Scenario::HotSpike(Pulse {
            delta_t: 80.0,
            start: 2000.0,
            duration: 100.0,
        }),
        Scenario::RapidAscent(RapidAscent {
            drop: 150.0,
            time: 3000.0,
        }),
        Scenario::SlowAscent(SlowAscent {
            rate: 0.1,
            start: 2500.0,
            duration: 500.0,
        }),
    ];

    for scenario in scenarios {
        for law in [CoolingLaw::Linear, CoolingLaw::Exponential] {
            let config = ThermalHistoryConfig::default()
                .with_dt(40.0)
                .with_scenario(scenario)
                .with_cooling_law(law);
            let simulation = Simulation::from_config(&Sample::default(), &config).unwrap();

            let result = fit(&Sample::default(), &config).unwrap();
            assert!(
                result.error <= simulation.error(config.initial_guess()),
                "{scenario} with {law} cooling got worse"
            );
        }
    }
}

#[test]
fn zero_rate_holds_start_temperature() {
    let config = ThermalHistoryConfig::default().with_dt(10.0);
    let simulation = Simulation::from_config(&Sample::default(), &config).unwrap();
    let trace = simulation.trace(CoolingParams::new(1150.0, 0.0));

    assert!(trace.rows().iter().all(|row| row.temperature == 1150.0));
}

#[test]
fn aggregation_only_moves_towards_b_centres() {
    let config = ThermalHistoryConfig::default().with_dt(5.0);
    let simulation = Simulation::from_config(&Sample::default(), &config).unwrap();
    let trace = simulation.trace(CoolingParams::new(1300.0, 0.05));

    for pair in trace.rows().windows(2) {
        assert!(pair[1].core_a <= pair[0].core_a);
        assert!(pair[1].rim_a <= pair[0].rim_a);
        assert!(pair[1].core_b >= 0.0 && pair[1].rim_b >= 0.0);
    }
}

#[test]
fn coeval_rim_tracks_core() {
    let zone = ThermalZone::new(700.0, 0.5, 2500.0).unwrap();
    let sample = Sample::new(zone, zone, 90.0).unwrap();
    let config = ThermalHistoryConfig::default().with_dt(10.0);
    let simulation = Simulation::from_config(&sample, &config).unwrap();

    for row in simulation.trace(CoolingParams::new(1250.0, 0.03)).rows() {
        assert_eq!(row.core_a, row.rim_a);
    }
}

#[test]
fn error_vanishes_for_a_self_consistent_sample() {
    let config = ThermalHistoryConfig::default().with_dt(10.0);
    let params = CoolingParams::new(1180.0, 0.02);
    let reference = Simulation::from_config(&Sample::default(), &config).unwrap();
    let final_row = *reference.trace(params).final_row().unwrap();

    let observed = Sample::default();
    let core_n = observed.core().nitrogen_ppm();
    let rim_n = observed.rim().nitrogen_ppm();
    let synthetic = Sample::new(
        ThermalZone::new(core_n, final_row.core_b / core_n, observed.core().age()).unwrap(),
        ThermalZone::new(rim_n, final_row.rim_b / rim_n, observed.rim().age()).unwrap(),
        observed.eruption_age(),
    )
    .unwrap();
    let simulation = Simulation::from_config(&synthetic, &config).unwrap();

    assert_relative_eq!(simulation.error(params), 0.0, epsilon = 1e-20);
    assert!(simulation.error(CoolingParams::new(1190.0, 0.02)) > 0.0);
}

#[test]
fn invalid_scenario_fails_before_simulating() {
    assert_eq!(
        Scenario::from_parts("lukewarm", Some(&[1.0][..])),
        Err(ScenarioError::UnknownName("lukewarm".into()))
    );

    let json = r#"{
        "diamond": {
            "age_core": 3520, "age_rim": 1860, "age_kimberlite": 0,
            "c_NT": 625, "c_agg": 0.863, "r_NT": 801, "r_agg": 0.197
        },
        "cooling_rate0": 0.01, "T_start0": 1200,
        "rate_bounds": [0.001, 0.12], "T_bounds": [1000, 1450], "dt": 1,
        "T_scenario": "hot_spike", "scenario_params": [100, 1500]
    }"#;
    assert!(persist::read_model(json.as_bytes(), None).is_err());
}

#[test]
fn excessively_fine_time_step_is_an_error() {
    for dt in [1e-4, 1e-300] {
        let config = ThermalHistoryConfig::default().with_dt(dt);
        assert!(matches!(
            AggregationModel::new(Sample::default(), config),
            Err(ConfigError::Checkpoints(CheckpointsError::TooMany(_)))
        ));
    }
}

#[test]
fn fitted_model_survives_a_round_trip() {
    let config = ThermalHistoryConfig::default()
        .with_dt(20.0)
        .with_scenario(Scenario::RapidAscent(RapidAscent {
            drop: 100.0,
            time: 3000.0,
        }));
    let mut model = AggregationModel::new(Sample::default(), config).unwrap();
    model.run().unwrap();

    let mut buffer = Vec::new();
    persist::write_model(&model, &mut buffer).unwrap();
    let back = persist::read_model(buffer.as_slice(), None).unwrap();

    assert_eq!(back.sample(), model.sample());
    assert_eq!(back.config(), model.config());
    assert_eq!(
        back.parameters_for(ParameterSource::Fitted),
        model.parameters_for(ParameterSource::Fitted)
    );
    assert_eq!(back.fit().unwrap().error, model.fit().unwrap().error);
    assert_eq!(back.history(), model.history());
}
