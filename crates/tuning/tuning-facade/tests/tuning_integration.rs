//! Integration tests for the tuning facade

use rand::rngs::StdRng;
use rand::SeedableRng;
use tuning_facade::prelude::*;
use tuning_facade::{
    AcquisitionOptimizer, FoldOutcome, GaussianProcess, ParamKind, RandomGridSampler,
    RollingOriginEvaluator,
};

const WEEK: i64 = 604_800;

fn weekly_counts() -> TimeSeries {
    let counts: Vec<(i64, u64)> = [5, 6, 5, 7, 8, 9]
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as i64 * WEEK, c))
        .collect();
    TimeSeries::from_counts(&counts).unwrap()
}

#[test]
fn test_naive_weekly_counts_score() {
    let series = weekly_counts();
    let schedule = FoldSchedule::trailing(&series, 3, None).unwrap();
    assert_eq!(schedule.cutoffs(), &[3 * WEEK, 4 * WEEK, 5 * WEEK]);

    let evaluator = RollingOriginEvaluator::default();
    let score = evaluator.evaluate(&NaiveForecast, &Hyperparameters::new(), &series, &schedule);
    let expected = -(2.0 / 7.0 + 1.0 / 8.0 + 1.0 / 9.0) / 3.0;
    assert!((score.value() - expected).abs() < 1e-9);
    assert!((score.value() + 0.173_942).abs() < 1e-6);

    let folds = evaluator.evaluate_folds(&NaiveForecast, &Hyperparameters::new(), &series, &schedule);
    assert_eq!(folds.len(), 3);
    assert!(folds.iter().all(|f| matches!(f, FoldOutcome::Scored { .. })));
}

#[test]
fn test_schedule_before_data_is_unscorable() {
    let series = weekly_counts();
    let schedule = FoldSchedule::new(vec![-3 * WEEK, -2 * WEEK, -WEEK]).unwrap();
    let score = RollingOriginEvaluator::default().evaluate(
        &NaiveForecast,
        &Hyperparameters::new(),
        &series,
        &schedule,
    );
    assert_eq!(score, Score::Unscorable);
}

#[test]
fn test_space_from_samples_with_margin_and_floor() {
    let specs = vec![DimensionSpec::continuous("scale", 0.0, 1.0)];
    let samples = vec![
        Hyperparameters::new().with_param("scale", 0.01),
        Hyperparameters::new().with_param("scale", 0.05),
        Hyperparameters::new().with_param("scale", 0.08),
    ];

    let open = HyperparameterSpace::from_samples(&specs, &samples, 0.2).unwrap();
    let dim = &open.dimensions()[0];
    assert!((dim.lo + 0.004).abs() < 1e-12);
    assert!((dim.hi - 0.094).abs() < 1e-12);

    let floored = vec![specs[0].clone().with_floor(0.0)];
    let clipped = HyperparameterSpace::from_samples(&floored, &samples, 0.2).unwrap();
    assert_eq!(clipped.dimensions()[0].lo, 0.0);
}

#[test]
fn test_surrogate_and_acquisition_pipeline() {
    let series = weekly_counts();
    let schedule = FoldSchedule::trailing(&series, 2, None).unwrap();
    let specs = vec![DimensionSpec::integer("window", 1, 4).with_floor(1.0)];
    let mut rng = StdRng::seed_from_u64(11);

    let seeds = RandomGridSampler::new().sample_and_evaluate(
        8,
        &specs,
        &mut rng,
        &RollingOriginEvaluator::default(),
        &MovingAverageForecast,
        &series,
        &schedule,
    );
    assert_eq!(seeds.len(), 8);
    assert!(seeds.rows().iter().all(|r| r.phase == Phase::Seed));

    let params: Vec<Hyperparameters> = seeds.rows().iter().map(|r| r.params.clone()).collect();
    let space = HyperparameterSpace::from_samples(&specs, &params, 0.2).unwrap();
    assert_eq!(space.dimensions()[0].kind, ParamKind::Integer);

    let surrogate = GaussianProcess::default().fit(&seeds, &space).unwrap();
    assert_eq!(surrogate.n_observations(), 8);

    let proposal = AcquisitionOptimizer::default()
        .propose(&surrogate, &space, 0.1, &mut rng)
        .unwrap();
    let window = proposal.get("window").unwrap();
    assert_eq!(window, window.round());
    assert!(space.check(&proposal).is_ok());
}

#[test]
fn test_failing_model_never_aborts_run() {
    struct AlwaysFails;

    impl ForecastModel for AlwaysFails {
        fn fit(
            &self,
            _series: &TimeSeries,
            _params: &Hyperparameters,
        ) -> std::result::Result<Box<dyn FittedModel>, ModelFitError> {
            Err(ModelFitError::new("singular"))
        }

        fn name(&self) -> &str {
            "always-fails"
        }
    }

    let config = TunerBuilder::new()
        .add_continuous("x", 0.0, 1.0)
        .seed_candidates(4)
        .iterations(3)
        .acquisition_samples(50)
        .build()
        .unwrap();
    let outcome = Tuner::new(config).unwrap().run(&AlwaysFails, &weekly_counts()).unwrap();

    assert_eq!(outcome.candidates.len(), 7);
    assert!(outcome.candidates.rows().iter().all(|r| r.score == Score::Unscorable));
    assert_eq!(outcome.improvement, None);
}

#[test]
fn test_builder_rejects_invalid_setup() {
    assert!(TunerBuilder::new().build().is_err());
    assert!(TunerBuilder::new()
        .add_continuous("alpha", 0.1, 0.9)
        .add_continuous("alpha", 0.2, 0.3)
        .build()
        .is_err());
    assert!(TunerBuilder::new()
        .add_continuous("alpha", 0.1, 0.9)
        .kappa(-1.0)
        .build()
        .is_err());
}
