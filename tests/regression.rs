//! End-to-end regression training scenarios.

use ndarray::{Array1, Array2};
use stagewise::{
    cross_validate, BoostConfig, Dataset, GradientBoostingRegressor, KFold, Metric, RSquared,
};

/// 100 rows, 1 feature, y = 3x.
fn linear_dataset() -> Dataset {
    let features = Array2::from_shape_fn((100, 1), |(i, _)| i as f64 / 100.0);
    let labels = Array1::from_shape_fn(100, |i| 3.0 * i as f64 / 100.0);
    Dataset::new(features, labels).unwrap()
}

#[test]
fn linear_target_converges_with_hold_out() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = BoostConfig::builder()
        .n_estimators(50)
        .learning_rate(0.1)
        .hold_out(0.2)
        .min_change(0.0)
        .subsample_ratio(1.0)
        .random_seed(13)
        .build()
        .unwrap();

    let dataset = linear_dataset();
    let mut model = GradientBoostingRegressor::new(config).unwrap();
    model.fit(&dataset).unwrap();

    let history = model.training_history().unwrap();

    // Training loss strictly decreases over the first several epochs.
    assert!(history.losses.len() >= 5);
    for window in history.losses[..5].windows(2) {
        assert!(
            window[1].1 < window[0].1,
            "loss should strictly decrease early: {:?}",
            &history.losses[..5]
        );
    }

    // Final validation score approaches the metric's best value.
    let (_, final_score) = *history.scores.last().unwrap();
    assert!(
        final_score > 0.9,
        "final validation R² was {}",
        final_score
    );

    // Held-out predictions track the linear target closely.
    let predictions = model.predict(&dataset).unwrap();
    let score = RSquared
        .score(&predictions.view(), &dataset.labels().unwrap())
        .unwrap();
    assert!(score > 0.9, "full-dataset R² was {}", score);
}

#[test]
fn ensemble_length_bounded_by_estimators() {
    let config = BoostConfig::builder()
        .n_estimators(15)
        .hold_out(0.2)
        .min_change(0.0)
        .build()
        .unwrap();
    let mut model = GradientBoostingRegressor::new(config).unwrap();
    model.fit(&linear_dataset()).unwrap();

    assert!(model.ensemble_size() >= 1);
    assert!(model.ensemble_size() <= 15);
}

#[test]
fn rollback_keeps_best_validated_prefix() {
    let config = BoostConfig::builder()
        .n_estimators(60)
        .hold_out(0.25)
        .window(4)
        .min_change(0.0)
        .subsample_ratio(0.6)
        .random_seed(29)
        .build()
        .unwrap();
    let mut model = GradientBoostingRegressor::new(config).unwrap();
    model.fit(&linear_dataset()).unwrap();

    let history = model.training_history().unwrap();
    let metric = RSquared;
    let best = history
        .scores
        .iter()
        .map(|&(_, s)| s)
        .fold(metric.worst_value(), |acc, s| if metric.is_better(s, acc) { s } else { acc });
    let (_, last) = *history.scores.last().unwrap();

    if metric.is_better(last, best) {
        assert_eq!(model.ensemble_size(), history.losses.len());
    } else {
        assert_eq!(model.ensemble_size(), history.best_epoch);
    }
}

#[test]
fn importances_concentrate_on_informative_feature() {
    // feature 0 drives the target, feature 1 is noise-free constant
    let features = Array2::from_shape_fn((80, 2), |(i, j)| {
        if j == 0 {
            i as f64
        } else {
            0.5
        }
    });
    let labels = Array1::from_shape_fn(80, |i| (i as f64).powi(2) / 80.0);
    let dataset = Dataset::new(features, labels).unwrap();

    let config = BoostConfig::builder()
        .n_estimators(20)
        .hold_out(0.0)
        .min_change(0.0)
        .subsample_ratio(1.0)
        .build()
        .unwrap();
    let mut model = GradientBoostingRegressor::new(config).unwrap();
    model.fit(&dataset).unwrap();

    let importances = model.feature_importances().unwrap();
    assert_eq!(importances.len(), 2);
    assert!(importances.iter().all(|&v| v.is_finite() && v >= 0.0));
    assert!(
        importances[0] > importances[1],
        "importances were {:?}",
        importances
    );
}

#[test]
fn configuration_errors_fail_fast() {
    assert!(BoostConfig::builder().learning_rate(0.0).build().is_err());
    assert!(BoostConfig::builder().learning_rate(1.5).build().is_err());

    let mut bad = BoostConfig::default();
    bad.learning_rate = -0.1;
    assert!(GradientBoostingRegressor::new(bad).is_err());
}

#[test]
fn predict_before_fit_is_not_trained() {
    let model = GradientBoostingRegressor::default();
    let input = Dataset::unlabeled(Array2::zeros((3, 1)));
    let err = model.predict(&input).unwrap_err();
    assert!(format!("{}", err).contains("not trained"));
}

#[test]
fn train_on_empty_dataset_is_precondition_error() {
    let empty = Dataset::new(Array2::zeros((0, 1)), Array1::zeros(0)).unwrap();
    let mut model = GradientBoostingRegressor::default();
    assert!(model.fit(&empty).is_err());
}

#[test]
fn cross_validation_on_linear_target() {
    let config = BoostConfig::builder()
        .n_estimators(25)
        .learning_rate(0.2)
        .hold_out(0.0)
        .min_change(0.0)
        .subsample_ratio(1.0)
        .build()
        .unwrap();
    let kfold = KFold::new(5).unwrap().with_shuffle(3);

    let result = cross_validate(&config, &linear_dataset(), &kfold, &RSquared).unwrap();
    assert_eq!(result.fold_scores.len(), 5);
    assert!(
        result.mean() > 0.8,
        "cross-validated mean R² was {}",
        result.mean()
    );
}
