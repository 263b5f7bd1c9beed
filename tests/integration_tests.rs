//! Integration tests for the mclinear library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use mclinear::api::{classifier_multiclass_liblinear_to, ExampleParams, LibLinear};
use mclinear::data::{prepare_data, DataSource, ToyConfig};
use mclinear::persistence::SerializableModel;
use mclinear::{
    DenseFeatures, Evaluation, Loss, Machine, MulticlassAccuracy, MulticlassLabels,
};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

fn run_example(
    data: &mclinear::PreparedData,
    params: &ExampleParams,
) -> (MulticlassLabels, String) {
    let mut out = Vec::new();
    let predicted = classifier_multiclass_liblinear_to(
        &mut out,
        &data.train_features,
        &data.test_features,
        data.train_labels.as_slice(),
        data.test_labels.as_ref().map(|l| l.as_slice()),
        params,
    )
    .expect("Example should succeed");
    (predicted, String::from_utf8(out).expect("Output should be UTF-8"))
}

fn parse_accuracy(line: &str) -> f64 {
    line.trim()
        .strip_prefix("Accuracy = ")
        .expect("Accuracy line prefix")
        .parse()
        .expect("Accuracy value")
}

/// Test complete workflow: toy data -> training -> prediction -> accuracy line
#[test]
fn test_complete_workflow_toy_data() {
    let data = prepare_data(&DataSource::default()).expect("Toy data should be generated");

    let (predicted, output) = run_example(&data, &ExampleParams::default());

    assert_eq!(predicted.len(), data.test_features.n_samples());
    let accuracy = parse_accuracy(&output);
    assert!(
        accuracy >= 0.9,
        "Accuracy should be high on well separated blobs, got: {}",
        accuracy
    );
    // four decimal places
    assert_eq!(output.trim().len(), "Accuracy = 0.0000".len());
}

/// Perfectly separable classes are recovered exactly
#[test]
fn test_perfectly_separable_dataset() {
    let config = ToyConfig {
        n_classes: 4,
        spread: 0.2,
        separation: 5.0,
        n_train_per_class: 10,
        n_test_per_class: 10,
        seed: 3,
        ..ToyConfig::default()
    };
    let data = prepare_data(&DataSource::Toy(config)).unwrap();

    let (predicted, output) = run_example(&data, &ExampleParams::default());

    let truth = data.test_labels.as_ref().unwrap();
    assert_eq!(&predicted, truth);
    assert_eq!(output, "Accuracy = 1.0000\n");
}

/// Both canonical parameter sets run and return one label per test sample
#[test]
fn test_both_parameter_sets() {
    let data = prepare_data(&DataSource::default()).unwrap();

    for params in ExampleParams::parameter_list() {
        let (predicted, output) = run_example(&data, &params);
        assert_eq!(predicted.len(), data.test_features.n_samples());
        assert!(output.starts_with("Accuracy = "));
    }
}

/// Omitting test labels prints nothing and still predicts
#[test]
fn test_without_test_labels() {
    let mut data = prepare_data(&DataSource::default()).unwrap();
    data.test_labels = None;

    let (predicted, output) = run_example(&data, &ExampleParams::default());

    assert_eq!(predicted.len(), data.test_features.n_samples());
    assert!(output.is_empty());
}

/// Accuracy stays within [0, 1] even on heavily overlapping classes
#[test]
fn test_accuracy_bounds_on_noisy_data() {
    for seed in [1, 2, 3] {
        let config = ToyConfig {
            spread: 4.0,
            separation: 1.0,
            seed,
            ..ToyConfig::default()
        };
        let data = prepare_data(&DataSource::Toy(config)).unwrap();

        let (_, output) = run_example(&data, &ExampleParams::default());
        let accuracy = parse_accuracy(&output);
        assert!((0.0..=1.0).contains(&accuracy), "accuracy {}", accuracy);
    }
}

/// Predicted labels are always drawn from the training classes
#[test]
fn test_predictions_use_training_classes() {
    let data = prepare_data(&DataSource::default()).unwrap();
    let classes = data.train_labels.classes();

    let (predicted, _) = run_example(&data, &ExampleParams::default());
    assert!(predicted.as_slice().iter().all(|l| classes.contains(l)));
}

fn write_lines(dir: &Path, name: &str, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create file");
    for line in lines {
        writeln!(file, "{line}").expect("Failed to write");
    }
    path
}

/// Dense files flow through prepare_data into the example
#[test]
fn test_file_workflow() {
    let (train, test) =
        mclinear::data::generate_blobs(&ToyConfig::default()).expect("Blobs should generate");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let rows = |features: &DenseFeatures| -> Vec<String> {
        features
            .rows()
            .map(|r| {
                r.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    };
    let labels = |labels: &MulticlassLabels| -> Vec<String> {
        labels.as_slice().iter().map(|l| l.to_string()).collect()
    };

    let source = DataSource::Files {
        train: write_lines(temp_dir.path(), "fm_train_real.dat", &rows(&train.0)),
        train_labels: write_lines(temp_dir.path(), "label_train.dat", &labels(&train.1)),
        test: write_lines(temp_dir.path(), "fm_test_real.dat", &rows(&test.0)),
        test_labels: Some(write_lines(
            temp_dir.path(),
            "label_test.dat",
            &labels(&test.1),
        )),
    };
    let from_files = prepare_data(&source).expect("Files should load");
    assert_eq!(from_files.train_features, train.0);

    let (predicted, output) = run_example(&from_files, &ExampleParams::default());
    assert_eq!(predicted.len(), test.0.n_samples());
    assert!(parse_accuracy(&output) >= 0.9);
}

/// All strategies reach high accuracy on the toy data
#[test]
fn test_strategy_comparison() {
    let data = prepare_data(&DataSource::default()).unwrap();
    let truth = data.test_labels.clone().unwrap();

    let builders = [
        LibLinear::new(),
        LibLinear::one_vs_rest(Loss::L2),
        LibLinear::one_vs_rest(Loss::L1),
        LibLinear::one_vs_one(Loss::L2),
    ];

    for builder in builders {
        let name = builder.config().name();
        let machine = builder
            .with_c(1.0)
            .train(&data.train_features, data.train_labels.clone())
            .expect("Training should succeed");

        let predicted = machine.apply(&data.test_features).unwrap();
        let accuracy = MulticlassAccuracy::new().evaluate(&predicted, &truth).unwrap();
        assert!(accuracy >= 0.9, "{} accuracy {}", name, accuracy);
    }
}

/// Various C values all train and predict
#[test]
fn test_parameter_sensitivity() {
    let data = prepare_data(&DataSource::default()).unwrap();

    for &c in &[0.01, 0.1, 1.0, 10.0] {
        let machine = LibLinear::new()
            .with_c(c)
            .train(&data.train_features, data.train_labels.clone())
            .unwrap_or_else(|e| panic!("Training with C={} should succeed: {}", c, e));

        let predicted = machine.apply(&data.test_features).unwrap();
        assert_eq!(predicted.len(), data.test_features.n_samples());
    }
}

/// Error conditions surface as errors instead of panics
#[test]
fn test_error_conditions() {
    let data = prepare_data(&DataSource::default()).unwrap();
    let mut out = Vec::new();

    // Labels shorter than the training set
    let result = classifier_multiclass_liblinear_to(
        &mut out,
        &data.train_features,
        &data.test_features,
        &data.train_labels.as_slice()[..5],
        None,
        &ExampleParams::default(),
    );
    assert!(result.is_err());

    // Test features with a different dimensionality
    let wide = DenseFeatures::from_rows(vec![vec![0.0, 0.0, 0.0]]).unwrap();
    let result = classifier_multiclass_liblinear_to(
        &mut out,
        &data.train_features,
        &wide,
        data.train_labels.as_slice(),
        None,
        &ExampleParams::default(),
    );
    assert!(result.is_err());

    // Test labels that do not match the test set size
    let result = classifier_multiclass_liblinear_to(
        &mut out,
        &data.train_features,
        &data.test_features,
        data.train_labels.as_slice(),
        Some([0.0, 1.0].as_slice()),
        &ExampleParams::default(),
    );
    assert!(result.is_err());

    // Negative C
    let params = ExampleParams {
        c: -1.0,
        ..ExampleParams::default()
    };
    let result = classifier_multiclass_liblinear_to(
        &mut out,
        &data.train_features,
        &data.test_features,
        data.train_labels.as_slice(),
        None,
        &params,
    );
    assert!(result.is_err());

    assert!(out.is_empty());
}

/// A saved model predicts exactly like the machine it came from
#[test]
fn test_model_persistence_workflow() {
    let data = prepare_data(&DataSource::default()).unwrap();
    let machine = LibLinear::one_vs_rest(Loss::L2)
        .train(&data.train_features, data.train_labels.clone())
        .unwrap();

    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    SerializableModel::from_machine(&machine)
        .unwrap()
        .save_to_file(temp_file.path())
        .unwrap();

    let model = SerializableModel::load_from_file(temp_file.path())
        .unwrap()
        .into_trained_model();
    assert_eq!(
        model.predict(&data.test_features).unwrap(),
        machine.apply(&data.test_features).unwrap()
    );
}
