//! mclinear Command Line Interface
//!
//! Runs the multiclass linear classification example, and trains, applies
//! and evaluates saved models on dense or LibSVM data files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use mclinear::api::{classifier_multiclass_liblinear, ExampleParams, LibLinear};
use mclinear::core::{ClassifierError, DenseFeatures, Loss, Machine, MulticlassLabels, Result};
use mclinear::data::{self, prepare_data, DataSource, LibSVMDataset, ToyConfig};
use mclinear::evaluation::{ConfusionMatrix, MulticlassAccuracy};
use mclinear::persistence::SerializableModel;
use mclinear::Evaluation;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "mclinear")]
#[command(about = "Multiclass linear SVM classification")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "mclinear contributors")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the classification example on toy data or data files
    Run(RunArgs),
    /// Train a model and save it
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on labelled data
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Dense training features (one sample per line)
    #[arg(long)]
    train: Option<PathBuf>,

    /// Training labels (one per line)
    #[arg(long)]
    train_labels: Option<PathBuf>,

    /// Dense test features
    #[arg(long)]
    test: Option<PathBuf>,

    /// Test labels; when given, accuracy is printed
    #[arg(long)]
    test_labels: Option<PathBuf>,

    /// Seed for the toy data used when no files are given
    #[arg(long, default_value = "17")]
    seed: u64,

    /// Canonical parameter set to start from
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=1))]
    param_set: u8,

    /// Width (accepted, unused by this machine)
    #[arg(long)]
    width: Option<f64>,

    /// Regularization parameter C
    #[arg(short = 'C', long)]
    c: Option<f64>,

    /// Epsilon (accepted, unused by this machine)
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Print predicted labels
    #[arg(long)]
    show_predictions: bool,
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (dense or LibSVM format)
    #[arg(long)]
    data: PathBuf,

    /// Label file for dense training data
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Multiclass strategy
    #[arg(long, value_enum, default_value = "crammer-singer")]
    strategy: CliStrategy,

    /// Binary loss for one-vs-rest and one-vs-one
    #[arg(long, value_enum, default_value = "l2")]
    loss: CliLoss,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Stopping tolerance
    #[arg(short, long, default_value = "0.01")]
    epsilon: f64,

    /// Maximum solver passes
    #[arg(short, long, default_value = "10000")]
    max_iterations: usize,

    /// Do not append a bias feature
    #[arg(long)]
    no_bias: bool,

    /// Seed for the sample visiting order
    #[arg(long, default_value = "1")]
    seed: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum DataFormat {
    /// Choose by file extension
    Auto,
    /// Whitespace separated values, one sample per line
    Dense,
    /// label index:value ...
    Libsvm,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliStrategy {
    /// Direct multiclass SVM
    #[value(name = "crammer-singer")]
    CrammerSinger,
    /// One binary machine per class
    #[value(name = "one-vs-rest")]
    OneVsRest,
    /// One binary machine per class pair
    #[value(name = "one-vs-one")]
    OneVsOne,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliLoss {
    /// Hinge loss
    L1,
    /// Squared hinge loss
    L2,
}

impl From<CliLoss> for Loss {
    fn from(cli_loss: CliLoss) -> Self {
        match cli_loss {
            CliLoss::L1 => Loss::L1,
            CliLoss::L2 => Loss::L2,
        }
    }
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// Label file for dense test data
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Show the confusion matrix and per-class metrics
    #[arg(long)]
    detailed: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        None => default_command(),
        Some(Commands::Run(args)) => run_command(args),
        Some(Commands::Train(args)) => train_command(args),
        Some(Commands::Predict(args)) => predict_command(args),
        Some(Commands::Evaluate(args)) => evaluate_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

/// The example with its first parameter set on toy data
fn default_command() -> Result<()> {
    println!("MulticlassLibLinear");
    let data = prepare_data(&DataSource::default())?;
    classifier_multiclass_liblinear(
        &data.train_features,
        &data.test_features,
        data.train_labels.as_slice(),
        data.test_labels.as_ref().map(|l| l.as_slice()),
        &ExampleParams::default(),
    )?;
    Ok(())
}

fn run_command(args: RunArgs) -> Result<()> {
    let source = match (args.train, args.train_labels, args.test) {
        (Some(train), Some(train_labels), Some(test)) => DataSource::Files {
            train,
            train_labels,
            test,
            test_labels: args.test_labels,
        },
        (None, None, None) => {
            if args.test_labels.is_some() {
                warn!("--test-labels ignored without --train/--test files");
            }
            DataSource::Toy(ToyConfig {
                seed: args.seed,
                ..ToyConfig::default()
            })
        }
        _ => {
            return Err(ClassifierError::InvalidParameter(
                "--train, --train-labels and --test must be given together".to_string(),
            ))
        }
    };

    let mut params = ExampleParams::parameter_list()[usize::from(args.param_set)];
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(c) = args.c {
        params.c = c;
    }
    if let Some(epsilon) = args.epsilon {
        params.epsilon = epsilon;
    }
    info!(
        "Parameters: width={}, C={}, epsilon={}",
        params.width, params.c, params.epsilon
    );

    println!("MulticlassLibLinear");
    let data = prepare_data(&source)?;
    let predicted = classifier_multiclass_liblinear(
        &data.train_features,
        &data.test_features,
        data.train_labels.as_slice(),
        data.test_labels.as_ref().map(|l| l.as_slice()),
        &params,
    )?;

    if args.show_predictions {
        for (i, label) in predicted.as_slice().iter().enumerate() {
            println!("{i} {label:.0}");
        }
    }

    Ok(())
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training model...");
    info!("Data file: {:?}", args.data);
    info!(
        "Parameters: C={}, epsilon={}, max_iter={}",
        args.c, args.epsilon, args.max_iterations
    );

    let (features, labels) = load_labelled(&args.data, args.labels.as_deref(), args.format, None)?;
    info!(
        "Loaded {} samples with {} dimensions",
        features.n_samples(),
        features.n_dims()
    );

    let builder = match args.strategy {
        CliStrategy::CrammerSinger => LibLinear::new(),
        CliStrategy::OneVsRest => LibLinear::one_vs_rest(args.loss.into()),
        CliStrategy::OneVsOne => LibLinear::one_vs_one(args.loss.into()),
    };
    let machine = builder
        .with_c(args.c)
        .with_epsilon(args.epsilon)
        .with_max_iterations(args.max_iterations)
        .with_bias(if args.no_bias { None } else { Some(1.0) })
        .with_seed(args.seed)
        .train(&features, labels.clone())?;

    info!("Training completed successfully");

    let serializable = SerializableModel::from_machine(&machine)?;
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    // Quick evaluation on training data
    let predicted = machine.apply(&features)?;
    let accuracy = MulticlassAccuracy::new().evaluate(&predicted, &labels)?;
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?.into_trained_model();

    info!("Loading prediction data from: {:?}", args.data);
    let features = load_unlabelled(&args.data, args.format, model.n_dims)?;
    let predictions = model.predict(&features)?;

    // Output results
    if let Some(output_path) = args.output {
        let file = File::create(&output_path).map_err(ClassifierError::IoError)?;
        let mut writer = BufWriter::new(file);
        write_predictions(&mut writer, predictions.as_slice())?;
        info!("Predictions saved to: {output_path:?}");
    } else {
        let stdout = std::io::stdout();
        write_predictions(&mut stdout.lock(), predictions.as_slice())?;
    }

    Ok(())
}

fn write_predictions<W: Write>(writer: &mut W, predictions: &[f64]) -> Result<()> {
    writeln!(writer, "# Predictions for {} samples", predictions.len())?;
    writeln!(writer, "# Format: sample_index predicted_label")?;
    for (i, label) in predictions.iter().enumerate() {
        writeln!(writer, "{i} {label:.0}")?;
    }
    writer.flush()?;
    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable = SerializableModel::load_from_file(&args.model)?;

    info!("Loading test data from: {:?}", args.data);
    let (features, labels) = load_labelled(
        &args.data,
        args.labels.as_deref(),
        args.format,
        Some(serializable.model.n_dims),
    )?;

    let predicted = serializable.model.predict(&features)?;
    let accuracy = MulticlassAccuracy::new().evaluate(&predicted, &labels)?;

    println!("Accuracy = {accuracy:.4}");

    if args.detailed {
        serializable.print_summary();
        let matrix = ConfusionMatrix::new(&predicted, &labels)?;
        println!("\nConfusion Matrix (rows: true, columns: predicted):");
        for (t, row) in matrix.counts.iter().enumerate() {
            let counts: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            println!("  {:>6}: {}", matrix.classes[t], counts.join(" "));
        }
        println!("\nPer-class Metrics:");
        for (m, class) in matrix.classes.iter().enumerate() {
            println!(
                "  {:>6}: precision {:.4}  recall {:.4}  f1 {:.4}",
                class,
                matrix.precision(m),
                matrix.recall(m),
                matrix.f1_score(m)
            );
        }
    }

    Ok(())
}

/// Features and labels from a LibSVM file, or a dense file plus label file
///
/// With `model_dims`, LibSVM rows are shaped to the dimensionality of a
/// trained model.
fn load_labelled(
    path: &Path,
    labels: Option<&Path>,
    format: DataFormat,
    model_dims: Option<usize>,
) -> Result<(DenseFeatures, MulticlassLabels)> {
    match resolve_format(path, format) {
        DataFormat::Libsvm => {
            let dataset = read_libsvm(path, model_dims)?;
            Ok((dataset.features, dataset.labels))
        }
        _ => {
            let labels = labels.ok_or_else(|| {
                ClassifierError::InvalidParameter(
                    "--labels is required for dense data files".to_string(),
                )
            })?;
            Ok((data::load_features(path)?, data::load_labels(labels)?))
        }
    }
}

fn load_unlabelled(path: &Path, format: DataFormat, model_dims: usize) -> Result<DenseFeatures> {
    match resolve_format(path, format) {
        DataFormat::Libsvm => Ok(read_libsvm(path, Some(model_dims))?.features),
        _ => data::load_features(path),
    }
}

fn read_libsvm(path: &Path, model_dims: Option<usize>) -> Result<LibSVMDataset> {
    let reader = BufReader::new(File::open(path).map_err(ClassifierError::IoError)?);
    match model_dims {
        Some(n_dims) => LibSVMDataset::from_reader_for_model(reader, n_dims),
        None => LibSVMDataset::from_reader(reader),
    }
}

fn resolve_format(path: &Path, format: DataFormat) -> DataFormat {
    if format == DataFormat::Auto {
        detect_format(path)
    } else {
        format
    }
}

fn detect_format(path: &Path) -> DataFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("libsvm") | Some("svm") => DataFormat::Libsvm,
        Some("dat") | Some("txt") => DataFormat::Dense,
        Some(_) => {
            warn!("Unknown file extension, assuming dense format");
            DataFormat::Dense
        }
        None => {
            warn!("No file extension, assuming dense format");
            DataFormat::Dense
        }
    }
}
