use clap::Parser;
use log::{error, info};
use perceptron::activator::Activator;
use perceptron::mnist::MnistReader;
use perceptron::network::Network;
use perceptron::trainer::{LearningRate, Logging, StopCondition, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process;

/// Trains a perceptron on an IDX image/label corpus.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Training images (idx3-ubyte)
    #[arg(long)]
    images: PathBuf,
    /// Training labels (idx1-ubyte)
    #[arg(long)]
    labels: PathBuf,
    /// Layer sizes; the first must match the image size
    #[arg(long, value_delimiter = ',', default_value = "784,100,100,10")]
    shape: Vec<usize>,
    /// sigmoid, relu or softplus (inference only)
    #[arg(long, default_value = "sigmoid")]
    activator: Activator,
    #[arg(long, default_value_t = 1)]
    batch_size: usize,
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,
    /// Decay the learning rate as `rate / (1 + decay * batch)`
    #[arg(long)]
    decay: Option<f64>,
    /// Stop after this many batches instead of a full pass
    #[arg(long)]
    iterations: Option<usize>,
    /// Seed for parameter initialization; random when absent
    #[arg(long)]
    seed: Option<u64>,
    /// Continue from a saved model instead of random parameters
    #[arg(long)]
    import: Option<PathBuf>,
    /// Where to save the trained model
    #[arg(long)]
    export: Option<PathBuf>,
    /// Test images for evaluation after training
    #[arg(long, requires = "test_labels")]
    test_images: Option<PathBuf>,
    #[arg(long, requires = "test_images")]
    test_labels: Option<PathBuf>,
    /// Number of test samples to evaluate; all when absent
    #[arg(long)]
    evaluate: Option<usize>,
    /// Log progress every N batches
    #[arg(long)]
    log_every: Option<usize>,
}

fn run(cli: Cli) -> perceptron::Result<()> {
    let mut reader = MnistReader::open(&cli.images, &cli.labels)?;
    info!(
        "corpus: {} images of {}x{}",
        reader.len(),
        reader.rows(),
        reader.columns()
    );

    let mut network = Network::new(&cli.shape, cli.activator)?;
    match &cli.import {
        Some(path) => {
            network.import(path)?;
            info!("imported parameters from {}", path.display());
        }
        None => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            network.randomize(&mut rng);
        }
    }

    let learning_rate = match cli.decay {
        Some(decay) => LearningRate::Decay {
            initial: cli.learning_rate,
            decay,
        },
        None => LearningRate::Constant(cli.learning_rate),
    };
    let stop_condition = match cli.iterations {
        Some(n) => StopCondition::Iterations(n),
        None => StopCondition::Corpus,
    };
    let logging = match cli.log_every {
        Some(n) => Logging::Iterations(n),
        None => Logging::Completion,
    };

    let report = Trainer::new(&mut network)
        .batch_size(cli.batch_size)
        .learning_rate(learning_rate)
        .stop_condition(stop_condition)
        .logging(logging)
        .train(&mut reader)?;
    info!(
        "last-sample matches: {}/{} batches",
        report.matches, report.iterations
    );

    if let Some(path) = &cli.export {
        network.export(path)?;
        info!("exported parameters to {}", path.display());
    }

    if let (Some(images), Some(labels)) = (&cli.test_images, &cli.test_labels) {
        let mut test = MnistReader::open(images, labels)?;
        let count = cli.evaluate.unwrap_or(test.len()).min(test.len());
        network.evaluate(&mut test, count)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()) {
        error!("{e}");
        process::exit(1);
    }
}
