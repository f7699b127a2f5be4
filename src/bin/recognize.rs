use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Parser;
use log::{debug, error};
use perceptron::activator::Activator;
use perceptron::network::Network;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

/// Classifies one base64-encoded grayscale image with a saved model and
/// prints the predicted class.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Model file written by `train --export`
    #[arg(long)]
    model: PathBuf,
    #[arg(long, value_delimiter = ',', default_value = "784,100,100,10")]
    shape: Vec<usize>,
    #[arg(long, default_value = "sigmoid")]
    activator: Activator,
    /// Row-major pixels, one byte each, base64 encoded; read from stdin
    /// when absent
    image: Option<String>,
}

fn run(cli: Cli) -> Result<usize, Box<dyn std::error::Error>> {
    let encoded = match cli.image {
        Some(image) => image,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    let image = STANDARD.decode(encoded.trim())?;
    debug!("decoded {} pixels", image.len());

    let mut network = Network::new(&cli.shape, cli.activator)?;
    network.import(&cli.model)?;
    Ok(network.recognize(&image)?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(Cli::parse()) {
        Ok(class) => println!("{class}"),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
