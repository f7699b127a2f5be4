//! Drives a `Network` through a corpus one batch at a time.

use crate::error::{Error, Result};
use crate::mnist::MnistReader;
use crate::network::Network;

use log::info;
use std::io::Read;
use std::time::{Duration, Instant};

/// A builder for training runs over a corpus.
///
/// The network must already hold its starting parameters, either from
/// `Network::randomize` or an imported model.
#[derive(Debug)]
pub struct Trainer<'a> {
    network: &'a mut Network,
    batch_size: usize,
    learning_rate: LearningRate,
    logging: Logging,
    stop_condition: StopCondition,
}

/// Summary of a finished training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Report {
    /// The number of batches trained.
    pub iterations: usize,
    /// The number of batches whose last sample was classified correctly.
    pub matches: usize,
    pub elapsed: Duration,
}

impl<'a> Trainer<'a> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A batch size of 1.
    /// * A constant learning rate of 0.1.
    /// * Stops after one pass over the corpus.
    /// * Logs on training completion.
    pub fn new(network: &'a mut Network) -> Self {
        Trainer {
            network,
            batch_size: 1,
            learning_rate: LearningRate::Constant(0.1),
            logging: Logging::Completion,
            stop_condition: StopCondition::Corpus,
        }
    }

    /// Sets the number of samples whose gradients are averaged into each
    /// parameter update.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the learning rate schedule to use during gradient descent.
    pub fn learning_rate<L>(mut self, rate: L) -> Self
    where
        L: Into<LearningRate>,
    {
        self.learning_rate = rate.into();
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains on consecutive batches read from `reader` until the stop
    /// condition holds or the corpus runs out of whole batches.
    pub fn train<R: Read>(self, reader: &mut MnistReader<R>) -> Result<Report> {
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }

        let available = (reader.len() - reader.position()) / self.batch_size;
        let planned = match self.stop_condition {
            StopCondition::Corpus => available,
            StopCondition::Iterations(n) => n.min(available),
            StopCondition::Duration(_) => available,
        };
        info!(
            "training started: {} batches of {}, shape {:?}",
            planned,
            self.batch_size,
            self.network.shape()
        );

        let start_time = Instant::now();
        let mut matches = 0;
        let mut iteration = 0;
        while iteration < planned {
            if let StopCondition::Duration(duration) = self.stop_condition {
                if start_time.elapsed() > duration {
                    break;
                }
            }
            let rate = self.learning_rate.at(iteration);
            if self.network.train_one_batch(reader, self.batch_size, rate)? {
                matches += 1;
            }
            iteration += 1;
            self.logging.iteration(iteration, planned, matches);
        }

        let report = Report {
            iterations: iteration,
            matches,
            elapsed: start_time.elapsed(),
        };
        self.logging.completion(&report, self.batch_size);
        Ok(report)
    }
}

/// How the learning rate evolves over training.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LearningRate {
    /// The same rate for every batch.
    Constant(f64),
    /// `initial / (1 + decay * iteration)`, with `iteration` counted from 0.
    Decay { initial: f64, decay: f64 },
}

impl LearningRate {
    /// Returns the rate to use for batch number `iteration`.
    pub fn at(&self, iteration: usize) -> f64 {
        match *self {
            LearningRate::Constant(rate) => rate,
            LearningRate::Decay { initial, decay } => {
                initial * (1.0 / (1.0 + decay * iteration as f64))
            }
        }
    }
}

impl From<f64> for LearningRate {
    fn from(rate: f64) -> LearningRate {
        LearningRate::Constant(rate)
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// Progress will be logged after every `n` batches
    Iterations(usize),
}

impl Logging {
    /// Performs logging after batch number `iteration` of `planned`.
    fn iteration(&self, iteration: usize, planned: usize, matches: usize) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                info!(
                    "{:.2}% ({}/{} batches, {} last-sample matches)",
                    iteration as f64 / planned as f64 * 100.0,
                    iteration,
                    planned,
                    matches
                );
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, report: &Report, batch_size: usize) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "Trained on {} images in {:.3}s.",
            report.iterations * batch_size,
            report.elapsed.as_secs_f64()
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops once every whole batch left in the corpus has been used
    Corpus,
    /// Stops after the provided number of batches
    Iterations(usize),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}
