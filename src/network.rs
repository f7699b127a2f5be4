//! A fully connected [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) trained by
//! backpropagation.
//!
//! # Example
//!
//! ```
//! # use perceptron::activator::Activator;
//! # use perceptron::network::Network;
//! use rand::SeedableRng;
//!
//! let mut network = Network::new(&[4, 3, 2], Activator::Sigmoid).unwrap();
//! network.randomize(&mut rand::rngs::StdRng::seed_from_u64(1));
//!
//! // One training step on a single bright image labelled `1`.
//! network.upload(&[255; 4]).unwrap();
//! network.forward().unwrap();
//! network.backpropagate(&[0.0, 1.0]).unwrap();
//! network.accumulate().unwrap();
//! network.apply_gradient(1, 0.1).unwrap();
//!
//! let class = network.recognize(&[255; 4]).unwrap();
//! assert!(class < 2);
//! ```

use crate::activator::{cost_prime, Activator};
use crate::error::{Error, Result};
use crate::matrix::{randomize_slice, Mat};
use crate::mnist::MnistReader;
use crate::model::Parameters;
use crate::utils::{argmax, split_layers, split_layers_rev, Back, Front, ZeroOut};

use itertools::multizip;
use log::{debug, info};
use rand::Rng;
use std::io::Read;
use std::path::Path;

/// The phase of the single-sample computation a network has completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    InputLoaded,
    ActivationsComputed,
    ErrorPropagated,
    GradientAccumulated,
}

/// The outcome of running recognition over part of a corpus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub matches: usize,
    pub total: usize,
}

impl Evaluation {
    /// The percentage of samples recognized correctly.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.matches as f64 / self.total as f64 * 100.0
    }
}

/// A multilayer perceptron with its parameters, gradient accumulators, and
/// the activations of the sample currently loaded.
///
/// A network is not synchronized; give each concurrent caller its own.
#[derive(Clone, Debug)]
pub struct Network {
    shape: Vec<usize>,
    activator: Activator,
    /// One matrix per connection, `shape[l + 1]` rows by `shape[l]` columns.
    weights: Vec<Mat>,
    biases: Vec<Vec<f64>>,
    /// Pre-activation sums per layer. Unused for the input layer.
    sums: Vec<Vec<f64>>,
    activations: Vec<Vec<f64>>,
    /// Cost derivative with respect to each activation.
    errors: Vec<Vec<f64>>,
    weight_gradient: Vec<Mat>,
    bias_gradient: Vec<Vec<f64>>,
    stage: Stage,
}

impl Network {
    /// Creates a network with every weight and bias set to zero.
    ///
    /// Arguments:
    ///  * `shape` - the number of neurons in each layer, input first. Must
    ///              hold at least two non-zero sizes.
    ///  * `activator` - the activation function used by every neuron.
    pub fn new(shape: &[usize], activator: Activator) -> Result<Self> {
        if shape.len() < 2 || shape.contains(&0) {
            return Err(Error::InvalidShape(shape.to_vec()));
        }

        let layers = |sizes: &[usize]| -> Vec<Vec<f64>> {
            sizes.iter().map(|&n| vec![0.0; n]).collect()
        };
        let matrices = || -> Vec<Mat> {
            shape
                .windows(2)
                .map(|pair| Mat::zeros(pair[1], pair[0]))
                .collect()
        };

        Ok(Network {
            shape: shape.to_vec(),
            activator,
            weights: matrices(),
            biases: layers(&shape[1..]),
            sums: layers(shape),
            activations: layers(shape),
            errors: layers(shape),
            weight_gradient: matrices(),
            bias_gradient: layers(&shape[1..]),
            stage: Stage::Idle,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the size of the input layer.
    pub fn input_len(&self) -> usize {
        *self.shape.front()
    }

    /// Returns the size of the output layer.
    pub fn output_len(&self) -> usize {
        *self.shape.back()
    }

    /// The activations of the output layer for the current sample.
    pub fn output(&self) -> &[f64] {
        self.activations.back()
    }

    /// Sets every weight and bias to an independent sample from
    /// `[-0.5, 0.5)`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for weights in &mut self.weights {
            weights.randomize(rng);
        }
        for biases in &mut self.biases {
            randomize_slice(biases, rng);
        }
    }

    /// Loads `image` into the input layer, scaling each byte into `[0, 1]`.
    pub fn upload(&mut self, image: &[u8]) -> Result<()> {
        if image.len() != self.input_len() {
            return Err(Error::ShapeMismatch {
                what: "image",
                got: image.len(),
                expected: self.input_len(),
            });
        }
        for (a, &pixel) in self.activations.mut_front().iter_mut().zip(image) {
            *a = pixel as f64 / 255.0;
        }
        self.stage = Stage::InputLoaded;
        Ok(())
    }

    /// Feeds the uploaded input through every layer.
    pub fn forward(&mut self) -> Result<()> {
        self.require("forward pass", Stage::InputLoaded)?;
        for l in 1..self.shape.len() {
            let (inputs, outputs) = split_layers(&mut self.activations, l - 1);
            let weights = &self.weights[l - 1];
            for (k, (z, a, b)) in multizip((
                self.sums[l].iter_mut(),
                outputs.iter_mut(),
                self.biases[l - 1].iter(),
            ))
            .enumerate()
            {
                let weighted_sum = weights
                    .row(k)
                    .iter()
                    .zip(inputs.iter())
                    .fold(0.0, |sum, (w, x)| sum + w * x);
                *z = weighted_sum + b;
                *a = self.activator.f(*z);
            }
        }
        self.stage = Stage::ActivationsComputed;
        Ok(())
    }

    /// Returns the index of the strongest output activation. Ties go to the
    /// lowest index.
    pub fn readout(&self) -> usize {
        argmax(self.output())
    }

    /// Classifies a single image.
    pub fn recognize(&mut self, image: &[u8]) -> Result<usize> {
        self.upload(image)?;
        self.forward()?;
        Ok(self.readout())
    }

    /// Propagates the cost derivative for the `expected` output back
    /// through the hidden layers.
    ///
    /// Once the sample's gradient has been accumulated it must be uploaded
    /// and fed forward again before another backward pass.
    pub fn backpropagate(&mut self, expected: &[f64]) -> Result<()> {
        if !matches!(
            self.stage,
            Stage::ActivationsComputed | Stage::ErrorPropagated
        ) {
            return Err(Error::OutOfOrder {
                operation: "backpropagation",
                stage: self.stage,
            });
        }
        if expected.len() != self.output_len() {
            return Err(Error::ShapeMismatch {
                what: "expected output",
                got: expected.len(),
                expected: self.output_len(),
            });
        }

        let last = self.shape.len() - 1;
        for (e, &a, &y) in multizip((
            self.errors[last].iter_mut(),
            self.activations[last].iter(),
            expected.iter(),
        )) {
            *e = cost_prime(a, y);
        }

        for l in (1..last).rev() {
            let derivatives = activation_derivatives(self.activator, &self.sums[l + 1])?;
            let (errors, next_errors) = split_layers_rev(&mut self.errors, l);
            // Weights leaving neuron `k` are column `k` of the next matrix.
            let weights = &self.weights[l];
            for (k, e) in errors.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (j, (d, next)) in derivatives.iter().zip(next_errors.iter()).enumerate() {
                    sum += weights[(j, k)] * d * next;
                }
                *e = sum;
            }
        }
        self.stage = Stage::ErrorPropagated;
        Ok(())
    }

    /// Adds the current sample's gradient into the accumulators.
    ///
    /// Each weight accumulates its input activation times the bias
    /// accumulator *after* this sample's bias gradient has been added, not
    /// times this sample's delta alone. With more than one sample per batch
    /// this compounds earlier samples into later weight updates.
    pub fn accumulate(&mut self) -> Result<()> {
        if self.stage != Stage::ErrorPropagated {
            return Err(Error::OutOfOrder {
                operation: "gradient accumulation",
                stage: self.stage,
            });
        }
        for l in 1..self.shape.len() {
            let derivatives = activation_derivatives(self.activator, &self.sums[l])?;
            let inputs = &self.activations[l - 1];
            let weight_gradient = &mut self.weight_gradient[l - 1];
            for (k, (db, d, e)) in multizip((
                self.bias_gradient[l - 1].iter_mut(),
                derivatives.iter(),
                self.errors[l].iter(),
            ))
            .enumerate()
            {
                *db += d * e;
                for (dw, a) in weight_gradient.row_mut(k).iter_mut().zip(inputs) {
                    *dw += a * *db;
                }
            }
        }
        self.stage = Stage::GradientAccumulated;
        Ok(())
    }

    /// Applies the averaged accumulated gradient, scaled by `learning_rate`,
    /// and resets the accumulators.
    pub fn apply_gradient(&mut self, batch_size: usize, learning_rate: f64) -> Result<()> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        let batch_size = batch_size as f64;
        for (biases, gradient) in self.biases.iter_mut().zip(&mut self.bias_gradient) {
            for (b, db) in biases.iter_mut().zip(gradient.iter_mut()) {
                *b -= learning_rate * (*db / batch_size);
                *db = 0.0;
            }
        }
        for (weights, gradient) in self.weights.iter_mut().zip(&mut self.weight_gradient) {
            for (w, dw) in weights.values_mut().iter_mut().zip(gradient.values_mut()) {
                *w -= learning_rate * (*dw / batch_size);
                *dw = 0.0;
            }
        }
        self.stage = Stage::Idle;
        Ok(())
    }

    /// Discards any accumulated gradient, e.g. after a batch failed part
    /// way through.
    pub fn reset_gradient(&mut self) {
        self.weight_gradient.zero_out();
        self.bias_gradient.zero_out();
        self.errors.zero_out();
        self.stage = Stage::Idle;
    }

    /// Trains on the next `batch_size` samples of `reader`, then applies the
    /// gradient once.
    ///
    /// Returns whether the *last* sample of the batch was classified
    /// correctly before the update.
    pub fn train_one_batch<R: Read>(
        &mut self,
        reader: &mut MnistReader<R>,
        batch_size: usize,
        learning_rate: f64,
    ) -> Result<bool> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        let mut label = 0;
        for _ in 0..batch_size {
            let sample = reader.read_next()?;
            self.upload(&sample.image)?;
            let expected = self.one_hot(sample.label)?;
            self.forward()?;
            self.backpropagate(&expected)?;
            self.accumulate()?;
            label = sample.label;
        }

        let output = self.readout();
        debug!("match={}; in {}, out {}", output == label, label, output);
        self.apply_gradient(batch_size, learning_rate)?;
        Ok(output == label)
    }

    /// Recognizes the next `count` samples of `reader` and counts how many
    /// match their labels. Parameters are left untouched.
    pub fn evaluate<R: Read>(
        &mut self,
        reader: &mut MnistReader<R>,
        count: usize,
    ) -> Result<Evaluation> {
        let mut matches = 0;
        for i in 0..count {
            let sample = reader.read_next()?;
            let result = self.recognize(&sample.image)?;
            let matched = result == sample.label;
            debug!(
                "{}: match={}, in={}, out={}",
                i + 1,
                matched,
                sample.label,
                result
            );
            if matched {
                matches += 1;
            }
        }

        let evaluation = Evaluation {
            matches,
            total: count,
        };
        info!(
            "RESULT: {:.2}% ({}/{})",
            evaluation.accuracy(),
            matches,
            count
        );
        Ok(evaluation)
    }

    /// Copies out every weight and bias.
    pub fn parameters(&self) -> Parameters {
        Parameters {
            weights: self.weights.iter().map(Mat::to_rows).collect(),
            biases: self.biases.clone(),
        }
    }

    /// Replaces every weight and bias, failing without modifying the
    /// network if `parameters` were made for a different shape.
    pub fn install(&mut self, parameters: Parameters) -> Result<()> {
        let connections = self.shape.len() - 1;
        for (what, got) in [
            ("weight layers", parameters.weights.len()),
            ("bias layers", parameters.biases.len()),
        ] {
            if got != connections {
                return Err(Error::ShapeMismatch {
                    what,
                    got,
                    expected: connections,
                });
            }
        }

        let mut weights = Vec::with_capacity(connections);
        for (l, (rows, biases)) in parameters.weights.iter().zip(&parameters.biases).enumerate() {
            let outputs = self.shape[l + 1];
            if rows.len() != outputs {
                return Err(Error::ShapeMismatch {
                    what: "weight rows",
                    got: rows.len(),
                    expected: outputs,
                });
            }
            if biases.len() != outputs {
                return Err(Error::ShapeMismatch {
                    what: "bias vector",
                    got: biases.len(),
                    expected: outputs,
                });
            }
            weights.push(Mat::from_rows(rows, self.shape[l])?);
        }

        self.weights = weights;
        self.biases = parameters.biases;
        Ok(())
    }

    /// Writes the parameters to a model file.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.parameters().save(path)
    }

    /// Loads parameters from a model file written by `export`.
    pub fn import<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.install(Parameters::load(path)?)
    }

    /// Returns a one-hot output vector for `label`.
    fn one_hot(&self, label: usize) -> Result<Vec<f64>> {
        if label >= self.output_len() {
            return Err(Error::LabelOutOfRange {
                label,
                outputs: self.output_len(),
            });
        }
        let mut expected = vec![0.0; self.output_len()];
        expected[label] = 1.0;
        Ok(expected)
    }

    fn require(&self, operation: &'static str, stage: Stage) -> Result<()> {
        if self.stage < stage {
            return Err(Error::OutOfOrder {
                operation,
                stage: self.stage,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    fn gradient_is_zero(&self) -> bool {
        self.weight_gradient.iter().all(Mat::is_zero)
            && self.bias_gradient.iter().flatten().all(|&x| x == 0.0)
    }
}

/// Evaluates the activation derivative at each pre-activation sum.
fn activation_derivatives(activator: Activator, sums: &[f64]) -> Result<Vec<f64>> {
    sums.iter().map(|&z| activator.fprime(z)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mnist::fixtures::corpus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// A [2, 2, 1] sigmoid network with hand-picked parameters.
    fn fixed_network() -> Network {
        let mut network = Network::new(&[2, 2, 1], Activator::Sigmoid).unwrap();
        network
            .install(Parameters {
                weights: vec![vec![vec![0.5, -0.25], vec![0.75, 0.1]], vec![vec![1.0, -1.0]]],
                biases: vec![vec![0.1, -0.2], vec![0.05]],
            })
            .unwrap();
        network
    }

    #[test]
    fn invalid_shapes() {
        assert!(matches!(
            Network::new(&[5], Activator::Sigmoid),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            Network::new(&[3, 0, 2], Activator::ReLU),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn zero_network_recognizes_lowest_index() {
        let mut network = Network::new(&[784, 10], Activator::Sigmoid).unwrap();
        assert_eq!(network.recognize(&[0; 784]).unwrap(), 0);
        assert!(network.output().iter().all(|&a| a == 0.5));
    }

    #[test]
    fn forward_matches_hand_computation() {
        let mut network = fixed_network();
        network.upload(&[255, 0]).unwrap();
        network.forward().unwrap();

        let hidden = [sigmoid(0.5 + 0.1), sigmoid(0.75 - 0.2)];
        let expected = sigmoid(hidden[0] - hidden[1] + 0.05);
        assert!((network.output()[0] - expected).abs() < 1e-9);
        assert!((network.output()[0] - 0.5153753297326713).abs() < 1e-9);
        assert_eq!(network.stage(), Stage::ActivationsComputed);
    }

    #[test]
    fn upload_rejects_wrong_length() {
        let mut network = Network::new(&[4, 2], Activator::Sigmoid).unwrap();
        match network.upload(&[0; 3]) {
            Err(Error::ShapeMismatch {
                got: 3,
                expected: 4,
                ..
            }) => {}
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(network.stage(), Stage::Idle);
        assert!(network.recognize(&[0; 5]).is_err());
    }

    #[test]
    fn operations_out_of_order_fail() {
        let mut network = fixed_network();
        assert!(matches!(network.forward(), Err(Error::OutOfOrder { .. })));
        network.upload(&[1, 2]).unwrap();
        assert!(matches!(
            network.backpropagate(&[1.0]),
            Err(Error::OutOfOrder { .. })
        ));
        network.forward().unwrap();
        assert!(matches!(network.accumulate(), Err(Error::OutOfOrder { .. })));
        assert!(matches!(
            network.backpropagate(&[1.0, 0.0]),
            Err(Error::ShapeMismatch { .. })
        ));
        network.backpropagate(&[1.0]).unwrap();
        network.accumulate().unwrap();
        assert!(matches!(network.accumulate(), Err(Error::OutOfOrder { .. })));
    }

    #[test]
    fn accumulated_sample_cannot_be_accumulated_again() {
        let mut network = fixed_network();
        network.upload(&[255, 0]).unwrap();
        network.forward().unwrap();
        network.backpropagate(&[1.0]).unwrap();
        network.accumulate().unwrap();
        let once = network.bias_gradient.clone();

        assert!(matches!(
            network.backpropagate(&[1.0]),
            Err(Error::OutOfOrder {
                stage: Stage::GradientAccumulated,
                ..
            })
        ));
        assert!(matches!(network.accumulate(), Err(Error::OutOfOrder { .. })));
        assert_eq!(network.bias_gradient, once);

        // Backpropagating twice before accumulating is harmless.
        network.upload(&[255, 0]).unwrap();
        network.forward().unwrap();
        network.backpropagate(&[1.0]).unwrap();
        network.backpropagate(&[1.0]).unwrap();
        network.accumulate().unwrap();
        let twice: Vec<f64> = once[0].iter().map(|db| db + db).collect();
        assert_eq!(network.bias_gradient[0], twice);
    }

    #[test]
    fn output_error_is_cost_derivative() {
        let mut network = fixed_network();
        network.upload(&[255, 0]).unwrap();
        network.forward().unwrap();
        network.backpropagate(&[1.0]).unwrap();

        let output = network.output()[0];
        assert_eq!(network.errors[2][0], 2.0 * (output - 1.0));

        let z = network.sums[2][0];
        let d = sigmoid(z) * (1.0 - sigmoid(z));
        assert_eq!(network.errors[1][0], 1.0 * d * network.errors[2][0]);
        assert_eq!(network.errors[1][1], -1.0 * d * network.errors[2][0]);
    }

    #[test]
    fn applying_gradient_resets_accumulators() {
        let mut network = fixed_network();
        network.upload(&[200, 17]).unwrap();
        network.forward().unwrap();
        network.backpropagate(&[0.0]).unwrap();
        network.accumulate().unwrap();
        assert!(!network.gradient_is_zero());

        let before = network.parameters();
        network.apply_gradient(1, 0.1).unwrap();
        assert!(network.gradient_is_zero());
        assert_ne!(network.parameters(), before);
        assert_eq!(network.stage(), Stage::Idle);
    }

    #[test]
    fn reset_discards_partial_batch() {
        let mut network = fixed_network();
        let before = network.parameters();
        network.upload(&[30, 60]).unwrap();
        network.forward().unwrap();
        network.backpropagate(&[1.0]).unwrap();
        network.accumulate().unwrap();

        network.reset_gradient();
        assert!(network.gradient_is_zero());
        assert_eq!(network.stage(), Stage::Idle);
        network.apply_gradient(1, 1.0).unwrap();
        assert_eq!(network.parameters(), before);
    }

    #[test]
    fn weight_gradient_compounds_bias_accumulator() {
        // With no hidden layer the weight gradient is easy to follow by hand.
        let mut network = Network::new(&[1, 1], Activator::Sigmoid).unwrap();
        network
            .install(Parameters {
                weights: vec![vec![vec![0.3]]],
                biases: vec![vec![-0.1]],
            })
            .unwrap();

        let mut deltas = Vec::new();
        let mut inputs = Vec::new();
        for &pixel in &[255u8, 51] {
            network.upload(&[pixel]).unwrap();
            network.forward().unwrap();
            network.backpropagate(&[1.0]).unwrap();
            network.accumulate().unwrap();
            let z = network.sums[1][0];
            let d = sigmoid(z) * (1.0 - sigmoid(z));
            deltas.push(d * network.errors[1][0]);
            inputs.push(pixel as f64 / 255.0);
        }

        let bias = deltas[0] + deltas[1];
        let weight = inputs[0] * deltas[0] + inputs[1] * bias;
        assert_eq!(network.bias_gradient[0][0], bias);
        assert_eq!(network.weight_gradient[0][(0, 0)], weight);

        network.apply_gradient(2, 0.5).unwrap();
        let parameters = network.parameters();
        assert_eq!(parameters.biases[0][0], -0.1 - 0.5 * (bias / 2.0));
        assert_eq!(parameters.weights[0][0][0], 0.3 - 0.5 * (weight / 2.0));
        assert!(network.gradient_is_zero());
    }

    #[test]
    fn softplus_runs_inference_but_cannot_train() {
        let mut network = Network::new(&[2, 3, 2], Activator::Softplus).unwrap();
        network.randomize(&mut StdRng::seed_from_u64(5));
        assert!(network.recognize(&[10, 20]).unwrap() < 2);
        match network.backpropagate(&[1.0, 0.0]) {
            Err(Error::UnsupportedFunction {
                activator: Activator::Softplus,
                ..
            }) => {}
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn seeded_randomization_is_reproducible() {
        let mut a = Network::new(&[6, 4, 3], Activator::ReLU).unwrap();
        let mut b = Network::new(&[6, 4, 3], Activator::ReLU).unwrap();
        a.randomize(&mut StdRng::seed_from_u64(11));
        b.randomize(&mut StdRng::seed_from_u64(11));
        assert_eq!(a.parameters(), b.parameters());

        let parameters = a.parameters();
        let values = parameters
            .weights
            .iter()
            .flatten()
            .flatten()
            .chain(parameters.biases.iter().flatten());
        for &x in values {
            assert!((-0.5..0.5).contains(&x));
        }
    }

    #[test]
    fn install_rejects_other_shapes() {
        let mut network = Network::new(&[3, 2], Activator::Sigmoid).unwrap();
        let other = Network::new(&[4, 2], Activator::Sigmoid).unwrap();
        assert!(matches!(
            network.install(other.parameters()),
            Err(Error::ShapeMismatch { .. })
        ));
        let deeper = Network::new(&[3, 2, 2], Activator::Sigmoid).unwrap();
        assert!(network.install(deeper.parameters()).is_err());
        assert_eq!(network.parameters(), Network::new(&[3, 2], Activator::Sigmoid).unwrap().parameters());
    }

    #[test]
    fn export_then_import_reproduces_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network");

        let mut trained = Network::new(&[4, 5, 3], Activator::Sigmoid).unwrap();
        trained.randomize(&mut StdRng::seed_from_u64(3));
        trained.export(&path).unwrap();

        let mut loaded = Network::new(&[4, 5, 3], Activator::Sigmoid).unwrap();
        loaded.import(&path).unwrap();
        assert_eq!(loaded.parameters(), trained.parameters());

        let image = [0, 90, 180, 255];
        trained.recognize(&image).unwrap();
        loaded.recognize(&image).unwrap();
        assert_eq!(loaded.output(), trained.output());
    }

    #[test]
    fn train_one_batch_reports_last_sample() {
        let mut network = Network::new(&[4, 3, 2], Activator::Sigmoid).unwrap();
        let mut reader = corpus(2, 2, &[0, 1, 1, 0, 0, 1], |i| (i * 40) as u8);

        // All outputs tie at zero parameters, so class 0 is predicted.
        assert!(!network.train_one_batch(&mut reader, 3, 0.1).unwrap());
        assert!(network.gradient_is_zero());
        assert_eq!(reader.position(), 3);

        assert!(matches!(
            network.train_one_batch(&mut reader, 0, 0.1),
            Err(Error::InvalidBatchSize)
        ));
        network.train_one_batch(&mut reader, 3, 0.1).unwrap();
        assert!(matches!(
            network.train_one_batch(&mut reader, 1, 0.1),
            Err(Error::EndOfCorpus { .. })
        ));
    }

    #[test]
    fn labels_beyond_output_layer_fail() {
        let mut network = Network::new(&[1, 2], Activator::Sigmoid).unwrap();
        let mut reader = corpus(1, 1, &[2], |_| 0);
        assert!(matches!(
            network.train_one_batch(&mut reader, 1, 0.1),
            Err(Error::LabelOutOfRange { label: 2, outputs: 2 })
        ));
    }

    #[test]
    fn learns_to_separate_dark_from_bright() {
        let labels: Vec<u8> = (0..2000).map(|i| (i % 2) as u8).collect();
        let pixel = |i: usize| if i % 2 == 0 { 0 } else { 255 };

        let mut network = Network::new(&[4, 4, 2], Activator::Sigmoid).unwrap();
        network.randomize(&mut StdRng::seed_from_u64(2024));
        let mut reader = corpus(2, 2, &labels, pixel);
        while reader.position() < reader.len() {
            network.train_one_batch(&mut reader, 1, 0.5).unwrap();
        }

        let before = network.parameters();
        let mut test = corpus(2, 2, &[0, 1, 0, 1], pixel);
        let evaluation = network.evaluate(&mut test, 4).unwrap();
        assert_eq!(evaluation, Evaluation { matches: 4, total: 4 });
        assert_eq!(evaluation.accuracy(), 100.0);
        assert_eq!(network.parameters(), before);
    }
}
