//! Activation and cost functions.

use crate::error::{Error, Result};

use std::fmt;
use std::str::FromStr;

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Logistic function, `1 / (1 + e^-x)`
    Sigmoid,
    /// Smooth approximation of ReLU, `ln(1 + e^x)`
    ///
    /// Only usable for inference: its derivative is not implemented.
    Softplus,
    /// Rectified Linear Unit
    ReLU,
}

impl Activator {
    /// Evaluates `f(x)` for the selected the activation function.
    pub fn f(&self, x: f64) -> f64 {
        match *self {
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::Softplus => (1.0 + x.exp()).ln(),
            Activator::ReLU => {
                if x < 0.0 {
                    0.0
                } else {
                    x
                }
            }
        }
    }

    /// Evaluates the derivative `f'(x)`.
    ///
    /// Unlike some formulations this takes the *input* of the activation
    /// function (the pre-activation sum), not its output.
    pub fn fprime(&self, x: f64) -> Result<f64> {
        match *self {
            Activator::Sigmoid => Ok(self.f(x) * (1.0 - self.f(x))),
            Activator::ReLU => Ok(if x > 0.0 { 1.0 } else { 0.0 }),
            Activator::Softplus => Err(Error::UnsupportedFunction {
                activator: *self,
                operation: "derivative",
            }),
        }
    }
}

impl fmt::Display for Activator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activator::Sigmoid => "sigmoid",
            Activator::Softplus => "softplus",
            Activator::ReLU => "relu",
        };
        f.write_str(name)
    }
}

impl FromStr for Activator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(Activator::Sigmoid),
            "softplus" => Ok(Activator::Softplus),
            "relu" => Ok(Activator::ReLU),
            other => Err(format!("unknown activation function `{other}`")),
        }
    }
}

/// Squared error of a single output, `(a - y)^2`.
pub fn cost(actual: f64, expected: f64) -> f64 {
    (actual - expected).powi(2)
}

/// Derivative of `cost` with respect to the output, `2(a - y)`.
pub fn cost_prime(actual: f64, expected: f64) -> f64 {
    2.0 * (actual - expected)
}
