//! A multilayer perceptron for handwritten digit recognition, trained by
//! backpropagation over MNIST style corpora.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod error;
pub mod mnist;
pub mod model;
pub mod network;
pub mod trainer;

mod matrix;
mod utils;

pub use crate::error::{Error, Result};
