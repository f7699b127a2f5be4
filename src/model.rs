//! Persisted network parameters.
//!
//! Parameters are stored as JSON text with two fields:
//!
//! * `Weights` - one matrix per connection, indexed
//!   `[connection][neuron][source neuron]`.
//! * `Biases` - one vector per connection, indexed `[connection][neuron]`.
//!
//! Finite values are JSON numbers. NaN and the infinities, which JSON has
//! no numbers for, are the strings `"NaN"`, `"Infinity"` and `"-Infinity"`.
//! NaN payloads are not kept.
//!
//! Decoding does not check the tensors against any network; use
//! `Network::install` for that.

use crate::error::Result;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// The trained state of a network: every weight and bias.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameters {
    #[serde(serialize_with = "serialize_weights", deserialize_with = "deserialize_weights")]
    pub weights: Vec<Vec<Vec<f64>>>,
    #[serde(serialize_with = "serialize_biases", deserialize_with = "deserialize_biases")]
    pub biases: Vec<Vec<f64>>,
}

impl Parameters {
    /// Encodes the parameters as JSON text.
    ///
    /// Every finite value is written with enough digits to be read back
    /// bit-for-bit, including the sign of zero.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes parameters from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the parameters to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads parameters previously written with `save`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Parameters::from_json(&text)
    }

    /// Returns the layer sizes these parameters describe, or `None` if the
    /// tensors do not chain into a consistent network.
    pub fn shape(&self) -> Option<Vec<usize>> {
        if self.weights.is_empty() || self.weights.len() != self.biases.len() {
            return None;
        }
        let mut shape = vec![self.weights[0].first()?.len()];
        for (weights, biases) in self.weights.iter().zip(&self.biases) {
            let inputs = *shape.last()?;
            if weights.len() != biases.len()
                || weights.iter().any(|row| row.len() != inputs)
            {
                return None;
            }
            shape.push(weights.len());
        }
        Some(shape)
    }
}

/// One parameter value, spelled out by name when it is not finite.
#[derive(Copy, Clone)]
struct Float(f64);

impl Serialize for Float {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let Float(x) = *self;
        if x.is_nan() {
            serializer.serialize_str("NaN")
        } else if x == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if x == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(x)
        }
    }
}

struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = Float;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, x: f64) -> std::result::Result<Float, E> {
        Ok(Float(x))
    }

    fn visit_i64<E: de::Error>(self, x: i64) -> std::result::Result<Float, E> {
        Ok(Float(x as f64))
    }

    fn visit_u64<E: de::Error>(self, x: u64) -> std::result::Result<Float, E> {
        Ok(Float(x as f64))
    }

    fn visit_str<E: de::Error>(self, name: &str) -> std::result::Result<Float, E> {
        match name {
            "NaN" => Ok(Float(f64::NAN)),
            "Infinity" => Ok(Float(f64::INFINITY)),
            "-Infinity" => Ok(Float(f64::NEG_INFINITY)),
            _ => Err(E::invalid_value(de::Unexpected::Str(name), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }
}

struct Floats<'a>(&'a [f64]);

impl Serialize for Floats<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|&x| Float(x)))
    }
}

fn serialize_weights<S: Serializer>(
    weights: &[Vec<Vec<f64>>],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(
        weights
            .iter()
            .map(|matrix| matrix.iter().map(|row| Floats(row)).collect::<Vec<_>>()),
    )
}

fn serialize_biases<S: Serializer>(
    biases: &[Vec<f64>],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(biases.iter().map(|layer| Floats(layer)))
}

fn unwrap_floats(values: Vec<Float>) -> Vec<f64> {
    values.into_iter().map(|Float(x)| x).collect()
}

fn deserialize_weights<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Vec<Vec<f64>>>, D::Error> {
    let weights = Vec::<Vec<Vec<Float>>>::deserialize(deserializer)?;
    Ok(weights
        .into_iter()
        .map(|matrix| matrix.into_iter().map(unwrap_floats).collect())
        .collect())
}

fn deserialize_biases<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Vec<f64>>, D::Error> {
    let biases = Vec::<Vec<Float>>::deserialize(deserializer)?;
    Ok(biases.into_iter().map(unwrap_floats).collect())
}
