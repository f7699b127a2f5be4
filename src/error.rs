//! Errors produced while reading corpora, running the network, or moving
//! parameters to and from disk.

use crate::activator::Activator;
use crate::network::Stage;

use std::{error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
#[derive(Debug)]
pub enum Error {
    /// The image and label files disagree on how many samples they hold.
    CorpusMismatch { images: u32, labels: u32 },
    /// A corpus header declares images too large to read.
    ImageSize { rows: u32, columns: u32 },
    /// Reading past the last sample of a corpus.
    EndOfCorpus { position: usize },
    /// A buffer or tensor does not match the network's configuration.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A network shape with fewer than two layers, or with an empty layer.
    InvalidShape(Vec<usize>),
    /// A batch must hold at least one sample.
    InvalidBatchSize,
    /// A label does not name any output neuron.
    LabelOutOfRange { label: usize, outputs: usize },
    /// The activation function has no implementation of `operation`.
    UnsupportedFunction {
        activator: Activator,
        operation: &'static str,
    },
    /// An engine operation was called before the phase it depends on.
    OutOfOrder {
        operation: &'static str,
        stage: Stage,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CorpusMismatch { images, labels } => write!(
                f,
                "images and labels file mismatch: {images} images, {labels} labels"
            ),
            Error::ImageSize { rows, columns } => {
                write!(f, "corpus images of {rows}x{columns} pixels are too large")
            }
            Error::EndOfCorpus { position } => {
                write!(f, "end of corpus reached after {position} samples")
            }
            Error::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "{what} has size {got}, expected {expected}"),
            Error::InvalidShape(shape) => write!(
                f,
                "invalid network shape {shape:?}: need at least two non-empty layers"
            ),
            Error::InvalidBatchSize => write!(f, "batch size must be at least 1"),
            Error::LabelOutOfRange { label, outputs } => write!(
                f,
                "label {label} is out of range for {outputs} output neurons"
            ),
            Error::UnsupportedFunction {
                activator,
                operation,
            } => write!(f, "{operation} is not supported for {activator}"),
            Error::OutOfOrder { operation, stage } => {
                write!(f, "cannot run {operation} while the network is {stage:?}")
            }
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "model encoding error: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
