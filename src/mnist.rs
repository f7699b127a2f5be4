//! A streaming reader for [MNIST](http://yann.lecun.com/exdb/mnist/) style
//! IDX corpora.
//!
//! A corpus is a pair of files. The image file starts with four big-endian
//! 32-bit integers (magic, count, rows, columns) followed by `count` images
//! of `rows * columns` unsigned bytes each. The label file starts with two
//! (magic, count) followed by one byte per image.

use crate::error::{Error, Result};

use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The largest image, in pixels, a corpus header may declare.
pub const MAX_IMAGE_LEN: usize = 1 << 24;

/// One image and its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub image: Vec<u8>,
    pub label: usize,
}

/// Reads samples sequentially from a pair of aligned image and label
/// streams.
///
/// There is no rewind; once `len()` samples have been read every further
/// read fails with `Error::EndOfCorpus`. Header dimensions above
/// `MAX_IMAGE_LEN` pixels are rejected when the reader is created.
#[derive(Debug)]
pub struct MnistReader<R> {
    images: R,
    labels: R,
    image_magic: u32,
    label_magic: u32,
    count: u32,
    rows: u32,
    columns: u32,
    position: usize,
    last_label: Option<usize>,
}

impl MnistReader<BufReader<File>> {
    /// Opens an image file and its label file.
    ///
    /// Both files are closed together when the reader is dropped, including
    /// when this constructor fails after opening them.
    pub fn open<P, Q>(images: P, labels: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let images_file = File::open(images.as_ref())?;
        let labels_file = File::open(labels.as_ref())?;
        debug!(
            "opened corpus {} / {}",
            images.as_ref().display(),
            labels.as_ref().display()
        );
        MnistReader::new(BufReader::new(images_file), BufReader::new(labels_file))
    }
}

impl<R: Read> MnistReader<R> {
    /// Reads both headers, failing if the sample counts disagree.
    pub fn new(mut images: R, mut labels: R) -> Result<Self> {
        let image_magic = read_u32(&mut images)?;
        let image_count = read_u32(&mut images)?;
        let rows = read_u32(&mut images)?;
        let columns = read_u32(&mut images)?;

        let label_magic = read_u32(&mut labels)?;
        let label_count = read_u32(&mut labels)?;

        match (rows as usize).checked_mul(columns as usize) {
            Some(len) if len <= MAX_IMAGE_LEN => {}
            _ => return Err(Error::ImageSize { rows, columns }),
        }

        if image_count != label_count {
            return Err(Error::CorpusMismatch {
                images: image_count,
                labels: label_count,
            });
        }

        Ok(MnistReader {
            images,
            labels,
            image_magic,
            label_magic,
            count: image_count,
            rows,
            columns,
            position: 0,
            last_label: None,
        })
    }

    /// Reads the next image and label, advancing the cursor.
    pub fn read_next(&mut self) -> Result<Sample> {
        if self.position >= self.len() {
            return Err(Error::EndOfCorpus {
                position: self.position,
            });
        }

        let mut image = vec![0; self.image_len()];
        self.images.read_exact(&mut image)?;
        let mut label = [0; 1];
        self.labels.read_exact(&mut label)?;

        let label = label[0] as usize;
        self.position += 1;
        self.last_label = Some(label);
        Ok(Sample { image, label })
    }

    /// The number of samples in the corpus.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn columns(&self) -> usize {
        self.columns as usize
    }

    /// The number of bytes in one image.
    pub fn image_len(&self) -> usize {
        self.rows() * self.columns()
    }

    /// The number of samples read so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The label of the most recently read sample.
    pub fn last_label(&self) -> Option<usize> {
        self.last_label
    }

    /// Iterates over the remaining samples, stopping at the end of the
    /// corpus or after the first failed read.
    pub fn samples(&mut self) -> impl Iterator<Item = Result<Sample>> + '_ {
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed || self.position >= self.len() {
                return None;
            }
            let sample = self.read_next();
            failed = sample.is_err();
            Some(sample)
        })
    }

    pub fn image_magic(&self) -> u32 {
        self.image_magic
    }

    pub fn label_magic(&self) -> u32 {
        self.label_magic
    }
}

fn read_u32<R: Read>(stream: &mut R) -> Result<u32> {
    let mut buffer = [0; 4];
    stream.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}
