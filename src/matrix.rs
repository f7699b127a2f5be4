use crate::error::{Error, Result};
use crate::utils::ZeroOut;

use rand::Rng;
use std::ops::Index;

/// A dense matrix holding the connection weights between two layers.
///
/// Row `k` holds every weight feeding neuron `k` of the next layer, so
/// `self[(k, j)]` is the weight from source neuron `j` to neuron `k`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from one `Vec` per row, failing if any row has a
    /// different length than `cols`.
    pub fn from_rows(rows: &[Vec<f64>], cols: usize) -> Result<Self> {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::ShapeMismatch {
                    what: "weight row",
                    got: row.len(),
                    expected: cols,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Mat { cols, data })
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    pub fn row(&self, k: usize) -> &[f64] {
        &self.data[k * self.cols..(k + 1) * self.cols]
    }

    pub fn row_mut(&mut self, k: usize) -> &mut [f64] {
        &mut self.data[k * self.cols..(k + 1) * self.cols]
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Overwrites every element with an independent sample from
    /// `[-0.5, 0.5)`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        randomize_slice(&mut self.data, rng);
    }

    /// Returns true if every element is exactly zero.
    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }
}

/// Fills `values` with independent uniform samples from `[-0.5, 0.5)`.
pub fn randomize_slice<R: Rng + ?Sized>(values: &mut [f64], rng: &mut R) {
    for x in values {
        *x = rng.random::<f64>() - 0.5;
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}
