//! Dynamic-programming scoring matrix for global alignment.
//!
//! Cell `(i, j)` holds the optimal score of aligning the first `i` symbols of
//! sequence A with the first `j` symbols of sequence B under a linear gap
//! penalty. Only the score is stored; which predecessor produced it is
//! re-derived during traceback.

use serde::{Deserialize, Serialize};

use super::scheme::ScoringScheme;
use super::{AlignError, AlignResult};
use crate::types::MatrixCoord;

/// Dense `(n + 1) x (m + 1)` grid of prefix-alignment scores, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoringMatrix {
    /// Build the matrix for `seq_a` (rows) against `seq_b` (columns).
    pub fn build(seq_a: &[u8], seq_b: &[u8], scheme: &ScoringScheme) -> AlignResult<Self> {
        scheme.validate()?;

        let rows = seq_a.len() + 1;
        let cols = seq_b.len() + 1;
        let mut matrix = Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        };

        // Boundary conditions: pure gap runs
        for i in 1..rows {
            matrix.set(i, 0, scheme.gap_penalty * i as f64);
        }
        for j in 1..cols {
            matrix.set(0, j, scheme.gap_penalty * j as f64);
        }

        for i in 1..rows {
            let a = seq_a[i - 1];
            for j in 1..cols {
                let diag = matrix.get(i - 1, j - 1) + scheme.substitution(a, seq_b[j - 1]);
                let up = matrix.get(i - 1, j) + scheme.gap_penalty;
                let left = matrix.get(i, j - 1) + scheme.gap_penalty;
                matrix.set(i, j, diag.max(up).max(left));
            }
        }

        log::debug!(
            "Built {}x{} scoring matrix, terminal score {}",
            rows,
            cols,
            matrix.terminal_score()
        );

        Ok(matrix)
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Score at `(row, col)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Number of rows, `len(seq_a) + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `len(seq_b) + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bottom-right cell: the optimal global-alignment score.
    pub fn terminal(&self) -> MatrixCoord {
        (self.rows - 1, self.cols - 1)
    }

    pub fn terminal_score(&self) -> f64 {
        let (i, j) = self.terminal();
        self.get(i, j)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols)
    }

    /// Copy out as nested rows, the layout JSON consumers expect.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Smallest and largest score, used for colour normalisation.
    pub fn score_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Check that the matrix was built for sequences of these lengths.
    pub fn check_dimensions(&self, seq_a: &[u8], seq_b: &[u8]) -> AlignResult<()> {
        if self.rows != seq_a.len() + 1 || self.cols != seq_b.len() + 1 {
            return Err(AlignError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                len_a: seq_a.len(),
                len_b: seq_b.len(),
            });
        }
        Ok(())
    }
}

/// Build the scoring matrix for two sequences.
pub fn build(seq_a: &[u8], seq_b: &[u8], scheme: &ScoringScheme) -> AlignResult<ScoringMatrix> {
    ScoringMatrix::build(seq_a, seq_b, scheme)
}
