//! Global alignment engine
//!
//! Needleman-Wunsch scoring with a linear gap penalty, followed by an
//! exhaustive traceback that returns every co-optimal alignment rather than a
//! single arbitrary one.
//!
//! ```
//! use dotalign_core::align::{GlobalAligner, ScoringScheme};
//!
//! let aligner = GlobalAligner::new(ScoringScheme::new(5.0, -2.0, -4.0));
//! let result = aligner.align(b"CTATGAA", b"CTATTGACGTA").unwrap();
//! assert_eq!(result.score(), 19.0);
//! assert_eq!(result.paths().len(), 2);
//! ```

pub mod matrix;
pub mod pair;
pub mod scheme;
pub mod traceback;

pub use matrix::{build, ScoringMatrix};
pub use pair::{render_alignment, AlignedPair, PairStats};
pub use scheme::ScoringScheme;
pub use traceback::{enumerate_optimal_paths, Move, Path, PathEnumerator};

use rayon::prelude::*;
use thiserror::Error;

/// Errors raised by matrix construction and traceback
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    #[error("Invalid scoring scheme: {0}")]
    InvalidScheme(String),

    #[error("Inconsistent scoring matrix: no predecessor reproduces cell ({row}, {col})")]
    InconsistentMatrix { row: usize, col: usize },

    #[error("Optimal path limit of {limit} exceeded")]
    PathLimitExceeded { limit: usize },

    #[error("Matrix is {rows}x{cols} but sequences have lengths {len_a} and {len_b}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        len_a: usize,
        len_b: usize,
    },
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Completed alignment: the matrix plus every optimal path through it.
#[derive(Debug, Clone)]
pub struct GlobalAlignment {
    matrix: ScoringMatrix,
    paths: Vec<Path>,
}

impl GlobalAlignment {
    pub fn matrix(&self) -> &ScoringMatrix {
        &self.matrix
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Optimal global score, the matrix's terminal cell.
    pub fn score(&self) -> f64 {
        self.matrix.terminal_score()
    }

    /// Gapped strings for every path, in enumeration order.
    pub fn aligned_pairs(&self, seq_a: &[u8], seq_b: &[u8]) -> Vec<AlignedPair> {
        self.paths
            .iter()
            .map(|p| render_alignment(p, seq_a, seq_b))
            .collect()
    }
}

/// Runs matrix construction and traceback under one scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalAligner {
    scheme: ScoringScheme,
    enumerator: PathEnumerator,
}

impl GlobalAligner {
    pub fn new(scheme: ScoringScheme) -> Self {
        Self {
            scheme,
            enumerator: PathEnumerator::new(),
        }
    }

    /// Cap the number of enumerated paths; see [`PathEnumerator::with_max_paths`].
    pub fn with_max_paths(mut self, limit: Option<usize>) -> Self {
        self.enumerator = self.enumerator.with_optional_max_paths(limit);
        self
    }

    pub fn scheme(&self) -> &ScoringScheme {
        &self.scheme
    }

    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> AlignResult<GlobalAlignment> {
        let matrix = ScoringMatrix::build(seq_a, seq_b, &self.scheme)?;
        let paths = self.enumerator.enumerate(&matrix, seq_a, seq_b, &self.scheme)?;

        log::info!(
            "Aligned {} x {} symbols: score {}, {} optimal path(s)",
            seq_a.len(),
            seq_b.len(),
            matrix.terminal_score(),
            paths.len()
        );

        Ok(GlobalAlignment { matrix, paths })
    }

    /// Align independent pairs in parallel; results keep input order.
    pub fn align_batch<A, B>(&self, pairs: &[(A, B)]) -> Vec<AlignResult<GlobalAlignment>>
    where
        A: AsRef<[u8]> + Sync,
        B: AsRef<[u8]> + Sync,
    {
        pairs
            .par_iter()
            .map(|(a, b)| self.align(a.as_ref(), b.as_ref()))
            .collect()
    }
}
