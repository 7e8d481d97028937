//! Symbol-identity dot plots
//!
//! A dot plot marks every position pair where the two sequences carry the same
//! symbol, then picks out runs of consecutive matches along the main
//! (top-left to bottom-right) and reverse (top-right to bottom-left)
//! directions.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::MatrixCoord;

/// Bit-packed `n x m` grid: cell `(i, j)` is set iff `seq_a[i] == seq_b[j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchMatrix {
    rows: usize,
    cols: usize,
    bits: BitVec,
}

impl MatchMatrix {
    pub fn new(seq_a: &[u8], seq_b: &[u8]) -> Self {
        let rows = seq_a.len();
        let cols = seq_b.len();
        let mut bits = bitvec![0; rows * cols];

        for (i, &a) in seq_a.iter().enumerate() {
            for (j, &b) in seq_b.iter().enumerate() {
                if a == b {
                    bits.set(i * cols + j, true);
                }
            }
        }

        log::debug!(
            "Built {}x{} match matrix with {} matches",
            rows,
            cols,
            bits.count_ones()
        );

        Self { rows, cols, bits }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_match(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.bits[row * self.cols + col]
    }

    pub fn match_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Matching cells in row-major order.
    pub fn matches(&self) -> impl Iterator<Item = MatrixCoord> + '_ {
        let cols = self.cols;
        self.bits.iter_ones().map(move |idx| (idx / cols, idx % cols))
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagonalDirection {
    /// `(i, j) -> (i + 1, j + 1)`
    Main,
    /// `(i, j) -> (i + 1, j - 1)`
    Reverse,
}

/// A run of at least two consecutive matches along one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagonalRun {
    pub direction: DiagonalDirection,
    pub cells: Vec<MatrixCoord>,
}

impl DiagonalRun {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<MatrixCoord> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<MatrixCoord> {
        self.cells.last().copied()
    }
}

/// Main and reverse runs, each in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagonals {
    pub main: Vec<DiagonalRun>,
    pub reverse: Vec<DiagonalRun>,
}

impl Diagonals {
    pub fn iter(&self) -> impl Iterator<Item = &DiagonalRun> {
        self.main.iter().chain(self.reverse.iter())
    }

    pub fn longest(&self) -> Option<&DiagonalRun> {
        self.iter().max_by_key(|run| run.len())
    }
}

/// Walk from `(row, col)` in `direction`, marking cells in `visited`.
///
/// Returns `None` for a single isolated match; its cell stays marked.
fn walk(
    matrix: &MatchMatrix,
    visited: &mut BitVec,
    row: usize,
    col: usize,
    direction: DiagonalDirection,
) -> Option<DiagonalRun> {
    let mut cells = Vec::new();
    let (mut i, mut j) = (row, col);

    while matrix.is_match(i, j) {
        visited.set(i * matrix.cols + j, true);
        cells.push((i, j));

        i += 1;
        j = match direction {
            DiagonalDirection::Main => j + 1,
            DiagonalDirection::Reverse => match j.checked_sub(1) {
                Some(prev) => prev,
                None => break,
            },
        };
    }

    if cells.len() < 2 {
        return None;
    }
    Some(DiagonalRun { direction, cells })
}

/// Extract main and reverse diagonal runs from a match matrix.
///
/// Cells are scanned row-major. Each direction keeps its own visited mask, so
/// a cell belongs to at most one main run and at most one reverse run.
pub fn find_diagonals(matrix: &MatchMatrix) -> Diagonals {
    let size = matrix.rows * matrix.cols;
    let mut main_visited = bitvec![0; size];
    let mut reverse_visited = bitvec![0; size];
    let mut diagonals = Diagonals::default();

    for (i, j) in matrix.matches() {
        let idx = i * matrix.cols + j;

        if !main_visited[idx] {
            if let Some(run) = walk(matrix, &mut main_visited, i, j, DiagonalDirection::Main) {
                diagonals.main.push(run);
            }
        }
        if !reverse_visited[idx] {
            if let Some(run) = walk(matrix, &mut reverse_visited, i, j, DiagonalDirection::Reverse)
            {
                diagonals.reverse.push(run);
            }
        }
    }

    log::debug!(
        "Found {} main and {} reverse diagonal runs",
        diagonals.main.len(),
        diagonals.reverse.len()
    );

    diagonals
}

/// Statistics about a dot plot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DotStatistics {
    pub total_matches: usize,
    pub main_runs: usize,
    pub reverse_runs: usize,
    pub longest_run: usize,
    /// Fraction of cells that are matches
    pub match_density: f64,
}

impl DotStatistics {
    pub fn compute(matrix: &MatchMatrix, diagonals: &Diagonals) -> Self {
        if matrix.is_empty() {
            return Self::default();
        }

        let total_matches = matrix.match_count();
        Self {
            total_matches,
            main_runs: diagonals.main.len(),
            reverse_runs: diagonals.reverse.len(),
            longest_run: diagonals.longest().map_or(0, |run| run.len()),
            match_density: total_matches as f64 / (matrix.rows * matrix.cols) as f64,
        }
    }
}

/// Match matrix, runs and statistics for one sequence pair.
#[derive(Debug, Clone)]
pub struct DotPlot {
    pub matrix: MatchMatrix,
    pub diagonals: Diagonals,
    pub stats: DotStatistics,
}

impl DotPlot {
    pub fn new(seq_a: &[u8], seq_b: &[u8]) -> Self {
        let matrix = MatchMatrix::new(seq_a, seq_b);
        let diagonals = find_diagonals(&matrix);
        let stats = DotStatistics::compute(&matrix, &diagonals);
        Self {
            matrix,
            diagonals,
            stats,
        }
    }
}
