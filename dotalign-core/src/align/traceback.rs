//! Exhaustive traceback over a completed scoring matrix.
//!
//! Every cell may be reachable from up to three predecessors with the same
//! score. The enumerator walks that predecessor DAG from the terminal cell to
//! the origin with an explicit work-list and materializes every walk as a
//! [`Path`].

use serde::{Deserialize, Serialize};

use super::matrix::ScoringMatrix;
use super::scheme::ScoringScheme;
use super::{AlignError, AlignResult};
use crate::types::MatrixCoord;

/// Predecessor relation between a cell and the cell it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Consume one symbol from each sequence
    Diagonal,
    /// Consume a symbol from sequence A only (gap in B)
    Up,
    /// Consume a symbol from sequence B only (gap in A)
    Left,
}

impl Move {
    /// Exploration order; the first enumerated path is the classic single traceback.
    pub const ALL: [Move; 3] = [Move::Diagonal, Move::Up, Move::Left];

    /// Cell this move leads back to, if it stays inside the matrix.
    pub fn predecessor(self, (row, col): MatrixCoord) -> Option<MatrixCoord> {
        match self {
            Move::Diagonal if row > 0 && col > 0 => Some((row - 1, col - 1)),
            Move::Up if row > 0 => Some((row - 1, col)),
            Move::Left if col > 0 => Some((row, col - 1)),
            _ => None,
        }
    }

    /// Classify the step between two consecutive path cells (destination first).
    pub fn between(from: MatrixCoord, to: MatrixCoord) -> Option<Move> {
        let (fi, fj) = from;
        let (ti, tj) = to;
        match (fi.checked_sub(ti), fj.checked_sub(tj)) {
            (Some(1), Some(1)) => Some(Move::Diagonal),
            (Some(1), Some(0)) => Some(Move::Up),
            (Some(0), Some(1)) => Some(Move::Left),
            _ => None,
        }
    }

    /// Score contribution of taking this move into `cell`.
    pub fn contribution(
        self,
        (row, col): MatrixCoord,
        seq_a: &[u8],
        seq_b: &[u8],
        scheme: &ScoringScheme,
    ) -> f64 {
        match self {
            Move::Diagonal => scheme.substitution(seq_a[row - 1], seq_b[col - 1]),
            Move::Up | Move::Left => scheme.gap_penalty,
        }
    }
}

/// One optimal alignment, as matrix coordinates from `(n, m)` down to `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<MatrixCoord>,
}

impl Path {
    /// Wrap cells that are already ordered destination to origin.
    pub fn from_cells(cells: Vec<MatrixCoord>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[MatrixCoord] {
        &self.cells
    }

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

    /// Moves in traversal order; `None` entries mark an invalid step.
    pub fn moves(&self) -> impl Iterator<Item = Option<Move>> + '_ {
        self.cells.windows(2).map(|w| Move::between(w[0], w[1]))
    }

    /// Cells in origin-to-destination order, as plotted.
    pub fn forward(&self) -> impl Iterator<Item = MatrixCoord> + '_ {
        self.cells.iter().rev().copied()
    }

    /// Sum of per-step score contributions along the path.
    pub fn score(&self, seq_a: &[u8], seq_b: &[u8], scheme: &ScoringScheme) -> Option<f64> {
        let mut total = 0.0;
        for w in self.cells.windows(2) {
            let step = Move::between(w[0], w[1])?;
            total += step.contribution(w[0], seq_a, seq_b, scheme);
        }
        Some(total)
    }
}

/// Work item: the partial walk from the terminal cell to its current head.
struct Branch {
    cells: Vec<MatrixCoord>,
}

/// Enumerates every co-optimal path through a scoring matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEnumerator {
    max_paths: Option<usize>,
}

impl PathEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`AlignError::PathLimitExceeded`] once more than `limit` paths exist.
    pub fn with_max_paths(mut self, limit: usize) -> Self {
        self.max_paths = Some(limit);
        self
    }

    pub fn with_optional_max_paths(mut self, limit: Option<usize>) -> Self {
        self.max_paths = limit;
        self
    }

    pub fn max_paths(&self) -> Option<usize> {
        self.max_paths
    }

    /// Every move whose re-derived candidate equals the stored score at `cell`.
    pub fn valid_moves(
        matrix: &ScoringMatrix,
        cell: MatrixCoord,
        seq_a: &[u8],
        seq_b: &[u8],
        scheme: &ScoringScheme,
    ) -> Vec<Move> {
        let current = matrix.get(cell.0, cell.1);
        Move::ALL
            .iter()
            .copied()
            .filter(|mv| {
                mv.predecessor(cell).is_some_and(|(pi, pj)| {
                    let candidate = matrix.get(pi, pj) + mv.contribution(cell, seq_a, seq_b, scheme);
                    scheme.scores_equal(candidate, current)
                })
            })
            .collect()
    }

    /// Depth-first enumeration of all optimal paths, Diagonal before Up before Left.
    pub fn enumerate(
        &self,
        matrix: &ScoringMatrix,
        seq_a: &[u8],
        seq_b: &[u8],
        scheme: &ScoringScheme,
    ) -> AlignResult<Vec<Path>> {
        matrix.check_dimensions(seq_a, seq_b)?;

        let terminal = matrix.terminal();
        let mut paths = Vec::new();
        let mut stack = vec![Branch {
            cells: vec![terminal],
        }];

        while let Some(branch) = stack.pop() {
            let head = *branch.cells.last().ok_or(AlignError::InconsistentMatrix {
                row: terminal.0,
                col: terminal.1,
            })?;

            if head == (0, 0) {
                if let Some(limit) = self.max_paths {
                    if paths.len() >= limit {
                        log::warn!("Traceback stopped: more than {} optimal paths", limit);
                        return Err(AlignError::PathLimitExceeded { limit });
                    }
                }
                paths.push(Path::from_cells(branch.cells));
                continue;
            }

            let moves = Self::valid_moves(matrix, head, seq_a, seq_b, scheme);
            if moves.is_empty() {
                return Err(AlignError::InconsistentMatrix {
                    row: head.0,
                    col: head.1,
                });
            }

            // Reverse push so the highest-priority move is popped first
            for next in moves.iter().rev().filter_map(|mv| mv.predecessor(head)) {
                let mut cells = branch.cells.clone();
                cells.push(next);
                stack.push(Branch { cells });
            }
        }

        log::debug!(
            "Enumerated {} optimal path(s) from cell {:?}",
            paths.len(),
            terminal
        );

        Ok(paths)
    }
}

/// Enumerate every optimal path with no ceiling.
pub fn enumerate_optimal_paths(
    matrix: &ScoringMatrix,
    seq_a: &[u8],
    seq_b: &[u8],
    scheme: &ScoringScheme,
) -> AlignResult<Vec<Path>> {
    PathEnumerator::new().enumerate(matrix, seq_a, seq_b, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::matrix::build;

    fn paths_for(a: &[u8], b: &[u8], scheme: &ScoringScheme) -> Vec<Path> {
        let matrix = build(a, b, scheme).unwrap();
        enumerate_optimal_paths(&matrix, a, b, scheme).unwrap()
    }

    #[test]
    fn test_move_predecessors_respect_bounds() {
        assert_eq!(Move::Diagonal.predecessor((0, 3)), None);
        assert_eq!(Move::Up.predecessor((0, 3)), None);
        assert_eq!(Move::Left.predecessor((0, 3)), Some((0, 2)));
        assert_eq!(Move::Diagonal.predecessor((2, 2)), Some((1, 1)));
    }

    #[test]
    fn test_move_between() {
        assert_eq!(Move::between((2, 2), (1, 1)), Some(Move::Diagonal));
        assert_eq!(Move::between((2, 2), (1, 2)), Some(Move::Up));
        assert_eq!(Move::between((2, 2), (2, 1)), Some(Move::Left));
        assert_eq!(Move::between((2, 2), (0, 0)), None);
        assert_eq!(Move::between((1, 1), (2, 2)), None);
    }

    #[test]
    fn test_fixture_has_two_paths() {
        let scheme = ScoringScheme::new(5.0, -2.0, -4.0);
        let paths = paths_for(b"CTATGAA", b"CTATTGACGTA", &scheme);

        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[0].cells(),
            &[
                (7, 11), (6, 10), (6, 9), (6, 8), (6, 7), (5, 6),
                (4, 5), (3, 4), (3, 3), (2, 2), (1, 1), (0, 0)
            ]
        );
        assert_eq!(paths[1].cells()[7], (4, 4));
    }

    #[test]
    fn test_single_cell_matrix() {
        let paths = paths_for(b"", b"", &ScoringScheme::default());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].cells(), &[(0, 0)]);
        assert_eq!(paths[0].score(b"", b"", &ScoringScheme::default()), Some(0.0));
    }

    #[test]
    fn test_gap_only_path() {
        let paths = paths_for(b"", b"AB", &ScoringScheme::default());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].cells(), &[(0, 2), (0, 1), (0, 0)]);
    }

    #[test]
    fn test_tie_produces_multiple_paths() {
        // One mismatch (-2) ties with two gaps (-1 each)
        let scheme = ScoringScheme::new(2.0, -2.0, -1.0);
        let paths = paths_for(b"ACGT", b"AGGT", &scheme);
        assert_eq!(paths.len(), 4);

        let mut unique = paths.clone();
        unique.sort_by(|a, b| a.cells().cmp(b.cells()));
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_every_path_scores_terminal_value() {
        let scheme = ScoringScheme::unit();
        let (a, b) = (b"GATTACA".as_slice(), b"GCATGCU".as_slice());
        let matrix = build(a, b, &scheme).unwrap();
        let paths = enumerate_optimal_paths(&matrix, a, b, &scheme).unwrap();

        assert_eq!(paths.len(), 3);
        for path in &paths {
            assert_eq!(path.start(), Some((7, 7)));
            assert_eq!(path.end(), Some((0, 0)));
            assert!(path.moves().all(|m| m.is_some()));
            assert_eq!(path.score(a, b, &scheme), Some(matrix.terminal_score()));
        }
    }

    #[test]
    fn test_large_integral_scores_do_not_fork_on_near_ties() {
        // Diagonal into (2, 2) lands exactly one below the two gap moves
        let scheme = ScoringScheme::new(1e12, -3.0, -1.0);
        let matrix = build(b"AC", b"AG", &scheme).unwrap();
        let paths = enumerate_optimal_paths(&matrix, b"AC", b"AG", &scheme).unwrap();

        assert_eq!(matrix.terminal_score(), 999_999_999_998.0);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.score(b"AC", b"AG", &scheme), Some(matrix.terminal_score()));
            assert_ne!(path.cells()[1], (1, 1));
        }
    }

    #[test]
    fn test_path_limit_exceeded() {
        let scheme = ScoringScheme::new(2.0, -2.0, -1.0);
        let matrix = build(b"ACGT", b"AGGT", &scheme).unwrap();

        let err = PathEnumerator::new()
            .with_max_paths(3)
            .enumerate(&matrix, b"ACGT", b"AGGT", &scheme)
            .unwrap_err();
        assert!(matches!(err, AlignError::PathLimitExceeded { limit: 3 }));

        let ok = PathEnumerator::new()
            .with_max_paths(4)
            .enumerate(&matrix, b"ACGT", b"AGGT", &scheme)
            .unwrap();
        assert_eq!(ok.len(), 4);
    }

    #[test]
    fn test_inconsistent_matrix_detected() {
        let scheme = ScoringScheme::unit();
        // Matrix scored with a different scheme cannot be walked back under this one
        let foreign = build(b"AC", b"AC", &ScoringScheme::new(10.0, -3.0, -7.0)).unwrap();
        let err = enumerate_optimal_paths(&foreign, b"AC", b"AC", &scheme).unwrap_err();
        assert!(matches!(err, AlignError::InconsistentMatrix { .. }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let scheme = ScoringScheme::unit();
        let matrix = build(b"AC", b"AC", &scheme).unwrap();
        let err = enumerate_optimal_paths(&matrix, b"ACG", b"AC", &scheme).unwrap_err();
        assert!(matches!(err, AlignError::DimensionMismatch { .. }));
    }
}
