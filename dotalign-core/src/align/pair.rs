use serde::{Deserialize, Serialize};
use std::fmt;

use super::traceback::{Move, Path};
use crate::types::GAP_SYMBOL;

/// Two gapped strings of equal length derived from one [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
}

/// Column counts over an aligned pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub matches: u32,
    pub mismatches: u32,
    /// Gap in A, symbol from B
    pub insertions: u32,
    /// Symbol from A, gap in B
    pub deletions: u32,
}

impl PairStats {
    pub fn gaps(&self) -> u32 {
        self.insertions + self.deletions
    }

    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.gaps()
    }

    /// Identity as a percentage of alignment columns
    pub fn identity(&self) -> f32 {
        let total = self.columns();
        if total == 0 {
            return 0.0;
        }
        (self.matches as f32 / total as f32) * 100.0
    }

    pub fn edit_distance(&self) -> u32 {
        self.mismatches + self.gaps()
    }
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    pub fn a_text(&self) -> String {
        String::from_utf8_lossy(&self.aligned_a).into_owned()
    }

    pub fn b_text(&self) -> String {
        String::from_utf8_lossy(&self.aligned_b).into_owned()
    }

    /// Sequence A with gap symbols removed.
    pub fn ungapped_a(&self) -> Vec<u8> {
        self.aligned_a.iter().copied().filter(|&c| c != GAP_SYMBOL).collect()
    }

    /// Sequence B with gap symbols removed.
    pub fn ungapped_b(&self) -> Vec<u8> {
        self.aligned_b.iter().copied().filter(|&c| c != GAP_SYMBOL).collect()
    }

    pub fn stats(&self) -> PairStats {
        let mut stats = PairStats::default();
        for (&a, &b) in self.aligned_a.iter().zip(&self.aligned_b) {
            match (a == GAP_SYMBOL, b == GAP_SYMBOL) {
                (true, false) => stats.insertions += 1,
                (false, true) => stats.deletions += 1,
                _ if a == b => stats.matches += 1,
                _ => stats.mismatches += 1,
            }
        }
        stats
    }

    /// Midline in the usual `|` / `.` / space convention.
    pub fn midline(&self) -> String {
        self.aligned_a
            .iter()
            .zip(&self.aligned_b)
            .map(|(&a, &b)| {
                if a == GAP_SYMBOL || b == GAP_SYMBOL {
                    ' '
                } else if a == b {
                    '|'
                } else {
                    '.'
                }
            })
            .collect()
    }
}

impl fmt::Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.a_text())?;
        write!(f, "{}", self.b_text())
    }
}

/// Turn a path into the two gapped strings it describes.
///
/// Steps are classified by comparing consecutive coordinates: a column-only
/// step puts a gap in A, a row-only step puts a gap in B, and a diagonal step
/// pairs both symbols whether or not they match. Steps that are none of those
/// are skipped.
pub fn render_alignment(path: &Path, seq_a: &[u8], seq_b: &[u8]) -> AlignedPair {
    let mut aligned_a = Vec::with_capacity(path.len());
    let mut aligned_b = Vec::with_capacity(path.len());

    for w in path.cells().windows(2) {
        let (i, j) = w[0];
        match Move::between(w[0], w[1]) {
            Some(Move::Left) => {
                aligned_a.push(GAP_SYMBOL);
                aligned_b.push(seq_b[j - 1]);
            }
            Some(Move::Up) => {
                aligned_a.push(seq_a[i - 1]);
                aligned_b.push(GAP_SYMBOL);
            }
            Some(Move::Diagonal) => {
                aligned_a.push(seq_a[i - 1]);
                aligned_b.push(seq_b[j - 1]);
            }
            None => {
                log::warn!("Skipping non-adjacent path step {:?} -> {:?}", w[0], w[1]);
            }
        }
    }

    // Built destination to origin
    aligned_a.reverse();
    aligned_b.reverse();

    AlignedPair {
        aligned_a,
        aligned_b,
    }
}
