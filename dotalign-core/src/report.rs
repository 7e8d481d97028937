//! Text and JSON reports for completed alignments
//!
//! The text report is one block per optimal path:
//!
//! ```text
//! Alignment Result 1 with Score (19.0):
//! CTA-TGA---A
//! CTATTGACGTA
//! ------------------
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::align::{AlignedPair, GlobalAlignment, PairStats, ScoringScheme};
use crate::types::{MatrixCoord, Sequence};

const BLOCK_SEPARATOR: &str = "------------------";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Format a score as float text: `19.0`, `-8.0`, `2.5`.
pub fn format_score(score: f64) -> String {
    if score == 0.0 {
        // Avoid printing "-0.0"
        return "0.0".to_string();
    }
    format!("{:?}", score)
}

/// Write one block per aligned pair, numbered from 1.
pub fn write_report<W: Write>(
    writer: &mut W,
    score: f64,
    pairs: &[AlignedPair],
) -> ReportResult<()> {
    let score = format_score(score);
    for (idx, pair) in pairs.iter().enumerate() {
        writeln!(writer, "Alignment Result {} with Score ({}):", idx + 1, score)?;
        writer.write_all(&pair.aligned_a)?;
        writer.write_all(b"\n")?;
        writer.write_all(&pair.aligned_b)?;
        writer.write_all(b"\n")?;
        writeln!(writer, "{}", BLOCK_SEPARATOR)?;
    }
    Ok(())
}

/// Render the text report into a `String`.
pub fn report_to_string(score: f64, pairs: &[AlignedPair]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(&mut buf, score, pairs);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Create or truncate `path` and write the text report into it.
pub fn save_report<P: AsRef<Path>>(path: P, score: f64, pairs: &[AlignedPair]) -> ReportResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_report(&mut writer, score, pairs)?;
    writer.flush()?;

    log::info!("Wrote {} alignment(s) to {}", pairs.len(), path.display());
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub id: String,
    pub length: usize,
    pub symbols: String,
}

impl From<&Sequence> for SequenceSummary {
    fn from(seq: &Sequence) -> Self {
        Self {
            id: seq.id.clone(),
            length: seq.len(),
            symbols: seq.as_text(),
        }
    }
}

/// One optimal path with its rendered strings and column statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEntry {
    pub index: usize,
    pub path: Vec<MatrixCoord>,
    pub aligned_a: String,
    pub aligned_b: String,
    /// `|` match, `.` mismatch, space for a gap column
    pub midline: String,
    pub stats: PairStats,
    pub identity: f32,
    pub edit_distance: u32,
}

/// Machine-readable record of a complete alignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    pub version: String,
    pub seq_a: SequenceSummary,
    pub seq_b: SequenceSummary,
    pub scheme: ScoringScheme,
    pub score: f64,
    pub matrix: Vec<Vec<f64>>,
    pub alignments: Vec<AlignmentEntry>,
}

impl AlignmentSummary {
    pub fn new(
        seq_a: &Sequence,
        seq_b: &Sequence,
        scheme: &ScoringScheme,
        alignment: &GlobalAlignment,
    ) -> Self {
        let pairs = alignment.aligned_pairs(seq_a.as_bytes(), seq_b.as_bytes());
        let alignments = alignment
            .paths()
            .iter()
            .zip(pairs)
            .enumerate()
            .map(|(idx, (path, pair))| {
                let stats = pair.stats();
                AlignmentEntry {
                    index: idx + 1,
                    path: path.cells().to_vec(),
                    aligned_a: pair.a_text(),
                    aligned_b: pair.b_text(),
                    midline: pair.midline(),
                    identity: stats.identity(),
                    edit_distance: stats.edit_distance(),
                    stats,
                }
            })
            .collect();

        Self {
            version: crate::VERSION.to_string(),
            seq_a: seq_a.into(),
            seq_b: seq_b.into(),
            scheme: *scheme,
            score: alignment.score(),
            matrix: alignment.matrix().to_rows(),
            alignments,
        }
    }

    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ReportResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        log::info!("Wrote alignment summary to {}", path.display());
        Ok(())
    }
}
