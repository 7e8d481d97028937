//! Align command implementation - score, enumerate every optimal path and report

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::commands::{load_pair, provenance_comment};
use crate::config::Config;
use crate::error::CliError;
use crate::SequenceArgs;
use dotalign_core::report::{save_report, write_report, AlignmentSummary};
use dotalign_core::GlobalAligner;
use dotalign_render::VectorExporter;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    sequences: SequenceArgs,
    match_score: Option<f64>,
    mismatch_penalty: Option<f64>,
    gap_penalty: Option<f64>,
    max_paths: Option<usize>,
    report: Option<PathBuf>,
    json: Option<PathBuf>,
    svg: Option<PathBuf>,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(
        config,
        &sequences,
        (match_score, mismatch_penalty, gap_penalty),
        max_paths,
        report,
        json,
        svg,
        &mut out,
    )
}

#[allow(clippy::too_many_arguments)]
fn run<W: Write>(
    config: &Config,
    sequences: &SequenceArgs,
    (match_score, mismatch_penalty, gap_penalty): (Option<f64>, Option<f64>, Option<f64>),
    max_paths: Option<usize>,
    report: Option<PathBuf>,
    json: Option<PathBuf>,
    svg: Option<PathBuf>,
    out: &mut W,
) -> Result<()> {
    log::info!("Starting global alignment");

    let ignore_case = sequences.ignore_case || config.scoring.ignore_case;
    let (seq_a, seq_b) = load_pair(sequences, ignore_case)?;

    let scheme = config.scoring.to_scheme(match_score, mismatch_penalty, gap_penalty);
    let max_paths = max_paths.or(config.traceback.max_paths);
    log::info!(
        "Scoring: match {}, mismatch {}, gap {}{}",
        scheme.match_score,
        scheme.mismatch_penalty,
        scheme.gap_penalty,
        max_paths.map(|m| format!(", at most {} path(s)", m)).unwrap_or_default()
    );

    let aligner = GlobalAligner::new(scheme).with_max_paths(max_paths);
    let alignment = aligner
        .align(seq_a.as_bytes(), seq_b.as_bytes())
        .map_err(CliError::from)?;
    let pairs = alignment.aligned_pairs(seq_a.as_bytes(), seq_b.as_bytes());

    for (idx, pair) in pairs.iter().enumerate() {
        let stats = pair.stats();
        log::debug!(
            "Path {}: {} columns, {} matches, {} mismatches, {} gaps, edit distance {}, identity {:.1}%",
            idx + 1,
            stats.columns(),
            stats.matches,
            stats.mismatches,
            stats.gaps(),
            stats.edit_distance(),
            stats.identity()
        );
        log::trace!("\n{}\n{}\n{}", pair.a_text(), pair.midline(), pair.b_text());
    }

    match &report {
        Some(path) => save_report(path, alignment.score(), &pairs)
            .with_context(|| format!("Failed to write report {}", path.display()))?,
        None => write_report(out, alignment.score(), &pairs).context("Failed to write report")?,
    }

    if let Some(path) = &json {
        AlignmentSummary::new(&seq_a, &seq_b, &scheme, &alignment)
            .save_json(path)
            .with_context(|| format!("Failed to write JSON summary {}", path.display()))?;
    }

    if let Some(path) = &svg {
        let comment = provenance_comment(
            "scoring matrix",
            &seq_a,
            &seq_b,
            &[
                format!(
                    "scheme: match={}, mismatch={}, gap={}",
                    scheme.match_score, scheme.mismatch_penalty, scheme.gap_penalty
                ),
                format!("optimal score: {}", alignment.score()),
                format!("paths: {}", alignment.paths().len()),
            ],
        );
        let exporter = VectorExporter::new(config.render.to_export_config(Some(comment)));
        exporter
            .export_scoring_svg(
                path,
                alignment.matrix(),
                seq_a.as_bytes(),
                seq_b.as_bytes(),
                alignment.paths(),
            )
            .map_err(|e| CliError::rendering(format!("{:#}", e)))?;
    }

    log::info!(
        "Optimal score {} with {} co-optimal alignment(s)",
        alignment.score(),
        pairs.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_args(a: &str, b: &str) -> SequenceArgs {
        SequenceArgs {
            seq_a: Some(a.into()),
            seq_b: Some(b.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_to_stdout() {
        let mut out = Vec::new();
        run(
            &Config::default(),
            &literal_args("CTATGAA", "CTATTGACGTA"),
            (None, None, None),
            None,
            None,
            None,
            None,
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("with Score (19.0):").count(), 2);
        assert!(text.contains("CTA-TGA---A\nCTATTGACGTA\n"));
        assert!(text.contains("CTAT-GA---A\nCTATTGACGTA\n"));
    }

    #[test]
    fn test_outputs_written_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.txt");
        let json = dir.path().join("summary.json");
        let svg = dir.path().join("matrix.svg");

        let mut config = Config::default();
        config.render.show_footer = false;

        let mut out = Vec::new();
        run(
            &config,
            &literal_args("", "AB"),
            (None, None, None),
            None,
            Some(report.clone()),
            Some(json.clone()),
            Some(svg.clone()),
            &mut out,
        )
        .unwrap();

        assert!(out.is_empty());
        assert_eq!(
            std::fs::read_to_string(&report).unwrap(),
            "Alignment Result 1 with Score (-8.0):\n--\nAB\n------------------\n"
        );
        assert!(std::fs::read_to_string(&json).unwrap().contains("\"score\": -8.0"));
        let svg_text = std::fs::read_to_string(&svg).unwrap();
        assert!(svg_text.contains("dotalign provenance"));
        assert!(svg_text.contains("Path 1"));
    }

    #[test]
    fn test_overrides_and_limit() {
        let mut out = Vec::new();
        let err = run(
            &Config::default(),
            &literal_args("ACGT", "AGGT"),
            (Some(2.0), Some(-2.0), Some(-1.0)),
            Some(3),
            None,
            None,
            None,
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Alignment { .. })
        ));
    }
}
