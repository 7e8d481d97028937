//! Dot command implementation - symbol-identity dot plot with diagonal runs

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::commands::{load_pair, provenance_comment};
use crate::config::Config;
use crate::error::CliError;
use crate::SequenceArgs;
use dotalign_core::dot::{DiagonalRun, DotPlot};
use dotalign_render::VectorExporter;

pub fn execute(config: &Config, sequences: SequenceArgs, svg: Option<PathBuf>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(config, &sequences, svg, &mut out)
}

fn describe_run(kind: &str, run: &DiagonalRun) -> String {
    match (run.start(), run.end()) {
        (Some((si, sj)), Some((ei, ej))) => format!(
            "{} ({}, {}) -> ({}, {}) length {}",
            kind,
            si,
            sj,
            ei,
            ej,
            run.len()
        ),
        _ => format!("{} (empty)", kind),
    }
}

fn run<W: Write>(
    config: &Config,
    sequences: &SequenceArgs,
    svg: Option<PathBuf>,
    out: &mut W,
) -> Result<()> {
    log::info!("Starting dot plot");

    let ignore_case = sequences.ignore_case || config.scoring.ignore_case;
    let (seq_a, seq_b) = load_pair(sequences, ignore_case)?;
    let plot = DotPlot::new(seq_a.as_bytes(), seq_b.as_bytes());
    let stats = &plot.stats;

    writeln!(
        out,
        "Matches: {} of {} cells ({:.1}%)",
        stats.total_matches,
        seq_a.len() * seq_b.len(),
        stats.match_density * 100.0
    )?;
    writeln!(out, "Main diagonals: {}", stats.main_runs)?;
    for run in &plot.diagonals.main {
        writeln!(out, "  {}", describe_run("main", run))?;
    }
    writeln!(out, "Reverse diagonals: {}", stats.reverse_runs)?;
    for run in &plot.diagonals.reverse {
        writeln!(out, "  {}", describe_run("reverse", run))?;
    }
    writeln!(out, "Longest run: {}", stats.longest_run)?;

    if let Some(path) = &svg {
        let comment = provenance_comment(
            "dot plot",
            &seq_a,
            &seq_b,
            &[format!(
                "runs: {} main, {} reverse",
                stats.main_runs, stats.reverse_runs
            )],
        );
        VectorExporter::new(config.render.to_export_config(Some(comment)))
            .export_dot_svg(
                path,
                &plot.matrix,
                &plot.diagonals,
                seq_a.as_bytes(),
                seq_b.as_bytes(),
            )
            .map_err(|e| CliError::rendering(format!("{:#}", e)))
            .with_context(|| format!("Failed to export dot plot {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_summary() {
        let args = SequenceArgs {
            seq_a: Some("ABA".into()),
            seq_b: Some("ABA".into()),
            ..Default::default()
        };
        let mut out = Vec::new();
        run(&Config::default(), &args, None, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Matches: 5 of 9 cells (55.6%)\n"));
        assert!(text.contains("Main diagonals: 1\n  main (0, 0) -> (2, 2) length 3\n"));
        assert!(text.contains("Reverse diagonals: 1\n  reverse (0, 2) -> (2, 0) length 3\n"));
        assert!(text.ends_with("Longest run: 3\n"));
    }

    #[test]
    fn test_dot_svg_export() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("dots.svg");
        let args = SequenceArgs {
            seq_a: Some("MKTAYIAKQRQ".into()),
            seq_b: Some("MKTAYIAKQ".into()),
            ..Default::default()
        };

        let mut out = Vec::new();
        run(&Config::default(), &args, Some(svg.clone()), &mut out).unwrap();

        let text = std::fs::read_to_string(&svg).unwrap();
        assert!(text.contains("Main Diagonal"));
        assert!(text.contains("plot: dot plot"));
    }
}
