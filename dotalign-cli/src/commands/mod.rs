//! Command implementations for the dotalign CLI

pub mod align;
pub mod config;
pub mod dot;

use anyhow::Result;
use std::path::Path;

use crate::error::CliError;
use crate::SequenceArgs;
use dotalign_core::{FastaParser, Sequence};

/// Resolve one side from either a literal or a FASTA file.
fn load_side(label: &str, literal: Option<&str>, fasta: Option<&Path>) -> Result<Sequence> {
    match (literal, fasta) {
        (Some(_), Some(_)) => Err(CliError::validation(format!(
            "sequence {label} was given both as a literal and as a file"
        ))
        .into()),
        (Some(text), None) => Ok(Sequence::from_literal(label, text)),
        (None, Some(path)) => {
            if !path.exists() {
                return Err(CliError::file_not_found(path.to_path_buf()).into());
            }
            FastaParser::first_record(path)
        }
        (None, None) => Err(CliError::validation(format!(
            "missing sequence {label}: pass --seq-{label} or --fasta-{label}"
        ))
        .into()),
    }
}

/// Load both input sequences, upper-casing them when comparison is case-insensitive.
pub fn load_pair(args: &SequenceArgs, ignore_case: bool) -> Result<(Sequence, Sequence)> {
    let a = load_side("a", args.seq_a.as_deref(), args.fasta_a.as_deref())?;
    let b = load_side("b", args.seq_b.as_deref(), args.fasta_b.as_deref())?;

    log::info!("Sequence A: {} ({} symbols)", a.id, a.len());
    log::info!("Sequence B: {} ({} symbols)", b.id, b.len());

    if ignore_case {
        Ok((a.to_uppercase(), b.to_uppercase()))
    } else {
        Ok((a, b))
    }
}

/// Provenance comment embedded at the top of exported SVG files.
pub fn provenance_comment(kind: &str, a: &Sequence, b: &Sequence, extra: &[String]) -> String {
    let mut lines = vec![
        "dotalign provenance".to_string(),
        format!(" tool: dotalign v{}", env!("CARGO_PKG_VERSION")),
        format!(" plot: {}", kind),
        format!(" a: {} ({} symbols)", a.id, a.len()),
        format!(" b: {} ({} symbols)", b.id, b.len()),
    ];
    lines.extend(extra.iter().map(|line| format!(" {}", line)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_literal_pair() {
        let args = SequenceArgs {
            seq_a: Some("acgt".into()),
            seq_b: Some("AGGT".into()),
            ..Default::default()
        };
        let (a, b) = load_pair(&args, true).unwrap();
        assert_eq!(a.as_bytes(), b"ACGT");
        assert_eq!(b.as_bytes(), b"AGGT");
        assert_eq!(a.id, "a");
    }

    #[test]
    fn test_fasta_side() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">target\nCTATTGACGTA").unwrap();
        file.flush().unwrap();

        let args = SequenceArgs {
            seq_a: Some("CTATGAA".into()),
            fasta_b: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let (_, b) = load_pair(&args, false).unwrap();
        assert_eq!(b.id, "target");
    }

    #[test]
    fn test_missing_and_conflicting_inputs() {
        let err = load_pair(&SequenceArgs::default(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Validation { .. })
        ));

        let args = SequenceArgs {
            seq_a: Some("A".into()),
            fasta_a: Some("a.fa".into()),
            seq_b: Some("A".into()),
            ..Default::default()
        };
        assert!(load_pair(&args, false).is_err());

        let args = SequenceArgs {
            seq_a: Some("A".into()),
            fasta_b: Some("/nonexistent/b.fa".into()),
            ..Default::default()
        };
        let err = load_pair(&args, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_provenance_comment() {
        let a = Sequence::from_literal("a", "AC");
        let b = Sequence::from_literal("b", "AG");
        let text = provenance_comment("dot", &a, &b, &["runs: 0".to_string()]);
        assert!(text.starts_with("dotalign provenance\n"));
        assert!(text.contains(" a: a (2 symbols)"));
        assert!(text.ends_with(" runs: 0"));
    }
}
