//! FASTA/FASTQ sequence file parser
//!
//! Parsing is delegated to needletail. Files ending in `.gz` are decompressed
//! with flate2 before parsing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use needletail::parser::SequenceRecord;
use needletail::{parse_fastx_file, parse_fastx_reader};
use thiserror::Error;

use crate::types::Sequence;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("Invalid sequence format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

/// FASTA/FASTQ parser producing [`Sequence`] records
pub struct FastaParser;

impl FastaParser {
    /// Parse every record in a FASTA/FASTQ file, gzipped or not.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let path = path.as_ref();
        let sequences = if path.to_string_lossy().ends_with(".gz") {
            let file = File::open(path)
                .map_err(FastaError::Io)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Self::parse_reader(BufReader::new(GzDecoder::new(file)))?
        } else {
            Self::parse_uncompressed_file(path)?
        };

        log::debug!(
            "Read {} sequence(s) from {}",
            sequences.len(),
            path.display()
        );
        Ok(sequences)
    }

    fn parse_uncompressed_file(path: &Path) -> Result<Vec<Sequence>> {
        let mut reader = parse_fastx_file(path).map_err(|e| FastaError::Parse(e.to_string()))?;

        let mut sequences = Vec::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            sequences.push(Self::record_to_sequence(&record)?);
        }

        if sequences.is_empty() {
            return Err(FastaError::EmptyFile.into());
        }
        Ok(sequences)
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn parse_reader<R: Read + Send>(reader: R) -> Result<Vec<Sequence>> {
        let mut fastx_reader =
            parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;

        let mut sequences = Vec::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            sequences.push(Self::record_to_sequence(&record)?);
        }

        if sequences.is_empty() {
            return Err(FastaError::EmptyFile.into());
        }
        Ok(sequences)
    }

    /// First record of a file; the CLI aligns one sequence per file.
    pub fn first_record<P: AsRef<Path>>(path: P) -> Result<Sequence> {
        let path = path.as_ref();
        let mut sequences = Self::parse_file(path)?;
        if sequences.len() > 1 {
            log::warn!(
                "{} holds {} records, using the first ({})",
                path.display(),
                sequences.len(),
                sequences[0].id
            );
        }
        // parse_file never returns an empty list
        Ok(sequences.swap_remove(0))
    }

    /// Split the header line into id and description at the first whitespace.
    fn record_to_sequence(record: &SequenceRecord) -> Result<Sequence> {
        let header = String::from_utf8_lossy(record.id()).into_owned();
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or_default().to_string();
        if id.is_empty() {
            return Err(FastaError::InvalidFormat("record without an identifier".to_string()).into());
        }

        let mut sequence = Sequence::new(id, record.seq().to_vec());
        if let Some(desc) = parts.next().map(str::trim).filter(|d| !d.is_empty()) {
            sequence = sequence.with_description(desc.to_string());
        }
        Ok(sequence)
    }
}
