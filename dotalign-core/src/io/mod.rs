//! Sequence input
//!
//! Alignment inputs are either literals or the records of a FASTA/FASTQ file.

pub mod fasta;

pub use fasta::{FastaError, FastaParser};
