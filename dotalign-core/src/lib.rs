//! dotalign core library
//!
//! Global alignment with exhaustive co-optimal traceback, symbol-identity dot
//! plots, text/JSON reporting and FASTA input.

pub mod types;
pub mod align;
pub mod dot;
pub mod io;
pub mod report;

// Re-export commonly used types and functions
pub use types::{MatrixCoord, Sequence, GAP_SYMBOL};
pub use align::{
    build, enumerate_optimal_paths, render_alignment, AlignError, AlignResult, AlignedPair,
    GlobalAligner, GlobalAlignment, Move, Path, PathEnumerator, ScoringMatrix, ScoringScheme,
};
pub use dot::{find_diagonals, DiagonalRun, Diagonals, DotPlot, DotStatistics, MatchMatrix};
pub use io::{FastaError, FastaParser};
pub use report::{save_report, write_report, AlignmentSummary, ReportError};

/// Version information for the dotalign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
