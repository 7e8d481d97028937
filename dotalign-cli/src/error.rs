//! Error handling for the dotalign CLI

use std::path::PathBuf;
use thiserror::Error;

use dotalign_core::AlignError;

/// Main error type for dotalign CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Alignment error: {source}")]
    Alignment {
        #[from]
        source: AlignError,
    },

    #[error("Rendering error: {message}")]
    Rendering { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Compressed FASTA files need a .gz extension",
                path.display()
            ));
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Give each sequence either as a literal (--seq-a/--seq-b) or as a file (--fasta-a/--fasta-b)\n\
                 • Run 'dotalign align --help' for the full option list",
            );
        }

        CliError::Alignment { source } => match source {
            AlignError::PathLimitExceeded { limit } => {
                message.push_str(&format!(
                    "\n\nSuggestions:\n\
                     • Raise the ceiling above {} with --max-paths\n\
                     • Remove max_paths from [traceback] to enumerate every path\n\
                     • Choose scores that break ties between gaps and mismatches",
                    limit
                ));
            }
            AlignError::InvalidScheme(_) => {
                message.push_str(
                    "\n\nSuggestions:\n\
                     • Use finite numbers for --match, --mismatch and --gap",
                );
            }
            _ => {}
        },

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your dotalign.toml configuration file\n\
                 • Use 'dotalign config --example' to generate a sample configuration",
            );
        }

        CliError::Rendering { .. } => {}
    }

    message
}
