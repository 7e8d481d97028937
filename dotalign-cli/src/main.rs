use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{format_error_with_suggestions, CliError};

#[derive(Parser)]
#[command(name = "dotalign")]
#[command(about = "dotalign - global alignment with every co-optimal path, plus dot plots")]
#[command(version)]
#[command(long_about = "
dotalign scores two sequences with Needleman-Wunsch under a linear gap penalty
and reports every alignment that reaches the optimal score, not just one.

Examples:
  dotalign align --seq-a CTATGAA --seq-b CTATTGACGTA
  dotalign align --fasta-a a.fa --fasta-b b.fa --gap -2 --report out.txt --svg matrix.svg
  dotalign dot --seq-a MKTAYIAKQRQ --seq-b MKTAYIAKQ --svg dots.svg
  dotalign config --example > dotalign.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Where the two input sequences come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SequenceArgs {
    /// First sequence as a literal (matrix rows)
    #[arg(long, value_name = "SEQ")]
    pub seq_a: Option<String>,

    /// Second sequence as a literal (matrix columns)
    #[arg(long, value_name = "SEQ")]
    pub seq_b: Option<String>,

    /// FASTA/FASTQ file holding the first sequence (first record is used)
    #[arg(long, value_name = "FILE")]
    pub fasta_a: Option<PathBuf>,

    /// FASTA/FASTQ file holding the second sequence (first record is used)
    #[arg(long, value_name = "FILE")]
    pub fasta_b: Option<PathBuf>,

    /// Compare symbols case-insensitively
    #[arg(long)]
    pub ignore_case: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Globally align two sequences and report every optimal alignment
    Align {
        #[command(flatten)]
        sequences: SequenceArgs,

        /// Match score (overrides [scoring] match_score)
        #[arg(long = "match", value_name = "SCORE", allow_hyphen_values = true)]
        match_score: Option<f64>,

        /// Mismatch penalty (overrides [scoring] mismatch_penalty)
        #[arg(long = "mismatch", value_name = "SCORE", allow_hyphen_values = true)]
        mismatch_penalty: Option<f64>,

        /// Gap penalty (overrides [scoring] gap_penalty)
        #[arg(long = "gap", value_name = "SCORE", allow_hyphen_values = true)]
        gap_penalty: Option<f64>,

        /// Fail when more than this many optimal paths exist
        #[arg(long)]
        max_paths: Option<usize>,

        /// Write the text report here instead of stdout
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Write a JSON summary
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Write the scoring matrix heatmap with path overlays as SVG
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,
    },

    /// Build a symbol-identity dot plot and extract diagonal runs
    Dot {
        #[command(flatten)]
        sequences: SequenceArgs,

        /// Write the dot plot as SVG
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,
    },

    /// Show or write the configuration
    Config {
        /// Print the default configuration as TOML
        #[arg(long)]
        example: bool,

        /// Write the default configuration to this file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;
    log::debug!("Using {} worker thread(s)", threads);

    match cli.command {
        Commands::Align {
            sequences,
            match_score,
            mismatch_penalty,
            gap_penalty,
            max_paths,
            report,
            json,
            svg,
        } => {
            commands::align::execute(
                &config,
                sequences,
                match_score,
                mismatch_penalty,
                gap_penalty,
                max_paths,
                report,
                json,
                svg,
            )?;
        }

        Commands::Dot { sequences, svg } => {
            commands::dot::execute(&config, sequences, svg)?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("Error: {}", format_error_with_suggestions(cli_err)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
