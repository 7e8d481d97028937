//! Configuration handling for the dotalign CLI
//!
//! Supports loading configuration from dotalign.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use dotalign_core::ScoringScheme;
use dotalign_render::ExportConfig;

pub const DEFAULT_CONFIG_FILE: &str = "dotalign.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub traceback: TracebackConfig,
    pub render: RenderConfig,
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Reward for identical symbols
    #[serde(default = "default_match_score")]
    pub match_score: f64,

    /// Cost for differing symbols
    #[serde(default = "default_mismatch_penalty")]
    pub mismatch_penalty: f64,

    /// Cost per gap position
    #[serde(default = "default_gap_penalty")]
    pub gap_penalty: f64,

    /// Upper-case both sequences before aligning
    #[serde(default)]
    pub ignore_case: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracebackConfig {
    /// Fail instead of enumerating more than this many optimal paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Matrix cell edge in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Timestamped footer; turn off for byte-identical output
    #[serde(default = "default_true")]
    pub show_footer: bool,

    /// Print scores inside heatmap cells
    #[serde(default = "default_true")]
    pub show_values: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use; omitted from written files when it is
    /// the host's core count
    #[serde(default = "default_threads", skip_serializing_if = "is_default_threads")]
    pub threads: usize,
}

// Default value functions
fn default_match_score() -> f64 { 5.0 }
fn default_mismatch_penalty() -> f64 { -2.0 }
fn default_gap_penalty() -> f64 { -4.0 }
fn default_cell_size() -> f32 { 40.0 }
fn default_font_size() -> u32 { 12 }
fn default_true() -> bool { true }
fn default_threads() -> usize { num_cpus::get() }
fn is_default_threads(threads: &usize) -> bool { *threads == default_threads() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: default_match_score(),
            mismatch_penalty: default_mismatch_penalty(),
            gap_penalty: default_gap_penalty(),
            ignore_case: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            font_size: default_font_size(),
            show_legend: true,
            show_footer: true,
            show_values: true,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { threads: default_threads() }
    }
}

impl ScoringConfig {
    /// Scheme from the file values, with any command-line overrides applied.
    pub fn to_scheme(
        &self,
        match_score: Option<f64>,
        mismatch_penalty: Option<f64>,
        gap_penalty: Option<f64>,
    ) -> ScoringScheme {
        ScoringScheme::new(
            match_score.unwrap_or(self.match_score),
            mismatch_penalty.unwrap_or(self.mismatch_penalty),
            gap_penalty.unwrap_or(self.gap_penalty),
        )
    }
}

impl RenderConfig {
    pub fn to_export_config(&self, provenance: Option<String>) -> ExportConfig {
        ExportConfig {
            cell_size: self.cell_size,
            font_size: self.font_size,
            show_legend: self.show_legend,
            show_footer: self.show_footer,
            show_values: self.show_values,
            provenance_comment: provenance,
            ..Default::default()
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.match_score, 5.0);
        assert_eq!(config.scoring.mismatch_penalty, -2.0);
        assert_eq!(config.scoring.gap_penalty, -4.0);
        assert_eq!(config.traceback.max_paths, None);
        assert_eq!(config.render.cell_size, 40.0);
        assert!(config.render.show_footer);
        assert!(config.general.threads >= 1);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.traceback.max_paths = Some(25);
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded.scoring.gap_penalty, config.scoring.gap_penalty);
        assert_eq!(loaded.traceback.max_paths, Some(25));
        assert_eq!(loaded.render.font_size, config.render.font_size);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[scoring]\ngap_penalty = -1.5\n")?;

        let config = Config::load(Some(file.path()))?;
        assert_eq!(config.scoring.gap_penalty, -1.5);
        assert_eq!(config.scoring.match_score, 5.0);
        assert!(config.render.show_legend);
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[scoring\nmatch_score = ")?;
        assert!(Config::load(Some(file.path())).is_err());
        Ok(())
    }

    #[test]
    fn test_scheme_overrides() {
        let scoring = ScoringConfig::default();
        let scheme = scoring.to_scheme(Some(1.0), None, Some(-1.0));
        assert_eq!(scheme, ScoringScheme::new(1.0, -2.0, -1.0));
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[scoring]"));
        assert!(example.contains("[render]"));
        assert!(!example.contains("threads"));

        let parsed: Config = toml::from_str(&example).unwrap();
        assert_eq!(parsed.scoring.match_score, 5.0);
        assert_eq!(parsed.traceback.max_paths, None);
        assert_eq!(parsed.general.threads, default_threads());
    }

    #[test]
    fn test_explicit_thread_count_is_written() -> Result<()> {
        let mut config = Config::default();
        config.general.threads = default_threads() + 1;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let text = std::fs::read_to_string(temp_file.path())?;
        assert!(text.contains(&format!("threads = {}", default_threads() + 1)));

        let loaded = Config::load_from_file(temp_file.path())?;
        assert_eq!(loaded.general.threads, default_threads() + 1);
        Ok(())
    }
}
