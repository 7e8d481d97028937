//! Config command implementation - print or write the default configuration

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(config, example, output, &mut out)
}

fn run<W: std::io::Write>(
    config: &Config,
    example: bool,
    output: Option<PathBuf>,
    out: &mut W,
) -> Result<()> {
    if let Some(path) = output {
        let target = if example { Config::default() } else { config.clone() };
        target.save_to_file(&path)?;
        log::info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let text = if example {
        Config::example_toml()?
    } else {
        toml::to_string_pretty(config).map_err(|e| CliError::config(e.to_string()))?
    };
    write!(out, "{}", text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_example() {
        let mut out = Vec::new();
        run(&Config::default(), true, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[scoring]"));
        assert!(text.contains("gap_penalty = -4.0"));
    }

    #[test]
    fn test_write_effective_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dotalign.toml");

        let mut config = Config::default();
        config.scoring.gap_penalty = -1.0;
        run(&config, false, Some(path.clone()), &mut Vec::new()).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.scoring.gap_penalty, -1.0);
    }
}
