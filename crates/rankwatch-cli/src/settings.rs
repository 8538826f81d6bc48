//! Layered settings: optional TOML file, then `RANKWATCH__*` environment
//! variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rankwatch_agent::GeminiConfig;
use rankwatch_search::SearchConfig;
use serde::Deserialize;

pub const DEFAULT_HISTORY_PATH: &str = "rank_history.csv";
pub const DEFAULT_REPORT_PATH: &str = "rank_history_report.pdf";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_history_path")]
  pub history_path: PathBuf,
  #[serde(default = "default_report_path")]
  pub report_path:  PathBuf,
  #[serde(default)]
  pub search:       SearchConfig,
  #[serde(default)]
  pub agent:        GeminiConfig,
}

fn default_history_path() -> PathBuf { PathBuf::from(DEFAULT_HISTORY_PATH) }

fn default_report_path() -> PathBuf { PathBuf::from(DEFAULT_REPORT_PATH) }

impl Settings {
  /// Read `path` (if it exists) under environment overrides such as
  /// `RANKWATCH__SEARCH__API_KEY`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("RANKWATCH").separator("__"))
      .build()
      .with_context(|| format!("failed to read settings from {}", path.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.history_path = expand_tilde(&settings.history_path);
    settings.report_path = expand_tilde(&settings.report_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use rankwatch_core::observation::Region;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.history_path, PathBuf::from(DEFAULT_HISTORY_PATH));
    assert_eq!(settings.report_path, PathBuf::from(DEFAULT_REPORT_PATH));
    assert_eq!(settings.search.max_results, 100);
    assert_eq!(settings.agent.model, "gemini-1.5-pro");
  }

  #[test]
  fn file_values_are_read() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      r#"
history_path = "data/history.csv"

[search]
default_scope = "global-cx"
max_results = 50

[search.scopes]
Singapore = "sg-cx"

[agent]
model = "gemini-1.5-flash"
max_steps = 3
"#
    )
    .unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.history_path, PathBuf::from("data/history.csv"));
    assert_eq!(settings.search.default_scope, "global-cx");
    assert_eq!(settings.search.max_results, 50);
    assert_eq!(settings.search.scope_for(&Region::Singapore), "sg-cx");
    assert_eq!(settings.search.scope_for(&Region::Thailand), "global-cx");
    assert_eq!(settings.agent.model, "gemini-1.5-flash");
    assert_eq!(settings.agent.max_steps, 3);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/ranks.csv")),
      PathBuf::from(home).join("ranks.csv")
    );
    assert_eq!(expand_tilde(Path::new("ranks.csv")), PathBuf::from("ranks.csv"));
  }
}
