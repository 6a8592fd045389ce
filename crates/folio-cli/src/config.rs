//! Settings resolution: CLI flags override the config file, which overrides
//! defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const DEFAULT_STORE: &str = "folio.db";
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
  #[serde(default)]
  pub store:     Option<PathBuf>,
  #[serde(default)]
  pub imgbb_key: Option<String>,
  #[serde(default)]
  pub url:       Option<String>,
  #[serde(default)]
  pub email:     Option<String>,
  #[serde(default)]
  pub password:  Option<String>,
}

impl ConfigFile {
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// Flags as given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
  pub store:     Option<PathBuf>,
  pub imgbb_key: Option<String>,
  pub url:       Option<String>,
  pub email:     Option<String>,
  pub password:  Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
  pub store:     PathBuf,
  pub imgbb_key: Option<String>,
  pub url:       String,
  pub email:     Option<String>,
  pub password:  Option<String>,
}

impl Settings {
  pub fn resolve(flags: Overrides, file: ConfigFile) -> Self {
    fn non_empty(s: Option<String>) -> Option<String> { s.filter(|s| !s.is_empty()) }

    Self {
      store:     flags
        .store
        .or(file.store)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE)),
      imgbb_key: non_empty(flags.imgbb_key).or(non_empty(file.imgbb_key)),
      url:       non_empty(flags.url)
        .or(non_empty(file.url))
        .unwrap_or_else(|| DEFAULT_URL.to_string()),
      email:     non_empty(flags.email).or(non_empty(file.email)),
      password:  non_empty(flags.password).or(non_empty(file.password)),
    }
  }

  pub fn imgbb_key(&self) -> Result<&str> {
    self
      .imgbb_key
      .as_deref()
      .ok_or_else(|| anyhow!("no image host key; pass --imgbb-key or set imgbb_key in the config file"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_beat_file_beats_defaults() {
    let file: ConfigFile = toml::from_str(
      r#"
        store = "/var/lib/folio.db"
        url = "http://folio.internal"
        imgbb_key = ""
      "#,
    )
    .unwrap();
    let flags = Overrides { url: Some("http://override".into()), ..Default::default() };

    let s = Settings::resolve(flags, file);
    assert_eq!(s.store, PathBuf::from("/var/lib/folio.db"));
    assert_eq!(s.url, "http://override");
    assert_eq!(s.imgbb_key, None);
    assert!(s.imgbb_key().is_err());
  }

  #[test]
  fn defaults_apply_without_a_file() {
    let s = Settings::resolve(Overrides::default(), ConfigFile::default());
    assert_eq!(s.store, PathBuf::from(DEFAULT_STORE));
    assert_eq!(s.url, DEFAULT_URL);
  }
}
