use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub store: StoreConfig,
  /// Custom title for the header (defaults to the store host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Base URL of the store project, e.g. https://xyz.supabase.co
  pub url: String,
}

impl Config {
  /// Load configuration.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./tutordesk.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/tutordesk/config.yaml
  /// 4. Environment variables alone (no config file needed)
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Self::from_env(),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("tutordesk.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("tutordesk").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  fn from_env() -> Result<Self> {
    let url = std::env::var("TUTORDESK_STORE_URL")
      .or_else(|_| std::env::var("SUPABASE_URL"))
      .map_err(|_| {
        eyre!(
          "No configuration found. Create ~/.config/tutordesk/config.yaml\n\
           (see config.example.yaml) or set TUTORDESK_STORE_URL."
        )
      })?;

    Ok(Self {
      store: StoreConfig { url },
      title: None,
    })
  }

  /// Get the store API key from environment variables.
  ///
  /// Checks TUTORDESK_STORE_KEY first, then SUPABASE_KEY as fallback.
  pub fn store_key() -> Result<String> {
    std::env::var("TUTORDESK_STORE_KEY")
      .or_else(|_| std::env::var("SUPABASE_KEY"))
      .map_err(|_| {
        eyre!("Store API key not found. Set TUTORDESK_STORE_KEY or SUPABASE_KEY environment variable.")
      })
  }

  /// Title for the header line.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }

    Url::parse(&self.store.url)
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| "tutordesk".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_config_yaml() {
    let yaml = "store:\n  url: https://example.supabase.co\ntitle: Sunitha 11+\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.store.url, "https://example.supabase.co");
    assert_eq!(config.display_title(), "Sunitha 11+");
  }

  #[test]
  fn test_display_title_falls_back_to_host() {
    let config = Config {
      store: StoreConfig {
        url: "https://example.supabase.co".into(),
      },
      title: None,
    };

    assert_eq!(config.display_title(), "example.supabase.co");
  }
}
