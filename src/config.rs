use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// On-disk CLI state: the database URL fallback and the selected user.
/// Lives at ~/.gatherconfig.json unless GATHER_CONFIG points elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        if let Ok(p) = std::env::var("GATHER_CONFIG") {
            return Ok(PathBuf::from(p));
        }
        let home = std::env::var("HOME").context("HOME is not set; set GATHER_CONFIG instead")?;
        Ok(Path::new(&home).join(".gatherconfig.json"))
    }

    /// A missing file is an empty config, not an error.
    pub fn load() -> Result<Config> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => {
                Err(err).with_context(|| format!("could not read config file {}", path.display()))
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("could not write config file {}", path.display()))
    }

    pub fn set_current_user(&mut self, name: &str) -> Result<()> {
        self.current_user_name = Some(name.to_string());
        self.save()
    }
}

/// Resolve the database URL: --dsn flag, then DATABASE_URL, then config file.
pub fn resolve_dsn(flag: Option<String>, config: &Config) -> Result<String> {
    if let Some(dsn) = flag {
        return Ok(dsn);
    }
    if let Ok(dsn) = std::env::var("DATABASE_URL") {
        return Ok(dsn);
    }
    if let Some(dsn) = config.db_url.clone() {
        return Ok(dsn);
    }
    bail!("no database URL; pass --dsn, set DATABASE_URL, or add db_url to the config file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config {
            db_url: Some("postgres://localhost/gather".to_string()),
            current_user_name: None,
        };
        config.current_user_name = Some("ada".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.db_url.as_deref(), Some("postgres://localhost/gather"));
        assert_eq!(loaded.current_user_name.as_deref(), Some("ada"));
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.db_url.is_none());
        assert!(loaded.current_user_name.is_none());
    }

    #[test]
    fn accepts_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"current_user_name":"ada"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.db_url.is_none());
        assert_eq!(loaded.current_user_name.as_deref(), Some("ada"));
    }
}
