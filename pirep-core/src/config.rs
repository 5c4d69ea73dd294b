use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{sector::Sector, source::SourceKind};

/// Endpoints for the aviationweather.gov source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Falls back to [`crate::source::aviationweather::DEFAULT_METAR_URL`].
    pub metar_url: Option<String>,
    pub pirep_url: Option<String>,
}

/// Paths for the local-file source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    pub metar_csv: Option<PathBuf>,
    pub pireps_json: Option<PathBuf>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// "aviationweather" (the default) or "files".
    pub source: Option<String>,

    /// Sector shown by `pirep show` when none is given.
    pub default_sector: Option<String>,

    /// Assignment table to use instead of the built-in one.
    pub assignments: Option<PathBuf>,

    /// Example TOML:
    /// [aviationweather]
    /// pirep_url = "https://..."
    #[serde(default)]
    pub aviationweather: HttpSourceConfig,

    #[serde(default)]
    pub files: FileSourceConfig,
}

impl Config {
    pub fn source_kind(&self) -> Result<SourceKind> {
        match self.source.as_deref() {
            Some(s) => SourceKind::try_from(s),
            None => Ok(SourceKind::AviationWeather),
        }
    }

    pub fn set_source(&mut self, kind: SourceKind) {
        self.source = Some(kind.as_str().to_string());
    }

    /// The configured default sector, if any.
    pub fn default_sector(&self) -> Result<Option<Sector>> {
        self.default_sector
            .as_deref()
            .map(|s| {
                Sector::try_from(s).with_context(|| {
                    "Configured default sector is invalid.\n\
                     Hint: run `pirep configure` and pick one of NORTH, SOUTH, HIGH, ATOP."
                })
            })
            .transpose()
    }

    pub fn set_default_sector(&mut self, sector: Sector) {
        self.default_sector = Some(sector.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "pirep-watch", "pirep-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_defaults_to_aviationweather() {
        let cfg = Config::default();
        assert_eq!(cfg.source_kind().unwrap(), SourceKind::AviationWeather);
    }

    #[test]
    fn unknown_source_is_an_error() {
        let cfg = Config {
            source: Some("carrier-pigeon".to_string()),
            ..Config::default()
        };
        assert!(cfg.source_kind().unwrap_err().to_string().contains("Unknown source"));
    }

    #[test]
    fn default_sector_roundtrip() {
        let mut cfg = Config::default();
        assert_eq!(cfg.default_sector().unwrap(), None);

        cfg.set_default_sector(Sector::High);
        assert_eq!(cfg.default_sector().unwrap(), Some(Sector::High));
    }

    #[test]
    fn invalid_default_sector_gives_a_hint() {
        let cfg = Config {
            default_sector: Some("MIDDLE".to_string()),
            ..Config::default()
        };
        let err = cfg.default_sector().unwrap_err();
        assert!(err.to_string().contains("Hint: run `pirep configure`"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_source(SourceKind::Files);
        cfg.set_default_sector(Sector::South);
        cfg.files.metar_csv = Some(PathBuf::from("/tmp/metars.csv"));
        cfg.aviationweather.pirep_url = Some("https://example.test/pireps.json".to_string());

        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn garbage_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "source = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
