use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
    #[serde(default)]
    pub stocks: StockSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    pub countries_url: Option<String>,  // Natural Earth admin-0 countries GeoJSON
    pub land_url: Option<String>,       // Natural Earth land GeoJSON
    pub fetch_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockSettings {
    pub api_key: Option<String>,        // Alpha Vantage key, "demo" when unset
    pub tickers: Option<Vec<String>>,
}

impl Settings {
    /// Read the settings file. A missing file is not an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termglobe")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(settings.globe.countries_url.is_none());
        assert!(settings.stocks.tickers.is_none());
    }

    #[test]
    fn parses_both_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[globe]
land_url = "http://localhost/land.geojson"
fetch_timeout_secs = 5
log_file = "/tmp/globe.log"

[stocks]
api_key = "abc"
tickers = ["CRM", "IBM"]
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.globe.land_url.as_deref(), Some("http://localhost/land.geojson"));
        assert!(settings.globe.countries_url.is_none());
        assert_eq!(settings.globe.fetch_timeout_secs, Some(5));
        assert_eq!(settings.globe.log_file, Some(PathBuf::from("/tmp/globe.log")));
        assert_eq!(settings.stocks.api_key.as_deref(), Some("abc"));
        assert_eq!(settings.stocks.tickers, Some(vec!["CRM".to_string(), "IBM".to_string()]));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str("[stocks]\napi_key = \"k\"\n").unwrap();
        assert!(settings.globe.log_file.is_none());
        assert_eq!(settings.stocks.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[globe\nland_url = ").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
