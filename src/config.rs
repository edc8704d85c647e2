use crate::geo::DataSources;
use crate::settings::Settings;
use crate::stocks::{DEFAULT_TICKERS, DEMO_API_KEY};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable checked when the settings file has no API key.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Configuration for the interactive globe
#[derive(Clone, Debug)]
pub struct GlobeConfig {
    pub time_step: f32,
    pub fetch_borders: bool,
    pub tilt: Option<f32>,
    pub sources: DataSources,
}

impl GlobeConfig {
    pub fn new(time_step: f32, fetch_borders: bool, tilt: Option<f32>, settings: &Settings) -> Self {
        Self {
            time_step: time_step.clamp(0.001, 1.0),
            fetch_borders,
            tilt,
            sources: data_sources(settings),
        }
    }
}

/// Border dataset URLs, with settings overriding the built-in defaults
pub fn data_sources(settings: &Settings) -> DataSources {
    let mut sources = DataSources::default();
    if let Some(url) = &settings.globe.countries_url {
        sources.countries_url = url.clone();
    }
    if let Some(url) = &settings.globe.land_url {
        sources.land_url = url.clone();
    }
    if let Some(secs) = settings.globe.fetch_timeout_secs {
        sources.timeout = Duration::from_secs(secs.max(1));
    }
    sources
}

/// Configuration for the stock price listing
#[derive(Clone, Debug)]
pub struct StockConfig {
    pub api_key: String,
    pub tickers: Vec<String>,
    pub width: usize,
}

impl StockConfig {
    /// CLI tickers win over settings, which win over the defaults.
    pub fn new(cli_tickers: Vec<String>, width: usize, settings: &Settings, env_key: Option<String>) -> Self {
        let api_key = settings
            .stocks
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(env_key.filter(|k| !k.trim().is_empty()))
            .unwrap_or_else(|| DEMO_API_KEY.to_string());

        let tickers = if !cli_tickers.is_empty() {
            cli_tickers
        } else if let Some(t) = settings.stocks.tickers.clone().filter(|t| !t.is_empty()) {
            t
        } else {
            DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
        };

        Self {
            api_key,
            tickers: tickers.into_iter().map(|t| t.trim().to_ascii_uppercase()).collect(),
            width: width.max(1),
        }
    }
}

/// Log file: CLI flag, then settings, then the platform cache dir
pub fn log_path(cli: Option<PathBuf>, settings: &Settings) -> Option<PathBuf> {
    cli.or_else(|| settings.globe.log_file.clone())
        .or_else(|| dirs::cache_dir().map(|d| d.join("termglobe").join("termglobe.log")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::loader::{COUNTRIES_URL, LAND_URL};

    #[test]
    fn defaults_without_settings() {
        let settings = Settings::default();
        let config = GlobeConfig::new(0.03, true, None, &settings);
        assert_eq!(config.sources.countries_url, COUNTRIES_URL);
        assert_eq!(config.sources.land_url, LAND_URL);
        assert_eq!(config.sources.timeout, Duration::from_secs(15));
        assert_eq!(config.time_step, 0.03);
    }

    #[test]
    fn settings_override_sources() {
        let settings: Settings = toml::from_str(
            "[globe]\ncountries_url = \"http://a\"\nfetch_timeout_secs = 0\n",
        )
        .unwrap();
        let sources = data_sources(&settings);
        assert_eq!(sources.countries_url, "http://a");
        assert_eq!(sources.land_url, LAND_URL);
        assert_eq!(sources.timeout, Duration::from_secs(1));
    }

    #[test]
    fn frame_step_is_clamped() {
        let settings = Settings::default();
        assert_eq!(GlobeConfig::new(0.0, false, None, &settings).time_step, 0.001);
        assert_eq!(GlobeConfig::new(9.0, false, None, &settings).time_step, 1.0);
    }

    #[test]
    fn stock_key_precedence() {
        let settings: Settings = toml::from_str("[stocks]\napi_key = \"from-file\"\n").unwrap();
        assert_eq!(StockConfig::new(vec![], 40, &settings, Some("env".into())).api_key, "from-file");
        let empty = Settings::default();
        assert_eq!(StockConfig::new(vec![], 40, &empty, Some("env".into())).api_key, "env");
        assert_eq!(StockConfig::new(vec![], 40, &empty, Some(" ".into())).api_key, DEMO_API_KEY);
        assert_eq!(StockConfig::new(vec![], 40, &empty, None).api_key, DEMO_API_KEY);
    }

    #[test]
    fn blank_settings_key_falls_through_to_env() {
        let settings: Settings = toml::from_str("[stocks]\napi_key = \" \"\n").unwrap();
        assert_eq!(StockConfig::new(vec![], 40, &settings, Some("env".into())).api_key, "env");
        assert_eq!(StockConfig::new(vec![], 40, &settings, None).api_key, DEMO_API_KEY);
    }

    #[test]
    fn stock_ticker_precedence() {
        let settings: Settings = toml::from_str("[stocks]\ntickers = [\"orcl\"]\n").unwrap();
        assert_eq!(StockConfig::new(vec!["sap".into()], 40, &settings, None).tickers, vec!["SAP"]);
        assert_eq!(StockConfig::new(vec![], 40, &settings, None).tickers, vec!["ORCL"]);
        assert_eq!(StockConfig::new(vec![], 40, &Settings::default(), None).tickers, vec!["CRM", "CSCO", "IBM"]);
    }

    #[test]
    fn log_path_precedence() {
        let settings: Settings = toml::from_str("[globe]\nlog_file = \"/tmp/a.log\"\n").unwrap();
        assert_eq!(log_path(Some("/tmp/b.log".into()), &settings), Some(PathBuf::from("/tmp/b.log")));
        assert_eq!(log_path(None, &settings), Some(PathBuf::from("/tmp/a.log")));
    }
}
