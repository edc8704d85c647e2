//! Weekly closing prices from Alpha Vantage, cached on disk for a week.
//!
//! Every failure path ends in fixed fallback data, so callers always get a
//! series to draw.

use crate::error::{GlobeError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
/// Used when no key is configured. Only works for a handful of symbols.
pub const DEMO_API_KEY: &str = "demo";
pub const DEFAULT_TICKERS: &[&str] = &["CRM", "CSCO", "IBM"];

const CACHE_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;
const WEEKS: usize = 52;
const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<f64>,
    timestamp: i64,
}

/// One JSON file per ticker under a cache directory.
#[derive(Debug, Clone)]
pub struct PriceCache {
    dir: PathBuf,
}

impl PriceCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<cache dir>/termglobe/stocks`, if the platform has a cache dir.
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|d| Self::new(d.join("termglobe").join("stocks")))
    }

    fn entry_path(&self, ticker: &str) -> PathBuf {
        let safe: String = ticker
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
            .collect();
        self.dir.join(format!("stock_{}.json", safe.to_ascii_uppercase()))
    }

    /// Cached prices younger than a week. Expired entries are removed.
    pub fn get(&self, ticker: &str, now_ms: i64) -> Option<Vec<f64>> {
        let path = self.entry_path(ticker);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(ticker, error = %err, "unreadable price cache entry");
                return None;
            }
        };
        if now_ms - entry.timestamp < CACHE_TTL_MS {
            return Some(entry.data);
        }
        if let Err(err) = fs::remove_file(&path) {
            debug!(ticker, error = %err, "could not remove expired price cache entry");
        }
        None
    }

    pub fn put(&self, ticker: &str, prices: &[f64], now_ms: i64) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry { data: prices.to_vec(), timestamp: now_ms };
        fs::write(self.entry_path(ticker), serde_json::to_string(&entry)?)?;
        Ok(())
    }
}

/// Closing prices from a `TIME_SERIES_WEEKLY` payload, oldest first.
pub fn parse_weekly_series(payload: &Value) -> Result<Vec<f64>> {
    if payload.get("Error Message").is_some() {
        return Err(GlobeError::Data("invalid ticker symbol".into()));
    }
    if payload.get("Note").is_some() || payload.get("Information").is_some() {
        return Err(GlobeError::Data("API rate limit reached".into()));
    }
    let series = payload
        .get("Weekly Time Series")
        .and_then(Value::as_object)
        .ok_or_else(|| GlobeError::Data("no time series data available".into()))?;

    let mut weeks: Vec<(&String, &Value)> = series.iter().collect();
    // ISO dates sort chronologically as strings.
    weeks.sort_by(|a, b| a.0.cmp(b.0));
    let start = weeks.len().saturating_sub(WEEKS);

    let prices: Vec<f64> = weeks[start..]
        .iter()
        .filter_map(|(_, values)| values.get("4. close")?.as_str()?.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();

    if prices.is_empty() {
        return Err(GlobeError::Data("no valid price data received".into()));
    }
    Ok(prices)
}

/// Simulated history used whenever live data is unavailable.
pub fn fallback_prices(ticker: &str) -> Vec<f64> {
    let data: &[f64] = match ticker.to_ascii_uppercase().as_str() {
        "CRM" => &[220., 215., 198., 185., 195., 210., 225., 240., 235., 250., 265., 280., 275., 290., 295.],
        "CSCO" => &[45., 47., 46., 48., 50., 49., 52., 55., 53., 56., 58., 57., 59., 58., 60.],
        "IBM" => &[140., 135., 130., 128., 132., 138., 145., 150., 155., 160., 165., 170., 175., 180., 185.],
        _ => &[100., 102., 104., 103., 105., 107., 106., 108., 110., 109., 111., 113., 112., 114., 115.],
    };
    data.to_vec()
}

/// Where a series came from, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Cache,
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub ticker: String,
    pub prices: Vec<f64>,
    pub source: PriceSource,
}

impl PriceHistory {
    /// Change from first to last price, in percent.
    pub fn change_percent(&self) -> Option<f64> {
        let first = *self.prices.first()?;
        let last = *self.prices.last()?;
        (first > 0.0).then(|| (last - first) / first * 100.0)
    }
}

#[derive(Debug, Clone)]
pub struct StockService {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub cache: Option<PriceCache>,
}

impl StockService {
    pub fn new(api_key: impl Into<String>, cache: Option<PriceCache>) -> Self {
        Self {
            base_url: ALPHA_VANTAGE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            cache,
        }
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<f64>> {
        let url = format!(
            "{}?function=TIME_SERIES_WEEKLY&symbol={}&apikey={}",
            self.base_url,
            urlencoding::encode(ticker),
            urlencoding::encode(&self.api_key)
        );
        debug!(ticker, "fetching weekly prices");
        let payload: Value = ureq::get(&url)
            .set("Accept", "application/json")
            .timeout(self.timeout)
            .call()?
            .into_json()?;
        parse_weekly_series(&payload)
    }

    /// Cached, live or fallback prices for one ticker. Never fails.
    pub fn history(&self, ticker: &str) -> PriceHistory {
        let now = Utc::now().timestamp_millis();
        let make = |prices, source| PriceHistory { ticker: ticker.to_string(), prices, source };

        if let Some(prices) = self.cache.as_ref().and_then(|c| c.get(ticker, now)) {
            debug!(ticker, "using cached prices");
            return make(prices, PriceSource::Cache);
        }

        match self.fetch(ticker) {
            Ok(prices) => {
                info!(ticker, weeks = prices.len() as u64, "fetched weekly prices");
                if let Some(cache) = &self.cache {
                    if let Err(err) = cache.put(ticker, &prices, now) {
                        warn!(ticker, error = %err, "could not write price cache");
                    }
                }
                make(prices, PriceSource::Live)
            }
            Err(err) => {
                warn!(ticker, error = %err, "could not fetch live prices, using fallback data");
                make(fallback_prices(ticker), PriceSource::Fallback)
            }
        }
    }

    /// All tickers fetched in parallel, results in input order.
    pub fn histories(&self, tickers: &[String]) -> Vec<PriceHistory> {
        thread::scope(|scope| {
            let handles: Vec<_> = tickers
                .iter()
                .map(|ticker| (ticker, scope.spawn(move || self.history(ticker))))
                .collect();
            handles
                .into_iter()
                .map(|(ticker, handle)| {
                    handle.join().unwrap_or_else(|_| PriceHistory {
                        ticker: ticker.clone(),
                        prices: fallback_prices(ticker),
                        source: PriceSource::Fallback,
                    })
                })
                .collect()
        })
    }
}

/// Block-character sparkline, resampled to at most `width` columns.
pub fn sparkline(prices: &[f64], width: usize) -> String {
    if prices.is_empty() || width == 0 {
        return String::new();
    }
    let cols = width.min(prices.len());
    let sampled: Vec<f64> = (0..cols)
        .map(|i| {
            let start = i * prices.len() / cols;
            let end = ((i + 1) * prices.len() / cols).max(start + 1);
            let bucket = &prices[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect();

    let min = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = SPARK_BLOCKS.len() - 1;

    sampled
        .iter()
        .map(|&p| {
            if span <= f64::EPSILON {
                return SPARK_BLOCKS[top / 2];
            }
            let level = ((p - min) / span * top as f64).round() as usize;
            SPARK_BLOCKS[level.min(top)]
        })
        .collect()
}
