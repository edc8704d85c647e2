//! One-shot background fetch of the border datasets.

use super::borders::{highlighted_regions, BorderBuilder, BorderLine};
use super::geojson::{self, FeatureCollection};
use crate::error::Result;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Natural Earth 50m datasets.
pub const COUNTRIES_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_50m_admin_0_countries.geojson";
pub const LAND_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_50m_land.geojson";

/// Where the border data comes from.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub countries_url: String,
    pub land_url: String,
    pub timeout: Duration,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            countries_url: COUNTRIES_URL.to_string(),
            land_url: LAND_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStatus {
    Disabled,
    Loading,
    Ready(usize),
    Unavailable,
}

fn fetch_collection(url: &str, timeout: Duration) -> Result<FeatureCollection> {
    debug!(url = %url, "fetching feature collection");
    let response = ureq::get(url).timeout(timeout).call()?;
    // into_string caps bodies at 10MB, the 50m country set is close to that
    geojson::parse_reader(response.into_reader())
}

/// Fetch both datasets and build border lines. Blocks the calling thread.
pub fn load_borders(sources: &DataSources, builder: &BorderBuilder) -> Result<Vec<BorderLine>> {
    let started = Instant::now();
    let countries = geojson::regions(fetch_collection(&sources.countries_url, sources.timeout)?);
    let land = geojson::land_masses(fetch_collection(&sources.land_url, sources.timeout)?);
    let lines = builder.build(&land, &countries);
    info!(
        countries = countries.len() as u64,
        land = land.len() as u64,
        lines = lines.len() as u64,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "border geometry ready"
    );
    debug!(regions = ?highlighted_regions(&lines), "highlighted regions");
    Ok(lines)
}

/// Same as [`load_borders`], but failures are logged and become an empty set.
pub fn load_borders_or_empty(sources: &DataSources, builder: &BorderBuilder) -> Vec<BorderLine> {
    match load_borders(sources, builder) {
        Ok(lines) => lines,
        Err(err) => {
            warn!(error = %err, "failed to load border data, drawing globe without borders");
            Vec::new()
        }
    }
}

/// Border data arriving from a background thread.
pub struct BorderLoader {
    receiver: Option<Receiver<Result<Vec<BorderLine>>>>,
    status: BorderStatus,
}

impl BorderLoader {
    /// Start the fetch. There is no retry and no cancellation.
    pub fn spawn(sources: DataSources, builder: BorderBuilder) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(load_borders(&sources, &builder));
        });
        Self { receiver: Some(rx), status: BorderStatus::Loading }
    }

    pub fn disabled() -> Self {
        Self { receiver: None, status: BorderStatus::Disabled }
    }

    pub fn status(&self) -> BorderStatus {
        self.status
    }

    /// Non-blocking check for the result. Returns the lines exactly once.
    pub fn poll(&mut self) -> Option<Vec<BorderLine>> {
        let rx = self.receiver.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(Ok(lines)) => {
                self.status = BorderStatus::Ready(lines.len());
                Some(lines)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "failed to load border data, drawing globe without borders");
                self.status = BorderStatus::Unavailable;
                None
            }
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                warn!("border loader thread exited without a result");
                self.status = BorderStatus::Unavailable;
                None
            }
        };
        self.receiver = None;
        outcome
    }
}
