//! Border line construction: land outlines plus classified country borders.
//!
//! Pure functions from parsed regions to projected line strips. Nothing here
//! touches the network or the terminal.

use super::geojson::{LandMass, Region};
use super::projection::GeoPoint;
use glam::Vec3;

/// Layer a border line belongs to. Ordering is draw order and prominence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BorderClass {
    Continent,
    Detailed,
    Highlighted,
}

/// Colour, base opacity and stroke width for a border layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: (u8, u8, u8),
    pub opacity: f32,
    pub width: u8,
}

impl BorderClass {
    /// Radius the line is drawn at, relative to a unit globe.
    pub fn radius(self) -> f32 {
        match self {
            BorderClass::Continent => 1.002,
            BorderClass::Detailed => 1.004,
            BorderClass::Highlighted => 1.006,
        }
    }

    pub fn style(self) -> LineStyle {
        match self {
            BorderClass::Continent => LineStyle { color: (0xAA, 0xAA, 0xAA), opacity: 0.5, width: 1 },
            BorderClass::Detailed => LineStyle { color: (0xCC, 0xCC, 0xCC), opacity: 0.6, width: 1 },
            BorderClass::Highlighted => LineStyle { color: (0xFF, 0xE5, 0x00), opacity: 0.85, width: 2 },
        }
    }
}

/// Axis-aligned lat/lng box. Containment is strict on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f32,
    pub lat_max: f32,
    pub lng_min: f32,
    pub lng_max: f32,
}

impl BoundingBox {
    pub const fn new(lat_min: f32, lat_max: f32, lng_min: f32, lng_max: f32) -> Self {
        Self { lat_min, lat_max, lng_min, lng_max }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat > self.lat_min && p.lat < self.lat_max && p.lng > self.lng_min && p.lng < self.lng_max
    }
}

/// Rough Europe box (EU, UK, Scandinavia, Ukraine). Country borders cover it in detail.
pub const EUROPE_BOX: BoundingBox = BoundingBox::new(34.0, 72.0, -25.0, 40.0);
pub const UAE_BOX: BoundingBox = BoundingBox::new(22.0, 27.0, 51.0, 57.0);

/// Areas where land outlines are suppressed to avoid drawing twice.
#[derive(Debug, Clone)]
pub struct ExclusionZones {
    pub boxes: Vec<BoundingBox>,
}

impl Default for ExclusionZones {
    fn default() -> Self {
        Self { boxes: vec![EUROPE_BOX, UAE_BOX] }
    }
}

impl ExclusionZones {
    pub fn excludes(&self, p: GeoPoint) -> bool {
        self.boxes.iter().any(|b| b.contains(p))
    }
}

pub const LIVED_CODES: &[&str] = &["GBR", "POL", "AUT", "CHE", "CZE", "ARE"];
pub const LIVED_NAMES: &[&str] = &[
    "United Kingdom",
    "Poland",
    "Austria",
    "Switzerland",
    "Czech Republic",
    "Czechia",
    "United Arab Emirates",
];
pub const EUROPE_CODES: &[&str] = &[
    "DEU", "FRA", "ITA", "ESP", "PRT", "BEL", "NLD", "LUX", "DNK", "SWE", "NOR", "FIN", "ISL",
    "IRL", "EST", "LVA", "LTU", "BLR", "UKR", "MDA", "ROU", "BGR", "GRC", "ALB", "MKD", "MNE",
    "SRB", "BIH", "HRV", "SVN", "HUN", "SVK", "CZE", "POL", "AUT", "CHE", "LIE", "MCO", "AND",
    "SMR", "VAT", "MLT", "CYP", "GBR",
];

/// Which countries get their borders drawn, and how.
#[derive(Debug, Clone)]
pub struct RegionRules {
    pub lived_codes: &'static [&'static str],
    pub lived_names: &'static [&'static str],
    pub uae_code: &'static str,
    pub uae_name: &'static str,
    pub europe_codes: &'static [&'static str],
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            lived_codes: LIVED_CODES,
            lived_names: LIVED_NAMES,
            uae_code: "ARE",
            uae_name: "United Arab Emirates",
            europe_codes: EUROPE_CODES,
        }
    }
}

impl RegionRules {
    fn is_lived(&self, region: &Region) -> bool {
        region.iso.as_deref().is_some_and(|c| self.lived_codes.contains(&c))
            || region.name.as_deref().is_some_and(|n| self.lived_names.contains(&n))
    }

    fn is_uae(&self, region: &Region) -> bool {
        region.iso.as_deref() == Some(self.uae_code) || region.name.as_deref() == Some(self.uae_name)
    }

    fn is_europe(&self, region: &Region) -> bool {
        let tagged = [&region.continent, &region.region_un, &region.subregion]
            .into_iter()
            .any(|field| field.as_deref() == Some("Europe"));
        tagged || region.iso.as_deref().is_some_and(|c| self.europe_codes.contains(&c))
    }

    /// Border class for a country, or `None` if it is not drawn.
    pub fn classify(&self, region: &Region) -> Option<BorderClass> {
        if self.is_lived(region) {
            Some(BorderClass::Highlighted)
        } else if self.is_uae(region) || self.is_europe(region) {
            Some(BorderClass::Detailed)
        } else {
            None
        }
    }
}

/// A projected line strip ready for drawing.
#[derive(Debug, Clone)]
pub struct BorderLine {
    pub class: BorderClass,
    pub region: Option<String>,
    pub points: Vec<Vec3>,
}

/// Region names drawn highlighted, once each, in data order.
pub fn highlighted_regions(lines: &[BorderLine]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for line in lines.iter().filter(|l| l.class == BorderClass::Highlighted) {
        if let Some(name) = line.region.as_deref() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Split a ring into runs of non-excluded points. Runs of one point are dropped.
pub fn split_ring(ring: &[GeoPoint], zones: &ExclusionZones) -> Vec<Vec<GeoPoint>> {
    let mut segments = Vec::new();
    let mut current: Vec<GeoPoint> = Vec::new();

    for &p in ring {
        if zones.excludes(p) {
            if current.len() > 1 {
                segments.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        } else {
            current.push(p);
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }

    segments
}

/// Builds classified border lines from land and country datasets.
#[derive(Debug, Clone, Default)]
pub struct BorderBuilder {
    pub zones: ExclusionZones,
    pub rules: RegionRules,
}

impl BorderBuilder {
    pub fn build(&self, land: &[LandMass], countries: &[Region]) -> Vec<BorderLine> {
        let mut lines = self.continent_lines(land);
        lines.extend(self.country_lines(countries));
        lines
    }

    pub fn continent_lines(&self, land: &[LandMass]) -> Vec<BorderLine> {
        let radius = BorderClass::Continent.radius();
        land.iter()
            .flat_map(|mass| mass.rings.iter())
            .flat_map(|ring| split_ring(ring, &self.zones))
            .map(|segment| BorderLine {
                class: BorderClass::Continent,
                region: None,
                points: segment.iter().map(|p| p.to_vec3(radius)).collect(),
            })
            .collect()
    }

    pub fn country_lines(&self, countries: &[Region]) -> Vec<BorderLine> {
        let mut lines = Vec::new();
        for region in countries {
            let Some(class) = self.rules.classify(region) else {
                continue;
            };
            let radius = class.radius();
            for ring in &region.rings {
                // A ring needs at least a triangle to outline anything.
                if ring.len() <= 2 {
                    continue;
                }
                lines.push(BorderLine {
                    class,
                    region: region.name.clone(),
                    points: ring.iter().map(|p| p.to_vec3(radius)).collect(),
                });
            }
        }
        lines
    }
}
