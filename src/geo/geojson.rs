//! Minimal GeoJSON reading for Natural Earth feature collections.
//!
//! Only Polygon and MultiPolygon geometries carry rings. Anything else, and any
//! position that is not a pair of numbers, is dropped without complaint.

use super::projection::GeoPoint;
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;

/// Natural Earth marks missing ISO codes with this placeholder.
const MISSING_ISO: &str = "-99";

#[derive(Debug, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: Option<RegionProperties>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionProperties {
    #[serde(rename = "ADMIN")]
    pub admin: Option<String>,
    #[serde(rename = "NAME")]
    pub name_upper: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "ISO_A3")]
    pub iso_a3: Option<String>,
    #[serde(rename = "ADM0_A3")]
    pub adm0_a3: Option<String>,
    #[serde(rename = "CONTINENT")]
    pub continent: Option<String>,
    #[serde(rename = "REGION_UN")]
    pub region_un: Option<String>,
    #[serde(rename = "SUBREGION")]
    pub subregion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// Flatten Polygon / MultiPolygon coordinates into rings of points.
    pub fn rings(&self) -> Vec<Vec<GeoPoint>> {
        match self.kind.as_str() {
            "Polygon" => polygon_rings(&self.coordinates),
            "MultiPolygon" => self
                .coordinates
                .as_array()
                .map(|polys| polys.iter().flat_map(polygon_rings).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

fn polygon_rings(value: &Value) -> Vec<Vec<GeoPoint>> {
    value
        .as_array()
        .map(|rings| rings.iter().map(ring_points).collect())
        .unwrap_or_default()
}

fn ring_points(value: &Value) -> Vec<GeoPoint> {
    let Some(positions) = value.as_array() else {
        return Vec::new();
    };
    positions
        .iter()
        .filter_map(|p| {
            let pair = p.as_array()?;
            let lng = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some(GeoPoint::new(lat as f32, lng as f32))
        })
        .collect()
}

/// A political region with the metadata used for classification.
#[derive(Debug, Clone, Default)]
pub struct Region {
    pub name: Option<String>,
    pub iso: Option<String>,
    pub continent: Option<String>,
    pub region_un: Option<String>,
    pub subregion: Option<String>,
    pub rings: Vec<Vec<GeoPoint>>,
}

impl Region {
    fn from_feature(feature: Feature) -> Self {
        let props = feature.properties.unwrap_or_default();
        let rings = feature.geometry.map(|g| g.rings()).unwrap_or_default();

        let iso = [props.iso_a3, props.adm0_a3]
            .into_iter()
            .flatten()
            .find(|code| code != MISSING_ISO);

        Self {
            name: props.admin.or(props.name_upper).or(props.name),
            iso,
            continent: props.continent,
            region_un: props.region_un,
            subregion: props.subregion,
            rings,
        }
    }
}

/// A land mass outline with no metadata.
#[derive(Debug, Clone, Default)]
pub struct LandMass {
    pub rings: Vec<Vec<GeoPoint>>,
}

#[cfg(test)]
pub fn parse_collection(json: &str) -> Result<FeatureCollection> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_reader<R: std::io::Read>(reader: R) -> Result<FeatureCollection> {
    Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
}

pub fn regions(collection: FeatureCollection) -> Vec<Region> {
    collection.features.into_iter().map(Region::from_feature).collect()
}

pub fn land_masses(collection: FeatureCollection) -> Vec<LandMass> {
    collection
        .features
        .into_iter()
        .map(|f| LandMass {
            rings: f.geometry.map(|g| g.rings()).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_and_multipolygon_rings() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "ADMIN": "Square" },
                  "geometry": { "type": "Polygon",
                    "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } },
                { "type": "Feature", "properties": null,
                  "geometry": { "type": "MultiPolygon",
                    "coordinates": [[[[5,5],[6,5],[6,6]]], [[[7,7],[8,7],[8,8]], [[9,9],[9,10],[10,10]]]] } }
            ]
        }"#;
        let fc = parse_collection(json).unwrap();
        let land = land_masses(fc);
        assert_eq!(land.len(), 2);
        assert_eq!(land[0].rings.len(), 1);
        assert_eq!(land[0].rings[0].len(), 4);
        assert_eq!(land[1].rings.len(), 3);
        assert_eq!(land[1].rings[2][0], GeoPoint::new(9.0, 9.0));
    }

    #[test]
    fn positions_are_lng_lat_order() {
        let json = r#"{"features":[{"geometry":{"type":"Polygon","coordinates":[[[-0.12, 51.5, 12.0]]]}}]}"#;
        let land = land_masses(parse_collection(json).unwrap());
        let p = land[0].rings[0][0];
        assert!((p.lat - 51.5).abs() < 1e-6);
        assert!((p.lng + 0.12).abs() < 1e-6);
    }

    #[test]
    fn malformed_geometry_is_dropped() {
        let json = r#"{"features":[
            {"geometry": null},
            {"geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}},
            {"geometry": {"type": "Polygon", "coordinates": [[[0,0],["x",1],[2]]]}}
        ]}"#;
        let land = land_masses(parse_collection(json).unwrap());
        assert!(land[0].rings.is_empty());
        assert!(land[1].rings.is_empty());
        assert_eq!(land[2].rings[0].len(), 1);
    }

    #[test]
    fn region_metadata_fallbacks() {
        let json = r#"{"features":[
            {"properties": {"NAME": "France", "ISO_A3": "-99", "ADM0_A3": "FRA"},
             "geometry": {"type": "Polygon", "coordinates": [[[2,48],[3,48],[3,49]]]}},
            {"properties": {"name": "Nowhere"}, "geometry": null}
        ]}"#;
        let regions = regions(parse_collection(json).unwrap());
        assert_eq!(regions[0].name.as_deref(), Some("France"));
        assert_eq!(regions[0].iso.as_deref(), Some("FRA"));
        assert!(regions[0].continent.is_none());
        assert_eq!(regions[1].name.as_deref(), Some("Nowhere"));
        assert!(regions[1].iso.is_none());
        assert!(regions[1].rings.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_collection("{not json").is_err());
    }
}
