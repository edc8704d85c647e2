//! Places lived: the fixed city catalog and its globe markers

use crate::geo::GeoPoint;
use glam::Vec3;

/// Markers sit just above the highest border layer.
pub const MARKER_RADIUS: f32 = 1.01;

/// Angular frequency of the current-city pulse (rad/s).
const PULSE_RATE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityStats {
    pub passport: &'static str,
    pub population: &'static str,
    pub gdp: &'static str,
    pub gdp_percent: &'static str,
    pub industries: &'static str,
    pub domain: &'static str,
    pub fact: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub key: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub location: GeoPoint,
    pub years: &'static str,
    pub current: bool,
    pub stats: CityStats,
    #[allow(dead_code)] // Photo path from the web catalog, no image slot on the terminal card
    pub image: &'static str,
}

impl City {
    /// Short label/value rows for the hover card.
    pub fn stat_rows(&self) -> [(&'static str, &'static str); 5] {
        [
            ("Passport Power", self.stats.passport),
            ("Population", self.stats.population),
            ("GDP", self.stats.gdp),
            ("% of Country", self.stats.gdp_percent),
            ("Domain", self.stats.domain),
        ]
    }

    pub fn position(&self) -> Vec3 {
        self.location.to_vec3(MARKER_RADIUS)
    }
}

pub static CITIES: [City; 6] = [
    City {
        key: "wroclaw",
        name: "Wrocław",
        country: "Poland",
        location: GeoPoint::new(51.1079, 17.0385),
        years: "1999-2001",
        current: false,
        stats: CityStats {
            passport: "#7",
            population: "640K",
            gdp: "$29B",
            gdp_percent: "4.5%",
            industries: "IT, Manufacturing, Services",
            domain: ".pl",
            fact: "There are over 300 bronze dwarf statues hidden throughout the city",
        },
        image: "cities/wroclaw.png",
    },
    City {
        key: "vienna",
        name: "Vienna",
        country: "Austria",
        location: GeoPoint::new(48.2082, 16.3738),
        years: "2001-2006",
        current: false,
        stats: CityStats {
            passport: "#3",
            population: "1.9M",
            gdp: "$113B",
            gdp_percent: "26%",
            industries: "Tourism, Tech, Life Sciences",
            domain: ".at",
            fact: "The Vienna Opera House sells 567 standing room tickets for €3-4 daily",
        },
        image: "cities/vienna.png",
    },
    City {
        key: "zurich",
        name: "Zurich",
        country: "Switzerland",
        location: GeoPoint::new(47.3769, 8.5417),
        years: "2006-2009",
        current: false,
        stats: CityStats {
            passport: "#2",
            population: "436K",
            gdp: "$138B",
            gdp_percent: "18%",
            industries: "Finance, Insurance, Pharma",
            domain: ".ch",
            fact: "Zurich's water is so clean you can drink from any public fountain",
        },
        image: "cities/zurich.png",
    },
    City {
        key: "dubai",
        name: "Dubai",
        country: "UAE",
        location: GeoPoint::new(25.2048, 55.2708),
        years: "2010-2011, 2015-2017",
        current: false,
        stats: CityStats {
            passport: "#11",
            population: "3.5M",
            gdp: "$100B",
            gdp_percent: "25%",
            industries: "Real Estate, Tourism, Trade",
            domain: ".ae",
            fact: "Dubai has no income tax and the police drive Bugattis",
        },
        image: "cities/dubai.png",
    },
    City {
        key: "prague",
        name: "Prague",
        country: "Czech Republic",
        location: GeoPoint::new(50.0755, 14.4378),
        years: "2011-2015",
        current: false,
        stats: CityStats {
            passport: "#6",
            population: "1.3M",
            gdp: "$82B",
            gdp_percent: "25%",
            industries: "Manufacturing, Tourism, IT",
            domain: ".cz",
            fact: "Prague Castle is the largest ancient castle in the world",
        },
        image: "cities/prague.png",
    },
    City {
        key: "london",
        name: "London",
        country: "United Kingdom",
        location: GeoPoint::new(51.5074, -0.1278),
        years: "2017-present",
        current: true,
        stats: CityStats {
            passport: "#4",
            population: "8.8M",
            gdp: "$500B",
            gdp_percent: "23%",
            industries: "Finance, Tech, Creative Arts",
            domain: ".uk",
            fact: "London has over 170 museums, more than any other city",
        },
        image: "cities/london.png",
    },
];

#[cfg(test)]
pub fn find(key: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.key == key)
}

/// The city flagged as current residence.
pub fn current() -> Option<&'static City> {
    CITIES.iter().find(|c| c.current)
}

/// Scale and opacity of the expanding ring around the current city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseRing {
    pub scale: f32,
    pub opacity: f32,
}

pub fn pulse_at(elapsed: f32, visibility: f32) -> PulseRing {
    let wave = (elapsed * PULSE_RATE).sin();
    PulseRing {
        scale: 1.0 + wave * 0.3,
        opacity: (0.8 - wave * 0.4) * visibility,
    }
}

/// A city marker for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub city: &'static City,
    pub position: Vec3,
    pub pulse: Option<PulseRing>,
}

/// One marker per catalog entry, in catalog order.
pub fn markers(elapsed: f32, visibility: f32) -> Vec<Marker> {
    CITIES
        .iter()
        .map(|city| Marker {
            city,
            position: city.position(),
            pulse: city.current.then(|| pulse_at(elapsed, visibility)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_and_resolvable() {
        let keys: HashSet<_> = CITIES.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), CITIES.len());
        for city in &CITIES {
            assert_eq!(find(city.key).map(|c| c.name), Some(city.name));
        }
        assert!(find("atlantis").is_none());
    }

    #[test]
    fn exactly_one_current_city() {
        assert_eq!(CITIES.iter().filter(|c| c.current).count(), 1);
        assert_eq!(current().map(|c| c.key), Some("london"));
    }

    #[test]
    fn one_marker_per_city_and_one_pulse() {
        for t in [0.0_f32, 0.4, 1.7, 12.3] {
            let ms = markers(t, 1.0);
            assert_eq!(ms.len(), CITIES.len());
            let pulsing: Vec<_> = ms.iter().filter(|m| m.pulse.is_some()).collect();
            assert_eq!(pulsing.len(), 1);
            assert!(pulsing[0].city.current);
        }
    }

    #[test]
    fn pulse_oscillates_within_bounds() {
        for i in 0..200 {
            let p = pulse_at(i as f32 * 0.05, 1.0);
            assert!(p.scale >= 0.7 - 1e-5 && p.scale <= 1.3 + 1e-5);
            assert!(p.opacity >= 0.4 - 1e-5 && p.opacity <= 1.2 + 1e-5);
        }
        // Period is pi seconds.
        let a = pulse_at(0.3, 1.0);
        let b = pulse_at(0.3 + std::f32::consts::PI, 1.0);
        assert!((a.scale - b.scale).abs() < 1e-4);
    }

    #[test]
    fn pulse_opacity_follows_visibility() {
        let full = pulse_at(1.0, 1.0);
        let half = pulse_at(1.0, 0.5);
        assert!((half.opacity - full.opacity * 0.5).abs() < 1e-6);
        assert_eq!(pulse_at(1.0, 0.0).opacity, 0.0);
    }

    #[test]
    fn markers_sit_above_borders() {
        for m in markers(0.0, 1.0) {
            assert!((m.position.length() - MARKER_RADIUS).abs() < 1e-4);
        }
    }
}
