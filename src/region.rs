//! Region resolution.
//!
//! Maps a location to a (continent, hemisphere) pair by testing the
//! coordinates against a fixed, ordered table of continent bounding
//! boxes. The table order is part of the contract: boxes overlap, and
//! the first match wins.

use crate::types::{Continent, Hemisphere, Location, Region};

/// A continent bounding box in degrees.
struct ContinentBounds {
    continent: Continent,
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl ContinentBounds {
    fn contains(&self, location: &Location) -> bool {
        (self.lat_min..=self.lat_max).contains(&location.latitude)
            && (self.lon_min..=self.lon_max).contains(&location.longitude)
    }
}

/// Bounding boxes, evaluated top to bottom. Europe precedes Asia so the
/// overlap between 26°E and 45°E resolves to Europe; Africa precedes
/// Asia so the Middle-East overlap resolves westward of 55°E to Africa.
const CONTINENT_BOUNDS: &[ContinentBounds] = &[
    ContinentBounds { continent: Continent::NorthAmerica, lat_min: 15.0, lat_max: 85.0, lon_min: -180.0, lon_max: -30.0 },
    ContinentBounds { continent: Continent::SouthAmerica, lat_min: -55.0, lat_max: 15.0, lon_min: -85.0, lon_max: -30.0 },
    ContinentBounds { continent: Continent::Europe, lat_min: 35.0, lat_max: 71.0, lon_min: -25.0, lon_max: 45.0 },
    ContinentBounds { continent: Continent::Africa, lat_min: -35.0, lat_max: 37.0, lon_min: -20.0, lon_max: 55.0 },
    ContinentBounds { continent: Continent::Asia, lat_min: 0.0, lat_max: 82.0, lon_min: 26.0, lon_max: 180.0 },
    ContinentBounds { continent: Continent::Australia, lat_min: -50.0, lat_max: -8.0, lon_min: 110.0, lon_max: 180.0 },
    ContinentBounds { continent: Continent::Antarctica, lat_min: -90.0, lat_max: -60.0, lon_min: -180.0, lon_max: 180.0 },
];

/// Continent used when no bounding box matches (open ocean, remote
/// islands). The fallback is carried in `Region::resolved` and surfaces
/// in the response's data-source tag.
pub const DEFAULT_CONTINENT: Continent = Continent::NorthAmerica;

/// Resolve a location to its region. Total: never fails.
pub fn resolve(location: &Location) -> Region {
    let hemisphere = if location.latitude >= 0.0 {
        Hemisphere::Northern
    } else {
        Hemisphere::Southern
    };

    match CONTINENT_BOUNDS.iter().find(|b| b.contains(location)) {
        Some(bounds) => Region {
            continent: bounds.continent,
            hemisphere,
            resolved: true,
        },
        None => Region {
            continent: DEFAULT_CONTINENT,
            hemisphere,
            resolved: false,
        },
    }
}
