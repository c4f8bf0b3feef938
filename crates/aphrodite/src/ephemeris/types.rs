use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic location coordinates (degrees, east and north positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Bodies a chart can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
    Lilith,
}

impl CelestialBody {
    pub const ALL: [CelestialBody; 14] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::NorthNode,
        CelestialBody::SouthNode,
        CelestialBody::Chiron,
        CelestialBody::Lilith,
    ];

    /// Sun through Pluto plus both lunar nodes.
    pub const TRADITIONAL: [CelestialBody; 12] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::NorthNode,
        CelestialBody::SouthNode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Moon => "moon",
            CelestialBody::Mercury => "mercury",
            CelestialBody::Venus => "venus",
            CelestialBody::Mars => "mars",
            CelestialBody::Jupiter => "jupiter",
            CelestialBody::Saturn => "saturn",
            CelestialBody::Uranus => "uranus",
            CelestialBody::Neptune => "neptune",
            CelestialBody::Pluto => "pluto",
            CelestialBody::NorthNode => "north_node",
            CelestialBody::SouthNode => "south_node",
            CelestialBody::Chiron => "chiron",
            CelestialBody::Lilith => "lilith",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CelestialBody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        CelestialBody::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == lower)
            .ok_or_else(|| format!("Unknown celestial body: {}", s))
    }
}

/// Position of one body as supplied by a position provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: CelestialBody,
    /// Ecliptic longitude in degrees [0, 360)
    pub lon: f64,
    /// Ecliptic latitude in degrees
    pub lat: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day); `None` when the provider has no rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_lon: Option<f64>,
    /// Longitude decreasing in time
    pub retrograde: bool,
}

impl BodyPosition {
    /// Position without velocity data. Retrograde is false because it cannot be known.
    pub fn fixed(body: CelestialBody, lon: f64) -> Self {
        Self {
            body,
            lon: crate::geometry::normalize_degrees(lon),
            lat: 0.0,
            distance: 0.0,
            speed_lon: None,
            retrograde: false,
        }
    }

    pub fn moving(body: CelestialBody, lon: f64, speed_lon: f64) -> Self {
        Self {
            speed_lon: Some(speed_lon),
            retrograde: speed_lon < 0.0,
            ..Self::fixed(body, lon)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_round_trips_through_str() {
        for body in CelestialBody::ALL {
            assert_eq!(body.as_str().parse::<CelestialBody>().unwrap(), body);
        }
        assert!("vulcan".parse::<CelestialBody>().is_err());
    }

    #[test]
    fn test_body_serde_names() {
        let json = serde_json::to_string(&CelestialBody::NorthNode).unwrap();
        assert_eq!(json, "\"north_node\"");
    }

    #[test]
    fn test_moving_sets_retrograde() {
        let p = BodyPosition::moving(CelestialBody::Mercury, 370.0, -0.5);
        assert_eq!(p.lon, 10.0);
        assert!(p.retrograde);
        assert!(!BodyPosition::fixed(CelestialBody::Sun, 1.0).retrograde);
    }
}
