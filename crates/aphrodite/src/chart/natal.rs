use crate::aspects::types::Aspect;
use crate::chart::birth::ChartId;
use crate::ephemeris::provider::PositionSet;
use crate::ephemeris::types::{BodyPosition, CelestialBody, GeoLocation};
use crate::houses::types::{ChartAngle, ChartAngles, HouseCusps};
use crate::western::signs::ZodiacSign;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A body's raw position together with where it falls in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedBody {
    #[serde(flatten)]
    pub position: BodyPosition,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    pub house: u8,
}

/// A chart angle with its sign and house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnglePoint {
    pub angle: ChartAngle,
    pub lon: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    pub house: u8,
}

/// A fully computed natal chart.
///
/// Built once by [`ChartAssembler`](crate::chart::ChartAssembler) and never
/// changed afterwards; every accessor is a lookup over the stored values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalChart {
    id: ChartId,
    instant: DateTime<Utc>,
    location: GeoLocation,
    bodies: BTreeMap<CelestialBody, PlacedBody>,
    houses: HouseCusps,
    angles: BTreeMap<ChartAngle, AnglePoint>,
    aspects: Vec<Aspect>,
}

impl NatalChart {
    pub(crate) fn new(
        instant: DateTime<Utc>,
        location: GeoLocation,
        bodies: BTreeMap<CelestialBody, PlacedBody>,
        houses: HouseCusps,
        angles: BTreeMap<ChartAngle, AnglePoint>,
        aspects: Vec<Aspect>,
    ) -> Self {
        Self {
            id: ChartId::derive(instant, location),
            instant,
            location,
            bodies,
            houses,
            angles,
            aspects,
        }
    }

    pub fn id(&self) -> &ChartId {
        &self.id
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn bodies(&self) -> &BTreeMap<CelestialBody, PlacedBody> {
        &self.bodies
    }

    pub fn body(&self, body: CelestialBody) -> Option<&PlacedBody> {
        self.bodies.get(&body)
    }

    /// Raw positions, as needed for aspect detection against another chart.
    pub fn positions(&self) -> PositionSet {
        self.bodies
            .iter()
            .map(|(body, placed)| (*body, placed.position))
            .collect()
    }

    pub fn house_of(&self, body: CelestialBody) -> Option<u8> {
        self.bodies.get(&body).map(|p| p.house)
    }

    pub fn sign_of(&self, body: CelestialBody) -> Option<ZodiacSign> {
        self.bodies.get(&body).map(|p| p.sign)
    }

    pub fn houses(&self) -> &HouseCusps {
        &self.houses
    }

    pub fn angles(&self) -> ChartAngles {
        ChartAngles::from_cusps(&self.houses)
    }

    pub fn angle(&self, angle: ChartAngle) -> Option<&AnglePoint> {
        self.angles.get(&angle)
    }

    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    /// Aspects with `body` on either side.
    pub fn aspects_of(&self, body: CelestialBody) -> impl Iterator<Item = &Aspect> {
        self.aspects.iter().filter(move |a| a.involves(body))
    }

    /// Bodies in `house`, in body order.
    pub fn bodies_in_house(&self, house: u8) -> Vec<CelestialBody> {
        self.bodies
            .values()
            .filter(|p| p.house == house)
            .map(|p| p.position.body)
            .collect()
    }
}
