//! Natal chart assembly: provider positions, houses, placement, aspects.

use crate::aspects::calculator::AspectCalculator;
use crate::aspects::types::AspectTable;
use crate::chart::birth::BirthData;
use crate::chart::natal::{AnglePoint, NatalChart, PlacedBody};
use crate::config::EngineConfig;
use crate::ephemeris::provider::PositionProvider;
use crate::ephemeris::types::{CelestialBody, GeoLocation};
use crate::error::{ChartError, ChartResult};
use crate::houses::placement::assign_house;
use crate::houses::placidus::compute_cusps;
use crate::houses::types::{ChartAngle, ChartAngles, HouseSettings};
use crate::western::signs::{degree_in_sign, ZodiacSign};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeMap;

/// Builds natal charts from one provider and one set of chart settings.
///
/// Holds no mutable state, so a single assembler can serve concurrent callers
/// whenever the provider is `Sync`.
#[derive(Debug, Clone)]
pub struct ChartAssembler<P> {
    provider: P,
    bodies: Vec<CelestialBody>,
    houses: HouseSettings,
    aspects: AspectTable,
}

impl<P: PositionProvider> ChartAssembler<P> {
    pub fn new(
        provider: P,
        bodies: Vec<CelestialBody>,
        houses: HouseSettings,
        aspects: AspectTable,
    ) -> ChartResult<Self> {
        if bodies.is_empty() {
            return Err(ChartError::configuration("no celestial bodies to track"));
        }
        houses.validate()?;

        let mut bodies = bodies;
        bodies.sort();
        bodies.dedup();

        Ok(Self {
            provider,
            bodies,
            houses,
            aspects,
        })
    }

    pub fn from_config(provider: P, config: &EngineConfig) -> ChartResult<Self> {
        Self::new(
            provider,
            config.bodies.clone(),
            config.houses,
            config.aspects.clone(),
        )
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn aspect_table(&self) -> &AspectTable {
        &self.aspects
    }

    pub fn build_from_birth(&self, birth: &BirthData) -> ChartResult<NatalChart> {
        self.build_chart(birth.instant()?, birth.latitude, birth.longitude)
    }

    /// Build the chart for a UTC instant and a place.
    ///
    /// Any stage failure is returned as-is; there is no partial chart.
    pub fn build_chart(
        &self,
        instant: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> ChartResult<NatalChart> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::validation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::validation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        let location = GeoLocation {
            lat: latitude,
            lon: longitude,
        };

        debug!(
            "Building chart for {} at ({latitude:.4}, {longitude:.4})",
            instant.to_rfc3339()
        );

        let positions = self
            .provider
            .positions_at(instant, location, &self.bodies)?;
        if let Some(missing) = self.bodies.iter().find(|b| !positions.contains_key(b)) {
            return Err(ChartError::provider(format!(
                "provider returned no position for {missing}"
            )));
        }

        let sidereal_time = self.provider.sidereal_time(instant, longitude)?;
        let obliquity = self.provider.obliquity(instant)?;
        let cusps = compute_cusps(sidereal_time, latitude, obliquity, &self.houses)?;
        debug!(
            "Houses computed: LST {sidereal_time:.4}, obliquity {obliquity:.4}, ASC {:.4}",
            cusps.ascendant()
        );

        let bodies: BTreeMap<CelestialBody, PlacedBody> = self
            .bodies
            .iter()
            .filter_map(|body| positions.get(body))
            .map(|position| {
                let placed = PlacedBody {
                    position: *position,
                    sign: ZodiacSign::from_longitude(position.lon),
                    degree_in_sign: degree_in_sign(position.lon),
                    house: assign_house(position.lon, &cusps),
                };
                (position.body, placed)
            })
            .collect();

        let chart_angles = ChartAngles::from_cusps(&cusps);
        let angles: BTreeMap<ChartAngle, AnglePoint> = ChartAngle::ALL
            .iter()
            .map(|&angle| {
                let lon = chart_angles.get(angle);
                let point = AnglePoint {
                    angle,
                    lon,
                    sign: ZodiacSign::from_longitude(lon),
                    degree_in_sign: degree_in_sign(lon),
                    house: assign_house(lon, &cusps),
                };
                (angle, point)
            })
            .collect();

        let tracked = bodies
            .iter()
            .map(|(body, placed)| (*body, placed.position))
            .collect();
        let aspects = AspectCalculator::new(&self.aspects).compute_intra(&tracked);
        debug!("Detected {} natal aspects", aspects.len());

        Ok(NatalChart::new(
            instant, location, bodies, cusps, angles, aspects,
        ))
    }
}
