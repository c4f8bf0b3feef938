//! Shared fixtures: a position provider that returns whatever it was given.
#![allow(dead_code)]

use aphrodite::ephemeris::{BodyPosition, CelestialBody, GeoLocation, PositionProvider, PositionSet};
use aphrodite::{ChartError, ChartResult};
use chrono::{DateTime, TimeZone, Utc};

pub const OBLIQUITY: f64 = 23.4393;

/// Returns fixed positions, sidereal time and obliquity for any instant.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    pub positions: Vec<BodyPosition>,
    pub sidereal_time: f64,
    pub obliquity: f64,
    pub fail_with: Option<ChartError>,
}

impl FixedProvider {
    pub fn new(positions: Vec<BodyPosition>, sidereal_time: f64) -> Self {
        Self {
            positions,
            sidereal_time,
            obliquity: OBLIQUITY,
            fail_with: None,
        }
    }

    pub fn failing(err: ChartError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new(vec![], 0.0)
        }
    }

    fn check(&self) -> ChartResult<()> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl PositionProvider for FixedProvider {
    fn positions_at(
        &self,
        _instant: DateTime<Utc>,
        _location: GeoLocation,
        bodies: &[CelestialBody],
    ) -> ChartResult<PositionSet> {
        self.check()?;
        Ok(self
            .positions
            .iter()
            .filter(|p| bodies.contains(&p.body))
            .map(|p| (p.body, *p))
            .collect())
    }

    fn sidereal_time(&self, _instant: DateTime<Utc>, _longitude: f64) -> ChartResult<f64> {
        self.check()?;
        Ok(self.sidereal_time)
    }

    fn obliquity(&self, _instant: DateTime<Utc>) -> ChartResult<f64> {
        self.check()?;
        Ok(self.obliquity)
    }
}

pub fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 5, 17, 12, 30, 0).unwrap()
}

pub fn at(body: CelestialBody, lon: f64) -> BodyPosition {
    BodyPosition::fixed(body, lon)
}

pub fn set(positions: &[BodyPosition]) -> PositionSet {
    positions.iter().map(|p| (p.body, *p)).collect()
}
