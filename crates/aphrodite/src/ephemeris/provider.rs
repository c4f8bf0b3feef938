//! The seam between chart computation and raw ephemeris data.

use crate::ephemeris::types::{BodyPosition, CelestialBody, GeoLocation};
use crate::error::ChartResult;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Positions of the requested bodies at one instant, keyed by body.
pub type PositionSet = BTreeMap<CelestialBody, BodyPosition>;

/// Source of raw celestial positions.
///
/// Implementations are pure: the same instant and location always yield the
/// same answer, and any data they read (ephemeris files) is read-only, so one
/// provider may be shared by concurrent callers. An instant outside the
/// provider's data range is a `ChartError::Provider`.
pub trait PositionProvider: Send + Sync {
    /// Ecliptic positions (tropical, equinox of date) of `bodies`.
    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
        bodies: &[CelestialBody],
    ) -> ChartResult<PositionSet>;

    /// Local sidereal time in degrees [0, 360) for an east longitude.
    fn sidereal_time(&self, instant: DateTime<Utc>, longitude: f64) -> ChartResult<f64>;

    /// Obliquity of the ecliptic in degrees.
    fn obliquity(&self, instant: DateTime<Utc>) -> ChartResult<f64>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for std::sync::Arc<P> {
    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
        bodies: &[CelestialBody],
    ) -> ChartResult<PositionSet> {
        (**self).positions_at(instant, location, bodies)
    }

    fn sidereal_time(&self, instant: DateTime<Utc>, longitude: f64) -> ChartResult<f64> {
        (**self).sidereal_time(instant, longitude)
    }

    fn obliquity(&self, instant: DateTime<Utc>) -> ChartResult<f64> {
        (**self).obliquity(instant)
    }
}
