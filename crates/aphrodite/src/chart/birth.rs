//! Birth data as entered by a person, and the identity derived from it.

use crate::ephemeris::types::GeoLocation;
use crate::error::{ChartError, ChartResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Largest UTC offset in use anywhere (Line Islands, UTC+14).
const MAX_TZ_OFFSET_HOURS: f64 = 14.0;

/// Local civil birth date and time with a fixed UTC offset and coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Hours east of UTC, may be fractional (e.g. 5.5)
    #[serde(default)]
    pub tz_offset_hours: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl BirthData {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        tz_offset_hours: f64,
        latitude: f64,
        longitude: f64,
    ) -> ChartResult<Self> {
        let data = Self {
            date,
            time,
            tz_offset_hours,
            latitude,
            longitude,
        };
        data.validate()?;
        Ok(data)
    }

    /// Build from calendar fields, rejecting impossible dates and times.
    #[allow(clippy::too_many_arguments)]
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        tz_offset_hours: f64,
        latitude: f64,
        longitude: f64,
    ) -> ChartResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ChartError::validation(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            ChartError::validation(format!("{hour:02}:{minute:02}:{second:02} is not a time of day"))
        })?;
        Self::new(date, time, tz_offset_hours, latitude, longitude)
    }

    pub fn validate(&self) -> ChartResult<()> {
        let finite = [self.tz_offset_hours, self.latitude, self.longitude]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ChartError::validation("birth data contains a non-finite number"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ChartError::validation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ChartError::validation(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if self.tz_offset_hours.abs() > MAX_TZ_OFFSET_HOURS {
            return Err(ChartError::validation(format!(
                "UTC offset {}h outside [-14, 14]",
                self.tz_offset_hours
            )));
        }
        Ok(())
    }

    /// Birth instant in UTC.
    pub fn instant(&self) -> ChartResult<DateTime<Utc>> {
        self.validate()?;
        let seconds = (self.tz_offset_hours * 3600.0).round() as i32;
        let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
            ChartError::validation(format!("invalid UTC offset {}h", self.tz_offset_hours))
        })?;
        offset
            .from_local_datetime(&self.date.and_time(self.time))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| ChartError::validation("local birth time is ambiguous"))
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            lat: self.latitude,
            lon: self.longitude,
        }
    }

    pub fn chart_id(&self) -> ChartResult<ChartId> {
        Ok(ChartId::derive(self.instant()?, self.location()))
    }
}

/// Deterministic chart identifier.
///
/// First 16 hex digits of the SHA-256 of `"<rfc3339 instant>|<lat>|<lon>"`
/// with coordinates printed to six decimals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    pub fn derive(instant: DateTime<Utc>, location: GeoLocation) -> Self {
        let canonical = format!(
            "{}|{:.6}|{:.6}",
            instant.to_rfc3339(),
            location.lat,
            location.lon
        );
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
