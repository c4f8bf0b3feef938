//! Positions from the Swiss Ephemeris data files.

use crate::ephemeris::provider::{PositionProvider, PositionSet};
use crate::ephemeris::types::{BodyPosition, CelestialBody, GeoLocation};
use crate::error::{ChartError, ChartResult};
use crate::geometry::normalize_degrees;
use chrono::{DateTime, Datelike, Timelike, Utc};
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use swisseph::swe::{calc_ut, houses_ex, julday, set_ephe_path};

/// Environment variable naming the ephemeris data directory.
pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

const FLG_SWIEPH: u32 = 2;
const FLG_SPEED: u32 = 256;
/// Pseudo-body whose first output is the true obliquity of date.
const ECL_NUT: i32 = -1;
const GREG_CAL: u32 = 1;
const PLACIDUS: u8 = b'P';
/// Index of the ARMC (local sidereal time in degrees) in the houses output.
const ARMC: usize = 2;

// The C library holds the data path and open file handles in globals.
static SWISS: Mutex<()> = Mutex::new(());

/// Swiss Ephemeris body code; the south node is derived from the north node.
fn body_code(body: CelestialBody) -> Option<i32> {
    match body {
        CelestialBody::Sun => Some(0),
        CelestialBody::Moon => Some(1),
        CelestialBody::Mercury => Some(2),
        CelestialBody::Venus => Some(3),
        CelestialBody::Mars => Some(4),
        CelestialBody::Jupiter => Some(5),
        CelestialBody::Saturn => Some(6),
        CelestialBody::Uranus => Some(7),
        CelestialBody::Neptune => Some(8),
        CelestialBody::Pluto => Some(9),
        CelestialBody::NorthNode => Some(11), // true node
        CelestialBody::Lilith => Some(12),    // mean apogee
        CelestialBody::Chiron => Some(15),
        CelestialBody::SouthNode => None,
    }
}

/// Production position provider backed by the `swisseph` crate.
///
/// Reads the `.se1` files under one directory. Instants those files do not
/// cover, and bodies whose file is missing (Chiron needs `seas_*.se1`), fail
/// with `ChartError::Provider`.
#[derive(Debug, Clone)]
pub struct SwissEphemeris {
    path: PathBuf,
}

impl SwissEphemeris {
    /// Open the data directory `path`, else `$SWISS_EPHEMERIS_PATH`, else
    /// [`DEFAULT_EPHEMERIS_PATH`].
    pub fn new(path: Option<PathBuf>) -> ChartResult<Self> {
        let path = path.unwrap_or_else(|| {
            env::var(EPHEMERIS_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });
        check_data_dir(&path)?;

        let _guard = lock()?;
        set_ephe_path(&path.to_string_lossy());
        info!("Swiss Ephemeris data at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn position(body: CelestialBody, jd: f64) -> ChartResult<BodyPosition> {
        let Some(code) = body_code(body) else {
            let north = Self::position(CelestialBody::NorthNode, jd)?;
            return Ok(BodyPosition {
                body,
                lon: normalize_degrees(north.lon + 180.0),
                lat: -north.lat,
                ..north
            });
        };

        let out = calc(jd, code, body)?;
        let speed = out[3];
        Ok(BodyPosition {
            body,
            lon: normalize_degrees(out[0]),
            lat: out[1],
            distance: out[2],
            speed_lon: Some(speed),
            retrograde: speed < 0.0,
        })
    }
}

impl PositionProvider for SwissEphemeris {
    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        _location: GeoLocation,
        bodies: &[CelestialBody],
    ) -> ChartResult<PositionSet> {
        let jd = julian_day(instant);
        debug!("Swiss Ephemeris positions for {} bodies at JD {jd:.5}", bodies.len());
        let _guard = lock()?;
        bodies
            .iter()
            .map(|&body| Ok((body, Self::position(body, jd)?)))
            .collect()
    }

    fn sidereal_time(&self, instant: DateTime<Utc>, longitude: f64) -> ChartResult<f64> {
        let jd = julian_day(instant);
        let _guard = lock()?;
        // latitude 0 keeps the house routine clear of the polar cases
        let (_, ascmc) = houses_ex(jd, 0, 0.0, longitude, PLACIDUS as i32);
        Ok(normalize_degrees(ascmc[ARMC]))
    }

    fn obliquity(&self, instant: DateTime<Utc>) -> ChartResult<f64> {
        let jd = julian_day(instant);
        let _guard = lock()?;
        let result = calc_ut(jd, ECL_NUT as u32, FLG_SWIEPH).map_err(|e| {
            ChartError::provider(format!("Swiss Ephemeris obliquity at JD {jd:.5}: {e}"))
        })?;
        Ok(result.out[0])
    }
}

fn lock() -> ChartResult<MutexGuard<'static, ()>> {
    SWISS
        .lock()
        .map_err(|_| ChartError::provider("Swiss Ephemeris lock poisoned by an earlier panic"))
}

fn calc(jd: f64, code: i32, body: CelestialBody) -> ChartResult<[f64; 6]> {
    let result = calc_ut(jd, code as u32, FLG_SWIEPH | FLG_SPEED).map_err(|e| {
        ChartError::provider(format!("Swiss Ephemeris failed for {body} at JD {jd:.5}: {e}"))
    })?;
    let out = result.out;
    Ok([out[0], out[1], out[2], out[3], out[4], out[5]])
}

/// Julian day (UT) through the library's own calendar routine.
fn julian_day(instant: DateTime<Utc>) -> f64 {
    let seconds = f64::from(instant.second()) + f64::from(instant.nanosecond()) / 1e9;
    let hours =
        f64::from(instant.hour()) + f64::from(instant.minute()) / 60.0 + seconds / 3600.0;
    julday(
        instant.year(),
        instant.month() as i32,
        instant.day() as i32,
        hours,
        GREG_CAL,
    )
}

/// The directory must exist and contain at least one `.se1` file.
fn check_data_dir(path: &Path) -> ChartResult<()> {
    let entries = std::fs::read_dir(path).map_err(|e| {
        ChartError::provider(format!(
            "ephemeris directory {} is unreadable: {e}",
            path.display()
        ))
    })?;
    let has_data = entries
        .filter_map(Result::ok)
        .any(|entry| entry.path().extension().is_some_and(|ext| ext == "se1"));
    if !has_data {
        return Err(ChartError::provider(format!(
            "no Swiss Ephemeris data files (*.se1) in {}",
            path.display()
        )));
    }
    Ok(())
}
