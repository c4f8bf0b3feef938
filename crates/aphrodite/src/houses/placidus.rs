//! Placidus houses by the semi-arc method.
//!
//! The angles come straight from spherical trigonometry. Each intermediate
//! cusp is the ecliptic point whose own diurnal (houses 11, 12) or nocturnal
//! (houses 2, 3) semi-arc is trisected by the meridian distance; that point
//! depends on its own declination, so it is found by fixed-point iteration on
//! right ascension.

use crate::error::{ChartError, ChartResult, GeometryFault};
use crate::geometry::{atan2_deg, cos_deg, normalize_degrees, signed_delta, sin_deg, tan_deg};
use crate::houses::types::{HouseCusps, HouseSettings, HouseSystem};
use log::{debug, warn};

/// Which half of the diurnal circle a cusp trisects.
#[derive(Debug, Clone, Copy)]
enum Arc {
    /// Between MC and ASC; offset is a fraction of the diurnal semi-arc.
    Diurnal,
    /// Between ASC and IC; offset is a fraction of the nocturnal semi-arc.
    Nocturnal,
}

/// Compute the twelve cusps.
///
/// `sidereal_time` is local sidereal time in degrees (the RAMC), `latitude`
/// geographic latitude and `obliquity` the obliquity of the ecliptic, all in
/// degrees. Latitudes beyond ±90° are a validation error; exactly ±90° and
/// any latitude where a cusp's semi-arc does not exist are a geometry error,
/// as is a cusp that does not settle within `settings.max_iterations`.
pub fn compute_cusps(
    sidereal_time: f64,
    latitude: f64,
    obliquity: f64,
    settings: &HouseSettings,
) -> ChartResult<HouseCusps> {
    if !sidereal_time.is_finite() || !latitude.is_finite() || !obliquity.is_finite() {
        return Err(ChartError::validation(
            "sidereal time, latitude and obliquity must be finite",
        ));
    }
    if latitude.abs() > 90.0 {
        return Err(ChartError::validation(format!(
            "latitude {latitude} outside [-90, 90]"
        )));
    }
    if latitude.abs() == 90.0 {
        warn!("Placidus houses requested at the pole (latitude {latitude})");
        return Err(ChartError::geometry(
            GeometryFault::UndefinedLatitude { latitude },
            "houses are undefined at the poles",
        ));
    }
    settings.validate()?;

    let result = match settings.system {
        HouseSystem::Placidus => placidus(sidereal_time, latitude, obliquity, settings),
    };
    if let Err(err) = &result {
        warn!("House calculation failed at latitude {latitude}: {err}");
    }
    result
}

fn placidus(
    ramc: f64,
    latitude: f64,
    obliquity: f64,
    settings: &HouseSettings,
) -> ChartResult<HouseCusps> {
    let ramc = normalize_degrees(ramc);
    let mc = midheaven(ramc, obliquity);
    let asc = ascendant(ramc, latitude, obliquity);

    let c11 = intermediate_cusp(11, Arc::Diurnal, 1.0 / 3.0, ramc, latitude, obliquity, settings)?;
    let c12 = intermediate_cusp(12, Arc::Diurnal, 2.0 / 3.0, ramc, latitude, obliquity, settings)?;
    let c2 = intermediate_cusp(2, Arc::Nocturnal, 2.0 / 3.0, ramc, latitude, obliquity, settings)?;
    let c3 = intermediate_cusp(3, Arc::Nocturnal, 1.0 / 3.0, ramc, latitude, obliquity, settings)?;

    debug!(
        "Placidus cusps for RAMC {ramc:.4}: ASC {asc:.4}, MC {mc:.4}, 11 {c11:.4}, 12 {c12:.4}, 2 {c2:.4}, 3 {c3:.4}"
    );

    HouseCusps::new([
        asc,
        c2,
        c3,
        mc + 180.0,
        c11 + 180.0,
        c12 + 180.0,
        asc + 180.0,
        c2 + 180.0,
        c3 + 180.0,
        mc,
        c11,
        c12,
    ])
}

/// Ecliptic longitude culminating at `ramc`.
pub fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    normalize_degrees(atan2_deg(sin_deg(ramc), cos_deg(ramc) * cos_deg(obliquity)))
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant(ramc: f64, latitude: f64, obliquity: f64) -> f64 {
    normalize_degrees(atan2_deg(
        cos_deg(ramc),
        -(sin_deg(ramc) * cos_deg(obliquity) + tan_deg(latitude) * sin_deg(obliquity)),
    ))
}

/// Ecliptic longitude of the point with right ascension `ra`.
fn ecliptic_longitude(ra: f64, obliquity: f64) -> f64 {
    normalize_degrees(atan2_deg(sin_deg(ra), cos_deg(ra) * cos_deg(obliquity)))
}

/// Diurnal semi-arc (degrees) of the ecliptic point with right ascension `ra`.
fn diurnal_semi_arc(ra: f64, latitude: f64, obliquity: f64) -> Option<f64> {
    let declination = (tan_deg(obliquity) * sin_deg(ra)).atan().to_degrees();
    let arg = -tan_deg(latitude) * tan_deg(declination);
    if arg.abs() > 1.0 {
        // circumpolar: never rises or never sets
        return None;
    }
    Some(arg.acos().to_degrees())
}

fn intermediate_cusp(
    house: u8,
    arc: Arc,
    fraction: f64,
    ramc: f64,
    latitude: f64,
    obliquity: f64,
    settings: &HouseSettings,
) -> ChartResult<f64> {
    let step = |ra: f64| -> ChartResult<f64> {
        let dsa = diurnal_semi_arc(ra, latitude, obliquity).ok_or_else(|| {
            ChartError::geometry(
                GeometryFault::UndefinedLatitude { latitude },
                format!("cusp {house} lies on a circumpolar part of the ecliptic"),
            )
        })?;
        Ok(match arc {
            Arc::Diurnal => ramc + fraction * dsa,
            Arc::Nocturnal => ramc + 180.0 - fraction * (180.0 - dsa),
        })
    };

    // start from the equatorial solution, where every semi-arc is 90°
    let mut ra = match arc {
        Arc::Diurnal => ramc + fraction * 90.0,
        Arc::Nocturnal => ramc + 180.0 - fraction * 90.0,
    };

    for _ in 0..settings.max_iterations {
        let next = step(ra)?;
        let delta = signed_delta(next, ra);
        ra = next;
        if delta.abs() < settings.tolerance_deg {
            return Ok(ecliptic_longitude(ra, obliquity));
        }
    }

    Err(ChartError::geometry(
        GeometryFault::NonConvergent {
            house,
            iterations: settings.max_iterations,
        },
        format!("Placidus iteration for cusp {house} did not converge"),
    ))
}
