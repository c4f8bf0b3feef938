//! Self-contained low-precision ephemeris.
//!
//! Planets come from Keplerian mean elements with linear secular rates
//! (the 1800–2050 fit of Standish's "approximate positions" table), the Moon
//! from the principal periodic terms of the lunar theory, and the lunar nodes
//! and apogee from their mean-motion polynomials. Accuracy is of the order of
//! arc-minutes for the planets and a few tenths of a degree for the Moon,
//! which is enough for sign, house and aspect work.

use crate::ephemeris::provider::{PositionProvider, PositionSet};
use crate::ephemeris::time::{centuries_since_j2000, datetime_to_julian_day, julian_day_to_datetime, JD_J2000};
use crate::ephemeris::types::{BodyPosition, CelestialBody, GeoLocation};
use crate::error::{ChartError, ChartResult};
use crate::geometry::{atan2_deg, cos_deg, normalize_degrees, signed_delta, sin_deg};
use chrono::{DateTime, Utc};

/// 1800-01-01T00:00:00Z
const MIN_JD: f64 = 2_378_496.5;
/// 2051-01-01T00:00:00Z (exclusive)
const MAX_JD: f64 = 2_470_172.5;

const KM_PER_AU: f64 = 149_597_870.7;

/// Half-width of the central difference used for speeds (days).
const SPEED_STEP_DAYS: f64 = 0.5;

/// Element value at J2000 and its rate per Julian century.
#[derive(Debug, Clone, Copy)]
struct Element(f64, f64);

impl Element {
    fn at(&self, t: f64) -> f64 {
        self.0 + self.1 * t
    }
}

/// Mean orbital elements referred to the J2000 ecliptic and equinox.
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    semi_major_axis: Element,
    eccentricity: Element,
    inclination: Element,
    mean_longitude: Element,
    perihelion_longitude: Element,
    node_longitude: Element,
}

const MERCURY: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(0.38709927, 0.00000037),
    eccentricity: Element(0.20563593, 0.00001906),
    inclination: Element(7.00497902, -0.00594749),
    mean_longitude: Element(252.25032350, 149_472.67411175),
    perihelion_longitude: Element(77.45779628, 0.16047689),
    node_longitude: Element(48.33076593, -0.12534081),
};

const VENUS: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(0.72333566, 0.00000390),
    eccentricity: Element(0.00677672, -0.00004107),
    inclination: Element(3.39467605, -0.00078890),
    mean_longitude: Element(181.97909950, 58_517.81538729),
    perihelion_longitude: Element(131.60246718, 0.00268329),
    node_longitude: Element(76.67984255, -0.27769418),
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(1.00000261, 0.00000562),
    eccentricity: Element(0.01671123, -0.00004392),
    inclination: Element(-0.00001531, -0.01294668),
    mean_longitude: Element(100.46457166, 35_999.37244981),
    perihelion_longitude: Element(102.93768193, 0.32327364),
    node_longitude: Element(0.0, 0.0),
};

const MARS: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(1.52371034, 0.00001847),
    eccentricity: Element(0.09339410, 0.00007882),
    inclination: Element(1.84969142, -0.00813131),
    mean_longitude: Element(-4.55343205, 19_140.30268499),
    perihelion_longitude: Element(-23.94362959, 0.44441088),
    node_longitude: Element(49.55953891, -0.29257343),
};

const JUPITER: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(5.20288700, -0.00011607),
    eccentricity: Element(0.04838624, -0.00013253),
    inclination: Element(1.30439695, -0.00183714),
    mean_longitude: Element(34.39644051, 3_034.74612775),
    perihelion_longitude: Element(14.72847983, 0.21252668),
    node_longitude: Element(100.47390909, 0.20469106),
};

const SATURN: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(9.53667594, -0.00125060),
    eccentricity: Element(0.05386179, -0.00050991),
    inclination: Element(2.48599187, 0.00193609),
    mean_longitude: Element(49.95424423, 1_222.49362201),
    perihelion_longitude: Element(92.59887831, -0.41897216),
    node_longitude: Element(113.66242448, -0.28867794),
};

const URANUS: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(19.18916464, -0.00196176),
    eccentricity: Element(0.04725744, -0.00004397),
    inclination: Element(0.77263783, -0.00242939),
    mean_longitude: Element(313.23810451, 428.48202785),
    perihelion_longitude: Element(170.95427630, 0.40805281),
    node_longitude: Element(74.01692503, 0.04240589),
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(30.06992276, 0.00026291),
    eccentricity: Element(0.00859048, 0.00005105),
    inclination: Element(1.77004347, 0.00035372),
    mean_longitude: Element(-55.12002969, 218.45945325),
    perihelion_longitude: Element(44.96476227, -0.32241464),
    node_longitude: Element(131.78422574, -0.00508664),
};

const PLUTO: OrbitalElements = OrbitalElements {
    semi_major_axis: Element(39.48211675, -0.00031596),
    eccentricity: Element(0.24882730, 0.00005170),
    inclination: Element(17.14001206, 0.00004818),
    mean_longitude: Element(238.92903833, 145.20780515),
    perihelion_longitude: Element(224.06891629, -0.04062942),
    node_longitude: Element(110.30393684, -0.01183482),
};

/// Ecliptic longitude/latitude/distance before the speed is attached.
#[derive(Debug, Clone, Copy)]
struct Ecliptic {
    lon: f64,
    lat: f64,
    distance: f64,
}

/// Analytic position provider valid from 1800-01-01 to 2050-12-31 (UT).
///
/// Holds no data, so a single instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// First and last supported instants.
    pub fn valid_range() -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (julian_day_to_datetime(MIN_JD), julian_day_to_datetime(MAX_JD - 1e-6))
    }

    pub fn supports(body: CelestialBody) -> bool {
        !matches!(body, CelestialBody::Chiron)
    }

    fn check_range(instant: DateTime<Utc>) -> ChartResult<f64> {
        let jd = datetime_to_julian_day(instant);
        if !(MIN_JD..MAX_JD).contains(&jd) {
            return Err(ChartError::provider(format!(
                "{} is outside the analytic ephemeris range (1800-01-01 to 2050-12-31)",
                instant.to_rfc3339()
            )));
        }
        Ok(jd)
    }

    /// Position of a single body at a Julian day (no speed).
    fn ecliptic(body: CelestialBody, jd: f64) -> ChartResult<Ecliptic> {
        let t = centuries_since_j2000(jd);
        let position = match body {
            CelestialBody::Sun => {
                let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
                to_ecliptic([-earth[0], -earth[1], -earth[2]], t)
            }
            CelestialBody::Moon => moon(t),
            CelestialBody::Mercury => geocentric(&MERCURY, t),
            CelestialBody::Venus => geocentric(&VENUS, t),
            CelestialBody::Mars => geocentric(&MARS, t),
            CelestialBody::Jupiter => geocentric(&JUPITER, t),
            CelestialBody::Saturn => geocentric(&SATURN, t),
            CelestialBody::Uranus => geocentric(&URANUS, t),
            CelestialBody::Neptune => geocentric(&NEPTUNE, t),
            CelestialBody::Pluto => geocentric(&PLUTO, t),
            CelestialBody::NorthNode => point(mean_node(t)),
            CelestialBody::SouthNode => point(mean_node(t) + 180.0),
            CelestialBody::Lilith => point(mean_apogee(t)),
            CelestialBody::Chiron => {
                return Err(ChartError::provider(
                    "chiron is not available from the analytic ephemeris",
                ))
            }
        };
        Ok(position)
    }
}

impl PositionProvider for AnalyticEphemeris {
    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        _location: GeoLocation,
        bodies: &[CelestialBody],
    ) -> ChartResult<PositionSet> {
        let jd = Self::check_range(instant)?;

        let mut positions = PositionSet::new();
        for &body in bodies {
            let now = Self::ecliptic(body, jd)?;
            let before = Self::ecliptic(body, jd - SPEED_STEP_DAYS)?;
            let after = Self::ecliptic(body, jd + SPEED_STEP_DAYS)?;
            let speed = signed_delta(after.lon, before.lon) / (2.0 * SPEED_STEP_DAYS);

            positions.insert(
                body,
                BodyPosition {
                    body,
                    lon: now.lon,
                    lat: now.lat,
                    distance: now.distance,
                    speed_lon: Some(speed),
                    retrograde: speed < 0.0,
                },
            );
        }
        Ok(positions)
    }

    fn sidereal_time(&self, instant: DateTime<Utc>, longitude: f64) -> ChartResult<f64> {
        let jd = Self::check_range(instant)?;
        Ok(normalize_degrees(greenwich_sidereal_time(jd) + longitude))
    }

    fn obliquity(&self, instant: DateTime<Utc>) -> ChartResult<f64> {
        let jd = Self::check_range(instant)?;
        Ok(mean_obliquity(centuries_since_j2000(jd)))
    }
}

/// Greenwich mean sidereal time in degrees (IAU 1982).
pub fn greenwich_sidereal_time(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - JD_J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Mean obliquity of the ecliptic in degrees.
pub fn mean_obliquity(t: f64) -> f64 {
    23.439_291_111 - (46.8150 * t + 0.00059 * t * t - 0.001813 * t * t * t) / 3600.0
}

/// General precession in longitude since J2000, degrees.
fn precession(t: f64) -> f64 {
    1.396_971_3 * t + 0.000_308_8 * t * t
}

/// Solve Kepler's equation for the eccentric anomaly (radians).
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ea = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (mean_anomaly - (ea - e * ea.sin())) / (1.0 - e * ea.cos());
        ea += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic rectangular coordinates (AU, J2000 frame).
fn heliocentric(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let a = el.semi_major_axis.at(t);
    let e = el.eccentricity.at(t);
    let i = el.inclination.at(t);
    let l = el.mean_longitude.at(t);
    let peri = el.perihelion_longitude.at(t);
    let node = el.node_longitude.at(t);

    let arg_peri = peri - node;
    let mean_anomaly = signed_delta(l, peri).to_radians();
    let ea = eccentric_anomaly(mean_anomaly, e);

    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sw, cw) = (sin_deg(arg_peri), cos_deg(arg_peri));
    let (so, co) = (sin_deg(node), cos_deg(node));
    let (si, ci) = (sin_deg(i), cos_deg(i));

    [
        (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
        (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
        (sw * si) * xp + (cw * si) * yp,
    ]
}

fn geocentric(el: &OrbitalElements, t: f64) -> Ecliptic {
    let planet = heliocentric(el, t);
    let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
    to_ecliptic(
        [planet[0] - earth[0], planet[1] - earth[1], planet[2] - earth[2]],
        t,
    )
}

/// Rectangular J2000 vector to spherical coordinates of date.
fn to_ecliptic(v: [f64; 3], t: f64) -> Ecliptic {
    let rho = v[0].hypot(v[1]);
    Ecliptic {
        lon: normalize_degrees(atan2_deg(v[1], v[0]) + precession(t)),
        lat: atan2_deg(v[2], rho),
        distance: (rho * rho + v[2] * v[2]).sqrt(),
    }
}

fn point(lon: f64) -> Ecliptic {
    Ecliptic {
        lon: normalize_degrees(lon),
        lat: 0.0,
        distance: 0.0,
    }
}

/// Moon from the principal periodic terms; already referred to the equinox of date.
fn moon(t: f64) -> Ecliptic {
    let l = 218.316_447_7 + 481_267.881_234_21 * t;
    let d = 297.850_192_1 + 445_267.111_403_4 * t;
    let m = 357.529_109_2 + 35_999.050_290_9 * t;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t;
    let f = 93.272_095_0 + 483_202.017_523_3 * t;

    let lon = l + 6.288_774 * sin_deg(mp)
        + 1.274_027 * sin_deg(2.0 * d - mp)
        + 0.658_314 * sin_deg(2.0 * d)
        + 0.213_618 * sin_deg(2.0 * mp)
        - 0.185_116 * sin_deg(m)
        - 0.114_332 * sin_deg(2.0 * f)
        + 0.058_793 * sin_deg(2.0 * d - 2.0 * mp)
        + 0.057_066 * sin_deg(2.0 * d - m - mp)
        + 0.053_322 * sin_deg(2.0 * d + mp)
        + 0.045_758 * sin_deg(2.0 * d - m)
        - 0.040_923 * sin_deg(m - mp)
        - 0.034_720 * sin_deg(d)
        - 0.030_383 * sin_deg(m + mp);

    let lat = 5.128_122 * sin_deg(f)
        + 0.280_602 * sin_deg(mp + f)
        + 0.277_693 * sin_deg(mp - f)
        + 0.173_237 * sin_deg(2.0 * d - f)
        + 0.055_413 * sin_deg(2.0 * d - mp + f)
        + 0.046_271 * sin_deg(2.0 * d - mp - f);

    let distance_km = 385_000.56
        - 20_905.355 * cos_deg(mp)
        - 3_699.111 * cos_deg(2.0 * d - mp)
        - 2_955.968 * cos_deg(2.0 * d)
        - 569.925 * cos_deg(2.0 * mp);

    Ecliptic {
        lon: normalize_degrees(lon),
        lat,
        distance: distance_km / KM_PER_AU,
    }
}

/// Mean ascending lunar node.
fn mean_node(t: f64) -> f64 {
    125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t + t * t * t / 467_441.0
        - t * t * t * t / 60_616_000.0
}

/// Mean lunar apogee (Black Moon Lilith): mean perigee plus 180°.
fn mean_apogee(t: f64) -> f64 {
    83.353_246_5 + 4_069.013_728_7 * t - 0.010_320_0 * t * t - t * t * t / 80_053.0
        + t * t * t * t / 18_999_000.0
        + 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn j2000() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    fn origin() -> GeoLocation {
        GeoLocation { lat: 0.0, lon: 0.0 }
    }

    #[test]
    fn test_kepler_circular_orbit() {
        assert_eq!(eccentric_anomaly(1.0, 0.0), 1.0);
        let ea = eccentric_anomaly(1.0, 0.2);
        assert!((ea - 0.2 * ea.sin() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_sun_at_j2000() {
        let set = AnalyticEphemeris
            .positions_at(j2000(), origin(), &[CelestialBody::Sun])
            .unwrap();
        let sun = set[&CelestialBody::Sun];
        assert!((sun.lon - 280.37).abs() < 0.1, "sun lon {}", sun.lon);
        let speed = sun.speed_lon.unwrap();
        assert!(speed > 0.95 && speed < 1.05, "sun speed {}", speed);
        assert!(!sun.retrograde);
        assert!((sun.distance - 0.983).abs() < 0.01);
    }

    #[test]
    fn test_moon_at_j2000() {
        let set = AnalyticEphemeris
            .positions_at(j2000(), origin(), &[CelestialBody::Moon])
            .unwrap();
        let moon = set[&CelestialBody::Moon];
        assert!((moon.lon - 223.3).abs() < 0.5, "moon lon {}", moon.lon);
        assert!(moon.speed_lon.unwrap() > 11.0);
    }

    #[test]
    fn test_nodes_are_opposite_and_retrograde() {
        let set = AnalyticEphemeris
            .positions_at(
                j2000(),
                origin(),
                &[CelestialBody::NorthNode, CelestialBody::SouthNode],
            )
            .unwrap();
        let north = set[&CelestialBody::NorthNode];
        let south = set[&CelestialBody::SouthNode];
        assert!((crate::geometry::separation(north.lon, south.lon) - 180.0).abs() < 1e-9);
        assert!(north.retrograde);
        assert!((north.lon - 125.04).abs() < 0.01);
    }

    #[test]
    fn test_outer_planets_signs_in_2000() {
        let set = AnalyticEphemeris
            .positions_at(
                j2000(),
                origin(),
                &[CelestialBody::Jupiter, CelestialBody::Saturn],
            )
            .unwrap();
        let jupiter = set[&CelestialBody::Jupiter].lon;
        let saturn = set[&CelestialBody::Saturn].lon;
        assert!((0.0..30.0).contains(&jupiter), "jupiter {}", jupiter);
        assert!((30.0..60.0).contains(&saturn), "saturn {}", saturn);
    }

    #[test]
    fn test_out_of_range_is_provider_error() {
        let early = Utc.with_ymd_and_hms(1750, 6, 1, 0, 0, 0).unwrap();
        let err = AnalyticEphemeris
            .positions_at(early, origin(), &[CelestialBody::Sun])
            .unwrap_err();
        assert!(matches!(err, ChartError::Provider { .. }));

        let late = Utc.with_ymd_and_hms(2051, 1, 1, 0, 0, 0).unwrap();
        assert!(AnalyticEphemeris.obliquity(late).is_err());
        assert!(AnalyticEphemeris.sidereal_time(late, 0.0).is_err());
    }

    #[test]
    fn test_chiron_unsupported() {
        assert!(!AnalyticEphemeris::supports(CelestialBody::Chiron));
        let err = AnalyticEphemeris
            .positions_at(j2000(), origin(), &[CelestialBody::Chiron])
            .unwrap_err();
        assert!(matches!(err, ChartError::Provider { .. }));
    }

    #[test]
    fn test_sidereal_time_and_obliquity() {
        let gmst = AnalyticEphemeris.sidereal_time(j2000(), 0.0).unwrap();
        assert!((gmst - 280.4606).abs() < 1e-3);
        let lst = AnalyticEphemeris.sidereal_time(j2000(), 90.0).unwrap();
        assert!((lst - 10.4606).abs() < 1e-3);
        let eps = AnalyticEphemeris.obliquity(j2000()).unwrap();
        assert!((eps - 23.4393).abs() < 1e-3);
    }

    #[test]
    fn test_valid_range_bounds() {
        let (start, end) = AnalyticEphemeris::valid_range();
        assert_eq!(start.unwrap(), Utc.with_ymd_and_hms(1800, 1, 1, 0, 0, 0).unwrap());
        assert!(end.unwrap() < Utc.with_ymd_and_hms(2051, 1, 1, 0, 0, 0).unwrap());
    }
}
