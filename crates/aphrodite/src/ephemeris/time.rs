//! Julian day conversions.

use chrono::{DateTime, TimeZone, Utc};

/// Julian day of the Unix epoch (1970-01-01T00:00:00Z).
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian day of J2000.0 (2000-01-01T12:00:00 TT, taken as UT here).
pub const JD_J2000: f64 = 2_451_545.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert UTC datetime to Julian Day
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let secs = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9;
    JD_UNIX_EPOCH + secs / SECONDS_PER_DAY
}

/// Convert Julian Day to UTC datetime; `None` outside chrono's range.
pub fn julian_day_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let secs = (jd - JD_UNIX_EPOCH) * SECONDS_PER_DAY;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(whole as i64, nanos).single()
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - JD_J2000) / 36_525.0
}
