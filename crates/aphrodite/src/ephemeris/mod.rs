pub mod analytic;
pub mod provider;
pub mod swiss;
pub mod time;
pub mod types;

pub use analytic::AnalyticEphemeris;
pub use provider::{PositionProvider, PositionSet};
pub use swiss::SwissEphemeris;
pub use time::{centuries_since_j2000, datetime_to_julian_day, julian_day_to_datetime};
pub use types::{BodyPosition, CelestialBody, GeoLocation};
