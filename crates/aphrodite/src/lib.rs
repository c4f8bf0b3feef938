//! Natal chart computation and chart-to-chart compatibility scoring.
//!
//! The pipeline runs leaf-first: a [`PositionProvider`] supplies raw body
//! positions, sidereal time and obliquity; [`compute_cusps`] turns those into
//! Placidus houses; [`assign_house`] places bodies and angles;
//! [`detect_aspects`] finds the aspects; [`ChartAssembler`] freezes it all
//! into a [`NatalChart`]; [`CompatibilityScorer`] compares two charts.

pub mod aspects;
pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod geometry;
pub mod houses;
pub mod synastry;
pub mod western;

pub use aspects::{detect_aspects, Aspect, AspectCalculator, AspectKind, AspectRule, AspectTable, Motion};
pub use chart::{BirthData, ChartAssembler, ChartId, NatalChart, PlacedBody};
pub use config::{EngineConfig, EphemerisSettings};
pub use ephemeris::{
    AnalyticEphemeris, BodyPosition, CelestialBody, GeoLocation, PositionProvider, PositionSet,
    SwissEphemeris,
};
pub use error::{ChartError, ChartResult, ErrorKind, GeometryFault};
pub use houses::{assign_house, compute_cusps, ChartAngle, ChartAngles, HouseCusp, HouseCusps, HouseSettings, HouseSystem};
pub use synastry::{CompatibilityResult, CompatibilityScorer, WeightTable};
pub use western::{Element, ZodiacSign};
