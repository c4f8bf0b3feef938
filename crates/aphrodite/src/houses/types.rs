use crate::error::{ChartError, ChartResult, GeometryFault};
use crate::geometry::{arc_span, normalize_degrees};
use serde::{Deserialize, Serialize};

/// Tolerance when checking that twelve arc spans close the circle.
const CLOSURE_EPSILON: f64 = 1e-9;

/// Supported house systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HouseSystem {
    #[default]
    Placidus,
}

/// Numeric knobs for the house calculator.
///
/// Defaults: Placidus, 1e-6° convergence tolerance, 100 iterations per cusp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseSettings {
    pub system: HouseSystem,
    pub tolerance_deg: f64,
    pub max_iterations: u32,
}

impl Default for HouseSettings {
    fn default() -> Self {
        Self {
            system: HouseSystem::Placidus,
            tolerance_deg: 1e-6,
            max_iterations: 100,
        }
    }
}

impl HouseSettings {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.tolerance_deg.is_finite() || self.tolerance_deg <= 0.0 {
            return Err(ChartError::configuration(format!(
                "house tolerance must be a positive number of degrees, got {}",
                self.tolerance_deg
            )));
        }
        if self.max_iterations == 0 {
            return Err(ChartError::configuration(
                "house iteration cap must be at least 1",
            ));
        }
        Ok(())
    }
}

/// One house boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// House index, 1..=12
    pub house: u8,
    /// Cusp longitude in degrees [0, 360)
    pub lon: f64,
}

/// Twelve cusps in increasing circular order from house 1.
///
/// Only constructible through [`HouseCusps::new`], which rejects sequences
/// whose arcs do not partition the ecliptic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HouseCusps {
    cusps: Vec<HouseCusp>,
}

impl HouseCusps {
    /// Build from cusp longitudes for houses 1..=12.
    pub fn new(longitudes: [f64; 12]) -> ChartResult<Self> {
        if longitudes.iter().any(|l| !l.is_finite()) {
            return Err(ChartError::geometry(
                GeometryFault::Disordered,
                "non-finite cusp longitude",
            ));
        }
        let lons = longitudes.map(normalize_degrees);

        let mut total = 0.0;
        for i in 0..12 {
            let span = arc_span(lons[i], lons[(i + 1) % 12]);
            if span <= 0.0 {
                return Err(ChartError::geometry(
                    GeometryFault::Disordered,
                    format!("house {} has an empty arc", i + 1),
                ));
            }
            total += span;
        }
        if (total - 360.0).abs() > CLOSURE_EPSILON {
            return Err(ChartError::geometry(
                GeometryFault::Disordered,
                format!("cusp arcs span {total:.6}° instead of 360°"),
            ));
        }

        let cusps = lons
            .iter()
            .enumerate()
            .map(|(i, &lon)| HouseCusp {
                house: i as u8 + 1,
                lon,
            })
            .collect();
        Ok(Self { cusps })
    }

    /// Longitude of the cusp opening `house` (1..=12); `None` for other indices.
    pub fn cusp(&self, house: u8) -> Option<f64> {
        house
            .checked_sub(1)
            .and_then(|i| self.cusps.get(i as usize))
            .map(|c| c.lon)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HouseCusp> + ExactSizeIterator + '_ {
        self.cusps.iter()
    }

    pub fn as_slice(&self) -> &[HouseCusp] {
        &self.cusps
    }

    /// Arc length of `house` (from its cusp to the next one).
    pub fn span(&self, house: u8) -> Option<f64> {
        let start = self.cusp(house)?;
        let end = self.cusp(house % 12 + 1)?;
        Some(arc_span(start, end))
    }

    pub fn ascendant(&self) -> f64 {
        self.cusps[0].lon
    }

    pub fn midheaven(&self) -> f64 {
        self.cusps[9].lon
    }
}

/// The four chart angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartAngle {
    Ascendant,
    Midheaven,
    Descendant,
    ImumCoeli,
}

impl ChartAngle {
    pub const ALL: [ChartAngle; 4] = [
        ChartAngle::Ascendant,
        ChartAngle::Midheaven,
        ChartAngle::Descendant,
        ChartAngle::ImumCoeli,
    ];

    /// House whose cusp this angle is.
    pub fn house(&self) -> u8 {
        match self {
            ChartAngle::Ascendant => 1,
            ChartAngle::ImumCoeli => 4,
            ChartAngle::Descendant => 7,
            ChartAngle::Midheaven => 10,
        }
    }
}

/// Angle longitudes, read off the cusps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartAngles {
    pub ascendant: f64,
    pub midheaven: f64,
    pub descendant: f64,
    pub imum_coeli: f64,
}

impl ChartAngles {
    pub fn from_cusps(cusps: &HouseCusps) -> Self {
        Self {
            ascendant: cusps.ascendant(),
            midheaven: cusps.midheaven(),
            descendant: cusps.cusps[6].lon,
            imum_coeli: cusps.cusps[3].lon,
        }
    }

    pub fn get(&self, angle: ChartAngle) -> f64 {
        match angle {
            ChartAngle::Ascendant => self.ascendant,
            ChartAngle::Midheaven => self.midheaven,
            ChartAngle::Descendant => self.descendant,
            ChartAngle::ImumCoeli => self.imum_coeli,
        }
    }
}
