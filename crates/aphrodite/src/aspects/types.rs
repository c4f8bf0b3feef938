use crate::ephemeris::types::CelestialBody;
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognised aspect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    SemiSextile,
    SemiSquare,
    Sesquiquadrate,
    Quincunx,
    Quintile,
    BiQuintile,
}

impl AspectKind {
    pub const ALL: [AspectKind; 11] = [
        AspectKind::Conjunction,
        AspectKind::Opposition,
        AspectKind::Trine,
        AspectKind::Square,
        AspectKind::Sextile,
        AspectKind::SemiSextile,
        AspectKind::SemiSquare,
        AspectKind::Sesquiquadrate,
        AspectKind::Quincunx,
        AspectKind::Quintile,
        AspectKind::BiQuintile,
    ];

    /// Ideal separation in degrees.
    pub fn angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Trine => 120.0,
            AspectKind::Square => 90.0,
            AspectKind::Sextile => 60.0,
            AspectKind::SemiSextile => 30.0,
            AspectKind::SemiSquare => 45.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Quintile => 72.0,
            AspectKind::BiQuintile => 144.0,
        }
    }

    /// Tie-break order; lower wins when two kinds match equally well.
    /// Every minor aspect ranks after the five majors.
    pub fn rank(&self) -> u8 {
        match self {
            AspectKind::Conjunction => 0,
            AspectKind::Opposition => 1,
            AspectKind::Trine => 2,
            AspectKind::Square => 3,
            AspectKind::Sextile => 4,
            _ => 5,
        }
    }

    pub fn is_major(&self) -> bool {
        self.rank() < 5
    }

    /// +1 for harmonious kinds, -1 for discordant ones.
    pub fn polarity(&self) -> f64 {
        match self {
            AspectKind::Conjunction
            | AspectKind::Sextile
            | AspectKind::Trine
            | AspectKind::SemiSextile
            | AspectKind::Quintile
            | AspectKind::BiQuintile => 1.0,
            AspectKind::Square
            | AspectKind::Opposition
            | AspectKind::SemiSquare
            | AspectKind::Sesquiquadrate
            | AspectKind::Quincunx => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Opposition => "opposition",
            AspectKind::Trine => "trine",
            AspectKind::Square => "square",
            AspectKind::Sextile => "sextile",
            AspectKind::SemiSextile => "semi_sextile",
            AspectKind::SemiSquare => "semi_square",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Quintile => "quintile",
            AspectKind::BiQuintile => "bi_quintile",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase().replace('-', "_");
        AspectKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| format!("Unknown aspect kind: {}", s))
    }
}

/// Orb tolerance for one aspect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRule {
    pub kind: AspectKind,
    /// Maximum allowed deviation from the ideal angle, degrees
    pub orb: f64,
}

/// The aspect kinds to look for and their orbs.
///
/// Has no `Default`; build one from configuration or take
/// [`AspectTable::classical`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AspectRule>", into = "Vec<AspectRule>")]
pub struct AspectTable {
    rules: Vec<AspectRule>,
}

impl AspectTable {
    /// Validated table: non-empty, one rule per kind, finite non-negative orbs.
    pub fn new(rules: Vec<AspectRule>) -> ChartResult<Self> {
        if rules.is_empty() {
            return Err(ChartError::configuration("aspect table is empty"));
        }
        for (i, rule) in rules.iter().enumerate() {
            if !rule.orb.is_finite() || rule.orb < 0.0 {
                return Err(ChartError::configuration(format!(
                    "orb for {} must be a finite non-negative number, got {}",
                    rule.kind, rule.orb
                )));
            }
            if rules[..i].iter().any(|r| r.kind == rule.kind) {
                return Err(ChartError::configuration(format!(
                    "aspect kind {} configured twice",
                    rule.kind
                )));
            }
        }
        Ok(Self { rules })
    }

    /// The five major aspects with the usual natal orbs
    /// (conjunction 8°, opposition 8°, trine 7°, square 6°, sextile 5°).
    pub fn classical() -> Self {
        Self {
            rules: vec![
                AspectRule { kind: AspectKind::Conjunction, orb: 8.0 },
                AspectRule { kind: AspectKind::Opposition, orb: 8.0 },
                AspectRule { kind: AspectKind::Trine, orb: 7.0 },
                AspectRule { kind: AspectKind::Square, orb: 6.0 },
                AspectRule { kind: AspectKind::Sextile, orb: 5.0 },
            ],
        }
    }

    pub fn orb(&self, kind: AspectKind) -> Option<f64> {
        self.rules.iter().find(|r| r.kind == kind).map(|r| r.orb)
    }

    pub fn rules(&self) -> &[AspectRule] {
        &self.rules
    }

    pub fn kinds(&self) -> impl Iterator<Item = AspectKind> + '_ {
        self.rules.iter().map(|r| r.kind)
    }
}

impl TryFrom<Vec<AspectRule>> for AspectTable {
    type Error = ChartError;

    fn try_from(rules: Vec<AspectRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<AspectTable> for Vec<AspectRule> {
    fn from(table: AspectTable) -> Self {
        table.rules
    }
}

/// Whether the gap to the exact angle is shrinking or growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Applying,
    Separating,
}

/// A detected aspect between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub first: CelestialBody,
    pub second: CelestialBody,
    pub kind: AspectKind,
    /// Shortest arc between the two longitudes, [0, 180]
    pub separation: f64,
    /// |separation - ideal angle|
    pub deviation: f64,
    /// Orb the aspect was accepted under
    pub orb: f64,
    /// Absent when either body has no velocity data
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub motion: Option<Motion>,
}

impl Aspect {
    /// `1 - deviation / orb`, or 1 for a zero orb.
    pub fn exactness(&self) -> f64 {
        if self.orb > 0.0 {
            (1.0 - self.deviation / self.orb).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn involves(&self, body: CelestialBody) -> bool {
        self.first == body || self.second == body
    }
}
