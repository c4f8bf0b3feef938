use crate::aspects::types::AspectTable;
use crate::ephemeris::types::CelestialBody;
use crate::error::{ChartError, ChartResult};
use crate::houses::types::HouseSettings;
use crate::synastry::weights::WeightTable;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths tried by [`EngineConfig::discover`], relative to the working directory.
pub const SEARCH_PATHS: [&str; 2] = ["configs/aphrodite.toml", "../../configs/aphrodite.toml"];

/// Everything the engine needs besides a position provider.
///
/// `aspects` is required. `scoring` may be left out when only charts are
/// built; comparing charts needs it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_bodies")]
    pub bodies: Vec<CelestialBody>,
    #[serde(default)]
    pub houses: HouseSettings,
    pub aspects: AspectTable,
    #[serde(default)]
    pub scoring: Option<WeightTable>,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
}

/// `[ephemeris]`: where the Swiss Ephemeris data files live.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EphemerisSettings {
    /// Unset falls back to `$SWISS_EPHEMERIS_PATH`, then the system default.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_bodies() -> Vec<CelestialBody> {
    CelestialBody::TRADITIONAL.to_vec()
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> ChartResult<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ChartError::configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the first of [`SEARCH_PATHS`] that exists.
    pub fn discover() -> ChartResult<(PathBuf, Self)> {
        for candidate in SEARCH_PATHS {
            let path = PathBuf::from(candidate);
            if path.is_file() {
                let config = Self::from_file(&path)?;
                return Ok((path, config));
            }
        }
        Err(ChartError::configuration(format!(
            "Could not find aphrodite.toml in {:?}",
            SEARCH_PATHS
        )))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.bodies.is_empty() {
            return Err(ChartError::configuration("`bodies` must name at least one body"));
        }
        self.houses.validate()?;
        if let Some(scoring) = &self.scoring {
            scoring.validate(&self.aspects)?;
        }
        Ok(())
    }

    /// Weight table, or a configuration error when `[scoring]` is absent.
    pub fn require_scoring(&self) -> ChartResult<&WeightTable> {
        self.scoring
            .as_ref()
            .ok_or_else(|| ChartError::configuration("missing [scoring] section"))
    }
}
