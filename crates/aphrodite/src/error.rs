//! Error types shared by every stage of chart computation.
//!
//! Each stage fails fast with one of four kinds and the caller sees the kind
//! unchanged. Nothing in this crate substitutes a default value for a failed
//! computation.

use serde::Serialize;
use thiserror::Error;

/// Result type for chart computations
pub type ChartResult<T> = Result<T, ChartError>;

/// Why the house calculator refused to produce cusps.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryFault {
    /// Placidus houses do not exist at this latitude (poles, circumpolar ecliptic).
    #[error("undefined at latitude {latitude}")]
    UndefinedLatitude { latitude: f64 },
    /// The semi-arc iteration for `house` did not settle within the iteration cap.
    #[error("cusp {house} did not converge after {iterations} iterations")]
    NonConvergent { house: u8, iterations: u32 },
    /// The computed cusps do not partition the ecliptic in circular order.
    #[error("cusps out of circular order")]
    Disordered,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Ephemeris data unavailable or out of range for the requested instant.
    #[error("Position provider error: {message}")]
    Provider { message: String },

    /// House system undefined for the input, or the root-find failed.
    #[error("Geometry error ({fault}): {message}")]
    Geometry { fault: GeometryFault, message: String },

    /// Aspect or weight table missing required entries, or malformed config.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Malformed birth data.
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Stable category of a [`ChartError`], used by transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Provider,
    Geometry,
    Configuration,
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Provider => "provider",
            ErrorKind::Geometry => "geometry",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
        }
    }
}

impl ChartError {
    pub fn provider(message: impl Into<String>) -> Self {
        ChartError::Provider {
            message: message.into(),
        }
    }

    pub fn geometry(fault: GeometryFault, message: impl Into<String>) -> Self {
        ChartError::Geometry {
            fault,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ChartError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ChartError::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChartError::Provider { .. } => ErrorKind::Provider,
            ChartError::Geometry { .. } => ErrorKind::Geometry,
            ChartError::Configuration { .. } => ErrorKind::Configuration,
            ChartError::Validation { .. } => ErrorKind::Validation,
        }
    }
}

impl From<toml::de::Error> for ChartError {
    fn from(err: toml::de::Error) -> Self {
        ChartError::configuration(format!("Failed to parse config: {err}"))
    }
}
