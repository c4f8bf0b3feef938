//! Request and response bodies that are not engine types.

use aphrodite::chart::{BirthData, ChartId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One side of a comparison: a previously built chart or fresh birth data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartInput {
    Stored { chart_id: ChartId },
    Birth(BirthData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub first: ChartInput,
    pub second: ChartInput,
}
