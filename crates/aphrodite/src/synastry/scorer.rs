//! Cross-chart aspect scoring.
//!
//! `score = clamp(baseline + Σ polarity × weight × strength, 0, 100)` where
//! `strength = 1 − deviation / orb`. Named blocks are reported alongside and
//! do not feed the aggregate.

use crate::aspects::calculator::AspectCalculator;
use crate::aspects::types::{Aspect, AspectKind, AspectTable};
use crate::chart::birth::ChartId;
use crate::chart::natal::NatalChart;
use crate::error::ChartResult;
use crate::synastry::weights::WeightTable;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;
const NEUTRAL_BLOCK: f64 = 50.0;

/// One cross aspect with its share of the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredAspect {
    #[serde(flatten)]
    pub aspect: Aspect,
    pub weight: f64,
    pub strength: f64,
    /// polarity × weight × strength
    pub contribution: f64,
}

/// Per-kind subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct KindTally {
    pub count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityResult {
    pub first: ChartId,
    pub second: ChartId,
    pub aspects: Vec<ScoredAspect>,
    pub by_kind: BTreeMap<AspectKind, KindTally>,
    pub blocks: BTreeMap<String, f64>,
    pub baseline: f64,
    /// Sum of all contributions before the baseline and clamp
    pub raw_total: f64,
    /// Aggregate in [0, 100]
    pub score: f64,
}

/// Scores pairs of charts against one aspect table and one weight table.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: WeightTable,
    aspects: AspectTable,
}

impl CompatibilityScorer {
    /// Fails with a configuration error when `weights` does not cover `aspects`.
    pub fn new(weights: WeightTable, aspects: AspectTable) -> ChartResult<Self> {
        weights.validate(&aspects)?;
        Ok(Self { weights, aspects })
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn compare(&self, first: &NatalChart, second: &NatalChart) -> ChartResult<CompatibilityResult> {
        compare(first, second, &self.weights, &self.aspects)
    }
}

/// Score `first` against `second`.
///
/// Deterministic: the same charts and tables always give the same result.
pub fn compare(
    first: &NatalChart,
    second: &NatalChart,
    weights: &WeightTable,
    aspects: &AspectTable,
) -> ChartResult<CompatibilityResult> {
    let cross = AspectCalculator::new(aspects).compute_cross(&first.positions(), &second.positions());
    debug!(
        "Scoring {} against {}: {} cross aspects",
        first.id(),
        second.id(),
        cross.len()
    );

    let mut scored = Vec::with_capacity(cross.len());
    let mut by_kind: BTreeMap<AspectKind, KindTally> = BTreeMap::new();
    let mut raw_total = 0.0;

    for aspect in cross {
        let weight = weights.weight_for(aspect.kind, aspect.first, aspect.second)?;
        let strength = aspect.exactness();
        let contribution = aspect.kind.polarity() * weight * strength;

        let tally = by_kind.entry(aspect.kind).or_default();
        tally.count += 1;
        tally.total += contribution;
        raw_total += contribution;

        scored.push(ScoredAspect {
            aspect,
            weight,
            strength,
            contribution,
        });
    }

    let blocks = weights
        .blocks
        .iter()
        .map(|block| {
            let signed: Vec<f64> = scored
                .iter()
                .filter(|s| block.matches(s.aspect.first, s.aspect.second))
                .map(|s| s.aspect.kind.polarity() * s.strength)
                .collect();
            (block.name.clone(), block_score(&signed))
        })
        .collect();

    let score = (weights.baseline + raw_total).clamp(SCORE_MIN, SCORE_MAX);
    debug!("Compatibility score {score:.2} (raw {raw_total:.4})");

    Ok(CompatibilityResult {
        first: first.id().clone(),
        second: second.id().clone(),
        aspects: scored,
        by_kind,
        blocks,
        baseline: weights.baseline,
        raw_total,
        score,
    })
}

/// `50 × (1 + mean)`, clamped; 50 for an empty block.
fn block_score(signed_strengths: &[f64]) -> f64 {
    if signed_strengths.is_empty() {
        return NEUTRAL_BLOCK;
    }
    let mean = signed_strengths.iter().sum::<f64>() / signed_strengths.len() as f64;
    (NEUTRAL_BLOCK * (1.0 + mean)).clamp(SCORE_MIN, SCORE_MAX)
}
