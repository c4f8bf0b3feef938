//! Weight configuration for compatibility scoring.
//!
//! Nothing here has a default. The scorer only ever uses the table it is
//! handed.

use crate::aspects::types::{AspectKind, AspectTable};
use crate::ephemeris::types::CelestialBody;
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Coarse grouping of bodies for category-pair weight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyCategory {
    /// Sun, Moon
    Luminary,
    /// Mercury, Venus, Mars
    Personal,
    /// Jupiter, Saturn
    Social,
    /// Uranus, Neptune, Pluto
    Outer,
    /// Nodes, Chiron, Lilith
    Point,
}

impl BodyCategory {
    pub fn of(body: CelestialBody) -> Self {
        match body {
            CelestialBody::Sun | CelestialBody::Moon => BodyCategory::Luminary,
            CelestialBody::Mercury | CelestialBody::Venus | CelestialBody::Mars => {
                BodyCategory::Personal
            }
            CelestialBody::Jupiter | CelestialBody::Saturn => BodyCategory::Social,
            CelestialBody::Uranus | CelestialBody::Neptune | CelestialBody::Pluto => {
                BodyCategory::Outer
            }
            CelestialBody::NorthNode
            | CelestialBody::SouthNode
            | CelestialBody::Chiron
            | CelestialBody::Lilith => BodyCategory::Point,
        }
    }
}

/// What a weight rule matches. Pairs are unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSelector {
    Bodies(CelestialBody, CelestialBody),
    Categories(BodyCategory, BodyCategory),
}

impl PairSelector {
    pub fn matches(&self, a: CelestialBody, b: CelestialBody) -> bool {
        match *self {
            PairSelector::Bodies(x, y) => (x == a && y == b) || (x == b && y == a),
            PairSelector::Categories(x, y) => {
                let (ca, cb) = (BodyCategory::of(a), BodyCategory::of(b));
                (x == ca && y == cb) || (x == cb && y == ca)
            }
        }
    }
}

/// Weight override for one aspect kind and a body or category pair.
///
/// Exactly one of `bodies` and `categories` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRule {
    pub kind: AspectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodies: Option<[CelestialBody; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<[BodyCategory; 2]>,
    pub weight: f64,
}

impl WeightRule {
    pub fn selector(&self) -> ChartResult<PairSelector> {
        match (self.bodies, self.categories) {
            (Some([a, b]), None) => Ok(PairSelector::Bodies(a, b)),
            (None, Some([a, b])) => Ok(PairSelector::Categories(a, b)),
            _ => Err(ChartError::configuration(format!(
                "weight rule for {} needs exactly one of `bodies` or `categories`",
                self.kind
            ))),
        }
    }
}

/// How a pair qualifies for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Both bodies are in the block's set
    Both,
    /// At least one body is in the block's set
    Either,
}

/// A named sub-score over a subset of cross aspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRule {
    pub name: String,
    pub bodies: Vec<CelestialBody>,
    pub membership: Membership,
}

impl BlockRule {
    pub fn matches(&self, a: CelestialBody, b: CelestialBody) -> bool {
        let (has_a, has_b) = (self.bodies.contains(&a), self.bodies.contains(&b));
        match self.membership {
            Membership::Both => has_a && has_b,
            Membership::Either => has_a || has_b,
        }
    }
}

/// Baseline, per-kind weights, overrides and blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub baseline: f64,
    #[serde(deserialize_with = "deserialize_kind_map")]
    pub weights: BTreeMap<AspectKind, f64>,
    #[serde(default)]
    pub rules: Vec<WeightRule>,
    #[serde(default)]
    pub blocks: Vec<BlockRule>,
}

impl WeightTable {
    /// Check the table is complete for `aspects`: every kind that can be
    /// detected has a base weight, every number is finite, every rule has a
    /// single selector and block names are unique.
    pub fn validate(&self, aspects: &AspectTable) -> ChartResult<()> {
        if !self.baseline.is_finite() {
            return Err(ChartError::configuration("scoring baseline must be finite"));
        }
        for (kind, weight) in &self.weights {
            if !weight.is_finite() {
                return Err(ChartError::configuration(format!(
                    "weight for {kind} must be finite"
                )));
            }
        }
        for kind in aspects.kinds() {
            if !self.weights.contains_key(&kind) {
                return Err(ChartError::configuration(format!(
                    "no scoring weight configured for {kind}"
                )));
            }
        }
        for rule in &self.rules {
            rule.selector()?;
            if !rule.weight.is_finite() {
                return Err(ChartError::configuration(format!(
                    "rule weight for {} must be finite",
                    rule.kind
                )));
            }
        }
        let mut names = BTreeSet::new();
        for block in &self.blocks {
            if block.name.trim().is_empty() || block.bodies.is_empty() {
                return Err(ChartError::configuration(
                    "score blocks need a name and at least one body",
                ));
            }
            if !names.insert(block.name.as_str()) {
                return Err(ChartError::configuration(format!(
                    "score block {} configured twice",
                    block.name
                )));
            }
        }
        Ok(())
    }

    /// Weight for an aspect of `kind` between `a` and `b`.
    ///
    /// Body-pair rules beat category-pair rules, which beat the kind's base
    /// weight. The first matching rule of a tier wins.
    pub fn weight_for(
        &self,
        kind: AspectKind,
        a: CelestialBody,
        b: CelestialBody,
    ) -> ChartResult<f64> {
        let mut category_match = None;
        for rule in self.rules.iter().filter(|r| r.kind == kind) {
            match rule.selector()? {
                selector @ PairSelector::Bodies(..) if selector.matches(a, b) => {
                    return Ok(rule.weight);
                }
                selector @ PairSelector::Categories(..)
                    if category_match.is_none() && selector.matches(a, b) =>
                {
                    category_match = Some(rule.weight);
                }
                _ => {}
            }
        }
        if let Some(weight) = category_match {
            return Ok(weight);
        }
        self.weights.get(&kind).copied().ok_or_else(|| {
            ChartError::configuration(format!("no scoring weight configured for {kind}"))
        })
    }
}

fn deserialize_kind_map<'de, D>(deserializer: D) -> Result<BTreeMap<AspectKind, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, weight)| {
            key.parse::<AspectKind>()
                .map(|kind| (kind, weight))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
