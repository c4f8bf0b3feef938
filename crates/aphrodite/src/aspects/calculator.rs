use crate::aspects::types::{Aspect, AspectKind, AspectTable, Motion};
use crate::ephemeris::provider::PositionSet;
use crate::ephemeris::types::BodyPosition;
use crate::geometry::{separation, signed_delta};

/// Aspect calculator over one orb table.
pub struct AspectCalculator<'a> {
    table: &'a AspectTable,
}

impl<'a> AspectCalculator<'a> {
    pub fn new(table: &'a AspectTable) -> Self {
        Self { table }
    }

    /// Aspects among the bodies of one chart: every unordered pair once,
    /// in body order.
    pub fn compute_intra(&self, positions: &PositionSet) -> Vec<Aspect> {
        let bodies: Vec<&BodyPosition> = positions.values().collect();

        let mut aspects = Vec::new();
        for (i, first) in bodies.iter().enumerate() {
            for second in &bodies[i + 1..] {
                if let Some(aspect) = self.calculate_aspect(first, second) {
                    aspects.push(aspect);
                }
            }
        }
        aspects
    }

    /// Aspects between two charts: the full cartesian product, including a
    /// body against its own counterpart in the other chart.
    pub fn compute_cross(&self, first: &PositionSet, second: &PositionSet) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for a in first.values() {
            for b in second.values() {
                if let Some(aspect) = self.calculate_aspect(a, b) {
                    aspects.push(aspect);
                }
            }
        }
        aspects
    }

    /// Best-matching aspect for one pair, if any kind is within its orb.
    ///
    /// The smallest deviation wins; equal deviations go to the lower-ranked
    /// kind.
    pub fn calculate_aspect(&self, a: &BodyPosition, b: &BodyPosition) -> Option<Aspect> {
        let sep = separation(a.lon, b.lon);

        let mut best: Option<(AspectKind, f64, f64)> = None;
        for rule in self.table.rules() {
            let deviation = (sep - rule.kind.angle()).abs();
            if deviation > rule.orb {
                continue;
            }
            let better = match best {
                None => true,
                Some((kind, best_dev, _)) => {
                    deviation < best_dev
                        || (deviation == best_dev && rule.kind.rank() < kind.rank())
                }
            };
            if better {
                best = Some((rule.kind, deviation, rule.orb));
            }
        }

        best.map(|(kind, deviation, orb)| Aspect {
            first: a.body,
            second: b.body,
            kind,
            separation: sep,
            deviation,
            orb,
            motion: motion(a, b, sep, kind),
        })
    }
}

/// Applying when the deviation from the exact angle is shrinking.
///
/// An exact aspect, or a pair with no relative motion, counts as separating.
fn motion(a: &BodyPosition, b: &BodyPosition, sep: f64, kind: AspectKind) -> Option<Motion> {
    let relative = a.speed_lon? - b.speed_lon?;

    let signed = signed_delta(a.lon, b.lon);
    // rate of change of the shortest arc
    let sep_rate = if signed == 0.0 {
        relative.abs()
    } else if signed == 180.0 {
        -relative.abs()
    } else {
        signed.signum() * relative
    };

    let offset = sep - kind.angle();
    let deviation_rate = if offset == 0.0 {
        0.0
    } else {
        offset.signum() * sep_rate
    };

    Some(if deviation_rate < 0.0 {
        Motion::Applying
    } else {
        Motion::Separating
    })
}

/// Detect aspects within `first`, or between `first` and `second` when given.
pub fn detect_aspects(
    first: &PositionSet,
    second: Option<&PositionSet>,
    table: &AspectTable,
) -> Vec<Aspect> {
    let calculator = AspectCalculator::new(table);
    match second {
        Some(other) => calculator.compute_cross(first, other),
        None => calculator.compute_intra(first),
    }
}
