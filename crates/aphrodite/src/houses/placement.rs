use crate::geometry::arc_span;
use crate::houses::types::HouseCusps;

/// House (1..=12) whose arc contains `longitude`.
///
/// Arcs are half-open, `[cusp_n, cusp_n+1)`, measured circularly, so a
/// longitude sitting exactly on a cusp belongs to the house that cusp opens.
/// Offsets are taken relative to the first cusp, which keeps the wrap at
/// 0° out of the comparison.
pub fn assign_house(longitude: f64, cusps: &HouseCusps) -> u8 {
    let origin = cusps.ascendant();
    let offset = arc_span(origin, longitude);

    cusps
        .iter()
        .rev()
        .find(|c| arc_span(origin, c.lon) <= offset)
        .map(|c| c.house)
        .unwrap_or(1)
}
