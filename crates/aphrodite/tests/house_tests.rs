mod common;

use aphrodite::geometry::arc_span;
use aphrodite::houses::{assign_house, compute_cusps, HouseCusps, HouseSettings};
use aphrodite::{ChartError, GeometryFault};
use common::OBLIQUITY;
use proptest::prelude::*;

fn total_span(cusps: &HouseCusps) -> f64 {
    (1..=12u8).map(|h| cusps.span(h).unwrap()).sum()
}

#[test]
fn test_london_cusps_in_circular_order() {
    let cusps = compute_cusps(210.0, 51.5074, OBLIQUITY, &HouseSettings::default()).unwrap();
    let mut offset = 0.0;
    for house in 2..=12u8 {
        let next = arc_span(cusps.cusp(1).unwrap(), cusps.cusp(house).unwrap());
        assert!(next > offset, "cusp {house} not after cusp {}", house - 1);
        offset = next;
    }
    assert!((total_span(&cusps) - 360.0).abs() < 1e-9);
}

#[test]
fn test_angles_are_house_cusps() {
    let cusps = compute_cusps(75.0, -37.8, OBLIQUITY, &HouseSettings::default()).unwrap();
    assert_eq!(assign_house(cusps.ascendant(), &cusps), 1);
    assert_eq!(assign_house(cusps.midheaven(), &cusps), 10);
    assert_eq!(assign_house(cusps.cusp(7).unwrap(), &cusps), 7);
    assert_eq!(assign_house(cusps.cusp(4).unwrap(), &cusps), 4);
}

#[test]
fn test_polar_latitude_rejected_before_iteration() {
    // a cap of one iteration would otherwise fail as non-convergent
    let settings = HouseSettings {
        max_iterations: 1,
        tolerance_deg: 1e-12,
        ..HouseSettings::default()
    };
    let err = compute_cusps(0.0, 90.0, OBLIQUITY, &settings).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Geometry {
            fault: GeometryFault::UndefinedLatitude { .. },
            ..
        }
    ));
    let err = compute_cusps(0.0, -90.5, OBLIQUITY, &settings).unwrap_err();
    assert!(matches!(err, ChartError::Validation { .. }));
}

#[test]
fn test_latitude_89_9_converges_or_fails_with_geometry() {
    let settings = HouseSettings::default();
    for step in 0..36 {
        let ramc = step as f64 * 10.0;
        match compute_cusps(ramc, 89.9, OBLIQUITY, &settings) {
            Ok(cusps) => assert!((total_span(&cusps) - 360.0).abs() < 1e-9),
            Err(err) => assert!(matches!(err, ChartError::Geometry { .. }), "{err}"),
        }
        assert_eq!(
            compute_cusps(ramc, 89.9, OBLIQUITY, &settings),
            compute_cusps(ramc, 89.9, OBLIQUITY, &settings)
        );
    }
}

#[test]
fn test_arctic_circle_fails_with_geometry() {
    // part of the ecliptic never rises above 70°N, so some cusps do not exist
    let failures = (0..36)
        .map(|step| compute_cusps(step as f64 * 10.0, 70.0, OBLIQUITY, &HouseSettings::default()))
        .filter(|r| r.is_err())
        .inspect(|r| assert!(matches!(r, Err(ChartError::Geometry { .. }))))
        .count();
    assert!(failures > 0);
}

proptest! {
    #[test]
    fn prop_cusps_partition_circle(ramc in 0.0f64..360.0, lat in -60.0f64..60.0) {
        let cusps = compute_cusps(ramc, lat, OBLIQUITY, &HouseSettings::default()).unwrap();
        prop_assert!((total_span(&cusps) - 360.0).abs() < 1e-9);
        for house in 1..=12u8 {
            prop_assert!(cusps.span(house).unwrap() > 0.0);
        }
    }

    #[test]
    fn prop_every_longitude_in_exactly_one_house(
        ramc in 0.0f64..360.0,
        lat in -60.0f64..60.0,
        lon in 0.0f64..360.0,
    ) {
        let cusps = compute_cusps(ramc, lat, OBLIQUITY, &HouseSettings::default()).unwrap();
        let house = assign_house(lon, &cusps);
        prop_assert!((1..=12).contains(&house));

        let containing: Vec<u8> = (1..=12u8)
            .filter(|&h| arc_span(cusps.cusp(h).unwrap(), lon) < cusps.span(h).unwrap())
            .collect();
        prop_assert_eq!(containing, vec![house]);
    }

    #[test]
    fn prop_cusp_longitude_opens_its_house(ramc in 0.0f64..360.0, lat in -60.0f64..60.0) {
        let cusps = compute_cusps(ramc, lat, OBLIQUITY, &HouseSettings::default()).unwrap();
        for house in 1..=12u8 {
            prop_assert_eq!(assign_house(cusps.cusp(house).unwrap(), &cusps), house);
        }
    }
}
