//! Every scenario spells out the weight table it scores with.

mod common;

use aphrodite::aspects::{AspectKind, AspectTable};
use aphrodite::chart::{ChartAssembler, NatalChart};
use aphrodite::ephemeris::{BodyPosition, CelestialBody};
use aphrodite::houses::HouseSettings;
use aphrodite::synastry::{compare, CompatibilityScorer, WeightTable};
use aphrodite::ChartError;
use common::{at, instant, FixedProvider};

fn chart(positions: Vec<BodyPosition>, latitude: f64) -> NatalChart {
    let bodies = positions.iter().map(|p| p.body).collect();
    ChartAssembler::new(
        FixedProvider::new(positions, 200.0),
        bodies,
        HouseSettings::default(),
        AspectTable::classical(),
    )
    .unwrap()
    .build_chart(instant(), latitude, 0.0)
    .unwrap()
}

fn weights(toml_text: &str) -> WeightTable {
    toml::from_str(toml_text).unwrap()
}

const FLAT: &str = r#"
    baseline = 50.0
    [weights]
    conjunction = 6.0
    opposition = 6.0
    trine = 10.0
    square = 8.0
    sextile = 4.0
"#;

#[test]
fn test_exact_trine_adds_full_weight() {
    // baseline 50; conjunction 6, opposition 6, trine 10, square 8, sextile 4
    let table = weights(FLAT);
    let a = chart(vec![at(CelestialBody::Sun, 0.0)], 40.0);
    let b = chart(vec![at(CelestialBody::Moon, 120.0)], 41.0);

    let result = compare(&a, &b, &table, &AspectTable::classical()).unwrap();
    assert_eq!(result.aspects.len(), 1);
    let scored = &result.aspects[0];
    assert_eq!(scored.aspect.kind, AspectKind::Trine);
    assert_eq!(scored.weight, 10.0);
    assert_eq!(scored.strength, 1.0);
    assert_eq!(scored.contribution, 10.0);
    assert_eq!(result.raw_total, 10.0);
    assert_eq!(result.score, 60.0);
    assert_eq!(result.by_kind[&AspectKind::Trine].count, 1);
    assert_eq!(result.first, *a.id());
    assert_eq!(result.second, *b.id());
}

#[test]
fn test_square_scaled_by_exactness() {
    // baseline 50; conjunction 6, opposition 6, trine 10, square 8, sextile 4
    // Mars 0 / Venus 93: square 3° off a 6° orb, strength 0.5
    let table = weights(FLAT);
    let a = chart(vec![at(CelestialBody::Mars, 0.0)], 40.0);
    let b = chart(vec![at(CelestialBody::Venus, 93.0)], 41.0);

    let result = compare(&a, &b, &table, &AspectTable::classical()).unwrap();
    let scored = &result.aspects[0];
    assert_eq!(scored.aspect.kind, AspectKind::Square);
    assert!((scored.strength - 0.5).abs() < 1e-12);
    assert!((scored.contribution + 4.0).abs() < 1e-12);
    assert!((result.score - 46.0).abs() < 1e-12);
}

#[test]
fn test_pair_rule_beats_category_rule_beats_base() {
    // baseline 50; trine 10, others as FLAT
    // trine sun-moon 20; trine luminary-outer 2
    let table = weights(
        r#"
        baseline = 50.0
        [weights]
        conjunction = 6.0
        opposition = 6.0
        trine = 10.0
        square = 8.0
        sextile = 4.0

        [[rules]]
        kind = "trine"
        categories = ["luminary", "outer"]
        weight = 2.0

        [[rules]]
        kind = "trine"
        bodies = ["moon", "sun"]
        weight = 20.0
        "#,
    );
    let aspects = AspectTable::classical();

    let a = chart(vec![at(CelestialBody::Sun, 0.0)], 40.0);
    let moon = chart(vec![at(CelestialBody::Moon, 240.0)], 41.0);
    let pluto = chart(vec![at(CelestialBody::Pluto, 240.0)], 42.0);
    let venus = chart(vec![at(CelestialBody::Venus, 240.0)], 43.0);

    assert_eq!(compare(&a, &moon, &table, &aspects).unwrap().score, 70.0);
    assert_eq!(compare(&a, &pluto, &table, &aspects).unwrap().score, 52.0);
    assert_eq!(compare(&a, &venus, &table, &aspects).unwrap().score, 60.0);
}

#[test]
fn test_score_is_clamped() {
    // baseline 95; trine 10, square 8 and the rest as FLAT
    let high = weights(&FLAT.replace("baseline = 50.0", "baseline = 95.0"));
    // baseline 3; as FLAT otherwise
    let low = weights(&FLAT.replace("baseline = 50.0", "baseline = 3.0"));
    let aspects = AspectTable::classical();

    let a = chart(vec![at(CelestialBody::Sun, 0.0)], 40.0);
    let trine = chart(vec![at(CelestialBody::Moon, 120.0)], 41.0);
    let square = chart(vec![at(CelestialBody::Moon, 90.0)], 42.0);

    let result = compare(&a, &trine, &high, &aspects).unwrap();
    assert_eq!(result.raw_total, 10.0);
    assert_eq!(result.score, 100.0);
    assert_eq!(compare(&a, &square, &low, &aspects).unwrap().score, 0.0);
}

#[test]
fn test_no_aspects_scores_baseline() {
    // baseline 50; as FLAT
    let table = weights(FLAT);
    let a = chart(vec![at(CelestialBody::Sun, 0.0)], 40.0);
    let b = chart(vec![at(CelestialBody::Moon, 40.0)], 41.0);
    let result = compare(&a, &b, &table, &AspectTable::classical()).unwrap();
    assert!(result.aspects.is_empty());
    assert!(result.by_kind.is_empty());
    assert_eq!(result.score, 50.0);
}

#[test]
fn test_same_body_pairs_are_scored() {
    // baseline 50; conjunction 6 and the rest as FLAT
    let table = weights(FLAT);
    let a = chart(vec![at(CelestialBody::Venus, 10.0)], 40.0);
    let b = chart(vec![at(CelestialBody::Venus, 10.0)], 41.0);
    let result = compare(&a, &b, &table, &AspectTable::classical()).unwrap();
    assert_eq!(result.aspects.len(), 1);
    assert_eq!(result.aspects[0].aspect.kind, AspectKind::Conjunction);
    assert_eq!(result.score, 56.0);
}

#[test]
fn test_blocks_do_not_move_aggregate() {
    // baseline 50; as FLAT; blocks romantic(venus, mars: both),
    // stability(saturn: either), mental(mercury: either)
    let table = weights(&format!(
        "{FLAT}
        [[blocks]]
        name = \"romantic\"
        bodies = [\"venus\", \"mars\"]
        membership = \"both\"

        [[blocks]]
        name = \"stability\"
        bodies = [\"saturn\"]
        membership = \"either\"

        [[blocks]]
        name = \"mental\"
        bodies = [\"mercury\"]
        membership = \"either\"
        "
    ));
    let without_blocks = weights(FLAT);
    let aspects = AspectTable::classical();

    let a = chart(
        vec![at(CelestialBody::Venus, 0.0), at(CelestialBody::Saturn, 200.0)],
        40.0,
    );
    let b = chart(
        vec![at(CelestialBody::Mars, 120.0), at(CelestialBody::Sun, 290.0)],
        41.0,
    );

    let result = compare(&a, &b, &table, &aspects).unwrap();
    // venus-mars exact trine (+1), saturn-sun exact square (-1); the other pairs are out of orb
    assert_eq!(result.blocks["romantic"], 100.0);
    assert_eq!(result.blocks["stability"], 0.0);
    assert_eq!(result.blocks["mental"], 50.0);

    let plain = compare(&a, &b, &without_blocks, &aspects).unwrap();
    assert_eq!(result.score, plain.score);
    assert!(plain.blocks.is_empty());
}

#[test]
fn test_compare_is_deterministic() {
    // baseline 50; as FLAT
    let scorer = CompatibilityScorer::new(weights(FLAT), AspectTable::classical()).unwrap();
    let a = chart(
        vec![
            at(CelestialBody::Sun, 12.5),
            at(CelestialBody::Moon, 133.0),
            at(CelestialBody::Venus, 77.7),
        ],
        40.0,
    );
    let b = chart(
        vec![
            at(CelestialBody::Sun, 250.1),
            at(CelestialBody::Mars, 15.0),
            at(CelestialBody::Jupiter, 190.0),
        ],
        -20.0,
    );
    let first = scorer.compare(&a, &b).unwrap();
    let second = scorer.compare(&a, &b).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_scorer_rejects_incomplete_weights() {
    // baseline 50; trine 10 only, while the orb table has all five majors
    let table = weights("baseline = 50.0\n[weights]\ntrine = 10.0\n");
    let err = CompatibilityScorer::new(table, AspectTable::classical()).unwrap_err();
    assert!(matches!(err, ChartError::Configuration { .. }));
}
