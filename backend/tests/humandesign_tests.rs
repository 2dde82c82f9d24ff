//! End-to-end Human Design calculation against the fixture ephemeris.

mod support;

use approx::assert_abs_diff_eq;
use serde_json::json;
use std::collections::BTreeSet;

use cartographer::ephemeris::Ephemeris;
use cartographer::humandesign::{
    calculate_human_design, Bodygraph, Center, DignityResult, DignityState, DignityTable,
    GatePosition, HdPlanet, HumanDesignChart, HumanDesignError, Imprint, Side,
};
use cartographer::models::{angular_distance, ResolveError, ValidationError};

fn chart() -> HumanDesignChart {
    calculate_human_design(
        &support::fixture_ephemeris(),
        &support::dignities(),
        &support::fixture_birth(),
    )
    .unwrap()
}

#[test]
fn test_activations_follow_the_gate_wheel() {
    let chart = chart();
    for side in [Side::Personality, Side::Design] {
        let activations = chart.side(side);
        assert_eq!(activations.activations.len(), HdPlanet::ORDER.len());
        for activation in &activations.activations {
            let expected = GatePosition::from_longitude(activation.longitude);
            assert_eq!(activation.position, expected, "{:?}", activation.planet);
        }
    }
}

#[test]
fn test_earth_opposes_sun_and_south_node_opposes_north() {
    let chart = chart();
    for side in [Side::Personality, Side::Design] {
        let a = chart.side(side);
        let sun = a.get(HdPlanet::Sun).unwrap().longitude;
        let earth = a.get(HdPlanet::Earth).unwrap().longitude;
        assert_abs_diff_eq!(angular_distance(sun, earth), 180.0, epsilon = 1e-9);

        let north = a.get(HdPlanet::NorthNode).unwrap().longitude;
        let south = a.get(HdPlanet::SouthNode).unwrap().longitude;
        assert_abs_diff_eq!(angular_distance(north, south), 180.0, epsilon = 1e-9);
    }
}

#[test]
fn test_design_sun_is_88_degrees_before_birth() {
    let chart = chart();
    let personality_sun = chart.personality.get(HdPlanet::Sun).unwrap().longitude;
    let design_sun = chart.design.get(HdPlanet::Sun).unwrap().longitude;
    assert_abs_diff_eq!(
        angular_distance(personality_sun, design_sun),
        88.0,
        epsilon = 1e-6
    );
    assert!(chart.design.moment < chart.personality.moment);

    // Cross-check against the ephemeris directly
    let eph = support::fixture_ephemeris();
    let at_design = eph
        .position(cartographer::ephemeris::Body::Sun, chart.design.julian_day)
        .unwrap();
    assert_abs_diff_eq!(at_design.longitude, design_sun, epsilon = 1e-9);
}

#[test]
fn test_centers_partition_and_match_channels() {
    let chart = chart();
    let defined: BTreeSet<Center> = chart.defined_centers.iter().copied().collect();
    let undefined: BTreeSet<Center> = chart.undefined_centers.iter().copied().collect();
    assert!(defined.is_disjoint(&undefined));
    assert_eq!(defined.len() + undefined.len(), Center::ALL.len());

    let graph = Bodygraph::from_gates(chart.active_gates.iter().map(|g| g.gate));
    assert_eq!(graph.defined_centers(), &defined);
    assert_eq!(graph.channels().len(), chart.channels.len());
    assert_eq!(graph.hd_type(), chart.hd_type);
    assert_eq!(graph.authority(), chart.authority);

    for channel in &chart.channels {
        for gate in channel.gates {
            assert!(chart.gate_imprint(gate).is_some());
        }
        for center in channel.centers {
            assert!(chart.is_center_defined(center));
        }
    }
}

#[test]
fn test_profile_and_cross_come_from_the_suns() {
    let chart = chart();
    let p_sun = chart.personality.get(HdPlanet::Sun).unwrap();
    let p_earth = chart.personality.get(HdPlanet::Earth).unwrap();
    let d_sun = chart.design.get(HdPlanet::Sun).unwrap();
    let d_earth = chart.design.get(HdPlanet::Earth).unwrap();

    assert_eq!(
        chart.profile.label,
        format!("{}/{}", p_sun.line(), d_sun.line())
    );
    assert_eq!(
        chart.incarnation_cross.gates,
        [p_sun.gate(), p_earth.gate(), d_sun.gate(), d_earth.gate()]
    );
}

#[test]
fn test_strategy_fields_match_type() {
    let chart = chart();
    assert_eq!(chart.strategy, chart.hd_type.strategy());
    assert_eq!(chart.signature, chart.hd_type.signature());
    assert_eq!(chart.not_self_theme, chart.hd_type.not_self_theme());
}

#[test]
fn test_calculation_is_deterministic() {
    assert_eq!(chart(), chart());
}

fn two_sided_chart() -> HumanDesignChart {
    calculate_human_design(
        &support::two_sided_ephemeris(),
        &support::dignities(),
        &support::fixture_birth(),
    )
    .unwrap()
}

fn dignity(chart: &HumanDesignChart, side: Side, planet: HdPlanet) -> DignityResult {
    chart.side(side).get(planet).unwrap().dignity.clone()
}

#[test]
fn test_two_sided_fixture_places_activations() {
    let chart = two_sided_chart();
    let label = |side: Side, planet: HdPlanet| chart.side(side).get(planet).unwrap().position.label();
    assert_eq!(label(Side::Personality, HdPlanet::Sun), "41.2");
    assert_eq!(label(Side::Design, HdPlanet::Sun), "28.4");
    assert_eq!(label(Side::Personality, HdPlanet::Venus), "8.3");
    assert_eq!(label(Side::Design, HdPlanet::Moon), "8.5");
    assert_eq!(label(Side::Personality, HdPlanet::Mercury), "14.2");
    assert_eq!(label(Side::Design, HdPlanet::Uranus), "15.1");
    assert_eq!(label(Side::Design, HdPlanet::Mars), "1.1");
    assert_eq!(label(Side::Design, HdPlanet::Jupiter), "2.1");
}

#[test]
fn test_harmonic_partner_on_same_side_wins() {
    let chart = two_sided_chart();

    // Personality gate 8 holds Venus; the Design Moon there is ignored
    let mars = dignity(&chart, Side::Personality, HdPlanet::Mars);
    assert_eq!(mars.state, DignityState::Juxtaposed);
    assert_eq!(mars.details, "Double fixing (opposite polarities)");
    assert_eq!(mars.active_trigger.as_deref(), Some("Mars"));
    assert_eq!(mars.harmonic_trigger.as_deref(), Some("Venus"));

    // Design gate 8 holds the Moon, which does not fix 1.1
    let mars = dignity(&chart, Side::Design, HdPlanet::Mars);
    assert_eq!(mars.state, DignityState::Detriment);
    assert_eq!(mars.details, "Detriment via active planet");
    assert_eq!(mars.harmonic_trigger, None);
}

#[test]
fn test_harmonic_exaltation_and_detriment() {
    let chart = two_sided_chart();

    let mercury = dignity(&chart, Side::Personality, HdPlanet::Mercury);
    assert_eq!(mercury.state, DignityState::Exalted);
    assert_eq!(mercury.details, "Exalted via harmonic planet");
    assert_eq!(mercury.active_trigger.as_deref(), Some("Jupiter"));

    let moon = dignity(&chart, Side::Design, HdPlanet::Moon);
    assert_eq!(moon.state, DignityState::Detriment);
    assert_eq!(moon.details, "Detriment via harmonic planet");
    assert_eq!(moon.active_trigger.as_deref(), Some("Mars"));

    let venus = dignity(&chart, Side::Personality, HdPlanet::Venus);
    assert_eq!(venus.state, DignityState::Neutral);
    assert_eq!(venus.details, "No polarity line");
}

#[test]
fn test_harmonic_falls_back_to_other_side() {
    let chart = two_sided_chart();

    // Mercury activates gate 14 on the Personality side only
    for side in [Side::Personality, Side::Design] {
        let jupiter = dignity(&chart, side, HdPlanet::Jupiter);
        assert_eq!(jupiter.state, DignityState::Juxtaposed, "{:?}", side);
        assert_eq!(jupiter.harmonic_trigger.as_deref(), Some("Mercury"));
    }

    // Uranus activates gate 15 on the Design side only
    let saturn = dignity(&chart, Side::Personality, HdPlanet::Saturn);
    assert_eq!(saturn.state, DignityState::Juxtaposed);
    assert_eq!(saturn.details, "Star glyph via harmonic planet");
    assert_eq!(saturn.harmonic_trigger.as_deref(), Some("Uranus"));

    let uranus = dignity(&chart, Side::Design, HdPlanet::Uranus);
    assert_eq!(uranus.details, "No dignity data for this gate.line");
}

#[test]
fn test_gate_imprints_by_side() {
    let chart = two_sided_chart();
    assert_eq!(chart.gate_imprint(5), Some(Imprint::Personality));
    assert_eq!(chart.gate_imprint(15), Some(Imprint::Design));
    assert_eq!(chart.gate_imprint(8), Some(Imprint::Both));
    assert_eq!(chart.gate_imprint(1), Some(Imprint::Both));
    assert_eq!(chart.gate_imprint(30), None);
}

#[test]
fn test_channel_imprint_mixes_sides() {
    let chart = two_sided_chart();
    let keys: BTreeSet<&str> = chart.channels.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(
        keys,
        ["1-8", "2-14", "3-60", "5-15"].into_iter().collect::<BTreeSet<_>>()
    );

    // One gate from each side
    assert_eq!(chart.channel_imprint(5, 15), Some(Imprint::Both));
    // Both gates from the Personality side only
    assert_eq!(chart.channel_imprint(3, 60), Some(Imprint::Personality));
    // One gate shared, the other Personality only
    assert_eq!(chart.channel_imprint(2, 14), Some(Imprint::Both));
    assert_eq!(chart.channel_imprint(1, 8), Some(Imprint::Both));
}

#[test]
fn test_complete_table_from_file() {
    let mut gates = serde_json::Map::new();
    for gate in 1..=64u8 {
        let mut lines = serde_json::Map::new();
        for line in 1..=6u8 {
            let entry = if line == 6 {
                json!({"no_polarity": true})
            } else {
                json!({"exaltation_planets": ["Sun"], "detriment_planets": ["Moon"]})
            };
            lines.insert(line.to_string(), entry);
        }
        gates.insert(gate.to_string(), serde_json::Value::Object(lines));
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dignities.json");
    std::fs::write(&path, serde_json::Value::Object(gates).to_string()).unwrap();

    let table = DignityTable::from_file(&path).unwrap();
    assert_eq!(table.len(), 384);
    assert!(table.missing_lines().is_empty());
    assert_eq!(table.evaluate(2, 1, "Sun", None).state, DignityState::Exalted);
    assert_eq!(table.evaluate(64, 3, "Moon", None).state, DignityState::Detriment);
    assert_eq!(table.evaluate(37, 6, "Sun", None).details, "No polarity line");
}

#[test]
fn test_partial_table_reports_missing_lines() {
    let missing = support::dignities().missing_lines();
    assert_eq!(missing.len(), 384 - 7);
    assert!(!missing.contains(&(14, 2)));
    assert!(missing.contains(&(2, 2)));
}

#[test]
fn test_unknown_timezone_is_rejected() {
    let mut birth = support::fixture_birth();
    birth.tz_str = "Atlantis/Capital".to_string();
    let err = calculate_human_design(&support::fixture_ephemeris(), &support::dignities(), &birth)
        .unwrap_err();
    assert!(matches!(
        err,
        HumanDesignError::Resolve(ResolveError::Validation(ValidationError::UnknownTimezone(_)))
    ));
}

#[test]
fn test_missing_body_is_an_ephemeris_error() {
    let eph = cartographer::ephemeris::TableEphemeris::new(
        cartographer::models::JulianDay::new(support::FIXTURE_EPOCH),
    )
    .with_body(cartographer::ephemeris::Body::Sun, 54.0, 0.9856);
    let err = calculate_human_design(&eph, &support::dignities(), &support::fixture_birth())
        .unwrap_err();
    assert!(matches!(err, HumanDesignError::Ephemeris(_)));
}
