//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use cartographer::ephemeris::{Body, TableEphemeris};
use cartographer::humandesign::chart::DESIGN_SOLAR_ARC;
use cartographer::humandesign::gates::{gate_start, LINE_WIDTH};
use cartographer::humandesign::DignityTable;
use cartographer::models::{BirthData, JulianDay};
use cartographer::render::{BodygraphLayout, Rasterizer, RasterizerOptions};

/// JD of 1990-05-15 12:00 UT, close to the fixture birth moment.
pub const FIXTURE_EPOCH: f64 = 2_448_027.0;

/// The fixture birth (14:30 BST = 13:30 UT) in days after [`FIXTURE_EPOCH`].
const BIRTH_OFFSET_DAYS: f64 = 0.0625;

/// Dignity lines exercised by the two-sided fixture.
///
/// - 1.1 and 2.1 fix the static Mars and Jupiter against their harmonic partners
/// - 5.1 carries a star glyph for Uranus, which only the Design side has in gate 15
/// - 8.3 is a no-polarity line, 8.5 is set by the harmonic Mars
/// - 14.2 is exalted by the harmonic Jupiter
pub const FIXTURE_DIGNITIES: &str = r#"{
    "1": {
        "1": {"exaltation_planets": ["Venus"], "detriment_planets": ["Mars"]},
        "2": {"exaltation_planets": ["Venus"], "detriment_planets": ["Mars"]}
    },
    "2": {"1": {"exaltation_planets": ["Jupiter"], "detriment_planets": ["Mercury"]}},
    "5": {"1": {"juxtaposition_planets": ["Uranus"]}},
    "8": {
        "3": {"no_polarity": true, "exaltation_planets": ["Venus"]},
        "5": {"detriment_planets": ["Mars"]}
    },
    "14": {"2": {"exaltation_planets": ["Jupiter"]}}
}"#;

/// Deterministic ephemeris with every body the calculators ask for.
pub fn fixture_ephemeris() -> TableEphemeris {
    TableEphemeris::new(JulianDay::new(FIXTURE_EPOCH))
        .with_body(Body::Sun, 54.0, 0.9856)
        .with_body(Body::Moon, 120.0, 13.2)
        .with_body(Body::Mercury, 40.0, 1.2)
        .with_body(Body::Venus, 20.0, 1.1)
        .with_body(Body::Mars, 300.0, 0.7)
        .with_body(Body::Jupiter, 95.0, 0.2)
        .with_body(Body::Saturn, 292.0, -0.02)
        .with_body(Body::Uranus, 278.0, 0.01)
        .with_body(Body::Neptune, 283.0, 0.005)
        .with_body(Body::Pluto, 226.0, -0.01)
        .with_body(Body::MeanNode, 321.0, -0.053)
        .with_body(Body::TrueNode, 320.0, -0.05)
        .with_body(Body::Chiron, 100.0, 0.04)
        .with_ascendant(200.0)
}

pub fn fixture_birth() -> BirthData {
    BirthData {
        name: "Ada Lovelace".to_string(),
        year: 1990,
        month: 5,
        day: 15,
        hour: 14,
        minute: 30,
        lat: 51.5074,
        lng: -0.1278,
        tz_str: "Europe/London".to_string(),
        house_system: "P".to_string(),
        place: None,
    }
}

pub fn fixture_birth_json() -> serde_json::Value {
    serde_json::to_value(fixture_birth()).expect("birth data serializes")
}

pub fn dignities() -> DignityTable {
    DignityTable::from_json(FIXTURE_DIGNITIES).expect("fixture dignity table parses")
}

/// Middle of `gate.line` on the wheel.
pub fn line_center(gate: u8, line: u8) -> f64 {
    gate_start(gate).expect("gate on the wheel") + (f64::from(line) - 0.5) * LINE_WIDTH
}

/// Place `body` at `personality` on the fixture birth and at `design` 88 days
/// earlier, which is the Design moment when the Sun moves 1°/day.
fn two_sided(eph: TableEphemeris, body: Body, personality: f64, design: f64) -> TableEphemeris {
    let speed = (personality - design) / DESIGN_SOLAR_ARC;
    eph.with_body(body, personality - speed * BIRTH_OFFSET_DAYS, speed)
}

/// Ephemeris whose two sides activate known gates:
///
/// - Mars (1.1), Jupiter (2.1) and the nodes (55/59) are static, so both sides share them
/// - gate 8 is Venus (8.3) for Personality and the Moon (8.5) for Design
/// - Mercury (14.2), Saturn (5.1), Neptune (3.4) and Pluto (60.4) are Personality only
/// - Uranus (15.1) is Design only
///
/// Every other placement parks in gate 41 (Personality Sun 41.2), whose
/// partner gate 30 stays empty. The Design Sun lands in 28 and its Earth in 27.
pub fn two_sided_ephemeris() -> TableEphemeris {
    let park = line_center(41, 4);
    let sun = line_center(41, 2);
    let eph = TableEphemeris::new(JulianDay::new(FIXTURE_EPOCH)).with_ascendant(200.0);
    let eph = two_sided(eph, Body::Sun, sun, sun - DESIGN_SOLAR_ARC);
    let eph = two_sided(eph, Body::Moon, park, line_center(8, 5));
    let eph = two_sided(eph, Body::Mercury, line_center(14, 2), park);
    let eph = two_sided(eph, Body::Venus, line_center(8, 3), park);
    let eph = two_sided(eph, Body::Mars, line_center(1, 1), line_center(1, 1));
    let eph = two_sided(eph, Body::Jupiter, line_center(2, 1), line_center(2, 1));
    let eph = two_sided(eph, Body::Saturn, line_center(5, 1), park);
    let eph = two_sided(eph, Body::Uranus, park, line_center(15, 1));
    let eph = two_sided(eph, Body::Neptune, line_center(3, 4), park);
    let eph = two_sided(eph, Body::Pluto, line_center(60, 4), park);
    two_sided(eph, Body::TrueNode, line_center(55, 3), line_center(55, 3))
}

/// Rasterizer without system fonts, so output does not depend on the host.
pub fn rasterizer() -> Rasterizer {
    Rasterizer::new(&RasterizerOptions {
        png_scale: 1.0,
        load_system_fonts: false,
        ..Default::default()
    })
}

pub fn layout() -> BodygraphLayout {
    BodygraphLayout::standard()
}

#[cfg(feature = "http-server")]
pub fn app_state(api_token: Option<&str>) -> cartographer::http::AppState {
    cartographer::http::AppState::new(
        Arc::new(fixture_ephemeris()),
        Arc::new(dignities()),
        Arc::new(layout()),
        Arc::new(rasterizer()),
    )
    .with_api_token(api_token.map(str::to_string))
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
