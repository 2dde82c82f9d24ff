//! Full Human Design chart calculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::activation::{Activation, HdPlanet, Imprint, Side};
use super::bodygraph::{Authority, Bodygraph, Definition, HdType};
use super::centers::{harmonic_gates, Center};
use super::dignity::DignityTable;
use super::gates::GatePosition;
use super::profile::{IncarnationCross, Profile, Variables};
use crate::ephemeris::{Body, Ephemeris, EphemerisError};
use crate::models::{BirthData, BirthSummary, JulianDay, ResolveError};

/// Solar arc separating the Design moment from birth.
pub const DESIGN_SOLAR_ARC: f64 = 88.0;
const MEAN_SOLAR_MOTION: f64 = 0.985_647;
const DESIGN_TOLERANCE_DEG: f64 = 1e-7;
const DESIGN_MAX_ITERATIONS: usize = 50;

#[derive(Debug, Error)]
pub enum HumanDesignError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("Design moment did not converge after {iterations} iterations (residual {residual:.3e}°)")]
    DesignMomentNotFound { iterations: usize, residual: f64 },
}

/// Signed difference `a - b` folded into `(-180, 180]`.
fn signed_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Find the moment before `birth` when the Sun stood exactly 88° behind its
/// natal longitude, by Newton iteration on the solar longitude.
pub fn design_moment(
    ephemeris: &dyn Ephemeris,
    birth: JulianDay,
) -> Result<JulianDay, HumanDesignError> {
    let natal_sun = ephemeris.position(Body::Sun, birth)?.longitude;
    let target = natal_sun - DESIGN_SOLAR_ARC;
    let mut jd = birth.add_days(-DESIGN_SOLAR_ARC / MEAN_SOLAR_MOTION);
    let mut residual = f64::INFINITY;

    for iteration in 0..DESIGN_MAX_ITERATIONS {
        let sun = ephemeris.position(Body::Sun, jd)?;
        residual = signed_delta(sun.longitude, target);
        if residual.abs() < DESIGN_TOLERANCE_DEG {
            debug!(
                "Design moment converged after {} iterations at JD {:.6}",
                iteration, jd.value()
            );
            return Ok(jd);
        }
        // The Sun never moves backwards; guard against a degenerate speed
        let speed = if sun.speed > 0.1 {
            sun.speed
        } else {
            MEAN_SOLAR_MOTION
        };
        jd = jd.add_days(-residual / speed);
    }

    Err(HumanDesignError::DesignMomentNotFound {
        iterations: DESIGN_MAX_ITERATIONS,
        residual,
    })
}

/// Positions and gate placements for the thirteen points at one moment,
/// before dignities are attached.
fn raw_activations(
    ephemeris: &dyn Ephemeris,
    jd: JulianDay,
) -> Result<Vec<(HdPlanet, f64, GatePosition)>, HumanDesignError> {
    let mut out = Vec::with_capacity(HdPlanet::ORDER.len());
    for planet in HdPlanet::ORDER {
        let (body, opposite) = planet.source();
        let mut position = ephemeris.position(body, jd)?;
        if opposite {
            position = position.opposite();
        }
        out.push((
            planet,
            position.longitude,
            GatePosition::from_longitude(position.longitude),
        ));
    }
    Ok(out)
}

/// The thirteen activations of one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideActivations {
    pub side: Side,
    pub moment: DateTime<Utc>,
    pub julian_day: JulianDay,
    pub activations: Vec<Activation>,
}

impl SideActivations {
    pub fn get(&self, planet: HdPlanet) -> Option<&Activation> {
        self.activations.iter().find(|a| a.planet == planet)
    }

    pub fn gates(&self) -> impl Iterator<Item = u8> + '_ {
        self.activations.iter().map(|a| a.gate())
    }
}

/// A defined channel and the sides imprinting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelActivation {
    pub key: String,
    pub name: String,
    pub gates: [u8; 2],
    pub centers: [Center; 2],
    pub imprint: Imprint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateActivation {
    pub gate: u8,
    pub center: Center,
    pub imprint: Imprint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanDesignChart {
    pub name: String,
    pub birth_data: BirthSummary,
    pub personality: SideActivations,
    pub design: SideActivations,
    #[serde(rename = "type")]
    pub hd_type: HdType,
    pub strategy: String,
    pub signature: String,
    pub not_self_theme: String,
    pub authority: Authority,
    pub definition: Definition,
    pub profile: Profile,
    pub incarnation_cross: IncarnationCross,
    pub variables: Variables,
    pub defined_centers: Vec<Center>,
    pub undefined_centers: Vec<Center>,
    pub channels: Vec<ChannelActivation>,
    pub active_gates: Vec<GateActivation>,
}

impl HumanDesignChart {
    pub fn side(&self, side: Side) -> &SideActivations {
        match side {
            Side::Personality => &self.personality,
            Side::Design => &self.design,
        }
    }

    /// Sides activating `gate`, if any.
    pub fn gate_imprint(&self, gate: u8) -> Option<Imprint> {
        self.active_gates
            .iter()
            .find(|g| g.gate == gate)
            .map(|g| g.imprint)
    }

    pub fn is_center_defined(&self, center: Center) -> bool {
        self.defined_centers.contains(&center)
    }

    /// Channel imprint for a gate pair, when that channel is defined.
    pub fn channel_imprint(&self, a: u8, b: u8) -> Option<Imprint> {
        self.channels
            .iter()
            .find(|c| (c.gates[0] == a && c.gates[1] == b) || (c.gates[0] == b && c.gates[1] == a))
            .map(|c| c.imprint)
    }
}

/// Planet activating one of `gate`'s channel partners, same side first.
fn harmonic_planet(
    gate: u8,
    side: Side,
    personality: &[(HdPlanet, f64, GatePosition)],
    design: &[(HdPlanet, f64, GatePosition)],
) -> Option<HdPlanet> {
    let (same, other) = match side {
        Side::Personality => (personality, design),
        Side::Design => (design, personality),
    };
    harmonic_gates(gate).find_map(|partner| {
        same.iter()
            .chain(other.iter())
            .find(|(_, _, pos)| pos.gate == partner)
            .map(|(planet, _, _)| *planet)
    })
}

fn with_dignities(
    table: &DignityTable,
    side: Side,
    personality: &[(HdPlanet, f64, GatePosition)],
    design: &[(HdPlanet, f64, GatePosition)],
) -> Vec<Activation> {
    let own = match side {
        Side::Personality => personality,
        Side::Design => design,
    };
    own.iter()
        .map(|(planet, longitude, position)| {
            let harmonic = harmonic_planet(position.gate, side, personality, design);
            Activation {
                planet: *planet,
                longitude: *longitude,
                position: *position,
                dignity: table.evaluate(
                    position.gate,
                    position.line,
                    planet.name(),
                    harmonic.map(HdPlanet::name),
                ),
            }
        })
        .collect()
}

fn tone_of(side: &SideActivations, planet: HdPlanet) -> u8 {
    side.get(planet).map(|a| a.position.tone).unwrap_or(1)
}

fn line_of(side: &SideActivations, planet: HdPlanet) -> u8 {
    side.get(planet).map(|a| a.position.line).unwrap_or(1)
}

fn gate_of(side: &SideActivations, planet: HdPlanet) -> u8 {
    side.get(planet).map(|a| a.position.gate).unwrap_or(0)
}

/// Calculate a complete chart for a birth record.
pub fn calculate_human_design(
    ephemeris: &dyn Ephemeris,
    table: &DignityTable,
    birth: &BirthData,
) -> Result<HumanDesignChart, HumanDesignError> {
    let moment = birth.resolve()?;
    let personality_jd = moment.julian_day;
    let design_jd = design_moment(ephemeris, personality_jd)?;

    let personality_raw = raw_activations(ephemeris, personality_jd)?;
    let design_raw = raw_activations(ephemeris, design_jd)?;

    let personality = SideActivations {
        side: Side::Personality,
        moment: moment.utc,
        julian_day: personality_jd,
        activations: with_dignities(table, Side::Personality, &personality_raw, &design_raw),
    };
    let design = SideActivations {
        side: Side::Design,
        moment: design_jd.to_datetime(),
        julian_day: design_jd,
        activations: with_dignities(table, Side::Design, &personality_raw, &design_raw),
    };

    let mut imprints: Vec<(u8, Imprint)> = Vec::new();
    for (side, activations) in [(Side::Personality, &personality), (Side::Design, &design)] {
        for gate in activations.gates() {
            match imprints.iter_mut().find(|(g, _)| *g == gate) {
                Some((_, imprint)) => *imprint = imprint.add(side),
                None => imprints.push((gate, side.into())),
            }
        }
    }
    imprints.sort_by_key(|(gate, _)| *gate);
    let imprint_of = |gate: u8| {
        imprints
            .iter()
            .find(|(g, _)| *g == gate)
            .map(|(_, i)| *i)
            .unwrap_or(Imprint::Both)
    };

    let bodygraph = Bodygraph::from_gates(imprints.iter().map(|(g, _)| *g));
    let hd_type = bodygraph.hd_type();

    let channels = bodygraph
        .channels()
        .iter()
        .map(|c| {
            let (ca, cb) = c.centers();
            let (ia, ib) = (imprint_of(c.gates.0), imprint_of(c.gates.1));
            let imprint = if ia == ib && ia != Imprint::Both {
                ia
            } else {
                Imprint::Both
            };
            ChannelActivation {
                key: c.key(),
                name: c.name.to_string(),
                gates: [c.gates.0, c.gates.1],
                centers: [ca, cb],
                imprint,
            }
        })
        .collect();

    let active_gates = imprints
        .iter()
        .filter_map(|(gate, imprint)| {
            Center::of_gate(*gate).map(|center| GateActivation {
                gate: *gate,
                center,
                imprint: *imprint,
            })
        })
        .collect();

    let profile = Profile::new(
        line_of(&personality, HdPlanet::Sun),
        line_of(&design, HdPlanet::Sun),
    );
    let incarnation_cross = IncarnationCross::new(
        &profile,
        [
            gate_of(&personality, HdPlanet::Sun),
            gate_of(&personality, HdPlanet::Earth),
            gate_of(&design, HdPlanet::Sun),
            gate_of(&design, HdPlanet::Earth),
        ],
    );
    let variables = Variables::new(
        tone_of(&design, HdPlanet::Sun),
        tone_of(&personality, HdPlanet::Sun),
        tone_of(&design, HdPlanet::NorthNode),
        tone_of(&personality, HdPlanet::NorthNode),
    );

    info!(
        "Human Design chart for {}: {} {} ({})",
        birth.name,
        hd_type.name(),
        profile.label,
        bodygraph.authority().name()
    );

    Ok(HumanDesignChart {
        name: birth.name.clone(),
        birth_data: birth.summary(),
        hd_type,
        strategy: hd_type.strategy().to_string(),
        signature: hd_type.signature().to_string(),
        not_self_theme: hd_type.not_self_theme().to_string(),
        authority: bodygraph.authority(),
        definition: bodygraph.definition(),
        profile,
        incarnation_cross,
        variables,
        defined_centers: bodygraph.defined_centers().iter().copied().collect(),
        undefined_centers: bodygraph.undefined_centers(),
        channels,
        active_gates,
        personality,
        design,
    })
}
